//! Test-only engines and fixtures used by unit and behaviour tests.
//!
//! Gated behind the `test-support` feature (and `cfg(test)`).

use std::sync::Mutex;

use crate::{
    DistanceMatrix, EngineFailure, EngineTour, Place, ProblemModel, RoutingEngine, RoutingRequest,
    SearchParameters,
};

/// Build the three-place reference problem: `A(0,0)`, `B(0,10)`, `C(10,0)`
/// with a unit scale, giving the matrix `[[0,10,10],[10,0,14],[10,14,0]]`.
#[must_use]
pub fn triangle_places() -> Vec<Place> {
    vec![
        Place::new("A", "start", 0.0, 0.0),
        Place::new("B", "lunch", 0.0, 10.0),
        Place::new("C", "museum", 10.0, 0.0),
    ]
}

/// The reference problem from [`triangle_places`] as a [`ProblemModel`].
///
/// # Panics
///
/// Never for the fixed reference data.
#[must_use]
#[expect(
    clippy::expect_used,
    reason = "fixture data is constant and known to be valid"
)]
pub fn triangle_model() -> ProblemModel {
    let matrix =
        DistanceMatrix::from_rows(vec![vec![0, 10, 10], vec![10, 0, 14], vec![10, 14, 0]])
            .expect("reference matrix is valid");
    ProblemModel::new(triangle_places(), matrix).expect("reference model is valid")
}

/// What a [`ScriptedEngine`] saw on its most recent call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Node count of the request.
    pub node_count: usize,
    /// Vehicle count of the request.
    pub vehicle_count: usize,
    /// Depot of the request.
    pub depot: usize,
    /// Search parameters of the request.
    pub parameters: SearchParameters,
}

/// Engine returning a fixed sequence.
///
/// The objective is the closed-walk cost of the sequence evaluated through the
/// request's transit callback, unless overridden with
/// [`ScriptedEngine::with_objective`].
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    sequence: Vec<usize>,
    objective: Option<u64>,
    last_request: Mutex<Option<RecordedRequest>>,
}

impl ScriptedEngine {
    /// Return `sequence` on every call.
    #[must_use]
    pub fn new(sequence: Vec<usize>) -> Self {
        Self {
            sequence,
            ..Self::default()
        }
    }

    /// Report `objective` instead of the computed cost.
    #[must_use]
    pub fn with_objective(mut self, objective: u64) -> Self {
        self.objective = Some(objective);
        self
    }

    /// The request seen by the latest call, if any.
    #[must_use]
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.last_request.lock().ok().and_then(|guard| *guard)
    }
}

impl RoutingEngine for ScriptedEngine {
    fn route(&self, request: &RoutingRequest<'_>) -> Result<EngineTour, EngineFailure> {
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(RecordedRequest {
                node_count: request.node_count,
                vehicle_count: request.vehicle_count,
                depot: request.depot,
                parameters: *request.parameters,
            });
        }
        let objective = self
            .objective
            .unwrap_or_else(|| in_range_walk_cost(&self.sequence, request));
        Ok(EngineTour {
            sequence: self.sequence.clone(),
            objective,
        })
    }
}

/// Engine that visits nodes in input order.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputOrderEngine;

impl RoutingEngine for InputOrderEngine {
    fn route(&self, request: &RoutingRequest<'_>) -> Result<EngineTour, EngineFailure> {
        let sequence: Vec<usize> = (0..request.node_count).collect();
        let objective = in_range_walk_cost(&sequence, request);
        Ok(EngineTour {
            sequence,
            objective,
        })
    }
}

/// Engine that never finds a tour.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingEngine;

impl RoutingEngine for FailingEngine {
    fn route(&self, _request: &RoutingRequest<'_>) -> Result<EngineTour, EngineFailure> {
        Err(EngineFailure::new("no feasible tour within the time limit"))
    }
}

fn in_range_walk_cost(sequence: &[usize], request: &RoutingRequest<'_>) -> u64 {
    let Some(&first) = sequence.first() else {
        return 0;
    };
    sequence
        .iter()
        .copied()
        .zip(sequence.iter().copied().skip(1).chain(std::iter::once(first)))
        .filter(|&(from, to)| from < request.node_count && to < request.node_count)
        .map(|(from, to)| request.cost(from, to))
        .fold(0_u64, u64::saturating_add)
}
