//! `VrpEngine` implementation of the routing engine boundary.

use std::time::Instant;

use waytour_core::{EngineFailure, EngineTour, RoutingEngine, RoutingRequest};

use crate::vrp::{ClosedTourProblem, solve_closed_tour};

/// Configuration for [`VrpEngine`].
///
/// The default leaves the search bounded by the request's time limit only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VrpEngineConfig {
    /// Optional upper bound on `vrp-core` generations, checked alongside the
    /// time limit.
    pub max_generations: Option<usize>,
}

/// Routing engine using the `vrp-core` metaheuristics.
///
/// # Examples
/// ```
/// use waytour_core::{DistanceScale, Place, PlannerConfig, TourPlanner};
/// use waytour_solver_vrp::{VrpEngine, VrpEngineConfig};
///
/// let places = vec![
///     Place::new("A", "start", 0.0, 0.0),
///     Place::new("B", "lunch", 0.0, 10.0),
///     Place::new("C", "museum", 10.0, 0.0),
/// ];
/// let config = PlannerConfig {
///     scale: DistanceScale::new(1.0)?,
///     ..PlannerConfig::default()
/// };
/// let engine = VrpEngine::with_config(VrpEngineConfig {
///     max_generations: Some(50),
/// });
/// let planned = TourPlanner::new(engine, config).plan(places)?;
/// assert_eq!(planned.tour.sequence().first(), Some(&0));
/// assert_eq!(planned.tour.total_cost(), 34);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct VrpEngine {
    config: VrpEngineConfig,
}

impl VrpEngine {
    /// Construct an engine using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an engine with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpEngineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpEngineConfig {
        &self.config
    }
}

impl RoutingEngine for VrpEngine {
    fn route(&self, request: &RoutingRequest<'_>) -> Result<EngineTour, EngineFailure> {
        if request.vehicle_count != 1 {
            return Err(EngineFailure::new(format!(
                "expected a single vehicle, got {}",
                request.vehicle_count
            )));
        }
        if request.depot >= request.node_count {
            return Err(EngineFailure::new(format!(
                "depot {} outside {} nodes",
                request.depot, request.node_count
            )));
        }
        if request.node_count == 1 {
            return Ok(EngineTour {
                sequence: vec![request.depot],
                objective: 0,
            });
        }

        log::debug!(
            "vrp-core ignores first solution strategy {} and metaheuristic {}",
            request.parameters.first_solution,
            request.parameters.metaheuristic
        );

        let started_at = Instant::now();
        let problem = ClosedTourProblem::from_request(request);
        let visits = solve_closed_tour(&problem, request.parameters.time_limit, &self.config)
            .map_err(EngineFailure::new)?;
        log::debug!(
            "vrp-core visited {} jobs in {:?}",
            visits.len(),
            started_at.elapsed()
        );

        let sequence: Vec<usize> = std::iter::once(request.depot).chain(visits).collect();
        let objective = closed_walk_objective(&sequence, request);
        Ok(EngineTour {
            sequence,
            objective,
        })
    }
}

fn closed_walk_objective(sequence: &[usize], request: &RoutingRequest<'_>) -> u64 {
    let Some(&first) = sequence.first() else {
        return 0;
    };
    sequence
        .iter()
        .copied()
        .zip(sequence.iter().copied().skip(1).chain(std::iter::once(first)))
        .map(|(from, to)| request.cost(from, to))
        .fold(0_u64, u64::saturating_add)
}
