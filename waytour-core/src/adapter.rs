//! Hands a [`ProblemModel`] to a [`RoutingEngine`] and validates the answer.

use std::time::Instant;

use thiserror::Error;

use crate::{ProblemModel, RoutingEngine, RoutingRequest, SearchParameters, TourAssignment};

/// Errors returned by [`SolverAdapter::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The engine found no feasible tour within its time budget.
    #[error("could not optimise route: {reason}")]
    SolveFailed {
        /// Diagnostic supplied by the engine.
        reason: String,
    },
    /// The engine returned a node index outside the problem.
    #[error("engine returned node {index} for a problem with {size} nodes")]
    CorruptAssignment {
        /// Offending index.
        index: usize,
        /// Number of nodes in the problem.
        size: usize,
    },
    /// The engine did not visit every node exactly once.
    #[error("engine returned {found} nodes, expected {expected}")]
    WrongLength {
        /// Number of nodes in the problem.
        expected: usize,
        /// Number of nodes returned.
        found: usize,
    },
    /// The engine visited a node twice.
    #[error("engine visited node {index} more than once")]
    RepeatedNode {
        /// The repeated node.
        index: usize,
    },
    /// The tour did not start at the depot.
    #[error("tour starts at {found:?} instead of depot {expected}")]
    WrongStart {
        /// The depot.
        expected: usize,
        /// First node returned, if any.
        found: Option<usize>,
    },
    /// Summing the arc costs overflowed `u64`.
    #[error("tour cost overflows a 64-bit integer")]
    CostOverflow,
}

/// Bridges a [`ProblemModel`] to a [`RoutingEngine`].
///
/// The adapter exposes the distance matrix through a transit-cost callback,
/// forwards its [`SearchParameters`] unchanged, and checks the returned tour
/// before anyone renders it. Engine failures are surfaced as
/// [`SolveError::SolveFailed`] and are not retried.
///
/// # Examples
/// ```
/// use waytour_core::{
///     DistanceMatrix, EngineFailure, EngineTour, Place, ProblemModel, RoutingEngine,
///     RoutingRequest, SolverAdapter,
/// };
///
/// struct InputOrder;
///
/// impl RoutingEngine for InputOrder {
///     fn route(&self, request: &RoutingRequest<'_>) -> Result<EngineTour, EngineFailure> {
///         let sequence: Vec<usize> = (0..request.node_count).collect();
///         Ok(EngineTour { sequence, objective: 14 })
///     }
/// }
///
/// let places = vec![Place::new("A", "", 0.0, 0.0), Place::new("B", "", 0.0, 1.0)];
/// let matrix = DistanceMatrix::from_rows(vec![vec![0, 7], vec![7, 0]])?;
/// let model = ProblemModel::new(places, matrix)?;
///
/// let tour = SolverAdapter::new(InputOrder).solve(&model)?;
/// assert_eq!(tour.total_cost(), 14);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct SolverAdapter<E> {
    engine: E,
    parameters: SearchParameters,
}

impl<E: RoutingEngine> SolverAdapter<E> {
    /// Wrap `engine` using default search parameters.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self::with_parameters(engine, SearchParameters::default())
    }

    /// Wrap `engine` with explicit search parameters.
    #[must_use]
    pub const fn with_parameters(engine: E, parameters: SearchParameters) -> Self {
        Self { engine, parameters }
    }

    /// Search parameters forwarded to the engine.
    #[must_use]
    pub const fn parameters(&self) -> &SearchParameters {
        &self.parameters
    }

    /// The wrapped engine.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Solve `model`, blocking for at most the configured time budget.
    pub fn solve(&self, model: &ProblemModel) -> Result<TourAssignment, SolveError> {
        let transit = |from: usize, to: usize| transit_cost(model, from, to);
        let request = RoutingRequest {
            node_count: model.node_count(),
            vehicle_count: model.vehicle_count(),
            depot: model.depot(),
            transit: &transit,
            parameters: &self.parameters,
        };

        log::info!("{}", start_message(request.node_count, &self.parameters));
        let started_at = Instant::now();
        let outcome = self.engine.route(&request);
        let elapsed = started_at.elapsed();

        let engine_tour = outcome.map_err(|failure| {
            log::warn!("engine found no tour after {elapsed:?}: {failure}");
            SolveError::SolveFailed {
                reason: failure.message,
            }
        })?;
        log::debug!(
            "engine returned {:?} with objective {}",
            engine_tour.sequence,
            engine_tour.objective
        );

        let tour = TourAssignment::from_sequence(model, engine_tour.sequence)?
            .with_reported_objective(engine_tour.objective);
        if tour.total_cost() != engine_tour.objective {
            log::warn!(
                "engine reported objective {} but the tour costs {}; keeping the recomputed cost",
                engine_tour.objective,
                tour.total_cost()
            );
        }
        log::info!(
            "found tour with cost {} in {elapsed:?}",
            tour.total_cost()
        );
        Ok(tour)
    }
}

fn start_message(node_count: usize, parameters: &SearchParameters) -> String {
    format!(
        "solving tour over {node_count} nodes (metaheuristic: {}, time limit: {:?})",
        parameters.metaheuristic, parameters.time_limit
    )
}

fn transit_cost(model: &ProblemModel, from: usize, to: usize) -> u64 {
    let cost = model.transit_cost(from, to);
    debug_assert!(
        cost.is_some(),
        "transit lookup out of range: from={from}, to={to}"
    );
    cost.unwrap_or_else(|| {
        log::warn!("engine requested arc {from} -> {to} outside the model; using zero cost");
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingEngine, ScriptedEngine, triangle_model};
    use crate::{Metaheuristic, SearchParameters};
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    fn wraps_engine_tour_with_recomputed_cost() {
        let model = triangle_model();
        let adapter = SolverAdapter::new(ScriptedEngine::new(vec![0, 1, 2]));
        let tour = adapter.solve(&model).expect("scripted tour");
        assert_eq!(tour.sequence(), &[0, 1, 2]);
        assert_eq!(tour.total_cost(), 34);
        assert_eq!(tour.reported_objective(), Some(34));
    }

    #[rstest]
    fn keeps_recomputed_cost_when_engine_misreports() {
        let model = triangle_model();
        let engine = ScriptedEngine::new(vec![0, 2, 1]).with_objective(99);
        let tour = SolverAdapter::new(engine).solve(&model).expect("scripted tour");
        assert_eq!(tour.total_cost(), 34);
        assert_eq!(tour.reported_objective(), Some(99));
    }

    #[rstest]
    fn engine_failure_is_solve_failed() {
        let model = triangle_model();
        let err = SolverAdapter::new(FailingEngine)
            .solve(&model)
            .expect_err("failing engine");
        assert!(matches!(err, SolveError::SolveFailed { .. }));
    }

    #[rstest]
    fn out_of_range_node_is_corrupt_assignment() {
        let model = triangle_model();
        let err = SolverAdapter::new(ScriptedEngine::new(vec![0, 1, 5]))
            .solve(&model)
            .expect_err("corrupt tour");
        assert_eq!(err, SolveError::CorruptAssignment { index: 5, size: 3 });
    }

    #[rstest]
    #[case(Duration::from_millis(500), "time limit: 500ms")]
    #[case(Duration::from_secs(30), "time limit: 30s")]
    fn start_message_keeps_sub_second_budgets(#[case] limit: Duration, #[case] expected: &str) {
        let parameters = SearchParameters::default().with_time_limit(limit);
        let message = start_message(3, &parameters);
        assert!(message.starts_with("solving tour over 3 nodes"));
        assert!(message.contains(expected), "{message}");
    }

    #[rstest]
    fn forwards_search_parameters() {
        let model = triangle_model();
        let params = SearchParameters::default()
            .with_time_limit(Duration::from_secs(3))
            .with_metaheuristic(Metaheuristic::GreedyDescent);
        let engine = ScriptedEngine::new(vec![0, 1, 2]);
        let adapter = SolverAdapter::with_parameters(&engine, params);
        adapter.solve(&model).expect("scripted tour");
        let seen = engine.last_request().expect("engine was called");
        assert_eq!(seen.parameters, params);
        assert_eq!(seen.node_count, 3);
        assert_eq!(seen.vehicle_count, 1);
        assert_eq!(seen.depot, 0);
    }
}
