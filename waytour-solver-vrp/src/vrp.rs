//! `vrp-core` modelling of a closed single-vehicle tour.
//!
//! Every node other than the depot becomes a job at its own location index;
//! the single vehicle starts and ends at the depot. The goal minimises
//! unassigned jobs first and distance second, so a complete tour always wins
//! over a shorter partial one.

use std::sync::Arc;
use std::time::Duration;

use vrp_core::models::common::Location;
use vrp_core::prelude::*;
use waytour_core::RoutingRequest;

use crate::engine::VrpEngineConfig;

/// Dense cost table read once from a transit callback.
pub(crate) struct ClosedTourProblem {
    node_count: usize,
    depot: Location,
    costs: Vec<f64>,
}

impl ClosedTourProblem {
    #[expect(
        clippy::cast_precision_loss,
        reason = "arc costs are capped at 2^53 and convert to f64 exactly"
    )]
    pub(crate) fn from_request(request: &RoutingRequest<'_>) -> Self {
        let nodes = 0..request.node_count;
        let costs = nodes
            .clone()
            .flat_map(|from| nodes.clone().map(move |to| (from, to)))
            .map(|(from, to)| request.cost(from, to) as f64)
            .collect();
        Self {
            node_count: request.node_count,
            depot: request.depot,
            costs,
        }
    }
}

/// `vrp-core` progress messages, sent to the `log` facade at debug level.
///
/// The default `vrp-core` logger prints to stdout, which is reserved for the
/// rendered tour.
fn routed_logger() -> InfoLogger {
    Arc::new(|message: &str| log::debug!(target: "vrp_core", "{message}"))
}

/// Whole seconds for `vrp-core`'s time termination, rounded up, at least one.
fn max_time_secs(time_limit: Duration) -> usize {
    let secs = time_limit
        .as_secs()
        .saturating_add(u64::from(time_limit.subsec_nanos() > 0))
        .max(1);
    usize::try_from(secs).unwrap_or(usize::MAX)
}

fn define_goal(transport: Arc<dyn TransportCost>) -> GenericResult<GoalContext> {
    let minimize_unassigned = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-distance")
        .set_transport_cost(transport)
        .set_time_constrained(false)
        .build_minimize_distance()?;

    GoalContextBuilder::with_features(&[minimize_unassigned, transport_feature])?.build()
}

fn define_problem(
    tour: &ClosedTourProblem,
    goal: GoalContext,
    transport: Arc<dyn TransportCost>,
    logger: InfoLogger,
) -> GenericResult<Problem> {
    let jobs = (0..tour.node_count)
        .filter(|&node| node != tour.depot)
        .map(|node| {
            SingleBuilder::default()
                .id(format!("node{node}").as_str())
                .location(node)?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vehicle = VehicleBuilder::default()
        .id("tourist")
        .add_detail(
            VehicleDetailBuilder::default()
                .set_start_location(tour.depot)
                .set_end_location(tour.depot)
                .build()?,
        )
        .build()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(std::iter::once(vehicle))
        .with_goal(goal)
        .with_transport_cost(transport)
        .with_logger(logger)
        .build()
}

/// Solve `tour` and return the visited nodes in order, depot excluded.
pub(crate) fn solve_closed_tour(
    tour: &ClosedTourProblem,
    time_limit: Duration,
    config: &VrpEngineConfig,
) -> Result<Vec<usize>, String> {
    let transport: Arc<dyn TransportCost> = Arc::new(
        SimpleTransportCost::new(tour.costs.clone(), tour.costs.clone())
            .map_err(|err| format!("invalid routing matrix: {err}"))?,
    );
    let goal =
        define_goal(transport.clone()).map_err(|err| format!("invalid goal: {err}"))?;
    let logger = routed_logger();
    let problem = Arc::new(
        define_problem(tour, goal, transport, logger.clone())
            .map_err(|err| format!("invalid problem: {err}"))?,
    );
    let environment = Arc::new(Environment {
        logger,
        ..Environment::default()
    });

    let vrp_config = VrpConfigBuilder::new(problem.clone())
        .set_environment(environment)
        .prebuild()
        .map_err(|err| format!("invalid solver configuration: {err}"))?
        .with_max_time(Some(max_time_secs(time_limit)))
        .with_max_generations(config.max_generations)
        .build()
        .map_err(|err| format!("invalid solver configuration: {err}"))?;

    let solution = vrp_core::solver::Solver::new(problem, vrp_config)
        .solve()
        .map_err(|err| format!("search failed: {err}"))?;

    if !solution.unassigned.is_empty() {
        return Err(format!(
            "{} nodes left unvisited",
            solution.unassigned.len()
        ));
    }

    Ok(solution
        .get_locations()
        .flatten()
        .filter(|&location| location != tour.depot)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use waytour_core::SearchParameters;

    fn line_cost(from: usize, to: usize) -> u64 {
        u64::try_from(from.abs_diff(to)).unwrap_or(u64::MAX) * 5
    }

    #[rstest]
    fn costs_are_read_row_major() {
        let parameters = SearchParameters::default();
        let request = RoutingRequest {
            node_count: 3,
            vehicle_count: 1,
            depot: 0,
            transit: &line_cost,
            parameters: &parameters,
        };
        let problem = ClosedTourProblem::from_request(&request);
        assert_eq!(problem.costs, vec![0.0, 5.0, 10.0, 5.0, 0.0, 5.0, 10.0, 5.0, 0.0]);
        assert_eq!(problem.depot, 0);
    }

    #[rstest]
    #[case(Duration::ZERO, 1)]
    #[case(Duration::from_millis(500), 1)]
    #[case(Duration::from_secs(2), 2)]
    #[case(Duration::from_millis(2_900), 3)]
    #[case(Duration::from_secs(30), 30)]
    fn time_limit_rounds_up_to_whole_seconds(#[case] limit: Duration, #[case] expected: usize) {
        assert_eq!(max_time_secs(limit), expected);
    }

    #[rstest]
    fn uncapped_search_runs_until_the_time_limit() {
        let parameters = SearchParameters::default();
        let request = RoutingRequest {
            node_count: 4,
            vehicle_count: 1,
            depot: 0,
            transit: &line_cost,
            parameters: &parameters,
        };
        let problem = ClosedTourProblem::from_request(&request);
        let started_at = std::time::Instant::now();
        let visits = solve_closed_tour(
            &problem,
            Duration::from_secs(1),
            &VrpEngineConfig::default(),
        )
        .expect("line is solvable");
        assert_eq!(visits.len(), 3);
        assert!(started_at.elapsed() >= Duration::from_millis(900));
    }

    #[rstest]
    fn every_job_is_visited_once() {
        let parameters = SearchParameters::default();
        let request = RoutingRequest {
            node_count: 5,
            vehicle_count: 1,
            depot: 2,
            transit: &line_cost,
            parameters: &parameters,
        };
        let problem = ClosedTourProblem::from_request(&request);
        let mut visits = solve_closed_tour(
            &problem,
            Duration::from_secs(5),
            &VrpEngineConfig {
                max_generations: Some(50),
            },
        )
        .expect("line is solvable");
        visits.sort_unstable();
        assert_eq!(visits, vec![0, 1, 3, 4]);
    }
}
