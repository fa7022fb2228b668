//! Behavioural tests for `VrpEngine` using rstest-bdd.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use waytour_core::test_support::triangle_places;
use waytour_core::{DistanceScale, Place, PlannedTour, PlannerConfig, TourError, TourPlanner};
use waytour_solver_vrp::{VrpEngine, VrpEngineConfig};

#[derive(Debug, Default)]
struct VrpWorld {
    places: RefCell<Vec<Place>>,
    outcome: RefCell<Option<Result<PlannedTour, TourError>>>,
}

impl VrpWorld {
    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_tour(&self) -> PlannedTour {
        self.outcome
            .borrow()
            .as_ref()
            .cloned()
            .expect("outcome should be recorded before assertions")
            .expect("the engine should find a tour")
    }
}

#[fixture]
fn world() -> VrpWorld {
    VrpWorld::default()
}

#[given("the three reference places at unit scale")]
fn given_reference_places(world: &VrpWorld) {
    world.places.replace(triangle_places());
}

#[given("four places on the corners of a square")]
fn given_square(world: &VrpWorld) {
    world.places.replace(vec![
        Place::new("SW", "start", 0.0, 0.0),
        Place::new("NE", "tower", 10.0, 10.0),
        Place::new("NW", "market", 10.0, 0.0),
        Place::new("SE", "harbour", 0.0, 10.0),
    ]);
}

#[given("a single place")]
fn given_single_place(world: &VrpWorld) {
    world
        .places
        .replace(vec![Place::new("Home", "rest", 51.05, 3.72)]);
}

#[when("the vrp engine plans the tour")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_planned(world: &VrpWorld) {
    let config = PlannerConfig {
        scale: DistanceScale::new(1.0).expect("unit scale"),
        ..PlannerConfig::default()
    };
    let engine = VrpEngine::with_config(VrpEngineConfig {
        max_generations: Some(50),
    });
    let planner = TourPlanner::new(engine, config);
    let outcome = planner.plan(world.places.borrow().clone());
    world.outcome.replace(Some(outcome));
}

#[then("the tour starts at the first place")]
fn then_starts_at_depot(world: &VrpWorld) {
    let planned = world.expect_tour();
    assert_eq!(planned.tour.sequence().first(), Some(&0));
}

#[then("every place is visited exactly once")]
fn then_permutation(world: &VrpWorld) {
    let planned = world.expect_tour();
    let mut visited = planned.tour.sequence().to_vec();
    visited.sort_unstable();
    let expected: Vec<usize> = (0..planned.model.node_count()).collect();
    assert_eq!(visited, expected);
}

#[then("the tour cost is 34")]
fn then_cost_34(world: &VrpWorld) {
    assert_eq!(world.expect_tour().tour.total_cost(), 34);
}

#[then("the tour cost is 40")]
fn then_cost_40(world: &VrpWorld) {
    assert_eq!(world.expect_tour().tour.total_cost(), 40);
}

#[then("the tour cost is 0")]
fn then_cost_0(world: &VrpWorld) {
    let planned = world.expect_tour();
    assert_eq!(planned.tour.total_cost(), 0);
    assert_eq!(planned.tour.sequence(), &[0]);
}

#[scenario(path = "tests/features/vrp_engine.feature", index = 0)]
fn three_reference_places(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_engine.feature", index = 1)]
fn four_corners_of_a_square(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_engine.feature", index = 2)]
fn a_single_place(world: VrpWorld) {
    let _ = world;
}
