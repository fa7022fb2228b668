//! Facade crate for the waytour tour planner.
//!
//! This crate re-exports the core domain types and exposes the `vrp-core`
//! routing engine behind the `solver-vrp` feature.

#![forbid(unsafe_code)]

pub use waytour_core::{
    ArrowChain, ArrowStyle, CoordinateError, DistanceMatrix, DistanceScale, EngineFailure,
    EngineTour, FirstSolutionStrategy, MAX_ARC_COST, MatrixError, Metaheuristic, ModelError,
    Place, PlannedTour, PlannerConfig, PolylinePoint, ProblemModel, ReportError, RoutingEngine,
    RoutingRequest, SearchParameters, SolveError, SolverAdapter, TourAssignment, TourError,
    TourPlanner, TransitCallback, UnknownStrategy, extract_coordinates, render_arrow_chain,
    render_original_route, render_polyline,
};

#[cfg(feature = "test-support")]
pub use waytour_core::test_support;

#[cfg(feature = "solver-vrp")]
pub use waytour_solver_vrp::{VrpEngine, VrpEngineConfig};
