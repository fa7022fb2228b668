//! Core domain types for the waytour planner.
//!
//! Named waypoints become a symmetric integer distance matrix, the matrix and
//! places become a single-vehicle closed-tour [`ProblemModel`], and a
//! [`SolverAdapter`] hands that model to an external [`RoutingEngine`]. The
//! resulting [`TourAssignment`] is validated before the [`report`] renderers
//! turn it into an itinerary or a map polyline.
//!
//! Constructors return `Result` so invalid input is rejected at the earliest
//! stage.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod adapter;
mod engine;
mod matrix;
mod model;
mod pipeline;
mod place;
pub mod report;
mod tour;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use adapter::{SolveError, SolverAdapter};
pub use engine::{
    EngineFailure, EngineTour, FirstSolutionStrategy, Metaheuristic, RoutingEngine,
    RoutingRequest, SearchParameters, TransitCallback, UnknownStrategy,
};
pub use matrix::{DistanceMatrix, DistanceScale, MAX_ARC_COST, MatrixError};
pub use model::{ModelError, ProblemModel};
pub use pipeline::{PlannedTour, PlannerConfig, TourError, TourPlanner};
pub use place::{CoordinateError, Place, extract_coordinates};
pub use report::{
    ArrowChain, ArrowStyle, PolylinePoint, ReportError, render_arrow_chain, render_original_route,
    render_polyline,
};
pub use tour::TourAssignment;
