//! End-to-end planning: places in, validated tour out.

use thiserror::Error;

use crate::{
    CoordinateError, DistanceMatrix, DistanceScale, MatrixError, ModelError, Place, ProblemModel,
    RoutingEngine, SearchParameters, SolveError, SolverAdapter, TourAssignment,
    extract_coordinates,
};

/// Tunables threaded through one planning run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlannerConfig {
    /// Scale applied before distances are truncated to integers.
    pub scale: DistanceScale,
    /// Parameters forwarded to the routing engine.
    pub search: SearchParameters,
}

/// Any failure along the planning pipeline.
///
/// Each stage fails fast; a partial tour is never produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TourError {
    /// A place had a non-finite coordinate.
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordinateError),
    /// The distance matrix could not be built.
    #[error(transparent)]
    Matrix(MatrixError),
    /// The problem model could not be assembled.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The engine failed or returned an unusable tour.
    #[error(transparent)]
    Solve(#[from] SolveError),
}

impl From<MatrixError> for TourError {
    fn from(err: MatrixError) -> Self {
        match err {
            MatrixError::InvalidCoordinate(source) => Self::InvalidCoordinate(source),
            other => Self::Matrix(other),
        }
    }
}

/// A solved problem: the model and the tour through it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTour {
    /// The assembled problem.
    pub model: ProblemModel,
    /// The validated tour.
    pub tour: TourAssignment,
}

/// Runs extraction, matrix construction, model assembly and solving in order.
///
/// # Examples
/// ```
/// use waytour_core::{
///     DistanceScale, EngineFailure, EngineTour, Place, PlannerConfig, RoutingEngine,
///     RoutingRequest, TourPlanner,
/// };
///
/// struct InputOrder;
///
/// impl RoutingEngine for InputOrder {
///     fn route(&self, request: &RoutingRequest<'_>) -> Result<EngineTour, EngineFailure> {
///         Ok(EngineTour { sequence: (0..request.node_count).collect(), objective: 0 })
///     }
/// }
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
/// let planned = TourPlanner::new(InputOrder, config).plan(places)?;
/// assert_eq!(planned.tour.total_cost(), 34);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct TourPlanner<E> {
    adapter: SolverAdapter<E>,
    scale: DistanceScale,
}

impl<E: RoutingEngine> TourPlanner<E> {
    /// Create a planner around `engine`.
    #[must_use]
    pub const fn new(engine: E, config: PlannerConfig) -> Self {
        Self {
            adapter: SolverAdapter::with_parameters(engine, config.search),
            scale: config.scale,
        }
    }

    /// Build the problem model for `places` without solving it.
    pub fn assemble(&self, places: Vec<Place>) -> Result<ProblemModel, TourError> {
        let coords = extract_coordinates(&places)?;
        let matrix = DistanceMatrix::build(&coords, self.scale)?;
        Ok(ProblemModel::new(places, matrix)?)
    }

    /// Assemble and solve the tour through `places`.
    pub fn plan(&self, places: Vec<Place>) -> Result<PlannedTour, TourError> {
        let model = self.assemble(places)?;
        let tour = self.adapter.solve(&model)?;
        Ok(PlannedTour { model, tour })
    }
}
