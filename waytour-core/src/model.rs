//! Single-vehicle closed-tour problem instances.

use thiserror::Error;

use crate::{DistanceMatrix, Place};

/// Errors returned by [`ProblemModel::new`] and [`ProblemModel::with_depot`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The place list and the matrix describe different node counts.
    #[error("{places} places supplied for a {matrix}x{matrix} distance matrix")]
    DimensionMismatch {
        /// Number of places.
        places: usize,
        /// Matrix size.
        matrix: usize,
    },
    /// The depot index does not name a node.
    #[error("depot {depot} is outside the {size} available nodes")]
    InvalidDepot {
        /// Requested depot.
        depot: usize,
        /// Number of nodes.
        size: usize,
    },
}

/// An immutable routing problem: one vehicle leaving from and returning to
/// the depot after visiting every place.
///
/// The places are kept for rendering only; engines see the matrix.
///
/// # Examples
/// ```
/// use waytour_core::{DistanceMatrix, Place, ProblemModel};
///
/// let places = vec![Place::new("A", "", 0.0, 0.0), Place::new("B", "", 0.0, 1.0)];
/// let matrix = DistanceMatrix::from_rows(vec![vec![0, 7], vec![7, 0]])?;
/// let model = ProblemModel::new(places, matrix)?;
///
/// assert_eq!(model.depot(), 0);
/// assert_eq!(model.vehicle_count(), 1);
/// assert_eq!(model.transit_cost(1, 0), Some(7));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemModel {
    places: Vec<Place>,
    matrix: DistanceMatrix,
    depot: usize,
}

impl ProblemModel {
    /// Vehicles available to serve the tour.
    pub const VEHICLE_COUNT: usize = 1;

    /// Assemble a model whose tour starts and ends at the first place.
    pub fn new(places: Vec<Place>, matrix: DistanceMatrix) -> Result<Self, ModelError> {
        Self::with_depot(places, matrix, 0)
    }

    /// Assemble a model with an explicit depot.
    pub fn with_depot(
        places: Vec<Place>,
        matrix: DistanceMatrix,
        depot: usize,
    ) -> Result<Self, ModelError> {
        if places.len() != matrix.size() {
            return Err(ModelError::DimensionMismatch {
                places: places.len(),
                matrix: matrix.size(),
            });
        }
        if depot >= places.len() {
            return Err(ModelError::InvalidDepot {
                depot,
                size: places.len(),
            });
        }
        Ok(Self {
            places,
            matrix,
            depot,
        })
    }

    /// Number of nodes in the tour.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.matrix.size()
    }

    /// Number of vehicles, always [`Self::VEHICLE_COUNT`].
    #[must_use]
    pub const fn vehicle_count(&self) -> usize {
        Self::VEHICLE_COUNT
    }

    /// Index of the start and end node.
    #[must_use]
    pub const fn depot(&self) -> usize {
        self.depot
    }

    /// Places in input order.
    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// The place at node `index`.
    #[must_use]
    pub fn place(&self, index: usize) -> Option<&Place> {
        self.places.get(index)
    }

    /// The underlying distance matrix.
    #[must_use]
    pub const fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// Cost of the arc `from -> to`.
    #[must_use]
    pub fn transit_cost(&self, from: usize, to: usize) -> Option<u64> {
        self.matrix.get(from, to)
    }
}
