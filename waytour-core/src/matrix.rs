//! Scaled integer distance matrix between waypoints.
//!
//! Routing engines work on integer arc costs, while coordinates are degrees
//! with sub-unit magnitudes. Coordinate differences are therefore multiplied
//! by a [`DistanceScale`] before the Euclidean norm is truncated to an
//! integer. The model is planar: a degree of longitude is treated as the
//! same length as a degree of latitude, which only holds for small areas.

use std::fmt;

use geo::Coord;
use thiserror::Error;

use crate::place::{CoordinateError, check_finite};

/// Largest arc cost a matrix may hold.
///
/// `2^53` is exactly representable as `f64` and leaves ample headroom for
/// engines that sum costs in signed 64-bit integers.
pub const MAX_ARC_COST: u64 = 1 << 53;

const MAX_ARC_COST_F64: f64 = 9_007_199_254_740_992.0;

/// Multiplier applied to coordinate differences before truncation.
///
/// # Examples
/// ```
/// use waytour_core::DistanceScale;
///
/// assert_eq!(DistanceScale::default().factor(), 10_000.0);
/// assert!(DistanceScale::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct DistanceScale(f64);

impl DistanceScale {
    /// Scale used when none is configured.
    pub const DEFAULT: Self = Self(10_000.0);

    /// Validate a scale factor. It must be finite and strictly positive.
    pub fn new(factor: f64) -> Result<Self, MatrixError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(MatrixError::InvalidScale { factor })
        }
    }

    /// The raw multiplier.
    #[must_use]
    pub const fn factor(self) -> f64 {
        self.0
    }
}

impl Default for DistanceScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for DistanceScale {
    type Error = MatrixError;

    fn try_from(factor: f64) -> Result<Self, Self::Error> {
        Self::new(factor)
    }
}

impl From<DistanceScale> for f64 {
    fn from(scale: DistanceScale) -> Self {
        scale.0
    }
}

/// Errors raised while building or validating a [`DistanceMatrix`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// No coordinates or rows were supplied.
    #[error("distance matrix needs at least one node")]
    EmptyInput,
    /// A coordinate component was NaN or infinite.
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordinateError),
    /// The scale factor was zero, negative or not finite.
    #[error("scale factor {factor} must be finite and positive")]
    InvalidScale {
        /// The rejected factor.
        factor: f64,
    },
    /// A scaled distance exceeded [`MAX_ARC_COST`].
    #[error("scaled distance from node {from} to node {to} exceeds {MAX_ARC_COST}")]
    CostOverflow {
        /// Origin node.
        from: usize,
        /// Destination node.
        to: usize,
    },
    /// A row length differed from the number of rows.
    #[error("row {row} has {len} entries but the matrix has {size} rows")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Length of that row.
        len: usize,
        /// Number of rows.
        size: usize,
    },
    /// A diagonal entry was not zero.
    #[error("diagonal entry {index} must be zero")]
    NonZeroDiagonal {
        /// Row and column of the entry.
        index: usize,
    },
    /// `matrix[from][to]` differed from `matrix[to][from]`.
    #[error("entries ({from}, {to}) and ({to}, {from}) differ")]
    Asymmetric {
        /// Row of the first entry.
        from: usize,
        /// Column of the first entry.
        to: usize,
    },
}

/// Symmetric `n×n` table of non-negative integer travel costs.
///
/// Entries are stored row-major. The diagonal is always zero and
/// `get(i, j) == get(j, i)` for every pair. The matrix is written once and
/// read-only afterwards.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waytour_core::{DistanceMatrix, DistanceScale};
///
/// let coords = [
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 10.0, y: 0.0 },
///     Coord { x: 0.0, y: 10.0 },
/// ];
/// let scale = DistanceScale::new(1.0)?;
/// let matrix = DistanceMatrix::build(&coords, scale)?;
///
/// assert_eq!(matrix.get(1, 2), Some(14));
/// assert_eq!(matrix.get(2, 1), Some(14));
/// assert_eq!(matrix.get(0, 0), Some(0));
/// # Ok::<(), waytour_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<u64>,
}

impl DistanceMatrix {
    /// Build the matrix for `coords` under `scale`.
    ///
    /// Every coordinate is checked before any cell is written.
    pub fn build(coords: &[Coord<f64>], scale: DistanceScale) -> Result<Self, MatrixError> {
        if coords.is_empty() {
            return Err(MatrixError::EmptyInput);
        }
        check_finite(coords)?;

        let size = coords.len();
        let mut cells = vec![0_u64; size * size];
        fill_rows(&mut cells, coords, scale)?;
        log::debug!(
            "built {size}x{size} distance matrix with scale {}",
            scale.factor()
        );
        Ok(Self { size, cells })
    }

    /// Validate a hand-written matrix.
    ///
    /// # Examples
    /// ```
    /// use waytour_core::{DistanceMatrix, MatrixError};
    ///
    /// let matrix = DistanceMatrix::from_rows(vec![vec![0, 3], vec![3, 0]])?;
    /// assert_eq!(matrix.size(), 2);
    ///
    /// let err = DistanceMatrix::from_rows(vec![vec![0, 3], vec![4, 0]]).unwrap_err();
    /// assert_eq!(err, MatrixError::Asymmetric { from: 0, to: 1 });
    /// # Ok::<(), MatrixError>(())
    /// ```
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        if size == 0 {
            return Err(MatrixError::EmptyInput);
        }
        if let Some((row, entries)) = rows
            .iter()
            .enumerate()
            .find(|(_, entries)| entries.len() != size)
        {
            return Err(MatrixError::NotSquare {
                row,
                len: entries.len(),
                size,
            });
        }

        let matrix = Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        };
        matrix.check_invariants()?;
        Ok(matrix)
    }

    fn check_invariants(&self) -> Result<(), MatrixError> {
        for from in 0..self.size {
            if self.get(from, from) != Some(0) {
                return Err(MatrixError::NonZeroDiagonal { index: from });
            }
            for to in (from + 1)..self.size {
                let forward = self.get(from, to);
                if forward > Some(MAX_ARC_COST) {
                    return Err(MatrixError::CostOverflow { from, to });
                }
                if forward != self.get(to, from) {
                    return Err(MatrixError::Asymmetric { from, to });
                }
            }
        }
        Ok(())
    }

    /// Number of nodes (rows and columns).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Cost of travelling from `from` to `to`, or `None` when either index
    /// is out of range.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<u64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.cells.get(from * self.size + to).copied()
    }

    /// The entries of row `from`.
    #[must_use]
    pub fn row(&self, from: usize) -> Option<&[u64]> {
        if from >= self.size {
            return None;
        }
        let start = from * self.size;
        self.cells.get(start..start + self.size)
    }

    /// Iterate over rows in node order.
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> + '_ {
        self.cells.chunks(self.size)
    }
}

impl fmt::Display for DistanceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            f.write_str("[")?;
            for (col, entry) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{entry}")?;
            }
            f.write_str("]\n")?;
        }
        Ok(())
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "distances are scaled in floating point then truncated into a checked integer range"
)]
fn scaled_distance(from: Coord<f64>, to: Coord<f64>, scale: DistanceScale) -> Option<u64> {
    let delta = (from - to) * scale.factor();
    let distance = delta.y.hypot(delta.x).floor();
    // `!(a <= b)` also rejects NaN.
    if !(distance <= MAX_ARC_COST_F64) {
        return None;
    }
    Some(distance as u64)
}

fn fill_row(
    from: usize,
    origin: Coord<f64>,
    row: &mut [u64],
    coords: &[Coord<f64>],
    scale: DistanceScale,
) -> Result<(), MatrixError> {
    for (to, (cell, target)) in row.iter_mut().zip(coords).enumerate() {
        if to == from {
            continue;
        }
        *cell =
            scaled_distance(origin, *target, scale).ok_or(MatrixError::CostOverflow { from, to })?;
    }
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn fill_rows(
    cells: &mut [u64],
    coords: &[Coord<f64>],
    scale: DistanceScale,
) -> Result<(), MatrixError> {
    cells
        .chunks_mut(coords.len())
        .zip(coords)
        .enumerate()
        .try_for_each(|(from, (row, origin))| fill_row(from, *origin, row, coords, scale))
}

// One row per worker.
#[cfg(feature = "parallel")]
fn fill_rows(
    cells: &mut [u64],
    coords: &[Coord<f64>],
    scale: DistanceScale,
) -> Result<(), MatrixError> {
    use rayon::prelude::*;

    cells
        .par_chunks_mut(coords.len())
        .zip(coords.par_iter())
        .enumerate()
        .try_for_each(|(from, (row, origin))| fill_row(from, *origin, row, coords, scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn triangle() -> Vec<Coord<f64>> {
        vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 0.0, y: 10.0 },
        ]
    }

    fn unit_scale() -> DistanceScale {
        DistanceScale::new(1.0).expect("unit scale")
    }

    #[rstest]
    fn builds_reference_triangle(triangle: Vec<Coord<f64>>) {
        let matrix = DistanceMatrix::build(&triangle, unit_scale()).expect("finite input");
        let expected =
            DistanceMatrix::from_rows(vec![vec![0, 10, 10], vec![10, 0, 14], vec![10, 14, 0]])
                .expect("valid rows");
        assert_eq!(matrix, expected);
    }

    #[rstest]
    fn default_scale_preserves_sub_degree_precision() {
        let coords = [Coord { x: 3.7253, y: 51.0536 }, Coord { x: 3.7221, y: 51.0573 }];
        let matrix = DistanceMatrix::build(&coords, DistanceScale::default()).expect("finite");
        // hypot(37, 32) = 48.9...
        assert_eq!(matrix.get(0, 1), Some(48));
    }

    #[rstest]
    fn single_node_matrix_is_zero() {
        let matrix =
            DistanceMatrix::build(&[Coord { x: 4.0, y: 50.0 }], DistanceScale::default())
                .expect("single node");
        assert_eq!(matrix.size(), 1);
        assert_eq!(matrix.get(0, 0), Some(0));
    }

    #[rstest]
    fn empty_input_is_rejected() {
        let err = DistanceMatrix::build(&[], DistanceScale::default()).expect_err("empty");
        assert_eq!(err, MatrixError::EmptyInput);
    }

    #[rstest]
    fn non_finite_coordinate_is_rejected_eagerly(mut triangle: Vec<Coord<f64>>) {
        triangle.push(Coord {
            x: f64::NAN,
            y: 0.0,
        });
        let err = DistanceMatrix::build(&triangle, unit_scale()).expect_err("NaN");
        assert_eq!(
            err,
            MatrixError::InvalidCoordinate(CoordinateError::InvalidCoordinate {
                index: 3,
                name: None,
            })
        );
    }

    #[rstest]
    fn oversized_distances_overflow() {
        let coords = [Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0e300, y: 0.0 }];
        let err = DistanceMatrix::build(&coords, DistanceScale::default()).expect_err("overflow");
        assert_eq!(err, MatrixError::CostOverflow { from: 0, to: 1 });
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn invalid_scales_are_rejected(#[case] factor: f64) {
        assert!(DistanceScale::new(factor).is_err());
    }

    #[rstest]
    fn from_rows_rejects_ragged_rows() {
        let err = DistanceMatrix::from_rows(vec![vec![0, 1], vec![1]]).expect_err("ragged");
        assert_eq!(
            err,
            MatrixError::NotSquare {
                row: 1,
                len: 1,
                size: 2
            }
        );
    }

    #[rstest]
    fn from_rows_rejects_non_zero_diagonal() {
        let err = DistanceMatrix::from_rows(vec![vec![0, 1], vec![1, 5]]).expect_err("diagonal");
        assert_eq!(err, MatrixError::NonZeroDiagonal { index: 1 });
    }

    #[rstest]
    fn out_of_range_lookups_return_none(triangle: Vec<Coord<f64>>) {
        let matrix = DistanceMatrix::build(&triangle, unit_scale()).expect("finite input");
        assert_eq!(matrix.get(0, 3), None);
        assert_eq!(matrix.get(3, 0), None);
        assert!(matrix.row(3).is_none());
        assert_eq!(matrix.row(1), Some(&[10, 0, 14][..]));
    }

    #[rstest]
    fn display_lists_rows(triangle: Vec<Coord<f64>>) {
        let matrix = DistanceMatrix::build(&triangle, unit_scale()).expect("finite input");
        assert_eq!(
            matrix.to_string(),
            "[0, 10, 10]\n[10, 0, 14]\n[10, 14, 0]\n"
        );
    }
}
