//! Validated closed tours.

use crate::{ProblemModel, SolveError};

/// A closed tour through every node of a [`ProblemModel`].
///
/// The sequence is a permutation of `0..n` starting at the depot; the return
/// leg to the depot is implicit. The total cost is recomputed from the model
/// over the closed walk, independent of whatever the engine reported.
///
/// # Examples
/// ```
/// use waytour_core::{DistanceMatrix, Place, ProblemModel, TourAssignment};
///
/// let places = vec![
///     Place::new("A", "", 0.0, 0.0),
///     Place::new("B", "", 0.0, 10.0),
///     Place::new("C", "", 10.0, 0.0),
/// ];
/// let matrix = DistanceMatrix::from_rows(vec![vec![0, 10, 10], vec![10, 0, 14], vec![10, 14, 0]])?;
/// let model = ProblemModel::new(places, matrix)?;
///
/// let tour = TourAssignment::from_sequence(&model, vec![0, 1, 2])?;
/// assert_eq!(tour.total_cost(), 34);
/// assert_eq!(tour.closed_walk().collect::<Vec<_>>(), vec![0, 1, 2, 0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourAssignment {
    sequence: Vec<usize>,
    total_cost: u64,
    reported_objective: Option<u64>,
}

impl TourAssignment {
    /// Validate `sequence` against `model` and compute its closed-walk cost.
    ///
    /// Indices outside the model are [`SolveError::CorruptAssignment`]; a
    /// sequence of the wrong length, with repeats, or not starting at the
    /// depot is rejected with the matching variant.
    pub fn from_sequence(model: &ProblemModel, sequence: Vec<usize>) -> Result<Self, SolveError> {
        let size = model.node_count();
        if let Some(&index) = sequence.iter().find(|&&index| index >= size) {
            return Err(SolveError::CorruptAssignment { index, size });
        }
        if sequence.len() != size {
            return Err(SolveError::WrongLength {
                expected: size,
                found: sequence.len(),
            });
        }
        let mut seen = vec![false; size];
        for &index in &sequence {
            match seen.get_mut(index) {
                Some(visited) if !*visited => *visited = true,
                _ => return Err(SolveError::RepeatedNode { index }),
            }
        }
        let start = sequence.first().copied();
        if start != Some(model.depot()) {
            return Err(SolveError::WrongStart {
                expected: model.depot(),
                found: start,
            });
        }

        let total_cost = closed_walk_cost(&sequence, size, |from, to| model.transit_cost(from, to))?;
        Ok(Self {
            sequence,
            total_cost,
            reported_objective: None,
        })
    }

    pub(crate) const fn with_reported_objective(mut self, objective: u64) -> Self {
        self.reported_objective = Some(objective);
        self
    }

    /// Visit order, depot first, without the return leg.
    #[must_use]
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Visit order followed by the depot again.
    pub fn closed_walk(&self) -> impl Iterator<Item = usize> + '_ {
        self.sequence
            .iter()
            .copied()
            .chain(self.sequence.first().copied())
    }

    /// Sum of arc costs over the closed walk.
    #[must_use]
    pub const fn total_cost(&self) -> u64 {
        self.total_cost
    }

    /// The objective the engine claimed, when the tour came from an engine.
    #[must_use]
    pub const fn reported_objective(&self) -> Option<u64> {
        self.reported_objective
    }

    /// Number of distinct nodes visited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the tour visits no nodes. Never true for a validated tour.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Sum `cost` over consecutive pairs of `sequence`, including the return to
/// its first element.
fn closed_walk_cost<F>(sequence: &[usize], size: usize, cost: F) -> Result<u64, SolveError>
where
    F: Fn(usize, usize) -> Option<u64>,
{
    let Some(&first) = sequence.first() else {
        return Ok(0);
    };
    let arcs = sequence
        .iter()
        .copied()
        .zip(sequence.iter().copied().skip(1).chain(std::iter::once(first)));

    let mut total = 0_u64;
    for (from, to) in arcs {
        let arc = cost(from, to).ok_or(SolveError::CorruptAssignment {
            index: from.max(to),
            size,
        })?;
        total = total.checked_add(arc).ok_or(SolveError::CostOverflow)?;
    }
    Ok(total)
}
