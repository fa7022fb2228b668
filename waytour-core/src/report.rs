//! Text renderings of a tour.
//!
//! Renderers are pure projections of a [`TourAssignment`] onto the place list
//! of its [`ProblemModel`]: the arrow chain reads like an itinerary, while the
//! polyline lists coordinates ready to paste into a map client. Both walk the
//! closed tour, so the depot appears first and last.

use std::fmt;

use thiserror::Error;

use crate::{Place, ProblemModel, TourAssignment};

/// Errors returned by the renderers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// The tour references a node the model does not have.
    #[error("tour references node {index} but the model has {size} places")]
    CorruptAssignment {
        /// Offending index.
        index: usize,
        /// Number of places in the model.
        size: usize,
    },
}

/// Formatting options for [`ArrowChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowStyle {
    /// Append `(activity)` after each intermediate place name.
    pub with_activities: bool,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            with_activities: true,
        }
    }
}

/// An itinerary such as `A (coffee) -> B (museum) -> A`.
///
/// The closing depot is printed by name only.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowChain<'a> {
    stops: Vec<&'a Place>,
    style: ArrowStyle,
}

impl<'a> ArrowChain<'a> {
    /// Places in visiting order, closing depot included.
    #[must_use]
    pub fn stops(&self) -> &[&'a Place] {
        &self.stops
    }
}

impl fmt::Display for ArrowChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((last, visits)) = self.stops.split_last() else {
            return Ok(());
        };
        for place in visits {
            if self.style.with_activities {
                write!(f, "{} ({}) -> ", place.name, place.activity)?;
            } else {
                write!(f, "{} -> ", place.name)?;
            }
        }
        f.write_str(&last.name)
    }
}

/// Render `tour` as an arrow chain.
///
/// # Examples
/// ```
/// use waytour_core::{ArrowStyle, TourAssignment, render_arrow_chain};
/// use waytour_core::{DistanceMatrix, Place, ProblemModel};
/// let places = vec![
///     Place::new("A", "start", 0.0, 0.0),
///     Place::new("B", "lunch", 0.0, 10.0),
///     Place::new("C", "museum", 10.0, 0.0),
/// ];
/// let matrix = DistanceMatrix::from_rows(vec![vec![0, 10, 10], vec![10, 0, 14], vec![10, 14, 0]])?;
/// let model = ProblemModel::new(places, matrix)?;
/// let tour = TourAssignment::from_sequence(&model, vec![0, 2, 1])?;
/// let chain = render_arrow_chain(&model, &tour, ArrowStyle::default())?;
///
/// assert_eq!(
///     chain.to_string(),
///     "A (start) -> C (museum) -> B (lunch) -> A"
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_arrow_chain<'a>(
    model: &'a ProblemModel,
    tour: &TourAssignment,
    style: ArrowStyle,
) -> Result<ArrowChain<'a>, ReportError> {
    let stops = resolve_stops(model.places(), tour.closed_walk())?;
    Ok(ArrowChain { stops, style })
}

/// Render `places` in input order, closed back to the first place.
///
/// Uses the same format as [`render_arrow_chain`] so the unsolved and solved
/// routes can be compared line by line. An empty list renders as an empty
/// chain.
#[must_use]
pub fn render_original_route(places: &[Place], style: ArrowStyle) -> ArrowChain<'_> {
    let stops = places.iter().chain(places.first()).collect();
    ArrowChain { stops, style }
}

/// One vertex of a map polyline.
///
/// Displays as `{lat: 51.05, lng: 3.72}, // Name`, a JavaScript object
/// literal followed by a comment naming the place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PolylinePoint<'a> {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Name of the place at this vertex.
    pub name: &'a str,
}

impl fmt::Display for PolylinePoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{lat: {}, lng: {}}}, // {}", self.lat, self.lng, self.name)
    }
}

/// Render `tour` as `n + 1` polyline points, the depot repeated at the end.
///
/// # Examples
/// ```
/// use waytour_core::{TourAssignment, render_polyline};
/// use waytour_core::{DistanceMatrix, Place, ProblemModel};
/// let places = vec![
///     Place::new("A", "start", 0.0, 0.0),
///     Place::new("B", "lunch", 0.0, 10.0),
///     Place::new("C", "museum", 10.0, 0.0),
/// ];
/// let matrix = DistanceMatrix::from_rows(vec![vec![0, 10, 10], vec![10, 0, 14], vec![10, 14, 0]])?;
/// let model = ProblemModel::new(places, matrix)?;
/// let tour = TourAssignment::from_sequence(&model, vec![0, 1, 2])?;
/// let points = render_polyline(&model, &tour)?;
///
/// assert_eq!(points.len(), 4);
/// assert_eq!(points[1].to_string(), "{lat: 0, lng: 10}, // B");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_polyline<'a>(
    model: &'a ProblemModel,
    tour: &TourAssignment,
) -> Result<Vec<PolylinePoint<'a>>, ReportError> {
    let stops = resolve_stops(model.places(), tour.closed_walk())?;
    Ok(stops
        .into_iter()
        .map(|place| PolylinePoint {
            lat: place.latitude(),
            lng: place.longitude(),
            name: &place.name,
        })
        .collect())
}

fn resolve_stops(
    places: &[Place],
    walk: impl Iterator<Item = usize>,
) -> Result<Vec<&Place>, ReportError> {
    walk.map(|index| {
        places.get(index).ok_or(ReportError::CorruptAssignment {
            index,
            size: places.len(),
        })
    })
    .collect()
}
