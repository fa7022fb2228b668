//! Named waypoints and coordinate extraction.

use geo::Coord;
use thiserror::Error;

/// A named waypoint on the tour.
///
/// Coordinates are WGS84 degrees with `x = longitude` and `y = latitude`.
/// The order places are supplied in defines their node index; index 0 is
/// the depot.
///
/// # Examples
/// ```
/// use waytour_core::Place;
///
/// let place = Place::new("Belfort", "climb the tower", 51.0536, 3.7253);
///
/// assert_eq!(place.name, "Belfort");
/// assert_eq!(place.latitude(), 51.0536);
/// assert_eq!(place.longitude(), 3.7253);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    /// Display name of the waypoint.
    pub name: String,
    /// Free-text activity planned at the waypoint.
    pub activity: String,
    /// Geospatial position.
    pub location: Coord<f64>,
}

impl Place {
    /// Construct a place from a name, an activity and a latitude/longitude
    /// pair in degrees.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        activity: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            activity: activity.into(),
            location: Coord {
                x: longitude,
                y: latitude,
            },
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }

    /// Whether both coordinate components are finite numbers.
    #[must_use]
    pub fn has_finite_location(&self) -> bool {
        self.location.x.is_finite() && self.location.y.is_finite()
    }
}

/// Errors returned by [`extract_coordinates`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    /// A latitude or longitude was NaN or infinite.
    #[error("place {index}{} has a non-finite coordinate", quoted_name(.name.as_deref()))]
    InvalidCoordinate {
        /// Position of the offending place in the input order.
        index: usize,
        /// Name of the offending place, when the caller had one.
        name: Option<String>,
    },
}

fn quoted_name(name: Option<&str>) -> String {
    name.map(|name| format!(" ({name:?})")).unwrap_or_default()
}

/// Check that every coordinate is finite.
///
/// Unnamed coordinates report the failing index only.
pub(crate) fn check_finite(coords: &[Coord<f64>]) -> Result<(), CoordinateError> {
    coords
        .iter()
        .position(|coord| !(coord.x.is_finite() && coord.y.is_finite()))
        .map_or(Ok(()), |index| {
            Err(CoordinateError::InvalidCoordinate { index, name: None })
        })
}

/// Pull the coordinates out of `places`, preserving their order.
///
/// Every coordinate is checked before any is returned, so a matrix is never
/// built from a partially valid input.
///
/// # Examples
/// ```
/// use waytour_core::{Place, extract_coordinates};
///
/// let places = vec![Place::new("A", "start", 1.0, 2.0)];
/// let coords = extract_coordinates(&places)?;
/// assert_eq!(coords[0].y, 1.0);
/// # Ok::<(), waytour_core::CoordinateError>(())
/// ```
pub fn extract_coordinates(places: &[Place]) -> Result<Vec<Coord<f64>>, CoordinateError> {
    if let Some((index, place)) = places
        .iter()
        .enumerate()
        .find(|(_, place)| !place.has_finite_location())
    {
        return Err(CoordinateError::InvalidCoordinate {
            index,
            name: Some(place.name.clone()),
        });
    }
    Ok(places.iter().map(|place| place.location).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn extraction_preserves_order() {
        let places = vec![
            Place::new("A", "start", 0.0, 0.0),
            Place::new("B", "lunch", 0.0, 10.0),
            Place::new("C", "museum", 10.0, 0.0),
        ];
        let coords = extract_coordinates(&places).expect("finite input");
        assert_eq!(
            coords,
            vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 10.0, y: 0.0 },
                Coord { x: 0.0, y: 10.0 },
            ]
        );
    }

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    #[case(f64::NEG_INFINITY, 1.0)]
    fn extraction_rejects_non_finite(#[case] latitude: f64, #[case] longitude: f64) {
        let places = vec![
            Place::new("ok", "", 1.0, 1.0),
            Place::new("broken", "", latitude, longitude),
        ];
        let err = extract_coordinates(&places).expect_err("non-finite input");
        assert_eq!(
            err,
            CoordinateError::InvalidCoordinate {
                index: 1,
                name: Some("broken".to_owned()),
            }
        );
    }

    #[rstest]
    fn named_and_unnamed_errors_share_one_message_shape() {
        let named = CoordinateError::InvalidCoordinate {
            index: 2,
            name: Some("Belfort".to_owned()),
        };
        let unnamed = CoordinateError::InvalidCoordinate {
            index: 2,
            name: None,
        };
        assert_eq!(
            named.to_string(),
            "place 2 (\"Belfort\") has a non-finite coordinate"
        );
        assert_eq!(unnamed.to_string(), "place 2 has a non-finite coordinate");
    }

    #[rstest]
    fn extraction_of_empty_input_is_empty() {
        let coords = extract_coordinates(&[]).expect("empty input");
        assert!(coords.is_empty());
    }
}
