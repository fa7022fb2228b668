//! CSV loading of places.
//!
//! The file carries a header row naming the columns `Place`, `Activity`,
//! `Lat` and `Long`; column order does not matter and an empty `Activity`
//! cell is allowed. The first row becomes the depot.

use std::io::{BufReader, Read};

use camino::Utf8Path;
use serde::Deserialize;
use waytour_core::Place;

use crate::CliError;
use crate::files::open_utf8_file;

#[derive(Debug, Deserialize)]
struct PlaceRecord {
    #[serde(rename = "Place")]
    place: String,
    #[serde(rename = "Activity", default)]
    activity: String,
    #[serde(rename = "Lat")]
    lat: f64,
    #[serde(rename = "Long")]
    long: f64,
}

impl From<PlaceRecord> for Place {
    fn from(record: PlaceRecord) -> Self {
        Self::new(record.place, record.activity, record.lat, record.long)
    }
}

/// Decode every row of `reader` into a [`Place`].
pub(crate) fn read_places<R: Read>(reader: R) -> Result<Vec<Place>, csv::Error> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize::<PlaceRecord>()
        .map(|record| record.map(Place::from))
        .collect()
}

/// Load the places listed in the CSV file at `path`.
pub(crate) fn load_places(path: &Utf8Path) -> Result<Vec<Place>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    let places = read_places(BufReader::new(file)).map_err(|source| CliError::ParseInput {
        path: path.to_path_buf(),
        source,
    })?;
    if places.is_empty() {
        return Err(CliError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    Ok(places)
}
