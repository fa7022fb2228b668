//! Focused unit tests for CSV place loading.

use super::helpers::{TRIANGLE_CSV, Workspace};
use crate::input::{load_places, read_places};
use crate::CliError;
use rstest::rstest;

#[rstest]
fn reads_places_in_file_order() {
    let places = read_places(TRIANGLE_CSV.as_bytes()).expect("valid csv");
    let names: Vec<&str> = places.iter().map(|place| place.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);
    let second = places.get(1).expect("second place");
    assert_eq!(second.activity, "lunch");
    assert_eq!(second.latitude(), 0.0);
    assert_eq!(second.longitude(), 10.0);
}

#[rstest]
fn columns_may_be_reordered_and_padded() {
    let csv = "Lat, Long, Place, Activity\n51.0536, 3.7253, Belfort, climb the tower\n";
    let places = read_places(csv.as_bytes()).expect("valid csv");
    let belfort = places.first().expect("one place");
    assert_eq!(belfort.name, "Belfort");
    assert_eq!(belfort.activity, "climb the tower");
    assert_eq!(belfort.latitude(), 51.0536);
}

#[rstest]
#[case::text_latitude("Place,Activity,Lat,Long\nA,start,north,0\n")]
#[case::missing_column("Place,Activity,Lat\nA,start,0\n")]
fn malformed_rows_are_rejected(#[case] csv: &str) {
    assert!(read_places(csv.as_bytes()).is_err());
}

#[rstest]
fn header_only_file_is_empty_input() {
    let workspace = Workspace::new();
    let path = workspace.write("empty.csv", "Place,Activity,Lat,Long\n");
    let err = load_places(&path).expect_err("no rows");
    assert!(matches!(err, CliError::EmptyInput { path: reported } if reported == path));
}

#[rstest]
fn parse_errors_name_the_file() {
    let workspace = Workspace::new();
    let path = workspace.write("broken.csv", "Place,Activity,Lat,Long\nA,start,x,y\n");
    let err = load_places(&path).expect_err("bad coordinates");
    assert!(matches!(err, CliError::ParseInput { path: reported, .. } if reported == path));
}

#[rstest]
fn missing_file_is_an_open_error() {
    let workspace = Workspace::new();
    let path = workspace.path("absent.csv");
    let err = load_places(&path).expect_err("missing file");
    assert!(matches!(err, CliError::OpenInput { .. }));
}
