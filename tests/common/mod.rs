#![allow(dead_code)]

use std::sync::Arc;

use geo::{polygon, MultiPolygon, Polygon};
use viztaz::{Layer, LayerKind, Session, SessionConfig, ZoneRecord};

pub fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
    polygon![(x: x, y: y), (x: x + size, y: y), (x: x + size, y: y + size), (x: x, y: y + size), (x: x, y: y)]
}

/// Old zones: 100 is the usual anchor, 101 borders it, 102 is far away, and 103 has two
/// distant parts.
pub fn make_test_old_zones() -> Layer {
    Layer::from_records(LayerKind::OldZones, [
        ZoneRecord::new("100", square(0.0, 0.0, 1000.0)),
        ZoneRecord::new("101", square(1000.0, 0.0, 1000.0)),
        ZoneRecord::new("102", square(5000.0, 5000.0, 1000.0)),
        ZoneRecord::new("103", MultiPolygon(vec![
            square(-3000.0, 0.0, 500.0),
            square(10000.0, 10000.0, 500.0),
        ])),
    ]).unwrap()
}

/// New zones: 1 and 2 fall inside a 1000-unit buffer around zone 100, 3 does not.
pub fn make_test_new_zones() -> Layer {
    Layer::from_records(LayerKind::NewZones, [
        ZoneRecord::new("1", square(0.0, 0.0, 500.0)).with("HH19", Some(10.0)).with("EMP19", Some(5.0)),
        ZoneRecord::new("2", square(500.0, 0.0, 1000.0)).with("HH19", Some(20.0)).with("EMP19", None),
        ZoneRecord::new("3", square(8000.0, 8000.0, 1000.0)).with("HH19", Some(99.0)).with("EMP19", Some(1.0)),
    ]).unwrap()
}

pub fn make_test_blocks() -> Layer {
    Layer::from_records(LayerKind::Blocks, [
        ZoneRecord::new("060001", square(0.0, 0.0, 250.0)).with("HH19", Some(1.0)),
        ZoneRecord::new("060002", square(250.0, 0.0, 250.0)).with("HH19", Some(2.0)),
        ZoneRecord::new("060003", square(7000.0, 7000.0, 250.0)).with("HH19", Some(4.0)),
    ]).unwrap()
}

pub fn make_test_session() -> Session {
    Session::new(
        Arc::new(make_test_old_zones()),
        Arc::new(make_test_new_zones()),
        Arc::new(make_test_blocks()),
        SessionConfig::default(),
    )
}
