//! Trend transform vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod vector_loader;

use crashboard_core::report::trend;
use serde_json::json;
use vector_loader::{load, rows};

#[test]
fn trend_vectors() {
    for v in load("trend.json") {
        let result = trend::points(rows(&v.rows), &v.metric);
        match (&v.expect, &v.expect_error) {
            (Some(expect), None) => {
                let pts = result.unwrap_or_else(|e| panic!("{}: {e}", v.description));
                let expect = expect.as_array().unwrap();
                assert_eq!(pts.len(), expect.len(), "{}", v.description);
                for (p, e) in pts.iter().zip(expect) {
                    assert_eq!(json!([p.date_label(), p.percent_label()]), json!([e[0], e[1]]), "{}", v.description);
                    let want = e[2].as_f64().unwrap();
                    assert!((p.value - want).abs() < 1e-9, "{}: {} != {want}", v.description, p.value);
                }
            }
            (None, Some(err)) => {
                let e = result.expect_err(&v.description);
                assert_eq!(e.client_code().as_str(), err.code, "{}", v.description);
            }
            _ => panic!("{}: vector needs exactly one of expect/expect_error", v.description),
        }
    }
}

#[test]
fn one_point_per_row() {
    for v in load("trend.json").into_iter().filter(|v| v.expect.is_some()) {
        let n = v.rows.len();
        assert_eq!(trend::points(rows(&v.rows), &v.metric).unwrap().len(), n);
    }
}
