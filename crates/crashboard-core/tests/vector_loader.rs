//! JSON test vector loader shared by trend/comparison tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;

use chrono::NaiveDate;
use serde::Deserialize;

use crashboard_core::MetricRow;

#[derive(Debug, Deserialize)]
pub struct TestVector {
    pub description: String,
    pub metric: String,
    #[serde(default)]
    pub rows: Vec<RowData>,
    #[serde(default)]
    pub previous: Vec<RowData>,
    #[serde(default)]
    pub current: Vec<RowData>,
    #[serde(default)]
    pub expect: Option<serde_json::Value>,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct RowData {
    pub start: NaiveDate,
    pub metrics: BTreeMap<String, String>,
}

impl RowData {
    pub fn to_row(&self) -> MetricRow {
        MetricRow { period_start: self.start, metrics: self.metrics.clone() }
    }
}

pub fn rows(data: &[RowData]) -> Vec<MetricRow> {
    data.iter().map(RowData::to_row).collect()
}

pub fn load(name: &str) -> Vec<TestVector> {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap_or_else(|e| panic!("bad vector file {name}: {e}"))
}
