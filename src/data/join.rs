use std::collections::HashMap;

use anyhow::{ensure, Result};
use geo::Coord;
use polars::frame::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{numeric_column, pad_geoid, string_column};

/// `num / den`, or `None` when either side is missing or the denominator is
/// zero (block groups with no population).
pub fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(num), Some(den)) if den != 0.0 => Some(num / den),
        _ => None,
    }
}

/// Column names of the school table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolColumns {
    #[serde(default = "SchoolColumns::default_id")]
    pub id: String,
    #[serde(default = "SchoolColumns::default_lat")]
    pub lat: String,
    #[serde(default = "SchoolColumns::default_lon")]
    pub lon: String,
    /// Numeric statistic to classify; absent for categorical maps.
    #[serde(default)]
    pub value: Option<String>,
}

impl SchoolColumns {
    fn default_id() -> String { "UNIQUESCHOOLID".into() }
    fn default_lat() -> String { "lat".into() }
    fn default_lon() -> String { "lon".into() }

    pub fn for_value(value: impl Into<String>) -> Self {
        Self { value: Some(value.into()), ..Self::default() }
    }
}

impl Default for SchoolColumns {
    fn default() -> Self {
        Self { id: Self::default_id(), lat: Self::default_lat(), lon: Self::default_lon(), value: None }
    }
}

/// A school located in lon/lat with the statistic being mapped.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolPoint {
    /// Row of the school in its source table.
    pub row: usize,
    pub id: String,
    pub location: Coord<f64>,
    pub value: Option<f64>,
}

/// Schools with usable coordinates. Rows without an id or coordinates
/// cannot be placed and are dropped; a missing value is kept and later
/// classified as missing.
pub fn load_school_points(df: &DataFrame, columns: &SchoolColumns) -> Result<Vec<SchoolPoint>> {
    let ids = string_column(df, &columns.id)?;
    let lats = numeric_column(df, &columns.lat)?;
    let lons = numeric_column(df, &columns.lon)?;
    let values = match &columns.value {
        Some(value) => numeric_column(df, value)?,
        None => vec![None; df.height()],
    };

    let points = ids.into_iter()
        .zip(lats).zip(lons).zip(values)
        .enumerate()
        .filter_map(|(row, (((id, lat), lon), value))| {
            let (id, lat, lon) = (id?, lat?, lon?);
            (lat.is_finite() && lon.is_finite())
                .then(|| SchoolPoint { row, id, location: Coord { x: lon, y: lat }, value })
        })
        .collect::<Vec<_>>();

    let dropped = df.height() - points.len();
    if dropped > 0 {
        warn!("[data::join] dropped {dropped} of {} schools without coordinates", df.height());
    }
    ensure!(!points.is_empty() || df.height() == 0, "[data::join] no school in the table has coordinates");

    Ok(points)
}

/// Value lookup keyed by padded GEOID. The last row wins on duplicate keys.
pub fn index_values(keys: Vec<Option<String>>, values: Vec<Option<f64>>) -> HashMap<String, Option<f64>> {
    keys.into_iter()
        .zip(values)
        .filter_map(|(key, value)| Some((pad_geoid(&key?), value)))
        .collect()
}

/// Left join: one value per feature id, `None` where the id is unknown.
pub fn join_values<S: AsRef<str>>(ids: &[S], table: &HashMap<String, Option<f64>>) -> Vec<Option<f64>> {
    ids.iter()
        .map(|id| table.get(&pad_geoid(id.as_ref())).copied().flatten())
        .collect()
}
