//! Run configuration, read from JSON.
//!
//! ```json
//! {
//!   "title": "Black CS Enrollment Disparity",
//!   "schools": { "path": "schools.csv", "value": "RI_Black" },
//!   "points": { "kind": "disparity", "scheme": { "preset": "ri_black" } },
//!   "block_groups": {
//!     "geometry": "block_groups.geojson",
//!     "attributes": "acs.csv",
//!     "numerator": "black_population",
//!     "denominator": "total_population",
//!     "underlay": { "preset": "quintile_gray" },
//!     "legend_title": "Black Population (Underlay)"
//!   },
//!   "counties": { "path": "tl_2023_us_county.zip", "filter": { "field": "STATEFP", "value": "13" } },
//!   "cities": "georgia",
//!   "output": "black_disparity.svg"
//! }
//! ```

use std::{fs, path::{Path, PathBuf}};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    classify::{BinError, BinScheme, Extent, UnderlayScheme},
    data::SchoolColumns,
    geom::ClipBox,
    io::AttributeFilter,
    presets,
    render::CityLabel,
};

/// A disparity scheme: a preset name, edges with colors, or fully
/// specified classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemeConfig {
    Preset { preset: String },
    Colors {
        edges: Vec<f64>,
        colors: Vec<String>,
        #[serde(default)]
        extent: Extent,
    },
    Custom(BinScheme),
}

impl SchemeConfig {
    pub fn build(&self) -> Result<BinScheme, BinError> {
        match self {
            Self::Preset { preset } => presets::scheme(preset),
            Self::Colors { edges, colors, extent } => {
                let colors = colors.iter().map(String::as_str).collect::<Vec<_>>();
                Ok(BinScheme::from_colors(edges.clone(), &colors)?.with_extent(*extent))
            }
            Self::Custom(scheme) => Ok(scheme.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnderlayConfig {
    Preset { preset: String },
    Custom(UnderlayScheme),
}

impl UnderlayConfig {
    pub fn build(&self) -> Result<UnderlayScheme, BinError> {
        match self {
            Self::Preset { preset } => presets::underlay(preset),
            Self::Custom(scheme) => Ok(scheme.clone()),
        }
    }
}

/// How school points are colored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointStyle {
    /// Classify the school value column with a bin scheme.
    Disparity {
        scheme: SchemeConfig,
        #[serde(default)]
        legend_title: Option<String>,
    },
    /// Color by course modality decoded from a logic code column.
    Modality { code_column: String },
    /// Modality plus extra-teacher staffing (marker shape).
    StaffedModality { code_column: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolsConfig {
    pub path: PathBuf,
    #[serde(flatten)]
    pub columns: SchoolColumns,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockGroupsConfig {
    /// Block-group polygons (GeoJSON, shapefile, or zipped shapefile).
    pub geometry: PathBuf,
    #[serde(default = "default_geoid")]
    pub id_property: String,
    /// Attribute table joined to the polygons by GEOID.
    pub attributes: PathBuf,
    #[serde(default = "default_geoid")]
    pub id_column: String,
    pub numerator: String,
    /// When present the underlay value is `numerator / denominator`.
    #[serde(default)]
    pub denominator: Option<String>,
    pub underlay: UnderlayConfig,
    #[serde(default)]
    pub legend_title: Option<String>,
}

fn default_geoid() -> String { "GEOID".into() }

/// A reference layer (state outline, counties, roads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub filter: Option<AttributeFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CitiesConfig {
    /// Built-in label set by name (`"georgia"`).
    Preset(String),
    Custom(Vec<CityLabel>),
}

impl CitiesConfig {
    pub fn labels(&self) -> Result<Vec<CityLabel>, BinError> {
        match self {
            Self::Preset(name) if name == "georgia" => Ok(presets::georgia_cities()),
            Self::Preset(name) => Err(BinError::UnknownPreset(name.clone())),
            Self::Custom(labels) => Ok(labels.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub title: Option<String>,
    pub schools: SchoolsConfig,
    pub points: PointStyle,
    #[serde(default)]
    pub block_groups: Option<BlockGroupsConfig>,
    #[serde(default)]
    pub state: Option<LayerConfig>,
    #[serde(default)]
    pub counties: Option<LayerConfig>,
    #[serde(default)]
    pub roads: Option<LayerConfig>,
    #[serde(default)]
    pub cities: Option<CitiesConfig>,
    /// Zoom onto a lon/lat window (`[min_lon, min_lat, max_lon, max_lat]`).
    #[serde(default)]
    pub clip_box: Option<ClipBox>,
    pub output: PathBuf,
    #[serde(default = "default_width")]
    pub width: f64,
}

fn default_width() -> f64 { 1200.0 }

impl RunConfig {
    /// Read and validate a config file. Relative paths inside it are
    /// resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("[config] Failed to read {}", path.display()))?;
        let mut config: RunConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("[config] Failed to parse {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()
            .with_context(|| format!("[config] Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| if p.is_relative() { *p = base.join(&*p) };
        resolve(&mut self.schools.path);
        resolve(&mut self.output);
        if let Some(bg) = &mut self.block_groups {
            resolve(&mut bg.geometry);
            resolve(&mut bg.attributes);
        }
        for layer in [&mut self.state, &mut self.counties, &mut self.roads].into_iter().flatten() {
            resolve(&mut layer.path);
        }
    }

    /// Build every scheme and check the layout settings before any data is
    /// read.
    pub fn validate(&self) -> Result<()> {
        if let PointStyle::Disparity { scheme, .. } = &self.points {
            scheme.build()?;
            ensure!(self.schools.columns.value.is_some(), "disparity points need a school \"value\" column");
        }
        if let Some(bg) = &self.block_groups {
            bg.underlay.build()?;
        }
        if let Some(cities) = &self.cities {
            cities.labels()?;
        }
        if let Some(clip) = &self.clip_box {
            ensure!(clip.min_lon < clip.max_lon && clip.min_lat < clip.max_lat, "clip_box must have min < max: {clip:?}");
        }
        ensure!(self.width.is_finite() && self.width > 100.0, "width must be more than 100 pixels, got {}", self.width);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "schools": { "path": "schools.csv", "value": "RI_Black" },
        "points": { "kind": "disparity", "scheme": { "preset": "ri_black" } },
        "output": "out.svg"
    }"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: RunConfig = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(config.width, 1200.0);
        assert_eq!(config.schools.columns.id, "UNIQUESCHOOLID");
        assert_eq!(config.schools.columns.value.as_deref(), Some("RI_Black"));
        config.validate().unwrap();
    }

    #[test]
    fn scheme_variants_deserialize() {
        let colors: SchemeConfig = serde_json::from_str(r##"{ "edges": [0, 1, 2], "colors": ["#fff", "#000"] }"##).unwrap();
        assert_eq!(colors.build().unwrap().num_classes(), 2);

        let custom: SchemeConfig = serde_json::from_str(r##"{
            "edges": [0, 1], "classes": [{ "color": "#000000", "label": "all" }], "extent": "open"
        }"##).unwrap();
        assert_eq!(custom.build().unwrap().extent(), Extent::Open);
    }

    #[test]
    fn bad_edges_fail_validation() {
        let config = MINIMAL.replace(r#"{ "preset": "ri_black" }"#, r##"{ "edges": [0, 2, 1], "colors": ["#fff", "#000"] }"##);
        let config: RunConfig = serde_json::from_str(&config).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.downcast_ref::<BinError>().is_some());
    }

    #[test]
    fn unknown_presets_fail_validation() {
        let config: RunConfig = serde_json::from_str(&MINIMAL.replace("ri_black", "ri_nobody")).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn disparity_needs_a_value_column() {
        let config: RunConfig = serde_json::from_str(&MINIMAL.replace(r#", "value": "RI_Black""#, "")).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        fs::write(&path, MINIMAL.replace(r#""output": "out.svg""#, r#""output": "out.svg", "cities": "georgia""#)).unwrap();
        let config = RunConfig::load(&path).unwrap();
        assert_eq!(config.output, dir.path().join("out.svg"));
        assert_eq!(config.schools.path, dir.path().join("schools.csv"));
        assert_eq!(config.cities.unwrap().labels().unwrap().len(), 4);
    }

    #[test]
    fn empty_underlay_ramp_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        let block_groups = r#""block_groups": {
            "geometry": "bg.geojson", "attributes": "acs.csv", "numerator": "black_population",
            "underlay": { "bins": { "quantiles": 5 }, "ramp": [] }
        }, "output": "out.svg""#;
        fs::write(&path, MINIMAL.replace(r#""output": "out.svg""#, block_groups)).unwrap();
        let err = RunConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse"));
    }

    #[test]
    fn modality_points_parse() {
        let config = MINIMAL.replace(
            r#"{ "kind": "disparity", "scheme": { "preset": "ri_black" } }"#,
            r#"{ "kind": "staffed_modality", "code_column": "LOGIC_CLASS" }"#,
        );
        let config: RunConfig = serde_json::from_str(&config).unwrap();
        assert_eq!(config.points, PointStyle::StaffedModality { code_column: "LOGIC_CLASS".into() });
    }
}
