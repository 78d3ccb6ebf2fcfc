//! End-to-end jobs: one map, one classified table, or one representation
//! summary per call.

use std::{collections::BTreeMap, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use geo::{Coord, Rect};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    categorize::{Marker, Modality, Representation, RepresentationCounts, StaffedModality},
    classify::{BinScheme, ClassTally},
    color::Rgb,
    config::{BlockGroupsConfig, LayerConfig, PointStyle, RunConfig},
    data::{self, CatchmentColumns, CatchmentSummary, Catchments, GeoidValues, SchoolPoint},
    geom::{merge_bounds, ClipBox, WebMercator},
    io::{self, ClassifiedRow},
    layer::{LineLayer, PolygonLayer},
    render::{ChoroplethMap, Legend, PointMark, Swatch},
};

const POINT_SIZE: f64 = 4.0;
const ROAD_COLOR: Rgb = Rgb::new(0xff, 0xc0, 0xcb);

/// What a map run drew.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSummary {
    pub output: PathBuf,
    /// Schools in the table with usable coordinates (inside the clip box).
    pub schools: usize,
    /// Schools drawn, per legend entry.
    pub classes: Vec<(String, usize)>,
    /// Schools left undrawn: missing value, NaN, outside every bin, or an
    /// unrecognised code.
    pub unclassified: usize,
    pub block_groups: usize,
    pub block_groups_unclassified: usize,
}

fn is_geojson(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("geojson") || ext.eq_ignore_ascii_case("json"))
}

fn read_polygons(path: &Path, filter: Option<&io::AttributeFilter>, id: Option<&str>) -> Result<PolygonLayer> {
    if is_geojson(path) { io::read_geojson_polygons(path, filter, id) }
    else { io::read_shapefile_polygons(path, filter, id) }
}

fn read_lines(path: &Path, filter: Option<&io::AttributeFilter>) -> Result<LineLayer> {
    if is_geojson(path) { io::read_geojson_lines(path, filter) }
    else { io::read_shapefile_lines(path, filter) }
}

fn load_outline(layer: &LayerConfig, clip: Option<&ClipBox>, mercator: &WebMercator) -> Result<PolygonLayer> {
    let mut polygons = read_polygons(&layer.path, layer.filter.as_ref(), None)?;
    if let Some(clip) = clip {
        polygons = polygons.clip(clip);
    }
    debug!("[run] {} polygons from {}", polygons.len(), layer.path.display());
    polygons.project(mercator)
}

/// Block-group polygons with their underlay colors.
struct Underlay {
    layer: PolygonLayer,
    colors: Vec<Option<Rgb>>,
    legend: Option<Legend>,
    unclassified: usize,
}

fn load_underlay(config: &BlockGroupsConfig, clip: Option<&ClipBox>, mercator: &WebMercator) -> Result<Underlay> {
    let scheme = config.underlay.build()?;

    let mut layer = read_polygons(&config.geometry, None, Some(config.id_property.as_str()))?;
    if let Some(clip) = clip {
        layer = layer.clip(clip);
    }

    let table = data::read_table(&config.attributes)?;
    let numerator = data::numeric_column(&table, &config.numerator)?;
    let values = match &config.denominator {
        Some(denominator) => numerator.into_iter()
            .zip(data::numeric_column(&table, denominator)?)
            .map(|(num, den)| data::ratio(num, den))
            .collect(),
        None => numerator,
    };
    let lookup = data::index_values(data::string_column(&table, &config.id_column)?, values);
    let values = data::join_values(&layer.ids, &lookup);

    let (colors, legend) = match scheme.resolve(values.iter().copied()) {
        Some(resolved) => {
            let colors = values.iter()
                .map(|&value| resolved.classify_index(value).map(|i| resolved.color(i)))
                .collect::<Vec<_>>();
            let title = config.legend_title.clone().unwrap_or_else(|| format!("{} (Underlay)", config.numerator));
            (colors, Some(Legend::for_underlay(title, &resolved)))
        }
        None => {
            warn!("[run] underlay {} has too few distinct values to bin", config.numerator);
            (vec![None; values.len()], None)
        }
    };

    let unclassified = colors.iter().filter(|c| c.is_none()).count();
    info!("[run] {} block groups, {unclassified} without an underlay class", layer.len());
    Ok(Underlay { layer: layer.project(mercator)?, colors, legend, unclassified })
}

/// Point marks and legend for the schools.
struct Schools {
    marks: Vec<PointMark>,
    legend: Legend,
    classes: Vec<(String, usize)>,
    unclassified: usize,
    opacity: f64,
}

fn disparity_points(points: &[SchoolPoint], at: &[Coord<f64>], scheme: &BinScheme, title: String) -> Schools {
    let tally = scheme.tally(points.iter().map(|p| p.value));
    let marks = points.iter().zip(at)
        .filter_map(|(point, &at)| {
            let color = scheme.classify(point.value).color()?;
            Some(PointMark { at, color, marker: Marker::Circle })
        })
        .collect();
    let legend = Legend::for_scheme(title, scheme, &tally);
    let classes = legend.entries.iter().map(|e| (e.label.clone(), e.count.unwrap_or(0))).collect();
    Schools { marks, legend, classes, unclassified: tally.unclassified(), opacity: 0.8 }
}

fn modality_points(points: &[SchoolPoint], at: &[Coord<f64>], codes: &[Option<String>], staffed: bool) -> Schools {
    let mut marks = Vec::new();
    let mut counts = BTreeMap::<usize, usize>::new();
    let mut unclassified = 0;

    for (point, &at) in points.iter().zip(at) {
        let code = codes[point.row].as_deref().unwrap_or("");
        let decoded = if staffed {
            StaffedModality::from_code(code).map(|s| (s.index(), s.color(), s.marker()))
        } else {
            let m = Modality::from_code(code);
            Some((m.index(), m.color(), Marker::Circle))
        };
        match decoded {
            Some((index, color, marker)) => {
                *counts.entry(index).or_default() += 1;
                marks.push(PointMark { at, color, marker });
            }
            None => unclassified += 1,
        }
    }

    let entries: Vec<(String, Rgb, Marker)> = if staffed {
        StaffedModality::ALL.iter().map(|s| (s.label(), s.color(), s.marker())).collect()
    } else {
        Modality::ALL.iter().map(|m| (m.label().to_string(), m.color(), Marker::Circle)).collect()
    };

    let mut legend = Legend::new("CS Course Modality");
    let mut classes = Vec::new();
    for (index, (label, color, marker)) in entries.into_iter().enumerate() {
        let n = counts.get(&index).copied().unwrap_or(0);
        classes.push((label.clone(), n));
        legend = legend.entry(label, color, Swatch::Point(marker), Some(n));
    }

    Schools { marks, legend, classes, unclassified, opacity: 0.5 }
}

/// Build one map from a validated configuration and write it to
/// `config.output`.
pub fn run_map(config: &RunConfig) -> Result<MapSummary> {
    config.validate()?;
    let clip = config.clip_box.as_ref();
    let mercator = WebMercator::new()?;

    info!("[run] loading schools from {}", config.schools.path.display());
    let table = data::read_table(&config.schools.path)?;
    let mut points = data::load_school_points(&table, &config.schools.columns)?;
    if let Some(clip) = clip {
        points.retain(|p| clip.contains(&p.location));
    }
    let at = points.iter()
        .map(|p| mercator.coord(p.location))
        .collect::<Result<Vec<_>>>()?;

    let schools = match &config.points {
        PointStyle::Disparity { scheme, legend_title } => {
            let scheme = scheme.build()?;
            let title = legend_title.clone()
                .or_else(|| config.title.clone())
                .unwrap_or_else(|| "Disparity".to_string());
            disparity_points(&points, &at, &scheme, title)
        }
        PointStyle::Modality { code_column } | PointStyle::StaffedModality { code_column } => {
            let codes = data::string_column(&table, code_column)?;
            modality_points(&points, &at, &codes, matches!(config.points, PointStyle::StaffedModality { .. }))
        }
    };
    info!("[run] {} schools drawn, {} unclassified", schools.marks.len(), schools.unclassified);

    let mut map = ChoroplethMap::new(config.width);
    if let Some(title) = &config.title {
        map = map.title(title);
    }
    if let Some(clip) = clip {
        let rect = clip.rect();
        map = map.frame(Rect::new(mercator.coord(rect.min())?, mercator.coord(rect.max())?));
    }
    if let Some(extent) = at.iter().map(|&c| Rect::new(c, c)).reduce(merge_bounds) {
        map = map.include(extent);
    }

    let mut underlay_legend = None;
    let (mut block_groups, mut block_groups_unclassified) = (0, 0);
    if let Some(bg) = &config.block_groups {
        let underlay = load_underlay(bg, clip, &mercator)?;
        block_groups = underlay.layer.len();
        block_groups_unclassified = underlay.unclassified;
        underlay_legend = underlay.legend;
        map = map.fill(underlay.layer.shapes, underlay.colors);
    }

    let mut extra = Vec::new();
    if let Some(counties) = &config.counties {
        map = map.outline(load_outline(counties, clip, &mercator)?.shapes, "county");
        extra.push(("County Boundaries", Rgb::GRAY));
    }
    if let Some(state) = &config.state {
        map = map.outline(load_outline(state, clip, &mercator)?.shapes, "state");
    }
    if let Some(roads) = &config.roads {
        let mut lines = read_lines(&roads.path, roads.filter.as_ref())?;
        if let Some(clip) = clip {
            lines = lines.clip(clip);
        }
        map = map.roads(lines.project(&mercator)?.shapes);
        extra.push(("Interstate Highways", ROAD_COLOR));
    }

    map = map.points(schools.marks, POINT_SIZE, schools.opacity);

    if let Some(cities) = &config.cities {
        let labels = cities.labels()?.into_iter()
            .filter(|city| clip.is_none_or(|c| c.contains(&Coord { x: city.lon, y: city.lat })))
            .map(|city| {
                let (at, label) = city.place(&mercator)?;
                Ok((at, label, city.name.clone(), city.right_aligned()))
            })
            .collect::<Result<Vec<_>>>()?;
        map = map.labels(labels);
    }

    map = map.legend(schools.legend);
    if let Some(legend) = underlay_legend {
        map = map.legend(legend);
    }
    for (title, color) in extra {
        map = map.legend(Legend::new(title).entry(title, color, Swatch::Line, None));
    }

    map.save(&config.output)
        .with_context(|| format!("[run] Failed to write map to {}", config.output.display()))?;
    info!("[run] wrote {}", config.output.display());

    Ok(MapSummary {
        output: config.output.clone(),
        schools: points.len(),
        classes: schools.classes,
        unclassified: schools.unclassified,
        block_groups,
        block_groups_unclassified,
    })
}

/// Classify one numeric column of a CSV and write
/// `id,value,class_index,color,label` rows. Ids come from `id_column`, or
/// are row numbers when it is absent.
pub fn run_classify(input: &Path, id_column: Option<&str>, column: &str, scheme: &BinScheme, output: &Path) -> Result<ClassTally> {
    let table = data::read_table(input)?;
    let values = data::numeric_column(&table, column)?;
    let ids = match id_column {
        Some(id) => data::string_column(&table, id)?,
        None => (0..table.height()).map(|i| Some(i.to_string())).collect(),
    };

    let rows = ids.into_iter().zip(&values)
        .map(|(id, &value)| ClassifiedRow::classify(scheme, id.unwrap_or_default(), value))
        .collect::<Vec<_>>();
    io::write_classified(&rows, output)?;

    let tally = scheme.tally(values);
    info!("[run] classified {} rows from {}: {} unclassified", tally.total(), input.display(), tally.unclassified());
    Ok(tally)
}

/// Over/parity/under counts of a representation index column, overall
/// (`"all"`) or per value of `group_column`.
pub fn run_represent(input: &Path, column: &str, group_column: Option<&str>) -> Result<BTreeMap<String, RepresentationCounts>> {
    let table = data::read_table(input)?;
    let values = data::numeric_column(&table, column)?;
    let groups = match group_column {
        Some(group) => data::string_column(&table, group)?,
        None => vec![Some("all".to_string()); values.len()],
    };

    let mut summary = BTreeMap::<String, RepresentationCounts>::new();
    for (group, value) in groups.into_iter().zip(values) {
        let counts = summary.entry(group.unwrap_or_else(|| "unknown".to_string())).or_default();
        if let Some(representation) = Representation::of(value) {
            counts.record(representation);
        }
    }
    Ok(summary)
}

/// Per-school catchment statistics from a school/block-group assignment
/// table and a census table, written to `output` as CSV.
pub fn run_catchment(assignments: &Path, census: &Path, columns: &CatchmentColumns, output: &Path) -> Result<Vec<CatchmentSummary>> {
    let catchments = Catchments::from_table(&data::read_table(assignments)?, &columns.school, &columns.geoid, &columns.distance)?;

    let census_df = data::read_table(census)?;
    let keys = data::string_column(&census_df, &columns.geoid)?;
    let lookup = |name: &str| -> Result<GeoidValues> {
        Ok(data::index_values(keys.clone(), data::numeric_column(&census_df, name)?))
    };
    let named = |names: &[String]| -> Result<Vec<(String, GeoidValues)>> {
        names.iter().map(|name| Ok((name.clone(), lookup(name)?))).collect()
    };

    let population = lookup(&columns.population)?;
    let shares = named(&columns.shares)?;
    let income = columns.income.as_deref().map(|name| lookup(name)).transpose()?;
    let distance_populations = named(&columns.distance_populations)?;

    let summaries = catchments.summarize(&population, &shares, income.as_ref(), &distance_populations);
    io::write_catchments(&summaries, output)?;
    info!("[run] summarized {} catchments from {}", summaries.len(), assignments.display());
    Ok(summaries)
}
