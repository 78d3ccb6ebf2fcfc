use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use serde_json::Value;
use tracing::debug;

use crate::layer::{LineLayer, PolygonLayer};
use super::{filter::json_text, AttributeFilter};

fn read_features(path: &Path) -> Result<Vec<Value>> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::geojson] Failed to read {}", path.display()))?;
    let mut value: Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("[io::geojson] Failed to parse GeoJSON from {}", path.display()))?;

    match value.get_mut("features").map(Value::take) {
        Some(Value::Array(features)) => Ok(features),
        _ => bail!("[io::geojson] {} is not a FeatureCollection", path.display()),
    }
}

fn keep(feature: &Value, filter: Option<&AttributeFilter>) -> bool {
    filter.is_none_or(|f| f.matches_properties(&feature["properties"]))
}

/// Read Polygon and MultiPolygon features, optionally filtered. Each
/// feature's id is taken from `id_property` (strings as-is, numbers
/// formatted), or is its position in the collection when no property is
/// named. Other geometry types are skipped.
pub fn read_geojson_polygons(path: &Path, filter: Option<&AttributeFilter>, id_property: Option<&str>) -> Result<PolygonLayer> {
    let features = read_features(path)?;
    let (mut ids, mut shapes) = (Vec::new(), Vec::new());

    for (index, feature) in features.iter().enumerate() {
        if !keep(feature, filter) { continue }
        let geometry = &feature["geometry"];
        let shape = match geometry["type"].as_str() {
            Some("Polygon") => MultiPolygon(vec![parse_polygon(&geometry["coordinates"])?]),
            Some("MultiPolygon") => MultiPolygon(
                coords_array(&geometry["coordinates"])?.iter()
                    .map(parse_polygon)
                    .collect::<Result<_>>()?,
            ),
            _ => continue,
        };

        let id = match id_property {
            Some(name) => json_text(&feature["properties"][name])
                .ok_or_else(|| anyhow!("[io::geojson] feature {index} has no {name:?} property"))?,
            None => index.to_string(),
        };

        ids.push(id);
        shapes.push(shape);
    }

    debug!("[io::geojson] read {} of {} features from {}", shapes.len(), features.len(), path.display());
    Ok(PolygonLayer::new(ids, shapes))
}

/// Read LineString and MultiLineString features, optionally filtered.
pub fn read_geojson_lines(path: &Path, filter: Option<&AttributeFilter>) -> Result<LineLayer> {
    let features = read_features(path)?;
    let mut shapes = Vec::new();

    for feature in features.iter().filter(|f| keep(f, filter)) {
        let geometry = &feature["geometry"];
        match geometry["type"].as_str() {
            Some("LineString") => shapes.push(MultiLineString(vec![parse_ring(&geometry["coordinates"])?])),
            Some("MultiLineString") => shapes.push(MultiLineString(
                coords_array(&geometry["coordinates"])?.iter()
                    .map(parse_ring)
                    .collect::<Result<_>>()?,
            )),
            _ => {}
        }
    }

    Ok(LineLayer::new(shapes))
}

fn coords_array(value: &Value) -> Result<&Vec<Value>> {
    value.as_array().ok_or_else(|| anyhow!("[io::geojson] coordinates must be an array"))
}

/// `[exterior, hole, hole, ...]`
fn parse_polygon(value: &Value) -> Result<Polygon<f64>> {
    let mut rings = coords_array(value)?.iter().map(parse_ring);
    let exterior = rings.next()
        .ok_or_else(|| anyhow!("[io::geojson] polygon without an exterior ring"))??;
    Ok(Polygon::new(exterior, rings.collect::<Result<_>>()?))
}

/// `[[x, y], [x, y], ...]`
fn parse_ring(value: &Value) -> Result<LineString<f64>> {
    coords_array(value)?.iter()
        .map(|pair| match pair.as_array().map(Vec::as_slice) {
            Some([x, y, ..]) => Ok(Coord {
                x: x.as_f64().ok_or_else(|| anyhow!("[io::geojson] x must be a number"))?,
                y: y.as_f64().ok_or_else(|| anyhow!("[io::geojson] y must be a number"))?,
            }),
            _ => bail!("[io::geojson] invalid position {pair}"),
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_geojson(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_polygons_with_ids() {
        let file = write_geojson(r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "GEOID": "130010001001" },
                  "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } },
                { "type": "Feature", "properties": { "GEOID": 130010001002 },
                  "geometry": { "type": "MultiPolygon", "coordinates": [
                      [[[2,2],[3,2],[3,3],[2,2]]],
                      [[[4,4],[5,4],[5,5],[4,4]], [[4.2,4.1],[4.8,4.1],[4.8,4.6],[4.2,4.1]]]
                  ] } },
                { "type": "Feature", "properties": { "GEOID": "x" },
                  "geometry": { "type": "Point", "coordinates": [0,0] } }
            ]
        }"#);
        let layer = read_geojson_polygons(file.path(), None, Some("GEOID")).unwrap();
        assert_eq!(layer.ids, ["130010001001", "130010001002"]);
        assert_eq!(layer.shapes[1].0.len(), 2);
        assert_eq!(layer.shapes[1].0[1].interiors().len(), 1);
    }

    #[test]
    fn missing_id_property_is_an_error() {
        let file = write_geojson(r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": {},
              "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } }
        ] }"#);
        assert!(read_geojson_polygons(file.path(), None, Some("GEOID")).is_err());
        assert_eq!(read_geojson_polygons(file.path(), None, None).unwrap().ids, ["0"]);
    }

    #[test]
    fn reads_lines() {
        let file = write_geojson(r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "RTTYP": "I" },
              "geometry": { "type": "LineString", "coordinates": [[0,0],[1,1]] } }
        ] }"#);
        let roads = read_geojson_lines(file.path(), None).unwrap();
        assert_eq!(roads.len(), 1);
        let interstates = AttributeFilter::new("RTTYP", "I");
        assert_eq!(read_geojson_lines(file.path(), Some(&interstates)).unwrap().len(), 1);
        let state_routes = AttributeFilter::new("RTTYP", "S");
        assert!(read_geojson_lines(file.path(), Some(&state_routes)).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_collections() {
        let file = write_geojson(r#"{ "type": "Feature" }"#);
        assert!(read_geojson_polygons(file.path(), None, None).is_err());
    }
}
