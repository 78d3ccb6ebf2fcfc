use std::{fs, path::{Path, PathBuf}};

use anyhow::{anyhow, Context, Result};
use geo::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use shapefile::{dbase::Record, PolygonRing, Reader, Shape};
use tempfile::TempDir;
use tracing::debug;
use zip::ZipArchive;

use crate::layer::{LineLayer, PolygonLayer};
use super::{filter::field_text, AttributeFilter};

/// A `.shp` path, or a `.zip` extracted to a temporary directory that lives
/// as long as this handle.
struct ShapefileSource {
    shp: PathBuf,
    _extracted: Option<TempDir>,
}

impl ShapefileSource {
    fn open(path: &Path) -> Result<Self> {
        if !path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("zip")) {
            return Ok(Self { shp: path.to_path_buf(), _extracted: None });
        }

        let dir = tempfile::tempdir().context("[io::shp] Failed to create a temporary directory")?;
        let file = fs::File::open(path)
            .with_context(|| format!("[io::shp] Failed to open {}", path.display()))?;
        ZipArchive::new(file)
            .with_context(|| format!("[io::shp] Failed to read zip archive {}", path.display()))?
            .extract(dir.path())
            .with_context(|| format!("[io::shp] Failed to extract {}", path.display()))?;

        let shp = find_shp(dir.path())?
            .ok_or_else(|| anyhow!("[io::shp] No .shp file inside {}", path.display()))?;
        Ok(Self { shp, _extracted: Some(dir) })
    }
}

fn find_shp(dir: &Path) -> Result<Option<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in &entries {
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("shp")) {
            return Ok(Some(path.clone()));
        }
    }
    for path in entries.iter().filter(|p| p.is_dir()) {
        if let Some(found) = find_shp(path)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

fn read_shapes(path: &Path, filter: Option<&AttributeFilter>) -> Result<Vec<(Shape, Record)>> {
    let source = ShapefileSource::open(path)?;
    let mut reader = Reader::from_path(&source.shp)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;

    let mut items = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp] Error reading shape+record from {}", path.display()))?;
        if filter.is_none_or(|f| f.matches_record(&record)) {
            items.push((shape, record));
        }
    }
    debug!("[io::shp] kept {} shapes from {}", items.len(), path.display());
    Ok(items)
}

/// Read polygon shapes, optionally filtered, with ids from `id_field`
/// (record position when absent). Non-polygon shapes are skipped.
pub fn read_shapefile_polygons(path: &Path, filter: Option<&AttributeFilter>, id_field: Option<&str>) -> Result<PolygonLayer> {
    let (mut ids, mut shapes) = (Vec::new(), Vec::new());
    for (index, (shape, record)) in read_shapes(path, filter)?.into_iter().enumerate() {
        let Shape::Polygon(polygon) = shape else { continue };
        let id = match id_field {
            Some(field) => record.get(field).and_then(field_text)
                .ok_or_else(|| anyhow!("[io::shp] record {index} has no {field:?} attribute"))?,
            None => index.to_string(),
        };
        ids.push(id);
        shapes.push(shp_to_geo(&polygon));
    }
    Ok(PolygonLayer::new(ids, shapes))
}

/// Read polyline shapes, optionally filtered.
pub fn read_shapefile_lines(path: &Path, filter: Option<&AttributeFilter>) -> Result<LineLayer> {
    let shapes = read_shapes(path, filter)?.into_iter()
        .filter_map(|(shape, _)| match shape {
            Shape::Polyline(line) => Some(MultiLineString(
                line.parts().iter()
                    .map(|part| LineString(part.iter().map(|p| Coord { x: p.x, y: p.y }).collect()))
                    .collect(),
            )),
            _ => None,
        })
        .collect();
    Ok(LineLayer::new(shapes))
}

/// Group each outer ring with the inner rings that follow it.
fn shp_to_geo(polygon: &shapefile::Polygon) -> MultiPolygon<f64> {
    fn closed(points: &[shapefile::Point]) -> LineString<f64> {
        let mut coords = points.iter().map(|p| Coord { x: p.x, y: p.y }).collect::<Vec<_>>();
        if coords.first() != coords.last() {
            coords.push(coords[0]);
        }
        LineString(coords)
    }

    let mut polygons = Vec::new();
    let mut current: Option<(LineString<f64>, Vec<LineString<f64>>)> = None;

    for ring in polygon.rings() {
        match ring {
            PolygonRing::Outer(points) => {
                if let Some((exterior, holes)) = current.take() {
                    polygons.push(Polygon::new(exterior, holes));
                }
                current = Some((closed(points), Vec::new()));
            }
            PolygonRing::Inner(points) => match current.as_mut() {
                Some((_, holes)) => holes.push(closed(points)),
                None => current = Some((closed(points), Vec::new())),
            },
        }
    }
    if let Some((exterior, holes)) = current {
        polygons.push(Polygon::new(exterior, holes));
    }

    MultiPolygon(polygons)
}

#[cfg(test)]
mod tests {
    use shapefile::Point;

    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x, y), Point::new(x, y + size), Point::new(x + size, y + size),
            Point::new(x + size, y), Point::new(x, y),
        ]
    }

    #[test]
    fn holes_attach_to_preceding_outer_ring() {
        let polygon = shapefile::Polygon::with_rings(vec![
            PolygonRing::Outer(square(0.0, 0.0, 10.0)),
            PolygonRing::Inner(square(2.0, 2.0, 2.0)),
            PolygonRing::Outer(square(20.0, 0.0, 5.0)),
        ]);
        let shape = shp_to_geo(&polygon);
        assert_eq!(shape.0.len(), 2);
        assert_eq!(shape.0[0].interiors().len(), 1);
        assert!(shape.0[1].interiors().is_empty());
    }

    #[test]
    fn missing_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_shapefile_polygons(&dir.path().join("missing.shp"), None, None).is_err());
        assert!(read_shapefile_lines(&dir.path().join("missing.zip"), None).is_err());
    }

    #[test]
    fn finds_nested_shp() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("tl_2023_us_county")).unwrap();
        fs::write(dir.path().join("tl_2023_us_county/tl_2023_us_county.shp"), b"").unwrap();
        fs::write(dir.path().join("readme.txt"), b"").unwrap();
        let found = find_shp(dir.path()).unwrap().unwrap();
        assert!(found.ends_with("tl_2023_us_county/tl_2023_us_county.shp"));
    }
}
