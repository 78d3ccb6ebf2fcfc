//! File formats: GeoJSON and shapefile layers in, classified CSV and SVG out.

mod csv;
mod filter;
mod geojson;
mod shp;
pub(crate) mod svg;

pub use csv::{write_catchments, write_classified, ClassifiedRow};
pub use filter::AttributeFilter;
pub use geojson::{read_geojson_lines, read_geojson_polygons};
pub use shp::{read_shapefile_lines, read_shapefile_polygons};
