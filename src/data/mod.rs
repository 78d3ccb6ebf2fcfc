//! Tabular inputs: loading CSV tables, normalizing GEOIDs, joining values
//! to map features, and catchment-weighted school statistics.

mod catchment;
mod geoid;
mod join;
mod table;

pub use catchment::{harmonic_distance, weighted_mean, weighted_share, CatchmentColumns, CatchmentSummary, Catchments, GeoidValues};
pub use geoid::{pad_geoid, BLOCK_GROUP_GEOID_LEN};
pub use join::{index_values, join_values, load_school_points, ratio, SchoolColumns, SchoolPoint};
pub use table::{numeric_column, read_table, string_column};
