/// Census block-group GEOIDs are 12 digits: state(2) county(3) tract(6) group(1).
pub const BLOCK_GROUP_GEOID_LEN: usize = 12;

/// Left-pad a block-group GEOID with zeros. Tables exported through a
/// float column (`"13001950100.0"`) lose the leading zero and gain a
/// decimal suffix; both are repaired.
pub fn pad_geoid(raw: &str) -> String {
    let raw = raw.trim();
    let raw = raw.strip_suffix(".0").unwrap_or(raw);
    format!("{raw:0>width$}", width = BLOCK_GROUP_GEOID_LEN)
}
