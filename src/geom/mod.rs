//! Geometry helpers: Web Mercator projection, map bounds, and clipping to a
//! lon/lat window.

mod bbox;
mod bounds;
mod mercator;

pub use bbox::BoxFilter;
pub use bounds::{bounds_of, merge_bounds, padded_bounds, ClipBox};
pub use mercator::WebMercator;
