//! Map composition: legends, city annotations, and the choropleth SVG.

mod choropleth;
mod cities;
mod legend;

pub use choropleth::{ChoroplethMap, PointMark};
pub use cities::CityLabel;
pub use legend::{Legend, LegendEntry, Swatch};
