#![doc = "csaccess public API: disparity binning and choropleth maps of computer-science course access"]
pub mod categorize;
pub mod classify;
pub mod color;
pub mod config;
pub mod data;
pub mod geom;
pub mod io;
pub mod layer;
pub mod presets;
pub mod render;
mod run;

#[doc(inline)]
pub use classify::{BinEdges, BinError, BinScheme, ClassSpec, ClassTally, Classification, Extent};

#[doc(inline)]
pub use config::RunConfig;

#[doc(inline)]
pub use run::{run_catchment, run_classify, run_map, run_represent, MapSummary};
