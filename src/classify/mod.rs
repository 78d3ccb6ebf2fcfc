//! Value-to-class binning.
//!
//! A [`BinScheme`] pairs strictly increasing edges with one [`ClassSpec`]
//! per interval and maps a statistic to a [`Classification`]. Values that
//! are missing, NaN, or outside every interval come back as
//! [`Classification::Unclassified`] and are left out of drawing and legend
//! counts. Malformed edges are a [`BinError`] at construction time.

mod cut;
mod edges;
mod error;
mod scheme;
mod tally;
mod underlay;

pub use cut::{quantile_edges, RightClosedBins};
pub use edges::BinEdges;
pub use error::BinError;
pub use scheme::{range_label, BinScheme, ClassSpec, Classification, Extent};
pub use tally::ClassTally;
pub use underlay::{ResolvedUnderlay, UnderlayBins, UnderlayScheme};
