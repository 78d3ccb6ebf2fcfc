//! Categorical school classifications: course modality from logic codes,
//! and over/under representation from a representation index.

mod modality;
mod representation;

pub use modality::{Marker, Modality, StaffedModality};
pub use representation::{Representation, RepresentationCounts, PARITY_THRESHOLD};
