//! SVG output: writers and drawing primitives in projected map space.

mod draw;
mod writer;

pub(crate) use draw::*;
pub(crate) use writer::*;
