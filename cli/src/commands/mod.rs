pub mod catchment;
pub mod classify;
pub mod map;
pub mod presets;
pub mod represent;
