//! Grid sampling of the field for the diagnostic arrow view

pub mod field_grid;

pub use field_grid::{FieldGrid, GridSample};
