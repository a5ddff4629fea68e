//! Core types and utilities

pub mod color;
pub mod source;
pub mod vec2;

pub use color::Color;
pub use source::{ChargedSegment, PointCharge, Polarity};
pub use vec2::{in_unit_square, normalize, perpendicular, Vec2, MIN_FIELD_MAGNITUDE};
