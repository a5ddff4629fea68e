//! Render shell boundary
//!
//! The engine draws through [`EngineContext`], which owns a [`RenderSurface`]
//! implementation supplied by the shell.

mod context;
mod surface;

pub use context::EngineContext;
pub use surface::{DrawCommand, RecordingSurface, RenderSurface};
