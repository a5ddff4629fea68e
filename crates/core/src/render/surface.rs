//! Drawing surface contract and an in-memory implementation
//!
//! All coordinates are in unit-square space `[0,1]²`; scaling to pixels is
//! the surface's job.

use crate::core_types::{Color, Vec2};

/// Pass-through 2D drawing surface owned by the render shell.
pub trait RenderSurface {
    /// Draw a straight line segment.
    fn draw_segment(&mut self, from: Vec2, to: Vec2, color: Color, thickness: f64);

    /// Draw a circle, filled or as an outline.
    fn draw_circle(&mut self, center: Vec2, radius: f64, color: Color, filled: bool);

    /// Present everything drawn so far.
    fn flush(&mut self);

    /// Drain pending events; `true` once the user asked to quit.
    fn poll_quit(&mut self) -> bool;
}

/// One recorded drawing primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Segment {
        from: Vec2,
        to: Vec2,
        color: Color,
        thickness: f64,
    },
    Circle {
        center: Vec2,
        radius: f64,
        color: Color,
        filled: bool,
    },
}

impl DrawCommand {
    pub fn color(&self) -> Color {
        match self {
            Self::Segment { color, .. } | Self::Circle { color, .. } => *color,
        }
    }
}

/// Surface that records primitives instead of drawing them.
///
/// Used by the headless demo and by tests. It can be told to report a quit
/// request after a number of polls to exercise cooperative abort.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    flushes: usize,
    polls: usize,
    quit_after_polls: Option<usize>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface whose `poll_quit` returns `true` from the `polls`-th poll on.
    pub fn quitting_after(polls: usize) -> Self {
        Self {
            quit_after_polls: Some(polls),
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Number of recorded segments drawn in `color`.
    pub fn segment_count(&self, color: Color) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Segment { .. }) && c.color() == color)
            .count()
    }

    /// Number of recorded circles drawn in `color`.
    pub fn circle_count(&self, color: Color) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }) && c.color() == color)
            .count()
    }
}

impl RenderSurface for RecordingSurface {
    fn draw_segment(&mut self, from: Vec2, to: Vec2, color: Color, thickness: f64) {
        self.commands.push(DrawCommand::Segment {
            from,
            to,
            color,
            thickness,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f64, color: Color, filled: bool) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            filled,
        });
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }

    fn poll_quit(&mut self) -> bool {
        self.polls += 1;
        self.quit_after_polls.is_some_and(|n| self.polls >= n)
    }
}
