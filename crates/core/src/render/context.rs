//! Engine context: the render surface plus the cooperative quit flag
//!
//! Drawing goes through the context, which flushes the surface and polls
//! for quit every `flush_interval` primitives. Once quit has been seen,
//! tracing loops stop after their current step.

use super::surface::RenderSurface;
use crate::core_types::{Color, Vec2};

pub struct EngineContext<S: RenderSurface> {
    surface: S,
    flush_interval: usize,
    pending: usize,
    primitives_drawn: usize,
    quit_requested: bool,
}

impl<S: RenderSurface> EngineContext<S> {
    /// Wrap `surface`, yielding to it every `flush_interval` primitives.
    pub fn new(surface: S, flush_interval: usize) -> Self {
        Self {
            surface,
            flush_interval: flush_interval.max(1),
            pending: 0,
            primitives_drawn: 0,
            quit_requested: false,
        }
    }

    pub fn draw_segment(&mut self, from: Vec2, to: Vec2, color: Color, thickness: f64) {
        self.surface.draw_segment(from, to, color, thickness);
        self.after_draw();
    }

    pub fn draw_circle(&mut self, center: Vec2, radius: f64, color: Color, filled: bool) {
        self.surface.draw_circle(center, radius, color, filled);
        self.after_draw();
    }

    fn after_draw(&mut self) {
        self.primitives_drawn += 1;
        self.pending += 1;
        if self.pending >= self.flush_interval {
            self.yield_to_surface();
        }
    }

    /// Flush the surface and check for a quit request.
    pub fn yield_to_surface(&mut self) {
        self.surface.flush();
        self.pending = 0;
        if self.surface.poll_quit() {
            self.quit_requested = true;
        }
    }

    /// Block until the surface reports quit.
    ///
    /// Relies on `poll_quit` waiting for events; a surface that never
    /// reports quit keeps this loop running.
    pub fn wait_for_quit(&mut self) {
        while !self.quit_requested {
            self.yield_to_surface();
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Ask running loops to stop after their current step.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn primitives_drawn(&self) -> usize {
        self.primitives_drawn
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    #[test]
    fn test_flushes_every_interval() {
        let mut ctx = EngineContext::new(RecordingSurface::new(), 3);
        for _ in 0..7 {
            ctx.draw_circle(Vec2::new(0.5, 0.5), 0.01, Color::RED, true);
        }
        assert_eq!(ctx.surface().flush_count(), 2);
        assert_eq!(ctx.primitives_drawn(), 7);
        assert!(!ctx.quit_requested());
    }

    #[test]
    fn test_quit_seen_on_poll() {
        let mut ctx = EngineContext::new(RecordingSurface::quitting_after(2), 1);
        ctx.draw_segment(Vec2::zeros(), Vec2::new(0.1, 0.1), Color::WHITE, 1.0);
        assert!(!ctx.quit_requested());
        ctx.draw_segment(Vec2::zeros(), Vec2::new(0.1, 0.1), Color::WHITE, 1.0);
        assert!(ctx.quit_requested());
    }

    #[test]
    fn test_wait_for_quit_returns_once_quit_polled() {
        let mut ctx = EngineContext::new(RecordingSurface::quitting_after(4), 100);
        ctx.wait_for_quit();
        assert!(ctx.quit_requested());
        assert_eq!(ctx.into_surface().flush_count(), 4);
    }
}
