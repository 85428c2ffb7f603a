//! Procedural background animations.
//!
//! Each renderer is a plain arena of point records plus `step` (physics) and
//! `paint` (drawing) functions. A `FrameLoop` owns one renderer and is the
//! cancellable per-frame task: the app steps every live loop once per tick,
//! then paints them, and cancels a loop when its view unmounts.

pub mod canvas;
pub mod network;
pub mod particles;
pub mod starfield;

use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::style::Color;
use tracing::trace;

use crate::theme::Theme;

/// Virtual pixels per terminal cell. Scene constants (link distances,
/// velocities) are expressed in these units.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Color with straight alpha, blended over the scene background at paint time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Linear interpolation between two colors, alpha included.
    pub fn mix(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Composite over an opaque background.
    pub fn over(self, background: Rgba) -> Color {
        let a = self.a.clamp(0.0, 1.0);
        let blend = |fg: u8, bg: u8| (fg as f64 * a + bg as f64 * (1.0 - a)).round() as u8;
        Color::Rgb(
            blend(self.r, background.r),
            blend(self.g, background.g),
            blend(self.b, background.b),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn for_area(area: Rect) -> Self {
        Self {
            width: area.width as f64 * CELL_WIDTH_PX,
            height: area.height as f64 * CELL_HEIGHT_PX,
        }
    }

    /// A zero-sized viewport has nothing to draw on.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Pointer position in network drift space (roughly ±300 on both axes).
///
/// Written only by the input handler, read only by the frame step. Both run
/// on the UI thread, so it is passed by value into each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    pub active: bool,
}

/// Half-extent of the pointer mapping.
pub const POINTER_RANGE: f64 = 300.0;

impl Pointer {
    /// Map a terminal cell inside `area` into drift space and mark active.
    pub fn track(&mut self, column: u16, row: u16, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let nx = ((column as f64 - area.x as f64 + 0.5) / area.width as f64 - 0.5) * 2.0;
        let ny = ((row as f64 - area.y as f64 + 0.5) / area.height as f64 - 0.5) * 2.0;
        *self = Pointer {
            x: nx * POINTER_RANGE,
            y: ny * POINTER_RANGE,
            active: true,
        };
    }

    pub fn leave(&mut self) {
        self.active = false;
    }
}

/// Drawing target. Coordinates are virtual pixels with the origin at the
/// top-left corner.
pub trait Surface {
    fn viewport(&self) -> Viewport;
    fn line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgba);
    fn dot(&mut self, at: (f64, f64), radius: f64, color: Rgba);
    /// Radial gradient from `inner` at the center to `outer` at `radius`.
    fn glow(&mut self, at: (f64, f64), radius: f64, inner: Rgba, outer: Rgba);
}

/// Inputs shared by every renderer for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub theme: Theme,
    pub elapsed: Duration,
    pub pointer: Pointer,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            elapsed: Duration::ZERO,
            pointer: Pointer::default(),
        }
    }
}

pub trait Renderer {
    /// New drawing-surface size. Point state is kept.
    fn resize(&mut self, viewport: Viewport);
    fn step(&mut self, frame: &FrameContext);
    fn paint(&self, surface: &mut dyn Surface, frame: &FrameContext);
}

/// Anything that can paint itself onto a shared surface.
pub trait Layer {
    fn paint(&self, surface: &mut dyn Surface);
}

/// A renderer mounted with its per-frame task.
pub struct FrameLoop<R> {
    renderer: R,
    started: Instant,
    last: FrameContext,
    frames: u64,
    cancelled: bool,
}

impl<R: Renderer> FrameLoop<R> {
    pub fn mount(renderer: R, now: Instant) -> Self {
        Self {
            renderer,
            started: now,
            last: FrameContext::default(),
            frames: 0,
            cancelled: false,
        }
    }

    /// Run one update step. Does nothing once cancelled.
    pub fn frame(&mut self, now: Instant, theme: Theme, pointer: Pointer) {
        if self.cancelled {
            return;
        }
        self.last = FrameContext {
            theme,
            elapsed: now.saturating_duration_since(self.started),
            pointer,
        };
        self.renderer.step(&self.last);
        self.frames += 1;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.renderer.resize(viewport);
    }

    pub fn cancel(&mut self) {
        if !self.cancelled {
            trace!(frames = self.frames, "frame loop cancelled");
        }
        self.cancelled = true;
    }

    pub fn is_running(&self) -> bool {
        !self.cancelled
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: Renderer> Layer for FrameLoop<R> {
    fn paint(&self, surface: &mut dyn Surface) {
        if self.cancelled || surface.viewport().is_empty() {
            return;
        }
        self.renderer.paint(surface, &self.last);
    }
}

impl<R> Drop for FrameLoop<R> {
    fn drop(&mut self) {
        self.cancelled = true;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Records draw calls instead of rasterizing them.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub viewport: Viewport,
        pub lines: Vec<((f64, f64), (f64, f64), f64, Rgba)>,
        pub dots: Vec<((f64, f64), f64, Rgba)>,
        pub glows: Vec<((f64, f64), f64)>,
    }

    impl RecordingSurface {
        pub fn new(width: f64, height: f64) -> Self {
            Self {
                viewport: Viewport::new(width, height),
                ..Default::default()
            }
        }

        pub fn is_blank(&self) -> bool {
            self.lines.is_empty() && self.dots.is_empty() && self.glows.is_empty()
        }
    }

    impl Surface for RecordingSurface {
        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgba) {
            self.lines.push((from, to, width, color));
        }

        fn dot(&mut self, at: (f64, f64), radius: f64, color: Rgba) {
            self.dots.push((at, radius, color));
        }

        fn glow(&mut self, at: (f64, f64), radius: f64, _inner: Rgba, _outer: Rgba) {
            self.glows.push((at, radius));
        }
    }
}
