//! `Surface` backed by a ratatui braille canvas.

use ratatui::{
    layout::Rect,
    symbols::Marker,
    widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
    Frame,
};

use super::{Layer, Rgba, Surface, Viewport, CELL_WIDTH_PX};

/// Braille gives two dots per cell horizontally.
const DOT_PX: f64 = CELL_WIDTH_PX / 2.0;
const GLOW_RINGS: usize = 3;

pub struct CanvasSurface<'a, 'b> {
    ctx: &'a mut Context<'b>,
    viewport: Viewport,
    background: Rgba,
}

impl<'a, 'b> CanvasSurface<'a, 'b> {
    pub fn new(ctx: &'a mut Context<'b>, viewport: Viewport, background: Rgba) -> Self {
        Self {
            ctx,
            viewport,
            background,
        }
    }

    /// Canvas y grows upward; scene y grows downward.
    fn flip(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x, self.viewport.height - y)
    }

    fn visible(&self, (x, y): (f64, f64)) -> bool {
        x >= 0.0 && y >= 0.0 && x <= self.viewport.width && y <= self.viewport.height
    }
}

impl Surface for CanvasSurface<'_, '_> {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), _width: f64, color: Rgba) {
        if color.a <= 0.01 {
            return;
        }
        let (x1, y1) = self.flip(from);
        let (x2, y2) = self.flip(to);
        self.ctx.draw(&CanvasLine {
            x1,
            y1,
            x2,
            y2,
            color: color.over(self.background),
        });
    }

    fn dot(&mut self, at: (f64, f64), radius: f64, color: Rgba) {
        if color.a <= 0.01 || !self.visible(at) {
            return;
        }
        let (x, y) = self.flip(at);
        let color = color.over(self.background);
        if radius < DOT_PX {
            self.ctx.draw(&Points {
                coords: &[(x, y)],
                color,
            });
        } else {
            self.ctx.draw(&Circle { x, y, radius, color });
            self.ctx.draw(&Points {
                coords: &[(x, y)],
                color,
            });
        }
    }

    fn glow(&mut self, at: (f64, f64), radius: f64, inner: Rgba, outer: Rgba) {
        if radius < DOT_PX || !self.visible(at) {
            return;
        }
        let (x, y) = self.flip(at);
        // Outermost ring first so brighter inner rings win shared cells.
        for ring in (1..=GLOW_RINGS).rev() {
            let t = ring as f64 / GLOW_RINGS as f64;
            let color = inner.mix(outer, t);
            if color.a <= 0.01 {
                continue;
            }
            self.ctx.draw(&Circle {
                x,
                y,
                radius: radius * t,
                color: color.over(self.background),
            });
        }
    }
}

/// Paint `layers` bottom-up into `area` on a braille canvas.
pub fn render_layers(frame: &mut Frame, area: Rect, background: Rgba, layers: &[&dyn Layer]) {
    let viewport = Viewport::for_area(area);
    if viewport.is_empty() {
        return;
    }
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, viewport.width])
        .y_bounds([0.0, viewport.height])
        .background_color(background.over(background))
        .paint(|ctx| {
            for layer in layers {
                let mut surface = CanvasSurface::new(ctx, viewport, background);
                layer.paint(&mut surface);
                ctx.layer();
            }
        });
    frame.render_widget(canvas, area);
}
