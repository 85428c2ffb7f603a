//! Diagonal star drift behind the hero.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{FrameContext, Renderer, Rgba, Surface, Viewport};

pub const STAR_COUNT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    pub opacity: f64,
}

pub struct StarField {
    stars: Vec<Star>,
    viewport: Viewport,
}

impl StarField {
    pub fn new(viewport: Viewport) -> Self {
        Self::seeded(STAR_COUNT, viewport, &mut StdRng::from_os_rng())
    }

    pub fn seeded(count: usize, viewport: Viewport, rng: &mut impl Rng) -> Self {
        let stars = (0..count)
            .map(|_| Star {
                x: rng.random::<f64>() * viewport.width,
                y: rng.random::<f64>() * viewport.height,
                size: rng.random::<f64>() * 2.0 + 0.5,
                speed: rng.random::<f64>() * 0.5 + 0.1,
                opacity: rng.random::<f64>(),
            })
            .collect();
        Self { stars, viewport }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn update(&mut self) {
        let Viewport { width, height } = self.viewport;
        for star in &mut self.stars {
            star.y += star.speed;
            star.x += star.speed * 0.5;
            if star.x > width {
                star.x = 0.0;
            }
            if star.y > height {
                star.y = 0.0;
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        if surface.viewport().is_empty() {
            return;
        }
        for star in &self.stars {
            surface.dot(
                (star.x, star.y),
                star.size,
                Rgba::new(255, 255, 255, star.opacity),
            );
        }
    }
}

impl Renderer for StarField {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn step(&mut self, _frame: &FrameContext) {
        self.update();
    }

    fn paint(&self, surface: &mut dyn Surface, _frame: &FrameContext) {
        self.draw(surface);
    }
}
