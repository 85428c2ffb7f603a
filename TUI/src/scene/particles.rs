//! Drifting particles with fading trails and proximity links.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{FrameContext, Renderer, Surface, Viewport};

pub const PARTICLE_COUNT: usize = 60;
pub const TRAIL_LEN: usize = 15;
pub const LINK_DISTANCE: f64 = 150.0;
/// Max speed per axis, per frame.
pub const MAX_SPEED: f64 = 0.75;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    /// Index into the theme's particle palette.
    pub hue: usize,
    pub trail: VecDeque<(f64, f64)>,
}

pub struct ParticleField {
    particles: Vec<Particle>,
    viewport: Viewport,
}

impl ParticleField {
    pub fn new(viewport: Viewport) -> Self {
        Self::seeded(PARTICLE_COUNT, viewport, &mut StdRng::from_os_rng())
    }

    pub fn seeded(count: usize, viewport: Viewport, rng: &mut impl Rng) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.random::<f64>() * viewport.width,
                y: rng.random::<f64>() * viewport.height,
                vx: (rng.random::<f64>() - 0.5) * 2.0 * MAX_SPEED,
                vy: (rng.random::<f64>() - 0.5) * 2.0 * MAX_SPEED,
                size: rng.random::<f64>() * 2.0 + 1.0,
                hue: rng.random_range(0..3),
                trail: VecDeque::with_capacity(TRAIL_LEN + 1),
            })
            .collect();
        Self {
            particles,
            viewport,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn update(&mut self) {
        let Viewport { width, height } = self.viewport;
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;

            // Point the velocity back inside rather than flipping blindly, so a
            // particle stranded outside by a shrink still returns.
            if p.x < 0.0 {
                p.vx = p.vx.abs();
            } else if p.x > width {
                p.vx = -p.vx.abs();
            }
            if p.y < 0.0 {
                p.vy = p.vy.abs();
            } else if p.y > height {
                p.vy = -p.vy.abs();
            }

            p.trail.push_back((p.x, p.y));
            while p.trail.len() > TRAIL_LEN {
                p.trail.pop_front();
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, frame: &FrameContext) {
        if surface.viewport().is_empty() {
            return;
        }
        let palette = frame.theme.palette();

        for p in &self.particles {
            let color = palette.particles[p.hue % palette.particles.len()];

            let trail = color.with_alpha(palette.trail_alpha);
            for (a, b) in p.trail.iter().zip(p.trail.iter().skip(1)) {
                surface.line(*a, *b, p.size, trail);
            }

            surface.dot(
                (p.x, p.y),
                p.size * 1.2,
                color.with_alpha(palette.particle_alpha),
            );
        }

        for (i, a) in self.particles.iter().enumerate() {
            let color = palette.particles[a.hue % palette.particles.len()];
            for b in &self.particles[i + 1..] {
                let dist = (a.x - b.x).hypot(a.y - b.y);
                if dist < LINK_DISTANCE {
                    let alpha = (1.0 - dist / LINK_DISTANCE) * palette.link_alpha;
                    surface.line((a.x, a.y), (b.x, b.y), 0.5, color.with_alpha(alpha));
                }
            }
        }
    }
}

impl Renderer for ParticleField {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn step(&mut self, _frame: &FrameContext) {
        self.update();
    }

    fn paint(&self, surface: &mut dyn Surface, frame: &FrameContext) {
        self.draw(surface, frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::testing::RecordingSurface;
    use crate::theme::{Palette, Theme};
    use pretty_assertions::assert_eq;

    fn field(count: usize, width: f64, height: f64) -> ParticleField {
        ParticleField::seeded(
            count,
            Viewport::new(width, height),
            &mut StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn test_seeds_inside_viewport() {
        let field = field(PARTICLE_COUNT, 800.0, 600.0);
        assert_eq!(field.particles().len(), PARTICLE_COUNT);
        for p in field.particles() {
            assert!((0.0..=800.0).contains(&p.x));
            assert!((0.0..=600.0).contains(&p.y));
            assert!(p.vx.abs() <= MAX_SPEED && p.vy.abs() <= MAX_SPEED);
            assert!((1.0..3.0).contains(&p.size));
            assert!(p.trail.is_empty());
        }
    }

    #[test]
    fn test_particles_stay_within_bounds() {
        for count in [1, 10, 60] {
            let mut field = field(count, 320.0, 200.0);
            for _ in 0..5_000 {
                field.update();
                for p in field.particles() {
                    assert!(p.x >= -MAX_SPEED && p.x <= 320.0 + MAX_SPEED, "x = {}", p.x);
                    assert!(p.y >= -MAX_SPEED && p.y <= 200.0 + MAX_SPEED, "y = {}", p.y);
                }
            }
        }
    }

    #[test]
    fn test_trail_is_bounded_fifo() {
        let mut field = field(3, 500.0, 500.0);
        for _ in 0..40 {
            field.update();
            for p in field.particles() {
                assert!(p.trail.len() <= TRAIL_LEN);
            }
        }
        for p in field.particles() {
            assert_eq!(p.trail.len(), TRAIL_LEN);
            assert_eq!(p.trail.back().copied(), Some((p.x, p.y)));
        }
    }

    #[test]
    fn test_resize_keeps_particle_state() {
        let mut field = field(5, 500.0, 500.0);
        field.update();
        let before: Vec<(f64, f64)> = field.particles().iter().map(|p| (p.x, p.y)).collect();

        field.resize(Viewport::new(100.0, 100.0));
        let after: Vec<(f64, f64)> = field.particles().iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(before, after);

        // Particles stranded outside the new bounds head back in.
        for _ in 0..10 {
            field.update();
        }
        for p in field.particles() {
            if p.x > 100.0 {
                assert!(p.vx < 0.0);
            }
            if p.y > 100.0 {
                assert!(p.vy < 0.0);
            }
        }
    }

    #[test]
    fn test_link_opacity_decays_with_distance() {
        let mut field = field(2, 1000.0, 1000.0);
        field.particles[0].x = 100.0;
        field.particles[0].y = 100.0;
        field.particles[1].x = 175.0;
        field.particles[1].y = 100.0;

        let mut surface = RecordingSurface::new(1000.0, 1000.0);
        let frame = FrameContext::default();
        field.draw(&mut surface, &frame);

        let links: Vec<_> = surface.lines.iter().filter(|l| l.2 == 0.5).collect();
        assert_eq!(links.len(), 1);
        let expected = 0.5 * Palette::DARK.link_alpha;
        assert!((links[0].3.a - expected).abs() < 1e-9);

        field.particles[1].x = 300.0;
        let mut surface = RecordingSurface::new(1000.0, 1000.0);
        field.draw(&mut surface, &frame);
        assert!(surface.lines.iter().all(|l| l.2 != 0.5));
    }

    #[test]
    fn test_light_theme_uses_fainter_alphas() {
        let field = field(1, 100.0, 100.0);
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let frame = FrameContext {
            theme: Theme::Light,
            ..FrameContext::default()
        };
        field.draw(&mut surface, &frame);
        assert_eq!(surface.dots.len(), 1);
        assert!((surface.dots[0].2.a - 0.3).abs() < 1e-9);
    }
}
