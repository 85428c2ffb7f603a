//! Rotating pseudo-3D node network with pointer repulsion and edge pulses.
//!
//! Nodes live in a cube of half-width `BOUND`. Edges are never stored: every
//! frame re-derives them from the live 3D distances.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{FrameContext, Pointer, Renderer, Surface, Viewport};

pub const BOUND: f64 = 450.0;
pub const CONNECTION_DISTANCE: f64 = 220.0;
pub const PERSPECTIVE: f64 = 600.0;
pub const MAX_PULSES: usize = 25;
pub const PULSE_SPAWN_CHANCE: f64 = 0.0005;
pub const SPRING: f64 = 0.001;
pub const REPULSION: f64 = 0.05;
const ROTATION_X_STEP: f64 = 0.0015;
const ROTATION_Y_STEP: f64 = 0.001;
const DRIFT_SPEED: f64 = 0.3;

#[derive(Debug, Clone, Copy)]
pub struct NetworkOptions {
    pub density: usize,
    pub speed: f64,
    pub interaction_radius: f64,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            density: 50,
            speed: 1.0,
            interaction_radius: 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    pub origin: (f64, f64, f64),
}

impl Node {
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            origin: (x, y, z),
        }
    }

    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn distance_from_origin(&self) -> f64 {
        let (ox, oy, oz) = self.origin;
        let (dx, dy, dz) = (self.x - ox, self.y - oy, self.z - oz);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub from: usize,
    pub to: usize,
    pub progress: f64,
    pub speed: f64,
}

/// Screen-space position of a node after rotation and perspective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub depth: f64,
}

pub struct NeuralNetwork {
    nodes: Vec<Node>,
    pulses: Vec<Pulse>,
    rotation_x: f64,
    rotation_y: f64,
    options: NetworkOptions,
    viewport: Viewport,
    rng: StdRng,
}

impl NeuralNetwork {
    pub fn new(options: NetworkOptions, viewport: Viewport) -> Self {
        Self::with_rng(options, viewport, StdRng::from_os_rng())
    }

    pub fn with_rng(options: NetworkOptions, viewport: Viewport, mut rng: StdRng) -> Self {
        let nodes = (0..options.density)
            .map(|_| {
                let mut node = Node::at(
                    (rng.random::<f64>() - 0.5) * 2.0 * BOUND,
                    (rng.random::<f64>() - 0.5) * 2.0 * BOUND,
                    (rng.random::<f64>() - 0.5) * 2.0 * BOUND,
                );
                node.vx = (rng.random::<f64>() - 0.5) * DRIFT_SPEED;
                node.vy = (rng.random::<f64>() - 0.5) * DRIFT_SPEED;
                node.vz = (rng.random::<f64>() - 0.5) * DRIFT_SPEED;
                node
            })
            .collect();
        Self::from_nodes(nodes, options, viewport, rng)
    }

    pub fn from_nodes(
        nodes: Vec<Node>,
        options: NetworkOptions,
        viewport: Viewport,
        rng: StdRng,
    ) -> Self {
        Self {
            nodes,
            pulses: Vec::new(),
            rotation_x: 0.0,
            rotation_y: 0.0,
            options,
            viewport,
            rng,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    pub fn rotation(&self) -> (f64, f64) {
        (self.rotation_x, self.rotation_y)
    }

    pub fn update(&mut self, pointer: Pointer) {
        let speed = self.options.speed;
        self.rotation_x += ROTATION_X_STEP * speed;
        self.rotation_y += ROTATION_Y_STEP * speed;

        let radius = self.options.interaction_radius;
        for n in &mut self.nodes {
            n.x += n.vx * speed;
            n.y += n.vy * speed;
            n.z += n.vz * speed;

            if n.x.abs() > BOUND {
                n.vx = -n.vx;
            }
            if n.y.abs() > BOUND {
                n.vy = -n.vy;
            }
            if n.z.abs() > BOUND {
                n.vz = -n.vz;
            }

            if pointer.active && radius > 0.0 {
                let dx = n.x - pointer.x;
                let dy = n.y - pointer.y;
                let dist = dx.hypot(dy);
                if dist < radius {
                    let force = (radius - dist) / radius;
                    n.x += dx * force * REPULSION;
                    n.y += dy * force * REPULSION;
                }
            }

            let (ox, oy, oz) = n.origin;
            n.x += (ox - n.x) * SPRING;
            n.y += (oy - n.y) * SPRING;
            n.z += (oz - n.z) * SPRING;
        }

        self.spawn_pulses();
        self.advance_pulses();
    }

    fn spawn_pulses(&mut self) {
        for i in 0..self.nodes.len() {
            for j in i + 1..self.nodes.len() {
                if self.pulses.len() >= MAX_PULSES {
                    return;
                }
                if self.nodes[i].distance_to(&self.nodes[j]) < CONNECTION_DISTANCE
                    && self.rng.random::<f64>() < PULSE_SPAWN_CHANCE
                {
                    self.pulses.push(Pulse {
                        from: i,
                        to: j,
                        progress: 0.0,
                        speed: 0.008 + self.rng.random::<f64>() * 0.015,
                    });
                }
            }
        }
    }

    fn advance_pulses(&mut self) {
        for pulse in &mut self.pulses {
            pulse.progress += pulse.speed;
        }
        self.pulses.retain(|p| p.progress < 1.0);
    }

    /// Rotate around X, then Y, then apply perspective and center.
    pub fn project(&self, n: &Node) -> Projected {
        let (sin_x, cos_x) = self.rotation_x.sin_cos();
        let (sin_y, cos_y) = self.rotation_y.sin_cos();

        let y1 = n.y * cos_x - n.z * sin_x;
        let z1 = n.z * cos_x + n.y * sin_x;

        let x1 = n.x * cos_y + z1 * sin_y;
        let z2 = z1 * cos_y - n.x * sin_y;

        let scale = PERSPECTIVE / (PERSPECTIVE + z2).max(10.0);
        Projected {
            x: x1 * scale + self.viewport.width / 2.0,
            y: y1 * scale + self.viewport.height / 2.0,
            scale,
            depth: z2,
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, frame: &FrameContext) {
        if surface.viewport().is_empty() {
            return;
        }
        let palette = frame.theme.palette();
        let projected: Vec<Projected> = self.nodes.iter().map(|n| self.project(n)).collect();

        for i in 0..self.nodes.len() {
            for j in i + 1..self.nodes.len() {
                let dist = self.nodes[i].distance_to(&self.nodes[j]);
                if dist >= CONNECTION_DISTANCE {
                    continue;
                }
                let (p1, p2) = (projected[i], projected[j]);
                let near = p1.scale.min(p2.scale);
                let alpha = (1.0 - dist / CONNECTION_DISTANCE) * 0.25 * near;
                surface.line(
                    (p1.x, p1.y),
                    (p2.x, p2.y),
                    0.8 * near,
                    palette.edge.with_alpha(alpha),
                );
            }
        }

        for pulse in &self.pulses {
            let (Some(p1), Some(p2)) = (projected.get(pulse.from), projected.get(pulse.to)) else {
                continue;
            };
            let t = pulse.progress;
            let x = p1.x + (p2.x - p1.x) * t;
            let y = p1.y + (p2.y - p1.y) * t;
            let scale = p1.scale + (p2.scale - p1.scale) * t;
            let radius = (2.5 * scale).max(0.2);
            surface.glow((x, y), radius * 3.0, palette.pulse.with_alpha(0.6), palette.pulse.with_alpha(0.0));
            surface.dot((x, y), radius, palette.pulse);
        }

        let seconds = frame.elapsed.as_secs_f64();
        for (idx, p) in projected.iter().enumerate() {
            let size = (2.2 * p.scale).max(0.1);
            let glow = (size * shimmer(seconds, idx)).max(0.1);
            surface.glow((p.x, p.y), glow, palette.glow_inner, palette.glow_outer);
            surface.dot((p.x, p.y), size, palette.node_core);
        }
    }
}

/// Glow multiplier in [1.7, 3.3], one full cycle every ~2.5s per node.
fn shimmer(seconds: f64, idx: usize) -> f64 {
    2.5 + (seconds * 1000.0 / 400.0 + idx as f64).sin() * 0.8
}

impl Renderer for NeuralNetwork {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn step(&mut self, frame: &FrameContext) {
        self.update(frame.pointer);
    }

    fn paint(&self, surface: &mut dyn Surface, frame: &FrameContext) {
        self.draw(surface, frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::testing::RecordingSurface;
    use pretty_assertions::assert_eq;

    fn still(nodes: Vec<Node>) -> NeuralNetwork {
        NeuralNetwork::from_nodes(
            nodes,
            NetworkOptions::default(),
            Viewport::new(800.0, 600.0),
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn test_spawns_requested_density_inside_cube() {
        let net = NeuralNetwork::with_rng(
            NetworkOptions {
                density: 60,
                ..NetworkOptions::default()
            },
            Viewport::new(800.0, 600.0),
            StdRng::seed_from_u64(3),
        );
        assert_eq!(net.nodes().len(), 60);
        for n in net.nodes() {
            assert!(n.x.abs() <= BOUND && n.y.abs() <= BOUND && n.z.abs() <= BOUND);
            assert_eq!(n.origin, (n.x, n.y, n.z));
        }
    }

    #[test]
    fn test_rotation_advances_every_frame() {
        let mut net = still(vec![]);
        net.update(Pointer::default());
        net.update(Pointer::default());
        let (rx, ry) = net.rotation();
        assert!((rx - 2.0 * ROTATION_X_STEP).abs() < 1e-12);
        assert!((ry - 2.0 * ROTATION_Y_STEP).abs() < 1e-12);
    }

    #[test]
    fn test_spring_pulls_displaced_node_home() {
        let mut node = Node::at(10.0, -20.0, 30.0);
        node.x += 200.0;
        node.y -= 150.0;
        let mut net = still(vec![node]);
        let start = net.nodes()[0].distance_from_origin();

        let mut last = start;
        for _ in 0..5_000 {
            net.update(Pointer::default());
            let d = net.nodes()[0].distance_from_origin();
            assert!(d <= last + 1e-9);
            last = d;
        }
        assert!(last < start * 0.01);
    }

    #[test]
    fn test_pointer_repels_nearby_nodes_only() {
        let mut net = still(vec![Node::at(50.0, 0.0, 0.0), Node::at(400.0, 400.0, 0.0)]);
        let pointer = Pointer {
            x: 0.0,
            y: 0.0,
            active: true,
        };
        net.update(pointer);

        let near = net.nodes()[0];
        // force = (200 - 50) / 200 = 0.75, push = 50 * 0.75 * 0.05
        assert!((near.x - (50.0 + 1.875 - 51.875 * SPRING + 50.0 * SPRING)).abs() < 1e-9);
        assert!(near.x > 50.0);

        let far = net.nodes()[1];
        assert_eq!((far.x, far.y), (400.0, 400.0));
    }

    #[test]
    fn test_inactive_pointer_has_no_effect() {
        let mut net = still(vec![Node::at(10.0, 10.0, 0.0)]);
        net.update(Pointer {
            x: 0.0,
            y: 0.0,
            active: false,
        });
        assert_eq!(net.nodes()[0].x, 10.0);
    }

    #[test]
    fn test_velocity_reflects_past_bound() {
        let mut node = Node::at(BOUND - 0.1, 0.0, 0.0);
        node.vx = 0.3;
        let mut net = still(vec![node]);
        net.update(Pointer::default());
        assert!(net.nodes()[0].vx < 0.0);
    }

    #[test]
    fn test_resize_keeps_node_state() {
        let mut net = NeuralNetwork::with_rng(
            NetworkOptions::default(),
            Viewport::new(800.0, 600.0),
            StdRng::seed_from_u64(5),
        );
        for _ in 0..5 {
            net.update(Pointer::default());
        }
        let nodes = net.nodes().to_vec();
        let rotation = net.rotation();
        let pulses = net.pulses().to_vec();

        net.resize(Viewport::new(320.0, 200.0));
        assert_eq!(net.nodes(), nodes.as_slice());
        assert_eq!(net.rotation(), rotation);
        assert_eq!(net.pulses(), pulses.as_slice());

        // Only the projection center moves.
        let center = net.project(&Node::at(0.0, 0.0, 0.0));
        assert_eq!((center.x, center.y), (160.0, 100.0));
    }

    #[test]
    fn test_projection_at_rest_is_centered_perspective() {
        let net = still(vec![]);
        let p = net.project(&Node::at(100.0, 50.0, 0.0));
        assert_eq!(p.scale, 1.0);
        assert_eq!((p.x, p.y), (500.0, 350.0));

        let behind = net.project(&Node::at(100.0, 0.0, 600.0));
        assert!((behind.scale - 0.5).abs() < 1e-12);

        // Depth clamps the divisor so points past the camera stay finite.
        let past = net.project(&Node::at(0.0, 0.0, -5_000.0));
        assert_eq!(past.scale, 60.0);
    }

    #[test]
    fn test_pulses_progress_monotonically_and_retire_once() {
        let mut net = still(vec![Node::at(0.0, 0.0, 0.0), Node::at(50.0, 0.0, 0.0)]);
        net.pulses.push(Pulse {
            from: 0,
            to: 1,
            progress: 0.0,
            speed: 0.3,
        });

        let mut seen = vec![];
        for _ in 0..10 {
            net.update(Pointer::default());
            if let Some(p) = net.pulses().iter().find(|p| p.speed == 0.3) {
                seen.push(p.progress);
            }
        }
        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(seen.iter().all(|p| *p < 1.0));
    }

    #[test]
    fn test_pulse_population_is_capped() {
        let nodes: Vec<Node> = (0..40).map(|i| Node::at(i as f64, 0.0, 0.0)).collect();
        let mut net = still(nodes);
        for _ in 0..2_000 {
            net.update(Pointer::default());
            assert!(net.pulses().len() <= MAX_PULSES);
        }
        assert!(!net.pulses().is_empty());
    }

    #[test]
    fn test_edges_only_below_connection_distance() {
        let net = still(vec![
            Node::at(0.0, 0.0, 0.0),
            Node::at(100.0, 0.0, 0.0),
            Node::at(0.0, 0.0, 400.0),
        ]);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        net.draw(&mut surface, &FrameContext::default());

        assert_eq!(surface.lines.len(), 1);
        assert_eq!(surface.dots.len(), 3);
        assert_eq!(surface.glows.len(), 3);
    }

    #[test]
    fn test_closer_edges_render_heavier() {
        let net = still(vec![
            Node::at(0.0, 0.0, -200.0),
            Node::at(100.0, 0.0, -200.0),
            Node::at(0.0, 0.0, 300.0),
            Node::at(100.0, 0.0, 300.0),
        ]);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        net.draw(&mut surface, &FrameContext::default());

        assert_eq!(surface.lines.len(), 2);
        let (near, far) = (&surface.lines[0], &surface.lines[1]);
        assert!(near.2 > far.2);
        assert!(near.3.a > far.3.a);
    }

    #[test]
    fn test_shimmer_stays_in_band() {
        for idx in 0..60 {
            for ms in (0..5_000).step_by(97) {
                let m = shimmer(ms as f64 / 1000.0, idx);
                assert!((1.7..=3.3).contains(&m));
            }
        }
    }
}
