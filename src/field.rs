//! The particle field: bounds, particles, and the connection pass.
//!
//! A [`SimulationField`] owns every particle and advances them together. Each
//! frame it updates all particles, then links every pair closer than the
//! connection radius:
//!
//! ```ignore
//! use plexus::{Bounds, FieldConfig, SimulationField};
//!
//! let mut field = SimulationField::new(&FieldConfig::default(), Bounds::new(800.0, 600.0));
//!
//! // In your frame loop:
//! let frame = field.step(now_millis);
//! println!("{} connections at {} fps", frame.stats.active_connections, frame.stats.fps);
//! field.draw(&mut surface, now_millis);
//! ```
//!
//! ## Cost
//!
//! The connection pass compares every unordered pair, O(n²) in the particle
//! count, with no spatial index. Particle counts stay in the low hundreds,
//! and the count together with the connection radius is exactly what the
//! [`PerformancePreset`](crate::PerformancePreset)s trade off.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{FieldConfig, PerformancePreset};
use crate::particle::{Particle, ParticleId};
use crate::surface::DrawSurface;
use crate::theme::{ColorTheme, Rgba};
use crate::time::FpsCounter;

/// Smallest and largest base radius of generated particles.
pub const RADIUS_RANGE: std::ops::Range<f32> = 2.0..5.0;

/// Connection lines are drawn at this fraction of their opacity.
const CONNECTION_ALPHA: f32 = 0.3;
const CONNECTION_MIN_WIDTH: f32 = 0.5;
const CONNECTION_MAX_WIDTH: f32 = 2.0;

/// Width and height of the drawing area in pixels.
///
/// Both dimensions are clamped to at least 1 so random placement never
/// samples from an empty range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    width: f32,
    height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whether the point lies inside `[0, width] x [0, height]`.
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Uniformly random point inside the bounds.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(rng.gen::<f32>() * self.width, rng.gen::<f32>() * self.height)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() {
        value.max(1.0)
    } else {
        1.0
    }
}

/// A link between two particles closer than the connection radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Index of the first particle in the field, always below `b`.
    pub a: usize,
    /// Index of the second particle in the field.
    pub b: usize,
    pub from: Vec2,
    pub to: Vec2,
    pub distance: f32,
    /// `1 - distance / connection_radius`, in `(0, 1]`.
    pub opacity: f32,
}

impl Connection {
    /// Emit the connection line.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        let color = Rgba::WHITE.with_alpha(self.opacity * CONNECTION_ALPHA);
        let width = (CONNECTION_MAX_WIDTH * self.opacity).max(CONNECTION_MIN_WIDTH);
        surface.stroke_line(self.from, self.to, width, color);
    }
}

/// Aggregate figures for the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub particle_count: usize,
    pub active_connections: usize,
    pub fps: u32,
}

/// Result of one [`SimulationField::step`].
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub connections: &'a [Connection],
    pub stats: FrameStats,
}

/// Owner of all particles and the per-frame pipeline.
#[derive(Debug)]
pub struct SimulationField {
    bounds: Bounds,
    particles: Vec<Particle>,
    connection_radius: f32,
    speed_factor: f32,
    theme: ColorTheme,
    connections: Vec<Connection>,
    fps: FpsCounter,
    rng: SmallRng,
}

impl SimulationField {
    /// Build a field and populate it from `config`.
    pub fn new(config: &FieldConfig, bounds: Bounds) -> Self {
        Self::with_rng(config, bounds, SmallRng::from_entropy())
    }

    /// Build a field with a fixed seed, for reproducible layouts.
    pub fn seeded(config: &FieldConfig, bounds: Bounds, seed: u64) -> Self {
        Self::with_rng(config, bounds, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: &FieldConfig, bounds: Bounds, rng: SmallRng) -> Self {
        let mut field = Self {
            bounds,
            particles: Vec::new(),
            connection_radius: config.connection_radius,
            speed_factor: config.speed_factor,
            theme: config.theme,
            connections: Vec::new(),
            fps: FpsCounter::new(),
            rng,
        };
        field.regenerate(config.particle_count, config.theme, config.speed_factor, bounds);
        field
    }

    // ========== Regeneration ==========

    /// Throw away every particle and create `count` new ones.
    ///
    /// Positions are uniform in the bounds, colors uniform over the theme's
    /// palette, base radii uniform in `[2, 5)`.
    pub fn regenerate(&mut self, count: usize, theme: ColorTheme, speed_factor: f32, bounds: Bounds) {
        self.theme = theme;
        self.speed_factor = speed_factor;
        self.bounds = bounds;
        self.connections.clear();

        let rng = &mut self.rng;
        self.particles = (0..count)
            .map(|_| {
                let position = bounds.random_point(rng);
                let radius = rng.gen_range(RADIUS_RANGE);
                let color = theme.sample(rng);
                Particle::new(position, radius, color, bounds, speed_factor, rng)
            })
            .collect();

        log::debug!(
            "Regenerated {} particles ({} theme, {:.0}x{:.0})",
            count,
            theme,
            bounds.width(),
            bounds.height()
        );
    }

    /// Adopt new bounds. Equivalent to a full reset at the current count.
    pub fn resize(&mut self, bounds: Bounds) {
        let count = self.particles.len();
        self.regenerate(count, self.theme, self.speed_factor, bounds);
    }

    /// Regenerate with a different number of particles.
    pub fn set_particle_count(&mut self, count: usize) {
        self.regenerate(count, self.theme, self.speed_factor, self.bounds);
    }

    /// Regenerate with a different palette.
    pub fn set_theme(&mut self, theme: ColorTheme) {
        let count = self.particles.len();
        self.regenerate(count, theme, self.speed_factor, self.bounds);
    }

    /// Apply a preset's particle count and connection radius.
    pub fn apply_preset(&mut self, preset: PerformancePreset) {
        log::info!("Applying {:?} performance preset", preset);
        self.connection_radius = preset.connection_radius();
        self.set_particle_count(preset.particle_count());
    }

    // ========== Live changes ==========

    /// Rescale every velocity to magnitude `factor`, keeping its heading.
    ///
    /// A particle at rest has no heading and keeps its zero velocity.
    pub fn set_speed_factor(&mut self, factor: f32) {
        self.speed_factor = factor;
        for particle in &mut self.particles {
            let velocity = particle.velocity();
            if let Some(direction) = velocity.try_normalize() {
                particle.set_velocity(direction * factor);
            }
        }
    }

    /// Change the connection distance. Takes effect on the next pass.
    pub fn set_connection_radius(&mut self, radius: f32) {
        self.connection_radius = radius;
    }

    // ========== Insertion ==========

    /// Append one particle at `position`; everything else is untouched.
    pub fn add_particle(&mut self, position: Vec2, color: Rgba, radius: f32) -> ParticleId {
        let particle = Particle::new(position, radius, color, self.bounds, self.speed_factor, &mut self.rng);
        let id = particle.id();
        self.particles.push(particle);
        id
    }

    /// Append one particle with a palette color and a random radius.
    pub fn spawn_at(&mut self, position: Vec2) -> ParticleId {
        let color = self.theme.sample(&mut self.rng);
        let radius = self.rng.gen_range(RADIUS_RANGE);
        self.add_particle(position, color, radius)
    }

    // ========== Per-frame ==========

    /// Link every pair of particles closer than the connection radius.
    ///
    /// Resets and recounts every particle's connection counter. Quadratic in
    /// the particle count.
    pub fn compute_connections(&mut self) -> &[Connection] {
        self.connections.clear();
        for particle in &mut self.particles {
            particle.reset_connections();
        }

        let radius = self.connection_radius;
        let n = self.particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let distance = self.particles[i].distance_to(&self.particles[j]);
                if distance < radius {
                    self.connections.push(Connection {
                        a: i,
                        b: j,
                        from: self.particles[i].position(),
                        to: self.particles[j].position(),
                        distance,
                        opacity: 1.0 - distance / radius,
                    });
                    self.particles[i].add_connection();
                    self.particles[j].add_connection();
                }
            }
        }

        &self.connections
    }

    /// Advance one frame: update every particle, then recompute connections.
    pub fn step(&mut self, now_millis: f64) -> Frame<'_> {
        for particle in &mut self.particles {
            particle.update(now_millis);
        }
        self.compute_connections();
        self.fps.tick(now_millis);

        Frame {
            connections: &self.connections,
            stats: self.stats(),
        }
    }

    /// Draw connections first, then particles in creation order.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, now_millis: f64) {
        for connection in &self.connections {
            connection.draw(surface);
        }
        for particle in &self.particles {
            particle.draw(surface, now_millis);
        }
    }

    // ========== Accessors ==========

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            particle_count: self.particles.len(),
            active_connections: self.connections.len(),
            fps: self.fps.fps(),
        }
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id() == id)
    }

    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.iter_mut().find(|p| p.id() == id)
    }

    /// Connections from the last pass.
    #[inline]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    #[inline]
    pub fn active_connections(&self) -> usize {
        self.connections.len()
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn connection_radius(&self) -> f32 {
        self.connection_radius
    }

    #[inline]
    pub fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    #[inline]
    pub fn theme(&self) -> ColorTheme {
        self.theme
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
