//! A single drifting, pulsating particle.
//!
//! Particles move a fixed step per frame, bounce elastically off the field
//! bounds and pulse their radius on a sine wave driven by wall-clock time. Each
//! one gets its own pulsation rate, phase and amplitude at creation so no two
//! particles breathe in sync.
//!
//! Interaction state lives on the particle but is driven from outside:
//! the [`InteractionController`](crate::InteractionController) decides which
//! particle is highlighted or selected, and the
//! [`SimulationField`](crate::SimulationField) writes the connection count.

use std::f32::consts::TAU;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;
use rand::Rng;

use crate::field::Bounds;
use crate::surface::{DrawSurface, RadialGradient};
use crate::theme::Rgba;

/// Radius pulsation amplitude per unit of `max_radius_multiplier`.
pub const OSCILLATION_AMPLITUDE: f32 = 0.2;

/// Glow lost per update.
pub const GLOW_DECAY: f32 = 0.05;

/// Halo growth per unit of glow intensity.
const HALO_SPREAD: f32 = 0.7;

/// Halo intensity used for a hovered (but not selected) particle.
const HIGHLIGHT_INTENSITY: f32 = 0.7;

/// Angular speed of the selection indicator, radians per millisecond.
const INDICATOR_SPEED: f64 = 0.003;

const INDICATOR_WIDTH: f32 = 2.0;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique particle identifier, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u64);

impl ParticleId {
    fn next() -> Self {
        ParticleId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    #[inline]
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A particle in the field.
#[derive(Debug, Clone)]
pub struct Particle {
    id: ParticleId,
    position: Vec2,
    velocity: Vec2,
    radius: f32,
    current_radius: f32,
    color: Rgba,
    bounds: Bounds,

    // Pulsation signature, fixed at creation
    oscillation_rate: f32,
    oscillation_offset: f32,
    max_radius_multiplier: f32,

    // Interaction
    highlighted: bool,
    selected: bool,
    glow: f32,
    connections: usize,

    // Display metadata, refreshed each update
    speed: f32,
    heading: f32,
}

impl Particle {
    /// Create a particle at `position` moving in a random direction.
    ///
    /// Each velocity component is drawn uniformly from
    /// `[-speed_factor, speed_factor]`. A non-positive `radius` is raised to a
    /// tiny positive value so the particle stays drawable and hit-testable.
    pub fn new<R: Rng + ?Sized>(
        position: Vec2,
        radius: f32,
        color: Rgba,
        bounds: Bounds,
        speed_factor: f32,
        rng: &mut R,
    ) -> Self {
        let velocity = Vec2::new(
            (rng.gen::<f32>() - 0.5) * 2.0 * speed_factor,
            (rng.gen::<f32>() - 0.5) * 2.0 * speed_factor,
        );
        let radius = radius.max(f32::EPSILON);

        let mut particle = Self {
            id: ParticleId::next(),
            position,
            velocity,
            radius,
            current_radius: radius,
            color,
            bounds,
            oscillation_rate: rng.gen::<f32>() * 0.02 + 0.01,
            oscillation_offset: rng.gen::<f32>() * TAU,
            max_radius_multiplier: rng.gen::<f32>() * 0.5 + 1.0,
            highlighted: false,
            selected: false,
            glow: 0.0,
            connections: 0,
            speed: 0.0,
            heading: 0.0,
        };
        particle.refresh_metadata();
        particle
    }

    // ========== Simulation ==========

    /// Advance one frame.
    ///
    /// Moves by the velocity, bounces off the bounds, recomputes the pulsing
    /// radius for `now_millis` and lets residual glow fade.
    pub fn update(&mut self, now_millis: f64) {
        self.position += self.velocity;

        let (x, vx) = bounce(self.position.x, self.velocity.x, self.radius, self.bounds.width());
        let (y, vy) = bounce(self.position.y, self.velocity.y, self.radius, self.bounds.height());
        self.position = Vec2::new(x, y);
        self.velocity = Vec2::new(vx, vy);

        self.current_radius = self.radius * self.radius_multiplier(now_millis);

        if self.glow > 0.0 {
            self.glow = (self.glow - GLOW_DECAY).max(0.0);
        }

        self.refresh_metadata();
    }

    /// Pulsation factor applied to the base radius at `now_millis`.
    ///
    /// The phase is computed in `f64` so epoch-sized timestamps keep their
    /// precision.
    fn radius_multiplier(&self, now_millis: f64) -> f32 {
        let phase = now_millis * self.oscillation_rate as f64 + self.oscillation_offset as f64;
        let oscillation = phase.sin() as f32;
        1.0 + oscillation * OSCILLATION_AMPLITUDE * self.max_radius_multiplier
    }

    fn refresh_metadata(&mut self) {
        self.speed = self.velocity.length();
        self.heading = self.velocity.y.atan2(self.velocity.x).to_degrees();
    }

    // ========== Geometry ==========

    /// Whether the point lies strictly closer than `threshold`.
    #[inline]
    pub fn is_near(&self, point: Vec2, threshold: f32) -> bool {
        self.position.distance(point) < threshold
    }

    /// Euclidean distance between the two particle centers.
    #[inline]
    pub fn distance_to(&self, other: &Particle) -> f32 {
        self.position.distance(other.position)
    }

    /// Radius within which a click or tap selects this particle.
    ///
    /// Three times the base radius, so bigger particles are easier to hit.
    #[inline]
    pub fn hit_radius(&self) -> f32 {
        self.radius * 3.0
    }

    // ========== Interaction ==========

    pub fn highlight(&mut self) {
        self.highlighted = true;
    }

    pub fn unhighlight(&mut self) {
        self.highlighted = false;
    }

    /// Select and light up at full glow immediately.
    pub fn select(&mut self) {
        self.selected = true;
        self.glow = 1.0;
    }

    /// Clear the selection. Glow fades over the following updates.
    pub fn deselect(&mut self) {
        self.selected = false;
    }

    /// Full glow without selecting.
    pub fn pulse(&mut self) {
        self.glow = 1.0;
    }

    // ========== Drawing ==========

    /// Intensity of the halo, or `None` when there is nothing to draw.
    pub fn halo_intensity(&self) -> Option<f32> {
        if self.selected {
            Some(1.0)
        } else if self.highlighted {
            Some(HIGHLIGHT_INTENSITY)
        } else if self.glow > 0.0 {
            Some(self.glow)
        } else {
            None
        }
    }

    /// Angle of the selection indicator at `now_millis`, in `[0, 2π)`.
    ///
    /// The angle advances at a constant rate; reducing it in `f64` before
    /// narrowing keeps consecutive frames continuous for any timestamp.
    pub fn indicator_angle(now_millis: f64) -> f32 {
        (now_millis * INDICATOR_SPEED).rem_euclid(std::f64::consts::TAU) as f32
    }

    /// Emit this particle's primitives.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, now_millis: f64) {
        surface.fill_circle(self.position, self.current_radius, self.color);

        let Some(intensity) = self.halo_intensity() else {
            return;
        };

        surface.fill_radial_gradient(&RadialGradient {
            center: self.position,
            inner_radius: self.current_radius,
            outer_radius: self.current_radius * (1.0 + intensity * HALO_SPREAD),
            inner_color: self.color,
            outer_color: Rgba::TRANSPARENT_WHITE,
        });

        if self.selected {
            let angle = Self::indicator_angle(now_millis);
            let tip = self.position + Vec2::from_angle(angle) * self.current_radius;
            surface.stroke_line(self.position, tip, INDICATOR_WIDTH, Rgba::WHITE);
        }
    }

    // ========== Accessors ==========

    #[inline]
    pub fn id(&self) -> ParticleId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move the particle without touching its velocity.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        self.refresh_metadata();
    }

    /// Base radius.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Radius after pulsation, as of the last update.
    #[inline]
    pub fn current_radius(&self) -> f32 {
        self.current_radius
    }

    /// Smallest and largest radius this particle can pulse to.
    pub fn radius_range(&self) -> (f32, f32) {
        let swing = OSCILLATION_AMPLITUDE * self.max_radius_multiplier;
        (self.radius * (1.0 - swing), self.radius * (1.0 + swing))
    }

    #[inline]
    pub fn color(&self) -> Rgba {
        self.color
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn oscillation_rate(&self) -> f32 {
        self.oscillation_rate
    }

    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    #[inline]
    pub fn glow(&self) -> f32 {
        self.glow
    }

    /// Peers within the connection radius, as of the last connection pass.
    #[inline]
    pub fn connected_particles(&self) -> usize {
        self.connections
    }

    pub(crate) fn reset_connections(&mut self) {
        self.connections = 0;
    }

    pub(crate) fn add_connection(&mut self) {
        self.connections += 1;
    }

    /// Velocity magnitude in pixels per frame.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Direction of travel in degrees, `(-180, 180]`.
    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Snapshot for an info panel.
    pub fn info(&self) -> ParticleInfo {
        ParticleInfo {
            id: self.id,
            position: self.position,
            speed: self.speed,
            heading: self.heading,
            connections: self.connections,
            oscillation_rate: self.oscillation_rate,
        }
    }
}

/// Clamp one axis into `[radius, extent - radius]`, reflecting the velocity
/// on contact.
fn bounce(pos: f32, vel: f32, radius: f32, extent: f32) -> (f32, f32) {
    if pos < radius {
        (radius, -vel)
    } else if pos > extent - radius {
        (extent - radius, -vel)
    } else {
        (pos, vel)
    }
}

/// Human-readable summary of a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleInfo {
    pub id: ParticleId,
    pub position: Vec2,
    pub speed: f32,
    pub heading: f32,
    pub connections: usize,
    pub oscillation_rate: f32,
}

impl fmt::Display for ParticleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} at ({:.0}, {:.0}) | {:.2} px/frame @ {:.1}° | {} connections | osc {:.3}",
            self.id,
            self.position.x,
            self.position.y,
            self.speed,
            self.heading,
            self.connections,
            self.oscillation_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CommandList, DrawCommand};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn particle_at(x: f32, y: f32, radius: f32) -> Particle {
        Particle::new(
            Vec2::new(x, y),
            radius,
            Rgba::hex(0x0066ff),
            Bounds::new(800.0, 600.0),
            1.0,
            &mut rng(),
        )
    }

    #[test]
    fn test_velocity_within_speed_factor() {
        let mut rng = rng();
        for _ in 0..200 {
            let p = Particle::new(Vec2::ZERO, 3.0, Rgba::WHITE, Bounds::new(100.0, 100.0), 2.5, &mut rng);
            assert!(p.velocity().x.abs() <= 2.5);
            assert!(p.velocity().y.abs() <= 2.5);
            assert!(p.radius() > 0.0);
            assert_eq!(p.glow(), 0.0);
            assert!(!p.is_selected() && !p.is_highlighted());
        }
    }

    #[test]
    fn test_ids_increase() {
        let a = particle_at(10.0, 10.0, 3.0);
        let b = particle_at(10.0, 10.0, 3.0);
        assert!(b.id() > a.id());
    }

    #[test]
    fn test_bounce_left_wall() {
        let mut p = particle_at(5.0, 300.0, 5.0);
        p.set_velocity(Vec2::new(-2.0, 0.0));
        p.update(0.0);

        assert_eq!(p.position(), Vec2::new(5.0, 300.0));
        assert_eq!(p.velocity(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_bounce_only_flips_hit_axis() {
        let mut p = particle_at(795.0, 300.0, 5.0);
        p.set_velocity(Vec2::new(3.0, -1.5));
        p.update(0.0);

        assert_eq!(p.position().x, 795.0);
        assert_eq!(p.velocity(), Vec2::new(-3.0, -1.5));
    }

    #[test]
    fn test_position_stays_in_bounds() {
        let mut rng = rng();
        let bounds = Bounds::new(200.0, 120.0);
        for _ in 0..20 {
            let mut p = Particle::new(Vec2::new(100.0, 60.0), 4.0, Rgba::WHITE, bounds, 6.0, &mut rng);
            for frame in 0..500 {
                p.update(frame as f64 * 16.0);
                let pos = p.position();
                assert!(pos.x >= 4.0 && pos.x <= 196.0, "x out of bounds: {}", pos.x);
                assert!(pos.y >= 4.0 && pos.y <= 116.0, "y out of bounds: {}", pos.y);
            }
        }
    }

    #[test]
    fn test_current_radius_within_range() {
        let mut p = particle_at(400.0, 300.0, 4.0);
        p.set_velocity(Vec2::ZERO);
        let (min, max) = p.radius_range();
        for t in 0..1000 {
            p.update(1_700_000_000_000.0 + t as f64 * 7.0);
            assert!(p.current_radius() >= min - 1e-4);
            assert!(p.current_radius() <= max + 1e-4);
        }
    }

    #[test]
    fn test_is_near_is_strict() {
        let p = particle_at(100.0, 100.0, 3.0);
        assert!(!p.is_near(Vec2::new(150.0, 100.0), 50.0));
        assert!(p.is_near(Vec2::new(149.9, 100.0), 50.0));
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = particle_at(0.0, 0.0, 3.0);
        let b = particle_at(30.0, 40.0, 3.0);
        assert_eq!(a.distance_to(&b), 50.0);
        assert_eq!(b.distance_to(&a), 50.0);
    }

    #[test]
    fn test_select_and_glow_decay() {
        let mut p = particle_at(400.0, 300.0, 3.0);
        p.set_velocity(Vec2::ZERO);

        p.select();
        assert!(p.is_selected());
        assert_eq!(p.glow(), 1.0);

        p.deselect();
        assert!(!p.is_selected());
        assert_eq!(p.glow(), 1.0);

        p.update(0.0);
        assert!((p.glow() - 0.95).abs() < 1e-6);

        for _ in 0..40 {
            p.update(0.0);
        }
        assert_eq!(p.glow(), 0.0);
    }

    #[test]
    fn test_highlight_leaves_glow() {
        let mut p = particle_at(400.0, 300.0, 3.0);
        p.highlight();
        assert!(p.is_highlighted());
        assert_eq!(p.glow(), 0.0);
        p.unhighlight();
        assert!(!p.is_highlighted());
    }

    #[test]
    fn test_draw_plain_particle() {
        let p = particle_at(400.0, 300.0, 3.0);
        let mut list = CommandList::new();
        p.draw(&mut list, 0.0);
        assert_eq!(list.len(), 1);
        assert!(matches!(list.commands()[0], DrawCommand::FillCircle { .. }));
    }

    #[test]
    fn test_draw_highlight_halo() {
        let mut p = particle_at(400.0, 300.0, 4.0);
        p.highlight();
        let mut list = CommandList::new();
        p.draw(&mut list, 0.0);

        assert_eq!(list.len(), 2);
        match &list.commands()[1] {
            DrawCommand::RadialGradient(g) => {
                let expected = p.current_radius() * (1.0 + 0.7 * 0.7);
                assert!((g.outer_radius - expected).abs() < 1e-5);
                assert_eq!(g.inner_radius, p.current_radius());
            }
            other => panic!("expected gradient, got {:?}", other),
        }
    }

    #[test]
    fn test_draw_selected_indicator() {
        let mut p = particle_at(400.0, 300.0, 4.0);
        p.select();
        let mut list = CommandList::new();
        p.draw(&mut list, 1000.0);

        assert_eq!(list.len(), 3);
        match &list.commands()[2] {
            DrawCommand::StrokeLine { from, to, width, color } => {
                assert_eq!(*from, p.position());
                assert!((from.distance(*to) - p.current_radius()).abs() < 1e-3);
                assert_eq!(*width, 2.0);
                assert_eq!(*color, Rgba::WHITE);
            }
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_indicator_angle_continuous() {
        // Straddle a wrap of the angle: the tip must not jump.
        let period = std::f64::consts::TAU / 0.003;
        let before = Vec2::from_angle(Particle::indicator_angle(period * 1000.0 - 1.0));
        let after = Vec2::from_angle(Particle::indicator_angle(period * 1000.0 + 1.0));
        assert!(before.distance(after) < 0.01);

        let a = Particle::indicator_angle(1_700_000_000_000.0);
        assert!((0.0..std::f32::consts::TAU).contains(&a));
    }

    #[test]
    fn test_info_display() {
        let mut p = particle_at(120.4, 44.6, 3.0);
        p.set_velocity(Vec2::new(0.0, 2.0));
        let info = p.info();
        assert_eq!(info.speed, 2.0);
        assert!((info.heading - 90.0).abs() < 1e-4);
        let text = info.to_string();
        assert!(text.contains("(120, 45)"));
        assert!(text.contains("2.00 px/frame"));
    }
}
