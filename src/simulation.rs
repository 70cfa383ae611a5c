//! The caller-owned simulation: one field, one controller, one config.
//!
//! [`Simulation`] wires the per-frame pipeline together so a host only has to
//! forward input, forward configuration changes, and hand over a surface once
//! per display refresh:
//!
//! ```ignore
//! let mut sim = Simulation::new(FieldConfig::default(), Bounds::new(800.0, 600.0))?;
//! let mut surface = RasterSurface::new(800, 600);
//!
//! loop {
//!     let now = clock.now_millis();
//!     for event in input.drain() {
//!         sim.handle_event(event, now);
//!     }
//!     let stats = sim.frame(now, &mut surface);
//! }
//! ```
//!
//! The field and controller are plain owned values. A multi-threaded host
//! should guard the whole `Simulation` with a single lock: the connection
//! pass reads every particle that the update pass mutates.

use crate::config::{FieldConfig, PerformancePreset};
use crate::error::ConfigError;
use crate::field::{Bounds, FrameStats, SimulationField};
use crate::input::InputEvent;
use crate::interaction::{InteractionController, MissPolicy};
use crate::particle::ParticleInfo;
use crate::surface::DrawSurface;
use crate::theme::ColorTheme;

/// A change coming from the host's controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigChange {
    /// Regenerate with this many particles.
    ParticleCount(usize),
    /// Live change of the connection distance.
    ConnectionRadius(f32),
    /// Live rescale of every particle's speed.
    SpeedFactor(f32),
    /// Regenerate with another palette.
    Theme(ColorTheme),
    /// Regenerate with a preset's count and connection distance.
    Preset(PerformancePreset),
    /// New canvas size; regenerates.
    Resize(Bounds),
    /// Live change of the hover distance.
    HoverRadius(f32),
}

/// Field, controller and configuration driven together.
#[derive(Debug)]
pub struct Simulation {
    config: FieldConfig,
    field: SimulationField,
    controller: InteractionController,
}

impl Simulation {
    /// Validate `config` and populate a field of the given size.
    pub fn new(config: FieldConfig, bounds: Bounds) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = SimulationField::new(&config, bounds);
        Ok(Self::from_parts(config, field))
    }

    /// Like [`new`](Self::new) but with a reproducible layout.
    pub fn seeded(config: FieldConfig, bounds: Bounds, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = SimulationField::seeded(&config, bounds, seed);
        Ok(Self::from_parts(config, field))
    }

    fn from_parts(config: FieldConfig, field: SimulationField) -> Self {
        let controller = InteractionController::new().with_hover_radius(config.hover_radius);
        Self { config, field, controller }
    }

    /// Set what a missed click does to the selection.
    pub fn with_miss_policy(mut self, policy: MissPolicy) -> Self {
        self.controller = self.controller.with_miss_policy(policy);
        self
    }

    // ========== Input ==========

    /// Route an input event to the controller.
    ///
    /// Key events are left to the host; map them to [`ConfigChange`]s there.
    pub fn handle_event(&mut self, event: InputEvent, now_millis: f64) {
        let created = matches!(event, InputEvent::DoubleClick(_));
        self.controller.handle_event(event, &mut self.field, now_millis);
        if created {
            self.config.particle_count = self.field.len();
        }
    }

    /// Clear the current selection.
    pub fn deselect(&mut self) {
        self.controller.deselect(self.field.particles_mut());
    }

    // ========== Configuration ==========

    /// Apply a configuration change.
    ///
    /// Rejected values leave the simulation untouched. Changes that regenerate
    /// the field also drop every hover, selection and pulse reference.
    pub fn apply(&mut self, change: ConfigChange) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        match change {
            ConfigChange::ParticleCount(count) => next.particle_count = count,
            ConfigChange::ConnectionRadius(radius) => next.connection_radius = radius,
            ConfigChange::SpeedFactor(factor) => next.speed_factor = factor,
            ConfigChange::Theme(theme) => next.theme = theme,
            ConfigChange::Preset(preset) => next = next.with_preset(preset),
            ConfigChange::HoverRadius(radius) => next.hover_radius = radius,
            ConfigChange::Resize(_) => {}
        }
        next.validate()?;
        self.config = next;

        match change {
            ConfigChange::ParticleCount(count) => {
                self.field.set_particle_count(count);
                self.controller.forget();
            }
            ConfigChange::ConnectionRadius(radius) => self.field.set_connection_radius(radius),
            ConfigChange::SpeedFactor(factor) => self.field.set_speed_factor(factor),
            ConfigChange::Theme(theme) => {
                self.field.set_theme(theme);
                self.controller.forget();
            }
            ConfigChange::Preset(preset) => {
                self.field.apply_preset(preset);
                self.controller.forget();
            }
            ConfigChange::Resize(bounds) => {
                self.field.resize(bounds);
                self.controller.forget();
            }
            ConfigChange::HoverRadius(radius) => self.controller.set_hover_radius(radius),
        }
        Ok(())
    }

    // ========== Per-frame ==========

    /// Advance one frame without drawing.
    ///
    /// Updates particles, recomputes connections, runs due deferred actions
    /// and resolves hover against the updated positions.
    pub fn update(&mut self, now_millis: f64) -> FrameStats {
        let stats = self.field.step(now_millis).stats;
        self.controller.tick(self.field.particles_mut(), now_millis);
        self.controller.resolve_hover(self.field.particles_mut());
        stats
    }

    /// Draw the current state: clear, connections, particles.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, now_millis: f64) {
        surface.clear();
        self.field.draw(surface, now_millis);
    }

    /// [`update`](Self::update) then [`draw`](Self::draw).
    pub fn frame<S: DrawSurface + ?Sized>(&mut self, now_millis: f64, surface: &mut S) -> FrameStats {
        let stats = self.update(now_millis);
        self.draw(surface, now_millis);
        stats
    }

    // ========== Accessors ==========

    #[inline]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[inline]
    pub fn field(&self) -> &SimulationField {
        &self.field
    }

    #[inline]
    pub fn field_mut(&mut self) -> &mut SimulationField {
        &mut self.field
    }

    #[inline]
    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    #[inline]
    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    /// Field and controller borrowed together, for direct calls such as
    /// [`InteractionController::resolve_click`].
    pub fn parts_mut(&mut self) -> (&mut SimulationField, &mut InteractionController) {
        (&mut self.field, &mut self.controller)
    }

    /// Info panel contents for the hovered particle.
    pub fn hovered_info(&self) -> Option<ParticleInfo> {
        self.controller
            .hovered()
            .and_then(|id| self.field.particle(id))
            .map(|p| p.info())
    }

    /// Info panel contents for the selected particle.
    pub fn selected_info(&self) -> Option<ParticleInfo> {
        self.controller
            .selected()
            .and_then(|id| self.field.particle(id))
            .map(|p| p.info())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CommandList, DrawCommand};
    use glam::Vec2;

    fn sim(count: usize) -> Simulation {
        let config = FieldConfig::default().with_particle_count(count);
        Simulation::seeded(config, Bounds::new(800.0, 600.0), 21).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = FieldConfig::default().with_connection_radius(-1.0);
        assert!(Simulation::new(config, Bounds::default()).is_err());
    }

    #[test]
    fn test_frame_clears_first() {
        let mut sim = sim(10);
        let mut list = CommandList::new();
        let stats = sim.frame(16.0, &mut list);

        assert_eq!(stats.particle_count, 10);
        assert_eq!(list.commands()[0], DrawCommand::Clear);
        let circles = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count();
        assert_eq!(circles, 10);
    }

    #[test]
    fn test_apply_live_changes() {
        let mut sim = sim(10);
        let first = sim.field().particles()[0].id();

        sim.apply(ConfigChange::ConnectionRadius(80.0)).unwrap();
        sim.apply(ConfigChange::SpeedFactor(2.0)).unwrap();
        assert_eq!(sim.field().connection_radius(), 80.0);
        assert_eq!(sim.field().particles()[0].id(), first);
        assert_eq!(sim.config().speed_factor, 2.0);
    }

    #[test]
    fn test_apply_rejects_and_keeps_state() {
        let mut sim = sim(10);
        assert!(sim.apply(ConfigChange::SpeedFactor(0.0)).is_err());
        assert_eq!(sim.config().speed_factor, 1.0);
        assert_eq!(sim.field().speed_factor(), 1.0);
    }

    #[test]
    fn test_regenerating_change_drops_selection() {
        let mut sim = sim(0);
        let id = sim.field_mut().add_particle(Vec2::new(100.0, 100.0), crate::Rgba::WHITE, 4.0);
        sim.handle_event(InputEvent::Click(Vec2::new(100.0, 100.0)), 0.0);
        assert_eq!(sim.controller().selected(), Some(id));
        assert!(sim.selected_info().is_some());

        sim.apply(ConfigChange::Theme(ColorTheme::Purple)).unwrap();
        assert_eq!(sim.controller().selected(), None);
        assert_eq!(sim.field().theme(), ColorTheme::Purple);
    }

    #[test]
    fn test_preset_and_resize() {
        let mut sim = sim(10);
        sim.apply(ConfigChange::Preset(PerformancePreset::Low)).unwrap();
        assert_eq!(sim.field().len(), 50);
        assert_eq!(sim.config().connection_radius, 100.0);

        sim.apply(ConfigChange::Resize(Bounds::new(320.0, 240.0))).unwrap();
        assert_eq!(sim.field().len(), 50);
        assert_eq!(sim.field().bounds(), Bounds::new(320.0, 240.0));
    }

    #[test]
    fn test_double_click_syncs_count() {
        let mut sim = sim(3);
        sim.handle_event(InputEvent::DoubleClick(Vec2::new(50.0, 50.0)), 0.0);
        assert_eq!(sim.field().len(), 4);
        assert_eq!(sim.config().particle_count, 4);
    }

    #[test]
    fn test_hover_info() {
        let mut sim = sim(0);
        let id = sim.field_mut().add_particle(Vec2::new(400.0, 300.0), crate::Rgba::WHITE, 3.0);
        sim.field_mut().particle_mut(id).unwrap().set_velocity(Vec2::ZERO);

        sim.handle_event(InputEvent::PointerMoved(Vec2::new(420.0, 300.0)), 0.0);
        sim.update(16.0);
        assert_eq!(sim.hovered_info().map(|i| i.id), Some(id));

        sim.handle_event(InputEvent::PointerLeft, 32.0);
        sim.update(32.0);
        assert!(sim.hovered_info().is_none());
    }
}
