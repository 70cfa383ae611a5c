//! Pointer and touch interaction.
//!
//! The [`InteractionController`] turns pointer input into particle state:
//!
//! - **Hover**: while the pointer is active, the first particle (in field
//!   order) within the hover radius is highlighted; every other particle is
//!   not. Resolved once per frame.
//! - **Selection**: a click selects the first particle whose hit radius
//!   contains the click. At most one particle is selected at a time.
//! - **Long press**: a touch held still for [`LONG_PRESS_MS`] acts as a click
//!   at the touch point. Moving the finger cancels it.
//! - **Release**: after a touch ends, the pointer stays active for
//!   [`TOUCH_RELEASE_MS`] so the hovered particle stays readable.
//! - **Creation pulse**: a double click spawns a particle that glows at full
//!   strength for [`PULSE_MS`] without being selected.
//!
//! The controller only remembers particle ids. Lookups that no longer match a
//! particle (after the field regenerated) are treated as empty.

use glam::Vec2;

use crate::field::SimulationField;
use crate::input::InputEvent;
use crate::particle::{Particle, ParticleId};
use crate::schedule::DeferredSlot;

/// Default pointer distance for hover.
pub const HOVER_RADIUS: f32 = 50.0;

/// How long a touch must be held before it selects.
pub const LONG_PRESS_MS: f64 = 300.0;

/// How long the pointer stays active after a touch ends.
pub const TOUCH_RELEASE_MS: f64 = 1000.0;

/// Duration of the glow given to a user-created particle.
pub const PULSE_MS: f64 = 1000.0;

/// What a click that hits no particle does to the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissPolicy {
    /// Leave the current selection alone.
    #[default]
    Keep,
    /// Deselect the current selection.
    Clear,
}

/// Deferred pointer actions.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerAction {
    /// Select whatever sits under the held touch point.
    LongPress(Vec2),
    /// Deactivate the pointer after a touch ended.
    Release,
}

/// A particle kept at full glow until `expires_at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub particle: ParticleId,
    pub expires_at: f64,
}

/// Hover, selection and touch-gesture state.
#[derive(Debug, Clone)]
pub struct InteractionController {
    pointer: Option<Vec2>,
    active: bool,
    hovered: Option<ParticleId>,
    selected: Option<ParticleId>,
    hover_radius: f32,
    miss_policy: MissPolicy,
    pending: DeferredSlot<PointerAction>,
    pulses: Vec<Pulse>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            pointer: None,
            active: false,
            hovered: None,
            selected: None,
            hover_radius: HOVER_RADIUS,
            miss_policy: MissPolicy::default(),
            pending: DeferredSlot::new(),
            pulses: Vec::new(),
        }
    }

    /// Set the hover distance in pixels.
    pub fn with_hover_radius(mut self, radius: f32) -> Self {
        self.hover_radius = radius;
        self
    }

    /// Set what a missed click does to the selection.
    pub fn with_miss_policy(mut self, policy: MissPolicy) -> Self {
        self.miss_policy = policy;
        self
    }

    pub fn set_hover_radius(&mut self, radius: f32) {
        self.hover_radius = radius;
    }

    // ========== Pointer ==========

    /// Track the pointer at `position` and mark it active.
    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer = Some(position);
        self.active = true;
    }

    /// Mark the pointer inactive. The last position is kept.
    pub fn clear_pointer(&mut self) {
        self.active = false;
    }

    /// Pointer position, if the pointer is active.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer.filter(|_| self.active)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    // ========== Hover ==========

    /// Highlight the hovered particle using the configured hover radius.
    pub fn resolve_hover(&mut self, particles: &mut [Particle]) -> Option<ParticleId> {
        self.resolve_hover_within(particles, self.hover_radius)
    }

    /// Highlight the first particle within `threshold` of the pointer and
    /// unhighlight every other one.
    ///
    /// "First" is field order, not distance: when several particles are in
    /// range, the earliest created wins.
    pub fn resolve_hover_within(&mut self, particles: &mut [Particle], threshold: f32) -> Option<ParticleId> {
        let hit = self
            .pointer()
            .and_then(|pointer| particles.iter().position(|p| p.is_near(pointer, threshold)));

        for (i, particle) in particles.iter_mut().enumerate() {
            if Some(i) == hit {
                particle.highlight();
            } else {
                particle.unhighlight();
            }
        }

        self.hovered = hit.map(|i| particles[i].id());
        self.hovered
    }

    // ========== Selection ==========

    /// Select the first particle whose hit radius contains `position`.
    ///
    /// On a hit the previous selection is deselected first. On a miss the
    /// configured [`MissPolicy`] applies.
    pub fn resolve_click(&mut self, particles: &mut [Particle], position: Vec2) -> Option<ParticleId> {
        self.select_at(particles, position, self.miss_policy)
    }

    fn select_at(&mut self, particles: &mut [Particle], position: Vec2, on_miss: MissPolicy) -> Option<ParticleId> {
        let Some(hit) = particles.iter().position(|p| p.is_near(position, p.hit_radius())) else {
            if on_miss == MissPolicy::Clear {
                self.deselect(particles);
            }
            return None;
        };

        self.deselect(particles);
        let particle = &mut particles[hit];
        particle.select();
        self.selected = Some(particle.id());
        self.selected
    }

    /// Clear the current selection, if any.
    pub fn deselect(&mut self, particles: &mut [Particle]) {
        if let Some(id) = self.selected.take() {
            if let Some(particle) = particles.iter_mut().find(|p| p.id() == id) {
                particle.deselect();
            }
        }
    }

    // ========== Creation ==========

    /// Spawn a particle at `position` and start its creation pulse.
    pub fn create_at_point(&mut self, field: &mut SimulationField, position: Vec2, now_millis: f64) -> ParticleId {
        let id = field.spawn_at(position);
        if let Some(particle) = field.particle_mut(id) {
            particle.pulse();
        }
        self.pulses.push(Pulse {
            particle: id,
            expires_at: now_millis + PULSE_MS,
        });
        id
    }

    // ========== Touch ==========

    /// Finger down: track it and arm the long-press selection.
    pub fn touch_start(&mut self, position: Vec2, now_millis: f64) {
        self.set_pointer(position);
        self.pending.arm(PointerAction::LongPress(position), now_millis, LONG_PRESS_MS);
    }

    /// Finger moved: follow it and cancel any pending long press.
    pub fn touch_move(&mut self, position: Vec2) {
        self.pending.cancel();
        self.set_pointer(position);
    }

    /// Finger lifted: cancel the long press and release the pointer later.
    pub fn touch_end(&mut self, now_millis: f64) {
        self.pending.arm(PointerAction::Release, now_millis, TOUCH_RELEASE_MS);
    }

    // ========== Per-frame ==========

    /// Run the due deferred action and keep pulses alive.
    pub fn tick(&mut self, particles: &mut [Particle], now_millis: f64) {
        match self.pending.take_due(now_millis) {
            // A long press that misses never clears the selection.
            Some(PointerAction::LongPress(position)) => {
                self.select_at(particles, position, MissPolicy::Keep);
            }
            Some(PointerAction::Release) => {
                self.clear_pointer();
            }
            None => {}
        }

        self.pulses.retain(|pulse| {
            if now_millis >= pulse.expires_at {
                return false;
            }
            match particles.iter_mut().find(|p| p.id() == pulse.particle) {
                Some(particle) => {
                    particle.pulse();
                    true
                }
                None => false,
            }
        });
    }

    /// Route one input event.
    ///
    /// Every pointer event cancels whatever deferred action was pending before
    /// it is applied.
    pub fn handle_event(&mut self, event: InputEvent, field: &mut SimulationField, now_millis: f64) {
        if event.is_pointer() {
            self.pending.cancel();
        }

        match event {
            InputEvent::PointerMoved(position) => self.set_pointer(position),
            InputEvent::PointerLeft => {
                self.clear_pointer();
                self.hovered = None;
            }
            InputEvent::Click(position) => {
                self.resolve_click(field.particles_mut(), position);
            }
            InputEvent::DoubleClick(position) => {
                self.create_at_point(field, position, now_millis);
            }
            InputEvent::TouchStart(position) => self.touch_start(position, now_millis),
            InputEvent::TouchMove(position) => self.touch_move(position),
            InputEvent::TouchEnd => self.touch_end(now_millis),
            InputEvent::Key(_) => {}
        }
    }

    /// Drop every particle reference. Call after the field regenerates.
    pub fn forget(&mut self) {
        self.hovered = None;
        self.selected = None;
        self.pulses.clear();
        if matches!(self.pending.pending().map(|d| d.action), Some(PointerAction::LongPress(_))) {
            self.pending.cancel();
        }
    }

    // ========== Accessors ==========

    #[inline]
    pub fn hovered(&self) -> Option<ParticleId> {
        self.hovered
    }

    #[inline]
    pub fn selected(&self) -> Option<ParticleId> {
        self.selected
    }

    #[inline]
    pub fn hover_radius(&self) -> f32 {
        self.hover_radius
    }

    #[inline]
    pub fn miss_policy(&self) -> MissPolicy {
        self.miss_policy
    }

    /// Creation pulses still running.
    #[inline]
    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    /// Whether a long press or touch release is waiting.
    #[inline]
    pub fn has_pending_action(&self) -> bool {
        self.pending.is_armed()
    }
}
