//! # Plexus
//!
//! An interactive 2D particle field. Particles drift, bounce off the edges,
//! breathe in size, and link to every neighbor within a connection radius
//! with a line that fades with distance. The pointer highlights, selects and
//! spawns particles.
//!
//! Plexus owns no clock and no window. The host drives it once per display
//! refresh with a millisecond timestamp and a [`DrawSurface`] to paint on;
//! the `viewer` feature (on by default) provides a ready-made winit window.
//!
//! ## Quick Start
//!
//! ```ignore
//! use plexus::prelude::*;
//!
//! let config = FieldConfig::default()
//!     .with_particle_count(150)
//!     .with_theme(ColorTheme::Sunset);
//!
//! let mut sim = Simulation::new(config, Bounds::new(800.0, 600.0))?;
//! let mut surface = RasterSurface::new(800, 600);
//!
//! sim.handle_event(InputEvent::PointerMoved(Vec2::new(400.0, 300.0)), 0.0);
//! let stats = sim.frame(16.0, &mut surface);
//! surface.save_png("frame.png")?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! A [`Particle`] carries its own motion, an oscillating radius, a color from
//! the active [`ColorTheme`], and interaction flags. It draws itself as a
//! core, an optional halo, and a spinning ring when selected.
//!
//! ### Field
//!
//! The [`SimulationField`] owns all particles. Each [`step`](SimulationField::step)
//! updates them and recomputes [`Connection`]s between every pair closer than
//! the connection radius. Changing the count, theme or size regenerates the
//! whole population; speed and radius change live.
//!
//! ### Interaction
//!
//! The [`InteractionController`] turns pointer and touch [`InputEvent`]s into
//! hover, selection and creation. Touch delays (long press, lingering release)
//! are deferred actions polled each frame rather than timers.
//!
//! ### Drawing
//!
//! Everything draws through the [`DrawSurface`] trait. [`RasterSurface`] is a
//! software rasterizer over an RGBA image; [`CommandList`] records the calls.
//!
//! ## Presets
//!
//! | Preset | Particles | Connection radius |
//! |--------|-----------|-------------------|
//! | [`PerformancePreset::Low`] | 50 | 100 |
//! | [`PerformancePreset::Medium`] | 100 | 150 |
//! | [`PerformancePreset::High`] | 200 | 200 |

pub mod config;
pub mod error;
pub mod field;
pub mod input;
pub mod interaction;
pub mod particle;
pub mod raster;
pub mod schedule;
pub mod simulation;
pub mod surface;
pub mod theme;
pub mod time;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use config::{FieldConfig, PerformancePreset};
pub use error::{ConfigError, RenderError};
#[cfg(feature = "viewer")]
pub use error::ViewerError;
pub use field::{Bounds, Connection, Frame, FrameStats, SimulationField};
pub use glam::Vec2;
pub use input::{Input, InputEvent, KeyCode};
pub use interaction::{InteractionController, MissPolicy};
pub use particle::{Particle, ParticleId, ParticleInfo};
pub use raster::RasterSurface;
pub use simulation::{ConfigChange, Simulation};
pub use surface::{CommandList, DrawCommand, DrawSurface, RadialGradient};
pub use theme::{ColorTheme, Rgba};
pub use time::{Clock, FpsCounter};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use plexus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{FieldConfig, PerformancePreset};
    pub use crate::field::{Bounds, FrameStats, SimulationField};
    pub use crate::input::{Input, InputEvent, KeyCode};
    pub use crate::interaction::{InteractionController, MissPolicy};
    pub use crate::particle::{Particle, ParticleId};
    pub use crate::raster::RasterSurface;
    pub use crate::simulation::{ConfigChange, Simulation};
    pub use crate::surface::DrawSurface;
    pub use crate::theme::{ColorTheme, Rgba};
    pub use crate::time::Clock;
    pub use crate::Vec2;
}
