//! Interactive window.
//!
//! Runs a [`Simulation`] in a winit window, rasterizes each frame on the CPU
//! and presents it through softbuffer. The window title doubles as the stats
//! and info panel. Keys stand in for sliders:
//!
//! | Key | Action |
//! |-----|--------|
//! | arrows | particle count ±10 |
//! | `[` / `]` | connection radius ±10 |
//! | `-` / `=` | speed ±0.1 |
//! | `T` | next theme |
//! | `1` `2` `3` | low / medium / high preset |
//! | `Escape` | deselect |
//! | `S` | save a PNG snapshot |

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::{FieldConfig, PerformancePreset};
use crate::error::ViewerError;
use crate::field::Bounds;
use crate::input::{Input, InputEvent, KeyCode};
use crate::raster::RasterSurface;
use crate::simulation::{ConfigChange, Simulation};
use crate::time::Clock;

const TITLE: &str = "Plexus";

const COUNT_STEP: usize = 10;
const COUNT_RANGE: (usize, usize) = (10, 500);
const RADIUS_STEP: f32 = 10.0;
const RADIUS_RANGE: (f32, f32) = (50.0, 300.0);
const SPEED_STEP: f32 = 0.1;
const SPEED_RANGE: (f32, f32) = (0.1, 3.0);

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Change(ConfigChange),
    Deselect,
    Snapshot,
}

/// Map a key to a command given the current configuration.
///
/// Steps are clamped to the control ranges; a key that would not change
/// anything maps to `None`.
pub fn key_command(key: KeyCode, config: &FieldConfig) -> Option<Command> {
    let change = match key {
        KeyCode::Up | KeyCode::Right => {
            step_count(config.particle_count, COUNT_STEP as isize).map(ConfigChange::ParticleCount)
        }
        KeyCode::Down | KeyCode::Left => {
            step_count(config.particle_count, -(COUNT_STEP as isize)).map(ConfigChange::ParticleCount)
        }
        KeyCode::BracketLeft => step_f32(config.connection_radius, -RADIUS_STEP, RADIUS_RANGE)
            .map(ConfigChange::ConnectionRadius),
        KeyCode::BracketRight => step_f32(config.connection_radius, RADIUS_STEP, RADIUS_RANGE)
            .map(ConfigChange::ConnectionRadius),
        KeyCode::Minus => step_f32(config.speed_factor, -SPEED_STEP, SPEED_RANGE).map(ConfigChange::SpeedFactor),
        KeyCode::Equal => step_f32(config.speed_factor, SPEED_STEP, SPEED_RANGE).map(ConfigChange::SpeedFactor),
        KeyCode::T => Some(ConfigChange::Theme(config.theme.next())),
        KeyCode::Key1 => Some(ConfigChange::Preset(PerformancePreset::Low)),
        KeyCode::Key2 => Some(ConfigChange::Preset(PerformancePreset::Medium)),
        KeyCode::Key3 => Some(ConfigChange::Preset(PerformancePreset::High)),
        KeyCode::Escape => return Some(Command::Deselect),
        KeyCode::S => return Some(Command::Snapshot),
        _ => None,
    };
    change.map(Command::Change)
}

fn step_count(current: usize, delta: isize) -> Option<usize> {
    let next = current
        .saturating_add_signed(delta)
        .clamp(COUNT_RANGE.0, COUNT_RANGE.1);
    (next != current).then_some(next)
}

fn step_f32(current: f32, delta: f32, (min, max): (f32, f32)) -> Option<f32> {
    // Round to one decimal so repeated 0.1 steps do not drift.
    let next = (((current + delta) * 10.0).round() / 10.0).clamp(min, max);
    ((next - current).abs() > f32::EPSILON).then_some(next)
}

/// Window, presentation surface and simulation.
struct App {
    config: FieldConfig,
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    raster: RasterSurface,
    input: Input,
    clock: Clock,
    simulation: Option<Simulation>,
    snapshot_dir: PathBuf,
    snapshots: u32,
    title: String,
    error: Option<ViewerError>,
}

impl App {
    fn new(config: FieldConfig) -> Self {
        Self {
            config,
            window: None,
            surface: None,
            raster: RasterSurface::new(1, 1),
            input: Input::new(),
            clock: Clock::new(),
            simulation: None,
            snapshot_dir: PathBuf::from("snapshots"),
            snapshots: 0,
            title: String::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ViewerError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = Rc::new(event_loop.create_window(attrs)?);

        let context = softbuffer::Context::new(Rc::clone(&window))?;
        let surface = softbuffer::Surface::new(&context, Rc::clone(&window))?;

        let size = window.inner_size();
        let bounds = Bounds::new(size.width as f32, size.height as f32);
        match &mut self.simulation {
            Some(simulation) => simulation.apply(ConfigChange::Resize(bounds))?,
            None => self.simulation = Some(Simulation::new(self.config.clone(), bounds)?),
        }

        self.window = Some(window);
        self.surface = Some(surface);
        self.resize(size.width, size.height)?;
        log::info!("Viewer started at {}x{}", size.width, size.height);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), ViewerError> {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            // Minimized.
            return Ok(());
        };
        if let Some(surface) = &mut self.surface {
            surface.resize(w, h)?;
        }
        self.raster.resize(width, height);
        if let Some(simulation) = &mut self.simulation {
            let bounds = Bounds::new(width as f32, height as f32);
            if simulation.field().bounds() != bounds {
                simulation.apply(ConfigChange::Resize(bounds))?;
            }
        }
        Ok(())
    }

    fn run_command(&mut self, command: Command) -> Result<(), ViewerError> {
        let Some(simulation) = &mut self.simulation else {
            return Ok(());
        };
        match command {
            Command::Change(change) => {
                simulation.apply(change)?;
                log::debug!("Applied {:?}", change);
            }
            Command::Deselect => simulation.deselect(),
            Command::Snapshot => {
                self.snapshots += 1;
                let path = self.snapshot_dir.join(format!("plexus-{:04}.png", self.snapshots));
                match self.raster.save_png(&path) {
                    Ok(()) => log::info!("Saved snapshot to {}", path.display()),
                    Err(e) => log::warn!("Snapshot failed: {}", e),
                }
            }
        }
        Ok(())
    }

    fn redraw(&mut self) -> Result<(), ViewerError> {
        let now = self.clock.now_millis();
        let events: Vec<InputEvent> = self.input.drain().collect();

        for event in events {
            match event {
                InputEvent::Key(key) => {
                    let command = self.simulation.as_ref().and_then(|s| key_command(key, s.config()));
                    if let Some(command) = command {
                        self.run_command(command)?;
                    }
                }
                event => {
                    if let Some(simulation) = &mut self.simulation {
                        simulation.handle_event(event, now);
                    }
                }
            }
        }

        let Some(simulation) = &mut self.simulation else {
            return Ok(());
        };
        let stats = simulation.frame(now, &mut self.raster);

        let mut title = format!(
            "{} | {} particles | {} connections | {} fps",
            TITLE, stats.particle_count, stats.active_connections, stats.fps
        );
        if let Some(info) = simulation.hovered_info().or_else(|| simulation.selected_info()) {
            title.push_str(&format!(" | {}", info));
        }

        if let (Some(window), Some(surface)) = (&self.window, &mut self.surface) {
            if title != self.title {
                window.set_title(&title);
                self.title = title;
            }
            let mut buffer = surface.buffer_mut()?;
            self.raster.copy_to_xrgb(&mut buffer);
            window.pre_present_notify();
            buffer.present()?;
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let result = match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                Ok(())
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {
                self.input.handle_window_event(&event, self.clock.now_millis());
                Ok(())
            }
        };
        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open a window and run until it is closed.
pub fn run(config: FieldConfig) -> Result<(), ViewerError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ColorTheme;

    #[test]
    fn test_arrow_keys_step_count() {
        let config = FieldConfig::default();
        assert_eq!(
            key_command(KeyCode::Up, &config),
            Some(Command::Change(ConfigChange::ParticleCount(110)))
        );
        assert_eq!(
            key_command(KeyCode::Left, &config),
            Some(Command::Change(ConfigChange::ParticleCount(90)))
        );
    }

    #[test]
    fn test_steps_clamp_at_range_ends() {
        let config = FieldConfig::default().with_particle_count(10).with_speed_factor(3.0);
        assert_eq!(key_command(KeyCode::Down, &config), None);
        assert_eq!(key_command(KeyCode::Equal, &config), None);
        assert_eq!(
            key_command(KeyCode::Minus, &config),
            Some(Command::Change(ConfigChange::SpeedFactor(2.9)))
        );
    }

    #[test]
    fn test_other_bindings() {
        let config = FieldConfig::default();
        assert_eq!(
            key_command(KeyCode::T, &config),
            Some(Command::Change(ConfigChange::Theme(ColorTheme::Green)))
        );
        assert_eq!(
            key_command(KeyCode::Key3, &config),
            Some(Command::Change(ConfigChange::Preset(PerformancePreset::High)))
        );
        assert_eq!(
            key_command(KeyCode::BracketRight, &config),
            Some(Command::Change(ConfigChange::ConnectionRadius(160.0)))
        );
        assert_eq!(key_command(KeyCode::Escape, &config), Some(Command::Deselect));
        assert_eq!(key_command(KeyCode::S, &config), Some(Command::Snapshot));
        assert_eq!(key_command(KeyCode::Space, &config), None);
    }
}
