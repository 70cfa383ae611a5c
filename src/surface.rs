//! Immediate-mode 2D drawing surface.
//!
//! The simulation never rasterizes anything itself. Particles and connections
//! describe themselves through the four primitives of [`DrawSurface`], and the
//! caller decides what a primitive means: pixels in a [`RasterSurface`](crate::RasterSurface),
//! calls on a browser canvas, or entries in a [`CommandList`] for inspection.

use glam::Vec2;

use crate::theme::Rgba;

/// Two-stop radial gradient filling a disc.
///
/// Pixels closer than `inner_radius` take `inner_color`; between the radii the
/// color interpolates linearly to `outer_color`; nothing is drawn beyond
/// `outer_radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub inner_color: Rgba,
    pub outer_color: Rgba,
}

impl RadialGradient {
    /// Color at `distance` from the center, or `None` outside the disc.
    pub fn color_at(&self, distance: f32) -> Option<Rgba> {
        if distance > self.outer_radius {
            return None;
        }
        let span = self.outer_radius - self.inner_radius;
        if span <= f32::EPSILON || distance <= self.inner_radius {
            return Some(self.inner_color);
        }
        let t = (distance - self.inner_radius) / span;
        Some(self.inner_color.lerp(self.outer_color, t))
    }
}

/// Target for the primitives the simulation emits each frame.
pub trait DrawSurface {
    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Fill a disc.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Fill a disc with a radial gradient.
    fn fill_radial_gradient(&mut self, gradient: &RadialGradient);

    /// Stroke a straight line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    RadialGradient(RadialGradient),
    StrokeLine { from: Vec2, to: Vec2, width: f32, color: Rgba },
}

/// A surface that records primitives instead of drawing them.
///
/// Useful for forwarding a frame to another renderer and for asserting what a
/// frame would draw.
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded since the last [`take`](Self::take).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Move the recorded commands out, leaving the list empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Replay every recorded command onto another surface.
    pub fn replay<S: DrawSurface + ?Sized>(&self, target: &mut S) {
        for command in &self.commands {
            match *command {
                DrawCommand::Clear => target.clear(),
                DrawCommand::FillCircle { center, radius, color } => {
                    target.fill_circle(center, radius, color)
                }
                DrawCommand::RadialGradient(ref gradient) => target.fill_radial_gradient(gradient),
                DrawCommand::StrokeLine { from, to, width, color } => {
                    target.stroke_line(from, to, width, color)
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl DrawSurface for CommandList {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient) {
        self.commands.push(DrawCommand::RadialGradient(*gradient));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::StrokeLine { from, to, width, color });
    }
}
