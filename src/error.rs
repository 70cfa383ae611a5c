//! Error types for plexus.
//!
//! The simulation core never fails: degenerate numeric inputs are guarded in
//! place. Errors only surface at the edges, when configuration is parsed or
//! validated, when a frame is exported, and when the viewer window starts.

use std::fmt;

/// Errors produced while parsing or validating a [`FieldConfig`](crate::FieldConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Connection radius must be a positive, finite number of pixels.
    InvalidConnectionRadius(f32),
    /// Speed factor must be positive and finite.
    InvalidSpeedFactor(f32),
    /// Hover radius must be positive and finite.
    InvalidHoverRadius(f32),
    /// Theme name does not match any [`ColorTheme`](crate::ColorTheme).
    UnknownTheme(String),
    /// Configuration JSON could not be parsed or written.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidConnectionRadius(r) => {
                write!(f, "Connection radius must be positive and finite, got {}", r)
            }
            ConfigError::InvalidSpeedFactor(s) => {
                write!(f, "Speed factor must be positive and finite, got {}", s)
            }
            ConfigError::InvalidHoverRadius(r) => {
                write!(f, "Hover radius must be positive and finite, got {}", r)
            }
            ConfigError::UnknownTheme(name) => write!(
                f,
                "Unknown color theme '{}'. Expected one of: blue, green, purple, sunset, grayscale.",
                name
            ),
            ConfigError::Json(e) => write!(f, "Invalid configuration JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Errors that can occur when exporting a rendered frame.
#[derive(Debug)]
pub enum RenderError {
    /// Failed to encode the image.
    Image(image::ImageError),
    /// Failed to write the file to disk.
    Io(std::io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Image(e) => write!(f, "Failed to encode frame: {}", e),
            RenderError::Io(e) => write!(f, "Failed to write frame: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Image(e) => Some(e),
            RenderError::Io(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        RenderError::Image(e)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

/// Errors that can occur when running the interactive viewer.
#[cfg(feature = "viewer")]
#[derive(Debug)]
pub enum ViewerError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// Failed to create or present the software surface.
    Surface(softbuffer::SoftBufferError),
    /// Starting configuration was rejected.
    Config(ConfigError),
}

#[cfg(feature = "viewer")]
impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            ViewerError::Window(e) => write!(f, "Failed to create window: {}", e),
            ViewerError::Surface(e) => write!(f, "Software surface error: {}", e),
            ViewerError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

#[cfg(feature = "viewer")]
impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::EventLoop(e) => Some(e),
            ViewerError::Window(e) => Some(e),
            ViewerError::Surface(e) => Some(e),
            ViewerError::Config(e) => Some(e),
        }
    }
}

#[cfg(feature = "viewer")]
impl From<winit::error::EventLoopError> for ViewerError {
    fn from(e: winit::error::EventLoopError) -> Self {
        ViewerError::EventLoop(e)
    }
}

#[cfg(feature = "viewer")]
impl From<winit::error::OsError> for ViewerError {
    fn from(e: winit::error::OsError) -> Self {
        ViewerError::Window(e)
    }
}

#[cfg(feature = "viewer")]
impl From<softbuffer::SoftBufferError> for ViewerError {
    fn from(e: softbuffer::SoftBufferError) -> Self {
        ViewerError::Surface(e)
    }
}

#[cfg(feature = "viewer")]
impl From<ConfigError> for ViewerError {
    fn from(e: ConfigError) -> Self {
        ViewerError::Config(e)
    }
}
