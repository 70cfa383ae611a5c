//! Input events.
//!
//! The simulation consumes [`InputEvent`]s, a small toolkit-independent
//! vocabulary of pointer, touch and key events. Any host can produce them;
//! with the `viewer` feature, [`Input`] builds them from winit window events,
//! synthesizing double clicks (which winit does not report) from pairs of
//! nearby presses.
//!
//! ```ignore
//! // In a winit ApplicationHandler:
//! input.handle_window_event(&event, clock.now_millis());
//! for event in input.drain() {
//!     simulation.handle_event(event, now);
//! }
//! ```

use glam::Vec2;

#[cfg(feature = "viewer")]
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
#[cfg(feature = "viewer")]
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Two presses closer than this in time form a double click.
pub const DOUBLE_CLICK_MS: f64 = 500.0;

/// Two presses farther apart than this never form a double click.
pub const DOUBLE_CLICK_SLOP: f32 = 4.0;

/// Keys the simulation and viewer react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Arrows
    Up, Down, Left, Right,

    // Digits
    Key1, Key2, Key3,

    // Letters
    S, T,

    // Punctuation
    Minus, Equal, BracketLeft, BracketRight,

    // Common keys
    Space, Enter, Escape,

    // Other
    Other(u32),
}

#[cfg(feature = "viewer")]
impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            WinitKeyCode::ArrowLeft => KeyCode::Left,
            WinitKeyCode::ArrowRight => KeyCode::Right,

            WinitKeyCode::Digit1 => KeyCode::Key1,
            WinitKeyCode::Digit2 => KeyCode::Key2,
            WinitKeyCode::Digit3 => KeyCode::Key3,

            WinitKeyCode::KeyS => KeyCode::S,
            WinitKeyCode::KeyT => KeyCode::T,

            WinitKeyCode::Minus => KeyCode::Minus,
            WinitKeyCode::Equal => KeyCode::Equal,
            WinitKeyCode::BracketLeft => KeyCode::BracketLeft,
            WinitKeyCode::BracketRight => KeyCode::BracketRight,

            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Enter => KeyCode::Enter,
            WinitKeyCode::Escape => KeyCode::Escape,

            _ => KeyCode::Other(key as u32),
        }
    }
}

/// One discrete input occurrence, in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse moved over the canvas.
    PointerMoved(Vec2),
    /// Mouse left the canvas.
    PointerLeft,
    /// Primary button clicked.
    Click(Vec2),
    /// Second click of a double click. Always follows a `Click`.
    DoubleClick(Vec2),
    /// First finger touched down.
    TouchStart(Vec2),
    /// Tracked finger moved.
    TouchMove(Vec2),
    /// Tracked finger lifted or the touch was cancelled.
    TouchEnd,
    /// Key pressed (no repeats).
    Key(KeyCode),
}

impl InputEvent {
    /// Whether this event comes from a mouse or a finger.
    pub fn is_pointer(&self) -> bool {
        !matches!(self, InputEvent::Key(_))
    }

    /// Position carried by the event, if any.
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            InputEvent::PointerMoved(p)
            | InputEvent::Click(p)
            | InputEvent::DoubleClick(p)
            | InputEvent::TouchStart(p)
            | InputEvent::TouchMove(p) => Some(p),
            InputEvent::PointerLeft | InputEvent::TouchEnd | InputEvent::Key(_) => None,
        }
    }
}

/// Phase of a touch point, mirroring the usual down/move/up lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchState {
    Started,
    Moved,
    Ended,
    Cancelled,
}

#[cfg(feature = "viewer")]
impl From<TouchPhase> for TouchState {
    fn from(phase: TouchPhase) -> Self {
        match phase {
            TouchPhase::Started => TouchState::Started,
            TouchPhase::Moved => TouchState::Moved,
            TouchPhase::Ended => TouchState::Ended,
            TouchPhase::Cancelled => TouchState::Cancelled,
        }
    }
}

/// Raw input to [`InputEvent`] translator.
///
/// Queues events as they arrive; the frame loop drains them once per frame.
#[derive(Debug, Default)]
pub struct Input {
    cursor: Option<Vec2>,
    last_press: Option<(Vec2, f64)>,
    touch_id: Option<u64>,
    keys_held: Vec<KeyCode>,
    events: Vec<InputEvent>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued event, oldest first.
    pub fn drain(&mut self) -> std::vec::Drain<'_, InputEvent> {
        self.events.drain(..)
    }

    /// Last known cursor position.
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    // ========== Raw input ==========

    pub fn cursor_moved(&mut self, position: Vec2) {
        self.cursor = Some(position);
        self.events.push(InputEvent::PointerMoved(position));
    }

    pub fn cursor_left(&mut self) {
        self.cursor = None;
        self.events.push(InputEvent::PointerLeft);
    }

    /// Primary button went down at the current cursor position.
    ///
    /// Emits a `Click`, followed by a `DoubleClick` when the previous press
    /// was recent and close enough. A press that completes a double click
    /// cannot start another one.
    pub fn primary_pressed(&mut self, now_millis: f64) {
        let Some(position) = self.cursor else {
            return;
        };
        self.events.push(InputEvent::Click(position));

        let is_double = self.last_press.is_some_and(|(last, at)| {
            now_millis - at <= DOUBLE_CLICK_MS && last.distance(position) <= DOUBLE_CLICK_SLOP
        });
        if is_double {
            self.events.push(InputEvent::DoubleClick(position));
            self.last_press = None;
        } else {
            self.last_press = Some((position, now_millis));
        }
    }

    /// A touch point changed. Only the first finger down is followed.
    pub fn touch(&mut self, id: u64, state: TouchState, position: Vec2) {
        match state {
            TouchState::Started => {
                if self.touch_id.is_none() {
                    self.touch_id = Some(id);
                    self.events.push(InputEvent::TouchStart(position));
                }
            }
            TouchState::Moved => {
                if self.touch_id == Some(id) {
                    self.events.push(InputEvent::TouchMove(position));
                }
            }
            TouchState::Ended | TouchState::Cancelled => {
                if self.touch_id == Some(id) {
                    self.touch_id = None;
                    self.events.push(InputEvent::TouchEnd);
                }
            }
        }
    }

    /// A key went down or up. Held keys do not repeat.
    pub fn key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            if !self.keys_held.contains(&key) {
                self.keys_held.push(key);
                self.events.push(InputEvent::Key(key));
            }
        } else {
            self.keys_held.retain(|k| *k != key);
        }
    }

    /// Process a winit window event.
    #[cfg(feature = "viewer")]
    pub fn handle_window_event(&mut self, event: &WindowEvent, now_millis: f64) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.cursor_left(),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.primary_pressed(now_millis),
            WindowEvent::Touch(touch) => {
                let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                self.touch(touch.id, touch.phase.into(), position);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.key(code.into(), event.state == ElementState::Pressed);
                }
            }
            _ => {}
        }
    }
}
