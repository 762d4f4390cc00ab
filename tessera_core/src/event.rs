// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events and the propagation contract.
//!
//! An input source builds an [`Event`] and triggers it on the root of a
//! tree. [`EventHandler::trigger`] always handles the event locally first
//! and then passes it on through
//! [`trigger_children`](EventHandler::trigger_children), whose policy is up
//! to the implementor: plain nodes broadcast to every child, while
//! containers forward positional events only to the child under the pointer
//! (see [`widget`](crate::widget)).
//!
//! Positions are in the receiver's local window coordinates, origin at the
//! bottom-left. Containers hand each child a translated copy; the original
//! event is never modified.

use kurbo::{Point, Vec2};

/// What happened on the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// A key was pressed.
    Down,
    /// A key was released.
    Up,
    /// A printable character was produced. May repeat while a key is held
    /// and never fires for keys without a character.
    Character,
}

/// A keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyboardEvent {
    /// Kind of keyboard event.
    pub action: KeyAction,
    /// Platform key code.
    pub key: u32,
    /// The produced character, for [`KeyAction::Character`].
    pub character: Option<char>,
}

impl KeyboardEvent {
    /// A key press.
    #[must_use]
    pub const fn down(key: u32) -> Self {
        Self {
            action: KeyAction::Down,
            key,
            character: None,
        }
    }

    /// A key release.
    #[must_use]
    pub const fn up(key: u32) -> Self {
        Self {
            action: KeyAction::Up,
            key,
            character: None,
        }
    }

    /// A produced character.
    #[must_use]
    pub const fn character(key: u32, character: char) -> Self {
        Self {
            action: KeyAction::Character,
            key,
            character: Some(character),
        }
    }
}

/// What happened on the mouse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// A button was pressed.
    ButtonDown,
    /// A button was released.
    ButtonUp,
    /// The wheel scrolled, on either axis.
    Wheel,
    /// The cursor moved.
    Move,
}

/// A mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Usually the left button.
    Primary,
    /// Usually the right button.
    Secondary,
    /// The middle button or wheel click.
    Middle,
    /// Any further button, numbered from 4.
    Other(u8),
}

/// Set of mouse buttons held during an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Buttons(pub u8);

impl Buttons {
    /// No buttons held.
    pub const NONE: Self = Self(0);
    /// The primary button.
    pub const PRIMARY: Self = Self(1);
    /// The secondary button.
    pub const SECONDARY: Self = Self(1 << 1);
    /// The middle button.
    pub const MIDDLE: Self = Self(1 << 2);

    /// Returns `true` if every button in `other` is held.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if the primary button is held.
    #[inline]
    #[must_use]
    pub const fn primary(self) -> bool {
        self.contains(Self::PRIMARY)
    }
}

impl core::ops::BitOr for Buttons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A mouse event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseEvent {
    /// Kind of mouse event.
    pub action: MouseAction,
    /// Cursor position in the receiver's coordinate space.
    pub pos: Point,
    /// Buttons held when the event fired.
    pub buttons: Buttons,
    /// The button that changed, for press and release.
    pub button: Option<MouseButton>,
    /// Scroll amount on each axis, for [`MouseAction::Wheel`].
    pub wheel: Vec2,
}

impl MouseEvent {
    /// A cursor move with the given buttons held.
    #[must_use]
    pub const fn moved(pos: Point, buttons: Buttons) -> Self {
        Self {
            action: MouseAction::Move,
            pos,
            buttons,
            button: None,
            wheel: Vec2::ZERO,
        }
    }

    /// A button press.
    #[must_use]
    pub const fn button_down(pos: Point, button: MouseButton, buttons: Buttons) -> Self {
        Self {
            action: MouseAction::ButtonDown,
            pos,
            buttons,
            button: Some(button),
            wheel: Vec2::ZERO,
        }
    }

    /// A button release.
    #[must_use]
    pub const fn button_up(pos: Point, button: MouseButton, buttons: Buttons) -> Self {
        Self {
            action: MouseAction::ButtonUp,
            pos,
            buttons,
            button: Some(button),
            wheel: Vec2::ZERO,
        }
    }

    /// A wheel scroll.
    #[must_use]
    pub const fn wheel(pos: Point, delta: Vec2) -> Self {
        Self {
            action: MouseAction::Wheel,
            pos,
            buttons: Buttons::NONE,
            button: None,
            wheel: delta,
        }
    }
}

/// An input event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Keyboard input. Not positional.
    Keyboard(KeyboardEvent),
    /// Mouse input. Always positional.
    Mouse(MouseEvent),
}

impl Event {
    /// The position used for positional propagation, if the event has one.
    #[inline]
    #[must_use]
    pub fn pos(&self) -> Option<Point> {
        match self {
            Self::Keyboard(_) => None,
            Self::Mouse(m) => Some(m.pos),
        }
    }

    /// Returns a copy with the position moved into a space whose origin is
    /// at `origin`. Non-positional events are returned unchanged.
    #[must_use]
    pub fn translated(&self, origin: Vec2) -> Self {
        match *self {
            Self::Keyboard(k) => Self::Keyboard(k),
            Self::Mouse(mut m) => {
                m.pos -= origin;
                Self::Mouse(m)
            }
        }
    }
}

impl From<KeyboardEvent> for Event {
    fn from(e: KeyboardEvent) -> Self {
        Self::Keyboard(e)
    }
}

impl From<MouseEvent> for Event {
    fn from(e: MouseEvent) -> Self {
        Self::Mouse(e)
    }
}

/// Receives events and decides how they propagate.
pub trait EventHandler {
    /// Processes an event locally. Defaults to a no-op.
    fn handle(&mut self, event: &Event) {
        _ = event;
    }

    /// Passes an event on to children. Defaults to a no-op.
    fn trigger_children(&mut self, event: &Event) {
        _ = event;
    }

    /// Handles the event, then propagates it. Implementors should leave
    /// this alone: the local handler always sees an event before any
    /// descendant does.
    fn trigger(&mut self, event: &Event) {
        self.handle(event);
        self.trigger_children(event);
    }
}
