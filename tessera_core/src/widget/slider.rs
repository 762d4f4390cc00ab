// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draggable value widget.

use alloc::boxed::Box;
use alloc::format;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Rect, Size};

use super::{Label, flat_background};
use crate::backend::{AttribGroup, Color};
use crate::error::RenderError;
use crate::event::{Event, MouseAction};
use crate::node::Frame;

/// Axis a slider runs along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Along x; the handle moves left to right.
    #[default]
    Horizontal,
    /// Along y; the handle moves bottom to top.
    Vertical,
}

type MapFn = Box<dyn Fn(f64) -> f64>;

/// A value in `[min, max]` set by dragging with the primary button.
///
/// The pointer position is turned into a ratio in `[0, 1]` along the
/// slider's axis, passed through the optional [`map`](Self::map), scaled into
/// `[min, max]`, and clamped there.
pub struct Slider {
    /// Value text, drawn with the label's alignment.
    pub label: Label,
    /// Current value.
    pub value: f64,
    /// Value at the low end.
    pub min: f64,
    /// Value at the high end.
    pub max: f64,
    /// Applied to the raw ratio before scaling, e.g. [`Slider::step`].
    pub map: Option<MapFn>,
    /// Draw the value as text.
    pub show_value: bool,
    /// Axis.
    pub orientation: Orientation,
    /// Half the handle's thickness, in normalized device coordinates.
    pub handle_half_width: f64,
    /// Handle color.
    pub handle_color: Color,
}

impl fmt::Debug for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slider")
            .field("label", &self.label)
            .field("value", &self.value)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("map", &self.map.is_some())
            .field("show_value", &self.show_value)
            .field("orientation", &self.orientation)
            .field("handle_half_width", &self.handle_half_width)
            .field("handle_color", &self.handle_color)
            .finish()
    }
}

impl Slider {
    /// Translucent gray.
    pub const DEFAULT_HANDLE_COLOR: Color = Color::rgba(0.5, 0.5, 0.5, 0.5);

    /// Creates a horizontal slider at `min`.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            label: Label::default(),
            value: min,
            min,
            max,
            map: None,
            show_value: true,
            orientation: Orientation::Horizontal,
            handle_half_width: 0.05,
            handle_color: Self::DEFAULT_HANDLE_COLOR,
        }
    }

    /// Sets the value.
    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Sets the ratio mapping.
    #[must_use]
    pub fn with_map(mut self, map: impl Fn(f64) -> f64 + 'static) -> Self {
        self.map = Some(Box::new(map));
        self
    }

    /// Sets the orientation.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Hides the value text.
    #[must_use]
    pub fn without_value_text(mut self) -> Self {
        self.show_value = false;
        self
    }

    /// A mapping that snaps ratios down to multiples of `1 / n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    #[must_use]
    pub fn step(n: u32) -> impl Fn(f64) -> f64 {
        assert!(n > 0, "slider step count must be positive");
        let n = f64::from(n);
        move |x| (x * n).floor() / n
    }

    /// `max - min`.
    #[inline]
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Position of the value between `min` (0) and `max` (1). A slider with
    /// an empty range reports 0.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        let range = self.range();
        if range == 0.0 {
            return 0.0;
        }
        (self.value - self.min) / range
    }

    /// Scales a ratio into `[min, max]`.
    #[must_use]
    pub fn map_ratio(&self, n: f64) -> f64 {
        n * self.range() + self.min
    }

    /// Sets the value from a raw ratio along the slider.
    pub fn set_ratio(&mut self, ratio: f64) {
        if !ratio.is_finite() {
            return;
        }
        let mut r = ratio.clamp(0.0, 1.0);
        if let Some(map) = &self.map {
            r = map(r);
        }
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        self.value = self.map_ratio(r).clamp(lo, hi);
    }

    pub(crate) fn handle(&mut self, event: &Event, size: Size) {
        let Event::Mouse(mouse) = event else {
            return;
        };
        if mouse.action != MouseAction::Move || !mouse.buttons.primary() {
            return;
        }
        let (along, extent) = match self.orientation {
            Orientation::Horizontal => (mouse.pos.x, size.width),
            Orientation::Vertical => (mouse.pos.y, size.height),
        };
        if extent <= 0.0 {
            return;
        }
        self.set_ratio(along / extent);
    }

    pub(crate) fn draw(
        &mut self,
        frame: &mut Frame<'_>,
        foreground: Option<Color>,
        background: Option<Color>,
    ) -> Result<(), RenderError> {
        let backend = frame.backend();
        backend.push_attrib(AttribGroup::Enable);
        flat_background(backend, background);
        let result = self.draw_value(frame, foreground.unwrap_or(Color::WHITE));
        if result.is_ok() {
            let backend = frame.backend();
            backend.color(self.handle_color);
            backend.fill_rect(self.handle_rect());
        }
        frame.backend().pop_attrib();
        result
    }

    fn draw_value(&mut self, frame: &mut Frame<'_>, foreground: Color) -> Result<(), RenderError> {
        if !self.show_value {
            return Ok(());
        }
        let text = format!("{}", self.value);
        if self.label.text != text {
            self.label.text = text;
        }
        self.label.draw_text(frame, foreground)
    }

    /// The handle in normalized device coordinates.
    #[must_use]
    pub fn handle_rect(&self) -> Rect {
        let at = self.ratio() * 2.0 - 1.0;
        let hw = self.handle_half_width;
        match self.orientation {
            Orientation::Horizontal => Rect::new(at - hw, -1.0, at + hw, 1.0),
            Orientation::Vertical => Rect::new(-1.0, at - hw, 1.0, at + hw),
        }
    }
}
