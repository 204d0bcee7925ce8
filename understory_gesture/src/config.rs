// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognizer configuration.
//!
//! Every threshold is optional; `None` selects the recognizer's default.
//! Configs are plain data and can be rebuilt and re-applied with
//! [`Orchestrator::configure`](crate::Orchestrator::configure) at any time.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::error::GestureError;
use crate::handle::Handle;
use crate::types::{Directions, RecognizerKind};

/// A signed activation or failure window on one axis.
///
/// The window is crossed when the translation is below `start` or above
/// `end`. An unset bound never triggers, so `OffsetRange::end(10.0)` means
/// "more than 10 px in the positive direction" and `OffsetRange::start(-5.0)`
/// means "more than 5 px in the negative direction".
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OffsetRange {
    /// Lower bound; crossing below triggers.
    pub start: Option<f64>,
    /// Upper bound; crossing above triggers.
    pub end: Option<f64>,
}

impl OffsetRange {
    /// Trigger when the value is outside `[start, end]`.
    pub const fn new(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Trigger only when the value drops below `start`.
    pub const fn start(start: f64) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Trigger only when the value rises above `end`.
    pub const fn end(end: f64) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// Trigger when `|value| > extent`.
    pub const fn symmetric(extent: f64) -> Self {
        Self::new(-extent, extent)
    }

    /// Returns `true` if either bound is set.
    pub const fn is_set(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Returns `true` if `value` lies outside the window.
    pub fn crossed_by(&self, value: f64) -> bool {
        self.start.is_some_and(|s| value < s) || self.end.is_some_and(|e| value > e)
    }
}

/// Extends (or shrinks, with negative values) the area in which a recognizer may begin.
///
/// `left`/`right`/`top`/`bottom` push the corresponding edge outward.
/// `horizontal`/`vertical` push both edges of an axis. `width`/`height` fix
/// the size of the area measured from whichever edge was given.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HitSlop {
    /// Outset of the left edge.
    pub left: Option<f64>,
    /// Outset of the right edge.
    pub right: Option<f64>,
    /// Outset of the top edge.
    pub top: Option<f64>,
    /// Outset of the bottom edge.
    pub bottom: Option<f64>,
    /// Outset of both horizontal edges.
    pub horizontal: Option<f64>,
    /// Outset of both vertical edges.
    pub vertical: Option<f64>,
    /// Total width measured from `left` or `right`.
    pub width: Option<f64>,
    /// Total height measured from `top` or `bottom`.
    pub height: Option<f64>,
}

impl HitSlop {
    /// The same outset on every edge.
    pub const fn uniform(v: f64) -> Self {
        Self {
            left: None,
            right: None,
            top: None,
            bottom: None,
            horizontal: Some(v),
            vertical: Some(v),
            width: None,
            height: None,
        }
    }

    /// Reject contradictory combinations.
    pub fn validate(&self) -> Result<(), GestureError> {
        if self.left.is_some() && self.right.is_some() && self.width.is_some() {
            return Err(GestureError::InvalidHitSlop(
                "left, right and width cannot all be set",
            ));
        }
        if self.width.is_some() && self.left.is_none() && self.right.is_none() {
            return Err(GestureError::InvalidHitSlop(
                "width requires left or right",
            ));
        }
        if self.top.is_some() && self.bottom.is_some() && self.height.is_some() {
            return Err(GestureError::InvalidHitSlop(
                "top, bottom and height cannot all be set",
            ));
        }
        if self.height.is_some() && self.top.is_none() && self.bottom.is_none() {
            return Err(GestureError::InvalidHitSlop(
                "height requires top or bottom",
            ));
        }
        Ok(())
    }

    /// The area that `bounds` covers once this slop is applied.
    pub fn apply(&self, bounds: Rect) -> Rect {
        let (w, h) = (bounds.width(), bounds.height());
        let (mut left, mut top, mut right, mut bottom) = (0.0, 0.0, w, h);
        if let Some(v) = self.horizontal {
            left -= v;
            right += v;
        }
        if let Some(v) = self.vertical {
            top -= v;
            bottom += v;
        }
        if let Some(v) = self.left {
            left = -v;
        }
        if let Some(v) = self.right {
            right = w + v;
        }
        if let Some(v) = self.top {
            top = -v;
        }
        if let Some(v) = self.bottom {
            bottom = h + v;
        }
        if let Some(v) = self.width {
            if self.left.is_some() {
                right = left + v;
            } else if self.right.is_some() {
                left = right - v;
            }
        }
        if let Some(v) = self.height {
            if self.top.is_some() {
                bottom = top + v;
            } else if self.bottom.is_some() {
                top = bottom - v;
            }
        }
        Rect::new(
            bounds.x0 + left,
            bounds.y0 + top,
            bounds.x0 + right,
            bounds.y0 + bottom,
        )
    }
}

/// Pan (drag) thresholds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PanConfig {
    /// Distance to travel before activating. Defaults to the touch slop
    /// unless another activation criterion is configured.
    pub min_dist: Option<f64>,
    /// Pointers needed to begin. Default 1.
    pub min_pointers: Option<usize>,
    /// More pointers than this fails (or cancels, once active). Default 10.
    pub max_pointers: Option<usize>,
    /// Horizontal activation window.
    pub active_offset_x: OffsetRange,
    /// Vertical activation window.
    pub active_offset_y: OffsetRange,
    /// Horizontal failure window.
    pub fail_offset_x: OffsetRange,
    /// Vertical failure window.
    pub fail_offset_y: OffsetRange,
    /// Minimum speed (px/s) in any direction.
    pub min_velocity: Option<f64>,
    /// Minimum horizontal velocity; negative means "at most".
    pub min_velocity_x: Option<f64>,
    /// Minimum vertical velocity; negative means "at most".
    pub min_velocity_y: Option<f64>,
    /// Activate after holding this long without moving past the slop.
    pub activate_after_long_press_ms: Option<u64>,
}

/// Tap thresholds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TapConfig {
    /// Taps required. Default 1.
    pub number_of_taps: Option<u32>,
    /// Longest a single press may last. Default 500 ms.
    pub max_duration_ms: Option<u64>,
    /// Longest gap between taps. Default 500 ms.
    pub max_delay_ms: Option<u64>,
    /// Largest horizontal travel from the first touch.
    pub max_delta_x: Option<f64>,
    /// Largest vertical travel from the first touch.
    pub max_delta_y: Option<f64>,
    /// Largest travel from the first touch.
    pub max_dist: Option<f64>,
    /// Simultaneous pointers that must have been seen. Default 1.
    pub min_pointers: Option<usize>,
}

/// Long press thresholds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LongPressConfig {
    /// Hold time before activating. Default 500 ms.
    pub min_duration_ms: Option<u64>,
    /// Largest travel before failing. Default 10 px.
    pub max_dist: Option<f64>,
}

/// Pinch thresholds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PinchConfig {
    /// Span dead zone of the detector. Default twice the touch slop.
    pub span_slop: Option<f64>,
    /// Span change past the detector's start that activates. Default the touch slop.
    pub activation_slop: Option<f64>,
}

/// Rotation thresholds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RotationConfig {
    /// Accumulated angle (radians) that activates. Default π/36.
    pub min_rotation: Option<f64>,
}

/// Fling thresholds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FlingConfig {
    /// Accepted directions. Default [`Directions::RIGHT`].
    pub direction: Option<Directions>,
    /// Pointers that must be down together. Default 1.
    pub number_of_pointers: Option<usize>,
    /// Time allowed from first down. Default 800 ms.
    pub max_duration_ms: Option<u64>,
    /// Travel along an accepted direction required. Default 160 px.
    pub min_acceptable_delta: Option<f64>,
    /// Additionally require this speed (px/s) along the satisfied direction.
    pub min_velocity: Option<f64>,
}

/// Native control adapter settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NativeConfig {
    /// The control behaves like a button: active on press, cancelled on drag.
    pub is_button: bool,
    /// Once active, other recognizers cannot take over.
    pub disallow_interruption: bool,
    /// Activate on the first down even when not a button.
    pub should_activate_on_start: bool,
}

/// Per-kind configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum KindConfig {
    /// See [`PanConfig`].
    Pan(PanConfig),
    /// See [`TapConfig`].
    Tap(TapConfig),
    /// See [`LongPressConfig`].
    LongPress(LongPressConfig),
    /// See [`PinchConfig`].
    Pinch(PinchConfig),
    /// See [`RotationConfig`].
    Rotation(RotationConfig),
    /// See [`FlingConfig`].
    Fling(FlingConfig),
    /// See [`NativeConfig`].
    NativeDelegate(NativeConfig),
    /// Hover has no thresholds.
    Hover,
    /// Manual recognizers are driven by the host.
    Manual,
}

impl KindConfig {
    /// The recognizer family this config builds.
    pub const fn kind(&self) -> RecognizerKind {
        match self {
            Self::Pan(_) => RecognizerKind::Pan,
            Self::Tap(_) => RecognizerKind::Tap,
            Self::LongPress(_) => RecognizerKind::LongPress,
            Self::Pinch(_) => RecognizerKind::Pinch,
            Self::Rotation(_) => RecognizerKind::Rotation,
            Self::Fling(_) => RecognizerKind::Fling,
            Self::NativeDelegate(_) => RecognizerKind::NativeDelegate,
            Self::Hover => RecognizerKind::Hover,
            Self::Manual => RecognizerKind::Manual,
        }
    }

    fn validate(&self) -> Result<(), GestureError> {
        match self {
            Self::Pan(c) => {
                if let (Some(min), Some(max)) = (c.min_pointers, c.max_pointers)
                    && min > max
                {
                    return Err(GestureError::InvalidConfig(
                        "pan min_pointers exceeds max_pointers",
                    ));
                }
            }
            Self::Tap(c) => {
                if c.number_of_taps == Some(0) {
                    return Err(GestureError::InvalidConfig(
                        "tap number_of_taps must be at least 1",
                    ));
                }
            }
            Self::Fling(c) => {
                if c.number_of_pointers == Some(0) {
                    return Err(GestureError::InvalidConfig(
                        "fling number_of_pointers must be at least 1",
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

macro_rules! impl_from_kind_config {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for KindConfig {
                fn from(c: $ty) -> Self {
                    Self::$variant(c)
                }
            }
        )*
    };
}

impl_from_kind_config!(
    PanConfig => Pan,
    TapConfig => Tap,
    LongPressConfig => LongPress,
    PinchConfig => Pinch,
    RotationConfig => Rotation,
    FlingConfig => Fling,
    NativeConfig => NativeDelegate,
);

/// Full configuration of one recognizer.
///
/// ```
/// use understory_gesture::{GestureConfig, Orchestrator, PanConfig, TapConfig};
///
/// let mut o = Orchestrator::new();
/// let double = o.attach(GestureConfig::new(TapConfig {
///     number_of_taps: Some(2),
///     ..TapConfig::default()
/// })).unwrap();
/// let single = o.attach(GestureConfig::new(TapConfig::default()).wait_for(double)).unwrap();
/// let pan = o.attach(GestureConfig::new(PanConfig::default()).simultaneous_with(single));
/// assert!(pan.is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GestureConfig {
    /// Kind and kind-specific thresholds.
    pub kind: KindConfig,
    /// Disabled recognizers ignore input.
    pub enabled: bool,
    /// Leaving the bounds fails or cancels. `None` selects the kind default.
    pub cancel_when_outside: Option<bool>,
    /// Adjusts where the recognizer may begin.
    pub hit_slop: Option<HitSlop>,
    /// Area the recognizer covers, in the host's coordinate space.
    pub bounds: Option<Rect>,
    /// Kind criteria never activate; only the host does.
    pub manual_activation: bool,
    /// Recognizers that must finish before this one may activate.
    pub wait_for: Vec<Handle>,
    /// Recognizers that may be active together with this one.
    pub simultaneous_with: Vec<Handle>,
    /// Recognizers that must wait for this one to finish.
    pub blocks: Vec<Handle>,
}

impl GestureConfig {
    /// An enabled recognizer of the given kind with default thresholds and no relations.
    pub fn new(kind: impl Into<KindConfig>) -> Self {
        Self {
            kind: kind.into(),
            enabled: true,
            cancel_when_outside: None,
            hit_slop: None,
            bounds: None,
            manual_activation: false,
            wait_for: Vec::new(),
            simultaneous_with: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// A hover recognizer.
    pub fn hover() -> Self {
        Self::new(KindConfig::Hover)
    }

    /// A host-driven recognizer.
    pub fn manual() -> Self {
        Self::new(KindConfig::Manual)
    }

    /// Add a recognizer this one waits for.
    #[must_use]
    pub fn wait_for(mut self, other: Handle) -> Self {
        self.wait_for.push(other);
        self
    }

    /// Add a recognizer this one may run with.
    #[must_use]
    pub fn simultaneous_with(mut self, other: Handle) -> Self {
        self.simultaneous_with.push(other);
        self
    }

    /// Add a recognizer that must wait for this one.
    #[must_use]
    pub fn blocks(mut self, other: Handle) -> Self {
        self.blocks.push(other);
        self
    }

    /// Set `enabled`.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set `cancel_when_outside`.
    #[must_use]
    pub fn cancel_when_outside(mut self, cancel: bool) -> Self {
        self.cancel_when_outside = Some(cancel);
        self
    }

    /// Set `hit_slop`.
    #[must_use]
    pub fn hit_slop(mut self, slop: HitSlop) -> Self {
        self.hit_slop = Some(slop);
        self
    }

    /// Set `bounds`.
    #[must_use]
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set `manual_activation`.
    #[must_use]
    pub fn manual_activation(mut self, manual: bool) -> Self {
        self.manual_activation = manual;
        self
    }

    /// Check everything that can be checked without the registry.
    pub(crate) fn validate(&self) -> Result<(), GestureError> {
        if let Some(slop) = &self.hit_slop {
            slop.validate()?;
        }
        self.kind.validate()
    }
}
