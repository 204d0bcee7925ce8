// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: recognizer states, incoming pointer events, outgoing gesture events.

use kurbo::{Point, Vec2};
use understory_gesture_track::{PointerId, StreamPhase};

use crate::handle::Handle;

/// Lifecycle state of a recognizer.
///
/// ```text
/// Undetermined ─begin─► Began ─activate─► Active ─end─► End
///      │                  │                  │
///      └──cancel──┐       ├─fail/cancel─┐    ├─fail/cancel─┐
///                 ▼       ▼             ▼    ▼             ▼
///             Cancelled  Failed     Cancelled Failed   Cancelled
/// ```
///
/// `Failed`, `Cancelled` and `End` are terminal for the current interaction.
/// A recognizer that reaches one of them is reset to `Undetermined` before
/// its next interaction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum State {
    /// Idle, or tracking pointers without having committed to anything.
    Undetermined,
    /// The interaction looks like a candidate for this gesture.
    Began,
    /// Recognition succeeded and the gesture is running.
    Active,
    /// The interaction did not match.
    Failed,
    /// The recognizer was stopped by arbitration or by the host.
    Cancelled,
    /// The gesture completed successfully.
    End,
}

impl State {
    /// Returns `true` for the terminal states `Failed`, `Cancelled` and `End`.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled | Self::End)
    }
}

/// Kind of an incoming pointer event.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PointerEventKind {
    /// First pointer of an interaction went down.
    Down,
    /// Another pointer went down while at least one is already down.
    AdditionalDown,
    /// Last pointer went up.
    Up,
    /// A pointer went up while others remain down.
    AdditionalUp,
    /// A pointer moved inside the recognizer's area.
    Move,
    /// A hovering pointer entered the recognizer's area.
    Enter,
    /// A pointer left the recognizer's area.
    Leave,
    /// The host aborted the pointer stream.
    Cancel,
    /// A pointer moved while outside the recognizer's area.
    OutOfBounds,
}

impl PointerEventKind {
    /// The detector-facing phase of this event, if it changes the pointer stream.
    pub const fn stream_phase(self) -> Option<StreamPhase> {
        match self {
            Self::Down => Some(StreamPhase::Start),
            Self::AdditionalDown => Some(StreamPhase::PointerAdded),
            Self::Up => Some(StreamPhase::End),
            Self::AdditionalUp => Some(StreamPhase::PointerRemoved),
            Self::Move | Self::OutOfBounds => Some(StreamPhase::Moved),
            Self::Cancel => Some(StreamPhase::Cancel),
            Self::Enter | Self::Leave => None,
        }
    }
}

/// Physical source of a pointer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PointerType {
    /// A finger on a touch surface.
    #[default]
    Touch,
    /// A mouse.
    Mouse,
    /// A stylus.
    Pen,
    /// Anything else.
    Other,
}

impl PointerType {
    /// Mouse and pen streams may never deliver an up once touch takes over.
    pub(crate) const fn is_mouse_or_pen(self) -> bool {
        matches!(self, Self::Mouse | Self::Pen)
    }
}

/// A normalized pointer event delivered by the host to one recognizer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Which pointer this event is about.
    pub pointer: PointerId,
    /// What happened.
    pub kind: PointerEventKind,
    /// Pointer position in the host's coordinate space.
    pub position: Point,
    /// Host timestamp in milliseconds. Must be monotonic per pointer.
    pub time_ms: u64,
    /// Source device.
    pub pointer_type: PointerType,
}

impl PointerEvent {
    /// Create a touch event.
    pub fn new(kind: PointerEventKind, pointer: u32, position: Point, time_ms: u64) -> Self {
        Self {
            pointer: PointerId(pointer),
            kind,
            position,
            time_ms,
            pointer_type: PointerType::Touch,
        }
    }

    /// A [`PointerEventKind::Down`] touch event.
    pub fn down(pointer: u32, position: Point, time_ms: u64) -> Self {
        Self::new(PointerEventKind::Down, pointer, position, time_ms)
    }

    /// A [`PointerEventKind::AdditionalDown`] touch event.
    pub fn additional_down(pointer: u32, position: Point, time_ms: u64) -> Self {
        Self::new(PointerEventKind::AdditionalDown, pointer, position, time_ms)
    }

    /// A [`PointerEventKind::Move`] touch event.
    pub fn moved(pointer: u32, position: Point, time_ms: u64) -> Self {
        Self::new(PointerEventKind::Move, pointer, position, time_ms)
    }

    /// A [`PointerEventKind::AdditionalUp`] touch event.
    pub fn additional_up(pointer: u32, position: Point, time_ms: u64) -> Self {
        Self::new(PointerEventKind::AdditionalUp, pointer, position, time_ms)
    }

    /// A [`PointerEventKind::Up`] touch event.
    pub fn up(pointer: u32, position: Point, time_ms: u64) -> Self {
        Self::new(PointerEventKind::Up, pointer, position, time_ms)
    }

    /// Replace the pointer type.
    #[must_use]
    pub fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }
}

bitflags::bitflags! {
    /// Directions a fling may be recognized in. Screen space, y down.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Directions: u8 {
        /// Toward +x.
        const RIGHT = 1;
        /// Toward -x.
        const LEFT = 2;
        /// Toward -y.
        const UP = 4;
        /// Toward +y.
        const DOWN = 8;
    }
}

impl Directions {
    /// Displacement along the single direction `self`; zero for empty or
    /// combined sets.
    pub fn component(self, d: Vec2) -> f64 {
        if self == Self::RIGHT {
            d.x
        } else if self == Self::LEFT {
            -d.x
        } else if self == Self::UP {
            -d.y
        } else if self == Self::DOWN {
            d.y
        } else {
            0.0
        }
    }
}

/// Which recognizer family a handle belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RecognizerKind {
    /// Drag.
    Pan,
    /// One or more taps.
    Tap,
    /// Press and hold.
    LongPress,
    /// Two-pointer scale.
    Pinch,
    /// Two-pointer rotation.
    Rotation,
    /// Quick directional swipe.
    Fling,
    /// Adapter over a host-native control.
    NativeDelegate,
    /// Hovering pointer.
    Hover,
    /// Host-driven.
    Manual,
}

/// Kind-specific payload of a [`GestureEvent`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GestureData {
    /// Drag progress.
    Pan {
        /// Distance travelled since activation, including offsets from pointer changes.
        translation: Vec2,
        /// Velocity of the most recently moved pointer, px/s.
        velocity: Vec2,
    },
    /// Tap progress.
    Tap,
    /// Press progress.
    LongPress {
        /// Milliseconds since the press began.
        duration_ms: u64,
    },
    /// Pinch progress.
    Pinch {
        /// Cumulative scale since the pinch began.
        scale: f64,
        /// Centroid of the pinching pointers.
        focal: Point,
        /// Rate of change of scale, per second.
        velocity: f64,
    },
    /// Rotation progress.
    Rotation {
        /// Accumulated rotation in radians, clockwise positive.
        rotation: f64,
        /// Midpoint of the two key pointers.
        anchor: Point,
        /// Angular velocity in radians per second.
        velocity: f64,
    },
    /// Fling progress.
    Fling,
    /// Native control progress.
    NativeDelegate,
    /// Hover progress.
    Hover,
    /// Manual recognizer progress.
    Manual,
}

/// A notification produced for the host.
///
/// State-change events carry `old_state`; continuous updates emitted while a
/// recognizer is active carry `old_state == None`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureEvent {
    /// Recognizer the event is about.
    pub handle: Handle,
    /// State reported to the host.
    pub state: State,
    /// Previous state for a state change; `None` for a continuous update.
    pub old_state: Option<State>,
    /// Number of pointers currently tracked by the recognizer.
    pub number_of_pointers: usize,
    /// Whether the pointer centroid is inside the recognizer's bounds.
    pub pointer_inside: bool,
    /// Centroid of the tracked pointers.
    pub position: Point,
    /// Kind-specific values.
    pub data: GestureData,
}

impl GestureEvent {
    /// Returns `true` if this event reports a state transition.
    pub fn is_state_change(&self) -> bool {
        self.old_state.is_some()
    }
}
