// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognizers: the shared state machine and one behavior per gesture kind.
//!
//! A [`Recognizer`] is split in two halves:
//!
//! - `Core` holds everything every kind has: the state, the pointer tracker,
//!   armed deadlines, common configuration and an outbox of signals for the
//!   orchestrator.
//! - `Kind` holds the kind-specific thresholds and progress, and reacts to
//!   pointer events by driving the `Core` primitives (`begin`, `activate`,
//!   `fail`, `cancel`, `end`).
//!
//! Recognizers never call into the orchestrator. Every transition is queued
//! as a `Signal` and drained by the orchestrator once the recognizer returns,
//! so arbitration never observes a half-updated recognizer.
//!
//! Pointer bookkeeping is uniform across kinds: a pointer is tracked before
//! the kind sees its down or move, and an up is seen with the lifting pointer
//! still tracked. The pointer is dropped only after the orchestrator has
//! processed the resulting transitions, so a recognizer that activates on up
//! still shares that pointer with its competitors during arbitration.

mod fling;
mod hover;
mod long_press;
mod manual;
mod native;
mod pan;
mod pinch;
mod rotation;
mod tap;

use core::fmt;

use kurbo::{Point, Rect};
use smallvec::SmallVec;
use understory_gesture_track::PointerTracker;

use crate::config::{GestureConfig, HitSlop, KindConfig};
use crate::error::GestureError;
use crate::handle::Handle;
use crate::relations::Participant;
use crate::timer::{TimerAction, Timers};
use crate::types::{
    GestureData, GestureEvent, PointerEvent, PointerEventKind, PointerType, RecognizerKind, State,
};

/// Something the orchestrator must look at.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Signal {
    /// The recognizer moved from `old` to `new`.
    Transition { new: State, old: State },
    /// The recognizer processed a move while active.
    Update,
}

/// State shared by every recognizer kind.
#[derive(Clone, Debug)]
pub(crate) struct Core {
    pub(crate) handle: Handle,
    pub(crate) state: State,
    pub(crate) enabled: bool,
    pub(crate) manual_activation: bool,
    pub(crate) cancel_when_outside: bool,
    pub(crate) hit_slop: Option<HitSlop>,
    pub(crate) bounds: Option<Rect>,
    pub(crate) tracker: PointerTracker,
    pub(crate) timers: Timers,
    pub(crate) signals: SmallVec<[Signal; 4]>,
    pub(crate) now_ms: u64,
    pub(crate) pointer_type: PointerType,
}

impl Core {
    fn new(handle: Handle, config: &GestureConfig) -> Self {
        let kind = config.kind.kind();
        Self {
            handle,
            state: State::Undetermined,
            enabled: config.enabled,
            manual_activation: config.manual_activation,
            cancel_when_outside: config
                .cancel_when_outside
                .unwrap_or_else(|| cancels_when_outside_by_default(kind)),
            hit_slop: config.hit_slop,
            bounds: config.bounds,
            tracker: PointerTracker::default(),
            timers: Timers::default(),
            signals: SmallVec::new(),
            now_ms: 0,
            pointer_type: PointerType::Touch,
        }
    }

    fn move_to_state(&mut self, new: State) {
        if self.state == new {
            return;
        }
        let old = self.state;
        self.state = new;
        self.timers.clear();
        log::debug!("{:?}: {:?} -> {:?}", self.handle, old, new);
        self.signals.push(Signal::Transition { new, old });
    }

    /// `Undetermined → Began`, if the last pointer lies inside the hit area.
    pub(crate) fn begin(&mut self) {
        if !self.within_hit_slop() {
            return;
        }
        if self.state == State::Undetermined {
            self.move_to_state(State::Began);
        }
    }

    /// `Undetermined | Began → Active`. Without `force`, a recognizer with
    /// manual activation stays where it is. Returns whether it activated.
    pub(crate) fn activate(&mut self, force: bool) -> bool {
        if self.manual_activation && !force {
            return false;
        }
        if matches!(self.state, State::Undetermined | State::Began) {
            self.move_to_state(State::Active);
            true
        } else {
            false
        }
    }

    pub(crate) fn fail(&mut self) {
        if matches!(self.state, State::Began | State::Active) {
            self.move_to_state(State::Failed);
        }
    }

    pub(crate) fn cancel(&mut self) {
        if matches!(
            self.state,
            State::Undetermined | State::Began | State::Active
        ) {
            self.move_to_state(State::Cancelled);
        }
    }

    pub(crate) fn end(&mut self) {
        if matches!(self.state, State::Began | State::Active) {
            self.move_to_state(State::End);
        }
    }

    /// Arm `action` to fire `delay_ms` after the current event.
    pub(crate) fn arm(&mut self, action: TimerAction, delay_ms: u64) {
        self.timers.arm(action, self.now_ms.saturating_add(delay_ms));
    }

    fn push_update(&mut self) {
        if self.state == State::Active {
            self.signals.push(Signal::Update);
        }
    }

    fn within_hit_slop(&self) -> bool {
        let (Some(slop), Some(bounds)) = (self.hit_slop, self.bounds) else {
            return true;
        };
        self.tracker
            .last_moved_position()
            .is_none_or(|p| slop.apply(bounds).contains(p))
    }

    fn pointer_inside(&self) -> bool {
        self.bounds
            .is_none_or(|b| b.contains(self.tracker.centroid()))
    }
}

fn cancels_when_outside_by_default(kind: RecognizerKind) -> bool {
    matches!(kind, RecognizerKind::LongPress | RecognizerKind::NativeDelegate)
}

/// Kind-specific reaction to pointer events.
///
/// Every hook receives the shared `Core`, already updated with the event's
/// pointer (see the module docs for the exact order).
trait Behavior: fmt::Debug {
    fn on_down(&mut self, core: &mut Core, ev: &PointerEvent);

    fn on_additional_down(&mut self, _core: &mut Core, _ev: &PointerEvent) {}

    fn on_move(&mut self, _core: &mut Core, _ev: &PointerEvent) {}

    fn on_out_of_bounds(&mut self, _core: &mut Core, _ev: &PointerEvent) {}

    fn on_up(&mut self, _core: &mut Core, _ev: &PointerEvent) {}

    fn on_additional_up(&mut self, _core: &mut Core, _ev: &PointerEvent) {}

    fn on_enter(&mut self, _core: &mut Core, _ev: &PointerEvent) {}

    /// Returns `true` if the kind handled leaving itself.
    fn on_leave(&mut self, _core: &mut Core, _ev: &PointerEvent) -> bool {
        false
    }

    fn on_timer(&mut self, core: &mut Core, action: TimerAction) {
        match action {
            TimerAction::Activate => {
                self.before_activate(core);
                if core.activate(false) && self.ends_on_activate() {
                    core.end();
                }
            }
            TimerAction::Fail => {
                core.fail();
                self.reset_progress(core);
            }
        }
    }

    /// Runs before every activation attempt.
    fn before_activate(&mut self, _core: &Core) {}

    /// Discrete gestures complete the moment they activate.
    fn ends_on_activate(&self) -> bool {
        false
    }

    fn reset_progress(&mut self, _core: &Core) {}

    fn on_reset(&mut self) {}

    fn data(&self, core: &Core) -> GestureData;
}

#[derive(Clone, Debug)]
enum Kind {
    Pan(pan::Pan),
    Tap(tap::Tap),
    LongPress(long_press::LongPress),
    Pinch(pinch::Pinch),
    Rotation(rotation::Rotation),
    Fling(fling::Fling),
    Native(native::Native),
    Hover(hover::Hover),
    Manual(manual::Manual),
}

impl Kind {
    fn new(config: &KindConfig) -> Self {
        match *config {
            KindConfig::Pan(c) => Self::Pan(pan::Pan::new(c)),
            KindConfig::Tap(c) => Self::Tap(tap::Tap::new(c)),
            KindConfig::LongPress(c) => Self::LongPress(long_press::LongPress::new(c)),
            KindConfig::Pinch(c) => Self::Pinch(pinch::Pinch::new(c)),
            KindConfig::Rotation(c) => Self::Rotation(rotation::Rotation::new(c)),
            KindConfig::Fling(c) => Self::Fling(fling::Fling::new(c)),
            KindConfig::NativeDelegate(c) => Self::Native(native::Native::new(c)),
            KindConfig::Hover => Self::Hover(hover::Hover),
            KindConfig::Manual => Self::Manual(manual::Manual),
        }
    }

    /// Swap thresholds in place, keeping progress.
    fn set_config(&mut self, config: &KindConfig) -> Result<(), GestureError> {
        match (self, *config) {
            (Self::Pan(k), KindConfig::Pan(c)) => k.set_config(c),
            (Self::Tap(k), KindConfig::Tap(c)) => k.set_config(c),
            (Self::LongPress(k), KindConfig::LongPress(c)) => k.set_config(c),
            (Self::Pinch(k), KindConfig::Pinch(c)) => k.set_config(c),
            (Self::Rotation(k), KindConfig::Rotation(c)) => k.set_config(c),
            (Self::Fling(k), KindConfig::Fling(c)) => k.set_config(c),
            (Self::Native(k), KindConfig::NativeDelegate(c)) => k.set_config(c),
            (Self::Hover(_), KindConfig::Hover) | (Self::Manual(_), KindConfig::Manual) => {}
            _ => {
                return Err(GestureError::InvalidConfig(
                    "a recognizer's kind cannot change",
                ));
            }
        }
        Ok(())
    }

    fn kind(&self) -> RecognizerKind {
        match self {
            Self::Pan(_) => RecognizerKind::Pan,
            Self::Tap(_) => RecognizerKind::Tap,
            Self::LongPress(_) => RecognizerKind::LongPress,
            Self::Pinch(_) => RecognizerKind::Pinch,
            Self::Rotation(_) => RecognizerKind::Rotation,
            Self::Fling(_) => RecognizerKind::Fling,
            Self::Native(_) => RecognizerKind::NativeDelegate,
            Self::Hover(_) => RecognizerKind::Hover,
            Self::Manual(_) => RecognizerKind::Manual,
        }
    }

    fn behavior(&self) -> &dyn Behavior {
        match self {
            Self::Pan(k) => k,
            Self::Tap(k) => k,
            Self::LongPress(k) => k,
            Self::Pinch(k) => k,
            Self::Rotation(k) => k,
            Self::Fling(k) => k,
            Self::Native(k) => k,
            Self::Hover(k) => k,
            Self::Manual(k) => k,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn Behavior {
        match self {
            Self::Pan(k) => k,
            Self::Tap(k) => k,
            Self::LongPress(k) => k,
            Self::Pinch(k) => k,
            Self::Rotation(k) => k,
            Self::Fling(k) => k,
            Self::Native(k) => k,
            Self::Hover(k) => k,
            Self::Manual(k) => k,
        }
    }
}

/// One gesture recognizer owned by an [`Orchestrator`](crate::Orchestrator).
///
/// Hosts only get shared access; every mutation goes through the
/// orchestrator so that arbitration sees it.
#[derive(Clone, Debug)]
pub struct Recognizer {
    pub(crate) core: Core,
    kind: Kind,
    pub(crate) active: bool,
    pub(crate) awaiting: bool,
    pub(crate) activation_index: u64,
    pub(crate) last_sent: Option<State>,
}

impl Recognizer {
    pub(crate) fn new(handle: Handle, config: &GestureConfig) -> Self {
        Self {
            core: Core::new(handle, config),
            kind: Kind::new(&config.kind),
            active: false,
            awaiting: false,
            activation_index: u64::MAX,
            last_sent: None,
        }
    }

    /// Re-apply configuration. Progress of the current interaction is kept.
    pub(crate) fn apply_config(&mut self, config: &GestureConfig) -> Result<(), GestureError> {
        self.kind.set_config(&config.kind)?;
        let core = &mut self.core;
        core.enabled = config.enabled;
        core.manual_activation = config.manual_activation;
        core.cancel_when_outside = config
            .cancel_when_outside
            .unwrap_or_else(|| cancels_when_outside_by_default(self.kind.kind()));
        core.hit_slop = config.hit_slop;
        if config.bounds.is_some() {
            core.bounds = config.bounds;
        }
        Ok(())
    }

    /// Handle this recognizer is registered under.
    pub fn handle(&self) -> Handle {
        self.core.handle
    }

    /// Gesture family.
    pub fn kind(&self) -> RecognizerKind {
        self.kind.kind()
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.core.state
    }

    /// Whether pointer events and timers reach this recognizer.
    pub fn is_enabled(&self) -> bool {
        self.core.enabled
    }

    /// Whether leaving the bounds stops the gesture.
    pub fn cancels_when_outside(&self) -> bool {
        self.core.cancel_when_outside
    }

    /// Area the recognizer covers, if known.
    pub fn bounds(&self) -> Option<Rect> {
        self.core.bounds
    }

    /// Number of pointers currently tracked.
    pub fn number_of_pointers(&self) -> usize {
        self.core.tracker.len()
    }

    /// Centroid of the tracked pointers.
    pub fn position(&self) -> Point {
        self.core.tracker.centroid()
    }

    /// The pointers this recognizer follows.
    pub fn tracker(&self) -> &PointerTracker {
        &self.core.tracker
    }

    /// Kind-specific progress.
    pub fn data(&self) -> GestureData {
        self.kind.behavior().data(&self.core)
    }

    /// Earliest armed deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.core.timers.next_deadline()
    }

    pub(crate) fn participant(&self) -> Participant {
        let (is_button, disallow_interruption) = match &self.kind {
            Kind::Native(n) => (n.is_button(), n.disallows_interruption()),
            _ => (false, false),
        };
        Participant {
            handle: self.core.handle,
            kind: self.kind.kind(),
            state: self.core.state,
            active: self.active,
            awaiting: self.awaiting,
            is_button,
            disallow_interruption,
        }
    }

    pub(crate) fn pop_signal(&mut self) -> Option<Signal> {
        if self.core.signals.is_empty() {
            None
        } else {
            Some(self.core.signals.remove(0))
        }
    }

    pub(crate) fn set_bounds(&mut self, bounds: Rect) {
        self.core.bounds = Some(bounds);
    }

    /// Feed one pointer event. Transitions land in the signal outbox.
    pub(crate) fn handle_event(&mut self, ev: &PointerEvent) {
        log::trace!(
            "{:?}: {:?} pointer {} at {:?}",
            self.core.handle,
            ev.kind,
            ev.pointer,
            ev.position
        );
        if matches!(ev.kind, PointerEventKind::Down | PointerEventKind::Enter)
            && self.core.state.is_finished()
            && !self.awaiting
        {
            self.reset();
        }
        self.core.now_ms = ev.time_ms;
        let core = &mut self.core;
        let b = self.kind.behavior_mut();
        match ev.kind {
            PointerEventKind::Down => {
                if ev.pointer_type == PointerType::Touch && core.pointer_type.is_mouse_or_pen() {
                    core.tracker.reset();
                }
                core.pointer_type = ev.pointer_type;
                core.tracker.add(ev.pointer, ev.position, ev.time_ms);
                b.on_down(core, ev);
            }
            PointerEventKind::AdditionalDown => {
                core.tracker.add(ev.pointer, ev.position, ev.time_ms);
                b.on_additional_down(core, ev);
            }
            PointerEventKind::Move => {
                core.tracker.track(ev.pointer, ev.position, ev.time_ms);
                b.on_move(core, ev);
                core.push_update();
            }
            PointerEventKind::OutOfBounds => {
                if !core.cancel_when_outside {
                    core.tracker.track(ev.pointer, ev.position, ev.time_ms);
                    b.on_out_of_bounds(core, ev);
                    core.push_update();
                }
            }
            PointerEventKind::Up => b.on_up(core, ev),
            PointerEventKind::AdditionalUp => b.on_additional_up(core, ev),
            PointerEventKind::Enter => b.on_enter(core, ev),
            PointerEventKind::Leave => {
                if !b.on_leave(core, ev) && core.cancel_when_outside {
                    match core.state {
                        State::Active => core.cancel(),
                        State::Began => {
                            core.fail();
                            b.reset_progress(core);
                        }
                        _ => {}
                    }
                }
            }
            PointerEventKind::Cancel => core.cancel(),
        }
    }

    /// Drop pointers that the event ended. Runs after the orchestrator drained
    /// the transitions caused by the event.
    pub(crate) fn finish_event(&mut self, ev: &PointerEvent) {
        match ev.kind {
            PointerEventKind::Up | PointerEventKind::AdditionalUp => {
                self.core.tracker.remove(ev.pointer);
            }
            PointerEventKind::Cancel => self.core.tracker.reset(),
            _ => {}
        }
    }

    /// Fire the earliest deadline due at `now_ms`. Returns `false` if none was due.
    pub(crate) fn fire_due_timer(&mut self, now_ms: u64) -> bool {
        let Some((action, deadline)) = self.core.timers.pop_due(now_ms) else {
            return false;
        };
        log::trace!("{:?}: {:?} timer at {}", self.core.handle, action, deadline);
        self.core.now_ms = deadline;
        self.kind.behavior_mut().on_timer(&mut self.core, action);
        true
    }

    pub(crate) fn begin(&mut self) {
        self.core.begin();
    }

    /// Host-forced activation; bypasses manual activation.
    pub(crate) fn activate(&mut self) {
        let b = self.kind.behavior_mut();
        b.before_activate(&self.core);
        if self.core.activate(true) && b.ends_on_activate() {
            self.core.end();
        }
    }

    pub(crate) fn end(&mut self) {
        self.core.end();
        self.kind.behavior_mut().reset_progress(&self.core);
    }

    pub(crate) fn fail(&mut self) {
        self.core.fail();
        self.kind.behavior_mut().reset_progress(&self.core);
    }

    pub(crate) fn cancel(&mut self) {
        self.core.cancel();
    }

    /// Back to `Undetermined` with no pointers, deadlines or arbitration flags.
    pub(crate) fn reset(&mut self) {
        let core = &mut self.core;
        core.tracker.reset();
        core.timers.clear();
        core.signals.clear();
        core.state = State::Undetermined;
        let b = self.kind.behavior_mut();
        b.on_reset();
        b.reset_progress(core);
        self.active = false;
        self.awaiting = false;
        self.activation_index = u64::MAX;
        self.last_sent = None;
    }

    /// Snapshot for the host.
    pub(crate) fn event(&self, state: State, old_state: Option<State>) -> GestureEvent {
        GestureEvent {
            handle: self.core.handle,
            state,
            old_state,
            number_of_pointers: self.core.tracker.len(),
            pointer_inside: self.core.pointer_inside(),
            position: self.core.tracker.centroid(),
            data: self.data(),
        }
    }
}
