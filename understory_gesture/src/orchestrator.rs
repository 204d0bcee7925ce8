// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The arbiter that sequences activation and cancellation across recognizers.
//!
//! ## Pools
//!
//! - `registered`: recognizers taking part in the current interaction. A
//!   recognizer joins when it receives a down (or an enter) and leaves once it
//!   is finished, or idle with no pointers, and not awaiting.
//! - `active`: recognizers the orchestrator has made active.
//! - `awaiting`: recognizers that reached `Active` while something they wait
//!   for was still undecided.
//!
//! ## Cascades
//!
//! Recognizers queue their transitions; the orchestrator drains a recognizer's
//! queue right after calling into it. Handling one transition can cancel other
//! recognizers, whose queues are drained immediately, depth first. Cancellation
//! victims are collected before any of them is touched, and pool pruning runs
//! only once the whole cascade has unwound, so no pool is mutated while it is
//! being walked.
//!
//! A pointer event fanned out by [`Orchestrator::dispatch_all`] reaches every
//! handle before anything is pruned. A recognizer that ended earlier in the
//! fan-out is still registered, in `End`, when later recognizers arbitrate.
//!
//! A tap or fling activates and ends inside one call. Until the orchestrator
//! has reported it, such a recognizer arbitrates as `Active`.

use alloc::vec::Vec;

use kurbo::Rect;
use smallvec::SmallVec;

use crate::config::GestureConfig;
use crate::error::GestureError;
use crate::handle::Handle;
use crate::recognizer::{Recognizer, Signal};
use crate::registry::Registry;
use crate::relations::{CancellationPolicy, NativePressPolicy, Participant, RelationManager};
use crate::types::{GestureEvent, PointerEvent, PointerEventKind, PointerType, State};

type Handles = SmallVec<[Handle; 4]>;

/// Owns every recognizer of one gesture universe and decides who wins.
///
/// All mutating operations return the [`GestureEvent`]s they produced, in
/// order. Nothing is buffered between calls.
///
/// ```
/// use kurbo::Point;
/// use understory_gesture::{GestureConfig, Orchestrator, PanConfig, PointerEvent, State};
///
/// let mut o = Orchestrator::new();
/// let pan = o.attach(GestureConfig::new(PanConfig::default())).unwrap();
///
/// let events = o.dispatch(pan, &PointerEvent::down(1, Point::ZERO, 0)).unwrap();
/// assert_eq!(events[0].state, State::Began);
///
/// let events = o
///     .dispatch(pan, &PointerEvent::moved(1, Point::new(40.0, 0.0), 16))
///     .unwrap();
/// assert_eq!(events[0].state, State::Active);
/// assert!(o.is_active(pan));
/// ```
#[derive(Debug)]
pub struct Orchestrator<P = NativePressPolicy> {
    recognizers: Registry<Recognizer>,
    relations: RelationManager<P>,
    registered: Vec<Handle>,
    active: Vec<Handle>,
    awaiting: Vec<Handle>,
    next_activation_index: u64,
    events: Vec<GestureEvent>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    /// An empty orchestrator with the default [`NativePressPolicy`].
    pub fn new() -> Self {
        Self::with_policy(NativePressPolicy)
    }
}

impl<P: CancellationPolicy> Orchestrator<P> {
    /// An empty orchestrator with a custom cancellation policy.
    pub fn with_policy(policy: P) -> Self {
        Self {
            recognizers: Registry::new(),
            relations: RelationManager::with_policy(policy),
            registered: Vec::new(),
            active: Vec::new(),
            awaiting: Vec::new(),
            next_activation_index: 0,
            events: Vec::new(),
        }
    }

    /// Declared relations.
    pub fn relations(&self) -> &RelationManager<P> {
        &self.relations
    }

    /// Create a recognizer.
    ///
    /// Every relation target must already be attached.
    pub fn attach(&mut self, config: GestureConfig) -> Result<Handle, GestureError> {
        config.validate()?;
        self.check_relation_targets(&config)?;
        let handle = self
            .recognizers
            .insert_with(|h| Recognizer::new(h, &config));
        self.relations.configure(
            handle,
            &config.wait_for,
            &config.simultaneous_with,
            &config.blocks,
        );
        log::debug!("{handle:?}: attached as {:?}", config.kind.kind());
        Ok(handle)
    }

    /// Re-apply configuration to a live recognizer.
    ///
    /// Thresholds change in place and the current interaction keeps its
    /// progress. Disabling a recognizer forces it out of the interaction: an
    /// active one fails, an undetermined one is dropped from the pools and
    /// anything else is cancelled. Those transitions are reported even though
    /// the recognizer is now disabled.
    pub fn configure(
        &mut self,
        handle: Handle,
        config: GestureConfig,
    ) -> Result<Vec<GestureEvent>, GestureError> {
        config.validate()?;
        self.check_relation_targets(&config)?;
        let r = self
            .recognizers
            .get_mut(handle)
            .ok_or(GestureError::NotAttached(handle))?;
        let was_enabled = r.is_enabled();
        r.apply_config(&config)?;
        self.relations.configure(
            handle,
            &config.wait_for,
            &config.simultaneous_with,
            &config.blocks,
        );
        if was_enabled && !config.enabled {
            self.force_out(handle);
        }
        Ok(self.take_events())
    }

    /// Remove a recognizer, cancelling its interaction first.
    ///
    /// Every relation naming `handle` is forgotten, and the handle goes stale.
    pub fn detach(&mut self, handle: Handle) -> Result<Vec<GestureEvent>, GestureError> {
        let r = self
            .recognizers
            .get_mut(handle)
            .ok_or(GestureError::NotAttached(handle))?;
        r.cancel();
        self.drain(handle);
        self.drop_awaiting(handle);
        self.registered.retain(|h| *h != handle);
        self.active.retain(|h| *h != handle);
        self.relations.forget(handle);
        self.recognizers.remove(handle);
        self.flush();
        log::debug!("{handle:?}: detached");
        Ok(self.take_events())
    }

    /// Tell a recognizer which area it covers.
    pub fn set_bounds(&mut self, handle: Handle, bounds: Rect) -> Result<(), GestureError> {
        self.recognizers
            .get_mut(handle)
            .ok_or(GestureError::NotAttached(handle))?
            .set_bounds(bounds);
        Ok(())
    }

    /// Deliver a pointer event to one recognizer.
    ///
    /// Deadlines due at or before the event's timestamp fire first.
    pub fn dispatch(
        &mut self,
        handle: Handle,
        ev: &PointerEvent,
    ) -> Result<Vec<GestureEvent>, GestureError> {
        self.dispatch_all(&[handle], ev)
    }

    /// Deliver one pointer event to several recognizers, in order.
    ///
    /// Nothing is delivered if any handle is stale. Deadlines due at or before
    /// the event's timestamp fire first, and the pools are pruned once every
    /// handle has seen the event.
    pub fn dispatch_all(
        &mut self,
        handles: &[Handle],
        ev: &PointerEvent,
    ) -> Result<Vec<GestureEvent>, GestureError> {
        for &h in handles {
            self.ensure_attached(h)?;
        }
        self.run_timers(ev.time_ms);
        for &h in handles {
            self.deliver(h, ev);
        }
        self.flush();
        Ok(self.take_events())
    }

    /// Fire every deadline at or before `now_ms`, earliest first.
    pub fn fire_due_timers(&mut self, now_ms: u64) -> Vec<GestureEvent> {
        self.run_timers(now_ms);
        self.take_events()
    }

    /// Earliest deadline armed by any enabled recognizer.
    pub fn next_deadline(&self) -> Option<u64> {
        self.recognizers
            .iter()
            .filter(|(_, r)| r.is_enabled())
            .filter_map(|(_, r)| r.next_deadline())
            .min()
    }

    /// Host-driven `Undetermined → Began`.
    pub fn begin(&mut self, handle: Handle) -> Result<Vec<GestureEvent>, GestureError> {
        self.host_op(handle, Recognizer::begin)
    }

    /// Host-driven activation. Bypasses manual activation, not arbitration.
    pub fn activate(&mut self, handle: Handle) -> Result<Vec<GestureEvent>, GestureError> {
        self.host_op(handle, Recognizer::activate)
    }

    /// Host-driven successful completion.
    pub fn end(&mut self, handle: Handle) -> Result<Vec<GestureEvent>, GestureError> {
        self.host_op(handle, Recognizer::end)
    }

    /// Host-driven failure.
    pub fn fail(&mut self, handle: Handle) -> Result<Vec<GestureEvent>, GestureError> {
        self.host_op(handle, Recognizer::fail)
    }

    /// Host-driven cancellation.
    pub fn cancel(&mut self, handle: Handle) -> Result<Vec<GestureEvent>, GestureError> {
        self.host_op(handle, Recognizer::cancel)
    }

    /// Current state, or `None` for a stale handle.
    pub fn state(&self, handle: Handle) -> Option<State> {
        self.recognizers.get(handle).map(Recognizer::state)
    }

    /// Shared access to a recognizer.
    pub fn recognizer(&self, handle: Handle) -> Option<&Recognizer> {
        self.recognizers.get(handle)
    }

    /// Whether the orchestrator has made `handle` active.
    pub fn is_active(&self, handle: Handle) -> bool {
        self.recognizers.get(handle).is_some_and(|r| r.active)
    }

    /// Whether `handle` is parked until the recognizers it waits for finish.
    pub fn is_awaiting(&self, handle: Handle) -> bool {
        self.recognizers.get(handle).is_some_and(|r| r.awaiting)
    }

    /// Attached handles in slot order.
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.recognizers.handles()
    }

    fn ensure_attached(&self, handle: Handle) -> Result<(), GestureError> {
        if self.recognizers.is_alive(handle) {
            Ok(())
        } else {
            Err(GestureError::NotAttached(handle))
        }
    }

    fn check_relation_targets(&self, config: &GestureConfig) -> Result<(), GestureError> {
        config
            .wait_for
            .iter()
            .chain(&config.simultaneous_with)
            .chain(&config.blocks)
            .find(|h| !self.recognizers.is_alive(**h))
            .map_or(Ok(()), |h| Err(GestureError::UnknownRelationTarget(*h)))
    }

    fn take_events(&mut self) -> Vec<GestureEvent> {
        core::mem::take(&mut self.events)
    }

    fn deliver(&mut self, handle: Handle, ev: &PointerEvent) {
        if !self.recognizers.get(handle).is_some_and(Recognizer::is_enabled) {
            return;
        }
        if matches!(
            ev.kind,
            PointerEventKind::Down | PointerEventKind::AdditionalDown | PointerEventKind::Enter
        ) {
            self.record(handle);
        }
        if ev.kind == PointerEventKind::Down && ev.pointer_type == PointerType::Touch {
            self.cancel_mouse_and_pen(handle);
        }
        if let Some(r) = self.recognizers.get_mut(handle) {
            r.handle_event(ev);
        }
        self.drain(handle);
        if let Some(r) = self.recognizers.get_mut(handle) {
            r.finish_event(ev);
        }
    }

    fn run_timers(&mut self, now_ms: u64) {
        while let Some(h) = self.next_due(now_ms) {
            if let Some(r) = self.recognizers.get_mut(h) {
                r.fire_due_timer(now_ms);
            }
            self.drain(h);
            self.flush();
        }
    }

    /// The recognizer owning the earliest due deadline, ties broken by handle.
    fn next_due(&self, now_ms: u64) -> Option<Handle> {
        self.recognizers
            .iter()
            .filter(|(_, r)| r.is_enabled())
            .filter_map(|(h, r)| r.next_deadline().filter(|d| *d <= now_ms).map(|d| (d, h)))
            .min()
            .map(|(_, h)| h)
    }

    fn host_op(
        &mut self,
        handle: Handle,
        op: impl FnOnce(&mut Recognizer),
    ) -> Result<Vec<GestureEvent>, GestureError> {
        let r = self
            .recognizers
            .get_mut(handle)
            .ok_or(GestureError::NotAttached(handle))?;
        if r.is_enabled() {
            op(r);
            self.record(handle);
            self.drain(handle);
            self.flush();
        }
        Ok(self.take_events())
    }

    fn record(&mut self, handle: Handle) {
        if !self.registered.contains(&handle) {
            self.registered.push(handle);
        }
    }

    /// Mouse and pen streams never deliver an up once touch takes over.
    fn cancel_mouse_and_pen(&mut self, handle: Handle) {
        let victims: Handles = self
            .registered
            .iter()
            .copied()
            .filter(|&h| h != handle)
            .filter(|&h| {
                self.recognizers
                    .get(h)
                    .is_some_and(|r| r.core.pointer_type.is_mouse_or_pen())
            })
            .collect();
        for h in victims {
            if let Some(r) = self.recognizers.get_mut(h) {
                r.cancel();
            }
            self.drain(h);
        }
    }

    fn force_out(&mut self, handle: Handle) {
        let Some(r) = self.recognizers.get_mut(handle) else {
            return;
        };
        match r.state() {
            State::Active => r.fail(),
            State::Undetermined => {
                r.reset();
                self.registered.retain(|h| *h != handle);
                self.active.retain(|h| *h != handle);
                self.awaiting.retain(|h| *h != handle);
                return;
            }
            _ => r.cancel(),
        }
        self.drain(handle);
        self.drop_awaiting(handle);
        self.flush();
    }

    /// Process every queued signal of `handle`, oldest first.
    fn drain(&mut self, handle: Handle) {
        while let Some(signal) = self
            .recognizers
            .get_mut(handle)
            .and_then(Recognizer::pop_signal)
        {
            match signal {
                Signal::Transition { new, old } => self.on_state_change(handle, new, old),
                Signal::Update => self.send_update(handle),
            }
        }
    }

    fn on_state_change(&mut self, handle: Handle, new: State, old: State) {
        if matches!(new, State::Failed | State::Cancelled) {
            self.drop_awaiting(handle);
        }

        if new == State::Active {
            self.try_activate(handle);
        } else if matches!(old, State::Active | State::End) {
            if self.is_active(handle) {
                self.send(handle, new, old);
            } else if old == State::Active && matches!(new, State::Cancelled | State::Failed) {
                // Never reported as active.
                self.send(handle, new, State::Began);
            }
        } else if !(old == State::Undetermined && new == State::Cancelled) {
            self.send(handle, new, old);
        }

        if new.is_finished() {
            let waiting: Handles = self
                .awaiting
                .iter()
                .copied()
                .filter(|&o| self.relations.waits_for(o, handle))
                .collect();
            for o in waiting {
                if !self.is_awaiting(o) {
                    continue;
                }
                if new == State::End {
                    self.cancel_awaiting(o);
                } else {
                    self.try_activate(o);
                    self.drain(o);
                }
            }
        }
    }

    fn try_activate(&mut self, handle: Handle) {
        if self.blocker_ended(handle) {
            log::debug!("{handle:?}: cancelled, a recognizer it waits for ended");
            self.cancel_awaiting(handle);
            return;
        }
        if self.has_other_to_wait_for(handle) {
            self.add_awaiting(handle);
            return;
        }
        let Some(state) = self.state(handle) else {
            return;
        };
        if matches!(state, State::Cancelled | State::Failed) {
            return;
        }
        if self.should_activate(handle) {
            self.make_active(handle);
            return;
        }
        log::debug!("{handle:?}: lost arbitration in {state:?}");
        match state {
            State::Active => {
                if let Some(r) = self.recognizers.get_mut(handle) {
                    r.fail();
                }
            }
            State::Began => {
                if let Some(r) = self.recognizers.get_mut(handle) {
                    r.cancel();
                }
            }
            State::End => {
                self.drop_awaiting(handle);
                self.send(handle, State::Cancelled, State::Began);
            }
            _ => {}
        }
    }

    fn blocker_ended(&self, handle: Handle) -> bool {
        self.registered.iter().any(|&o| {
            o != handle
                && self.state(o) == Some(State::End)
                && self.relations.waits_for(handle, o)
        })
    }

    fn has_other_to_wait_for(&self, handle: Handle) -> bool {
        self.registered.iter().any(|&o| {
            o != handle
                && self.state(o).is_some_and(|s| !s.is_finished())
                && self.relations.waits_for(handle, o)
        })
    }

    fn should_activate(&self, handle: Handle) -> bool {
        let Some(r) = self.recognizers.get(handle) else {
            return false;
        };
        let me = arbitration_view(r);
        self.registered.iter().all(|&o| {
            if o == handle {
                return true;
            }
            if self.should_be_cancelled_by(handle, o) {
                return false;
            }
            let Some(other) = self.recognizers.get(o) else {
                return true;
            };
            // An active recognizer that would not yield keeps the interaction.
            let holds = other.active
                && other.state() == State::Active
                && other.tracker().shares_pointer_with(r.tracker())
                && !self.relations.can_run_simultaneously(&me, &arbitration_view(other))
                && !self.should_be_cancelled_by(o, handle);
            !holds
        })
    }

    fn make_active(&mut self, handle: Handle) {
        let Some(r) = self.recognizers.get_mut(handle) else {
            return;
        };
        let state = r.state();
        r.active = true;
        r.activation_index = self.next_activation_index;
        self.next_activation_index += 1;
        log::debug!("{handle:?}: activated");

        let victims: Handles = self
            .registered
            .iter()
            .copied()
            .filter(|&o| self.should_be_cancelled_by(o, handle))
            .collect();
        for &o in victims.iter().rev() {
            log::debug!("{o:?}: cancelled by {handle:?}");
            if let Some(v) = self.recognizers.get_mut(o) {
                v.cancel();
            }
            self.drain(o);
        }

        let parked: Handles = self
            .awaiting
            .iter()
            .copied()
            .filter(|&o| self.should_be_cancelled_by(o, handle))
            .collect();
        for o in parked {
            self.cancel_awaiting(o);
        }

        self.send(handle, State::Active, State::Began);
        if state != State::Active {
            self.send(handle, State::End, State::Active);
            if state != State::End {
                self.send(handle, State::Undetermined, State::End);
            }
        }

        self.drop_awaiting(handle);
        if !self.active.contains(&handle) {
            self.active.push(handle);
        }
    }

    fn should_be_cancelled_by(&self, victim: Handle, winner: Handle) -> bool {
        if victim == winner {
            return false;
        }
        let (Some(v), Some(w)) = (self.recognizers.get(victim), self.recognizers.get(winner))
        else {
            return false;
        };
        if !v.tracker().shares_pointer_with(w.tracker()) {
            return false;
        }
        let (vp, wp) = (arbitration_view(v), arbitration_view(w));
        if self.relations.can_run_simultaneously(&vp, &wp) {
            return false;
        }
        if vp.awaiting || vp.state == State::Active {
            return self.relations.should_be_cancelled_by(&vp, &wp);
        }
        true
    }

    fn add_awaiting(&mut self, handle: Handle) {
        if self.awaiting.contains(&handle) {
            return;
        }
        let Some(r) = self.recognizers.get_mut(handle) else {
            return;
        };
        r.awaiting = true;
        r.activation_index = self.next_activation_index;
        self.next_activation_index += 1;
        self.awaiting.push(handle);
        log::debug!("{handle:?}: awaiting");
    }

    fn drop_awaiting(&mut self, handle: Handle) {
        if let Some(r) = self.recognizers.get_mut(handle) {
            r.awaiting = false;
        }
        self.awaiting.retain(|h| *h != handle);
    }

    /// Cancel a parked recognizer. One that already ended on its own is
    /// reported as cancelled, since its activation was never reported.
    fn cancel_awaiting(&mut self, handle: Handle) {
        self.drop_awaiting(handle);
        let Some(r) = self.recognizers.get_mut(handle) else {
            return;
        };
        r.cancel();
        let ended = r.state() == State::End;
        self.drain(handle);
        if ended {
            self.send(handle, State::Cancelled, State::Began);
        }
    }

    fn send(&mut self, handle: Handle, state: State, old: State) {
        let Some(r) = self.recognizers.get_mut(handle) else {
            return;
        };
        if r.last_sent == Some(state) {
            return;
        }
        r.last_sent = Some(state);
        self.events.push(r.event(state, Some(old)));
    }

    fn send_update(&mut self, handle: Handle) {
        let Some(r) = self.recognizers.get(handle) else {
            return;
        };
        if r.active && r.is_enabled() && r.state() == State::Active {
            self.events.push(r.event(State::Active, None));
        }
    }

    /// Runs once a cascade has fully unwound, and after a pointer event has
    /// reached every handle it was dispatched to.
    fn flush(&mut self) {
        loop {
            self.prune();
            if !self.retry_awaiting() {
                break;
            }
        }
    }

    fn prune(&mut self) {
        let recognizers = &mut self.recognizers;
        self.registered.retain(|&h| {
            let Some(r) = recognizers.get_mut(h) else {
                return false;
            };
            let idle = r.state() == State::Undetermined && r.number_of_pointers() == 0;
            if r.awaiting || !(r.state().is_finished() || idle) {
                return true;
            }
            log::debug!("{h:?}: pruned in {:?}", r.state());
            r.reset();
            false
        });
        self.active
            .retain(|&h| recognizers.get(h).is_some_and(|r| r.active));
    }

    /// Give parked recognizers whose blockers left the interaction another go,
    /// earliest parked first.
    fn retry_awaiting(&mut self) -> bool {
        let mut free: Handles = self
            .awaiting
            .iter()
            .copied()
            .filter(|&o| !self.has_other_to_wait_for(o))
            .collect();
        free.sort_by_key(|&o| {
            self.recognizers
                .get(o)
                .map_or(u64::MAX, |r| r.activation_index)
        });
        for &o in &free {
            if !self.is_awaiting(o) {
                continue;
            }
            self.try_activate(o);
            self.drain(o);
            self.drop_awaiting(o);
        }
        !free.is_empty()
    }
}

/// How `r` takes part in arbitration.
///
/// A recognizer that activated and ended within one call is still `Active`
/// here until it is either reported or cancelled.
fn arbitration_view(r: &Recognizer) -> Participant {
    let mut p = r.participant();
    if p.state == State::End && !p.active && r.last_sent != Some(State::Cancelled) {
        p.state = State::Active;
    }
    p
}
