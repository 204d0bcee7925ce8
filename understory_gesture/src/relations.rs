// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declared relations between recognizers and the cancellation policy.
//!
//! Three relations can be declared per recognizer:
//!
//! - **wait-for**: `a` waits for `b` to fail before `a` may activate.
//! - **blocks**: `a` blocks `b`, which is the same as `b` waiting for `a`.
//! - **simultaneous**: `a` and `b` may be active together. One side declaring
//!   it is enough.
//!
//! Relations are stored as handles, never as references, and are resolved
//! against the registry when a recognizer is configured.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::handle::Handle;
use crate::types::{RecognizerKind, State};

/// Snapshot of a recognizer as seen by arbitration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    /// Recognizer handle.
    pub handle: Handle,
    /// Recognizer family.
    pub kind: RecognizerKind,
    /// Current state.
    pub state: State,
    /// Whether the orchestrator has made this recognizer active.
    pub active: bool,
    /// Whether this recognizer is parked until others finish.
    pub awaiting: bool,
    /// Native delegate acting as a button.
    pub is_button: bool,
    /// Native delegate that refuses to be interrupted.
    pub disallow_interruption: bool,
}

impl Participant {
    fn is_native(&self) -> bool {
        self.kind == RecognizerKind::NativeDelegate
    }
}

/// Decides whether an already committed recognizer yields to another.
///
/// Consulted only when the victim is active or awaiting. Recognizers that have
/// not committed yet always yield to a pointer-sharing winner.
pub trait CancellationPolicy {
    /// Returns `true` if `victim` should be cancelled because `winner` activates.
    fn should_be_cancelled_by(&self, victim: &Participant, winner: &Participant) -> bool;
}

/// Host-native press conventions.
///
/// A native delegate victim yields unless it disallows interruption. Any other
/// victim yields only to an active native delegate that is not a button, so
/// scrolling containers win over their content while buttons keep their press
/// feedback.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativePressPolicy;

impl CancellationPolicy for NativePressPolicy {
    fn should_be_cancelled_by(&self, victim: &Participant, winner: &Participant) -> bool {
        if victim.is_native() {
            return !victim.disallow_interruption;
        }
        winner.is_native() && winner.state == State::Active && !winner.is_button
    }
}

/// Whoever activates first keeps the interaction.
#[derive(Copy, Clone, Debug, Default)]
pub struct ActivationOrderPolicy;

impl CancellationPolicy for ActivationOrderPolicy {
    fn should_be_cancelled_by(&self, _victim: &Participant, _winner: &Participant) -> bool {
        false
    }
}

#[derive(Clone, Debug, Default)]
struct Relations {
    wait_for: SmallVec<[Handle; 2]>,
    simultaneous: SmallVec<[Handle; 2]>,
    blocks: SmallVec<[Handle; 2]>,
}

/// Stores declared relations and answers arbitration queries.
#[derive(Clone, Debug, Default)]
pub struct RelationManager<P = NativePressPolicy> {
    relations: HashMap<Handle, Relations>,
    policy: P,
}

impl RelationManager {
    /// A manager with the default [`NativePressPolicy`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: CancellationPolicy> RelationManager<P> {
    /// A manager with a custom cancellation policy.
    pub fn with_policy(policy: P) -> Self {
        Self {
            relations: HashMap::new(),
            policy,
        }
    }

    /// The cancellation policy in use.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Replace every relation declared by `handle`.
    pub fn configure(
        &mut self,
        handle: Handle,
        wait_for: &[Handle],
        simultaneous: &[Handle],
        blocks: &[Handle],
    ) {
        if wait_for.is_empty() && simultaneous.is_empty() && blocks.is_empty() {
            self.relations.remove(&handle);
            return;
        }
        self.relations.insert(
            handle,
            Relations {
                wait_for: wait_for.iter().copied().collect(),
                simultaneous: simultaneous.iter().copied().collect(),
                blocks: blocks.iter().copied().collect(),
            },
        );
    }

    /// Forget the relations declared by `handle`.
    pub fn drop_relations(&mut self, handle: Handle) {
        self.relations.remove(&handle);
    }

    /// Forget `handle` everywhere: its own relations and every mention of it.
    pub fn forget(&mut self, handle: Handle) {
        self.relations.remove(&handle);
        for r in self.relations.values_mut() {
            r.wait_for.retain(|h| *h != handle);
            r.simultaneous.retain(|h| *h != handle);
            r.blocks.retain(|h| *h != handle);
        }
    }

    /// `a` declared that it waits for `b`.
    pub fn should_wait_for_failure(&self, a: Handle, b: Handle) -> bool {
        self.relations.get(&a).is_some_and(|r| r.wait_for.contains(&b))
    }

    /// `a` declared that `b` must wait for it.
    pub fn should_require_to_wait_for_failure(&self, a: Handle, b: Handle) -> bool {
        self.relations.get(&a).is_some_and(|r| r.blocks.contains(&b))
    }

    /// `a` must not activate while `b` is undecided, by either declaration.
    pub fn waits_for(&self, a: Handle, b: Handle) -> bool {
        a != b
            && (self.should_wait_for_failure(a, b) || self.should_require_to_wait_for_failure(b, a))
    }

    /// `a` accepts running together with `b`, by declaration or native delegate rules.
    pub fn should_recognize_simultaneously(&self, a: &Participant, b: &Participant) -> bool {
        self.relations
            .get(&a.handle)
            .is_some_and(|r| r.simultaneous.contains(&b.handle))
            || native_allows_simultaneous(a, b)
    }

    /// `a` and `b` may be active together. Symmetric.
    pub fn can_run_simultaneously(&self, a: &Participant, b: &Participant) -> bool {
        a.handle == b.handle
            || self.should_recognize_simultaneously(a, b)
            || self.should_recognize_simultaneously(b, a)
    }

    /// Policy decision for a committed `victim` and an activating `winner`.
    pub fn should_be_cancelled_by(&self, victim: &Participant, winner: &Participant) -> bool {
        self.policy.should_be_cancelled_by(victim, winner)
    }
}

/// An active, interruptible native delegate lets not-yet-active siblings keep
/// tracking, but never shares the interaction with another active recognizer.
fn native_allows_simultaneous(native: &Participant, other: &Participant) -> bool {
    if !native.is_native() {
        return false;
    }
    if other.is_native() && other.state == State::Active && other.disallow_interruption {
        return false;
    }
    let interruptible = !native.disallow_interruption;
    if native.state == State::Active && other.state == State::Active && interruptible {
        return false;
    }
    native.state == State::Active && interruptible
}
