// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deadlines owned by a recognizer.
//!
//! Recognizers never call back into a clock. They arm deadlines in host
//! milliseconds, and the orchestrator fires them when the host advances time.
//! Any state transition disarms every deadline of that recognizer, so a
//! timer can never outlive the state it was guarding.

use smallvec::SmallVec;

/// What happens when a deadline passes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum TimerAction {
    /// Activate (long press, pan's activate-after-long-press).
    Activate,
    /// Fail (tap duration/delay, fling duration).
    Fail,
}

#[derive(Copy, Clone, Debug)]
struct Timer {
    action: TimerAction,
    deadline_ms: u64,
}

/// Armed deadlines, at most one per action.
#[derive(Clone, Debug, Default)]
pub(crate) struct Timers {
    armed: SmallVec<[Timer; 2]>,
}

impl Timers {
    /// Arm `action` at `deadline_ms`, replacing an earlier arming of the same action.
    pub(crate) fn arm(&mut self, action: TimerAction, deadline_ms: u64) {
        self.disarm(action);
        self.armed.push(Timer {
            action,
            deadline_ms,
        });
    }

    pub(crate) fn disarm(&mut self, action: TimerAction) {
        self.armed.retain(|t| t.action != action);
    }

    pub(crate) fn clear(&mut self) {
        self.armed.clear();
    }

    /// Earliest armed deadline.
    pub(crate) fn next_deadline(&self) -> Option<u64> {
        self.armed.iter().map(|t| t.deadline_ms).min()
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    pub(crate) fn pop_due(&mut self, now_ms: u64) -> Option<(TimerAction, u64)> {
        let (i, t) = self
            .armed
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline_ms <= now_ms)
            .min_by_key(|(_, t)| t.deadline_ms)?;
        let out = (t.action, t.deadline_ms);
        self.armed.remove(i);
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rearming_replaces_the_previous_deadline() {
        let mut t = Timers::default();
        t.arm(TimerAction::Fail, 100);
        t.arm(TimerAction::Fail, 300);
        assert_eq!(t.next_deadline(), Some(300));
        assert_eq!(t.pop_due(200), None);
        assert_eq!(t.pop_due(300), Some((TimerAction::Fail, 300)));
        assert_eq!(t.next_deadline(), None);
    }

    #[test]
    fn earliest_due_fires_first() {
        let mut t = Timers::default();
        t.arm(TimerAction::Fail, 50);
        t.arm(TimerAction::Activate, 20);
        assert_eq!(t.next_deadline(), Some(20));
        assert_eq!(t.pop_due(60), Some((TimerAction::Activate, 20)));
        assert_eq!(t.pop_due(60), Some((TimerAction::Fail, 50)));
        assert_eq!(t.pop_due(60), None);
    }

    #[test]
    fn clear_disarms_everything() {
        let mut t = Timers::default();
        t.arm(TimerAction::Fail, 5);
        t.disarm(TimerAction::Activate);
        assert_eq!(t.next_deadline(), Some(5));
        t.clear();
        assert_eq!(t.next_deadline(), None);
    }
}
