// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end interactions driven through the public API.

use kurbo::{Point, Vec2};
use understory_gesture::{
    GestureConfig, GestureData, GestureError, GestureEvent, Handle, LongPressConfig, Orchestrator,
    PanConfig, PointerEvent, PointerEventKind, PointerType, State, TapConfig,
};

type Change = (Handle, State, Option<State>);

fn changes(events: &[GestureEvent]) -> Vec<Change> {
    events
        .iter()
        .filter(|e| e.is_state_change())
        .map(|e| (e.handle, e.state, e.old_state))
        .collect()
}

fn pan_with_min_dist(o: &mut Orchestrator, d: f64) -> Handle {
    o.attach(GestureConfig::new(PanConfig {
        min_dist: Some(d),
        ..PanConfig::default()
    }))
    .unwrap()
}

fn double_tap(o: &mut Orchestrator) -> Handle {
    o.attach(GestureConfig::new(TapConfig {
        number_of_taps: Some(2),
        max_delay_ms: Some(200),
        ..TapConfig::default()
    }))
    .unwrap()
}

#[test]
fn pan_activates_once_past_min_dist() {
    let mut o = Orchestrator::new();
    let pan = pan_with_min_dist(&mut o, 20.0);

    let events = o.dispatch(pan, &PointerEvent::down(1, Point::ZERO, 0)).unwrap();
    assert_eq!(changes(&events), [(pan, State::Began, Some(State::Undetermined))]);

    let events = o
        .dispatch(pan, &PointerEvent::moved(1, Point::new(5.0, 0.0), 16))
        .unwrap();
    assert!(events.is_empty());
    assert_eq!(o.state(pan), Some(State::Began));

    let events = o
        .dispatch(pan, &PointerEvent::moved(1, Point::new(25.0, 0.0), 32))
        .unwrap();
    assert_eq!(changes(&events), [(pan, State::Active, Some(State::Began))]);
    assert!(o.is_active(pan));

    // Continuous updates follow, measured from the activation point.
    let events = o
        .dispatch(pan, &PointerEvent::moved(1, Point::new(35.0, 0.0), 48))
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].old_state, None);
    assert_eq!(events[0].state, State::Active);
    match events[0].data {
        GestureData::Pan { translation, .. } => assert_eq!(translation, Vec2::new(10.0, 0.0)),
        other => panic!("unexpected payload {other:?}"),
    }

    let events = o
        .dispatch(pan, &PointerEvent::up(1, Point::new(35.0, 0.0), 64))
        .unwrap();
    assert_eq!(changes(&events), [(pan, State::End, Some(State::Active))]);
    assert!(!o.is_active(pan));
    assert_eq!(o.state(pan), Some(State::Undetermined));
}

#[test]
fn double_tap_within_delay_activates_then_ends() {
    let mut o = Orchestrator::new();
    let tap = double_tap(&mut o);
    o.dispatch(tap, &PointerEvent::down(1, Point::ZERO, 0)).unwrap();
    o.dispatch(tap, &PointerEvent::up(1, Point::ZERO, 50)).unwrap();
    o.dispatch(tap, &PointerEvent::down(1, Point::ZERO, 150)).unwrap();
    let events = o.dispatch(tap, &PointerEvent::up(1, Point::ZERO, 200)).unwrap();
    assert_eq!(
        changes(&events),
        [
            (tap, State::Active, Some(State::Began)),
            (tap, State::End, Some(State::Active)),
        ]
    );
    assert_eq!(o.next_deadline(), None);
}

#[test]
fn double_tap_too_slow_fails_and_restarts() {
    let mut o = Orchestrator::new();
    let tap = double_tap(&mut o);
    o.dispatch(tap, &PointerEvent::down(1, Point::ZERO, 0)).unwrap();
    o.dispatch(tap, &PointerEvent::up(1, Point::ZERO, 50)).unwrap();
    assert_eq!(o.next_deadline(), Some(250));

    // The overdue deadline fires before the late second press is handled.
    let events = o.dispatch(tap, &PointerEvent::down(1, Point::ZERO, 300)).unwrap();
    assert_eq!(
        changes(&events),
        [
            (tap, State::Failed, Some(State::Began)),
            (tap, State::Began, Some(State::Undetermined)),
        ]
    );
}

#[test]
fn rival_pans_on_one_pointer_produce_a_single_winner() {
    let mut o = Orchestrator::new();
    let a = pan_with_min_dist(&mut o, 10.0);
    let b = pan_with_min_dist(&mut o, 10.0);
    let both = [a, b];

    o.dispatch_all(&both, &PointerEvent::down(1, Point::ZERO, 0)).unwrap();
    let events = o
        .dispatch_all(&both, &PointerEvent::moved(1, Point::new(30.0, 0.0), 16))
        .unwrap();
    assert_eq!(
        changes(&events),
        [
            (b, State::Cancelled, Some(State::Began)),
            (a, State::Active, Some(State::Began)),
        ]
    );
    assert!(o.is_active(a));
    assert!(!o.is_active(b));

    // The loser sits out the rest of the interaction.
    let events = o
        .dispatch_all(&both, &PointerEvent::moved(1, Point::new(60.0, 0.0), 32))
        .unwrap();
    assert!(events.iter().all(|e| e.handle == a));
    let events = o
        .dispatch_all(&both, &PointerEvent::up(1, Point::new(60.0, 0.0), 48))
        .unwrap();
    assert_eq!(changes(&events), [(a, State::End, Some(State::Active))]);
}

#[test]
fn pan_waiting_for_long_press_activates_once_it_fails() {
    let mut o = Orchestrator::new();
    let press = o
        .attach(GestureConfig::new(LongPressConfig::default()))
        .unwrap();
    let pan = o
        .attach(GestureConfig::new(PanConfig::default()).wait_for(press))
        .unwrap();
    let order = [pan, press];

    o.dispatch_all(&order, &PointerEvent::down(1, Point::ZERO, 0)).unwrap();
    let events = o
        .dispatch_all(&order, &PointerEvent::moved(1, Point::new(30.0, 0.0), 16))
        .unwrap();
    assert_eq!(
        changes(&events),
        [
            (press, State::Failed, Some(State::Began)),
            (pan, State::Active, Some(State::Began)),
        ]
    );
    assert!(o.is_active(pan));
    assert!(!o.is_awaiting(pan));
}

#[test]
fn blocks_parks_the_blocked_recognizer() {
    let mut o = Orchestrator::new();
    let pan = o.attach(GestureConfig::new(PanConfig::default())).unwrap();
    let press = o
        .attach(
            GestureConfig::new(LongPressConfig {
                max_dist: Some(100.0),
                ..LongPressConfig::default()
            })
            .blocks(pan),
        )
        .unwrap();
    let order = [pan, press];

    o.dispatch_all(&order, &PointerEvent::down(1, Point::ZERO, 0)).unwrap();
    let events = o
        .dispatch_all(&order, &PointerEvent::moved(1, Point::new(30.0, 0.0), 16))
        .unwrap();
    assert!(events.is_empty());
    assert!(o.is_awaiting(pan));
    assert!(!o.is_active(pan));

    let events = o
        .dispatch_all(&order, &PointerEvent::moved(1, Point::new(40.0, 0.0), 32))
        .unwrap();
    assert!(events.is_empty());

    // Removing the blocker lets the pan through.
    let events = o.detach(press).unwrap();
    assert_eq!(
        changes(&events),
        [
            (press, State::Cancelled, Some(State::Began)),
            (pan, State::Active, Some(State::Began)),
        ]
    );
    assert!(o.is_active(pan));
}

#[test]
fn waiting_tap_never_activates_once_its_blocker_tapped() {
    for blocker_first in [true, false] {
        let mut o = Orchestrator::new();
        let b = o.attach(GestureConfig::new(TapConfig::default())).unwrap();
        let a = o
            .attach(GestureConfig::new(TapConfig::default()).wait_for(b))
            .unwrap();
        let order = if blocker_first { [b, a] } else { [a, b] };

        o.dispatch_all(&order, &PointerEvent::down(1, Point::ZERO, 0)).unwrap();
        let events = o
            .dispatch_all(&order, &PointerEvent::up(1, Point::ZERO, 50))
            .unwrap();
        let expected: [Change; 3] = if blocker_first {
            [
                (a, State::Cancelled, Some(State::Began)),
                (b, State::Active, Some(State::Began)),
                (b, State::End, Some(State::Active)),
            ]
        } else {
            [
                (b, State::Active, Some(State::Began)),
                (b, State::End, Some(State::Active)),
                (a, State::Cancelled, Some(State::Began)),
            ]
        };
        assert_eq!(changes(&events), expected, "blocker first: {blocker_first}");
        assert!(!o.is_awaiting(a));
        assert_eq!(o.state(a), Some(State::Undetermined));
        assert_eq!(o.state(b), Some(State::Undetermined));
    }
}

#[test]
fn tap_and_pan_sharing_a_pointer_agree_in_either_dispatch_order() {
    for tap_first in [true, false] {
        let mut o = Orchestrator::new();
        let tap = o.attach(GestureConfig::new(TapConfig::default())).unwrap();
        let pan = o.attach(GestureConfig::new(PanConfig::default())).unwrap();
        let order = if tap_first { [tap, pan] } else { [pan, tap] };

        // A press and release is a tap.
        o.dispatch_all(&order, &PointerEvent::down(1, Point::ZERO, 0)).unwrap();
        let events = o
            .dispatch_all(&order, &PointerEvent::up(1, Point::ZERO, 50))
            .unwrap();
        let tapped: Vec<Change> = changes(&events)
            .into_iter()
            .filter(|c| c.0 == tap)
            .collect();
        assert_eq!(
            tapped,
            [
                (tap, State::Active, Some(State::Began)),
                (tap, State::End, Some(State::Active)),
            ],
            "tap first: {tap_first}"
        );
        assert!(
            changes(&events)
                .iter()
                .all(|c| c.0 != pan || c.1 != State::Active)
        );

        // A drag is a pan.
        o.dispatch_all(&order, &PointerEvent::down(1, Point::ZERO, 500)).unwrap();
        let events = o
            .dispatch_all(&order, &PointerEvent::moved(1, Point::new(30.0, 0.0), 516))
            .unwrap();
        assert_eq!(
            changes(&events),
            [
                (tap, State::Cancelled, Some(State::Began)),
                (pan, State::Active, Some(State::Began)),
            ],
            "tap first: {tap_first}"
        );
        assert!(o.is_active(pan));
    }
}

#[test]
fn recognizers_are_reusable_after_finishing() {
    let mut o = Orchestrator::new();
    let tap = o.attach(GestureConfig::new(TapConfig::default())).unwrap();
    for round in 0..3_u64 {
        let t = round * 1_000;
        let events = o.dispatch(tap, &PointerEvent::down(1, Point::ZERO, t)).unwrap();
        assert_eq!(changes(&events), [(tap, State::Began, Some(State::Undetermined))]);
        let events = o
            .dispatch(tap, &PointerEvent::up(1, Point::ZERO, t + 40))
            .unwrap();
        assert_eq!(
            changes(&events),
            [
                (tap, State::Active, Some(State::Began)),
                (tap, State::End, Some(State::Active)),
            ]
        );
    }
}

#[test]
fn no_recognizer_reports_the_same_state_twice_in_a_row() {
    let mut o = Orchestrator::new();
    let a = pan_with_min_dist(&mut o, 10.0);
    let b = pan_with_min_dist(&mut o, 10.0);
    let tap = o.attach(GestureConfig::new(TapConfig::default())).unwrap();
    let all = [a, b, tap];

    let mut log = Vec::new();
    let script = [
        PointerEvent::down(1, Point::ZERO, 0),
        PointerEvent::moved(1, Point::new(4.0, 0.0), 16),
        PointerEvent::moved(1, Point::new(20.0, 0.0), 32),
        PointerEvent::moved(1, Point::new(40.0, 5.0), 48),
        PointerEvent::up(1, Point::new(40.0, 5.0), 64),
        PointerEvent::down(1, Point::ZERO, 500),
        PointerEvent::up(1, Point::ZERO, 540),
    ];
    for ev in &script {
        log.extend(changes(&o.dispatch_all(&all, ev).unwrap()));
        let active = all.iter().filter(|h| o.is_active(**h)).count();
        assert!(active <= 1, "{active} recognizers active after {ev:?}");
    }
    for h in all {
        let states: Vec<_> = log.iter().filter(|c| c.0 == h).map(|c| c.1).collect();
        assert!(
            states.windows(2).all(|w| w[0] != w[1]),
            "{h:?} repeated a state: {states:?}"
        );
    }
}

#[test]
fn hover_follows_enter_and_leave() {
    let mut o = Orchestrator::new();
    let hover = o.attach(GestureConfig::hover()).unwrap();
    let enter = PointerEvent::new(PointerEventKind::Enter, 3, Point::new(5.0, 5.0), 0)
        .with_pointer_type(PointerType::Mouse);
    let events = o.dispatch(hover, &enter).unwrap();
    assert_eq!(
        changes(&events),
        [
            (hover, State::Began, Some(State::Undetermined)),
            (hover, State::Active, Some(State::Began)),
        ]
    );
    let leave = PointerEvent::new(PointerEventKind::Leave, 3, Point::new(50.0, 5.0), 100)
        .with_pointer_type(PointerType::Mouse);
    let events = o.dispatch(hover, &leave).unwrap();
    assert_eq!(changes(&events), [(hover, State::End, Some(State::Active))]);
}

#[test]
fn detaching_cancels_and_invalidates() {
    let mut o = Orchestrator::new();
    let pan = pan_with_min_dist(&mut o, 10.0);
    o.dispatch(pan, &PointerEvent::down(1, Point::ZERO, 0)).unwrap();
    o.dispatch(pan, &PointerEvent::moved(1, Point::new(30.0, 0.0), 16))
        .unwrap();
    let events = o.detach(pan).unwrap();
    assert_eq!(changes(&events), [(pan, State::Cancelled, Some(State::Active))]);
    assert_eq!(o.state(pan), None);
    assert_eq!(o.handles().count(), 0);

    // The slot is reused under a new generation; the old handle stays stale.
    let again = pan_with_min_dist(&mut o, 10.0);
    assert_ne!(again, pan);
    assert_eq!(
        o.dispatch(pan, &PointerEvent::down(1, Point::ZERO, 100)),
        Err(GestureError::NotAttached(pan))
    );
    assert!(o.dispatch(again, &PointerEvent::down(1, Point::ZERO, 100)).is_ok());
}

#[test]
fn invalid_configuration_is_rejected() {
    let mut o = Orchestrator::new();
    let err = o.attach(GestureConfig::new(TapConfig {
        number_of_taps: Some(0),
        ..TapConfig::default()
    }));
    assert!(matches!(err, Err(GestureError::InvalidConfig(_))));

    let pan = pan_with_min_dist(&mut o, 10.0);
    let err = o.configure(
        pan,
        GestureConfig::new(PanConfig {
            min_pointers: Some(3),
            max_pointers: Some(2),
            ..PanConfig::default()
        }),
    );
    assert!(matches!(err, Err(GestureError::InvalidConfig(_))));
}
