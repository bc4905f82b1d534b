use std::time::Duration;

use lift_hardware::{HwError, Press, SimulatedPanel, live_press_channel};
use lift_traits::{ButtonInput, ManualClock};
use rstest::rstest;

fn sample(panel: &mut SimulatedPanel<ManualClock>, clock: &ManualClock, floor: u8, until_ms: u64) -> Vec<bool> {
    let mut out = Vec::new();
    while clock.elapsed() < Duration::from_millis(until_ms) {
        out.push(panel.read_button(floor).expect("read"));
        clock.advance(Duration::from_millis(1));
    }
    out
}

#[test]
fn live_press_holds_for_press_ms() {
    let clock = ManualClock::new();
    let (tx, rx) = live_press_channel();
    let mut panel = SimulatedPanel::new(4, clock.clone()).with_live_presses(rx, 120);

    clock.advance(Duration::from_millis(500));
    tx.send(3).unwrap();
    assert!(!panel.read_button(3).unwrap(), "pressed as soon as seen");
    clock.advance(Duration::from_millis(119));
    assert!(!panel.read_button(3).unwrap());
    clock.advance(Duration::from_millis(1));
    assert!(panel.read_button(3).unwrap(), "released after press_ms");
    assert_eq!(panel.press_count(), 1);
}

#[test]
fn live_press_for_unknown_floor_is_dropped() {
    let clock = ManualClock::new();
    let (tx, rx) = live_press_channel();
    let mut panel = SimulatedPanel::new(4, clock).with_live_presses(rx, 100);
    tx.send(9).unwrap();
    tx.send(0).unwrap();
    for floor in 1..=4 {
        assert!(panel.read_button(floor).unwrap());
    }
    assert_eq!(panel.press_count(), 0);
}

#[test]
fn dropped_sender_is_harmless() {
    let (tx, rx) = live_press_channel();
    drop(tx);
    let mut panel = SimulatedPanel::new(2, ManualClock::new()).with_live_presses(rx, 100);
    assert!(panel.read_button(1).unwrap());
}

#[rstest]
#[case(0)]
#[case(20)]
fn bounce_only_affects_edges(#[case] bounce_ms: u64) {
    let clock = ManualClock::new();
    let mut panel = SimulatedPanel::new(4, clock.clone())
        .with_script([Press {
            floor: 1,
            at_ms: 100,
            hold_ms: 200,
        }])
        .with_bounce_ms(bounce_ms);
    let levels = sample(&mut panel, &clock, 1, 400);

    // Settled levels are exact away from the edges.
    assert!(levels[..100].iter().all(|&l| l));
    assert!(levels[100 + 25..300].iter().all(|&l| !l));
    assert!(levels[300 + 25..].iter().all(|&l| l));

    let transitions = levels.windows(2).filter(|w| w[0] != w[1]).count();
    if bounce_ms == 0 {
        assert_eq!(transitions, 2);
    } else {
        assert!(transitions > 2, "expected chatter, got {transitions} edges");
    }
}

#[test]
fn unknown_floor_reports_hw_error() {
    let mut panel = SimulatedPanel::new(3, ManualClock::new());
    let err = panel.read_button(4).unwrap_err();
    assert_eq!(err.to_string(), HwError::UnknownFloor(4).to_string());
}
