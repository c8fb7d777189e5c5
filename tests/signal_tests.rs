//! Traffic signal timing tests

use crosswalk_sim::simulation::{Signal, SignalError, SignalState};

fn advance(signal: &mut Signal, ticks: u32) {
    for _ in 0..ticks {
        signal.update();
    }
}

#[test]
fn test_signal_starts_green() {
    let signal = Signal::new(90, 50, 5).unwrap();
    assert!(signal.is_green());
    assert_eq!(signal.time_to_change(), 50);
    assert_eq!(signal.cycle(), 90);
    assert_eq!(signal.to_string(), "🟢 50");
}

#[test]
fn test_signal_phase_sequence() {
    let mut signal = Signal::new(90, 50, 5).unwrap();

    advance(&mut signal, 49);
    assert!(signal.is_green());
    assert_eq!(signal.time_to_change(), 1);

    advance(&mut signal, 1);
    assert!(signal.is_yellow_after_green());
    assert_eq!(signal.previous(), SignalState::Green);
    assert_eq!(signal.time_to_change(), 5);

    advance(&mut signal, 5);
    assert!(signal.is_red());
    assert_eq!(signal.time_to_change(), signal.duration(SignalState::Red));
    assert_eq!(signal.duration(SignalState::Red), 30);

    advance(&mut signal, 30);
    assert!(signal.is_yellow());
    assert!(!signal.is_yellow_after_green());
    assert_eq!(signal.previous(), SignalState::Red);

    advance(&mut signal, 5);
    assert!(signal.is_green());
    assert_eq!(signal.previous(), SignalState::Yellow);
}

#[test]
fn test_signal_period_is_cycle() {
    let initial = Signal::new(90, 50, 5).unwrap();
    let mut signal = initial.clone();

    for _ in 0..3 {
        advance(&mut signal, 90);
        assert_eq!(signal, initial);
    }

    advance(&mut signal, 45);
    assert_ne!(signal, initial);
}

#[test]
fn test_signal_without_yellow() {
    let initial = Signal::new(60, 40, 0).unwrap();
    let mut signal = initial.clone();

    for tick in 0..60 {
        assert!(!signal.is_yellow(), "yellow at tick {tick}");
        signal.update();
    }
    assert_eq!(signal, initial);

    advance(&mut signal, 40);
    assert!(signal.is_red());
    assert_eq!(signal.previous(), SignalState::Green);
    assert_eq!(signal.time_to_change(), 20);
}

#[test]
fn test_signal_validation() {
    assert_eq!(Signal::new(90, 0, 5), Err(SignalError::NoGreen));
    assert_eq!(
        Signal::new(60, 50, 5),
        Err(SignalError::CycleTooShort {
            cycle: 60,
            green: 50,
            yellow: 5
        })
    );
    assert!(Signal::new(61, 50, 5).is_ok());
}

#[test]
fn test_signal_timing_overflow_rejected() {
    assert_eq!(
        Signal::new(90, 50, u32::MAX),
        Err(SignalError::CycleTooShort {
            cycle: 90,
            green: 50,
            yellow: u32::MAX
        })
    );
    assert!(matches!(
        Signal::new(u32::MAX, u32::MAX, 1),
        Err(SignalError::CycleTooShort { .. })
    ));
    assert!(matches!(
        Signal::new(u32::MAX, 1, u32::MAX / 2 + 1),
        Err(SignalError::CycleTooShort { .. })
    ));
}
