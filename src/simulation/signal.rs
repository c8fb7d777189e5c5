//! Pedestrian traffic signal
//!
//! Cycles Green -> Yellow -> Red -> Yellow -> Green. The red stretch after the
//! first yellow lasts `cycle - green - yellow` ticks and ends with the yellow
//! that leads back to green, so one full loop takes exactly `cycle` ticks.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    #[error("green light time must be at least one tick")]
    NoGreen,

    #[error("green ({green}) plus two yellows ({yellow} each) must be shorter than the cycle ({cycle})")]
    CycleTooShort { cycle: u32, green: u32, yellow: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalState {
    Green,
    Yellow,
    Red,
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            SignalState::Green => "🟢",
            SignalState::Yellow => "🟡",
            SignalState::Red => "🔴",
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    cycle: u32,
    green: u32,
    yellow: u32,
    state: SignalState,
    previous: SignalState,
    time_to_change: u32,
}

impl Signal {
    /// A signal starting at the beginning of its green phase
    pub fn new(cycle: u32, green: u32, yellow: u32) -> Result<Self, SignalError> {
        if green == 0 {
            return Err(SignalError::NoGreen);
        }
        let lit = yellow
            .checked_mul(2)
            .and_then(|yellows| yellows.checked_add(green));
        if !matches!(lit, Some(lit) if lit < cycle) {
            return Err(SignalError::CycleTooShort {
                cycle,
                green,
                yellow,
            });
        }

        let previous = if yellow > 0 {
            SignalState::Yellow
        } else {
            SignalState::Red
        };
        Ok(Self {
            cycle,
            green,
            yellow,
            state: SignalState::Green,
            previous,
            time_to_change: green,
        })
    }

    /// Ticks spent in `state` each time it is entered
    pub fn duration(&self, state: SignalState) -> u32 {
        match state {
            SignalState::Green => self.green,
            SignalState::Yellow => self.yellow,
            SignalState::Red => self.cycle - self.green - 2 * self.yellow,
        }
    }

    /// Advance one tick
    pub fn update(&mut self) {
        self.time_to_change -= 1;
        if self.time_to_change == 0 {
            let next = self.next_state();
            self.previous = self.state;
            self.state = next;
            self.time_to_change = self.duration(next);
        }
    }

    fn next_state(&self) -> SignalState {
        match self.state {
            SignalState::Green if self.yellow == 0 => SignalState::Red,
            SignalState::Red if self.yellow == 0 => SignalState::Green,
            SignalState::Green | SignalState::Red => SignalState::Yellow,
            SignalState::Yellow if self.previous == SignalState::Green => SignalState::Red,
            SignalState::Yellow => SignalState::Green,
        }
    }

    pub fn state(&self) -> SignalState {
        self.state
    }

    /// State held before the last transition
    pub fn previous(&self) -> SignalState {
        self.previous
    }

    pub fn time_to_change(&self) -> u32 {
        self.time_to_change
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn is_green(&self) -> bool {
        self.state == SignalState::Green
    }

    pub fn is_yellow(&self) -> bool {
        self.state == SignalState::Yellow
    }

    pub fn is_red(&self) -> bool {
        self.state == SignalState::Red
    }

    /// Yellow that closes a walk phase
    pub fn is_yellow_after_green(&self) -> bool {
        self.is_yellow() && self.previous == SignalState::Green
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.state, self.time_to_change)
    }
}
