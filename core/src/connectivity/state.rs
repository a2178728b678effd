//! Connectivity states and the transition table
//!
//! [`transition`] is a pure function of the current state and the guard
//! inputs sampled *after* the state's action has run. Keeping it separate
//! from the actions lets the whole table be checked without any I/O.

/// States of the connectivity/session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum State {
    /// Initial state, nothing started yet
    Start = 0,
    /// Bringing up the network link
    ConnectNetwork = 1,
    /// One-time wall-clock synchronization
    SyncTime = 2,
    /// Opening a session with the remote collector
    ConnectSession = 3,
    /// Session open, deciding whether there is work
    Ready = 4,
    /// Draining the telemetry queue into the session
    Publish = 5,
    /// Closing the session
    CloseSession = 6,
    /// Tearing down the network link
    DisconnectNetwork = 7,
    /// Waiting for new telemetry, low power allowed
    Idle = 8,
    /// Recovering from a failed session connect
    RetrySession = 9,
    /// Unrecoverable failure; terminal
    Fatal = 10,
}

impl State {
    /// Every state, in discriminant order
    pub const ALL: [State; 11] = [
        State::Start,
        State::ConnectNetwork,
        State::SyncTime,
        State::ConnectSession,
        State::Ready,
        State::Publish,
        State::CloseSession,
        State::DisconnectNetwork,
        State::Idle,
        State::RetrySession,
        State::Fatal,
    ];

    /// Decode a discriminant stored in an atomic
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < Self::ALL.len() {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, State::Fatal)
    }
}

/// Guard conditions evaluated after a state's action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransitionInputs {
    /// The action raised the error flag
    pub error: bool,
    /// The one-time clock sync has not been attempted yet
    pub time_sync_required: bool,
    /// The telemetry queue holds no batches
    pub queue_empty: bool,
    /// The configured session retry budget is used up
    pub retries_exhausted: bool,
}

/// Next state for `state` given the post-action guard inputs
pub const fn transition(state: State, inputs: TransitionInputs) -> State {
    match state {
        State::Start => {
            if inputs.error {
                State::Fatal
            } else {
                State::ConnectNetwork
            }
        }
        State::ConnectNetwork => {
            if inputs.error {
                State::Fatal
            } else if inputs.time_sync_required {
                State::SyncTime
            } else {
                State::ConnectSession
            }
        }
        State::SyncTime => {
            if inputs.error {
                State::Fatal
            } else {
                State::ConnectSession
            }
        }
        State::ConnectSession => {
            if inputs.error {
                State::RetrySession
            } else {
                State::Ready
            }
        }
        State::Ready => {
            if inputs.queue_empty {
                State::CloseSession
            } else {
                State::Publish
            }
        }
        State::Publish => {
            if inputs.error {
                State::Fatal
            } else {
                State::Ready
            }
        }
        State::CloseSession => State::DisconnectNetwork,
        State::DisconnectNetwork => State::Idle,
        State::Idle => {
            if inputs.queue_empty {
                State::Idle
            } else {
                State::ConnectNetwork
            }
        }
        State::RetrySession => {
            if inputs.retries_exhausted {
                State::Fatal
            } else {
                State::ConnectSession
            }
        }
        State::Fatal => State::Fatal,
    }
}
