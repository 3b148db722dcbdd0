//! Connection health logging for the MongoDB driver
//!
//! The driver reports topology activity through SDAM events. Heartbeats and
//! server closures are reduced to `ConnectionEvent`s, and `ConnectionMonitor`
//! logs only the transitions: connected at `info`, the first failure at
//! `error`, closure at `warn`. Repeat failures on an already-down link go to
//! `debug` so a long outage does not flood the log.

use std::sync::atomic::{AtomicU8, Ordering};

use mongodb::event::sdam::SdamEvent;

/// Driver activity relevant to connection health
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    HeartbeatSucceeded { address: String },
    HeartbeatFailed { address: String, error: String },
    ServerClosed { address: String },
}

impl ConnectionEvent {
    pub fn from_sdam(event: &SdamEvent) -> Option<Self> {
        match event {
            SdamEvent::ServerHeartbeatSucceeded(e) => Some(Self::HeartbeatSucceeded {
                address: e.server_address.to_string(),
            }),
            SdamEvent::ServerHeartbeatFailed(e) => Some(Self::HeartbeatFailed {
                address: e.server_address.to_string(),
                error: e.failure.to_string(),
            }),
            SdamEvent::ServerClosed(e) => Some(Self::ServerClosed {
                address: e.address.to_string(),
            }),
            _ => None,
        }
    }
}

/// Link state as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Unknown = 0,
    Connected = 1,
    Disconnected = 2,
}

impl LinkState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Connected,
            2 => Self::Disconnected,
            _ => Self::Unknown,
        }
    }
}

/// Tracks link state across driver events and logs changes
#[derive(Debug)]
pub struct ConnectionMonitor {
    state: AtomicU8,
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self {
            state: AtomicU8::new(LinkState::Unknown as u8),
        }
    }
}

impl ConnectionMonitor {
    pub fn state(&self) -> LinkState {
        LinkState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Record an event. Returns the new state when it changed.
    pub fn observe(&self, event: &ConnectionEvent) -> Option<LinkState> {
        let next = match event {
            ConnectionEvent::HeartbeatSucceeded { .. } => LinkState::Connected,
            ConnectionEvent::HeartbeatFailed { .. } | ConnectionEvent::ServerClosed { .. } => {
                LinkState::Disconnected
            }
        };
        let prev = LinkState::from_u8(self.state.swap(next as u8, Ordering::AcqRel));

        match event {
            ConnectionEvent::HeartbeatSucceeded { address } if prev != next => {
                tracing::info!(%address, "MongoDB connected");
            }
            ConnectionEvent::HeartbeatFailed { address, error } if prev != next => {
                tracing::error!(%address, %error, "MongoDB connection error");
            }
            ConnectionEvent::HeartbeatFailed { address, error } => {
                tracing::debug!(%address, %error, "MongoDB still unreachable");
            }
            ConnectionEvent::ServerClosed { address } if prev != next => {
                tracing::warn!(%address, "MongoDB disconnected");
            }
            _ => {}
        }

        (prev != next).then_some(next)
    }

    /// Feed a raw driver event through `observe`.
    pub fn handle(&self, event: SdamEvent) {
        if let Some(event) = ConnectionEvent::from_sdam(&event) {
            self.observe(&event);
        }
    }
}
