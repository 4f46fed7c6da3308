//! Node identifiers and connection events
//!
//! One event is built per invocation from the three positional arguments
//! the linking controller passes to the hook.

use std::fmt;

/// AllStar / Echolink node number
pub type NodeId = u32;

pub const MARKER_CONNECTED: &str = "🔌";
pub const MARKER_DISCONNECTED: &str = "❌";
pub const MARKER_BLOCKED: &str = "🚫";

/// Link state reported by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    /// Map the controller's numeric flag (`1` connected, `0` disconnected)
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            1 => Some(ConnectionStatus::Connected),
            0 => Some(ConnectionStatus::Disconnected),
            _ => None,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => MARKER_CONNECTED,
            ConnectionStatus::Disconnected => MARKER_DISCONNECTED,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "connected to",
            ConnectionStatus::Disconnected => "disconnected from",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// A single connect/disconnect notification from the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionEvent {
    pub status: ConnectionStatus,
    /// Our node that the link was made on
    pub local: NodeId,
    /// The far end of the link
    pub remote: NodeId,
}

impl ConnectionEvent {
    pub fn new(status: ConnectionStatus, local: NodeId, remote: NodeId) -> Self {
        Self {
            status,
            local,
            remote,
        }
    }
}
