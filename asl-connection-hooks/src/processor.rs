//! Connection event processor: the hook's decision core
//!
//! For each event, in order:
//! 1. Blocked remote node: disconnect it, send a "blocked" alert, stop
//! 2. Own or private remote node: stay silent
//! 3. Anything else: send a connected/disconnected alert

use crate::config::NodeClassification;
use crate::controller::ControllerClient;
use crate::directory::NodeDirectory;
use crate::node::{ConnectionEvent, NodeId, MARKER_BLOCKED};
use crate::notify::Notifier;
use chrono::{DateTime, Local};
use log::{debug, info};

const TIME_FORMAT: &str = "%H:%M:%S";

/// What the processor did with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Remote node was blocked and disconnected; alert sent
    Blocked { message: String },
    /// Own or private node; nothing sent
    Suppressed,
    /// Normal connect/disconnect alert sent
    Notified { message: String },
}

pub struct ConnectionEventProcessor {
    classification: NodeClassification,
    directory: NodeDirectory,
    notifier: Box<dyn Notifier>,
    controller: Box<dyn ControllerClient>,
    clock: fn() -> DateTime<Local>,
}

impl ConnectionEventProcessor {
    pub fn new(
        classification: NodeClassification,
        directory: NodeDirectory,
        notifier: Box<dyn Notifier>,
        controller: Box<dyn ControllerClient>,
    ) -> Self {
        Self {
            classification,
            directory,
            notifier,
            controller,
            clock: Local::now,
        }
    }

    /// Replace the wall clock used for the `at HH:MM:SS` suffix
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn handle(&self, event: ConnectionEvent) -> EventOutcome {
        debug!(
            "Handling event: node {} {} on {}",
            event.remote, event.status, event.local
        );

        if self.classification.is_blocked(event.remote) {
            info!("Node {} is blocked, disconnecting from {}", event.remote, event.local);
            self.controller.disconnect(event.local, event.remote).await;
            let message = self.blocked_message(event.local, event.remote);
            self.notifier.send(&message).await;
            return EventOutcome::Blocked { message };
        }

        if self.classification.is_suppressed(event.remote) {
            debug!("Node {} is own/private, not notifying", event.remote);
            return EventOutcome::Suppressed;
        }

        let message = format!(
            "{} Node {} {} {} {} at {}",
            event.status.marker(),
            event.remote,
            self.directory.lookup(event.remote),
            event.status.action(),
            self.local_display(event.local),
            self.timestamp()
        );
        self.notifier.send(&message).await;
        EventOutcome::Notified { message }
    }

    fn blocked_message(&self, local: NodeId, remote: NodeId) -> String {
        format!(
            "{} Blocked node {} {} was auto disconnected from {} {} at {}",
            MARKER_BLOCKED,
            remote,
            self.directory.lookup(remote),
            local,
            self.directory.lookup(local),
            self.timestamp()
        )
    }

    /// Echolink nodes are not in the directory, so they get a fixed label
    fn local_display(&self, local: NodeId) -> String {
        if self.classification.is_echolink(local) {
            format!("Echolink ({})", local)
        } else {
            format!("{} {}", local, self.directory.lookup(local))
        }
    }

    fn timestamp(&self) -> String {
        (self.clock)().format(TIME_FORMAT).to_string()
    }
}
