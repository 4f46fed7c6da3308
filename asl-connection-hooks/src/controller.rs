//! Linking controller admin interface
//!
//! The only directive the hook ever issues is an immediate disconnect of a
//! blocked remote node, sent through `asterisk -rx`.

use crate::node::NodeId;
use async_trait::async_trait;
use log::{error, info};
use tokio::process::Command;

/// Capability to tell the controller to drop a link
#[async_trait]
pub trait ControllerClient: Send + Sync {
    /// Disconnect `remote` from `local`. Failures are logged, not returned.
    async fn disconnect(&self, local: NodeId, remote: NodeId);
}

/// `rpt fun` directive that drops `remote` from `local` (function `*1`)
pub fn disconnect_directive(local: NodeId, remote: NodeId) -> String {
    format!("rpt fun {} *1{}", local, remote)
}

/// Runs directives through the Asterisk remote console
#[derive(Debug, Clone)]
pub struct AsteriskController {
    command: String,
}

impl AsteriskController {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl ControllerClient for AsteriskController {
    async fn disconnect(&self, local: NodeId, remote: NodeId) {
        let directive = disconnect_directive(local, remote);
        info!("Running {} -rx \"{}\"", self.command, directive);

        match Command::new(&self.command)
            .arg("-rx")
            .arg(&directive)
            .status()
            .await
        {
            Ok(status) if status.success() => {}
            Ok(status) => error!("Controller directive \"{}\" exited with {}", directive, status),
            Err(e) => error!("Failed to run {}: {}", self.command, e),
        }
    }
}
