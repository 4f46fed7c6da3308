//! AllStar connection hooks
//!
//! Invoked by the node-linking controller whenever a remote node connects,
//! disconnects or is auto-blocked. Resolves node numbers through the local
//! node directory, filters out own/private chatter, drops blocked nodes and
//! forwards a one-line status to Pushover.

pub mod config;
pub mod controller;
pub mod directory;
pub mod node;
pub mod notify;
pub mod processor;

pub use config::{Config, ConfigError, NodeClassification};
pub use controller::{AsteriskController, ControllerClient};
pub use directory::{DirectoryFormat, NodeDirectory, NodeRecord};
pub use node::{ConnectionEvent, ConnectionStatus, NodeId};
pub use notify::{Notifier, PushoverNotifier};
pub use processor::{ConnectionEventProcessor, EventOutcome};
