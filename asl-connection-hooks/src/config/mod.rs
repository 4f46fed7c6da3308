//! Hook configuration
//!
//! Loaded once at startup from a YAML document and validated eagerly.
//! Any failure here is fatal: the hook exits before an event is processed.

mod classification;

pub use classification::NodeClassification;

use crate::directory::DirectoryFormat;
use crate::node::NodeId;
use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/asl-connection-hooks/config.yaml";
pub const DEFAULT_CONTROLLER_COMMAND: &str = "asterisk";

/// Top-level configuration document
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub nodes: NodeConfig,
    pub pushover: PushoverConfig,
    pub paths: PathConfig,
    #[serde(default)]
    pub directory: DirectoryFormat,
    #[serde(default)]
    pub controller: ControllerConfig,
}

/// Node classification lists
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    #[serde(deserialize_with = "node_list")]
    pub my_nodes: Vec<NodeId>,
    #[serde(deserialize_with = "node_list")]
    pub private_nodes: Vec<NodeId>,
    #[serde(deserialize_with = "node_list")]
    pub blocked_nodes: Vec<NodeId>,
    #[serde(default, deserialize_with = "optional_node")]
    pub echolink: Option<NodeId>,
}

/// Pushover credentials
#[derive(Debug, Clone, Deserialize)]
pub struct PushoverConfig {
    pub enabled: bool,
    #[serde(default)]
    pub api_token: String,
    #[serde(default)]
    pub user_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathConfig {
    /// Flat node directory (astdb.txt)
    pub node_db: PathBuf,
}

/// How to reach the linking controller's admin interface
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_controller_command")]
    pub command: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            command: default_controller_command(),
        }
    }
}

fn default_controller_command() -> String {
    DEFAULT_CONTROLLER_COMMAND.to_string()
}

impl Config {
    /// Read, parse and validate the configuration file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let config: Config =
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate an in-memory YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<memory>"),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Field-level checks serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pushover.enabled {
            if self.pushover.api_token.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "pushover.api_token",
                    "must be set when pushover is enabled",
                ));
            }
            if self.pushover.user_key.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "pushover.user_key",
                    "must be set when pushover is enabled",
                ));
            }
        }

        if self.paths.node_db.as_os_str().is_empty() {
            return Err(ConfigError::invalid("paths.node_db", "must not be empty"));
        }

        let format = &self.directory;
        for (key, c) in [
            ("directory.delimiter", format.delimiter),
            ("directory.quote", format.quote),
        ] {
            if c == '\n' || c == '\r' {
                return Err(ConfigError::invalid(key, "must not be a line terminator"));
            }
        }
        if format.delimiter == format.quote {
            return Err(ConfigError::invalid(
                "directory.quote",
                "must differ from directory.delimiter",
            ));
        }

        if self.controller.command.trim().is_empty() {
            return Err(ConfigError::invalid("controller.command", "must not be empty"));
        }

        for overlap in self.classification().overlaps() {
            warn!("Node {} appears in more than one node list", overlap);
        }

        Ok(())
    }

    pub fn classification(&self) -> NodeClassification {
        NodeClassification::from(&self.nodes)
    }
}

/// Node numbers may be written as YAML integers or numeric strings
#[derive(Deserialize)]
#[serde(untagged)]
enum NodeRepr {
    Number(u64),
    Text(String),
}

impl NodeRepr {
    fn into_node<E: serde::de::Error>(self) -> Result<Option<NodeId>, E> {
        match self {
            NodeRepr::Number(n) => NodeId::try_from(n)
                .map(Some)
                .map_err(|_| E::custom(format!("node number {} out of range", n))),
            NodeRepr::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                s.parse::<NodeId>()
                    .map(Some)
                    .map_err(|_| E::custom(format!("invalid node number {:?}", s)))
            }
        }
    }
}

fn node_list<'de, D>(deserializer: D) -> Result<Vec<NodeId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<NodeRepr>>::deserialize(deserializer)?.unwrap_or_default();
    let mut nodes = Vec::with_capacity(raw.len());
    for entry in raw {
        match entry.into_node::<D::Error>()? {
            Some(node) => nodes.push(node),
            None => return Err(serde::de::Error::custom("empty node number in list")),
        }
    }
    Ok(nodes)
}

fn optional_node<'de, D>(deserializer: D) -> Result<Option<NodeId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NodeRepr>::deserialize(deserializer)? {
        None => Ok(None),
        // 0 means no echolink node
        Some(repr) => Ok(repr.into_node::<D::Error>()?.filter(|&n| n != 0)),
    }
}

/// Fatal configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration key `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            reason: reason.into(),
        }
    }
}
