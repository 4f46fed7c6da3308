//! Node directory: resolve node numbers to call sign and location
//!
//! Backed by the flat `astdb.txt` style file the linking controller keeps
//! on disk. Nothing is cached: every lookup streams the file from the top
//! and the first matching row wins. Rows end at LF, CRLF or a lone CR.

mod parser;

pub use parser::{decode_latin1, split_fields};

use crate::node::NodeId;
use log::{debug, error};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

pub const UNKNOWN_NODE: &str = "(unknown)";
pub const DB_READ_ERROR: &str = "(error reading db)";

/// Minimum fields a row needs: node, call sign, name, location
const MIN_FIELDS: usize = 4;
const COMMENT_PREFIX: char = ';';

/// Field delimiter and quote character of the directory file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DirectoryFormat {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_quote")]
    pub quote: char,
}

fn default_delimiter() -> char {
    '|'
}

fn default_quote() -> char {
    '\''
}

impl Default for DirectoryFormat {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            quote: default_quote(),
        }
    }
}

/// One resolved directory row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub node: NodeId,
    pub call_sign: String,
    pub name: String,
    pub location: String,
}

impl fmt::Display for NodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} in {})", self.call_sign, self.name, self.location)
    }
}

/// Read-only lookup over the node directory file
#[derive(Debug, Clone)]
pub struct NodeDirectory {
    path: PathBuf,
    format: DirectoryFormat,
}

impl NodeDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_format(path, DirectoryFormat::default())
    }

    pub fn with_format(path: impl Into<PathBuf>, format: DirectoryFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display string for `node`. Never fails: a miss yields `(unknown)`
    /// and an unreadable file yields `(error reading db)`.
    pub fn lookup(&self, node: NodeId) -> String {
        match self.find(node) {
            Ok(Some(record)) => record.to_string(),
            Ok(None) => {
                debug!("Node {} not found in {}", node, self.path.display());
                UNKNOWN_NODE.to_string()
            }
            Err(e) => {
                error!(
                    "Error reading node database {}: {}",
                    self.path.display(),
                    e
                );
                DB_READ_ERROR.to_string()
            }
        }
    }

    /// Scan the file for the first row matching `node`
    pub fn find(&self, node: NodeId) -> io::Result<Option<NodeRecord>> {
        let reader = BufReader::new(File::open(&self.path)?);
        for chunk in reader.split(b'\n') {
            let chunk = chunk?;
            for raw in chunk.split(|&b| b == b'\r') {
                let line = decode_latin1(raw);
                if let Some(record) = self.parse_row(&line, node) {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    /// Parse a row if it is a well-formed record for `node`.
    /// Comments, blank and malformed rows are skipped.
    fn parse_row(&self, line: &str, node: NodeId) -> Option<NodeRecord> {
        let mut fields = split_fields(line, self.format.delimiter, self.format.quote);
        if fields.len() < MIN_FIELDS || fields[0].starts_with(COMMENT_PREFIX) {
            return None;
        }
        let id: NodeId = fields[0].trim().parse().ok()?;
        if id != node {
            return None;
        }
        fields.truncate(MIN_FIELDS);
        let location = fields.pop()?;
        let name = fields.pop()?;
        let call_sign = fields.pop()?;
        Some(NodeRecord {
            node: id,
            call_sign,
            name,
            location,
        })
    }
}
