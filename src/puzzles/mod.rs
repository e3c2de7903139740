//! Classic puzzles expressed as search problems.
//!
//! Each puzzle owns a serde-deserializable config whose `Default` is the
//! textbook instance, validates it, and implements the engine contracts.

pub mod blocks;
pub mod grid;
pub mod jug;
pub mod monkey;
pub mod tictactoe;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Problems with puzzle parameters, detected before any search runs.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("{endpoint} cell ({row}, {col}) is covered by water")]
    BlockedEndpoint {
        endpoint: &'static str,
        row: usize,
        col: usize,
    },

    #[error("invalid capacity: {message}")]
    InvalidCapacity { message: String },

    #[error("target {target} exceeds both jug capacities ({capacity_a}, {capacity_b})")]
    UnreachableTarget {
        target: u32,
        capacity_a: u32,
        capacity_b: u32,
    },

    #[error("unknown block '{block}' in {context}")]
    UnknownBlock { block: String, context: &'static str },

    #[error("block '{block}' is placed more than once in {context}")]
    DuplicateBlock { block: char, context: &'static str },

    #[error("blocks stacked in a cycle through '{block}' in {context}")]
    CyclicStack { block: char, context: &'static str },

    #[error("inconsistent state: {message}")]
    Inconsistent { message: String },

    #[error("cannot parse '{input}': {message}")]
    Parse { input: String, message: String },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read a puzzle config from a JSON file.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
