//! Error types for the simulation.
//!
//! Most conditions in the simulation are recoverable no-ops (a duplicate path
//! request, an empty candidate set). The errors here cover the cases where a
//! caller hands the engine something it cannot act on at all.

use std::path::PathBuf;

use thiserror::Error;

use crate::game::NodeId;

/// Errors from board mutations requested by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The node handle does not refer to a node on this board.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    /// A path must connect two distinct nodes.
    #[error("path from node {0} to itself")]
    SelfLoop(NodeId),
    /// More nodes than a board can address.
    #[error("{0} nodes exceed the board limit")]
    TooManyNodes(usize),
}

/// Errors from loading or validating a [`SimConfig`](crate::SimConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the simulation cannot run with.
    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Errors from dealing node positions for a new level.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// No free spot was found for a node within the attempt budget.
    #[error("no room for node {index} after {attempts} attempts")]
    NoRoom {
        /// Index of the node that could not be placed.
        index: usize,
        /// Attempts made before giving up.
        attempts: u32,
    },
    /// The dealt nodes do not fit in a board.
    #[error(transparent)]
    Board(#[from] BoardError),
    /// The arena is too small to hold a disc of the configured radius.
    #[error("arena {width}x{height} cannot fit nodes of radius {radius}")]
    ArenaTooSmall {
        /// Arena width.
        width: f64,
        /// Arena height.
        height: f64,
        /// Node radius.
        radius: f64,
    },
}

/// Errors from running a headless match.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The board could not be laid out.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = BoardError::UnknownNode(NodeId::new(7));
        assert_eq!(format!("{err}"), "unknown node #7");

        let err = BoardError::SelfLoop(NodeId::new(2));
        assert!(format!("{err}").contains("itself"));

        let err = BoardError::TooManyNodes(70_000);
        assert_eq!(format!("{err}"), "70000 nodes exceed the board limit");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            field: "growth_cap",
            reason: "must be positive",
        };
        assert_eq!(
            format!("{err}"),
            "invalid configuration: growth_cap must be positive"
        );
    }

    #[test]
    fn test_layout_error_display() {
        let err = LayoutError::NoRoom {
            index: 3,
            attempts: 10_000,
        };
        assert!(format!("{err}").contains("node 3"));
    }
}
