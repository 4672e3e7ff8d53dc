// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for runtime operations

use core::fmt;

/// Which side of a pathway a connection count belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConDirection {
    Send,
    Recv,
}

impl fmt::Display for ConDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConDirection::Send => write!(f, "send"),
            ConDirection::Recv => write!(f, "recv"),
        }
    }
}

/// Runtime errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// More connections than a unit's counted slots
    CountExceeded {
        /// Side whose count ran out
        direction: ConDirection,
        /// Receiving unit index
        recv: usize,
        /// Sending unit index
        send: usize,
        /// Counted slots for that unit
        limit: usize,
    },

    /// Connection totals disagree
    CountMismatch {
        /// Sum of send counts
        send_total: usize,
        /// Sum of recv counts
        recv_total: usize,
        /// Number of set bits in the mask
        connections: usize,
    },

    /// A generated vector has the wrong length
    LengthMismatch {
        /// Which vector
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// No synapse from `send` to `recv`
    NotConnected {
        /// Sending unit index
        send: usize,
        /// Receiving unit index
        recv: usize,
    },

    /// Index outside a storage range
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Valid length
        len: usize,
    },

    /// Unknown synapse variable name
    UnknownVariable(String),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::CountExceeded {
                direction,
                recv,
                send,
                limit,
            } => {
                write!(
                    f,
                    "{} target total con number exceeded: recv {} send {} limit {}",
                    direction, recv, send, limit
                )
            }
            RuntimeError::CountMismatch {
                send_total,
                recv_total,
                connections,
            } => {
                write!(
                    f,
                    "Connection count mismatch: send total {}, recv total {}, connections {}",
                    send_total, recv_total, connections
                )
            }
            RuntimeError::LengthMismatch {
                what,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Length mismatch for {}: expected {}, got {}",
                    what, expected, actual
                )
            }
            RuntimeError::NotConnected { send, recv } => {
                write!(f, "No synapse from send {} to recv {}", send, recv)
            }
            RuntimeError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range (len {})", index, len)
            }
            RuntimeError::UnknownVariable(name) => {
                write!(f, "Unknown synapse variable: {}", name)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for runtime operations
pub type Result<T> = core::result::Result<T, RuntimeError>;
