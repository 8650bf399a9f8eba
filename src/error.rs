// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for theory table lookups and note construction.
//!
//! Every engine operation validates its inputs against the theory tables
//! and fails fast with one of these variants. Nothing is clamped or
//! silently corrected.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the music modules
pub type Result<T> = std::result::Result<T, TheoryError>;

/// Which table a failed lookup was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Scale,
    Chord,
    Mode,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Scale => write!(f, "scale"),
            TableKind::Chord => write!(f, "chord"),
            TableKind::Mode => write!(f, "mode"),
        }
    }
}

/// Errors raised by the theory engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TheoryError {
    /// Name matches neither a canonical nor an alternate spelling
    #[error("invalid note name: {0:?}")]
    InvalidNoteName(String),

    /// Octave outside the supported range
    #[error("invalid octave {0} (supported range is 0-8)")]
    InvalidOctave(i32),

    /// Scale, chord or mode name not present in the tables
    #[error("unknown {kind} name: {name:?}")]
    UnknownName { kind: TableKind, name: String },

    /// Modes only rotate heptatonic signatures
    #[error("modes require a 7-step scale signature, got {steps} steps")]
    UnsupportedMode { steps: usize },

    /// Degree reference that does not parse into a number plus modifier
    #[error("invalid degree reference: {0:?}")]
    InvalidDegreeReference(String),

    /// Scale step that is not a semitone, tone or tone-and-a-half
    #[error("invalid scale step: {0:?}")]
    InvalidStep(String),

    /// Table entry defined with no elements
    #[error("signature for {0:?} is empty")]
    EmptySignature(String),
}

impl TheoryError {
    pub(crate) fn unknown(kind: TableKind, name: &str) -> Self {
        TheoryError::UnknownName {
            kind,
            name: name.to_string(),
        }
    }
}
