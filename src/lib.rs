// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! mtlab: a music theory lab.
//!
//! Builds scales, modes, chords and progressions from a root note, and
//! loads extra scale and chord definitions from YAML or TOML files.

pub mod config;
pub mod error;
pub mod music;

pub use error::{Result, TableKind, TheoryError};
