// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord progressions built from key degrees.
//!
//! A key such as `"A"` or `"Am"` selects a degree table; each requested
//! degree resolves to the default chord of that degree and its root.
//! Degree sequences can be parsed from text (`"I-IV-V"`, `"1 4 5"`) or
//! drawn from common functional templates.

use rand::Rng;

use super::construct::construct_chord;
use super::note::{Note, PitchClass};
use super::tables::{ScaleFamily, TheoryTables};
use crate::error::{Result, TheoryError};

/// Common functional progressions, as scale degrees
pub const FUNCTIONAL_TEMPLATES: [[u8; 4]; 5] = [
    [1, 4, 5, 1], // I-IV-V-I
    [1, 5, 6, 4], // I-V-vi-IV (pop)
    [2, 5, 1, 1], // ii-V-I
    [1, 6, 4, 5], // I-vi-IV-V
    [1, 4, 6, 5], // I-IV-vi-V
];

const NUMERALS: [&str; 7] = ["i", "ii", "iii", "iv", "v", "vi", "vii"];

/// Split a key like `"Am"` or `"F#"` into its root and family
pub fn parse_key(key: &str) -> Result<(PitchClass, ScaleFamily)> {
    let key = key.trim();
    let (name, family) = match key.strip_suffix('m') {
        Some(root) => (root, ScaleFamily::Minor),
        None => (key, ScaleFamily::Major),
    };
    let root = PitchClass::from_name(name)
        .ok_or_else(|| TheoryError::InvalidNoteName(key.to_string()))?;
    Ok((root, family))
}

/// Chords of a progression as parallel sequences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    /// Key root
    pub key: PitchClass,
    /// Major or minor key
    pub family: ScaleFamily,
    /// Root of each chord
    pub roots: Vec<PitchClass>,
    /// Chord table name of each chord
    pub chord_names: Vec<String>,
    /// Octave of each chord root
    pub octaves: Vec<u8>,
    /// Roman numeral of each chord
    pub numerals: Vec<&'static str>,
    /// Requested degrees with no chord in this key
    pub skipped: Vec<u8>,
}

impl Progression {
    /// Number of resolved chords
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Check if no degree resolved
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Realize every chord as notes
    pub fn chords(&self, tables: &TheoryTables) -> Result<Vec<Vec<Note>>> {
        self.roots
            .iter()
            .zip(&self.chord_names)
            .zip(&self.octaves)
            .map(|((&root, name), &octave)| {
                let root = Note::new(root, octave)?;
                construct_chord(root, &tables.chord(name)?.signature)
            })
            .collect()
    }
}

/// Resolve scale degrees of `key` into chords.
///
/// A trailing `m` on the key selects the minor degree table. Degrees
/// outside 1-7 have no chord and are recorded in `skipped`.
pub fn chord_progression(
    tables: &TheoryTables,
    key: &str,
    degrees: &[u8],
    octave: u8,
) -> Result<Progression> {
    let (key_root, family) = parse_key(key)?;
    let tonic = Note::new(key_root, octave)?;

    let mut progression = Progression {
        key: key_root,
        family,
        roots: Vec::with_capacity(degrees.len()),
        chord_names: Vec::with_capacity(degrees.len()),
        octaves: Vec::with_capacity(degrees.len()),
        numerals: Vec::with_capacity(degrees.len()),
        skipped: Vec::new(),
    };

    for &degree in degrees {
        let Some(info) = tables.degree_info(family, degree) else {
            progression.skipped.push(degree);
            continue;
        };
        let root = tonic.next_step(info.offset as i32)?;
        let chord = tables.chord(info.chord)?;
        progression.roots.push(root.pitch_class());
        progression.octaves.push(root.octave());
        progression.chord_names.push(chord.name.clone());
        progression.numerals.push(info.numeral);
    }

    Ok(progression)
}

/// Parse a degree sequence such as `"I-IV-V"`, `"ii V I"` or `"1,4,5"`
pub fn parse_degrees(text: &str) -> Result<Vec<u8>> {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == ',')
        .filter(|t| !t.is_empty())
        .map(parse_degree)
        .collect()
}

fn parse_degree(token: &str) -> Result<u8> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        return token
            .parse()
            .map_err(|_| TheoryError::InvalidDegreeReference(token.to_string()));
    }
    let numeral = token
        .trim_end_matches(['\u{b0}', 'o', '+'])
        .to_lowercase();
    NUMERALS
        .iter()
        .position(|n| *n == numeral)
        .map(|i| i as u8 + 1)
        .ok_or_else(|| TheoryError::InvalidDegreeReference(token.to_string()))
}

/// Roman numeral for a degree in a key family
pub fn numeral(family: ScaleFamily, degree: u8) -> Option<&'static str> {
    family.degree(degree).map(|info| info.numeral)
}

/// `len` degrees following one randomly chosen functional template
pub fn functional_degrees<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<u8> {
    let template = &FUNCTIONAL_TEMPLATES[rng.gen_range(0..FUNCTIONAL_TEMPLATES.len())];
    template.iter().copied().cycle().take(len).collect()
}

/// `len` degrees drawn uniformly from the key
pub fn random_degrees<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen_range(1..=7)).collect()
}
