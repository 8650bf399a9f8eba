// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Theory tables: scale signatures, chord signatures, modes and key degrees.
//!
//! [`TheoryTables`] is built once and never mutated. The built-in tables
//! live behind [`TheoryTables::builtin`]; user definitions loaded from a
//! config file produce a new, validated instance instead of patching the
//! shared one.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::degree::{DegreeRef, Step};
use super::note::PitchClass;
use crate::error::{Result, TableKind, TheoryError};

/// Ordered step pattern defining a scale type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScaleSignature(Vec<Step>);

impl ScaleSignature {
    /// Create a signature from steps
    pub fn new(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    /// Get the steps
    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the signature has no steps
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total span in half steps
    pub fn span(&self) -> u32 {
        self.0.iter().map(|s| s.half_steps() as u32).sum()
    }
}

impl FromStr for ScaleSignature {
    type Err = TheoryError;

    /// Parse a whitespace or comma separated list such as "T T S T T T S"
    fn from_str(s: &str) -> Result<Self> {
        s.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Step>>>()
            .map(ScaleSignature)
    }
}

impl fmt::Display for ScaleSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<&str> = self.0.iter().map(|s| s.symbol()).collect();
        write!(f, "{}", symbols.join("-"))
    }
}

/// Ordered degree references defining a chord relative to the major scale
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChordSignature(Vec<DegreeRef>);

impl ChordSignature {
    /// Create a signature from degree references
    pub fn new(degrees: Vec<DegreeRef>) -> Self {
        Self(degrees)
    }

    /// Get the degree references
    pub fn degrees(&self) -> &[DegreeRef] {
        &self.0
    }

    /// Number of chord tones
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the signature has no tones
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest degree number referenced
    pub fn max_degree(&self) -> u8 {
        self.0.iter().map(|d| d.degree()).max().unwrap_or(0)
    }
}

impl FromStr for ChordSignature {
    type Err = TheoryError;

    /// Parse a whitespace or comma separated list such as "1 b3 5"
    fn from_str(s: &str) -> Result<Self> {
        s.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<DegreeRef>>>()
            .map(ChordSignature)
    }
}

impl fmt::Display for ChordSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degrees: Vec<String> = self.0.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", degrees.join(" "))
    }
}

/// The seven modes of a heptatonic scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    /// All modes in rotation order
    pub const ALL: [Mode; 7] = [
        Mode::Ionian,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Locrian,
    ];

    /// Rotation offset (1-based): the scale degree the mode starts on
    pub fn offset(self) -> u8 {
        self as u8 + 1
    }

    /// Mode from its 1-based offset
    pub fn from_offset(offset: u8) -> Option<Self> {
        offset
            .checked_sub(1)
            .and_then(|i| Mode::ALL.get(i as usize))
            .copied()
    }

    /// Get the mode name
    pub fn name(self) -> &'static str {
        match self {
            Mode::Ionian => "Ionian",
            Mode::Dorian => "Dorian",
            Mode::Phrygian => "Phrygian",
            Mode::Lydian => "Lydian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Aeolian => "Aeolian",
            Mode::Locrian => "Locrian",
        }
    }

    /// Parse a mode name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let key = normalize(name);
        Mode::ALL.iter().copied().find(|m| normalize(m.name()) == key)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Key families with a diatonic degree table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleFamily {
    Major,
    Minor,
}

/// Default chord for one degree of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeInfo {
    /// Roman numeral, upper case for major chords
    pub numeral: &'static str,
    /// Name of the chord in the chord table
    pub chord: &'static str,
    /// Semitones from the key root
    pub offset: u8,
}

const fn info(numeral: &'static str, chord: &'static str, offset: u8) -> DegreeInfo {
    DegreeInfo {
        numeral,
        chord,
        offset,
    }
}

const MAJOR_DEGREES: [DegreeInfo; 7] = [
    info("I", "Major_triad", 0),
    info("ii", "Minor_triad", 2),
    info("iii", "Minor_triad", 4),
    info("IV", "Major_triad", 5),
    info("V", "Major_triad", 7),
    info("vi", "Minor_triad", 9),
    info("vii\u{b0}", "Diminished", 11),
];

const MINOR_DEGREES: [DegreeInfo; 7] = [
    info("i", "Minor_triad", 0),
    info("ii\u{b0}", "Diminished", 2),
    info("III", "Major_triad", 3),
    info("iv", "Minor_triad", 5),
    info("v", "Minor_triad", 7),
    info("VI", "Major_triad", 8),
    info("VII", "Major_triad", 10),
];

impl ScaleFamily {
    /// Name of the scale this family is built on
    pub fn scale_name(self) -> &'static str {
        match self {
            ScaleFamily::Major => "Major",
            ScaleFamily::Minor => "Minor",
        }
    }

    /// Degree table for degrees 1-7
    pub fn degrees(self) -> &'static [DegreeInfo; 7] {
        match self {
            ScaleFamily::Major => &MAJOR_DEGREES,
            ScaleFamily::Minor => &MINOR_DEGREES,
        }
    }

    /// Default chord for a 1-based degree, if the family defines one
    pub fn degree(self, degree: u8) -> Option<&'static DegreeInfo> {
        degree
            .checked_sub(1)
            .and_then(|i| self.degrees().get(i as usize))
    }
}

/// Circle of fifths starting at C
pub fn circle_of_fifths() -> [PitchClass; 12] {
    let mut circle = [PitchClass::C; 12];
    for (i, slot) in circle.iter_mut().enumerate() {
        *slot = PitchClass::from_index(i as i32 * 7);
    }
    circle
}

/// Position (0-11) of a key on the circle of fifths
pub fn fifth_position(pitch_class: PitchClass) -> usize {
    // Seven is its own inverse mod 12
    (pitch_class.index() as usize * 7) % 12
}

/// Relative minor of a major key
pub fn relative_minor(major: PitchClass) -> PitchClass {
    major.transpose(-3)
}

/// Relative major of a minor key
pub fn relative_major(minor: PitchClass) -> PitchClass {
    minor.transpose(3)
}

/// A named scale signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleDefinition {
    /// Name of the scale
    pub name: String,
    /// Step pattern
    pub signature: ScaleSignature,
    /// Free-form description
    #[serde(default)]
    pub info: String,
}

/// A named chord signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordDefinition {
    /// Name of the chord
    pub name: String,
    /// Degree references relative to the major scale
    pub signature: ChordSignature,
    /// Free-form description
    #[serde(default)]
    pub info: String,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-', '_'], "")
}

use Step::{Semitone as S, Tone as T, ToneAndHalf as TS};

const BUILTIN_SCALES: &[(&str, &[Step], &str)] = &[
    ("Major", &[T, T, S, T, T, T, S], "The Do Re Me sequence that everyone knows"),
    ("Minor", &[T, S, T, T, S, T, T], "Natural minor"),
    ("Diminished", &[T, S, T, S, T, S, T], ""),
    ("Augmented", &[TS, S, TS, S, TS, S, TS], ""),
    ("Major_pentatonic", &[T, T, TS, T, TS], ""),
    ("Minor_pentatonic", &[TS, T, T, TS, T], ""),
    ("Blues", &[TS, T, S, S, TS, T], ""),
    ("Harmonic_minor", &[T, S, T, T, S, TS, S], "Minor with a raised 7th"),
    ("Melodic_minor", &[T, S, T, T, T, T, S], "Ascending form"),
    ("Whole_tone", &[T, T, T, T, T, T], ""),
    ("Chromatic", &[S, S, S, S, S, S, S, S, S, S, S, S], ""),
];

const fn n(degree: u8) -> DegreeRef {
    DegreeRef::natural(degree)
}

const fn b(degree: u8) -> DegreeRef {
    DegreeRef::flat(degree)
}

const fn s(degree: u8) -> DegreeRef {
    DegreeRef::sharp(degree)
}

const BUILTIN_CHORDS: &[(&str, &[DegreeRef], &str)] = &[
    ("Major_triad", &[n(1), n(3), n(5)], "Happy"),
    ("Minor_triad", &[n(1), b(3), n(5)], "Sad"),
    ("Power", &[n(1), n(5), n(8)], "Powerful, used a lot in rock and metal"),
    ("Diminished", &[n(1), b(3), b(5)], "Unpleasant, dramatic"),
    ("Augmented", &[n(1), n(3), s(5)], "Mysterious, uneasy"),
    ("Suspended_2", &[n(1), n(2), n(5)], ""),
    ("Suspended_4", &[n(1), n(4), n(5)], ""),
    ("Major_7th", &[n(1), n(3), n(5), n(7)], ""),
    ("Minor_7th", &[n(1), b(3), n(5), b(7)], ""),
    ("Dominant_7th", &[n(1), n(3), n(5), b(7)], ""),
    ("Half_diminished", &[n(1), b(3), b(5), b(7)], "Minor 7th flat 5 (m7b5)"),
    // Double-flat 7 is spelled as the major 6th
    ("Whole_diminished", &[n(1), b(3), b(5), n(6)], "Diminished 7th"),
    ("Major_9th", &[n(1), n(3), n(5), n(7), n(9)], "The 5th can be omitted"),
    ("Minor_9th", &[n(1), b(3), n(5), b(7), n(9)], "The 5th can be omitted"),
    ("Dominant_9th", &[n(1), n(3), n(5), b(7), n(9)], "The 5th can be omitted"),
];

/// Read-only lookup tables for scales, chords and modes
#[derive(Debug, Clone, PartialEq)]
pub struct TheoryTables {
    scales: Vec<ScaleDefinition>,
    chords: Vec<ChordDefinition>,
}

impl Default for TheoryTables {
    fn default() -> Self {
        let scales = BUILTIN_SCALES
            .iter()
            .map(|&(name, steps, info)| ScaleDefinition {
                name: name.to_string(),
                signature: ScaleSignature::new(steps.to_vec()),
                info: info.to_string(),
            })
            .collect();
        let chords = BUILTIN_CHORDS
            .iter()
            .map(|&(name, degrees, info)| ChordDefinition {
                name: name.to_string(),
                signature: ChordSignature::new(degrees.to_vec()),
                info: info.to_string(),
            })
            .collect();
        Self { scales, chords }
    }
}

impl TheoryTables {
    /// Shared built-in tables, initialized on first use
    pub fn builtin() -> &'static TheoryTables {
        static BUILTIN: OnceLock<TheoryTables> = OnceLock::new();
        BUILTIN.get_or_init(TheoryTables::default)
    }

    /// New tables with user definitions merged over these ones.
    ///
    /// A definition whose name matches an existing entry replaces it;
    /// other definitions are appended in order. Empty signatures are
    /// rejected and nothing is merged.
    pub fn with_definitions(
        &self,
        scales: &[ScaleDefinition],
        chords: &[ChordDefinition],
    ) -> Result<TheoryTables> {
        if let Some(def) = scales.iter().find(|d| d.signature.is_empty()) {
            return Err(TheoryError::EmptySignature(def.name.clone()));
        }
        if let Some(def) = chords.iter().find(|d| d.signature.is_empty()) {
            return Err(TheoryError::EmptySignature(def.name.clone()));
        }

        let mut tables = self.clone();
        for def in scales {
            upsert(&mut tables.scales, def.clone(), |d| &d.name);
        }
        for def in chords {
            upsert(&mut tables.chords, def.clone(), |d| &d.name);
        }
        Ok(tables)
    }

    /// Look up a scale by name
    pub fn scale(&self, name: &str) -> Result<&ScaleDefinition> {
        let key = normalize(name);
        self.scales
            .iter()
            .find(|d| normalize(&d.name) == key)
            .ok_or_else(|| TheoryError::unknown(TableKind::Scale, name))
    }

    /// Look up a chord by name
    pub fn chord(&self, name: &str) -> Result<&ChordDefinition> {
        let key = normalize(name);
        self.chords
            .iter()
            .find(|d| normalize(&d.name) == key)
            .ok_or_else(|| TheoryError::unknown(TableKind::Chord, name))
    }

    /// Look up a mode by name
    pub fn mode(&self, name: &str) -> Result<Mode> {
        Mode::from_name(name).ok_or_else(|| TheoryError::unknown(TableKind::Mode, name))
    }

    /// Default chord for a degree of a key family
    pub fn degree_info(&self, family: ScaleFamily, degree: u8) -> Option<&'static DegreeInfo> {
        family.degree(degree)
    }

    /// All scale definitions in table order
    pub fn scales(&self) -> &[ScaleDefinition] {
        &self.scales
    }

    /// All chord definitions in table order
    pub fn chords(&self) -> &[ChordDefinition] {
        &self.chords
    }

    /// Scale names in table order
    pub fn scale_names(&self) -> Vec<&str> {
        self.scales.iter().map(|d| d.name.as_str()).collect()
    }

    /// Chord names in table order
    pub fn chord_names(&self) -> Vec<&str> {
        self.chords.iter().map(|d| d.name.as_str()).collect()
    }

    /// Mode names in rotation order
    pub fn mode_names(&self) -> Vec<&'static str> {
        Mode::ALL.iter().map(|m| m.name()).collect()
    }

    /// Canonical note names followed by their alternate spellings
    pub fn note_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = PitchClass::ALL.iter().map(|pc| pc.name()).collect();
        names.extend(PitchClass::ALL.iter().filter_map(|pc| pc.alt_name()));
        names
    }
}

fn upsert<E>(entries: &mut Vec<E>, entry: E, name: impl Fn(&E) -> &String) {
    let key = normalize(name(&entry));
    match entries.iter().position(|e| normalize(name(e)) == key) {
        Some(i) => entries[i] = entry,
        None => entries.push(entry),
    }
}
