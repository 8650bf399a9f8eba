// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes and octave-bound notes.
//!
//! A [`Note`] is an immutable pitch class plus octave. Flat spellings are
//! accepted on construction but always normalized to the sharp spelling,
//! so two notes compare equal whenever they sound the same.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TheoryError};

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Lowest supported octave
pub const MIN_OCTAVE: u8 = 0;

/// Highest supported octave
pub const MAX_OCTAVE: u8 = 8;

/// Number of distinct notes across the supported octaves
pub const NOTE_RANGE: usize = 12 * (MAX_OCTAVE - MIN_OCTAVE + 1) as usize;

/// Octave of the reference frequency and MIDI tables (A4 = 440 Hz, C4 = 60)
pub const REFERENCE_OCTAVE: u8 = 4;

/// Pitch classes in chromatic order, sharp spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Position (0-11) in the chromatic alphabet
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Pitch class from a chromatic position, wrapping out-of-range values
    pub fn from_index(index: i32) -> Self {
        PitchClass::ALL[index.rem_euclid(12) as usize]
    }

    /// Canonical (sharp) spelling
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Flat spelling, for the five black keys only
    pub fn alt_name(self) -> Option<&'static str> {
        match self {
            PitchClass::Cs => Some("Db"),
            PitchClass::Ds => Some("Eb"),
            PitchClass::Fs => Some("Gb"),
            PitchClass::Gs => Some("Ab"),
            PitchClass::As => Some("Bb"),
            _ => None,
        }
    }

    /// Canonical and alternate spelling joined for display, e.g. "D#|Eb"
    pub fn display_name(self) -> String {
        match self.alt_name() {
            Some(alt) => format!("{}|{}", self.name(), alt),
            None => self.name().to_string(),
        }
    }

    /// Parse a pitch class from its canonical or alternate spelling.
    ///
    /// The first letter is upper-cased before matching, so "db" and "Db"
    /// both resolve to C#. Anything else must match a table entry exactly.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = capitalize(name.trim());
        PitchClass::ALL
            .iter()
            .copied()
            .find(|pc| pc.name() == name || pc.alt_name() == Some(name.as_str()))
    }

    /// Frequency in Hz at the reference octave
    pub fn base_frequency(self) -> f64 {
        match self {
            PitchClass::C => 261.63,
            PitchClass::Cs => 277.18,
            PitchClass::D => 293.66,
            PitchClass::Ds => 311.13,
            PitchClass::E => 329.63,
            PitchClass::F => 349.23,
            PitchClass::Fs => 369.99,
            PitchClass::G => 392.00,
            PitchClass::Gs => 415.30,
            PitchClass::A => 440.00,
            PitchClass::As => 466.16,
            PitchClass::B => 493.88,
        }
    }

    /// MIDI id at the reference octave
    pub fn base_midi_id(self) -> MidiNote {
        60 + self.index()
    }

    /// Transpose by semitones, ignoring octaves
    pub fn transpose(self, semitones: i32) -> Self {
        PitchClass::from_index(self.index() as i32 + semitones)
    }

    /// Whether this is a black key on a piano keyboard
    pub fn is_accidental(self) -> bool {
        self.alt_name().is_some()
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Resolve either spelling of a note name to the canonical one.
///
/// "Eb" becomes "D#", "D#" stays "D#".
pub fn canonical_name(name: &str) -> Result<&'static str> {
    PitchClass::from_name(name)
        .map(PitchClass::name)
        .ok_or_else(|| TheoryError::InvalidNoteName(name.to_string()))
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn check_octave(octave: i64) -> Result<u8> {
    if octave < MIN_OCTAVE as i64 || octave > MAX_OCTAVE as i64 {
        let reported = octave.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        return Err(TheoryError::InvalidOctave(reported));
    }
    Ok(octave as u8)
}

/// A pitch class at a specific octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NoteRepr")]
pub struct Note {
    pitch_class: PitchClass,
    octave: u8,
}

/// Unchecked wire form of a note
#[derive(Deserialize)]
struct NoteRepr {
    pitch_class: PitchClass,
    octave: u8,
}

impl TryFrom<NoteRepr> for Note {
    type Error = TheoryError;

    fn try_from(repr: NoteRepr) -> Result<Self> {
        Note::new(repr.pitch_class, repr.octave)
    }
}

impl Note {
    /// Create a note, validating the octave
    pub fn new(pitch_class: PitchClass, octave: u8) -> Result<Self> {
        let octave = check_octave(octave as i64)?;
        Ok(Self {
            pitch_class,
            octave,
        })
    }

    // Fixed tables only; octave must already be within range
    pub(crate) const fn from_parts(pitch_class: PitchClass, octave: u8) -> Self {
        Self {
            pitch_class,
            octave,
        }
    }

    /// Create a note from a name such as "C", "c#" or "Bb"
    pub fn parse(name: &str, octave: u8) -> Result<Self> {
        let pitch_class = PitchClass::from_name(name)
            .ok_or_else(|| TheoryError::InvalidNoteName(name.to_string()))?;
        Note::new(pitch_class, octave)
    }

    /// Get the pitch class
    pub fn pitch_class(&self) -> PitchClass {
        self.pitch_class
    }

    /// Get the octave
    pub fn octave(&self) -> u8 {
        self.octave
    }

    /// Canonical name of the pitch class
    pub fn name(&self) -> &'static str {
        self.pitch_class.name()
    }

    /// Alternate spelling, or an empty string when there is none
    pub fn alternate_name(&self) -> &'static str {
        self.pitch_class.alt_name().unwrap_or("")
    }

    /// Frequency in Hz (equal temperament, A4 = 440 Hz)
    pub fn frequency(&self) -> f64 {
        let shift = self.octave as i32 - REFERENCE_OCTAVE as i32;
        self.pitch_class.base_frequency() * 2f64.powi(shift)
    }

    /// MIDI id (C4 = 60)
    pub fn midi_id(&self) -> MidiNote {
        let id = self.pitch_class.base_midi_id() as i32
            + 12 * (self.octave as i32 - REFERENCE_OCTAVE as i32);
        // Octaves 0-8 keep every id within 12..=119
        id as MidiNote
    }

    /// The note `half_steps` positions away along the chromatic alphabet.
    ///
    /// Negative values move down. The octave rolls over in both
    /// directions; leaving the supported range is an error.
    pub fn next_step(&self, half_steps: i32) -> Result<Note> {
        let index = self.pitch_class.index() as i64 + half_steps as i64;
        let octave = check_octave(self.octave as i64 + index.div_euclid(12))?;
        Ok(Note {
            pitch_class: PitchClass::from_index(index.rem_euclid(12) as i32),
            octave,
        })
    }

    /// `count` notes starting here, each a half step above the last
    pub fn consecutive_notes(&self, count: usize) -> Result<Vec<Note>> {
        let mut notes = Vec::with_capacity(count.min(NOTE_RANGE));
        let mut note = *self;
        for i in 0..count {
            if i > 0 {
                note = note.next_step(1)?;
            }
            notes.push(note);
        }
        Ok(notes)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(name: &str, octave: u8) -> Note {
        Note::parse(name, octave).unwrap()
    }

    #[test]
    fn test_pitch_class_index() {
        assert_eq!(PitchClass::C.index(), 0);
        assert_eq!(PitchClass::A.index(), 9);
        assert_eq!(PitchClass::B.index(), 11);
        assert_eq!(PitchClass::from_index(-1), PitchClass::B);
        assert_eq!(PitchClass::from_index(14), PitchClass::D);
    }

    #[test]
    fn test_pitch_class_from_name() {
        assert_eq!(PitchClass::from_name("C"), Some(PitchClass::C));
        assert_eq!(PitchClass::from_name("C#"), Some(PitchClass::Cs));
        assert_eq!(PitchClass::from_name("Db"), Some(PitchClass::Cs));
        assert_eq!(PitchClass::from_name("bb"), Some(PitchClass::As));
        assert_eq!(PitchClass::from_name("f#"), Some(PitchClass::Fs));
        assert_eq!(PitchClass::from_name("X"), None);
        assert_eq!(PitchClass::from_name("Fb"), None);
        assert_eq!(PitchClass::from_name(""), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(PitchClass::Ds.display_name(), "D#|Eb");
        assert_eq!(PitchClass::E.display_name(), "E");
        assert_eq!(canonical_name("Eb").unwrap(), "D#");
        assert_eq!(canonical_name("D#").unwrap(), "D#");
        assert!(canonical_name("H").is_err());
    }

    #[test]
    fn test_parse_normalizes_spelling() {
        let sharp = note("G#", 3);
        let flat = note("Ab", 3);
        assert_eq!(sharp, flat);
        assert_eq!(flat.name(), "G#");
        assert_eq!(flat.alternate_name(), "Ab");
        assert_eq!(note("E", 2).alternate_name(), "");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Note::parse("Q", 4),
            Err(TheoryError::InvalidNoteName("Q".to_string()))
        );
        assert_eq!(Note::parse("C", 9), Err(TheoryError::InvalidOctave(9)));
    }

    #[test]
    fn test_frequency_and_midi() {
        let a4 = note("A", 4);
        assert_eq!(a4.frequency(), 440.0);
        assert_eq!(a4.midi_id(), 69);

        let a5 = note("A", 5);
        assert_eq!(a5.frequency(), 880.0);
        assert_eq!(a5.midi_id(), 81);

        let c0 = note("C", 0);
        assert!((c0.frequency() - 261.63 / 16.0).abs() < 1e-9);
        assert_eq!(c0.midi_id(), 12);
        assert_eq!(note("B", 8).midi_id(), 119);
    }

    #[test]
    fn test_next_step_rollover() {
        assert_eq!(note("B", 3).next_step(1).unwrap(), note("C", 4));
        assert_eq!(note("C", 4).next_step(-1).unwrap(), note("B", 3));
        assert_eq!(note("C", 4).next_step(-13).unwrap(), note("B", 2));
        assert_eq!(note("A", 4).next_step(3).unwrap(), note("C", 5));
        assert_eq!(note("D", 4).next_step(0).unwrap(), note("D", 4));
    }

    #[test]
    fn test_next_step_out_of_range() {
        assert_eq!(
            note("C", 0).next_step(-1),
            Err(TheoryError::InvalidOctave(-1))
        );
        assert_eq!(note("B", 8).next_step(1), Err(TheoryError::InvalidOctave(9)));
    }

    #[test]
    fn test_next_step_inverse() {
        for pc in PitchClass::ALL {
            let n = Note::new(pc, 4).unwrap();
            for k in -30..=30 {
                assert_eq!(n.next_step(k).unwrap().next_step(-k).unwrap(), n);
            }
        }
    }

    #[test]
    fn test_full_cycle_is_one_octave() {
        for pc in PitchClass::ALL {
            let n = Note::new(pc, 3).unwrap();
            assert_eq!(n.next_step(12).unwrap(), Note::new(pc, 4).unwrap());
        }
    }

    #[test]
    fn test_consecutive_notes() {
        let notes = note("A", 3).consecutive_notes(5).unwrap();
        let names: Vec<String> = notes.iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["A3", "A#3", "B3", "C4", "C#4"]);

        assert!(note("C", 4).consecutive_notes(0).unwrap().is_empty());
        assert_eq!(note("C", 4).consecutive_notes(25).unwrap().len(), 25);
        assert!(note("A", 8).consecutive_notes(5).is_err());
    }

    #[test]
    fn test_next_step_extreme_values() {
        assert!(matches!(
            note("B", 4).next_step(i32::MAX),
            Err(TheoryError::InvalidOctave(_))
        ));
        assert!(matches!(
            note("C", 4).next_step(i32::MIN),
            Err(TheoryError::InvalidOctave(_))
        ));
        assert_eq!(note("C", 0).next_step(107).unwrap(), note("B", 8));
    }

    #[test]
    fn test_consecutive_notes_huge_count() {
        assert_eq!(
            note("C", 4).consecutive_notes(usize::MAX),
            Err(TheoryError::InvalidOctave(9))
        );
    }

    #[test]
    fn test_deserialize_validates_octave() {
        let a4: Note = serde_yaml::from_str("{pitch_class: A, octave: 4}").unwrap();
        assert_eq!(a4, note("A", 4));
        assert!(serde_yaml::from_str::<Note>("{pitch_class: A, octave: 9}").is_err());
        assert!(serde_yaml::from_str::<Note>("{pitch_class: A, octave: 200}").is_err());
    }
}
