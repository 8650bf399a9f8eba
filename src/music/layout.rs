// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Instrument layouts for drawing collaborators: guitar fretboard and
//! piano keyboard. Only positions are computed here, never graphics.

use super::note::{Note, PitchClass};
use crate::error::Result;

/// Standard guitar tuning, high string first
pub const STANDARD_TUNING: [Note; 6] = [
    Note::from_parts(PitchClass::E, 4),
    Note::from_parts(PitchClass::B, 3),
    Note::from_parts(PitchClass::G, 3),
    Note::from_parts(PitchClass::D, 3),
    Note::from_parts(PitchClass::A, 2),
    Note::from_parts(PitchClass::E, 2),
];

/// Default number of frets on a guitar neck
pub const DEFAULT_FRETS: usize = 24;

/// A fretted neck described by its open strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fretboard {
    tuning: Vec<Note>,
    frets: usize,
}

impl Fretboard {
    /// Fretboard with the given open strings, string 1 first
    pub fn new(tuning: Vec<Note>, frets: usize) -> Self {
        Self { tuning, frets }
    }

    /// Six-string guitar in standard tuning
    pub fn standard(frets: usize) -> Self {
        Self::new(STANDARD_TUNING.to_vec(), frets)
    }

    /// Open string notes, string 1 first
    pub fn tuning(&self) -> &[Note] {
        &self.tuning
    }

    /// Number of frets
    pub fn frets(&self) -> usize {
        self.frets
    }

    /// Every note on the neck: one row per string, open string plus each fret
    pub fn notes(&self) -> Result<Vec<Vec<Note>>> {
        self.tuning
            .iter()
            .map(|open| open.consecutive_notes(self.frets.saturating_add(1)))
            .collect()
    }

    /// `(string, fret)` pairs whose pitch class is in `pitch_classes`.
    ///
    /// Strings are numbered from 1; fret 0 is the open string.
    pub fn positions_of(&self, pitch_classes: &[PitchClass]) -> Vec<(usize, usize)> {
        let mut positions = Vec::new();
        for (string, open) in self.tuning.iter().enumerate() {
            for fret in 0..=self.frets {
                let pc = open.pitch_class().transpose(fret as i32);
                if pitch_classes.contains(&pc) {
                    positions.push((string + 1, fret));
                }
            }
        }
        positions
    }
}

impl Default for Fretboard {
    fn default() -> Self {
        Self::standard(DEFAULT_FRETS)
    }
}

/// One piano key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    /// Note sounded by the key
    pub note: Note,
    /// True for the raised keys (sharps and flats)
    pub black: bool,
}

impl Key {
    /// Key for a note, colored by its pitch class
    pub fn new(note: Note) -> Self {
        Self {
            note,
            black: note.pitch_class().is_accidental(),
        }
    }

    /// Check if this is a black key
    pub fn is_black(&self) -> bool {
        self.black
    }
}

/// `octaves` octaves of piano keys starting at `start`
pub fn keyboard(start: Note, octaves: usize) -> Result<Vec<Key>> {
    Ok(start
        .consecutive_notes(octaves.saturating_mul(12))?
        .into_iter()
        .map(Key::new)
        .collect())
}

/// Indexes of keys whose pitch class is in `pitch_classes`
pub fn highlighted(keys: &[Key], pitch_classes: &[PitchClass]) -> Vec<usize> {
    keys.iter()
        .enumerate()
        .filter(|(_, key)| pitch_classes.contains(&key.note.pitch_class()))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TheoryError;

    #[test]
    fn test_standard_tuning() {
        let board = Fretboard::default();
        let open: Vec<String> = board.tuning().iter().map(|n| n.to_string()).collect();
        assert_eq!(open, vec!["E4", "B3", "G3", "D3", "A2", "E2"]);
        assert_eq!(board.frets(), 24);
    }

    #[test]
    fn test_fretboard_notes() {
        let board = Fretboard::standard(12);
        let notes = board.notes().unwrap();
        assert_eq!(notes.len(), 6);
        assert!(notes.iter().all(|row| row.len() == 13));
        assert_eq!(notes[0][12].to_string(), "E5");
        assert_eq!(notes[5][5].to_string(), "A2");
    }

    #[test]
    fn test_fretboard_out_of_range() {
        let board = Fretboard::new(vec![Note::parse("C", 8).unwrap()], 12);
        assert_eq!(board.notes(), Err(TheoryError::InvalidOctave(9)));
    }

    #[test]
    fn test_huge_layouts_fail_cleanly() {
        let board = Fretboard::new(vec![Note::parse("E", 4).unwrap()], usize::MAX);
        assert_eq!(board.notes(), Err(TheoryError::InvalidOctave(9)));

        let keys = keyboard(Note::parse("C", 4).unwrap(), usize::MAX);
        assert_eq!(keys, Err(TheoryError::InvalidOctave(9)));
    }

    #[test]
    fn test_key_color() {
        let key = Key::new(Note::parse("Eb", 4).unwrap());
        assert!(key.is_black());
        assert_eq!(key.note.to_string(), "D#4");
        assert!(!Key::new(Note::parse("E", 4).unwrap()).black);
    }

    #[test]
    fn test_positions_of() {
        let board = Fretboard::standard(5);
        let positions = board.positions_of(&[PitchClass::A]);
        assert_eq!(positions, vec![(1, 5), (3, 2), (5, 0), (6, 5)]);
        assert!(board.positions_of(&[]).is_empty());
    }

    #[test]
    fn test_keyboard_black_keys() {
        let keys = keyboard(Note::parse("C", 4).unwrap(), 1).unwrap();
        assert_eq!(keys.len(), 12);
        let pattern: Vec<bool> = keys.iter().map(Key::is_black).collect();
        assert_eq!(
            pattern,
            vec![false, true, false, true, false, false, true, false, true, false, true, false]
        );
    }

    #[test]
    fn test_keyboard_highlight() {
        let keys = keyboard(Note::parse("C", 3).unwrap(), 2).unwrap();
        assert_eq!(keys.len(), 24);
        let lit = highlighted(&keys, &[PitchClass::C, PitchClass::E, PitchClass::G]);
        assert_eq!(lit, vec![0, 4, 7, 12, 16, 19]);
    }
}
