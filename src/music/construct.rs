// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Construction engine: scales, modes, chords and chromatic positions.
//!
//! Every function here is pure. Inputs are a root [`Note`] and a signature
//! from the [`TheoryTables`]; outputs are fresh sequences of notes or
//! chromatic positions for playback and drawing collaborators.

use super::degree::{DegreeRef, Step, DEGREE_POSITIONS};
use super::note::{Note, NOTE_RANGE};
use super::tables::{ChordSignature, Mode, ScaleSignature, TheoryTables};
use crate::error::{Result, TheoryError};

/// Degrees covered by the reference scale used for chords (up to the 9th)
pub const REFERENCE_DEGREES: usize = 9;

/// Build a scale from `root`.
///
/// The result starts with `root` and adds one note per step. `length`
/// defaults to the number of steps, which closes the octave for most
/// signatures; longer lengths reuse the step pattern cyclically.
pub fn construct_scale(
    root: Note,
    signature: &ScaleSignature,
    length: Option<usize>,
) -> Result<Vec<Note>> {
    let steps = signature.steps();
    let length = length.unwrap_or(steps.len());
    if steps.is_empty() && length > 0 {
        return Err(TheoryError::EmptySignature("scale".to_string()));
    }

    let mut notes = Vec::with_capacity(length.saturating_add(1).min(NOTE_RANGE));
    let mut note = root;
    notes.push(note);
    for step in steps.iter().cycle().take(length) {
        note = note.next_step(step.half_steps() as i32)?;
        notes.push(note);
    }
    Ok(notes)
}

/// Rotate a heptatonic signature to start on the mode's degree
pub fn apply_mode(signature: &ScaleSignature, mode: Mode) -> Result<ScaleSignature> {
    if signature.len() != 7 {
        return Err(TheoryError::UnsupportedMode {
            steps: signature.len(),
        });
    }
    let mut steps = signature.steps().to_vec();
    steps.rotate_left(mode.offset() as usize - 1);
    Ok(ScaleSignature::new(steps))
}

/// Build a modal scale: rotate the signature, then construct from `root`
pub fn construct_modal_scale(
    root: Note,
    signature: &ScaleSignature,
    mode: Mode,
    length: Option<usize>,
) -> Result<Vec<Note>> {
    let rotated = apply_mode(signature, mode)?;
    construct_scale(root, &rotated, length)
}

/// Major step pattern that chord degrees are measured against
pub fn major_signature() -> ScaleSignature {
    use Step::{Semitone as S, Tone as T};
    ScaleSignature::new(vec![T, T, S, T, T, T, S])
}

/// Major scale from `root` covering degrees 1 through 9
pub fn reference_scale(root: Note) -> Result<Vec<Note>> {
    construct_scale(root, &major_signature(), Some(REFERENCE_DEGREES - 1))
}

// Half steps from the root to a major-scale degree, past the octave if needed
fn reference_offset(degree: &DegreeRef) -> i32 {
    let index = degree.degree() as usize - 1;
    let octaves = (index / 7) as i32;
    DEGREE_POSITIONS[index % 7] as i32 + 12 * octaves
}

/// Build a chord from `root`.
///
/// Each degree reference picks the matching note of the major scale on
/// `root` and shifts it by the reference's modifier. Degrees above 7 land
/// in the following octave(s); nothing is folded back.
pub fn construct_chord(root: Note, signature: &ChordSignature) -> Result<Vec<Note>> {
    if signature.is_empty() {
        return Err(TheoryError::EmptySignature("chord".to_string()));
    }
    signature
        .degrees()
        .iter()
        .map(|degree| root.next_step(reference_offset(degree) + degree.shift()))
        .collect()
}

/// Chromatic clock positions (0-11) for interval names like `m3` or `P5`
pub fn intervals_to_chromatic_positions(intervals: &[&str]) -> Result<Vec<u8>> {
    intervals
        .iter()
        .map(|s| s.parse::<DegreeRef>().map(|d| d.chromatic_position()))
        .collect()
}

/// Chromatic clock positions (0-11) for each tone of a chord
pub fn chord_chromatic_positions(signature: &ChordSignature) -> Vec<u8> {
    signature
        .degrees()
        .iter()
        .map(DegreeRef::chromatic_position)
        .collect()
}

/// Chromatic clock positions of a scale: 0, then the running total after
/// every step except the one that closes the octave
pub fn steps_to_chromatic_positions(signature: &ScaleSignature) -> Vec<u8> {
    let steps = signature.steps();
    let mut positions = Vec::with_capacity(steps.len().max(1));
    let mut position = 0u8;
    positions.push(position);
    for step in steps.iter().take(steps.len().saturating_sub(1)) {
        position = (position + step.half_steps()) % 12;
        positions.push(position);
    }
    positions
}

impl TheoryTables {
    /// Resolve names and build a scale, optionally in a mode
    pub fn scale_notes(
        &self,
        root: &str,
        scale: &str,
        mode: Option<&str>,
        octave: u8,
    ) -> Result<Vec<Note>> {
        let root = Note::parse(root, octave)?;
        let signature = &self.scale(scale)?.signature;
        match mode {
            Some(mode) => construct_modal_scale(root, signature, self.mode(mode)?, None),
            None => construct_scale(root, signature, None),
        }
    }

    /// Resolve names and build a chord
    pub fn chord_notes(&self, root: &str, chord: &str, octave: u8) -> Result<Vec<Note>> {
        let root = Note::parse(root, octave)?;
        construct_chord(root, &self.chord(chord)?.signature)
    }
}
