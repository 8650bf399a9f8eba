// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory engine.
//!
//! Notes, theory tables, and the pure construction functions that turn a
//! root note plus a signature into scales, chords and progressions.

pub mod construct;
pub mod degree;
pub mod layout;
pub mod note;
pub mod progression;
pub mod tables;

pub use construct::{
    apply_mode, chord_chromatic_positions, construct_chord, construct_modal_scale,
    construct_scale, intervals_to_chromatic_positions, major_signature, reference_scale,
    steps_to_chromatic_positions,
};
pub use degree::{interval_label, DegreeRef, Modifier, Step};
pub use layout::{highlighted, keyboard, Fretboard, Key};
pub use note::{canonical_name, MidiNote, Note, PitchClass};
pub use progression::{chord_progression, functional_degrees, parse_degrees, Progression};
pub use tables::{
    circle_of_fifths, fifth_position, relative_major, relative_minor, ChordDefinition,
    ChordSignature, DegreeInfo, Mode, ScaleDefinition, ScaleFamily, ScaleSignature,
    TheoryTables,
};
