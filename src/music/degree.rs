// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale steps and scale-degree references.
//!
//! Scale signatures are sequences of [`Step`]s; chord signatures and
//! interval lists are sequences of [`DegreeRef`]s. Both are parsed from
//! their text forms once, when a table is built, so construction code
//! never matches on strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TheoryError;

/// Semitone offset of each major-scale degree (1-7) from the root
pub const DEGREE_POSITIONS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Interval label for each chromatic position (0-11)
pub const INTERVAL_LABELS: [&str; 12] = [
    "1", "m2", "2", "m3", "3", "P4", "A4", "P5", "m6", "6", "m7", "7",
];

/// Get the interval label for a chromatic position
pub fn interval_label(position: u8) -> Option<&'static str> {
    INTERVAL_LABELS.get(position as usize).copied()
}

/// One step of a scale signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StepRepr", into = "String")]
pub enum Step {
    /// Half step
    Semitone,
    /// Whole step
    Tone,
    /// Augmented second
    ToneAndHalf,
}

impl Step {
    /// Size in half steps
    pub fn half_steps(self) -> u8 {
        match self {
            Step::Semitone => 1,
            Step::Tone => 2,
            Step::ToneAndHalf => 3,
        }
    }

    /// Step from a half-step count
    pub fn from_half_steps(n: u8) -> Option<Self> {
        match n {
            1 => Some(Step::Semitone),
            2 => Some(Step::Tone),
            3 => Some(Step::ToneAndHalf),
            _ => None,
        }
    }

    /// Short symbol used in signature printouts
    pub fn symbol(self) -> &'static str {
        match self {
            Step::Semitone => "S",
            Step::Tone => "T",
            Step::ToneAndHalf => "T.S",
        }
    }
}

impl FromStr for Step {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['.', '+', ' '], "");
        match normalized.as_str() {
            "S" | "H" | "1" => Ok(Step::Semitone),
            "T" | "W" | "2" => Ok(Step::Tone),
            "TS" | "ST" | "3" => Ok(Step::ToneAndHalf),
            _ => Err(TheoryError::InvalidStep(s.to_string())),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl From<Step> for String {
    fn from(step: Step) -> Self {
        step.to_string()
    }
}

/// Accepted encodings of a step in config files
#[derive(Deserialize)]
#[serde(untagged)]
enum StepRepr {
    Number(u8),
    Text(String),
}

impl TryFrom<StepRepr> for Step {
    type Error = TheoryError;

    fn try_from(repr: StepRepr) -> Result<Self, Self::Error> {
        match repr {
            StepRepr::Number(n) => {
                Step::from_half_steps(n).ok_or_else(|| TheoryError::InvalidStep(n.to_string()))
            }
            StepRepr::Text(s) => s.parse(),
        }
    }
}

/// Accidental or quality attached to a degree number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    None,
    Flat,
    Sharp,
    Minor,
    Major,
    Perfect,
    Diminished,
    Augmented,
}

impl Modifier {
    /// Half-step shift applied to the referenced scale note
    pub fn shift(self) -> i32 {
        match self {
            Modifier::Flat | Modifier::Minor | Modifier::Diminished => -1,
            Modifier::Sharp | Modifier::Augmented => 1,
            Modifier::None | Modifier::Major | Modifier::Perfect => 0,
        }
    }

    fn from_prefix(s: &str) -> Option<(Self, usize)> {
        // Longest spellings first so "dim" is not read as "d"
        const PREFIXES: [(&str, Modifier); 13] = [
            ("dim", Modifier::Diminished),
            ("aug", Modifier::Augmented),
            ("maj", Modifier::Major),
            ("min", Modifier::Minor),
            ("b", Modifier::Flat),
            ("\u{266d}", Modifier::Flat),
            ("#", Modifier::Sharp),
            ("\u{266f}", Modifier::Sharp),
            ("m", Modifier::Minor),
            ("M", Modifier::Major),
            ("P", Modifier::Perfect),
            ("d", Modifier::Diminished),
            ("A", Modifier::Augmented),
        ];
        PREFIXES
            .iter()
            .find(|(prefix, _)| s.starts_with(prefix))
            .map(|&(prefix, modifier)| (modifier, prefix.len()))
    }

    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "b" | "\u{266d}" => Some(Modifier::Flat),
            "#" | "\u{266f}" => Some(Modifier::Sharp),
            _ => None,
        }
    }
}

/// A scale degree (1-based) with an optional modifier, e.g. `b3` or `P5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DegreeRepr", into = "String")]
pub struct DegreeRef {
    degree: u8,
    modifier: Modifier,
}

impl DegreeRef {
    /// Plain degree with no modifier
    pub fn plain(degree: u8) -> Result<Self, TheoryError> {
        DegreeRef::new(degree, Modifier::None)
    }

    /// Degree with a modifier; degree 0 does not exist
    pub fn new(degree: u8, modifier: Modifier) -> Result<Self, TheoryError> {
        if degree == 0 {
            return Err(TheoryError::InvalidDegreeReference(degree.to_string()));
        }
        Ok(Self { degree, modifier })
    }

    // Built-in table constructors; callers pass degrees >= 1
    pub(crate) const fn natural(degree: u8) -> Self {
        Self {
            degree,
            modifier: Modifier::None,
        }
    }

    pub(crate) const fn flat(degree: u8) -> Self {
        Self {
            degree,
            modifier: Modifier::Flat,
        }
    }

    pub(crate) const fn sharp(degree: u8) -> Self {
        Self {
            degree,
            modifier: Modifier::Sharp,
        }
    }

    /// Get the degree number (1-based)
    pub fn degree(&self) -> u8 {
        self.degree
    }

    /// Get the modifier
    pub fn modifier(&self) -> Modifier {
        self.modifier
    }

    /// Half-step shift from the modifier
    pub fn shift(&self) -> i32 {
        self.modifier.shift()
    }

    /// Position (0-11) on the chromatic clock relative to the root.
    ///
    /// Compound degrees (above 7) fold back into the first octave.
    pub fn chromatic_position(&self) -> u8 {
        let simple = (self.degree as usize - 1) % 7;
        (DEGREE_POSITIONS[simple] as i32 + self.shift()).rem_euclid(12) as u8
    }
}

impl FromStr for DegreeRef {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TheoryError::InvalidDegreeReference(s.to_string());
        let text = s.trim();

        let (prefix, rest) = match Modifier::from_prefix(text) {
            Some((modifier, len)) => (Some(modifier), &text[len..]),
            None => (None, text),
        };

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(invalid());
        }
        let degree: u8 = rest[..digits_end].parse().map_err(|_| invalid())?;
        let suffix = &rest[digits_end..];

        let modifier = match (prefix, suffix.is_empty()) {
            (Some(modifier), true) => modifier,
            (None, true) => Modifier::None,
            (None, false) => Modifier::from_suffix(suffix).ok_or_else(invalid)?,
            (Some(_), false) => return Err(invalid()),
        };

        DegreeRef::new(degree, modifier).map_err(|_| invalid())
    }
}

impl fmt::Display for DegreeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier {
            Modifier::None => write!(f, "{}", self.degree),
            Modifier::Flat => write!(f, "b{}", self.degree),
            Modifier::Sharp => write!(f, "{}#", self.degree),
            Modifier::Minor => write!(f, "m{}", self.degree),
            Modifier::Major => write!(f, "M{}", self.degree),
            Modifier::Perfect => write!(f, "P{}", self.degree),
            Modifier::Diminished => write!(f, "d{}", self.degree),
            Modifier::Augmented => write!(f, "A{}", self.degree),
        }
    }
}

impl From<DegreeRef> for String {
    fn from(degree: DegreeRef) -> Self {
        degree.to_string()
    }
}

/// Accepted encodings of a degree reference in config files
#[derive(Deserialize)]
#[serde(untagged)]
enum DegreeRepr {
    Number(u8),
    Text(String),
}

impl TryFrom<DegreeRepr> for DegreeRef {
    type Error = TheoryError;

    fn try_from(repr: DegreeRepr) -> Result<Self, Self::Error> {
        match repr {
            DegreeRepr::Number(n) => DegreeRef::plain(n),
            DegreeRepr::Text(s) => s.parse(),
        }
    }
}
