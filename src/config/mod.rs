// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for mtlab.
//!
//! A lab file carries default selections plus extra scale and chord
//! definitions merged over the built-in theory tables. Files are YAML
//! unless the extension is `.toml`.

pub mod watcher;

pub use watcher::{ConfigEvent, ConfigWatcher, LabSnapshot, validate_config};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::music::{ChordDefinition, Note, ScaleDefinition, TheoryTables};

/// Root configuration for a lab session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LabFile {
    /// Default selections for the command line
    #[serde(default)]
    pub defaults: Defaults,
    /// Scale definitions merged over the built-ins
    #[serde(default)]
    pub scales: Vec<ScaleDefinition>,
    /// Chord definitions merged over the built-ins
    #[serde(default)]
    pub chords: Vec<ChordDefinition>,
}

impl LabFile {
    /// Load a lab file, picking the format from the extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let lab = if is_toml(path) {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        }
        .with_context(|| format!("Failed to load config file: {:?}", path))?;
        info!(
            path = %path.display(),
            scales = lab.scales.len(),
            chords = lab.chords.len(),
            "Loaded lab file"
        );
        Ok(lab)
    }

    /// Parse a lab file from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a lab file from TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration to TOML")
    }

    /// Save to a file, picking the format from the extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = if is_toml(path) {
            self.to_toml()?
        } else {
            self.to_yaml()?
        };
        fs::write(path, text).with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Built-in tables with this file's definitions merged in
    pub fn tables(&self) -> Result<TheoryTables> {
        let tables = TheoryTables::builtin()
            .with_definitions(&self.scales, &self.chords)
            .context("Invalid scale or chord definition")?;
        debug!(
            scales = tables.scales().len(),
            chords = tables.chords().len(),
            "Built theory tables"
        );
        Ok(tables)
    }

    /// Build the tables and check that every default resolves in them
    pub fn validate(&self) -> Result<TheoryTables> {
        let tables = self.tables()?;
        let d = &self.defaults;
        Note::parse(&d.root, d.octave).context("Invalid default root")?;
        tables.scale(&d.scale).context("Invalid default scale")?;
        tables.chord(&d.chord).context("Invalid default chord")?;
        if let Some(mode) = &d.mode {
            tables.mode(mode).context("Invalid default mode")?;
        }
        Ok(tables)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Default selections used when the command line leaves them out
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Defaults {
    /// Root note name (e.g., "C", "F#", "Bb")
    #[serde(default = "default_root")]
    pub root: String,
    /// Octave of the root note
    #[serde(default = "default_octave")]
    pub octave: u8,
    /// Mode applied to heptatonic scales, if any
    #[serde(default)]
    pub mode: Option<String>,
    /// Scale name
    #[serde(default = "default_scale")]
    pub scale: String,
    /// Chord name
    #[serde(default = "default_chord")]
    pub chord: String,
}

fn default_root() -> String {
    "C".to_string()
}
fn default_octave() -> u8 {
    4
}
fn default_scale() -> String {
    "Major".to_string()
}
fn default_chord() -> String {
    "Major_triad".to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            root: default_root(),
            octave: default_octave(),
            mode: None,
            scale: default_scale(),
            chord: default_chord(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{construct_chord, construct_scale, Step};
    use tempfile::tempdir;

    const LAB_YAML: &str = r#"
defaults:
  root: D
  octave: 3
  mode: Dorian
  scale: Major
  chord: Minor_7th

scales:
  - name: Egyptian
    signature: [T, TS, T, TS, T]
    info: "Suspended pentatonic"

chords:
  - name: Dominant_13th
    signature: [1, 3, 5, b7, 9, 11, 13]
"#;

    #[test]
    fn test_parse_lab_file() {
        let lab = LabFile::from_yaml(LAB_YAML).unwrap();
        assert_eq!(lab.defaults.root, "D");
        assert_eq!(lab.defaults.octave, 3);
        assert_eq!(lab.defaults.mode.as_deref(), Some("Dorian"));
        assert_eq!(lab.scales.len(), 1);
        assert_eq!(lab.scales[0].signature.steps()[1], Step::ToneAndHalf);
        assert_eq!(lab.chords[0].signature.max_degree(), 13);
        assert_eq!(lab.chords[0].info, "");
    }

    #[test]
    fn test_tables_include_definitions() {
        let lab = LabFile::from_yaml(LAB_YAML).unwrap();
        let tables = lab.validate().unwrap();

        let root = Note::parse("C", 4).unwrap();
        let egyptian = construct_scale(root, &tables.scale("egyptian").unwrap().signature, None)
            .unwrap();
        let names: Vec<String> = egyptian.iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["C4", "D4", "F4", "G4", "A#4", "C5"]);

        let chord = construct_chord(root, &tables.chord("Dominant_13th").unwrap().signature)
            .unwrap();
        assert_eq!(chord.len(), 7);
    }

    #[test]
    fn test_default_values() {
        let lab = LabFile::from_yaml("{}").unwrap();
        assert_eq!(lab.defaults, Defaults::default());
        assert!(lab.scales.is_empty());
        assert_eq!(lab.tables().unwrap(), *TheoryTables::builtin());
    }

    #[test]
    fn test_invalid_step_rejected() {
        let yaml = r#"
scales:
  - name: Broken
    signature: [T, Q]
"#;
        assert!(LabFile::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_invalid_degree_rejected() {
        let yaml = r#"
chords:
  - name: Broken
    signature: [1, x3]
"#;
        assert!(LabFile::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_empty_signature_rejected() {
        let yaml = r#"
chords:
  - name: Silence
    signature: []
"#;
        let lab = LabFile::from_yaml(yaml).unwrap();
        let err = lab.tables().unwrap_err();
        assert!(format!("{:#}", err).contains("Silence"));
    }

    #[test]
    fn test_unknown_default_rejected() {
        let yaml = r#"
defaults:
  scale: Hirajoshi
"#;
        let lab = LabFile::from_yaml(yaml).unwrap();
        let err = lab.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("Hirajoshi"));
    }

    #[test]
    fn test_toml_lab_file() {
        let text = r#"
[defaults]
root = "Bb"
scale = "Minor"

[[chords]]
name = "Add_9"
signature = [1, 3, 5, 9]
"#;
        let lab = LabFile::from_toml(text).unwrap();
        assert_eq!(lab.defaults.root, "Bb");
        assert_eq!(lab.defaults.octave, 4);
        assert_eq!(lab.chords[0].signature.to_string(), "1 3 5 9");
        assert!(lab.validate().is_ok());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let original = LabFile::from_yaml(LAB_YAML).unwrap();

        for file in ["lab.yaml", "lab.toml"] {
            let path = dir.path().join(file);
            original.save(&path).unwrap();
            let loaded = LabFile::load(&path).unwrap();
            assert_eq!(loaded, original);
        }
    }
}
