// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for reloading lab files.
//!
//! Edits to a watched lab file produce a fresh, validated set of theory
//! tables. Tables already handed out are never touched; callers swap in
//! the new snapshot when it arrives.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use super::LabFile;
use crate::music::TheoryTables;

/// A lab file together with the tables built from it
#[derive(Debug, Clone, PartialEq)]
pub struct LabSnapshot {
    /// File the snapshot was loaded from
    pub path: PathBuf,
    /// Parsed lab file
    pub lab: LabFile,
    /// Built-in tables with the file's definitions merged in
    pub tables: TheoryTables,
}

/// Events emitted by the config watcher
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    /// Lab file was modified, parsed and validated
    Reloaded(Box<LabSnapshot>),
    /// Lab file was modified but failed to parse or validate
    Error(String),
    /// A new file was created in the watch directory
    FileCreated(PathBuf),
    /// A file was deleted from the watch directory
    FileDeleted(PathBuf),
}

/// Lab file watcher with debouncing and validation
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<ConfigEvent>,
    watched_path: PathBuf,
}

impl ConfigWatcher {
    /// Create a new watcher for a lab file or a directory of lab files
    ///
    /// # Arguments
    /// * `path` - Path to watch (file or directory)
    /// * `debounce_ms` - Debounce duration in milliseconds (default: 500)
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce_duration = Duration::from_millis(debounce_ms.unwrap_or(500));

        let (event_tx, event_rx): (Sender<ConfigEvent>, Receiver<ConfigEvent>) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        let mode = if watched_path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&watched_path, mode)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watched_path, e))?;
        info!(path = %watched_path.display(), "Watching lab files");

        let root = watched_path.clone();
        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;
            let mut pending_paths: Vec<PathBuf> = Vec::new();

            loop {
                match notify_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(event) => match event.kind {
                        EventKind::Create(_) => {
                            for path in event.paths {
                                let _ = event_tx.send(ConfigEvent::FileCreated(path));
                            }
                        }
                        EventKind::Remove(_) => {
                            for path in event.paths {
                                let _ = event_tx.send(ConfigEvent::FileDeleted(path));
                            }
                        }
                        EventKind::Modify(_) => {
                            for path in event.paths {
                                if !pending_paths.contains(&path) {
                                    pending_paths.push(path);
                                }
                            }
                            last_event_time = Some(Instant::now());
                        }
                        _ => {}
                    },
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let settled = last_event_time
                            .is_some_and(|last| last.elapsed() >= debounce_duration);
                        if settled {
                            for path in pending_paths.drain(..) {
                                if is_lab_file(&path) || path == root {
                                    let _ = event_tx.send(reload(&path));
                                }
                            }
                            last_event_time = None;
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        debug!("Lab file watcher dropped, stopping");
                        break;
                    }
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next config event (non-blocking)
    pub fn try_recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending config events
    pub fn recv_all(&self) -> Vec<ConfigEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Block until the next config event is received
    pub fn recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.recv().ok()
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

fn is_lab_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml" || ext == "toml")
}

fn reload(path: &Path) -> ConfigEvent {
    match validate_config(path) {
        Ok(snapshot) => {
            info!(path = %path.display(), "Reloaded lab file");
            ConfigEvent::Reloaded(Box::new(snapshot))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %format!("{:#}", e), "Rejected lab file");
            ConfigEvent::Error(format!("Failed to load {:?}: {:#}", path, e))
        }
    }
}

/// Load a lab file and validate its definitions without applying them
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<LabSnapshot> {
    let path = path.as_ref();
    let lab = LabFile::load(path)?;
    let tables = lab.validate()?;
    Ok(LabSnapshot {
        path: path.to_path_buf(),
        lab,
        tables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_validate_config() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("lab.yaml");

        let yaml = r#"
scales:
  - name: Egyptian
    signature: [T, TS, T, TS, T]
"#;
        fs::write(&file_path, yaml).unwrap();

        let snapshot = validate_config(&file_path).unwrap();
        assert_eq!(snapshot.path, file_path);
        assert_eq!(snapshot.lab.scales.len(), 1);
        assert!(snapshot.tables.scale("Egyptian").is_ok());
    }

    #[test]
    fn test_validate_invalid_config() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.yaml");

        fs::write(&file_path, "this is not valid yaml: [").unwrap();
        assert!(validate_config(&file_path).is_err());

        fs::write(&file_path, "defaults:\n  root: H\n").unwrap();
        assert!(validate_config(&file_path).is_err());
    }

    #[test]
    fn test_lab_file_extensions() {
        assert!(is_lab_file(Path::new("lab.yaml")));
        assert!(is_lab_file(Path::new("lab.yml")));
        assert!(is_lab_file(Path::new("lab.toml")));
        assert!(!is_lab_file(Path::new("lab.txt")));
        assert!(!is_lab_file(Path::new("lab")));
    }

    #[test]
    fn test_reload_reports_errors() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("broken.toml");
        fs::write(&file_path, "[[chords]]\nname = \"Nothing\"\nsignature = []\n").unwrap();

        match reload(&file_path) {
            ConfigEvent::Error(msg) => assert!(msg.contains("Nothing")),
            other => panic!("expected error event, got {:?}", other),
        }
    }

    #[test]
    fn test_watcher_creation() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("lab.yaml"), "{}").unwrap();

        let watcher = ConfigWatcher::new(dir.path(), Some(100)).unwrap();
        assert_eq!(watcher.watched_path(), dir.path());
        assert!(ConfigWatcher::new(dir.path().join("missing"), None).is_err());
    }

    #[test]
    fn test_watcher_detects_changes() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("detect_test.yaml");
        fs::write(&file_path, "{}").unwrap();

        let watcher = ConfigWatcher::new(dir.path(), Some(100)).unwrap();
        std::thread::sleep(Duration::from_millis(50));

        let new_yaml = r#"
chords:
  - name: Add_9
    signature: [1, 3, 5, 9]
"#;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&file_path)
            .unwrap();
        file.write_all(new_yaml.as_bytes()).unwrap();
        file.flush().unwrap();
        drop(file);

        std::thread::sleep(Duration::from_millis(300));

        let events = watcher.recv_all();
        let reloaded = events.iter().find(|e| matches!(e, ConfigEvent::Reloaded(_)));

        if let Some(ConfigEvent::Reloaded(snapshot)) = reloaded {
            assert!(snapshot.tables.chord("Add_9").is_ok());
        }
        // File events are not guaranteed to arrive in time on every platform
    }
}
