// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;

use anyhow::{anyhow, Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use mtlab::config::LabFile;
use mtlab::music::{
    apply_mode, chord_chromatic_positions, chord_progression, circle_of_fifths, construct_chord,
    construct_scale, functional_degrees, highlighted, interval_label, keyboard, parse_degrees,
    relative_minor, steps_to_chromatic_positions, Fretboard, Note, PitchClass, TheoryTables,
};

fn print_usage() {
    println!("mtlab - Music Theory Lab");
    println!();
    println!("Usage: mtlab [--config PATH] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  --list                        List notes, scales, chords and modes");
    println!("  --note <NAME> [OCTAVE]        Show frequency and MIDI id of a note");
    println!("  --scale [ROOT] [NAME] [MODE]  Build a scale (ROOT or NAME may be 'all')");
    println!("  --chord [ROOT] [NAME]         Build a chord (ROOT or NAME may be 'all')");
    println!("  --progression <KEY> <DEGREES|random>");
    println!("                                Chords for degrees of a key, e.g. Am I-IV-V");
    println!("  --fretboard [ROOT] [SCALE]    Show scale notes on a guitar neck");
    println!("  --keyboard [ROOT] [CHORD]     Show chord notes on two piano octaves");
    println!("  --circle                      Show the circle of fifths");
    println!("  --help                        Show this help message");
    println!();
    println!("Missing ROOT, NAME and MODE fall back to the config file defaults.");
    println!("Set RUST_LOG=debug for diagnostic output.");
}

/// Expand the `all` selector into every value, otherwise keep the one given
fn expand<'a>(arg: &'a str, every: &[&'a str]) -> Vec<&'a str> {
    if arg.eq_ignore_ascii_case("all") {
        every.to_vec()
    } else {
        vec![arg]
    }
}

/// Scales named by `arg`. With a mode set, `all` keeps the seven-step scales only.
fn scale_selection<'a>(tables: &'a TheoryTables, arg: &'a str, mode: Option<&str>) -> Vec<&'a str> {
    if mode.is_none() || !arg.eq_ignore_ascii_case("all") {
        return expand(arg, &tables.scale_names());
    }
    let selected: Vec<&str> = tables
        .scales()
        .iter()
        .filter(|d| d.signature.len() == 7)
        .map(|d| d.name.as_str())
        .collect();
    debug!(
        skipped = tables.scales().len() - selected.len(),
        "Skipping scales without seven steps for mode"
    );
    selected
}

fn note_names() -> Vec<&'static str> {
    PitchClass::ALL.iter().map(|pc| pc.name()).collect()
}

fn join<T: ToString>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

fn list(tables: &TheoryTables) {
    let notes: Vec<String> = PitchClass::ALL.iter().map(|pc| pc.display_name()).collect();
    println!("Notes:  {}", notes.join(" "));
    println!("Scales: {}", tables.scale_names().join(" "));
    println!("Chords: {}", tables.chord_names().join(" "));
    println!("Modes:  {}", tables.mode_names().join(" "));
}

fn show_note(name: &str, octave: u8) -> Result<()> {
    let note = Note::parse(name, octave)?;
    println!("Note:      {}", note);
    if !note.alternate_name().is_empty() {
        println!("Alternate: {}{}", note.alternate_name(), note.octave());
    }
    println!("Frequency: {:.2} Hz", note.frequency());
    println!("MIDI id:   {}", note.midi_id());
    Ok(())
}

fn show_scale(
    tables: &TheoryTables,
    root: &str,
    name: &str,
    mode: Option<&str>,
    octave: u8,
) -> Result<()> {
    let entry = tables.scale(name)?;
    let signature = match mode {
        Some(mode) => apply_mode(&entry.signature, tables.mode(mode)?)?,
        None => entry.signature.clone(),
    };
    let notes = construct_scale(Note::parse(root, octave)?, &signature, None)?;
    let labels: Vec<&str> = steps_to_chromatic_positions(&signature)
        .into_iter()
        .filter_map(interval_label)
        .collect();

    match mode {
        Some(mode) => println!("{} {} ({})", root, entry.name, mode),
        None => println!("{} {}", root, entry.name),
    }
    println!("  Steps:     {}", signature);
    println!("  Notes:     {}", join(&notes, " "));
    println!("  Intervals: {}", labels.join(" "));
    if !entry.info.is_empty() {
        println!("  Info:      {}", entry.info);
    }
    Ok(())
}

fn show_chord(tables: &TheoryTables, root: &str, name: &str, octave: u8) -> Result<()> {
    let entry = tables.chord(name)?;
    let notes = construct_chord(Note::parse(root, octave)?, &entry.signature)?;
    let labels: Vec<&str> = chord_chromatic_positions(&entry.signature)
        .into_iter()
        .filter_map(interval_label)
        .collect();

    println!("{} {}", root, entry.name);
    println!("  Degrees:   {}", entry.signature);
    println!("  Notes:     {}", join(&notes, " "));
    println!("  Intervals: {}", labels.join(" "));
    if !entry.info.is_empty() {
        println!("  Info:      {}", entry.info);
    }
    Ok(())
}

fn show_progression(tables: &TheoryTables, key: &str, degrees: &str, octave: u8) -> Result<()> {
    let degrees = if degrees.eq_ignore_ascii_case("random") {
        functional_degrees(&mut rand::thread_rng(), 4)
    } else {
        parse_degrees(degrees)?
    };
    debug!(?degrees, key, "Resolving progression");

    let progression = chord_progression(tables, key, &degrees, octave)?;
    let chords = progression.chords(tables)?;
    println!("Key of {} ({:?})", progression.key, progression.family);
    for (i, notes) in chords.iter().enumerate() {
        println!(
            "  {:<5} {:<3} {:<16} {}",
            progression.numerals[i],
            progression.roots[i].name(),
            progression.chord_names[i],
            join(notes, " ")
        );
    }
    if !progression.skipped.is_empty() {
        println!("  Skipped degrees: {}", join(&progression.skipped, " "));
    }
    Ok(())
}

fn show_fretboard(tables: &TheoryTables, root: &str, scale: &str, octave: u8) -> Result<()> {
    let notes = construct_scale(Note::parse(root, octave)?, &tables.scale(scale)?.signature, None)?;
    let pitch_classes: Vec<PitchClass> = notes.iter().map(|n| n.pitch_class()).collect();

    let board = Fretboard::default();
    let positions = board.positions_of(&pitch_classes);
    println!("{} {} on a {}-fret neck", root, tables.scale(scale)?.name, board.frets());
    for (string, open) in board.tuning().iter().enumerate() {
        let row: String = (0..=board.frets())
            .map(|fret| {
                if positions.contains(&(string + 1, fret)) {
                    format!("{:<3}", open.pitch_class().transpose(fret as i32).name())
                } else {
                    "-  ".to_string()
                }
            })
            .collect();
        println!("  {:<3}| {}", open.to_string(), row);
    }
    Ok(())
}

fn show_keyboard(tables: &TheoryTables, root: &str, chord: &str, octave: u8) -> Result<()> {
    let notes = construct_chord(Note::parse(root, octave)?, &tables.chord(chord)?.signature)?;
    let pitch_classes: Vec<PitchClass> = notes.iter().map(|n| n.pitch_class()).collect();

    let keys = keyboard(Note::new(PitchClass::C, octave)?, 2)?;
    let lit = highlighted(&keys, &pitch_classes);
    let row: String = keys
        .iter()
        .enumerate()
        .map(|(i, key)| match (lit.contains(&i), key.is_black()) {
            (true, _) => '*',
            (false, true) => '#',
            (false, false) => '_',
        })
        .collect();
    println!("{} {}: {}", root, tables.chord(chord)?.name, join(&notes, " "));
    println!("  {}", row);
    Ok(())
}

fn show_circle() {
    for key in circle_of_fifths() {
        println!("  {:<3} {}m", key.name(), relative_minor(key).name());
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let lab = if args.first().map(String::as_str) == Some("--config") {
        if args.len() < 2 {
            eprintln!("Error: --config requires a file path");
            std::process::exit(1);
        }
        let path = args[1].clone();
        args.drain(..2);
        LabFile::load(&path)?
    } else {
        LabFile::default()
    };
    let tables = lab.validate().context("Invalid configuration")?;
    let d = &lab.defaults;
    let arg = |i: usize| args.get(i).map(String::as_str);

    if args.is_empty() {
        println!("mtlab - Music Theory Lab");
        println!("Run with --help for usage information");
        return Ok(());
    }

    let every_chord = tables.chord_names();
    let every_root = note_names();

    match args[0].as_str() {
        "--list" => list(&tables),
        "--note" => {
            let Some(name) = arg(1) else {
                eprintln!("Error: --note requires a note name");
                std::process::exit(1);
            };
            let octave = match arg(2) {
                Some(o) => o.parse().map_err(|_| anyhow!("Invalid octave: {}", o))?,
                None => d.octave,
            };
            show_note(name, octave)?;
        }
        "--scale" => {
            let mode = arg(3).or(d.mode.as_deref());
            for root in expand(arg(1).unwrap_or(d.root.as_str()), &every_root) {
                for name in scale_selection(&tables, arg(2).unwrap_or(d.scale.as_str()), mode) {
                    show_scale(&tables, root, name, mode, d.octave)?;
                }
            }
        }
        "--chord" => {
            for root in expand(arg(1).unwrap_or(d.root.as_str()), &every_root) {
                for name in expand(arg(2).unwrap_or(d.chord.as_str()), &every_chord) {
                    show_chord(&tables, root, name, d.octave)?;
                }
            }
        }
        "--progression" => {
            let (Some(key), Some(degrees)) = (arg(1), arg(2)) else {
                eprintln!("Error: --progression requires a key and a degree list");
                eprintln!("Example: mtlab --progression Am I-IV-V");
                std::process::exit(1);
            };
            show_progression(&tables, key, degrees, d.octave)?;
        }
        "--fretboard" => {
            for root in expand(arg(1).unwrap_or(d.root.as_str()), &every_root) {
                show_fretboard(&tables, root, arg(2).unwrap_or(d.scale.as_str()), d.octave)?;
            }
        }
        "--keyboard" => {
            for root in expand(arg(1).unwrap_or(d.root.as_str()), &every_root) {
                show_keyboard(&tables, root, arg(2).unwrap_or(d.chord.as_str()), d.octave)?;
            }
        }
        "--circle" => show_circle(),
        "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown option: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
