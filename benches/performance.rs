// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for mtlab
//!
//! Run with: cargo bench
//!
//! These benchmarks measure scale, chord and progression construction
//! plus the name lookups that feed them.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use mtlab::music::{
    chord_progression, construct_chord, construct_scale, intervals_to_chromatic_positions,
    Fretboard, Note, PitchClass, TheoryTables,
};

/// Benchmark note parsing with either spelling
fn bench_note_parse(c: &mut Criterion) {
    c.bench_function("note_parse", |b| {
        b.iter(|| {
            for name in ["C", "c#", "Db", "Bb", "G#"] {
                black_box(Note::parse(black_box(name), 4).unwrap());
            }
        })
    });
}

/// Benchmark scale construction at increasing lengths
fn bench_scale_construction(c: &mut Criterion) {
    let tables = TheoryTables::builtin();
    let signature = &tables.scale("Major").unwrap().signature;
    let root = Note::parse("C", 1).unwrap();

    let mut group = c.benchmark_group("construct_scale");
    for length in [7usize, 21, 49].iter() {
        group.bench_with_input(BenchmarkId::new("major", length), length, |b, &length| {
            b.iter(|| construct_scale(black_box(root), signature, Some(length)).unwrap())
        });
    }
    group.finish();
}

/// Benchmark every built-in chord on every root
fn bench_chord_construction(c: &mut Criterion) {
    let tables = TheoryTables::builtin();

    c.bench_function("construct_all_chords", |b| {
        b.iter(|| {
            for pc in PitchClass::ALL {
                let root = Note::new(pc, 3).unwrap();
                for chord in tables.chords() {
                    black_box(construct_chord(root, &chord.signature).unwrap());
                }
            }
        })
    });
}

/// Benchmark name lookups through the tables
fn bench_table_lookup(c: &mut Criterion) {
    let tables = TheoryTables::builtin();

    c.bench_function("chord_lookup", |b| {
        b.iter(|| tables.chord(black_box("dominant 9th")).unwrap())
    });
}

/// Benchmark a progression with chord realization
fn bench_progression(c: &mut Criterion) {
    let tables = TheoryTables::builtin();
    let degrees = [1u8, 6, 4, 5, 2, 5, 1];

    c.bench_function("progression_am", |b| {
        b.iter(|| {
            let prog = chord_progression(tables, black_box("Am"), &degrees, 3).unwrap();
            black_box(prog.chords(tables).unwrap())
        })
    });
}

/// Benchmark layout helpers used by drawing collaborators
fn bench_layouts(c: &mut Criterion) {
    let board = Fretboard::default();
    let pcs = [PitchClass::C, PitchClass::E, PitchClass::G];

    c.bench_function("fretboard_positions", |b| {
        b.iter(|| board.positions_of(black_box(&pcs)))
    });

    c.bench_function("interval_positions", |b| {
        b.iter(|| intervals_to_chromatic_positions(black_box(&["1", "b3", "5", "b7", "9"])).unwrap())
    });
}

criterion_group!(
    benches,
    bench_note_parse,
    bench_scale_construction,
    bench_chord_construction,
    bench_table_lookup,
    bench_progression,
    bench_layouts,
);

criterion_main!(benches);
