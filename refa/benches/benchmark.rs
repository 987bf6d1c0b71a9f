use std::fs;
use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazy_static::lazy_static;
use proptest::prelude::*;
use proptest::strategy::ValueTree;
use proptest::test_runner::TestRunner;
use regex::Regex as LibRegex;

use refa::dfa::algebra;
use refa::dfa::minimize::minimize;
use refa::dfa::Dfa;
use refa::regex::Regex;

lazy_static! {
    static ref PATTERNS: Box<[String]> = (0..3)
        .map(|num| {
            let filename = format!("benches/patterns/pattern{num}.txt");
            fs::read_to_string(Path::new(&filename)).unwrap().trim().to_owned()
        })
        .collect();
}

fn dfa(idx: usize) -> Dfa {
    Regex::compile(&PATTERNS[idx]).unwrap().dfa().clone()
}

pub fn powerset(c: &mut Criterion) {
    let a = dfa(0);
    let b = dfa(1);
    c.bench_function("union", |bch| bch.iter(|| algebra::union(black_box(&a), black_box(&b))));
    c.bench_function("intersection", |bch| {
        bch.iter(|| algebra::intersect(black_box(&a), black_box(&b)))
    });
    c.bench_function("difference", |bch| {
        bch.iter(|| algebra::difference(black_box(&a), black_box(&b)))
    });
    c.bench_function("symmetric difference", |bch| {
        bch.iter(|| algebra::symmetric_difference(black_box(&a), black_box(&b)))
    });
}

pub fn equivalence_check(c: &mut Criterion) {
    let a = dfa(0);
    let b = dfa(1);
    c.bench_function("equivalence check", |bch| bch.iter(|| a.equivalent_to(black_box(&b))));
}

pub fn regex_compile(c: &mut Criterion) {
    let pattern = &PATTERNS[1];
    let body = &pattern[1..pattern.rfind('/').unwrap()];

    c.bench_function("refa regex compile", |bch| {
        bch.iter(|| Regex::compile(black_box(pattern)).unwrap())
    });

    c.bench_function("library regex compile", |bch| {
        bch.iter(|| LibRegex::new(black_box(body)).unwrap())
    });
}

pub fn regex_check(c: &mut Criterion) {
    let pattern = &PATTERNS[1];
    let body = &pattern[1..pattern.rfind('/').unwrap()];

    let mut runner = TestRunner::default();
    let string_gen = "[a-z]{1,8}@[a-z]{1,8}\\.[a-z]{2,3}".new_tree(&mut runner).unwrap();

    let mut regex = Regex::compile(pattern).unwrap().dfa().clone();
    regex = minimize(&regex);
    c.bench_function("refa regex check", |bch| {
        bch.iter(|| regex.accepts(black_box(string_gen.current().as_bytes())))
    });

    // `body` is already `^...$`-anchored (pattern1.txt), so no extra wrapping is needed here.
    let library_regex = LibRegex::new(body).unwrap();
    c.bench_function("library regex check", |bch| {
        bch.iter(|| library_regex.is_match(black_box(&string_gen.current())))
    });
}

criterion_group!(benches, equivalence_check, powerset, regex_compile, regex_check);
criterion_main!(benches);
