use ::regex::Regex as LibRegex;
use proptest::prelude::*;

use crate::config::CompileConfig;
use crate::dfa::algebra;
use crate::dfa::minimize;
use crate::nfa::{normalize, subset_construct};
use crate::regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::compile(pattern).unwrap_or_else(|e| panic!("failed to compile {pattern:?}: {e}"))
}

#[test]
fn literal_concatenation() {
    let r = compile("/abc/");
    assert!(r.is_match(b"abc"));
    assert!(r.is_match(b"xxabcxx")); // unanchored: substring search
    assert!(!r.is_match(b"ab"));
    assert!(!r.is_match(b"abd"));
}

#[test]
fn anchored_concatenation_is_a_full_match() {
    let r = compile("/^abc$/");
    assert!(r.is_match(b"abc"));
    assert!(!r.is_match(b"xabc"));
    assert!(!r.is_match(b"abcx"));
}

#[test]
fn case_insensitive_flag() {
    let r = compile("/^abc$/i");
    assert!(r.is_match(b"abc"));
    assert!(r.is_match(b"ABC"));
    assert!(r.is_match(b"aBc"));
    assert!(!r.is_match(b"abcd"));
}

#[test]
fn dot_excludes_newline_unless_dot_all() {
    let default_dot = compile("/^a.b$/");
    assert!(default_dot.is_match(b"axb"));
    assert!(!default_dot.is_match(b"a\nb"));

    let dot_all = compile("/^a.b$/s");
    assert!(dot_all.is_match(b"axb"));
    assert!(dot_all.is_match(b"a\nb"));
}

#[test]
fn bounded_repetition() {
    let r = compile("/^a.{6}b$/");
    assert!(r.is_match(b"axxxxxxb"));
    assert!(!r.is_match(b"axxxxxb"));
    assert!(!r.is_match(b"axxxxxxxb"));
}

#[test]
fn zero_zero_repetition_collapses_to_empty() {
    let with_noop_repeat = compile("/^ab{0,0}c$/");
    let without = compile("/^ac$/");
    assert!(with_noop_repeat.is_match(b"ac"));
    assert!(!with_noop_repeat.is_match(b"abc"));
    assert!(with_noop_repeat.dfa().equivalent_to(without.dfa()));
}

#[test]
fn alternation_over_many_branches() {
    let r = compile("/^(cat|dog|bird|fish|wolf|frog)$/");
    for word in ["cat", "dog", "bird", "fish", "wolf", "frog"] {
        assert!(r.is_match(word.as_bytes()), "{word} should match");
    }
    assert!(!r.is_match(b"cow"));
}

#[test]
fn hex_escapes_match_exact_bytes() {
    let r = compile("/^a\\x01\\xab\\xCd\\xeF/");
    assert!(r.is_match(&[b'a', 0x01, 0xab, 0xcd, 0xef]));
    assert!(!r.is_match(&[b'a', 0x01, 0xab, 0xcd, 0xee]));
}

#[test]
fn leading_bracket_literal_close() {
    // `]` right after `[` (or `[^`) is a literal member, not the terminator.
    let r = compile("/^[]a]$/");
    assert!(r.is_match(b"]"));
    assert!(r.is_match(b"a"));
    assert!(!r.is_match(b"b"));
}

#[test]
fn character_class_inversion_and_ranges() {
    let r = compile("/^[^a-c]$/");
    assert!(r.is_match(b"d"));
    assert!(!r.is_match(b"a"));
    assert!(!r.is_match(b"c"));
}

#[test]
fn octal_and_named_classes() {
    let r = compile("/^\\101\\d+$/"); // \101 = 'A' in octal
    assert!(r.is_match(b"A42"));
    assert!(!r.is_match(b"B42"));
}

#[test]
fn append_concatenates_two_compiled_patterns() {
    // Both halves are exactly anchored so `a`'s only accepting state has nowhere else to go,
    // making it an unambiguous splice point for `b`'s start state.
    let a = compile("/^foo$/");
    let b = compile("/^bar$/");
    let appended = algebra::append(a.dfa(), b.dfa()).unwrap();
    let reference = compile("/^foobar$/");
    assert!(appended.equivalent_to(reference.dfa()));
}

#[test]
fn append_overwrites_an_unanchored_accepting_state_with_the_right_start() {
    // Both sides are unanchored, so `a`'s accepting state is auto-wrapped with a trailing `.*`
    // and already has a transition for every byte before `append` ever runs. The splice must
    // still overwrite those transitions with `b`'s start state rather than skip them because the
    // slot looked already filled, or `b` never gets spliced in at all.
    let a = compile("/abc/");
    let b = compile("/xyz/");
    let appended = algebra::append(a.dfa(), b.dfa()).unwrap();
    assert!(!appended.accepts(b"abc"));
    assert!(appended.accepts(b"abcxyz"));
}

#[test]
fn append_without_an_acceptor_fails() {
    // An empty-language DFA (never accepts) has no acceptor to splice onto.
    let empty = compile("/^a$/");
    let empty_dfa = algebra::intersect(empty.dfa(), compile("/^b$/").dfa());
    let empty_dfa = minimize::minimize(&empty_dfa);
    let result = algebra::append(&empty_dfa, compile("/^x$/").dfa());
    assert!(result.is_err());
}

#[test]
fn union_intersection_difference_symmetric_difference() {
    let starts_with_a = compile("/^a/");
    let ends_with_z = compile("/z$/");

    let union = algebra::union(starts_with_a.dfa(), ends_with_z.dfa());
    let intersection = algebra::intersect(starts_with_a.dfa(), ends_with_z.dfa());
    let difference = algebra::difference(starts_with_a.dfa(), ends_with_z.dfa());
    let symmetric = algebra::symmetric_difference(starts_with_a.dfa(), ends_with_z.dfa());

    let cases: &[&[u8]] = &[b"az", b"ab", b"bz", b"bb"];
    for case in cases {
        let a = starts_with_a.is_match(case);
        let z = ends_with_z.is_match(case);
        assert_eq!(union.accepts(case), a || z, "union on {case:?}");
        assert_eq!(intersection.accepts(case), a && z, "intersection on {case:?}");
        assert_eq!(difference.accepts(case), a && !z, "difference on {case:?}");
        assert_eq!(symmetric.accepts(case), a != z, "symmetric difference on {case:?}");
    }
}

#[test]
fn persistence_round_trip_flat_and_gzip() {
    use crate::dfa::format::{self, Algorithm};

    let regex = compile("/^(foo|bar){2,4}$/");
    for algorithm in [Algorithm::Flat, Algorithm::Gzip] {
        let mut buf = Vec::new();
        format::save(regex.dfa(), algorithm, &mut buf).unwrap();
        let loaded = format::load(&buf[..]).unwrap();
        assert!(loaded.equivalent_to(regex.dfa()));
    }
}

/// Generates small regex bodies from `()`, `|`, `*`, `+` over a restricted alphabet, using
/// proptest's own regex-string strategy as the leaf generator the same way it generates any
/// other string. Wrapped in `/…/` and fed to both engines below.
fn random_pattern_body() -> impl Strategy<Value = String> {
    "[a-f]".prop_recursive(6, 128, 8, |inner| {
        prop_oneof![
            5 => prop::collection::vec(inner.clone(), 1..5).prop_map(|v| format!("({})", v.join(""))),
            5 => prop::collection::vec(inner.clone(), 1..4).prop_map(|v| v.join("|")),
            2 => inner.clone().prop_map(|r| format!("({r})*")),
            2 => inner.clone().prop_map(|r| format!("({r})+")),
        ]
    })
}

proptest! {
    /// Unanchored patterns here do substring search on both sides: our engine because of the
    /// implicit `.*` wrap applied when no `^`/`$` is present, `regex::Regex::is_match` because
    /// that's its default.
    #[test]
    fn matches_reference_regex_engine(
        body in random_pattern_body(),
        haystacks in prop::collection::vec("[a-f]{0,8}", 16),
    ) {
        let pattern = format!("/{body}/");
        let ours = Regex::compile(&pattern).unwrap();
        let reference = LibRegex::new(&body).unwrap();
        for haystack in &haystacks {
            prop_assert_eq!(ours.is_match(haystack.as_bytes()), reference.is_match(haystack));
        }
    }

    #[test]
    fn minimization_preserves_language(body in random_pattern_body()) {
        let pattern = format!("/{body}/");
        let ours = Regex::compile(&pattern).unwrap();
        let minimized = minimize::minimize(ours.dfa());
        prop_assert!(ours.dfa().equivalent_to(&minimized));
    }

    #[test]
    fn dfa_survives_a_round_trip_through_nfa_and_back(body in random_pattern_body()) {
        let pattern = format!("/{body}/");
        let ours = Regex::compile(&pattern).unwrap();
        let nfa = normalize(&ours.dfa().to_nfa());
        let rebuilt = subset_construct(&nfa, &CompileConfig::unbounded()).unwrap();
        prop_assert!(ours.dfa().equivalent_to(&rebuilt));
    }
}
