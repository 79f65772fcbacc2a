#![allow(clippy::uninlined_format_args)]

use regex_examples::{Flags, Options, Pattern};

/// Generate examples for \p pattern with default flags and options.
#[track_caller]
pub fn examples(pattern: &str) -> Vec<String> {
    examples_flags(pattern, "")
}

/// Generate examples for \p pattern with \p flags and default options.
#[track_caller]
pub fn examples_flags(pattern: &str, flags: &str) -> Vec<String> {
    examples_with(pattern, flags, &Options::default())
}

/// Generate examples for \p pattern with \p flags and \p options.
#[track_caller]
pub fn examples_with(pattern: &str, flags: &str, options: &Options) -> Vec<String> {
    match Pattern::with_flags(pattern, flags) {
        Ok(pattern) => pattern.examples_with(options),
        Err(err) => panic!("Pattern {} failed to parse: {}", pattern, err),
    }
}

/// Options with a generous group cap, so that sets contribute many members.
pub fn generous_options() -> Options {
    Options {
        max_group_results: 999,
        ..Options::default()
    }
}

/// Test that \p pattern fails to parse with default flags.
#[track_caller]
pub fn test_parse_fails(pattern: &str) {
    let res = Pattern::new(pattern);
    assert!(res.is_err(), "Pattern should not have parsed: {}", pattern);
}

/// Test that \p pattern fails to parse, with an error containing \p expected_err.
#[track_caller]
pub fn test_1_error(pattern: &str, expected_err: &str) {
    let res = Pattern::new(pattern);
    assert!(res.is_err(), "Pattern should not have parsed: {}", pattern);

    let err = res.err().unwrap().text;
    assert!(
        err.contains(expected_err),
        "Error text '{}' did not contain '{}' for pattern '{}'",
        err,
        expected_err,
        pattern
    );
}

/// Build an independent matcher for the whole of \p pattern.
/// Ruby's multiline flag is the `s` flag elsewhere.
fn anchored_matcher(pattern: &str, flags: Flags) -> fancy_regex::Regex {
    let mut source = String::from(r"\A");
    if flags.icase {
        source.push_str("(?i)");
    }
    if flags.multiline {
        source.push_str("(?s)");
    }
    if flags.extended {
        source.push_str("(?x)");
    }
    source.push_str("(?:");
    source.push_str(pattern);
    if flags.extended {
        // Terminate any trailing comment.
        source.push('\n');
    }
    source.push_str(r")\z");
    match fancy_regex::Regex::new(&source) {
        Ok(re) => re,
        Err(err) => panic!("Matcher for {} failed to compile: {}", pattern, err),
    }
}

/// Test that \p pattern produces examples, and that each one matches the
/// whole pattern according to an independent regex engine.
#[track_caller]
pub fn test_examples_match(pattern: &str) {
    test_examples_match_flags(pattern, "")
}

/// Like test_examples_match, with \p flags.
#[track_caller]
pub fn test_examples_match_flags(pattern: &str, flags: &str) {
    let examples = examples_with(pattern, flags, &generous_options());
    assert!(
        !examples.is_empty(),
        "No examples were generated for pattern: {}",
        pattern
    );
    let matcher = anchored_matcher(pattern, Flags::from(flags));
    for example in examples {
        let matched = matcher.is_match(&example).unwrap_or(false);
        assert!(
            matched,
            "Example {:?} does not match pattern {}",
            example,
            pattern
        );
    }
}

pub trait VecTestHelpers {
    /// "Fluent" style helper for testing that a Vec<String> is equal to a
    /// Vec<&str>.
    fn test_eq(&self, rhs: Vec<&str>);
}

impl VecTestHelpers for Vec<String> {
    #[track_caller]
    fn test_eq(&self, rhs: Vec<&str>) {
        pretty_assertions::assert_eq!(*self, rhs)
    }
}
