// Work around dead code warnings: rust-lang issue #46379
pub mod common;

use common::*;
use regex_examples::Options;

fn ten() -> Options {
    Options {
        max_group_results: 10,
        ..Options::default()
    }
}

#[test]
fn test_sample_order() {
    // Newline leads, so that its presence is obvious; then letters.
    examples(".").test_eq(vec!["a", "b", "c", "d", "e"]);
    examples_flags(".", "m").test_eq(vec!["\n", "a", "b", "c", "d"]);
    examples(r"\X").test_eq(vec!["\n", "a", "b", "c", "d"]);
    examples(r"[\s\d]").test_eq(vec!["\n", "0", "1", "2", "3"]);
}

#[test]
fn test_escape_classes() {
    examples(r"\d").test_eq(vec!["0", "1", "2", "3", "4"]);
    examples(r"\D").test_eq(vec!["\n", "a", "b", "c", "d"]);
    examples(r"\w").test_eq(vec!["a", "b", "c", "d", "e"]);
    examples(r"\W").test_eq(vec!["\n", "!", "\"", "#", "%"]);
    examples(r"\s").test_eq(vec!["\n", " ", "\t", "\x0B", "\x0C"]);
    examples(r"\S").test_eq(vec!["a", "b", "c", "d", "e"]);
    examples(r"\h").test_eq(vec!["a", "b", "c", "d", "e"]);
    examples(r"\H").test_eq(vec!["\n", "g", "h", "i", "j"]);
    // The escape classes are ASCII.
    let options = generous_options();
    assert!(!examples_with(r"\w", "", &options).contains(&"é".to_string()));
    assert!(examples_with(r"\W", "", &options).contains(&"é".to_string()));
}

#[test]
fn test_empty_sets() {
    for pattern in [
        r"[^\d\D]",
        r"[^\w\W]",
        r"[^\s\S]",
        r"[^\h\H]",
        r"[^\D0-9]",
        r"[^\Wa-zA-Z0-9_]",
        r"[^\d\D]+",
        r"[^\d\D]{2}",
        r"[^\d\D]word",
        r"word[^\d\D]",
        r"[a&&b]",
        r"[^\x00-\u{10FFFF}]",
    ] {
        assert!(
            examples(pattern).is_empty(),
            "Pattern {} should have no examples",
            pattern
        );
    }
    examples(r"[^\d\D]*word").test_eq(vec!["word"]);
    examples(r"[^\d\D]|word").test_eq(vec!["word"]);
    examples(r"(?:[^\d\D]x)?word").test_eq(vec!["word"]);
}

#[test]
fn test_nested_brackets() {
    examples_with("[[a-c][x-z]]", "", &ten()).test_eq(vec!["a", "b", "c", "x", "y", "z"]);
    examples("[a[b[c]]]").test_eq(vec!["a", "b", "c"]);
    examples("[^[^a]]").test_eq(vec!["a"]);
    examples("[^[^a-c]d]").test_eq(vec!["a", "b", "c"]);
}

#[test]
fn test_intersection() {
    examples("[a-z&&[^aeiou]]").test_eq(vec!["b", "c", "d", "f", "g"]);
    examples("[a-z&&b-d&&c]").test_eq(vec!["c"]);
    examples("[[a-h]&&ab[c]]").test_eq(vec!["a", "b", "c"]);
    examples(r"[\w&&\D]").test_eq(vec!["a", "b", "c", "d", "e"]);
    examples(r"[\w&&\d]").test_eq(vec!["0", "1", "2", "3", "4"]);
    // An empty operand places no restriction.
    examples("[a&&]").test_eq(vec!["a"]);
    examples("[&&a]").test_eq(vec!["a"]);
    // A single & is a member.
    examples_with("[a&b]", "", &ten()).test_eq(vec!["a", "b", "&"]);
    examples("[^a-y&&b-z]").test_eq(vec!["\n", "a", "z", "A", "B"]);
}

#[test]
fn test_bracket_edge_members() {
    examples("[]]").test_eq(vec!["]"]);
    examples("[]a]").test_eq(vec!["a", "]"]);
    examples("[-a]").test_eq(vec!["a", "-"]);
    examples("[a-]").test_eq(vec!["a", "-"]);
    examples_with("[%-+]", "", &ten()).test_eq(vec!["%", "&", "'", "(", ")", "*", "+"]);
    examples(r"[\b]").test_eq(vec!["\x08"]);
    examples(r"[\n-\r]").test_eq(vec!["\n", "\x0B", "\x0C", "\r"]);
}

#[test]
fn test_posix_brackets() {
    examples("[[:digit:]]").test_eq(vec!["0", "1", "2", "3", "4"]);
    examples("[[:upper:]]").test_eq(vec!["A", "B", "C", "D", "E"]);
    examples("[[:^alpha:]]").test_eq(vec!["\n", "0", "1", "2", "3"]);
    examples("[[:punct:]]").test_eq(vec!["!", "\"", "#", "%", "&"]);
    examples("[[:xdigit:]]").test_eq(vec!["a", "b", "c", "d", "e"]);
    examples("[[:space:]]").test_eq(vec!["\n", " ", "\t", "\x0B", "\x0C"]);
    examples("[x[:digit:]]").test_eq(vec!["x", "0", "1", "2", "3"]);
    // POSIX classes are Unicode-aware.
    let options = generous_options();
    assert!(examples_with("[[:alpha:]]", "", &options).contains(&"é".to_string()));
    // Outside of brackets, [:digit:] is an ordinary bracket.
    examples_with("[:digit:]", "", &ten()).test_eq(vec!["d", "g", "i", "t", ":"]);
}

#[test]
fn test_properties() {
    examples(r"\p{Lu}").test_eq(vec!["A", "B", "C", "D", "E"]);
    examples(r"\p{^Ll}").test_eq(vec!["\n", "A", "B", "C", "D"]);
    examples(r"\P{Ll}").test_eq(vec!["\n", "A", "B", "C", "D"]);
    examples(r"\P{^Ll}").test_eq(vec!["a", "b", "c", "d", "e"]);
    examples(r"\p{Alpha}").test_eq(vec!["a", "b", "c", "d", "e"]);
    examples(r"\p{Digit}").test_eq(vec!["0", "1", "2", "3", "4"]);
    examples(r"[\p{Lu}&&\p{ASCII}]").test_eq(vec!["A", "B", "C", "D", "E"]);
    examples(r"\p{Greek}").test_eq(vec!["\u{370}", "\u{371}", "\u{372}", "\u{373}", "\u{375}"]);
    let options = generous_options();
    assert!(examples_with(r"\p{L}", "", &options).contains(&"ª".to_string()));
}

#[test]
fn test_character_escapes() {
    examples(r"栩").test_eq(vec!["栩"]);
    examples(r"\u{42}word").test_eq(vec!["Bword"]);
    examples(r"\u{1F600}").test_eq(vec!["😀"]);
    examples(r"\x42").test_eq(vec!["B"]);
    examples(r"\x3word").test_eq(vec!["\x03word"]);
    examples(r"\ca").test_eq(vec!["\x01"]);
    examples(r"\c?").test_eq(vec!["\x7F"]);
    examples(r"\C-a").test_eq(vec!["\x01"]);
    // Any ASCII character may follow; only its low five bits survive.
    examples(r"\c9").test_eq(vec!["\x19"]);
    examples(r"\c[").test_eq(vec!["\x1B"]);
    examples(r"\c#").test_eq(vec!["\x03"]);
    examples(r"\C-&").test_eq(vec!["\x06"]);
    examples(r"[\c[]").test_eq(vec!["\x1B"]);
    examples(r"\e").test_eq(vec!["\x1B"]);
    examples(r"\a").test_eq(vec!["\x07"]);
    examples(r"\f\n\r\t\v").test_eq(vec!["\x0C\n\r\t\x0B"]);
    examples(r"\/\q\.").test_eq(vec!["/q."]);
    examples(r"[\x41-\x43]").test_eq(vec!["A", "B", "C"]);
}

#[test]
fn test_special_escapes() {
    examples(r"\R").test_eq(vec!["\r\n", "\n", "\x0B", "\x0C", "\r"]);
    examples(r"a\Kb").test_eq(vec!["ab"]);
}

#[test]
fn test_case_insensitive_brackets() {
    examples_with("[a-c]", "i", &ten()).test_eq(vec!["a", "b", "c", "A", "B", "C"]);
    examples_flags("[^a]", "i").test_eq(vec!["\n", "b", "c", "d", "e"]);
    examples_with("[^a-y]", "i", &ten()).test_eq(vec![
        "\n", "z", "Z", "0", "1", "2", "3", "4", "5", "6",
    ]);
    // Escape classes ignore the flag.
    examples_flags(r"\h", "i").test_eq(vec!["a", "b", "c", "d", "e"]);
}
