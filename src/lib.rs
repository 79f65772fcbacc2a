/*!

# regex-examples - example strings for Ruby-flavored regular expressions

This crate turns a regular expression written in Ruby (Onigmo) syntax into a
bounded, deterministic list of strings which match it. Use it to sanity-check
a pattern, to produce fixture data, or to fuzz code which consumes validated
input.

# Example: generating examples

```rust
use regex_examples::Pattern;
let pattern = Pattern::new(r"https?://(www\.)?github\.com").unwrap();
for example in pattern.examples() {
    println!("{}", example);
}
// Output: http://github.com
// Output: http://www.github.com
// Output: https://github.com
// Output: https://www.github.com
```

# Example: flags and options

Flags use Ruby's option letters: `i` (ignore case), `m` (`.` matches newline)
and `x` (extended). [`Options`] bounds the output.

```rust
use regex_examples::{Options, Pattern};
let pattern = Pattern::with_flags("ab", "i").unwrap();
assert_eq!(pattern.examples(), ["ab", "aB", "Ab", "AB"]);

let digits = Pattern::new(r"\d").unwrap();
let options = Options {
    max_group_results: 10,
    ..Options::default()
};
assert_eq!(digits.examples_with(&options).len(), 10);
```

# Example: backreferences

A backreference repeats whatever its group produced in the same example:

```rust
use regex_examples::Pattern;
let pattern = Pattern::new(r"(a|b)-\1").unwrap();
assert_eq!(pattern.examples(), ["a-a", "b-b"]);
```

# Unsupported syntax

Zero-width assertions cannot be honored by construction, so lookarounds, word
boundaries and anchors anywhere but the very start or end of the pattern are
rejected with an [`Error`], as are subexpression calls (`\g<name>`), atomic
groups, conditionals and the absent operator.

```rust
use regex_examples::Pattern;
assert!(Pattern::new(r"foo(?=bar)").is_err());
assert!(Pattern::new(r"^anchored$").is_ok());
```

# Architecture

A parser produces an intermediate representation in which character classes
are already resolved to sets of code points. The generator walks that tree,
combining the samples of each node with bounded Cartesian products.

*/

#![warn(clippy::all)]
#![allow(clippy::upper_case_acronyms, clippy::match_like_matches_macro)]

pub use crate::api::*;

mod util;

mod api;
mod charclasses;
mod codepointset;
mod generate;
mod ir;
mod parse;
mod types;
mod unicode;
