use crate::generate;
use crate::ir;
use crate::parse;
use crate::util::to_char_sat;
use core::{fmt, str::FromStr};

pub use parse::Error;

/// The error produced for any pattern that cannot be turned into examples.
/// This is the same type as [`Error`].
pub type IllegalSyntaxError = Error;

/// Flags used to control regex parsing.
/// The default flags are case-sensitive, not-multiline and not-extended.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    /// If set, make the regex case-insensitive.
    /// Equivalent to the 'i' flag in Ruby.
    pub icase: bool,

    /// If set, . matches a newline as well as any other character.
    /// Equivalent to the 'm' flag in Ruby.
    pub multiline: bool,

    /// If set, unescaped whitespace and `#` comments outside of brackets are
    /// ignored. Equivalent to the 'x' flag in Ruby.
    pub extended: bool,
}

impl Flags {
    /// Construct a Flags from a Unicode codepoints iterator, using Ruby option
    /// letters. 'i' means to ignore case, 'm' means multiline, 'x' means
    /// extended. Other letters are ignored.
    #[inline]
    pub fn new<T: Iterator<Item = u32>>(chars: T) -> Self {
        let mut result = Self::default();
        for c in chars {
            result.set(to_char_sat(c), true);
        }
        result
    }

    /// Set or clear the flag named by the option letter \p c.
    /// \return false if \p c does not name a flag.
    pub(crate) fn set(&mut self, c: char, value: bool) -> bool {
        match c {
            'i' => self.icase = value,
            'm' => self.multiline = value,
            'x' => self.extended = value,
            _ => return false,
        }
        true
    }
}

impl From<&str> for Flags {
    /// Construct a Flags from a string, using Ruby option letters.
    ///
    /// See also: [`Flags::new`].
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s.chars().map(u32::from))
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.multiline {
            f.write_str("m")?;
        }
        if self.icase {
            f.write_str("i")?;
        }
        if self.extended {
            f.write_str("x")?;
        }
        Ok(())
    }
}

/// Limits on how many examples are generated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Options {
    /// The maximum number of results kept for a single character, character
    /// set, group or alternation.
    pub max_group_results: usize,

    /// The maximum number of repetitions tried beyond a repeater's minimum.
    /// For example `a+` with a variance of 2 yields `a`, `aa` and `aaa`.
    pub max_repeater_variance: usize,

    /// The maximum number of results kept when combining a sequence or the
    /// repetitions of a repeater, and overall.
    pub max_results_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_group_results: 5,
            max_repeater_variance: 2,
            max_results_limit: 10000,
        }
    }
}

/// A parsed pattern, from which examples may be generated.
#[derive(Debug, Clone)]
pub struct Pattern {
    ir: ir::Regex,
}

impl Pattern {
    /// Construct a pattern by parsing `pattern` using the default flags.
    /// An Error may be returned if the syntax is invalid or uses a construct
    /// that cannot be generated, such as a lookahead.
    #[inline]
    pub fn new(pattern: &str) -> Result<Pattern, Error> {
        Self::with_flags(pattern, Flags::default())
    }

    /// Construct a pattern by parsing `pattern` with `flags`.
    /// An Error may be returned if the syntax is invalid.
    #[inline]
    pub fn with_flags<F>(pattern: &str, flags: F) -> Result<Pattern, Error>
    where
        F: Into<Flags>,
    {
        let ir = parse::try_parse(pattern, flags.into())?;
        Ok(Pattern { ir })
    }

    /// Generate examples using the default [`Options`].
    #[inline]
    pub fn examples(&self) -> Vec<String> {
        self.examples_with(&Options::default())
    }

    /// Generate examples using the given \p options.
    /// Every example matches the whole pattern. The result is deterministic
    /// and contains no duplicates.
    pub fn examples_with(&self, options: &Options) -> Vec<String> {
        generate::generate(&self.ir, options)
    }

    /// \return the flags the pattern was parsed with.
    #[inline]
    pub fn flags(&self) -> Flags {
        self.ir.flags
    }

    /// \return the number of capture groups in the pattern.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.ir.groups.len()
    }

    /// \return the name of the given group, if it is a named group.
    pub fn group_name(&self, group: usize) -> Option<&str> {
        let id = u16::try_from(group).ok()?;
        self.ir.groups.get(id)?.name.as_deref()
    }

    /// \return a textual dump of the parsed pattern, one node per line.
    pub fn dump_ir(&self) -> String {
        self.ir.to_string()
    }
}

impl FromStr for Pattern {
    type Err = Error;

    /// Attempts to parse a string into a pattern
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Parse \p pattern with \p flags and generate examples with \p options.
///
/// ```rust
/// use regex_examples::{generate_examples, Flags, Options};
/// let examples = generate_examples("[ab]{2}", Flags::default(), &Options::default()).unwrap();
/// assert_eq!(examples, ["aa", "ab", "ba", "bb"]);
/// ```
pub fn generate_examples<F>(pattern: &str, flags: F, options: &Options) -> Result<Vec<String>, Error>
where
    F: Into<Flags>,
{
    Ok(Pattern::with_flags(pattern, flags)?.examples_with(options))
}
