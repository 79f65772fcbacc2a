//! Parser from regex patterns to IR

use crate::api;
use crate::charclasses;
use crate::codepointset::{CodePointSet, Interval};
use crate::ir;
use crate::types::{
    CaptureGroupID, CaptureGroupName, CharacterClassType, GroupTable, MAX_CAPTURE_GROUPS,
    MAX_REPEAT,
};
use crate::unicode::{PosixClass, PropertyEscape};
use crate::util::to_char_sat;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Represents an error encountered during pattern parsing.
/// The text contains a human-readable error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub text: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::error::Error for Error {}

enum ClassAtom {
    CodePoint(char),
    Set(CodePointSet),
}

/// How a quantifier was spelled. This decides which suffixes it accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum QuantifierSyntax {
    /// `*`, `+` or `?`.
    Symbol,
    /// `{m,}`, `{,n}` or `{m,n}`.
    Range,
    /// `{n}`.
    Fixed,
}

fn error<S, T>(text: S) -> Result<T, Error>
where
    S: ToString,
{
    Err(Error {
        text: text.to_string(),
    })
}

fn make_cat(mut nodes: ir::NodeList) -> ir::Node {
    match nodes.len() {
        0 => ir::Node::Empty,
        1 => nodes.swap_remove(0),
        _ => ir::Node::Cat(nodes),
    }
}

fn make_alt(mut nodes: ir::NodeList) -> ir::Node {
    match nodes.len() {
        0 => ir::Node::Empty,
        1 => nodes.swap_remove(0),
        _ => ir::Node::Alt(nodes),
    }
}

fn class_type_for_escape(c: char) -> Option<CharacterClassType> {
    match c {
        'd' | 'D' => Some(CharacterClassType::Digits),
        's' | 'S' => Some(CharacterClassType::Spaces),
        'w' | 'W' => Some(CharacterClassType::Words),
        'h' | 'H' => Some(CharacterClassType::HexDigits),
        _ => None,
    }
}

/// \return a CodePointSet for a given character escape (positive or negative).
/// The positive classes are ASCII-only; the negative ones cover everything
/// else.
fn codepoints_from_class(ct: CharacterClassType, positive: bool) -> CodePointSet {
    let intervals = match ct {
        CharacterClassType::Digits => charclasses::DIGITS.to_vec(),
        CharacterClassType::Words => charclasses::WORD_CHARS.to_vec(),
        CharacterClassType::Spaces => charclasses::WHITESPACE.to_vec(),
        CharacterClassType::HexDigits => charclasses::HEX_DIGITS.to_vec(),
    };
    let cps = CodePointSet::from_sorted_disjoint_intervals(intervals);
    if positive {
        cps
    } else {
        cps.inverted()
    }
}

/// \return the set matched by `.`.
fn dot_codepoints(multiline: bool) -> CodePointSet {
    if multiline {
        CodePointSet::new().inverted()
    } else {
        CodePointSet::from_sorted_disjoint_intervals(vec![charclasses::NEWLINE]).inverted()
    }
}

/// \return the node for `\R`: either CRLF or a single line break.
fn make_linebreak() -> ir::Node {
    let crlf = ir::Node::Cat(vec![
        ir::Node::Char {
            c: '\r',
            icase: false,
        },
        ir::Node::Char {
            c: '\n',
            icase: false,
        },
    ]);
    let single = ir::Node::Bracket {
        cps: CodePointSet::from_sorted_disjoint_intervals(charclasses::LINE_BREAKS.to_vec()),
        icase: false,
    };
    ir::Node::Alt(vec![crlf, single])
}

fn add_class_atom(cps: &mut CodePointSet, atom: ClassAtom) {
    match atom {
        ClassAtom::CodePoint(c) => cps.add_one(c as u32),
        ClassAtom::Set(set) => cps.add_set(set),
    }
}

/// Combine the left operand of `&&` with the right one.
/// None means an operand without any items, which does not restrict the
/// other.
fn intersect_operands(
    lhs: Option<CodePointSet>,
    rhs: CodePointSet,
    rhs_has_items: bool,
) -> Option<CodePointSet> {
    match (lhs, rhs_has_items) {
        (None, false) => None,
        (None, true) => Some(rhs),
        (Some(lhs), false) => Some(lhs),
        (Some(lhs), true) => Some(lhs.intersection(&rhs)),
    }
}

/// Count the capturing groups of \p pattern, numbered and named.
/// Escaped parentheses, brackets and comment groups are skipped, as are line
/// comments while extended mode is on, starting from \p flags.
fn count_capture_groups(pattern: &str, flags: api::Flags) -> usize {
    let mut count = 0;
    let mut class_depth = 0usize;
    let mut extended = flags.extended;
    // Extended mode outside each open group, restored when it closes.
    let mut outer_extended = Vec::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' => {
                class_depth += 1;
                chars.next_if_eq(&'^');
                // A leading ] is a member.
                chars.next_if_eq(&']');
            }
            ']' if class_depth > 0 => class_depth -= 1,
            _ if class_depth > 0 => {}
            '#' if extended => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            ')' => {
                if let Some(outer) = outer_extended.pop() {
                    extended = outer;
                }
            }
            '(' => {
                if chars.next_if_eq(&'?').is_none() {
                    count += 1;
                    outer_extended.push(extended);
                    continue;
                }
                match chars.peek() {
                    Some('#') => {
                        while let Some(c) = chars.next() {
                            match c {
                                '\\' => {
                                    chars.next();
                                }
                                ')' => break,
                                _ => {}
                            }
                        }
                    }
                    Some('\'') => {
                        count += 1;
                        outer_extended.push(extended);
                    }
                    Some('<') => {
                        let mut rest = chars.clone();
                        rest.next();
                        if !matches!(rest.next(), Some('=') | Some('!')) {
                            count += 1;
                        }
                        outer_extended.push(extended);
                    }
                    _ => {
                        // Option letters, as in (?x-i) or (?x:...).
                        let mut toggled = extended;
                        let mut enable = true;
                        while let Some(&c) = chars.peek() {
                            match c {
                                'x' => toggled = enable,
                                '-' => enable = false,
                                'i' | 'm' => {}
                                _ => break,
                            }
                            chars.next();
                        }
                        // (?x) lasts until the enclosing group closes.
                        if chars.next_if_eq(&')').is_none() {
                            outer_extended.push(extended);
                        }
                        extended = toggled;
                    }
                }
            }
            _ => {}
        }
    }
    count
}

/// Represents the state used to parse a regex.
struct Parser<'a> {
    /// The remaining input.
    input: Peekable<CharIndices<'a>>,

    /// Length of the pattern in bytes.
    pattern_len: usize,

    /// Flags in effect at the current position.
    flags: api::Flags,

    /// Flags the pattern was parsed with.
    initial_flags: api::Flags,

    /// Number of capturing groups in the whole pattern, found by a pre-scan.
    /// This resolves `\NN` between backreferences and octal escapes.
    total_groups: usize,

    /// Capturing groups declared so far.
    groups: GroupTable,

    /// For each declared group, whether its closing parenthesis was parsed.
    closed: Vec<bool>,

    /// Depth of group nesting.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Consume a character, returning it.
    fn consume(&mut self, c: char) -> char {
        let nc = self.input.next().map(|(_, nc)| nc);
        std::debug_assert!(nc == Some(c), "char was not next");
        c
    }

    /// If our contents begin with the char c, consume it from our contents
    /// and return true. Otherwise return false.
    fn try_consume(&mut self, c: char) -> bool {
        self.input.next_if(|&(_, nc)| nc == c).is_some()
    }

    /// If our contents begin with the string \p s, consume it from our contents
    /// and return true. Otherwise return false.
    fn try_consume_str(&mut self, s: &str) -> bool {
        let mut cursor = self.input.clone();
        for c1 in s.chars() {
            if cursor.next().map(|(_, c)| c) != Some(c1) {
                return false;
            }
        }
        self.input = cursor;
        true
    }

    /// \return whether our contents begin with the string \p s, without
    /// consuming anything.
    fn lookahead(&self, s: &str) -> bool {
        let mut cursor = self.input.clone();
        s.chars().all(|c1| cursor.next().map(|(_, c)| c) == Some(c1))
    }

    /// Peek at the next character.
    fn peek(&mut self) -> Option<char> {
        self.input.peek().map(|&(_, c)| c)
    }

    /// \return the next character.
    fn next(&mut self) -> Option<char> {
        self.input.next().map(|(_, c)| c)
    }

    /// \return the byte offset of the next character.
    fn position(&mut self) -> usize {
        let end = self.pattern_len;
        self.input.peek().map_or(end, |&(idx, _)| idx)
    }

    fn try_parse(&mut self) -> Result<ir::Regex, Error> {
        // Parse a disjunction. If we consume everything, it's success. If there's
        // something left, it's an error (for example, an excess closing paren).
        let body = self.consume_disjunction()?;
        match self.peek() {
            Some(')') => error("Unbalanced parenthesis"),
            Some(c) => error(format!("Unexpected char: {}", c)),
            None => Ok(ir::Regex {
                node: body,
                flags: self.initial_flags,
                groups: std::mem::take(&mut self.groups),
            }),
        }
    }

    fn consume_disjunction(&mut self) -> Result<ir::Node, Error> {
        let mut terms = vec![self.consume_term(true)?];
        while self.try_consume('|') {
            terms.push(self.consume_term(false)?)
        }
        Ok(make_alt(terms))
    }

    /// Skip comment groups, plus whitespace and line comments in extended mode.
    fn skip_trivia(&mut self) -> Result<(), Error> {
        loop {
            if self.try_consume_str("(?#") {
                self.consume_comment()?;
            } else if self.flags.extended
                && matches!(
                    self.peek(),
                    Some(' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
                )
            {
                self.next();
            } else if self.flags.extended && self.try_consume('#') {
                while let Some(c) = self.next() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                return Ok(());
            }
        }
    }

    /// Consume the rest of a `(?#...)` comment.
    fn consume_comment(&mut self) -> Result<(), Error> {
        loop {
            match self.next() {
                None => return error("Unterminated comment"),
                Some('\\') => {
                    self.next();
                }
                Some(')') => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn consume_term(&mut self, first_branch: bool) -> Result<ir::Node, Error> {
        let mut result: Vec<ir::Node> = Vec::new();
        loop {
            self.skip_trivia()?;
            let start_offset = result.len();
            let mut quantifier_allowed = true;

            let c = match self.peek() {
                None => break,
                Some(c) => c,
            };
            match c {
                // A catenation is terminated by closing parens or vertical bar (alternations).
                ')' | '|' => break,
                '^' | '$' => {
                    self.consume(c);
                    let anchor_type = if c == '^' {
                        ir::AnchorType::StartOfLine
                    } else {
                        ir::AnchorType::EndOfLine
                    };
                    self.check_anchor(anchor_type, &result, first_branch)?;
                    quantifier_allowed = false;
                    result.push(ir::Node::Anchor(anchor_type));
                }

                '\\' => {
                    self.consume('\\');
                    let node = self.consume_atom_escape()?;
                    if let ir::Node::Anchor(anchor_type) = &node {
                        self.check_anchor(*anchor_type, &result, first_branch)?;
                        quantifier_allowed = false;
                    }
                    result.push(node);
                }

                '.' => {
                    self.consume('.');
                    result.push(ir::Node::Bracket {
                        cps: dot_codepoints(self.flags.multiline),
                        icase: false,
                    });
                }

                '(' => {
                    let node = self.consume_group()?;
                    if matches!(node, ir::Node::OptionToggle { scope: None, .. }) {
                        quantifier_allowed = false;
                    }
                    result.push(node);
                }

                '[' => {
                    let cps = self.consume_bracket()?;
                    result.push(ir::Node::Bracket {
                        cps,
                        icase: self.flags.icase,
                    });
                }

                '*' | '+' | '?' => {
                    return error("Nothing to repeat");
                }

                c => {
                    // It's an error if this parses successfully as a quantifier.
                    // Otherwise a { is literal, as in /{/ or /x{,}/.
                    if c == '{' {
                        let saved = self.input.clone();
                        if let Ok(Some(_)) = self.try_consume_quantifier() {
                            return error("Nothing to repeat");
                        }
                        self.input = saved;
                    }
                    self.consume(c);
                    result.push(ir::Node::Char {
                        c,
                        icase: self.flags.icase,
                    })
                }
            }

            // We just parsed a term; try parsing quantifiers.
            // Each one wraps the previous, so a{2}{3} is (?:a{2}){3}.
            loop {
                self.skip_trivia()?;
                let quant = match self.try_consume_quantifier()? {
                    Some(quant) => quant,
                    None => break,
                };
                if !quantifier_allowed {
                    return error("Quantifier not allowed here");
                }
                let quantifee = result.split_off(start_offset);
                result.push(ir::Node::Loop {
                    loopee: Box::new(make_cat(quantifee)),
                    quant,
                });
            }
        }
        Ok(make_cat(result))
    }

    /// Anchors are only supported at the edges of the pattern, where they
    /// constrain nothing about the generated strings.
    fn check_anchor(
        &mut self,
        anchor_type: ir::AnchorType,
        preceding: &[ir::Node],
        first_branch: bool,
    ) -> Result<(), Error> {
        if anchor_type.is_start() {
            let at_start = self.depth == 0
                && first_branch
                && preceding.iter().all(|node| {
                    node.is_anchor() || matches!(node, ir::Node::OptionToggle { scope: None, .. })
                });
            if !at_start {
                return error("Start anchors are only supported at the start of the pattern");
            }
        } else if self.depth > 0 || !self.at_pattern_end()? {
            return error("End anchors are only supported at the end of the pattern");
        }
        Ok(())
    }

    /// \return whether only trivia and end anchors remain in the input.
    fn at_pattern_end(&mut self) -> Result<bool, Error> {
        let saved = self.input.clone();
        let at_end = loop {
            self.skip_trivia()?;
            if self.peek().is_none() {
                break true;
            }
            if !(self.try_consume('$') || self.try_consume_str("\\z") || self.try_consume_str("\\Z"))
            {
                break false;
            }
        };
        self.input = saved;
        Ok(at_end)
    }

    fn consume_group(&mut self) -> Result<ir::Node, Error> {
        let position = self.position();
        self.consume('(');
        let flags = self.flags;
        if !self.try_consume('?') {
            let group = self.declare_group(None, position)?;
            let contents = self.consume_group_body(flags)?;
            self.close_group(group);
            return Ok(ir::Node::CaptureGroup(Box::new(contents), group));
        }
        match self.peek() {
            Some(':') => {
                self.consume(':');
                let contents = self.consume_group_body(flags)?;
                Ok(ir::Node::NonCapturingGroup(Box::new(contents)))
            }
            Some('=' | '!') => error("Lookahead assertions are not supported"),
            Some('<') if self.lookahead("<=") || self.lookahead("<!") => {
                error("Lookbehind assertions are not supported")
            }
            Some('<') => {
                self.consume('<');
                self.consume_named_group('>', position)
            }
            Some('\'') => {
                self.consume('\'');
                self.consume_named_group('\'', position)
            }
            Some('>') => error("Atomic groups are not supported"),
            Some('~') => error("Absent operators are not supported"),
            Some('(') => error("Conditional groups are not supported"),
            _ => self.consume_option_toggle(),
        }
    }

    /// Parse the contents of a group and its closing parenthesis, with
    /// \p flags in effect. Flags changed inside the group are restored after.
    fn consume_group_body(&mut self, flags: api::Flags) -> Result<ir::Node, Error> {
        let saved_flags = self.flags;
        self.flags = flags;
        self.depth += 1;
        let contents = self.consume_disjunction()?;
        if !self.try_consume(')') {
            return error("Unbalanced parenthesis");
        }
        self.depth -= 1;
        self.flags = saved_flags;
        Ok(contents)
    }

    fn consume_named_group(&mut self, terminator: char, position: usize) -> Result<ir::Node, Error> {
        let name = self.consume_group_name(terminator)?;
        let group = self.declare_group(Some(name.clone()), position)?;
        let contents = self.consume_group_body(self.flags)?;
        self.close_group(group);
        Ok(ir::Node::NamedCaptureGroup(Box::new(contents), group, name))
    }

    fn consume_group_name(&mut self, terminator: char) -> Result<CaptureGroupName, Error> {
        let mut name = CaptureGroupName::new();
        loop {
            match self.next() {
                Some(c) if c == terminator => break,
                Some(c) if c.is_alphanumeric() || c == '_' => name.push(c),
                _ => return error("Invalid group name"),
            }
        }
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            return error(format!("Invalid group name <{}>", name));
        }
        Ok(name)
    }

    fn declare_group(
        &mut self,
        name: Option<CaptureGroupName>,
        position: usize,
    ) -> Result<CaptureGroupID, Error> {
        if self.groups.len() >= MAX_CAPTURE_GROUPS {
            return error("Capture group count limit exceeded");
        }
        self.closed.push(false);
        Ok(self.groups.declare(name, position))
    }

    fn close_group(&mut self, group: CaptureGroupID) {
        if let Some(closed) = self.closed.get_mut(usize::from(group) - 1) {
            *closed = true;
        }
    }

    /// Parse an option group like `(?i-m)` or `(?x:...)`, after the `(?`.
    fn consume_option_toggle(&mut self) -> Result<ir::Node, Error> {
        let mut toggle = ir::ModeToggle::default();
        let mut enable = true;
        loop {
            match self.next() {
                Some('-') if enable => enable = false,
                Some(')') => {
                    // Applies to the rest of the enclosing group.
                    self.flags = toggle.apply(self.flags);
                    return Ok(ir::Node::OptionToggle {
                        toggle,
                        scope: None,
                    });
                }
                Some(':') => {
                    let contents = self.consume_group_body(toggle.apply(self.flags))?;
                    return Ok(ir::Node::OptionToggle {
                        toggle,
                        scope: Some(Box::new(contents)),
                    });
                }
                Some(c) => {
                    let target = if enable {
                        &mut toggle.enable
                    } else {
                        &mut toggle.disable
                    };
                    if !target.set(c, true) {
                        return error(format!("Invalid group modifier: {}", c));
                    }
                }
                None => return error("Unbalanced parenthesis"),
            }
        }
    }

    fn consume_bracket(&mut self) -> Result<CodePointSet, Error> {
        self.consume('[');
        let negate = self.try_consume('^');

        // The left operand of any && seen so far, and the current operand.
        let mut lhs: Option<CodePointSet> = None;
        let mut operand = CodePointSet::new();
        let mut has_items = false;
        let mut first = true;
        loop {
            match self.peek() {
                None => {
                    return error("Unbalanced bracket");
                }
                // A ] in first position is a member, as in []].
                Some(']') if !first => {
                    self.consume(']');
                    break;
                }
                _ => {}
            }
            first = false;

            if self.try_consume_str("&&") {
                lhs = intersect_operands(lhs, operand, has_items);
                operand = CodePointSet::new();
                has_items = false;
                continue;
            }
            has_items = true;

            if self.peek() == Some('[') {
                let nested = self.consume_nested_class()?;
                operand.add_set(nested);
                continue;
            }

            // Parse a code point or character class.
            let first_atom = self.consume_bracket_class_atom()?;

            // Check for a dash; we may have a range.
            // A trailing dash is literal, as in [a-].
            if self.peek() != Some('-') || self.lookahead("-]") {
                add_class_atom(&mut operand, first_atom);
                continue;
            }
            self.consume('-');
            if self.peek() == Some('[') {
                return error("Invalid character range");
            }
            let second_atom = self.consume_bracket_class_atom()?;

            // Ranges can't contain character classes: [\d-z] is invalid.
            // Ranges must also be in order: z-a is invalid.
            match (first_atom, second_atom) {
                (ClassAtom::CodePoint(c1), ClassAtom::CodePoint(c2)) if c1 <= c2 => {
                    operand.add(Interval {
                        first: c1 as u32,
                        last: c2 as u32,
                    })
                }
                (ClassAtom::CodePoint(c1), ClassAtom::CodePoint(c2)) => {
                    return error(format!("Empty range in character class: {}-{}", c1, c2));
                }
                _ => {
                    return error("Invalid character range");
                }
            }
        }

        let mut cps = intersect_operands(lhs, operand, has_items).unwrap_or_default();
        if negate {
            // Under icase [^a] excludes A as well.
            if self.flags.icase {
                cps = cps.case_closed();
            }
            cps = cps.inverted();
        }
        Ok(cps)
    }

    /// Parse a `[` inside a bracket: either a POSIX class like `[:alpha:]` or
    /// a nested bracket.
    fn consume_nested_class(&mut self) -> Result<CodePointSet, Error> {
        if let Some(cps) = self.try_consume_posix_class()? {
            return Ok(cps);
        }
        self.consume_bracket()
    }

    fn try_consume_posix_class(&mut self) -> Result<Option<CodePointSet>, Error> {
        let saved = self.input.clone();
        if !self.try_consume_str("[:") {
            return Ok(None);
        }
        let negate = self.try_consume('^');
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            name.push(self.consume(c));
        }
        if name.is_empty() || !self.try_consume_str(":]") {
            // Not POSIX syntax after all; this is a nested bracket like [[:a]].
            self.input = saved;
            return Ok(None);
        }
        let class = match PosixClass::from_str(&name) {
            Some(class) => class,
            None => return error(format!("Invalid POSIX bracket type: {}", name)),
        };
        let cps = CodePointSet::from_predicate(|c| class.contains(c));
        Ok(Some(if negate { cps.inverted() } else { cps }))
    }

    fn consume_bracket_class_atom(&mut self) -> Result<ClassAtom, Error> {
        match self.next() {
            None => error("Unbalanced bracket"),
            Some('\\') => self.consume_class_escape(),
            Some(c) => Ok(ClassAtom::CodePoint(c)),
        }
    }

    /// Parse an escape inside a bracket, after the backslash.
    fn consume_class_escape(&mut self) -> Result<ClassAtom, Error> {
        let c = match self.peek() {
            Some(c) => c,
            None => return error("Incomplete escape"),
        };
        if let Some(class_type) = class_type_for_escape(c) {
            self.consume(c);
            return Ok(ClassAtom::Set(codepoints_from_class(
                class_type,
                c.is_ascii_lowercase(),
            )));
        }
        match c {
            'p' | 'P' => {
                self.consume(c);
                Ok(ClassAtom::Set(self.consume_property_escape(c == 'P')?))
            }
            'b' => {
                // Backspace, not a word boundary.
                self.consume('b');
                Ok(ClassAtom::CodePoint('\x08'))
            }
            _ => Ok(ClassAtom::CodePoint(self.consume_character_escape()?)),
        }
    }

    /// Parse `{Name}` or `{^Name}` after `\p` or `\P`.
    fn consume_property_escape(&mut self, negate: bool) -> Result<CodePointSet, Error> {
        if !self.try_consume('{') {
            return error("Invalid character property name");
        }
        let negate = negate ^ self.try_consume('^');
        let mut name = String::new();
        loop {
            match self.next() {
                Some('}') => break,
                Some(c) => name.push(c),
                None => return error("Invalid character property name"),
            }
        }
        let property = match PropertyEscape::from_name(&name) {
            Some(property) => property,
            None => return error(format!("Invalid character property name {{{}}}", name)),
        };
        let cps = property.codepoints();
        Ok(if negate { cps.inverted() } else { cps })
    }

    fn try_consume_quantifier(&mut self) -> Result<Option<ir::Quantifier>, Error> {
        let (mut quant, syntax) = match self.try_consume_quantifier_prefix()? {
            Some(prefix) => prefix,
            None => return Ok(None),
        };
        // A fixed interval takes no suffix: a{2}? is an optional a{2}, and
        // a{2}+ repeats it. An interval followed by + is likewise repeated.
        match syntax {
            QuantifierSyntax::Fixed => {}
            QuantifierSyntax::Range => {
                if self.try_consume('?') {
                    quant.greediness = ir::Greediness::Lazy;
                }
            }
            QuantifierSyntax::Symbol => {
                if self.try_consume('?') {
                    quant.greediness = ir::Greediness::Lazy;
                } else if self.try_consume('+') {
                    quant.greediness = ir::Greediness::Possessive;
                }
            }
        }
        Ok(Some(quant))
    }

    fn try_consume_quantifier_prefix(
        &mut self,
    ) -> Result<Option<(ir::Quantifier, QuantifierSyntax)>, Error> {
        type Prefix = Result<Option<(ir::Quantifier, QuantifierSyntax)>, Error>;
        let symbol = |min, max| -> Prefix {
            Ok(Some((
                ir::Quantifier {
                    min,
                    max,
                    greediness: ir::Greediness::Greedy,
                },
                QuantifierSyntax::Symbol,
            )))
        };
        match self.peek() {
            Some('+') => {
                self.consume('+');
                symbol(1, usize::MAX)
            }
            Some('*') => {
                self.consume('*');
                symbol(0, usize::MAX)
            }
            Some('?') => {
                self.consume('?');
                symbol(0, 1)
            }
            Some('{') => {
                let saved = self.input.clone();
                self.consume('{');
                let result = self.try_consume_interval()?;
                if result.is_none() {
                    self.input = saved;
                }
                Ok(result)
            }
            _ => Ok(None),
        }
    }

    /// Parse the rest of an interval quantifier after its `{`.
    /// \return None if this is not an interval, in which case the `{` is a
    /// literal.
    fn try_consume_interval(&mut self) -> Result<Option<(ir::Quantifier, QuantifierSyntax)>, Error> {
        let min = self.try_consume_decimal_integer_literal();
        let (max, syntax) = if self.try_consume(',') {
            (self.try_consume_decimal_integer_literal(), QuantifierSyntax::Range)
        } else {
            (min, QuantifierSyntax::Fixed)
        };
        if !self.try_consume('}') {
            return Ok(None);
        }
        let (min, max) = match (min, max) {
            // Like {} or {,}.
            (None, None) => return Ok(None),
            // Like {3}, {3,} or {3,4}.
            (Some(min), max) => (min, max.unwrap_or(usize::MAX)),
            // Like {,4}.
            (None, Some(max)) => (0, max),
        };
        if min > MAX_REPEAT || (max != usize::MAX && max > MAX_REPEAT) {
            return error("Repeat count too large");
        }
        if min > max {
            return error("Invalid quantifier: upper bound is smaller than lower bound");
        }
        let quant = ir::Quantifier {
            min,
            max,
            greediness: ir::Greediness::Greedy,
        };
        Ok(Some((quant, syntax)))
    }

    /// If the value would overflow, usize::MAX is returned.
    /// All decimal digits are consumed regardless.
    fn try_consume_decimal_integer_literal(&mut self) -> Option<usize> {
        let mut result: usize = 0;
        let mut char_count = 0;
        while let Some(c) = self.peek() {
            if let Some(digit) = char::to_digit(c, 10) {
                self.consume(c);
                char_count += 1;
                result = result.saturating_mul(10);
                result = result.saturating_add(digit as usize);
            } else {
                break;
            }
        }
        if char_count > 0 {
            Some(result)
        } else {
            None
        }
    }

    /// Consume up to \p max_digits hex digits.
    /// \return their value and how many there were.
    fn consume_hex_digits(&mut self, max_digits: usize) -> (u32, usize) {
        let mut value = 0u32;
        let mut count = 0;
        while count < max_digits {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    self.next();
                    value = value * 16 + digit;
                    count += 1;
                }
                None => break,
            }
        }
        (value, count)
    }

    /// Consume up to two more octal digits after a leading digit \p value.
    fn consume_octal_escape(&mut self, mut value: u32) -> char {
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(digit) => {
                    self.next();
                    value = value * 8 + digit;
                }
                None => break,
            }
        }
        to_char_sat(value)
    }

    /// Parse the character after `\c` or `\C-`.
    fn consume_control_escape(&mut self) -> Result<char, Error> {
        match self.next() {
            Some('?') => Ok('\x7F'),
            Some(c) if c.is_ascii() => Ok(char::from(c as u8 & 0x1F)),
            _ => error("Invalid control escape"),
        }
    }

    /// Parse an escape that stands for a single character, after the
    /// backslash. Unknown escapes stand for the escaped character itself.
    fn consume_character_escape(&mut self) -> Result<char, Error> {
        let c = match self.next() {
            Some(c) => c,
            None => return error("Incomplete escape"),
        };
        match c {
            'a' => Ok('\x07'),
            'e' => Ok('\x1B'),
            'f' => Ok('\x0C'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'v' => Ok('\x0B'),
            'c' => self.consume_control_escape(),
            'C' => {
                if !self.try_consume('-') {
                    return error("Invalid control escape");
                }
                self.consume_control_escape()
            }
            'M' => error("Meta escapes are not supported"),
            'x' => match self.consume_hex_digits(2) {
                (_, 0) => error("Invalid hex escape"),
                (value, _) => Ok(to_char_sat(value)),
            },
            'u' => {
                let (value, count) = if self.try_consume('{') {
                    let digits = self.consume_hex_digits(6);
                    if !self.try_consume('}') {
                        return error("Invalid Unicode escape");
                    }
                    digits
                } else {
                    match self.consume_hex_digits(4) {
                        (value, 4) => (value, 4),
                        _ => return error("Invalid Unicode escape"),
                    }
                };
                match char::from_u32(value) {
                    Some(c) if count > 0 => Ok(c),
                    _ => error("Invalid Unicode escape"),
                }
            }
            '0'..='7' => Ok(self.consume_octal_escape(u32::from(c) - u32::from('0'))),
            _ => Ok(c),
        }
    }

    /// Parse an escape outside of brackets, after the backslash.
    fn consume_atom_escape(&mut self) -> Result<ir::Node, Error> {
        let c = match self.peek() {
            Some(c) => c,
            None => return error("Incomplete escape"),
        };
        if let Some(class_type) = class_type_for_escape(c) {
            self.consume(c);
            return Ok(ir::Node::Bracket {
                cps: codepoints_from_class(class_type, c.is_ascii_lowercase()),
                icase: false,
            });
        }
        let anchor = |anchor_type| -> Result<ir::Node, Error> { Ok(ir::Node::Anchor(anchor_type)) };
        match c {
            'b' | 'B' => error("Word boundaries are not supported"),
            'g' => error("Subexpression calls (\\g) are not supported"),
            'A' => {
                self.consume('A');
                anchor(ir::AnchorType::StartOfString)
            }
            'G' => {
                self.consume('G');
                anchor(ir::AnchorType::LastMatch)
            }
            'z' => {
                self.consume('z');
                anchor(ir::AnchorType::EndOfString)
            }
            'Z' => {
                self.consume('Z');
                anchor(ir::AnchorType::EndOfStringOrNewline)
            }
            'K' => {
                self.consume('K');
                Ok(ir::Node::Empty)
            }
            'R' => {
                self.consume('R');
                Ok(make_linebreak())
            }
            'X' => {
                self.consume('X');
                Ok(ir::Node::Bracket {
                    cps: CodePointSet::new().inverted(),
                    icase: false,
                })
            }
            'p' | 'P' => {
                self.consume(c);
                Ok(ir::Node::Bracket {
                    cps: self.consume_property_escape(c == 'P')?,
                    icase: false,
                })
            }
            'k' if self.lookahead("k<") || self.lookahead("k'") => {
                self.consume('k');
                self.consume_named_backref()
            }
            '1'..='9' => match self.try_consume_backref()? {
                Some(node) => Ok(node),
                None => Ok(ir::Node::Char {
                    c: self.consume_character_escape()?,
                    icase: self.flags.icase,
                }),
            },
            _ => Ok(ir::Node::Char {
                c: self.consume_character_escape()?,
                icase: self.flags.icase,
            }),
        }
    }

    /// Resolve a `\N` escape. The whole run of digits is the group number; it
    /// is a backreference if it is a single digit or names a group of the
    /// pattern.
    /// \return None otherwise; the escape is then an octal escape, or a
    /// literal 8 or 9.
    fn try_consume_backref(&mut self) -> Result<Option<ir::Node>, Error> {
        let mut cursor = self.input.clone();
        let mut value = 0usize;
        let mut len = 0;
        while let Some(digit) = cursor.next().and_then(|(_, c)| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(digit as usize);
            len += 1;
        }
        if len > 1 && value > self.total_groups {
            return Ok(None);
        }
        for _ in 0..len {
            self.next();
        }
        let group = match CaptureGroupID::try_from(value) {
            Ok(group) => group,
            Err(_) => return error(format!("Backreference \\{} too large", value)),
        };
        self.check_backref(group)?;
        Ok(Some(ir::Node::BackRef(group)))
    }

    /// Parse `<name>`, `'name'` or `<N>` after `\k`.
    fn consume_named_backref(&mut self) -> Result<ir::Node, Error> {
        let terminator = if self.try_consume('<') {
            '>'
        } else {
            self.consume('\'');
            '\''
        };
        let mut name = CaptureGroupName::new();
        loop {
            match self.next() {
                Some(c) if c == terminator => break,
                Some(c) => name.push(c),
                None => return error("Invalid backreference name"),
            }
        }
        if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
            let group = match name.parse::<CaptureGroupID>() {
                Ok(group) if group > 0 => group,
                _ => return error(format!("Invalid backreference number <{}>", name)),
            };
            self.check_backref(group)?;
            return Ok(ir::Node::BackRef(group));
        }
        let group = match self.groups.find_name(&name) {
            Some(group) => group,
            None => return error(format!("Undefined group name <{}>", name)),
        };
        self.check_backref(group)?;
        Ok(ir::Node::NamedBackRef(group, name))
    }

    /// A backreference must refer to a group which is already complete.
    fn check_backref(&self, group: CaptureGroupID) -> Result<(), Error> {
        let closed = usize::from(group)
            .checked_sub(1)
            .and_then(|idx| self.closed.get(idx));
        match closed {
            Some(true) => Ok(()),
            Some(false) => error(format!(
                "Backreference \\{} refers to a group that is not closed",
                group
            )),
            None => error(format!(
                "Backreference \\{} refers to a group that is not defined",
                group
            )),
        }
    }
}

/// Try parsing a given pattern.
/// Return the resulting IR regex, or an error.
pub fn try_parse(pattern: &str, flags: api::Flags) -> Result<ir::Regex, Error> {
    let mut p = Parser {
        input: pattern.char_indices().peekable(),
        pattern_len: pattern.len(),
        flags,
        initial_flags: flags,
        total_groups: count_capture_groups(pattern, flags),
        groups: GroupTable::default(),
        closed: Vec::new(),
        depth: 0,
    };
    p.try_parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pattern: &str) -> ir::Regex {
        try_parse(pattern, api::Flags::default()).unwrap()
    }

    #[test]
    fn counts_capture_groups() {
        let count = |pattern| count_capture_groups(pattern, api::Flags::default());
        assert_eq!(count("(a)(b)"), 2);
        assert_eq!(count("(?:a)(?<n>b)(?'m'c)"), 2);
        assert_eq!(count("(?=a)(?<=b)(?<!c)"), 0);
        assert_eq!(count(r"\(a[(]\)"), 0);
        assert_eq!(count(r"[]()]"), 0);
        assert_eq!(count(r"(?#(a\))(b)"), 1);
        assert_eq!(count("# (\n(a)"), 2);
    }

    #[test]
    fn counts_capture_groups_in_extended_mode() {
        let extended = |pattern| count_capture_groups(pattern, api::Flags::from("x"));
        assert_eq!(extended("# (\n(a)"), 1);
        assert_eq!(extended(r"\# (a)"), 1);
        assert_eq!(extended("[#](a)"), 1);
        assert_eq!(extended("(?-x)# (\n"), 1);

        let plain = |pattern| count_capture_groups(pattern, api::Flags::default());
        assert_eq!(plain("(?x)# (\n(a)"), 1);
        assert_eq!(plain("(?x:# (\n)(a)"), 1);
        // The toggle ends with its group.
        assert_eq!(plain("((?x))# ("), 2);
        assert_eq!(plain("(?x-x)# ("), 1);
    }

    #[test]
    fn groups_are_numbered_by_opening_paren() {
        let re = parse("((a)(?<name>b))(c)");
        assert_eq!(re.groups.len(), 4);
        assert_eq!(re.groups.get(3).and_then(|g| g.name.as_deref()), Some("name"));
        assert_eq!(re.groups.get(1).map(|g| g.position), Some(0));
        assert_eq!(re.groups.get(2).map(|g| g.position), Some(1));
        assert_eq!(re.groups.find_name("name"), Some(3));
        assert_eq!(re.groups.find_name("other"), None);
    }

    #[test]
    fn backrefs_and_octal() {
        assert!(matches!(parse(r"(a)\1").node, ir::Node::Cat(ref nodes) if matches!(nodes[1], ir::Node::BackRef(1))));
        // A single digit is always a backreference.
        assert!(try_parse(r"\1", api::Flags::default()).is_err());
        // Several digits beyond the group count are octal.
        assert!(matches!(parse(r"\177").node, ir::Node::Char { c: '\x7F', .. }));
        assert!(matches!(parse(r"(a)\12").node, ir::Node::Cat(ref nodes) if matches!(nodes[1], ir::Node::Char { c: '\n', .. })));
        match parse(r"\81").node {
            ir::Node::Cat(nodes) => {
                assert!(matches!(nodes[0], ir::Node::Char { c: '8', .. }));
                assert!(matches!(nodes[1], ir::Node::Char { c: '1', .. }));
            }
            node => panic!("Unexpected node {:?}", node),
        }
        // Comments in extended mode do not declare groups.
        let re = try_parse("(a)# ((((((((((\n\\10", api::Flags::from("x")).unwrap();
        assert!(matches!(re.node, ir::Node::Cat(ref nodes) if matches!(nodes[1], ir::Node::Char { c: '\x08', .. })));
    }

    #[test]
    fn fixed_interval_with_question_mark_is_optional() {
        match parse("a{2}?").node {
            ir::Node::Loop { loopee, quant } => {
                assert_eq!((quant.min, quant.max), (0, 1));
                assert!(matches!(*loopee, ir::Node::Loop { quant, .. } if quant.min == 2 && quant.max == 2));
            }
            node => panic!("Unexpected node {:?}", node),
        }
    }

    #[test]
    fn quantifier_greediness() {
        let greediness = |pattern| match parse(pattern).node {
            ir::Node::Loop { quant, .. } => quant.greediness,
            node => panic!("Unexpected node {:?}", node),
        };
        assert_eq!(greediness("a*"), ir::Greediness::Greedy);
        assert_eq!(greediness("a*?"), ir::Greediness::Lazy);
        assert_eq!(greediness("a*+"), ir::Greediness::Possessive);
        assert_eq!(greediness("a{1,2}?"), ir::Greediness::Lazy);
    }

    #[test]
    fn plus_after_interval_is_a_nested_repeat() {
        for pattern in ["a{1,2}+", "a{2}+"] {
            match parse(pattern).node {
                ir::Node::Loop { loopee, quant } => {
                    assert_eq!((quant.min, quant.max), (1, usize::MAX));
                    assert_eq!(quant.greediness, ir::Greediness::Greedy);
                    assert!(matches!(*loopee, ir::Node::Loop { .. }), "{}", pattern);
                }
                node => panic!("Unexpected node {:?}", node),
            }
        }
        // After a symbol, + is possessive.
        assert!(matches!(parse("a*+").node, ir::Node::Loop { ref loopee, .. } if matches!(**loopee, ir::Node::Char { .. })));
    }

    #[test]
    fn literal_braces() {
        for pattern in ["x{", "x{,}", "x{a}", "x{1", "}"] {
            assert!(try_parse(pattern, api::Flags::default()).is_ok(), "{}", pattern);
        }
    }
}
