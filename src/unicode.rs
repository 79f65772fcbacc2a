//! Unicode properties, POSIX bracket classes and case alternates.

use crate::codepointset::CodePointSet;
use crate::util::single_char;
use icu_properties::{maps, sets, GeneralCategory, GeneralCategoryGroup, Script};

/// A POSIX bracket class like `[:alpha:]`.
/// These follow Onigmo's Unicode definitions rather than the ASCII ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PosixClass {
    Alnum,
    Alpha,
    Ascii,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    XDigit,
    Word,
}

impl PosixClass {
    /// Look up a class by the name used between `[:` and `:]`.
    pub(crate) fn from_str(s: &str) -> Option<Self> {
        use PosixClass::*;
        match s {
            "alnum" => Some(Alnum),
            "alpha" => Some(Alpha),
            "ascii" => Some(Ascii),
            "blank" => Some(Blank),
            "cntrl" => Some(Cntrl),
            "digit" => Some(Digit),
            "graph" => Some(Graph),
            "lower" => Some(Lower),
            "print" => Some(Print),
            "punct" => Some(Punct),
            "space" => Some(Space),
            "upper" => Some(Upper),
            "xdigit" => Some(XDigit),
            "word" => Some(Word),
            _ => None,
        }
    }

    pub(crate) fn contains(self, c: char) -> bool {
        use PosixClass::*;
        let gc = maps::general_category().get(c);
        match self {
            Alnum => sets::alphabetic().contains(c) || gc == GeneralCategory::DecimalNumber,
            Alpha => sets::alphabetic().contains(c),
            Ascii => c.is_ascii(),
            Blank => c == '\t' || gc == GeneralCategory::SpaceSeparator,
            Cntrl => gc == GeneralCategory::Control,
            Digit => gc == GeneralCategory::DecimalNumber,
            Graph => {
                !sets::white_space().contains(c)
                    && !matches!(
                        gc,
                        GeneralCategory::Control
                            | GeneralCategory::Format
                            | GeneralCategory::Unassigned
                            | GeneralCategory::Surrogate
                            | GeneralCategory::PrivateUse
                    )
            }
            Lower => sets::lowercase().contains(c),
            Print => gc == GeneralCategory::SpaceSeparator || Graph.contains(c),
            Punct => GeneralCategoryGroup::Punctuation.contains(gc),
            Space => sets::white_space().contains(c),
            Upper => sets::uppercase().contains(c),
            XDigit => c.is_ascii_hexdigit(),
            Word => {
                sets::alphabetic().contains(c)
                    || GeneralCategoryGroup::Mark.contains(gc)
                    || gc == GeneralCategory::DecimalNumber
                    || gc == GeneralCategory::ConnectorPunctuation
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum UnicodePropertyBinary {
    Alphabetic,
    ASCIIHexDigit,
    CaseIgnorable,
    Cased,
    Dash,
    DefaultIgnorableCodePoint,
    Diacritic,
    Emoji,
    EmojiPresentation,
    ExtendedPictographic,
    Extender,
    HexDigit,
    IDContinue,
    IDStart,
    Ideographic,
    Lowercase,
    Math,
    NoncharacterCodePoint,
    PatternSyntax,
    PatternWhiteSpace,
    QuotationMark,
    SentenceTerminal,
    TerminalPunctuation,
    Uppercase,
    WhiteSpace,
    XIDContinue,
    XIDStart,
    Any,
    Assigned,
}

impl UnicodePropertyBinary {
    /// Look up a binary property by its loose (normalized) name.
    fn from_loose(s: &str) -> Option<Self> {
        use UnicodePropertyBinary::*;
        match s {
            "alphabetic" => Some(Alphabetic),
            "ahex" | "asciihexdigit" => Some(ASCIIHexDigit),
            "ci" | "caseignorable" => Some(CaseIgnorable),
            "cased" => Some(Cased),
            "dash" => Some(Dash),
            "di" | "defaultignorablecodepoint" => Some(DefaultIgnorableCodePoint),
            "dia" | "diacritic" => Some(Diacritic),
            "emoji" => Some(Emoji),
            "epres" | "emojipresentation" => Some(EmojiPresentation),
            "extpict" | "extendedpictographic" => Some(ExtendedPictographic),
            "ext" | "extender" => Some(Extender),
            "hex" | "hexdigit" => Some(HexDigit),
            "idc" | "idcontinue" => Some(IDContinue),
            "ids" | "idstart" => Some(IDStart),
            "ideo" | "ideographic" => Some(Ideographic),
            "lowercase" => Some(Lowercase),
            "math" => Some(Math),
            "nchar" | "noncharactercodepoint" => Some(NoncharacterCodePoint),
            "patsyn" | "patternsyntax" => Some(PatternSyntax),
            "patws" | "patternwhitespace" => Some(PatternWhiteSpace),
            "qmark" | "quotationmark" => Some(QuotationMark),
            "sterm" | "sentenceterminal" => Some(SentenceTerminal),
            "term" | "terminalpunctuation" => Some(TerminalPunctuation),
            "uppercase" => Some(Uppercase),
            "wspace" | "whitespace" => Some(WhiteSpace),
            "xidc" | "xidcontinue" => Some(XIDContinue),
            "xids" | "xidstart" => Some(XIDStart),
            "any" => Some(Any),
            "assigned" => Some(Assigned),
            _ => None,
        }
    }

    fn contains(self, c: char) -> bool {
        use UnicodePropertyBinary::*;
        match self {
            Alphabetic => sets::alphabetic().contains(c),
            ASCIIHexDigit => sets::ascii_hex_digit().contains(c),
            CaseIgnorable => sets::case_ignorable().contains(c),
            Cased => sets::cased().contains(c),
            Dash => sets::dash().contains(c),
            DefaultIgnorableCodePoint => sets::default_ignorable_code_point().contains(c),
            Diacritic => sets::diacritic().contains(c),
            Emoji => sets::emoji().contains(c),
            EmojiPresentation => sets::emoji_presentation().contains(c),
            ExtendedPictographic => sets::extended_pictographic().contains(c),
            Extender => sets::extender().contains(c),
            HexDigit => sets::hex_digit().contains(c),
            IDContinue => sets::id_continue().contains(c),
            IDStart => sets::id_start().contains(c),
            Ideographic => sets::ideographic().contains(c),
            Lowercase => sets::lowercase().contains(c),
            Math => sets::math().contains(c),
            NoncharacterCodePoint => sets::noncharacter_code_point().contains(c),
            PatternSyntax => sets::pattern_syntax().contains(c),
            PatternWhiteSpace => sets::pattern_white_space().contains(c),
            QuotationMark => sets::quotation_mark().contains(c),
            SentenceTerminal => sets::sentence_terminal().contains(c),
            TerminalPunctuation => sets::terminal_punctuation().contains(c),
            Uppercase => sets::uppercase().contains(c),
            WhiteSpace => sets::white_space().contains(c),
            XIDContinue => sets::xid_continue().contains(c),
            XIDStart => sets::xid_start().contains(c),
            Any => true,
            Assigned => maps::general_category().get(c) != GeneralCategory::Unassigned,
        }
    }
}

/// The target of a `\p{...}` escape.
#[derive(Debug, Copy, Clone)]
pub(crate) enum PropertyEscape {
    Posix(PosixClass),
    Binary(UnicodePropertyBinary),
    GeneralCategory(GeneralCategoryGroup),
    Script(Script),
}

/// Property names compare ignoring case, spaces, hyphens and underscores.
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl PropertyEscape {
    /// Resolve a property name.
    /// POSIX-style names win, then binary properties, general categories and
    /// finally scripts.
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        let loose = normalize_name(name);
        if let Some(posix) = PosixClass::from_str(&loose) {
            return Some(Self::Posix(posix));
        }
        if let Some(binary) = UnicodePropertyBinary::from_loose(&loose) {
            return Some(Self::Binary(binary));
        }
        if let Some(category) = GeneralCategoryGroup::name_to_enum_mapper().get_loose(name) {
            return Some(Self::GeneralCategory(category));
        }
        Script::name_to_enum_mapper()
            .get_loose(name)
            .map(Self::Script)
    }

    pub(crate) fn contains(&self, c: char) -> bool {
        match self {
            Self::Posix(class) => class.contains(c),
            Self::Binary(binary) => binary.contains(c),
            Self::GeneralCategory(group) => group.contains(maps::general_category().get(c)),
            Self::Script(script) => maps::script().get(c) == *script,
        }
    }

    /// \return every code point with the property.
    pub(crate) fn codepoints(&self) -> CodePointSet {
        CodePointSet::from_predicate(|c| self.contains(c))
    }
}

fn swap_case(c: char) -> Option<char> {
    if c.is_lowercase() {
        single_char(c.to_uppercase())
    } else if c.is_uppercase() {
        single_char(c.to_lowercase())
    } else {
        None
    }
}

/// \return the other-case form of \p c, if it has exactly one.
/// The mapping must round-trip, so that a case-insensitive matcher treats the
/// two chars as equivalent.
pub fn case_alternate(c: char) -> Option<char> {
    let alt = swap_case(c).filter(|&alt| alt != c)?;
    if swap_case(alt) == Some(c) {
        Some(alt)
    } else {
        None
    }
}
