//! Intermediate representation for a regex

use crate::api::Flags;
use crate::codepointset::CodePointSet;
use crate::types::{CaptureGroupID, CaptureGroupName, GroupTable};
use core::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnchorType {
    StartOfLine,   // ^
    StartOfString, // \A
    LastMatch,     // \G
    EndOfLine,     // $
    EndOfString,   // \z
    EndOfStringOrNewline, // \Z
}

impl AnchorType {
    /// \return whether the anchor may only appear at the start of a pattern.
    pub fn is_start(self) -> bool {
        matches!(
            self,
            AnchorType::StartOfLine | AnchorType::StartOfString | AnchorType::LastMatch
        )
    }
}

/// How a quantifier matches. This never changes which strings are generated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Greediness {
    Greedy,
    Lazy,
    Possessive,
}

/// A Quantifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Quantifier {
    /// Minimum number of iterations of the loop, inclusive.
    pub min: usize,

    /// Maximum number of iterations of the loop, inclusive.
    /// usize::MAX means unbounded.
    pub max: usize,

    pub greediness: Greediness,
}

/// An inline option change like `(?i-m)`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ModeToggle {
    /// Options switched on.
    pub enable: Flags,

    /// Options switched off.
    pub disable: Flags,
}

impl ModeToggle {
    /// \return \p flags with this toggle applied.
    pub fn apply(self, flags: Flags) -> Flags {
        Flags {
            icase: (flags.icase || self.enable.icase) && !self.disable.icase,
            multiline: (flags.multiline || self.enable.multiline) && !self.disable.multiline,
            extended: (flags.extended || self.enable.extended) && !self.disable.extended,
        }
    }
}

impl fmt::Display for ModeToggle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(?{}", self.enable)?;
        if self.disable != Flags::default() {
            write!(f, "-{}", self.disable)?;
        }
        f.write_str(")")
    }
}

/// The node types of our IR.
#[derive(Debug, Clone)]
pub enum Node {
    /// Matches the empty string.
    Empty,

    /// Match a literal character.
    /// If icase is true, its case alternate matches as well.
    Char { c: char, icase: bool },

    /// Match any of a set of chars.
    /// The set is fully resolved: negation, intersection and (for negated
    /// case-insensitive operands) case closure were applied by the parser.
    Bracket { cps: CodePointSet, icase: bool },

    /// Match the catenation of multiple nodes.
    Cat(Vec<Node>),

    /// Match an alternation like a|b|c. Branches keep their source order.
    Alt(Vec<Node>),

    /// A capturing group.
    CaptureGroup(Box<Node>, CaptureGroupID),

    /// A named capturing group.
    NamedCaptureGroup(Box<Node>, CaptureGroupID, CaptureGroupName),

    /// A non-capturing group (?:...).
    NonCapturingGroup(Box<Node>),

    /// An option change. With no scope it applies to the rest of the
    /// enclosing group, like `(?i)`; otherwise only to the wrapped
    /// subexpression, like `(?i:...)`.
    /// The parser has already applied the options to the affected nodes.
    OptionToggle {
        toggle: ModeToggle,
        scope: Option<Box<Node>>,
    },

    /// Match an anchor at the very start or end of the pattern.
    Anchor(AnchorType),

    /// A backreference.
    BackRef(CaptureGroupID),

    /// A backreference by name, like \k<name>.
    NamedBackRef(CaptureGroupID, CaptureGroupName),

    /// A loop like /.*/ or /x{3, 5}?/
    Loop {
        loopee: Box<Node>,
        quant: Quantifier,
    },
}

pub type NodeList = Vec<Node>;

impl Node {
    /// \return whether this is an anchor.
    pub fn is_anchor(&self) -> bool {
        matches!(self, Node::Anchor(..))
    }

    /// \return true if this node can never produce a string, because it
    /// contains a bracket with an empty set that is not optional.
    /// This is best-effort: a false return is always safe.
    pub fn match_always_fails(&self) -> bool {
        match self {
            Node::Bracket { cps, .. } => cps.is_empty(),
            Node::Cat(nodes) => nodes.iter().any(Node::match_always_fails),
            Node::Alt(nodes) => !nodes.is_empty() && nodes.iter().all(Node::match_always_fails),
            Node::CaptureGroup(contents, ..)
            | Node::NamedCaptureGroup(contents, ..)
            | Node::NonCapturingGroup(contents) => contents.match_always_fails(),
            Node::OptionToggle {
                scope: Some(contents),
                ..
            } => contents.match_always_fails(),
            Node::Loop { loopee, quant } => quant.min > 0 && loopee.match_always_fails(),
            _ => false,
        }
    }
}

/// A helper type for walking.
#[derive(Debug, Clone, Default)]
pub struct Walk {
    // The current depth of the walk.
    pub depth: usize,
}

#[derive(Debug)]
struct Walker<'a, F>
where
    F: FnMut(&Node, &mut Walk),
{
    func: &'a mut F,
    walk: Walk,
}

impl<F> Walker<'_, F>
where
    F: FnMut(&Node, &mut Walk),
{
    fn process_children(&mut self, n: &Node) {
        match n {
            Node::Empty
            | Node::Char { .. }
            | Node::Bracket { .. }
            | Node::Anchor(..)
            | Node::BackRef(..)
            | Node::NamedBackRef(..)
            | Node::OptionToggle { scope: None, .. } => {}
            Node::Cat(nodes) | Node::Alt(nodes) => {
                for node in nodes {
                    self.process(node);
                }
            }
            Node::Loop { loopee, .. } => self.process(loopee),
            Node::CaptureGroup(contents, ..)
            | Node::NamedCaptureGroup(contents, ..)
            | Node::NonCapturingGroup(contents)
            | Node::OptionToggle {
                scope: Some(contents),
                ..
            } => self.process(contents.as_ref()),
        }
    }

    fn process(&mut self, n: &Node) {
        (self.func)(n, &mut self.walk);
        self.walk.depth += 1;
        self.process_children(n);
        self.walk.depth -= 1;
    }
}

/// Call a function on every Node, parents before their children.
pub fn walk<F>(n: &Node, func: &mut F)
where
    F: FnMut(&Node, &mut Walk),
{
    let mut walker = Walker {
        func,
        walk: Walk::default(),
    };
    walker.process(n);
}

/// A regex in IR form.
#[derive(Debug, Clone)]
pub struct Regex {
    pub node: Node,
    pub flags: Flags,
    pub groups: GroupTable,
}

fn display_cps(cps: &CodePointSet, f: &mut fmt::Formatter) -> fmt::Result {
    let mut first = true;
    for iv in cps.intervals() {
        if !first {
            write!(f, ", ")?;
        }
        first = false;
        if iv.first == iv.last {
            write!(f, "0x{:x}", iv.first)?;
        } else {
            write!(f, "0x{:x}-0x{:x}", iv.first, iv.last)?;
        }
    }
    Ok(())
}

fn display_node(node: &Node, depth: usize, f: &mut fmt::Formatter) -> fmt::Result {
    for _ in 0..depth {
        write!(f, "..")?;
    }
    match node {
        Node::Empty => {
            writeln!(f, "Empty")?;
        }
        Node::Char { c, icase } => {
            let suffix = if *icase { " icase" } else { "" };
            writeln!(f, "{:?}{}", c, suffix)?;
        }
        Node::Bracket { cps, icase } => {
            write!(f, "Bracket ")?;
            display_cps(cps, f)?;
            writeln!(f, "{}", if *icase { " icase" } else { "" })?;
        }
        Node::Cat(..) => {
            writeln!(f, "Cat")?;
        }
        Node::Alt(..) => {
            writeln!(f, "Alt")?;
        }
        Node::CaptureGroup(_node, idx) => {
            writeln!(f, "CaptureGroup {:?}", idx)?;
        }
        Node::NamedCaptureGroup(_node, idx, name) => {
            writeln!(f, "NamedCaptureGroup {:?} {:?}", idx, name)?;
        }
        Node::NonCapturingGroup(..) => {
            writeln!(f, "NonCapturingGroup")?;
        }
        Node::OptionToggle { toggle, scope } => {
            let kind = if scope.is_some() { "scoped" } else { "rest of group" };
            writeln!(f, "OptionToggle {} {}", toggle, kind)?;
        }
        Node::Anchor(anchor_type) => {
            writeln!(f, "Anchor {:?}", anchor_type)?;
        }
        Node::BackRef(group) => {
            writeln!(f, "BackRef {:?}", group)?;
        }
        Node::NamedBackRef(group, name) => {
            writeln!(f, "NamedBackRef {:?} {:?}", group, name)?;
        }
        Node::Loop { quant, .. } => {
            write!(f, "Loop {{{},", quant.min)?;
            if quant.max != usize::MAX {
                write!(f, "{}", quant.max)?;
            }
            writeln!(f, "}} {:?}", quant.greediness)?;
        }
    }
    Ok(())
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = Ok(());
        walk(&self.node, &mut |node: &Node, walk: &mut Walk| {
            if result.is_ok() {
                result = display_node(node, walk.depth, f)
            }
        });
        result?;
        for (idx, group) in self.groups.iter().enumerate() {
            write!(f, "Group {} at {}", idx + 1, group.position)?;
            match &group.name {
                Some(name) => writeln!(f, " <{}>", name)?,
                None => writeln!(f)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_apply_and_display() {
        let toggle = ModeToggle {
            enable: Flags::from("i"),
            disable: Flags::from("x"),
        };
        let flags = toggle.apply(Flags::from("x"));
        assert!(flags.icase && !flags.extended && !flags.multiline);
        assert_eq!(toggle.to_string(), "(?i-x)");
        assert_eq!(ModeToggle::default().apply(Flags::from("m")), Flags::from("m"));
    }

    #[test]
    fn always_failing_nodes() {
        let empty = || Node::Bracket {
            cps: CodePointSet::new(),
            icase: false,
        };
        let a = || Node::Char { c: 'a', icase: false };
        assert!(empty().match_always_fails());
        assert!(Node::Cat(vec![a(), empty()]).match_always_fails());
        assert!(!Node::Alt(vec![a(), empty()]).match_always_fails());
        let optional = Node::Loop {
            loopee: Box::new(empty()),
            quant: Quantifier {
                min: 0,
                max: 1,
                greediness: Greediness::Greedy,
            },
        };
        assert!(!optional.match_always_fails());
    }

    #[test]
    fn walk_visits_parents_first() {
        let a = || Node::Char { c: 'a', icase: false };
        let node = Node::Cat(vec![
            a(),
            Node::Loop {
                loopee: Box::new(a()),
                quant: Quantifier {
                    min: 1,
                    max: 2,
                    greediness: Greediness::Greedy,
                },
            },
        ]);
        let mut depths = Vec::new();
        walk(&node, &mut |_: &Node, walk: &mut Walk| depths.push(walk.depth));
        assert_eq!(depths, [0, 1, 1, 2]);
    }
}
