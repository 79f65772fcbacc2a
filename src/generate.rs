//! Generation of example strings from IR

use crate::api::Options;
use crate::ir::{Node, Regex};
use crate::types::CaptureGroupID;
use crate::unicode;
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

/// A piece of a partially generated string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Fragment {
    Text(String),

    /// A backreference whose group was not yet captured when the fragment
    /// was generated. It is filled in when the sample is appended to one
    /// that captured the group.
    BackRef(CaptureGroupID),
}

/// One combination of choices: a string under construction, plus the value
/// each group captured along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
struct Sample {
    fragments: Vec<Fragment>,
    captures: BTreeMap<CaptureGroupID, Vec<Fragment>>,
}

fn push_fragment(fragments: &mut Vec<Fragment>, fragment: Fragment) {
    if let Fragment::Text(text) = &fragment {
        if text.is_empty() {
            return;
        }
        if let Some(Fragment::Text(last)) = fragments.last_mut() {
            last.push_str(text);
            return;
        }
    }
    fragments.push(fragment);
}

impl Sample {
    fn text(s: String) -> Sample {
        let mut sample = Sample::default();
        push_fragment(&mut sample.fragments, Fragment::Text(s));
        sample
    }

    fn backref(group: CaptureGroupID) -> Sample {
        Sample {
            fragments: vec![Fragment::BackRef(group)],
            captures: BTreeMap::new(),
        }
    }

    /// Append \p fragment to \p out, replacing a backreference with the
    /// value we captured for it, if any.
    fn resolve_into(&self, fragment: &Fragment, out: &mut Vec<Fragment>) {
        match fragment {
            Fragment::BackRef(group) => match self.captures.get(group) {
                Some(value) => {
                    for f in value {
                        push_fragment(out, f.clone());
                    }
                }
                None => out.push(fragment.clone()),
            },
            Fragment::Text(_) => push_fragment(out, fragment.clone()),
        }
    }

    /// \return this sample followed by \p next.
    /// Backreferences in \p next see our captures; captures made by \p next
    /// replace ours.
    fn then(&self, next: &Sample) -> Sample {
        let mut fragments = self.fragments.clone();
        for fragment in &next.fragments {
            self.resolve_into(fragment, &mut fragments);
        }
        let mut captures = self.captures.clone();
        for (&group, value) in &next.captures {
            let mut resolved = Vec::new();
            for fragment in value {
                self.resolve_into(fragment, &mut resolved);
            }
            captures.insert(group, resolved);
        }
        Sample {
            fragments,
            captures,
        }
    }

    /// Record the sample's text as the value of \p group.
    fn capture(mut self, group: CaptureGroupID) -> Sample {
        self.captures.insert(group, self.fragments.clone());
        self
    }

    /// \return the final string. A backreference to a group that did not
    /// participate produces nothing.
    fn finish(&self) -> String {
        let mut result = String::new();
        for fragment in &self.fragments {
            if let Fragment::Text(text) = fragment {
                result.push_str(text);
            }
        }
        result
    }
}

/// Remove duplicates, keeping the first occurrence.
fn dedup_stable<T: Clone + Eq + Hash>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn truncated<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    items.truncate(limit);
    items
}

/// Produces samples for nodes, bounded by the options.
struct Generator {
    options: Options,
}

impl Generator {
    /// \return the bounded Cartesian product of \p lhs and \p rhs.
    /// The left side varies slowest.
    fn product(&self, lhs: &[Sample], rhs: &[Sample]) -> Vec<Sample> {
        let limit = self.options.max_results_limit;
        let mut result = Vec::new();
        for left in lhs {
            for right in rhs {
                if result.len() >= limit {
                    return result;
                }
                result.push(left.then(right));
            }
        }
        result
    }

    fn group_capped(&self, samples: Vec<Sample>) -> Vec<Sample> {
        truncated(samples, self.options.max_group_results)
    }

    fn chars(&self, chars: Vec<char>, icase: bool) -> Vec<Sample> {
        let mut chars = chars;
        if icase {
            let alternates: Vec<char> = chars
                .iter()
                .filter_map(|&c| unicode::case_alternate(c))
                .collect();
            chars.extend(alternates);
            chars = dedup_stable(chars);
        }
        chars
            .into_iter()
            .take(self.options.max_group_results)
            .map(|c| Sample::text(c.to_string()))
            .collect()
    }

    fn cat(&self, nodes: &[Node]) -> Vec<Sample> {
        let mut result = vec![Sample::default()];
        for node in nodes {
            if result.is_empty() {
                break;
            }
            result = self.product(&result, &self.samples(node));
        }
        result
    }

    fn repeat(&self, loopee: &Node, min: usize, max: usize) -> Vec<Sample> {
        let limit = self.options.max_results_limit;
        let last = max.min(min.saturating_add(self.options.max_repeater_variance));
        let inner = if max > 0 {
            self.samples(loopee)
        } else {
            Vec::new()
        };
        let mut result = Vec::new();
        for count in min..=last {
            let mut repeated = vec![Sample::default()];
            for _ in 0..count {
                if repeated.is_empty() {
                    break;
                }
                repeated = self.product(&repeated, &inner);
            }
            result.extend(repeated);
            if result.len() >= limit {
                break;
            }
        }
        truncated(dedup_stable(result), limit)
    }

    /// \return the samples for \p node, in order.
    fn samples(&self, node: &Node) -> Vec<Sample> {
        match node {
            Node::Empty | Node::Anchor(..) | Node::OptionToggle { scope: None, .. } => {
                vec![Sample::default()]
            }
            Node::Char { c, icase } => self.chars(vec![*c], *icase),
            Node::Bracket { cps, icase } => {
                self.chars(cps.sample(self.options.max_group_results), *icase)
            }
            Node::Cat(nodes) => self.cat(nodes),
            Node::Alt(nodes) => {
                let branches = nodes.iter().flat_map(|node| self.samples(node)).collect();
                self.group_capped(dedup_stable(branches))
            }
            Node::CaptureGroup(contents, group) | Node::NamedCaptureGroup(contents, group, _) => {
                let samples = self.samples(contents);
                self.group_capped(samples.into_iter().map(|s| s.capture(*group)).collect())
            }
            Node::NonCapturingGroup(contents)
            | Node::OptionToggle {
                scope: Some(contents),
                ..
            } => self.group_capped(self.samples(contents)),
            Node::BackRef(group) | Node::NamedBackRef(group, _) => vec![Sample::backref(*group)],
            Node::Loop { loopee, quant } => self.repeat(loopee, quant.min, quant.max),
        }
    }
}

/// Generate examples for \p re, bounded by \p options.
/// The result is deterministic and free of duplicates.
pub fn generate(re: &Regex, options: &Options) -> Vec<String> {
    if re.node.match_always_fails() {
        return Vec::new();
    }
    let generator = Generator { options: *options };
    let strings = generator
        .samples(&re.node)
        .iter()
        .map(Sample::finish)
        .collect();
    truncated(dedup_stable(strings), options.max_results_limit)
}
