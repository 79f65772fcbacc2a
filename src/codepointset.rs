use crate::charclasses;
use crate::unicode;
use crate::util::SliceHelp;
use core::cmp::{self, Ordering};

pub type CodePoint = u32;

/// The maximum (inclusive) code point.
pub const CODE_POINT_MAX: CodePoint = 0x10FFFF;

/// An inclusive range of code points.
/// This is more efficient than InclusiveRange because it does not need to carry
/// around the `Option<bool>`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Interval {
    pub(crate) first: CodePoint,
    pub(crate) last: CodePoint,
}

/// A list of sorted, inclusive, non-empty ranges of code points.
impl Interval {
    pub(crate) const fn new(first: CodePoint, last: CodePoint) -> Interval {
        debug_assert!(first <= last);
        Interval { first, last }
    }

    #[inline(always)]
    pub fn compare(self, cp: u32) -> Ordering {
        if self.first > cp {
            Ordering::Greater
        } else if self.last < cp {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    /// Return whether self is before rhs.
    fn is_before(self, other: Interval) -> bool {
        self.last < other.first
    }

    /// Return whether self is strictly before rhs.
    /// "Strictly" here means there is at least one value after the end of self,
    /// and before the start of rhs. Overlapping *or abutting* intervals are
    /// not considered strictly before.
    fn is_strictly_before(self, rhs: Interval) -> bool {
        self.last + 1 < rhs.first
    }

    /// Compare two intervals.
    /// Overlapping *or abutting* intervals are considered equal.
    fn mergecmp(self, rhs: Interval) -> cmp::Ordering {
        if self.is_strictly_before(rhs) {
            Ordering::Less
        } else if rhs.is_strictly_before(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Return whether self is mergeable with rhs.
    fn mergeable(self, rhs: Interval) -> bool {
        self.mergecmp(rhs) == Ordering::Equal
    }

    /// Return whether self overlaps 'other'.
    /// Overlaps means that we share at least one code point with 'other'.
    pub fn overlaps(self, other: Interval) -> bool {
        !self.is_before(other) && !other.is_before(self)
    }

    /// Return the interval of codepoints.
    pub fn codepoints(self) -> core::ops::Range<u32> {
        debug_assert!(self.last + 1 > self.last, "Overflow");
        self.first..(self.last + 1)
    }
}

pub(crate) fn interval_contains(interval: &[Interval], cp: u32) -> bool {
    interval.binary_search_by(|iv| iv.compare(cp)).is_ok()
}

/// Merge two intervals, which must be overlapping or abutting.
fn merge_intervals(x: Interval, y: &Interval) -> Interval {
    debug_assert!(x.mergeable(*y), "Ranges not mergeable");
    Interval {
        first: core::cmp::min(x.first, y.first),
        last: core::cmp::max(x.last, y.last),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodePointSet {
    ivs: Vec<Interval>,
}

/// A set of code points stored via as disjoint, non-abutting, sorted intervals.
impl CodePointSet {
    pub fn new() -> CodePointSet {
        CodePointSet { ivs: Vec::new() }
    }

    // Return true if the set is empty.
    pub(crate) fn is_empty(&self) -> bool {
        self.ivs.is_empty()
    }

    pub(crate) fn contains(&self, cp: u32) -> bool {
        interval_contains(&self.ivs, cp)
    }

    #[inline]
    fn assert_is_well_formed(&self) {
        if cfg!(debug_assertions) {
            for iv in &self.ivs {
                debug_assert!(iv.last <= CODE_POINT_MAX);
                debug_assert!(iv.first <= iv.last);
            }
            for w in self.ivs.windows(2) {
                debug_assert!(w[0].is_strictly_before(w[1]));
            }
        }
    }

    /// Construct from sorted, disjoint intervals. Note these are not allowed to
    /// even abut.
    pub fn from_sorted_disjoint_intervals(ivs: Vec<Interval>) -> CodePointSet {
        let res = CodePointSet { ivs };
        res.assert_is_well_formed();
        res
    }

    /// Construct the set of every char satisfying \p pred.
    /// This visits the whole code point space, so callers should not do it in
    /// a loop.
    pub fn from_predicate<F>(pred: F) -> CodePointSet
    where
        F: Fn(char) -> bool,
    {
        let mut ivs = Vec::new();
        let mut run_start: Option<CodePoint> = None;
        for cp in 0..=CODE_POINT_MAX {
            let member = char::from_u32(cp).map_or(false, &pred);
            match (member, run_start) {
                (true, None) => run_start = Some(cp),
                (false, Some(first)) => {
                    ivs.push(Interval::new(first, cp - 1));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(first) = run_start {
            ivs.push(Interval::new(first, CODE_POINT_MAX));
        }
        CodePointSet::from_sorted_disjoint_intervals(ivs)
    }

    /// Add an interval of code points to the set.
    pub fn add(&mut self, new_iv: Interval) {
        // Find the mergeable subarray, that is, the range of intervals that intersect
        // or abut new_iv.
        let mergeable = self.ivs.equal_range_by(|iv| iv.mergecmp(new_iv));

        // Merge all the overlapping intervals (possibly none), and then replace the
        // range.
        match mergeable.end - mergeable.start {
            0 => {
                self.ivs.insert(mergeable.start, new_iv);
            }
            1 => {
                let entry = &mut self.ivs[mergeable.start];
                *entry = Interval {
                    first: cmp::min(entry.first, new_iv.first),
                    last: cmp::max(entry.last, new_iv.last),
                };
            }
            _ => {
                let merged_iv: Interval = self.ivs[mergeable.clone()]
                    .iter()
                    .fold(new_iv, merge_intervals);
                self.ivs[mergeable.start] = merged_iv;
                self.ivs.drain(mergeable.start + 1..mergeable.end);
            }
        }
        self.assert_is_well_formed();
    }

    /// Add a single code point to the set.
    #[inline]
    pub fn add_one(&mut self, cp: CodePoint) {
        self.add(Interval {
            first: cp,
            last: cp,
        })
    }

    /// Add another code point set.
    pub fn add_set(&mut self, mut rhs: CodePointSet) {
        // Prefer to add to the set with more intervals.
        if self.ivs.len() < rhs.ivs.len() {
            core::mem::swap(self, &mut rhs);
        }
        for iv in rhs.intervals() {
            self.add(*iv)
        }
    }

    /// \return the intervals
    pub fn intervals(&self) -> &[Interval] {
        self.ivs.as_slice()
    }

    /// \return an inverted set: a set containing every code point NOT in the
    /// receiver.
    pub fn inverted(&self) -> CodePointSet {
        // The intervals we collect.
        let mut inverted_ivs = Vec::new();

        // The first code point *not* in the previous interval.
        let mut start: CodePoint = 0;
        for iv in &self.ivs {
            if start < iv.first {
                inverted_ivs.push(Interval {
                    first: start,
                    last: iv.first - 1,
                })
            }
            start = iv.last + 1;
        }
        if start <= CODE_POINT_MAX {
            inverted_ivs.push(Interval {
                first: start,
                last: CODE_POINT_MAX,
            })
        }
        CodePointSet::from_sorted_disjoint_intervals(inverted_ivs)
    }

    /// \return the code points contained in both the receiver and \p rhs.
    pub fn intersection(&self, rhs: &CodePointSet) -> CodePointSet {
        let mut ivs = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ivs.len() && j < rhs.ivs.len() {
            let (lhs_iv, rhs_iv) = (self.ivs[i], rhs.ivs[j]);
            if lhs_iv.overlaps(rhs_iv) {
                ivs.push(Interval::new(
                    cmp::max(lhs_iv.first, rhs_iv.first),
                    cmp::min(lhs_iv.last, rhs_iv.last),
                ));
            }
            if lhs_iv.last < rhs_iv.last {
                i += 1;
            } else {
                j += 1;
            }
        }
        CodePointSet::from_sorted_disjoint_intervals(ivs)
    }

    /// \return the receiver plus the case alternate of every member.
    pub fn case_closed(&self) -> CodePointSet {
        let mut result = self.clone();
        for iv in &self.ivs {
            for c in iv.codepoints().filter_map(char::from_u32) {
                if let Some(alt) = unicode::case_alternate(c) {
                    result.add_one(alt as u32);
                }
            }
        }
        result
    }

    /// \return up to \p limit members of the set.
    /// ASCII members come first, in the order given by
    /// `charclasses::ascii_sample_order`; the remaining members follow in
    /// ascending order. Surrogates are never produced.
    pub fn sample(&self, limit: usize) -> Vec<char> {
        let mut result = Vec::new();
        if limit == 0 {
            return result;
        }
        for &cp in charclasses::ascii_sample_order() {
            if self.contains(cp) {
                result.extend(char::from_u32(cp));
                if result.len() >= limit {
                    return result;
                }
            }
        }
        for iv in &self.ivs {
            if iv.last < charclasses::ASCII_END {
                continue;
            }
            let first = cmp::max(iv.first, charclasses::ASCII_END);
            for c in (first..=iv.last).filter_map(char::from_u32) {
                result.push(c);
                if result.len() >= limit {
                    return result;
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(first: u32, last: u32) -> Interval {
        Interval { first, last }
    }

    fn set_of(ivs: &[Interval]) -> CodePointSet {
        let mut set = CodePointSet::new();
        for &iv in ivs {
            set.add(iv);
        }
        set
    }

    #[test]
    fn test_is_strictly_before() {
        let a = iv(0, 9);
        let b = iv(10, 19);
        let c = iv(11, 19);
        assert!(!a.is_strictly_before(b));
        assert!(a.is_strictly_before(c));
        assert!(!b.is_strictly_before(a));
        assert!(!b.is_strictly_before(c));
    }

    #[test]
    fn test_mergecmp() {
        let a = iv(0, 9);
        let b = iv(10, 19);
        let c = iv(9, 18);
        assert_eq!(a.mergecmp(b), Ordering::Equal);
        assert_eq!(a.mergecmp(c), Ordering::Equal);

        let d = iv(11, 19);
        assert_eq!(a.mergecmp(d), Ordering::Less);
        assert_eq!(d.mergecmp(a), Ordering::Greater);
        assert_eq!(b.mergecmp(d), Ordering::Equal);
    }

    #[test]
    fn test_overlaps() {
        let a = iv(0, 9);
        let b = iv(5, 14);
        let c = iv(10, 19);
        assert!(a.overlaps(b));
        assert!(!a.overlaps(c));
    }

    #[test]
    fn test_add() {
        let set = set_of(&[iv(10, 20), iv(30, 40), iv(15, 35)]);
        assert_eq!(set.intervals(), &[iv(10, 40)]);

        let mut set = CodePointSet::new();
        set.add_one(10);
        set.add_one(20);
        set.add_one(15);
        assert_eq!(set.intervals(), &[iv(10, 10), iv(15, 15), iv(20, 20)]);
    }

    #[test]
    fn test_add_set() {
        let mut set1 = set_of(&[iv(10, 20), iv(30, 40)]);
        set1.add_set(set_of(&[iv(15, 25), iv(35, 45)]));
        assert_eq!(set1.intervals(), &[iv(10, 25), iv(30, 45)]);
    }

    #[test]
    fn test_inverted() {
        let set = set_of(&[iv(10, 20), iv(30, 40)]);
        let inverted_set = set.inverted();
        assert_eq!(
            inverted_set.intervals(),
            &[iv(0, 9), iv(21, 29), iv(41, CODE_POINT_MAX)]
        );
        assert_eq!(inverted_set.inverted(), set);
        assert!(CodePointSet::new().inverted().inverted().is_empty());
    }

    #[test]
    fn test_intersection() {
        let lhs = set_of(&[iv(0, 10), iv(20, 30), iv(40, 50)]);
        let rhs = set_of(&[iv(5, 25), iv(28, 45)]);
        assert_eq!(
            lhs.intersection(&rhs).intervals(),
            &[iv(5, 10), iv(20, 25), iv(28, 30), iv(40, 45)]
        );
        assert!(lhs.intersection(&lhs.inverted()).is_empty());
        assert_eq!(lhs.intersection(&lhs), lhs);
    }

    #[test]
    fn test_from_predicate() {
        let digits = CodePointSet::from_predicate(|c| c.is_ascii_digit());
        assert_eq!(digits.intervals(), &[iv('0' as u32, '9' as u32)]);
        let everything = CodePointSet::from_predicate(|_| true);
        // Surrogates split the space.
        assert_eq!(
            everything.intervals(),
            &[iv(0, 0xD7FF), iv(0xE000, CODE_POINT_MAX)]
        );
    }

    #[test]
    fn test_sample_order() {
        let digits = set_of(&[iv('0' as u32, '9' as u32)]);
        assert_eq!(
            digits.sample(100),
            vec!['0', '1', '2', '3', '4', '5', '6', '7', '8', '9']
        );
        assert_eq!(digits.sample(3), vec!['0', '1', '2']);
        assert!(digits.sample(0).is_empty());

        let letters = set_of(&[iv('A' as u32, 'C' as u32), iv('x' as u32, 'z' as u32)]);
        assert_eq!(letters.sample(10), vec!['x', 'y', 'z', 'A', 'B', 'C']);

        let everything = CodePointSet::new().inverted();
        assert_eq!(everything.sample(3), vec!['\n', 'a', 'b']);
        let big = everything.sample(200);
        assert_eq!(big.len(), 200);
        assert_eq!(big[128], '\u{80}');
    }

    #[test]
    fn test_sample_skips_surrogates() {
        let set = set_of(&[iv(0xD7FF, 0xE001)]);
        assert_eq!(set.sample(10), vec!['\u{D7FF}', '\u{E000}', '\u{E001}']);
    }

    #[test]
    fn test_case_closed() {
        let set = set_of(&[iv('a' as u32, 'b' as u32), iv('1' as u32, '1' as u32)]);
        let closed = set.case_closed();
        assert_eq!(
            closed.intervals(),
            &[
                iv('1' as u32, '1' as u32),
                iv('A' as u32, 'B' as u32),
                iv('a' as u32, 'b' as u32)
            ]
        );
    }
}
