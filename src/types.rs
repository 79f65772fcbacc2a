/// A group number.
/// Groups are numbered from 1, in order of their opening parenthesis.
pub type CaptureGroupID = u16;

/// The name of a named capture group.
pub type CaptureGroupName = String;

/// The maximum number of capture groups supported.
pub const MAX_CAPTURE_GROUPS: usize = 65535;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CharacterClassType {
    Digits,
    Spaces,
    Words,
    HexDigits,
}

/// What the parser records about each capture group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    /// The group's name, if it is a named group.
    pub name: Option<CaptureGroupName>,

    /// Byte offset of the group's opening parenthesis in the pattern.
    pub position: usize,
}

/// The capture groups of a pattern, indexed by CaptureGroupID - 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTable {
    groups: Vec<GroupInfo>,
}

impl GroupTable {
    /// Declare the next group, returning its ID.
    pub(crate) fn declare(&mut self, name: Option<CaptureGroupName>, position: usize) -> CaptureGroupID {
        self.groups.push(GroupInfo { name, position });
        self.groups.len() as CaptureGroupID
    }

    /// \return the number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// \return the groups in order of their IDs.
    pub fn iter(&self) -> impl Iterator<Item = &GroupInfo> {
        self.groups.iter()
    }

    /// \return the group with the given ID.
    pub fn get(&self, id: CaptureGroupID) -> Option<&GroupInfo> {
        (id as usize).checked_sub(1).and_then(|idx| self.groups.get(idx))
    }

    /// \return the ID of the most recently declared group named \p name.
    pub fn find_name(&self, name: &str) -> Option<CaptureGroupID> {
        self.groups
            .iter()
            .rposition(|g| g.name.as_deref() == Some(name))
            .map(|idx| (idx + 1) as CaptureGroupID)
    }
}

/// The largest repetition count accepted in a quantifier like `{n,m}`.
pub const MAX_REPEAT: usize = 100_000;
