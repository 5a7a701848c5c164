//! Data structures for lineage results

use crate::error::LineageError;
use crate::models::ObjectIdentity;

/// Which side of the target a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Found by the downward walk
    Dependent,
    /// The object the lineage was requested for
    Target,
    /// Found by the upward walk
    Ancestor,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Dependent => "dependent",
            Direction::Target => "self",
            Direction::Ancestor => "ancestor",
        }
    }
}

/// A resolved object placed in the lineage tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageNode {
    pub identity: ObjectIdentity,
    pub depth: usize,
    pub direction: Direction,
}

/// A branch that could not be resolved
///
/// `name` is `None` when a whole kind could not be listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedBranch {
    pub kind: String,
    pub name: Option<String>,
    pub depth: usize,
    pub direction: Direction,
    pub error: LineageError,
}

/// One line of the lineage, in render order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineageEntry {
    Object(LineageNode),
    Unresolved(UnresolvedBranch),
}

impl LineageEntry {
    pub fn object(identity: ObjectIdentity, depth: usize, direction: Direction) -> Self {
        LineageEntry::Object(LineageNode {
            identity,
            depth,
            direction,
        })
    }

    pub fn unresolved(
        kind: impl Into<String>,
        name: Option<String>,
        depth: usize,
        direction: Direction,
        error: LineageError,
    ) -> Self {
        LineageEntry::Unresolved(UnresolvedBranch {
            kind: kind.into(),
            name,
            depth,
            direction,
            error,
        })
    }

    pub fn depth(&self) -> usize {
        match self {
            LineageEntry::Object(node) => node.depth,
            LineageEntry::Unresolved(branch) => branch.depth,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            LineageEntry::Object(node) => node.direction,
            LineageEntry::Unresolved(branch) => branch.direction,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            LineageEntry::Object(node) => &node.identity.kind,
            LineageEntry::Unresolved(branch) => &branch.kind,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            LineageEntry::Object(node) => Some(&node.identity.name),
            LineageEntry::Unresolved(branch) => branch.name.as_deref(),
        }
    }

    pub fn error(&self) -> Option<&LineageError> {
        match self {
            LineageEntry::Object(_) => None,
            LineageEntry::Unresolved(branch) => Some(&branch.error),
        }
    }
}

/// Whether the traversal ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    Complete,
    /// Cancelled before finishing; entries hold what was gathered
    Partial,
}

/// Lineage of one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineage {
    pub entries: Vec<LineageEntry>,
    pub outcome: TraceOutcome,
}

impl Lineage {
    pub fn is_complete(&self) -> bool {
        self.outcome == TraceOutcome::Complete
    }

    /// Resolved objects on one side of the target
    pub fn nodes(&self, direction: Direction) -> impl Iterator<Item = &LineageNode> {
        self.entries.iter().filter_map(move |entry| match entry {
            LineageEntry::Object(node) if node.direction == direction => Some(node),
            _ => None,
        })
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &UnresolvedBranch> {
        self.entries.iter().filter_map(|entry| match entry {
            LineageEntry::Unresolved(branch) => Some(branch),
            LineageEntry::Object(_) => None,
        })
    }
}
