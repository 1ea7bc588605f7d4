//! Set arithmetic over relation members.
//!
//! Members compare by `(type, key)`. Every function keeps the relative order
//! of its inputs so stored order stays predictable.

use std::collections::HashSet;

use crate::schema::ResourceRef;

/// Storage changes that turn `current` into `desired`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changes {
    /// Applied first.
    pub remove: Vec<ResourceRef>,
    /// Applied second, in document order.
    pub add: Vec<ResourceRef>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }
}

/// Members of `requested` not yet in `current`, first occurrence kept.
pub fn missing(current: &[ResourceRef], requested: &[ResourceRef]) -> Vec<ResourceRef> {
    let mut seen: HashSet<ResourceRef> = current.iter().copied().collect();
    requested.iter().copied().filter(|m| seen.insert(*m)).collect()
}

/// Members of `requested` that are in `current`, first occurrence kept.
pub fn present(current: &[ResourceRef], requested: &[ResourceRef]) -> Vec<ResourceRef> {
    let current: HashSet<ResourceRef> = current.iter().copied().collect();
    let mut seen = HashSet::new();
    requested
        .iter()
        .copied()
        .filter(|m| current.contains(m) && seen.insert(*m))
        .collect()
}

/// `remove = current - desired`, `add = desired - current`.
pub fn replace(current: &[ResourceRef], desired: &[ResourceRef]) -> Changes {
    let wanted: HashSet<ResourceRef> = desired.iter().copied().collect();
    Changes {
        remove: current.iter().copied().filter(|m| !wanted.contains(m)).collect(),
        add: missing(current, desired),
    }
}

/// What storage holds after `changes`: survivors in order, then additions.
pub fn apply(current: &[ResourceRef], changes: &Changes) -> Vec<ResourceRef> {
    let removed: HashSet<ResourceRef> = changes.remove.iter().copied().collect();
    current
        .iter()
        .copied()
        .filter(|m| !removed.contains(m))
        .chain(changes.add.iter().copied())
        .collect()
}
