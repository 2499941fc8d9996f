//! Named entities and the sets used to relate them.

use crate::entity::Entity;
use rustc_hash::FxHashSet;
use std::cell::OnceCell;
use std::fmt;

/// Identifier of a [`Name`] inside a [`Names`](crate::Names) registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameId(u32);

impl NameId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        #[expect(clippy::expect_used)]
        let index = u32::try_from(index).expect("more than u32::MAX names");
        Self(index)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A set of names.
///
/// Membership is answered by a hash set. Containment and intersection tests between sets
/// walk a sorted copy of the members, built on first use and dropped on every mutation.
#[derive(Debug, Clone, Default)]
pub struct NameSet {
    members: FxHashSet<NameId>,
    sorted: OnceCell<Vec<NameId>>,
}

impl NameSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Adds a name, returns `true` if it was not present.
    pub fn insert(&mut self, name: NameId) -> bool {
        let inserted = self.members.insert(name);
        if inserted {
            self.sorted.take();
        }
        inserted
    }

    /// Adds all the given names, returns `true` if at least one was not present.
    pub fn extend(&mut self, names: impl IntoIterator<Item = NameId>) -> bool {
        let mut changed = false;
        for name in names {
            changed |= self.members.insert(name);
        }
        if changed {
            self.sorted.take();
        }
        changed
    }

    /// Removes a name, returns `true` if it was present.
    pub fn remove(&mut self, name: NameId) -> bool {
        let removed = self.members.remove(&name);
        if removed {
            self.sorted.take();
        }
        removed
    }

    /// Removes every member of `other`.
    pub fn remove_all(&mut self, other: &NameSet) -> bool {
        let mut changed = false;
        for name in other.iter() {
            changed |= self.members.remove(&name);
        }
        if changed {
            self.sorted.take();
        }
        changed
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.sorted.take();
    }

    #[inline]
    pub fn contains(&self, name: NameId) -> bool {
        self.members.contains(&name)
    }

    /// Returns `true` if every member of `other` is in this set.
    pub fn contains_all(&self, other: &NameSet) -> bool {
        if other.len() > self.len() {
            return false;
        }
        let mut mine = self.sorted().iter();
        'outer: for name in other.sorted() {
            for &candidate in mine.by_ref() {
                if candidate == *name {
                    continue 'outer;
                }
                if candidate > *name {
                    return false;
                }
            }
            return false;
        }
        true
    }

    /// Returns `true` if the two sets share at least one member.
    pub fn contains_any(&self, other: &NameSet) -> bool {
        let (mut a, mut b) = (self.sorted(), other.sorted());
        while let (Some(x), Some(y)) = (a.first(), b.first()) {
            match x.cmp(y) {
                std::cmp::Ordering::Less => a = &a[1..],
                std::cmp::Ordering::Greater => b = &b[1..],
                std::cmp::Ordering::Equal => return true,
            }
        }
        false
    }

    /// Iterates the members in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = NameId> + '_ {
        self.sorted().iter().copied()
    }

    /// Returns the members in ascending id order.
    pub fn sorted(&self) -> &[NameId] {
        self.sorted.get_or_init(|| {
            let mut sorted: Vec<_> = self.members.iter().copied().collect();
            sorted.sort_unstable();
            sorted
        })
    }
}

impl PartialEq for NameSet {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for NameSet {}

impl FromIterator<NameId> for NameSet {
    fn from_iter<I: IntoIterator<Item = NameId>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
            sorted: OnceCell::new(),
        }
    }
}

impl<'a> IntoIterator for &'a NameSet {
    type Item = NameId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NameId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sorted().iter().copied()
    }
}

/// Subsumption bookkeeping for one named class or property.
///
/// `supers` and `equivalents` are asserted or inferred; `subs`, `ancestors` and
/// `descendants` are derived and recomputed by the [`Names`](crate::Names) registry.
#[derive(Debug, Clone)]
pub struct Name {
    entity: Entity,
    pub(crate) equivalents: NameSet,
    pub(crate) supers: NameSet,
    pub(crate) subs: NameSet,
    pub(crate) ancestors: NameSet,
    pub(crate) descendants: NameSet,
}

impl Name {
    pub(crate) fn new(entity: Entity) -> Self {
        Self {
            entity,
            equivalents: NameSet::new(),
            supers: NameSet::new(),
            subs: NameSet::new(),
            ancestors: NameSet::new(),
            descendants: NameSet::new(),
        }
    }

    /// The entity this name stands for.
    #[inline]
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Names known to be equivalent, excluding this one.
    #[inline]
    pub fn equivalents(&self) -> &NameSet {
        &self.equivalents
    }

    /// Direct super names. After classification this is an antichain for classes.
    #[inline]
    pub fn supers(&self) -> &NameSet {
        &self.supers
    }

    /// Direct sub names, derived from the supers of every other name.
    #[inline]
    pub fn subs(&self) -> &NameSet {
        &self.subs
    }

    /// Transitive super names, including the equivalents of each of them.
    #[inline]
    pub fn ancestors(&self) -> &NameSet {
        &self.ancestors
    }

    /// Transitive sub names, including the equivalents of each of them.
    #[inline]
    pub fn descendants(&self) -> &NameSet {
        &self.descendants
    }

    pub(crate) fn clear_derived_links(&mut self) {
        self.subs.clear();
        self.ancestors.clear();
        self.descendants.clear();
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity.fmt(f)
    }
}
