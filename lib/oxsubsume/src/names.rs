//! The registry holding every [`Name`] of a classifier.

use crate::entity::Entity;
use crate::error::ClassifierError;
use crate::name::{Name, NameId, NameSet};
use rustc_hash::FxHashMap;
use std::ops::Index;

/// Whether expression caches that depend on ancestor sets may still go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Ancestor sets are recomputed between passes, caches are dropped each time.
    #[default]
    Refreshing,
    /// The hierarchy is final, caches are kept.
    Frozen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    InProgress,
    Done,
}

struct Frame {
    name: NameId,
    links: Vec<NameId>,
    next: usize,
}

/// All the names known to a classifier, addressed by [`NameId`].
#[derive(Debug, Default)]
pub struct Names {
    names: Vec<Name>,
    index: FxHashMap<Entity, NameId>,
    cache_mode: CacheMode,
}

impl Names {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `entity`, registering it if needed.
    pub(crate) fn intern(&mut self, entity: Entity) -> NameId {
        if let Some(id) = self.index.get(&entity) {
            return *id;
        }
        let id = NameId::new(self.names.len());
        self.index.insert(entity.clone(), id);
        self.names.push(Name::new(entity));
        id
    }

    /// Looks up the id of a registered entity.
    pub fn lookup(&self, entity: &Entity) -> Option<NameId> {
        self.index.get(entity).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates all names in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NameId, &Name)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (NameId::new(i), name))
    }

    #[inline]
    pub fn cache_mode(&self) -> CacheMode {
        self.cache_mode
    }

    /// `a` subsumes `b`: they are the same name, equivalent, or `a` is an ancestor of `b`.
    ///
    /// Only reflects the hierarchy as of the last ancestor resolution.
    pub fn subsumes(&self, a: NameId, b: NameId) -> bool {
        a == b || self[b].equivalents.contains(a) || self[b].ancestors.contains(a)
    }

    /// Merges the equivalence groups of `a` and `b`.
    ///
    /// Every member of the resulting group is recorded in `updateds`.
    pub(crate) fn add_equivalent(&mut self, a: NameId, b: NameId, updateds: &mut NameSet) -> bool {
        if a == b || self[a].equivalents.contains(b) {
            return false;
        }
        let mut group: NameSet = [a, b].into_iter().collect();
        group.extend(&self[a].equivalents);
        group.extend(&self[b].equivalents);
        for member in &group {
            self.names[member.index()]
                .equivalents
                .extend(group.iter().filter(|&other| other != member));
            updateds.insert(member);
        }
        true
    }

    /// Records an asserted super name. A name asserted as its own super is kept as is and
    /// reported as a cycle by the next resolution.
    pub(crate) fn add_told_super(&mut self, name: NameId, sup: NameId) -> bool {
        self.names[name.index()].supers.insert(sup)
    }

    /// Records an inferred super name unless the hierarchy already implies it.
    pub(crate) fn add_inferred_super(
        &mut self,
        name: NameId,
        sup: NameId,
        updateds: &mut NameSet,
    ) -> bool {
        if self.subsumes(sup, name) || !self.names[name.index()].supers.insert(sup) {
            return false;
        }
        updateds.insert(name);
        true
    }

    /// Supers of `name` and of its equivalents, minus the equivalence group.
    ///
    /// A name asserted as its own super keeps itself so that resolution reports the cycle.
    pub fn effective_supers(&self, name: NameId) -> Vec<NameId> {
        self.effective_links(name, Direction::Up)
    }

    /// Subs of `name` and of its equivalents, minus the equivalence group.
    pub fn effective_subs(&self, name: NameId) -> Vec<NameId> {
        self.effective_links(name, Direction::Down)
    }

    fn effective_links(&self, name: NameId, direction: Direction) -> Vec<NameId> {
        fn links(name: &Name, direction: Direction) -> &NameSet {
            match direction {
                Direction::Up => &name.supers,
                Direction::Down => &name.subs,
            }
        }

        let current = &self[name];
        let mut result = NameSet::new();
        for equivalent in &current.equivalents {
            result.extend(links(&self[equivalent], direction));
        }
        result.remove(name);
        result.extend(links(current, direction));
        result.remove_all(&current.equivalents);
        result.sorted().to_vec()
    }

    fn derived(&self, name: NameId, direction: Direction) -> &NameSet {
        match direction {
            Direction::Up => &self[name].ancestors,
            Direction::Down => &self[name].descendants,
        }
    }

    pub(crate) fn clear_derived_links(&mut self) {
        for name in &mut self.names {
            name.clear_derived_links();
        }
    }

    /// Computes the ancestors of every name, failing on the first cycle met.
    pub(crate) fn resolve_upward_links(&mut self) -> Result<(), ClassifierError> {
        self.resolve(Direction::Up)
    }

    /// Computes the descendants of every name. Requires [`Self::set_subs`].
    pub(crate) fn resolve_downward_links(&mut self) -> Result<(), ClassifierError> {
        self.resolve(Direction::Down)
    }

    fn resolve(&mut self, direction: Direction) -> Result<(), ClassifierError> {
        let mut visits = vec![Visit::New; self.names.len()];
        for root in 0..self.names.len() {
            if visits[root] != Visit::New {
                continue;
            }
            let root = NameId::new(root);
            visits[root.index()] = Visit::InProgress;
            let mut stack = vec![Frame {
                name: root,
                links: self.effective_links(root, direction),
                next: 0,
            }];
            while let Some(frame) = stack.last_mut() {
                if let Some(&link) = frame.links.get(frame.next) {
                    frame.next += 1;
                    match visits[link.index()] {
                        Visit::InProgress => {
                            return Err(ClassifierError::circular_subsumption(
                                self[link].entity().clone(),
                            ));
                        }
                        Visit::New => {
                            visits[link.index()] = Visit::InProgress;
                            let links = self.effective_links(link, direction);
                            stack.push(Frame {
                                name: link,
                                links,
                                next: 0,
                            });
                        }
                        Visit::Done => {}
                    }
                } else {
                    let name = frame.name;
                    let mut closure = NameSet::new();
                    for &link in &frame.links {
                        closure.insert(link);
                        closure.extend(&self[link].equivalents);
                        closure.extend(self.derived(link, direction));
                    }
                    stack.pop();
                    let slot = &mut self.names[name.index()];
                    match direction {
                        Direction::Up => slot.ancestors = closure,
                        Direction::Down => slot.descendants = closure,
                    }
                    visits[name.index()] = Visit::Done;
                }
            }
        }
        Ok(())
    }

    /// Derives the direct subs of every name from the direct supers.
    pub(crate) fn set_subs(&mut self) {
        for name in &mut self.names {
            name.subs.clear();
        }
        for i in 0..self.names.len() {
            let supers = self.names[i].supers.sorted().to_vec();
            for sup in supers {
                self.names[sup.index()].subs.insert(NameId::new(i));
            }
        }
    }

    /// Reduces the direct supers of every class to the minimal elements of its effective supers.
    ///
    /// All reductions are computed before any is applied.
    pub(crate) fn purge_supers(&mut self) {
        let purged: Vec<_> = self
            .iter()
            .filter(|(_, name)| name.entity().is_class())
            .map(|(id, _)| {
                let minimal: NameSet = self.minimal(&self.effective_supers(id)).into_iter().collect();
                (id, minimal)
            })
            .collect();
        for (id, supers) in purged {
            self.names[id.index()].supers = supers;
        }
    }

    /// Clears derived links and recomputes ancestors.
    pub(crate) fn refresh(&mut self) -> Result<(), ClassifierError> {
        self.clear_derived_links();
        self.resolve_upward_links()
    }

    /// Final closure once no pass changes anything anymore.
    pub(crate) fn close(&mut self) -> Result<(), ClassifierError> {
        self.refresh()?;
        self.purge_supers();
        self.refresh()?;
        self.set_subs();
        self.resolve_downward_links()?;
        self.cache_mode = CacheMode::Frozen;
        Ok(())
    }

    /// The candidates no other candidate is strictly subsumed by.
    pub fn minimal(&self, candidates: &[NameId]) -> Vec<NameId> {
        candidates
            .iter()
            .copied()
            .filter(|&c| {
                !candidates
                    .iter()
                    .any(|&other| other != c && self[other].ancestors.contains(c))
            })
            .collect()
    }

    /// The candidates not strictly subsumed by any other candidate.
    pub fn maximal(&self, candidates: &[NameId]) -> Vec<NameId> {
        candidates
            .iter()
            .copied()
            .filter(|&c| {
                !candidates
                    .iter()
                    .any(|&other| other != c && self[c].ancestors.contains(other))
            })
            .collect()
    }
}

impl Index<NameId> for Names {
    type Output = Name;

    #[inline]
    fn index(&self, id: NameId) -> &Name {
        &self.names[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::OwlClass;

    fn registry(count: usize) -> (Names, Vec<NameId>) {
        let mut names = Names::new();
        let ids = (0..count)
            .map(|i| {
                names.intern(Entity::from(
                    OwlClass::new_from_iri(format!("http://example.org/C{i}")).unwrap(),
                ))
            })
            .collect();
        (names, ids)
    }

    #[test]
    fn interning_is_idempotent() {
        let (mut names, ids) = registry(2);
        let again = names.intern(names[ids[1]].entity().clone());
        assert_eq!(again, ids[1]);
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn equivalence_groups_merge() {
        let (mut names, ids) = registry(4);
        let mut updateds = NameSet::new();
        assert!(names.add_equivalent(ids[0], ids[1], &mut updateds));
        assert!(names.add_equivalent(ids[2], ids[3], &mut updateds));
        assert!(names.add_equivalent(ids[1], ids[2], &mut updateds));
        assert!(!names.add_equivalent(ids[3], ids[0], &mut updateds));
        for &id in &ids {
            assert_eq!(names[id].equivalents().len(), 3);
            assert!(!names[id].equivalents().contains(id));
        }
        assert_eq!(updateds.len(), 4);
    }

    #[test]
    fn ancestors_follow_equivalents() {
        let (mut names, ids) = registry(4);
        let mut updateds = NameSet::new();
        names.add_told_super(ids[0], ids[1]);
        names.add_equivalent(ids[1], ids[2], &mut updateds);
        names.add_told_super(ids[2], ids[3]);
        names.refresh().unwrap();
        let ancestors: Vec<_> = names[ids[0]].ancestors().iter().collect();
        assert_eq!(ancestors, vec![ids[1], ids[2], ids[3]]);
        assert!(names.subsumes(ids[3], ids[1]));
        assert!(names.subsumes(ids[2], ids[1]));
        assert!(!names.subsumes(ids[0], ids[3]));
    }

    #[test]
    fn cycles_are_fatal() {
        let (mut names, ids) = registry(3);
        names.add_told_super(ids[0], ids[1]);
        names.add_told_super(ids[1], ids[2]);
        names.add_told_super(ids[2], ids[0]);
        let error = names.refresh().unwrap_err();
        assert!(matches!(error, ClassifierError::CircularSubsumption { .. }));
    }

    #[test]
    fn self_super_is_a_cycle() {
        let (mut names, ids) = registry(1);
        names.add_told_super(ids[0], ids[0]);
        let error = names.refresh().unwrap_err();
        assert_eq!(error.entity(), Some(names[ids[0]].entity()));
    }

    #[test]
    fn super_inside_equivalence_group_is_not_a_cycle() {
        let (mut names, ids) = registry(2);
        let mut updateds = NameSet::new();
        names.add_equivalent(ids[0], ids[1], &mut updateds);
        names.add_told_super(ids[0], ids[1]);
        names.refresh().unwrap();
        assert!(names[ids[0]].ancestors().is_empty());
    }

    #[test]
    fn close_purges_and_keeps_duality() {
        let (mut names, ids) = registry(4);
        // 0 < 1 < 2, 0 < 2, 3 < 2
        names.add_told_super(ids[0], ids[1]);
        names.add_told_super(ids[1], ids[2]);
        names.add_told_super(ids[0], ids[2]);
        names.add_told_super(ids[3], ids[2]);
        names.close().unwrap();
        assert_eq!(names[ids[0]].supers().sorted(), &[ids[1]]);
        assert_eq!(names[ids[2]].subs().sorted(), &[ids[1], ids[3]]);
        for (a, _) in names.iter() {
            for (b, _) in names.iter() {
                assert_eq!(
                    names[a].ancestors().contains(b),
                    names[b].descendants().contains(a)
                );
            }
        }
        assert_eq!(names.cache_mode(), CacheMode::Frozen);
    }

    #[test]
    fn inferred_supers_already_implied_are_dropped() {
        let (mut names, ids) = registry(3);
        names.add_told_super(ids[0], ids[1]);
        names.add_told_super(ids[1], ids[2]);
        names.refresh().unwrap();
        let mut updateds = NameSet::new();
        assert!(!names.add_inferred_super(ids[0], ids[2], &mut updateds));
        assert!(!names.add_inferred_super(ids[0], ids[0], &mut updateds));
        assert!(names.add_inferred_super(ids[2], ids[0], &mut updateds));
        assert_eq!(updateds.sorted(), &[ids[2]]);
    }

    #[test]
    fn antichains() {
        let (mut names, ids) = registry(3);
        names.add_told_super(ids[0], ids[1]);
        names.add_told_super(ids[1], ids[2]);
        names.refresh().unwrap();
        assert_eq!(names.minimal(&[ids[2], ids[1], ids[0]]), vec![ids[0]]);
        assert_eq!(names.maximal(&[ids[0], ids[1]]), vec![ids[1]]);
    }
}
