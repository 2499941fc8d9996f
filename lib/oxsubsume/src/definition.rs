//! The shared subsumption hierarchy of class definitions.
//!
//! Every definition `C ≡ D` of a class becomes a [`ClassDefinition`] node. Placed nodes form a
//! transitively reduced DAG under a synthetic root standing for `owl:Thing`. A definition
//! found equivalent to a placed one is attached to it instead of getting a position of its own.

use crate::description::Description;
use crate::name::{NameId, NameSet};
use crate::names::Names;
use rustc_hash::{FxHashMap, FxHashSet};
use std::mem::take;
use tracing::trace;

/// Identifier of a [`ClassDefinition`] inside a [`DefinitionGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefinitionId(u32);

impl DefinitionId {
    const ROOT: Self = Self(0);

    fn new(index: usize) -> Self {
        #[expect(clippy::expect_used)]
        let index = u32::try_from(index).expect("more than u32::MAX definitions");
        Self(index)
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the hierarchy: the defining description of a class.
#[derive(Debug)]
pub struct ClassDefinition {
    /// The defined class, `None` for the root.
    owner: Option<NameId>,
    description: Description,
    /// Definitions attached to this one as equivalents.
    equivalents: Vec<DefinitionId>,
    /// The node this definition is attached to, if it is an equivalent.
    host: Option<DefinitionId>,
    supers: Vec<DefinitionId>,
    subs: Vec<DefinitionId>,
    placed: bool,
}

impl ClassDefinition {
    fn new(owner: Option<NameId>, description: Description) -> Self {
        Self {
            owner,
            description,
            equivalents: Vec::new(),
            host: None,
            supers: Vec::new(),
            subs: Vec::new(),
            placed: false,
        }
    }

    #[inline]
    pub fn owner(&self) -> Option<NameId> {
        self.owner
    }

    #[inline]
    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Definitions attached to this one as equivalents.
    #[inline]
    pub fn equivalents(&self) -> &[DefinitionId] {
        &self.equivalents
    }

    /// Direct supers, empty unless the definition is placed.
    #[inline]
    pub fn supers(&self) -> &[DefinitionId] {
        &self.supers
    }

    /// Direct subs, empty unless the definition is placed.
    #[inline]
    pub fn subs(&self) -> &[DefinitionId] {
        &self.subs
    }

    /// `true` if the definition is in the hierarchy, placed or attached.
    pub fn is_absorbed(&self) -> bool {
        self.placed || self.host.is_some()
    }
}

/// The result of a top search for a description.
#[derive(Debug, Default)]
pub(crate) struct Crawl {
    /// Every placed node subsuming the description, root included.
    pub subsumers: Vec<DefinitionId>,
    /// The subsumers none of whose subs subsumes the description.
    pub minimal: Vec<DefinitionId>,
    /// The minimal subsumers the description also subsumes.
    pub equivalents: Vec<DefinitionId>,
}

/// The hierarchy of all class definitions.
#[derive(Debug)]
pub struct DefinitionGraph {
    nodes: Vec<ClassDefinition>,
}

impl Default for DefinitionGraph {
    fn default() -> Self {
        let mut root = ClassDefinition::new(None, Description::top());
        root.placed = true;
        Self { nodes: vec![root] }
    }
}

impl DefinitionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition of `owner`. It is not in the hierarchy until absorbed.
    pub(crate) fn insert(&mut self, owner: NameId, description: Description) -> DefinitionId {
        let id = DefinitionId::new(self.nodes.len());
        self.nodes.push(ClassDefinition::new(Some(owner), description));
        id
    }

    /// Number of definitions, root excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of definitions holding a position of their own, root excluded.
    pub fn placed_count(&self) -> usize {
        self.nodes.iter().skip(1).filter(|node| node.placed).count()
    }

    /// Identifiers of all definitions, root excluded, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = DefinitionId> + use<> {
        (1..self.nodes.len()).map(DefinitionId::new)
    }

    #[inline]
    pub fn get(&self, id: DefinitionId) -> &ClassDefinition {
        &self.nodes[id.index()]
    }

    pub(crate) fn reset_caches(&mut self) {
        for node in &mut self.nodes {
            node.description.reset_caches();
        }
    }

    /// The owners of a placed node and of the definitions attached to it.
    pub(crate) fn owners(&self, id: DefinitionId) -> impl Iterator<Item = NameId> + '_ {
        let node = &self.nodes[id.index()];
        node.owner.into_iter().chain(
            node.equivalents
                .iter()
                .filter_map(|e| self.nodes[e.index()].owner),
        )
    }

    /// Searches the hierarchy from the root for the placed nodes subsuming `description`.
    pub(crate) fn crawl(&self, description: &Description, names: &Names) -> Crawl {
        let mut memo = FxHashMap::<DefinitionId, bool>::default();
        memo.insert(DefinitionId::ROOT, true);
        let mut crawl = Crawl {
            subsumers: vec![DefinitionId::ROOT],
            ..Crawl::default()
        };
        let mut stack = vec![DefinitionId::ROOT];
        while let Some(node) = stack.pop() {
            let mut specialized = false;
            for &sub in &self.nodes[node.index()].subs {
                let subsumes = if let Some(&known) = memo.get(&sub) {
                    known
                } else {
                    let subsumes = self.nodes[sub.index()]
                        .description
                        .subsumes(description, names);
                    memo.insert(sub, subsumes);
                    if subsumes {
                        crawl.subsumers.push(sub);
                        stack.push(sub);
                    }
                    subsumes
                };
                specialized |= subsumes;
            }
            if !specialized {
                crawl.minimal.push(node);
            }
        }
        crawl.subsumers.sort_unstable();
        crawl.minimal.sort_unstable();
        crawl.equivalents = crawl
            .minimal
            .iter()
            .copied()
            .filter(|&m| {
                m != DefinitionId::ROOT
                    && description.subsumes(&self.nodes[m.index()].description, names)
            })
            .collect();
        crawl
    }

    /// Searches below `minimal` for the most general placed nodes `description` subsumes.
    pub(crate) fn subsumees(
        &self,
        description: &Description,
        minimal: &[DefinitionId],
        names: &Names,
    ) -> Vec<DefinitionId> {
        let mut visited = FxHashSet::default();
        let mut found = Vec::new();
        let mut stack: Vec<_> = minimal
            .iter()
            .flat_map(|m| self.nodes[m.index()].subs.iter().copied())
            .collect();
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            if description.subsumes(&self.nodes[node.index()].description, names) {
                found.push(node);
            } else {
                stack.extend(self.nodes[node.index()].subs.iter().copied());
            }
        }
        found.sort_unstable();
        found
            .iter()
            .copied()
            .filter(|&n| !found.iter().any(|&o| o != n && self.reaches(o, n)))
            .collect()
    }

    /// `true` if `to` is a strict descendant of `from`.
    fn reaches(&self, from: DefinitionId, to: DefinitionId) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack = self.nodes[from.index()].subs.clone();
        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }
            if visited.insert(node) {
                stack.extend(self.nodes[node.index()].subs.iter().copied());
            }
        }
        false
    }

    fn link(&mut self, sup: DefinitionId, sub: DefinitionId) {
        if !self.nodes[sup.index()].subs.contains(&sub) {
            self.nodes[sup.index()].subs.push(sub);
        }
        if !self.nodes[sub.index()].supers.contains(&sup) {
            self.nodes[sub.index()].supers.push(sup);
        }
    }

    fn unlink(&mut self, sup: DefinitionId, sub: DefinitionId) {
        self.nodes[sup.index()].subs.retain(|&s| s != sub);
        self.nodes[sub.index()].supers.retain(|&s| s != sup);
    }

    /// Inserts a definition into the hierarchy.
    ///
    /// An equivalent placed node gets the definition attached. Otherwise the definition is
    /// placed under its most specific subsumers and above the most general nodes it
    /// subsumes, dropping the edges that became redundant.
    pub(crate) fn absorb(&mut self, id: DefinitionId, names: &Names) {
        let crawl = self.crawl(&self.nodes[id.index()].description, names);
        if let Some(&host) = crawl.equivalents.first() {
            trace!(definition = id.0, host = host.0, "Definition absorbed as an equivalent");
            self.nodes[host.index()].equivalents.push(id);
            self.nodes[id.index()].host = Some(host);
            return;
        }
        let subsumees = self.subsumees(&self.nodes[id.index()].description, &crawl.minimal, names);
        trace!(
            definition = id.0,
            parents = crawl.minimal.len(),
            children = subsumees.len(),
            "Definition placed"
        );
        self.nodes[id.index()].placed = true;
        for &parent in &crawl.minimal {
            self.link(parent, id);
        }
        for &child in &subsumees {
            for &subsumer in &crawl.subsumers {
                self.unlink(subsumer, child);
            }
            self.link(id, child);
        }
    }

    /// Takes a definition out of the hierarchy.
    ///
    /// The first attached equivalent inherits the position of a removed placed node.
    /// Without one, the subs of the node are grafted onto its supers.
    pub(crate) fn remove(&mut self, id: DefinitionId) {
        if let Some(host) = self.nodes[id.index()].host.take() {
            self.nodes[host.index()].equivalents.retain(|&e| e != id);
            return;
        }
        let node = &mut self.nodes[id.index()];
        if !node.placed {
            return;
        }
        node.placed = false;
        let equivalents = take(&mut node.equivalents);
        let supers = take(&mut node.supers);
        let subs = take(&mut node.subs);
        for &sup in &supers {
            self.nodes[sup.index()].subs.retain(|&s| s != id);
        }
        for &sub in &subs {
            self.nodes[sub.index()].supers.retain(|&s| s != id);
        }

        if let Some((&heir, rest)) = equivalents.split_first() {
            let node = &mut self.nodes[heir.index()];
            node.host = None;
            node.placed = true;
            node.equivalents = rest.to_vec();
            for &other in rest {
                self.nodes[other.index()].host = Some(heir);
            }
            for &sup in &supers {
                self.link(sup, heir);
            }
            for &sub in &subs {
                self.link(heir, sub);
            }
        } else {
            for &sub in &subs {
                for &sup in &supers {
                    if !self.reaches(sup, sub) {
                        self.link(sup, sub);
                    }
                }
            }
        }
    }

    /// Pushes what the hierarchy states onto the names: the owners of equivalent definitions
    /// are equivalent, the owners of a node are subsumed by the owners of its supers.
    pub(crate) fn infer_subsumptions_from_class_definitions(
        &self,
        names: &mut Names,
        updateds: &mut NameSet,
    ) {
        for id in self.ids() {
            let node = &self.nodes[id.index()];
            if !node.placed {
                continue;
            }
            let owners: Vec<_> = self.owners(id).collect();
            for pair in owners.windows(2) {
                names.add_equivalent(pair[0], pair[1], updateds);
            }
            for &sup in &node.supers {
                let Some(sup_owner) = self.nodes[sup.index()].owner else {
                    continue;
                };
                for &owner in &owners {
                    names.add_inferred_super(owner, sup_owner, updateds);
                }
            }
        }
    }

    /// Makes `owner` a sub of the owners of every node subsuming one of its superclass
    /// descriptions. The nodes of `owner` itself are skipped.
    pub(crate) fn infer_supers_from_class_description(
        &self,
        owner: NameId,
        description: &Description,
        names: &mut Names,
        updateds: &mut NameSet,
    ) {
        let crawl = self.crawl(description, names);
        for &node in &crawl.minimal {
            for sup in self.owners(node) {
                if sup != owner {
                    names.add_inferred_super(owner, sup, updateds);
                }
            }
        }
    }

    /// Takes out every definition whose classification may change because of `updateds`.
    pub(crate) fn remove_reclassifiable(
        &mut self,
        updateds: &NameSet,
        names: &Names,
    ) -> Vec<DefinitionId> {
        if updateds.is_empty() {
            return Vec::new();
        }
        let mut removed = Vec::new();
        for id in self.ids() {
            let node = &self.nodes[id.index()];
            if node.is_absorbed() && node.description.depends_on(updateds, names) {
                self.remove(id);
                removed.push(id);
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::Expression;
    use crate::entity::{Entity, ObjectProperty, OwlClass};

    struct Fixture {
        names: Names,
        graph: DefinitionGraph,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                names: Names::new(),
                graph: DefinitionGraph::new(),
            }
        }

        fn class(&mut self, name: &str) -> NameId {
            self.names.intern(Entity::from(
                OwlClass::new_from_iri(format!("http://example.org/{name}")).unwrap(),
            ))
        }

        fn property(&mut self, name: &str) -> NameId {
            self.names.intern(Entity::from(
                ObjectProperty::new_from_iri(format!("http://example.org/{name}")).unwrap(),
            ))
        }

        fn define(&mut self, owner: NameId, description: Description) -> DefinitionId {
            let id = self.graph.insert(owner, description);
            self.graph.absorb(id, &self.names);
            id
        }
    }

    fn restricted(name: Option<NameId>, property: NameId, filler: Description) -> Description {
        Description::new(
            name,
            vec![Expression::from(Description::new(
                Some(property),
                vec![filler.into()],
            ))],
        )
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "more than u32::MAX definitions")]
    fn ids_beyond_u32_are_rejected() {
        let _ = DefinitionId::new(usize::MAX);
    }

    #[test]
    fn absorption_keeps_the_dag_reduced() {
        let mut f = Fixture::new();
        let animal = f.class("Animal");
        let meat = f.class("Meat");
        let eats = f.property("eats");
        let carnivore = f.class("Carnivore");
        let something_eater = f.class("Eater");
        let hungry_animal = f.class("HungryAnimal");
        f.names.refresh().unwrap();

        let carnivore_def = f.define(carnivore, restricted(Some(animal), eats, Description::named(meat)));
        let eater_def = f.define(something_eater, restricted(None, eats, Description::top()));
        // Lands between the two already placed definitions.
        let hungry_def = f.define(hungry_animal, restricted(Some(animal), eats, Description::top()));

        assert_eq!(f.graph.get(eater_def).supers, vec![DefinitionId::ROOT]);
        assert_eq!(f.graph.get(hungry_def).supers, vec![eater_def]);
        assert_eq!(f.graph.get(carnivore_def).supers, vec![hungry_def]);
        assert_eq!(f.graph.get(DefinitionId::ROOT).subs, vec![eater_def]);

        let mut updateds = NameSet::new();
        f.graph
            .infer_subsumptions_from_class_definitions(&mut f.names, &mut updateds);
        f.names.refresh().unwrap();
        assert!(f.names.subsumes(something_eater, carnivore));
        assert!(f.names.subsumes(hungry_animal, carnivore));
        assert_eq!(updateds.len(), 2);
    }

    #[test]
    fn equivalent_definitions_are_attached() {
        let mut f = Fixture::new();
        let animal = f.class("Animal");
        let meat = f.class("Meat");
        let eats = f.property("eats");
        let carnivore = f.class("Carnivore");
        let meat_eater = f.class("MeatEater");
        f.names.refresh().unwrap();

        let first = f.define(carnivore, restricted(Some(animal), eats, Description::named(meat)));
        let second = f.define(meat_eater, restricted(Some(animal), eats, Description::named(meat)));
        assert_eq!(f.graph.get(second).host, Some(first));
        assert_eq!(f.graph.placed_count(), 1);

        let mut updateds = NameSet::new();
        f.graph
            .infer_subsumptions_from_class_definitions(&mut f.names, &mut updateds);
        assert!(f.names[carnivore].equivalents().contains(meat_eater));

        // Removing the host promotes its equivalent.
        f.graph.remove(first);
        assert!(f.graph.get(second).placed);
        assert_eq!(f.graph.get(DefinitionId::ROOT).subs, vec![second]);
    }

    #[test]
    fn removal_grafts_subs_onto_supers() {
        let mut f = Fixture::new();
        let a = f.class("A");
        let b = f.class("B");
        let c = f.class("C");
        let p = f.property("p");
        let q = f.property("q");
        f.names.refresh().unwrap();

        let top = f.define(a, restricted(None, p, Description::top()));
        let middle = f.define(
            b,
            Description::new(
                None,
                vec![
                    Description::new(Some(p), vec![Description::top().into()]).into(),
                    Description::new(Some(q), vec![Description::top().into()]).into(),
                ],
            ),
        );
        let bottom = f.define(
            c,
            Description::new(
                None,
                vec![
                    Description::new(Some(p), vec![Description::named(a).into()]).into(),
                    Description::new(Some(q), vec![Description::top().into()]).into(),
                ],
            ),
        );
        assert_eq!(f.graph.get(bottom).supers, vec![middle]);

        f.graph.remove(middle);
        assert!(!f.graph.get(middle).is_absorbed());
        assert_eq!(f.graph.get(bottom).supers, vec![top]);
        assert_eq!(f.graph.get(top).subs, vec![bottom]);
    }

    #[test]
    fn reclassifiable_definitions_follow_updated_names() {
        let mut f = Fixture::new();
        let animal = f.class("Animal");
        let dog = f.class("Dog");
        let owner = f.class("DogOwner");
        let owns = f.property("owns");
        f.names.refresh().unwrap();
        let definition = f.define(owner, restricted(None, owns, Description::named(dog)));

        let mut updateds = NameSet::new();
        updateds.insert(animal);
        assert!(f.graph.remove_reclassifiable(&updateds, &f.names).is_empty());

        f.names.add_told_super(dog, animal);
        f.names.refresh().unwrap();
        f.graph.reset_caches();
        assert_eq!(f.graph.remove_reclassifiable(&updateds, &f.names), vec![definition]);
        assert!(!f.graph.get(definition).is_absorbed());
    }

    #[test]
    fn superclass_descriptions_skip_own_definitions() {
        let mut f = Fixture::new();
        let animal = f.class("Animal");
        let meat = f.class("Meat");
        let eats = f.property("eats");
        let carnivore = f.class("Carnivore");
        let lion = f.class("Lion");
        f.names.refresh().unwrap();
        f.define(carnivore, restricted(Some(animal), eats, Description::named(meat)));

        let mut updateds = NameSet::new();
        let lion_super = restricted(Some(animal), eats, Description::named(meat));
        f.graph
            .infer_supers_from_class_description(lion, &lion_super, &mut f.names, &mut updateds);
        assert!(f.names[lion].supers().contains(carnivore));

        let mut unchanged = NameSet::new();
        f.graph
            .infer_supers_from_class_description(carnivore, &lion_super, &mut f.names, &mut unchanged);
        assert!(unchanged.is_empty());
    }
}
