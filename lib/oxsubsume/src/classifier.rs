//! The structural subsumption classifier.

use crate::definition::{DefinitionGraph, DefinitionId};
use crate::description::Description;
use crate::entity::{DataProperty, Entity, ObjectProperty, OwlClass};
use crate::error::ClassifierError;
use crate::expression::ClassExpression;
use crate::extract::Extractor;
use crate::name::{NameId, NameSet};
use crate::names::{CacheMode, Names};
use crate::ontology::Assertions;
use crate::reasoner::{ClassifierConfig, Reasoner};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

/// Counters describing a finished classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationStats {
    /// Number of classification passes run
    pub passes: usize,
    /// Number of named classes and properties
    pub names: usize,
    /// Number of class definitions taken from equivalence axioms
    pub definitions: usize,
    /// Number of class definitions holding their own position in the hierarchy
    pub placed_definitions: usize,
    /// Number of superclass descriptions taken from subclass axioms
    pub superclass_descriptions: usize,
    /// Number of asserted expressions skipped because they are not supported
    pub skipped_expressions: usize,
}

/// A query expression, reduced to what answers it.
enum Query {
    /// `owl:Thing`
    Top,
    /// An expression equivalent to a single name
    Named(NameId),
    Anonymous(Description),
}

/// A structural subsumption classifier.
///
/// Classification runs to completion in [`Classifier::new`]: the definitions of every class
/// are absorbed into a shared hierarchy, what the hierarchy states is pushed onto the named
/// classes, and the definitions affected by a change are classified again until nothing
/// changes anymore.
///
/// ```
/// use oxsubsume::{Axiom, ClassExpression, Classifier, ObjectProperty, Ontology, OwlClass, Reasoner};
///
/// let class = |name: &str| OwlClass::new_from_iri(format!("http://example.org/{name}")).unwrap();
/// let eats = ObjectProperty::new_from_iri("http://example.org/eats")?;
///
/// let mut ontology = Ontology::new(None);
/// ontology.add_axiom(Axiom::subclass_of(class("Lion"), class("Animal")));
/// ontology.add_axiom(Axiom::equivalent_classes(vec![
///     class("Carnivore").into(),
///     ClassExpression::intersection(vec![
///         class("Animal").into(),
///         ClassExpression::some_values_from(eats.clone(), class("Meat").into()),
///     ]),
/// ]));
/// ontology.add_axiom(Axiom::subclass_of(
///     class("Lion"),
///     ClassExpression::intersection(vec![
///         class("Animal").into(),
///         ClassExpression::some_values_from(eats, class("Meat").into()),
///     ]),
/// ));
///
/// let classifier = Classifier::new(&ontology)?;
/// let supers = classifier.super_classes(&class("Lion").into(), true);
/// assert_eq!(supers, vec![&class("Carnivore")]);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug)]
pub struct Classifier {
    config: ClassifierConfig,
    names: Names,
    definitions: DefinitionGraph,
    /// Superclass descriptions with the class they were asserted on.
    descriptions: Vec<(NameId, Description)>,
    stats: ClassificationStats,
}

impl Classifier {
    /// Classifies the assertions with the default configuration.
    pub fn new(assertions: &impl Assertions) -> Result<Self, ClassifierError> {
        Self::with_config(assertions, ClassifierConfig::default())
    }

    /// Classifies the assertions.
    pub fn with_config(
        assertions: &impl Assertions,
        config: ClassifierConfig,
    ) -> Result<Self, ClassifierError> {
        let mut classifier = Self {
            config,
            names: Names::new(),
            definitions: DefinitionGraph::new(),
            descriptions: Vec::new(),
            stats: ClassificationStats::default(),
        };
        classifier.load(assertions);
        let candidates = classifier.definitions.ids().collect();
        classifier.classify(candidates)?;
        Ok(classifier)
    }

    /// Registers every entity and turns the asserted axioms into told subsumptions,
    /// definitions and superclass descriptions.
    fn load(&mut self, assertions: &impl Assertions) {
        let mut classes = assertions.classes();
        classes.sort_unstable();
        let mut object_properties = assertions.object_properties();
        object_properties.sort_unstable();
        let mut data_properties = assertions.data_properties();
        data_properties.sort_unstable();
        for &class in &classes {
            self.names.intern(class.clone().into());
        }
        for &property in &object_properties {
            self.names.intern(property.clone().into());
        }
        for &property in &data_properties {
            self.names.intern(property.clone().into());
        }

        let mut told = NameSet::new();
        for &property in &object_properties {
            let id = self.names.intern(property.clone().into());
            for sup in assertions.super_object_properties(property) {
                let sup = self.names.intern(sup.clone().into());
                self.names.add_told_super(id, sup);
            }
            for equivalent in assertions.equivalent_object_properties(property) {
                let equivalent = self.names.intern(equivalent.clone().into());
                self.names.add_equivalent(id, equivalent, &mut told);
            }
        }
        for &property in &data_properties {
            let id = self.names.intern(property.clone().into());
            for sup in assertions.super_data_properties(property) {
                let sup = self.names.intern(sup.clone().into());
                self.names.add_told_super(id, sup);
            }
            for equivalent in assertions.equivalent_data_properties(property) {
                let equivalent = self.names.intern(equivalent.clone().into());
                self.names.add_equivalent(id, equivalent, &mut told);
            }
        }

        for &class in &classes {
            let owner = self.names.intern(class.clone().into());
            for expression in assertions.equivalent_expressions(class) {
                match expression.as_class() {
                    Some(other) if !other.is_thing() => {
                        let other = self.names.intern(other.clone().into());
                        self.names.add_equivalent(owner, other, &mut told);
                    }
                    _ => match self.extract(expression) {
                        Some(description) => match description.name() {
                            Some(name) if description.is_named_only() => {
                                self.names.add_equivalent(owner, name, &mut told);
                            }
                            name => {
                                if let Some(name) = name {
                                    self.names.add_told_super(owner, name);
                                }
                                self.definitions.insert(owner, description);
                            }
                        },
                        None => {
                            debug!(%class, %expression, "Skipping unsupported class definition");
                            self.stats.skipped_expressions += 1;
                        }
                    },
                }
            }
            for expression in assertions.superclass_expressions(class) {
                if let Some(other) = expression.as_class() {
                    if other != class && !other.is_thing() {
                        let other = self.names.intern(other.clone().into());
                        self.names.add_told_super(owner, other);
                    }
                    continue;
                }
                match self.extract(expression) {
                    Some(description) => {
                        if let Some(name) = description.name().filter(|&name| name != owner) {
                            self.names.add_told_super(owner, name);
                        }
                        if !description.successors().is_empty() {
                            self.descriptions.push((owner, description));
                        }
                    }
                    None => {
                        debug!(%class, %expression, "Skipping unsupported superclass expression");
                        self.stats.skipped_expressions += 1;
                    }
                }
            }
        }
        self.stats.definitions = self.definitions.len();
        self.stats.superclass_descriptions = self.descriptions.len();
    }

    fn extract(&mut self, expression: &ClassExpression) -> Option<Description> {
        Extractor::new(|entity| Some(self.names.intern(entity))).description(expression)
    }

    /// Runs classification passes until a fixpoint, then closes the name hierarchy.
    fn classify(&mut self, mut candidates: Vec<DefinitionId>) -> Result<(), ClassifierError> {
        let start = Instant::now();
        loop {
            if self.stats.passes >= self.config.max_passes {
                return Err(ClassifierError::PassLimitExceeded {
                    limit: self.config.max_passes,
                });
            }
            if let Some(timeout) = self.config.timeout {
                if start.elapsed() >= timeout {
                    return Err(ClassifierError::Timeout { timeout });
                }
            }
            self.stats.passes += 1;

            self.names.refresh()?;
            self.invalidate_caches();
            candidates.sort_by(|a, b| {
                self.definitions
                    .get(*a)
                    .description()
                    .cmp_complexity(self.definitions.get(*b).description())
                    .then_with(|| a.cmp(b))
            });
            for &candidate in &candidates {
                self.definitions.absorb(candidate, &self.names);
            }

            let mut updateds = NameSet::new();
            self.definitions
                .infer_subsumptions_from_class_definitions(&mut self.names, &mut updateds);
            self.names.refresh()?;
            self.invalidate_caches();
            for (owner, description) in &self.descriptions {
                self.definitions.infer_supers_from_class_description(
                    *owner,
                    description,
                    &mut self.names,
                    &mut updateds,
                );
            }

            let reclassified = self
                .definitions
                .remove_reclassifiable(&updateds, &self.names);
            debug!(
                pass = self.stats.passes,
                absorbed = candidates.len(),
                updated = updateds.len(),
                reclassified = reclassified.len(),
                "Classification pass done"
            );
            self.invalidate_caches();
            if reclassified.is_empty() && updateds.is_empty() {
                break;
            }
            candidates = reclassified;
        }

        self.names.close()?;
        self.stats.names = self.names.len();
        self.stats.placed_definitions = self.definitions.placed_count();
        info!(
            passes = self.stats.passes,
            names = self.stats.names,
            definitions = self.stats.definitions,
            elapsed = ?start.elapsed(),
            "Classification converged"
        );
        Ok(())
    }

    fn invalidate_caches(&mut self) {
        if self.names.cache_mode() == CacheMode::Frozen {
            return;
        }
        self.definitions.reset_caches();
        for (_, description) in &mut self.descriptions {
            description.reset_caches();
        }
    }

    /// Returns the name registry holding the classified hierarchy.
    pub fn names(&self) -> &Names {
        &self.names
    }

    /// Returns the hierarchy of class definitions.
    pub fn definitions(&self) -> &DefinitionGraph {
        &self.definitions
    }

    /// Returns the configuration classification ran with.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Returns counters about the classification.
    pub fn stats(&self) -> ClassificationStats {
        self.stats
    }

    fn lookup(&self, entity: impl Into<Entity>) -> Option<NameId> {
        self.names.lookup(&entity.into())
    }

    /// Resolves a query without registering anything. `None` if it cannot be answered.
    fn query(&self, expression: &ClassExpression) -> Option<Query> {
        let description =
            Extractor::new(|entity| self.names.lookup(&entity)).description(expression)?;
        if !description.successors().is_empty() {
            return Some(Query::Anonymous(description));
        }
        Some(match description.name() {
            Some(id) => Query::Named(id),
            None => Query::Top,
        })
    }

    fn classes(&self, ids: impl IntoIterator<Item = NameId>) -> Vec<&OwlClass> {
        let mut ids: Vec<_> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter()
            .filter_map(|id| self.names[id].entity().as_class())
            .collect()
    }

    fn all_classes(&self) -> impl Iterator<Item = NameId> + '_ {
        self.names
            .iter()
            .filter(|(_, name)| name.entity().is_class())
            .map(|(id, _)| id)
    }

    /// Owners of the equivalence points of a query.
    fn equivalents_of(&self, description: &Description) -> NameSet {
        let crawl = self.definitions.crawl(description, &self.names);
        let mut equivalents = NameSet::new();
        for node in crawl.equivalents {
            for owner in self.definitions.owners(node) {
                equivalents.insert(owner);
                equivalents.extend(self.names[owner].equivalents());
            }
        }
        equivalents
    }

    fn anonymous_super_classes(&self, description: &Description, direct: bool) -> Vec<NameId> {
        let crawl = self.definitions.crawl(description, &self.names);
        let equivalents = self.equivalents_of(description);
        let mut supers = NameSet::new();
        let starts = crawl
            .subsumers
            .iter()
            .flat_map(|&node| self.definitions.owners(node))
            .chain(description.name());
        for start in starts {
            supers.insert(start);
            supers.extend(self.names[start].equivalents());
            supers.extend(self.names[start].ancestors());
        }
        supers.remove_all(&equivalents);
        let supers = supers.sorted().to_vec();
        if direct {
            self.names.minimal(&supers)
        } else {
            supers
        }
    }

    fn anonymous_sub_classes(&self, description: &Description, direct: bool) -> Vec<NameId> {
        let crawl = self.definitions.crawl(description, &self.names);
        let subsumees = match crawl.equivalents.first() {
            Some(&node) => self.definitions.get(node).subs().to_vec(),
            None => self
                .definitions
                .subsumees(description, &crawl.minimal, &self.names),
        };
        let equivalents = self.equivalents_of(description);
        let starts = subsumees
            .iter()
            .flat_map(|&node| self.definitions.owners(node))
            .chain(
                self.descriptions
                    .iter()
                    .filter(|(_, candidate)| description.subsumes(candidate, &self.names))
                    .map(|(owner, _)| *owner),
            );
        let mut subs = NameSet::new();
        for start in starts {
            subs.insert(start);
            subs.extend(self.names[start].equivalents());
            subs.extend(self.names[start].descendants());
        }
        // Told subs of an equivalent class are only reachable through its name.
        for &equivalent in equivalents.sorted() {
            subs.extend(self.names[equivalent].descendants());
        }
        subs.remove_all(&equivalents);
        let subs = subs.sorted().to_vec();
        if direct {
            self.names.maximal(&subs)
        } else {
            subs
        }
    }

    fn properties<T>(
        &self,
        id: Option<NameId>,
        direct: bool,
        upward: bool,
        as_property: impl Fn(&Entity) -> Option<&T>,
    ) -> Vec<&T> {
        let Some(id) = id else {
            return Vec::new();
        };
        let name = &self.names[id];
        let ids = match (direct, upward) {
            (true, true) => self.names.minimal(&self.names.effective_supers(id)),
            (true, false) => self.names.maximal(&self.names.effective_subs(id)),
            (false, true) => name.ancestors().sorted().to_vec(),
            (false, false) => name.descendants().sorted().to_vec(),
        };
        ids.into_iter()
            .filter_map(|id| as_property(self.names[id].entity()))
            .collect()
    }
}

impl Reasoner for Classifier {
    fn equivalent_classes(&self, expression: &ClassExpression) -> Vec<&OwlClass> {
        match self.query(expression) {
            Some(Query::Named(id)) => self.classes(self.names[id].equivalents()),
            Some(Query::Anonymous(description)) => {
                self.classes(&self.equivalents_of(&description))
            }
            Some(Query::Top) | None => Vec::new(),
        }
    }

    fn super_classes(&self, expression: &ClassExpression, direct: bool) -> Vec<&OwlClass> {
        match self.query(expression) {
            Some(Query::Named(id)) if direct => self.classes(self.names.effective_supers(id)),
            Some(Query::Named(id)) => self.classes(self.names[id].ancestors()),
            Some(Query::Anonymous(description)) => {
                self.classes(self.anonymous_super_classes(&description, direct))
            }
            Some(Query::Top) | None => Vec::new(),
        }
    }

    fn sub_classes(&self, expression: &ClassExpression, direct: bool) -> Vec<&OwlClass> {
        match self.query(expression) {
            Some(Query::Named(id)) if direct => self.classes(self.names.effective_subs(id)),
            Some(Query::Named(id)) => self.classes(self.names[id].descendants()),
            Some(Query::Anonymous(description)) => {
                self.classes(self.anonymous_sub_classes(&description, direct))
            }
            Some(Query::Top) if direct => self.classes(
                self.all_classes()
                    .filter(|&id| self.names.effective_supers(id).is_empty()),
            ),
            Some(Query::Top) => self.classes(self.all_classes()),
            None => Vec::new(),
        }
    }

    fn super_object_properties(
        &self,
        property: &ObjectProperty,
        direct: bool,
    ) -> Vec<&ObjectProperty> {
        self.properties(self.lookup(property.clone()), direct, true, |entity| {
            match entity {
                Entity::ObjectProperty(p) => Some(p),
                Entity::Class(_) | Entity::DataProperty(_) => None,
            }
        })
    }

    fn sub_object_properties(
        &self,
        property: &ObjectProperty,
        direct: bool,
    ) -> Vec<&ObjectProperty> {
        self.properties(self.lookup(property.clone()), direct, false, |entity| {
            match entity {
                Entity::ObjectProperty(p) => Some(p),
                Entity::Class(_) | Entity::DataProperty(_) => None,
            }
        })
    }

    fn super_data_properties(&self, property: &DataProperty, direct: bool) -> Vec<&DataProperty> {
        self.properties(self.lookup(property.clone()), direct, true, |entity| {
            match entity {
                Entity::DataProperty(p) => Some(p),
                Entity::Class(_) | Entity::ObjectProperty(_) => None,
            }
        })
    }

    fn sub_data_properties(&self, property: &DataProperty, direct: bool) -> Vec<&DataProperty> {
        self.properties(self.lookup(property.clone()), direct, false, |entity| {
            match entity {
                Entity::DataProperty(p) => Some(p),
                Entity::Class(_) | Entity::ObjectProperty(_) => None,
            }
        })
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Classifier({} names, {} definitions, {} superclass descriptions, {} passes)",
            self.stats.names,
            self.stats.definitions,
            self.stats.superclass_descriptions,
            self.stats.passes
        )
    }
}
