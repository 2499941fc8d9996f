//! Structural subsumption classification of OWL 2 ontologies.
//!
//! This crate computes the class hierarchy implied by an ontology whose classes are defined
//! with conjunctions of named classes and existential restrictions:
//! - an OWL 2 data model restricted to what shapes a hierarchy (classes, properties, class
//!   expressions, subclass and equivalence axioms)
//! - a classifier absorbing every class definition into a shared hierarchy until a fixpoint
//! - queries for the equivalent, super and sub classes of any class expression
//!
//! The subsumption test is structural: it compares the shape of expressions and does not
//! reason by cases. Complements, universal and cardinality restrictions are ignored.
//!
//! # Example
//! ```
//! use oxsubsume::{Axiom, ClassExpression, Classifier, ObjectProperty, Ontology, OwlClass, Reasoner};
//!
//! let class = |name: &str| OwlClass::new_from_iri(format!("http://example.org/{name}"));
//! let has_parent = ObjectProperty::new_from_iri("http://example.org/hasParent")?;
//!
//! let mut ontology = Ontology::new(None);
//! ontology.add_axiom(Axiom::subclass_of(class("Dog")?, class("Animal")?));
//! ontology.add_axiom(Axiom::equivalent_classes(vec![
//!     class("Puppy")?.into(),
//!     ClassExpression::intersection(vec![
//!         class("Animal")?.into(),
//!         ClassExpression::some_values_from(has_parent.clone(), class("Dog")?.into()),
//!     ]),
//! ]));
//!
//! let classifier = Classifier::new(&ontology)?;
//! let young_dog = ClassExpression::intersection(vec![
//!     class("Dog")?.into(),
//!     ClassExpression::some_values_from(has_parent, class("Dog")?.into()),
//! ]);
//! assert_eq!(classifier.super_classes(&young_dog, true), vec![&class("Dog")?, &class("Puppy")?]);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod axiom;
mod classifier;
mod definition;
mod description;
mod entity;
mod error;
mod expression;
mod extract;
mod name;
mod names;
mod ontology;
mod reasoner;
mod vocab;

pub use axiom::Axiom;
pub use classifier::{ClassificationStats, Classifier};
pub use definition::{ClassDefinition, DefinitionGraph, DefinitionId};
pub use description::{Bound, Description, Disjunction, Expression, NumberRange};
pub use entity::{DataProperty, Entity, Individual, ObjectProperty, OwlClass};
pub use error::ClassifierError;
pub use expression::{ClassExpression, DataRange, ObjectPropertyExpression};
pub use name::{Name, NameId, NameSet};
pub use names::{CacheMode, Names};
pub use ontology::{Assertions, Ontology};
pub use reasoner::{ClassifierConfig, Reasoner};
