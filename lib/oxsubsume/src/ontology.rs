//! The in-memory assertion model handed to the classifier.

use crate::axiom::Axiom;
use crate::entity::{DataProperty, ObjectProperty, OwlClass};
use crate::expression::{ClassExpression, ObjectPropertyExpression};
use oxrdf::NamedNode;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

/// Read access to the asserted axioms of an ontology, grouped the way the classifier consumes them.
///
/// Implementations must be fully materialized: the classifier never performs I/O.
pub trait Assertions {
    /// All classes mentioned by the ontology.
    fn classes(&self) -> Vec<&OwlClass>;

    /// All object properties mentioned by the ontology.
    fn object_properties(&self) -> Vec<&ObjectProperty>;

    /// All data properties mentioned by the ontology.
    fn data_properties(&self) -> Vec<&DataProperty>;

    /// Distinct expressions asserted equivalent to `class`, excluding `class` itself.
    fn equivalent_expressions(&self, class: &OwlClass) -> Vec<&ClassExpression>;

    /// Distinct expressions asserted as superclasses of `class`.
    fn superclass_expressions(&self, class: &OwlClass) -> Vec<&ClassExpression>;

    /// Named object properties asserted as super-properties of `property`.
    fn super_object_properties(&self, property: &ObjectProperty) -> Vec<&ObjectProperty>;

    /// Named object properties asserted equivalent to `property`.
    fn equivalent_object_properties(&self, property: &ObjectProperty) -> Vec<&ObjectProperty>;

    /// Data properties asserted as super-properties of `property`.
    fn super_data_properties(&self, property: &DataProperty) -> Vec<&DataProperty>;

    /// Data properties asserted equivalent to `property`.
    fn equivalent_data_properties(&self, property: &DataProperty) -> Vec<&DataProperty>;
}

/// An OWL 2 ontology: a set of axioms plus the indexes the classifier reads.
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    iri: Option<NamedNode>,
    axioms: Vec<Axiom>,
    classes: FxHashSet<OwlClass>,
    object_properties: FxHashSet<ObjectProperty>,
    data_properties: FxHashSet<DataProperty>,
    equivalent_classes: FxHashMap<OwlClass, Vec<ClassExpression>>,
    super_classes: FxHashMap<OwlClass, Vec<ClassExpression>>,
    super_object_properties: FxHashMap<ObjectProperty, Vec<ObjectProperty>>,
    equivalent_object_properties: FxHashMap<ObjectProperty, Vec<ObjectProperty>>,
    super_data_properties: FxHashMap<DataProperty, Vec<DataProperty>>,
    equivalent_data_properties: FxHashMap<DataProperty, Vec<DataProperty>>,
}

impl Ontology {
    /// Creates a new empty ontology.
    pub fn new(iri: Option<NamedNode>) -> Self {
        Self {
            iri,
            ..Self::default()
        }
    }

    /// Creates a new ontology with the given IRI string.
    pub fn with_iri(iri: impl Into<String>) -> Result<Self, oxiri::IriParseError> {
        Ok(Self::new(Some(NamedNode::new(iri)?)))
    }

    /// Returns the ontology IRI.
    pub fn iri(&self) -> Option<&NamedNode> {
        self.iri.as_ref()
    }

    /// Adds an axiom to the ontology, declaring every entity it mentions.
    pub fn add_axiom(&mut self, axiom: Axiom) {
        match &axiom {
            Axiom::DeclareClass(c) => {
                self.classes.insert(c.clone());
            }
            Axiom::DeclareObjectProperty(p) => {
                self.object_properties.insert(p.clone());
            }
            Axiom::DeclareDataProperty(p) => {
                self.data_properties.insert(p.clone());
            }
            Axiom::SubClassOf {
                sub_class,
                super_class,
            } => {
                self.declare_in_expression(sub_class);
                self.declare_in_expression(super_class);
                if let ClassExpression::Class(sub) = sub_class {
                    push_distinct(
                        self.super_classes.entry(sub.clone()).or_default(),
                        super_class,
                    );
                }
            }
            Axiom::EquivalentClasses(operands) => {
                for operand in operands {
                    self.declare_in_expression(operand);
                }
                for (i, operand) in operands.iter().enumerate() {
                    let ClassExpression::Class(class) = operand else {
                        continue;
                    };
                    for (j, other) in operands.iter().enumerate() {
                        if i != j && other != operand {
                            push_distinct(
                                self.equivalent_classes.entry(class.clone()).or_default(),
                                other,
                            );
                        }
                    }
                }
            }
            Axiom::DisjointClasses(operands) => {
                for operand in operands {
                    self.declare_in_expression(operand);
                }
            }
            Axiom::SubObjectPropertyOf {
                sub_property,
                super_property,
            } => {
                self.declare_object_property(sub_property);
                self.declare_object_property(super_property);
                if let (Some(sub), Some(sup)) = (sub_property.as_named(), super_property.as_named())
                {
                    push_distinct(
                        self.super_object_properties.entry(sub.clone()).or_default(),
                        sup,
                    );
                }
            }
            Axiom::EquivalentObjectProperties(properties) => {
                self.object_properties.extend(properties.iter().cloned());
                for p in properties {
                    for q in properties {
                        if p != q {
                            push_distinct(
                                self.equivalent_object_properties
                                    .entry(p.clone())
                                    .or_default(),
                                q,
                            );
                        }
                    }
                }
            }
            Axiom::SubDataPropertyOf {
                sub_property,
                super_property,
            } => {
                self.data_properties.insert(sub_property.clone());
                self.data_properties.insert(super_property.clone());
                push_distinct(
                    self.super_data_properties
                        .entry(sub_property.clone())
                        .or_default(),
                    super_property,
                );
            }
            Axiom::EquivalentDataProperties(properties) => {
                self.data_properties.extend(properties.iter().cloned());
                for p in properties {
                    for q in properties {
                        if p != q {
                            push_distinct(
                                self.equivalent_data_properties.entry(p.clone()).or_default(),
                                q,
                            );
                        }
                    }
                }
            }
        }
        self.axioms.push(axiom);
    }

    fn declare_object_property(&mut self, property: &ObjectPropertyExpression) {
        match property {
            ObjectPropertyExpression::ObjectProperty(p)
            | ObjectPropertyExpression::ObjectInverseOf(p) => {
                self.object_properties.insert(p.clone());
            }
        }
    }

    fn declare_in_expression(&mut self, expr: &ClassExpression) {
        match expr {
            ClassExpression::Class(c) => {
                if !c.is_thing() {
                    self.classes.insert(c.clone());
                }
            }
            ClassExpression::ObjectIntersectionOf(operands)
            | ClassExpression::ObjectUnionOf(operands) => {
                for operand in operands {
                    self.declare_in_expression(operand);
                }
            }
            ClassExpression::ObjectComplementOf(operand) => self.declare_in_expression(operand),
            ClassExpression::ObjectOneOf(_) => {}
            ClassExpression::ObjectSomeValuesFrom { property, filler }
            | ClassExpression::ObjectAllValuesFrom { property, filler } => {
                self.declare_object_property(property);
                self.declare_in_expression(filler);
            }
            ClassExpression::ObjectHasValue { property, .. } => {
                self.declare_object_property(property);
            }
            ClassExpression::ObjectMinCardinality {
                property, filler, ..
            }
            | ClassExpression::ObjectMaxCardinality {
                property, filler, ..
            } => {
                self.declare_object_property(property);
                if let Some(filler) = filler {
                    self.declare_in_expression(filler);
                }
            }
            ClassExpression::DataSomeValuesFrom { property, .. }
            | ClassExpression::DataAllValuesFrom { property, .. }
            | ClassExpression::DataHasValue { property, .. } => {
                self.data_properties.insert(property.clone());
            }
        }
    }

    /// Returns all axioms in insertion order.
    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    /// Returns the number of axioms.
    pub fn axiom_count(&self) -> usize {
        self.axioms.len()
    }

    /// Checks if a class is declared in this ontology.
    pub fn contains_class(&self, class: &OwlClass) -> bool {
        self.classes.contains(class)
    }

    /// Merges another ontology into this one.
    pub fn merge(&mut self, other: Ontology) {
        for axiom in other.axioms {
            self.add_axiom(axiom);
        }
    }
}

fn push_distinct<T: Clone + PartialEq>(values: &mut Vec<T>, value: &T) {
    if !values.contains(value) {
        values.push(value.clone());
    }
}

fn collect_refs<'a, K: Eq + std::hash::Hash, T>(
    map: &'a FxHashMap<K, Vec<T>>,
    key: &K,
) -> Vec<&'a T> {
    map.get(key).map(|v| v.iter().collect()).unwrap_or_default()
}

impl Assertions for Ontology {
    fn classes(&self) -> Vec<&OwlClass> {
        self.classes.iter().collect()
    }

    fn object_properties(&self) -> Vec<&ObjectProperty> {
        self.object_properties.iter().collect()
    }

    fn data_properties(&self) -> Vec<&DataProperty> {
        self.data_properties.iter().collect()
    }

    fn equivalent_expressions(&self, class: &OwlClass) -> Vec<&ClassExpression> {
        collect_refs(&self.equivalent_classes, class)
    }

    fn superclass_expressions(&self, class: &OwlClass) -> Vec<&ClassExpression> {
        collect_refs(&self.super_classes, class)
    }

    fn super_object_properties(&self, property: &ObjectProperty) -> Vec<&ObjectProperty> {
        collect_refs(&self.super_object_properties, property)
    }

    fn equivalent_object_properties(&self, property: &ObjectProperty) -> Vec<&ObjectProperty> {
        collect_refs(&self.equivalent_object_properties, property)
    }

    fn super_data_properties(&self, property: &DataProperty) -> Vec<&DataProperty> {
        collect_refs(&self.super_data_properties, property)
    }

    fn equivalent_data_properties(&self, property: &DataProperty) -> Vec<&DataProperty> {
        collect_refs(&self.equivalent_data_properties, property)
    }
}

impl fmt::Display for Ontology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(iri) = &self.iri {
            write!(f, "Ontology({iri})")?;
        } else {
            write!(f, "Ontology(anonymous)")?;
        }
        write!(f, " [{} axioms]", self.axioms.len())
    }
}
