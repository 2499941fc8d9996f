//! OWL 2 axioms relevant to classification.

use crate::entity::{DataProperty, ObjectProperty, OwlClass};
use crate::expression::{ClassExpression, ObjectPropertyExpression};

/// An OWL 2 axiom.
///
/// Only the class and property axioms that shape a subsumption hierarchy are modelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Axiom {
    /// `Declaration(Class(C))`
    DeclareClass(OwlClass),
    /// `Declaration(ObjectProperty(P))`
    DeclareObjectProperty(ObjectProperty),
    /// `Declaration(DataProperty(P))`
    DeclareDataProperty(DataProperty),

    /// `SubClassOf(sub super)`
    SubClassOf {
        sub_class: ClassExpression,
        super_class: ClassExpression,
    },
    /// `EquivalentClasses(C1 ... Cn)`
    EquivalentClasses(Vec<ClassExpression>),
    /// `DisjointClasses(C1 ... Cn)`, kept for completeness, it does not affect subsumption
    DisjointClasses(Vec<ClassExpression>),

    /// `SubObjectPropertyOf(sub super)`
    SubObjectPropertyOf {
        sub_property: ObjectPropertyExpression,
        super_property: ObjectPropertyExpression,
    },
    /// `EquivalentObjectProperties(P1 ... Pn)`
    EquivalentObjectProperties(Vec<ObjectProperty>),
    /// `SubDataPropertyOf(sub super)`
    SubDataPropertyOf {
        sub_property: DataProperty,
        super_property: DataProperty,
    },
    /// `EquivalentDataProperties(P1 ... Pn)`
    EquivalentDataProperties(Vec<DataProperty>),
}

impl Axiom {
    /// Creates a `SubClassOf` axiom.
    pub fn subclass_of(sub: impl Into<ClassExpression>, sup: impl Into<ClassExpression>) -> Self {
        Self::SubClassOf {
            sub_class: sub.into(),
            super_class: sup.into(),
        }
    }

    /// Creates an `EquivalentClasses` axiom.
    pub fn equivalent_classes(classes: Vec<ClassExpression>) -> Self {
        Self::EquivalentClasses(classes)
    }

    /// Creates a `SubObjectPropertyOf` axiom between two named properties.
    pub fn sub_object_property_of(sub: ObjectProperty, sup: ObjectProperty) -> Self {
        Self::SubObjectPropertyOf {
            sub_property: sub.into(),
            super_property: sup.into(),
        }
    }

    /// Creates a `SubDataPropertyOf` axiom.
    pub fn sub_data_property_of(sub: DataProperty, sup: DataProperty) -> Self {
        Self::SubDataPropertyOf {
            sub_property: sub,
            super_property: sup,
        }
    }
}
