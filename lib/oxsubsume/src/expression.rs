//! OWL 2 class expressions and data ranges, as handed over by the assertion model.
//!
//! Only a subset of these shapes is understood by the classifier, see [`crate::extract`].
//! The others are still representable so that an ontology can be loaded as-is.

use crate::entity::{DataProperty, Individual, ObjectProperty, OwlClass};
use oxrdf::{Literal, NamedNode};
use std::fmt;

/// An OWL 2 class expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassExpression {
    /// A named class
    Class(OwlClass),
    /// `ObjectIntersectionOf(C1 ... Cn)`
    ObjectIntersectionOf(Vec<ClassExpression>),
    /// `ObjectUnionOf(C1 ... Cn)`
    ObjectUnionOf(Vec<ClassExpression>),
    /// `ObjectComplementOf(C)`
    ObjectComplementOf(Box<ClassExpression>),
    /// `ObjectOneOf(a1 ... an)`
    ObjectOneOf(Vec<Individual>),
    /// `ObjectSomeValuesFrom(P C)`
    ObjectSomeValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },
    /// `ObjectAllValuesFrom(P C)`
    ObjectAllValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },
    /// `ObjectHasValue(P a)`
    ObjectHasValue {
        property: ObjectPropertyExpression,
        individual: Individual,
    },
    /// `ObjectMinCardinality(n P C)`
    ObjectMinCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Option<Box<ClassExpression>>,
    },
    /// `ObjectMaxCardinality(n P C)`
    ObjectMaxCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Option<Box<ClassExpression>>,
    },
    /// `DataSomeValuesFrom(P D)`
    DataSomeValuesFrom {
        property: DataProperty,
        filler: DataRange,
    },
    /// `DataAllValuesFrom(P D)`
    DataAllValuesFrom {
        property: DataProperty,
        filler: DataRange,
    },
    /// `DataHasValue(P v)`
    DataHasValue {
        property: DataProperty,
        value: Literal,
    },
}

impl ClassExpression {
    /// Creates a named class expression.
    pub fn class(c: impl Into<OwlClass>) -> Self {
        Self::Class(c.into())
    }

    /// Creates `owl:Thing`.
    pub fn thing() -> Self {
        Self::Class(OwlClass::thing())
    }

    /// Creates an intersection of classes.
    pub fn intersection(operands: Vec<ClassExpression>) -> Self {
        Self::ObjectIntersectionOf(operands)
    }

    /// Creates a union of classes.
    pub fn union(operands: Vec<ClassExpression>) -> Self {
        Self::ObjectUnionOf(operands)
    }

    /// Creates the complement of a class expression.
    pub fn complement(operand: ClassExpression) -> Self {
        Self::ObjectComplementOf(Box::new(operand))
    }

    /// Creates an existential restriction.
    pub fn some_values_from(
        property: impl Into<ObjectPropertyExpression>,
        filler: ClassExpression,
    ) -> Self {
        Self::ObjectSomeValuesFrom {
            property: property.into(),
            filler: Box::new(filler),
        }
    }

    /// Creates a universal restriction.
    pub fn all_values_from(
        property: impl Into<ObjectPropertyExpression>,
        filler: ClassExpression,
    ) -> Self {
        Self::ObjectAllValuesFrom {
            property: property.into(),
            filler: Box::new(filler),
        }
    }

    /// Creates an existential data restriction.
    pub fn data_some_values_from(property: impl Into<DataProperty>, filler: DataRange) -> Self {
        Self::DataSomeValuesFrom {
            property: property.into(),
            filler,
        }
    }

    /// Creates a data has-value restriction.
    pub fn data_has_value(property: impl Into<DataProperty>, value: impl Into<Literal>) -> Self {
        Self::DataHasValue {
            property: property.into(),
            value: value.into(),
        }
    }

    /// Returns the named class if this is one.
    pub fn as_class(&self) -> Option<&OwlClass> {
        match self {
            Self::Class(c) => Some(c),
            _ => None,
        }
    }
}

impl From<OwlClass> for ClassExpression {
    fn from(c: OwlClass) -> Self {
        Self::Class(c)
    }
}

impl fmt::Display for ClassExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                item.fmt(f)?;
            }
            Ok(())
        }

        match self {
            Self::Class(c) => c.fmt(f),
            Self::ObjectIntersectionOf(operands) => {
                f.write_str("ObjectIntersectionOf(")?;
                list(f, operands)?;
                f.write_str(")")
            }
            Self::ObjectUnionOf(operands) => {
                f.write_str("ObjectUnionOf(")?;
                list(f, operands)?;
                f.write_str(")")
            }
            Self::ObjectComplementOf(operand) => write!(f, "ObjectComplementOf({operand})"),
            Self::ObjectOneOf(individuals) => {
                f.write_str("ObjectOneOf(")?;
                list(f, individuals)?;
                f.write_str(")")
            }
            Self::ObjectSomeValuesFrom { property, filler } => {
                write!(f, "ObjectSomeValuesFrom({property} {filler})")
            }
            Self::ObjectAllValuesFrom { property, filler } => {
                write!(f, "ObjectAllValuesFrom({property} {filler})")
            }
            Self::ObjectHasValue {
                property,
                individual,
            } => write!(f, "ObjectHasValue({property} {individual})"),
            Self::ObjectMinCardinality {
                cardinality,
                property,
                filler,
            } => match filler {
                Some(filler) => write!(f, "ObjectMinCardinality({cardinality} {property} {filler})"),
                None => write!(f, "ObjectMinCardinality({cardinality} {property})"),
            },
            Self::ObjectMaxCardinality {
                cardinality,
                property,
                filler,
            } => match filler {
                Some(filler) => write!(f, "ObjectMaxCardinality({cardinality} {property} {filler})"),
                None => write!(f, "ObjectMaxCardinality({cardinality} {property})"),
            },
            Self::DataSomeValuesFrom { property, filler } => {
                write!(f, "DataSomeValuesFrom({property} {filler})")
            }
            Self::DataAllValuesFrom { property, filler } => {
                write!(f, "DataAllValuesFrom({property} {filler})")
            }
            Self::DataHasValue { property, value } => write!(f, "DataHasValue({property} {value})"),
        }
    }
}

/// An OWL 2 object property expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectPropertyExpression {
    /// A named object property
    ObjectProperty(ObjectProperty),
    /// `ObjectInverseOf(P)`
    ObjectInverseOf(ObjectProperty),
}

impl ObjectPropertyExpression {
    /// Creates an inverse property expression.
    pub fn inverse(property: ObjectProperty) -> Self {
        Self::ObjectInverseOf(property)
    }

    /// Returns the named property if this is not an inverse.
    pub fn as_named(&self) -> Option<&ObjectProperty> {
        match self {
            Self::ObjectProperty(p) => Some(p),
            Self::ObjectInverseOf(_) => None,
        }
    }
}

impl From<ObjectProperty> for ObjectPropertyExpression {
    fn from(p: ObjectProperty) -> Self {
        Self::ObjectProperty(p)
    }
}

impl fmt::Display for ObjectPropertyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectProperty(p) => p.fmt(f),
            Self::ObjectInverseOf(p) => write!(f, "ObjectInverseOf({p})"),
        }
    }
}

/// An OWL 2 data range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataRange {
    /// A named datatype such as `xsd:integer`
    Datatype(NamedNode),
    /// `DataUnionOf(D1 ... Dn)`
    DataUnionOf(Vec<DataRange>),
    /// `DataComplementOf(D)`
    DataComplementOf(Box<DataRange>),
    /// `DataOneOf(v1 ... vn)`
    DataOneOf(Vec<Literal>),
    /// `DatatypeRestriction(D f1 v1 ... fn vn)`
    DatatypeRestriction {
        datatype: NamedNode,
        facets: Vec<(NamedNode, Literal)>,
    },
}

impl DataRange {
    /// Creates a datatype data range.
    pub fn datatype(datatype: impl Into<NamedNode>) -> Self {
        Self::Datatype(datatype.into())
    }

    /// Creates a facet restriction of a datatype.
    pub fn restriction(
        datatype: impl Into<NamedNode>,
        facets: impl IntoIterator<Item = (NamedNode, Literal)>,
    ) -> Self {
        Self::DatatypeRestriction {
            datatype: datatype.into(),
            facets: facets.into_iter().collect(),
        }
    }
}

impl From<NamedNode> for DataRange {
    fn from(node: NamedNode) -> Self {
        Self::Datatype(node)
    }
}

impl fmt::Display for DataRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Datatype(d) => d.fmt(f),
            Self::DataUnionOf(ranges) => {
                f.write_str("DataUnionOf(")?;
                for (i, range) in ranges.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    range.fmt(f)?;
                }
                f.write_str(")")
            }
            Self::DataComplementOf(range) => write!(f, "DataComplementOf({range})"),
            Self::DataOneOf(values) => {
                f.write_str("DataOneOf(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    value.fmt(f)?;
                }
                f.write_str(")")
            }
            Self::DatatypeRestriction { datatype, facets } => {
                write!(f, "DatatypeRestriction({datatype}")?;
                for (facet, value) in facets {
                    write!(f, " {facet} {value}")?;
                }
                f.write_str(")")
            }
        }
    }
}
