//! OWL 2 entities: named classes, properties and individuals.

use oxrdf::{BlankNode, NamedNode, Term};
use std::fmt;

macro_rules! iri_entity {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(NamedNode);

        impl $name {
            /// Wraps a named node.
            #[inline]
            pub fn new(iri: NamedNode) -> Self {
                Self(iri)
            }

            /// Parses and wraps an IRI string.
            #[inline]
            pub fn new_from_iri(iri: impl Into<String>) -> Result<Self, oxiri::IriParseError> {
                Ok(Self(NamedNode::new(iri)?))
            }

            /// Returns the IRI of this entity.
            #[inline]
            pub fn iri(&self) -> &NamedNode {
                &self.0
            }

            /// Returns the IRI as a string slice.
            #[inline]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Converts this entity into its underlying named node.
            #[inline]
            pub fn into_inner(self) -> NamedNode {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<NamedNode> for $name {
            #[inline]
            fn from(node: NamedNode) -> Self {
                Self(node)
            }
        }

        impl From<$name> for NamedNode {
            #[inline]
            fn from(entity: $name) -> Self {
                entity.0
            }
        }

        impl From<$name> for Term {
            #[inline]
            fn from(entity: $name) -> Self {
                entity.0.into()
            }
        }

        impl AsRef<NamedNode> for $name {
            #[inline]
            fn as_ref(&self) -> &NamedNode {
                &self.0
            }
        }
    };
}

iri_entity!(
    /// An OWL class (`owl:Class`).
    ///
    /// `owl:Thing` is represented by the class with the `owl:Thing` IRI, see [`OwlClass::is_thing`].
    OwlClass
);

iri_entity!(
    /// An OWL object property (`owl:ObjectProperty`), relating individuals to individuals.
    ObjectProperty
);

iri_entity!(
    /// An OWL data property (`owl:DatatypeProperty`), relating individuals to literals.
    DataProperty
);

impl OwlClass {
    /// Returns `owl:Thing`.
    pub fn thing() -> Self {
        Self(crate::vocab::THING.into_owned())
    }

    /// Returns `true` if this is `owl:Thing`.
    #[inline]
    pub fn is_thing(&self) -> bool {
        self.0.as_ref() == crate::vocab::THING
    }
}

/// An OWL individual, either named or anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Individual {
    /// A named individual.
    Named(NamedNode),
    /// An anonymous individual.
    Anonymous(BlankNode),
}

impl Individual {
    /// Returns the IRI if this is a named individual.
    #[inline]
    pub fn as_named(&self) -> Option<&NamedNode> {
        match self {
            Self::Named(n) => Some(n),
            Self::Anonymous(_) => None,
        }
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => n.fmt(f),
            Self::Anonymous(b) => b.fmt(f),
        }
    }
}

impl From<NamedNode> for Individual {
    #[inline]
    fn from(node: NamedNode) -> Self {
        Self::Named(node)
    }
}

impl From<BlankNode> for Individual {
    #[inline]
    fn from(node: BlankNode) -> Self {
        Self::Anonymous(node)
    }
}

/// Any entity that can carry a place in a subsumption hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Entity {
    Class(OwlClass),
    ObjectProperty(ObjectProperty),
    DataProperty(DataProperty),
}

impl Entity {
    /// Returns the IRI of the entity.
    #[inline]
    pub fn iri(&self) -> &NamedNode {
        match self {
            Self::Class(c) => c.iri(),
            Self::ObjectProperty(p) => p.iri(),
            Self::DataProperty(p) => p.iri(),
        }
    }

    /// Returns `true` for classes.
    #[inline]
    pub fn is_class(&self) -> bool {
        matches!(self, Self::Class(_))
    }

    /// Returns the class if this entity is one.
    #[inline]
    pub fn as_class(&self) -> Option<&OwlClass> {
        match self {
            Self::Class(c) => Some(c),
            Self::ObjectProperty(_) | Self::DataProperty(_) => None,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(c) => write!(f, "Class({c})"),
            Self::ObjectProperty(p) => write!(f, "ObjectProperty({p})"),
            Self::DataProperty(p) => write!(f, "DataProperty({p})"),
        }
    }
}

impl From<OwlClass> for Entity {
    #[inline]
    fn from(class: OwlClass) -> Self {
        Self::Class(class)
    }
}

impl From<ObjectProperty> for Entity {
    #[inline]
    fn from(property: ObjectProperty) -> Self {
        Self::ObjectProperty(property)
    }
}

impl From<DataProperty> for Entity {
    #[inline]
    fn from(property: DataProperty) -> Self {
        Self::DataProperty(property)
    }
}
