//! The query surface of a finished classification.

use crate::entity::{DataProperty, ObjectProperty, OwlClass};
use crate::expression::ClassExpression;
use std::time::Duration;

/// Configuration for the classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Maximum number of classification passes before giving up.
    pub max_passes: usize,
    /// Maximum time allowed for classification (None = unlimited).
    pub timeout: Option<Duration>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_passes: 10_000,
            timeout: None,
        }
    }
}

/// Trait for subsumption reasoners.
///
/// Class queries accept any class expression. Expressions the reasoner cannot interpret, or
/// that mention entities it does not know, have no answer and yield an empty result.
pub trait Reasoner {
    /// Returns the named classes equivalent to the expression.
    fn equivalent_classes(&self, expression: &ClassExpression) -> Vec<&OwlClass>;

    /// Returns the named classes strictly subsuming the expression.
    ///
    /// With `direct`, only the most specific ones.
    fn super_classes(&self, expression: &ClassExpression, direct: bool) -> Vec<&OwlClass>;

    /// Returns the named classes strictly subsumed by the expression.
    ///
    /// With `direct`, only the most general ones.
    fn sub_classes(&self, expression: &ClassExpression, direct: bool) -> Vec<&OwlClass>;

    /// Returns the super-properties of an object property.
    fn super_object_properties(
        &self,
        property: &ObjectProperty,
        direct: bool,
    ) -> Vec<&ObjectProperty>;

    /// Returns the sub-properties of an object property.
    fn sub_object_properties(&self, property: &ObjectProperty, direct: bool)
    -> Vec<&ObjectProperty>;

    /// Returns the super-properties of a data property.
    fn super_data_properties(&self, property: &DataProperty, direct: bool) -> Vec<&DataProperty>;

    /// Returns the sub-properties of a data property.
    fn sub_data_properties(&self, property: &DataProperty, direct: bool) -> Vec<&DataProperty>;
}
