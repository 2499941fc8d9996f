//! Translation of OWL class expressions into [`Description`]s.
//!
//! The translation is best effort: any shape the structural subsumption test cannot handle
//! soundly makes the whole expression unsupported, and `None` is returned.

use crate::description::{Bound, Description, Disjunction, Expression, NumberRange};
use crate::entity::Entity;
use crate::expression::{ClassExpression, DataRange};
use crate::name::NameId;
use crate::vocab;
use oxrdf::Literal;
use oxrdf::vocab::xsd;
use oxsdatatypes::{Decimal, Double, Float, Integer};
use std::str::FromStr;

/// Builds descriptions, resolving entities to names with `resolve`.
///
/// `resolve` returning `None` makes the expression unsupported.
pub(crate) struct Extractor<F> {
    resolve: F,
}

impl<F: FnMut(Entity) -> Option<NameId>> Extractor<F> {
    pub(crate) fn new(resolve: F) -> Self {
        Self { resolve }
    }

    /// Extracts a class level description.
    pub(crate) fn description(&mut self, expression: &ClassExpression) -> Option<Description> {
        match expression {
            ClassExpression::Class(class) if class.is_thing() => Some(Description::top()),
            ClassExpression::Class(class) => {
                Some(Description::named((self.resolve)(class.clone().into())?))
            }
            ClassExpression::ObjectIntersectionOf(operands) => {
                let mut name = None;
                let mut successors = Vec::new();
                self.conjuncts(operands, &mut name, &mut successors)?;
                Some(Description::new(name, successors))
            }
            ClassExpression::ObjectUnionOf(operands) => match operands.as_slice() {
                [operand] => self.description(operand),
                _ => Some(Description::new(
                    None,
                    vec![self.disjunction(operands)?.into()],
                )),
            },
            _ => Some(Description::new(None, vec![self.restriction(expression)?])),
        }
    }

    fn conjuncts(
        &mut self,
        operands: &[ClassExpression],
        name: &mut Option<NameId>,
        successors: &mut Vec<Expression>,
    ) -> Option<()> {
        for operand in operands {
            match operand {
                ClassExpression::Class(class) if class.is_thing() => {}
                ClassExpression::Class(class) => {
                    let id = (self.resolve)(class.clone().into())?;
                    match name {
                        Some(existing) if *existing != id => return None,
                        _ => *name = Some(id),
                    }
                }
                ClassExpression::ObjectIntersectionOf(nested) => {
                    self.conjuncts(nested, name, successors)?;
                }
                ClassExpression::ObjectUnionOf(disjuncts) => {
                    successors.push(self.disjunction(disjuncts)?.into());
                }
                _ => successors.push(self.restriction(operand)?),
            }
        }
        Some(())
    }

    fn disjunction(&mut self, operands: &[ClassExpression]) -> Option<Disjunction> {
        if operands.is_empty() {
            return None;
        }
        let disjuncts = operands
            .iter()
            .map(|operand| self.description(operand))
            .collect::<Option<Vec<_>>>()?;
        Some(Disjunction::new(disjuncts))
    }

    fn restriction(&mut self, expression: &ClassExpression) -> Option<Expression> {
        match expression {
            ClassExpression::ObjectSomeValuesFrom { property, filler } => {
                let property = (self.resolve)(property.as_named()?.clone().into())?;
                let filler = self.description(filler)?;
                Some(Description::new(Some(property), vec![filler.into()]).into())
            }
            ClassExpression::DataSomeValuesFrom { property, filler } => {
                let range = number_range(filler)?;
                let property = (self.resolve)(property.clone().into())?;
                Some(Description::new(Some(property), vec![range.into()]).into())
            }
            ClassExpression::DataHasValue { property, value } => {
                let range = NumberRange::point(number(value)?);
                let property = (self.resolve)(property.clone().into())?;
                Some(Description::new(Some(property), vec![range.into()]).into())
            }
            _ => None,
        }
    }
}

/// The interval described by a numeric data range.
pub(crate) fn number_range(range: &DataRange) -> Option<NumberRange> {
    match range {
        DataRange::Datatype(datatype) if vocab::is_numeric_datatype(datatype.as_ref()) => {
            Some(NumberRange::unbounded())
        }
        DataRange::DatatypeRestriction { datatype, facets }
            if vocab::is_numeric_datatype(datatype.as_ref()) =>
        {
            let mut range = NumberRange::unbounded();
            for (facet, value) in facets {
                let value = number(value)?;
                let facet = facet.as_ref();
                range = if facet == vocab::MIN_INCLUSIVE {
                    range.with_lower(Bound::inclusive(value))
                } else if facet == vocab::MIN_EXCLUSIVE {
                    range.with_lower(Bound::exclusive(value))
                } else if facet == vocab::MAX_INCLUSIVE {
                    range.with_upper(Bound::inclusive(value))
                } else if facet == vocab::MAX_EXCLUSIVE {
                    range.with_upper(Bound::exclusive(value))
                } else {
                    return None;
                };
            }
            Some(range)
        }
        _ => None,
    }
}

/// The value of a numeric literal.
pub(crate) fn number(literal: &Literal) -> Option<f64> {
    let datatype = literal.datatype();
    let value = literal.value();
    if datatype == xsd::DOUBLE {
        Double::from_str(value).ok().map(f64::from)
    } else if datatype == xsd::FLOAT {
        Float::from_str(value).ok().map(f64::from)
    } else if datatype == xsd::DECIMAL {
        Decimal::from_str(value).ok().map(|v| f64::from(Double::from(v)))
    } else if vocab::is_numeric_datatype(datatype) {
        Integer::from_str(value).ok().map(|v| f64::from(Double::from(v)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{DataProperty, ObjectProperty, OwlClass};
    use crate::expression::ObjectPropertyExpression;
    use crate::names::Names;

    fn class(name: &str) -> ClassExpression {
        ClassExpression::class(OwlClass::new_from_iri(format!("http://example.org/{name}")).unwrap())
    }

    fn eats() -> ObjectProperty {
        ObjectProperty::new_from_iri("http://example.org/eats").unwrap()
    }

    fn age() -> DataProperty {
        DataProperty::new_from_iri("http://example.org/age").unwrap()
    }

    fn extract(names: &mut Names, expression: &ClassExpression) -> Option<Description> {
        Extractor::new(|entity| Some(names.intern(entity))).description(expression)
    }

    #[test]
    fn intersection_is_flattened() {
        let mut names = Names::new();
        let expression = ClassExpression::intersection(vec![
            class("Animal"),
            ClassExpression::intersection(vec![
                ClassExpression::some_values_from(eats(), class("Meat")),
                ClassExpression::thing(),
            ]),
        ]);
        let description = extract(&mut names, &expression).unwrap();
        assert!(description.name().is_some());
        assert_eq!(description.successors().len(), 1);
        assert_eq!(description.referenced_names().len(), 3);
    }

    #[test]
    fn two_named_operands_are_unsupported() {
        let mut names = Names::new();
        let expression = ClassExpression::intersection(vec![class("A"), class("B")]);
        assert!(extract(&mut names, &expression).is_none());
        let same_twice = ClassExpression::intersection(vec![class("A"), class("A")]);
        assert!(extract(&mut names, &same_twice).is_some());
    }

    #[test]
    fn unsupported_shapes() {
        let mut names = Names::new();
        for expression in [
            ClassExpression::complement(class("A")),
            ClassExpression::all_values_from(eats(), class("A")),
            ClassExpression::some_values_from(ObjectPropertyExpression::inverse(eats()), class("A")),
            ClassExpression::data_some_values_from(age(), DataRange::datatype(xsd::STRING.into_owned())),
            ClassExpression::union(Vec::new()),
        ] {
            assert!(extract(&mut names, &expression).is_none(), "{expression}");
        }
    }

    #[test]
    fn unknown_names_make_the_expression_unsupported() {
        let expression = ClassExpression::some_values_from(eats(), class("Meat"));
        let description = Extractor::new(|_| None).description(&expression);
        assert!(description.is_none());
    }

    #[test]
    fn numeric_ranges() {
        let restriction = DataRange::restriction(
            xsd::INTEGER.into_owned(),
            [
                (vocab::MIN_INCLUSIVE.into_owned(), Literal::from(18)),
                (vocab::MAX_EXCLUSIVE.into_owned(), Literal::from(65)),
            ],
        );
        let range = number_range(&restriction).unwrap();
        assert_eq!(range.lower(), Some(Bound::inclusive(18.)));
        assert_eq!(range.upper(), Some(Bound::exclusive(65.)));
        assert!(number_range(&DataRange::datatype(xsd::DECIMAL.into_owned())).unwrap().is_unbounded());
        assert_eq!(number(&Literal::new_typed_literal("2.5", xsd::DECIMAL)), Some(2.5));
        assert_eq!(number(&Literal::from(1.5)), Some(1.5));
        assert_eq!(number(&Literal::from("12")), None);

        let mut names = Names::new();
        let adult = ClassExpression::data_some_values_from(age(), restriction);
        assert!(extract(&mut names, &adult).is_some());
        let forty = ClassExpression::data_has_value(age(), Literal::from(40));
        assert!(extract(&mut names, &forty).is_some());
    }
}
