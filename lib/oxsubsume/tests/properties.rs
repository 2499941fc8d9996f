//! Property hierarchies and numeric data restrictions.

use oxrdf::vocab::xsd;
use oxrdf::{Literal, NamedNode};
use oxsubsume::{
    Axiom, ClassExpression, Classifier, DataProperty, DataRange, ObjectProperty, Ontology,
    OwlClass, Reasoner,
};

fn class(name: &str) -> OwlClass {
    OwlClass::new_from_iri(format!("http://example.org/{name}")).unwrap()
}

fn object_property(name: &str) -> ObjectProperty {
    ObjectProperty::new_from_iri(format!("http://example.org/{name}")).unwrap()
}

fn data_property(name: &str) -> DataProperty {
    DataProperty::new_from_iri(format!("http://example.org/{name}")).unwrap()
}

fn facet(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://www.w3.org/2001/XMLSchema#{name}"))
}

fn age_range(facets: Vec<(&str, i64)>) -> ClassExpression {
    ClassExpression::data_some_values_from(
        data_property("age"),
        DataRange::restriction(
            xsd::INTEGER.into_owned(),
            facets
                .into_iter()
                .map(|(name, value)| (facet(name), Literal::from(value))),
        ),
    )
}

fn person_with(restriction: ClassExpression) -> ClassExpression {
    ClassExpression::intersection(vec![class("Person").into(), restriction])
}

#[test]
fn test_object_property_hierarchy() {
    let mut ontology = Ontology::new(None);
    ontology.add_axiom(Axiom::sub_object_property_of(
        object_property("hasMother"),
        object_property("hasParent"),
    ));
    ontology.add_axiom(Axiom::sub_object_property_of(
        object_property("hasParent"),
        object_property("hasRelative"),
    ));
    ontology.add_axiom(Axiom::sub_object_property_of(
        object_property("hasMother"),
        object_property("hasRelative"),
    ));
    let classifier = Classifier::new(&ontology).unwrap();

    assert_eq!(
        classifier.super_object_properties(&object_property("hasMother"), true),
        vec![&object_property("hasParent")]
    );
    assert_eq!(
        classifier.super_object_properties(&object_property("hasMother"), false),
        vec![&object_property("hasParent"), &object_property("hasRelative")]
    );
    assert_eq!(
        classifier.sub_object_properties(&object_property("hasRelative"), true),
        vec![&object_property("hasParent")]
    );
    assert_eq!(
        classifier.sub_object_properties(&object_property("hasRelative"), false),
        vec![&object_property("hasMother"), &object_property("hasParent")]
    );
    assert!(
        classifier
            .super_object_properties(&object_property("unknown"), false)
            .is_empty()
    );
}

#[test]
fn test_equivalent_object_properties() {
    let mut ontology = Ontology::new(None);
    ontology.add_axiom(Axiom::EquivalentObjectProperties(vec![
        object_property("hasChild"),
        object_property("hasOffspring"),
    ]));
    ontology.add_axiom(Axiom::sub_object_property_of(
        object_property("hasDaughter"),
        object_property("hasOffspring"),
    ));
    ontology.add_axiom(Axiom::equivalent_classes(vec![
        class("Parent").into(),
        ClassExpression::some_values_from(object_property("hasChild"), ClassExpression::thing()),
    ]));
    ontology.add_axiom(Axiom::subclass_of(
        class("Mother"),
        ClassExpression::some_values_from(
            object_property("hasDaughter"),
            class("Person").into(),
        ),
    ));
    let classifier = Classifier::new(&ontology).unwrap();

    assert_eq!(
        classifier.super_object_properties(&object_property("hasDaughter"), false),
        vec![&object_property("hasChild"), &object_property("hasOffspring")]
    );
    assert_eq!(
        classifier.super_classes(&class("Mother").into(), true),
        vec![&class("Parent")]
    );
}

#[test]
fn test_restriction_on_sub_property() {
    let mut ontology = Ontology::new(None);
    ontology.add_axiom(Axiom::sub_object_property_of(
        object_property("hasDaughter"),
        object_property("hasChild"),
    ));
    ontology.add_axiom(Axiom::equivalent_classes(vec![
        class("Parent").into(),
        person_with(ClassExpression::some_values_from(
            object_property("hasChild"),
            class("Person").into(),
        )),
    ]));
    ontology.add_axiom(Axiom::subclass_of(
        class("Mother"),
        person_with(ClassExpression::some_values_from(
            object_property("hasDaughter"),
            class("Person").into(),
        )),
    ));
    let classifier = Classifier::new(&ontology).unwrap();

    assert_eq!(
        classifier.super_classes(&class("Mother").into(), true),
        vec![&class("Parent")]
    );
    assert_eq!(
        classifier.sub_classes(&class("Person").into(), true),
        vec![&class("Parent")]
    );
}

#[test]
fn test_data_property_hierarchy() {
    let mut ontology = Ontology::new(None);
    ontology.add_axiom(Axiom::sub_data_property_of(
        data_property("ageInYears"),
        data_property("age"),
    ));
    let classifier = Classifier::new(&ontology).unwrap();

    assert_eq!(
        classifier.super_data_properties(&data_property("ageInYears"), true),
        vec![&data_property("age")]
    );
    assert_eq!(
        classifier.sub_data_properties(&data_property("age"), false),
        vec![&data_property("ageInYears")]
    );
    assert!(
        classifier
            .super_data_properties(&data_property("age"), true)
            .is_empty()
    );
}

#[test]
fn test_numeric_ranges() {
    let mut ontology = Ontology::new(None);
    ontology.add_axiom(Axiom::equivalent_classes(vec![
        class("Adult").into(),
        person_with(age_range(vec![("minInclusive", 18)])),
    ]));
    ontology.add_axiom(Axiom::equivalent_classes(vec![
        class("Teenager").into(),
        person_with(age_range(vec![("minInclusive", 13), ("maxExclusive", 20)])),
    ]));
    ontology.add_axiom(Axiom::subclass_of(
        class("Senior"),
        person_with(age_range(vec![("minExclusive", 65)])),
    ));
    ontology.add_axiom(Axiom::subclass_of(
        class("Forty"),
        person_with(ClassExpression::data_has_value(
            data_property("age"),
            Literal::from(40),
        )),
    ));
    ontology.add_axiom(Axiom::subclass_of(
        class("Fifteen"),
        person_with(ClassExpression::data_has_value(
            data_property("age"),
            Literal::new_typed_literal("15.0", xsd::DECIMAL),
        )),
    ));
    let classifier = Classifier::new(&ontology).unwrap();

    assert_eq!(
        classifier.super_classes(&class("Senior").into(), true),
        vec![&class("Adult")]
    );
    assert_eq!(
        classifier.super_classes(&class("Forty").into(), true),
        vec![&class("Adult")]
    );
    assert_eq!(
        classifier.super_classes(&class("Fifteen").into(), true),
        vec![&class("Teenager")]
    );
    assert_eq!(
        classifier.super_classes(&class("Teenager").into(), true),
        vec![&class("Person")]
    );
    assert_eq!(
        classifier.sub_classes(&class("Adult").into(), false),
        vec![&class("Forty"), &class("Senior")]
    );

    let any_age = ClassExpression::data_some_values_from(
        data_property("age"),
        DataRange::datatype(xsd::DECIMAL.into_owned()),
    );
    assert_eq!(
        classifier.sub_classes(&person_with(any_age), true),
        vec![&class("Adult"), &class("Teenager")]
    );
}

#[test]
fn test_non_numeric_data_ranges_are_skipped() {
    let mut ontology = Ontology::new(None);
    ontology.add_axiom(Axiom::equivalent_classes(vec![
        class("Named").into(),
        ClassExpression::data_some_values_from(
            data_property("name"),
            DataRange::datatype(xsd::STRING.into_owned()),
        ),
    ]));
    ontology.add_axiom(Axiom::subclass_of(
        class("Bob"),
        ClassExpression::data_has_value(data_property("name"), Literal::from("Bob")),
    ));
    let classifier = Classifier::new(&ontology).unwrap();

    assert_eq!(classifier.stats().skipped_expressions, 2);
    assert!(classifier.super_classes(&class("Bob").into(), false).is_empty());
}
