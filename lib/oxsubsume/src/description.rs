//! Structured class expressions and their structural subsumption test.
//!
//! A [`Description`] is an optional name plus a list of successors. At class level the name is
//! a class and the successors are the conjuncts of the expression. A successor
//! [`Description`] is a property restriction: its name is the property and its successors are
//! the filler. `ObjectSomeValuesFrom(eats Meat)` is therefore
//! `Description(eats, [Description(Meat, [])])`.

use crate::name::{NameId, NameSet};
use crate::names::Names;
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;

/// A successor of a [`Description`].
#[derive(Debug, Clone)]
pub enum Expression {
    /// A conjunction of a name and successors
    Description(Description),
    /// A union of descriptions
    Disjunction(Disjunction),
    /// A numeric interval, the filler of a data restriction
    Range(NumberRange),
}

impl Expression {
    /// Structural subsumption: every instance of `other` is an instance of `self`.
    pub fn subsumes(&self, other: &Expression, names: &Names) -> bool {
        match (self, other) {
            (Self::Description(a), Self::Description(b)) => a.subsumes(b, names),
            (Self::Description(a), Self::Disjunction(b)) => {
                b.disjuncts.iter().all(|d| a.subsumes(d, names))
            }
            (Self::Disjunction(a), Self::Description(b)) => {
                a.disjuncts.iter().any(|d| d.subsumes(b, names))
            }
            (Self::Disjunction(a), Self::Disjunction(b)) => b
                .disjuncts
                .iter()
                .all(|d| a.disjuncts.iter().any(|e| e.subsumes(d, names))),
            (Self::Range(a), Self::Range(b)) => a.contains(b),
            (Self::Range(_), _) | (_, Self::Range(_)) => false,
        }
    }

    fn collect_referenced(&self, into: &mut NameSet) {
        match self {
            Self::Description(d) => {
                into.extend(&d.referenced);
            }
            Self::Disjunction(d) => {
                into.extend(&d.referenced);
            }
            Self::Range(_) => {}
        }
    }

    fn size(&self) -> usize {
        match self {
            Self::Description(d) => d.size(),
            Self::Disjunction(d) => 1 + d.disjuncts.iter().map(Description::size).sum::<usize>(),
            Self::Range(_) => 1,
        }
    }

    fn reset_caches(&mut self) {
        match self {
            Self::Description(d) => d.reset_caches(),
            Self::Disjunction(d) => {
                for disjunct in &mut d.disjuncts {
                    disjunct.reset_caches();
                }
            }
            Self::Range(_) => {}
        }
    }
}

impl From<Description> for Expression {
    fn from(description: Description) -> Self {
        Self::Description(description)
    }
}

impl From<Disjunction> for Expression {
    fn from(disjunction: Disjunction) -> Self {
        Self::Disjunction(disjunction)
    }
}

impl From<NumberRange> for Expression {
    fn from(range: NumberRange) -> Self {
        Self::Range(range)
    }
}

/// An optional name and the successors that must all hold.
///
/// A description without name is the top of its level: `owl:Thing` for classes, any property
/// for restrictions.
#[derive(Debug, Clone)]
pub struct Description {
    name: Option<NameId>,
    successors: Vec<Expression>,
    /// Names mentioned anywhere below, disjunctions included.
    referenced: NameSet,
    /// Names any description subsumed by this one has to reach, disjunctions excluded.
    required: NameSet,
    /// `referenced` with the equivalents and ancestors of its members.
    subsumers: OnceCell<NameSet>,
}

impl Description {
    pub fn new(name: Option<NameId>, successors: Vec<Expression>) -> Self {
        let mut referenced = NameSet::new();
        let mut required = NameSet::new();
        if let Some(name) = name {
            referenced.insert(name);
            required.insert(name);
        }
        for successor in &successors {
            successor.collect_referenced(&mut referenced);
            if let Expression::Description(d) = successor {
                required.extend(&d.required);
            }
        }
        Self {
            name,
            successors,
            referenced,
            required,
            subsumers: OnceCell::new(),
        }
    }

    /// A named description without successors.
    pub fn named(name: NameId) -> Self {
        Self::new(Some(name), Vec::new())
    }

    /// The unconstrained description.
    pub fn top() -> Self {
        Self::new(None, Vec::new())
    }

    #[inline]
    pub fn name(&self) -> Option<NameId> {
        self.name
    }

    #[inline]
    pub fn successors(&self) -> &[Expression] {
        &self.successors
    }

    /// `true` if the description is a bare name.
    pub fn is_named_only(&self) -> bool {
        self.name.is_some() && self.successors.is_empty()
    }

    /// Every name mentioned by this description.
    #[inline]
    pub fn referenced_names(&self) -> &NameSet {
        &self.referenced
    }

    /// The referenced names together with everything that subsumes them.
    pub fn subsumers<'a>(&'a self, names: &Names) -> &'a NameSet {
        self.subsumers.get_or_init(|| {
            let mut subsumers = NameSet::new();
            for name in &self.referenced {
                subsumers.insert(name);
                subsumers.extend(names[name].equivalents());
                subsumers.extend(names[name].ancestors());
            }
            subsumers
        })
    }

    /// `true` if a change to one of `updateds` may change what this description subsumes
    /// or is subsumed by.
    pub fn depends_on(&self, updateds: &NameSet, names: &Names) -> bool {
        self.referenced.contains_any(updateds) || self.subsumers(names).contains_any(updateds)
    }

    /// Number of nodes in the expression tree, a complexity measure.
    pub fn size(&self) -> usize {
        1 + self.successors.iter().map(Expression::size).sum::<usize>()
    }

    /// Orders descriptions from the least to the most complex.
    pub fn cmp_complexity(&self, other: &Self) -> Ordering {
        self.referenced
            .len()
            .cmp(&other.referenced.len())
            .then_with(|| self.size().cmp(&other.size()))
    }

    /// Structural subsumption between two descriptions.
    pub fn subsumes(&self, other: &Description, names: &Names) -> bool {
        let name_subsumes = match (self.name, other.name) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) => names.subsumes(a, b),
        };
        name_subsumes
            && other.subsumers(names).contains_all(&self.required)
            && self.successors.iter().all(|successor| {
                other
                    .successors
                    .iter()
                    .any(|candidate| successor.subsumes(candidate, names))
            })
    }

    /// Drops the caches depending on ancestor sets, recursively.
    pub fn reset_caches(&mut self) {
        self.subsumers.take();
        for successor in &mut self.successors {
            successor.reset_caches();
        }
    }
}

/// A union of descriptions.
#[derive(Debug, Clone)]
pub struct Disjunction {
    disjuncts: Vec<Description>,
    referenced: NameSet,
}

impl Disjunction {
    pub fn new(disjuncts: Vec<Description>) -> Self {
        let mut referenced = NameSet::new();
        for disjunct in &disjuncts {
            referenced.extend(&disjunct.referenced);
        }
        Self {
            disjuncts,
            referenced,
        }
    }

    #[inline]
    pub fn disjuncts(&self) -> &[Description] {
        &self.disjuncts
    }
}

/// An end of a [`NumberRange`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// A numeric interval. A missing bound is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberRange {
    lower: Option<Bound>,
    upper: Option<Bound>,
}

impl NumberRange {
    /// The range of every number.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// The range holding exactly `value`.
    pub fn point(value: f64) -> Self {
        Self {
            lower: Some(Bound::inclusive(value)),
            upper: Some(Bound::inclusive(value)),
        }
    }

    pub fn new(lower: Option<Bound>, upper: Option<Bound>) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub fn lower(&self) -> Option<Bound> {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> Option<Bound> {
        self.upper
    }

    /// Tightens the lower bound.
    #[must_use]
    pub fn with_lower(mut self, bound: Bound) -> Self {
        let tighter = match self.lower {
            None => true,
            Some(current) => {
                bound.value > current.value
                    || (bound.value == current.value && current.inclusive && !bound.inclusive)
            }
        };
        if tighter {
            self.lower = Some(bound);
        }
        self
    }

    /// Tightens the upper bound.
    #[must_use]
    pub fn with_upper(mut self, bound: Bound) -> Self {
        let tighter = match self.upper {
            None => true,
            Some(current) => {
                bound.value < current.value
                    || (bound.value == current.value && current.inclusive && !bound.inclusive)
            }
        };
        if tighter {
            self.upper = Some(bound);
        }
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// `true` if no number lies in the range.
    pub fn is_empty(&self) -> bool {
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) => {
                lower.value > upper.value
                    || (lower.value == upper.value && !(lower.inclusive && upper.inclusive))
            }
            _ => false,
        }
    }

    /// Interval containment.
    pub fn contains(&self, other: &NumberRange) -> bool {
        if other.is_empty() {
            return true;
        }
        let lower = match (self.lower, other.lower) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(mine), Some(theirs)) => {
                mine.value < theirs.value
                    || (mine.value == theirs.value && (mine.inclusive || !theirs.inclusive))
            }
        };
        let upper = match (self.upper, other.upper) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(mine), Some(theirs)) => {
                mine.value > theirs.value
                    || (mine.value == theirs.value && (mine.inclusive || !theirs.inclusive))
            }
        };
        lower && upper
    }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lower {
            Some(Bound {
                value,
                inclusive: true,
            }) => write!(f, "[{value}")?,
            Some(Bound {
                value,
                inclusive: false,
            }) => write!(f, "]{value}")?,
            None => f.write_str("]-inf")?,
        }
        f.write_str(", ")?;
        match self.upper {
            Some(Bound {
                value,
                inclusive: true,
            }) => write!(f, "{value}]"),
            Some(Bound {
                value,
                inclusive: false,
            }) => write!(f, "{value}["),
            None => f.write_str("+inf["),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, ObjectProperty, OwlClass};

    fn class(names: &mut Names, name: &str) -> NameId {
        names.intern(Entity::from(
            OwlClass::new_from_iri(format!("http://example.org/{name}")).unwrap(),
        ))
    }

    fn property(names: &mut Names, name: &str) -> NameId {
        names.intern(Entity::from(
            ObjectProperty::new_from_iri(format!("http://example.org/{name}")).unwrap(),
        ))
    }

    fn some(property: NameId, filler: Description) -> Expression {
        Description::new(Some(property), vec![filler.into()]).into()
    }

    #[test]
    fn names_follow_hierarchy() {
        let mut names = Names::new();
        let animal = class(&mut names, "Animal");
        let dog = class(&mut names, "Dog");
        names.add_told_super(dog, animal);
        names.refresh().unwrap();

        let animal = Description::named(animal);
        let dog = Description::named(dog);
        assert!(animal.subsumes(&dog, &names));
        assert!(!dog.subsumes(&animal, &names));
        assert!(dog.subsumes(&dog, &names));
        assert!(Description::top().subsumes(&dog, &names));
        assert!(!dog.subsumes(&Description::top(), &names));
    }

    #[test]
    fn successors_cover_rather_than_match() {
        let mut names = Names::new();
        let person = class(&mut names, "Person");
        let dog = class(&mut names, "Dog");
        let cat = class(&mut names, "Cat");
        let owns = property(&mut names, "owns");
        names.refresh().unwrap();

        let dog_owner = Description::new(Some(person), vec![some(owns, Description::named(dog))]);
        let pet_lover = Description::new(
            Some(person),
            vec![
                some(owns, Description::named(dog)),
                some(owns, Description::named(cat)),
            ],
        );
        assert!(dog_owner.subsumes(&pet_lover, &names));
        assert!(!pet_lover.subsumes(&dog_owner, &names));
        let owner = Description::new(Some(person), vec![some(owns, Description::top())]);
        assert!(owner.subsumes(&dog_owner, &names));
        assert!(!dog_owner.subsumes(&owner, &names));
    }

    #[test]
    fn property_hierarchy_is_used() {
        let mut names = Names::new();
        let has_part = property(&mut names, "hasPart");
        let has_wheel = property(&mut names, "hasWheel");
        let wheel = class(&mut names, "Wheel");
        names.add_told_super(has_wheel, has_part);
        names.refresh().unwrap();

        let with_part = Description::new(None, vec![some(has_part, Description::named(wheel))]);
        let with_wheel = Description::new(None, vec![some(has_wheel, Description::named(wheel))]);
        assert!(with_part.subsumes(&with_wheel, &names));
        assert!(!with_wheel.subsumes(&with_part, &names));
    }

    #[test]
    fn disjunctions() {
        let mut names = Names::new();
        let pet = class(&mut names, "Pet");
        let dog = class(&mut names, "Dog");
        let cat = class(&mut names, "Cat");
        let fish = class(&mut names, "Fish");
        names.add_told_super(dog, pet);
        names.add_told_super(cat, pet);
        names.refresh().unwrap();

        let dog_or_cat: Expression =
            Disjunction::new(vec![Description::named(dog), Description::named(cat)]).into();
        let dog_cat_or_fish: Expression = Disjunction::new(vec![
            Description::named(dog),
            Description::named(cat),
            Description::named(fish),
        ])
        .into();
        let pet: Expression = Description::named(pet).into();
        let dog: Expression = Description::named(dog).into();

        assert!(pet.subsumes(&dog_or_cat, &names));
        assert!(!pet.subsumes(&dog_cat_or_fish, &names));
        assert!(dog_or_cat.subsumes(&dog, &names));
        assert!(dog_cat_or_fish.subsumes(&dog_or_cat, &names));
        assert!(!dog_or_cat.subsumes(&dog_cat_or_fish, &names));
    }

    #[test]
    fn ranges() {
        let adult = NumberRange::unbounded().with_lower(Bound::inclusive(18.));
        let senior = NumberRange::unbounded().with_lower(Bound::inclusive(65.));
        let teen = NumberRange::new(Some(Bound::inclusive(13.)), Some(Bound::exclusive(20.)));
        assert!(adult.contains(&senior));
        assert!(!senior.contains(&adult));
        assert!(!adult.contains(&teen));
        assert!(NumberRange::unbounded().contains(&teen));
        assert!(teen.contains(&NumberRange::point(13.)));
        assert!(!teen.contains(&NumberRange::point(20.)));
        assert_eq!(
            NumberRange::unbounded()
                .with_lower(Bound::exclusive(18.))
                .with_lower(Bound::inclusive(18.))
                .lower(),
            Some(Bound::exclusive(18.))
        );
        assert!(NumberRange::new(Some(Bound::exclusive(1.)), Some(Bound::exclusive(1.))).is_empty());
        assert_eq!(teen.to_string(), "[13, 20[");
        assert!(!Expression::from(adult).subsumes(&Description::top().into(), &Names::new()));
    }

    #[test]
    fn subsumer_cache_is_reset() {
        let mut names = Names::new();
        let animal = class(&mut names, "Animal");
        let dog = class(&mut names, "Dog");
        names.refresh().unwrap();
        let mut description = Description::named(dog);
        assert!(!description.subsumers(&names).contains(animal));

        names.add_told_super(dog, animal);
        names.refresh().unwrap();
        description.reset_caches();
        assert!(description.subsumers(&names).contains(animal));
        let mut updateds = NameSet::new();
        updateds.insert(animal);
        assert!(description.depends_on(&updateds, &names));
    }

    #[test]
    fn complexity_order() {
        let mut names = Names::new();
        let a = class(&mut names, "A");
        let p = property(&mut names, "p");
        let simple = Description::named(a);
        let complex = Description::new(Some(a), vec![some(p, Description::named(a))]);
        assert_eq!(simple.cmp_complexity(&complex), Ordering::Less);
    }
}
