use std::ops::RangeInclusive;

use crate::reflection::Modifiers;

use super::{ConstructorRules, CountPredicate, FunctionRules, ModifierPredicate, NamePredicate, PropertyRules};

/// Count constraint attached to an embedded member query.
///
/// With no constraint set the query requires at least one matching member.
#[derive(Default)]
pub struct CountRule {
    pub(crate) exact: Option<usize>,
    pub(crate) range: Option<RangeInclusive<usize>>,
    pub(crate) condition: Option<CountPredicate>,
}

impl CountRule {
    /// No explicit constraint; at least one matching member is required.
    #[must_use]
    pub fn new() -> Self {
        CountRule::default()
    }

    /// Require exactly `count` matching members.
    #[must_use]
    pub fn exact(mut self, count: usize) -> Self {
        self.exact = Some(count);
        self
    }

    /// Require the matching-member count to fall in an inclusive range.
    #[must_use]
    pub fn range(mut self, range: RangeInclusive<usize>) -> Self {
        self.range = Some(range);
        self
    }

    /// Require the matching-member count to satisfy a predicate.
    #[must_use]
    pub fn condition(mut self, condition: impl Fn(usize) -> bool + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    /// Whether a matching-member count satisfies this constraint.
    #[must_use]
    pub fn admits(&self, count: usize) -> bool {
        if self.exact.is_none() && self.range.is_none() && self.condition.is_none() {
            return count > 0;
        }
        self.exact.is_none_or(|e| e == count)
            && self.range.as_ref().is_none_or(|r| r.contains(&count))
            && self.condition.as_ref().is_none_or(|c| c(count))
    }
}

/// One embedded member query of a [`TypeRules`]: member-level rules plus the
/// count constraint applied to how many members match them.
pub enum MemberQuery {
    /// Count properties matching the given rules
    Property(PropertyRules, CountRule),
    /// Count functions matching the given rules
    Function(FunctionRules, CountRule),
    /// Count constructors matching the given rules
    Constructor(ConstructorRules, CountRule),
}

/// Rule set over a sequence of candidate types.
///
/// Filters on the type itself (name, name condition, modifiers) combine with
/// any number of embedded member queries; a candidate type passes when its own
/// filters hold and every query's count constraint is satisfied. An untouched
/// rule set selects the first candidate.
#[derive(Default)]
pub struct TypeRules {
    pub(crate) name: Option<String>,
    pub(crate) name_condition: Option<NamePredicate>,
    pub(crate) modifiers: Option<ModifierPredicate>,
    pub(crate) queries: Vec<MemberQuery>,
}

impl TypeRules {
    /// An empty rule set, selecting the first candidate type.
    #[must_use]
    pub fn new() -> Self {
        TypeRules::default()
    }

    /// Require an exact dotted type name.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    /// Require the dotted type name to satisfy a predicate.
    pub fn name_condition(&mut self, condition: impl Fn(&str) -> bool + 'static) -> &mut Self {
        self.name_condition = Some(Box::new(condition));
        self
    }

    /// Require the type's modifiers to satisfy a predicate.
    pub fn modifiers(&mut self, condition: impl Fn(Modifiers) -> bool + 'static) -> &mut Self {
        self.modifiers = Some(Box::new(condition));
        self
    }

    /// Require `count` properties matching `rules` to be declared.
    pub fn property(&mut self, rules: PropertyRules, count: CountRule) -> &mut Self {
        self.queries.push(MemberQuery::Property(rules, count));
        self
    }

    /// Require `count` functions matching `rules` to be declared.
    pub fn function(&mut self, rules: FunctionRules, count: CountRule) -> &mut Self {
        self.queries.push(MemberQuery::Function(rules, count));
        self
    }

    /// Require `count` constructors matching `rules` to be declared.
    pub fn constructor(&mut self, rules: ConstructorRules, count: CountRule) -> &mut Self {
        self.queries.push(MemberQuery::Constructor(rules, count));
        self
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.name.is_some()
            || self.name_condition.is_some()
            || self.modifiers.is_some()
            || !self.queries.is_empty()
    }

    pub(crate) fn templates(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(name) = &self.name {
            lines.push(format!("name:[{name}]"));
        }
        if self.name_condition.is_some() {
            lines.push("nameConditions:[existed]".to_string());
        }
        if self.modifiers.is_some() {
            lines.push("modifiers:[existed]".to_string());
        }
        for query in &self.queries {
            let kind = match query {
                MemberQuery::Property(..) => "property",
                MemberQuery::Function(..) => "function",
                MemberQuery::Constructor(..) => "constructor",
            };
            lines.push(format!("member:[{kind}]"));
        }
        lines
    }
}
