use std::ops::RangeInclusive;

use crate::reflection::Modifiers;
use crate::typesystem::TypeToken;
use crate::{Error, Result};

use super::{CountPredicate, IndexedRule, ModifierPredicate, NamePredicate, OrdinalSelect, TypePredicate};

/// Rule set over property candidates.
///
/// # Examples
///
/// ```rust
/// use memberscope::rules::PropertyRules;
/// use memberscope::typesystem::TypeToken;
///
/// let mut rules = PropertyRules::new();
/// rules.name("count");
/// rules.ty(TypeToken::concrete("int", "app"));
/// ```
#[derive(Default)]
pub struct PropertyRules {
    pub(crate) name: Option<String>,
    pub(crate) name_condition: Option<NamePredicate>,
    pub(crate) ty: Option<TypeToken>,
    pub(crate) type_condition: Option<TypePredicate>,
    pub(crate) modifiers: Option<ModifierPredicate>,
    pub(crate) match_index: Option<OrdinalSelect>,
    pub(crate) order_index: Option<OrdinalSelect>,
    pub(crate) find_in_ancestor: bool,
}

impl PropertyRules {
    /// An empty rule set, selecting every declared property.
    #[must_use]
    pub fn new() -> Self {
        PropertyRules::default()
    }

    /// A rule set requiring the given name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        let mut rules = PropertyRules::new();
        rules.name(name);
        rules
    }

    /// Require an exact declared name.
    pub fn name(&mut self, name: &str) -> IndexedRule<'_> {
        self.name = Some(name.to_string());
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the declared name to satisfy a predicate.
    pub fn name_condition(&mut self, condition: impl Fn(&str) -> bool + 'static) -> IndexedRule<'_> {
        self.name_condition = Some(Box::new(condition));
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the declared type to be equivalent to the given token.
    pub fn ty(&mut self, ty: TypeToken) -> IndexedRule<'_> {
        self.ty = Some(ty);
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the declared type to satisfy a predicate.
    pub fn type_condition(
        &mut self,
        condition: impl Fn(&TypeToken) -> bool + 'static,
    ) -> IndexedRule<'_> {
        self.type_condition = Some(Box::new(condition));
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the declaration modifiers to satisfy a predicate.
    pub fn modifiers(
        &mut self,
        condition: impl Fn(Modifiers) -> bool + 'static,
    ) -> IndexedRule<'_> {
        self.modifiers = Some(Box::new(condition));
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Continue the search in the ancestor chain when this type has no match.
    pub fn find_in_ancestor(&mut self) -> &mut Self {
        self.find_in_ancestor = true;
        self
    }

    /// The exact name this rule set requires, when one is set.
    #[must_use]
    pub fn required_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.name.is_some()
            || self.name_condition.is_some()
            || self.ty.is_some()
            || self.type_condition.is_some()
            || self.modifiers.is_some()
            || self.match_index.is_some()
            || self.order_index.is_some()
    }

    pub(crate) fn templates(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(name) = &self.name {
            lines.push(format!("name:[{name}]"));
        }
        if self.name_condition.is_some() {
            lines.push("nameConditions:[existed]".to_string());
        }
        if let Some(ty) = &self.ty {
            lines.push(format!("type:[{ty}]"));
        }
        if self.type_condition.is_some() {
            lines.push("typeConditions:[existed]".to_string());
        }
        push_common_templates(&mut lines, self.modifiers.as_ref(), self.match_index, self.order_index);
        lines
    }
}

/// Rule set over function candidates.
///
/// # Examples
///
/// ```rust
/// use memberscope::rules::FunctionRules;
/// use memberscope::typesystem::TypeToken;
///
/// let mut rules = FunctionRules::named("onCreate");
/// rules.param_types(vec![TypeToken::Placeholder, TypeToken::Placeholder]).first();
/// ```
#[derive(Default)]
pub struct FunctionRules {
    pub(crate) name: Option<String>,
    pub(crate) name_condition: Option<NamePredicate>,
    pub(crate) returns: Option<TypeToken>,
    pub(crate) returns_condition: Option<TypePredicate>,
    pub(crate) param_count: Option<usize>,
    pub(crate) param_count_range: Option<RangeInclusive<usize>>,
    pub(crate) param_count_condition: Option<CountPredicate>,
    pub(crate) param_types: Option<Vec<TypeToken>>,
    pub(crate) param_names: Option<Vec<String>>,
    pub(crate) modifiers: Option<ModifierPredicate>,
    pub(crate) match_index: Option<OrdinalSelect>,
    pub(crate) order_index: Option<OrdinalSelect>,
    pub(crate) find_in_ancestor: bool,
}

impl FunctionRules {
    /// An empty rule set, selecting every declared function.
    #[must_use]
    pub fn new() -> Self {
        FunctionRules::default()
    }

    /// A rule set requiring the given name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        let mut rules = FunctionRules::new();
        rules.name(name);
        rules
    }

    /// Require an exact declared name.
    pub fn name(&mut self, name: &str) -> IndexedRule<'_> {
        self.name = Some(name.to_string());
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the declared name to satisfy a predicate.
    pub fn name_condition(&mut self, condition: impl Fn(&str) -> bool + 'static) -> IndexedRule<'_> {
        self.name_condition = Some(Box::new(condition));
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the return type to be equivalent to the given token.
    pub fn returns(&mut self, ty: TypeToken) -> IndexedRule<'_> {
        self.returns = Some(ty);
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the return type to satisfy a predicate.
    pub fn returns_condition(
        &mut self,
        condition: impl Fn(&TypeToken) -> bool + 'static,
    ) -> IndexedRule<'_> {
        self.returns_condition = Some(Box::new(condition));
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require an exact parameter count.
    pub fn param_count(&mut self, count: usize) -> IndexedRule<'_> {
        self.param_count = Some(count);
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the parameter count to fall in an inclusive range.
    pub fn param_count_range(&mut self, range: RangeInclusive<usize>) -> IndexedRule<'_> {
        self.param_count_range = Some(range);
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the parameter count to satisfy a predicate.
    pub fn param_count_condition(
        &mut self,
        condition: impl Fn(usize) -> bool + 'static,
    ) -> IndexedRule<'_> {
        self.param_count_condition = Some(Box::new(condition));
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the positional parameter types; [`TypeToken::Placeholder`]
    /// matches anything at its position.
    pub fn param_types(&mut self, types: Vec<TypeToken>) -> IndexedRule<'_> {
        self.param_types = Some(types);
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the positional parameter names; `""`, `"null"` and `"?"` match
    /// anything at their position.
    pub fn param_names(&mut self, names: Vec<String>) -> IndexedRule<'_> {
        self.param_names = Some(names);
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the declaration modifiers to satisfy a predicate.
    pub fn modifiers(
        &mut self,
        condition: impl Fn(Modifiers) -> bool + 'static,
    ) -> IndexedRule<'_> {
        self.modifiers = Some(Box::new(condition));
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Continue the search in the ancestor chain when this type has no match.
    pub fn find_in_ancestor(&mut self) -> &mut Self {
        self.find_in_ancestor = true;
        self
    }

    /// The exact name this rule set requires, when one is set.
    #[must_use]
    pub fn required_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Reject ambiguous configurations before matching runs.
    ///
    /// # Errors
    /// Returns [`crate::Error::Configuration`] when every requested parameter
    /// type is a placeholder; use a parameter count instead.
    pub(crate) fn validate(&self) -> Result<()> {
        validate_param_types(self.param_types.as_deref())
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.name.is_some()
            || self.name_condition.is_some()
            || self.returns.is_some()
            || self.returns_condition.is_some()
            || self.param_count.is_some()
            || self.param_count_range.is_some()
            || self.param_count_condition.is_some()
            || self.param_types.is_some()
            || self.param_names.is_some()
            || self.modifiers.is_some()
            || self.match_index.is_some()
            || self.order_index.is_some()
    }

    pub(crate) fn templates(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(name) = &self.name {
            lines.push(format!("name:[{name}]"));
        }
        if self.name_condition.is_some() {
            lines.push("nameConditions:[existed]".to_string());
        }
        push_param_templates(
            &mut lines,
            self.param_count,
            self.param_count_range.clone(),
            self.param_count_condition.as_ref(),
            self.param_types.as_deref(),
            self.param_names.as_deref(),
        );
        if let Some(returns) = &self.returns {
            lines.push(format!("returnType:[{returns}]"));
        }
        if self.returns_condition.is_some() {
            lines.push("returnTypeConditions:[existed]".to_string());
        }
        push_common_templates(&mut lines, self.modifiers.as_ref(), self.match_index, self.order_index);
        lines
    }
}

/// Rule set over constructor candidates.
#[derive(Default)]
pub struct ConstructorRules {
    pub(crate) param_count: Option<usize>,
    pub(crate) param_count_range: Option<RangeInclusive<usize>>,
    pub(crate) param_count_condition: Option<CountPredicate>,
    pub(crate) param_types: Option<Vec<TypeToken>>,
    pub(crate) param_names: Option<Vec<String>>,
    pub(crate) modifiers: Option<ModifierPredicate>,
    pub(crate) match_index: Option<OrdinalSelect>,
    pub(crate) order_index: Option<OrdinalSelect>,
    pub(crate) find_in_ancestor: bool,
}

impl ConstructorRules {
    /// An empty rule set, selecting every declared constructor.
    #[must_use]
    pub fn new() -> Self {
        ConstructorRules::default()
    }

    /// Require an exact parameter count.
    pub fn param_count(&mut self, count: usize) -> IndexedRule<'_> {
        self.param_count = Some(count);
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the parameter count to fall in an inclusive range.
    pub fn param_count_range(&mut self, range: RangeInclusive<usize>) -> IndexedRule<'_> {
        self.param_count_range = Some(range);
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the parameter count to satisfy a predicate.
    pub fn param_count_condition(
        &mut self,
        condition: impl Fn(usize) -> bool + 'static,
    ) -> IndexedRule<'_> {
        self.param_count_condition = Some(Box::new(condition));
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the positional parameter types; [`TypeToken::Placeholder`]
    /// matches anything at its position.
    pub fn param_types(&mut self, types: Vec<TypeToken>) -> IndexedRule<'_> {
        self.param_types = Some(types);
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the positional parameter names; `""`, `"null"` and `"?"` match
    /// anything at their position.
    pub fn param_names(&mut self, names: Vec<String>) -> IndexedRule<'_> {
        self.param_names = Some(names);
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Require the declaration modifiers to satisfy a predicate.
    pub fn modifiers(
        &mut self,
        condition: impl Fn(Modifiers) -> bool + 'static,
    ) -> IndexedRule<'_> {
        self.modifiers = Some(Box::new(condition));
        IndexedRule::new(&mut self.match_index, &mut self.order_index)
    }

    /// Continue the search in the ancestor chain when this type has no match.
    pub fn find_in_ancestor(&mut self) -> &mut Self {
        self.find_in_ancestor = true;
        self
    }

    /// Constructors have no name axis; always `None`.
    #[must_use]
    pub fn required_name(&self) -> Option<&str> {
        None
    }

    /// Reject ambiguous configurations before matching runs.
    ///
    /// # Errors
    /// Returns [`crate::Error::Configuration`] when every requested parameter
    /// type is a placeholder; use a parameter count instead.
    pub(crate) fn validate(&self) -> Result<()> {
        validate_param_types(self.param_types.as_deref())
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.param_count.is_some()
            || self.param_count_range.is_some()
            || self.param_count_condition.is_some()
            || self.param_types.is_some()
            || self.param_names.is_some()
            || self.modifiers.is_some()
            || self.match_index.is_some()
            || self.order_index.is_some()
    }

    pub(crate) fn templates(&self) -> Vec<String> {
        let mut lines = Vec::new();
        push_param_templates(
            &mut lines,
            self.param_count,
            self.param_count_range.clone(),
            self.param_count_condition.as_ref(),
            self.param_types.as_deref(),
            self.param_names.as_deref(),
        );
        push_common_templates(&mut lines, self.modifiers.as_ref(), self.match_index, self.order_index);
        lines
    }
}

fn validate_param_types(types: Option<&[TypeToken]>) -> Result<()> {
    if let Some(types) = types {
        if !types.is_empty() && types.iter().all(TypeToken::is_placeholder) {
            return Err(Error::Configuration(
                "paramTypes must not be all placeholders, use paramCount instead".to_string(),
            ));
        }
    }
    Ok(())
}

fn push_param_templates(
    lines: &mut Vec<String>,
    count: Option<usize>,
    range: Option<RangeInclusive<usize>>,
    condition: Option<&CountPredicate>,
    types: Option<&[TypeToken]>,
    names: Option<&[String]>,
) {
    if let Some(count) = count {
        lines.push(format!("paramCount:[{count}]"));
    }
    if let Some(range) = range {
        lines.push(format!("paramCountRange:[{}..{}]", range.start(), range.end()));
    }
    if condition.is_some() {
        lines.push("paramCountConditions:[existed]".to_string());
    }
    if let Some(types) = types {
        let joined = types
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("paramTypes:[{joined}]"));
    }
    if let Some(names) = names {
        lines.push(format!("paramNames:[{}]", names.join(", ")));
    }
}

fn push_common_templates(
    lines: &mut Vec<String>,
    modifiers: Option<&ModifierPredicate>,
    match_index: Option<OrdinalSelect>,
    order_index: Option<OrdinalSelect>,
) {
    if modifiers.is_some() {
        lines.push("modifiers:[existed]".to_string());
    }
    if let Some(select) = match_index {
        lines.push(format!("matchIndex:[({}, {})]", select.target, select.ascending));
    }
    if let Some(select) = order_index {
        lines.push(format!("orderIndex:[({}, {})]", select.target, select.ascending));
    }
}
