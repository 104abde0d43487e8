//! The matching engine: rule sets applied to candidate sequences.
//!
//! Two resolution paths share one selection core. The live path matches a rule
//! set against the members the reflection facility enumerated; the signature
//! path matches the same rule set against the decoded descriptor records of a
//! type, comparing types by JVM descriptor erasure. Both recurse into the
//! ancestor chain when asked, and both raise [`crate::Error::NotFound`] with a
//! diagnostic listing every active predicate when nothing qualifies.
//!
//! Selection semantics live in [`engine`]: every active predicate category is
//! evaluated independently with its own running match counter, the results are
//! ANDed, and the match/order tie-break axes pick among the hits.

mod engine;

use std::time::Instant;

use log::debug;

use crate::descriptor::{DescriptorRecord, RecordKind, SubSignature};
use crate::reflection::{Class, ClassRef, Member, MemberKind};
use crate::rules::{
    ConstructorRules, FunctionRules, MemberQuery, OrdinalSelect, PropertyRules, TypeRules,
};
use crate::typesystem::{descriptor_type_eq, param_names_eq, param_types_eq, type_eq};
use crate::{Error, Result};

use engine::{run_match, Category};

/// Find every property of `class` matching `rules`.
///
/// An untouched rule set yields all declared properties. An empty match with
/// the ancestor flag set continues the search one ancestor at a time.
///
/// # Errors
/// Returns [`crate::Error::NotFound`] when no property qualifies.
pub fn find_properties(class: &Class, rules: &PropertyRules) -> Result<Vec<Member>> {
    let start = Instant::now();
    let categories = property_categories(rules);
    let found = find_members(
        class,
        MemberKind::Property,
        &categories,
        rules.match_index,
        rules.order_index,
        rules.find_in_ancestor,
        rules.is_initialized(),
        &rules.templates(),
    )?;
    debug!(
        "Took {:?} to resolve {} property candidate(s) in [{}]",
        start.elapsed(),
        found.len(),
        class.name()
    );
    Ok(found)
}

/// Find every function of `class` matching `rules`.
///
/// # Errors
/// Returns [`crate::Error::Configuration`] for an all-placeholder parameter
/// type list and [`crate::Error::NotFound`] when no function qualifies.
pub fn find_functions(class: &Class, rules: &FunctionRules) -> Result<Vec<Member>> {
    rules.validate()?;
    let start = Instant::now();
    let categories = function_categories(rules);
    let found = find_members(
        class,
        MemberKind::Function,
        &categories,
        rules.match_index,
        rules.order_index,
        rules.find_in_ancestor,
        rules.is_initialized(),
        &rules.templates(),
    )?;
    debug!(
        "Took {:?} to resolve {} function candidate(s) in [{}]",
        start.elapsed(),
        found.len(),
        class.name()
    );
    Ok(found)
}

/// Find every constructor of `class` matching `rules`.
///
/// # Errors
/// Returns [`crate::Error::Configuration`] for an all-placeholder parameter
/// type list and [`crate::Error::NotFound`] when no constructor qualifies.
pub fn find_constructors(class: &Class, rules: &ConstructorRules) -> Result<Vec<Member>> {
    rules.validate()?;
    let start = Instant::now();
    let categories = constructor_categories(rules);
    let found = find_members(
        class,
        MemberKind::Constructor,
        &categories,
        rules.match_index,
        rules.order_index,
        rules.find_in_ancestor,
        rules.is_initialized(),
        &rules.templates(),
    )?;
    debug!(
        "Took {:?} to resolve {} constructor candidate(s) in [{}]",
        start.elapsed(),
        found.len(),
        class.name()
    );
    Ok(found)
}

/// Find every candidate type matching `rules`.
///
/// An untouched rule set yields the first candidate. Each embedded member
/// query runs the full member selection against the candidate type and checks
/// the resulting count.
///
/// # Errors
/// Returns [`crate::Error::Configuration`] when an embedded query is invalid
/// and [`crate::Error::NotFound`] when no type qualifies.
pub fn find_types(candidates: &[ClassRef], rules: &TypeRules) -> Result<Vec<ClassRef>> {
    for query in &rules.queries {
        match query {
            MemberQuery::Function(member_rules, _) => member_rules.validate()?,
            MemberQuery::Constructor(member_rules, _) => member_rules.validate()?,
            MemberQuery::Property(..) => {}
        }
    }
    let start = Instant::now();
    if !rules.is_initialized() {
        return match candidates.first() {
            Some(first) => Ok(vec![first.clone()]),
            None => Err(not_found_types(candidates, rules)),
        };
    }
    let selected: Vec<ClassRef> = candidates
        .iter()
        .filter(|class| type_matches(class, rules))
        .cloned()
        .collect();
    debug!(
        "Took {:?} to resolve {} type candidate(s) out of {}",
        start.elapsed(),
        selected.len(),
        candidates.len()
    );
    if selected.is_empty() {
        return Err(not_found_types(candidates, rules));
    }
    Ok(selected)
}

/// Find every descriptor record of `class` matching a function rule set.
///
/// Matching runs over the decoded descriptor table instead of the live member
/// view, comparing types by JVM descriptor erasure. A rule name of the
/// `<get-x>` / `<set-x>` form additionally matches the getter and setter
/// sub-signatures of property records, surfaced as function-shaped records.
/// Categories a descriptor cannot answer (parameter names, modifiers, type
/// condition closures) are ignored on this path. A type without descriptor
/// metadata yields an empty result rather than an error.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for a damaged table,
/// [`crate::Error::Configuration`] for an all-placeholder parameter type list,
/// and [`crate::Error::NotFound`] when the table is present but nothing
/// qualifies.
pub fn find_function_signatures(
    class: &Class,
    rules: &FunctionRules,
) -> Result<Vec<DescriptorRecord>> {
    rules.validate()?;
    let start = Instant::now();
    let mut current = class;
    let found = loop {
        let records = current.descriptor_records()?;
        let candidates = function_signature_candidates(records, rules);
        if !rules.is_initialized() {
            break candidates;
        }
        let categories = function_signature_categories(rules);
        let selected = run_match(&candidates, &categories, rules.match_index, rules.order_index);
        if !selected.is_empty() {
            break selected
                .into_iter()
                .map(|i| candidates[i].clone())
                .collect();
        }
        match (rules.find_in_ancestor, current.ancestor()) {
            (true, Some(ancestor)) => current = ancestor.as_ref(),
            _ if !current.has_descriptor_table() => break Vec::new(),
            _ => {
                return Err(not_found(
                    MemberKind::Function,
                    current,
                    &rules.templates(),
                ))
            }
        }
    };
    debug!(
        "Took {:?} to resolve {} function signature(s) in [{}]",
        start.elapsed(),
        found.len(),
        class.name()
    );
    Ok(found)
}

/// Find every property descriptor record of `class` matching a property rule
/// set.
///
/// Same contract as [`find_function_signatures`]: descriptor-erasure type
/// comparison, ignored unanswerable categories, empty result for a type
/// without descriptor metadata.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for a damaged table and
/// [`crate::Error::NotFound`] when the table is present but nothing qualifies.
pub fn find_property_signatures(
    class: &Class,
    rules: &PropertyRules,
) -> Result<Vec<DescriptorRecord>> {
    let start = Instant::now();
    let mut current = class;
    let found = loop {
        let records = current.descriptor_records()?;
        let candidates: Vec<DescriptorRecord> = records
            .iter()
            .filter(|r| r.kind() == RecordKind::Property)
            .cloned()
            .collect();
        if !rules.is_initialized() {
            break candidates;
        }
        let categories = property_signature_categories(rules);
        let selected = run_match(&candidates, &categories, rules.match_index, rules.order_index);
        if !selected.is_empty() {
            break selected
                .into_iter()
                .map(|i| candidates[i].clone())
                .collect();
        }
        match (rules.find_in_ancestor, current.ancestor()) {
            (true, Some(ancestor)) => current = ancestor.as_ref(),
            _ if !current.has_descriptor_table() => break Vec::new(),
            _ => {
                return Err(not_found(
                    MemberKind::Property,
                    current,
                    &rules.templates(),
                ))
            }
        }
    };
    debug!(
        "Took {:?} to resolve {} property signature(s) in [{}]",
        start.elapsed(),
        found.len(),
        class.name()
    );
    Ok(found)
}

#[allow(clippy::too_many_arguments)]
fn find_members(
    class: &Class,
    kind: MemberKind,
    categories: &[Category<'_, Member>],
    match_index: Option<OrdinalSelect>,
    order_index: Option<OrdinalSelect>,
    find_in_ancestor: bool,
    initialized: bool,
    templates: &[String],
) -> Result<Vec<Member>> {
    if !initialized {
        return Ok(class.members(kind).to_vec());
    }
    let mut current = class;
    loop {
        let candidates = current.members(kind);
        let selected = run_match(candidates, categories, match_index, order_index);
        if !selected.is_empty() {
            return Ok(selected.into_iter().map(|i| candidates[i].clone()).collect());
        }
        match (find_in_ancestor, current.ancestor()) {
            (true, Some(ancestor)) => current = ancestor.as_ref(),
            _ => return Err(not_found(kind, current, templates)),
        }
    }
}

fn type_matches(class: &Class, rules: &TypeRules) -> bool {
    if let Some(name) = &rules.name {
        if class.name() != name {
            return false;
        }
    }
    if let Some(condition) = &rules.name_condition {
        if !condition(class.name()) {
            return false;
        }
    }
    if let Some(condition) = &rules.modifiers {
        if !condition(class.modifiers()) {
            return false;
        }
    }
    rules.queries.iter().all(|query| query_count_holds(class, query))
}

fn query_count_holds(class: &Class, query: &MemberQuery) -> bool {
    let (count_rule, matched) = match query {
        MemberQuery::Property(member_rules, count_rule) => {
            let categories = property_categories(member_rules);
            let selected = run_match(
                class.members(MemberKind::Property),
                &categories,
                member_rules.match_index,
                member_rules.order_index,
            );
            (count_rule, selected.len())
        }
        MemberQuery::Function(member_rules, count_rule) => {
            let categories = function_categories(member_rules);
            let selected = run_match(
                class.members(MemberKind::Function),
                &categories,
                member_rules.match_index,
                member_rules.order_index,
            );
            (count_rule, selected.len())
        }
        MemberQuery::Constructor(member_rules, count_rule) => {
            let categories = constructor_categories(member_rules);
            let selected = run_match(
                class.members(MemberKind::Constructor),
                &categories,
                member_rules.match_index,
                member_rules.order_index,
            );
            (count_rule, selected.len())
        }
    };
    count_rule.admits(matched)
}

fn property_categories(rules: &PropertyRules) -> Vec<Category<'_, Member>> {
    let mut categories = Vec::new();
    if let Some(name) = &rules.name {
        categories.push(Category::new(move |m: &Member| m.name == *name));
    }
    if let Some(condition) = &rules.name_condition {
        categories.push(Category::new(move |m: &Member| condition(&m.name)));
    }
    if let Some(ty) = &rules.ty {
        categories.push(Category::new(move |m: &Member| type_eq(ty, &m.value_type)));
    }
    if let Some(condition) = &rules.type_condition {
        categories.push(Category::new(move |m: &Member| condition(&m.value_type)));
    }
    if let Some(condition) = &rules.modifiers {
        categories.push(Category::new(move |m: &Member| condition(m.modifiers)));
    }
    categories
}

fn function_categories(rules: &FunctionRules) -> Vec<Category<'_, Member>> {
    let mut categories = Vec::new();
    if let Some(name) = &rules.name {
        categories.push(Category::new(move |m: &Member| m.name == *name));
    }
    if let Some(condition) = &rules.name_condition {
        categories.push(Category::new(move |m: &Member| condition(&m.name)));
    }
    if let Some(returns) = &rules.returns {
        categories.push(Category::new(move |m: &Member| {
            type_eq(returns, &m.value_type)
        }));
    }
    if let Some(condition) = &rules.returns_condition {
        categories.push(Category::new(move |m: &Member| condition(&m.value_type)));
    }
    push_param_categories(&mut categories, rules_params_fn(rules));
    if let Some(condition) = &rules.modifiers {
        categories.push(Category::new(move |m: &Member| condition(m.modifiers)));
    }
    categories
}

fn constructor_categories(rules: &ConstructorRules) -> Vec<Category<'_, Member>> {
    let mut categories = Vec::new();
    push_param_categories(&mut categories, rules_params_ctor(rules));
    if let Some(condition) = &rules.modifiers {
        categories.push(Category::new(move |m: &Member| condition(m.modifiers)));
    }
    categories
}

/// The parameter-shape fields shared by function and constructor rules.
struct ParamRules<'a> {
    count: Option<usize>,
    range: Option<std::ops::RangeInclusive<usize>>,
    condition: Option<&'a crate::rules::CountPredicate>,
    types: Option<&'a [crate::typesystem::TypeToken]>,
    names: Option<&'a [String]>,
}

fn rules_params_fn(rules: &FunctionRules) -> ParamRules<'_> {
    ParamRules {
        count: rules.param_count,
        range: rules.param_count_range.clone(),
        condition: rules.param_count_condition.as_ref(),
        types: rules.param_types.as_deref(),
        names: rules.param_names.as_deref(),
    }
}

fn rules_params_ctor(rules: &ConstructorRules) -> ParamRules<'_> {
    ParamRules {
        count: rules.param_count,
        range: rules.param_count_range.clone(),
        condition: rules.param_count_condition.as_ref(),
        types: rules.param_types.as_deref(),
        names: rules.param_names.as_deref(),
    }
}

fn push_param_categories<'a>(categories: &mut Vec<Category<'a, Member>>, params: ParamRules<'a>) {
    if let Some(count) = params.count {
        categories.push(Category::new(move |m: &Member| m.params.len() == count));
    }
    if let Some(range) = params.range {
        categories.push(Category::new(move |m: &Member| {
            range.contains(&m.params.len())
        }));
    }
    if let Some(condition) = params.condition {
        categories.push(Category::new(move |m: &Member| condition(m.params.len())));
    }
    if let Some(types) = params.types {
        categories.push(Category::new(move |m: &Member| {
            param_types_eq(types, &m.params)
        }));
    }
    if let Some(names) = params.names {
        categories.push(Category::new(move |m: &Member| {
            param_names_eq(names, &m.param_names())
        }));
    }
}

fn function_signature_candidates(
    records: &[DescriptorRecord],
    rules: &FunctionRules,
) -> Vec<DescriptorRecord> {
    let mut candidates: Vec<DescriptorRecord> = records
        .iter()
        .filter(|r| r.kind() == RecordKind::Function || r.kind() == RecordKind::Constructor)
        .cloned()
        .collect();
    let accessor_name = rules
        .required_name()
        .is_some_and(|n| n.starts_with("<get-") || n.starts_with("<set-"));
    if accessor_name {
        for record in records.iter().filter(|r| r.kind() == RecordKind::Property) {
            for sub in [record.getter(), record.setter()].into_iter().flatten() {
                candidates.push(accessor_record(sub));
            }
        }
    }
    candidates
}

/// Lift a property accessor sub-signature into a function-shaped record.
fn accessor_record(sub: &SubSignature) -> DescriptorRecord {
    DescriptorRecord {
        kind: RecordKind::Function,
        name: sub.name.clone(),
        signature: sub.signature.clone(),
        field: None,
        getter: None,
        setter: None,
        delegate: None,
        synthetic: None,
    }
}

fn function_signature_categories(rules: &FunctionRules) -> Vec<Category<'_, DescriptorRecord>> {
    let mut categories = Vec::new();
    if let Some(name) = &rules.name {
        categories.push(Category::new(move |r: &DescriptorRecord| r.name == *name));
    }
    if let Some(condition) = &rules.name_condition {
        categories.push(Category::new(move |r: &DescriptorRecord| {
            condition(r.name())
        }));
    }
    if let Some(count) = rules.param_count {
        categories.push(Category::new(move |r: &DescriptorRecord| {
            r.param_descriptors().is_ok_and(|p| p.len() == count)
        }));
    }
    if let Some(range) = &rules.param_count_range {
        categories.push(Category::new(move |r: &DescriptorRecord| {
            r.param_descriptors().is_ok_and(|p| range.contains(&p.len()))
        }));
    }
    if let Some(condition) = &rules.param_count_condition {
        categories.push(Category::new(move |r: &DescriptorRecord| {
            r.param_descriptors().is_ok_and(|p| condition(p.len()))
        }));
    }
    if let Some(types) = &rules.param_types {
        categories.push(Category::new(move |r: &DescriptorRecord| {
            r.param_descriptors().is_ok_and(|p| {
                types.len() == p.len()
                    && types.iter().zip(&p).all(|(t, d)| descriptor_type_eq(t, d))
            })
        }));
    }
    if let Some(returns) = &rules.returns {
        categories.push(Category::new(move |r: &DescriptorRecord| {
            r.return_descriptor()
                .is_ok_and(|d| descriptor_type_eq(returns, d))
        }));
    }
    categories
}

fn property_signature_categories(rules: &PropertyRules) -> Vec<Category<'_, DescriptorRecord>> {
    let mut categories = Vec::new();
    if let Some(name) = &rules.name {
        categories.push(Category::new(move |r: &DescriptorRecord| r.name == *name));
    }
    if let Some(condition) = &rules.name_condition {
        categories.push(Category::new(move |r: &DescriptorRecord| {
            condition(r.name())
        }));
    }
    if let Some(ty) = &rules.ty {
        categories.push(Category::new(move |r: &DescriptorRecord| {
            descriptor_type_eq(ty, r.signature())
        }));
    }
    categories
}

fn not_found(kind: MemberKind, class: &Class, templates: &[String]) -> Error {
    let mut lines = String::new();
    for template in templates {
        lines.push_str(" -> ");
        lines.push_str(template);
        lines.push('\n');
    }
    Error::NotFound {
        kind,
        message: format!(
            "Can't find this {kind} in [{} ({})]:\n{lines}Generated by {}",
            class.name(),
            class.loader(),
            env!("CARGO_PKG_NAME")
        ),
    }
}

fn not_found_types(candidates: &[ClassRef], rules: &TypeRules) -> Error {
    let searched = candidates
        .iter()
        .map(|c| c.name().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let mut lines = String::new();
    for template in rules.templates() {
        lines.push_str(" -> ");
        lines.push_str(&template);
        lines.push('\n');
    }
    Error::NotFound {
        kind: MemberKind::Type,
        message: format!(
            "Can't find this class in [{searched}]:\n{lines}Generated by {}",
            env!("CARGO_PKG_NAME")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::{ClassBuilder, Modifiers, Parameter};
    use crate::typesystem::TypeToken;

    fn int() -> TypeToken {
        TypeToken::concrete("int", "app")
    }

    fn string() -> TypeToken {
        TypeToken::concrete("java.lang.String", "app")
    }

    /// `demo.T` with `f(): Int`, `f(Int): Int`, `f(String): Int`.
    fn overloaded() -> ClassRef {
        ClassBuilder::new("demo.T", "app")
            .function("f", int(), vec![], Modifiers::PUBLIC)
            .function("f", int(), vec![Parameter::new("a", int())], Modifiers::PUBLIC)
            .function(
                "f",
                int(),
                vec![Parameter::new("s", string())],
                Modifiers::PUBLIC,
            )
            .build()
    }

    #[test]
    fn empty_rules_return_every_member() {
        let class = overloaded();
        let found = find_functions(&class, &FunctionRules::new()).unwrap();
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn name_and_param_count_narrow() {
        let class = overloaded();
        let mut rules = FunctionRules::named("f");
        rules.param_count(1);
        let found = find_functions(&class, &rules).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].params[0].ty, int());
        assert_eq!(found[1].params[0].ty, string());
    }

    #[test]
    fn match_axis_selects_one_of_the_hits() {
        let class = overloaded();
        let mut rules = FunctionRules::new();
        rules.param_count(1).first();
        let found = find_functions(&class, &rules).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].params[0].ty, int());
    }

    #[test]
    fn negative_match_target_counts_from_the_end() {
        let class = overloaded();
        let mut rules = FunctionRules::new();
        rules.param_count(1).index(-1);
        let found = find_functions(&class, &rules).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].params[0].ty, string());
    }

    #[test]
    fn not_found_carries_the_templates() {
        let class = overloaded();
        let mut rules = FunctionRules::named("missing");
        rules.param_count(4);
        let err = find_functions(&class, &rules).unwrap_err();
        assert!(err.is_not_found());
        let message = err.to_string();
        assert!(message.contains("Can't find this function in [demo.T (app)]"));
        assert!(message.contains(" -> name:[missing]"));
        assert!(message.contains(" -> paramCount:[4]"));
    }

    #[test]
    fn type_set_requires_member_counts() {
        use crate::rules::CountRule;
        let with_f = overloaded();
        let without_f = ClassBuilder::new("demo.Empty", "app").build();
        let mut rules = TypeRules::new();
        rules.function(FunctionRules::named("f"), CountRule::new().exact(3));
        let found = find_types(&[without_f, with_f.clone()], &rules).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "demo.T");
    }
}
