//! Integration tests for rule-based member resolution.
//!
//! These scenarios exercise the full stack over hand-built classes: predicate
//! combination, tie-break selection on both axes, ancestor fallback, remedy
//! plans, and the memoization cache.

use std::cell::Cell;

use memberscope::prelude::*;

fn int() -> TypeToken {
    TypeToken::concrete("int", "app")
}

fn string() -> TypeToken {
    TypeToken::concrete("java.lang.String", "app")
}

/// `demo.Overloads` declaring `f(): Int`, `f(Int): Int`, `f(String): Int`.
fn overloads() -> ClassRef {
    ClassBuilder::new("demo.Overloads", "app")
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
fn empty_rules_return_the_full_member_list() {
    let class = overloads();
    let found = resolve::find_functions(&class, &FunctionRules::new()).unwrap();
    assert_eq!(found.len(), 3);
    // every kind degrades the same way
    assert!(resolve::find_properties(&class, &PropertyRules::new())
        .unwrap()
        .is_empty());
    assert!(
        resolve::find_constructors(&class, &ConstructorRules::new())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn name_and_param_count_select_both_single_argument_overloads() {
    let class = overloads();
    let mut rules = FunctionRules::named("f");
    rules.param_count(1);
    let found = resolve::find_functions(&class, &rules).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].params[0].ty, int());
    assert_eq!(found[1].params[0].ty, string());
}

#[test]
fn first_match_narrows_to_the_int_overload() {
    let class = overloads();
    let mut rules = FunctionRules::new();
    rules.param_count(1).first();
    let found = resolve::find_functions(&class, &rules).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].params[0].ty, int());
}

#[test]
fn negative_match_target_selects_the_string_overload() {
    // two hits at declaration positions 1 and 2; target -1 resolves through
    // |target| == last - counter with last = 2, selecting counter 1
    let class = overloads();
    let mut rules = FunctionRules::new();
    rules.param_count(1).index(-1);
    let found = resolve::find_functions(&class, &rules).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].params[0].ty, string());
}

#[test]
fn out_of_range_negative_target_selects_nothing() {
    // two hits with last declaration index 2; -5 never satisfies
    // |target| == last - counter, so nothing is selected
    let class = overloads();
    let mut rules = FunctionRules::new();
    rules.param_count(1).index(-5);
    let err = resolve::find_functions(&class, &rules).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn out_of_range_negative_order_target_selects_nothing() {
    // three declarations; raw position axis has last index 2
    let class = overloads();
    let mut rules = FunctionRules::named("f");
    rules.name("f").order().index(-5);
    let err = resolve::find_functions(&class, &rules).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn last_match_selects_the_string_overload() {
    let class = overloads();
    let mut rules = FunctionRules::new();
    rules.param_count(1).last();
    let found = resolve::find_functions(&class, &rules).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].params[0].ty, string());
}

#[test]
fn match_axis_applies_to_every_category_independently() {
    // The name category hits all three declarations, so its 0th match is the
    // zero-argument overload; the param-count category's 0th match is the Int
    // overload. The per-category ordinals never line up on one candidate, so
    // the combination selects nothing.
    let class = overloads();
    let mut rules = FunctionRules::named("f");
    rules.param_count(1).first();
    let err = resolve::find_functions(&class, &rules).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn order_axis_ranks_by_raw_declaration_position() {
    let class = overloads();
    let mut rules = FunctionRules::named("f");
    rules.name("f").order().last();
    let found = resolve::find_functions(&class, &rules).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].params[0].ty, string());
}

#[test]
fn placeholder_strictly_weakens_a_type_filter() {
    let class = overloads();

    let mut strict = FunctionRules::named("f");
    strict.param_types(vec![string()]);
    let strict_found = resolve::find_functions(&class, &strict).unwrap();

    let mut weak = FunctionRules::named("f");
    weak.param_count(1);
    let weak_found = resolve::find_functions(&class, &weak).unwrap();

    // every strict match is also a weak match
    assert_eq!(strict_found.len(), 1);
    assert_eq!(weak_found.len(), 2);
    assert!(strict_found
        .iter()
        .all(|s| weak_found.iter().any(|w| w.ordinal == s.ordinal)));
}

#[test]
fn all_placeholder_param_types_are_a_configuration_error() {
    let class = overloads();
    let mut rules = FunctionRules::named("f");
    rules.param_types(vec![TypeToken::Placeholder]);
    assert!(matches!(
        resolve::find_functions(&class, &rules),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn ancestor_fallback_is_opt_in() {
    let base = ClassBuilder::new("demo.Base", "app")
        .function("inherited", TypeToken::Unit, vec![], Modifiers::PUBLIC)
        .build();
    let derived = ClassBuilder::new("demo.Derived", "app")
        .ancestor(base)
        .function("own", TypeToken::Unit, vec![], Modifiers::PUBLIC)
        .build();

    let mut with = FunctionRules::named("inherited");
    with.find_in_ancestor();
    let found = resolve::find_functions(&derived, &with).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "inherited");

    let without = FunctionRules::named("inherited");
    let err = resolve::find_functions(&derived, &without).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn not_found_diagnostic_lists_every_active_template() {
    let class = overloads();
    let mut rules = FunctionRules::named("g");
    rules.param_count(2);
    rules.returns(TypeToken::Unit);
    let err = resolve::find_functions(&class, &rules).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Can't find this function in [demo.Overloads (app)]"));
    assert!(message.contains(" -> name:[g]"));
    assert!(message.contains(" -> paramCount:[2]"));
    assert!(message.contains(" -> returnType:[unit]"));
    assert!(message.contains("Generated by memberscope"));
}

#[test]
fn remedy_plan_second_attempt_wins_with_one_shared_callback() {
    let class = overloads();
    let successes = Cell::new(0);
    let result = FunctionFinder::new(&class)
        .apply(|rules| {
            rules.name("does_not_exist");
        })
        .build()
        .unwrap()
        .ignored()
        .wait_all(|_| {
            successes.set(successes.get() + 1);
        })
        .remedys(|plan| {
            plan.attempt(|rules| {
                rules.name("also_missing");
            });
            plan.attempt(|rules| {
                rules.name("f");
                rules.param_types(vec![int()]);
            });
        });
    assert!(!result.is_not_found());
    assert_eq!(result.give_all().len(), 1);
    assert_eq!(result.give().unwrap().params[0].ty, int());
    assert_eq!(successes.get(), 1);
}

#[test]
fn type_set_matching_counts_members() {
    let with_three = overloads();
    let with_one = ClassBuilder::new("demo.Single", "app")
        .function("f", int(), vec![], Modifiers::PUBLIC)
        .build();

    let mut rules = TypeRules::new();
    rules.function(FunctionRules::named("f"), CountRule::new().exact(3));
    let found = resolve::find_types(&[with_one.clone(), with_three], &rules).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name(), "demo.Overloads");

    // an untouched rule set picks the first candidate
    let found = resolve::find_types(&[with_one.clone()], &TypeRules::new()).unwrap();
    assert_eq!(found[0].name(), "demo.Single");

    // nothing satisfying the count is a not-found condition
    let mut rules = TypeRules::new();
    rules.function(FunctionRules::named("g"), CountRule::new());
    assert!(resolve::find_types(&[with_one], &rules)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn cache_round_trip_computes_once_per_key() {
    let class = overloads();
    let cache = ResolveCache::new();
    let calls = Cell::new(0);
    let rules = FunctionRules::named("f");
    let compute = || {
        calls.set(calls.get() + 1);
        resolve::find_functions(&class, &rules)
    };
    let first = cache
        .get_or_compute(&class, MemberKind::Function, None, rules.required_name(), compute)
        .unwrap();
    let second = cache
        .get_or_compute(&class, MemberKind::Function, None, rules.required_name(), || {
            calls.set(calls.get() + 1);
            resolve::find_functions(&class, &rules)
        })
        .unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
}

#[test]
fn modifier_predicates_filter_candidates() {
    let class = ClassBuilder::new("demo.Mixed", "app")
        .property("visible", int(), Modifiers::PUBLIC)
        .property("hidden", int(), Modifiers::PRIVATE | Modifiers::STATIC)
        .build();
    let mut rules = PropertyRules::new();
    rules.modifiers(|m| m.contains(Modifiers::PRIVATE));
    let found = resolve::find_properties(&class, &rules).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "hidden");
}

#[test]
fn param_name_wildcards_match_any_position() {
    let class = ClassBuilder::new("demo.Named", "app")
        .function(
            "move_to",
            TypeToken::Unit,
            vec![Parameter::new("x", int()), Parameter::new("y", int())],
            Modifiers::PUBLIC,
        )
        .build();
    let mut rules = FunctionRules::new();
    rules.param_names(vec!["?".to_string(), "y".to_string()]);
    let found = resolve::find_functions(&class, &rules).unwrap();
    assert_eq!(found.len(), 1);

    let mut rules = FunctionRules::new();
    rules.param_names(vec!["x".to_string(), "wrong".to_string()]);
    assert!(resolve::find_functions(&class, &rules).is_err());
}
