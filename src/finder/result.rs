use log::{error, warn};

use crate::reflection::Class;
use crate::Error;

use super::RuleSet;

/// Outcome of one [`super::Finder::build`]: the matches, or a retryable
/// not-found state.
///
/// Callbacks given to [`FindResult::wait`] / [`FindResult::wait_all`] fire
/// immediately when matches exist, and are otherwise held back until a remedy
/// plan succeeds, so one callback serves both the direct and the retried path.
pub struct FindResult<'a, R: RuleSet> {
    class: &'a Class,
    items: Vec<R::Item>,
    not_found: Option<Error>,
    ignored: bool,
    deferred_one: Vec<Box<dyn FnOnce(R::Item) + 'a>>,
    deferred_all: Vec<Box<dyn FnOnce(Vec<R::Item>) + 'a>>,
}

impl<'a, R: RuleSet> FindResult<'a, R> {
    pub(crate) fn found(class: &'a Class, items: Vec<R::Item>) -> Self {
        FindResult {
            class,
            items,
            not_found: None,
            ignored: false,
            deferred_one: Vec::new(),
            deferred_all: Vec::new(),
        }
    }

    pub(crate) fn missing(class: &'a Class, error: Error) -> Self {
        FindResult {
            class,
            items: Vec::new(),
            not_found: Some(error),
            ignored: false,
            deferred_one: Vec::new(),
            deferred_all: Vec::new(),
        }
    }

    /// First match, when any.
    #[must_use]
    pub fn give(&self) -> Option<&R::Item> {
        self.items.first()
    }

    /// Every match, in selection order.
    #[must_use]
    pub fn give_all(&self) -> &[R::Item] {
        &self.items
    }

    /// First match wrapped for invocation.
    #[must_use]
    pub fn get(&self) -> Option<Instance<R::Item>> {
        self.give().cloned().map(Instance::new)
    }

    /// Every match wrapped for invocation.
    #[must_use]
    pub fn all(&self) -> Vec<Instance<R::Item>> {
        self.items.iter().cloned().map(Instance::new).collect()
    }

    /// `true` while the result carries an unresolved not-found state.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.not_found.is_some()
    }

    /// The not-found error, while unresolved.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.not_found.as_ref()
    }

    /// Suppress the error log a deferred waiter would otherwise emit. Remedy
    /// exhaustion stays visible regardless.
    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Hand the not-found error to `callback`, when the result is unresolved.
    #[must_use]
    pub fn on_not_found(self, callback: impl FnOnce(&Error)) -> Self {
        if let Some(err) = &self.not_found {
            callback(err);
        }
        self
    }

    /// Deliver the first match to `callback` now, or after a remedy succeeds.
    #[must_use]
    pub fn wait(mut self, callback: impl FnOnce(R::Item) + 'a) -> Self {
        match self.items.first() {
            Some(first) => callback(first.clone()),
            None => {
                self.log_missing();
                self.deferred_one.push(Box::new(callback));
            }
        }
        self
    }

    /// Deliver every match to `callback` now, or after a remedy succeeds.
    #[must_use]
    pub fn wait_all(mut self, callback: impl FnOnce(Vec<R::Item>) + 'a) -> Self {
        if self.items.is_empty() {
            self.log_missing();
            self.deferred_all.push(Box::new(callback));
        } else {
            callback(self.items.clone());
        }
        self
    }

    /// Retry an unresolved result through an ordered list of alternative rule
    /// sets.
    ///
    /// The first step with at least one match wins: it fires its own
    /// [`RemedyStep::on_find`] callback plus every deferred `wait` /
    /// `wait_all` callback, and clears the not-found state. An empty plan only
    /// logs a warning. Exhausting every step logs one aggregated error report;
    /// the [`FindResult::ignored`] flag does not silence it.
    #[must_use]
    pub fn remedys(mut self, build: impl FnOnce(&mut RemedyPlan<'a, R>)) -> Self {
        if self.not_found.is_none() {
            return self;
        }
        let mut plan = RemedyPlan { steps: Vec::new() };
        build(&mut plan);
        if plan.steps.is_empty() {
            warn!("RemedyPlan is empty, forgot it?");
            return self;
        }
        let mut failures = Vec::new();
        for (index, step) in plan.steps.into_iter().enumerate() {
            match step.rules.run(self.class) {
                Ok(items) if !items.is_empty() => {
                    self.items = items;
                    self.not_found = None;
                    if let Some(on_find) = step.on_find {
                        on_find(self.items.clone());
                    }
                    if let Some(first) = self.items.first() {
                        for callback in self.deferred_one.drain(..) {
                            callback(first.clone());
                        }
                    }
                    let all = self.items.clone();
                    for callback in self.deferred_all.drain(..) {
                        callback(all.clone());
                    }
                    return self;
                }
                Ok(_) => failures.push(format!("Plan[{index}] matched nothing")),
                Err(e) => failures.push(format!("Plan[{index}] failed: {e}")),
            }
        }
        let mut report = format!(
            "RemedyPlan exhausted in [{}], all {} plan(s) failed:",
            self.class.name(),
            failures.len()
        );
        for failure in &failures {
            report.push_str("\n -> ");
            report.push_str(failure);
        }
        // exhaustion must never be silent
        error!("{report}");
        self
    }

    fn log_missing(&self) {
        if !self.ignored {
            if let Some(err) = &self.not_found {
                error!("{err}");
            }
        }
    }
}

/// Ordered alternative rule sets for retrying a failed resolution.
pub struct RemedyPlan<'a, R: RuleSet> {
    steps: Vec<RemedyStep<'a, R>>,
}

impl<'a, R: RuleSet> RemedyPlan<'a, R> {
    /// Append one alternative rule set, tried in registration order.
    pub fn attempt(&mut self, build: impl FnOnce(&mut R)) -> &mut RemedyStep<'a, R> {
        let mut rules = R::default();
        build(&mut rules);
        let index = self.steps.len();
        self.steps.push(RemedyStep {
            rules,
            on_find: None,
        });
        &mut self.steps[index]
    }
}

/// One registered alternative of a [`RemedyPlan`].
pub struct RemedyStep<'a, R: RuleSet> {
    rules: R,
    on_find: Option<Box<dyn FnOnce(Vec<R::Item>) + 'a>>,
}

impl<'a, R: RuleSet> RemedyStep<'a, R> {
    /// Fire `callback` when this step is the one that succeeds.
    pub fn on_find(&mut self, callback: impl FnOnce(Vec<R::Item>) + 'a) {
        self.on_find = Some(Box::new(callback));
    }
}

/// A resolved member ready for invocation.
///
/// The actual call goes through a caller-supplied adapter closure, keeping the
/// runtime bridge outside this crate: the instance only pairs the member with
/// whatever receiver and arguments the adapter understands.
#[derive(Clone, Debug)]
pub struct Instance<M> {
    member: M,
}

impl<M> Instance<M> {
    pub(crate) fn new(member: M) -> Self {
        Instance { member }
    }

    /// The resolved member.
    #[must_use]
    pub fn member(&self) -> &M {
        &self.member
    }

    /// Unwrap the resolved member.
    #[must_use]
    pub fn into_member(self) -> M {
        self.member
    }

    /// Invoke through an adapter: `invoke(member, receiver, args)`.
    pub fn call<Recv, Args, Out>(
        &self,
        receiver: Recv,
        args: Args,
        invoke: impl FnOnce(&M, Recv, Args) -> Out,
    ) -> Out {
        invoke(&self.member, receiver, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::FunctionFinder;
    use crate::reflection::{ClassBuilder, ClassRef, Modifiers, Parameter};
    use crate::typesystem::TypeToken;
    use std::cell::Cell;

    fn sample() -> ClassRef {
        ClassBuilder::new("demo.T", "app")
            .function("f", TypeToken::Unit, vec![], Modifiers::PUBLIC)
            .function(
                "f",
                TypeToken::Unit,
                vec![Parameter::new("a", TypeToken::concrete("int", "app"))],
                Modifiers::PUBLIC,
            )
            .build()
    }

    #[test]
    fn wait_fires_immediately_on_success() {
        let class = sample();
        let fired = Cell::new(false);
        let _result = FunctionFinder::new(&class)
            .apply(|rules| {
                rules.name("f");
            })
            .build()
            .unwrap()
            .wait(|member| {
                assert_eq!(member.name, "f");
                fired.set(true);
            });
        assert!(fired.get());
    }

    #[test]
    fn remedy_first_success_wins_and_drains_waiters() {
        let class = sample();
        let waited = Cell::new(0);
        let plan_hits = Cell::new(0);
        let result = FunctionFinder::new(&class)
            .apply(|rules| {
                rules.name("missing");
            })
            .build()
            .unwrap()
            .ignored()
            .wait_all(|members| {
                waited.set(waited.get() + members.len());
            })
            .remedys(|plan| {
                plan.attempt(|rules| {
                    rules.name("still_missing");
                })
                .on_find(|_| panic!("failing plan must not fire"));
                plan.attempt(|rules| {
                    rules.name("f");
                    rules.param_count(1);
                })
                .on_find(|members| {
                    plan_hits.set(plan_hits.get() + members.len());
                });
            });
        assert!(!result.is_not_found());
        assert_eq!(result.give_all().len(), 1);
        // the shared waiter and the per-plan callback each fired exactly once
        assert_eq!(waited.get(), 1);
        assert_eq!(plan_hits.get(), 1);
    }

    #[test]
    fn remedy_exhaustion_keeps_the_not_found_state() {
        let class = sample();
        let result = FunctionFinder::new(&class)
            .apply(|rules| {
                rules.name("missing");
            })
            .build()
            .unwrap()
            .ignored()
            .remedys(|plan| {
                plan.attempt(|rules| {
                    rules.name("also_missing");
                });
            });
        assert!(result.is_not_found());
        assert!(result.give().is_none());
    }

    #[test]
    fn empty_plan_changes_nothing() {
        let class = sample();
        let result = FunctionFinder::new(&class)
            .apply(|rules| {
                rules.name("missing");
            })
            .build()
            .unwrap()
            .ignored()
            .remedys(|_| {});
        assert!(result.is_not_found());
    }

    #[test]
    fn instance_forwards_through_the_adapter() {
        let class = sample();
        let result = FunctionFinder::new(&class)
            .apply(|rules| {
                rules.name("f");
                rules.param_count(1);
            })
            .build()
            .unwrap();
        let instance = result.get().unwrap();
        let outcome = instance.call("receiver", 41, |member, recv, arg| {
            format!("{recv}.{}({arg})", member.name)
        });
        assert_eq!(outcome, "receiver.f(41)");
    }
}
