//! Fluent front end over the matching engine.
//!
//! A [`Finder`] owns one rule set, runs it against a class on
//! [`Finder::build`], and hands back a [`FindResult`] that callers drain
//! through `give` / `wait`, retry through [`RemedyPlan`], or bind into
//! [`Instance`]s. Not-found is a state of the result, not an error the finder
//! propagates; configuration mistakes still fail the build.

mod result;

pub use result::{FindResult, Instance, RemedyPlan, RemedyStep};

use std::ops::{Deref, DerefMut};
use std::time::Instant;

use log::debug;

use crate::descriptor::DescriptorRecord;
use crate::reflection::{Class, Member, MemberKind};
use crate::rules::{ConstructorRules, FunctionRules, PropertyRules};
use crate::{resolve, Result};

/// One runnable rule set: the seam between rule data and the engine.
pub trait RuleSet: Default {
    /// What a successful resolution yields.
    type Item: Clone;

    /// The member kind this rule set selects.
    fn kind() -> MemberKind;

    /// Run the rules against one class.
    ///
    /// # Errors
    /// Whatever the underlying resolution path produces.
    fn run(&self, class: &Class) -> Result<Vec<Self::Item>>;
}

impl RuleSet for PropertyRules {
    type Item = Member;

    fn kind() -> MemberKind {
        MemberKind::Property
    }

    fn run(&self, class: &Class) -> Result<Vec<Member>> {
        resolve::find_properties(class, self)
    }
}

impl RuleSet for FunctionRules {
    type Item = Member;

    fn kind() -> MemberKind {
        MemberKind::Function
    }

    fn run(&self, class: &Class) -> Result<Vec<Member>> {
        resolve::find_functions(class, self)
    }
}

impl RuleSet for ConstructorRules {
    type Item = Member;

    fn kind() -> MemberKind {
        MemberKind::Constructor
    }

    fn run(&self, class: &Class) -> Result<Vec<Member>> {
        resolve::find_constructors(class, self)
    }
}

/// Function rules run against the descriptor table instead of the live view.
#[derive(Default)]
pub struct FunctionSignatureRules(pub FunctionRules);

impl Deref for FunctionSignatureRules {
    type Target = FunctionRules;

    fn deref(&self) -> &FunctionRules {
        &self.0
    }
}

impl DerefMut for FunctionSignatureRules {
    fn deref_mut(&mut self) -> &mut FunctionRules {
        &mut self.0
    }
}

impl RuleSet for FunctionSignatureRules {
    type Item = DescriptorRecord;

    fn kind() -> MemberKind {
        MemberKind::Function
    }

    fn run(&self, class: &Class) -> Result<Vec<DescriptorRecord>> {
        resolve::find_function_signatures(class, &self.0)
    }
}

/// Property rules run against the descriptor table instead of the live view.
#[derive(Default)]
pub struct PropertySignatureRules(pub PropertyRules);

impl Deref for PropertySignatureRules {
    type Target = PropertyRules;

    fn deref(&self) -> &PropertyRules {
        &self.0
    }
}

impl DerefMut for PropertySignatureRules {
    fn deref_mut(&mut self) -> &mut PropertyRules {
        &mut self.0
    }
}

impl RuleSet for PropertySignatureRules {
    type Item = DescriptorRecord;

    fn kind() -> MemberKind {
        MemberKind::Property
    }

    fn run(&self, class: &Class) -> Result<Vec<DescriptorRecord>> {
        resolve::find_property_signatures(class, &self.0)
    }
}

/// One resolution in the making: a class plus the rule set under construction.
///
/// # Examples
///
/// ```rust,no_run
/// use memberscope::finder::FunctionFinder;
/// use memberscope::reflection::Class;
///
/// fn first_handler(class: &Class) -> Option<String> {
///     let result = FunctionFinder::new(class)
///         .apply(|rules| {
///             rules.name_condition(|n| n.starts_with("on"));
///         })
///         .build()
///         .ok()?;
///     result.give().map(|f| f.name.clone())
/// }
/// ```
pub struct Finder<'a, R: RuleSet> {
    class: &'a Class,
    /// The rule set under construction.
    pub rules: R,
}

/// Finder over live properties.
pub type PropertyFinder<'a> = Finder<'a, PropertyRules>;
/// Finder over live functions.
pub type FunctionFinder<'a> = Finder<'a, FunctionRules>;
/// Finder over live constructors.
pub type ConstructorFinder<'a> = Finder<'a, ConstructorRules>;

impl<'a, R: RuleSet> Finder<'a, R> {
    /// Start a finder over `class` with untouched rules.
    #[must_use]
    pub fn new(class: &'a Class) -> Self {
        Finder {
            class,
            rules: R::default(),
        }
    }

    /// Mutate the rule set in place.
    #[must_use]
    pub fn apply(mut self, build: impl FnOnce(&mut R)) -> Self {
        build(&mut self.rules);
        self
    }

    /// Run the rules and wrap the outcome.
    ///
    /// A not-found outcome becomes the result's not-found state rather than an
    /// error, so it can be retried through [`FindResult::remedys`].
    ///
    /// # Errors
    /// Returns [`crate::Error::Configuration`] and decoder errors unchanged.
    pub fn build(self) -> Result<FindResult<'a, R>> {
        let start = Instant::now();
        let outcome = match self.rules.run(self.class) {
            Ok(items) => FindResult::found(self.class, items),
            Err(error) if error.is_not_found() => FindResult::missing(self.class, error),
            Err(error) => return Err(error),
        };
        debug!(
            "Took {:?} to build a {} finder in [{}]",
            start.elapsed(),
            R::kind(),
            self.class.name()
        );
        Ok(outcome)
    }
}
