//! Rule data for declarative member resolution.
//!
//! A rule set is a bag of independently optional predicate categories over one
//! member kind. Every category that is set must hold for a candidate to be
//! selected; an untouched rule set selects every declared member of its kind.
//! Each category setter returns an [`IndexedRule`] token through which the
//! tie-break axes are chosen: the match axis ranks among candidates that
//! satisfy that category, the order axis ranks by raw declaration position.
//!
//! Rule sets are built once per resolution call, handed to the engine in
//! [`crate::resolve`], and discarded.

mod member;
mod types;

pub use member::{ConstructorRules, FunctionRules, PropertyRules};
pub use types::{CountRule, MemberQuery, TypeRules};

use crate::reflection::Modifiers;
use crate::typesystem::TypeToken;

/// Boxed predicate over a candidate name.
pub type NamePredicate = Box<dyn Fn(&str) -> bool>;
/// Boxed predicate over a candidate's declared or returned type.
pub type TypePredicate = Box<dyn Fn(&TypeToken) -> bool>;
/// Boxed predicate over a parameter or member count.
pub type CountPredicate = Box<dyn Fn(usize) -> bool>;
/// Boxed predicate over declaration modifiers.
pub type ModifierPredicate = Box<dyn Fn(Modifiers) -> bool>;

/// One tie-break selection: which match (or position) to keep among several.
///
/// A non-negative `target` with `ascending` keeps the `target`-th hit counting
/// from the first. A negative `target` counts from the end through the original
/// arithmetic `|target| == last - counter`. `ascending == false` ignores
/// `target` and keeps the hit at the last index.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OrdinalSelect {
    /// Requested position; negative counts from the end
    pub target: i64,
    /// `false` selects the last position regardless of `target`
    pub ascending: bool,
}

impl OrdinalSelect {
    /// Select the hit at `target` (negative counts from the end).
    #[must_use]
    pub fn at(target: i64) -> Self {
        OrdinalSelect {
            target,
            ascending: true,
        }
    }

    /// Select the first hit.
    #[must_use]
    pub fn first() -> Self {
        OrdinalSelect::at(0)
    }

    /// Select the last hit.
    #[must_use]
    pub fn last() -> Self {
        OrdinalSelect {
            target: 0,
            ascending: false,
        }
    }

    /// Whether the hit with running counter `counter` is the selected one,
    /// given the last index `last` for this axis.
    pub(crate) fn admits(self, counter: i64, last: i64) -> bool {
        (self.target >= 0 && self.target == counter && self.ascending)
            || (self.target < 0 && -self.target == last - counter && self.ascending)
            || (counter == last && !self.ascending)
    }
}

/// Tie-break token returned by every predicate setter.
///
/// Calling one of [`IndexedRule::index`] / [`IndexedRule::first`] /
/// [`IndexedRule::last`] selects on the match axis; [`IndexedRule::order`]
/// switches to the raw declaration-order axis first. A rule set carries one
/// selection per axis, so the token applied last wins.
pub struct IndexedRule<'a> {
    match_slot: &'a mut Option<OrdinalSelect>,
    order_slot: &'a mut Option<OrdinalSelect>,
}

impl<'a> IndexedRule<'a> {
    pub(crate) fn new(
        match_slot: &'a mut Option<OrdinalSelect>,
        order_slot: &'a mut Option<OrdinalSelect>,
    ) -> Self {
        IndexedRule {
            match_slot,
            order_slot,
        }
    }

    /// Keep the `target`-th match; negative counts from the end.
    pub fn index(self, target: i64) {
        *self.match_slot = Some(OrdinalSelect::at(target));
    }

    /// Keep the first match.
    pub fn first(self) {
        *self.match_slot = Some(OrdinalSelect::first());
    }

    /// Keep the last match.
    pub fn last(self) {
        *self.match_slot = Some(OrdinalSelect::last());
    }

    /// Switch to the raw declaration-order axis.
    #[must_use]
    pub fn order(self) -> OrderedRule<'a> {
        OrderedRule {
            slot: self.order_slot,
        }
    }
}

/// Tie-break token for the raw declaration-order axis.
pub struct OrderedRule<'a> {
    slot: &'a mut Option<OrdinalSelect>,
}

impl OrderedRule<'_> {
    /// Keep the candidate at declaration position `target`; negative counts
    /// from the end.
    pub fn index(self, target: i64) {
        *self.slot = Some(OrdinalSelect::at(target));
    }

    /// Keep the first declared candidate.
    pub fn first(self) {
        *self.slot = Some(OrdinalSelect::first());
    }

    /// Keep the last declared candidate.
    pub fn last(self) {
        *self.slot = Some(OrdinalSelect::last());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_select_forward() {
        let select = OrdinalSelect::at(1);
        assert!(!select.admits(0, 3));
        assert!(select.admits(1, 3));
        assert!(!select.admits(2, 3));
    }

    #[test]
    fn ordinal_select_from_end() {
        // last = 2: -1 selects counter 1, -2 selects counter 0
        assert!(OrdinalSelect::at(-1).admits(1, 2));
        assert!(!OrdinalSelect::at(-1).admits(0, 2));
        assert!(OrdinalSelect::at(-2).admits(0, 2));
    }

    #[test]
    fn out_of_range_negative_admits_no_counter() {
        for counter in 0..=2 {
            assert!(!OrdinalSelect::at(-5).admits(counter, 2));
        }
        // no hits at all: last stays -1
        assert!(!OrdinalSelect::at(-1).admits(-1, -1));
    }

    #[test]
    fn ordinal_select_last() {
        let select = OrdinalSelect::last();
        assert!(select.admits(2, 2));
        assert!(!select.admits(1, 2));
    }

    #[test]
    fn last_token_applied_wins() {
        let mut rules = FunctionRules::new();
        rules.name("f").first();
        rules.param_count(1).last();
        assert_eq!(rules.match_index, Some(OrdinalSelect::last()));
        assert_eq!(rules.order_index, None);
    }

    #[test]
    fn order_axis_is_separate() {
        let mut rules = FunctionRules::new();
        rules.name("f").order().index(2);
        assert_eq!(rules.match_index, None);
        assert_eq!(rules.order_index, Some(OrdinalSelect::at(2)));
    }
}
