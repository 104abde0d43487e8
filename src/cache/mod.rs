//! Weak-referenced memoization of resolution results.
//!
//! Resolution over a large type can be repeated many times with the same rule
//! set, so results are memoized in a process-wide concurrent map keyed by the
//! declaring type's identity, its loader, the member kind, and a descriptor
//! string. Entries hold the declaring type weakly: the cache never keeps a
//! type (or its loader) alive, and a collected entry simply reads as a miss
//! and is evicted on touch.
//!
//! The cache is best-effort under concurrency: racing callers may both run the
//! compute closure, and the later insert wins. Nothing blocks on a compute in
//! flight.

use std::sync::{Arc, OnceLock, Weak};

use dashmap::DashMap;

use crate::reflection::{Class, ClassRef, Member, MemberKind};
use crate::rules::{ConstructorRules, FunctionRules, PropertyRules};
use crate::{resolve, Error, Result};

/// Identity of one memoized resolution.
///
/// The type component is the pointer identity of the `Arc<Class>`, not the
/// structural class identity; two loads of the same class name are distinct
/// keys. The weak reference in the entry guards against a recycled pointer.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CacheKey {
    class_identity: usize,
    loader: String,
    kind: MemberKind,
    descriptor: String,
}

impl CacheKey {
    fn new(class: &ClassRef, kind: MemberKind, descriptor: &str) -> Self {
        CacheKey {
            class_identity: Arc::as_ptr(class) as usize,
            loader: class.loader().to_string(),
            kind,
            descriptor: descriptor.to_string(),
        }
    }
}

struct CacheEntry {
    class: Weak<Class>,
    members: Vec<Member>,
}

/// Concurrent memoization map for resolved members.
#[derive(Default)]
pub struct ResolveCache {
    map: DashMap<CacheKey, CacheEntry>,
}

impl ResolveCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        ResolveCache::default()
    }

    /// The process-wide cache instance used by the `cache_*` front ends.
    #[must_use]
    pub fn global() -> &'static ResolveCache {
        static GLOBAL: OnceLock<ResolveCache> = OnceLock::new();
        GLOBAL.get_or_init(ResolveCache::new)
    }

    /// Return the memoized members for this key, or run `compute` and memoize
    /// its result.
    ///
    /// The descriptor string defaults to the rule set's required name. An
    /// entry whose weak class reference is dead, or whose live reference is no
    /// longer the same allocation, counts as a miss and is removed. A failed
    /// `compute` is never memoized.
    ///
    /// # Errors
    /// Returns [`crate::Error::Configuration`] when neither a descriptor nor a
    /// required name is available, and whatever error `compute` produces.
    pub fn get_or_compute(
        &self,
        class: &ClassRef,
        kind: MemberKind,
        descriptor: Option<&str>,
        required_name: Option<&str>,
        compute: impl FnOnce() -> Result<Vec<Member>>,
    ) -> Result<Vec<Member>> {
        let descriptor = descriptor.or(required_name).ok_or_else(|| {
            Error::Configuration(
                "cache key needs a descriptor or a rule set with a required name".to_string(),
            )
        })?;
        let key = CacheKey::new(class, kind, descriptor);

        if let Some(entry) = self.map.get(&key) {
            match entry.class.upgrade() {
                Some(live) if Arc::ptr_eq(&live, class) => return Ok(entry.members.clone()),
                _ => {
                    drop(entry);
                    self.map.remove(&key);
                }
            }
        }

        // Compute outside the map; concurrent racers may both get here and the
        // later insert wins.
        let members = compute()?;
        self.map.insert(
            key,
            CacheEntry {
                class: Arc::downgrade(class),
                members: members.clone(),
            },
        );
        Ok(members)
    }

    /// Drop the entry for one key, returning whether one was present.
    pub fn evict(&self, class: &ClassRef, kind: MemberKind, descriptor: &str) -> bool {
        self.map
            .remove(&CacheKey::new(class, kind, descriptor))
            .is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.map.clear();
    }

    /// Number of entries currently held, dead ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// `true` when no entry is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Resolve properties of `class` through the process-wide cache.
///
/// `descriptor` defaults to the rule set's required name.
///
/// # Errors
/// Returns [`crate::Error::Configuration`] for an ambiguous cache key and any
/// error of [`crate::resolve::find_properties`].
pub fn cache_property(
    class: &ClassRef,
    descriptor: Option<&str>,
    build: impl FnOnce(&mut PropertyRules),
) -> Result<Vec<Member>> {
    let mut rules = PropertyRules::new();
    build(&mut rules);
    ResolveCache::global().get_or_compute(
        class,
        MemberKind::Property,
        descriptor,
        rules.required_name(),
        || resolve::find_properties(class, &rules),
    )
}

/// Resolve functions of `class` through the process-wide cache.
///
/// `descriptor` defaults to the rule set's required name.
///
/// # Errors
/// Returns [`crate::Error::Configuration`] for an ambiguous cache key and any
/// error of [`crate::resolve::find_functions`].
pub fn cache_function(
    class: &ClassRef,
    descriptor: Option<&str>,
    build: impl FnOnce(&mut FunctionRules),
) -> Result<Vec<Member>> {
    let mut rules = FunctionRules::new();
    build(&mut rules);
    ResolveCache::global().get_or_compute(
        class,
        MemberKind::Function,
        descriptor,
        rules.required_name(),
        || resolve::find_functions(class, &rules),
    )
}

/// Resolve constructors of `class` through the process-wide cache.
///
/// Constructors carry no name, so an explicit `descriptor` is required.
///
/// # Errors
/// Returns [`crate::Error::Configuration`] when `descriptor` is `None` and any
/// error of [`crate::resolve::find_constructors`].
pub fn cache_constructor(
    class: &ClassRef,
    descriptor: Option<&str>,
    build: impl FnOnce(&mut ConstructorRules),
) -> Result<Vec<Member>> {
    let mut rules = ConstructorRules::new();
    build(&mut rules);
    ResolveCache::global().get_or_compute(
        class,
        MemberKind::Constructor,
        descriptor,
        rules.required_name(),
        || resolve::find_constructors(class, &rules),
    )
}
