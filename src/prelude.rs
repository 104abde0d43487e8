//! # memberscope Prelude
//!
//! A convenient prelude for the most commonly used types of the library.
//! Import this module to get quick access to the essentials of rule building
//! and member resolution.
//!
//! # Example
//!
//! ```rust
//! use memberscope::prelude::*;
//!
//! let class = ClassBuilder::new("demo.T", "app")
//!     .property("count", TypeToken::concrete("int", "app"), Modifiers::PUBLIC)
//!     .build();
//! let found = resolve::find_properties(&class, &PropertyRules::named("count"))?;
//! assert_eq!(found.len(), 1);
//! # Ok::<(), memberscope::Error>(())
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all memberscope operations
pub use crate::Error;

/// The result type used throughout memberscope
pub use crate::Result;

// ================================================================================================
// Reflection Model
// ================================================================================================

/// The introspection view of one type and its construction seam
pub use crate::reflection::{Class, ClassBuilder, ClassRef};

/// Member candidates and their metadata
pub use crate::reflection::{Member, MemberKind, Modifiers, Parameter};

// ================================================================================================
// Type System
// ================================================================================================

/// Type tokens, erased class identity and variance
pub use crate::typesystem::{ClassId, TypeToken, Variance};

/// The structural equivalence comparator and its positional lifts
pub use crate::typesystem::{param_names_eq, param_types_eq, type_eq};

// ================================================================================================
// Rules and Resolution
// ================================================================================================

/// Per-kind rule sets
pub use crate::rules::{ConstructorRules, CountRule, FunctionRules, PropertyRules, TypeRules};

/// Tie-break selection
pub use crate::rules::OrdinalSelect;

/// The matching engine entry points
pub use crate::resolve;

// ================================================================================================
// Finders and Results
// ================================================================================================

/// Fluent finders per member kind
pub use crate::finder::{ConstructorFinder, Finder, FunctionFinder, PropertyFinder};

/// Signature-path rule sets over the descriptor table
pub use crate::finder::{FunctionSignatureRules, PropertySignatureRules};

/// Results, remedy plans and invocation wrappers
pub use crate::finder::{FindResult, Instance, RemedyPlan, RuleSet};

// ================================================================================================
// Descriptor Table
// ================================================================================================

/// Decoded overload records and their sub-signatures
pub use crate::descriptor::{DescriptorRecord, RecordKind, SubSignature};

// ================================================================================================
// Caching
// ================================================================================================

/// The weak memoization cache and its per-kind front ends
pub use crate::cache::{cache_constructor, cache_function, cache_property, ResolveCache};
