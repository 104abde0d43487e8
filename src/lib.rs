// Copyright 2025 memberscope contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # memberscope
//!
//! A declarative member-resolution engine over reflection metadata: given a
//! target type and a composable rule set, locate the property, function, or
//! constructor satisfying the rules, with deterministic tie-breaking when
//! several members qualify. A parallel path recovers member identity from a
//! compact binary descriptor table embedded in compiled output, for members
//! the live reflection view reports unreliably (renamed, synthesized, or not
//! representable).
//!
//! ## Features
//!
//! - **Composable rule sets** - Every predicate category (name, type,
//!   parameter shape, modifiers, closures over any of them) is independently
//!   optional and combined by AND
//! - **Deterministic tie-breaking** - Match-ordinal and declaration-order
//!   selection, including negative "from the end" targets
//! - **Descriptor fallback** - A compact binary overload table decoded lazily
//!   per type and matched by JVM signature erasure
//! - **Remedy plans** - Ordered alternative rule sets retried after a failed
//!   resolution, with deferred result callbacks
//! - **Weak memoization** - A process-wide concurrent cache that never pins a
//!   type alive
//!
//! ## Quick Start
//!
//! ```rust
//! use memberscope::prelude::*;
//!
//! // The embedder bridges its runtime by populating classes.
//! let class = ClassBuilder::new("demo.Greeter", "app")
//!     .function(
//!         "greet",
//!         TypeToken::concrete("java.lang.String", "app"),
//!         vec![Parameter::new("name", TypeToken::concrete("java.lang.String", "app"))],
//!         Modifiers::PUBLIC,
//!     )
//!     .build();
//!
//! let result = FunctionFinder::new(&class)
//!     .apply(|rules| {
//!         rules.name("greet");
//!         rules.param_count(1);
//!     })
//!     .build()?;
//! assert_eq!(result.give().map(|f| f.name.as_str()), Some("greet"));
//! # Ok::<(), memberscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Leaves first: [`typesystem`] defines the [`TypeToken`] union and the
//! structural equivalence comparator every type predicate is built on;
//! [`reflection`] models the embedder-populated view of a type and its
//! members; [`descriptor`] decodes the binary overload table; [`rules`] holds
//! the per-kind rule data and builders; [`resolve`] is the matching engine
//! over both candidate sources; [`cache`] memoizes results weakly; and
//! [`finder`] is the fluent outward contract.

#[macro_use]
pub(crate) mod error;

/// Common types and traits for convenient glob import.
pub mod prelude;

/// Weak-referenced memoization of resolution results.
pub mod cache;
/// Binary descriptor table decoding.
pub mod descriptor;
/// Fluent finders, results, remedy plans and invocation wrappers.
pub mod finder;
/// The embedder-populated introspection view of types and members.
pub mod reflection;
/// Rule data and builders, one set per member kind.
pub mod rules;
/// The matching engine over live members and descriptor records.
pub mod resolve;
/// Type tokens and the structural equivalence comparator.
pub mod typesystem;

/// Convenience `Result` type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;

pub use finder::{ConstructorFinder, Finder, FunctionFinder, PropertyFinder};
pub use reflection::{Class, ClassBuilder, ClassRef, Member, MemberKind, Modifiers, Parameter};
pub use rules::{ConstructorRules, FunctionRules, PropertyRules, TypeRules};
pub use typesystem::{ClassId, TypeToken, Variance};
