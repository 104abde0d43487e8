use thiserror::Error;

use crate::reflection::MemberKind;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The taxonomy follows the three failure classes of the resolution core:
///
/// ## Configuration Errors
/// - [`Error::Configuration`] - An invalid rule set or cache key; fatal and never retried
///
/// ## Resolution Errors
/// - [`Error::NotFound`] - No member satisfied the rule set; recoverable through a remedy plan
///
/// ## Descriptor Decoding Errors
/// - [`Error::Malformed`] - Corrupted descriptor table or name table data
/// - [`Error::OutOfBounds`] - Attempted to read beyond the descriptor blob boundaries
/// - [`Error::Empty`] - Empty input provided where descriptor data was expected
///
/// Absence of descriptor metadata on a type is *not* an error: the decoder yields zero
/// records so callers can fall back to the live reflective view.
///
/// # Examples
///
/// ```rust
/// use memberscope::{Error, prelude::*};
///
/// let class = ClassBuilder::new("demo.Empty", "app").build();
/// match resolve::find_functions(&class, &FunctionRules::named("missing")) {
///     Ok(found) => println!("{} matches", found.len()),
///     Err(Error::NotFound { kind, message }) => eprintln!("no {kind}: {message}"),
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The rule set or cache key is invalid.
    ///
    /// Raised when a rule set that structurally requires a name carries none, when every
    /// position of a parameter-type predicate is a placeholder (an ambiguous filter that
    /// would match any arity-compatible member), or when a cache key is built with neither
    /// an explicit descriptor string nor a required name.
    ///
    /// Configuration errors are fatal: they are never converted into a not-found result
    /// and never retried through a remedy plan.
    #[error("Invalid configuration - {0}")]
    Configuration(String),

    /// No member satisfied the rule set.
    ///
    /// Carries the kind of member searched for and a formatted multi-line diagnostic
    /// listing the searched type/loader identity and the template of every active
    /// predicate category.
    #[error("{message}")]
    NotFound {
        /// Which member kind the failed resolution was looking for
        kind: MemberKind,
        /// The formatted multi-line diagnostic
        message: String,
    },

    /// The descriptor table or name table is damaged and could not be decoded.
    ///
    /// Includes the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding descriptor data.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,
}

impl Error {
    /// `true` when this error is the recoverable not-found condition.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
