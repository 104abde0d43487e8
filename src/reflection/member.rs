use bitflags::bitflags;
use strum::Display;

use crate::typesystem::TypeToken;

/// Which declaration axis a member belongs to.
#[derive(Display, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MemberKind {
    /// A field / property declaration
    #[strum(serialize = "property")]
    Property,
    /// A method / function declaration
    #[strum(serialize = "function")]
    Function,
    /// A constructor declaration
    #[strum(serialize = "constructor")]
    Constructor,
    /// A type itself, used by type-set matching diagnostics
    #[strum(serialize = "class")]
    Type,
}

bitflags! {
    /// Declaration modifiers of a member, evaluated by the modifier predicate category.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct Modifiers: u32 {
        /// Publicly visible
        const PUBLIC = 0x0001;
        /// Visible to the declaring type and subtypes
        const PROTECTED = 0x0002;
        /// Visible to the declaring type only
        const PRIVATE = 0x0004;
        /// Visible within the declaring module
        const INTERNAL = 0x0008;
        /// Not bound to an instance
        const STATIC = 0x0010;
        /// Cannot be overridden
        const FINAL = 0x0020;
        /// Open for overriding
        const OPEN = 0x0040;
        /// Declared without a body
        const ABSTRACT = 0x0080;
        /// Generated by the compiler rather than written in source
        const SYNTHETIC = 0x0100;
        /// Compile-time constant
        const CONST = 0x0200;
    }
}

/// One parameter of a function or constructor candidate.
#[derive(Clone, PartialEq, Debug)]
pub struct Parameter {
    /// Declared parameter name; empty when the runtime did not preserve it
    pub name: String,
    /// Declared parameter type
    pub ty: TypeToken,
}

impl Parameter {
    /// Build a parameter from a name and type token.
    #[must_use]
    pub fn new(name: &str, ty: TypeToken) -> Self {
        Parameter {
            name: name.to_string(),
            ty,
        }
    }
}

/// A single member candidate as enumerated by the native reflection facility.
///
/// For properties [`Member::value_type`] is the declared type; for functions it is the
/// return type; for constructors it is the declaring type. [`Member::ordinal`] is the
/// position within the declaring type's member list for this kind, which makes the
/// tie-break indices of the matching engine reproducible.
#[derive(Clone, Debug)]
pub struct Member {
    /// Declaration axis of this candidate
    pub kind: MemberKind,
    /// Declared name; constructors use the conventional `<init>`
    pub name: String,
    /// Declared type, return type, or declaring type depending on [`Member::kind`]
    pub value_type: TypeToken,
    /// Parameter list in declaration order; empty for properties
    pub params: Vec<Parameter>,
    /// Declaration modifiers
    pub modifiers: Modifiers,
    /// Position in the declaring type's member list for this kind
    pub ordinal: usize,
}

impl Member {
    /// Parameter types in positional order.
    #[must_use]
    pub fn param_types(&self) -> Vec<&TypeToken> {
        self.params.iter().map(|p| &p.ty).collect()
    }

    /// Parameter names in positional order.
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            MemberKind::Property => write!(f, "{}: {}", self.name, self.value_type),
            _ => {
                write!(f, "{}(", self.name)?;
                for (i, p) in self.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", p.name, p.ty)?;
                }
                write!(f, "): {}", self.value_type)
            }
        }
    }
}
