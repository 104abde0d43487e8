use std::fmt;
use std::sync::Arc;

use strum::Display;

/// Erased class identity: the dotted type name plus the loader it was observed in.
///
/// Two [`ClassId`]s are equal when both components are equal; generic arguments never
/// participate. Cloning is cheap (shared string storage), so tokens can be copied into
/// rule sets and cached results freely.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ClassId {
    name: Arc<str>,
    loader: Arc<str>,
}

impl ClassId {
    /// Build an identity from a dotted type name and a loader identity string.
    #[must_use]
    pub fn new(name: &str, loader: &str) -> Self {
        ClassId {
            name: Arc::from(name),
            loader: Arc::from(loader),
        }
    }

    /// The dotted type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The loader identity string.
    #[must_use]
    pub fn loader(&self) -> &str {
        &self.loader
    }

    /// `true` when this class denotes the "no value" type in any of its spellings.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        matches!(
            self.name.as_ref(),
            "void" | "java.lang.Void" | "kotlin.Unit"
        )
    }

    /// The JVM type descriptor for this class, e.g. `I` or `Ljava/lang/String;`.
    ///
    /// Primitive names map to their single-letter descriptors; everything else becomes
    /// an object descriptor with `.` replaced by `/`.
    #[must_use]
    pub fn jvm_descriptor(&self) -> String {
        match self.name.as_ref() {
            "boolean" => "Z".to_string(),
            "byte" => "B".to_string(),
            "char" => "C".to_string(),
            "short" => "S".to_string(),
            "int" => "I".to_string(),
            "long" => "J".to_string(),
            "float" => "F".to_string(),
            "double" => "D".to_string(),
            "void" => "V".to_string(),
            other => format!("L{};", other.replace('.', "/")),
        }
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Variance qualifier of a generic projection.
#[derive(Display, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Variance {
    /// No variance qualifier
    #[strum(serialize = "")]
    Invariant,
    /// Producer position (`out`)
    #[strum(serialize = "out")]
    Covariant,
    /// Consumer position (`in`)
    #[strum(serialize = "in")]
    Contravariant,
}

/// The closed union of every type shape a rule predicate can carry or a member can expose.
///
/// Heterogeneous inputs (class references, generic instances, projections, wildcards)
/// are coerced into this union when rules are built, so the equivalence comparator in
/// [`crate::typesystem::type_eq`] works over one well-defined set of pairings.
#[derive(Clone, PartialEq, Debug)]
pub enum TypeToken {
    /// The absorbing wildcard: compares equal to anything.
    Placeholder,
    /// The "no value" type (void / unit in either representation).
    Unit,
    /// A concrete class reference, compared by erased identity.
    Concrete(ClassId),
    /// A generic type instance: erased base plus its projections, compared structurally.
    Generic(ClassId, Vec<TypeToken>),
    /// A reference to a declaration's type parameter, optionally bounded.
    Param {
        /// Declared parameter name (`T`, `R`, ...)
        name: String,
        /// Upper bound used for erasure comparison, when declared
        upper: Option<ClassId>,
    },
    /// A variance-qualified projection around a nested token.
    Projection(Variance, Box<TypeToken>),
    /// A positional projection list, compared element-wise against a generic
    /// instance of the same arity.
    Projections(Vec<TypeToken>),
}

impl TypeToken {
    /// `true` for the absorbing wildcard.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, TypeToken::Placeholder)
    }

    /// Convenience constructor for a concrete class token.
    #[must_use]
    pub fn concrete(name: &str, loader: &str) -> Self {
        TypeToken::Concrete(ClassId::new(name, loader))
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeToken::Placeholder => write!(f, "*"),
            TypeToken::Unit => write!(f, "unit"),
            TypeToken::Concrete(c) => write!(f, "{c}"),
            TypeToken::Generic(c, args) => {
                write!(f, "{c}<")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ">")
            }
            TypeToken::Param { name, .. } => write!(f, "{name}"),
            TypeToken::Projection(Variance::Invariant, t) => write!(f, "{t}"),
            TypeToken::Projection(v, t) => write!(f, "{v} {t}"),
            TypeToken::Projections(list) => {
                write!(f, "[")?;
                for (i, a) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, "]")
            }
        }
    }
}
