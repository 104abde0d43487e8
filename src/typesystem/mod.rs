//! Structural type representation and the equivalence comparator.
//!
//! Rule predicates accept many shapes of "type": a concrete class reference, a generic
//! instance with its projections, a type-parameter reference, a variance-qualified
//! projection, a positional projection list, or the absorbing wildcard. All of these are
//! normalized into the closed [`TypeToken`] union at the rule-builder boundary, so the
//! comparator never has to type-switch on open-ended runtime shapes.
//!
//! [`type_eq`] is the single comparison primitive every type-inspecting predicate is
//! built on; [`param_types_eq`] and [`param_names_eq`] lift it over positional
//! parameter lists.

mod token;

pub use token::{ClassId, TypeToken, Variance};

use crate::reflection::Parameter;

/// The parameter name that matches anything at its position, alongside `""` and `"null"`.
pub const PLACEHOLDER_NAME: &str = "?";

/// Structural equivalence between two type tokens.
///
/// The comparison is symmetric in intent: either side being a [`TypeToken::Placeholder`]
/// short-circuits to `true`, and both sides representing "no value" compare equal.
/// Concrete classes, generic instances and bounded type parameters compare by erasure
/// (class identity, generic arguments discarded); two generic instances compare fully
/// structurally including every projection; a projection list compares element-wise
/// against a generic instance of matching arity. Any pairing not listed here is `false`.
#[must_use]
pub fn type_eq(expected: &TypeToken, actual: &TypeToken) -> bool {
    use TypeToken::{Concrete, Generic, Param, Placeholder, Projection, Projections, Unit};
    match (expected, actual) {
        (Placeholder, _) | (_, Placeholder) => true,
        (Unit, Unit) => true,
        (Unit, Concrete(c)) | (Concrete(c), Unit) => c.is_unit(),
        (Concrete(a), Concrete(b)) => a == b,
        // Erasure: a generic instance matches its raw class, arguments discarded
        (Concrete(a), Generic(b, _)) | (Generic(a, _), Concrete(b)) => a == b,
        (Concrete(a), Param { upper, .. }) | (Param { upper, .. }, Concrete(a)) => {
            upper.as_ref() == Some(a)
        }
        (Param { name: a, .. }, Param { name: b, .. }) => a == b,
        (Projection(va, ta), Projection(vb, tb)) => {
            va == vb && (ta.is_placeholder() || tb.is_placeholder() || type_eq(ta, tb))
        }
        // A lone projection is held against the first argument of a generic instance
        (Projection(v, t), Generic(_, args)) | (Generic(_, args), Projection(v, t)) => {
            match args.first() {
                Some(Projection(w, u)) => {
                    v == w && (t.is_placeholder() || u.is_placeholder() || type_eq(t, u))
                }
                _ => false,
            }
        }
        (Generic(a, pa), Generic(b, pb)) => {
            a == b && pa.len() == pb.len() && pa.iter().zip(pb).all(|(x, y)| type_eq(x, y))
        }
        (Projections(list), Generic(_, args)) | (Generic(_, args), Projections(list)) => {
            list.len() == args.len() && list.iter().zip(args).all(|(x, y)| type_eq(x, y))
        }
        _ => false,
    }
}

/// Positional comparison of an expected type list against a parameter list.
///
/// Short-circuits on length mismatch; each position is compared with [`type_eq`], so a
/// [`TypeToken::Placeholder`] matches any type at its position. A predicate whose every
/// position is a placeholder is rejected as a configuration error by rule validation
/// before this function is ever reached.
#[must_use]
pub fn param_types_eq(expected: &[TypeToken], actual: &[Parameter]) -> bool {
    expected.len() == actual.len()
        && expected.iter().zip(actual).all(|(e, p)| type_eq(e, &p.ty))
}

/// Positional comparison of an expected name list against actual parameter names.
///
/// The empty string, the literal `"null"` and [`PLACEHOLDER_NAME`] match anything at
/// their position, on either side.
#[must_use]
pub fn param_names_eq(expected: &[String], actual: &[&str]) -> bool {
    fn wild(s: &str) -> bool {
        s.is_empty() || s == "null" || s == PLACEHOLDER_NAME
    }
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(e, a)| e == a || wild(e) || wild(a))
}

/// Erasure comparison of a type token against a JVM type descriptor string.
///
/// Used by the descriptor-table matching path, where candidate types exist only as
/// compact descriptors (`I`, `Ljava/lang/String;`, ...). Descriptors carry neither
/// generic arguments nor variance, so generic instances and projections compare by
/// their erased base.
#[must_use]
pub fn descriptor_type_eq(expected: &TypeToken, descriptor: &str) -> bool {
    match expected {
        TypeToken::Placeholder => true,
        TypeToken::Unit => descriptor == "V",
        TypeToken::Concrete(c) | TypeToken::Generic(c, _) => c.jvm_descriptor() == descriptor,
        TypeToken::Param { upper, .. } => upper
            .as_ref()
            .is_some_and(|u| u.jvm_descriptor() == descriptor),
        TypeToken::Projection(_, t) => descriptor_type_eq(t, descriptor),
        TypeToken::Projections(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::Parameter;

    fn class(name: &str) -> ClassId {
        ClassId::new(name, "test")
    }

    #[test]
    fn placeholder_absorbs_everything() {
        let tokens = [
            TypeToken::Unit,
            TypeToken::Concrete(class("a.B")),
            TypeToken::Generic(class("a.B"), vec![TypeToken::Placeholder]),
            TypeToken::Param {
                name: "T".into(),
                upper: None,
            },
            TypeToken::Projection(Variance::Covariant, Box::new(TypeToken::Unit)),
            TypeToken::Projections(vec![]),
        ];
        for t in &tokens {
            assert!(type_eq(&TypeToken::Placeholder, t));
            assert!(type_eq(t, &TypeToken::Placeholder));
        }
    }

    #[test]
    fn unit_matches_void_class() {
        assert!(type_eq(&TypeToken::Unit, &TypeToken::Unit));
        assert!(type_eq(
            &TypeToken::Unit,
            &TypeToken::Concrete(class("void"))
        ));
        assert!(type_eq(
            &TypeToken::Concrete(class("kotlin.Unit")),
            &TypeToken::Unit
        ));
        assert!(!type_eq(
            &TypeToken::Unit,
            &TypeToken::Concrete(class("a.B"))
        ));
    }

    #[test]
    fn erasure_discards_generic_arguments() {
        let list_of_int = TypeToken::Generic(
            class("java.util.List"),
            vec![TypeToken::Projection(
                Variance::Invariant,
                Box::new(TypeToken::Concrete(class("java.lang.Integer"))),
            )],
        );
        assert!(type_eq(
            &TypeToken::Concrete(class("java.util.List")),
            &list_of_int
        ));
        assert!(!type_eq(
            &TypeToken::Concrete(class("java.util.Map")),
            &list_of_int
        ));
    }

    #[test]
    fn generic_instances_compare_structurally() {
        let a = TypeToken::Generic(
            class("a.Box"),
            vec![TypeToken::Projection(
                Variance::Covariant,
                Box::new(TypeToken::Concrete(class("a.B"))),
            )],
        );
        let same = a.clone();
        let other_variance = TypeToken::Generic(
            class("a.Box"),
            vec![TypeToken::Projection(
                Variance::Contravariant,
                Box::new(TypeToken::Concrete(class("a.B"))),
            )],
        );
        assert!(type_eq(&a, &same));
        assert!(!type_eq(&a, &other_variance));
    }

    #[test]
    fn projection_against_generic_uses_first_argument() {
        let boxed = TypeToken::Generic(
            class("a.Box"),
            vec![TypeToken::Projection(
                Variance::Covariant,
                Box::new(TypeToken::Concrete(class("a.B"))),
            )],
        );
        let out_b = TypeToken::Projection(
            Variance::Covariant,
            Box::new(TypeToken::Concrete(class("a.B"))),
        );
        let out_any = TypeToken::Projection(Variance::Covariant, Box::new(TypeToken::Placeholder));
        let in_b = TypeToken::Projection(
            Variance::Contravariant,
            Box::new(TypeToken::Concrete(class("a.B"))),
        );
        assert!(type_eq(&out_b, &boxed));
        assert!(type_eq(&out_any, &boxed));
        assert!(!type_eq(&in_b, &boxed));
    }

    #[test]
    fn projection_list_requires_matching_arity() {
        let map = TypeToken::Generic(
            class("a.Map"),
            vec![
                TypeToken::Projection(
                    Variance::Invariant,
                    Box::new(TypeToken::Concrete(class("a.K"))),
                ),
                TypeToken::Projection(
                    Variance::Invariant,
                    Box::new(TypeToken::Concrete(class("a.V"))),
                ),
            ],
        );
        let both = TypeToken::Projections(vec![TypeToken::Placeholder, TypeToken::Placeholder]);
        let one = TypeToken::Projections(vec![TypeToken::Placeholder]);
        assert!(type_eq(&both, &map));
        assert!(!type_eq(&one, &map));
    }

    #[test]
    fn bounded_param_erases_to_its_upper_bound() {
        let t = TypeToken::Param {
            name: "T".into(),
            upper: Some(class("a.Base")),
        };
        assert!(type_eq(&TypeToken::Concrete(class("a.Base")), &t));
        assert!(!type_eq(&TypeToken::Concrete(class("a.Other")), &t));
        let unbounded = TypeToken::Param {
            name: "T".into(),
            upper: None,
        };
        assert!(!type_eq(&TypeToken::Concrete(class("a.Base")), &unbounded));
        assert!(type_eq(&t, &t.clone()));
    }

    #[test]
    fn param_types_short_circuit_on_length() {
        let expected = vec![TypeToken::Concrete(class("a.B"))];
        let actual = vec![
            Parameter::new("x", TypeToken::Concrete(class("a.B"))),
            Parameter::new("y", TypeToken::Concrete(class("a.B"))),
        ];
        assert!(!param_types_eq(&expected, &actual));
        assert!(param_types_eq(&expected, &actual[..1].to_vec()));
        assert!(param_types_eq(&[], &[]));
    }

    #[test]
    fn placeholder_weakens_param_filter() {
        let actual = vec![
            Parameter::new("x", TypeToken::Concrete(class("a.B"))),
            Parameter::new("y", TypeToken::Concrete(class("a.C"))),
        ];
        let strict = vec![
            TypeToken::Concrete(class("a.B")),
            TypeToken::Concrete(class("a.C")),
        ];
        let weak = vec![TypeToken::Placeholder, TypeToken::Concrete(class("a.C"))];
        assert!(param_types_eq(&strict, &actual));
        assert!(param_types_eq(&weak, &actual));
    }

    #[test]
    fn param_names_universal_positions() {
        let actual = ["first", "second"];
        assert!(param_names_eq(
            &["first".into(), "second".into()],
            &actual
        ));
        assert!(param_names_eq(&[String::new(), "second".into()], &actual));
        assert!(param_names_eq(&["null".into(), "second".into()], &actual));
        assert!(param_names_eq(&["?".into(), "second".into()], &actual));
        assert!(!param_names_eq(&["first".into(), "wrong".into()], &actual));
        assert!(!param_names_eq(&["first".into()], &actual));
        // reflexivity
        assert!(param_names_eq(
            &["first".into(), "second".into()],
            &["first", "second"]
        ));
    }

    #[test]
    fn descriptor_erasure() {
        assert!(descriptor_type_eq(&TypeToken::Placeholder, "I"));
        assert!(descriptor_type_eq(&TypeToken::Unit, "V"));
        assert!(descriptor_type_eq(
            &TypeToken::Concrete(class("java.lang.String")),
            "Ljava/lang/String;"
        ));
        assert!(descriptor_type_eq(&TypeToken::Concrete(class("int")), "I"));
        assert!(descriptor_type_eq(
            &TypeToken::Generic(class("java.util.List"), vec![TypeToken::Placeholder]),
            "Ljava/util/List;"
        ));
        assert!(!descriptor_type_eq(
            &TypeToken::Concrete(class("java.lang.String")),
            "I"
        ));
    }
}
