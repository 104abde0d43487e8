//! The introspection view of a type and its declared members.
//!
//! The native reflection facility and the language-metadata facility are external
//! collaborators: this crate never enumerates a runtime's members itself. An embedder
//! bridges its runtime by populating a [`Class`] per type through [`ClassBuilder`]:
//! declared members in declaration order, the optional ancestor link, and the optional
//! descriptor-table bytes the metadata facility exposes for that type.
//!
//! Declaration order matters: the matching engine's tie-break indices are defined over
//! the order members appear here, so builders must append members in the order the
//! native facility reports them.

mod member;

pub use member::{Member, MemberKind, Modifiers, Parameter};

use std::sync::{Arc, OnceLock};

use crate::{
    descriptor::{self, DescriptorRecord},
    typesystem::{ClassId, TypeToken},
    Result,
};

/// Shared handle to a [`Class`]; cache entries hold these weakly.
pub type ClassRef = Arc<Class>;

/// Descriptor metadata attached to a type: raw name-table and record-blob bytes,
/// decoded lazily exactly once for the lifetime of the owning [`Class`].
struct DescriptorData {
    names: Vec<u8>,
    blob: Vec<u8>,
    records: OnceLock<std::result::Result<Vec<DescriptorRecord>, String>>,
}

/// One type as seen through live introspection, plus its optional descriptor table.
pub struct Class {
    name: String,
    loader: String,
    modifiers: Modifiers,
    ancestor: Option<ClassRef>,
    properties: Vec<Member>,
    functions: Vec<Member>,
    constructors: Vec<Member>,
    metadata: Option<DescriptorData>,
}

impl Class {
    /// Dotted type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Loader identity string this type was observed in.
    #[must_use]
    pub fn loader(&self) -> &str {
        &self.loader
    }

    /// Erased identity of this type.
    #[must_use]
    pub fn id(&self) -> ClassId {
        ClassId::new(&self.name, &self.loader)
    }

    /// Declaration modifiers of the type itself.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// The direct ancestor, when this type extends one (root types return `None`).
    #[must_use]
    pub fn ancestor(&self) -> Option<&ClassRef> {
        self.ancestor.as_ref()
    }

    /// Declared members of the given kind, in declaration order.
    #[must_use]
    pub fn members(&self, kind: MemberKind) -> &[Member] {
        match kind {
            MemberKind::Property => &self.properties,
            MemberKind::Function => &self.functions,
            MemberKind::Constructor => &self.constructors,
            MemberKind::Type => &[],
        }
    }

    /// `true` when the metadata facility exposed a descriptor table for this type.
    #[must_use]
    pub fn has_descriptor_table(&self) -> bool {
        self.metadata.is_some()
    }

    /// The decoded descriptor records of this type.
    ///
    /// Decoding happens on first access and is memoized for the lifetime of the class.
    /// A type without descriptor metadata yields an empty slice, letting callers fall
    /// back to the live members transparently.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the blob or name table is damaged; the
    /// failure is memoized too, so a damaged table never decodes twice.
    pub fn descriptor_records(&self) -> Result<&[DescriptorRecord]> {
        let Some(data) = &self.metadata else {
            return Ok(&[]);
        };
        match data
            .records
            .get_or_init(|| descriptor::decode(&data.names, &data.blob).map_err(|e| e.to_string()))
        {
            Ok(records) => Ok(records),
            Err(message) => Err(malformed_error!("{}", message)),
        }
    }
}

impl std::fmt::Debug for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("loader", &self.loader)
            .field("properties", &self.properties.len())
            .field("functions", &self.functions.len())
            .field("constructors", &self.constructors.len())
            .finish()
    }
}

impl std::fmt::Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "class {}", self.name)
    }
}

/// Construction seam for [`Class`].
///
/// Members are appended in declaration order; ordinals are assigned on `build`. A void
/// or unit value type is normalized to [`TypeToken::Unit`] here so the equivalence
/// comparator only ever sees one spelling of "no value".
pub struct ClassBuilder {
    name: String,
    loader: String,
    modifiers: Modifiers,
    ancestor: Option<ClassRef>,
    properties: Vec<Member>,
    functions: Vec<Member>,
    constructors: Vec<Member>,
    metadata: Option<(Vec<u8>, Vec<u8>)>,
}

impl ClassBuilder {
    /// Start a builder for the named type in the given loader.
    #[must_use]
    pub fn new(name: &str, loader: &str) -> Self {
        ClassBuilder {
            name: name.to_string(),
            loader: loader.to_string(),
            modifiers: Modifiers::default(),
            ancestor: None,
            properties: Vec::new(),
            functions: Vec::new(),
            constructors: Vec::new(),
            metadata: None,
        }
    }

    /// Link the direct ancestor type.
    #[must_use]
    pub fn ancestor(mut self, ancestor: ClassRef) -> Self {
        self.ancestor = Some(ancestor);
        self
    }

    /// Set the declaration modifiers of the type itself.
    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Append a declared property.
    #[must_use]
    pub fn property(mut self, name: &str, ty: TypeToken, modifiers: Modifiers) -> Self {
        let ordinal = self.properties.len();
        self.properties.push(Member {
            kind: MemberKind::Property,
            name: name.to_string(),
            value_type: normalize(ty),
            params: Vec::new(),
            modifiers,
            ordinal,
        });
        self
    }

    /// Append a declared function.
    #[must_use]
    pub fn function(
        mut self,
        name: &str,
        returns: TypeToken,
        params: Vec<Parameter>,
        modifiers: Modifiers,
    ) -> Self {
        let ordinal = self.functions.len();
        self.functions.push(Member {
            kind: MemberKind::Function,
            name: name.to_string(),
            value_type: normalize(returns),
            params,
            modifiers,
            ordinal,
        });
        self
    }

    /// Append a declared constructor.
    #[must_use]
    pub fn constructor(mut self, params: Vec<Parameter>, modifiers: Modifiers) -> Self {
        let ordinal = self.constructors.len();
        self.constructors.push(Member {
            kind: MemberKind::Constructor,
            name: "<init>".to_string(),
            value_type: TypeToken::concrete(&self.name, &self.loader),
            params,
            modifiers,
            ordinal,
        });
        self
    }

    /// Attach the descriptor table bytes the metadata facility exposes for this type.
    #[must_use]
    pub fn descriptor_table(mut self, names: Vec<u8>, blob: Vec<u8>) -> Self {
        self.metadata = Some((names, blob));
        self
    }

    /// Finish the class.
    #[must_use]
    pub fn build(self) -> ClassRef {
        Arc::new(Class {
            name: self.name,
            loader: self.loader,
            modifiers: self.modifiers,
            ancestor: self.ancestor,
            properties: self.properties,
            functions: self.functions,
            constructors: self.constructors,
            metadata: self.metadata.map(|(names, blob)| DescriptorData {
                names,
                blob,
                records: OnceLock::new(),
            }),
        })
    }
}

/// Collapse every spelling of "no value" into [`TypeToken::Unit`].
fn normalize(ty: TypeToken) -> TypeToken {
    match &ty {
        TypeToken::Concrete(c) if c.is_unit() => TypeToken::Unit,
        _ => ty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_follow_declaration_order() {
        let class = ClassBuilder::new("demo.T", "app")
            .function("a", TypeToken::Unit, vec![], Modifiers::PUBLIC)
            .function("b", TypeToken::Unit, vec![], Modifiers::PUBLIC)
            .property("x", TypeToken::concrete("int", "app"), Modifiers::PRIVATE)
            .build();
        let functions = class.members(MemberKind::Function);
        assert_eq!(functions[0].ordinal, 0);
        assert_eq!(functions[1].ordinal, 1);
        assert_eq!(class.members(MemberKind::Property)[0].ordinal, 0);
    }

    #[test]
    fn void_returns_normalize_to_unit() {
        let class = ClassBuilder::new("demo.T", "app")
            .function(
                "run",
                TypeToken::concrete("void", "app"),
                vec![],
                Modifiers::PUBLIC,
            )
            .build();
        assert_eq!(
            class.members(MemberKind::Function)[0].value_type,
            TypeToken::Unit
        );
    }

    #[test]
    fn missing_metadata_decodes_to_nothing() {
        let class = ClassBuilder::new("demo.T", "app").build();
        assert!(!class.has_descriptor_table());
        assert!(class.descriptor_records().unwrap().is_empty());
    }
}
