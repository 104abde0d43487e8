use crate::Result;

/// Declaration axis of a decoded record.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RecordKind {
    /// A function overload record
    Function,
    /// A constructor overload record
    Constructor,
    /// A property record with optional accessor sub-signatures
    Property,
}

/// One named signature nested inside a property record.
#[derive(Clone, PartialEq, Debug)]
pub struct SubSignature {
    /// Resolved name of the nested declaration
    pub name: String,
    /// Raw JVM signature string
    pub signature: String,
}

/// One decoded overload record from a descriptor table.
///
/// Function and constructor records carry just a name and a JVM signature.
/// Property records additionally carry up to five sub-signatures for the
/// compiler-generated shapes a property can take on: the backing field, the
/// getter, the setter, the delegate accessor, and the synthetic annotation
/// holder. Accessor names follow the `<get-x>` / `<set-x>` convention, and
/// constructors resolve to `<init>`.
#[derive(Clone, PartialEq, Debug)]
pub struct DescriptorRecord {
    pub(crate) kind: RecordKind,
    pub(crate) name: String,
    pub(crate) signature: String,
    pub(crate) field: Option<SubSignature>,
    pub(crate) getter: Option<SubSignature>,
    pub(crate) setter: Option<SubSignature>,
    pub(crate) delegate: Option<SubSignature>,
    pub(crate) synthetic: Option<SubSignature>,
}

impl DescriptorRecord {
    /// Declaration axis of this record.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Resolved overload name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw JVM signature, e.g. `(ILjava/lang/String;)V`.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// This record when it is a property, `None` otherwise.
    #[must_use]
    pub fn as_property(&self) -> Option<&Self> {
        (self.kind == RecordKind::Property).then_some(self)
    }

    /// This record when it is a function, `None` otherwise.
    #[must_use]
    pub fn as_function(&self) -> Option<&Self> {
        (self.kind == RecordKind::Function).then_some(self)
    }

    /// This record when it is a constructor, `None` otherwise.
    #[must_use]
    pub fn as_constructor(&self) -> Option<&Self> {
        (self.kind == RecordKind::Constructor).then_some(self)
    }

    /// Backing field sub-signature of a property record.
    #[must_use]
    pub fn field(&self) -> Option<&SubSignature> {
        self.field.as_ref()
    }

    /// Getter sub-signature of a property record.
    #[must_use]
    pub fn getter(&self) -> Option<&SubSignature> {
        self.getter.as_ref()
    }

    /// Setter sub-signature of a property record.
    #[must_use]
    pub fn setter(&self) -> Option<&SubSignature> {
        self.setter.as_ref()
    }

    /// Delegate accessor sub-signature of a property record.
    #[must_use]
    pub fn delegate(&self) -> Option<&SubSignature> {
        self.delegate.as_ref()
    }

    /// Synthetic holder sub-signature of a property record.
    #[must_use]
    pub fn synthetic(&self) -> Option<&SubSignature> {
        self.synthetic.as_ref()
    }

    /// `true` when a backing field sub-signature is present.
    #[must_use]
    pub fn has_field(&self) -> bool {
        self.field.is_some()
    }

    /// `true` when a getter sub-signature is present.
    #[must_use]
    pub fn has_getter(&self) -> bool {
        self.getter.is_some()
    }

    /// `true` when a setter sub-signature is present.
    #[must_use]
    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    /// `true` when a delegate sub-signature is present.
    #[must_use]
    pub fn has_delegate(&self) -> bool {
        self.delegate.is_some()
    }

    /// `true` when a synthetic sub-signature is present.
    #[must_use]
    pub fn has_synthetic(&self) -> bool {
        self.synthetic.is_some()
    }

    /// The individual parameter descriptors of this record's signature.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] when the signature is not a
    /// well-formed method signature.
    pub fn param_descriptors(&self) -> Result<Vec<String>> {
        let inner = self.params_slice()?;
        let bytes = inner.as_bytes();
        let mut descriptors = Vec::new();
        let mut pos = 0;
        while pos < bytes.len() {
            let end = descriptor_end(bytes, pos)
                .ok_or_else(|| malformed_error!("Invalid parameter descriptor in - {}", self.signature))?;
            descriptors.push(inner[pos..end].to_string());
            pos = end;
        }
        Ok(descriptors)
    }

    /// The return descriptor of this record's signature.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] when the signature is not a
    /// well-formed method signature.
    pub fn return_descriptor(&self) -> Result<&str> {
        let close = self
            .signature
            .find(')')
            .ok_or_else(|| malformed_error!("Signature has no parameter list - {}", self.signature))?;
        let ret = &self.signature[close + 1..];
        let bytes = ret.as_bytes();
        if descriptor_end(bytes, 0) != Some(bytes.len()) {
            return Err(malformed_error!(
                "Invalid return descriptor - {}",
                self.signature
            ));
        }
        Ok(ret)
    }

    fn params_slice(&self) -> Result<&str> {
        let open = self
            .signature
            .find('(')
            .ok_or_else(|| malformed_error!("Signature has no parameter list - {}", self.signature))?;
        let close = self
            .signature
            .find(')')
            .ok_or_else(|| malformed_error!("Signature has no parameter list - {}", self.signature))?;
        if open != 0 || close < open {
            return Err(malformed_error!("Invalid signature - {}", self.signature));
        }
        Ok(&self.signature[open + 1..close])
    }
}

/// End offset of the single JVM type descriptor starting at `pos`, or `None`
/// when the bytes there are not a descriptor.
fn descriptor_end(bytes: &[u8], mut pos: usize) -> Option<usize> {
    while bytes.get(pos) == Some(&b'[') {
        pos += 1;
    }
    match bytes.get(pos)? {
        b'Z' | b'B' | b'C' | b'S' | b'I' | b'J' | b'F' | b'D' | b'V' => Some(pos + 1),
        b'L' => {
            let end = bytes[pos..].iter().position(|&b| b == b';')?;
            Some(pos + end + 1)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(signature: &str) -> DescriptorRecord {
        DescriptorRecord {
            kind: RecordKind::Function,
            name: "run".to_string(),
            signature: signature.to_string(),
            field: None,
            getter: None,
            setter: None,
            delegate: None,
            synthetic: None,
        }
    }

    #[test]
    fn splits_parameter_descriptors() {
        let record = function("(ILjava/lang/String;[J[Ljava/lang/Object;)V");
        assert_eq!(
            record.param_descriptors().unwrap(),
            vec!["I", "Ljava/lang/String;", "[J", "[Ljava/lang/Object;"]
        );
        assert_eq!(record.return_descriptor().unwrap(), "V");
    }

    #[test]
    fn empty_parameter_list() {
        let record = function("()Ljava/lang/String;");
        assert!(record.param_descriptors().unwrap().is_empty());
        assert_eq!(record.return_descriptor().unwrap(), "Ljava/lang/String;");
    }

    #[test]
    fn malformed_signature_is_rejected() {
        assert!(function("IV").param_descriptors().is_err());
        assert!(function("(Q)V").param_descriptors().is_err());
        assert!(function("(I)").return_descriptor().is_err());
        assert!(function("(I)QQ").return_descriptor().is_err());
    }

    #[test]
    fn kind_projections() {
        let record = function("()V");
        assert!(record.as_function().is_some());
        assert!(record.as_property().is_none());
        assert!(record.as_constructor().is_none());
    }
}
