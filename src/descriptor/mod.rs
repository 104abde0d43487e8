//! Binary descriptor table decoding.
//!
//! Compiled types can carry a compact metadata table describing their declared
//! overloads: a name table of interned UTF-8 strings plus a record blob referencing
//! those names by ordinal. Decoding turns the pair into [`DescriptorRecord`]s that
//! expose the same logical member identity as live introspection, which lets the
//! resolution engine match against signatures even when the live view has erased
//! or renamed them.
//!
//! The blob is a sequence of length-delimited records, decoded sequentially until
//! exhaustion:
//!
//! ```text
//! record   ::= record_len:cuint body
//! body     ::= kind:u8 name_ref:cuint sig_ref:cuint property_tail?
//! property_tail ::= mask:u8 (name_ref:cuint sig_ref:cuint)*   // one pair per mask bit
//! ```
//!
//! `kind` is 0 for a function, 1 for a constructor, 2 for a property. Property
//! mask bits select, in order: backing field, getter, setter, delegate,
//! synthetic. Bytes past the known layout of a record are skipped, so newer
//! producers can append fields without breaking this decoder.
//!
//! Decoding is driven lazily from [`crate::reflection::Class::descriptor_records`]
//! and memoized there for the lifetime of the class.

mod names;
mod parser;
mod records;

pub use names::NameTable;
pub use parser::Parser;
pub use records::{DescriptorRecord, RecordKind, SubSignature};

use crate::Result;

const KIND_FUNCTION: u8 = 0;
const KIND_CONSTRUCTOR: u8 = 1;
const KIND_PROPERTY: u8 = 2;

const MASK_FIELD: u8 = 0x01;
const MASK_GETTER: u8 = 0x02;
const MASK_SETTER: u8 = 0x04;
const MASK_DELEGATE: u8 = 0x08;
const MASK_SYNTHETIC: u8 = 0x10;

/// Decode a descriptor table from its name-table and record-blob bytes.
///
/// Decoding is deterministic: the same input bytes always produce the same
/// records in the same order.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] or [`crate::Error::OutOfBounds`] when
/// either byte slice is damaged. An empty blob decodes to an empty list.
pub fn decode(names: &[u8], blob: &[u8]) -> Result<Vec<DescriptorRecord>> {
    let table = NameTable::from(names)?;
    let mut parser = Parser::new(blob);
    let mut records = Vec::new();
    while parser.has_more_data() {
        let record_len = parser.read_compressed_uint()? as usize;
        let body = parser.read_bytes(record_len)?;
        records.push(decode_record(&table, body)?);
    }
    Ok(records)
}

fn decode_record(table: &NameTable, body: &[u8]) -> Result<DescriptorRecord> {
    let mut parser = Parser::new(body);
    let kind_byte = parser.read_u8()?;
    let kind = match kind_byte {
        KIND_FUNCTION => RecordKind::Function,
        KIND_CONSTRUCTOR => RecordKind::Constructor,
        KIND_PROPERTY => RecordKind::Property,
        _ => return Err(malformed_error!("Unknown record kind - {}", kind_byte)),
    };
    let name = read_name(table, &mut parser)?;
    let signature = read_name(table, &mut parser)?;

    let mut record = DescriptorRecord {
        kind,
        name,
        signature,
        field: None,
        getter: None,
        setter: None,
        delegate: None,
        synthetic: None,
    };

    if kind == RecordKind::Property {
        let mask = parser.read_u8()?;
        for (bit, slot) in [
            (MASK_FIELD, &mut record.field),
            (MASK_GETTER, &mut record.getter),
            (MASK_SETTER, &mut record.setter),
            (MASK_DELEGATE, &mut record.delegate),
            (MASK_SYNTHETIC, &mut record.synthetic),
        ] {
            if mask & bit != 0 {
                *slot = Some(SubSignature {
                    name: read_name(table, &mut parser)?,
                    signature: read_name(table, &mut parser)?,
                });
            }
        }
    }

    // Trailing bytes within a record belong to a newer layout; ignore them.
    Ok(record)
}

fn read_name(table: &NameTable, parser: &mut Parser<'_>) -> Result<String> {
    let reference = parser.read_compressed_uint()?;
    Ok(table.get(reference)?.to_string())
}
