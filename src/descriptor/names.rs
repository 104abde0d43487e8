use crate::Result;

use super::parser::Parser;

/// The interned name table of a descriptor blob.
///
/// A count-prefixed sequence of length-prefixed UTF-8 entries. Records reference
/// names by ordinal; the table is decoded eagerly so every later reference is a
/// plain slice lookup. Non-identifier names such as `<init>` or `<get-value>` are
/// stored verbatim.
///
/// # Examples
///
/// ```rust
/// use memberscope::descriptor::NameTable;
/// // two entries: "run", "<init>"
/// let data = [
///     0x02, 0x03, b'r', b'u', b'n', 0x06, b'<', b'i', b'n', b'i', b't', b'>',
/// ];
/// let names = NameTable::from(&data)?;
/// assert_eq!(names.get(0)?, "run");
/// assert_eq!(names.get(1)?, "<init>");
/// # Ok::<(), memberscope::Error>(())
/// ```
pub struct NameTable {
    entries: Vec<String>,
}

impl NameTable {
    /// Decode a name table from its raw bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] when an entry runs past the data, or
    /// [`crate::Error::Malformed`] when an entry is not valid UTF-8 or trailing
    /// bytes follow the last entry.
    pub fn from(data: &[u8]) -> Result<Self> {
        let mut parser = Parser::new(data);
        let count = parser.read_compressed_uint()?;
        // the count is untrusted input; never reserve more than the data could hold
        let mut entries = Vec::with_capacity((count as usize).min(data.len()));
        for _ in 0..count {
            let length = parser.read_compressed_uint()? as usize;
            let bytes = parser.read_bytes(length)?;
            let name = std::str::from_utf8(bytes)
                .map_err(|_| malformed_error!("Name entry {} is not valid UTF-8", entries.len()))?;
            entries.push(name.to_string());
        }
        if parser.has_more_data() {
            return Err(malformed_error!(
                "Name table has {} trailing bytes after {} entries",
                parser.remaining(),
                count
            ));
        }
        Ok(NameTable { entries })
    }

    /// Resolve a name by its ordinal reference.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a reference past the table.
    pub fn get(&self, index: u32) -> Result<&str> {
        self.entries
            .get(index as usize)
            .map(String::as_str)
            .ok_or_else(|| {
                malformed_error!(
                    "Name reference {} out of range (table has {} entries)",
                    index,
                    self.entries.len()
                )
            })
    }

    /// Number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` for a table with no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
