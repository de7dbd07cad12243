//! Structs for representing a bibliography and its entries independently of the file format.
mod biblio;
mod entry;
mod field_value;

pub use biblio::Biblio;
pub use entry::{Entry, ARTICLE};
pub use field_value::FieldValue;

/// An entry field which is essentially a key value pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field<'a> {
    /// Name of the entry field, as written in the source.
    pub name: &'a str,
    /// Value of the entry field.
    pub value: &'a FieldValue,
}

impl<'a> Field<'a> {
    /// The plain text of the `value` field.
    #[must_use]
    pub fn value(&self) -> &'a str {
        self.value
    }
}
