use super::{Field, FieldValue};

/// The entry kind of journal articles, the only kind searched for a DOI.
pub const ARTICLE: &str = "article";

/// A single bibliography entry.
///
/// The entry kind and the field names are kept as written in the source (`Article`,
/// `conference`, `Title`, ...) and compared case insensitively, as BibTeX does. Fields keep the
/// order they were added in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    cite: String,
    kind: String,
    fields: Vec<(String, FieldValue)>,
}

impl Entry {
    /// Create an entry without any fields.
    #[must_use]
    pub fn new<K: Into<String>>(cite: String, kind: K) -> Self {
        Self {
            cite,
            kind: kind.into(),
            fields: Vec::new(),
        }
    }

    /// Builder style helper to add a field, mostly useful when creating entries by hand.
    #[must_use]
    pub fn with_field<V: Into<FieldValue>>(mut self, name: &str, value: V) -> Self {
        self.set_field(name, value.into());
        self
    }

    /// The citation key of the entry.
    #[must_use]
    pub fn cite(&self) -> &str {
        &self.cite
    }

    /// The entry type as written in the source.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Whether this entry is a journal article.
    #[must_use]
    pub fn is_article(&self) -> bool {
        self.kind.eq_ignore_ascii_case(ARTICLE)
    }

    /// Look up a field by name, returning `None` when the entry does not have it.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.position(name).map(|i| &self.fields[i].1)
    }

    /// Whether the entry has the field.
    #[must_use]
    pub fn contains_field(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Set the value of a field.
    ///
    /// An existing field keeps its place and the spelling of its name, a new one is appended.
    pub fn set_field(&mut self, name: &str, value: FieldValue) {
        match self.position(name) {
            Some(i) => self.fields[i].1 = value,
            None => self.fields.push((name.to_owned(), value)),
        }
    }

    /// Remove a field, returning its value when the entry had it.
    pub fn remove_field(&mut self, name: &str) -> Option<FieldValue> {
        self.position(name).map(|i| self.fields.remove(i).1)
    }

    /// All fields of the entry in order.
    pub fn fields(&self) -> impl Iterator<Item = Field<'_>> {
        self.fields
            .iter()
            .map(|(name, value)| Field { name, value })
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|(field, _)| field.eq_ignore_ascii_case(name))
    }
}
