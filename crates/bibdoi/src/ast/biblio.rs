use super::Entry;

/// An in-memory bibliography which keeps the entries in the order they were read.
///
/// Besides the entries, a BibTeX file may carry a preamble and `@string` abbreviations that the
/// entries refer to, both are kept so the bibliography can be written back whole.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Biblio {
    preamble: Option<String>,
    // name and value source text, in source order
    strings: Vec<(String, String)>,
    entries: Vec<Entry>,
}

impl Biblio {
    /// Create a new [`Biblio`] from a list of bibliography entries.
    #[must_use]
    pub const fn new(entries: Vec<Entry>) -> Self {
        Self {
            preamble: None,
            strings: Vec::new(),
            entries,
        }
    }

    /// Set the preamble, the LaTeX to include before the bibliography.
    #[must_use]
    pub fn with_preamble(mut self, preamble: String) -> Self {
        self.preamble = Some(preamble);
        self
    }

    /// Add an `@string` abbreviation whose value is written as `value`.
    #[must_use]
    pub fn with_string(mut self, name: String, value: String) -> Self {
        self.strings.push((name, value));
        self
    }

    /// The preamble, when there is one.
    #[must_use]
    pub fn preamble(&self) -> Option<&str> {
        self.preamble.as_deref()
    }

    /// The `@string` abbreviations as name and value source text, in source order.
    pub fn strings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.strings
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Iterate over the entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Iterate mutably over the entries in file order.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.entries.iter_mut()
    }

    /// Find an entry by its cite key.
    #[must_use]
    pub fn get(&self, cite: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.cite() == cite)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is no entry at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
