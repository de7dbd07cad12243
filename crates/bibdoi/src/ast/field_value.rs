use std::{fmt, ops::Deref};

/// The value of an entry field, kept both as written in the source and as plain text.
///
/// The source text (delimiters, LaTeX commands, `@string` references and all) is what gets written
/// back out so the bibliography stays as its author wrote it. The plain text, with LaTeX resolved
/// to Unicode, is what gets searched and compared against remote titles.
///
/// # Examples
///
/// ```
/// use bibdoi::ast::FieldValue;
///
/// let title = FieldValue::parsed(r#"{Caf{\'e} \& Co}"#, "Café & Co");
/// assert_eq!("Café & Co", &*title);
/// assert_eq!(r#"{Caf{\'e} \& Co}"#, title.source());
///
/// let doi = FieldValue::from("10.1038/nature14539");
/// assert_eq!("{10.1038/nature14539}", doi.source());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldValue {
    source: String,
    text: String,
}

impl FieldValue {
    /// A value read from a bibliography: its `source` text and the plain `text` it resolves to.
    pub fn parsed<S: Into<String>, T: Into<String>>(source: S, text: T) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    /// The value as written in the source, delimiters included.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Deref for FieldValue {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.text
    }
}

impl AsRef<str> for FieldValue {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Plain text is written back braced.
impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self {
            source: format!("{{{text}}}"),
            text,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::from(text.to_owned())
    }
}
