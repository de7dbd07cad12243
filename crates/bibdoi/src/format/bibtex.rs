use std::collections::HashMap;

use crate::{
    ast::{self, Biblio, FieldValue},
    Error, ErrorKind,
};

use super::Format;

use biblatex::{Bibliography, ChunksExt, RawBibliography, RawEntry};
use log::{trace, warn};

/// A type wrapper around [`String`] to represent a `BibTex` format string.
///
/// Parsing keeps the source text of every field so composing writes the entries back as they
/// were written, only the layout changes. `@comment` blocks and text outside of entries are
/// dropped.
#[derive(Debug)]
pub struct BibTex(String);

impl Format for BibTex {
    fn new(val: String) -> Self {
        Self(val)
    }

    fn parse(self) -> Result<Biblio, Error> {
        if self.0.trim().is_empty() {
            return Ok(Biblio::default());
        }

        let src = self.0.as_str();
        let raw = RawBibliography::parse(src);
        if raw.entries.is_empty() && raw.abbreviations.is_empty() && raw.preamble.is_empty() {
            return Err(Error::new(
                ErrorKind::Deserialize,
                "Unable to parse string as BibTeX",
            ));
        }

        let entries = raw
            .entries
            .iter()
            .filter(|entry| is_entry(entry))
            .map(|entry| resolve_entry(src, entry, &raw.abbreviations))
            .collect::<Result<_, _>>()?;

        let mut strings: Vec<_> = raw.abbreviations.iter().collect();
        strings.sort_by_key(|(name, _)| offset_in(src, name));

        let mut biblio = strings
            .into_iter()
            .fold(Biblio::new(entries), |biblio, (name, value)| {
                biblio.with_string((*name).to_owned(), value.trim().to_owned())
            });
        if !raw.preamble.is_empty() {
            biblio = biblio.with_preamble(raw.preamble);
        }

        Ok(biblio)
    }

    fn compose(biblio: &Biblio) -> Self {
        let mut blocks = Vec::new();

        if let Some(preamble) = biblio.preamble() {
            blocks.push(format!("@preamble{{\"{preamble}\"}}\n"));
        }

        let strings: String = biblio
            .strings()
            .map(|(name, value)| format!("@string{{{name} = {value}}}\n"))
            .collect();
        if !strings.is_empty() {
            blocks.push(strings);
        }

        blocks.extend(biblio.entries().map(compose_entry));
        Self(blocks.join("\n"))
    }

    fn raw(self) -> String {
        self.0
    }
}

fn compose_entry(entry: &ast::Entry) -> String {
    let fields: String = entry
        .fields()
        .map(|field| format!("    {} = {},\n", field.name, field.value.source()))
        .collect();

    format!("@{}{{{},\n{}}}\n", entry.kind(), entry.cite(), fields)
}

/// Whether the raw block is a bibliography entry, as opposed to a comment or a preamble.
fn is_entry(entry: &RawEntry<'_>) -> bool {
    let kind = entry.entry_type;
    if kind.eq_ignore_ascii_case("comment") || kind.eq_ignore_ascii_case("preamble") {
        trace!("Dropping the @{kind} block");
        return false;
    }

    if kind.is_empty() || entry.key.is_empty() {
        warn!("Dropping the entry '@{kind}{{{}' without type or cite key", entry.key);
        return false;
    }

    true
}

/// Build an entry keeping the source text of its fields, along with their resolved plain text.
fn resolve_entry<'s>(
    src: &str,
    entry: &RawEntry<'s>,
    abbreviations: &HashMap<&'s str, &'s str>,
) -> Result<ast::Entry, Error> {
    // one entry at a time so duplicated cite keys do not replace each other
    let single = RawBibliography {
        preamble: String::new(),
        entries: vec![entry.clone()],
        abbreviations: abbreviations.clone(),
    };
    let resolved = Bibliography::from_raw(single)
        .and_then(|bibliography| bibliography.into_iter().next())
        .ok_or_else(|| {
            Error::new(
                ErrorKind::Deserialize,
                format!("Unable to read the fields of entry '{}'", entry.key),
            )
        })?;

    let mut fields: Vec<_> = entry.fields.iter().collect();
    fields.sort_by_key(|(name, _)| offset_in(src, name));

    let mut res = ast::Entry::new(entry.key.to_owned(), entry.entry_type);
    for (name, source) in fields {
        let text = resolved
            .fields
            .get(*name)
            .map(|chunks| chunks.format_verbatim())
            .unwrap_or_default();
        res.set_field(name, FieldValue::parsed(source.trim(), text));
    }

    Ok(res)
}

/// Byte offset of `part`, a slice of `src`, within `src`.
fn offset_in(src: &str, part: &str) -> usize {
    (part.as_ptr() as usize).saturating_sub(src.as_ptr() as usize)
}
