#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]
//! Recover the missing DOIs of the journal articles of a BibTeX bibliography.
//!
//! Every `@article` entry without a `doi` field is searched on [Crossref](https://www.crossref.org)
//! by its first author, title and year. The first candidate whose title is similar enough to the
//! title of the entry gives the DOI.
//!
//! ```no_run
//! use bibdoi::{
//!     file::FormatFile,
//!     format::{BibTex, Reader, Writer},
//!     matcher::MatcherConfig,
//! };
//!
//! fn main() -> Result<(), bibdoi::Error> {
//!     let mut biblio = FormatFile::<BibTex>::open("refs.bib")?.read_ast()?;
//!     let report = bibdoi::find_missing_dois(&mut biblio, None, MatcherConfig::default())?;
//!     println!("{}", report.stats);
//!
//!     FormatFile::<BibTex>::create("out.bib")?.write_ast(&biblio)
//! }
//! ```

pub mod api;
pub mod ast;
mod error;
pub mod etiquette;
pub mod file;
pub mod format;
pub mod matcher;
pub mod scanner;
pub mod similarity;

use api::CrossRef;
use ast::Biblio;
use etiquette::Etiquette;
use matcher::{Matcher, MatcherConfig};
use scanner::ScanReport;

pub use error::{Error, ErrorKind};

use log::trace;

/// Search the DOI of every journal article of `biblio` without one, using the public Crossref API.
///
/// The `etiquette`, when given, identifies the caller to Crossref.
///
/// # Errors
///
/// An `Err` is returned when the `config` is invalid.
/// An `Err` is returned when a request to Crossref fails or its response cannot be read, entries
/// updated before the failure keep their new DOI.
pub fn find_missing_dois(
    biblio: &mut Biblio,
    etiquette: Option<&Etiquette>,
    config: MatcherConfig,
) -> Result<ScanReport, Error> {
    trace!("Search missing DOIs with {config:?}");
    let config = config.validate()?;
    let crossref = CrossRef::with_etiquette(etiquette)?;

    scanner::scan(biblio, &Matcher::new(crossref, config))
}
