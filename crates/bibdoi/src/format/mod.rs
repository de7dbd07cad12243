//! Text formats of a bibliography and the sources and sinks they are read from and written to.
use std::marker::PhantomData;

mod bibtex;

use crate::{ast::Biblio, Error};
pub use bibtex::BibTex;

/// Text known to hold a bibliography in a given syntax.
///
/// Wrapping a [`String`] in a [`Format`] does not check it, only [`Format::parse`] does.
pub trait Format {
    /// Wrap the text without checking it.
    fn new(val: String) -> Self;

    /// Build the [`Biblio`] described by the text.
    ///
    /// # Errors
    ///
    /// [`crate::ErrorKind::Deserialize`] when the text is not valid for this format.
    fn parse(self) -> Result<Biblio, Error>;

    /// Write a [`Biblio`] in this format, every [`Biblio`] can be written.
    fn compose(biblio: &Biblio) -> Self;

    /// Unwrap the text.
    fn raw(self) -> String;
}

/// A sink of a [`Format`].
pub trait Writer {
    /// The format written.
    type Format: Format;

    /// Write the text of `format`.
    ///
    /// # Errors
    ///
    /// When the sink cannot take the text.
    fn write(&mut self, format: Self::Format) -> Result<(), Error>;

    /// Compose `ast` with [`Format::compose`] and write it.
    ///
    /// # Errors
    ///
    /// When the sink cannot take the text.
    fn write_ast(&mut self, ast: &Biblio) -> Result<(), Error> {
        self.write(Self::Format::compose(ast))
    }
}

/// A source of a [`Format`].
pub trait Reader {
    /// The format read.
    type Format: Format;

    /// Read the whole text of the source.
    ///
    /// # Errors
    ///
    /// When the source cannot be read.
    fn read(&mut self) -> Result<Self::Format, Error>;

    /// Read the text and parse it with [`Format::parse`].
    ///
    /// # Errors
    ///
    /// When the source cannot be read or its text cannot be parsed.
    fn read_ast(&mut self) -> Result<Biblio, Error> {
        self.read()?.parse()
    }
}

/// An in-memory [`Reader`] over text of the format `F`, such as a bibliography embedded in the
/// binary.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, PartialEq, Eq)]
pub struct FormatString<F: Format> {
    inner: String,
    _format: PhantomData<F>,
}

impl<F: Format> FormatString<F> {
    /// Wrap text of the format `F`.
    #[must_use]
    pub const fn new(val: String) -> Self {
        Self {
            inner: val,
            _format: PhantomData,
        }
    }
}

impl<F: Format> Reader for FormatString<F> {
    type Format = F;

    fn read(&mut self) -> Result<Self::Format, Error> {
        Ok(F::new(self.inner.clone()))
    }
}
