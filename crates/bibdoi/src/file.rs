//! Format supporting Filesystem operations.
//!
//! [`FormatFile`] reads a bibliography file in a supported format and writes the completed
//! bibliography back out.

use std::{
    fs::{File, OpenOptions},
    io::{Read, Write},
    marker::PhantomData,
    path::Path,
};

use crate::{
    format::{Format, Reader, Writer},
    Error, ErrorKind,
};

/// An open bibliography file holding text of the format `F`.
///
/// The file is closed when dropped.
#[allow(clippy::module_name_repetitions)]
pub struct FormatFile<F: Format> {
    file: File,
    _format: PhantomData<F>,
}

impl<F: Format> FormatFile<F> {
    const fn new(file: File) -> Self {
        Self {
            file,
            _format: PhantomData,
        }
    }

    /// Open an existing bibliography for reading.
    ///
    /// # Errors
    /// [`ErrorKind::IO`] naming `path` when the file does not exist or cannot be opened.
    ///
    /// # Examples
    /// ```no_run
    /// use bibdoi::{file::FormatFile, format::{BibTex, Reader}};
    ///
    /// fn main() -> Result<(), bibdoi::Error> {
    ///     let biblio = FormatFile::<BibTex>::open("refs.bib")?.read_ast()?;
    ///     Ok(())
    /// }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        OpenOptions::new()
            .read(true)
            .open(path)
            .map(Self::new)
            .map_err(|e| {
                Error::wrap_with(
                    ErrorKind::IO,
                    e,
                    format!("Failed to open the '{}' file for reading", path.display()),
                )
            })
    }

    /// Open a bibliography for writing, creating the file or emptying the existing one.
    ///
    /// # Errors
    /// [`ErrorKind::IO`] naming `path` when the file cannot be created or opened.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(path)
            .map(Self::new)
            .map_err(|e| {
                Error::wrap_with(
                    ErrorKind::IO,
                    e,
                    format!("Failed to create the '{}' file for writing", path.display()),
                )
            })
    }
}

impl<F: Format> Reader for FormatFile<F> {
    type Format = F;

    fn read(&mut self) -> Result<Self::Format, Error> {
        let mut content = String::new();
        self.file
            .read_to_string(&mut content)
            .map_err(|e| Error::wrap_with(ErrorKind::IO, e, "Cannot read contents of file"))
            .map(move |bytes| {
                log::trace!("{bytes} bytes read from the file");
                F::new(content)
            })
    }
}

impl<F: Format> Writer for FormatFile<F> {
    type Format = F;

    fn write(&mut self, format: F) -> Result<(), Error> {
        let bytes = format.raw().into_bytes();
        log::trace!("writing {} bytes to the file", bytes.len());
        self.file
            .write_all(&bytes)
            .and_then(|_| self.file.flush())
            .map_err(|e| Error::wrap_with(ErrorKind::IO, e, "Cannot write format to file"))
    }
}
