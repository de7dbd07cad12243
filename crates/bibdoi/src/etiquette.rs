//! Courtesy identifier sent to Crossref.
//!
//! Crossref routes requests that identify their caller to a "polite" pool with better service.
//! The identification travels in the `User-Agent` header.

use std::fmt;

use crate::{Error, ErrorKind};

/// Identifies the project making requests, along with a contact email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Etiquette {
    name: String,
    version: String,
    url: String,
    email: String,
}

impl Etiquette {
    /// Create the etiquette of the project `name` at `version`, hosted at `url` and reachable at
    /// the contact `email`.
    #[must_use]
    pub const fn new(name: String, version: String, url: String, email: String) -> Self {
        Self {
            name,
            version,
            url,
            email,
        }
    }
}

impl TryFrom<Vec<String>> for Etiquette {
    type Error = Error;

    /// Build the etiquette from exactly four strings: name, version, url and email.
    fn try_from(values: Vec<String>) -> Result<Self, Self::Error> {
        let count = values.len();
        let [name, version, url, email]: [String; 4] = values.try_into().map_err(|_| {
            Error::new(
                ErrorKind::Config,
                format!(
                    "Etiquette must contain 4 strings (project name, version, url and contact \
                     email) but {count} were given"
                ),
            )
        })?;

        Ok(Self::new(name, version, url, email))
    }
}

impl fmt::Display for Etiquette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}; mailto:{}) BasedOn: {}/{}",
            self.name,
            self.version,
            self.url,
            self.email,
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )
    }
}
