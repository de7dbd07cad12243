//! Search of journal articles through the Crossref `works` API.
//!
//! Results are paged with Crossref deep paging cursors. [`Works`] only requests the next page
//! once the current one is consumed, so stopping the iteration early stops the requests too.

use log::trace;
use reqwest::Url;
use serde::Deserialize;

use crate::{etiquette::Etiquette, Error, ErrorKind};

use super::Client;

const CROSSREF_WORKS_URL: &str = "https://api.crossref.org/works";

/// Number of candidates requested per page unless set otherwise.
pub const DEFAULT_ROWS: usize = 20;

/// Crossref API access through a [`Client`].
pub struct CrossRef<C: Client> {
    client: C,
    works_url: String,
}

impl CrossRef<reqwest::blocking::Client> {
    /// Create a [`CrossRef`] backed by a `reqwest` client.
    ///
    /// The etiquette, when given, identifies the caller in the `User-Agent` header.
    ///
    /// # Errors
    /// When the underlying HTTP client cannot be built.
    pub fn with_etiquette(etiquette: Option<&Etiquette>) -> Result<Self, Error> {
        let user_agent = etiquette.map_or_else(
            || concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_owned(),
            Etiquette::to_string,
        );
        trace!("Using user agent '{user_agent}'");

        reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .map(Self::new)
            .map_err(|e| Error::wrap_with(ErrorKind::IO, e, "Cannot create the HTTP client"))
    }
}

impl<C: Client> CrossRef<C> {
    /// Create a [`CrossRef`] with the given client, using the public Crossref API.
    pub fn new(client: C) -> Self {
        Self {
            client,
            works_url: CROSSREF_WORKS_URL.to_owned(),
        }
    }

    /// Lazily search the works matching the query.
    ///
    /// Every call starts again from the first page.
    pub fn works<'a>(&'a self, query: &'a WorksQuery) -> Works<'a, C> {
        Works {
            client: &self.client,
            works_url: &self.works_url,
            query,
            cursor: Some("*".to_owned()),
            page: Vec::new().into_iter(),
        }
    }
}

/// A bibliographic search of journal articles published in a single year, ordered by relevance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorksQuery {
    author: String,
    bibliographic: String,
    year: String,
    rows: usize,
}

impl WorksQuery {
    /// Search works of `author` similar to `bibliographic` published during `year`.
    #[must_use]
    pub fn new<A, B, Y>(author: A, bibliographic: B, year: Y) -> Self
    where
        A: Into<String>,
        B: Into<String>,
        Y: Into<String>,
    {
        Self {
            author: author.into(),
            bibliographic: bibliographic.into(),
            year: year.into(),
            rows: DEFAULT_ROWS,
        }
    }

    /// Set the number of candidates requested per page, at least one.
    #[must_use]
    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = rows.max(1);
        self
    }

    fn url(&self, works_url: &str, cursor: &str) -> Result<Url, Error> {
        let filter = format!(
            "from-pub-date:{0},until-pub-date:{0},type:journal-article",
            self.year
        );
        let rows = self.rows.to_string();

        Url::parse_with_params(
            works_url,
            [
                ("query.author", self.author.as_str()),
                ("query.bibliographic", self.bibliographic.as_str()),
                ("filter", filter.as_str()),
                ("sort", "score"),
                ("order", "desc"),
                ("select", "DOI,title"),
                ("rows", rows.as_str()),
                ("cursor", cursor),
            ],
        )
        .map_err(|e| Error::wrap_with(ErrorKind::Config, e, "Invalid Crossref works url"))
    }
}

/// A work returned by Crossref as a possible match.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    #[serde(rename = "DOI")]
    doi: String,
    #[serde(default)]
    title: Vec<String>,
}

impl Candidate {
    /// The DOI of the work.
    #[must_use]
    pub fn doi(&self) -> &str {
        &self.doi
    }

    /// The main title of the work, Crossref may not have one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.first().map(String::as_str)
    }

    /// Consume the candidate for its DOI.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // drop is not const
    pub fn into_doi(self) -> String {
        self.doi
    }
}

#[derive(Deserialize)]
struct QueryResult {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    #[serde(rename = "next-cursor", default)]
    next_cursor: Option<String>,
    #[serde(default)]
    items: Vec<Candidate>,
}

/// Forward only iterator over the candidates of a [`WorksQuery`].
///
/// A failed request is yielded once as an [`Err`] and ends the iteration.
pub struct Works<'a, C: Client> {
    client: &'a C,
    works_url: &'a str,
    query: &'a WorksQuery,
    // cursor of the next page to request, `None` once the last page was requested
    cursor: Option<String>,
    page: std::vec::IntoIter<Candidate>,
}

impl<C: Client> Works<'_, C> {
    fn fetch_page(&mut self, cursor: &str) -> Result<(), Error> {
        let url = self.query.url(self.works_url, cursor)?;
        trace!("Requesting Crossref works page: {url}");

        let QueryResult {
            message: Message { next_cursor, items },
        } = self.client.get_json(url.as_str())?;
        trace!("{} candidates received", items.len());

        // a short page is the last one
        if items.len() >= self.query.rows {
            self.cursor = next_cursor;
        }
        self.page = items.into_iter();
        Ok(())
    }
}

impl<C: Client> Iterator for Works<'_, C> {
    type Item = Result<Candidate, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(candidate) = self.page.next() {
                return Some(Ok(candidate));
            }

            let cursor = self.cursor.take()?;
            if let Err(e) = self.fetch_page(&cursor) {
                return Some(Err(e));
            }
        }
    }
}

impl<C: Client> std::iter::FusedIterator for Works<'_, C> {}
