//! Find the DOI of a single journal article.

use log::{info, trace, warn};

use crate::{
    api::{cross_ref::DEFAULT_ROWS, Client, CrossRef, WorksQuery},
    ast::Entry,
    similarity::sequence_ratio,
    Error, ErrorKind,
};

/// Tuning of the [`Matcher`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatcherConfig {
    /// A candidate is accepted when its title similarity is strictly greater than this ratio.
    pub threshold: f64,
    /// Once more candidates than this have been examined without a match the search stops.
    pub max_candidates: usize,
    /// Number of candidates requested per page.
    pub rows: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            max_candidates: 50,
            rows: DEFAULT_ROWS,
        }
    }
}

impl MatcherConfig {
    /// Checks the configuration values are usable.
    ///
    /// # Errors
    /// [`ErrorKind::Config`] when the threshold is not within `0.0..=1.0` or no candidate would
    /// be requested per page.
    pub fn validate(self) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::new(
                ErrorKind::Config,
                format!("Threshold must be between 0 and 1, got {}", self.threshold),
            ));
        }
        if self.rows == 0 {
            return Err(Error::new(
                ErrorKind::Config,
                "At least one candidate must be requested per page",
            ));
        }
        Ok(self)
    }
}

/// How the search for a single entry ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A candidate title was similar enough, holds its DOI.
    Matched(String),
    /// Every candidate was examined without a match.
    Exhausted,
    /// The maximum number of candidates was examined without a match.
    Capped,
    /// The entry lacks the author, title or year needed to search, nothing was requested.
    Malformed,
}

impl MatchOutcome {
    /// The DOI when a candidate was matched.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // drop is not const
    pub fn into_doi(self) -> Option<String> {
        match self {
            Self::Matched(doi) => Some(doi),
            _ => None,
        }
    }
}

/// Searches Crossref for the DOI of article entries.
pub struct Matcher<C: Client> {
    crossref: CrossRef<C>,
    config: MatcherConfig,
}

impl<C: Client> Matcher<C> {
    /// Create a matcher searching through `crossref`.
    pub const fn new(crossref: CrossRef<C>, config: MatcherConfig) -> Self {
        Self { crossref, config }
    }

    /// Search the DOI of `entry`.
    ///
    /// Candidates are requested by relevance and the first one whose title is similar enough to
    /// the title of the entry is accepted.
    ///
    /// # Errors
    /// Any error from the metadata service, the search is not retried.
    pub fn find_doi(&self, entry: &Entry) -> Result<MatchOutcome, Error> {
        let Some(fields) = SearchFields::from_entry(entry) else {
            warn!(
                "author, title and year fields are required to search the DOI of entry '{}'",
                entry.cite()
            );
            return Ok(MatchOutcome::Malformed);
        };

        let query =
            WorksQuery::new(fields.surname, fields.title, fields.year).rows(self.config.rows);
        let outcome = self.best_candidate(entry, &fields, &query)?;

        if matches!(outcome, MatchOutcome::Exhausted | MatchOutcome::Capped) {
            warn!(
                "MISSING: {}, {}",
                entry.get_field("author").map_or("", |a| &**a),
                fields.title
            );
        }

        Ok(outcome)
    }

    fn best_candidate(
        &self,
        entry: &Entry,
        fields: &SearchFields<'_>,
        query: &WorksQuery,
    ) -> Result<MatchOutcome, Error> {
        for (count, candidate) in (1..).zip(self.crossref.works(query)) {
            let candidate = candidate?;
            let ratio = candidate
                .title()
                .map_or(0.0, |title| sequence_ratio(fields.title, title));
            trace!(
                "candidate {count} '{}' ({}) has a ratio of {ratio:.3}",
                candidate.title().unwrap_or_default(),
                candidate.doi()
            );

            if ratio > self.config.threshold {
                return Ok(MatchOutcome::Matched(candidate.into_doi()));
            }

            if count > self.config.max_candidates {
                info!(
                    "Reached the maximum number of candidates ({}) for entry '{}'",
                    self.config.max_candidates,
                    entry.cite()
                );
                return Ok(MatchOutcome::Capped);
            }
        }

        Ok(MatchOutcome::Exhausted)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    Some(s.trim()).filter(|s| !s.is_empty())
}

/// The fields of an entry used to search for it.
struct SearchFields<'e> {
    surname: &'e str,
    title: &'e str,
    year: &'e str,
}

impl<'e> SearchFields<'e> {
    fn from_entry(entry: &'e Entry) -> Option<Self> {
        let author: &str = entry.get_field("author")?;
        let title: &str = entry.get_field("title")?;
        let year: &str = entry.get_field("year")?;

        // the first author is written "Surname, Given and ..." so keep what is before the comma
        let surname = author.split(',').next().and_then(non_empty)?;
        let title = non_empty(title)?;
        let year = non_empty(year).filter(|year| year.bytes().all(|b| b.is_ascii_digit()))?;

        Some(Self {
            surname,
            title,
            year,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        api::{
            assert_url, impl_producer, request_count, works_page, MockClient,
            NetworkErrorProducer, URL_SINK,
        },
        ast::ARTICLE,
    };

    use super::*;

    fn widgets_entry() -> Entry {
        Entry::new("smith2020".to_owned(), ARTICLE)
            .with_field("author", "Smith, J.")
            .with_field("title", "On Widgets")
            .with_field("year", "2020")
    }

    fn matcher<C: Client + Default>() -> Matcher<C> {
        Matcher::new(CrossRef::new(C::default()), MatcherConfig::default())
    }

    impl_producer! {
        WidgetsProducer => |_| Ok(works_page(&[("10.1/xyz", "On Widgets")], None)),
        DissimilarProducer => |_| Ok(works_page(
            &[("10.1/a", "A Survey of Gadgets"), ("10.1/b", "Gizmos")],
            None,
        )),
        SecondMatchesProducer => |_| Ok(works_page(
            &[("10.1/a", "Gadgets"), ("10.1/b", "On widgets"), ("10.1/c", "On Widgets")],
            None,
        )),
        // "abcdx" is exactly 0.8 similar to "abcde"
        BoundaryProducer => |_| Ok(works_page(&[("10.1/edge", "abcdx")], None)),
        EndlessProducer => |_| Ok(works_page(
            &[("10.1/a", "Gadgets"); 20],
            Some("more"),
        )),
    }

    #[test]
    fn identical_title_is_matched() {
        let outcome = matcher::<MockClient<WidgetsProducer>>()
            .find_doi(&widgets_entry())
            .unwrap();

        assert_eq!(MatchOutcome::Matched("10.1/xyz".to_owned()), outcome);
        assert_url!(contains
            "query.author=Smith&",
            "query.bibliographic=On+Widgets",
            "from-pub-date%3A2020%2Cuntil-pub-date%3A2020",
        );
    }

    #[test]
    fn first_similar_candidate_is_accepted() {
        // "On widgets" is 0.9 similar to "On Widgets"
        let outcome = matcher::<MockClient<SecondMatchesProducer>>()
            .find_doi(&widgets_entry())
            .unwrap();

        assert_eq!(Some("10.1/b".to_owned()), outcome.into_doi());
    }

    #[test]
    fn dissimilar_candidates_exhaust_the_search() {
        let outcome = matcher::<MockClient<DissimilarProducer>>()
            .find_doi(&widgets_entry())
            .unwrap();

        assert_eq!(MatchOutcome::Exhausted, outcome);
    }

    #[test]
    fn ratio_equal_to_the_threshold_is_rejected() {
        let entry = Entry::new("edge".to_owned(), ARTICLE)
            .with_field("author", "Smith, J.")
            .with_field("title", "abcde")
            .with_field("year", "2020");

        let outcome = matcher::<MockClient<BoundaryProducer>>()
            .find_doi(&entry)
            .unwrap();

        assert_eq!(MatchOutcome::Exhausted, outcome);
    }

    #[test]
    fn empty_result_exhausts_the_search() {
        let outcome = matcher::<MockClient>().find_doi(&widgets_entry()).unwrap();

        assert_eq!(MatchOutcome::Exhausted, outcome);
        assert_eq!(1, request_count());
    }

    #[test]
    fn search_stops_after_the_maximum_number_of_candidates() {
        let outcome = matcher::<MockClient<EndlessProducer>>()
            .find_doi(&widgets_entry())
            .unwrap();

        assert_eq!(MatchOutcome::Capped, outcome);
        // 51 candidates examined with pages of 20
        assert_eq!(3, request_count());
    }

    #[test]
    fn threshold_is_configurable() {
        let config = MatcherConfig {
            threshold: 0.95,
            ..MatcherConfig::default()
        };
        let matcher = Matcher::new(
            CrossRef::new(MockClient::<SecondMatchesProducer>::default()),
            config,
        );

        let outcome = matcher.find_doi(&widgets_entry()).unwrap();

        assert_eq!(Some("10.1/c".to_owned()), outcome.into_doi());
    }

    #[test]
    fn missing_year_is_malformed_without_request() {
        let entry = Entry::new("smith".to_owned(), ARTICLE)
            .with_field("author", "Smith, J.")
            .with_field("title", "On Widgets");

        let outcome = matcher::<MockClient<WidgetsProducer>>()
            .find_doi(&entry)
            .unwrap();

        assert_eq!(MatchOutcome::Malformed, outcome);
        assert_eq!(0, request_count());
        assert!(URL_SINK.with(|url| url.borrow().is_none()));
    }

    #[test]
    fn blank_or_non_numeric_fields_are_malformed() {
        let blank_author = widgets_entry().with_field("author", " , J.");
        let bad_year = widgets_entry().with_field("year", "in press");
        let blank_title = widgets_entry().with_field("title", "   ");

        let matcher = matcher::<MockClient<WidgetsProducer>>();
        for entry in [blank_author, bad_year, blank_title] {
            assert_eq!(MatchOutcome::Malformed, matcher.find_doi(&entry).unwrap());
        }
        assert_eq!(0, request_count());
    }

    #[test]
    fn fields_are_trimmed_and_surname_is_taken_before_the_comma() {
        let entry = Entry::new("doe".to_owned(), ARTICLE)
            .with_field("author", "  van Doe , Jane and Smith, J.")
            .with_field("title", "  On Widgets ")
            .with_field("year", " 2020 ");

        let outcome = matcher::<MockClient<WidgetsProducer>>()
            .find_doi(&entry)
            .unwrap();

        assert_eq!(Some("10.1/xyz".to_owned()), outcome.into_doi());
        assert_url!(contains "query.author=van+Doe&", "until-pub-date%3A2020%2C");
    }

    #[test]
    fn author_without_comma_is_used_whole() {
        let entry = widgets_entry().with_field("author", "Jane Doe");

        matcher::<MockClient<WidgetsProducer>>()
            .find_doi(&entry)
            .unwrap();

        assert_url!(contains "query.author=Jane+Doe&");
    }

    #[test]
    fn same_entry_and_candidates_give_the_same_outcome() {
        let matcher = matcher::<MockClient<SecondMatchesProducer>>();
        let entry = widgets_entry();

        assert_eq!(
            matcher.find_doi(&entry).unwrap(),
            matcher.find_doi(&entry).unwrap()
        );
    }

    #[test]
    fn service_error_is_returned() {
        let err = matcher::<MockClient<NetworkErrorProducer>>()
            .find_doi(&widgets_entry())
            .expect_err("NetworkErrorProducer always fails");

        assert_eq!(ErrorKind::IO, err.kind());
    }

    #[test]
    fn config_validation() {
        assert!(MatcherConfig::default().validate().is_ok());

        let too_high = MatcherConfig {
            threshold: 1.5,
            ..MatcherConfig::default()
        };
        assert_eq!(ErrorKind::Config, too_high.validate().unwrap_err().kind());

        let no_rows = MatcherConfig {
            rows: 0,
            ..MatcherConfig::default()
        };
        assert_eq!(ErrorKind::Config, no_rows.validate().unwrap_err().kind());
    }
}
