//! Walk a bibliography and fill in the DOI of the journal articles lacking one.

use std::fmt;

use log::info;

use crate::{
    api::Client,
    ast::{Biblio, FieldValue},
    matcher::Matcher,
    Error,
};

/// Counters of a single scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Journal articles seen.
    pub entry: usize,
    /// Articles without a DOI that were searched.
    pub doi_search: usize,
    /// Searches that did not find a DOI.
    pub doi_missing: usize,
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} still missing doi, {} doi searches, in {} bibtex entries",
            self.doi_missing, self.doi_search, self.entry
        )
    }
}

/// Result of [`scan`], the bibliography itself is updated in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Cite keys of the articles still without a DOI, in bibliography order.
    pub missing: Vec<String>,
    /// Counters of the scan.
    pub stats: RunStatistics,
}

/// Search the DOI of every journal article of `biblio` that does not have one.
///
/// Found DOIs are stored in the `doi` field of their entry. Articles which already have a DOI are
/// counted but never searched, other kinds of entries are ignored.
///
/// # Errors
/// The first error returned by the metadata service stops the scan. Entries updated before the
/// error keep their new DOI.
pub fn scan<C: Client>(biblio: &mut Biblio, matcher: &Matcher<C>) -> Result<ScanReport, Error> {
    info!("Start to process {} bibtex entries", biblio.len());

    let mut report = ScanReport::default();
    for entry in biblio.entries_mut().filter(|e| e.is_article()) {
        report.stats.entry += 1;
        if entry.contains_field("doi") {
            continue;
        }

        report.stats.doi_search += 1;
        match matcher.find_doi(entry)?.into_doi() {
            Some(doi) => {
                info!(
                    "FOUND: {}, {}, {doi}",
                    entry.get_field("author").map_or("", |a| &**a),
                    entry.get_field("title").map_or("", |t| &**t),
                );
                entry.set_field("doi", FieldValue::from(doi));
            }
            None => {
                report.stats.doi_missing += 1;
                report.missing.push(entry.cite().to_owned());
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use crate::{
        api::{impl_producer, request_count, works_page, CrossRef, MockClient, NetworkErrorProducer},
        ast::{Entry, ARTICLE},
        matcher::MatcherConfig,
        ErrorKind,
    };

    use super::*;

    fn matcher<C: Client + Default>() -> Matcher<C> {
        Matcher::new(CrossRef::new(C::default()), MatcherConfig::default())
    }

    fn article(cite: &str, title: &str) -> Entry {
        Entry::new(cite.to_owned(), ARTICLE)
            .with_field("author", "Smith, J.")
            .with_field("title", title)
            .with_field("year", "2020")
    }

    impl_producer! {
        WidgetsProducer => |_| Ok(works_page(&[("10.1/xyz", "On Widgets")], None)),
        // only the widgets query finds its article
        ByTitleProducer => |url| {
            if url.contains("query.bibliographic=On+Widgets") {
                Ok(works_page(&[("10.1/xyz", "On Widgets")], None))
            } else {
                Ok(works_page(&[("10.1/a", "Something else entirely")], None))
            }
        },
    }

    #[test]
    fn non_articles_are_not_counted_nor_searched() {
        let mut biblio = Biblio::new(vec![
            Entry::new("book".to_owned(), "book").with_field("title", "On Widgets"),
            Entry::new("conf".to_owned(), "inproceedings").with_field("title", "On Widgets"),
        ]);

        let report = scan(&mut biblio, &matcher::<MockClient<WidgetsProducer>>()).unwrap();

        assert_eq!(RunStatistics::default(), report.stats);
        assert!(report.missing.is_empty());
        assert_eq!(0, request_count());
        assert!(!biblio.get("book").unwrap().contains_field("doi"));
    }

    #[test]
    fn articles_with_a_doi_are_not_searched() {
        let mut biblio = Biblio::new(vec![
            article("a", "On Widgets").with_field("doi", "10.1/existing")
        ]);

        let report = scan(&mut biblio, &matcher::<MockClient<WidgetsProducer>>()).unwrap();

        assert_eq!(1, report.stats.entry);
        assert_eq!(0, report.stats.doi_search);
        assert_eq!(0, request_count());
        assert_eq!(
            "10.1/existing",
            &**biblio.get("a").unwrap().get_field("doi").unwrap()
        );
    }

    #[test]
    fn found_doi_is_added_to_the_entry() {
        let mut biblio = Biblio::new(vec![article("smith2020", "On Widgets")]);

        let report = scan(&mut biblio, &matcher::<MockClient<WidgetsProducer>>()).unwrap();

        assert_eq!(
            RunStatistics {
                entry: 1,
                doi_search: 1,
                doi_missing: 0
            },
            report.stats
        );
        assert!(report.missing.is_empty());
        assert_eq!(
            "10.1/xyz",
            &**biblio.get("smith2020").unwrap().get_field("doi").unwrap()
        );
    }

    #[test]
    fn unmatched_article_is_reported_missing_once() {
        let mut biblio = Biblio::new(vec![article("gizmos", "Gizmos")]);

        let report = scan(&mut biblio, &matcher::<MockClient<WidgetsProducer>>()).unwrap();

        assert_eq!(vec!["gizmos".to_owned()], report.missing);
        assert_eq!(1, report.stats.doi_missing);
        assert!(!biblio.get("gizmos").unwrap().contains_field("doi"));
    }

    #[test]
    fn malformed_article_is_missing_without_request() {
        let mut biblio = Biblio::new(vec![Entry::new("noyear".to_owned(), ARTICLE)
            .with_field("author", "Smith, J.")
            .with_field("title", "On Widgets")]);

        let report = scan(&mut biblio, &matcher::<MockClient<WidgetsProducer>>()).unwrap();

        assert_eq!(vec!["noyear".to_owned()], report.missing);
        assert_eq!(1, report.stats.doi_search);
        assert_eq!(0, request_count());
    }

    #[test]
    fn statistics_add_up_on_a_mixed_bibliography() {
        let mut biblio = Biblio::new(vec![
            article("gadgets", "A Survey of Gadgets"),
            Entry::new("book".to_owned(), "book"),
            article("widgets", "On Widgets"),
            article("known", "Known").with_field("doi", "10.1/known"),
            article("gizmos", "Gizmos"),
        ]);

        let report = scan(&mut biblio, &matcher::<MockClient<ByTitleProducer>>()).unwrap();
        let stats = report.stats;

        assert_eq!(4, stats.entry);
        assert_eq!(3, stats.doi_search);
        assert_eq!(2, stats.doi_missing);
        assert_eq!(vec!["gadgets".to_owned(), "gizmos".to_owned()], report.missing);
        assert_eq!(
            "2 still missing doi, 3 doi searches, in 4 bibtex entries",
            stats.to_string()
        );

        let cites: Vec<_> = biblio.entries().map(Entry::cite).collect();
        assert_eq!(vec!["gadgets", "book", "widgets", "known", "gizmos"], cites);
    }

    #[test]
    fn service_error_stops_the_scan() {
        let mut biblio = Biblio::new(vec![article("a", "On Widgets"), article("b", "Gizmos")]);

        let err = scan(&mut biblio, &matcher::<MockClient<NetworkErrorProducer>>())
            .expect_err("NetworkErrorProducer always fails");

        assert_eq!(ErrorKind::IO, err.kind());
        assert_eq!(1, request_count());
    }
}
