//! Check the DOI search end to end against the live Crossref API with a bundled bibliography of
//! well known articles.

use bibdoi::{
    ast::{Biblio, Entry},
    etiquette::Etiquette,
    format::{BibTex, FormatString, Reader},
    matcher::MatcherConfig,
};

use eyre::{eyre, WrapErr};
use log::{error, info};

const EXAMPLE: &str = include_str!("../../data/example.bib");

/// Strip the DOI of the bundled articles, search them again and compare with the known ones.
///
/// Nothing is written to disk.
pub fn run(etiquette: Option<&Etiquette>, config: MatcherConfig) -> eyre::Result<()> {
    info!("Running the self test on the bundled example bibliography");

    let expected = FormatString::<BibTex>::new(EXAMPLE.to_owned())
        .read_ast()
        .wrap_err("The bundled example bibliography is invalid")?;
    let mut biblio = without_article_dois(&expected);

    let report = bibdoi::find_missing_dois(&mut biblio, etiquette, config)?;

    let failures = compare(&expected, &biblio);
    println!("{}", report.stats);

    if failures.is_empty() {
        println!("Self test passed");
        Ok(())
    } else {
        Err(eyre!(
            "Self test failed for {} of {} entries: {}",
            failures.len(),
            expected.len(),
            failures.join(", ")
        ))
    }
}

fn without_article_dois(biblio: &Biblio) -> Biblio {
    let entries = biblio
        .entries()
        .cloned()
        .map(|mut entry| {
            if entry.is_article() {
                entry.remove_field("doi");
            }
            entry
        })
        .collect();

    Biblio::new(entries)
}

/// Cite keys of the entries which do not come out as expected.
fn compare(expected: &Biblio, actual: &Biblio) -> Vec<String> {
    expected
        .entries()
        .filter(|entry| {
            let ok = actual
                .get(entry.cite())
                .is_some_and(|found| same_entry(entry, found));
            if !ok {
                error!("Entry '{}' is not the expected one", entry.cite());
            }
            !ok
        })
        .map(|entry| entry.cite().to_owned())
        .collect()
}

fn same_entry(expected: &Entry, actual: &Entry) -> bool {
    if !expected.is_article() {
        return expected == actual;
    }

    match (expected.get_field("doi"), actual.get_field("doi")) {
        (Some(expected_doi), Some(found)) => {
            let ok = expected_doi.eq_ignore_ascii_case(found);
            info!(
                "{}: expected {expected_doi}, found {found}",
                if ok { "OK" } else { "WRONG" }
            );
            ok
        }
        (Some(expected_doi), None) => {
            info!("MISSING: expected {expected_doi}");
            false
        }
        (None, _) => true,
    }
}
