#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{path::PathBuf, process};

mod selftest;

use bibdoi::{
    etiquette::Etiquette,
    file::FormatFile,
    format::{BibTex, Reader, Writer},
    matcher::MatcherConfig,
};

use clap::Parser;
use eyre::WrapErr;
use log::{error, info, trace};

fn main() {
    if let Err(err) = try_main() {
        error!("{:#}", err);
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let Cli {
        input,
        output,
        etiquette,
        threshold,
        max_candidates,
        verbosity,
        quiet,
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    // checked before touching any file
    let etiquette = etiquette.map(Etiquette::try_from).transpose()?;
    if let Some(etiquette) = &etiquette {
        info!("Using etiquette '{etiquette}'");
    }

    let config = MatcherConfig {
        threshold,
        max_candidates,
        ..MatcherConfig::default()
    }
    .validate()?;

    let Some(input) = input else {
        trace!("No input file given - running the self test");
        return selftest::run(etiquette.as_ref(), config);
    };

    let mut biblio = FormatFile::<BibTex>::open(&input)?
        .read_ast()
        .wrap_err_with(|| format!("Cannot read the bibliography in '{}'", input.display()))?;

    let report = bibdoi::find_missing_dois(&mut biblio, etiquette.as_ref(), config)?;

    trace!("Writing the bibliography to '{}'..", output.display());
    FormatFile::<BibTex>::create(&output)?.write_ast(&biblio)?;
    trace!("Done!");

    if !quiet {
        println!("{}", report.stats);
        if !report.missing.is_empty() {
            println!("Missing DOI: {}", report.missing.join(", "));
        }
    }

    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    // if quiet then ignore verbosity but still show warnings and errors
    let verbosity = if quiet { 1 } else { verbosity + 2 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "bibdoi")]
#[clap(about = "Add the missing DOIs of the journal articles in a BibTeX file using Crossref")]
#[clap(version, author)]
struct Cli {
    /// The BibTeX file to complete, the bundled example is checked when omitted
    #[clap(parse(from_os_str))]
    input: Option<PathBuf>,

    /// The file the completed bibliography is written to
    #[clap(parse(from_os_str), default_value = "out.bib")]
    output: PathBuf,

    /// Identify yourself to Crossref for a better service
    ///
    /// Must be given exactly four values: project name, version, url and contact email.
    #[clap(short, long, multiple_values = true)]
    etiquette: Option<Vec<String>>,

    /// Title similarity a candidate must exceed to be accepted
    #[clap(short, long, default_value_t = 0.8)]
    threshold: f64,

    /// Number of candidates examined per entry before giving up
    #[clap(short, long, default_value_t = 50)]
    max_candidates: usize,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Prevents the program from writing to stdout, warnings and errors will still be printed to
    /// stderr.
    #[clap(short, long)]
    quiet: bool,
}
