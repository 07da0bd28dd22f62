//! Sequential, rate-limited resolution loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use citegraph_core::{ProgressContext, RateLimiter, Report, fmt_num, shutdown_flag};
use citegraph_corpus::{Field, Record};

use crate::api::SemanticScholarClient;
use crate::config::Config;
use crate::processed::ProcessedSet;
use crate::source::{CitationSource, LookupKey};
use crate::tables::LinkStore;

/// Counts for one resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    pub total: usize,
    /// Lookups that succeeded (with or without edges)
    pub resolved: usize,
    pub failed: usize,
    /// Failures that will not be retried
    pub permanent_failures: usize,
    /// Already present in the persisted tables
    pub skipped: usize,
    /// Records with neither DOI nor PubMed ID
    pub no_identifier: usize,
    pub citation_rows: usize,
    pub reference_rows: usize,
    /// Stopped early by a shutdown request
    pub interrupted: bool,
    /// Stopped early by the configured lookup limit
    pub limited: bool,
    pub elapsed: Duration,
}

impl ResolveSummary {
    pub fn report(&self) -> Report {
        let mut report = Report::new("Resolve")
            .row("Records", fmt_num(self.total))
            .row("Resolved", fmt_num(self.resolved))
            .row("Already processed", fmt_num(self.skipped))
            .row("Failed", fmt_num(self.failed))
            .row("  of which permanent", fmt_num(self.permanent_failures))
            .row("No identifier", fmt_num(self.no_identifier))
            .row("Citation rows", fmt_num(self.citation_rows))
            .row("Reference rows", fmt_num(self.reference_rows))
            .row("Elapsed", format!("{:.1}s", self.elapsed.as_secs_f64()));
        if self.interrupted {
            report.push("Status", "interrupted");
        } else if self.limited {
            report.push("Status", "stopped at lookup limit");
        }
        report
    }
}

/// Look up every record not yet processed, appending results to `store`.
///
/// One lookup at a time, spaced by `limiter`. Per-record failures are
/// logged to the failed-fetch table and never stop the loop; only table
/// I/O errors do. `cancel` is checked between records.
#[allow(clippy::too_many_arguments)]
pub fn run_resolution(
    corpus: &[Record],
    source: &dyn CitationSource,
    store: &mut LinkStore,
    processed: &mut ProcessedSet,
    limiter: &mut RateLimiter,
    limit: Option<usize>,
    progress: &ProgressContext,
    cancel: &AtomicBool,
) -> anyhow::Result<ResolveSummary> {
    let start = Instant::now();
    let mut summary = ResolveSummary {
        total: corpus.len(),
        ..Default::default()
    };
    let pb = progress.record_bar("resolve", corpus.len() as u64);
    let mut lookups = 0usize;

    for record in corpus {
        if cancel.load(Ordering::Relaxed) {
            log::warn!("Shutdown requested, stopping resolution");
            summary.interrupted = true;
            break;
        }
        if limit.is_some_and(|max| lookups >= max) {
            log::info!("Lookup limit of {lookups} reached");
            summary.limited = true;
            break;
        }
        pb.inc(1);

        let key = match LookupKey::for_record(record) {
            Ok(key) => key,
            Err(e) => {
                log::debug!(
                    "{:?}: {e}",
                    record.get(Field::Title).unwrap_or("<untitled>")
                );
                summary.no_identifier += 1;
                continue;
            }
        };
        let identifier = key.value().to_string();
        if processed.contains(&identifier) {
            summary.skipped += 1;
            continue;
        }

        limiter.wait();
        lookups += 1;
        match source.lookup(&key) {
            Ok(links) => {
                log::debug!(
                    "{key}: {} citations, {} references",
                    links.citations.len(),
                    links.references.len()
                );
                store.append_links(&identifier, &links)?;
                summary.citation_rows += links.citations.len();
                summary.reference_rows += links.references.len();
                summary.resolved += 1;
                processed.insert(identifier);
            }
            Err(e) => {
                log::warn!("{key}: {e}");
                store.append_failure(record, &e)?;
                summary.failed += 1;
                if e.is_permanent() {
                    summary.permanent_failures += 1;
                    processed.insert(identifier);
                }
            }
        }
    }

    pb.finish_and_clear();
    summary.elapsed = start.elapsed();
    Ok(summary)
}

/// Resolve `corpus` against Semantic Scholar per `config`, resuming from
/// whatever the output directory already holds.
pub fn run(
    config: &Config,
    corpus: &[Record],
    progress: &ProgressContext,
) -> anyhow::Result<ResolveSummary> {
    let mut processed = ProcessedSet::load(&config.output_dir)?;
    if processed.malformed > 0 {
        log::warn!("{} malformed rows skipped in lookup tables", processed.malformed);
    }
    let client = SemanticScholarClient::new(config.api_url.clone(), config.api_key.clone());
    let mut store = LinkStore::open(&config.output_dir)?;
    let mut limiter = RateLimiter::new(config.delay);
    log::info!(
        "Resolving {} records ({} already processed), {:?} between lookups",
        fmt_num(corpus.len()),
        fmt_num(processed.len()),
        limiter.interval()
    );
    run_resolution(
        corpus,
        &client,
        &mut store,
        &mut processed,
        &mut limiter,
        config.limit,
        progress,
        shutdown_flag(),
    )
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::ResolveError;
    use crate::source::{PaperLinks, PeerPaper};
    use crate::tables::{CITATIONS_FILE, FAILED_FILE, read_failed_rows, read_link_rows};

    /// Answers from a fixed script and remembers what was asked.
    struct Scripted {
        calls: RefCell<Vec<LookupKey>>,
    }

    impl Scripted {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CitationSource for Scripted {
        fn lookup(&self, key: &LookupKey) -> Result<PaperLinks, ResolveError> {
            self.calls.borrow_mut().push(key.clone());
            match key.value() {
                "10.1/gone" => Err(ResolveError::FetchFailed { status: 404 }),
                "10.1/busy" => Err(ResolveError::FetchFailed { status: 429 }),
                v => Ok(PaperLinks {
                    citations: vec![PeerPaper::new(format!("c-{v}"), format!("10.9/{v}"))],
                    references: vec![],
                }),
            }
        }
    }

    fn rec(doi: &str, pmid: &str) -> Record {
        Record::default()
            .with(Field::Title, format!("T {doi}{pmid}"))
            .with(Field::Doi, doi)
            .with(Field::SecondaryId, pmid)
    }

    fn corpus() -> Vec<Record> {
        vec![
            rec("10.1/A", "1"),
            rec("", "22"),
            rec("", ""),
            rec("10.1/gone", ""),
            rec("10.1/busy", ""),
        ]
    }

    fn go(
        dir: &std::path::Path,
        source: &Scripted,
        limit: Option<usize>,
        cancel: &AtomicBool,
    ) -> ResolveSummary {
        let mut store = LinkStore::open(dir).unwrap();
        let mut processed = ProcessedSet::load(dir).unwrap();
        let mut limiter = RateLimiter::new(Duration::ZERO);
        let progress = ProgressContext::with_tty(false);
        run_resolution(
            &corpus(),
            source,
            &mut store,
            &mut processed,
            &mut limiter,
            limit,
            &progress,
            cancel,
        )
        .unwrap()
    }

    #[test]
    fn first_run_counts() {
        let dir = tempfile::tempdir().unwrap();
        let source = Scripted::new();
        let summary = go(dir.path(), &source, None, &AtomicBool::new(false));

        assert_eq!(summary.total, 5);
        assert_eq!(summary.resolved, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.permanent_failures, 1);
        assert_eq!(summary.no_identifier, 1);
        assert_eq!(summary.citation_rows, 2);
        assert!(!summary.interrupted);

        // DOI preferred; PubMed ID used when DOI is blank
        let calls = source.calls.borrow();
        assert_eq!(calls[0], LookupKey::Doi("10.1/a".into()));
        assert_eq!(calls[1], LookupKey::Pmid("22".into()));

        let citations = read_link_rows(&dir.path().join(CITATIONS_FILE)).unwrap();
        assert_eq!(citations.rows[0].identifier, "10.1/a");
        assert_eq!(citations.rows[1].identifier, "22");
        let failed = read_failed_rows(&dir.path().join(FAILED_FILE)).unwrap();
        assert_eq!(failed.rows.len(), 2);
    }

    #[test]
    fn rerun_only_retries_transient_failures() {
        let dir = tempfile::tempdir().unwrap();
        go(dir.path(), &Scripted::new(), None, &AtomicBool::new(false));

        let source = Scripted::new();
        let summary = go(dir.path(), &source, None, &AtomicBool::new(false));
        assert_eq!(summary.skipped, 3);
        assert_eq!(*source.calls.borrow(), vec![LookupKey::Doi("10.1/busy".into())]);

        let citations = read_link_rows(&dir.path().join(CITATIONS_FILE)).unwrap();
        assert_eq!(citations.rows.len(), 2);
    }

    /// Finds the paper but nothing cites it and it cites nothing.
    struct Childless {
        calls: RefCell<usize>,
    }

    impl CitationSource for Childless {
        fn lookup(&self, _key: &LookupKey) -> Result<PaperLinks, ResolveError> {
            *self.calls.borrow_mut() += 1;
            Ok(PaperLinks::default())
        }
    }

    #[test]
    fn success_without_edges_is_not_looked_up_again() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = vec![rec("10.1/lonely", "")];
        let source = Childless {
            calls: RefCell::new(0),
        };
        let resolve_once = || {
            let mut store = LinkStore::open(dir.path()).unwrap();
            let mut processed = ProcessedSet::load(dir.path()).unwrap();
            run_resolution(
                &corpus,
                &source,
                &mut store,
                &mut processed,
                &mut RateLimiter::new(Duration::ZERO),
                None,
                &ProgressContext::with_tty(false),
                &AtomicBool::new(false),
            )
            .unwrap()
        };

        let first = resolve_once();
        assert_eq!(first.resolved, 1);
        assert_eq!(first.citation_rows + first.reference_rows, 0);

        let second = resolve_once();
        assert_eq!(second.resolved, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(*source.calls.borrow(), 1);
    }

    #[test]
    fn cancel_stops_before_first_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let source = Scripted::new();
        let summary = go(dir.path(), &source, None, &AtomicBool::new(true));
        assert!(summary.interrupted);
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn limit_caps_lookups() {
        let dir = tempfile::tempdir().unwrap();
        let source = Scripted::new();
        let summary = go(dir.path(), &source, Some(1), &AtomicBool::new(false));
        assert!(summary.limited);
        assert_eq!(source.calls.borrow().len(), 1);
    }

    #[test]
    fn report_rows() {
        let summary = ResolveSummary {
            total: 1200,
            interrupted: true,
            ..Default::default()
        };
        let report = summary.report();
        assert_eq!(report.rows()[0], ("Records".to_string(), "1,200".to_string()));
        assert_eq!(report.rows().last().unwrap().1, "interrupted");
    }
}
