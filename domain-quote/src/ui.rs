//! Terminal output for domain-quote.
//!
//! Results go to stdout as tab-separated rows (or JSON); progress, the
//! abort notice and the summary go to stderr so stdout stays pipeable.
//! Uses only the `console` crate for styling and line control.

use console::{style, Term};
use domain_quote_lib::{BatchReport, DomainQuote, Progress, QuoteSink};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Upper bounds applied to quotes before they are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceCeilings {
    pub max_order: Option<Decimal>,
    pub max_renew: Option<Decimal>,
}

impl PriceCeilings {
    pub fn allows(&self, quote: &DomainQuote) -> bool {
        quote.within(self.max_order, self.max_renew)
    }
}

/// Column header of the text table.
pub const HEADER: &str = "domain\trenew\torder";

/// One table row, prices rounded to `precision` decimals.
pub fn format_row(quote: &DomainQuote, precision: usize) -> String {
    format!(
        "{}\t{}\t{}",
        quote.name(),
        format_price(quote.renew_price(), precision),
        format_price(quote.order_price(), precision)
    )
}

fn format_price(price: Decimal, precision: usize) -> String {
    let rounded =
        price.round_dp_with_strategy(precision as u32, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.prec$}", rounded, prec = precision)
}

/// One quote as a single-line JSON object.
pub fn format_json(quote: &DomainQuote) -> Result<String, serde_json::Error> {
    serde_json::to_string(quote)
}

/// The `succeeded/failed: domain` progress line.
pub fn format_progress(progress: Progress, domain: &str) -> String {
    format!("{}/{}: {}", progress.succeeded, progress.failed, domain)
}

/// Sink that prints streamed quotes and progress for one batch.
pub struct TerminalOutput {
    stderr: Term,
    precision: usize,
    json: bool,
    ceilings: PriceCeilings,
    filtered: AtomicUsize,
    progress_visible: AtomicBool,
}

impl TerminalOutput {
    pub fn new(precision: usize, json: bool, ceilings: PriceCeilings) -> Self {
        Self {
            stderr: Term::stderr(),
            precision,
            json,
            ceilings,
            filtered: AtomicUsize::new(0),
            progress_visible: AtomicBool::new(false),
        }
    }

    /// Quotes hidden by the price ceilings so far.
    pub fn filtered(&self) -> usize {
        self.filtered.load(Ordering::Relaxed)
    }

    /// Print the table header (text mode only).
    pub fn print_header(&self) {
        if !self.json {
            println!("{}", HEADER);
        }
    }

    /// Erase the progress line if one is on screen.
    pub fn clear_progress(&self) {
        if self.progress_visible.swap(false, Ordering::Relaxed) {
            let _ = self.stderr.clear_line();
        }
    }

    /// Print a buffered batch: header then rows, or one JSON object per line.
    pub fn print_collected(&self, quotes: &[DomainQuote]) -> Result<(), serde_json::Error> {
        self.clear_progress();
        self.print_header();

        for quote in quotes.iter().filter(|quote| self.keep(quote)) {
            if self.json {
                println!("{}", format_json(quote)?);
            } else {
                println!("{}", format_row(quote, self.precision));
            }
        }
        Ok(())
    }

    /// Print the end-of-batch summary to stderr.
    pub fn print_summary(&self, report: &BatchReport) {
        self.clear_progress();

        let filtered = self.filtered();
        let mut parts = vec![
            format!("{} quoted", style(report.quotes.len() - filtered).green().bold()),
            format!("{} failed", style(report.failed).dim()),
        ];
        if filtered > 0 {
            parts.push(format!("{} over budget", filtered));
        }
        if report.skipped > 0 {
            parts.push(format!("{} skipped", style(report.skipped).yellow()));
        }

        let status = if report.aborted {
            style("Aborted").red().bold().to_string()
        } else {
            style("Done").bold().to_string()
        };

        eprintln!(
            "{}: {} in {:.1}s",
            status,
            parts.join(", "),
            report.duration.as_secs_f64()
        );
    }

    fn keep(&self, quote: &DomainQuote) -> bool {
        if self.ceilings.allows(quote) {
            true
        } else {
            self.filtered.fetch_add(1, Ordering::Relaxed);
            false
        }
    }
}

impl QuoteSink for TerminalOutput {
    fn quote(&self, quote: &DomainQuote) {
        if !self.keep(quote) {
            return;
        }

        if self.json {
            match format_json(quote) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!(domain = quote.name(), error = %e, "Cannot encode quote"),
            }
        } else {
            println!("{}", format_row(quote, self.precision));
        }
    }

    fn progress(&self, progress: Progress, domain: &str) {
        if !self.stderr.is_term() {
            return;
        }

        let _ = self.stderr.clear_line();
        let _ = self
            .stderr
            .write_str(&style(format_progress(progress, domain)).dim().to_string());
        self.progress_visible.store(true, Ordering::Relaxed);
    }
}
