//! Domain Quote CLI Application
//!
//! A command-line interface for checking which domains can be registered
//! at OVH and what they cost. This CLI application is a thin layer over
//! the domain-quote-lib library.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use domain_quote_lib::{
    domain_hacks, expand_domain_inputs, load_env_config, needs_tld_expansion,
    parse_timeout_string, CancellationFlag, CandidateSet, CheckConfig, ConfigManager,
    DomainQuoteError, DomainQuoter, EnvConfig, FileConfig, OutputMode, SortDirection, SortKey,
    TldFilter, TldRule, MAX_PRECISION,
};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use ui::{PriceCeilings, TerminalOutput};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Decimals printed when nothing else is configured.
const DEFAULT_PRECISION: usize = 2;

/// Exit status of a batch stopped with Ctrl-C.
const EXIT_ABORTED: i32 = 130;

/// CLI arguments for domain-quote
#[derive(Parser, Debug)]
#[command(name = "domain-quote")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check availability and registration prices of many domains at once")]
#[command(
    long_about = "Check availability and registration prices of many domains at once using the OVH order API.\n\nBare names are expanded over the registrar's TLD catalog (or the TLDs given with -t). Results are printed as `domain<TAB>renew<TAB>order`, streamed as they arrive with `--sort none` or sorted once every lookup is done."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domain names to check (bare names or FQDNs)
    #[arg(value_name = "DOMAINS", help_heading = "Domain Selection")]
    pub domains: Vec<String>,

    /// Input file with domains, one per line ('-' reads stdin)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help_heading = "Domain Selection"
    )]
    pub file: Option<String>,

    /// TLDs to expand bare names with (comma-separated or multiple -t flags)
    #[arg(short = 't', long = "tld", value_name = "TLD", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Domain Selection")]
    pub tlds: Option<Vec<String>>,

    /// Look for domain hacks instead (e.g. "delicious" -> delicio.us)
    #[arg(long = "hack", help_heading = "Domain Selection")]
    pub hack: bool,

    /// Print the filtered TLD catalog and exit
    #[arg(long = "list-tlds", conflicts_with_all = ["domains", "file", "tlds", "hack"], help_heading = "Domain Selection")]
    pub list_tlds: bool,

    /// Print the domains that would be checked without checking them
    #[arg(long = "dry-run", help_heading = "Domain Selection")]
    pub dry_run: bool,

    /// Include second-level TLDs such as co.uk
    #[arg(long = "include-sld", help_heading = "TLD Filter")]
    pub include_sld: bool,

    /// Include internationalized (xn--) TLDs
    #[arg(long = "include-intl", help_heading = "TLD Filter")]
    pub include_intl: bool,

    /// Skip TLDs longer than this
    #[arg(long = "max-length", value_name = "N", help_heading = "TLD Filter")]
    pub max_length: Option<usize>,

    /// Accept TLDs matching REGEX (rules apply in command-line order)
    #[arg(
        short = 'm',
        long = "match",
        value_name = "REGEX",
        help_heading = "TLD Filter"
    )]
    pub match_rules: Vec<String>,

    /// Reject TLDs matching REGEX (rules apply in command-line order)
    #[arg(
        short = 'n',
        long = "no-match",
        value_name = "REGEX",
        help_heading = "TLD Filter"
    )]
    pub no_match_rules: Vec<String>,

    /// Sort key: none, alphabetic, price, renew or order (prefixes work)
    #[arg(
        short = 's',
        long = "sort",
        value_name = "KEY",
        help_heading = "Output Format"
    )]
    pub sort: Option<SortKey>,

    /// Sort from most to least expensive (or Z to A)
    #[arg(long = "descending", help_heading = "Output Format")]
    pub descending: bool,

    /// Decimals printed for prices (default: 2, max: 8)
    #[arg(long = "precision", value_name = "N", help_heading = "Output Format")]
    pub precision: Option<usize>,

    /// Hide domains whose first-year price is above this
    #[arg(
        long = "max-order",
        value_name = "PRICE",
        allow_negative_numbers = true,
        help_heading = "Output Format"
    )]
    pub max_order: Option<Decimal>,

    /// Hide domains whose renewal price is above this
    #[arg(
        long = "max-renew",
        value_name = "PRICE",
        allow_negative_numbers = true,
        help_heading = "Output Format"
    )]
    pub max_renew: Option<Decimal>,

    /// Output one JSON object per line instead of the table
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Max concurrent lookups (default: 10, max: 100)
    #[arg(short = 'c', long = "concurrency", help_heading = "Registrar")]
    pub concurrency: Option<usize>,

    /// Per-request timeout, like "10s" or "1m"
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Registrar")]
    pub timeout: Option<String>,

    /// OVH subsidiary whose prices are used (default: ES)
    #[arg(long = "subsidiary", value_name = "CODE", help_heading = "Registrar")]
    pub subsidiary: Option<String>,

    /// Also accept transfer and renewal offers, not only new registrations
    #[arg(long = "any-action", help_heading = "Registrar")]
    pub any_action: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore all config files
    #[arg(long = "no-config", conflicts_with = "config", help_heading = "Configuration")]
    pub no_config: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Everything a run needs, after config files, env and flags are merged.
#[derive(Debug)]
struct Settings {
    check: CheckConfig,
    filter: TldFilter,
    sort: SortKey,
    direction: SortDirection,
    precision: usize,
    ceilings: PriceCeilings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check: CheckConfig::default(),
            filter: TldFilter::default(),
            sort: SortKey::default(),
            direction: SortDirection::Ascending,
            precision: DEFAULT_PRECISION,
            ceilings: PriceCeilings::default(),
        }
    }
}

/// How a run ended, when it did not fail outright.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Completed,
    Aborted,
}

#[tokio::main]
async fn main() {
    // Parsed by hand so the relative order of -m and -n survives
    let matches = Args::command().get_matches();
    let args = match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    init_logging(args.verbose);

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let rules = match ordered_tld_rules(&matches) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match run_domain_quote(args, rules).await {
        Ok(Outcome::Completed) => {}
        Ok(Outcome::Aborted) => process::exit(EXIT_ABORTED),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Send library and CLI diagnostics to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let default_directives = if verbose {
        "warn,domain_quote=debug,domain_quote_lib=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn validate_args(args: &Args) -> Result<(), String> {
    if args.list_tlds {
        return Ok(());
    }

    if args.domains.is_empty() && args.file.is_none() {
        return Err(
            "You must specify domain names, a file with --file, or --list-tlds".to_string(),
        );
    }

    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > 100 {
            return Err("Concurrency must be between 1 and 100".to_string());
        }
    }

    if let Some(precision) = args.precision {
        if precision > MAX_PRECISION {
            return Err(format!("Precision must be at most {}", MAX_PRECISION));
        }
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                timeout
            ));
        }
    }

    if args.max_length == Some(0) {
        return Err("--max-length must be at least 1".to_string());
    }

    for (flag, limit) in [("--max-order", args.max_order), ("--max-renew", args.max_renew)] {
        if limit.is_some_and(|max| max.is_sign_negative()) {
            return Err(format!("{} may not be negative", flag));
        }
    }

    Ok(())
}

/// Build `-m` / `-n` rules in the order they were given.
fn ordered_tld_rules(matches: &ArgMatches) -> Result<Vec<TldRule>, DomainQuoteError> {
    let mut indexed = Vec::new();

    for (id, must_match) in [("match_rules", true), ("no_match_rules", false)] {
        let (Some(patterns), Some(indices)) =
            (matches.get_many::<String>(id), matches.indices_of(id))
        else {
            continue;
        };

        for (index, pattern) in indices.zip(patterns) {
            indexed.push((index, pattern.as_str(), must_match));
        }
    }

    indexed.sort_by_key(|(index, _, _)| *index);
    indexed
        .into_iter()
        .map(|(_, pattern, must_match)| {
            if must_match {
                TldRule::matching(pattern)
            } else {
                TldRule::not_matching(pattern)
            }
        })
        .collect()
}

async fn run_domain_quote(
    args: Args,
    rules: Vec<TldRule>,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let settings = build_settings(&args, rules)?;
    debug!(config = ?settings.check, "Effective configuration");

    let quoter = DomainQuoter::with_config(settings.check.clone())?;

    if args.list_tlds {
        for tld in fetch_filtered_tlds(&quoter, &settings.filter).await? {
            println!("{}", tld);
        }
        return Ok(Outcome::Completed);
    }

    let candidates = get_domains_to_check(&args, &quoter, &settings.filter).await?;

    if args.dry_run {
        for domain in &candidates {
            println!("{}", domain);
        }
        debug!(count = candidates.len(), "Dry run, nothing checked");
        return Ok(Outcome::Completed);
    }

    let cancel = CancellationFlag::new();
    spawn_interrupt_handler(cancel.clone());

    let output = Arc::new(TerminalOutput::new(
        settings.precision,
        args.json,
        settings.ceilings,
    ));

    let mode = settings.sort.output_mode();
    if mode == OutputMode::Streaming {
        output.print_header();
    }

    let report = quoter
        .check(
            &candidates,
            settings.sort,
            settings.direction,
            &cancel,
            output.clone(),
        )
        .await?;

    // An interrupted sorted batch would print a misleading partial ranking
    if mode == OutputMode::Collected && !report.aborted {
        output.print_collected(&report.quotes)?;
    }

    if report.aborted || args.verbose {
        output.print_summary(&report);
    }

    Ok(if report.aborted {
        Outcome::Aborted
    } else {
        Outcome::Completed
    })
}

/// Cancel the batch on every Ctrl-C; lookups in flight still finish.
fn spawn_interrupt_handler(cancel: CancellationFlag) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Aborting, hold on...");
            cancel.cancel();
        }
    });
}

/// Merge config files, `DQ_*` variables and flags, in that order.
fn build_settings(
    args: &Args,
    rules: Vec<TldRule>,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let env_config = load_env_config(args.verbose);
    let file_config = load_file_config(args, &env_config)?;

    let settings = apply_file_config(Settings::default(), file_config)?;
    let settings = apply_environment_config(settings, &env_config);
    apply_cli_args(settings, args, rules)
}

fn load_file_config(
    args: &Args,
    env_config: &EnvConfig,
) -> Result<FileConfig, Box<dyn std::error::Error>> {
    if args.no_config {
        return Ok(FileConfig::default());
    }

    let config_manager = ConfigManager::new(args.verbose);

    let explicit = args.config.as_ref().or(env_config.config.as_ref());
    if let Some(path) = explicit {
        debug!(path = %path, "Using explicit config file");
        return config_manager
            .load_file(path)
            .map_err(|e| format!("Failed to load config file '{}': {}", path, e).into());
    }

    Ok(config_manager.discover_and_load()?)
}

fn apply_file_config(
    mut settings: Settings,
    file_config: FileConfig,
) -> Result<Settings, Box<dyn std::error::Error>> {
    if let Some(defaults) = file_config.defaults {
        if let Some(concurrency) = defaults.concurrency {
            settings.check = settings.check.with_concurrency(concurrency);
        }
        if let Some(secs) = defaults.timeout.as_deref().and_then(parse_timeout_string) {
            settings.check = settings.check.with_timeout(Duration::from_secs(secs));
        }
        if let Some(subsidiary) = defaults.subsidiary {
            settings.check = settings.check.with_subsidiary(subsidiary);
        }
        if let Some(api_base) = defaults.api_base {
            settings.check = settings.check.with_api_base(api_base);
        }
        if let Some(new_only) = defaults.require_new_registration {
            settings.check = settings.check.with_new_registration_only(new_only);
        }
    }

    if let Some(filter) = file_config.filter {
        if let Some(include_intl) = filter.include_intl {
            settings.filter.include_intl = include_intl;
        }
        if let Some(include_sld) = filter.include_sld {
            settings.filter.include_sld = include_sld;
        }
        if filter.max_length.is_some() {
            settings.filter.max_length = filter.max_length;
        }
        if filter.max_order.is_some() {
            settings.ceilings.max_order = filter.max_order;
        }
        if filter.max_renew.is_some() {
            settings.ceilings.max_renew = filter.max_renew;
        }
    }

    if let Some(sorting) = file_config.sorting {
        if let Some(key) = sorting.key {
            settings.sort = key.parse()?;
        }
        if let Some(ascending) = sorting.ascending {
            settings.direction = SortDirection::from_ascending(ascending);
        }
    }

    if let Some(precision) = file_config.output.and_then(|o| o.precision) {
        settings.precision = precision;
    }

    Ok(settings)
}

/// Apply `DQ_*` variables; invalid ones were already dropped by the loader.
fn apply_environment_config(mut settings: Settings, env_config: &EnvConfig) -> Settings {
    if let Some(concurrency) = env_config.concurrency {
        settings.check = settings.check.with_concurrency(concurrency);
    }
    if let Some(secs) = env_config.timeout.as_deref().and_then(parse_timeout_string) {
        settings.check = settings.check.with_timeout(Duration::from_secs(secs));
    }
    if let Some(subsidiary) = &env_config.subsidiary {
        settings.check = settings.check.with_subsidiary(subsidiary.as_str());
    }
    if let Some(key) = env_config.sort {
        settings.sort = key;
    }
    if let Some(ascending) = env_config.ascending {
        settings.direction = SortDirection::from_ascending(ascending);
    }
    settings
}

/// Apply CLI arguments (highest precedence).
///
/// Boolean flags only ever switch things on, so an absent flag never
/// overrides a value that came from a file or the environment.
fn apply_cli_args(
    mut settings: Settings,
    args: &Args,
    rules: Vec<TldRule>,
) -> Result<Settings, Box<dyn std::error::Error>> {
    if let Some(concurrency) = args.concurrency {
        settings.check = settings.check.with_concurrency(concurrency);
    }
    if let Some(timeout) = &args.timeout {
        let secs = parse_timeout_string(timeout)
            .ok_or_else(|| format!("Invalid timeout '{}'", timeout))?;
        settings.check = settings.check.with_timeout(Duration::from_secs(secs));
    }
    if let Some(subsidiary) = &args.subsidiary {
        settings.check = settings.check.with_subsidiary(subsidiary.as_str());
    }
    if args.any_action {
        settings.check = settings.check.with_new_registration_only(false);
    }

    if args.include_sld {
        settings.filter.include_sld = true;
    }
    if args.include_intl {
        settings.filter.include_intl = true;
    }
    if args.max_length.is_some() {
        settings.filter.max_length = args.max_length;
    }
    settings.filter.rules.extend(rules);

    if let Some(key) = args.sort {
        settings.sort = key;
    }
    if args.descending {
        settings.direction = SortDirection::Descending;
    }
    if let Some(precision) = args.precision {
        settings.precision = precision;
    }
    if args.max_order.is_some() {
        settings.ceilings.max_order = args.max_order;
    }
    if args.max_renew.is_some() {
        settings.ceilings.max_renew = args.max_renew;
    }

    Ok(settings)
}

async fn fetch_filtered_tlds(
    quoter: &DomainQuoter,
    filter: &TldFilter,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let catalog = quoter.tld_catalog().await?;
    let tlds = catalog.filtered(filter);
    debug!(catalog = catalog.len(), kept = tlds.len(), "Filtered TLD catalog");

    if tlds.is_empty() {
        return Err("No TLDs left after filtering the registrar catalog".into());
    }
    Ok(tlds)
}

/// Collect inputs and turn them into the set of FQDNs to check.
async fn get_domains_to_check(
    args: &Args,
    quoter: &DomainQuoter,
    filter: &TldFilter,
) -> Result<CandidateSet, Box<dyn std::error::Error>> {
    let mut inputs = args.domains.clone();
    match args.file.as_deref() {
        Some("-") => inputs.extend(read_domains(io::stdin().lock())?),
        Some(path) => inputs.extend(read_domains_from_file(path)?),
        None => {}
    }

    // The catalog is only fetched when something actually needs it
    let tlds = match &args.tlds {
        Some(tlds) => Some(tlds.clone()),
        None if args.hack || inputs.iter().any(|input| needs_tld_expansion(input)) => {
            Some(fetch_filtered_tlds(quoter, filter).await?)
        }
        None => None,
    };

    let candidates = if args.hack {
        domain_hacks(&inputs, tlds.as_deref().unwrap_or_default())
    } else {
        expand_domain_inputs(&inputs, tlds.as_deref())?
    };

    if candidates.is_empty() {
        return Err("No valid domains to check".into());
    }
    Ok(candidates)
}

fn read_domains_from_file(file_path: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {}", file_path).into());
    }

    let domains = read_domains(BufReader::new(File::open(path)?))?;
    if domains.is_empty() {
        return Err(format!("No domains found in {}", file_path).into());
    }
    Ok(domains)
}

/// One entry per line; blank lines and `#` comments are skipped.
fn read_domains<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut domains = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let entry = line.split('#').next().unwrap_or("").trim();
        if !entry.is_empty() {
            domains.push(entry.to_string());
        }
    }

    Ok(domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_quote_lib::{DefaultsConfig, FilterConfig, OutputConfig, SortingConfig};
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn parse(argv: &[&str]) -> (Args, ArgMatches) {
        let matches = Args::command()
            .try_get_matches_from(std::iter::once("domain-quote").chain(argv.iter().copied()))
            .unwrap();
        let args = Args::from_arg_matches(&matches).unwrap();
        (args, matches)
    }

    #[test]
    fn test_rules_keep_command_line_order() {
        let (_, matches) = parse(&["x", "-n", "^c", "-m", "^com$", "-n", "o"]);
        let rules = ordered_tld_rules(&matches).unwrap();

        let summary: Vec<_> = rules
            .iter()
            .map(|rule| (rule.pattern().to_string(), rule.must_match()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("^c".to_string(), false),
                ("^com$".to_string(), true),
                ("o".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_invalid_rule_regex() {
        let (_, matches) = parse(&["x", "-m", "("]);
        assert!(ordered_tld_rules(&matches).is_err());
    }

    #[test]
    fn test_validate_args() {
        let (args, _) = parse(&[]);
        assert!(validate_args(&args).is_err());

        let (args, _) = parse(&["--list-tlds"]);
        assert!(validate_args(&args).is_ok());

        let (args, _) = parse(&["x.com", "-c", "0"]);
        assert!(validate_args(&args).is_err());

        let (args, _) = parse(&["x.com", "--precision", "9"]);
        assert!(validate_args(&args).is_err());

        let (args, _) = parse(&["x.com", "--timeout", "soon"]);
        assert!(validate_args(&args).is_err());

        let (args, _) = parse(&["x.com", "--max-order", "-1"]);
        assert!(validate_args(&args).is_err());

        let (args, _) = parse(&["x.com", "-c", "25", "--timeout", "30s"]);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_sort_key_prefix_on_command_line() {
        let (args, _) = parse(&["x.com", "--sort", "ren"]);
        assert_eq!(args.sort, Some(SortKey::Renew));

        assert!(Args::command()
            .try_get_matches_from(["domain-quote", "x.com", "--sort", "cheapest"])
            .is_err());
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let file_config = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(5),
                subsidiary: Some("FR".to_string()),
                timeout: Some("20s".to_string()),
                ..Default::default()
            }),
            filter: Some(FilterConfig {
                include_sld: Some(true),
                max_order: Some(dec!(15)),
                ..Default::default()
            }),
            sorting: Some(SortingConfig {
                key: Some("renew".to_string()),
                ascending: Some(false),
            }),
            output: Some(OutputConfig { precision: Some(3) }),
        };

        let env_config = EnvConfig {
            concurrency: Some(7),
            sort: Some(SortKey::Order),
            ..Default::default()
        };

        let (args, matches) = parse(&["x", "-c", "9", "--precision", "0", "-m", "^e"]);
        let rules = ordered_tld_rules(&matches).unwrap();

        let settings = apply_file_config(Settings::default(), file_config).unwrap();
        let settings = apply_environment_config(settings, &env_config);
        let settings = apply_cli_args(settings, &args, rules).unwrap();

        assert_eq!(settings.check.concurrency, 9); // CLI
        assert_eq!(settings.sort, SortKey::Order); // env
        assert_eq!(settings.check.subsidiary, "FR"); // file
        assert_eq!(settings.check.timeout, Duration::from_secs(20)); // file
        assert_eq!(settings.direction, SortDirection::Descending); // file
        assert_eq!(settings.precision, 0); // CLI
        assert!(settings.filter.include_sld);
        assert_eq!(settings.filter.rules.len(), 1);
        assert_eq!(settings.ceilings.max_order, Some(dec!(15)));
    }

    #[test]
    fn test_absent_flags_do_not_override() {
        let file_config = FileConfig {
            defaults: Some(DefaultsConfig {
                require_new_registration: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };

        let (args, _) = parse(&["x.com"]);
        let settings = apply_file_config(Settings::default(), file_config).unwrap();
        let settings = apply_cli_args(settings, &args, Vec::new()).unwrap();

        assert!(!settings.check.require_new_registration);
        assert_eq!(settings.sort, SortKey::Alphabetic);
        assert_eq!(settings.precision, DEFAULT_PRECISION);
        assert_eq!(settings.check.concurrency, 10);
    }

    #[test]
    fn test_read_domains_skips_comments() {
        let input = "example.com\n\n# comment\ntest # inline\n   spaced.es  \n";
        let domains = read_domains(Cursor::new(input)).unwrap();
        assert_eq!(domains, vec!["example.com", "test", "spaced.es"]);
    }

    #[test]
    fn test_read_domains_from_missing_file() {
        assert!(read_domains_from_file("/definitely/not/here.txt").is_err());
    }
}
