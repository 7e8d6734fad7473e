//! Registrar TLD catalog and the filter applied before expanding bare names.

use crate::error::DomainQuoteError;
use crate::protocols::RegistrarApi;
use regex::Regex;
use tracing::debug;

/// Sorted, deduplicated, lowercase list of TLDs offered by the registrar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TldCatalog {
    tlds: Vec<String>,
}

impl TldCatalog {
    pub fn new<I, S>(tlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tlds: Vec<String> = tlds
            .into_iter()
            .map(|tld| tld.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|tld| !tld.is_empty())
            .collect();
        tlds.sort();
        tlds.dedup();

        Self { tlds }
    }

    /// Download the catalog for the subsidiary `api` is configured with.
    pub async fn fetch(api: &dyn RegistrarApi) -> Result<Self, DomainQuoteError> {
        let catalog = Self::new(api.tld_catalog().await?);
        debug!(count = catalog.len(), "Fetched TLD catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.tlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tlds.is_empty()
    }

    pub fn tlds(&self) -> &[String] {
        &self.tlds
    }

    /// TLDs accepted by `filter`, in catalog order.
    pub fn filtered(&self, filter: &TldFilter) -> Vec<String> {
        self.tlds
            .iter()
            .filter(|tld| filter.accepts(tld))
            .cloned()
            .collect()
    }
}

/// One `--match` / `--no-match` regex.
#[derive(Debug, Clone)]
pub struct TldRule {
    regex: Regex,
    must_match: bool,
}

impl TldRule {
    /// Accept TLDs matching `pattern`.
    pub fn matching(pattern: &str) -> Result<Self, DomainQuoteError> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            must_match: true,
        })
    }

    /// Reject TLDs matching `pattern`.
    pub fn not_matching(pattern: &str) -> Result<Self, DomainQuoteError> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            must_match: false,
        })
    }

    pub fn must_match(&self) -> bool {
        self.must_match
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Which catalog entries are used when expanding bare names.
///
/// The default keeps plain ASCII top-level TLDs only.
#[derive(Debug, Clone, Default)]
pub struct TldFilter {
    pub include_sld: bool,
    pub include_intl: bool,
    pub max_length: Option<usize>,
    pub rules: Vec<TldRule>,
}

impl TldFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sld(mut self, include: bool) -> Self {
        self.include_sld = include;
        self
    }

    pub fn with_intl(mut self, include: bool) -> Self {
        self.include_intl = include;
        self
    }

    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_rule(mut self, rule: TldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Should `tld` be used?
    ///
    /// Rules are tried in order and the first one whose regex matches
    /// decides. When none matches, the last rule's outcome stands: a
    /// trailing match rule rejects, a trailing no-match rule accepts.
    pub fn accepts(&self, tld: &str) -> bool {
        if !self.include_sld && tld.contains('.') {
            return false;
        }

        if !self.include_intl && tld.chars().any(|c| !matches!(c, 'a'..='z' | '.')) {
            return false;
        }

        if self.max_length.is_some_and(|max| tld.len() > max) {
            return false;
        }

        let mut accepted = true;
        for rule in &self.rules {
            if rule.regex.is_match(tld) {
                return rule.must_match;
            }
            accepted = !rule.must_match;
        }
        accepted
    }
}
