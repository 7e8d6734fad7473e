//! Candidate domain construction and validation.
//!
//! This module turns raw user input into the deduplicated set of fully
//! qualified names a batch checks: validating names, expanding bare names
//! against a TLD list, and finding "domain hacks" (names whose ending
//! spells a TLD, like `delicio.us`).

use crate::error::DomainQuoteError;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::btree_set;
use std::collections::BTreeSet;
use tracing::warn;

lazy_static! {
    /// Dot-separated LDH labels, no leading/trailing hyphen per label.
    static ref DOMAIN_RE: Regex =
        Regex::new(r"^([a-z0-9]([a-z0-9-]*[a-z0-9])?\.)*[a-z0-9]([a-z0-9-]*[a-z0-9])?$")
            .expect("domain regex is valid");
}

/// Longest name the DNS allows.
const MAX_DOMAIN_LEN: usize = 253;

/// Longest single label.
const MAX_LABEL_LEN: usize = 63;

/// Unique fully qualified names to check, iterated in alphabetic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    domains: BTreeSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name; returns false if it was already present.
    pub fn insert<S: Into<String>>(&mut self, domain: S) -> bool {
        self.domains.insert(domain.into())
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.domains.iter()
    }

    pub fn extend(&mut self, other: CandidateSet) {
        self.domains.extend(other.domains);
    }

    pub fn into_vec(self) -> Vec<String> {
        self.domains.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            domains: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.domains.iter()
    }
}

/// Validate a domain or bare name and return its normalized (lowercase) form.
///
/// Only ASCII names are accepted; internationalized names must already be
/// in their `xn--` form.
pub fn validate_domain(domain: &str) -> Result<String, DomainQuoteError> {
    let normalized = domain.trim().trim_end_matches('.').to_lowercase();

    if normalized.is_empty() {
        return Err(DomainQuoteError::invalid_domain(
            domain,
            "Domain name cannot be empty",
        ));
    }

    if !normalized.is_ascii() {
        return Err(DomainQuoteError::invalid_domain(
            domain,
            "Non-ASCII names must be given in their xn-- (punycode) form",
        ));
    }

    if normalized.len() > MAX_DOMAIN_LEN {
        return Err(DomainQuoteError::invalid_domain(
            domain,
            format!("Domain name longer than {} characters", MAX_DOMAIN_LEN),
        ));
    }

    if normalized.split('.').any(|label| label.len() > MAX_LABEL_LEN) {
        return Err(DomainQuoteError::invalid_domain(
            domain,
            format!("Label longer than {} characters", MAX_LABEL_LEN),
        ));
    }

    if !DOMAIN_RE.is_match(&normalized) {
        return Err(DomainQuoteError::invalid_domain(
            domain,
            "Only letters, digits and inner hyphens are allowed in each label",
        ));
    }

    Ok(normalized)
}

/// Expand user input into the set of names to check.
///
/// - Inputs containing a dot are taken as fully qualified names
/// - Bare names are combined with every TLD in `tlds`
/// - Invalid inputs are logged and skipped
///
/// # Errors
///
/// Returns `ConfigError` when a bare name is given and `tlds` is `None`,
/// since there is nothing to expand it with.
pub fn expand_domain_inputs(
    inputs: &[String],
    tlds: Option<&[String]>,
) -> Result<CandidateSet, DomainQuoteError> {
    let mut candidates = CandidateSet::new();

    for input in inputs {
        let domain = match validate_domain(input) {
            Ok(domain) => domain,
            Err(e) => {
                warn!(input = %input, error = %e, "Skipping invalid domain");
                continue;
            }
        };

        if domain.contains('.') {
            candidates.insert(domain);
            continue;
        }

        let tld_list = tlds.ok_or_else(|| {
            DomainQuoteError::config(format!(
                "'{}' has no TLD and no TLD list is available to expand it",
                domain
            ))
        })?;

        for tld in tld_list {
            let tld = tld.trim().trim_start_matches('.').to_lowercase();
            if !tld.is_empty() {
                candidates.insert(format!("{}.{}", domain, tld));
            }
        }
    }

    Ok(candidates)
}

/// Does `input` need a TLD list to be expanded?
pub fn needs_tld_expansion(input: &str) -> bool {
    !input.trim().trim_end_matches('.').contains('.')
}

/// Find domain hacks: for every TLD whose letters (dots removed) form a
/// proper suffix of a name, split the name there.
///
/// `domain_hacks(["delicious"], ["us"])` yields `delicio.us`; second-level
/// TLDs work too (`["example"], ["co.uk"]` has no match, `["blocouk"]`
/// yields `blo.co.uk`).
pub fn domain_hacks(names: &[String], tlds: &[String]) -> CandidateSet {
    let mut candidates = CandidateSet::new();

    for tld in tlds {
        let tld = tld.trim().trim_start_matches('.').to_lowercase();
        let tld_letters = tld.replace('.', "");
        if tld_letters.is_empty() {
            continue;
        }

        for name in names {
            let name = name.trim().to_lowercase();
            if name.len() > tld_letters.len() && name.ends_with(&tld_letters) {
                let stem = &name[..name.len() - tld_letters.len()];
                let candidate = format!("{}.{}", stem, tld);
                match validate_domain(&candidate) {
                    Ok(domain) => {
                        candidates.insert(domain);
                    }
                    Err(e) => warn!(candidate = %candidate, error = %e, "Skipping invalid hack"),
                }
            }
        }
    }

    candidates
}
