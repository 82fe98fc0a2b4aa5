//! Slug and SKU derivation.
//!
//! Every unique human-facing identifier in the catalog goes through
//! [`resolve_unique`]: try the candidate as-is, then suffix `-1`, `-2`, …
//! until the caller's taken-check clears. Attempts are capped; past the cap
//! we fall back to a random hex token once before giving up with
//! [`AppError::IdentifierExhausted`].

use regex::Regex;
use uuid::Uuid;

use crate::error::AppError;

/// Numeric suffixes tried before falling back to a random token.
const MAX_SUFFIX_ATTEMPTS: u32 = 100;

/// Lowercase, URL-safe slug from a human-readable name.
pub fn slugify(input: &str) -> String {
    let separators = Regex::new(r"[_\s]+").unwrap();
    let mut s = separators.replace_all(input.trim(), "-").into_owned();

    let clean = Regex::new(r"[^A-Za-z0-9-]").unwrap();
    s = clean.replace_all(&s, "").into_owned();

    let collapse = Regex::new(r"-+").unwrap();
    s = collapse.replace_all(&s, "-").into_owned();

    s.trim_matches('-').to_lowercase()
}

/// Resolve `candidate` to an identifier for which `taken` returns false.
pub fn resolve_unique<F>(candidate: &str, taken: F) -> Result<String, AppError>
where
    F: Fn(&str) -> bool,
{
    if !taken(candidate) {
        return Ok(candidate.to_string());
    }

    for counter in 1..=MAX_SUFFIX_ATTEMPTS {
        let attempt = format!("{candidate}-{counter}");
        if !taken(&attempt) {
            return Ok(attempt);
        }
    }

    // Dense suffix space; one random token before giving up.
    let fallback = format!("{candidate}-{}", random_hex(8).to_lowercase());
    if !taken(&fallback) {
        return Ok(fallback);
    }

    Err(AppError::IdentifierExhausted(candidate.to_string()))
}

/// Candidate product SKU: 3-letter category prefix plus a random suffix,
/// e.g. `ELE-03AF91BC`. `PRO` when the product has no category.
pub fn sku_candidate(category_name: Option<&str>) -> String {
    let prefix = match category_name {
        Some(name) if !name.is_empty() => prefix_of(name),
        _ => "PRO".to_string(),
    };
    format!("{prefix}-{}", random_hex(8))
}

/// Resolve a generated SKU against `taken`, regenerating the random suffix
/// on collision rather than numeric suffixing.
pub fn resolve_sku<F>(category_name: Option<&str>, taken: F) -> Result<String, AppError>
where
    F: Fn(&str) -> bool,
{
    let mut sku = sku_candidate(category_name);
    let mut attempts = 0;

    while taken(&sku) {
        attempts += 1;
        if attempts > MAX_SUFFIX_ATTEMPTS {
            return Err(AppError::IdentifierExhausted(sku));
        }
        sku = sku_candidate(category_name);
    }

    Ok(sku)
}

/// Candidate variant SKU: parent SKU plus a fragment of the variant value,
/// e.g. `ELE-03AF91BC-RED`. Collisions resolve via [`resolve_unique`].
pub fn variant_sku_candidate(parent_sku: &str, variant_value: &str) -> String {
    // First three chars, then spaces dropped, so "A B C" codes as "AB".
    let code: String = variant_value
        .chars()
        .take(3)
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    format!("{parent_sku}-{code}")
}

fn prefix_of(name: &str) -> String {
    name.chars().take(3).collect::<String>().to_uppercase()
}

fn random_hex(len: usize) -> String {
    Uuid::new_v4().simple().to_string()[..len].to_uppercase()
}
