/*!
 * Culture name utilities.
 *
 * Validates culture names of the form `language[-REGION]` against the ISO
 * language tables from `isolang`, keeps the configured set of supported
 * cultures, and tracks the ambient culture of the current thread.
 */

use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashSet;

thread_local! {
    static CURRENT_CULTURE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Validate a culture name and return its canonical form (`de-CH`)
pub fn parse_culture(name: &str) -> Result<String> {
    let trimmed = name.trim();
    let mut parts = trimmed.split(['-', '_']);

    let language = parts
        .next()
        .filter(|l| !l.is_empty())
        .ok_or_else(|| anyhow!("Invalid culture name: '{}'", name))?
        .to_lowercase();

    let known = match language.len() {
        2 => Language::from_639_1(&language).is_some(),
        3 => Language::from_639_3(&language).is_some(),
        _ => false,
    };
    if !known {
        return Err(anyhow!("Unknown language subtag '{}' in culture '{}'", language, name));
    }

    let region = match parts.next() {
        None => None,
        Some(region) if is_region_subtag(region) => Some(region.to_uppercase()),
        Some(region) => {
            return Err(anyhow!("Invalid region subtag '{}' in culture '{}'", region, name));
        }
    };

    if parts.next().is_some() {
        return Err(anyhow!("Unexpected subtags in culture '{}'", name));
    }

    Ok(match region {
        Some(region) => format!("{}-{}", language, region),
        None => language,
    })
}

/// Region subtag regex: two letters (CH) or a UN M.49 area code (419)
static REGION_SUBTAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Za-z]{2}|[0-9]{3})$").unwrap());

fn is_region_subtag(subtag: &str) -> bool {
    REGION_SUBTAG_REGEX.is_match(subtag)
}

/// Set of cultures for which new records may be provisioned
#[derive(Debug, Clone, Default)]
pub struct SupportedCultures {
    /// Lowercased canonical names for case-insensitive matching
    cultures: HashSet<String>,
}

impl SupportedCultures {
    /// Build the set, rejecting malformed culture names
    pub fn new<I, S>(cultures: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cultures = cultures
            .into_iter()
            .map(|c| parse_culture(c.as_ref()).map(|c| c.to_lowercase()))
            .collect::<Result<HashSet<_>>>()?;

        Ok(Self { cultures })
    }

    /// Whether the culture is supported; malformed names never are
    pub fn contains(&self, culture: &str) -> bool {
        match parse_culture(culture) {
            Ok(canonical) => self.cultures.contains(&canonical.to_lowercase()),
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.cultures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cultures.is_empty()
    }
}

/// Guard that installs an ambient culture for the current thread
///
/// The previous culture is restored when the guard is dropped, so scopes
/// nest. The culture is thread-bound: async code that may migrate between
/// threads should pass the culture explicitly instead.
#[must_use = "the culture is only active while the scope is alive"]
pub struct CultureScope {
    previous: Option<String>,
}

impl CultureScope {
    /// Make `culture` the current culture of this thread
    pub fn enter(culture: impl Into<String>) -> Self {
        let culture = culture.into();
        let previous = CURRENT_CULTURE.with(|current| current.borrow_mut().replace(culture));
        Self { previous }
    }
}

impl Drop for CultureScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_CULTURE.with(|current| *current.borrow_mut() = previous);
    }
}

/// The ambient culture of the current thread, if a scope is active
pub fn current_culture() -> Option<String> {
    CURRENT_CULTURE.with(|current| current.borrow().clone())
}
