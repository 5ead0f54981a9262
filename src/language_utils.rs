use anyhow::{anyhow, Result};
use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Language utilities for gettext locale identifiers
///
/// Catalog languages are gettext locales such as `fr`, `pt_BR` or
/// `zh_Hans_CN`. The primary subtag is an ISO 639-1 or ISO 639-2 code; the
/// rest is passed through opaquely. Locales end up in file paths, so their
/// shape is checked before use.

// Language subtag followed by optional script/region/variant subtags
static LOCALE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(?:[_-][A-Za-z0-9]{2,8})*(?:@[A-Za-z0-9]+)?$").expect("valid locale regex")
});

// ISO 639-2/B codes that differ from their 639-2/T counterpart
static BIBLIOGRAPHIC_CODES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("fre", "fra"),
        ("ger", "deu"),
        ("dut", "nld"),
        ("gre", "ell"),
        ("chi", "zho"),
        ("cze", "ces"),
        ("ice", "isl"),
        ("alb", "sqi"),
        ("arm", "hye"),
        ("baq", "eus"),
        ("bur", "mya"),
        ("per", "fas"),
        ("geo", "kat"),
        ("may", "msa"),
        ("mac", "mkd"),
        ("rum", "ron"),
        ("slo", "slk"),
        ("wel", "cym"),
    ])
});

/// Language subtag of a locale (`pt_BR` -> `pt`)
pub fn primary_subtag(locale: &str) -> &str {
    locale
        .split(['_', '-', '@'])
        .next()
        .unwrap_or(locale)
}

/// Look up the ISO language of a locale's primary subtag
fn lookup_language(locale: &str) -> Option<Language> {
    let code = primary_subtag(locale.trim()).to_lowercase();
    match code.len() {
        2 => Language::from_639_1(&code),
        3 => {
            let terminology = BIBLIOGRAPHIC_CODES.get(code.as_str()).copied().unwrap_or(code.as_str());
            Language::from_639_3(terminology)
        }
        _ => None,
    }
}

/// Validate a gettext locale identifier
pub fn validate_locale(locale: &str) -> Result<()> {
    if !LOCALE_REGEX.is_match(locale) {
        return Err(anyhow!("Malformed locale identifier: {:?}", locale));
    }
    if lookup_language(locale).is_none() {
        return Err(anyhow!("Unknown language code: {}", primary_subtag(locale)));
    }
    Ok(())
}

/// Get the English name of a locale's language
pub fn get_language_name(locale: &str) -> Result<String> {
    lookup_language(locale)
        .map(|language| language.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", locale))
}

/// Human-readable language for prompts and logs, falling back to the raw code
pub fn display_name(locale: &str) -> String {
    match get_language_name(locale) {
        Ok(name) if primary_subtag(locale) != locale => format!("{} ({})", name, locale),
        Ok(name) => name,
        Err(_) => locale.to_string(),
    }
}
