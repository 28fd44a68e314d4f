//! Supported display languages and per-locale values

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One of the two languages the site is published in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Albanian
    Sq,
}

impl Locale {
    /// All locales in display order
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Sq];

    /// The locale used when a value is missing or nothing better is known
    pub const DEFAULT: Locale = Locale::En;

    /// Short language code used in URLs (`en`, `sq`)
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Sq => "sq",
        }
    }

    /// Language tag for `hreflang` alternates
    pub fn hreflang(self) -> &'static str {
        match self {
            Locale::En => "en-US",
            Locale::Sq => "sq-AL",
        }
    }

    /// Open Graph locale (`en_US`, `sq_AL`)
    pub fn og_locale(self) -> &'static str {
        match self {
            Locale::En => "en_US",
            Locale::Sq => "sq_AL",
        }
    }

    /// Native name shown in the language switcher
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Sq => "Shqip",
        }
    }

    /// Parse an explicit language code from a query or path parameter
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "sq" => Some(Locale::Sq),
            _ => None,
        }
    }

    /// Pick a locale from an `Accept-Language` header value.
    ///
    /// Only the first listed tag is considered and quality factors are
    /// ignored: `sq-AL,en;q=0.9` is Albanian, `en-US,sq;q=0.5` is English.
    /// Anything that is not Albanian, including an empty header, is English.
    pub fn from_accept_language(header: &str) -> Self {
        let first = header.split(',').next().unwrap_or("");
        let primary = first
            .split(';')
            .next()
            .unwrap_or("")
            .split('-')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        if primary == "sq" {
            Locale::Sq
        } else {
            Locale::En
        }
    }

    /// Resolve the locale for a request: an explicit valid parameter wins,
    /// otherwise the `Accept-Language` header decides.
    pub fn resolve(param: Option<&str>, accept_language: Option<&str>) -> Self {
        param
            .and_then(Locale::from_code)
            .unwrap_or_else(|| Locale::from_accept_language(accept_language.unwrap_or("")))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A value that is absent in both the requested and the default locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no value for locale '{requested}' or default locale '{}'", Locale::DEFAULT)]
pub struct MissingLocale {
    pub requested: Locale,
}

/// One optional value per supported locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sq: Option<T>,
}

impl<T> Default for Localized<T> {
    fn default() -> Self {
        Self { en: None, sq: None }
    }
}

impl<T> Localized<T> {
    /// Build a value with both locales present
    pub fn new(en: T, sq: T) -> Self {
        Self {
            en: Some(en),
            sq: Some(sq),
        }
    }

    /// The value stored for exactly this locale
    pub fn get(&self, locale: Locale) -> Option<&T> {
        match locale {
            Locale::En => self.en.as_ref(),
            Locale::Sq => self.sq.as_ref(),
        }
    }

    /// Store a value for a locale
    pub fn set(&mut self, locale: Locale, value: T) {
        match locale {
            Locale::En => self.en = Some(value),
            Locale::Sq => self.sq = Some(value),
        }
    }

    /// Requested locale, then the default locale, then an error
    pub fn resolve(&self, locale: Locale) -> Result<&T, MissingLocale> {
        self.get(locale)
            .or_else(|| self.get(Locale::DEFAULT))
            .ok_or(MissingLocale { requested: locale })
    }

    /// Whether every supported locale has a value
    pub fn is_complete(&self) -> bool {
        Locale::ALL.iter().all(|l| self.get(*l).is_some())
    }
}
