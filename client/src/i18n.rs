//! Localization and theme preferences.
//!
//! Message bundles are flat JSON dictionaries compiled into the crate. Topic
//! names come from the API and are merged in under `topic.<id>` keys.

use crate::api::TopicData;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Russian
    Ru,
}

impl Locale {
    /// Every supported locale
    pub const ALL: [Self; 2] = [Self::En, Self::Ru];

    /// Locale code as stored and sent to the server
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }

    const fn bundle(self) -> &'static str {
        match self {
            Self::En => include_str!("../locales/en.json"),
            Self::Ru => include_str!("../locales/ru.json"),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A locale code that is not supported
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

/// Light or dark colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl ThemeMode {
    /// The other mode
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Value as stored
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("Unsupported theme mode: {other}")),
        }
    }
}

/// Localized name of a topic
#[must_use]
pub fn topic_name(topic: &TopicData, locale: Locale) -> &str {
    match locale {
        Locale::En => &topic.en_name,
        Locale::Ru => &topic.ru_name,
    }
}

/// Message dictionary for one locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
    entries: HashMap<String, String>,
}

impl Messages {
    /// Parse the bundled dictionary of `locale`
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the bundle is not a flat object of strings.
    pub fn load(locale: Locale) -> Result<Self, serde_json::Error> {
        let entries = serde_json::from_str(locale.bundle())?;
        Ok(Self { locale, entries })
    }

    /// Add `topic.<id>` entries for `topics`
    #[must_use]
    pub fn with_topics(mut self, topics: &[TopicData]) -> Self {
        for topic in topics {
            self.entries.insert(
                format!("topic.{}", topic.id),
                topic_name(topic, self.locale).to_string(),
            );
        }
        self
    }

    /// Locale of this dictionary
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Message for `key`, or the key itself when there is none
    #[must_use]
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map_or(key, String::as_str)
    }

    /// Message for `key` with `{name}` placeholders substituted
    #[must_use]
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.get(key).to_string(), |message, (name, value)| {
                message.replace(&format!("{{{name}}}"), value)
            })
    }
}
