//! On-screen text in English, Kazakh and Russian.
//!
//! Every labelled UI element has a [`LabelKey`]. [`Labels`] maps each key to
//! its text in the current language; switching language rewrites every entry
//! by key. Nothing here touches simulation state.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported display languages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Kazakh.
    Kk,
    /// Russian.
    Ru,
}

impl Language {
    /// All languages in selector order.
    pub const ALL: [Self; 3] = [Self::En, Self::Kk, Self::Ru];

    /// ISO 639-1 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Kk => "kk",
            Self::Ru => "ru",
        }
    }

    /// The next language in selector order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::En => Self::Kk,
            Self::Kk => Self::Ru,
            Self::Ru => Self::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown language code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown language '{0}' (expected one of: en, kk, ru)")]
pub struct ParseLanguageError(pub String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "kk" => Ok(Self::Kk),
            "ru" => Ok(Self::Ru),
            _ => Err(ParseLanguageError(s.to_string())),
        }
    }
}

/// Identifiers of the labelled UI elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LabelKey {
    /// Heading drawn at the top of the canvas.
    Title,
    /// Caption in front of the gravity input.
    GravityLabel,
    /// Start control.
    Start,
    /// Reset control.
    Reset,
    /// Caption in front of the language selector.
    Language,
    /// Notification shown when the gravity input is rejected.
    InvalidGravity,
}

impl LabelKey {
    /// Every key, in display order.
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::GravityLabel,
        Self::Start,
        Self::Reset,
        Self::Language,
        Self::InvalidGravity,
    ];

    /// Stable identifier, used by the `labels` subcommand.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::GravityLabel => "gravity-label",
            Self::Start => "start",
            Self::Reset => "reset",
            Self::Language => "language",
            Self::InvalidGravity => "invalid-gravity",
        }
    }
}

/// Text of `key` in `language`.
#[must_use]
pub const fn translate(language: Language, key: LabelKey) -> &'static str {
    match (language, key) {
        (Language::En, LabelKey::Title) => "Physics in Action: Free Fall",
        (Language::En, LabelKey::GravityLabel) => "Gravity (m/s²):",
        (Language::En, LabelKey::Start) => "Start",
        (Language::En, LabelKey::Reset) => "Reset",
        (Language::En, LabelKey::Language) => "Language:",
        (Language::En, LabelKey::InvalidGravity) => {
            "Please enter a valid positive number for gravity."
        }

        (Language::Kk, LabelKey::Title) => "Физика іс жүзінде: Еркін құлау",
        (Language::Kk, LabelKey::GravityLabel) => "Гравитация (м/с²):",
        (Language::Kk, LabelKey::Start) => "Бастау",
        (Language::Kk, LabelKey::Reset) => "Қалпына келтіру",
        (Language::Kk, LabelKey::Language) => "Тіл:",
        (Language::Kk, LabelKey::InvalidGravity) => "Гравитация үшін дұрыс оң сан енгізіңіз.",

        (Language::Ru, LabelKey::Title) => "Физика в действии: Свободное падение",
        (Language::Ru, LabelKey::GravityLabel) => "Гравитация (м/с²):",
        (Language::Ru, LabelKey::Start) => "Старт",
        (Language::Ru, LabelKey::Reset) => "Сброс",
        (Language::Ru, LabelKey::Language) => "Язык:",
        (Language::Ru, LabelKey::InvalidGravity) => {
            "Пожалуйста, введите корректное положительное число для гравитации."
        }
    }
}

/// Current text of every labelled element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    language: Language,
    text: BTreeMap<LabelKey, &'static str>,
}

impl Labels {
    /// Labels for `language`.
    #[must_use]
    pub fn new(language: Language) -> Self {
        let mut labels = Self {
            language,
            text: BTreeMap::new(),
        };
        labels.relabel();
        labels
    }

    /// The language currently displayed.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Current text of `key`.
    #[must_use]
    pub fn get(&self, key: LabelKey) -> &'static str {
        self.text
            .get(&key)
            .copied()
            .unwrap_or_else(|| translate(self.language, key))
    }

    /// Switches language. Returns `true` if anything changed.
    pub fn set_language(&mut self, language: Language) -> bool {
        if language == self.language {
            return false;
        }
        tracing::debug!(from = %self.language, to = %language, "switching language");
        self.language = language;
        self.relabel();
        true
    }

    /// Iterates `(key, text)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (LabelKey, &'static str)> + '_ {
        self.text.iter().map(|(k, v)| (*k, *v))
    }

    fn relabel(&mut self) {
        for key in LabelKey::ALL {
            self.text.insert(key, translate(self.language, key));
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::new(Language::default())
    }
}
