//! Static catalog of user-configurable settings.
//!
//! # Responsibility
//! - Describe every setting with its type, default, label and bounds.
//! - Derive the `ref -> default` map once per process.
//! - Check candidate values against a setting's declared shape.
//!
//! # Invariants
//! - `ref` values are unique across all sections.
//! - Every `sounds` default names an entry of the default sound catalog.
//! - Number defaults lie within their declared bounds.

use crate::sound::catalog::{default_sound_catalog, SoundCatalog};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static PREFERENCE_SECTIONS: Lazy<Vec<PreferencesSection>> = Lazy::new(build_sections);

static DEFAULT_PREFERENCE_VALUES: Lazy<BTreeMap<&'static str, PreferenceValue>> =
    Lazy::new(|| {
        PREFERENCE_SECTIONS
            .iter()
            .flat_map(|section| section.preferences.iter())
            .map(|preference| (preference.reference, preference.default_value()))
            .collect()
    });

/// A titled group of settings, rendered as one block by a settings UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferencesSection {
    pub title: &'static str,
    pub preferences: Vec<Preference>,
}

/// One configurable setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preference {
    /// Stable key used by storage and timer logic.
    #[serde(rename = "ref")]
    pub reference: &'static str,
    #[serde(flatten)]
    pub kind: PreferenceKind,
    /// Display label.
    pub meta: &'static str,
}

/// Type-specific shape and default of a setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PreferenceKind {
    Boolean {
        value: bool,
    },
    String {
        value: String,
    },
    Sounds {
        value: String,
        options: SoundCatalog,
    },
    Number {
        value: f64,
        min: f64,
        /// `None` means unbounded.
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        step: f64,
        /// Rendered as a slider rather than a numeric field.
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        range: bool,
    },
}

impl PreferenceKind {
    /// Schema name of this kind (`boolean|string|sounds|number`).
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean { .. } => "boolean",
            Self::String { .. } => "string",
            Self::Sounds { .. } => "sounds",
            Self::Number { .. } => "number",
        }
    }
}

/// A concrete setting value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl PreferenceValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl Preference {
    pub fn default_value(&self) -> PreferenceValue {
        match &self.kind {
            PreferenceKind::Boolean { value } => PreferenceValue::Boolean(*value),
            PreferenceKind::String { value } | PreferenceKind::Sounds { value, .. } => {
                PreferenceValue::Text(value.clone())
            }
            PreferenceKind::Number { value, .. } => PreferenceValue::Number(*value),
        }
    }

    /// Checks `candidate` against this setting's type and bounds.
    pub fn validate(&self, candidate: &PreferenceValue) -> Result<(), PreferenceError> {
        let mismatch = || PreferenceError::TypeMismatch {
            reference: self.reference.to_string(),
            expected: self.kind.type_name(),
        };

        match (&self.kind, candidate) {
            (PreferenceKind::Boolean { .. }, PreferenceValue::Boolean(_)) => Ok(()),
            (PreferenceKind::String { .. }, PreferenceValue::Text(_)) => Ok(()),
            (PreferenceKind::Sounds { options, .. }, PreferenceValue::Text(name)) => {
                if options.contains(name) {
                    Ok(())
                } else {
                    Err(PreferenceError::UnknownSound {
                        reference: self.reference.to_string(),
                        name: name.clone(),
                    })
                }
            }
            (
                PreferenceKind::Number {
                    min, max, step, ..
                },
                PreferenceValue::Number(value),
            ) => validate_number(self.reference, *value, *min, *max, *step),
            _ => Err(mismatch()),
        }
    }
}

fn validate_number(
    reference: &str,
    value: f64,
    min: f64,
    max: Option<f64>,
    step: f64,
) -> Result<(), PreferenceError> {
    let above_max = max.is_some_and(|max| value > max);
    if !value.is_finite() || value < min || above_max {
        return Err(PreferenceError::OutOfRange {
            reference: reference.to_string(),
            value,
            min,
            max,
        });
    }

    if step > 0.0 {
        let steps = (value - min) / step;
        if (steps - steps.round()).abs() > 1e-9 {
            return Err(PreferenceError::OffStep {
                reference: reference.to_string(),
                value,
                step,
            });
        }
    }

    Ok(())
}

/// Preference lookup/validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum PreferenceError {
    UnknownPreference(String),
    TypeMismatch {
        reference: String,
        expected: &'static str,
    },
    OutOfRange {
        reference: String,
        value: f64,
        min: f64,
        max: Option<f64>,
    },
    OffStep {
        reference: String,
        value: f64,
        step: f64,
    },
    UnknownSound {
        reference: String,
        name: String,
    },
}

impl Display for PreferenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPreference(reference) => write!(f, "unknown preference: {reference}"),
            Self::TypeMismatch {
                reference,
                expected,
            } => write!(f, "preference `{reference}` expects a {expected} value"),
            Self::OutOfRange {
                reference,
                value,
                min,
                max: Some(max),
            } => write!(
                f,
                "preference `{reference}` value {value} is outside {min}..={max}"
            ),
            Self::OutOfRange {
                reference,
                value,
                min,
                max: None,
            } => write!(f, "preference `{reference}` value {value} is below {min}"),
            Self::OffStep {
                reference,
                value,
                step,
            } => write!(
                f,
                "preference `{reference}` value {value} is not a multiple of step {step}"
            ),
            Self::UnknownSound { reference, name } => {
                write!(f, "preference `{reference}` names unknown sound `{name}`")
            }
        }
    }
}

impl Error for PreferenceError {}

/// The full settings catalog, built once.
pub fn preference_sections() -> &'static [PreferencesSection] {
    &PREFERENCE_SECTIONS
}

/// Default value of every setting keyed by `ref`.
pub fn default_preference_values() -> &'static BTreeMap<&'static str, PreferenceValue> {
    &DEFAULT_PREFERENCE_VALUES
}

pub fn find_preference(reference: &str) -> Option<&'static Preference> {
    PREFERENCE_SECTIONS
        .iter()
        .flat_map(|section| section.preferences.iter())
        .find(|preference| preference.reference == reference)
}

/// Validates `value` for the setting named `reference`.
pub fn validate_preference_value(
    reference: &str,
    value: &PreferenceValue,
) -> Result<(), PreferenceError> {
    let preference = find_preference(reference)
        .ok_or_else(|| PreferenceError::UnknownPreference(reference.to_string()))?;
    preference.validate(value)
}

fn counter(reference: &'static str, value: f64, meta: &'static str) -> Preference {
    Preference {
        reference,
        kind: PreferenceKind::Number {
            value,
            min: 1.0,
            max: None,
            step: 1.0,
            range: false,
        },
        meta,
    }
}

fn toggle(reference: &'static str, value: bool, meta: &'static str) -> Preference {
    Preference {
        reference,
        kind: PreferenceKind::Boolean { value },
        meta,
    }
}

fn sound(reference: &'static str, value: &str, meta: &'static str) -> Preference {
    Preference {
        reference,
        kind: PreferenceKind::Sounds {
            value: value.to_string(),
            options: default_sound_catalog().clone(),
        },
        meta,
    }
}

fn build_sections() -> Vec<PreferencesSection> {
    vec![
        PreferencesSection {
            title: "Taimeris",
            preferences: vec![
                counter("pomodoro", 25.0, "Pomodoro ilgums (min)"),
                counter("shortBreak", 5.0, "Īsās pauzes ilgums (min)"),
                counter("longBreak", 15.0, "Garās pauzes ilgums (min)"),
            ],
        },
        PreferencesSection {
            title: "Pomodoro",
            preferences: vec![
                toggle("autoSwitchSegment", true, "Automātiski pārslēgt ciklus"),
                toggle("autoStartPomodoro", true, "Automātiski uzsākt pomodoro"),
                toggle("autoStartBreaks", true, "Automātiski uzsākt pauzes"),
                counter("cyclesBeforeLongBreak", 4.0, "Garās pauzes cikli"),
            ],
        },
        PreferencesSection {
            title: "Paziņojumi",
            preferences: vec![
                sound("pomodoroSoundEffect", "Caramelldansen", "Pomodoro skaņa"),
                sound("breakSoundEffect", "To Be Continued", "Pauzes skaņa"),
                Preference {
                    reference: "audioVolume",
                    kind: PreferenceKind::Number {
                        value: 50.0,
                        min: 1.0,
                        max: Some(100.0),
                        step: 1.0,
                        range: true,
                    },
                    meta: "Skaļums",
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{default_preference_values, preference_sections, PreferenceValue};
    use std::collections::HashSet;

    #[test]
    fn refs_are_unique() {
        let mut seen = HashSet::new();
        for preference in preference_sections()
            .iter()
            .flat_map(|section| section.preferences.iter())
        {
            assert!(seen.insert(preference.reference), "{}", preference.reference);
        }
        assert_eq!(seen.len(), default_preference_values().len());
    }

    #[test]
    fn every_default_passes_its_own_validation() {
        for preference in preference_sections()
            .iter()
            .flat_map(|section| section.preferences.iter())
        {
            preference
                .validate(&preference.default_value())
                .unwrap_or_else(|err| panic!("{}: {err}", preference.reference));
        }
    }

    #[test]
    fn default_values_are_typed() {
        let defaults = default_preference_values();
        assert_eq!(defaults["pomodoro"], PreferenceValue::Number(25.0));
        assert_eq!(defaults["autoStartBreaks"].as_bool(), Some(true));
        assert_eq!(
            defaults["breakSoundEffect"].as_str(),
            Some("To Be Continued")
        );
    }
}
