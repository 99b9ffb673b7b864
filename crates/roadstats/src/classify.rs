//! Domain classifiers: detection method labels and location remoteness.

use std::borrow::Cow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use crate::input::{Record, UNKNOWN, Value};

/// Label for fines detected by cameras.
pub const DETECTION_CAMERA: &str = "Camera fined";
/// Label for fines issued by police officers.
pub const DETECTION_POLICE: &str = "Police issued";

static CAMERA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)camera|photo|red light").expect("camera pattern is valid")
});

static POLICE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)police|officer|constable").expect("police pattern is valid"));

// =============================================================================
// DETECTION METHOD
// =============================================================================

/// Map a raw detection value to a display label.
///
/// Camera-like text becomes [`DETECTION_CAMERA`], police-like text
/// [`DETECTION_POLICE`], empty values `"Unknown"`; anything else is kept.
pub fn detection_label(value: &Value) -> Cow<'_, str> {
    if value.is_empty() {
        return Cow::Borrowed(UNKNOWN);
    }
    let key = value.group_key();
    if CAMERA_PATTERN.is_match(&key) {
        Cow::Borrowed(DETECTION_CAMERA)
    } else if POLICE_PATTERN.is_match(&key) {
        Cow::Borrowed(DETECTION_POLICE)
    } else {
        key
    }
}

/// Derive a row's detection method by scanning its text values in field order.
pub fn derive_detection(record: &Record) -> &'static str {
    for value in record.values() {
        let Value::Text(text) = value else {
            continue;
        };
        if CAMERA_PATTERN.is_match(text) {
            return DETECTION_CAMERA;
        }
        if POLICE_PATTERN.is_match(text) {
            return DETECTION_POLICE;
        }
    }
    UNKNOWN
}

/// Detection labels implied by a numeric column's name.
pub fn detection_column_labels(field_name: &str) -> Vec<&'static str> {
    let lower = field_name.to_lowercase();
    let mut labels = Vec::new();
    if lower.contains("police") {
        labels.push(DETECTION_POLICE);
    }
    if lower.contains("camera") {
        labels.push(DETECTION_CAMERA);
    }
    labels
}

/// Order detection options for a selector: camera, police, unknown, then the
/// rest in first-seen order. Duplicates are dropped.
pub fn order_detection_options<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();
    for label in labels {
        let label = label.as_ref();
        if !label.is_empty() && !seen.iter().any(|s| s == label) {
            seen.push(label.to_string());
        }
    }

    let preferred = [DETECTION_CAMERA, DETECTION_POLICE, UNKNOWN];
    let mut ordered: Vec<String> = preferred
        .iter()
        .filter(|p| seen.iter().any(|s| s == *p))
        .map(|p| p.to_string())
        .collect();
    ordered.extend(seen.into_iter().filter(|s| !preferred.contains(&s.as_str())));
    ordered
}

// =============================================================================
// LOCATION REMOTENESS
// =============================================================================

/// Remoteness class of a location description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocationCategory {
    MajorCities,
    InnerRegional,
    OuterRegional,
    Remote,
    VeryRemote,
    Other,
}

impl LocationCategory {
    /// Classify a free-text location such as `"Inner Regional Australia"`.
    pub fn from_location(location: &str) -> Self {
        if location.is_empty() {
            return LocationCategory::Other;
        }
        if location.contains("Major Cities") {
            return LocationCategory::MajorCities;
        }
        if location.contains("Inner Regional") {
            return LocationCategory::InnerRegional;
        }
        if location.contains("Outer Regional") {
            return LocationCategory::OuterRegional;
        }
        if location.contains("Very Remote")
            || (location.contains("Remote Australia") && location.contains("Very"))
        {
            return LocationCategory::VeryRemote;
        }
        if location.contains("Remote") {
            return LocationCategory::Remote;
        }
        LocationCategory::Other
    }

    /// Classify a raw value; empty values are `Other`.
    pub fn from_value(value: &Value) -> Self {
        if value.is_empty() {
            LocationCategory::Other
        } else {
            Self::from_location(&value.group_key())
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LocationCategory::MajorCities => "Major Cities",
            LocationCategory::InnerRegional => "Inner Regional",
            LocationCategory::OuterRegional => "Outer Regional",
            LocationCategory::Remote => "Remote",
            LocationCategory::VeryRemote => "Very Remote",
            LocationCategory::Other => "Other",
        }
    }

    /// Inner/outer regional, remote and very remote.
    pub fn is_regional(&self) -> bool {
        matches!(
            self,
            LocationCategory::InnerRegional
                | LocationCategory::OuterRegional
                | LocationCategory::Remote
                | LocationCategory::VeryRemote
        )
    }
}

impl fmt::Display for LocationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
