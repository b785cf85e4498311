//! Fixed category vocabularies.
//!
//! Built once per process and never mutated. Lookups are exact and
//! case-sensitive, matching the labels the training data used.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Code emitted for an ordinal value that is not in its table
pub const UNKNOWN_CODE: i64 = -1;

/// Code emitted when an ordinal field is absent from the record
pub const MISSING_CODE: i64 = -2;

/// Vocabulary expanded into one indicator column per label
#[derive(Debug)]
pub struct OneHot {
    field: &'static str,
    index: HashMap<&'static str, usize>,
}

impl OneHot {
    fn new(field: &'static str, labels: &[&'static str]) -> Self {
        let index = labels.iter().enumerate().map(|(i, &l)| (l, i)).collect();
        Self { field, index }
    }

    /// Number of indicator columns
    pub fn width(&self) -> usize {
        self.index.len()
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    /// Write the indicator group for `value` into `out`.
    ///
    /// An unknown or absent value leaves the whole group at zero. Returns
    /// whether the value matched.
    pub fn encode_into(&self, value: Option<&str>, out: &mut [f32]) -> bool {
        debug_assert_eq!(out.len(), self.width());
        out.fill(0.0);

        match value.and_then(|v| self.position(v)) {
            Some(i) => {
                out[i] = 1.0;
                true
            }
            None => {
                tracing::debug!(field = self.field, value = ?value, "Unknown category, encoding as zeros");
                false
            }
        }
    }
}

/// Vocabulary replaced by a single integer code
#[derive(Debug)]
pub struct Ordinal {
    field: &'static str,
    codes: HashMap<&'static str, i64>,
}

impl Ordinal {
    fn new(field: &'static str, codes: &[(&'static str, i64)]) -> Self {
        Self {
            field,
            codes: codes.iter().copied().collect(),
        }
    }

    pub fn code(&self, value: &str) -> Option<i64> {
        self.codes.get(value).copied()
    }

    /// Map `value` to its code, `UNKNOWN_CODE` if unmapped, `MISSING_CODE` if absent.
    pub fn encode(&self, value: Option<&str>) -> i64 {
        match value {
            Some(v) => self.code(v).unwrap_or_else(|| {
                tracing::warn!(field = self.field, value = v, "Unmapped ordinal value");
                UNKNOWN_CODE
            }),
            None => {
                tracing::warn!(field = self.field, "Ordinal value missing");
                MISSING_CODE
            }
        }
    }
}

// ============================================================================
// ONE-HOT VOCABULARIES
// ============================================================================

pub static DEPARTMENT: Lazy<OneHot> = Lazy::new(|| {
    OneHot::new(
        "Department",
        &["Sales", "Research & Development", "Human Resources", "Other"],
    )
});

pub static EDUCATION_FIELD: Lazy<OneHot> = Lazy::new(|| {
    OneHot::new(
        "EducationField",
        &[
            "Life Sciences",
            "Other",
            "Medical",
            "Marketing",
            "Technical Degree",
            "Human Resources",
        ],
    )
});

pub static GENDER: Lazy<OneHot> = Lazy::new(|| OneHot::new("Gender", &["Female", "Male"]));

pub static MARITAL_STATUS: Lazy<OneHot> =
    Lazy::new(|| OneHot::new("MaritalStatus", &["Single", "Married", "Divorced"]));

pub static JOB_ROLE: Lazy<OneHot> = Lazy::new(|| {
    OneHot::new(
        "JobRole",
        &[
            "Sales Executive",
            "Research Scientist",
            "Laboratory Technician",
            "Manufacturing Director",
            "Healthcare Representative",
            "Manager",
            "Sales Representative",
            "Research Director",
            "Human Resources",
        ],
    )
});

// ============================================================================
// ORDINAL TABLES
// ============================================================================

pub static BUSINESS_TRAVEL: Lazy<Ordinal> = Lazy::new(|| {
    Ordinal::new(
        "BusinessTravel",
        &[("Non-Travel", 0), ("Travel_Rarely", 1), ("Travel_Frequently", 2)],
    )
});

pub static OVER_TIME: Lazy<Ordinal> = Lazy::new(|| Ordinal::new("OverTime", &[("No", 0), ("Yes", 1)]));

pub static EDUCATION: Lazy<Ordinal> = Lazy::new(|| {
    Ordinal::new(
        "Education",
        &[
            ("Below College", 1),
            ("College", 2),
            ("Bachelor", 3),
            ("Master", 4),
            ("Doctor", 5),
        ],
    )
});
