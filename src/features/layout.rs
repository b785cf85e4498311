//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the model input schema**
//!
//! The classifier receives unlabeled numbers, so the order below must match
//! the column order used when the artifact was trained.
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the row
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Raw numeric / ordinal (0-16) ===
    "Age",                      // 0
    "BusinessTravel",           // 1: ordinal
    "DistanceFromHome",         // 2
    "Education",                // 3: ordinal
    "EnvironmentSatisfaction",  // 4
    "JobInvolvement",           // 5
    "JobSatisfaction",          // 6
    "MonthlyIncome",            // 7
    "NumCompaniesWorked",       // 8: 0 clamped to 1
    "OverTime",                 // 9: ordinal
    "RelationshipSatisfaction", // 10
    "StockOptionLevel",         // 11
    "TotalWorkingYears",        // 12
    "TrainingTimesLastYear",    // 13
    "WorkLifeBalance",          // 14
    "YearsAtCompany",           // 15
    "YearsSinceLastPromotion",  // 16

    // === Derived risk (17-23) ===
    "MonthlyIncome/Age",        // 17
    "Age_risk",                 // 18: Age < 34
    "Distance_risk",            // 19: DistanceFromHome >= 20
    "YearsAtCo_risk",           // 20: YearsAtCompany < 4
    "AverageTenure",            // 21
    "JobHopper",                // 22
    "AttritionRisk",            // 23: sum of the four flags

    // === JobRole one-hot (24-32) ===
    "JobRole_sales_exef",
    "JobRole_res_sc",
    "JobRole_lab_tech",
    "JobRole_man_dir",
    "JobRole_health",
    "JobRole_manager",
    "JobRole_sales_rep",
    "JobRole_res_dir",
    "JobRole_hum_resb",

    // === MaritalStatus one-hot (33-35) ===
    "MaritalStatus_sing",
    "MaritalStatus_marr",
    "MaritalStatus_divorce",

    // === Gender one-hot (36-37) ===
    "Gender_fem",
    "Gender_male",

    // === EducationField one-hot (38-43) ===
    "Educ_lifesc",
    "Educ_other",
    "Educ_medic",
    "Educ_market",
    "Educ_tech",
    "Educ_hum_res",

    // === Department one-hot (44-47) ===
    "Dep_sales",
    "Dep_research_dev",
    "Dep_hum_res",
    "Dep_other",
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 48;

/// First index of each one-hot group
pub const JOB_ROLE_OFFSET: usize = 24;
pub const MARITAL_OFFSET: usize = 33;
pub const GENDER_OFFSET: usize = 36;
pub const EDUCATION_FIELD_OFFSET: usize = 38;
pub const DEPARTMENT_OFFSET: usize = 44;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

static LAYOUT_HASH: Lazy<u32> = Lazy::new(compute_layout_hash);

/// Cached layout hash; checked on every prediction
pub fn layout_hash() -> u32 {
    *LAYOUT_HASH
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information, served to the training side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
#[cfg(test)]
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================
