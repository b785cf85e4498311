//! Employee record → feature row.
//!
//! Pure and deterministic. Unknown one-hot categories become all-zero groups
//! and unmapped ordinals become sentinel codes; neither is an error. Integer
//! fields have already been validated upstream.

use super::layout::{
    DEPARTMENT_OFFSET, EDUCATION_FIELD_OFFSET, GENDER_OFFSET, JOB_ROLE_OFFSET, MARITAL_OFFSET,
};
use super::row::FeatureRow;
use super::vocab::{
    OneHot, BUSINESS_TRAVEL, DEPARTMENT, EDUCATION, EDUCATION_FIELD, GENDER, JOB_ROLE,
    MARITAL_STATUS, OVER_TIME,
};
use crate::models::EmployeeRecord;

/// Risk attributes derived from raw fields
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    pub income_per_age: f64,
    pub age_risk: u8,
    pub distance_risk: u8,
    pub years_at_co_risk: u8,
    /// NumCompaniesWorked with 0 replaced by 1
    pub num_companies_worked: i64,
    pub average_tenure: f64,
    pub job_hopper: u8,
    /// Sum of the four risk flags, 0..=4
    pub attrition_risk: u8,
}

impl DerivedFeatures {
    pub fn compute(record: &EmployeeRecord) -> Self {
        // Age 0 yields inf/NaN here, same as the training pipeline's float division
        let income_per_age = record.monthly_income as f64 / record.age as f64;

        let age_risk = u8::from(record.age < 34);
        let distance_risk = u8::from(record.distance_from_home >= 20);
        let years_at_co_risk = u8::from(record.years_at_company < 4);

        let num_companies_worked = if record.num_companies_worked == 0 {
            1
        } else {
            record.num_companies_worked
        };
        let average_tenure = record.total_working_years as f64 / num_companies_worked as f64;
        let job_hopper = u8::from(num_companies_worked > 2 && average_tenure < 2.0);

        Self {
            income_per_age,
            age_risk,
            distance_risk,
            years_at_co_risk,
            num_companies_worked,
            average_tenure,
            job_hopper,
            attrition_risk: age_risk + distance_risk + years_at_co_risk + job_hopper,
        }
    }
}

/// Build the model input row for a validated record
pub fn build_row(record: &EmployeeRecord) -> FeatureRow {
    let derived = DerivedFeatures::compute(record);

    let business_travel = BUSINESS_TRAVEL.encode(record.business_travel.as_deref());
    let education = EDUCATION.encode(record.education.as_deref());
    let over_time = OVER_TIME.encode(record.over_time.as_deref());

    let mut row = FeatureRow::new();
    let head = [
        record.age as f32,
        business_travel as f32,
        record.distance_from_home as f32,
        education as f32,
        record.environment_satisfaction as f32,
        record.job_involvement as f32,
        record.job_satisfaction as f32,
        record.monthly_income as f32,
        derived.num_companies_worked as f32,
        over_time as f32,
        record.relationship_satisfaction as f32,
        record.stock_option_level as f32,
        record.total_working_years as f32,
        record.training_times_last_year as f32,
        record.work_life_balance as f32,
        record.years_at_company as f32,
        record.years_since_last_promotion as f32,
        derived.income_per_age as f32,
        f32::from(derived.age_risk),
        f32::from(derived.distance_risk),
        f32::from(derived.years_at_co_risk),
        derived.average_tenure as f32,
        f32::from(derived.job_hopper),
        f32::from(derived.attrition_risk),
    ];
    row.values[..head.len()].copy_from_slice(&head);

    fill_group(&mut row, JOB_ROLE_OFFSET, &JOB_ROLE, record.job_role.as_deref());
    fill_group(&mut row, MARITAL_OFFSET, &MARITAL_STATUS, record.marital_status.as_deref());
    fill_group(&mut row, GENDER_OFFSET, &GENDER, record.gender.as_deref());
    fill_group(&mut row, EDUCATION_FIELD_OFFSET, &EDUCATION_FIELD, record.education_field.as_deref());
    fill_group(&mut row, DEPARTMENT_OFFSET, &DEPARTMENT, record.department.as_deref());

    row
}

fn fill_group(row: &mut FeatureRow, offset: usize, vocab: &OneHot, value: Option<&str>) {
    vocab.encode_into(value, row.group_mut(offset, vocab.width()));
}
