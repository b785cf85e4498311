//! Employee record model and input validation

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Raw JSON object as posted by the form
pub type Payload = Map<String, Value>;

/// Fields that must coerce to integers, checked in this order
pub const INT_FIELDS: [&str; 15] = [
    "Age",
    "DistanceFromHome",
    "EnvironmentSatisfaction",
    "JobInvolvement",
    "JobLevel",
    "JobSatisfaction",
    "MonthlyIncome",
    "NumCompaniesWorked",
    "RelationshipSatisfaction",
    "StockOptionLevel",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "WorkLifeBalance",
    "YearsAtCompany",
    "YearsSinceLastPromotion",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("wrong int for field `{field}`")]
pub struct ValidationError {
    pub field: &'static str,
}

/// Validated employee attributes.
///
/// Integer fields are coerced; categorical fields are carried as-is and only
/// interpreted by the feature transform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRecord {
    pub age: i64,
    pub distance_from_home: i64,
    pub environment_satisfaction: i64,
    pub job_involvement: i64,
    pub job_level: i64,
    pub job_satisfaction: i64,
    pub monthly_income: i64,
    pub num_companies_worked: i64,
    pub relationship_satisfaction: i64,
    pub stock_option_level: i64,
    pub total_working_years: i64,
    pub training_times_last_year: i64,
    pub work_life_balance: i64,
    pub years_at_company: i64,
    pub years_since_last_promotion: i64,

    pub department: Option<String>,
    pub education_field: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub job_role: Option<String>,
    pub business_travel: Option<String>,
    pub over_time: Option<String>,
    pub education: Option<String>,
}

impl EmployeeRecord {
    /// Validate a raw payload.
    ///
    /// Fails on the first integer field that cannot be coerced; nothing else
    /// is checked.
    pub fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        let mut ints = [0i64; INT_FIELDS.len()];
        for (slot, field) in ints.iter_mut().zip(INT_FIELDS) {
            *slot = coerce_int(payload.get(field)).ok_or(ValidationError { field })?;
        }

        let [
            age,
            distance_from_home,
            environment_satisfaction,
            job_involvement,
            job_level,
            job_satisfaction,
            monthly_income,
            num_companies_worked,
            relationship_satisfaction,
            stock_option_level,
            total_working_years,
            training_times_last_year,
            work_life_balance,
            years_at_company,
            years_since_last_promotion,
        ] = ints;

        Ok(Self {
            age,
            distance_from_home,
            environment_satisfaction,
            job_involvement,
            job_level,
            job_satisfaction,
            monthly_income,
            num_companies_worked,
            relationship_satisfaction,
            stock_option_level,
            total_working_years,
            training_times_last_year,
            work_life_balance,
            years_at_company,
            years_since_last_promotion,

            department: category(payload, "Department"),
            education_field: category(payload, "EducationField"),
            gender: category(payload, "Gender"),
            marital_status: category(payload, "MaritalStatus"),
            job_role: category(payload, "JobRole"),
            business_travel: category(payload, "BusinessTravel"),
            over_time: category(payload, "OverTime"),
            education: category(payload, "Education"),
        })
    }
}

/// Integer coercion.
///
/// Accepts integers, floats (truncated toward zero) and integer strings with
/// surrounding whitespace. Everything else is rejected.
///
/// Stricter than a generic "anything int-like" conversion: booleans are not
/// numbers here (`true` is not 1), and digit-group underscores (`"1_000"`)
/// are not accepted.
pub fn coerce_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            let f = n.as_f64()?;
            let t = f.trunc();
            if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
                Some(t as i64)
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Categorical value. Null and absent keys are `None`; non-string values are
/// stringified so they fall through to the unknown-category path.
fn category(payload: &Payload, field: &str) -> Option<String> {
    match payload.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::sample_payload;
    use serde_json::json;

    #[test]
    fn test_valid_payload() {
        let record = EmployeeRecord::from_payload(&sample_payload()).unwrap();
        assert_eq!(record.age, 30);
        assert_eq!(record.distance_from_home, 25);
        assert_eq!(record.department.as_deref(), Some("Sales"));
        assert_eq!(record.education.as_deref(), Some("Bachelor"));
    }

    #[test]
    fn test_rejects_every_int_field() {
        for field in INT_FIELDS {
            let mut payload = sample_payload();
            payload.insert(field.to_string(), json!("abc"));

            let err = EmployeeRecord::from_payload(&payload).unwrap_err();
            assert_eq!(err.field, field);
        }
    }

    #[test]
    fn test_missing_int_field() {
        let mut payload = sample_payload();
        payload.remove("JobLevel");

        let err = EmployeeRecord::from_payload(&payload).unwrap_err();
        assert_eq!(err, ValidationError { field: "JobLevel" });
        assert_eq!(err.to_string(), "wrong int for field `JobLevel`");
    }

    #[test]
    fn test_first_failure_wins() {
        let mut payload = sample_payload();
        payload.insert("MonthlyIncome".into(), json!("x"));
        payload.insert("Age".into(), json!(null));

        let err = EmployeeRecord::from_payload(&payload).unwrap_err();
        assert_eq!(err.field, "Age");
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int(Some(&json!(42))), Some(42));
        assert_eq!(coerce_int(Some(&json!("42"))), Some(42));
        assert_eq!(coerce_int(Some(&json!(" -7 "))), Some(-7));
        assert_eq!(coerce_int(Some(&json!("+3"))), Some(3));
        assert_eq!(coerce_int(Some(&json!(3.9))), Some(3));
        assert_eq!(coerce_int(Some(&json!(-3.9))), Some(-3));

        assert_eq!(coerce_int(Some(&json!("3.5"))), None);
        assert_eq!(coerce_int(Some(&json!(""))), None);
        assert_eq!(coerce_int(Some(&json!(true))), None);
        assert_eq!(coerce_int(Some(&json!(false))), None);
        assert_eq!(coerce_int(Some(&json!("1_000"))), None);
        assert_eq!(coerce_int(Some(&json!([1]))), None);
        assert_eq!(coerce_int(Some(&Value::Null)), None);
        assert_eq!(coerce_int(None), None);
    }

    #[test]
    fn test_categories_are_not_validated() {
        let mut payload = sample_payload();
        payload.insert("Gender".into(), json!(7));
        payload.insert("OverTime".into(), json!(null));
        payload.remove("JobRole");

        let record = EmployeeRecord::from_payload(&payload).unwrap();
        assert_eq!(record.gender.as_deref(), Some("7"));
        assert_eq!(record.over_time, None);
        assert_eq!(record.job_role, None);
    }
}
