use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1001,
        "first_name": "John",
        "surname": "Doe",
        "date_of_birth": "1990-01-01",
        "bank_name": "ABC Bank",
        "bank_account_number": "123456789",
        "department_id": 1,
        "job_id": 1,
        "grade_id": 1,
        "element_id": 1
    })
)]
pub struct Employee {
    /// Assigned by the organisation, not generated.
    pub id: u64,
    pub first_name: String,
    pub surname: String,

    #[schema(value_type = String, format = "date", nullable = true)]
    pub date_of_birth: Option<NaiveDate>,

    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,

    pub department_id: Option<u64>,
    pub job_id: Option<u64>,
    pub grade_id: Option<u64>,
    pub element_id: Option<u64>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = 1002)]
    pub id: u64,
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Roe")]
    pub surname: String,
    #[schema(example = "1992-04-12", format = "date", value_type = String)]
    pub date_of_birth: Option<NaiveDate>,
    #[schema(example = "ABC Bank")]
    pub bank_name: Option<String>,
    #[schema(example = "987654321")]
    pub bank_account_number: Option<String>,
    #[schema(example = 1)]
    pub department_id: Option<u64>,
    #[schema(example = 1)]
    pub job_id: Option<u64>,
    #[schema(example = 1)]
    pub grade_id: Option<u64>,
    #[schema(example = 1)]
    pub element_id: Option<u64>,
}

/// Account numbers are 8 to 20 digits. Absent or blank values pass.
fn validate_bank_account(value: Option<&str>) -> AppResult<()> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    if !(8..=20).contains(&value.len()) || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::validation(
            "Bank account number must be 8 to 20 digits",
        ));
    }
    Ok(())
}

impl CreateEmployee {
    pub fn validate(&self) -> AppResult<()> {
        if self.id == 0 {
            return Err(AppError::validation("Employee id must be a positive number"));
        }
        if self.first_name.trim().is_empty() || self.surname.trim().is_empty() {
            return Err(AppError::validation("First name and surname are required"));
        }
        validate_bank_account(self.bank_account_number.as_deref())
    }
}

/// The only fields an employee may change on their own record.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfileUpdate {
    #[schema(example = "John")]
    pub first_name: Option<String>,
    #[schema(example = "Doe")]
    pub surname: Option<String>,
    #[schema(example = "XYZ Bank")]
    pub bank_name: Option<String>,
    #[schema(example = "555000111")]
    pub bank_account_number: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if self.is_empty() {
            return Err(AppError::validation("No fields provided for update"));
        }
        let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank(&self.first_name) || blank(&self.surname) {
            return Err(AppError::validation("Name fields must not be blank"));
        }
        validate_bank_account(self.bank_account_number.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.surname.is_none()
            && self.bank_name.is_none()
            && self.bank_account_number.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_update_is_rejected() {
        assert!(ProfileUpdate::default().validate().is_err());
    }

    #[test]
    fn test_blank_name_is_rejected_but_bank_fields_may_be_cleared() {
        let update = ProfileUpdate {
            surname: Some("  ".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(update.validate().is_err());

        let update = ProfileUpdate {
            bank_name: Some(String::new()),
            ..ProfileUpdate::default()
        };
        assert!(update.validate().is_ok());
    }

    fn new_employee(account: Option<&str>) -> CreateEmployee {
        CreateEmployee {
            id: 1002,
            first_name: "Jane".to_string(),
            surname: "Roe".to_string(),
            date_of_birth: None,
            bank_name: None,
            bank_account_number: account.map(str::to_string),
            department_id: None,
            job_id: None,
            grade_id: None,
            element_id: None,
        }
    }

    #[test]
    fn test_new_employee_bank_account_must_be_8_to_20_digits() {
        assert!(new_employee(None).validate().is_ok());
        assert!(new_employee(Some("12345678")).validate().is_ok());
        assert!(new_employee(Some(&"9".repeat(20))).validate().is_ok());

        for bad in ["12ab", "1", "1234567", "1234 5678", "123456789012345678901"] {
            assert!(
                matches!(new_employee(Some(bad)).validate(), Err(AppError::Validation(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_profile_bank_account_must_be_digits_unless_cleared() {
        let update = |account: &str| ProfileUpdate {
            bank_account_number: Some(account.to_string()),
            ..ProfileUpdate::default()
        };
        assert!(update("555000111").validate().is_ok());
        assert!(update("").validate().is_ok());
        assert!(matches!(
            update("12ab").validate(),
            Err(AppError::Validation(_))
        ));
    }
}
