use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

const MAX_MONTH_LEN: usize = 20;

/// A payroll period label such as "January 2026". The month is free text.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize)]
#[display(fmt = "{} {}", month, year)]
pub struct Period {
    month: String,
    year: i32,
}

impl Period {
    pub fn new(month: &str, year: i32) -> AppResult<Self> {
        let month = month.trim();
        if month.is_empty() {
            return Err(AppError::validation("Month is required"));
        }
        if month.chars().count() > MAX_MONTH_LEN {
            return Err(AppError::validation(format!(
                "Month must be at most {MAX_MONTH_LEN} characters"
            )));
        }
        if month.chars().any(char::is_control) {
            return Err(AppError::validation(
                "Month must not contain control characters",
            ));
        }
        if year <= 0 {
            return Err(AppError::validation("Year must be a positive number"));
        }
        Ok(Self {
            month: month.to_string(),
            year,
        })
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

/// Row written by a payroll run.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayroll {
    pub employee_id: u64,
    pub grade_id: u64,
    pub element_id: u64,
    pub gross_salary: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}

/// Stored payroll row joined with the employee name.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollRecord {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub surname: String,
    #[schema(example = 1)]
    pub grade_id: u64,
    #[schema(example = 1)]
    pub element_id: u64,
    #[schema(example = "January")]
    pub month: String,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = "5450.00", value_type = String)]
    pub gross_salary: Decimal,
    #[schema(example = "350.00", value_type = String)]
    pub total_deductions: Decimal,
    #[schema(example = "5100.00", value_type = String)]
    pub net_pay: Decimal,
}

impl PayrollRecord {
    pub fn period_label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}
