use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Pay band; every employee on the grade shares its base salary.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Grade {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "G1")]
    pub name: String,
    #[schema(example = "5000.00", value_type = String)]
    pub salary: Decimal,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GradeForm {
    #[schema(example = "G1")]
    pub name: String,
    #[schema(example = "5000.00", value_type = String)]
    pub salary: Decimal,
}

impl GradeForm {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Grade name is required"));
        }
        if self.salary.is_sign_negative() {
            return Err(AppError::validation("Grade salary must not be negative"));
        }
        Ok(())
    }
}
