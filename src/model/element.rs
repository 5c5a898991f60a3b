use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// The ten per-period amounts carried by an element. Shared by the stored
/// row and the admin form. Omitted amounts are zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(default)]
pub struct ElementAmounts {
    #[schema(example = "300.00", value_type = String)]
    pub transport_allowance: Decimal,
    #[schema(example = "100.00", value_type = String)]
    pub utility_allowance: Decimal,
    #[schema(example = "50.00", value_type = String)]
    pub extra_duty_allowance: Decimal,
    #[schema(example = "0.00", value_type = String)]
    pub other_allowance: Decimal,
    #[schema(example = "0.00", value_type = String)]
    pub overtime: Decimal,

    #[schema(example = "200.00", value_type = String)]
    pub social_security_deduction: Decimal,
    #[schema(example = "150.00", value_type = String)]
    pub tax_deduction: Decimal,
    #[schema(example = "0.00", value_type = String)]
    pub loan1_deduction: Decimal,
    #[schema(example = "0.00", value_type = String)]
    pub loan2_deduction: Decimal,
    #[schema(example = "0.00", value_type = String)]
    pub other_deductions: Decimal,
}

impl ElementAmounts {
    pub fn total_allowances(&self) -> Decimal {
        self.transport_allowance
            + self.utility_allowance
            + self.extra_duty_allowance
            + self.other_allowance
            + self.overtime
    }

    pub fn total_deductions(&self) -> Decimal {
        self.social_security_deduction
            + self.tax_deduction
            + self.loan1_deduction
            + self.loan2_deduction
            + self.other_deductions
    }

    pub fn validate(&self) -> AppResult<()> {
        let fields = [
            ("transport_allowance", self.transport_allowance),
            ("utility_allowance", self.utility_allowance),
            ("extra_duty_allowance", self.extra_duty_allowance),
            ("other_allowance", self.other_allowance),
            ("overtime", self.overtime),
            ("social_security_deduction", self.social_security_deduction),
            ("tax_deduction", self.tax_deduction),
            ("loan1_deduction", self.loan1_deduction),
            ("loan2_deduction", self.loan2_deduction),
            ("other_deductions", self.other_deductions),
        ];

        match fields.iter().find(|(_, v)| v.is_sign_negative()) {
            Some((name, _)) => Err(AppError::validation(format!(
                "{name} must not be negative"
            ))),
            None => Ok(()),
        }
    }
}

/// Bundle of allowances and deductions applied to every employee linked to it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Element {
    #[schema(example = 1)]
    pub id: u64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub amounts: ElementAmounts,
}
