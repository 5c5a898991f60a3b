use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Department {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Engineering")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DepartmentForm {
    #[schema(example = "Engineering")]
    pub name: String,
}

impl DepartmentForm {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Department name is required"));
        }
        Ok(())
    }
}
