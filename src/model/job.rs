use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Job {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Developer")]
    pub name: String,
    #[schema(example = "Writes code", nullable = true)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct JobForm {
    #[schema(example = "Developer")]
    pub name: String,
    #[schema(example = "Writes code")]
    pub description: Option<String>,
}

impl JobForm {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Job name is required"));
        }
        Ok(())
    }
}
