use crate::error::AppResult;
use crate::model::role::Role;

#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Row shape of the `users` table.
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: u64,
    pub username: String,
    pub password: String,
    pub role: String,
    pub employee_id: Option<u64>,
}

impl TryFrom<UserRow> for User {
    type Error = crate::error::AppError;

    fn try_from(row: UserRow) -> AppResult<Self> {
        Ok(User {
            role: Role::from_columns(&row.role, row.employee_id)?,
            id: row.id,
            username: row.username,
            password_hash: row.password,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}
