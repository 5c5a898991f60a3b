use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::{AppError, AppResult};

/// What a user is allowed to be. Only employees carry an employee link.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee { employee_id: u64 },
}

/// Value of the `users.role` column.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RoleKind {
    Admin,
    Employee,
}

impl Role {
    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Admin => RoleKind::Admin,
            Role::Employee { .. } => RoleKind::Employee,
        }
    }

    pub fn employee_id(&self) -> Option<u64> {
        match self {
            Role::Admin => None,
            Role::Employee { employee_id } => Some(*employee_id),
        }
    }

    /// Landing view for a fresh session.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Employee { .. } => "/employee/dashboard",
        }
    }

    /// Rebuilds the role from its stored column pair, rejecting rows that
    /// break the admin/employee shape.
    pub fn from_columns(kind: &str, employee_id: Option<u64>) -> AppResult<Self> {
        let kind: RoleKind = kind
            .parse()
            .map_err(|_| AppError::internal(format!("unknown role '{kind}'")))?;

        match (kind, employee_id) {
            (RoleKind::Admin, None) => Ok(Role::Admin),
            (RoleKind::Employee, Some(employee_id)) => Ok(Role::Employee { employee_id }),
            (RoleKind::Admin, Some(_)) => {
                Err(AppError::internal("admin account linked to an employee"))
            }
            (RoleKind::Employee, None) => {
                Err(AppError::internal("employee account without employee id"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_round_trip_through_kind() {
        let role = Role::Employee { employee_id: 1001 };
        let rebuilt = Role::from_columns(&role.kind().to_string(), role.employee_id()).unwrap();
        assert_eq!(rebuilt, role);
        assert_eq!(RoleKind::Admin.to_string(), "admin");
    }

    #[test]
    fn test_inconsistent_columns_are_rejected() {
        assert!(Role::from_columns("admin", Some(1001)).is_err());
        assert!(Role::from_columns("employee", None).is_err());
        assert!(Role::from_columns("hr", None).is_err());
    }

    #[test]
    fn test_landing_paths_differ_by_role() {
        assert_eq!(Role::Admin.landing_path(), "/admin/dashboard");
        assert_eq!(
            Role::Employee { employee_id: 7 }.landing_path(),
            "/employee/dashboard"
        );
    }
}
