//! Persistence seam. Handlers and the payroll engine only talk to
//! [`Repository`]; `MySqlStore` backs the running service.

#[cfg(test)]
pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use strum_macros::Display;

use crate::error::AppResult;
use crate::model::{
    department::{Department, DepartmentForm},
    element::{Element, ElementAmounts},
    employee::{CreateEmployee, Employee, ProfileUpdate},
    grade::{Grade, GradeForm},
    job::{Job, JobForm},
    payroll::{NewPayroll, PayrollRecord, Period},
    user::{NewUser, User},
};

/// Reference tables an employee can point at.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RefKind {
    Department,
    Job,
    Grade,
    Element,
}

impl RefKind {
    /// Column on `employee` (and `payroll` where applicable) holding the key.
    pub fn foreign_key(&self) -> &'static str {
        match self {
            RefKind::Department => "department_id",
            RefKind::Job => "job_id",
            RefKind::Grade => "grade_id",
            RefKind::Element => "element_id",
        }
    }

    /// Payroll rows snapshot the grade and element only.
    pub fn snapshotted_by_payroll(&self) -> bool {
        matches!(self, RefKind::Grade | RefKind::Element)
    }
}

/// How many rows still point at a reference record.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct ReferenceUsage {
    pub employees: u64,
    pub payrolls: u64,
}

impl ReferenceUsage {
    pub fn is_unused(&self) -> bool {
        self.employees == 0 && self.payrolls == 0
    }
}

#[async_trait]
pub trait Repository: Send + Sync {
    // ---------------- reference data ----------------
    async fn list_departments(&self) -> AppResult<Vec<Department>>;
    async fn create_department(&self, form: &DepartmentForm) -> AppResult<u64>;
    async fn update_department(&self, id: u64, form: &DepartmentForm) -> AppResult<bool>;

    async fn list_jobs(&self) -> AppResult<Vec<Job>>;
    async fn create_job(&self, form: &JobForm) -> AppResult<u64>;
    async fn update_job(&self, id: u64, form: &JobForm) -> AppResult<bool>;

    async fn list_grades(&self) -> AppResult<Vec<Grade>>;
    async fn create_grade(&self, form: &GradeForm) -> AppResult<u64>;
    async fn update_grade(&self, id: u64, form: &GradeForm) -> AppResult<bool>;

    async fn list_elements(&self) -> AppResult<Vec<Element>>;
    async fn create_element(&self, amounts: &ElementAmounts) -> AppResult<u64>;
    async fn update_element(&self, id: u64, amounts: &ElementAmounts) -> AppResult<bool>;

    async fn reference_usage(&self, kind: RefKind, id: u64) -> AppResult<ReferenceUsage>;
    /// Returns false when no row had the id.
    async fn delete_reference(&self, kind: RefKind, id: u64) -> AppResult<bool>;

    // ---------------- employees ----------------
    async fn list_employees(&self) -> AppResult<Vec<Employee>>;
    async fn find_employee(&self, id: u64) -> AppResult<Option<Employee>>;
    async fn create_employee(&self, employee: &CreateEmployee) -> AppResult<()>;
    async fn update_employee_profile(&self, id: u64, update: &ProfileUpdate) -> AppResult<bool>;

    // ---------------- users and sessions ----------------
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn user_exists_for_employee(&self, employee_id: u64) -> AppResult<bool>;
    async fn create_user(&self, user: &NewUser) -> AppResult<u64>;

    async fn save_refresh_token(&self, user_id: u64, jti: &str, expires_at: i64) -> AppResult<()>;
    /// Revokes an active token. Returns false when it was unknown, already
    /// revoked or expired.
    async fn consume_refresh_token(&self, jti: &str) -> AppResult<bool>;

    // ---------------- payroll ----------------
    /// Writes every row of one run atomically. Rejects the whole run with
    /// `Conflict` when the period already has records.
    async fn record_payroll_run(&self, period: &Period, rows: &[NewPayroll]) -> AppResult<u64>;
    async fn list_payrolls(&self) -> AppResult<Vec<PayrollRecord>>;
    async fn payrolls_for_employee(&self, employee_id: u64) -> AppResult<Vec<PayrollRecord>>;
    async fn find_payroll_for_employee(
        &self,
        payroll_id: u64,
        employee_id: u64,
    ) -> AppResult<Option<PayrollRecord>>;
}
