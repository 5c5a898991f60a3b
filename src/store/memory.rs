//! In-process repository used by the unit tests. It enforces the same keys
//! and ordering as the MySQL schema.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::model::{
    department::{Department, DepartmentForm},
    element::{Element, ElementAmounts},
    employee::{CreateEmployee, Employee, ProfileUpdate},
    grade::{Grade, GradeForm},
    job::{Job, JobForm},
    payroll::{NewPayroll, PayrollRecord, Period},
    user::{NewUser, User},
};
use crate::store::{RefKind, ReferenceUsage, Repository};

#[derive(Debug)]
struct RefreshToken {
    jti: String,
    expires_at: i64,
    revoked: bool,
}

#[derive(Debug, Clone)]
struct PayrollRow {
    id: u64,
    employee_id: u64,
    grade_id: u64,
    element_id: u64,
    month: String,
    year: i32,
    row: NewPayroll,
}

#[derive(Default)]
struct Tables {
    next_id: u64,
    departments: BTreeMap<u64, Department>,
    jobs: BTreeMap<u64, Job>,
    grades: BTreeMap<u64, Grade>,
    elements: BTreeMap<u64, Element>,
    employees: BTreeMap<u64, Employee>,
    users: BTreeMap<u64, User>,
    refresh_tokens: Vec<RefreshToken>,
    payrolls: Vec<PayrollRow>,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn reference_exists(&self, kind: RefKind, id: u64) -> bool {
        match kind {
            RefKind::Department => self.departments.contains_key(&id),
            RefKind::Job => self.jobs.contains_key(&id),
            RefKind::Grade => self.grades.contains_key(&id),
            RefKind::Element => self.elements.contains_key(&id),
        }
    }

    fn record(&self, p: &PayrollRow) -> Option<PayrollRecord> {
        let employee = self.employees.get(&p.employee_id)?;
        Some(PayrollRecord {
            id: p.id,
            employee_id: p.employee_id,
            first_name: employee.first_name.clone(),
            surname: employee.surname.clone(),
            grade_id: p.grade_id,
            element_id: p.element_id,
            month: p.month.clone(),
            year: p.year,
            gross_salary: p.row.gross_salary,
            total_deductions: p.row.total_deductions,
            net_pay: p.row.net_pay,
        })
    }

    fn records<F>(&self, filter: F) -> Vec<PayrollRecord>
    where
        F: Fn(&PayrollRow) -> bool,
    {
        let mut records: Vec<PayrollRecord> = self
            .payrolls
            .iter()
            .filter(|p| filter(p))
            .filter_map(|p| self.record(p))
            .collect();
        records.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then_with(|| b.month.cmp(&a.month))
                .then_with(|| b.id.cmp(&a.id))
        });
        records
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// When set, the nth payroll insert of a run fails.
    fail_payroll_insert_at: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes the next payroll run fail on its nth row (0-based).
    pub fn fail_payroll_insert_at(&self, index: usize) {
        *self.fail_payroll_insert_at.lock().unwrap() = Some(index);
    }

    pub fn payroll_count(&self) -> usize {
        self.tables().payrolls.len()
    }

    /// Links or unlinks an employee's grade and element.
    pub fn set_pay_links(&self, employee_id: u64, grade_id: Option<u64>, element_id: Option<u64>) {
        if let Some(employee) = self.tables().employees.get_mut(&employee_id) {
            employee.grade_id = grade_id;
            employee.element_id = element_id;
        }
    }
}

#[async_trait]
impl Repository for MemoryStore {
    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        let mut rows: Vec<_> = self.tables().departments.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create_department(&self, form: &DepartmentForm) -> AppResult<u64> {
        let mut t = self.tables();
        let name = form.name.trim().to_string();
        if t.departments.values().any(|d| d.name == name) {
            return Err(AppError::conflict("Department name already exists"));
        }
        let id = t.next_id();
        t.departments.insert(id, Department { id, name });
        Ok(id)
    }

    async fn update_department(&self, id: u64, form: &DepartmentForm) -> AppResult<bool> {
        let mut t = self.tables();
        let name = form.name.trim().to_string();
        if t.departments.values().any(|d| d.name == name && d.id != id) {
            return Err(AppError::conflict("Department name already exists"));
        }
        Ok(t
            .departments
            .get_mut(&id)
            .map(|d| d.name = name)
            .is_some())
    }

    async fn list_jobs(&self) -> AppResult<Vec<Job>> {
        let mut rows: Vec<_> = self.tables().jobs.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create_job(&self, form: &JobForm) -> AppResult<u64> {
        let mut t = self.tables();
        let id = t.next_id();
        t.jobs.insert(
            id,
            Job {
                id,
                name: form.name.trim().to_string(),
                description: form.description.clone(),
            },
        );
        Ok(id)
    }

    async fn update_job(&self, id: u64, form: &JobForm) -> AppResult<bool> {
        let mut t = self.tables();
        Ok(t
            .jobs
            .get_mut(&id)
            .map(|j| {
                j.name = form.name.trim().to_string();
                j.description = form.description.clone();
            })
            .is_some())
    }

    async fn list_grades(&self) -> AppResult<Vec<Grade>> {
        let mut rows: Vec<_> = self.tables().grades.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create_grade(&self, form: &GradeForm) -> AppResult<u64> {
        let mut t = self.tables();
        let name = form.name.trim().to_string();
        if t.grades.values().any(|g| g.name == name) {
            return Err(AppError::conflict("Grade name already exists"));
        }
        let id = t.next_id();
        t.grades.insert(
            id,
            Grade {
                id,
                name,
                salary: form.salary,
            },
        );
        Ok(id)
    }

    async fn update_grade(&self, id: u64, form: &GradeForm) -> AppResult<bool> {
        let mut t = self.tables();
        let name = form.name.trim().to_string();
        if t.grades.values().any(|g| g.name == name && g.id != id) {
            return Err(AppError::conflict("Grade name already exists"));
        }
        Ok(t
            .grades
            .get_mut(&id)
            .map(|g| {
                g.name = name;
                g.salary = form.salary;
            })
            .is_some())
    }

    async fn list_elements(&self) -> AppResult<Vec<Element>> {
        Ok(self.tables().elements.values().cloned().collect())
    }

    async fn create_element(&self, amounts: &ElementAmounts) -> AppResult<u64> {
        let mut t = self.tables();
        let id = t.next_id();
        t.elements.insert(
            id,
            Element {
                id,
                amounts: amounts.clone(),
            },
        );
        Ok(id)
    }

    async fn update_element(&self, id: u64, amounts: &ElementAmounts) -> AppResult<bool> {
        let mut t = self.tables();
        Ok(t
            .elements
            .get_mut(&id)
            .map(|e| e.amounts = amounts.clone())
            .is_some())
    }

    async fn reference_usage(&self, kind: RefKind, id: u64) -> AppResult<ReferenceUsage> {
        let t = self.tables();
        let employees = t
            .employees
            .values()
            .filter(|e| {
                let link = match kind {
                    RefKind::Department => e.department_id,
                    RefKind::Job => e.job_id,
                    RefKind::Grade => e.grade_id,
                    RefKind::Element => e.element_id,
                };
                link == Some(id)
            })
            .count() as u64;
        let payrolls = t
            .payrolls
            .iter()
            .filter(|p| match kind {
                RefKind::Grade => p.grade_id == id,
                RefKind::Element => p.element_id == id,
                RefKind::Department | RefKind::Job => false,
            })
            .count() as u64;
        Ok(ReferenceUsage {
            employees,
            payrolls,
        })
    }

    async fn delete_reference(&self, kind: RefKind, id: u64) -> AppResult<bool> {
        let mut t = self.tables();
        let removed = match kind {
            RefKind::Department => t.departments.remove(&id).is_some(),
            RefKind::Job => t.jobs.remove(&id).is_some(),
            RefKind::Grade => t.grades.remove(&id).is_some(),
            RefKind::Element => t.elements.remove(&id).is_some(),
        };
        Ok(removed)
    }

    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        Ok(self.tables().employees.values().cloned().collect())
    }

    async fn find_employee(&self, id: u64) -> AppResult<Option<Employee>> {
        Ok(self.tables().employees.get(&id).cloned())
    }

    async fn create_employee(&self, e: &CreateEmployee) -> AppResult<()> {
        let mut t = self.tables();
        if t.employees.contains_key(&e.id) {
            return Err(AppError::conflict("Employee id already exists"));
        }
        let links = [
            (RefKind::Department, e.department_id),
            (RefKind::Job, e.job_id),
            (RefKind::Grade, e.grade_id),
            (RefKind::Element, e.element_id),
        ];
        if links
            .iter()
            .any(|(kind, id)| id.is_some_and(|id| !t.reference_exists(*kind, id)))
        {
            return Err(AppError::validation("Referenced record does not exist"));
        }
        t.employees.insert(
            e.id,
            Employee {
                id: e.id,
                first_name: e.first_name.trim().to_string(),
                surname: e.surname.trim().to_string(),
                date_of_birth: e.date_of_birth,
                bank_name: e.bank_name.clone(),
                bank_account_number: e.bank_account_number.clone(),
                department_id: e.department_id,
                job_id: e.job_id,
                grade_id: e.grade_id,
                element_id: e.element_id,
            },
        );
        Ok(())
    }

    async fn update_employee_profile(&self, id: u64, update: &ProfileUpdate) -> AppResult<bool> {
        if update.is_empty() {
            return Err(AppError::validation("No fields provided for update"));
        }
        let mut t = self.tables();
        let Some(employee) = t.employees.get_mut(&id) else {
            return Ok(false);
        };
        let cleaned = |v: &str| {
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        };
        if let Some(name) = &update.first_name {
            employee.first_name = name.trim().to_string();
        }
        if let Some(name) = &update.surname {
            employee.surname = name.trim().to_string();
        }
        if let Some(bank) = &update.bank_name {
            employee.bank_name = cleaned(bank);
        }
        if let Some(account) = &update.bank_account_number {
            employee.bank_account_number = cleaned(account);
        }
        Ok(true)
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn user_exists_for_employee(&self, employee_id: u64) -> AppResult<bool> {
        Ok(self
            .tables()
            .users
            .values()
            .any(|u| u.role.employee_id() == Some(employee_id)))
    }

    async fn create_user(&self, user: &NewUser) -> AppResult<u64> {
        let mut t = self.tables();
        let employee_id = user.role.employee_id();
        if t.users.values().any(|u| {
            u.username == user.username
                || (employee_id.is_some() && u.role.employee_id() == employee_id)
        }) {
            return Err(AppError::conflict(
                "Username or employee account already exists",
            ));
        }
        if employee_id.is_some_and(|id| !t.employees.contains_key(&id)) {
            return Err(AppError::validation("Referenced record does not exist"));
        }
        let id = t.next_id();
        t.users.insert(
            id,
            User {
                id,
                username: user.username.clone(),
                password_hash: user.password_hash.clone(),
                role: user.role,
            },
        );
        Ok(id)
    }

    async fn save_refresh_token(&self, _user_id: u64, jti: &str, expires_at: i64) -> AppResult<()> {
        self.tables().refresh_tokens.push(RefreshToken {
            jti: jti.to_string(),
            expires_at,
            revoked: false,
        });
        Ok(())
    }

    async fn consume_refresh_token(&self, jti: &str) -> AppResult<bool> {
        let now = Utc::now().timestamp();
        let mut t = self.tables();
        match t
            .refresh_tokens
            .iter_mut()
            .find(|r| r.jti == jti && !r.revoked && r.expires_at > now)
        {
            Some(token) => {
                token.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_payroll_run(&self, period: &Period, rows: &[NewPayroll]) -> AppResult<u64> {
        let fail_at = self.fail_payroll_insert_at.lock().unwrap().take();
        let mut t = self.tables();

        if t
            .payrolls
            .iter()
            .any(|p| p.month == period.month() && p.year == period.year())
        {
            return Err(AppError::conflict(format!(
                "Payroll for {period} has already been generated"
            )));
        }

        // Stage the whole run, then publish it in one step.
        let mut staged = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            if fail_at == Some(index) || !t.employees.contains_key(&row.employee_id) {
                return Err(AppError::internal("payroll insert failed"));
            }
            let id = t.next_id();
            staged.push(PayrollRow {
                id,
                employee_id: row.employee_id,
                grade_id: row.grade_id,
                element_id: row.element_id,
                month: period.month().to_string(),
                year: period.year(),
                row: row.clone(),
            });
        }
        t.payrolls.extend(staged);

        Ok(rows.len() as u64)
    }

    async fn list_payrolls(&self) -> AppResult<Vec<PayrollRecord>> {
        Ok(self.tables().records(|_| true))
    }

    async fn payrolls_for_employee(&self, employee_id: u64) -> AppResult<Vec<PayrollRecord>> {
        Ok(self.tables().records(|p| p.employee_id == employee_id))
    }

    async fn find_payroll_for_employee(
        &self,
        payroll_id: u64,
        employee_id: u64,
    ) -> AppResult<Option<PayrollRecord>> {
        let t = self.tables();
        Ok(t
            .payrolls
            .iter()
            .find(|p| p.id == payroll_id && p.employee_id == employee_id)
            .and_then(|p| t.record(p)))
    }
}
