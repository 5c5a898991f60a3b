use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::model::{
    department::{Department, DepartmentForm},
    element::{Element, ElementAmounts},
    employee::{CreateEmployee, Employee, ProfileUpdate},
    grade::{Grade, GradeForm},
    job::{Job, JobForm},
    payroll::{NewPayroll, PayrollRecord, Period},
    user::{NewUser, User, UserRow},
};
use crate::store::{RefKind, ReferenceUsage, Repository};
use crate::utils::db_utils::{SqlValue, build_update_sql, execute_update};

const PAYROLL_SELECT: &str = r#"
    SELECT p.id, p.employee_id, e.first_name, e.surname, p.grade_id, p.element_id,
           p.month, p.year, p.gross_salary, p.total_deductions, p.net_pay
    FROM payroll p
    JOIN employee e ON e.id = p.employee_id
"#;

const PAYROLL_ORDER: &str = "ORDER BY p.year DESC, p.month DESC, p.id DESC";

const EMPLOYEE_COLUMNS: &str = r#"
    id, first_name, surname, date_of_birth, bank_name, bank_account_number,
    department_id, job_id, grade_id, element_id
"#;

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Maps key violations on INSERT/UPDATE to user-facing errors.
fn write_error(e: sqlx::Error, duplicate: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::conflict(duplicate);
        }
        if db_err.is_foreign_key_violation() {
            return AppError::validation("Referenced record does not exist");
        }
    }
    e.into()
}

/// A delete that lost a race with a new reference surfaces as a conflict.
fn delete_error(e: sqlx::Error, kind: RefKind) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::conflict(format!("This {kind} is still in use"));
        }
    }
    e.into()
}

fn blank_to_null(value: &Option<String>) -> Option<SqlValue> {
    value.as_ref().map(|v| {
        let v = v.trim();
        if v.is_empty() {
            SqlValue::Null
        } else {
            SqlValue::String(v.to_string())
        }
    })
}

#[async_trait]
impl Repository for MySqlStore {
    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, Department>("SELECT id, name FROM department ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_department(&self, form: &DepartmentForm) -> AppResult<u64> {
        let result = sqlx::query("INSERT INTO department (name) VALUES (?)")
            .bind(form.name.trim())
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "Department name already exists"))?;
        Ok(result.last_insert_id())
    }

    async fn update_department(&self, id: u64, form: &DepartmentForm) -> AppResult<bool> {
        let result = sqlx::query("UPDATE department SET name = ? WHERE id = ?")
            .bind(form.name.trim())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "Department name already exists"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_jobs(&self) -> AppResult<Vec<Job>> {
        let rows = sqlx::query_as::<_, Job>("SELECT id, name, description FROM job ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_job(&self, form: &JobForm) -> AppResult<u64> {
        let result = sqlx::query("INSERT INTO job (name, description) VALUES (?, ?)")
            .bind(form.name.trim())
            .bind(&form.description)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_id())
    }

    async fn update_job(&self, id: u64, form: &JobForm) -> AppResult<bool> {
        let result = sqlx::query("UPDATE job SET name = ?, description = ? WHERE id = ?")
            .bind(form.name.trim())
            .bind(&form.description)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_grades(&self) -> AppResult<Vec<Grade>> {
        let rows = sqlx::query_as::<_, Grade>("SELECT id, name, salary FROM grade ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_grade(&self, form: &GradeForm) -> AppResult<u64> {
        let result = sqlx::query("INSERT INTO grade (name, salary) VALUES (?, ?)")
            .bind(form.name.trim())
            .bind(form.salary)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "Grade name already exists"))?;
        Ok(result.last_insert_id())
    }

    async fn update_grade(&self, id: u64, form: &GradeForm) -> AppResult<bool> {
        let result = sqlx::query("UPDATE grade SET name = ?, salary = ? WHERE id = ?")
            .bind(form.name.trim())
            .bind(form.salary)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "Grade name already exists"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_elements(&self) -> AppResult<Vec<Element>> {
        let rows = sqlx::query_as::<_, Element>(
            r#"
            SELECT id,
                   transport_allowance, utility_allowance, extra_duty_allowance,
                   other_allowance, overtime,
                   social_security_deduction, tax_deduction, loan1_deduction,
                   loan2_deduction, other_deductions
            FROM element
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_element(&self, a: &ElementAmounts) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO element
            (transport_allowance, utility_allowance, extra_duty_allowance, other_allowance,
             overtime, social_security_deduction, tax_deduction, loan1_deduction,
             loan2_deduction, other_deductions)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(a.transport_allowance)
        .bind(a.utility_allowance)
        .bind(a.extra_duty_allowance)
        .bind(a.other_allowance)
        .bind(a.overtime)
        .bind(a.social_security_deduction)
        .bind(a.tax_deduction)
        .bind(a.loan1_deduction)
        .bind(a.loan2_deduction)
        .bind(a.other_deductions)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_id())
    }

    async fn update_element(&self, id: u64, a: &ElementAmounts) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE element
            SET transport_allowance = ?, utility_allowance = ?, extra_duty_allowance = ?,
                other_allowance = ?, overtime = ?, social_security_deduction = ?,
                tax_deduction = ?, loan1_deduction = ?, loan2_deduction = ?,
                other_deductions = ?
            WHERE id = ?
            "#,
        )
        .bind(a.transport_allowance)
        .bind(a.utility_allowance)
        .bind(a.extra_duty_allowance)
        .bind(a.other_allowance)
        .bind(a.overtime)
        .bind(a.social_security_deduction)
        .bind(a.tax_deduction)
        .bind(a.loan1_deduction)
        .bind(a.loan2_deduction)
        .bind(a.other_deductions)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reference_usage(&self, kind: RefKind, id: u64) -> AppResult<ReferenceUsage> {
        let employee_sql = format!(
            "SELECT COUNT(*) FROM employee WHERE {} = ?",
            kind.foreign_key()
        );
        let employees = sqlx::query_scalar::<_, i64>(&employee_sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        let payrolls = if kind.snapshotted_by_payroll() {
            let payroll_sql = format!(
                "SELECT COUNT(*) FROM payroll WHERE {} = ?",
                kind.foreign_key()
            );
            sqlx::query_scalar::<_, i64>(&payroll_sql)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            0
        };

        Ok(ReferenceUsage {
            employees: employees as u64,
            payrolls: payrolls as u64,
        })
    }

    async fn delete_reference(&self, kind: RefKind, id: u64) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?", kind);
        debug!(sql = %sql, id, "Deleting reference record");

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| delete_error(e, kind))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employee ORDER BY id");
        let rows = sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_employee(&self, id: u64) -> AppResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employee WHERE id = ?");
        let row = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_employee(&self, e: &CreateEmployee) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employee
            (id, first_name, surname, date_of_birth, bank_name, bank_account_number,
             department_id, job_id, grade_id, element_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(e.id)
        .bind(e.first_name.trim())
        .bind(e.surname.trim())
        .bind(e.date_of_birth)
        .bind(&e.bank_name)
        .bind(&e.bank_account_number)
        .bind(e.department_id)
        .bind(e.job_id)
        .bind(e.grade_id)
        .bind(e.element_id)
        .execute(&self.pool)
        .await
        .map_err(|err| write_error(err, "Employee id already exists"))?;
        Ok(())
    }

    async fn update_employee_profile(&self, id: u64, update: &ProfileUpdate) -> AppResult<bool> {
        let mut columns = Vec::new();
        if let Some(name) = &update.first_name {
            columns.push(("first_name", SqlValue::String(name.trim().to_string())));
        }
        if let Some(name) = &update.surname {
            columns.push(("surname", SqlValue::String(name.trim().to_string())));
        }
        if let Some(value) = blank_to_null(&update.bank_name) {
            columns.push(("bank_name", value));
        }
        if let Some(value) = blank_to_null(&update.bank_account_number) {
            columns.push(("bank_account_number", value));
        }

        let Some(update) = build_update_sql("employee", columns, "id", id) else {
            return Err(AppError::validation("No fields provided for update"));
        };
        debug!(sql = %update.sql, "Updating employee profile");

        let affected = execute_update(&self.pool, update).await?;
        Ok(affected > 0)
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password, role, employee_id
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn user_exists_for_employee(&self, employee_id: u64) -> AppResult<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn create_user(&self, user: &NewUser) -> AppResult<u64> {
        let result = sqlx::query(
            r#"INSERT INTO users (username, password, role, employee_id) VALUES (?, ?, ?, ?)"#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.kind().to_string())
        .bind(user.role.employee_id())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, "Username or employee account already exists"))?;
        Ok(result.last_insert_id())
    }

    async fn save_refresh_token(&self, user_id: u64, jti: &str, expires_at: i64) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, jti, expires_at)
            VALUES (?, ?, FROM_UNIXTIME(?))
            "#,
        )
        .bind(user_id)
        .bind(jti)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn consume_refresh_token(&self, jti: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE jti = ? AND revoked = FALSE AND expires_at > NOW()
            "#,
        )
        .bind(jti)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn record_payroll_run(&self, period: &Period, rows: &[NewPayroll]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payroll WHERE month = ? AND year = ?",
        )
        .bind(period.month())
        .bind(period.year())
        .fetch_one(&mut *tx)
        .await?;

        if existing > 0 {
            // tx is dropped here and rolled back
            return Err(AppError::conflict(format!(
                "Payroll for {period} has already been generated"
            )));
        }

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO payroll
                (employee_id, grade_id, element_id, month, year,
                 gross_salary, total_deductions, net_pay)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.employee_id)
            .bind(row.grade_id)
            .bind(row.element_id)
            .bind(period.month())
            .bind(period.year())
            .bind(row.gross_salary)
            .bind(row.total_deductions)
            .bind(row.net_pay)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                write_error(e, &format!("Payroll for {period} has already been generated"))
            })?;
        }

        tx.commit().await?;
        info!(period = %period, rows = rows.len(), "Payroll run committed");

        Ok(rows.len() as u64)
    }

    async fn list_payrolls(&self) -> AppResult<Vec<PayrollRecord>> {
        let sql = format!("{PAYROLL_SELECT} {PAYROLL_ORDER}");
        let rows = sqlx::query_as::<_, PayrollRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn payrolls_for_employee(&self, employee_id: u64) -> AppResult<Vec<PayrollRecord>> {
        let sql = format!("{PAYROLL_SELECT} WHERE p.employee_id = ? {PAYROLL_ORDER}");
        let rows = sqlx::query_as::<_, PayrollRecord>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_payroll_for_employee(
        &self,
        payroll_id: u64,
        employee_id: u64,
    ) -> AppResult<Option<PayrollRecord>> {
        let sql = format!("{PAYROLL_SELECT} WHERE p.id = ? AND p.employee_id = ?");
        let row = sqlx::query_as::<_, PayrollRecord>(&sql)
            .bind(payroll_id)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
