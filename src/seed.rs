//! Demo bootstrap data, enabled with `SEED_DEMO_DATA=true`.

use rust_decimal::Decimal;
use tracing::info;

use crate::auth::password::hash_password;
use crate::error::AppResult;
use crate::model::{
    department::DepartmentForm,
    element::ElementAmounts,
    employee::CreateEmployee,
    grade::GradeForm,
    job::JobForm,
    role::Role,
    user::NewUser,
};
use crate::store::Repository;

pub const DEMO_EMPLOYEE_ID: u64 = 1001;

/// Creates one department, grade, job, element and employee plus an admin
/// and an employee account. Returns false when the demo employee already
/// exists and nothing was written.
pub async fn bootstrap(
    store: &dyn Repository,
    admin_password: &str,
    employee_password: &str,
) -> AppResult<bool> {
    if store.find_employee(DEMO_EMPLOYEE_ID).await?.is_some() {
        info!("Seed data already present");
        return Ok(false);
    }

    let department_id = store
        .create_department(&DepartmentForm {
            name: "Engineering".into(),
        })
        .await?;
    let grade_id = store
        .create_grade(&GradeForm {
            name: "G1".into(),
            salary: Decimal::new(5000_00, 2),
        })
        .await?;
    let job_id = store
        .create_job(&JobForm {
            name: "Developer".into(),
            description: Some("Writes code".into()),
        })
        .await?;
    let element_id = store
        .create_element(&ElementAmounts {
            transport_allowance: Decimal::new(300_00, 2),
            utility_allowance: Decimal::new(100_00, 2),
            extra_duty_allowance: Decimal::new(50_00, 2),
            other_allowance: Decimal::new(0, 2),
            overtime: Decimal::new(0, 2),
            social_security_deduction: Decimal::new(200_00, 2),
            tax_deduction: Decimal::new(150_00, 2),
            loan1_deduction: Decimal::new(0, 2),
            loan2_deduction: Decimal::new(0, 2),
            other_deductions: Decimal::new(0, 2),
        })
        .await?;

    store
        .create_employee(&CreateEmployee {
            id: DEMO_EMPLOYEE_ID,
            first_name: "John".into(),
            surname: "Doe".into(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 1, 1),
            bank_name: Some("ABC Bank".into()),
            bank_account_number: Some("123456789".into()),
            department_id: Some(department_id),
            job_id: Some(job_id),
            grade_id: Some(grade_id),
            element_id: Some(element_id),
        })
        .await?;

    store
        .create_user(&NewUser {
            username: "admin".into(),
            password_hash: hash_password(admin_password)?,
            role: Role::Admin,
        })
        .await?;
    store
        .create_user(&NewUser {
            username: "johndoe".into(),
            password_hash: hash_password(employee_password)?,
            role: Role::Employee {
                employee_id: DEMO_EMPLOYEE_ID,
            },
        })
        .await?;

    info!(employee_id = DEMO_EMPLOYEE_ID, "Seeded admin and employee accounts");
    Ok(true)
}
