use crate::api::employee::{EmployeeFormOptions, EmployeeListResponse};
use crate::api::payroll::{GeneratePayroll, PayrollListResponse};
use crate::model::{
    department::{Department, DepartmentForm},
    element::{Element, ElementAmounts},
    employee::{CreateEmployee, Employee, ProfileUpdate},
    grade::{Grade, GradeForm},
    job::{Job, JobForm},
    payroll::PayrollRecord,
};
use crate::payroll::engine::RunSummary;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll API",
        version = "1.0.0",
        description = r#"
## Payroll record keeping

Keeps an employee directory with pay grades and pay elements, generates
monthly payroll records and serves payslips.

### 🔹 Key Features
- **Employee Management**
  - Add employees, employee self-service profile updates
- **Reference Data**
  - Departments, grades, jobs and pay elements
- **Payroll**
  - One run per period, payslip PDF download

### 🔐 Security
Protected endpoints use **JWT Bearer authentication**.
Admin routes live under `/admin`, employee routes under `/employee`.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::admin_dashboard,
        crate::api::employee::employee_dashboard,
        crate::api::employee::update_profile,
        crate::api::employee::employee_form,
        crate::api::employee::create_employee,

        crate::api::reference::list_departments,
        crate::api::reference::create_department,
        crate::api::reference::update_department,
        crate::api::reference::delete_department,
        crate::api::reference::list_grades,
        crate::api::reference::create_grade,
        crate::api::reference::update_grade,
        crate::api::reference::delete_grade,
        crate::api::reference::list_jobs,
        crate::api::reference::create_job,
        crate::api::reference::update_job,
        crate::api::reference::delete_job,
        crate::api::reference::list_elements,
        crate::api::reference::create_element,
        crate::api::reference::update_element,
        crate::api::reference::delete_element,

        crate::api::payroll::generate_form,
        crate::api::payroll::generate,
        crate::api::payroll::list_payrolls,
        crate::api::payroll::my_payslips,
        crate::api::payroll::download_payslip
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            ProfileUpdate,
            EmployeeListResponse,
            EmployeeFormOptions,
            Department,
            DepartmentForm,
            Grade,
            GradeForm,
            Job,
            JobForm,
            Element,
            ElementAmounts,
            PayrollRecord,
            PayrollListResponse,
            GeneratePayroll,
            RunSummary
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Employee", description = "Employee directory and self-service APIs"),
        (name = "Reference", description = "Department, grade, job and element APIs"),
        (name = "Payroll", description = "Payroll generation and payslip APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
