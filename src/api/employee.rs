use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    model::{
        department::Department,
        element::Element,
        employee::{CreateEmployee, Employee, ProfileUpdate},
        grade::Grade,
        job::Job,
    },
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub total: usize,
}

/// Everything the add-employee form offers for selection.
#[derive(Serialize, ToSchema)]
pub struct EmployeeFormOptions {
    pub departments: Vec<Department>,
    pub grades: Vec<Grade>,
    pub jobs: Vec<Job>,
    pub elements: Vec<Element>,
}

/// Admin dashboard
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "All employees", body = EmployeeListResponse),
        (status = 403, description = "Admin only", body = Object, example = json!({
            "message": "Admin only"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_dashboard(
    auth: AuthUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;

    let data = state.store().list_employees().await?;
    debug!(count = data.len(), "Employees loaded");

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        total: data.len(),
        data,
    }))
}

/// Employee dashboard: the caller's own record
#[utoipa::path(
    get,
    path = "/api/employee/dashboard",
    responses(
        (status = 200, description = "Own employee record", body = Employee),
        (status = 404, description = "Employee record missing")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn employee_dashboard(
    auth: AuthUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let employee_id = auth.require_employee()?;

    let employee = state
        .store()
        .find_employee(employee_id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;
    debug!(employee_id, name = %employee.full_name(), "Employee record loaded");

    Ok(HttpResponse::Ok().json(employee))
}

/// Update own profile
#[utoipa::path(
    post,
    path = "/api/employee/update",
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = Object, example = json!({
            "message": "Details updated successfully"
        })),
        (status = 400, description = "Nothing to update or blank value")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<ProfileUpdate>,
) -> AppResult<HttpResponse> {
    let employee_id = auth.require_employee()?;
    payload.validate()?;

    if !state
        .store()
        .update_employee_profile(employee_id, &payload)
        .await?
    {
        return Err(AppError::not_found("Employee not found"));
    }

    info!(employee_id, "Profile updated");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Details updated successfully"
    })))
}

/// Reference lists for the add-employee form
#[utoipa::path(
    get,
    path = "/api/admin/employees/new",
    responses(
        (status = 200, description = "Form options", body = EmployeeFormOptions)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn employee_form(
    auth: AuthUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    let store = state.store();

    Ok(HttpResponse::Ok().json(EmployeeFormOptions {
        departments: store.list_departments().await?,
        grades: store.list_grades().await?,
        jobs: store.list_jobs().await?,
        elements: store.list_elements().await?,
    }))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/admin/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = Object, example = json!({
            "message": "Employee added successfully"
        })),
        (status = 400, description = "Missing field or unknown reference"),
        (status = 409, description = "Employee id already exists")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<CreateEmployee>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;

    state.store().create_employee(&payload).await?;

    info!(employee_id = payload.id, "Employee created");
    Ok(HttpResponse::Created().json(json!({
        "message": "Employee added successfully"
    })))
}
