//! Admin maintenance of the reference tables: departments, grades, jobs
//! and pay elements.
//!
//! Deletes are restricted. A record still linked from an employee (or, for
//! grades and elements, from a payroll record) answers 409 and is kept.

use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::info;

use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    model::{
        department::DepartmentForm, element::ElementAmounts, grade::GradeForm, job::JobForm,
    },
    state::AppState,
    store::{RefKind, Repository},
};

fn created(kind: RefKind, id: u64) -> HttpResponse {
    info!(%kind, id, "Reference record created");
    HttpResponse::Created().json(json!({ "id": id }))
}

fn updated(kind: RefKind, id: u64, found: bool) -> AppResult<HttpResponse> {
    if !found {
        return Err(AppError::not_found(format!("{kind} {id} not found")));
    }
    info!(%kind, id, "Reference record updated");
    Ok(HttpResponse::Ok().json(json!({ "id": id })))
}

/// Deletes an unreferenced record; Conflict while anything still points at it.
pub(crate) async fn delete_reference(
    store: &dyn Repository,
    kind: RefKind,
    id: u64,
) -> AppResult<HttpResponse> {
    let usage = store.reference_usage(kind, id).await?;
    if !usage.is_unused() {
        info!(%kind, id, employees = usage.employees, payrolls = usage.payrolls, "Delete refused");
        return Err(AppError::conflict(format!(
            "Cannot delete {kind} {id}: used by {} employee(s) and {} payroll record(s)",
            usage.employees, usage.payrolls
        )));
    }

    if !store.delete_reference(kind, id).await? {
        return Err(AppError::not_found(format!("{kind} {id} not found")));
    }

    info!(%kind, id, "Reference record deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("{kind} deleted successfully")
    })))
}

// -------------------- departments --------------------

#[utoipa::path(
    get,
    path = "/api/admin/departments",
    responses(
        (status = 200, description = "Departments by name", body = Vec<crate::model::department::Department>)
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn list_departments(
    auth: AuthUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(state.store().list_departments().await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/departments",
    request_body = DepartmentForm,
    responses(
        (status = 201, description = "Department created"),
        (status = 409, description = "Name already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn create_department(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<DepartmentForm>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;
    let id = state.store().create_department(&payload).await?;
    Ok(created(RefKind::Department, id))
}

#[utoipa::path(
    post,
    path = "/api/admin/departments/{id}",
    request_body = DepartmentForm,
    params(("id", description = "Department ID")),
    responses(
        (status = 200, description = "Department updated"),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn update_department(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<DepartmentForm>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;
    let id = path.into_inner();
    let found = state.store().update_department(id, &payload).await?;
    updated(RefKind::Department, id, found)
}

#[utoipa::path(
    post,
    path = "/api/admin/departments/{id}/delete",
    params(("id", description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted"),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Department still assigned to employees")
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn delete_department(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    delete_reference(state.store(), RefKind::Department, path.into_inner()).await
}

// -------------------- grades --------------------

#[utoipa::path(
    get,
    path = "/api/admin/grades",
    responses(
        (status = 200, description = "Grades by name", body = Vec<crate::model::grade::Grade>)
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn list_grades(auth: AuthUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(state.store().list_grades().await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/grades",
    request_body = GradeForm,
    responses(
        (status = 201, description = "Grade created"),
        (status = 400, description = "Blank name or negative salary"),
        (status = 409, description = "Name already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn create_grade(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<GradeForm>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;
    let id = state.store().create_grade(&payload).await?;
    Ok(created(RefKind::Grade, id))
}

#[utoipa::path(
    post,
    path = "/api/admin/grades/{id}",
    request_body = GradeForm,
    params(("id", description = "Grade ID")),
    responses(
        (status = 200, description = "Grade updated"),
        (status = 404, description = "Grade not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn update_grade(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<GradeForm>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;
    let id = path.into_inner();
    let found = state.store().update_grade(id, &payload).await?;
    updated(RefKind::Grade, id, found)
}

#[utoipa::path(
    post,
    path = "/api/admin/grades/{id}/delete",
    params(("id", description = "Grade ID")),
    responses(
        (status = 200, description = "Grade deleted"),
        (status = 404, description = "Grade not found"),
        (status = 409, description = "Grade used by employees or payroll records")
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn delete_grade(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    delete_reference(state.store(), RefKind::Grade, path.into_inner()).await
}

// -------------------- jobs --------------------

#[utoipa::path(
    get,
    path = "/api/admin/jobs",
    responses(
        (status = 200, description = "Jobs by name", body = Vec<crate::model::job::Job>)
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn list_jobs(auth: AuthUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(state.store().list_jobs().await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/jobs",
    request_body = JobForm,
    responses((status = 201, description = "Job created")),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn create_job(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<JobForm>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;
    let id = state.store().create_job(&payload).await?;
    Ok(created(RefKind::Job, id))
}

#[utoipa::path(
    post,
    path = "/api/admin/jobs/{id}",
    request_body = JobForm,
    params(("id", description = "Job ID")),
    responses(
        (status = 200, description = "Job updated"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn update_job(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<JobForm>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;
    let id = path.into_inner();
    let found = state.store().update_job(id, &payload).await?;
    updated(RefKind::Job, id, found)
}

#[utoipa::path(
    post,
    path = "/api/admin/jobs/{id}/delete",
    params(("id", description = "Job ID")),
    responses(
        (status = 200, description = "Job deleted"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Job still assigned to employees")
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn delete_job(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    delete_reference(state.store(), RefKind::Job, path.into_inner()).await
}

// -------------------- elements --------------------

#[utoipa::path(
    get,
    path = "/api/admin/elements",
    responses(
        (status = 200, description = "Pay elements", body = Vec<crate::model::element::Element>)
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn list_elements(
    auth: AuthUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(state.store().list_elements().await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/elements",
    request_body = ElementAmounts,
    responses(
        (status = 201, description = "Element created"),
        (status = 400, description = "Negative amount")
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn create_element(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<ElementAmounts>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;
    let id = state.store().create_element(&payload).await?;
    Ok(created(RefKind::Element, id))
}

#[utoipa::path(
    post,
    path = "/api/admin/elements/{id}",
    request_body = ElementAmounts,
    params(("id", description = "Element ID")),
    responses(
        (status = 200, description = "Element updated"),
        (status = 404, description = "Element not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn update_element(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<ElementAmounts>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    payload.validate()?;
    let id = path.into_inner();
    let found = state.store().update_element(id, &payload).await?;
    updated(RefKind::Element, id, found)
}

#[utoipa::path(
    post,
    path = "/api/admin/elements/{id}/delete",
    params(("id", description = "Element ID")),
    responses(
        (status = 200, description = "Element deleted"),
        (status = 404, description = "Element not found"),
        (status = 409, description = "Element used by employees or payroll records")
    ),
    security(("bearer_auth" = [])),
    tag = "Reference"
)]
pub async fn delete_element(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    delete_reference(state.store(), RefKind::Element, path.into_inner()).await
}
