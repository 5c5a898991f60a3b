use actix_web::{
    HttpResponse,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web,
};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    model::payroll::PayrollRecord,
    payroll::{
        engine::generate_payroll,
        payslip::Payslip,
    },
    state::AppState,
};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct GeneratePayroll {
    #[schema(example = "January")]
    pub month: String,
    #[schema(example = 2026)]
    pub year: i32,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollListResponse {
    pub data: Vec<PayrollRecord>,
    #[schema(example = 12)]
    pub total: usize,
}

impl From<Vec<PayrollRecord>> for PayrollListResponse {
    fn from(data: Vec<PayrollRecord>) -> Self {
        Self {
            total: data.len(),
            data,
        }
    }
}

/// Generation form defaults: the current month name and year
#[utoipa::path(
    get,
    path = "/api/admin/payroll/generate",
    responses(
        (status = 200, description = "Default period", body = GeneratePayroll)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_form(auth: AuthUser) -> AppResult<HttpResponse> {
    auth.require_admin()?;

    let today = Local::now();
    Ok(HttpResponse::Ok().json(GeneratePayroll {
        month: today.format("%B").to_string(),
        year: today.year(),
    }))
}

/// Run payroll for every employee with a grade and an element
#[utoipa::path(
    post,
    path = "/api/admin/payroll/generate",
    request_body = GeneratePayroll,
    responses(
        (status = 201, description = "Payroll generated", body = crate::payroll::engine::RunSummary),
        (status = 400, description = "Invalid month or year"),
        (status = 409, description = "Period already generated")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<GeneratePayroll>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;
    info!(user_id = auth.user_id, username = %auth.username, "Payroll generation requested");

    let summary = generate_payroll(state.store(), &payload.month, payload.year).await?;

    Ok(HttpResponse::Created().json(summary))
}

/// All payroll records, newest period first
#[utoipa::path(
    get,
    path = "/api/admin/payroll",
    responses(
        (status = 200, description = "Payroll records", body = PayrollListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    auth: AuthUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;

    let records = state.store().list_payrolls().await?;
    Ok(HttpResponse::Ok().json(PayrollListResponse::from(records)))
}

/// The caller's own payslips
#[utoipa::path(
    get,
    path = "/api/employee/payslips",
    responses(
        (status = 200, description = "Own payroll records", body = PayrollListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn my_payslips(auth: AuthUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let employee_id = auth.require_employee()?;

    let records = state.store().payrolls_for_employee(employee_id).await?;
    Ok(HttpResponse::Ok().json(PayrollListResponse::from(records)))
}

/// Download one payslip as PDF
#[utoipa::path(
    get,
    path = "/api/employee/payslips/{payroll_id}/download",
    params(
        ("payroll_id", description = "Payroll record ID")
    ),
    responses(
        (status = 200, description = "PDF payslip (application/pdf attachment)"),
        (status = 404, description = "Payslip not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn download_payslip(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    let employee_id = auth.require_employee()?;
    let payroll_id = path.into_inner();

    // someone else's record is reported exactly like a missing one
    let record = state
        .store()
        .find_payroll_for_employee(payroll_id, employee_id)
        .await?
        .ok_or_else(|| AppError::not_found("Payslip not found"))?;

    let payslip = Payslip::from(&record);
    let bytes = payslip.render_pdf()?;

    info!(employee_id, payroll_id, "Payslip downloaded");
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(payslip.file_name())],
        })
        .body(bytes))
}
