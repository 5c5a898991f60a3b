use crate::{
    api::{employee, payroll, reference},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg: GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter)
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter)
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/admin")
                    .route("/dashboard", web::get().to(employee::admin_dashboard))
                    // /admin/employees
                    .route("/employees", web::post().to(employee::create_employee))
                    .route("/employees/new", web::get().to(employee::employee_form))
                    // /admin/departments
                    .service(
                        web::resource("/departments")
                            .route(web::get().to(reference::list_departments))
                            .route(web::post().to(reference::create_department)),
                    )
                    .route("/departments/{id}", web::post().to(reference::update_department))
                    .route(
                        "/departments/{id}/delete",
                        web::post().to(reference::delete_department),
                    )
                    // /admin/grades
                    .service(
                        web::resource("/grades")
                            .route(web::get().to(reference::list_grades))
                            .route(web::post().to(reference::create_grade)),
                    )
                    .route("/grades/{id}", web::post().to(reference::update_grade))
                    .route("/grades/{id}/delete", web::post().to(reference::delete_grade))
                    // /admin/jobs
                    .service(
                        web::resource("/jobs")
                            .route(web::get().to(reference::list_jobs))
                            .route(web::post().to(reference::create_job)),
                    )
                    .route("/jobs/{id}", web::post().to(reference::update_job))
                    .route("/jobs/{id}/delete", web::post().to(reference::delete_job))
                    // /admin/elements
                    .service(
                        web::resource("/elements")
                            .route(web::get().to(reference::list_elements))
                            .route(web::post().to(reference::create_element)),
                    )
                    .route("/elements/{id}", web::post().to(reference::update_element))
                    .route(
                        "/elements/{id}/delete",
                        web::post().to(reference::delete_element),
                    )
                    // /admin/payroll
                    .service(
                        web::resource("/payroll/generate")
                            .route(web::get().to(payroll::generate_form))
                            .route(web::post().to(payroll::generate)),
                    )
                    .route("/payroll", web::get().to(payroll::list_payrolls)),
            )
            .service(
                web::scope("/employee")
                    .route("/dashboard", web::get().to(employee::employee_dashboard))
                    .route("/update", web::post().to(employee::update_profile))
                    .route("/payslips", web::get().to(payroll::my_payslips))
                    .route(
                        "/payslips/{id}/download",
                        web::get().to(payroll::download_payslip),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days, single use)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh with refresh_token
//       └─ returns a new access/refresh pair
