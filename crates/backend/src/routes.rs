use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers;
use crate::system;
use crate::system::auth::middleware::{require_admin, require_auth};

/// Largest accepted document upload
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}

/// Login, token refresh and user management
fn system_routes() -> Router {
    Router::new()
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        .route(
            "/api/system/auth/refresh",
            post(system::handlers::auth::refresh),
        )
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout),
        )
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user).layer(middleware::from_fn(require_auth)),
        )
        // User management (admin only)
        .route(
            "/api/system/users",
            get(system::handlers::users::list)
                .post(system::handlers::users::create)
                .layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/api/system/users/:id",
            get(system::handlers::users::get_by_id)
                .put(system::handlers::users::update)
                .delete(system::handlers::users::delete)
                .layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/api/system/users/:id/change-password",
            post(system::handlers::users::change_password)
                .layer(middleware::from_fn(require_auth)),
        )
}

/// Records, dashboards and integrations for signed-in users
fn business_routes() -> Router {
    Router::new()
        // A001 Customer
        .route(
            "/api/customer",
            get(handlers::a001_customer::list_all).post(handlers::a001_customer::upsert),
        )
        .route(
            "/api/customer/:id",
            get(handlers::a001_customer::get_by_id).delete(handlers::a001_customer::delete),
        )
        .route(
            "/api/customer/:id/branches",
            get(handlers::a001_customer::list_branches),
        )
        // A002 Branch
        .route(
            "/api/branch",
            get(handlers::a002_branch::list_all).post(handlers::a002_branch::upsert),
        )
        .route(
            "/api/branch/:id",
            get(handlers::a002_branch::get_by_id).delete(handlers::a002_branch::delete),
        )
        // A003 Operator
        .route(
            "/api/operator",
            get(handlers::a003_operator::list_all).post(handlers::a003_operator::upsert),
        )
        .route(
            "/api/operator/:id",
            get(handlers::a003_operator::get_by_id).delete(handlers::a003_operator::delete),
        )
        // A004 Visit
        .route(
            "/api/visit",
            get(handlers::a004_visit::list).post(handlers::a004_visit::upsert),
        )
        .route(
            "/api/visit/:id",
            get(handlers::a004_visit::get_by_id).delete(handlers::a004_visit::delete),
        )
        .route("/api/visit/:id/complete", post(handlers::a004_visit::complete))
        .route("/api/visit/:id/cancel", post(handlers::a004_visit::cancel))
        .route(
            "/api/visit/:id/material_sales",
            get(handlers::a004_visit::list_material_sales),
        )
        // A005 Product
        .route(
            "/api/product",
            get(handlers::a005_product::list_all).post(handlers::a005_product::upsert),
        )
        .route(
            "/api/product/:id",
            get(handlers::a005_product::get_by_id).delete(handlers::a005_product::delete),
        )
        // A006 Paid material sale
        .route(
            "/api/material_sale",
            get(handlers::a006_material_sale::list_all).post(handlers::a006_material_sale::upsert),
        )
        .route(
            "/api/material_sale/:id",
            get(handlers::a006_material_sale::get_by_id)
                .delete(handlers::a006_material_sale::delete),
        )
        // A007 Document
        .route(
            "/api/document",
            get(handlers::a007_document::list_all).post(handlers::a007_document::update),
        )
        .route(
            "/api/document/upload",
            post(handlers::a007_document::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/document/:id",
            get(handlers::a007_document::get_by_id).delete(handlers::a007_document::delete),
        )
        .route(
            "/api/document/:id/password",
            put(handlers::a007_document::set_password),
        )
        .route(
            "/api/document/:id/signed_url",
            post(handlers::a007_document::signed_url),
        )
        // A008 Weekly km
        .route(
            "/api/weekly_km",
            get(handlers::a008_weekly_km::list_all).post(handlers::a008_weekly_km::upsert),
        )
        .route(
            "/api/weekly_km/:id",
            get(handlers::a008_weekly_km::get_by_id).delete(handlers::a008_weekly_km::delete),
        )
        // A009 Corrective action
        .route(
            "/api/corrective_action",
            get(handlers::a009_corrective_action::list_all)
                .post(handlers::a009_corrective_action::upsert),
        )
        .route(
            "/api/corrective_action/:id",
            get(handlers::a009_corrective_action::get_by_id)
                .delete(handlers::a009_corrective_action::delete),
        )
        // Dashboards
        .route(
            "/api/d400/operator_performance",
            get(handlers::d400_operator_performance::get_operator_performance),
        )
        .route(
            "/api/d401/weekly_km",
            get(handlers::d401_weekly_km::get_weekly_km),
        )
        // Integrations
        .route("/api/maps/places", get(handlers::maps::search_places))
        .route("/api/maps/route", post(handlers::maps::optimize_route))
        .route(
            "/api/locations",
            get(handlers::locations::snapshot).post(handlers::locations::publish),
        )
        .route("/api/locations/stream", get(handlers::locations::stream))
        .route_layer(middleware::from_fn(require_auth))
}

fn admin_routes() -> Router {
    Router::new()
        .route("/api/admin/email", post(handlers::email::send))
        .route(
            "/api/corrective_action/:id/checked",
            post(handlers::a009_corrective_action::set_checked),
        )
        .route_layer(middleware::from_fn(require_admin))
}

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // Visibility, password and signed-link rules are checked in the handler
        .route(
            "/api/document/:id/download",
            get(handlers::a007_document::download),
        )
        .merge(system_routes())
        .merge(business_routes())
        .merge(admin_routes())
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors())
}
