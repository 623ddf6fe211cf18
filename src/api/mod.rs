// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::Role,
    models::{
        AckResponse, LoginRequest, LoginResponse, MeResponse, PendingAccount, RegisterRequest,
        RegisterResponse, ResendConfirmationRequest, UserView,
    },
    state::AppState,
};

pub mod admin;
pub mod auth;
pub mod health;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/confirm/{token}", get(auth::confirm_email))
        .route("/auth/login", post(auth::login))
        .route("/auth/resend-confirmation", post(auth::resend_confirmation))
        .route("/auth/me", get(auth::me))
        .route("/admin/pending", get(admin::pending_accounts))
        .route("/admin/approve/{id}", post(admin::approve_account))
        .route("/admin/deny/{id}", post(admin::deny_account))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::confirm_email,
        auth::login,
        auth::resend_confirmation,
        auth::me,
        admin::pending_accounts,
        admin::approve_account,
        admin::deny_account,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            Role,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            MeResponse,
            UserView,
            ResendConfirmationRequest,
            AckResponse,
            PendingAccount
        )
    ),
    tags(
        (name = "Auth", description = "Registration, confirmation and login"),
        (name = "Admin", description = "Admin-approval workflow"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;
