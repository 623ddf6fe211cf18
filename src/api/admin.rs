// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! Admin endpoints for the approval workflow.
//!
//! All routes require a live Admin role (re-read from the store on every
//! request). The approval state machine itself lives in `auth::roles`; the
//! store applies it atomically so concurrent approve/deny calls serialize.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::{AdminOnly, Role},
    error::ApiError,
    models::{AckResponse, PendingAccount},
    state::AppState,
};

/// List accounts awaiting admin approval.
#[utoipa::path(
    get,
    path = "/admin/pending",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Pending admin applicants", body = [PendingAccount]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "No pending applicants"),
    )
)]
pub async fn pending_accounts(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<PendingAccount>>, ApiError> {
    let pending = state.store.list_by_role(Role::AdminPending)?;
    if pending.is_empty() {
        return Err(ApiError::not_found("No pending users."));
    }

    Ok(Json(pending.iter().map(PendingAccount::from).collect()))
}

/// Approve an admin application (`admin_pending -> admin`).
#[utoipa::path(
    post,
    path = "/admin/approve/{id}",
    tag = "Admin",
    params(("id" = u64, Path, description = "Account id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Application approved", body = AckResponse),
        (status = 400, description = "Account is not a pending applicant"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "Unknown account"),
    )
)]
pub async fn approve_account(
    AdminOnly(admin): AdminOnly,
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<AckResponse>, ApiError> {
    let account = state.store.update_role(id, Role::approve)?;
    tracing::info!(
        admin_id = admin.account_id,
        account_id = account.id,
        "admin application approved"
    );

    Ok(Json(AckResponse {
        message: "User approved.".to_string(),
    }))
}

/// Deny an admin application (`admin_pending -> member`).
#[utoipa::path(
    post,
    path = "/admin/deny/{id}",
    tag = "Admin",
    params(("id" = u64, Path, description = "Account id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Application denied", body = AckResponse),
        (status = 400, description = "Account is not a pending applicant"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "Unknown account"),
    )
)]
pub async fn deny_account(
    AdminOnly(admin): AdminOnly,
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<AckResponse>, ApiError> {
    let account = state.store.update_role(id, Role::deny)?;
    tracing::info!(
        admin_id = admin.account_id,
        account_id = account.id,
        "admin application denied"
    );

    Ok(Json(AckResponse {
        message: "User denied.".to_string(),
    }))
}
