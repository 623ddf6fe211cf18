// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! # Credential Storage Module
//!
//! Persistent account storage on an embedded redb database under `DATA_DIR`.
//! The store is the sole shared mutable resource of the service and the sole
//! source of truth for roles and confirmation state; both token kinds are
//! derived values that are checked against it, never stored in it.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   credentials.redb   # accounts, email index, id sequence
//! ```

pub mod credentials;

pub use credentials::{CredentialStore, StoreError, StoreResult, StoredAccount};
