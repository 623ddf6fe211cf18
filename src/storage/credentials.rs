// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! Embedded credential store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `accounts`: account id → serialized StoredAccount (JSON bytes)
//! - `email_index`: normalized email → account id (uniqueness boundary)
//! - `counters`: name → u64 (account id sequence)
//!
//! redb serializes writers, so every multi-step mutation below is a single
//! atomic transaction: duplicate-email registration races resolve at the
//! index insert, and confirm-replay races resolve at the version compare in
//! `bump_confirmation` without any in-process locking.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};

use crate::auth::{Role, TransitionError};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: account id → serialized StoredAccount (JSON bytes).
const ACCOUNTS: TableDefinition<u64, &[u8]> = TableDefinition::new("accounts");

/// Unique index: normalized email → account id.
const EMAIL_INDEX: TableDefinition<&str, u64> = TableDefinition::new("email_index");

/// Counters: name → value (currently only the account id sequence).
const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters");

const ACCOUNT_SEQ: &str = "account_seq";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("email already registered")]
    DuplicateEmail,

    #[error("account {0} not found")]
    NotFound(u64),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Account Record
// =============================================================================

/// Account record as persisted in the credential store.
///
/// The password hash never leaves this layer as API output; HTTP response
/// shapes live in `models.rs` and omit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAccount {
    /// Stable id, assigned at creation, immutable
    pub id: u64,
    /// Normalized (lower-cased) email, unique across all accounts
    pub email: String,
    /// Argon2id PHC hash
    pub password_hash: String,
    /// Current role
    pub role: Role,
    /// When email control was proven; None until the link is clicked.
    /// Set exactly once, never cleared.
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Incremented on each successful confirmation; invalidates every
    /// previously issued confirmation token for this account.
    pub token_version: u32,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl StoredAccount {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }
}

// =============================================================================
// CredentialStore
// =============================================================================

/// Embedded ACID credential store.
pub struct CredentialStore {
    db: Database,
}

impl CredentialStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
            let _ = write_txn.open_table(EMAIL_INDEX)?;
            let _ = write_txn.open_table(COUNTERS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Create an account.
    ///
    /// `email` must already be normalized. Uniqueness is enforced by the
    /// email index inside the same write transaction as the insert; there is
    /// no separate existence pre-check to race against.
    pub fn create(&self, email: &str, password_hash: &str, role: Role) -> StoreResult<StoredAccount> {
        let write_txn = self.db.begin_write()?;
        let account = {
            let mut index = write_txn.open_table(EMAIL_INDEX)?;
            if index.get(email)?.is_some() {
                return Err(StoreError::DuplicateEmail);
            }

            let mut counters = write_txn.open_table(COUNTERS)?;
            let id = counters.get(ACCOUNT_SEQ)?.map(|g| g.value()).unwrap_or(0) + 1;
            counters.insert(ACCOUNT_SEQ, id)?;
            index.insert(email, id)?;

            let now = Utc::now();
            let account = StoredAccount {
                id,
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                role,
                confirmed_at: None,
                token_version: 0,
                created_at: now,
                updated_at: now,
            };

            let mut accounts = write_txn.open_table(ACCOUNTS)?;
            accounts.insert(id, serde_json::to_vec(&account)?.as_slice())?;
            account
        };
        write_txn.commit()?;
        Ok(account)
    }

    /// Look up an account by id.
    pub fn find_by_id(&self, id: u64) -> StoreResult<Option<StoredAccount>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up an account by normalized email.
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredAccount>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(EMAIL_INDEX)?;
        let Some(id) = index.get(email)?.map(|g| g.value()) else {
            return Ok(None);
        };
        let table = read_txn.open_table(ACCOUNTS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Mark an account confirmed and advance its token version, conditioned
    /// on `token_version == expected_version`.
    ///
    /// Returns whether the update applied. The compare and the write share
    /// one write transaction, so two confirmations racing on the same token
    /// cannot both increment: exactly one observes the expected version.
    /// `confirmed_at` is only written when currently unset.
    pub fn bump_confirmation(&self, id: u64, expected_version: u32) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let applied = {
            let mut accounts = write_txn.open_table(ACCOUNTS)?;
            let existing = match accounts.get(id)? {
                Some(value) => serde_json::from_slice::<StoredAccount>(value.value())?,
                None => return Ok(false),
            };

            if existing.token_version != expected_version {
                false
            } else {
                let mut account = existing;
                let now = Utc::now();
                if account.confirmed_at.is_none() {
                    account.confirmed_at = Some(now);
                }
                account.token_version += 1;
                account.updated_at = now;
                accounts.insert(id, serde_json::to_vec(&account)?.as_slice())?;
                true
            }
        };
        write_txn.commit()?;
        Ok(applied)
    }

    /// Set an account's role unconditionally.
    pub fn set_role(&self, id: u64, new_role: Role) -> StoreResult<StoredAccount> {
        self.update_role(id, |_| Ok(new_role))
    }

    /// Apply a role-transition function to an account.
    ///
    /// The read, the transition check, and the write share one write
    /// transaction, so concurrent approve/deny calls serialize: the second
    /// caller observes the first caller's result and its transition is
    /// judged against that state.
    pub fn update_role(
        &self,
        id: u64,
        transition: impl FnOnce(Role) -> Result<Role, TransitionError>,
    ) -> StoreResult<StoredAccount> {
        let write_txn = self.db.begin_write()?;
        let account = {
            let mut accounts = write_txn.open_table(ACCOUNTS)?;
            let existing = match accounts.get(id)? {
                Some(value) => serde_json::from_slice::<StoredAccount>(value.value())?,
                None => return Err(StoreError::NotFound(id)),
            };

            let new_role = transition(existing.role)?;
            let mut account = existing;
            if account.role != new_role {
                account.role = new_role;
                account.updated_at = Utc::now();
                accounts.insert(id, serde_json::to_vec(&account)?.as_slice())?;
            }
            account
        };
        write_txn.commit()?;
        Ok(account)
    }

    /// List all accounts with the given role, ordered by id.
    pub fn list_by_role(&self, role: Role) -> StoreResult<Vec<StoredAccount>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;

        let mut accounts = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let account: StoredAccount = serde_json::from_slice(value.value())?;
            if account.role == role {
                accounts.push(account);
            }
        }
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (CredentialStore, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let store = CredentialStore::open(&dir.path().join("credentials.redb")).expect("open");
        (store, dir)
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let (store, _dir) = test_store();
        let a = store.create("a@example.org", "hash-a", Role::Member).unwrap();
        let b = store.create("b@example.org", "hash-b", Role::AdminPending).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.token_version, 0);
        assert!(a.confirmed_at.is_none());
    }

    #[test]
    fn duplicate_email_is_rejected_and_first_account_unaffected() {
        let (store, _dir) = test_store();
        let first = store.create("dup@example.org", "hash-1", Role::Member).unwrap();

        let err = store.create("dup@example.org", "hash-2", Role::Member).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        let reloaded = store.find_by_email("dup@example.org").unwrap().unwrap();
        assert_eq!(reloaded, first);
        // The failed create must not have consumed an id
        let next = store.create("next@example.org", "hash-3", Role::Member).unwrap();
        assert_eq!(next.id, first.id + 1);
    }

    #[test]
    fn find_by_id_and_email_agree() {
        let (store, _dir) = test_store();
        let created = store.create("carol@example.org", "hash", Role::Member).unwrap();

        let by_id = store.find_by_id(created.id).unwrap().unwrap();
        let by_email = store.find_by_email("carol@example.org").unwrap().unwrap();
        assert_eq!(by_id, by_email);

        assert!(store.find_by_id(999).unwrap().is_none());
        assert!(store.find_by_email("missing@example.org").unwrap().is_none());
    }

    #[test]
    fn bump_confirmation_applies_once_per_version() {
        let (store, _dir) = test_store();
        let account = store.create("dave@example.org", "hash", Role::Member).unwrap();

        assert!(store.bump_confirmation(account.id, 0).unwrap());
        let confirmed = store.find_by_id(account.id).unwrap().unwrap();
        assert!(confirmed.is_confirmed());
        assert_eq!(confirmed.token_version, 1);

        // Replay with the consumed version is a no-op
        assert!(!store.bump_confirmation(account.id, 0).unwrap());
        let after = store.find_by_id(account.id).unwrap().unwrap();
        assert_eq!(after.token_version, 1);
        assert_eq!(after.confirmed_at, confirmed.confirmed_at);
    }

    #[test]
    fn bump_confirmation_unknown_account_is_false() {
        let (store, _dir) = test_store();
        assert!(!store.bump_confirmation(42, 0).unwrap());
    }

    #[test]
    fn confirmed_at_is_monotonic() {
        let (store, _dir) = test_store();
        let account = store.create("eve@example.org", "hash", Role::Member).unwrap();

        assert!(store.bump_confirmation(account.id, 0).unwrap());
        let first = store.find_by_id(account.id).unwrap().unwrap();

        // A bump at the current version advances the counter but must not
        // move the confirmation timestamp.
        assert!(store.bump_confirmation(account.id, 1).unwrap());
        let second = store.find_by_id(account.id).unwrap().unwrap();
        assert_eq!(second.confirmed_at, first.confirmed_at);
        assert_eq!(second.token_version, 2);
    }

    #[test]
    fn update_role_applies_transitions_atomically() {
        let (store, _dir) = test_store();
        let account = store
            .create("frank@example.org", "hash", Role::AdminPending)
            .unwrap();

        let approved = store.update_role(account.id, Role::approve).unwrap();
        assert_eq!(approved.role, Role::Admin);

        // Second approve observes the new state and is rejected
        let err = store.update_role(account.id, Role::approve).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidTransition(TransitionError::AlreadyAdmin)
        ));
    }

    #[test]
    fn update_role_unknown_account_is_not_found() {
        let (store, _dir) = test_store();
        let err = store.update_role(7, Role::approve).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(7)));
    }

    #[test]
    fn list_by_role_filters_and_orders() {
        let (store, _dir) = test_store();
        store.create("m1@example.org", "h", Role::Member).unwrap();
        let p1 = store.create("p1@example.org", "h", Role::AdminPending).unwrap();
        let p2 = store.create("p2@example.org", "h", Role::AdminPending).unwrap();

        let pending = store.list_by_role(Role::AdminPending).unwrap();
        assert_eq!(
            pending.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![p1.id, p2.id]
        );
        assert!(store.list_by_role(Role::Admin).unwrap().is_empty());
    }

    #[test]
    fn store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.redb");

        let id = {
            let store = CredentialStore::open(&path).unwrap();
            let account = store.create("grace@example.org", "hash", Role::Member).unwrap();
            assert!(store.bump_confirmation(account.id, 0).unwrap());
            account.id
        };

        let store = CredentialStore::open(&path).unwrap();
        let account = store.find_by_id(id).unwrap().unwrap();
        assert_eq!(account.email, "grace@example.org");
        assert!(account.is_confirmed());
        assert_eq!(account.token_version, 1);
    }
}
