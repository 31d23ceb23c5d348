//! CRUD operations for student and admin [`Account`] records.
//!
//! The two kinds live in separate tables. Every helper takes the
//! [`PrincipalKind`] that selects the table.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use safecampus_shared::types::PrincipalKind;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Account, AccountRecord, NewAccount};
use crate::rows::{collect, not_found, ts_col, ts_to_sql, unique_violation, uuid_col};

fn table(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::Student => "students",
        PrincipalKind::Admin => "admins",
    }
}

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new account. Fails with `Conflict` when the email is taken
    /// for this kind.
    pub fn insert_account(&self, kind: PrincipalKind, new: &NewAccount) -> Result<Account> {
        let account = Account {
            id: Uuid::new_v4(),
            kind,
            name: new.name.clone(),
            email: new.email.clone(),
            mobile: new.mobile.clone(),
            created_at: Utc::now(),
        };

        self.conn()
            .execute(
                &format!(
                    "INSERT INTO {} (id, name, email, mobile, password_hash, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    table(kind)
                ),
                params![
                    account.id.to_string(),
                    account.name,
                    account.email,
                    account.mobile,
                    new.password_hash,
                    ts_to_sql(&account.created_at),
                ],
            )
            .map_err(|e| unique_violation(e, &format!("{} already exists", kind.label())))?;

        Ok(account)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_account(&self, kind: PrincipalKind, id: Uuid) -> Result<Account> {
        self.conn()
            .query_row(
                &format!(
                    "SELECT id, name, email, mobile, password_hash, created_at
                     FROM {} WHERE id = ?1",
                    table(kind)
                ),
                params![id.to_string()],
                |row| row_to_record(row, kind),
            )
            .map(|record| record.account)
            .map_err(not_found)
    }

    /// Look up an account (with its hash) by email, for login.
    pub fn find_account_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> Result<Option<AccountRecord>> {
        let record = self
            .conn()
            .query_row(
                &format!(
                    "SELECT id, name, email, mobile, password_hash, created_at
                     FROM {} WHERE email = ?1",
                    table(kind)
                ),
                params![email],
                |row| row_to_record(row, kind),
            )
            .optional()?;
        Ok(record)
    }

    /// List every account of a kind, oldest first.
    pub fn list_accounts(&self, kind: PrincipalKind) -> Result<Vec<Account>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT id, name, email, mobile, password_hash, created_at
             FROM {}
             ORDER BY created_at ASC",
            table(kind)
        ))?;

        let rows = stmt.query_map([], |row| row_to_record(row, kind).map(|r| r.account))?;
        collect(rows)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Overwrite name and mobile, returning the updated account.
    pub fn update_account(
        &self,
        kind: PrincipalKind,
        id: Uuid,
        name: &str,
        mobile: &str,
    ) -> Result<Account> {
        let affected = self.conn().execute(
            &format!("UPDATE {} SET name = ?1, mobile = ?2 WHERE id = ?3", table(kind)),
            params![name, mobile, id.to_string()],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_account(kind, id)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn row_to_record(row: &rusqlite::Row<'_>, kind: PrincipalKind) -> rusqlite::Result<AccountRecord> {
    Ok(AccountRecord {
        account: Account {
            id: uuid_col(row, 0)?,
            kind,
            name: row.get(1)?,
            email: row.get(2)?,
            mobile: row.get(3)?,
            created_at: ts_col(row, 5)?,
        },
        password_hash: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            name: "Alice".into(),
            email: email.into(),
            mobile: "9999999999".into(),
            password_hash: "$argon2id$fake".into(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = Database::open_in_memory().unwrap();
        let created = db
            .insert_account(PrincipalKind::Student, &new_account("a@x.com"))
            .unwrap();

        let fetched = db.get_account(PrincipalKind::Student, created.id).unwrap();
        assert_eq!(fetched, created);

        // Not visible as an admin.
        assert!(matches!(
            db.get_account(PrincipalKind::Admin, created.id),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_duplicate_email_per_kind() {
        let db = Database::open_in_memory().unwrap();
        db.insert_account(PrincipalKind::Student, &new_account("a@x.com"))
            .unwrap();

        let err = db
            .insert_account(PrincipalKind::Student, &new_account("a@x.com"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref m) if m == "Student already exists"));

        // Same email as an admin is a different account.
        assert!(db
            .insert_account(PrincipalKind::Admin, &new_account("a@x.com"))
            .is_ok());
    }

    #[test]
    fn test_find_by_email_returns_hash() {
        let db = Database::open_in_memory().unwrap();
        db.insert_account(PrincipalKind::Admin, &new_account("admin@x.com"))
            .unwrap();

        let record = db
            .find_account_by_email(PrincipalKind::Admin, "admin@x.com")
            .unwrap()
            .unwrap();
        assert_eq!(record.password_hash, "$argon2id$fake");
        assert!(db
            .find_account_by_email(PrincipalKind::Student, "admin@x.com")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_update_and_list() {
        let db = Database::open_in_memory().unwrap();
        let a = db
            .insert_account(PrincipalKind::Student, &new_account("a@x.com"))
            .unwrap();
        db.insert_account(PrincipalKind::Student, &new_account("b@x.com"))
            .unwrap();

        let updated = db
            .update_account(PrincipalKind::Student, a.id, "Alicia", "+15551234567")
            .unwrap();
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.mobile, "+15551234567");
        assert_eq!(updated.email, "a@x.com");

        assert_eq!(db.list_accounts(PrincipalKind::Student).unwrap().len(), 2);
        assert!(db.list_accounts(PrincipalKind::Admin).unwrap().is_empty());

        assert!(matches!(
            db.update_account(PrincipalKind::Student, Uuid::new_v4(), "x", "y"),
            Err(StoreError::NotFound)
        ));
    }
}
