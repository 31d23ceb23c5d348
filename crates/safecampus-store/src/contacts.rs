//! CRUD operations for [`Contact`] records.
//!
//! Emergency contacts and helpline numbers share one table. The phone
//! number column is UNIQUE across both kinds, so a duplicate surfaces as
//! [`StoreError::Conflict`] even when two writers race.

use chrono::Utc;
use rusqlite::params;
use safecampus_shared::types::ContactKind;
use safecampus_shared::validation::{validate_contact_name, validate_phone};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{apply, Contact, ContactPatch};
use crate::rows::{collect, not_found, parsed_col, ts_col, ts_to_sql, unique_violation, uuid_col};

/// Message carried by the `Conflict` raised for a duplicate phone number.
pub const DUPLICATE_PHONE: &str = "Contact number must be unique.";

const SELECT: &str = "SELECT id, kind, name, phone, owner_id, created_at FROM contacts";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    pub fn create_contact(
        &self,
        kind: ContactKind,
        name: &str,
        phone: &str,
        owner_id: &str,
    ) -> Result<Contact> {
        validate_contact_name(name)?;
        validate_phone(phone)?;

        let contact = Contact {
            id: Uuid::new_v4(),
            kind,
            name: name.to_string(),
            phone: phone.to_string(),
            owner_id: owner_id.to_string(),
            created_at: Utc::now(),
        };

        self.conn()
            .execute(
                "INSERT INTO contacts (id, kind, name, phone, owner_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    contact.id.to_string(),
                    kind.as_str(),
                    contact.name,
                    contact.phone,
                    contact.owner_id,
                    ts_to_sql(&contact.created_at),
                ],
            )
            .map_err(|e| unique_violation(e, DUPLICATE_PHONE))?;

        tracing::debug!(id = %contact.id, kind = kind.as_str(), "contact created");
        Ok(contact)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_contact(&self, id: Uuid) -> Result<Contact> {
        self.conn()
            .query_row(
                &format!("{SELECT} WHERE id = ?1"),
                params![id.to_string()],
                row_to_contact,
            )
            .map_err(not_found)
    }

    /// Every contact of a kind, oldest first.
    pub fn list_contacts(&self, kind: ContactKind) -> Result<Vec<Contact>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{SELECT} WHERE kind = ?1 ORDER BY created_at ASC"))?;
        let rows = stmt.query_map(params![kind.as_str()], row_to_contact)?;
        collect(rows)
    }

    /// Contacts of a kind owned by `owner_id`. An empty list is not an error.
    pub fn list_contacts_by_owner(&self, kind: ContactKind, owner_id: &str) -> Result<Vec<Contact>> {
        let mut stmt = self.conn().prepare(&format!(
            "{SELECT} WHERE kind = ?1 AND owner_id = ?2 ORDER BY created_at ASC"
        ))?;
        let rows = stmt.query_map(params![kind.as_str(), owner_id], row_to_contact)?;
        collect(rows)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Apply a partial update. The resulting name and phone are re-validated
    /// and the phone must stay unique.
    pub fn update_contact(&self, id: Uuid, patch: ContactPatch) -> Result<Contact> {
        let mut contact = self.get_contact(id)?;
        apply(&mut contact.name, patch.name);
        apply(&mut contact.phone, patch.phone);

        validate_contact_name(&contact.name)?;
        validate_phone(&contact.phone)?;

        let affected = self
            .conn()
            .execute(
                "UPDATE contacts SET name = ?1, phone = ?2 WHERE id = ?3",
                params![contact.name, contact.phone, id.to_string()],
            )
            .map_err(|e| unique_violation(e, DUPLICATE_PHONE))?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(contact)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a contact, returning the removed record.
    pub fn delete_contact(&self, id: Uuid) -> Result<Contact> {
        let contact = self.get_contact(id)?;
        self.conn()
            .execute("DELETE FROM contacts WHERE id = ?1", params![id.to_string()])?;
        Ok(contact)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn row_to_contact(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: uuid_col(row, 0)?,
        kind: parsed_col(row, 1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        owner_id: row.get(4)?,
        created_at: ts_col(row, 5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use safecampus_shared::error::ValidationError;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let db = db();
        let c = db
            .create_contact(ContactKind::Emergency, "Bob", "+19998887777", "student-1")
            .unwrap();
        assert_eq!(db.get_contact(c.id).unwrap(), c);
    }

    #[test]
    fn test_valid_phones_are_accepted() {
        let db = db();
        for (i, phone) in ["9999999999", "+19998887777", "123456789012345"].iter().enumerate() {
            let name = format!("Contact {i}");
            assert!(db
                .create_contact(ContactKind::Emergency, &name, phone, "s")
                .is_ok());
        }
    }

    #[test]
    fn test_invalid_phones_are_rejected() {
        let db = db();
        for phone in ["12345", "phone-number", "+1 999 888 7777", "1234567890123456"] {
            let err = db
                .create_contact(ContactKind::Emergency, "Bob", phone, "s")
                .unwrap_err();
            assert!(
                matches!(err, StoreError::Validation(ValidationError::InvalidPhone { .. })),
                "{phone}: {err:?}"
            );
        }
    }

    #[test]
    fn test_invalid_name_rejected() {
        let db = db();
        let err = db
            .create_contact(ContactKind::Helpline, "Al", "9999999999", "admin")
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::Length { .. })));
    }

    #[test]
    fn test_duplicate_phone_conflicts() {
        let db = db();
        db.create_contact(ContactKind::Emergency, "Bob", "+19998887777", "s1")
            .unwrap();

        let err = db
            .create_contact(ContactKind::Emergency, "Robert", "+19998887777", "s2")
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref m) if m == DUPLICATE_PHONE));

        // Unique across kinds as well.
        let err = db
            .create_contact(ContactKind::Helpline, "Campus Police", "+19998887777", "a1")
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_list_by_owner_and_kind() {
        let db = db();
        db.create_contact(ContactKind::Emergency, "Mum", "1111111111", "s1").unwrap();
        db.create_contact(ContactKind::Emergency, "Dad", "2222222222", "s1").unwrap();
        db.create_contact(ContactKind::Emergency, "Sis", "3333333333", "s2").unwrap();
        db.create_contact(ContactKind::Helpline, "Police", "4444444444", "a1").unwrap();

        assert_eq!(db.list_contacts_by_owner(ContactKind::Emergency, "s1").unwrap().len(), 2);
        assert!(db.list_contacts_by_owner(ContactKind::Emergency, "nobody").unwrap().is_empty());
        assert_eq!(db.list_contacts(ContactKind::Emergency).unwrap().len(), 3);
        assert_eq!(db.list_contacts(ContactKind::Helpline).unwrap().len(), 1);
    }

    #[test]
    fn test_update_partial_and_revalidate() {
        let db = db();
        let c = db
            .create_contact(ContactKind::Emergency, "Bob", "1111111111", "s1")
            .unwrap();
        db.create_contact(ContactKind::Emergency, "Eve", "2222222222", "s1").unwrap();

        let updated = db
            .update_contact(
                c.id,
                ContactPatch {
                    name: Some("Bobby".into()),
                    phone: None,
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Bobby");
        assert_eq!(updated.phone, "1111111111");

        let err = db
            .update_contact(
                c.id,
                ContactPatch {
                    name: None,
                    phone: Some("bad".into()),
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = db
            .update_contact(
                c.id,
                ContactPatch {
                    name: None,
                    phone: Some("2222222222".into()),
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        assert!(matches!(
            db.update_contact(Uuid::new_v4(), ContactPatch::default()),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_delete() {
        let db = db();
        let c = db
            .create_contact(ContactKind::Emergency, "Bob", "1111111111", "s1")
            .unwrap();
        let deleted = db.delete_contact(c.id).unwrap();
        assert_eq!(deleted.id, c.id);
        assert!(matches!(db.get_contact(c.id), Err(StoreError::NotFound)));
        assert!(matches!(db.delete_contact(c.id), Err(StoreError::NotFound)));

        // The phone number is free again.
        assert!(db
            .create_contact(ContactKind::Emergency, "Bob", "1111111111", "s1")
            .is_ok());
    }
}
