//! CRUD operations for [`Incident`] reports.

use chrono::Utc;
use rusqlite::params;
use safecampus_shared::validation::require;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{apply, Incident, IncidentPatch, NewIncident};
use crate::rows::{collect, not_found, ts_col, ts_to_sql, uuid_col};

const SELECT: &str = "SELECT id, description, location, reported_by, incident_date, image_path, created_at
                      FROM incidents";

fn validate(incident: &Incident) -> Result<()> {
    require("Incident description", &incident.description)?;
    require("Incident location", &incident.location)?;
    require("Reported by", &incident.reported_by)?;
    require("Incident image", &incident.image_path)?;
    Ok(())
}

impl Database {
    pub fn insert_incident(&self, new: NewIncident) -> Result<Incident> {
        let incident = Incident {
            id: Uuid::new_v4(),
            description: new.description,
            location: new.location,
            reported_by: new.reported_by,
            incident_date: new.incident_date,
            image_path: new.image_path,
            created_at: Utc::now(),
        };
        validate(&incident)?;

        self.conn().execute(
            "INSERT INTO incidents (id, description, location, reported_by, incident_date, image_path, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                incident.id.to_string(),
                incident.description,
                incident.location,
                incident.reported_by,
                ts_to_sql(&incident.incident_date),
                incident.image_path,
                ts_to_sql(&incident.created_at),
            ],
        )?;

        tracing::debug!(id = %incident.id, reporter = %incident.reported_by, "incident stored");
        Ok(incident)
    }

    pub fn get_incident(&self, id: Uuid) -> Result<Incident> {
        self.conn()
            .query_row(
                &format!("{SELECT} WHERE id = ?1"),
                params![id.to_string()],
                row_to_incident,
            )
            .map_err(not_found)
    }

    /// All incidents, newest first.
    pub fn list_incidents(&self) -> Result<Vec<Incident>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{SELECT} ORDER BY created_at DESC, rowid DESC"))?;
        let rows = stmt.query_map([], row_to_incident)?;
        collect(rows)
    }

    pub fn list_incidents_by_reporter(&self, reported_by: &str) -> Result<Vec<Incident>> {
        let mut stmt = self.conn().prepare(&format!(
            "{SELECT} WHERE reported_by = ?1 ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map(params![reported_by], row_to_incident)?;
        collect(rows)
    }

    /// Apply a partial update; the image path is kept unless a new one is given.
    pub fn update_incident(&self, id: Uuid, patch: IncidentPatch) -> Result<Incident> {
        let mut incident = self.get_incident(id)?;
        apply(&mut incident.description, patch.description);
        apply(&mut incident.location, patch.location);
        apply(&mut incident.incident_date, patch.incident_date);
        apply(&mut incident.image_path, patch.image_path);
        validate(&incident)?;

        let affected = self.conn().execute(
            "UPDATE incidents
             SET description = ?1, location = ?2, incident_date = ?3, image_path = ?4
             WHERE id = ?5",
            params![
                incident.description,
                incident.location,
                ts_to_sql(&incident.incident_date),
                incident.image_path,
                id.to_string(),
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(incident)
    }

    // only removes the db record, the caller owns the image file
    pub fn delete_incident(&self, id: Uuid) -> Result<Incident> {
        let incident = self.get_incident(id)?;
        self.conn()
            .execute("DELETE FROM incidents WHERE id = ?1", params![id.to_string()])?;
        Ok(incident)
    }
}

fn row_to_incident(row: &rusqlite::Row<'_>) -> rusqlite::Result<Incident> {
    Ok(Incident {
        id: uuid_col(row, 0)?,
        description: row.get(1)?,
        location: row.get(2)?,
        reported_by: row.get(3)?,
        incident_date: ts_col(row, 4)?,
        image_path: row.get(5)?,
        created_at: ts_col(row, 6)?,
    })
}
