use chrono::Utc;
use rusqlite::params;
use safecampus_shared::validation::require;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{apply, Article, ArticlePatch, NewArticle};
use crate::rows::{collect, not_found, ts_col, ts_to_sql, uuid_col};

const SELECT: &str =
    "SELECT id, title, description, image_path, posted_by, created_at FROM articles";

fn validate(article: &Article) -> Result<()> {
    require("Title", &article.title)?;
    require("Description", &article.description)?;
    require("Image", &article.image_path)?;
    require("Posted by", &article.posted_by)?;
    Ok(())
}

impl Database {
    pub fn insert_article(&self, new: NewArticle) -> Result<Article> {
        let article = Article {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            image_path: new.image_path,
            posted_by: new.posted_by,
            created_at: Utc::now(),
        };
        validate(&article)?;

        self.conn().execute(
            "INSERT INTO articles (id, title, description, image_path, posted_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                article.id.to_string(),
                article.title,
                article.description,
                article.image_path,
                article.posted_by,
                ts_to_sql(&article.created_at),
            ],
        )?;
        Ok(article)
    }

    pub fn get_article(&self, id: Uuid) -> Result<Article> {
        self.conn()
            .query_row(
                &format!("{SELECT} WHERE id = ?1"),
                params![id.to_string()],
                row_to_article,
            )
            .map_err(not_found)
    }

    pub fn list_articles(&self) -> Result<Vec<Article>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{SELECT} ORDER BY created_at DESC, rowid DESC"))?;
        let rows = stmt.query_map([], row_to_article)?;
        collect(rows)
    }

    pub fn list_articles_by_poster(&self, posted_by: &str) -> Result<Vec<Article>> {
        let mut stmt = self.conn().prepare(&format!(
            "{SELECT} WHERE posted_by = ?1 ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map(params![posted_by], row_to_article)?;
        collect(rows)
    }

    pub fn update_article(&self, id: Uuid, patch: ArticlePatch) -> Result<Article> {
        let mut article = self.get_article(id)?;
        apply(&mut article.title, patch.title);
        apply(&mut article.description, patch.description);
        apply(&mut article.image_path, patch.image_path);
        validate(&article)?;

        let affected = self.conn().execute(
            "UPDATE articles SET title = ?1, description = ?2, image_path = ?3 WHERE id = ?4",
            params![
                article.title,
                article.description,
                article.image_path,
                id.to_string()
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(article)
    }

    pub fn delete_article(&self, id: Uuid) -> Result<Article> {
        let article = self.get_article(id)?;
        self.conn()
            .execute("DELETE FROM articles WHERE id = ?1", params![id.to_string()])?;
        Ok(article)
    }
}

fn row_to_article(row: &rusqlite::Row<'_>) -> rusqlite::Result<Article> {
    Ok(Article {
        id: uuid_col(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        image_path: row.get(3)?,
        posted_by: row.get(4)?,
        created_at: ts_col(row, 5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_article(title: &str) -> NewArticle {
        NewArticle {
            title: title.into(),
            description: "Walk in pairs after dark.".into(),
            image_path: "uploads/1700000000000.jpg".into(),
            posted_by: "admin-1".into(),
        }
    }

    #[test]
    fn test_article_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_article(new_article("Night safety")).unwrap();
        assert_eq!(db.get_article(a.id).unwrap(), a);
        assert_eq!(db.list_articles_by_poster("admin-1").unwrap().len(), 1);
        assert!(db.list_articles_by_poster("admin-2").unwrap().is_empty());

        let updated = db
            .update_article(
                a.id,
                ArticlePatch {
                    title: Some("Night safety tips".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Night safety tips");
        assert_eq!(updated.image_path, a.image_path);

        db.delete_article(a.id).unwrap();
        assert!(matches!(db.get_article(a.id), Err(StoreError::NotFound)));
    }

    #[test]
    fn test_blank_title_rejected_on_update() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_article(new_article("Night safety")).unwrap();
        let err = db
            .update_article(
                a.id,
                ArticlePatch {
                    title: Some("  ".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(db.get_article(a.id).unwrap().title, "Night safety");
    }
}
