use chrono::Utc;
use rusqlite::params;
use safecampus_shared::validation::require;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{apply, NewPost, Post, PostPatch};
use crate::rows::{collect, not_found, ts_col, ts_to_sql, uuid_col};

const SELECT: &str =
    "SELECT id, description, media_path, author_id, author_name, created_at FROM posts";

fn validate(post: &Post) -> Result<()> {
    require("Description", &post.description)?;
    require("Media", &post.media_path)?;
    require("Author", &post.author_id)?;
    Ok(())
}

impl Database {
    pub fn insert_post(&self, new: NewPost) -> Result<Post> {
        let post = Post {
            id: Uuid::new_v4(),
            description: new.description,
            media_path: new.media_path,
            author_id: new.author_id,
            author_name: new.author_name,
            created_at: Utc::now(),
        };
        validate(&post)?;

        self.conn().execute(
            "INSERT INTO posts (id, description, media_path, author_id, author_name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                post.id.to_string(),
                post.description,
                post.media_path,
                post.author_id,
                post.author_name,
                ts_to_sql(&post.created_at),
            ],
        )?;
        Ok(post)
    }

    pub fn get_post(&self, id: Uuid) -> Result<Post> {
        self.conn()
            .query_row(
                &format!("{SELECT} WHERE id = ?1"),
                params![id.to_string()],
                row_to_post,
            )
            .map_err(not_found)
    }

    pub fn list_posts(&self) -> Result<Vec<Post>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{SELECT} ORDER BY created_at DESC, rowid DESC"))?;
        let rows = stmt.query_map([], row_to_post)?;
        collect(rows)
    }

    pub fn list_posts_by_author(&self, author_id: &str) -> Result<Vec<Post>> {
        let mut stmt = self.conn().prepare(&format!(
            "{SELECT} WHERE author_id = ?1 ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map(params![author_id], row_to_post)?;
        collect(rows)
    }

    pub fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<Post> {
        let mut post = self.get_post(id)?;
        apply(&mut post.description, patch.description);
        apply(&mut post.media_path, patch.media_path);
        validate(&post)?;

        let affected = self.conn().execute(
            "UPDATE posts SET description = ?1, media_path = ?2 WHERE id = ?3",
            params![post.description, post.media_path, id.to_string()],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(post)
    }

    pub fn delete_post(&self, id: Uuid) -> Result<Post> {
        let post = self.get_post(id)?;
        self.conn()
            .execute("DELETE FROM posts WHERE id = ?1", params![id.to_string()])?;
        Ok(post)
    }
}

fn row_to_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: uuid_col(row, 0)?,
        description: row.get(1)?,
        media_path: row.get(2)?,
        author_id: row.get(3)?,
        author_name: row.get(4)?,
        created_at: ts_col(row, 5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(author: &str, media: &str) -> NewPost {
        NewPost {
            description: "Self-defence workshop on Friday".into(),
            media_path: media.into(),
            author_id: author.into(),
            author_name: "Alice".into(),
        }
    }

    #[test]
    fn test_insert_list_update_delete() {
        let db = Database::open_in_memory().unwrap();
        let p = db.insert_post(new_post("s1", "uploads/1-flyer.png")).unwrap();
        db.insert_post(new_post("s2", "uploads/2-flyer.png")).unwrap();

        assert_eq!(db.list_posts().unwrap().len(), 2);
        let mine = db.list_posts_by_author("s1").unwrap();
        assert_eq!(mine, vec![p.clone()]);
        assert_eq!(mine[0].author_name, "Alice");

        let updated = db
            .update_post(
                p.id,
                PostPatch {
                    description: Some("Moved to Saturday".into()),
                    media_path: None,
                },
            )
            .unwrap();
        assert_eq!(updated.media_path, "uploads/1-flyer.png");

        db.delete_post(p.id).unwrap();
        assert!(db.list_posts_by_author("s1").unwrap().is_empty());
    }

    #[test]
    fn test_missing_media_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.insert_post(new_post("s1", "")),
            Err(StoreError::Validation(_))
        ));
    }
}
