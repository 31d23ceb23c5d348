//! Collects a multipart form into text fields plus at most one file part.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::ServerError;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl UploadForm {
    /// Drain `multipart`. The part named `file_field` becomes the file; every
    /// other part is read as UTF-8 text. A zero-byte file part counts as no
    /// file at all (browsers send one for an empty file input).
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, ServerError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == file_field {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    form.file = Some(UploadedFile {
                        file_name,
                        data: data.to_vec(),
                    });
                }
            } else if !name.is_empty() {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A text field, trimmed; blank values read as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn required(&self, name: &str, label: &str) -> Result<String, ServerError> {
        self.text(name)
            .ok_or_else(|| ServerError::BadRequest(format!("{label} is required")))
    }

    pub fn take_file(&mut self) -> Option<UploadedFile> {
        self.file.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_trims_and_skips_blank() {
        let mut form = UploadForm::default();
        form.fields.insert("title".into(), "  Hello ".into());
        form.fields.insert("blank".into(), "   ".into());

        assert_eq!(form.text("title").as_deref(), Some("Hello"));
        assert_eq!(form.text("blank"), None);
        assert_eq!(form.text("missing"), None);
        assert_eq!(
            form.required("blank", "Title").unwrap_err().to_string(),
            "Title is required"
        );
    }

    #[test]
    fn test_take_file() {
        let mut form = UploadForm::default();
        assert!(form.file.is_none());
        form.file = Some(UploadedFile {
            file_name: "a.png".into(),
            data: vec![1, 2, 3],
        });
        assert_eq!(form.take_file().map(|f| f.data), Some(vec![1, 2, 3]));
        assert!(form.take_file().is_none());
    }
}
