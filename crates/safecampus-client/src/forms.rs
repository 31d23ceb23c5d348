//! Screen forms and their pre-submit checks.
//!
//! The checks mirror the server's (same phone pattern and name length) so a
//! user sees the problem before a round trip. The server stays
//! authoritative.

use safecampus_shared::error::ValidationError;
use safecampus_shared::protocol::{
    ContactRequest, LoginRequest, SignupRequest, UpdateAccountRequest, UpdateContactRequest,
};
use safecampus_shared::validation::{
    parse_date, require, validate_contact_name, validate_email, validate_password_confirmation,
    validate_phone,
};

/// A file handed over by the platform file picker. The bytes are never
/// inspected, only attached to the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn require_media(field: &'static str, media: &Option<MediaFile>) -> Result<(), ValidationError> {
    match media {
        Some(file) if !file.is_empty() => Ok(()),
        _ => Err(ValidationError::Missing(field)),
    }
}

// ─── Accounts ───

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Name", &self.name)?;
        validate_email(self.email.trim())?;
        validate_phone(self.mobile.trim())?;
        require("Password", &self.password)?;
        validate_password_confirmation(&self.password, &self.confirm_password)
    }

    pub fn to_request(&self) -> SignupRequest {
        SignupRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            mobile: self.mobile.trim().to_string(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(self.email.trim())?;
        require("Password", &self.password)
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub mobile: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Name", &self.name)?;
        validate_phone(self.mobile.trim())
    }

    pub fn to_request(&self) -> UpdateAccountRequest {
        UpdateAccountRequest {
            name: self.name.trim().to_string(),
            mobile: self.mobile.trim().to_string(),
        }
    }
}

// ─── Contacts and helplines ───

/// Used both for a student's emergency contact and an admin's helpline.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
}

pub type HelplineForm = ContactForm;

impl ContactForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_contact_name(&self.name)?;
        validate_phone(self.phone.trim())
    }

    pub fn to_request(&self) -> ContactRequest {
        ContactRequest {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }

    /// Edits send both fields; the server keeps whatever is unchanged.
    pub fn to_update(&self) -> UpdateContactRequest {
        UpdateContactRequest {
            name: Some(self.name.trim().to_string()),
            phone: Some(self.phone.trim().to_string()),
        }
    }
}

// ─── Media-backed records ───

#[derive(Debug, Clone, Default)]
pub struct IncidentForm {
    pub description: String,
    pub location: String,
    /// `YYYY-MM-DD` or RFC 3339.
    pub incident_date: String,
    pub image: Option<MediaFile>,
}

impl IncidentForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Incident description", &self.description)?;
        require("Incident location", &self.location)?;
        parse_date(self.incident_date.trim())?;
        require_media("Incident image", &self.image)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub description: String,
    pub media: Option<MediaFile>,
}

impl PostForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Description", &self.description)?;
        require_media("Media", &self.media)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArticleForm {
    pub title: String,
    pub description: String,
    pub image: Option<MediaFile>,
}

impl ArticleForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Title", &self.title)?;
        require("Description", &self.description)?;
        require_media("Image", &self.image)
    }

    /// Editing an article may keep its current image.
    pub fn validate_edit(&self) -> Result<(), ValidationError> {
        require("Title", &self.title)?;
        require("Description", &self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupForm {
        SignupForm {
            name: "Alice".into(),
            email: "alice@campus.edu".into(),
            mobile: "+911234567890".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
        }
    }

    #[test]
    fn test_signup_form() {
        assert!(signup().validate().is_ok());

        let mut form = signup();
        form.confirm_password = "other".into();
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));

        let mut form = signup();
        form.mobile = "12345".into();
        assert!(matches!(form.validate(), Err(ValidationError::InvalidPhone { .. })));

        let mut form = signup();
        form.email = "alice".into();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_contact_form_matches_server_rules() {
        let ok = ContactForm {
            name: "Mom".into(),
            phone: "1234567890".into(),
        };
        assert!(ok.validate().is_ok());

        let short = ContactForm {
            name: "Al".into(),
            ..ok.clone()
        };
        assert!(matches!(short.validate(), Err(ValidationError::Length { .. })));

        let bad_phone = ContactForm {
            phone: "12-34".into(),
            ..ok
        };
        assert_eq!(
            bad_phone.validate().unwrap_err().to_string(),
            "12-34 is not a valid contact number!"
        );
    }

    #[test]
    fn test_incident_form_needs_media() {
        let mut form = IncidentForm {
            description: "Broken light".into(),
            location: "Car park".into(),
            incident_date: "2024-03-01".into(),
            image: None,
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::Missing("Incident image"))
        );

        form.image = Some(MediaFile::new("empty.png", Vec::new()));
        assert!(form.validate().is_err());

        form.image = Some(MediaFile::new("light.png", vec![1, 2, 3]));
        assert!(form.validate().is_ok());

        form.incident_date = "yesterday".into();
        assert!(matches!(form.validate(), Err(ValidationError::InvalidDate(_))));
    }

    #[test]
    fn test_article_edit_does_not_need_image() {
        let form = ArticleForm {
            title: "Night safety".into(),
            description: "Walk in pairs".into(),
            image: None,
        };
        assert!(form.validate().is_err());
        assert!(form.validate_edit().is_ok());
    }
}
