//! Incoming post submissions, before and after validation.

use crate::error::UploadError;

/// Content type recorded when the client did not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Media file attached to a submission.
#[derive(Debug, Clone, Default)]
pub struct MediaFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    /// Original filename, if the client sent a non-empty one.
    pub fn original_name(&self) -> Option<&str> {
        self.filename.as_deref().filter(|name| !name.is_empty())
    }

    /// Declared content type, falling back to [`DEFAULT_CONTENT_TYPE`].
    pub fn content_type_or_default(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// Raw form fields as received from the client.
#[derive(Debug, Clone, Default)]
pub struct PostSubmission {
    pub title: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub server: Option<String>,
    pub media: Option<MediaFile>,
}

impl PostSubmission {
    /// Names of the text fields a submission understands.
    pub const TEXT_FIELDS: [&'static str; 5] = ["title", "description", "country", "city", "server"];

    pub fn is_text_field(name: &str) -> bool {
        Self::TEXT_FIELDS.contains(&name)
    }

    /// Assign a text field by name. Returns `false` for unknown names.
    pub fn set_text_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "country" => &mut self.country,
            "city" => &mut self.city,
            "server" => &mut self.server,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Check required fields.
    ///
    /// `title` and `description` must be non-empty and a media file must be
    /// attached. Nothing else is checked: lengths, content types and
    /// filenames are taken as sent.
    pub fn validate(self) -> Result<ValidSubmission, UploadError> {
        let title = self.title.filter(|t| !t.is_empty());
        let description = self.description.filter(|d| !d.is_empty());

        match (title, description, self.media) {
            (Some(title), Some(description), Some(media)) => Ok(ValidSubmission {
                title,
                description,
                country: self.country.unwrap_or_default(),
                city: self.city.unwrap_or_default(),
                server: self.server.unwrap_or_default(),
                media,
            }),
            _ => Err(UploadError::missing_fields()),
        }
    }
}

/// A submission that passed validation. Optional fields default to "".
#[derive(Debug, Clone)]
pub struct ValidSubmission {
    pub title: String,
    pub description: String,
    pub country: String,
    pub city: String,
    pub server: String,
    pub media: MediaFile,
}

impl ValidSubmission {
    /// Server id to add to the registry, or `None` when blank.
    pub fn registry_server(&self) -> Option<&str> {
        if self.server.trim().is_empty() {
            None
        } else {
            Some(&self.server)
        }
    }
}
