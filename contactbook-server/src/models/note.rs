//! Note request shapes

use serde::Deserialize;

use super::validation::check_length;
use super::ValidationError;

const MAX_TITLE_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 150;

/// Body of `POST /notes`
#[derive(Debug, Clone, Deserialize)]
pub struct NoteCreate {
    pub title: String,
    pub description: String,
    /// Tag ids; ids that don't resolve to a tag are dropped
    #[serde(default)]
    pub tags: Vec<i32>,
}

impl NoteCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text(&self.title, &self.description)
    }
}

/// Body of `PUT /notes/{id}`; replaces every mutable field and the tag set
#[derive(Debug, Clone, Deserialize)]
pub struct NoteUpdate {
    pub title: String,
    pub description: String,
    pub done: bool,
    #[serde(default)]
    pub tags: Vec<i32>,
}

impl NoteUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text(&self.title, &self.description)
    }
}

/// Body of `PATCH /notes/{id}`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NoteStatusUpdate {
    pub done: bool,
}

fn validate_text(title: &str, description: &str) -> Result<(), ValidationError> {
    check_length("title", title, 1, MAX_TITLE_LEN)?;
    check_length("description", description, 1, MAX_DESCRIPTION_LEN)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_default_to_empty() {
        let note: NoteCreate =
            serde_json::from_str(r#"{"title":"t","description":"d"}"#).unwrap();
        assert!(note.tags.is_empty());
        assert!(note.validate().is_ok());
    }

    #[test]
    fn rejects_long_description() {
        let note = NoteUpdate {
            title: "t".into(),
            description: "d".repeat(151),
            done: false,
            tags: vec![],
        };
        assert_eq!(
            note.validate(),
            Err(ValidationError::TooLong {
                field: "description",
                max: 150
            })
        );
    }
}
