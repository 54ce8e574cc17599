//! Tag request shape

use serde::Deserialize;

use super::validation::check_length;
use super::ValidationError;

/// Maximum length for tag names (matches the column width)
const MAX_TAG_NAME_LEN: usize = 25;

/// Body of `POST /tags` and `PUT /tags/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TagInput {
    pub name: String,
}

impl TagInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length("name", &self.name, 1, MAX_TAG_NAME_LEN)
    }
}
