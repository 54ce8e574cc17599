//! `.env` loading
//!
//! Values already present in the process environment win over the file.

use std::path::PathBuf;

/// Load `.env` from the working directory (or its parents) if present.
///
/// Returns the file that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => {
            // Parse errors are reported once tracing is up
            eprintln!("warning: ignoring malformed .env: {}", e);
            None
        }
    }
}
