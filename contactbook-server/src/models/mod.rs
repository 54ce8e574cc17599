//! Request shapes with validation
//!
//! Bodies are deserialized by the HTTP layer and validated before any
//! repository call. Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod email;
pub mod pagination;
pub mod contact;
pub mod note;
pub mod tag;
pub mod user;

pub use validation::ValidationError;
pub use email::Email;
pub use pagination::{Pagination, PaginationParams};
pub use contact::{ContactCreate, ContactQuery, ContactUpdate};
pub use note::{NoteCreate, NoteStatusUpdate, NoteUpdate};
pub use tag::TagInput;
pub use user::{LoginForm, RequestEmail, UserSignup};
