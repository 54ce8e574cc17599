//! Contact request shapes

use chrono::NaiveDate;
use serde::Deserialize;

use super::validation::check_length;
use super::{Email, ValidationError};

const MAX_NAME_LEN: usize = 25;
const MAX_EMAIL_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 20;
const MAX_ADDRESS_LEN: usize = 100;

/// Body of `POST /contacts`
#[derive(Debug, Clone, Deserialize)]
pub struct ContactCreate {
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub birthday: NaiveDate,
}

impl ContactCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length("name", &self.name, 1, MAX_NAME_LEN)?;
        check_length("lastname", &self.lastname, 1, MAX_NAME_LEN)?;
        Email::new(&self.email, MAX_EMAIL_LEN)?;
        check_length("phone", &self.phone, 1, MAX_PHONE_LEN)?;
        check_length("address", &self.address, 1, MAX_ADDRESS_LEN)?;
        Ok(())
    }
}

/// Body of `PUT /contacts/{id}`.
///
/// Only the fields present in the request are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl ContactUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            check_length("name", name, 1, MAX_NAME_LEN)?;
        }
        if let Some(lastname) = &self.lastname {
            check_length("lastname", lastname, 1, MAX_NAME_LEN)?;
        }
        if let Some(email) = &self.email {
            Email::new(email, MAX_EMAIL_LEN)?;
        }
        if let Some(phone) = &self.phone {
            check_length("phone", phone, 1, MAX_PHONE_LEN)?;
        }
        if let Some(address) = &self.address {
            check_length("address", address, 1, MAX_ADDRESS_LEN)?;
        }
        Ok(())
    }
}

/// Query string of `GET /contacts`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactQuery {
    pub limit: Option<i64>,
    #[serde(alias = "skip")]
    pub offset: Option<i64>,
    /// Case-insensitive substring over name, lastname and email
    pub q: Option<String>,
}
