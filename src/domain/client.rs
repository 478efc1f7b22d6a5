use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientEmail, ClientId, ClientName, PhoneNumber};

/// A company that receives visits, contracted or not.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: ClientName,
    pub email: Option<ClientEmail>,
    pub phone: Option<PhoneNumber>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewClient {
    pub name: ClientName,
    pub email: Option<ClientEmail>,
    pub phone: Option<PhoneNumber>,
    pub address: Option<String>,
}

impl NewClient {
    #[must_use]
    pub fn new(
        name: ClientName,
        email: Option<ClientEmail>,
        phone: Option<PhoneNumber>,
        address: Option<String>,
    ) -> Self {
        Self {
            name,
            email,
            phone,
            address: address
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}
