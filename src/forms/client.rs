use serde::Deserialize;
use validator::Validate;

use crate::domain::client::NewClient;
use crate::domain::types::{ClientEmail, ClientName, PhoneNumber, TypeConstraintError};

#[derive(Deserialize, Validate)]
/// Form data for registering a new client.
pub struct AddClientForm {
    /// Client display name.
    #[validate(length(min = 1))]
    pub name: String,
    /// Optional contact email.
    #[validate(email)]
    pub email: Option<String>,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// Optional visit address.
    pub address: Option<String>,
}

impl TryFrom<&AddClientForm> for NewClient {
    type Error = TypeConstraintError;

    fn try_from(form: &AddClientForm) -> Result<Self, Self::Error> {
        let email = form
            .email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ClientEmail::new)
            .transpose()?;
        let phone = form
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PhoneNumber::new)
            .transpose()?;

        Ok(NewClient::new(
            ClientName::new(form.name.as_str())?,
            email,
            phone,
            form.address.clone(),
        ))
    }
}
