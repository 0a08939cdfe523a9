use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::entities::customer;

/// Payload for creating or fully replacing a customer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CustomerRequest {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Ada")]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[validate(email, length(max = 255))]
    #[schema(example = "ada@example.com")]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerView {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub email: String,
}

impl From<customer::Model> for CustomerView {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            last_name: model.last_name,
            email: model.email,
        }
    }
}
