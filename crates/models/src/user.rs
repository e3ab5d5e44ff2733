use serde::{Deserialize, Serialize};

use crate::schema::{Key, ObjectSchema};

/// A user held by the users worker. Users have no identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

/// Schema applied to `POST /create` on the gateway.
pub fn user_schema() -> ObjectSchema {
    ObjectSchema::new()
        .key("name", Key::string().required())
        .key("email", Key::string().email().required())
}
