use serde::{Deserialize, Serialize};

use crate::domain::{UserFields, UserId, UserRecord};

/// User as returned by `GET /users`. Only the fields the dashboard reads are
/// declared; everything else in the payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<RemoteAddress>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteAddress {
    #[serde(default)]
    pub city: String,
}

impl From<RemoteUser> for UserRecord {
    fn from(value: RemoteUser) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            city: value.address.map(|address| address.city).unwrap_or_default(),
        }
    }
}

/// Body sent with `POST /users` and `PUT /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub city: String,
}

impl From<&UserRecord> for UserPayload {
    fn from(value: &UserRecord) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            email: value.email.clone(),
            city: value.city.clone(),
        }
    }
}

/// Error body some services attach to non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_user_maps_address_city() {
        let raw = serde_json::json!({
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": { "street": "Kulas Light", "city": "Gwenborough" },
            "phone": "1-770-736-8031"
        });
        let user: RemoteUser = serde_json::from_value(raw).expect("decode");
        let record = UserRecord::from(user);
        assert_eq!(record.id, UserId(1));
        assert_eq!(record.city, "Gwenborough");
    }

    #[test]
    fn remote_user_without_address_has_empty_city() {
        let raw = serde_json::json!({ "id": 2, "name": "Ervin", "email": "e@x.io" });
        let user: RemoteUser = serde_json::from_value(raw).expect("decode");
        assert_eq!(UserRecord::from(user).city, "");
    }

    #[test]
    fn payload_serializes_flat_city() {
        let record = UserRecord::new(UserId(11), UserFields::new("Alice", "a@x.com", "Paris"));
        let value = serde_json::to_value(UserPayload::from(&record)).expect("encode");
        assert_eq!(
            value,
            serde_json::json!({ "id": 11, "name": "Alice", "email": "a@x.com", "city": "Paris" })
        );
    }
}
