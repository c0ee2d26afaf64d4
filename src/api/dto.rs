use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::database::{Page, Person};
use crate::error::ApiError;

/// Body of `POST /api/v1/person/create` and `PUT /api/v1/person/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct PersonRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hobbies: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a JSON request body regardless of `Content-Type`
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("rejected request body: {}", e);
        ApiError::invalid_body()
    })
}

impl PersonRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::invalid_input("name is required"));
        }
        if self.age < 0 {
            return Err(ApiError::invalid_input("age must be zero or greater"));
        }
        Ok(())
    }

    pub fn into_person(self, id: Uuid) -> Person {
        Person {
            id,
            name: self.name,
            age: self.age,
            hobbies: self.hobbies,
        }
    }
}

/// Person as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonView {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub hobbies: Vec<String>,
}

impl From<Person> for PersonView {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            name: person.name,
            age: person.age,
            hobbies: person.hobbies,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedPerson {
    pub id: Uuid,
}

/// `GET /api/v1/person` query string. Kept as raw strings so junk values
/// fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListQuery {
    pub fn page(&self, default_limit: u32, max_limit: u32) -> Page {
        let limit = self
            .limit
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
            .map(|v| v.min(i64::from(max_limit)) as u32)
            .unwrap_or(default_limit);

        let offset = self
            .offset
            .as_deref()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(0);

        Page::new(limit, offset)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhoAmI {
    pub subject: String,
}
