use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The only domain entity. `name`/`age` rules are enforced where requests are
/// decoded, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub hobbies: Vec<String>,
}

impl Person {
    pub fn new(id: Uuid, name: impl Into<String>, age: i32, hobbies: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            hobbies,
        }
    }
}

/// Raw `persons` row; `hobbies` is still the stored JSON document
#[derive(Debug, Clone, FromRow)]
pub struct PersonRow {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub hobbies: serde_json::Value,
}

impl PersonRow {
    pub fn into_person(self) -> Result<Person, serde_json::Error> {
        let hobbies = serde_json::from_value(self.hobbies)?;
        Ok(Person {
            id: self.id,
            name: self.name,
            age: self.age,
            hobbies,
        })
    }
}
