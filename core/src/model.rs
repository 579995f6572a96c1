//! Person records stored in the collection

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Document};
use serde::{Deserialize, Serialize};

use crate::LabResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "idade")]
    pub age: i32,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "profissao")]
    pub profession: String,
    #[serde(rename = "salario")]
    pub salary: f64,
}

impl Person {
    pub fn new(
        name: impl Into<String>,
        age: i32,
        city: impl Into<String>,
        profession: impl Into<String>,
        salary: f64,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            age,
            city: city.into(),
            profession: profession.into(),
            salary,
        }
    }

    pub fn to_document(&self) -> LabResult<Document> {
        Ok(bson::to_document(self)?)
    }
}

/// The three records inserted by the create step, in insertion order.
pub fn sample_people() -> [Person; 3] {
    [
        Person::new("João Silva", 28, "São Paulo", "Engenheiro", 8500.00),
        Person::new("Maria Oliveira", 32, "Rio de Janeiro", "Médica", 12000.00),
        Person::new("Carlos Souza", 25, "Belo Horizonte", "Desenvolvedor", 5500.00),
    ]
}
