//! Filters, updates, index models and pipelines used by the walkthrough

use mongodb::IndexModel;
use mongodb::bson::{Document, doc};
use mongodb::options::IndexOptions;

pub const NAME: &str = "nome";
pub const AGE: &str = "idade";
pub const CITY: &str = "cidade";
pub const PROFESSION: &str = "profissao";
pub const SALARY: &str = "salario";

pub fn all() -> Document {
    Document::new()
}

pub fn name_is(name: &str) -> Document {
    doc! { NAME: name }
}

pub fn salary_above(threshold: i32) -> Document {
    doc! { SALARY: { "$gt": threshold } }
}

pub fn salary_below(threshold: i32) -> Document {
    doc! { SALARY: { "$lt": threshold } }
}

pub fn age_above(age: i32) -> Document {
    doc! { AGE: { "$gt": age } }
}

pub fn set_salary(salary: f64) -> Document {
    doc! { "$set": { SALARY: salary } }
}

pub fn raise_salary(amount: f64) -> Document {
    doc! { "$inc": { SALARY: amount } }
}

pub fn unique_name_index() -> IndexModel {
    IndexModel::builder()
        .keys(doc! { NAME: 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

/// Compound index: profession ascending, salary descending.
pub fn profession_salary_index() -> IndexModel {
    IndexModel::builder()
        .keys(doc! { PROFESSION: 1, SALARY: -1 })
        .build()
}

pub fn list_indexes_command(collection: &str) -> Document {
    doc! { "listIndexes": collection }
}

pub fn salary_stats_by_profession() -> Vec<Document> {
    vec![doc! {
        "$group": {
            "_id": format!("${}", PROFESSION),
            "mediaSalarial": { "$avg": format!("${}", SALARY) },
            "totalSalarios": { "$sum": format!("${}", SALARY) },
            "exemploNome": { "$first": format!("${}", NAME) },
        }
    }]
}

pub fn headcount_by_city() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": format!("${}", CITY),
                "quantidade": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "quantidade": -1 } },
    ]
}
