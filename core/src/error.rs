use thiserror::Error;

pub type LabResult<T> = Result<T, LabError>;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Interrupted before the sequence finished")]
    Interrupted,
}

impl From<mongodb::bson::ser::Error> for LabError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        LabError::Serialization(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for LabError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        LabError::Serialization(err.to_string())
    }
}
