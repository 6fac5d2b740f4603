use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: i32) -> Self { Self::NotFound(format!("{entity} {id} not found")) }

    pub fn storage(e: impl std::fmt::Display) -> Self { Self::Storage(e.to_string()) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::Db(msg) => ServiceError::Storage(msg),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { ServiceError::Storage(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_map_onto_service_taxonomy() {
        let v: ServiceError = ModelError::Validation("name must not be empty".into()).into();
        assert!(matches!(v, ServiceError::Validation(m) if m.contains("name")));
        let s: ServiceError = ModelError::Db("connection reset".into()).into();
        assert!(matches!(s, ServiceError::Storage(_)));
    }

    #[test]
    fn not_found_names_the_id() {
        assert_eq!(ServiceError::not_found("accommodation", 42).to_string(), "not found: accommodation 42 not found");
    }
}
