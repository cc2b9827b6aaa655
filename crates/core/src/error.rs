#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Upstream storefront failure: {0}")]
    Upstream(String),

    #[error("Persistence failure in {layer}: {message}")]
    Persistence {
        layer: &'static str,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
