use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown resource '{resource}'")]
    UnknownResource { resource: String },

    #[error("duplicate resource '{resource}'")]
    DuplicateResource { resource: String },

    #[error("resource name must not be empty")]
    EmptyResourceName,
}
