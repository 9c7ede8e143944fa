use thiserror::Error;

use crate::CatalogError;
use crate::parse::ParseError;

/// Unified error type covering parsing, catalog validation, and I/O.
///
/// Returned by [`Catalog::from_dsl()`](crate::Catalog::from_dsl) and
/// [`Catalog::from_file()`](crate::Catalog::from_file).
#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_pass_through() {
        let err: ChartError = CatalogError::UnknownResource {
            resource: "post".into(),
        }
        .into();
        assert_eq!(err.to_string(), "unknown resource 'post'");

        let err: ChartError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ChartError::Io(_)));
        assert_eq!(err.to_string(), "gone");
    }
}
