mod error;
mod grammar;
mod parser;

pub use error::ParseError;
pub use parser::ParsedCatalog;

/// Parse a policy DSL input string into a [`ParsedCatalog`].
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid DSL syntax.
pub fn parse(input: &str) -> Result<ParsedCatalog, ParseError> {
    use winnow::Parser;
    grammar::parse_catalog
        .parse(input)
        .map_err(|e| ParseError::at(input, e.offset(), e.inner().to_string()))
}
