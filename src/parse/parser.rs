use crate::Policy;

/// The result of parsing a DSL input string: resources in source order, each
/// with its ordered policy list.
#[derive(Debug)]
pub struct ParsedCatalog {
    pub resources: Vec<(String, Vec<Policy>)>,
}
