mod catalog;
mod check;
mod error;
mod expr;
mod options;
mod policy;
mod value;

pub use catalog::{Catalog, CatalogBuilder, ResourceBuilder};
pub use check::{
    ALWAYS, ALWAYS_FALSE, ALWAYS_TRUE, CheckRef, DefaultDescriber, DescribeCheck, NEVER, check,
};
pub use error::CatalogError;
pub use expr::{Expr, always, never};
pub use options::{ChartOptions, DEFAULT_MAX_PASS_ITERATIONS};
pub use policy::{CheckType, Policy, PolicyBuilder, PolicyCheck, PolicySetBuilder};
pub use value::Value;
