//! Render authorization policies as flowcharts.
//!
//! A resource's ordered policy list is turned into one boolean formula,
//! simplified, flattened into a reduced decision tree with shared subtrees and
//! projected onto Mermaid flowchart entries. A second renderer draws each
//! policy's own condition and checks without deduplication.
//!
//! ```
//! use policy_chart::{ChartOptions, PolicySetBuilder, check, decision_chart};
//!
//! let policies = PolicySetBuilder::new()
//!     .bypass(|p| p.condition(check("admin")).authorize_if(check("always")))
//!     .policy(|p| p.authorize_if(check("owner")))
//!     .build();
//!
//! let chart = decision_chart(&policies, &ChartOptions::default());
//! assert!(chart.to_string().starts_with("flowchart TB"));
//! ```

mod chart;
mod error;
mod expression;
mod flow;
pub mod flowchart;
pub mod parse;
pub mod passes;
mod project;
pub mod simplify;
pub mod tree;
mod types;

pub use chart::{
    decision_chart, decision_chart_with, decision_expression, decision_tree, policy_flow_chart,
    policy_flow_chart_with,
};
pub use error::ChartError;
pub use expression::{checks_expression, condition_expression, policies_expression};
pub use flow::{GATE, policy_flow};
pub use flowchart::{Direction, Flowchart};
pub use project::project;
pub use types::{
    ALWAYS, ALWAYS_FALSE, ALWAYS_TRUE, Catalog, CatalogBuilder, CatalogError, ChartOptions,
    CheckRef, CheckType, DEFAULT_MAX_PASS_ITERATIONS, DefaultDescriber, DescribeCheck, Expr, NEVER,
    Policy, PolicyBuilder, PolicyCheck, PolicySetBuilder, ResourceBuilder, Value, always, check,
    never,
};
