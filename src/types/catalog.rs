use std::collections::HashSet;
use std::fmt;

use super::error::CatalogError;
use super::options::ChartOptions;
use super::policy::{Policy, PolicyBuilder, PolicySetBuilder};
use crate::flowchart::Flowchart;

/// Named resources and the ordered policies that guard each of them.
///
/// Resources keep their declaration order.
///
/// # Example
///
/// ```
/// use policy_chart::{CatalogBuilder, ChartOptions, check};
///
/// let catalog = CatalogBuilder::new()
///     .resource("post", |r| r.policy(|p| p.authorize_if(check("owner"))))
///     .build()
///     .unwrap();
/// let chart = catalog.decision_chart("post", &ChartOptions::default()).unwrap();
/// assert!(chart.to_string().starts_with("flowchart TB"));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Catalog {
    pub(crate) resources: Vec<(String, Vec<Policy>)>,
}

impl Catalog {
    /// The policies of `resource`, in evaluation order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownResource`] if no such resource exists.
    pub fn policies_for(&self, resource: &str) -> Result<&[Policy], CatalogError> {
        self.resources
            .iter()
            .find(|(name, _)| name == resource)
            .map(|(_, policies)| policies.as_slice())
            .ok_or_else(|| CatalogError::UnknownResource {
                resource: resource.to_owned(),
            })
    }

    /// Resource names in declaration order.
    #[must_use]
    pub fn resources(&self) -> Vec<&str> {
        self.resources.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Build the deduplicated decision-tree chart for `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownResource`] if no such resource exists.
    pub fn decision_chart(
        &self,
        resource: &str,
        options: &ChartOptions,
    ) -> Result<Flowchart, CatalogError> {
        let policies = self.policies_for(resource)?;
        Ok(crate::chart::decision_chart(policies, options))
    }

    /// Build the per-policy flow chart for `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownResource`] if no such resource exists.
    pub fn policy_flow_chart(
        &self,
        resource: &str,
        options: &ChartOptions,
    ) -> Result<Flowchart, CatalogError> {
        let policies = self.policies_for(resource)?;
        Ok(crate::chart::policy_flow_chart(policies, options))
    }

    /// Parse a DSL string into a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError`](crate::ChartError) on parse or validation failure.
    pub fn from_dsl(input: &str) -> Result<Self, crate::ChartError> {
        let parsed = crate::parse::parse(input)?;
        let mut builder = CatalogBuilder::new();
        for (name, policies) in parsed.resources {
            builder.resources.push((name, policies));
        }
        let catalog = builder.build()?;
        tracing::debug!(
            resources = catalog.resources.len(),
            policies = catalog.resources.iter().map(|(_, p)| p.len()).sum::<usize>(),
            "parsed policy catalog"
        );
        Ok(catalog)
    }

    /// Read a DSL file into a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError`](crate::ChartError) on I/O, parse or validation failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::ChartError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_dsl(&input)
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Catalog({} resources, {} policies)",
            self.resources.len(),
            self.resources.iter().map(|(_, p)| p.len()).sum::<usize>(),
        )
    }
}

/// Builder for a [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    resources: Vec<(String, Vec<Policy>)>,
}

/// Intermediate builder passed to the resource definition closure.
#[derive(Debug, Default)]
pub struct ResourceBuilder {
    policies: PolicySetBuilder,
}

impl ResourceBuilder {
    #[must_use]
    pub fn policy(mut self, f: impl FnOnce(PolicyBuilder) -> PolicyBuilder) -> Self {
        self.policies = self.policies.policy(f);
        self
    }

    #[must_use]
    pub fn bypass(mut self, f: impl FnOnce(PolicyBuilder) -> PolicyBuilder) -> Self {
        self.policies = self.policies.bypass(f);
        self
    }
}

impl CatalogBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a resource and its policies.
    #[must_use]
    pub fn resource(
        mut self,
        name: &str,
        f: impl FnOnce(ResourceBuilder) -> ResourceBuilder,
    ) -> Self {
        let builder = f(ResourceBuilder::default());
        self.resources
            .push((name.to_owned(), builder.policies.build()));
        self
    }

    /// Declare a resource from an already-built policy list.
    #[must_use]
    pub fn resource_policies(mut self, name: &str, policies: Vec<Policy>) -> Self {
        self.resources.push((name.to_owned(), policies));
        self
    }

    /// Validate and freeze the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on an empty or duplicate resource name.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut seen = HashSet::new();
        for (name, _) in &self.resources {
            if name.is_empty() {
                return Err(CatalogError::EmptyResourceName);
            }
            if !seen.insert(name.as_str()) {
                return Err(CatalogError::DuplicateResource {
                    resource: name.clone(),
                });
            }
        }
        Ok(Catalog {
            resources: self.resources,
        })
    }
}
