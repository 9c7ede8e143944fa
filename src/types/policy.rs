use std::fmt;

use super::check::CheckRef;

/// How a single check inside a policy routes its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CheckType {
    AuthorizeIf,
    ForbidIf,
    AuthorizeUnless,
    ForbidUnless,
}

impl CheckType {
    /// The DSL keyword for this check type.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            CheckType::AuthorizeIf => "authorize_if",
            CheckType::ForbidIf => "forbid_if",
            CheckType::AuthorizeUnless => "authorize_unless",
            CheckType::ForbidUnless => "forbid_unless",
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A typed check inside a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyCheck {
    pub check_type: CheckType,
    pub check: CheckRef,
}

/// One authorization policy of a resource.
///
/// `condition` is a conjunction; an empty condition means the policy always
/// applies. Checks are evaluated in order. A bypass policy that passes
/// authorizes immediately, and one that fails falls through to the policies
/// after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Policy {
    pub description: Option<String>,
    pub condition: Vec<CheckRef>,
    pub checks: Vec<PolicyCheck>,
    pub bypass: bool,
}

/// Intermediate builder passed to the policy definition closure.
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    policy: Policy,
}

impl PolicyBuilder {
    #[must_use]
    pub fn describe(mut self, description: &str) -> Self {
        self.policy.description = Some(description.to_owned());
        self
    }

    /// Add a condition. Conditions are ANDed together.
    #[must_use]
    pub fn condition(mut self, check: CheckRef) -> Self {
        self.policy.condition.push(check);
        self
    }

    #[must_use]
    pub fn authorize_if(self, check: CheckRef) -> Self {
        self.push(CheckType::AuthorizeIf, check)
    }

    #[must_use]
    pub fn forbid_if(self, check: CheckRef) -> Self {
        self.push(CheckType::ForbidIf, check)
    }

    #[must_use]
    pub fn authorize_unless(self, check: CheckRef) -> Self {
        self.push(CheckType::AuthorizeUnless, check)
    }

    #[must_use]
    pub fn forbid_unless(self, check: CheckRef) -> Self {
        self.push(CheckType::ForbidUnless, check)
    }

    fn push(mut self, check_type: CheckType, check: CheckRef) -> Self {
        self.policy.checks.push(PolicyCheck { check_type, check });
        self
    }
}

/// Builder for an ordered list of [`Policy`] values.
///
/// # Example
///
/// ```
/// use policy_chart::{PolicySetBuilder, check};
///
/// let policies = PolicySetBuilder::new()
///     .bypass(|p| p.condition(check("is_admin")).authorize_if(check("always")))
///     .policy(|p| p.authorize_if(check("owner")))
///     .build();
/// assert_eq!(policies.len(), 2);
/// assert!(policies[0].bypass);
/// ```
#[derive(Debug, Default)]
pub struct PolicySetBuilder {
    policies: Vec<Policy>,
}

impl PolicySetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a regular policy.
    #[must_use]
    pub fn policy(mut self, f: impl FnOnce(PolicyBuilder) -> PolicyBuilder) -> Self {
        self.policies.push(f(PolicyBuilder::default()).policy);
        self
    }

    /// Append a bypass policy.
    #[must_use]
    pub fn bypass(mut self, f: impl FnOnce(PolicyBuilder) -> PolicyBuilder) -> Self {
        let mut policy = f(PolicyBuilder::default()).policy;
        policy.bypass = true;
        self.policies.push(policy);
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<Policy> {
        self.policies
    }
}
