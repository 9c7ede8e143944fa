use crate::flowchart::Direction;

/// Upper bound on fixpoint iterations for each chart simplification pass.
pub const DEFAULT_MAX_PASS_ITERATIONS: usize = 100;

/// Settings for building a chart.
///
/// # Example
///
/// ```
/// use policy_chart::{ChartOptions, Direction};
///
/// let options = ChartOptions::default()
///     .direction(Direction::LeftRight)
///     .explicit_forbidden(true);
/// assert_eq!(options.max_pass_iterations, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChartOptions {
    /// Fixpoint cap for the always-link and constant-node passes.
    pub max_pass_iterations: usize,
    /// Replace `always` / `never` checks with constants before simplifying.
    pub resolve_static_checks: bool,
    /// Draw `False` edges into a `forbidden` sink instead of leaving them implicit.
    pub explicit_forbidden: bool,
    /// Run the chart simplification passes.
    pub simplify_chart: bool,
    pub direction: Direction,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            max_pass_iterations: DEFAULT_MAX_PASS_ITERATIONS,
            resolve_static_checks: true,
            explicit_forbidden: false,
            simplify_chart: true,
            direction: Direction::TopDown,
        }
    }
}

impl ChartOptions {
    #[must_use]
    pub fn max_pass_iterations(mut self, n: usize) -> Self {
        self.max_pass_iterations = n;
        self
    }

    #[must_use]
    pub fn resolve_static_checks(mut self, yes: bool) -> Self {
        self.resolve_static_checks = yes;
        self
    }

    #[must_use]
    pub fn explicit_forbidden(mut self, yes: bool) -> Self {
        self.explicit_forbidden = yes;
        self
    }

    #[must_use]
    pub fn simplify_chart(mut self, yes: bool) -> Self {
        self.simplify_chart = yes;
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ChartOptions::default();
        assert_eq!(options.max_pass_iterations, 100);
        assert!(options.resolve_static_checks);
        assert!(!options.explicit_forbidden);
        assert!(options.simplify_chart);
        assert_eq!(options.direction, Direction::TopDown);
    }

    #[test]
    fn setters_chain() {
        let options = ChartOptions::default()
            .max_pass_iterations(3)
            .resolve_static_checks(false)
            .simplify_chart(false);
        assert_eq!(options.max_pass_iterations, 3);
        assert!(!options.resolve_static_checks);
        assert!(!options.simplify_chart);
    }
}
