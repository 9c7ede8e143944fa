//! End-to-end pipelines from a policy list to a finished [`Flowchart`].

use crate::expression::policies_expression;
use crate::flow::policy_flow;
use crate::flowchart::Flowchart;
use crate::passes::simplify_chart;
use crate::project::project;
use crate::simplify::{resolve_static_checks, simplify};
use crate::tree::{self, DecisionTree};
use crate::types::{ChartOptions, DefaultDescriber, DescribeCheck, Expr, Policy};

/// The simplified authorization formula of `policies`.
#[must_use]
pub fn decision_expression(policies: &[Policy], options: &ChartOptions) -> Expr {
    let expr = policies_expression(policies);
    if options.resolve_static_checks {
        simplify(&resolve_static_checks(&expr))
    } else {
        simplify(&expr)
    }
}

/// The reduced decision tree of `policies`.
#[must_use]
pub fn decision_tree(policies: &[Policy], options: &ChartOptions) -> DecisionTree {
    tree::build(&decision_expression(policies, options))
}

/// Chart the decision tree of `policies`, describing checks with
/// [`DefaultDescriber`].
#[must_use]
pub fn decision_chart(policies: &[Policy], options: &ChartOptions) -> Flowchart {
    decision_chart_with(policies, options, &DefaultDescriber)
}

/// Chart the decision tree of `policies` with a custom describer.
///
/// Builds the formula, flattens it into a shared decision tree, projects the
/// tree and, unless disabled in `options`, runs the diagram passes.
#[must_use]
pub fn decision_chart_with(
    policies: &[Policy],
    options: &ChartOptions,
    describer: &dyn DescribeCheck,
) -> Flowchart {
    let tree = decision_tree(policies, options);
    finish(project(&tree, describer, options), options)
}

/// Chart `policies` one node per condition and check, describing checks with
/// [`DefaultDescriber`].
#[must_use]
pub fn policy_flow_chart(policies: &[Policy], options: &ChartOptions) -> Flowchart {
    policy_flow_chart_with(policies, options, &DefaultDescriber)
}

#[must_use]
pub fn policy_flow_chart_with(
    policies: &[Policy],
    options: &ChartOptions,
    describer: &dyn DescribeCheck,
) -> Flowchart {
    finish(policy_flow(policies, describer, options), options)
}

fn finish(chart: Flowchart, options: &ChartOptions) -> Flowchart {
    if options.simplify_chart {
        simplify_chart(chart, options.max_pass_iterations)
    } else {
        chart
    }
}
