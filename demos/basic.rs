use policy_chart::{ChartOptions, PolicySetBuilder, Value, check, decision_chart, policy_flow_chart};

fn main() {
    let role = |name: &str| check("actor_attribute_equals").param("role", Value::atom(name));

    let policies = PolicySetBuilder::new()
        .bypass(|p| {
            p.describe("admins can do anything")
                .condition(role("admin"))
                .authorize_if(check("always"))
        })
        .policy(|p| {
            p.describe("managers and owners may edit")
                .condition(check("action_type").param("type", Value::atom("update")))
                .forbid_if(check("actor_attribute_equals").param("banned", true))
                .authorize_if(role("manager"))
                .authorize_if(check("relates_to_actor_via").param("path", "owner"))
        })
        .build();

    let options = ChartOptions::default();

    println!("%% decision tree");
    println!("{}", decision_chart(&policies, &options));

    println!("%% policy flow");
    println!("{}", policy_flow_chart(&policies, &options));
}
