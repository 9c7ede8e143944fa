use std::sync::Arc;
use std::thread;

use policy_chart::{CatalogBuilder, ChartOptions, check};

fn main() {
    let catalog = Arc::new(
        CatalogBuilder::new()
            .resource("post", |r| {
                r.bypass(|p| p.condition(check("admin")).authorize_if(check("always")))
                    .policy(|p| p.forbid_if(check("banned")).authorize_if(check("owner")))
            })
            .resource("comment", |r| {
                r.policy(|p| p.condition(check("read")).authorize_if(check("published")))
                    .policy(|p| p.condition(check("write")).authorize_if(check("author")))
            })
            .build()
            .expect("failed to build catalog"),
    );

    let handles: Vec<_> = ["post", "comment"]
        .into_iter()
        .map(|resource| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                let chart = catalog
                    .decision_chart(resource, &ChartOptions::default())
                    .expect("resource is declared above");
                println!("%% {resource}\n{chart}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
