use policy_chart::{Catalog, ChartOptions, Direction};

fn main() {
    let catalog = Catalog::from_file("demos/blog.policy").expect("failed to load policies");

    println!("%% {catalog}");

    let options = ChartOptions::default().direction(Direction::LeftRight);
    for resource in catalog.resources() {
        let chart = catalog
            .decision_chart(resource, &options)
            .expect("resource comes from the catalog");
        println!("%% {resource}");
        println!("{chart}");
    }
}
