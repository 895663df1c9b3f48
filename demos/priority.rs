use std::sync::Arc;
use std::time::Duration;

use ordo::service::FeatureRuleService;
use ordo::store::{InMemoryLock, InMemoryStore, Table, FEATURE_RULE_TABLE, FEATURE_TABLE};
use ordo::{free_arg, AdminConfig, Feature, FeatureRule, Rule};
use tracing_subscriber::EnvFilter;

fn print_scope(service: &FeatureRuleService) {
    for rule in service.list("stb").expect("failed to list rules") {
        println!("  {:>2}  {:<12} {}", rule.priority, rule.name, rule.rule);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let store = Arc::new(InMemoryStore::new());
    let features: Table<Feature> = Table::new(FEATURE_TABLE);
    features
        .put(store.as_ref(), "wifi", &Feature::new("wifi", "wifi-5g", "stb"))
        .expect("failed to seed feature");

    let service = FeatureRuleService::new(
        store,
        Arc::new(InMemoryLock::new(FEATURE_RULE_TABLE, Duration::from_secs(10))),
        Arc::new(AdminConfig::default()),
    );

    let rule = |name: &str, model: &str, priority: i32| {
        FeatureRule::new(
            name,
            Rule::when(free_arg("model").is(model)).and(free_arg("env").exists()),
            vec!["wifi".to_owned()],
        )
        .with_priority(priority)
    };

    for (n, model) in ["XG1", "XG2", "XI3"].into_iter().enumerate() {
        let priority = i32::try_from(n + 1).expect("priority fits");
        service
            .create(rule(&format!("r{priority}"), model, priority), "stb", "demo")
            .expect("failed to create rule");
    }

    // Priorities past the end are appended.
    let a = service
        .create(rule("A", "XG4", 10), "stb", "demo")
        .expect("failed to create A");
    println!("A requested 10, landed at {}", a.priority);

    // Inserting at 2 shifts everything below it.
    let b = service
        .create(rule("B", "XG5", 2), "stb", "demo")
        .expect("failed to create B");
    println!("after inserting B at 2:");
    print_scope(&service);

    let altered = service
        .change_priority(&a.id, 1, "demo")
        .expect("failed to move A");
    println!("moving A to 1 altered {} rules:", altered.len());
    print_scope(&service);

    service.delete(&b.id, "demo").expect("failed to delete B");
    println!("after deleting B:");
    print_scope(&service);
}
