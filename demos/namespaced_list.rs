use std::sync::Arc;
use std::time::Duration;

use ordo::service::{FirmwareRuleService, NamespacedListService};
use ordo::store::{InMemoryLock, InMemoryStore, FIRMWARE_RULE_TABLE, NAMESPACED_LIST_TABLE};
use ordo::{free_arg, AdminConfig, FirmwareRule, NamespacedList, NamespacedListType, Rule};

fn main() {
    let store = Arc::new(InMemoryStore::new());
    let lists = NamespacedListService::new(
        store.clone(),
        Arc::new(InMemoryLock::new(NAMESPACED_LIST_TABLE, Duration::from_secs(10))),
    );
    let rules = FirmwareRuleService::new(
        store,
        Arc::new(InMemoryLock::new(FIRMWARE_RULE_TABLE, Duration::from_secs(10))),
        Arc::new(AdminConfig::default()),
    );

    lists
        .create(
            NamespacedList::new(
                "qa-boxes",
                NamespacedListType::MacList,
                vec!["AA:BB:CC:00:00:01", "AA:BB:CC:00:00:02"],
            ),
            "demo",
        )
        .expect("failed to create list");

    let rule = rules
        .create(
            FirmwareRule::new(
                "QA boxes",
                Rule::when(free_arg("eStbMac").in_list("qa-boxes")),
                "MAC_RULE",
            ),
            "stb",
            "demo",
        )
        .expect("failed to create rule");
    println!("created {} at priority {}", rule.name, rule.priority);

    // The list cannot go while the rule points at it.
    match lists.delete("qa-boxes", Some(NamespacedListType::MacList), "demo") {
        Ok(_) => println!("deleted qa-boxes"),
        Err(err) => println!("delete refused ({}): {err}", err.status_code()),
    }

    rules.delete(&rule.id, "demo").expect("failed to delete rule");
    match lists.delete("qa-boxes", Some(NamespacedListType::MacList), "demo") {
        Ok(list) => println!("deleted {} with {} entries", list.id, list.data.len()),
        Err(err) => println!("delete refused ({}): {err}", err.status_code()),
    }
}
