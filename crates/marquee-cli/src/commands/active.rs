use crate::support::{load_fixture_or_exit, print_json_or_exit, yes_no};
use marquee_kernel::filter_active;
use serde_json::json;

pub fn run(fixture: String, json: bool) {
    let fixture = load_fixture_or_exit(&fixture);
    let defs = fixture.definitions();
    let active = filter_active(&defs);
    let readiness = active.readiness();

    let active_keys: Vec<&str> = active.keys().map(String::as_str).collect();
    let disabled_keys: Vec<&str> = defs
        .iter()
        .filter(|def| !def.is_enabled())
        .map(|def| def.key().as_str())
        .collect();
    tracing::info!(
        active = active_keys.len(),
        disabled = disabled_keys.len(),
        "filtered fixture queries"
    );

    if json {
        print_json_or_exit(&json!({
            "active": active_keys,
            "disabled": disabled_keys,
            "settled": active.is_settled(),
            "readiness": {
                "hasData": readiness.has_data,
                "isPending": readiness.is_pending,
                "isFetching": readiness.is_fetching,
            },
        }));
    } else {
        println!("marquee active");
        println!("  Active: {}", list_or_none(&active_keys));
        println!("  Disabled: {}", list_or_none(&disabled_keys));
        println!("  Settled: {}", yes_no(active.is_settled()));
        println!("  All have data: {}", yes_no(readiness.has_data));
        println!("  Fetching: {}", yes_no(readiness.is_fetching));
    }
}

fn list_or_none(keys: &[&str]) -> String {
    if keys.is_empty() {
        "(none)".to_string()
    } else {
        keys.join(", ")
    }
}
