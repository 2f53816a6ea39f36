use crate::support::{ERROR_VERDICT_EXIT, load_fixture_or_exit, print_json_or_exit};
use marquee_kernel::{OutcomeKind, ValidationOutcome, resolve};
use serde_json::{Value, json};
use std::process;

pub fn run(fixture: String, key: String, json: bool) {
    let fixture = load_fixture_or_exit(&fixture);
    let Some(query) = fixture.query(&key) else {
        eprintln!("error: no query with key `{key}` in fixture");
        process::exit(1);
    };
    if !query.enabled {
        tracing::info!(key = %key, "query is disabled; resolving it anyway");
    }

    let outcome = resolve(&query.source, &query.schema, query.message.as_deref());
    let kind = outcome.kind();
    tracing::info!(key = %key, outcome = kind.as_str(), "resolved query");

    if json {
        let payload = match &outcome {
            ValidationOutcome::Pending => json!({ "key": key, "kind": kind }),
            ValidationOutcome::SourceError { error } => {
                json!({ "key": key, "kind": kind, "error": error })
            }
            ValidationOutcome::ValidationError { error } => json!({
                "key": key,
                "kind": kind,
                "message": error.to_string(),
                "issues": error.issues,
                "raw": error.raw,
            }),
            ValidationOutcome::Valid { data } => json!({ "key": key, "kind": kind, "data": data }),
        };
        print_json_or_exit(&payload);
    } else {
        println!("marquee resolve");
        println!("  Key: {key}");
        println!("  Outcome: {kind}");
        match &outcome {
            ValidationOutcome::Pending => {}
            ValidationOutcome::SourceError { error } => println!("  Error: {}", describe(error)),
            ValidationOutcome::ValidationError { error } => {
                println!("  Message: {error}");
                for issue in &error.issues {
                    println!("  Issue: {issue}");
                }
            }
            ValidationOutcome::Valid { data } => println!("  Data: {data}"),
        }
    }

    if matches!(kind, OutcomeKind::SourceError | OutcomeKind::ValidationError) {
        process::exit(ERROR_VERDICT_EXIT);
    }
}

fn describe(error: &Value) -> String {
    match error {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
