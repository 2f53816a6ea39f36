use crate::config::Config;
use marquee_kernel::{QueryDefinition, SourceSnapshot};
use marquee_schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;

/// Exit status for a settled verdict that is an error.
pub const ERROR_VERDICT_EXIT: i32 = 2;

/// Captured query list: `{"queries": [{"key", "source", "schema"?, "enabled"?, "message"?}]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub queries: Vec<FixtureQuery>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureQuery {
    pub key: String,
    pub source: SourceSnapshot<Value>,
    #[serde(default = "accept_anything")]
    pub schema: Schema,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn accept_anything() -> Schema {
    Schema::Any
}

fn enabled_by_default() -> bool {
    true
}

impl Fixture {
    pub fn definitions(&self) -> Vec<QueryDefinition<'_, String, Value>> {
        self.queries
            .iter()
            .map(|query| {
                let def =
                    QueryDefinition::new(query.key.clone(), &query.source, query.schema.clone())
                        .enabled(query.enabled);
                match &query.message {
                    Some(message) => def.with_message(message.clone()),
                    None => def,
                }
            })
            .collect()
    }

    /// Last query carrying `key`, matching the record's last-write-wins rule.
    pub fn query(&self, key: &str) -> Option<&FixtureQuery> {
        self.queries.iter().rev().find(|query| query.key == key)
    }
}

pub fn read_json_file_or_exit<T>(path: &str, label: &str) -> T
where
    T: serde::de::DeserializeOwned,
{
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {label} at {}: {e}", path);
        std::process::exit(1);
    });
    serde_json::from_slice::<T>(&bytes).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {label} JSON at {}: {e}", path);
        std::process::exit(1);
    })
}

pub fn load_fixture_or_exit(path: &str) -> Fixture {
    let fixture: Fixture = read_json_file_or_exit(path, "fixture");
    let inconsistent: Vec<&str> = fixture
        .queries
        .iter()
        .filter(|query| !query.source.is_consistent())
        .map(|query| query.key.as_str())
        .collect();
    if !inconsistent.is_empty() {
        tracing::warn!(
            keys = %inconsistent.join(", "),
            "fixture sources violate the source invariants"
        );
    }
    fixture
}

pub fn load_config_or_exit(explicit: Option<&str>) -> Config {
    Config::load(explicit).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn print_json_or_exit<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("error: failed to serialize output: {e}");
            std::process::exit(1);
        }
    }
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
