//! Declarative payload schemas.
//!
//! A [`Schema`] is plain data: it can be built in code or loaded from JSON
//! (`{"type": "object", "properties": {...}, "required": [...]}`). Checking
//! never stops at the first problem; every issue is collected with its path
//! so a validation error shows everything that was wrong.

use crate::path;
use marquee_kernel::{Issue, Issues, Validator};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schema {
    Any,
    Null,
    Bool,
    String(StringSchema),
    Number(NumberSchema),
    Integer(IntegerSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
    Nullable { inner: Box<Schema> },
    OneOf { variants: Vec<Schema> },
    /// RFC 3339 timestamp string.
    DateTime,
    /// Hyphenated or simple UUID string.
    Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
}

/// Regex source for a string schema, compiled on first use and reused for
/// every string checked afterwards.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Pattern {
    source: String,
    compiled: OnceLock<Result<Regex, regex::Error>>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceLock::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> Result<&Regex, &regex::Error> {
        self.compiled.get_or_init(|| Regex::new(&self.source)).as_ref()
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Pattern::new(source)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.source
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArraySchema {
    pub items: Box<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSchema {
    #[serde(default)]
    pub properties: BTreeMap<String, Schema>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default = "allow_by_default")]
    pub additional_properties: bool,
}

fn allow_by_default() -> bool {
    true
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self {
            properties: BTreeMap::new(),
            required: Vec::new(),
            additional_properties: true,
        }
    }
}

impl Schema {
    pub fn string() -> Self {
        Schema::String(StringSchema::default())
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Schema::String(StringSchema {
            pattern: Some(Pattern::new(pattern)),
            ..StringSchema::default()
        })
    }

    pub fn number() -> Self {
        Schema::Number(NumberSchema::default())
    }

    pub fn integer() -> Self {
        Schema::Integer(IntegerSchema::default())
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array(ArraySchema {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        })
    }

    pub fn object() -> ObjectSchema {
        ObjectSchema::default()
    }

    pub fn nullable(inner: Schema) -> Self {
        Schema::Nullable {
            inner: Box::new(inner),
        }
    }

    pub fn one_of(variants: impl IntoIterator<Item = Schema>) -> Self {
        Schema::OneOf {
            variants: variants.into_iter().collect(),
        }
    }

    /// Every issue in `value`, with paths rooted at `$`.
    pub fn issues(&self, value: &Value) -> Issues {
        let mut issues = Issues::new();
        self.check(value, path::ROOT_PATH, &mut issues);
        issues
    }

    fn check(&self, value: &Value, at: &str, issues: &mut Issues) {
        match self {
            Schema::Any => {}
            Schema::Null => {
                if !value.is_null() {
                    issues.push(mismatch(at, "null", value));
                }
            }
            Schema::Bool => {
                if !value.is_boolean() {
                    issues.push(mismatch(at, "boolean", value));
                }
            }
            Schema::String(schema) => match value.as_str() {
                Some(text) => schema.check(text, at, issues),
                None => issues.push(mismatch(at, "string", value)),
            },
            Schema::Number(schema) => match value.as_f64() {
                Some(number) => schema.check(number, at, issues),
                None => issues.push(mismatch(at, "number", value)),
            },
            Schema::Integer(schema) => match integer_value(value) {
                Some(number) => schema.check(number, at, issues),
                None => issues.push(mismatch(at, "integer", value)),
            },
            Schema::Array(schema) => match value.as_array() {
                Some(items) => schema.check(items, at, issues),
                None => issues.push(mismatch(at, "array", value)),
            },
            Schema::Object(schema) => match value.as_object() {
                Some(fields) => schema.check(fields, at, issues),
                None => issues.push(mismatch(at, "object", value)),
            },
            Schema::Nullable { inner } => {
                if !value.is_null() {
                    inner.check(value, at, issues);
                }
            }
            Schema::OneOf { variants } => {
                if !variants.iter().any(|variant| variant.issues(value).is_empty()) {
                    issues.push(Issue::new(
                        at,
                        format!("matched none of {} variants", variants.len()),
                    ));
                }
            }
            Schema::DateTime => match value.as_str() {
                Some(text) => {
                    if let Err(e) = chrono::DateTime::parse_from_rfc3339(text) {
                        issues.push(Issue::new(at, format!("invalid RFC 3339 timestamp: {e}")));
                    }
                }
                None => issues.push(mismatch(at, "timestamp string", value)),
            },
            Schema::Uuid => match value.as_str() {
                Some(text) => {
                    if let Err(e) = uuid::Uuid::parse_str(text) {
                        issues.push(Issue::new(at, format!("invalid uuid: {e}")));
                    }
                }
                None => issues.push(mismatch(at, "uuid string", value)),
            },
        }
    }
}

impl StringSchema {
    fn check(&self, text: &str, at: &str, issues: &mut Issues) {
        let length = text.chars().count();
        if let Some(min) = self.min_length.filter(|min| length < *min) {
            issues.push(Issue::new(at, format!("expected at least {min} characters")));
        }
        if let Some(max) = self.max_length.filter(|max| length > *max) {
            issues.push(Issue::new(at, format!("expected at most {max} characters")));
        }
        if let Some(pattern) = &self.pattern {
            let source = pattern.as_str();
            match pattern.regex() {
                Ok(re) if re.is_match(text) => {}
                Ok(_) => issues.push(Issue::new(at, format!("does not match /{source}/"))),
                Err(e) => issues.push(Issue::new(at, format!("invalid pattern /{source}/: {e}"))),
            }
        }
    }
}

impl NumberSchema {
    fn check(&self, number: f64, at: &str, issues: &mut Issues) {
        if let Some(min) = self.minimum.filter(|min| number < *min) {
            issues.push(Issue::new(at, format!("expected >= {min}")));
        }
        if let Some(max) = self.maximum.filter(|max| number > *max) {
            issues.push(Issue::new(at, format!("expected <= {max}")));
        }
    }
}

/// Any JSON integer, including unsigned values above `i64::MAX`.
fn integer_value(value: &Value) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
}

impl IntegerSchema {
    fn check(&self, number: i128, at: &str, issues: &mut Issues) {
        if let Some(min) = self.minimum.filter(|min| number < i128::from(*min)) {
            issues.push(Issue::new(at, format!("expected >= {min}")));
        }
        if let Some(max) = self.maximum.filter(|max| number > i128::from(*max)) {
            issues.push(Issue::new(at, format!("expected <= {max}")));
        }
    }
}

impl ArraySchema {
    fn check(&self, items: &[Value], at: &str, issues: &mut Issues) {
        if let Some(min) = self.min_items.filter(|min| items.len() < *min) {
            issues.push(Issue::new(at, format!("expected at least {min} items")));
        }
        if let Some(max) = self.max_items.filter(|max| items.len() > *max) {
            issues.push(Issue::new(at, format!("expected at most {max} items")));
        }
        for (i, item) in items.iter().enumerate() {
            self.items.check(item, &path::index(at, i), issues);
        }
    }
}

impl ObjectSchema {
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Add a property that must be present.
    pub fn require(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
        self
    }

    pub fn deny_unknown(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    pub fn build(self) -> Schema {
        Schema::Object(self)
    }

    fn check(&self, fields: &serde_json::Map<String, Value>, at: &str, issues: &mut Issues) {
        for name in &self.required {
            if !fields.contains_key(name) {
                issues.push(Issue::new(path::field(at, name), "required"));
            }
        }
        let mut names: Vec<&String> = fields.keys().collect();
        names.sort();
        for name in names {
            let value = &fields[name];
            match self.properties.get(name) {
                Some(schema) => schema.check(value, &path::field(at, name), issues),
                None if !self.additional_properties => {
                    issues.push(Issue::new(path::field(at, name), "unexpected property"));
                }
                None => {}
            }
        }
    }
}

impl From<ObjectSchema> for Schema {
    fn from(schema: ObjectSchema) -> Self {
        Schema::Object(schema)
    }
}

fn mismatch(at: &str, expected: &str, found: &Value) -> Issue {
    Issue::new(at, format!("expected {expected}, found {}", type_name(found)))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Validator for Schema {
    type Output = Value;

    fn validate(&self, raw: &Value) -> Result<Value, Issues> {
        let issues = self.issues(raw);
        if issues.is_empty() {
            Ok(raw.clone())
        } else {
            Err(issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn movie() -> Schema {
        Schema::object()
            .require("title", Schema::string())
            .require(
                "runtimeMinutes",
                Schema::Integer(IntegerSchema {
                    minimum: Some(1),
                    maximum: None,
                }),
            )
            .property("rating", Schema::pattern("^(G|PG|PG-13|R|NC-17)$"))
            .property("releasedAt", Schema::nullable(Schema::DateTime))
            .build()
    }

    #[test]
    fn accepts_matching_payload_and_returns_it() {
        let payload = json!({
            "title": "Arrival",
            "runtimeMinutes": 116,
            "rating": "PG-13",
            "releasedAt": "2016-11-11T00:00:00Z"
        });
        assert_eq!(movie().validate(&payload), Ok(payload.clone()));
    }

    #[test]
    fn collects_every_issue_with_paths() {
        let payload = json!({
            "runtimeMinutes": 0,
            "rating": "PG13",
            "releasedAt": "yesterday"
        });
        let issues = movie().validate(&payload).expect_err("invalid movie");
        let paths: Vec<&str> = issues.iter().map(|issue| issue.path.as_str()).collect();
        // Missing required fields first, then present fields by name.
        assert_eq!(
            paths,
            vec!["$.title", "$.rating", "$.releasedAt", "$.runtimeMinutes"]
        );
    }

    #[test]
    fn array_items_are_checked_by_index() {
        let seats = Schema::array(
            Schema::object()
                .require("row", Schema::pattern("^[A-Z]$"))
                .require("number", Schema::integer())
                .deny_unknown()
                .build(),
        );
        let issues = seats.issues(&json!([
            {"row": "A", "number": 1},
            {"row": "b", "number": "2", "vip": true}
        ]));
        insta::assert_json_snapshot!(issues, @r###"
        [
          {
            "path": "$[1].number",
            "message": "expected integer, found string"
          },
          {
            "path": "$[1].row",
            "message": "does not match /^[A-Z]$/"
          },
          {
            "path": "$[1].vip",
            "message": "unexpected property"
          }
        ]
        "###);
    }

    #[test]
    fn type_mismatch_at_root() {
        let issues = Schema::array(Schema::Any).issues(&json!({"notAnArray": true}));
        assert_eq!(issues.to_string(), "$: expected array, found object");
    }

    #[test]
    fn one_of_and_identifiers() {
        let id = Schema::one_of([Schema::Uuid, Schema::integer()]);
        assert!(id.issues(&json!("67e55044-10b1-426f-9247-bb680e5fe0c8")).is_empty());
        assert!(id.issues(&json!(42)).is_empty());
        assert_eq!(id.issues(&json!("seat-12")).len(), 1);
    }

    #[test]
    fn integers_beyond_signed_range_are_integers() {
        assert!(Schema::integer().issues(&json!(u64::MAX)).is_empty());
        assert!(Schema::integer().issues(&json!(i64::MIN)).is_empty());

        let capped = Schema::Integer(IntegerSchema {
            minimum: None,
            maximum: Some(i64::MAX),
        });
        assert_eq!(
            capped.issues(&json!(u64::MAX)).to_string(),
            format!("$: expected <= {}", i64::MAX)
        );
        assert_eq!(
            Schema::integer().issues(&json!(1.5)).to_string(),
            "$: expected integer, found number"
        );
    }

    #[test]
    fn pattern_compiles_once_and_survives_round_trip() {
        let pattern = Pattern::new("^[A-Z]$");
        let first = pattern.regex().expect("valid pattern");
        let second = pattern.regex().expect("valid pattern");
        assert!(std::ptr::eq(first, second));

        let schema: Schema =
            serde_json::from_value(json!({"type": "string", "pattern": "^[A-Z]$"}))
                .expect("schema parses");
        assert_eq!(schema, Schema::pattern("^[A-Z]$"));
        assert_eq!(
            serde_json::to_value(&schema).expect("schema serializes"),
            json!({"type": "string", "pattern": "^[A-Z]$"})
        );
    }

    #[test]
    fn invalid_pattern_is_reported_not_panicked() {
        let issues = Schema::pattern("(").issues(&json!("x"));
        assert_eq!(issues.len(), 1);
        assert!(issues.as_slice()[0].message.starts_with("invalid pattern"));
    }

    #[test]
    fn schema_loads_from_json() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "minLength": 1},
                "credits": {"type": "array", "items": {"type": "any"}}
            },
            "required": ["title", "credits"]
        }))
        .expect("schema parses");
        assert!(schema.issues(&json!({"title": "Arrival", "credits": []})).is_empty());
        assert_eq!(
            schema.issues(&json!({"title": ""})).to_string(),
            "$.credits: required; $.title: expected at least 1 characters"
        );
    }
}
