//! Issue paths: `$`, `$.title`, `$.seats[3]`, `$["screen no"]`.

pub use marquee_kernel::validator::ROOT_PATH;

pub fn field(parent: &str, name: &str) -> String {
    if is_identifier(name) {
        format!("{parent}.{name}")
    } else {
        format!("{parent}[{}]", serde_json::Value::String(name.to_string()))
    }
}

pub fn index(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_dotted_and_bracketed_paths() {
        assert_eq!(field(ROOT_PATH, "title"), "$.title");
        assert_eq!(index(&field(ROOT_PATH, "seats"), 3), "$.seats[3]");
        assert_eq!(field(ROOT_PATH, "screen no"), "$[\"screen no\"]");
        assert_eq!(field(ROOT_PATH, "3d"), "$[\"3d\"]");
    }
}
