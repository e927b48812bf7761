//! YAML front matter extraction.
//!
//! A file starts with front matter when its first line is `---`. The block
//! runs until the next line that is exactly `---` (or `...`); everything
//! after it is the body.

use crate::data::DataBag;

/// Error returned when a front matter block is not a valid YAML mapping.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// YAML syntax error or non-mapping document.
    #[error("Invalid front matter: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Split content into front matter YAML and body.
///
/// Returns `None` when the content has no (terminated) front matter block.
pub(crate) fn split(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == "---" || trimmed == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

/// Parse a front matter block into a data bag.
///
/// An empty block yields an empty bag.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or not a mapping.
pub(crate) fn parse(yaml: &str) -> Result<DataBag, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(DataBag::new());
    }
    let map: serde_json::Map<String, serde_json::Value> = serde_yaml::from_str(yaml)?;
    Ok(DataBag::from(map))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_split_front_matter() {
        let content = "---\ntitle: Hello\norder: 2\n---\n# Body\n";
        let (yaml, body) = split(content).unwrap();
        assert_eq!(yaml, "title: Hello\norder: 2\n");
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_split_crlf() {
        let content = "---\r\ntitle: Hello\r\n---\r\nBody";
        let (yaml, body) = split(content).unwrap();
        assert_eq!(yaml, "title: Hello\r\n");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_without_front_matter() {
        assert!(split("# Just markdown\n").is_none());
        assert!(split("").is_none());
    }

    #[test]
    fn test_split_unterminated_block() {
        assert!(split("---\ntitle: Hello\n# Body\n").is_none());
    }

    #[test]
    fn test_split_dots_terminator() {
        let (yaml, body) = split("---\ntitle: A\n...\nrest").unwrap();
        assert_eq!(yaml, "title: A\n");
        assert_eq!(body, "rest");
    }

    #[test]
    fn test_parse_mapping() {
        let bag = parse("title: Foo Section\norder: 3\ntags: [a, b]\n").unwrap();
        assert_eq!(bag.get("title"), Some(&json!("Foo Section")));
        assert_eq!(bag.get("order"), Some(&json!(3)));
        assert_eq!(bag.get("tags"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn test_parse_empty_block() {
        assert!(parse("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_mapping() {
        let err = parse("- one\n- two\n").unwrap_err();
        assert!(err.to_string().contains("Invalid front matter"));
    }
}
