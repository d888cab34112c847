//! Frontmatter parsing shared by skill and agent manifests
//!
//! A manifest is a markdown file opening with a YAML block delimited by
//! `---` lines. The YAML carries the entry metadata; the remaining body is
//! free-form instructional text consumed by the model runtime, not parsed
//! here.

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::de::DeserializeOwned;

/// Maximum allowed name length
pub(crate) const MAX_NAME_LENGTH: usize = 64;
/// Maximum allowed description length
pub(crate) const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Split manifest content into parsed frontmatter metadata and body text.
pub fn parse_front_matter<T: DeserializeOwned>(content: &str) -> Result<(T, String)> {
    let frontmatter_re = Regex::new(r"^---\s*\n([\s\S]*?)\n---\s*\n?([\s\S]*)$")
        .map_err(|e| anyhow!("Failed to compile regex: {}", e))?;

    let captures = frontmatter_re
        .captures(content)
        .ok_or_else(|| anyhow!("No valid YAML frontmatter found"))?;

    let yaml_str = captures
        .get(1)
        .ok_or_else(|| anyhow!("Failed to extract frontmatter"))?
        .as_str();

    let body = captures.get(2).map(|m| m.as_str()).unwrap_or("");

    let metadata: T =
        serde_yaml::from_str(yaml_str).with_context(|| "Failed to parse YAML frontmatter")?;

    Ok((metadata, body.to_string()))
}

/// Validate an entry name: non-empty, lowercase letters, digits, hyphens.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow!("Entry name cannot be empty"));
    }

    if name.len() > MAX_NAME_LENGTH {
        tracing::warn!(
            "Entry name '{}' exceeds {} characters (was {}), may be truncated",
            name,
            MAX_NAME_LENGTH,
            name.len()
        );
    }

    let name_re = Regex::new(r"^[a-z0-9-]+$")
        .map_err(|e| anyhow!("Failed to compile name validation regex: {}", e))?;

    if !name_re.is_match(name) {
        return Err(anyhow!(
            "Entry name '{}' must contain only lowercase letters, numbers, and hyphens",
            name
        ));
    }

    Ok(())
}

/// Validate an entry description: non-empty, length warning past the cap.
pub(crate) fn validate_description(name: &str, description: &str) -> Result<()> {
    if description.is_empty() {
        return Err(anyhow!("Description for '{}' cannot be empty", name));
    }

    if description.len() > MAX_DESCRIPTION_LENGTH {
        tracing::warn!(
            "'{}' description exceeds {} characters (was {}), may be truncated",
            name,
            MAX_DESCRIPTION_LENGTH,
            description.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Meta {
        name: String,
        description: String,
    }

    #[test]
    fn test_parse_front_matter() {
        let content = r#"---
name: code-reviewer
description: Reviews code for best practices and security.
---

# Code Reviewer

This skill helps review code.
"#;

        let (meta, body): (Meta, String) = parse_front_matter(content).unwrap();
        assert_eq!(meta.name, "code-reviewer");
        assert_eq!(
            meta.description,
            "Reviews code for best practices and security."
        );
        assert!(body.contains("# Code Reviewer"));
    }

    #[test]
    fn test_missing_front_matter_is_error() {
        let result: Result<(Meta, String)> = parse_front_matter("# Just a heading\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_name_is_error() {
        let content = "---\ndescription: no name here\n---\nbody\n";
        let result: Result<(Meta, String)> = parse_front_matter(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("valid-skill-name").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("Invalid_Name").is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("x", "A valid description").is_ok());
        assert!(validate_description("x", "").is_err());
    }
}
