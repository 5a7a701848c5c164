//! Lineage rendering
//!
//! Pure formatting of a [`Lineage`]; no traversal logic lives here.
//!
//! Tree format, one line per entry:
//!
//! ```text
//! - Pod/web-abc123-xyz
//!   - ReplicaSet/web-abc123
//!     - Deployment/web
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::lineage::{Lineage, LineageEntry, TraceOutcome};

/// Marker line closing a cancelled traversal's tree
pub const PARTIAL_MARKER: &str = "# partial result: traversal cancelled";

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented lineage tree
    #[default]
    Tree,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tree" => Ok(OutputFormat::Tree),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(anyhow::anyhow!("Unknown output format: {}", s)),
        }
    }
}

/// Render `lineage` in `format`
pub fn render(lineage: &Lineage, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Tree => Ok(render_tree(lineage)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&LineageDocument::from(lineage))
                .context("Failed to serialize lineage to JSON")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => serde_yaml::to_string(&LineageDocument::from(lineage))
            .context("Failed to serialize lineage to YAML"),
    }
}

/// Render the indented text tree
pub fn render_tree(lineage: &Lineage) -> String {
    let mut out = String::new();
    for entry in &lineage.entries {
        out.push_str(&tree_line(entry));
        out.push('\n');
    }
    if lineage.outcome == TraceOutcome::Partial {
        out.push_str(PARTIAL_MARKER);
        out.push('\n');
    }
    out
}

/// `"  " * depth + "- " + kind + "/" + name`, with unresolved branches annotated
pub fn tree_line(entry: &LineageEntry) -> String {
    let indent = "  ".repeat(entry.depth());
    match entry {
        LineageEntry::Object(node) => {
            format!("{}- {}/{}", indent, node.identity.kind, node.identity.name)
        }
        LineageEntry::Unresolved(branch) => format!(
            "{}- {}/{} [unresolved: {}]",
            indent,
            branch.kind,
            branch.name.as_deref().unwrap_or("*"),
            branch.error
        ),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LineageDocument<'a> {
    complete: bool,
    entries: Vec<EntryDocument<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryDocument<'a> {
    depth: usize,
    direction: &'static str,
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uid: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a Lineage> for LineageDocument<'a> {
    fn from(lineage: &'a Lineage) -> Self {
        Self {
            complete: lineage.is_complete(),
            entries: lineage.entries.iter().map(EntryDocument::from).collect(),
        }
    }
}

impl<'a> From<&'a LineageEntry> for EntryDocument<'a> {
    fn from(entry: &'a LineageEntry) -> Self {
        let uid = match entry {
            LineageEntry::Object(node) => node.identity.uid.as_deref(),
            LineageEntry::Unresolved(_) => None,
        };
        Self {
            depth: entry.depth(),
            direction: entry.direction().as_str(),
            kind: entry.kind(),
            name: entry.name(),
            uid,
            error: entry.error().map(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LineageError;
    use crate::lineage::Direction;
    use crate::models::ObjectIdentity;

    fn lineage(entries: Vec<LineageEntry>, outcome: TraceOutcome) -> Lineage {
        Lineage { entries, outcome }
    }

    #[test]
    fn test_tree_indents_two_spaces_per_level() {
        let l = lineage(
            vec![
                LineageEntry::object(ObjectIdentity::new("Pod", "a"), 0, Direction::Dependent),
                LineageEntry::object(
                    ObjectIdentity::new("ReplicaSet", "b"),
                    1,
                    Direction::Dependent,
                ),
                LineageEntry::object(ObjectIdentity::new("Deployment", "c"), 2, Direction::Target),
            ],
            TraceOutcome::Complete,
        );
        assert_eq!(
            render_tree(&l),
            "- Pod/a\n  - ReplicaSet/b\n    - Deployment/c\n"
        );
    }

    #[test]
    fn test_unresolved_kind_listing_renders_wildcard() {
        let entry = LineageEntry::unresolved(
            "Job",
            None,
            1,
            Direction::Dependent,
            LineageError::AccessDenied {
                kind: "Job".to_string(),
                message: "forbidden".to_string(),
            },
        );
        assert_eq!(
            tree_line(&entry),
            "  - Job/* [unresolved: Access denied listing Job: forbidden]"
        );
    }

    #[test]
    fn test_partial_marker() {
        let l = lineage(
            vec![LineageEntry::object(
                ObjectIdentity::new("Pod", "a"),
                0,
                Direction::Dependent,
            )],
            TraceOutcome::Partial,
        );
        assert!(render_tree(&l).ends_with(&format!("{}\n", PARTIAL_MARKER)));
    }

    #[test]
    fn test_json_document() {
        let l = lineage(
            vec![LineageEntry::object(
                ObjectIdentity::new("Pod", "orphan").with_uid("u1"),
                0,
                Direction::Target,
            )],
            TraceOutcome::Complete,
        );
        let json = render(&l, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["complete"], true);
        assert_eq!(value["entries"][0]["direction"], "self");
        assert_eq!(value["entries"][0]["uid"], "u1");
        assert!(value["entries"][0].get("error").is_none());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
