//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use pathvault_entity::file::FileRecord;
use pathvault_entity::folder::FolderNode;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One record as a table row
#[derive(Debug, Serialize, Tabled)]
pub struct RecordRow {
    /// Record ID
    pub id: String,
    /// "dir" or "file"
    pub kind: &'static str,
    /// Full path
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type
    pub mime: String,
    /// Last update
    pub updated: String,
}

impl From<&FileRecord> for RecordRow {
    fn from(record: &FileRecord) -> Self {
        Self {
            id: record.id.to_string(),
            kind: if record.is_folder { "dir" } else { "file" },
            path: record.full_path(),
            size: record.size_in_bytes,
            mime: record.mime_type.clone().unwrap_or_default(),
            updated: record.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{item:#?}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print a record as key-value pairs or JSON
pub fn print_record(record: &FileRecord, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            print_kv("id", &record.id.to_string());
            print_kv("path", &record.full_path());
            print_kv("type", if record.is_folder { "folder" } else { "file" });
            print_kv("size", &record.size_in_bytes.to_string());
            print_kv("mime", record.mime_type.as_deref().unwrap_or("-"));
            print_kv("source", record.file_source.as_deref().unwrap_or("-"));
            print_kv("namespace", record.namespace.as_deref().unwrap_or("-"));
            print_kv("created", &record.created_at.to_rfc3339());
            print_kv("updated", &record.updated_at.to_rfc3339());
        }
        OutputFormat::Json => print_item(record, format),
    }
}

/// Render a folder tree with box-drawing guides.
pub fn render_tree(root: &FolderNode) -> String {
    let mut out = String::from("/\n");
    render_children(&root.children, "", &mut out);
    out
}

fn render_children(children: &[FolderNode], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        out.push_str(&child.name);
        out.push('\n');
        let nested = format!("{prefix}{}", if last { "    " } else { "│   " });
        render_children(&child.children, &nested, out);
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<12} {}", format!("{key}:"), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, path: &str, children: Vec<FolderNode>) -> FolderNode {
        FolderNode {
            name: name.into(),
            path: path.into(),
            children,
        }
    }

    #[test]
    fn test_render_tree() {
        let mut root = FolderNode::root();
        root.children = vec![
            node("docs", "/docs/", vec![node("sub", "/docs/sub/", vec![])]),
            node("media", "/media/", vec![]),
        ];
        assert_eq!(
            render_tree(&root),
            "/\n├── docs\n│   └── sub\n└── media\n"
        );
    }

    #[test]
    fn test_render_empty_tree() {
        assert_eq!(render_tree(&FolderNode::root()), "/\n");
    }
}
