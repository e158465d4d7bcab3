use log::{debug, info};
use serde_json::Value;
use std::{
    collections::HashSet,
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::error::{MergeError, Result};
use crate::models::{Info, SwaggerDoc, SwaggerFragment};
use crate::parser;

/// Method keys counted as operations in the summary
const COUNTED_METHODS: [&str; 5] = ["get", "post", "put", "delete", "patch"];

/// Shared metadata stamped on the merged document
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub title: String,
    pub description: String,
    pub host: String,
    pub version: String,
    /// operationIds that get `security: []` in the output
    pub public_operations: HashSet<String>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            host: "localhost:8080".to_string(),
            version: "1.0.0".to_string(),
            public_operations: HashSet::new(),
        }
    }
}

/// One complete merge run
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub input_pattern: String,
    pub output: PathBuf,
    pub options: MergeOptions,
}

/// Counts reported after a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub paths: usize,
    pub operations: usize,
    pub definitions: usize,
    pub tags: usize,
    /// Only present when a public-operations set was supplied
    pub public_operations: Option<usize>,
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Merged {} paths, {} operations, {} definitions, {} tags",
            self.paths, self.operations, self.definitions, self.tags
        )?;
        if let Some(public) = self.public_operations {
            write!(f, "\nPublic operations (no auth): {}", public)?;
        }
        Ok(())
    }
}

/// Folds Swagger fragments into a single document.
///
/// Tags and definitions keep the first occurrence of a name, while a
/// path/method pair takes the operation from the last fragment defining it.
pub struct Merger {
    doc: SwaggerDoc,
    public_operations: HashSet<String>,
    seen_tags: HashSet<String>,
}

impl Merger {
    /// Create a merger holding the base document
    pub fn new(options: MergeOptions) -> Self {
        let info = Info {
            title: options.title,
            version: options.version,
            description: options.description,
        };

        Self {
            doc: SwaggerDoc::base(info, options.host),
            public_operations: options.public_operations,
            seen_tags: HashSet::new(),
        }
    }

    /// Fold one fragment into the document
    pub fn merge_fragment(&mut self, fragment: SwaggerFragment) {
        for tag in fragment.tags {
            if self.seen_tags.insert(tag.name.clone()) {
                self.doc.tags.push(tag);
            } else {
                debug!("Dropping duplicate tag: {}", tag.name);
            }
        }

        for (path, methods) in fragment.paths {
            let entry = self.doc.paths.entry(path).or_default();
            for (method, mut operation) in methods {
                if is_public(&self.public_operations, &operation) {
                    if let Some(op) = operation.as_object_mut() {
                        op.insert("security".to_string(), Value::Array(Vec::new()));
                        debug!("Marked {} as public", method);
                    }
                }
                entry.insert(method, operation);
            }
        }

        for (name, definition) in fragment.definitions {
            if self.doc.definitions.contains_key(&name) {
                debug!("Keeping first definition of {}", name);
                continue;
            }
            self.doc.definitions.insert(name, definition);
        }
    }

    /// Counts for the document as merged so far
    pub fn summary(&self) -> MergeSummary {
        let operations = self
            .doc
            .paths
            .values()
            .flat_map(|methods| methods.keys())
            .filter(|method| COUNTED_METHODS.contains(&method.as_str()))
            .count();

        let public_operations = if self.public_operations.is_empty() {
            None
        } else {
            Some(
                self.doc
                    .paths
                    .values()
                    .flat_map(|methods| methods.values())
                    .filter(|op| has_empty_security(op))
                    .count(),
            )
        };

        MergeSummary {
            paths: self.doc.paths.len(),
            operations,
            definitions: self.doc.definitions.len(),
            tags: self.doc.tags.len(),
            public_operations,
        }
    }

    pub fn document(&self) -> &SwaggerDoc {
        &self.doc
    }

    pub fn into_document(self) -> SwaggerDoc {
        self.doc
    }
}

fn is_public(public_operations: &HashSet<String>, operation: &Value) -> bool {
    operation
        .get("operationId")
        .and_then(Value::as_str)
        .map(|id| public_operations.contains(id))
        .unwrap_or(false)
}

fn has_empty_security(operation: &Value) -> bool {
    matches!(operation.get("security"), Some(Value::Array(items)) if items.is_empty())
}

/// Write the document as pretty-printed JSON, replacing any existing file
pub fn write_document(doc: &SwaggerDoc, output: impl AsRef<Path>) -> Result<()> {
    let output = output.as_ref();

    // Serialize before touching the filesystem so a failure leaves nothing behind
    let json = serde_json::to_string_pretty(doc)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| MergeError::OutputWrite {
            path: output.to_path_buf(),
            source,
        })?;
    }

    fs::write(output, json).map_err(|source| MergeError::OutputWrite {
        path: output.to_path_buf(),
        source,
    })?;

    debug!("Wrote merged document to {:?}", output);
    Ok(())
}

/// Resolve, fold and write in one go. Nothing is written unless every
/// input parsed.
pub fn merge(config: &MergeConfig) -> Result<MergeSummary> {
    let files = parser::resolve_pattern(&config.input_pattern)?;
    if files.is_empty() {
        return Err(MergeError::NoMatchingFiles(config.input_pattern.clone()));
    }
    info!("Found {} swagger file(s)", files.len());

    let mut merger = Merger::new(config.options.clone());
    for file in &files {
        debug!("Merging {:?}", file);
        let fragment = parser::parse_fragment(file)?;
        merger.merge_fragment(fragment);
    }

    let summary = merger.summary();
    write_document(merger.document(), &config.output)?;
    Ok(summary)
}
