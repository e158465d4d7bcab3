use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

use crate::error::{MergeError, Result};
use crate::models::SwaggerFragment;

static GLOB_META_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[*?\[]").unwrap());

/// Matches a single file or directory name against one glob component
#[derive(Debug)]
struct ComponentMatcher {
    // None when the component contains a class that matches no character
    regex: Option<Regex>,
    // Wildcards only match dot-files when the component itself starts with '.'
    allow_hidden: bool,
}

impl ComponentMatcher {
    fn new(pattern: &str, component: &str) -> Result<Self> {
        let regex = component_to_regex(component)
            .map(|source| Regex::new(&source))
            .transpose()
            .map_err(|e| MergeError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            regex,
            allow_hidden: component.starts_with('.'),
        })
    }

    fn matches(&self, name: &str) -> bool {
        if name.starts_with('.') && !self.allow_hidden {
            return false;
        }
        self.regex.as_ref().map_or(false, |regex| regex.is_match(name))
    }
}

fn has_magic(component: &str) -> bool {
    GLOB_META_REGEX.is_match(component)
}

/// Translate the inside of a `[...]` class. Reversed ranges such as `z-a`
/// are dropped; returns None when nothing is left to match.
fn class_to_regex(body: &[char]) -> Option<String> {
    let (negated, body) = match body.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut members = String::new();
    let mut i = 0;
    while i < body.len() {
        if i + 2 < body.len() && body[i + 1] == '-' {
            let (start, end) = (body[i], body[i + 2]);
            if start <= end {
                members.push_str(&regex::escape(&start.to_string()));
                members.push('-');
                members.push_str(&regex::escape(&end.to_string()));
            }
            i += 3;
        } else {
            members.push_str(&regex::escape(&body[i].to_string()));
            i += 1;
        }
    }

    match (members.is_empty(), negated) {
        (true, false) => None,
        (true, true) => Some(".".to_string()),
        (false, false) => Some(format!("[{}]", members)),
        (false, true) => Some(format!("[^{}]", members)),
    }
}

/// Translate one glob component (no '/') into an anchored regex, or None
/// when the component can never match
fn component_to_regex(component: &str) -> Option<String> {
    let chars: Vec<char> = component.chars().collect();
    let mut out = String::from("(?s)^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push_str(".*");
                i += 1;
            }
            '?' => {
                out.push('.');
                i += 1;
            }
            '[' => {
                let mut j = i + 1;
                if j < chars.len() && chars[j] == '!' {
                    j += 1;
                }
                // A ']' right after the opening bracket is a literal member
                if j < chars.len() && chars[j] == ']' {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }

                if j >= chars.len() {
                    // Unterminated class, treat the bracket literally
                    out.push_str(r"\[");
                    i += 1;
                    continue;
                }

                out.push_str(&class_to_regex(&chars[i + 1..j])?);
                i = j + 1;
            }
            c => {
                out.push_str(&regex::escape(&c.to_string()));
                i += 1;
            }
        }
    }

    out.push('$');
    Some(out)
}

/// Resolve a shell-style glob into the sorted list of matching files.
///
/// Leading components without wildcards form the directory that is walked;
/// every remaining component matches exactly one level below it.
pub fn resolve_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let components: Vec<&str> = pattern.split('/').filter(|c| !c.is_empty()).collect();
    let split = components
        .iter()
        .position(|c| has_magic(c))
        .unwrap_or(components.len());

    let mut root = if pattern.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };
    for component in &components[..split] {
        root.push(component);
    }

    let rest = &components[split..];
    if rest.is_empty() {
        debug!("Pattern has no wildcards, checking {:?} directly", root);
        return Ok(if root.is_file() { vec![root] } else { Vec::new() });
    }

    let matchers = rest
        .iter()
        .map(|component| ComponentMatcher::new(pattern, component))
        .collect::<Result<Vec<_>>>()?;

    let implicit_root = root.as_os_str().is_empty();
    let walk_root = if implicit_root { Path::new(".") } else { root.as_path() };
    debug!("Walking {:?} {} level(s) deep", walk_root, matchers.len());

    let mut files: Vec<PathBuf> = WalkDir::new(walk_root)
        .follow_links(true)
        .min_depth(1)
        .max_depth(matchers.len())
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || matchers[entry.depth() - 1].matches(&entry.file_name().to_string_lossy())
        })
        .filter_map(|e| e.ok())
        .filter(|entry| entry.depth() == matchers.len() && entry.path().is_file())
        .map(|entry| {
            let path = entry.into_path();
            if implicit_root {
                path.strip_prefix(".").map(Path::to_path_buf).unwrap_or(path)
            } else {
                path
            }
        })
        .collect();

    files.sort_by_key(|path| path.to_string_lossy().into_owned());
    Ok(files)
}

/// Read and decode one generated Swagger 2.0 file
pub fn parse_fragment(path: impl AsRef<Path>) -> Result<SwaggerFragment> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| MergeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| MergeError::MalformedInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Split a comma separated operationId list, dropping blank entries
pub fn parse_public_operations(list: &str) -> HashSet<String> {
    list.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
