//! `#include` expansion.
//!
//! Operates line-by-line on the raw text, replacing each include line with
//! the full text of the referenced file (expanded recursively, fixed
//! point). The file loader is an injected trait object so tests can supply
//! an in-memory map instead of touching the filesystem.

use std::path::{Path, PathBuf};

use crate::error::{FhiclError, FhiclResult};

pub trait FileLoader {
    fn load(&self, filename: &str) -> FhiclResult<String>;
}

/// Loads includes from the real filesystem, relative to a fixed base
/// directory (the directory containing the top-level input file, or the
/// current working directory for stdin input).
pub struct FsLoader {
    base_dir: PathBuf,
}

impl FsLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn cwd() -> Self {
        Self { base_dir: PathBuf::new() }
    }
}

impl Default for FsLoader {
    fn default() -> Self {
        Self::cwd()
    }
}

impl FileLoader for FsLoader {
    fn load(&self, filename: &str) -> FhiclResult<String> {
        let path: &Path = Path::new(filename);
        let resolved = if path.is_absolute() { path.to_path_buf() } else { self.base_dir.join(path) };
        std::fs::read_to_string(&resolved)
            .map_err(|e| FhiclError::invalid_include(format!("cannot read '{}': {e}", resolved.display())))
    }
}

pub fn expand(text: &str, loader: &dyn FileLoader) -> FhiclResult<String> {
    let mut stack = Vec::new();
    expand_with_stack(text, loader, &mut stack)
}

fn expand_with_stack(text: &str, loader: &dyn FileLoader, stack: &mut Vec<String>) -> FhiclResult<String> {
    let mut out = String::with_capacity(text.len());
    for line in text.split('\n') {
        log::trace!("preprocessor: scanning line {line:?}");
        if line.starts_with("#include") {
            let filename = parse_include_line(line)?;
            log::debug!("preprocessor: expanding include '{filename}'");
            if stack.iter().any(|f| f == &filename) {
                let mut cycle = stack.clone();
                cycle.push(filename.clone());
                return Err(FhiclError::invalid_include(format!(
                    "include cycle: {}",
                    cycle.join(" -> ")
                )));
            }
            let included = loader.load(&filename)?;
            stack.push(filename.clone());
            let expanded = expand_with_stack(&included, loader, stack)?;
            stack.pop();
            out.push_str(&expanded);
            out.push('\n');
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }
    Ok(out)
}

/// Requires the exact shape `#include` + one-or-more spaces + a
/// double-quoted filename, with nothing but trailing whitespace after the
/// closing quote.
fn parse_include_line(line: &str) -> FhiclResult<String> {
    let rest = line.strip_prefix("#include").expect("caller checked prefix");
    let after_spaces = rest.trim_start_matches(' ');
    let consumed_spaces = rest.len() - after_spaces.len();
    if consumed_spaces == 0 {
        return Err(FhiclError::invalid_include(format!("malformed #include line: {line:?}")));
    }
    if !after_spaces.starts_with('"') {
        return Err(FhiclError::invalid_include(format!("missing quoted filename: {line:?}")));
    }
    let body = &after_spaces[1..];
    let close = body.find('"').ok_or_else(|| {
        FhiclError::invalid_include(format!("unterminated quoted filename: {line:?}"))
    })?;
    let filename = &body[..close];
    let trailing = body[close + 1..].trim();
    if !trailing.is_empty() {
        return Err(FhiclError::invalid_include(format!("trailing content after filename: {line:?}")));
    }
    if filename.is_empty() {
        return Err(FhiclError::invalid_include("empty filename in #include"));
    }
    Ok(filename.to_string())
}
