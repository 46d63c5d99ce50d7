//! Whitebox architecture discovery from a codebase directory
//!
//! Walks the tree, asks the completion backend which of a fixed catalogue of
//! web-application component kinds each eligible file shows evidence of,
//! renders the merged findings into one long-form summary, and hands that
//! summary to the ordinary architecture extractor as if it were a
//! user-supplied description.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use domain::entities::Architecture;
use serde_json::json;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::error::ApplicationError;
use crate::ports::{CompletionCall, CompletionPort};
use crate::prompts::{CHUNK_ANALYSIS_SYSTEM_PROMPT, FILE_ANALYSIS_SYSTEM_PROMPT};
use crate::response_parser;
use crate::services::architecture_extractor::ArchitectureExtractor;

/// Hard cap on analyzed files; eligible files beyond it are silently skipped
pub const MAX_FILES: usize = 30;

/// Character threshold above which a file is analyzed in chunks
pub const CHUNK_SIZE: usize = 3000;

/// File-analysis sampling temperature
const SCAN_TEMPERATURE: f32 = 0.2;

/// Fixed catalogue of component kinds the scan looks for; deliberately
/// generic web-app vocabulary, never derived from the target codebase
pub const COMPONENT_CATALOGUE: [&str; 20] = [
    "entry points",
    "routes",
    "config",
    "package.json",
    "directory structure",
    "controllers",
    "models",
    "middleware",
    "migrations",
    "docker files",
    "components",
    "services",
    "auth",
    "database",
    "api",
    "utils",
    "views",
    "assets",
    "tests",
    "schemas",
];

const SOURCE_EXTENSIONS: [&str; 8] = ["js", "ts", "py", "php", "rb", "go", "java", "rs"];
const CONFIG_EXTENSIONS: [&str; 6] = ["json", "yaml", "yml", "env", "config", "toml"];
const FRONTEND_EXTENSIONS: [&str; 5] = ["html", "jsx", "tsx", "vue", "css"];
const DOC_EXTENSIONS: [&str; 2] = ["md", "txt"];
const INFRA_FILENAMES: [&str; 2] = ["Dockerfile", "docker-compose.yml"];

/// Directories never descended into
const PRUNED_DIRS: [&str; 4] = ["node_modules", "venv", "__pycache__", ".git"];

/// Findings for one file: catalogue component name -> description
type FileFindings = HashMap<String, String>;

/// Scan-wide findings per catalogue entry, keeping file scan order
type CatalogueFindings = HashMap<&'static str, Vec<(String, String)>>;

/// Scanner turning a directory tree into an architecture
pub struct WhiteboxScanner {
    completion: Arc<dyn CompletionPort>,
    extractor: ArchitectureExtractor,
}

impl fmt::Debug for WhiteboxScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhiteboxScanner").finish_non_exhaustive()
    }
}

impl WhiteboxScanner {
    pub fn new(completion: Arc<dyn CompletionPort>) -> Self {
        let extractor = ArchitectureExtractor::new(Arc::clone(&completion));
        Self {
            completion,
            extractor,
        }
    }

    /// Scan a codebase and extract its architecture
    #[instrument(skip(self), fields(root = %root.display()))]
    pub async fn scan(
        &self,
        root: &Path,
        model: Option<&str>,
    ) -> Result<Architecture, ApplicationError> {
        let summary = self.build_summary(root, model).await;
        self.extractor.extract(&summary, model).await
    }

    /// Walk the tree, analyze eligible files, and render the aggregate
    /// summary used as the architecture description
    pub async fn build_summary(&self, root: &Path, model: Option<&str>) -> String {
        let files = collect_files(root);
        info!(count = files.len(), "Scanning eligible files");

        let mut findings: CatalogueFindings = HashMap::new();
        for path in files {
            let file_findings = self.analyze_file(&path, model).await;
            merge_file_findings(&mut findings, &path, file_findings);
        }

        render_summary(&findings)
    }

    /// Analyze one file, chunking when it exceeds the size threshold.
    /// Failures are logged and yield no findings; the scan always continues.
    async fn analyze_file(&self, path: &Path, model: Option<&str>) -> FileFindings {
        let content = match tokio::fs::read(path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read file, skipping");
                return FileFindings::new();
            }
        };

        if content.chars().count() <= CHUNK_SIZE {
            self.analyze_single(path, &content, model).await
        } else {
            self.analyze_chunked(path, &content, model).await
        }
    }

    async fn analyze_single(
        &self,
        path: &Path,
        content: &str,
        model: Option<&str>,
    ) -> FileFindings {
        let prompt = json!({
            "file_path": path.display().to_string(),
            "file_content": content,
            "component_names": COMPONENT_CATALOGUE.join(", "),
        })
        .to_string();

        let response = match self
            .completion
            .complete(
                CompletionCall::new(prompt, FILE_ANALYSIS_SYSTEM_PROMPT)
                    .with_temperature(SCAN_TEMPERATURE)
                    .with_model(model),
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "File analysis call failed, skipping");
                return FileFindings::new();
            }
        };

        parse_findings(&response)
    }

    /// Chunked analysis: each chunk call also carries the findings gathered
    /// so far for the file, so later chunks extend rather than repeat
    async fn analyze_chunked(
        &self,
        path: &Path,
        content: &str,
        model: Option<&str>,
    ) -> FileFindings {
        let chunks = split_chunks(content);
        let total = chunks.len();
        let mut accumulated = FileFindings::new();

        for (index, chunk) in chunks.into_iter().enumerate() {
            let previous = serde_json::to_string(&accumulated).unwrap_or_else(|_| "{}".to_string());
            let prompt = json!({
                "file_path": path.display().to_string(),
                "chunk_number": index + 1,
                "total_chunks": total,
                "file_content": chunk,
                "component_names": COMPONENT_CATALOGUE.join(", "),
                "previous_findings": previous,
            })
            .to_string();

            let response = match self
                .completion
                .complete(
                    CompletionCall::new(prompt, CHUNK_ANALYSIS_SYSTEM_PROMPT)
                        .with_temperature(SCAN_TEMPERATURE)
                        .with_model(model),
                )
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        chunk = index + 1,
                        error = %e,
                        "Chunk analysis call failed, skipping chunk"
                    );
                    continue;
                }
            };

            merge_chunk_findings(&mut accumulated, parse_findings(&response));
        }

        accumulated
    }
}

/// Walk the tree in sorted order, pruning hidden and dependency directories,
/// and keep the first `MAX_FILES` eligible files
fn collect_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            // Never prune the root itself, even a hidden one like "./".
            entry.depth() == 0 || !is_pruned_dir(entry.file_name().to_string_lossy().as_ref(), entry.file_type().is_dir())
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Walk error, skipping entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_eligible(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .take(MAX_FILES)
        .collect()
}

fn is_pruned_dir(name: &str, is_dir: bool) -> bool {
    is_dir && (name.starts_with('.') || PRUNED_DIRS.contains(&name))
}

/// Eligibility by the prioritized extension table, plus the extensionless
/// infrastructure filenames
fn is_eligible(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if INFRA_FILENAMES.contains(&name) {
            return true;
        }
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SOURCE_EXTENSIONS.contains(&ext.as_str())
                || CONFIG_EXTENSIONS.contains(&ext.as_str())
                || FRONTEND_EXTENSIONS.contains(&ext.as_str())
                || DOC_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Split into consecutive `CHUNK_SIZE`-character chunks
fn split_chunks(content: &str) -> Vec<String> {
    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(CHUNK_SIZE)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Parse a findings reply: a flat JSON object of string entries, with a
/// line-scan fallback for replies that never made it into JSON
fn parse_findings(response: &str) -> FileFindings {
    if let Ok(value) = response_parser::extract_object(response) {
        if let Some(object) = value.as_object() {
            return object
                .iter()
                .filter_map(|(key, value)| {
                    value.as_str().map(|desc| (key.clone(), desc.to_string()))
                })
                .collect();
        }
    }
    scan_findings_lines(response)
}

/// Fallback: accept `component: description` lines, optionally prefixed with
/// a list marker, quotes stripped
fn scan_findings_lines(response: &str) -> FileFindings {
    let mut findings = FileFindings::new();
    for line in response.lines() {
        let line = line
            .trim()
            .trim_start_matches(['#', '*', '-'])
            .trim_start();
        if let Some((component, description)) = line.split_once(':') {
            let component = component.trim().trim_matches(['"', '\'']).to_string();
            let description = description.trim().trim_matches(['"', '\'']).to_string();
            if !component.is_empty() && !description.is_empty() {
                findings.insert(component, description);
            }
        }
    }
    findings
}

/// Merge one chunk's findings into the per-file accumulator. A later
/// description is appended with "; " only when it is not already a substring
/// of what we have (naive dedup, not semantic).
fn merge_chunk_findings(accumulated: &mut FileFindings, chunk: FileFindings) {
    for (component, description) in chunk {
        match accumulated.get_mut(&component) {
            Some(existing) => {
                if !description.is_empty() && !existing.contains(&description) {
                    existing.push_str("; ");
                    existing.push_str(&description);
                }
            }
            None => {
                accumulated.insert(component, description);
            }
        }
    }
}

/// Merge one file's findings into the scan-wide map; only catalogue entries
/// are kept, anything else the model invented is dropped
fn merge_file_findings(findings: &mut CatalogueFindings, path: &Path, file: FileFindings) {
    for (component, description) in file {
        if let Some(entry) = COMPONENT_CATALOGUE.iter().find(|c| **c == component) {
            findings
                .entry(entry)
                .or_default()
                .push((path.display().to_string(), description));
        } else {
            debug!(component, "Dropping finding outside the catalogue");
        }
    }
}

/// Render the aggregate summary grouped by catalogue entry, in catalogue
/// order, with an explicit line for kinds that had no references
fn render_summary(findings: &CatalogueFindings) -> String {
    let mut summary = String::from(
        "Below are the references found in the codebase for each typical web app component:\n\n",
    );

    for component in COMPONENT_CATALOGUE {
        summary.push_str(&format!("=== {} ===\n", component.to_uppercase()));
        match findings.get(component) {
            Some(files) if !files.is_empty() => {
                for (path, description) in files {
                    summary.push_str(&format!("File: {path}\nDescription: {description}\n\n"));
                }
            }
            _ => summary.push_str("No references found in the scanned code.\n\n"),
        }
    }

    summary
}
