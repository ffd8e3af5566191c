//! Project scanning: turn a folder of SQL files into a lineage graph.
//!
//! The scan walks the project tree for `.sql` files, extracts the object
//! each file defines, classifies its pipeline layer from the file path, and
//! resolves dependencies between the discovered objects. Unresolvable
//! dependencies are dropped, or surfaced as ghost external nodes when
//! discovery mode is on. A file that fails to read or parse is skipped with
//! a warning; one broken file never fails the scan.

pub mod parser;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::dialect::Dialect;
use crate::graph::types::{Edge, Layer, Node, NodeDetails};
use crate::graph::ancestor_count;
use parser::SqlObject;

/// Errors from scanning a project folder.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Project path does not exist or is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to walk project folder: {0}")]
    Io(#[from] std::io::Error),
}

/// Scan parameters.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub dialect: Dialect,
    /// Emit ghost external nodes for dependencies that resolve to nothing.
    pub discovery: bool,
    /// When set, only these top-level subfolders are scanned. Files directly
    /// under the project root are always included.
    pub subfolders: Option<Vec<String>>,
}

/// One discovered SQL file, before graph assembly.
#[derive(Debug, Clone)]
struct ScannedFile {
    object: SqlObject,
    path: PathBuf,
    layer: Layer,
    content: String,
}

/// Scan a project folder and assemble the lineage graph.
pub fn scan_project(root: &Path, options: &ScanOptions) -> Result<(Vec<Node>, Vec<Edge>), ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    collect_sql_files(root, root, options, &mut files)?;
    files.sort();

    let mut scanned = Vec::new();
    for path in files {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable file");
                continue;
            }
        };
        let Some(object) = parser::extract_object(&content, options.dialect) else {
            debug!(path = %path.display(), "no object definition found");
            continue;
        };
        let layer = classify_layer(root, &path);
        scanned.push(ScannedFile {
            object,
            path,
            layer,
            content,
        });
    }

    Ok(build_graph(root, scanned, options))
}

/// Immediate subfolders of a project root that contain SQL files, sorted.
pub fn list_sql_folders(root: &Path) -> Result<Vec<String>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    let mut folders = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if path.is_dir() && !name.starts_with('.') && contains_sql(&path)? {
            folders.push(name);
        }
    }
    folders.sort();
    Ok(folders)
}

fn contains_sql(dir: &Path) -> Result<bool, ScanError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if path.is_file() && name.to_lowercase().ends_with(".sql") {
            return Ok(true);
        }
        if path.is_dir() && contains_sql(&path)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn collect_sql_files(
    root: &Path,
    dir: &Path,
    options: &ScanOptions,
    out: &mut Vec<PathBuf>,
) -> Result<(), ScanError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            if dir == root {
                if let Some(allowed) = &options.subfolders {
                    if !allowed.iter().any(|a| a == &name) {
                        continue;
                    }
                }
            }
            collect_sql_files(root, &path, options, out)?;
        } else if name.to_lowercase().ends_with(".sql") {
            out.push(path);
        }
    }
    Ok(())
}

/// Classify a file's pipeline layer from its path components under the
/// project root. The deepest matching component wins.
fn classify_layer(root: &Path, path: &Path) -> Layer {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut layer = Layer::Other;
    for component in relative.components() {
        let part = component.as_os_str().to_string_lossy().to_lowercase();
        layer = match part.as_str() {
            "raw" | "bronze" | "source" | "sources" => Layer::Raw,
            "intermediate" | "silver" | "staging" => Layer::Intermediate,
            "curated" | "gold" | "mart" | "marts" => Layer::Curated,
            "cte" | "ctes" => Layer::Cte,
            _ => continue,
        };
    }
    layer
}

/// Resolve dependencies between scanned objects and assemble nodes and
/// edges. Node ids are the lowercased object names; lookup also indexes the
/// trailing one- and two-segment forms so `dataset.table` references match
/// `project.dataset.table` definitions.
fn build_graph(root: &Path, scanned: Vec<ScannedFile>, options: &ScanOptions) -> (Vec<Node>, Vec<Edge>) {
    let mut lookup: HashMap<String, String> = HashMap::new();
    for file in &scanned {
        let id = file.object.name.to_lowercase();
        for key in name_keys(&id) {
            lookup.entry(key).or_insert_with(|| id.clone());
        }
    }

    let mut nodes = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();
    let mut ghost_ids: Vec<String> = Vec::new();

    for file in &scanned {
        let id = file.object.name.to_lowercase();
        let label = id.rsplit('.').next().unwrap_or(&id).to_string();
        let segments: Vec<&str> = id.split('.').collect();
        let (project, dataset) = match segments.len() {
            3.. => (Some(segments[0].to_string()), Some(segments[1].to_string())),
            2 => (None, Some(segments[0].to_string())),
            _ => (None, None),
        };
        let relative = file.path.strip_prefix(root).unwrap_or(&file.path);
        nodes.push(
            Node::asset(id.clone(), label, file.layer).with_details(NodeDetails {
                source_type: Some(file.object.source_type.clone()),
                project,
                dataset,
                path: Some(relative.display().to_string()),
                content: Some(file.content.clone()),
                extra: Default::default(),
            }),
        );

        for dep in &file.object.dependencies {
            let dep_lower = dep.to_lowercase();
            let resolved = name_keys(&dep_lower)
                .into_iter()
                .find_map(|key| lookup.get(&key).cloned());
            match resolved {
                Some(source) if source != id => edges.push(Edge::new(source, id.clone())),
                Some(_) => {}
                None if options.discovery => {
                    if !ghost_ids.contains(&dep_lower) {
                        ghost_ids.push(dep_lower.clone());
                    }
                    edges.push(Edge::new(dep_lower, id.clone()));
                }
                None => {
                    debug!(dependency = %dep, consumer = %id, "unresolved dependency dropped");
                }
            }
        }
    }

    for ghost in ghost_ids {
        let label = ghost.rsplit('.').next().unwrap_or(&ghost).to_string();
        nodes.push(Node::asset(ghost, label, Layer::External));
    }

    edges.sort_by(|a, b| a.id.cmp(&b.id));
    edges.dedup_by(|a, b| a.id == b.id);

    for node in &mut nodes {
        node.incoming_count = edges.iter().filter(|e| e.target == node.id).count() as u32;
        node.nested_count = ancestor_count(&node.id, &edges) as u32;
    }

    (nodes, edges)
}

/// Lookup keys for a dotted name: the full name plus its trailing one- and
/// two-segment suffixes.
fn name_keys(name: &str) -> Vec<String> {
    let segments: Vec<&str> = name.split('.').collect();
    let mut keys = vec![name.to_string()];
    if segments.len() >= 3 {
        keys.push(segments[segments.len() - 2..].join("."));
    }
    if segments.len() >= 2 {
        keys.push(segments[segments.len() - 1].to_string());
    }
    keys
}
