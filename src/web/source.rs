//! Graph source seam for the web server.
//!
//! Handlers fetch graphs through this trait so tests can serve canned
//! payloads without touching the filesystem.

use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::graph::types::{Edge, Node};
use crate::scan::{self, ScanError, ScanOptions};

#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Produce the lineage graph for a project root.
    async fn fetch(
        &self,
        root: &Path,
        options: ScanOptions,
    ) -> Result<(Vec<Node>, Vec<Edge>), ScanError>;
}

/// Production source: scans the filesystem on a blocking thread.
pub struct FsSource;

#[async_trait]
impl GraphSource for FsSource {
    async fn fetch(
        &self,
        root: &Path,
        options: ScanOptions,
    ) -> Result<(Vec<Node>, Vec<Edge>), ScanError> {
        let root = root.to_path_buf();
        tokio::task::spawn_blocking(move || scan::scan_project(&root, &options))
            .await
            .map_err(|err| ScanError::Io(io::Error::other(err)))?
    }
}

/// Canned source for handler tests.
#[cfg(test)]
pub struct FixedSource {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[cfg(test)]
#[async_trait]
impl GraphSource for FixedSource {
    async fn fetch(
        &self,
        _root: &Path,
        _options: ScanOptions,
    ) -> Result<(Vec<Node>, Vec<Edge>), ScanError> {
        Ok((self.nodes.clone(), self.edges.clone()))
    }
}
