//! Finding customer photos under a path.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ImageConfig;

/// Finds image files by extension.
pub struct FileDiscovery {
    extensions: Vec<String>,
}

impl FileDiscovery {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            extensions: config
                .supported_formats
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// A file path is returned as-is when its extension is supported.
    /// A directory is walked recursively, results sorted by path.
    pub fn discover(&self, path: &Path) -> Vec<PathBuf> {
        if path.is_file() {
            return if self.is_supported(path) {
                vec![path.to_path_buf()]
            } else {
                tracing::warn!("{:?} does not have a supported image extension", path);
                Vec::new()
            };
        }

        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.is_supported(e.path()))
            .map(|e| e.into_path())
            .collect();

        files.sort();
        files
    }

    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|known| *known == ext)
            })
            .unwrap_or(false)
    }
}
