//! Locates, reads and compiles requested stylesheets.

use percent_encoding::percent_decode_str;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::StylesheetConfig;
use crate::stylesheet::{StylesheetCompiler, StylesheetError};

pub struct StylesheetService {
    config: StylesheetConfig,
    compiler: Arc<dyn StylesheetCompiler>,
}

impl StylesheetService {
    pub fn new(config: StylesheetConfig, compiler: Arc<dyn StylesheetCompiler>) -> Self {
        Self { config, compiler }
    }

    /// Source file for a request path: the part after the marker segment, under `dir`.
    pub fn source_path(&self, request_path: &str) -> Result<PathBuf, StylesheetError> {
        let suffix = request_path
            .split_once(self.config.marker.as_str())
            .map(|(_, suffix)| suffix)
            .ok_or_else(|| StylesheetError::NotFound(request_path.to_string()))?;

        let decoded = percent_decode_str(suffix).decode_utf8_lossy();
        let mut path = self.config.dir.clone();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(StylesheetError::NotFound(request_path.to_string())),
                s => path.push(s),
            }
        }
        Ok(path)
    }

    /// Read and compile the stylesheet behind `request_path`.
    pub async fn render(&self, request_path: &str) -> Result<String, StylesheetError> {
        let path = self.source_path(request_path)?;
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| StylesheetError::Read { path: path.clone(), source })?;

        let compiler = Arc::clone(&self.compiler);
        let include_paths = vec![self.config.dir.clone()];
        let css = tokio::task::spawn_blocking(move || compiler.compile(&source, &include_paths))
            .await
            .map_err(|e| StylesheetError::Task(e.to_string()))??;

        tracing::debug!(path = %path.display(), bytes = css.len(), "Compiled stylesheet");
        Ok(css)
    }
}
