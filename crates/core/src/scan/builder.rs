use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tree_sitter::LanguageError;

use crate::config::ScanConfig;
use crate::model::Inventory;
use crate::scan::extract::ExtractOptions;
use crate::scan::{Diagnostic, FileEnumerator, FunctionExtractor, ScanError};

/// Error type for building an inventory over a whole tree.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The bundled grammar is incompatible with the linked tree-sitter runtime.
    #[error("Failed to load the TSX grammar: {0}")]
    Grammar(#[from] LanguageError),

    /// The first unrecoverable enumeration or read failure.
    #[error("Inventory build aborted after {files_scanned} file(s): {source}")]
    Aborted {
        files_scanned: usize,
        #[source]
        source: ScanError,
    },
}

/// A source file whose whole-file parse failed and contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Merged result of scanning a tree.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub inventory: Inventory,
    /// Nodes skipped inside otherwise parsed files.
    pub diagnostics: Vec<Diagnostic>,
    /// Source files visited, including failed ones.
    pub files_scanned: usize,
    pub failed_files: Vec<FailedFile>,
}

/// Drives the file enumerator and function extractor over a directory tree.
pub struct InventoryBuilder<'a> {
    config: &'a ScanConfig,
}

impl<'a> InventoryBuilder<'a> {
    pub fn new(config: &'a ScanConfig) -> Self {
        Self { config }
    }

    /// Scan every source file under `root` and merge the results by name.
    ///
    /// When two files define the same name, the one visited last wins.
    /// Whole-file parse failures are logged and recorded in
    /// [`BuildOutput::failed_files`]; I/O failures abort the build.
    pub fn build(&self, root: &Path) -> Result<BuildOutput, BuildError> {
        let mut extractor = FunctionExtractor::new(ExtractOptions::from(self.config))?;
        let mut output = BuildOutput::default();

        for entry in FileEnumerator::new(root, &self.config.exclude_dirs) {
            let path = entry.map_err(|source| BuildError::Aborted {
                files_scanned: output.files_scanned,
                source,
            })?;
            if !self.config.is_source_file(&path) {
                continue;
            }

            tracing::trace!(file = %path.display(), "extracting");
            let extraction = match extractor.extract_file(&path) {
                Ok(extraction) => extraction,
                Err(ScanError::Parse { path, reason }) => {
                    tracing::warn!(file = %path.display(), %reason, "skipping unparsable file");
                    output.files_scanned += 1;
                    output.failed_files.push(FailedFile { path, reason });
                    continue;
                }
                Err(source) => {
                    return Err(BuildError::Aborted { files_scanned: output.files_scanned, source })
                }
            };
            output.files_scanned += 1;

            for function in extraction.functions {
                if let Some(previous) = output.inventory.get(&function.name) {
                    if *previous != function {
                        tracing::debug!(
                            name = %function.name,
                            file = %path.display(),
                            "duplicate function name; keeping the later definition"
                        );
                    }
                }
                output.inventory.insert(function);
            }
            output.diagnostics.extend(extraction.diagnostics);
        }

        tracing::info!(
            files = output.files_scanned,
            functions = output.inventory.len(),
            skipped_nodes = output.diagnostics.len(),
            failed_files = output.failed_files.len(),
            "built function inventory"
        );
        Ok(output)
    }
}
