//! Command implementations for the QTI CLI

pub mod check;
pub mod convert;
pub mod tree;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use qti_diagnostics::DiagnosticMessage;
use qti_marshal::{Marshaller, Profile};
use qti_model::Component;
use qti_source_map::{FileId, SourceContext};

/// A document read from disk, registered for diagnostic rendering.
pub struct Input {
    pub path: PathBuf,
    source: String,
    context: SourceContext,
    file_id: FileId,
}

impl Input {
    pub fn read(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        Ok(Self::from_source(path, source))
    }

    pub fn from_source(path: &Path, source: String) -> Self {
        let mut context = SourceContext::new();
        let file_id = context.add_file(path.display().to_string(), Some(source.clone()));
        Self {
            path: path.to_path_buf(),
            source,
            context,
            file_id,
        }
    }

    /// Parse and unmarshal the document.
    ///
    /// `profile` forces the input profile; otherwise it is detected.
    pub fn load(
        &self,
        marshaller: &Marshaller,
        profile: Option<Profile>,
    ) -> std::result::Result<Component, DiagnosticMessage> {
        let document = qti_xml::parse_with_file_id(&self.source, self.file_id)
            .map_err(|err| err.to_diagnostic())?;
        let result = match profile {
            Some(profile) => marshaller.unmarshal_document_as(&document, profile),
            None => marshaller.unmarshal_document(&document),
        };
        result.map_err(|err| err.to_diagnostic())
    }

    /// Render `diagnostic` with a snippet of this document.
    pub fn render(&self, diagnostic: &DiagnosticMessage) -> String {
        diagnostic.to_text(Some(&self.context))
    }

    /// Print `diagnostic` to stderr and turn it into a command failure.
    pub fn fail(&self, diagnostic: &DiagnosticMessage) -> anyhow::Error {
        eprint!("{}", self.render(diagnostic));
        anyhow::anyhow!("Failed to convert {}", self.path.display())
    }
}
