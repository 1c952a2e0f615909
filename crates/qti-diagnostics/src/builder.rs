//! Builder for [`DiagnosticMessage`].

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};
use qti_source_map::SourceInfo;

/// Builder encoding the message structure: title, problem, details, hints.
///
/// ```
/// use qti_diagnostics::DiagnosticMessageBuilder;
///
/// let msg = DiagnosticMessageBuilder::error("Disallowed Child")
///     .with_code("QTI-2-6")
///     .problem("<p> cannot contain <div>")
///     .add_detail("<p> accepts inline content only")
///     .build();
///
/// assert_eq!(msg.details.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::new(kind, title),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    pub fn problem(mut self, problem: impl Into<String>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    pub fn with_location(mut self, location: SourceInfo) -> Self {
        self.message.location = Some(location);
        self
    }

    /// Attach a location when one is known.
    pub fn with_optional_location(mut self, location: Option<SourceInfo>) -> Self {
        if location.is_some() {
            self.message.location = location;
        }
        self
    }

    pub fn add_detail(self, content: impl Into<String>) -> Self {
        self.push_detail(DetailKind::Error, content, None)
    }

    pub fn add_info(self, content: impl Into<String>) -> Self {
        self.push_detail(DetailKind::Info, content, None)
    }

    pub fn add_note(self, content: impl Into<String>) -> Self {
        self.push_detail(DetailKind::Note, content, None)
    }

    /// Add an error detail that points at its own location.
    pub fn add_detail_at(self, content: impl Into<String>, location: SourceInfo) -> Self {
        self.push_detail(DetailKind::Error, content, Some(location))
    }

    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }

    fn push_detail(
        mut self,
        kind: DetailKind,
        content: impl Into<String>,
        location: Option<SourceInfo>,
    ) -> Self {
        self.message.details.push(DetailItem {
            kind,
            content: content.into(),
            location,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qti_source_map::FileId;

    #[test]
    fn test_builder_collects_parts_in_order() {
        let msg = DiagnosticMessageBuilder::warning("Dropped Attribute")
            .problem("Attribute 'foo' is not defined for <p>")
            .add_detail("first")
            .add_info("second")
            .add_note("third")
            .add_hint("Remove it?")
            .build();

        assert_eq!(msg.kind, DiagnosticKind::Warning);
        let kinds: Vec<_> = msg.details.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DetailKind::Error, DetailKind::Info, DetailKind::Note]);
        assert_eq!(msg.hints, vec!["Remove it?".to_string()]);
    }

    #[test]
    fn test_optional_location() {
        let without = DiagnosticMessageBuilder::error("x")
            .with_optional_location(None)
            .build();
        assert!(without.location.is_none());

        let loc = SourceInfo::original(FileId(0), 1, 2);
        let with = DiagnosticMessageBuilder::error("x")
            .with_optional_location(Some(loc.clone()))
            .build();
        assert_eq!(with.location, Some(loc));
    }
}
