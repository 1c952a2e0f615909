//! Core diagnostic message types.

use qti_source_map::{SourceContext, SourceInfo};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// An error that prevents completion
    Error,
    /// A problem that does not prevent completion
    Warning,
    Info,
}

/// How detail items are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// ✖ bullet
    Error,
    /// ℹ bullet
    Info,
    /// • bullet
    Note,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
            DetailKind::Note => "•",
        }
    }
}

/// A detail item in a diagnostic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: String,
    /// Where in the document this detail applies, if anywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

/// A diagnostic message.
///
/// Structure:
/// 1. **Code**: optional stable error code (e.g. "QTI-2-1")
/// 2. **Title**: brief error message
/// 3. **Kind**: error, warning, info
/// 4. **Problem**: what went wrong
/// 5. **Details**: specific information, one fact per bullet
/// 6. **Hints**: optional guidance, phrased as questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub title: String,

    pub kind: DiagnosticKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DetailItem>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

impl DiagnosticMessage {
    /// Create a new diagnostic message with just a title and kind.
    ///
    /// Prefer [`crate::DiagnosticMessageBuilder`] for anything richer.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Render this diagnostic as text.
    ///
    /// When `ctx` holds the content of the file the diagnostic points into,
    /// a source snippet is rendered with ariadne and only the details without
    /// a location and the hints are appended as bullets. Otherwise everything
    /// is written as a bulleted message:
    ///
    /// ```text
    /// Error [QTI-2-3]: Missing Required Attribute
    /// Element <baseValue> requires attribute 'baseType'
    /// ✖ detail
    /// ? hint
    /// ```
    pub fn to_text(&self, ctx: Option<&SourceContext>) -> String {
        let mut result = String::new();

        let location = self
            .location
            .as_ref()
            .or_else(|| self.details.iter().find_map(|d| d.location.as_ref()));

        let snippet = match (location, ctx) {
            (Some(loc), Some(ctx)) => self.render_ariadne_source_context(loc, ctx),
            _ => None,
        };

        match snippet {
            Some(snippet) => {
                result.push_str(&snippet);
                for detail in self.details.iter().filter(|d| d.location.is_none()) {
                    let _ = writeln!(result, "{} {}", detail.kind.bullet(), detail.content);
                }
            }
            None => {
                let kind_str = match self.kind {
                    DiagnosticKind::Error => "Error",
                    DiagnosticKind::Warning => "Warning",
                    DiagnosticKind::Info => "Info",
                };
                match &self.code {
                    Some(code) => {
                        let _ = writeln!(result, "{} [{}]: {}", kind_str, code, self.title);
                    }
                    None => {
                        let _ = writeln!(result, "{}: {}", kind_str, self.title);
                    }
                }
                if let Some(problem) = &self.problem {
                    let _ = writeln!(result, "{}", problem);
                }
                for detail in &self.details {
                    let _ = writeln!(result, "{} {}", detail.kind.bullet(), detail.content);
                }
            }
        }

        for hint in &self.hints {
            let _ = writeln!(result, "? {}", hint);
        }

        result
    }

    /// Render this diagnostic as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    fn render_ariadne_source_context(
        &self,
        location: &SourceInfo,
        ctx: &SourceContext,
    ) -> Option<String> {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let file = ctx.get_file(location.file_id)?;
        let content = file.content.as_deref()?;
        if location.end_offset() > content.len() {
            return None;
        }

        let (report_kind, main_color) = match self.kind {
            DiagnosticKind::Error => (ReportKind::Error, Color::Red),
            DiagnosticKind::Warning => (ReportKind::Warning, Color::Yellow),
            DiagnosticKind::Info => (ReportKind::Advice, Color::Cyan),
        };

        let mut report = Report::build(report_kind, file.path.clone(), location.start_offset());

        report = match &self.code {
            Some(code) => report.with_message(format!("[{}] {}", code, self.title)),
            None => report.with_message(&self.title),
        };

        let main_message = self.problem.as_deref().unwrap_or(&self.title);
        report = report.with_label(
            Label::new((
                file.path.clone(),
                location.start_offset()..location.end_offset(),
            ))
            .with_message(main_message)
            .with_color(main_color),
        );

        for detail in &self.details {
            let Some(detail_loc) = &detail.location else {
                continue;
            };
            if detail_loc.file_id != location.file_id || detail_loc.end_offset() > content.len()
            {
                continue;
            }
            let color = match detail.kind {
                DetailKind::Error => Color::Red,
                DetailKind::Info => Color::Cyan,
                DetailKind::Note => Color::Blue,
            };
            report = report.with_label(
                Label::new((
                    file.path.clone(),
                    detail_loc.start_offset()..detail_loc.end_offset(),
                ))
                .with_message(&detail.content)
                .with_color(color),
            );
        }

        let mut output = Vec::new();
        report
            .finish()
            .write((file.path.clone(), Source::from(content)), &mut output)
            .ok()?;

        String::from_utf8(output).ok()
    }
}
