//! Core diagnostic message types.

use serde::{Deserialize, Serialize};
use stitch_source_map::{SourceContext, SourceInfo};

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// An error that prevents completion
    Error,
    /// A warning that doesn't prevent completion but indicates a problem
    Warning,
    /// Informational message
    Info,
}

/// How detail items should be presented (tidyverse x/i bullet style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailKind {
    /// Error detail (✖ bullet)
    Error,
    /// Info detail (ℹ bullet)
    Info,
    /// Note detail (plain bullet)
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
    /// The kind of detail (error, info, note)
    pub kind: DetailKind,
    /// The content of the detail
    pub content: String,
    /// Optional source location for this detail
    ///
    /// Lets a message point at a second location, e.g. the import tag that
    /// referenced a file in which the actual failure happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

/// A diagnostic message following tidyverse-style structure.
///
/// 1. **Code**: error code (e.g., "S-3-1") for searchability
/// 2. **Title**: brief error message
/// 3. **Kind**: Error, Warning, Info
/// 4. **Problem**: what went wrong
/// 5. **Details**: specific information (bulleted)
/// 6. **Hints**: optional guidance for fixing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub title: String,

    pub kind: DiagnosticKind,

    pub problem: Option<String>,

    pub details: Vec<DetailItem>,

    pub hints: Vec<String>,

    /// Source location for this diagnostic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

impl DiagnosticMessage {
    /// Create a new diagnostic message with just a title and kind.
    ///
    /// Consider using [`crate::DiagnosticMessageBuilder`] instead.
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

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Render this diagnostic message as text.
    ///
    /// With a source context and a resolvable location the output starts with
    /// an ariadne snippet; otherwise the title line carries the code and the
    /// `path:line:column` of the location when known.
    ///
    /// ```text
    /// Error [S-3-1]: Imported File Not Found
    /// `missing.yml` does not exist
    /// ✖ Error detail
    /// ℹ Info detail
    /// ? Hint
    /// ```
    pub fn to_text(&self, ctx: Option<&SourceContext>) -> String {
        use std::fmt::Write;

        let mut result = String::new();

        let snippet = match (ctx, self.primary_location()) {
            (Some(ctx), Some(loc)) => self.render_ariadne_source_context(loc, ctx),
            _ => None,
        };

        match snippet {
            Some(snippet) => {
                result.push_str(&snippet);
                // ariadne already shows the title, code, problem and located details
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
                        let _ = write!(result, "{} [{}]: {}", kind_str, code, self.title);
                    }
                    None => {
                        let _ = write!(result, "{}: {}", kind_str, self.title);
                    }
                }
                if let Some(where_) = ctx
                    .zip(self.location.as_ref())
                    .and_then(|(ctx, loc)| ctx.describe(loc))
                {
                    let _ = write!(result, " ({})", where_);
                }
                result.push('\n');

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

    /// Render this diagnostic message as a JSON value.
    ///
    /// ```
    /// use stitch_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::error("Something went wrong");
    /// let json = msg.to_json();
    /// assert_eq!(json["kind"], "error");
    /// assert_eq!(json["title"], "Something went wrong");
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let kind_str = match self.kind {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Info => "info",
        };

        let mut obj = json!({
            "kind": kind_str,
            "title": self.title,
        });

        if let Some(code) = &self.code {
            obj["code"] = json!(code);
        }
        if let Some(problem) = &self.problem {
            obj["problem"] = json!(problem);
        }
        if !self.details.is_empty() {
            obj["details"] = json!(self.details);
        }
        if !self.hints.is_empty() {
            obj["hints"] = json!(self.hints);
        }
        if let Some(location) = &self.location {
            obj["location"] = json!(location);
        }

        obj
    }

    fn primary_location(&self) -> Option<&SourceInfo> {
        self.location
            .as_ref()
            .or_else(|| self.details.iter().find_map(|d| d.location.as_ref()))
    }

    /// Render source context using ariadne.
    fn render_ariadne_source_context(
        &self,
        main_location: &SourceInfo,
        ctx: &SourceContext,
    ) -> Option<String> {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let file = ctx.get_file(main_location.file_id)?;
        let content = file.read_content()?;

        let (report_kind, main_color) = match self.kind {
            DiagnosticKind::Error => (ReportKind::Error, Color::Red),
            DiagnosticKind::Warning => (ReportKind::Warning, Color::Yellow),
            DiagnosticKind::Info => (ReportKind::Advice, Color::Cyan),
        };

        let mut report = Report::build(
            report_kind,
            file.path.clone(),
            main_location.start_offset(),
        );

        if let Some(code) = &self.code {
            report = report.with_message(format!("[{}] {}", code, self.title));
        } else {
            report = report.with_message(&self.title);
        }

        let main_message = self.problem.as_deref().unwrap_or(&self.title);
        report = report.with_label(
            Label::new((
                file.path.clone(),
                main_location.start_offset()..main_location.end_offset(),
            ))
            .with_message(main_message)
            .with_color(main_color),
        );

        // Only details in the same file can be labelled in this report
        for detail in &self.details {
            let Some(detail_loc) = &detail.location else {
                continue;
            };
            if detail_loc.file_id != main_location.file_id {
                continue;
            }
            let detail_color = match detail.kind {
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
                .with_color(detail_color),
            );
        }

        let report = report.finish();
        let mut output = Vec::new();
        report
            .write((file.path.clone(), Source::from(content.as_str())), &mut output)
            .ok()?;

        String::from_utf8(output).ok()
    }
}
