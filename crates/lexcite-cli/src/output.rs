//! Output formatting for the CLI.

use colored::*;
use lexcite_domain::EnrichedResponse;
use lexcite_worker::{IngestOutcome, QueryOutcome};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const EXCERPT_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Summary line after ingestion, then one warning per line.
    pub fn ingest_summary(&self, outcome: &IngestOutcome) -> String {
        let mut lines = vec![self.success(&format!(
            "Loaded {} document(s) ({} chars of context)",
            outcome.documents.len(),
            outcome.context.chars().count()
        ))];

        if !outcome.extraction_results.is_empty() {
            let extracted: usize = outcome.extraction_results.iter().map(|r| r.records().len()).sum();
            let failed = outcome.extraction_results.iter().filter(|r| r.is_failed()).count();
            let mut line = format!(
                "Extracted {} entities from {} document(s)",
                extracted,
                outcome.extraction_results.len()
            );
            if failed > 0 {
                line.push_str(&format!(" ({} with extraction errors)", failed));
            }
            lines.push(self.info(&line));
        }

        lines.extend(outcome.warnings.iter().map(|w| self.warning(w)));
        lines.join("\n")
    }

    /// The answer followed by its citation table, when there is one.
    pub fn answer(&self, outcome: &QueryOutcome) -> String {
        let mut out = format!("{}\n{}", self.colorize("Answer:", "cyan"), outcome.response);

        if let Some(enriched) = &outcome.enriched {
            if !enriched.citations.is_empty() {
                out.push_str("\n\n");
                out.push_str(&self.citation_table(enriched));
                out.push('\n');
                out.push_str(&self.citation_summary(enriched));
            }
            if enriched.has_analysis_markers {
                out.push('\n');
                out.push_str(&self.info("Contains [Analysis] passages (interpretation, not sourced)"));
            }
        }
        out
    }

    /// Citations as a table, in order of appearance.
    pub fn citation_table(&self, enriched: &EnrichedResponse) -> String {
        let mut builder = Builder::default();
        builder.push_record(["#", "Status", "Document", "Chars", "Extracted text"]);

        for (i, citation) in enriched.citations.iter().enumerate() {
            let status = if citation.verified {
                self.colorize("verified", "green")
            } else {
                self.colorize("unverified", "red")
            };
            builder.push_record([
                (i + 1).to_string(),
                status,
                citation.doc_name.clone(),
                format!("{}-{}", citation.char_start, citation.char_end),
                excerpt(&citation.extraction_text, EXCERPT_CHARS),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn citation_summary(&self, enriched: &EnrichedResponse) -> String {
        let msg = format!(
            "{} of {} citation(s) verified",
            enriched.verified_count(),
            enriched.citations.len()
        );
        if enriched.unverified_count() == 0 {
            self.success(&msg)
        } else {
            self.warning(&msg)
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// First `max` characters of `text` on one line.
fn excerpt(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
