//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl run:
//! per-site page counts, timings and failed URLs.

use crate::crawler::{CrawlReport, FetchFailure};
use crate::state::CrawlState;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Failed URLs listed per site before the list is cut short
const MAX_LISTED_FAILURES: usize = 50;

/// Per-site slice of a crawl summary
#[derive(Debug, Clone)]
pub struct SiteSummary {
    pub site_id: String,
    pub seed: String,
    pub state: CrawlState,
    pub documents: usize,
    pub empty_documents: usize,
    pub processed: usize,
    pub pending_remaining: usize,
    pub batches: usize,
    pub duration_seconds: i64,
    pub failures: Vec<FetchFailure>,
}

impl From<&CrawlReport> for SiteSummary {
    fn from(report: &CrawlReport) -> Self {
        Self {
            site_id: report.site_id.clone(),
            seed: report.seed.clone(),
            state: report.state,
            documents: report.collection.len(),
            empty_documents: report.documents().iter().filter(|d| d.is_empty()).count(),
            processed: report.processed,
            pending_remaining: report.pending_remaining,
            batches: report.batches,
            duration_seconds: report.duration().num_seconds(),
            failures: report.failures.clone(),
        }
    }
}

/// Summary of one crawl run across all sites
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub config_hash: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sites: Vec<SiteSummary>,
}

impl CrawlSummary {
    /// Builds a summary from the site reports of one run
    pub fn from_reports(reports: &[CrawlReport], config_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            config_hash: config_hash.into(),
            started_at: reports.iter().map(|r| r.started_at).min().unwrap_or(now),
            finished_at: reports.iter().map(|r| r.finished_at).max().unwrap_or(now),
            sites: reports.iter().map(SiteSummary::from).collect(),
        }
    }

    pub fn total_documents(&self) -> usize {
        self.sites.iter().map(|s| s.documents).sum()
    }

    pub fn total_processed(&self) -> usize {
        self.sites.iter().map(|s| s.processed).sum()
    }

    pub fn total_failures(&self) -> usize {
        self.sites.iter().map(|s| s.failures.len()).sum()
    }

    /// Percentage of processed pages that produced a document
    pub fn success_rate(&self) -> f64 {
        let processed = self.total_processed();
        if processed == 0 {
            0.0
        } else {
            self.total_documents() as f64 / processed as f64 * 100.0
        }
    }
}

/// Writes the markdown summary to `output_path`
pub fn generate_markdown_summary(
    summary: &CrawlSummary,
    output_path: &Path,
) -> std::io::Result<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Docs-Scout Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        (summary.finished_at - summary.started_at).num_seconds()
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Sites**: {}\n", summary.sites.len()));
    md.push_str(&format!("- **Pages Processed**: {}\n", summary.total_processed()));
    md.push_str(&format!("- **Documents**: {}\n", summary.total_documents()));
    md.push_str(&format!("- **Failures**: {}\n", summary.total_failures()));
    md.push_str(&format!("- **Success Rate**: {:.2}%\n\n", summary.success_rate()));

    md.push_str("## Sites\n\n");
    md.push_str("| Site | Seed | State | Documents | Empty | Processed | Failed | Pending | Batches | Seconds |\n");
    md.push_str("|------|------|-------|-----------|-------|-----------|--------|---------|---------|---------|\n");
    for site in &summary.sites {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            site.site_id,
            site.seed,
            site.state,
            site.documents,
            site.empty_documents,
            site.processed,
            site.failures.len(),
            site.pending_remaining,
            site.batches,
            site.duration_seconds
        ));
    }
    md.push('\n');

    let failing: Vec<_> = summary.sites.iter().filter(|s| !s.failures.is_empty()).collect();
    if !failing.is_empty() {
        md.push_str("## Failed Pages\n\n");
        for site in failing {
            md.push_str(&format!("### {}\n\n", site.site_id));
            for failure in site.failures.iter().take(MAX_LISTED_FAILURES) {
                md.push_str(&format!("- {} ({})\n", failure.url, failure.cause));
            }
            if site.failures.len() > MAX_LISTED_FAILURES {
                md.push_str(&format!(
                    "- ... and {} more\n",
                    site.failures.len() - MAX_LISTED_FAILURES
                ));
            }
            md.push('\n');
        }
    }

    md.push_str("---\n\n");
    md.push_str("*Generated by Docs-Scout*\n");

    md
}
