//! Markdown summary generation
//!
//! This module renders a finished crawl as a human-readable markdown report:
//! run metadata, pagination and post counts, failed links and written files.

use crate::output::{CrawlSummary, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of a crawl to `output_path`
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Blog-Harvest Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    if let Some(started) = summary.started_at {
        md.push_str(&format!("- **Started**: {}\n", started.to_rfc3339()));
    }
    if let Some(finished) = summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = summary.duration_seconds() {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Counts
    md.push_str("## Overall Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Listing pages fetched | {} |\n", summary.pages_fetched));
    md.push_str(&format!(
        "| Listing pages failed | {} |\n",
        summary.listing_failures
    ));
    md.push_str(&format!("| Links dispatched | {} |\n", summary.links_dispatched));
    md.push_str(&format!("| Posts collected | {} |\n", summary.posts_collected));
    md.push_str(&format!(
        "| Comments collected | {} |\n",
        summary.comments_collected
    ));
    md.push_str(&format!("| Failed posts | {} |\n", summary.post_failures.len()));
    md.push_str(&format!("| Failed chunks | {} |\n", summary.chunk_failures));
    md.push_str(&format!("| Dropped posts | {} |\n\n", summary.posts_dropped));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        summary.success_rate()
    ));

    // Failed links
    if !summary.post_failures.is_empty() {
        md.push_str("## Failed Posts\n\n");
        md.push_str("| Link | Error |\n");
        md.push_str("|------|-------|\n");

        for (link, error) in summary.post_failures.iter().take(50) {
            md.push_str(&format!("| {} | {} |\n", link, error.replace('|', "\\|")));
        }
        if summary.post_failures.len() > 50 {
            md.push_str(&format!(
                "\n... and {} more\n",
                summary.post_failures.len() - 50
            ));
        }
        md.push('\n');
    }

    // Output files
    md.push_str(&format!(
        "## Output Files ({} mode)\n\n",
        summary.chunk_mode.as_str()
    ));
    if summary.chunk_files.is_empty() {
        md.push_str("No chunk files were written.\n");
    } else {
        for path in &summary.chunk_files {
            md.push_str(&format!("- {}\n", path.display()));
        }
    }
    md.push('\n');

    md
}
