//! Statistics reporting.

use console::style;

use crate::download::{HarvestSummary, StopReason};

/// Print totals for a finished run.
pub fn print_harvest_summary(summary: &HarvestSummary) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Harvest Statistics:").bold());
    println!("  Pages:     {}", summary.batches);
    if summary.failed_fetches > 0 {
        println!("  Failed page fetches: {}", style(summary.failed_fetches).red());
    }
    println!("  Posts:     {} ({} skipped)", summary.items_seen, summary.items_skipped);
    println!("  Saved:     {}", style(summary.saved).green());
    println!("  Existing:  {}", style(summary.already_present).yellow());
    if summary.failed > 0 {
        println!("  Failed:    {}", style(summary.failed).red());
    }
    println!("  Cursor:    {}", summary.final_cursor);
    println!("  Stopped:   {}", describe_stop(summary.stop_reason));
    println!("{}", style("═".repeat(50)).dim());
}

fn describe_stop(reason: StopReason) -> String {
    match reason {
        StopReason::EndOfResults => style(reason).green().to_string(),
        StopReason::BatchLimit => reason.to_string(),
        StopReason::Cancelled => style(reason).yellow().to_string(),
    }
}
