//! Human-readable output for reports and the record listing

use crate::harvest::RunReport;
use crate::storage::Record;

/// Prints the aggregate counters of one harvest cycle
pub fn print_report(report: &RunReport) {
    println!("=== Harvest Report ===\n");
    println!("Cutoff date:     {}", report.cutoff);
    println!("Pages visited:   {}", report.pages_visited);
    println!("Stopped because: {:?}", report.stop);
    println!();
    println!("Records found:     {}", report.found);
    println!("Records inserted:  {}", report.inserted);
    println!("Duplicates:        {}", report.duplicates);
    println!("Checks skipped:    {}", report.checks_skipped);
    println!("Translated:        {}", report.translated);
    if report.store_failures > 0 {
        println!("Store failures:    {}", report.store_failures);
    }
    println!();
    println!("Completed in {:.1?}", report.elapsed);
}

/// Prints all stored records, newest first
pub fn print_records(records: &[Record]) {
    println!("=== Stored Records ({}) ===\n", records.len());

    for record in records {
        println!(
            "{}  {}  {}",
            record.posted_at.date_naive(),
            record.code,
            record.file_size
        );
        println!("  source:   {}", record.source_url);
        println!("  download: {}", record.download_url);
        if !record.tags.is_empty() {
            println!("  tags:     {}", record.tags.join(", "));
        }
        if !record.actress.is_empty() {
            println!("  actress:  {}", record.actress.join(", "));
        }
        if !record.translated_description.is_empty() {
            println!("  translated: {}", record.translated_description);
        } else if !record.description.is_empty() {
            println!("  description: {}", record.description);
        }
        println!();
    }
}
