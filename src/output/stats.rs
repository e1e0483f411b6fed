//! Crawl and index statistics
//!
//! This module tallies what a crawl did and summarises what an index holds,
//! and prints both in a human-readable form.

use crate::sources::{SkipReason, SourceKind};
use crate::storage::{IndexStore, JsonIndexStore, StorageResult, UpsertOutcome};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Outcome counts for one source family
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Source URLs processed
    pub sources: u64,

    /// Records appended under a new link
    pub inserted: u64,

    /// Records merged into an existing link
    pub merged: u64,

    /// Skipped items by reason label
    pub skipped: BTreeMap<&'static str, u64>,
}

impl CrawlStatistics {
    pub fn record_upsert(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Merged => self.merged += 1,
        }
    }

    pub fn record_skip(&mut self, reason: &SkipReason) {
        *self.skipped.entry(reason.label()).or_insert(0) += 1;
    }

    /// Records written to the index
    pub fn records(&self) -> u64 {
        self.inserted + self.merged
    }

    pub fn total_skipped(&self) -> u64 {
        self.skipped.values().sum()
    }

    /// Adds another tally into this one
    pub fn absorb(&mut self, other: &CrawlStatistics) {
        self.sources += other.sources;
        self.inserted += other.inserted;
        self.merged += other.merged;
        for (label, count) in &other.skipped {
            *self.skipped.entry(*label).or_insert(0) += count;
        }
    }
}

/// Per-family statistics for one run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub families: Vec<(SourceKind, CrawlStatistics)>,
}

impl CrawlReport {
    /// Sum over all families
    pub fn totals(&self) -> CrawlStatistics {
        let mut totals = CrawlStatistics::default();
        for (_, stats) in &self.families {
            totals.absorb(stats);
        }
        totals
    }

    pub fn get(&self, kind: SourceKind) -> Option<&CrawlStatistics> {
        self.families
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, stats)| stats)
    }
}

/// Summary of one index file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStatistics {
    pub path: PathBuf,

    /// Total records
    pub records: usize,

    /// Records with child pages
    pub containers: usize,

    /// Child references across all containers
    pub child_pages: usize,

    /// Records with neither title nor description
    pub missing_metadata: usize,
}

/// Loads an index and summarises its contents
pub fn load_index_statistics(store: &JsonIndexStore) -> StorageResult<IndexStatistics> {
    let records = store.load()?;

    Ok(IndexStatistics {
        path: store.path().to_path_buf(),
        records: records.len(),
        containers: records.iter().filter(|r| r.is_container()).count(),
        child_pages: records.iter().map(|r| r.pages.len()).sum(),
        missing_metadata: records
            .iter()
            .filter(|r| r.title.is_none() && r.description.is_none())
            .count(),
    })
}

/// Prints crawl statistics to stdout in a formatted manner
pub fn print_statistics(report: &CrawlReport) {
    println!("=== Crawl Statistics ===\n");

    for (kind, stats) in &report.families {
        println!("{}:", kind);
        println!("  Sources fetched: {}", stats.sources);
        println!("  Records inserted: {}", stats.inserted);
        println!("  Records merged: {}", stats.merged);
        println!("  Items skipped: {}", stats.total_skipped());
        for (label, count) in &stats.skipped {
            println!("    {}: {}", label, count);
        }
        println!();
    }

    let totals = report.totals();
    let attempted = totals.records() + totals.total_skipped();
    let skip_rate = if attempted > 0 {
        (totals.total_skipped() as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Skip Rate: {:.1}% ({} / {} items skipped)",
        skip_rate,
        totals.total_skipped(),
        attempted
    );
}

/// Prints an index summary to stdout
pub fn print_index_statistics(stats: &IndexStatistics) {
    println!("{}:", stats.path.display());
    println!("  Records: {}", stats.records);
    println!("  Containers: {}", stats.containers);
    println!("  Child pages: {}", stats.child_pages);
    println!("  Without title or description: {}", stats.missing_metadata);
}
