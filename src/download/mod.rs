//! Download module for harvesting content.
//!
//! This module provides:
//! - Download outcome and statistics tracking
//! - Media file downloading
//! - Concurrent processing of one listing page
//! - The paging loop with cursor persistence

pub mod batch;
pub mod harvester;
pub mod media;
pub mod state;

pub use batch::{process_batch, BatchContext};
pub use harvester::Harvester;
pub use media::download_media;
pub use state::{
    BatchReport, DownloadOutcome, FurthestPosition, HarvestSummary, ItemOutcome, ItemReport,
    StopReason,
};
