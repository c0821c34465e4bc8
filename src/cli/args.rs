//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, ListingSort};

/// Reddit media harvester CLI.
#[derive(Parser, Debug)]
#[command(
    name = "reddit-harvester",
    version,
    about = "Download images from a subreddit, resuming where the last run stopped",
    long_about = "Pages through a subreddit listing or search and saves every image and gallery \
                  member into one folder per post.\n\n\
                  Progress is kept in a cursor file inside the download folder, so an \
                  interrupted run continues from the last processed post."
)]
pub struct Args {
    /// Base directory for downloads.
    #[arg(short = 'd', long = "download-folder", env = "HARVESTER_DOWNLOAD_FOLDER")]
    pub download_directory: Option<PathBuf>,

    /// Subreddit to harvest, with or without the "r/" prefix.
    #[arg(short, long)]
    pub subreddit: Option<String>,

    /// Search the subreddit for this query instead of reading its listing.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Listing order.
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Only keep media of exactly this resolution.
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["WIDTH", "HEIGHT"],
        conflicts_with = "aspect_ratio"
    )]
    pub resolution: Option<Vec<u32>>,

    /// Only keep media with this aspect ratio, e.g. `16 9`.
    #[arg(short, long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    pub aspect_ratio: Option<Vec<u32>>,

    /// Also download links to redgifs.
    #[arg(long)]
    pub allow_redgifs: bool,

    /// Stop after this many pages.
    #[arg(long)]
    pub max_batches: Option<u64>,

    /// Posts processed at the same time.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Hide per-file download messages.
    #[arg(long)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI listing order argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Hot,
    New,
    Top,
    Rising,
}

impl From<SortArg> for ListingSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Hot => ListingSort::Hot,
            SortArg::New => ListingSort::New,
            SortArg::Top => ListingSort::Top,
            SortArg::Rising => ListingSort::Rising,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(subreddit) = self.subreddit {
            config.target.subreddit = subreddit;
        }

        if let Some(query) = self.query {
            config.target.query = Some(query);
        }

        if let Some(sort) = self.sort {
            config.target.sort = sort.into();
        }

        // A filter given on the command line replaces the configured one
        if let Some([w, h]) = self.resolution.as_deref().and_then(pair) {
            config.filter.resolution = Some([w, h]);
            config.filter.aspect_ratio = None;
        }

        if let Some([w, h]) = self.aspect_ratio.as_deref().and_then(pair) {
            config.filter.aspect_ratio = Some([w, h]);
            config.filter.resolution = None;
        }

        if let Some(dir) = self.download_directory {
            config.options.download_directory = dir;
        }

        if self.allow_redgifs {
            config.options.allow_redgifs = true;
        }

        if let Some(max) = self.max_batches {
            config.options.max_batches = Some(max);
        }

        if let Some(concurrency) = self.concurrency {
            config.options.max_concurrent_items = concurrency;
        }

        if self.quiet {
            config.options.show_downloads = false;
        }
    }
}

fn pair(values: &[u32]) -> Option<[u32; 2]> {
    match values {
        [w, h] => Some([*w, *h]),
        _ => None,
    }
}
