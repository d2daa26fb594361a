//! Command line interface of the `downloader` binary.

use crate::download::{
    DownloadRequest, DEFAULT_NUM_CONNECTIONS, DEFAULT_RETRIES, DEFAULT_SEGMENT_THRESHOLD,
};
use crate::downloader::{Downloader, DownloaderBuilder};
use crate::error::{Error, Result};

use clap::Parser;
use reqwest::Url;
use std::path::PathBuf;

/// Download a file over HTTP(S), splitting it into concurrent range requests
/// when the server supports them.
#[derive(Debug, Parser)]
#[command(name = "downloader", version, about, long_about = None)]
pub struct Cli {
    /// URL of the file to download
    pub url: String,

    /// Maximum attempts per segment, or for the whole file
    #[arg(
        short,
        long,
        value_name = "RETRIES",
        default_value_t = DEFAULT_RETRIES,
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    pub retries: u32,

    /// Maximum number of concurrent connections
    #[arg(
        short = 'n',
        long = "num-con",
        value_name = "NUM_CON",
        default_value_t = DEFAULT_NUM_CONNECTIONS as u32,
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    pub num_con: u32,

    /// Size in bytes at or below which the file is fetched with one request
    #[arg(
        short = 's',
        long = "seg-size",
        value_name = "SEG_SIZE",
        default_value_t = DEFAULT_SEGMENT_THRESHOLD
    )]
    pub seg_size: u64,

    /// Output filename, derived from the URL when omitted
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Directory to write the file into
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Probe with a one-byte range GET instead of HEAD
    #[arg(long)]
    pub range_probe: bool,

    /// Hide the progress bars
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the download request described by the arguments.
    pub fn request(&self) -> Result<DownloadRequest> {
        let url = Url::parse(&self.url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", self.url)))?;
        let mut request = DownloadRequest::new(&url)
            .with_retries(self.retries)
            .with_num_connections(self.num_con as usize)
            .with_segment_threshold(self.seg_size);
        if let Some(ref name) = self.output {
            request = request.with_filename(name.clone());
        }
        request.validate()?;
        Ok(request)
    }

    /// Build the downloader described by the arguments.
    pub fn downloader(&self) -> Downloader {
        let mut builder = if self.quiet {
            DownloaderBuilder::hidden()
        } else {
            DownloaderBuilder::new()
        };
        if let Some(ref dir) = self.directory {
            builder = builder.directory(dir.clone());
        }
        builder
            .use_range_for_content_length(self.range_probe)
            .build()
    }
}
