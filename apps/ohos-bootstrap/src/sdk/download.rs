#![warn(clippy::pedantic)]

//! HTTP download of SDK bundles.
//!
//! ## Features
//!
//! - Streaming downloads with a terminal progress bar
//! - Automatic retry with exponential backoff (3 attempts)
//! - Downloads to temporary file, then renames on success
//! - Reuse of an already downloaded bundle when its checksum matches

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use tokio::io::AsyncWriteExt;

use super::SdkError;
use super::verify::verify_checksum;

/// Maximum number of download retry attempts.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries in milliseconds.
const BASE_RETRY_DELAY_MS: u64 = 1000;

/// Request timeout in seconds. SDK bundles are several gigabytes.
const REQUEST_TIMEOUT_SECS: u64 = 3600;

/// Ensures a verified copy of `url` exists at `dest`.
///
/// An existing file at `dest` is reused if it matches `checksum`; otherwise it
/// is discarded and downloaded again. In offline mode nothing is downloaded.
///
/// # Errors
///
/// Returns an error if:
/// - Offline mode is set and no valid cached file exists
/// - The download fails after all retries
/// - The downloaded file does not match `checksum`
pub async fn fetch_verified(url: &str, dest: &Path, checksum: &str, offline: bool) -> Result<()> {
    if dest.is_file() {
        if verify_checksum(dest, checksum).is_ok() {
            tracing::info!(path = %dest.display(), "Using cached SDK bundle");
            return Ok(());
        }
        tracing::warn!(path = %dest.display(), "Cached SDK bundle is corrupt, discarding");
        tokio::fs::remove_file(dest)
            .await
            .with_context(|| format!("Failed to remove {}", dest.display()))?;
    }

    if offline {
        return Err(SdkError::Offline(dest.to_path_buf()).into());
    }

    tracing::info!(%url, "Downloading SDK bundle");
    download_file(url, dest).await?;

    tracing::info!(path = %dest.display(), "Verifying checksum");
    if let Err(err) = verify_checksum(dest, checksum) {
        tokio::fs::remove_file(dest).await.ok();
        return Err(err);
    }

    Ok(())
}

/// Downloads a file from the given URL to the specified path with progress display.
///
/// The download uses streaming to avoid loading the entire file into memory.
///
/// # Errors
///
/// Returns an error if:
/// - The network request fails after all retries
/// - The destination file cannot be created
/// - Writing to the file fails
pub async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let temp_path = dest.with_extension("tmp");

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut last_error = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            let delay = calculate_retry_delay(attempt);
            tracing::warn!(
                attempt = attempt + 1,
                max = MAX_RETRIES,
                "Retrying download"
            );
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        match download_with_progress(url, &temp_path).await {
            Ok(()) => {
                tokio::fs::rename(&temp_path, dest).await.with_context(|| {
                    format!(
                        "Failed to rename {} to {}",
                        temp_path.display(),
                        dest.display()
                    )
                })?;
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(error = %format!("{e:#}"), "Download attempt failed");
                last_error = Some(e);
                tokio::fs::remove_file(&temp_path).await.ok();
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| anyhow::anyhow!("Download failed after {MAX_RETRIES} attempts")))
}

/// Downloads a file with progress bar display.
async fn download_with_progress(url: &str, dest: &Path) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to connect to {url}"))?;

    if !response.status().is_success() {
        bail!("HTTP error {}: {url}", response.status());
    }

    let pb = match response.content_length() {
        Some(total) => ProgressBar::new(total),
        None => ProgressBar::new_spinner(),
    };
    pb.set_style(progress_style());

    let mut file = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("Failed to create file: {}", dest.display()))?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.with_context(|| format!("Failed to read chunk from {url}"))?;
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write to {}", dest.display()))?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()
        .await
        .with_context(|| format!("Failed to flush {}", dest.display()))?;

    pb.finish_with_message("Download complete");

    Ok(())
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Calculates the retry delay with exponential backoff and jitter.
///
/// The delay doubles with each attempt (1s, 2s, 4s) with +/- 25% jitter.
fn calculate_retry_delay(attempt: u32) -> u64 {
    let base_delay = BASE_RETRY_DELAY_MS * 2u64.pow(attempt);
    let jitter_range = base_delay / 4;
    let jitter = rand::rng().random_range(0..=jitter_range * 2);
    base_delay - jitter_range + jitter
}
