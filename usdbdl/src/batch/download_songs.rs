// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

use std::path::Path;

use anyhow::Context as _;
use futures_util::future;
use tokio::{
    runtime::{Handle, RuntimeFlavor},
    task::block_in_place,
};

use crate::{
    FetchError, MediaFetcher, Reporter, ScanDiagnostics, scan_songs, song_output_stem, write_song,
};

use super::{BatchOutcome, FailedSong};

pub const SONG_WRITTEN_MESSAGE: &str = "Parsed song file";

pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download audio and video";

/// Fetches audio and video concurrently.
///
/// Both fetches are always awaited until completion. Fatal errors take
/// precedence over download errors, audio takes precedence over video.
pub async fn fetch_media<F>(
    fetcher: &F,
    video_id: &str,
    output_stem: &Path,
) -> Result<(), FetchError>
where
    F: MediaFetcher + ?Sized,
{
    let (audio_result, video_result) = future::join(
        fetcher.fetch_audio(video_id, output_stem),
        fetcher.fetch_video(video_id, output_stem),
    )
    .await;
    match (audio_result, video_result) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(err @ FetchError::Io(_)), _) | (_, Err(err @ FetchError::Io(_))) => Err(err),
        (Err(err), video_result) => {
            if let Err(video_err) = video_result {
                log::debug!("Ignoring subsequent error: {video_err}");
            }
            Err(err)
        }
        (Ok(()), Err(err)) => Err(err),
    }
}

fn downloading_message(video_id: &str) -> String {
    format!("Downloading audio and video (ID: {video_id})")
}

/// Runs blocking file I/O without stalling other tasks.
///
/// `block_in_place` is only available on the multi-threaded runtime
/// and panics otherwise, so the closure is invoked directly there.
fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current().map(|handle| handle.runtime_flavor()) {
        Ok(RuntimeFlavor::CurrentThread) | Err(_) => f(),
        Ok(_) => block_in_place(f),
    }
}

/// Writes all songs from `input_dir` into `output_dir` and downloads
/// their audio and video.
///
/// Songs are processed one after another. A failed download only
/// affects the current song. All other errors abort the batch,
/// including failures when writing the song file.
///
/// Blocking file I/O is moved out of the async context when running
/// on a multi-threaded runtime. On a current-thread runtime it blocks
/// the executor while scanning and writing.
pub async fn download_songs<F, R, D>(
    fetcher: &F,
    reporter: &mut R,
    diagnostics: D,
    input_dir: &Path,
    output_dir: &Path,
) -> anyhow::Result<BatchOutcome>
where
    F: MediaFetcher + ?Sized,
    R: Reporter + ?Sized,
    D: ScanDiagnostics,
{
    log::info!("Starting download of songs");

    // Blocking file I/O operations.
    let songs = run_blocking(|| {
        scan_songs(input_dir, diagnostics).map(|scan| scan.collect::<Vec<_>>())
    })?;

    let total = songs.len();
    reporter.report_count(total);
    let mut outcome = BatchOutcome::new(total);
    if songs.is_empty() {
        return Ok(outcome);
    }

    for (index, song) in songs.iter().enumerate() {
        reporter.report_item_start(index + 1, total, song.name());

        run_blocking(|| write_song(output_dir, song))
            .with_context(|| format!("failed to write song {name}", name = song.name()))?;
        reporter.report_item_progress(SONG_WRITTEN_MESSAGE);

        let video_id = song.video_id();
        let output_stem = song_output_stem(output_dir, song);
        let message = downloading_message(video_id);
        reporter.report_item_pending(&message);
        match fetch_media(fetcher, video_id, &output_stem).await {
            Ok(()) => {
                reporter.report_item_progress(&message);
                reporter.report_item_success();
                outcome.processed += 1;
            }
            Err(err @ FetchError::Download { .. }) => {
                log::warn!(
                    "Failed to download song {name}: {err}",
                    name = song.name()
                );
                reporter.report_item_failure(DOWNLOAD_FAILED_MESSAGE);
                outcome.failed.push(FailedSong {
                    name: song.name().to_owned(),
                    error: err,
                });
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to download song {name}", name = song.name())
                });
            }
        }
    }

    reporter.report_summary(outcome.processed, outcome.failed_count());
    log::info!(
        "Finished download of songs: processed = {processed}, failed = {failed}",
        processed = outcome.processed,
        failed = outcome.failed_count()
    );
    Ok(outcome)
}
