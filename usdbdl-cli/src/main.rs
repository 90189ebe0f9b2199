// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use clap::{Parser, Subcommand};
use tokio::task::block_in_place;

use usdbdl::{
    BatchOutcome, LogDiagnostics, YtDlpFetcher, YtDlpOptions, download_songs, normalize_songs,
};

mod console;
use self::console::Console;

const DEFAULT_INPUT_DIR: &str = "input";

const DEFAULT_OUTPUT_DIR: &str = "output";

/// Exit code after an interrupt, i.e. 128 + SIGINT.
const INTERRUPTED_EXIT_CODE: u8 = 130;

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize song files and download their audio and video (default).
    Download(DownloadArgs),
    /// Normalize song files without downloading any media.
    Normalize,
}

#[derive(Debug, Default, clap::Args)]
struct DownloadArgs {
    /// Path of the yt-dlp executable.
    #[arg(long)]
    yt_dlp: Option<PathBuf>,

    /// Number of fragments of a single download that are fetched concurrently.
    #[arg(long)]
    concurrent_fragments: Option<u16>,

    /// Bitrate of the extracted audio in kbit/s.
    #[arg(long)]
    audio_quality: Option<u16>,

    /// Network timeout in seconds.
    #[arg(long)]
    socket_timeout: Option<u64>,
}

impl DownloadArgs {
    fn into_options(self) -> YtDlpOptions {
        let Self {
            yt_dlp,
            concurrent_fragments,
            audio_quality,
            socket_timeout,
        } = self;
        let defaults = YtDlpOptions::default();
        YtDlpOptions {
            executable: yt_dlp.unwrap_or(defaults.executable),
            concurrent_fragments: concurrent_fragments.unwrap_or(defaults.concurrent_fragments),
            audio_quality_kbps: audio_quality.unwrap_or(defaults.audio_quality_kbps),
            socket_timeout: socket_timeout.map(Duration::from_secs),
            ..defaults
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory with the song files.
    #[arg(long, default_value = DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Directory for the normalized song files and media.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Disable console output.
    #[arg(long, short)]
    quiet: bool,

    /// Log informational messages.
    #[arg(long, short)]
    verbose: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // In Windows, we must request a virtual terminal environment to display colors correctly.
    // This enables support for the ANSI escape sequences used by `colored`.
    //
    // <https://github.com/colored-rs/colored/issues/59#issuecomment-954355180>
    #[cfg(windows)]
    let _unused = colored::control::set_virtual_terminal(true);

    let Args {
        input_dir,
        output_dir,
        quiet,
        verbose,
        command,
    } = Args::parse();

    let default_log_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_log_filter))
        .init();

    let mut console = Console::new(!quiet);
    console.print_header(&input_dir, &output_dir);

    let command = command.unwrap_or_else(|| Command::Download(DownloadArgs::default()));
    let result = tokio::select! {
        result = run(command, &mut console, &input_dir, &output_dir) => Some(result),
        Ok(()) = tokio::signal::ctrl_c() => None,
    };
    match result {
        Some(Ok(())) => ExitCode::SUCCESS,
        Some(Err(err)) => {
            log::error!("Aborted: {err:#}");
            console.print_failure(&format!("{err:#}"));
            ExitCode::FAILURE
        }
        None => {
            // Pending downloads have been killed when dropping the batch.
            log::warn!("Interrupted");
            console.print_interrupt();
            ExitCode::from(INTERRUPTED_EXIT_CODE)
        }
    }
}

async fn run(
    command: Command,
    console: &mut Console,
    input_dir: &Path,
    output_dir: &Path,
) -> anyhow::Result<()> {
    log::info!("Starting application");
    match command {
        Command::Download(args) => {
            let fetcher = YtDlpFetcher::new(args.into_options());
            let BatchOutcome {
                total,
                processed,
                failed,
            } = download_songs(&fetcher, console, LogDiagnostics, input_dir, output_dir).await?;
            log::info!(
                "Downloaded songs: total = {total}, processed = {processed}, failed = {failed}",
                failed = failed.len()
            );
        }
        Command::Normalize => {
            // Blocking file I/O operations.
            let count =
                block_in_place(|| normalize_songs(LogDiagnostics, input_dir, output_dir))?;
            console.print_normalized(count);
        }
    }
    log::info!("Finished application");
    Ok(())
}
