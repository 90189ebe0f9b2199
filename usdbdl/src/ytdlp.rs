// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use tokio::process::Command;

use crate::{FetchError, MediaFetcher, MediaKind};

pub const DEFAULT_EXECUTABLE: &str = "yt-dlp";

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Options for invoking `yt-dlp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YtDlpOptions {
    /// Path or name of the `yt-dlp` executable.
    pub executable: PathBuf,

    /// Format selector for the audio stream.
    pub audio_format: String,

    /// Codec the audio is converted to.
    ///
    /// Determines the file extension of the audio file.
    pub audio_codec: String,

    /// Audio bitrate in kbit/s.
    pub audio_quality_kbps: u16,

    /// Format selector for the video stream.
    pub video_format: String,

    /// Container format for merging video streams.
    ///
    /// Determines the file extension of the video file.
    pub video_container: String,

    /// Number of fragments that are downloaded concurrently.
    pub concurrent_fragments: u16,

    pub socket_timeout: Option<Duration>,
}

impl Default for YtDlpOptions {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.into(),
            audio_format: "bestaudio[ext=m4a]/bestaudio".to_owned(),
            audio_codec: crate::AUDIO_FILE_EXTENSION.to_owned(),
            audio_quality_kbps: 192,
            video_format: "bestvideo[ext=webm]/bestvideo".to_owned(),
            video_container: crate::VIDEO_FILE_EXTENSION.to_owned(),
            concurrent_fragments: 5,
            socket_timeout: None,
        }
    }
}

/// Fetches media by running `yt-dlp`.
///
/// Each fetch spawns a separate child process that is killed when
/// the fetch is dropped before completion.
#[derive(Debug, Clone, Default)]
pub struct YtDlpFetcher {
    options: YtDlpOptions,
}

impl YtDlpFetcher {
    #[must_use]
    pub const fn new(options: YtDlpOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &YtDlpOptions {
        &self.options
    }

    /// Command-line arguments for downloading a single kind of media.
    #[must_use]
    pub fn download_args(
        &self,
        kind: MediaKind,
        video_id: &str,
        output_stem: &Path,
    ) -> Vec<OsString> {
        let YtDlpOptions {
            executable: _,
            audio_format,
            audio_codec,
            audio_quality_kbps,
            video_format,
            video_container,
            concurrent_fragments,
            socket_timeout,
        } = &self.options;
        let mut args: Vec<OsString> = [
            "--quiet",
            "--no-warnings",
            "--no-progress",
            "--no-color",
            "--concurrent-fragments",
        ]
        .into_iter()
        .map(Into::into)
        .collect();
        args.push(concurrent_fragments.to_string().into());
        if let Some(socket_timeout) = socket_timeout {
            args.push("--socket-timeout".into());
            args.push(socket_timeout.as_secs().to_string().into());
        }
        match kind {
            MediaKind::Audio => {
                args.push("--format".into());
                args.push(audio_format.into());
                args.push("--extract-audio".into());
                args.push("--audio-format".into());
                args.push(audio_codec.into());
                args.push("--audio-quality".into());
                args.push(format!("{audio_quality_kbps}K").into());
            }
            MediaKind::Video => {
                args.push("--format".into());
                args.push(video_format.into());
                args.push("--merge-output-format".into());
                args.push(video_container.into());
            }
        }
        // The extension is filled in by yt-dlp.
        let mut output_template = output_stem.as_os_str().to_owned();
        output_template.push(".%(ext)s");
        args.push("--output".into());
        args.push(output_template);
        args.push("--".into());
        args.push(download_url(video_id).into());
        args
    }

    async fn fetch(
        &self,
        kind: MediaKind,
        video_id: &str,
        output_stem: &Path,
    ) -> Result<(), FetchError> {
        log::info!("Starting download {kind} with id {video_id}");
        let output = Command::new(&self.options.executable)
            .args(self.download_args(kind, video_id, output_stem))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .inspect_err(|err| {
                log::error!(
                    "Failed to run {executable}: {err}",
                    executable = self.options.executable.display()
                );
            })?;
        if output.status.success() {
            log::info!("Successfully downloaded {kind} with id {video_id}");
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = match stderr.trim() {
            "" => format!("exited with {status}", status = output.status),
            stderr => stderr.to_owned(),
        };
        log::error!("Failed to download {kind} with id {video_id}: {reason}");
        Err(FetchError::Download { kind, reason })
    }
}

impl MediaFetcher for YtDlpFetcher {
    async fn fetch_audio(&self, video_id: &str, output_stem: &Path) -> Result<(), FetchError> {
        self.fetch(MediaKind::Audio, video_id, output_stem).await
    }

    async fn fetch_video(&self, video_id: &str, output_stem: &Path) -> Result<(), FetchError> {
        self.fetch(MediaKind::Video, video_id, output_stem).await
    }
}

#[must_use]
pub fn download_url(video_id: &str) -> String {
    format!("{WATCH_URL_PREFIX}{video_id}")
}

#[cfg(test)]
mod tests {
    use std::{ffi::OsString, path::Path, time::Duration};

    use crate::{FetchError, MediaFetcher as _, MediaKind};

    use super::{YtDlpFetcher, YtDlpOptions};

    fn args_to_strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|arg| arg.into_string().unwrap())
            .collect()
    }

    #[test]
    fn audio_download_args() {
        let fetcher = YtDlpFetcher::default();
        let args = fetcher.download_args(
            MediaKind::Audio,
            "dQw4w9WgXcQ",
            Path::new("out/Test - Song/Test - Song"),
        );
        assert_eq!(
            args_to_strings(args),
            [
                "--quiet",
                "--no-warnings",
                "--no-progress",
                "--no-color",
                "--concurrent-fragments",
                "5",
                "--format",
                "bestaudio[ext=m4a]/bestaudio",
                "--extract-audio",
                "--audio-format",
                "mp3",
                "--audio-quality",
                "192K",
                "--output",
                "out/Test - Song/Test - Song.%(ext)s",
                "--",
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            ]
        );
    }

    #[test]
    fn video_download_args() {
        let fetcher = YtDlpFetcher::new(YtDlpOptions {
            concurrent_fragments: 2,
            socket_timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        });
        let args = args_to_strings(fetcher.download_args(
            MediaKind::Video,
            "-startsWith",
            Path::new("Song"),
        ));
        assert_eq!(
            &args[4..],
            [
                "--concurrent-fragments",
                "2",
                "--socket-timeout",
                "30",
                "--format",
                "bestvideo[ext=webm]/bestvideo",
                "--merge-output-format",
                "webm",
                "--output",
                "Song.%(ext)s",
                "--",
                "https://www.youtube.com/watch?v=-startsWith",
            ]
        );
    }

    #[tokio::test]
    async fn missing_executable_is_io_error() {
        let fetcher = YtDlpFetcher::new(YtDlpOptions {
            executable: "./this-executable-does-not-exist".into(),
            ..Default::default()
        });
        let err = fetcher
            .fetch_audio("dQw4w9WgXcQ", Path::new("Song"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_executable_is_download_error() {
        let fetcher = YtDlpFetcher::new(YtDlpOptions {
            executable: "false".into(),
            ..Default::default()
        });
        let err = fetcher
            .fetch_video("dQw4w9WgXcQ", Path::new("Song"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Download {
                kind: MediaKind::Video,
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn succeeding_executable() {
        let fetcher = YtDlpFetcher::new(YtDlpOptions {
            executable: "true".into(),
            ..Default::default()
        });
        fetcher
            .fetch_audio("dQw4w9WgXcQ", Path::new("Song"))
            .await
            .unwrap();
    }
}
