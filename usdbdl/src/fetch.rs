// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

use std::{fmt, future::Future, io, path::Path};

/// Kind of media that is fetched for a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The download failed.
    ///
    /// Only affects a single song and does not abort a batch.
    #[error("failed to download {kind}: {reason}")]
    Download { kind: MediaKind, reason: String },

    /// Unexpected I/O error, e.g. the downloader could not be started.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl FetchError {
    /// Whether the error only affects a single song.
    #[must_use]
    pub const fn is_download(&self) -> bool {
        matches!(self, Self::Download { .. })
    }
}

/// Fetches audio and video for a YouTube video id.
///
/// `output_stem` is the output file path without an extension. The
/// extension is chosen by the fetcher according to the media kind.
pub trait MediaFetcher {
    fn fetch_audio(
        &self,
        video_id: &str,
        output_stem: &Path,
    ) -> impl Future<Output = Result<(), FetchError>>;

    fn fetch_video(
        &self,
        video_id: &str,
        output_stem: &Path,
    ) -> impl Future<Output = Result<(), FetchError>>;
}
