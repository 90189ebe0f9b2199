// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

#![doc = include_str!("../README.md")]

mod fetch;
pub use self::fetch::{FetchError, MediaFetcher, MediaKind};

mod normalize;
pub use self::normalize::normalize_songs;

mod parse;
pub use self::parse::{extract_video_id, parse_song};

mod report;
pub use self::report::Reporter;

mod scan;
pub use self::scan::{LogDiagnostics, ScanDiagnostics, SkipReason, SongScan, scan_songs};

mod song;
pub use self::song::{
    AUDIO_FILE_EXTENSION, COVER_FILE_EXTENSION, COVER_HEADER, Headers, MP3_HEADER, Song,
    VIDEO_FILE_EXTENSION, VIDEO_HEADER,
};

mod write;
pub use self::write::{SONG_FILE_EXTENSION, song_file_path, song_output_stem, write_song};

#[cfg(feature = "batch")]
pub mod batch;
#[cfg(feature = "batch")]
pub use self::batch::{BatchOutcome, download_songs};

#[cfg(feature = "batch")]
pub mod ytdlp;
#[cfg(feature = "batch")]
pub use self::ytdlp::{YtDlpFetcher, YtDlpOptions};
