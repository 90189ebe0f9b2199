// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

use crate::FetchError;

mod download_songs;
pub use self::download_songs::{
    DOWNLOAD_FAILED_MESSAGE, SONG_WRITTEN_MESSAGE, download_songs, fetch_media,
};

#[derive(Debug)]
pub struct FailedSong {
    pub name: String,
    pub error: FetchError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Number of songs found.
    pub total: usize,

    /// Number of songs that succeeded.
    pub processed: usize,

    /// Songs that could not be downloaded.
    pub failed: Vec<FailedSong>,
}

impl BatchOutcome {
    #[must_use]
    pub(crate) const fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            failed: Vec::new(),
        }
    }

    #[must_use]
    pub const fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
