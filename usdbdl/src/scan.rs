// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    vec,
};

use anyhow::Context as _;

use crate::{SONG_FILE_EXTENSION, Song, parse_song};

/// Why a song file has been skipped.
#[derive(Debug)]
pub enum SkipReason {
    /// The file name is not valid UTF-8.
    InvalidFileName,
    /// The file could not be read, e.g. because it is not valid UTF-8.
    Unreadable(io::Error),
    /// The file contains no video id.
    MissingVideoId,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileName => f.write_str("invalid file name"),
            Self::Unreadable(err) => write!(f, "unreadable: {err}"),
            Self::MissingVideoId => f.write_str("missing video id"),
        }
    }
}

/// Receives notifications about skipped song files.
pub trait ScanDiagnostics {
    fn skipped(&mut self, file_path: &Path, reason: &SkipReason);
}

impl<D> ScanDiagnostics for &mut D
where
    D: ScanDiagnostics + ?Sized,
{
    fn skipped(&mut self, file_path: &Path, reason: &SkipReason) {
        (**self).skipped(file_path, reason);
    }
}

/// Logs skipped files as warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl ScanDiagnostics for LogDiagnostics {
    fn skipped(&mut self, file_path: &Path, reason: &SkipReason) {
        log::warn!(
            "Skipping file \"{file_path}\": {reason}",
            file_path = file_path.display()
        );
    }
}

/// Lazily parses the song files of a directory.
///
/// Each file is read and parsed on demand. Files that could not be
/// parsed are reported to the diagnostics and skipped. Scanning again
/// requires a new [`scan_songs()`].
#[derive(Debug)]
pub struct SongScan<D> {
    file_paths: vec::IntoIter<PathBuf>,
    diagnostics: D,
    parsed_count: usize,
}

impl<D> SongScan<D> {
    /// Number of remaining candidate files.
    #[must_use]
    pub fn remaining_files(&self) -> usize {
        self.file_paths.len()
    }
}

impl<D> Iterator for SongScan<D>
where
    D: ScanDiagnostics,
{
    type Item = Song;

    fn next(&mut self) -> Option<Self::Item> {
        for file_path in self.file_paths.by_ref() {
            match read_song_file(&file_path) {
                Ok(song) => {
                    self.parsed_count += 1;
                    return Some(song);
                }
                Err(reason) => {
                    self.diagnostics.skipped(&file_path, &reason);
                }
            }
        }
        if self.parsed_count > 0 {
            log::info!("Scanned {count} file(s)", count = self.parsed_count);
            self.parsed_count = 0;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.file_paths.len()))
    }
}

/// Scans `input_dir` for song files.
///
/// Only the files with a `.txt` extension directly inside `input_dir`
/// are considered, in the order of their file names. A missing
/// `input_dir` results in an empty scan.
pub fn scan_songs<D>(input_dir: &Path, diagnostics: D) -> anyhow::Result<SongScan<D>>
where
    D: ScanDiagnostics,
{
    let file_paths = if input_dir.exists() {
        log::info!(
            "Start scanning input directory {input_dir}",
            input_dir = input_dir.display()
        );
        list_song_files(input_dir).with_context(|| {
            format!(
                "failed to list input directory \"{input_dir}\"",
                input_dir = input_dir.display()
            )
        })?
    } else {
        log::warn!(
            "Input directory {input_dir} is missing",
            input_dir = input_dir.display()
        );
        Vec::new()
    };
    Ok(SongScan {
        file_paths: file_paths.into_iter(),
        diagnostics,
        parsed_count: 0,
    })
}

fn list_song_files(input_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut file_paths = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let file_path = entry?.path();
        if !file_path
            .extension()
            .is_some_and(|extension| extension == SONG_FILE_EXTENSION)
        {
            continue;
        }
        if !file_path.is_file() {
            log::debug!(
                "Ignoring \"{file_path}\" that is not a file",
                file_path = file_path.display()
            );
            continue;
        }
        file_paths.push(file_path);
    }
    // Directory order depends on the file system.
    file_paths.sort_unstable();
    Ok(file_paths)
}

fn read_song_file(file_path: &Path) -> Result<Song, SkipReason> {
    let Some(name) = file_path.file_stem().and_then(|stem| stem.to_str()) else {
        return Err(SkipReason::InvalidFileName);
    };
    let content = fs::read_to_string(file_path).map_err(SkipReason::Unreadable)?;
    parse_song(name, &content).ok_or(SkipReason::MissingVideoId)
}
