// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

use std::path::Path;

use crate::{ScanDiagnostics, scan_songs, write_song};

/// Writes all songs from `input_dir` into `output_dir` without fetching any media.
///
/// Returns the number of written songs. Aborts on the first write error.
pub fn normalize_songs<D>(
    diagnostics: D,
    input_dir: &Path,
    output_dir: &Path,
) -> anyhow::Result<usize>
where
    D: ScanDiagnostics,
{
    let mut written_count = 0;
    for song in scan_songs(input_dir, diagnostics)? {
        write_song(output_dir, &song)?;
        written_count += 1;
    }
    log::info!("Normalized {written_count} song file(s)");
    Ok(written_count)
}
