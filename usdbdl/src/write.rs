// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

use std::{
    fs,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::Song;

/// File extension of song files.
pub const SONG_FILE_EXTENSION: &str = "txt";

/// Path stem of all output files of a song.
///
/// `{output_dir}/{name}/{name}` without an extension.
#[must_use]
pub fn song_output_stem(output_dir: &Path, song: &Song) -> PathBuf {
    output_dir.join(song.name()).join(song.name())
}

/// Path of the normalized song file.
#[must_use]
pub fn song_file_path(output_dir: &Path, song: &Song) -> PathBuf {
    // Song names may contain dots and must not be treated as extensions.
    let mut file_path = song_output_stem(output_dir, song).into_os_string();
    file_path.push(".");
    file_path.push(SONG_FILE_EXTENSION);
    file_path.into()
}

/// Writes the normalized song file into its own directory below `output_dir`.
///
/// Missing directories are created. An existing file is overwritten.
///
/// Returns the path of the written file.
pub fn write_song(output_dir: &Path, song: &Song) -> anyhow::Result<PathBuf> {
    let file_path = song_file_path(output_dir, song);
    if let Some(parent_path) = file_path.parent() {
        fs::create_dir_all(parent_path).with_context(|| {
            format!(
                "failed to create directory \"{parent_path}\"",
                parent_path = parent_path.display()
            )
        })?;
    }
    let file = fs::File::create(&file_path).with_context(|| {
        format!(
            "failed to create file \"{file_path}\"",
            file_path = file_path.display()
        )
    })?;
    write_song_lines(BufWriter::new(file), song).with_context(|| {
        format!(
            "failed to write file \"{file_path}\"",
            file_path = file_path.display()
        )
    })?;
    log::info!(
        "Wrote file {name} to file {file_path}",
        name = song.name(),
        file_path = file_path.display()
    );
    Ok(file_path)
}

fn write_song_lines(mut writer: impl io::Write, song: &Song) -> io::Result<()> {
    for (key, value) in song.headers().iter() {
        writeln!(writer, "#{key}:{value}")?;
    }
    for line in song.lyrics() {
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}
