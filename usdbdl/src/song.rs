// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

/// Header key of the cover image file.
pub const COVER_HEADER: &str = "COVER";

/// Header key of the audio file.
pub const MP3_HEADER: &str = "MP3";

/// Header key of the video file.
pub const VIDEO_HEADER: &str = "VIDEO";

/// File extension of the cover image.
pub const COVER_FILE_EXTENSION: &str = "jpg";

/// File extension of the downloaded audio.
pub const AUDIO_FILE_EXTENSION: &str = "mp3";

/// File extension of the downloaded video.
pub const VIDEO_FILE_EXTENSION: &str = "webm";

/// Header lines in insertion order.
///
/// Keys are unique. Inserting an existing key replaces its value
/// but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Inserts or replaces a header.
    ///
    /// Returns the replaced value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some((_, existing)) = self.0.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }
        self.0.push((key, value));
        None
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (key, value) in iter {
            headers.insert(key, value);
        }
        headers
    }
}

/// A parsed song file.
///
/// Immutable after construction. The video id is never empty and the
/// media headers always refer to the files named after the song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    name: String,
    video_id: String,
    headers: Headers,
    lyrics: Vec<String>,
}

impl Song {
    /// Assembles a song and overwrites the media headers.
    ///
    /// Returns `None` if `video_id` is empty.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        video_id: impl Into<String>,
        mut headers: Headers,
        lyrics: Vec<String>,
    ) -> Option<Self> {
        let name = name.into();
        let video_id = video_id.into();
        if video_id.is_empty() {
            return None;
        }
        headers.insert(COVER_HEADER, format!("{name}.{COVER_FILE_EXTENSION}"));
        headers.insert(MP3_HEADER, format!("{name}.{AUDIO_FILE_EXTENSION}"));
        headers.insert(VIDEO_HEADER, format!("{name}.{VIDEO_FILE_EXTENSION}"));
        Some(Self {
            name,
            video_id,
            headers,
            lyrics,
        })
    }

    /// The file stem of the source file.
    ///
    /// Also used for naming the output directory and all output files.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The YouTube video id.
    #[must_use]
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Lyrics and note lines, verbatim and in source order.
    #[must_use]
    pub fn lyrics(&self) -> &[String] {
        &self.lyrics
    }
}

#[cfg(test)]
mod tests {
    use super::{Headers, Song};

    #[test]
    fn insert_existing_header_keeps_position() {
        let mut headers = Headers::new();
        assert_eq!(headers.insert("TITLE", "First"), None);
        assert_eq!(headers.insert("ARTIST", "Someone"), None);
        assert_eq!(headers.insert("TITLE", "Second").as_deref(), Some("First"));
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            [("TITLE", "Second"), ("ARTIST", "Someone")]
        );
    }

    #[test]
    fn new_song_overwrites_media_headers() {
        let headers = [
            ("MP3", "Other.mp3"),
            ("ARTIST", "Test"),
            ("COVER", "Other.jpg"),
        ]
        .into_iter()
        .collect();
        let song = Song::new("Test - Song", "dQw4w9WgXcQ", headers, vec![]).unwrap();
        assert_eq!(
            song.headers().iter().collect::<Vec<_>>(),
            [
                ("MP3", "Test - Song.mp3"),
                ("ARTIST", "Test"),
                ("COVER", "Test - Song.jpg"),
                ("VIDEO", "Test - Song.webm"),
            ]
        );
    }

    #[test]
    fn new_song_requires_video_id() {
        assert!(Song::new("Test", "", Headers::new(), vec![]).is_none());
    }
}
