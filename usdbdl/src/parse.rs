// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

use std::sync::LazyLock;

use regex::Regex;

use crate::{Headers, Song};

/// Prefixes of header lines that are regenerated and never read.
const IGNORED_HEADER_PREFIXES: [&str; 2] = ["#MP3", "#COVER"];

const VIDEO_HEADER_PREFIX: &str = "#VIDEO";

const HEADER_PREFIX: char = '#';

const HEADER_SEPARATOR: char = ':';

static VIDEO_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:a=|v=)([A-Za-z0-9_-]{11})").expect("valid video id pattern")
});

/// Extracts the YouTube video id from a `#VIDEO` header line.
///
/// Looks for the first `a=` or `v=` followed by 11 id characters.
#[must_use]
pub fn extract_video_id(line: &str) -> Option<&str> {
    VIDEO_ID_PATTERN
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

/// Parses the contents of a song file.
///
/// `name` is the stem of the file name. Returns `None` if no video id
/// could be found. Malformed lines never fail the parse.
#[must_use]
pub fn parse_song(name: &str, content: &str) -> Option<Song> {
    log::debug!("Start parsing file {name}");
    let mut video_id = None;
    let mut headers = Headers::new();
    let mut lyrics = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty()
            || IGNORED_HEADER_PREFIXES
                .iter()
                .any(|prefix| line.starts_with(prefix))
        {
            continue;
        }
        if line.starts_with(VIDEO_HEADER_PREFIX) {
            // The last #VIDEO line decides, even without a recognizable id.
            video_id = extract_video_id(line).map(str::to_owned);
            continue;
        }
        if let Some(header) = line.strip_prefix(HEADER_PREFIX) {
            let (key, value) = header
                .split_once(HEADER_SEPARATOR)
                .unwrap_or((header, ""));
            headers.insert(key.trim(), value.trim());
            continue;
        }
        lyrics.push(line.to_owned());
    }
    let Some(video_id) = video_id else {
        log::debug!("File {name} is missing video id");
        return None;
    };
    let song = Song::new(name, video_id, headers, lyrics);
    debug_assert!(song.is_some());
    log::debug!("Parsed file {name}");
    song
}

#[cfg(test)]
mod tests {
    use crate::Headers;

    use super::{extract_video_id, parse_song};

    #[test]
    fn extract_video_id_from_header_line() {
        for (line, expected) in [
            ("#VIDEO:a=dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("#VIDEO:v=dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("#VIDEO:a=dQw4w9WgXcQ, other properties", Some("dQw4w9WgXcQ")),
            ("#VIDEO:co=cover.jpg,v=a_b-c1D2e3F", Some("a_b-c1D2e3F")),
            ("#VIDEO: no id here", None),
            ("#VIDEO:v=tooShort", None),
        ] {
            assert_eq!(extract_video_id(line), expected, "{line}");
        }
    }

    #[test]
    fn parse_song_file() {
        let content = "
            #ARTIST:Test
            #TITLE:My Song
            #MP3:Some Other.mp3
            #COVER:Some Other.jpg
            #VIDEO:v=dQw4w9WgXcQ,co=cover.jpg

            : 0 1 2 My
            : 3 4 5 Song
            E
        ";
        let song = parse_song("Test - My Song", content).unwrap();
        assert_eq!(song.name(), "Test - My Song");
        assert_eq!(song.video_id(), "dQw4w9WgXcQ");
        let expected_headers: Headers = [
            ("ARTIST", "Test"),
            ("TITLE", "My Song"),
            ("COVER", "Test - My Song.jpg"),
            ("MP3", "Test - My Song.mp3"),
            ("VIDEO", "Test - My Song.webm"),
        ]
        .into_iter()
        .collect();
        assert_eq!(song.headers(), &expected_headers);
        assert_eq!(song.lyrics(), [": 0 1 2 My", ": 3 4 5 Song", "E"]);
    }

    #[test]
    fn parse_song_overwrites_media_headers() {
        let content = "#VIDEO:a=dQw4w9WgXcQ\n#MP3:Other.mp3\n#COVER:Other.jpg";
        let song = parse_song("Name", content).unwrap();
        assert_eq!(song.headers().get("COVER"), Some("Name.jpg"));
        assert_eq!(song.headers().get("MP3"), Some("Name.mp3"));
        assert_eq!(song.headers().get("VIDEO"), Some("Name.webm"));
        assert_eq!(song.headers().len(), 3);
    }

    #[test]
    fn parse_song_without_video_id() {
        assert!(parse_song("Name", "#ARTIST:Test\n#TITLE:Song\n: 0 1 2 La").is_none());
        assert!(parse_song("Name", "#VIDEO:no id\n: 0 1 2 La").is_none());
        assert!(parse_song("Name", "").is_none());
    }

    #[test]
    fn parse_song_headers_last_write_wins() {
        let content = "#TITLE:First\n#ARTIST:Test\n#TITLE : Second \n#VIDEO:v=dQw4w9WgXcQ";
        let song = parse_song("Name", content).unwrap();
        assert_eq!(
            song.headers().iter().take(2).collect::<Vec<_>>(),
            [("TITLE", "Second"), ("ARTIST", "Test")]
        );
    }

    #[test]
    fn parse_song_header_without_separator() {
        let content = "#VIDEO:v=dQw4w9WgXcQ\n# DUETSINGERP1 ";
        let song = parse_song("Name", content).unwrap();
        assert_eq!(song.headers().get("DUETSINGERP1"), Some(""));
    }

    #[test]
    fn parse_song_last_video_line_without_id_rejects() {
        assert!(parse_song("Name", "#VIDEO:v=dQw4w9WgXcQ\n#VIDEO:nothing").is_none());
    }

    #[test]
    fn parse_song_last_video_line_wins() {
        let content = "#VIDEO:nothing\n#VIDEO:v=dQw4w9WgXcQ";
        let song = parse_song("Name", content).unwrap();
        assert_eq!(song.video_id(), "dQw4w9WgXcQ");
    }
}
