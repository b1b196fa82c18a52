use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::metadata::{MetadataReader, TrackMetadata};
use super::model::Track;

/// FIFO of paths waiting to be read and appended to the playlist.
///
/// Batches are expanded (directories walked, non-audio files dropped) when
/// they are enqueued; the event loop then takes one path per iteration so a
/// large drop never stalls input handling.
#[derive(Debug)]
pub struct ImportQueue {
    pending: VecDeque<PathBuf>,
    extensions: Vec<String>,
    follow_links: bool,
    recursive: bool,
}

impl ImportQueue {
    pub fn new(settings: &LibrarySettings) -> Self {
        let extensions = settings
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Self {
            pending: VecDeque::new(),
            extensions,
            follow_links: settings.follow_links,
            recursive: settings.recursive,
        }
    }

    /// Queue a batch of candidate paths. Returns how many files were queued.
    ///
    /// Every queued path is absolute and canonical where the file system
    /// allows, so one file has one spelling in the playlist.
    pub fn enqueue<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let before = self.pending.len();
        for path in paths.into_iter().map(normalize) {
            if path.is_dir() {
                let found = self.walk(&path);
                self.pending.extend(found);
            } else if path.is_file() && self.is_audio_file(&path) {
                self.pending.push_back(path);
            } else {
                debug!(path = %path.display(), "skipping import candidate");
            }
        }
        self.pending.len() - before
    }

    /// Take the next path to import.
    pub fn pop_next(&mut self) -> Option<PathBuf> {
        self.pending.pop_front()
    }

    /// True while imports are outstanding.
    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Paths still waiting, in import order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.pending.iter().map(PathBuf::as_path)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| e == &ext)
            })
            .unwrap_or(false)
    }

    fn walk(&self, dir: &Path) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(dir).follow_links(self.follow_links);
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(Result::ok)
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && self.is_audio_file(p))
            .map(normalize)
            .collect();
        files.sort();
        files
    }
}

fn normalize(path: PathBuf) -> PathBuf {
    match fs::canonicalize(&path) {
        Ok(canonical) => canonical,
        Err(_) => std::path::absolute(&path).unwrap_or(path),
    }
}

/// Read `path` with `reader` and build a `Track`, falling back to
/// filename-derived defaults when the tags can't be read.
pub fn load_track<M: MetadataReader + ?Sized>(reader: &M, path: &Path) -> Track {
    let meta = match reader.read(path) {
        Ok(meta) => meta,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "metadata unavailable");
            TrackMetadata::default()
        }
    };
    Track::new(path, meta)
}

/// Split the text a terminal delivers for a drag-and-drop (a bracketed
/// paste) into paths.
///
/// Accepted forms: one path per line, `{a b} {c}` brace groups, single or
/// double quoted paths, backslash-escaped spaces and `file://` URIs.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut out = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // An unquoted path containing spaces, as some terminals paste it.
        let whole = strip_file_uri(line);
        if Path::new(&whole).exists() {
            out.push(PathBuf::from(whole));
            continue;
        }

        out.extend(
            tokenize(line)
                .into_iter()
                .map(|t| PathBuf::from(strip_file_uri(&t))),
        );
    }

    out
}

fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut token = String::new();
        match c {
            '{' | '\'' | '"' => {
                let close = if c == '{' { '}' } else { c };
                chars.next();
                for ch in chars.by_ref() {
                    if ch == close {
                        break;
                    }
                    token.push(ch);
                }
            }
            _ => {
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() {
                        break;
                    }
                    chars.next();
                    if ch == '\\' {
                        if let Some(escaped) = chars.next() {
                            token.push(escaped);
                        }
                    } else {
                        token.push(ch);
                    }
                }
            }
        }

        if !token.is_empty() {
            tokens.push(token);
        }
    }

    tokens
}

fn strip_file_uri(s: &str) -> String {
    match s.strip_prefix("file://") {
        Some(rest) => {
            let bytes = urlencoding::decode_binary(rest.as_bytes());
            String::from_utf8_lossy(&bytes).into_owned()
        }
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_handles_braces_quotes_and_escapes() {
        assert_eq!(
            tokenize(r#"{/a b/c.mp3} '/d e.mp3' "/f g.mp3" /h\ i.mp3 /j.mp3"#),
            vec!["/a b/c.mp3", "/d e.mp3", "/f g.mp3", "/h i.mp3", "/j.mp3"]
        );
    }

    #[test]
    fn file_uris_are_percent_decoded() {
        assert_eq!(strip_file_uri("file:///music/a%20b.mp3"), "/music/a b.mp3");
        assert_eq!(strip_file_uri("/music/100%.mp3"), "/music/100%.mp3");
        assert_eq!(strip_file_uri("file:///music/%zz.mp3"), "/music/%zz.mp3");
    }
}
