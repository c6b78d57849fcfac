// music-box -- a text based music box for the terminal
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Reading cylinders (song files) line by line.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum SourceError {
    #[snafu(display("Cannot open file '{}': {}", path.display(), source))]
    Open { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to read from cylinder: {}", source))]
    Read { source: io::Error },
}

/// A stream of notation lines. Line terminators (including a trailing `\r`) are stripped.
/// Bytes that are not valid UTF-8 are replaced by `U+FFFD`.
pub struct NotationSource<R> {
    reader: R,
    bytes: Vec<u8>,
    line: String,
}

impl NotationSource<BufReader<File>> {
    /// Open a cylinder on disk. The file is closed when the source is dropped.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).context(Open { path })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> NotationSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            bytes: Vec::new(),
            line: String::new(),
        }
    }

    /// Read the next line, or `None` once the stream is exhausted.
    pub fn next_line(&mut self) -> Result<Option<&str>, SourceError> {
        self.bytes.clear();
        let n = self.reader.read_until(b'\n', &mut self.bytes).context(Read)?;
        if n == 0 {
            return Ok(None);
        }
        let mut end = self.bytes.len();
        if self.bytes[..end].ends_with(b"\n") {
            end -= 1;
        }
        if self.bytes[..end].ends_with(b"\r") {
            end -= 1;
        }
        self.line = String::from_utf8_lossy(&self.bytes[..end]).into_owned();
        Ok(Some(self.line.as_str()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lines(input: &str) -> Vec<String> {
        let mut source = NotationSource::new(input.as_bytes());
        let mut out = Vec::new();
        while let Some(line) = source.next_line().unwrap() {
            out.push(line.to_string());
        }
        out
    }

    #[test]
    fn strips_terminators() {
        assert_eq!(lines("Title\nT90\r\nCDE"), vec!["Title", "T90", "CDE"]);
    }

    #[test]
    fn keeps_empty_lines() {
        assert_eq!(lines("\n\nC\n"), vec!["", "", "C"]);
        assert!(lines("").is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut source = NotationSource::new(&b"C\xE9D\r\nE"[..]);
        assert_eq!(source.next_line().unwrap(), Some("C\u{FFFD}D"));
        assert_eq!(source.next_line().unwrap(), Some("E"));
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn missing_file() {
        let err = NotationSource::open(Path::new("/does/not/exist.txt"))
            .err()
            .unwrap();
        match err {
            SourceError::Open { path, .. } => assert_eq!(path, Path::new("/does/not/exist.txt")),
            other => panic!("unexpected error {}", other),
        }
    }
}
