// music-box -- a text based music box for the terminal
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The playback engine turning a cylinder into tones.
//!
//! A pass over a cylinder reads the title from the first line and then handles
//! one line at a time. Lines starting with `T` are tempo directives, all other
//! lines are played character by character:
//!
//! - spaces are skipped,
//! - symbols on the comb are shown and played for one beat (`-` is a silent beat),
//! - `|` is a bar line which is shown but takes no time,
//! - everything else is dropped.

use std::io::BufRead;
use std::path::Path;

use log::{debug, info, trace, warn};
use snafu::{ResultExt, Snafu};

use crate::comb::Comb;
use crate::emitter::ToneEmitter;
use crate::event::{Event, Observer};
use crate::source::{NotationSource, SourceError};
use crate::tempo::Tempo;

/// Title used when the first line of a cylinder is empty.
pub const UNTITLED: &str = "Untitled";

/// Number of notes after which a line break is suggested.
pub const NOTES_PER_LINE: usize = 16;

#[derive(Debug, Snafu)]
pub enum PlayError {
    #[snafu(display("{}", source))]
    Source { source: SourceError },
}

/// What was played during a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub title: String,
    /// Notes played, rests included.
    pub notes: usize,
    pub bars: usize,
    /// Sum of all beat durations handed to the emitter.
    pub elapsed_ms: u64,
}

/// Owns the comb and the tempo. The tempo is kept across songs.
#[derive(Debug, Default)]
pub struct PlaybackEngine {
    comb: Comb,
    tempo: Tempo,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    AwaitingTitle,
    Playing,
    Finished,
}

/// State of a single pass over a cylinder.
struct Pass<'a> {
    engine: &'a mut PlaybackEngine,
    emitter: &'a mut dyn ToneEmitter,
    observer: &'a mut dyn Observer,
    phase: Phase,
    summary: Summary,
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tempo(&self) -> &Tempo {
        &self.tempo
    }

    /// Request a new tempo, see `Tempo::set`.
    pub fn set_tempo(&mut self, bpm: i64) -> bool {
        self.tempo.set(bpm)
    }

    pub fn beat_duration_ms(&self) -> u32 {
        self.tempo.beat_duration_ms()
    }

    /// Play the cylinder stored at `path`.
    pub fn play_file(
        &mut self,
        path: &Path,
        emitter: &mut dyn ToneEmitter,
        observer: &mut dyn Observer,
    ) -> Result<Summary, PlayError> {
        let source = NotationSource::open(path).context(Source)?;
        info!("inserted cylinder {}", path.display());
        self.play(source, emitter, observer)
    }

    /// Play a cylinder from start to end. Blocks as long as the emitter blocks.
    pub fn play<R: BufRead>(
        &mut self,
        mut source: NotationSource<R>,
        emitter: &mut dyn ToneEmitter,
        observer: &mut dyn Observer,
    ) -> Result<Summary, PlayError> {
        let mut pass = Pass {
            engine: self,
            emitter,
            observer,
            phase: Phase::AwaitingTitle,
            summary: Summary {
                title: String::new(),
                notes: 0,
                bars: 0,
                elapsed_ms: 0,
            },
        };
        while let Some(line) = source.next_line().context(Source)? {
            pass.feed(line);
        }
        pass.finish();
        Ok(pass.summary)
    }
}

impl<'a> Pass<'a> {
    fn feed(&mut self, line: &str) {
        match self.phase {
            Phase::Finished => {}
            Phase::AwaitingTitle => self.resolve_title(line),
            Phase::Playing => {
                if let Some(directive) = line.strip_prefix('T') {
                    self.change_tempo(directive)
                } else {
                    self.play_line(line)
                }
            }
        }
    }

    fn resolve_title(&mut self, line: &str) {
        let title = if line.is_empty() { UNTITLED } else { line };
        info!("playing {:?} at {} bpm", title, self.engine.tempo.bpm());
        self.summary.title = title.to_string();
        self.observer.notify(&Event::TitleResolved(title.to_string()));
        self.observer.notify(&Event::PlaybackStarted {
            bpm: self.engine.tempo.bpm(),
        });
        self.phase = Phase::Playing;
    }

    fn change_tempo(&mut self, directive: &str) {
        let bpm = match parse_int_prefix(directive) {
            Some(bpm) => bpm,
            None => {
                warn!("ignoring malformed tempo directive {:?}", directive);
                return;
            }
        };
        if self.engine.tempo.set(bpm) {
            debug!("tempo changed to {} bpm", bpm);
        } else {
            debug!("tempo {} out of range, keeping {} bpm", bpm, self.engine.tempo.bpm());
        }
        self.observer
            .notify(&Event::TempoChanged(self.engine.tempo.bpm()));
    }

    fn play_line(&mut self, line: &str) {
        for symbol in line.chars() {
            if symbol == ' ' {
                continue;
            }
            if let Some(frequency) = self.engine.comb.lookup(symbol) {
                self.strike(symbol, frequency);
            } else if symbol == '|' {
                self.summary.bars += 1;
                self.observer.notify(&Event::BarVisual);
            } else {
                trace!("skipping unknown symbol {:?}", symbol);
            }
        }
    }

    fn strike(&mut self, symbol: char, frequency: f64) {
        let duration_ms = self.engine.tempo.beat_duration_ms();
        self.observer.notify(&Event::NoteVisual(symbol));
        self.observer.notify(&Event::Tone {
            frequency,
            duration_ms,
        });
        trace!("{:?}: {} Hz for {} ms", symbol, frequency, duration_ms);
        self.emitter.emit(frequency, duration_ms);
        self.summary.elapsed_ms += u64::from(duration_ms);
        self.summary.notes += 1;
        if self.summary.notes % NOTES_PER_LINE == 0 {
            self.observer.notify(&Event::LineBreakHint);
        }
    }

    fn finish(&mut self) {
        // A cylinder without any line still gets a title.
        if self.phase == Phase::AwaitingTitle {
            self.resolve_title("");
        }
        self.phase = Phase::Finished;
        info!(
            "finished {:?}: {} notes in {} ms",
            self.summary.title, self.summary.notes, self.summary.elapsed_ms
        );
        self.observer.notify(&Event::PlaybackFinished {
            notes: self.summary.notes,
        });
    }
}

/// Parse the integer at the start of `text`, ignoring leading whitespace and anything after the digits.
///
/// # Examples
///
/// ```
/// use music_box::engine::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix("140"), Some(140));
/// assert_eq!(parse_int_prefix(" -5 bpm"), Some(-5));
/// assert_eq!(parse_int_prefix("+90"), Some(90));
/// assert_eq!(parse_int_prefix("fast"), None);
/// assert_eq!(parse_int_prefix(""), None);
/// ```
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let sign_len = if text.starts_with('+') || text.starts_with('-') {
        1
    } else {
        0
    };
    let digits = text[sign_len..]
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(text.len() - sign_len);
    if digits == 0 {
        return None;
    }
    text[..sign_len + digits].parse().ok()
}
