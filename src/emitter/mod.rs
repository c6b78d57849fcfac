// music-box -- a text based music box for the terminal
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Backends producing the sound of the music box.
//!
//! A `ToneEmitter` blocks for the duration of every tone it is given,
//! which is what keeps playback in time.

pub mod sox;

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use log::{debug, error};

use crate::oscillator::WaveShape;

/// Turns a frequency and a duration into something audible (or at least visible).
pub trait ToneEmitter {
    /// Produce a tone of `frequency` Hz and return after roughly `duration_ms` milliseconds.
    /// A frequency of zero is a rest: the time passes, but nothing sounds.
    fn emit(&mut self, frequency: f64, duration_ms: u32);
}

/// Waits for every tone and rings the terminal bell for each note that is not a rest.
pub struct Bell<W> {
    out: W,
    broken: bool,
}

impl Bell<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Bell<W> {
    pub fn new(out: W) -> Self {
        Self { out, broken: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ToneEmitter for Bell<W> {
    fn emit(&mut self, frequency: f64, duration_ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(duration_ms)));
        if frequency == 0.0 || self.broken {
            return;
        }
        let status = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
        if let Err(err) = status {
            error!("Failed to ring the bell: {}", err);
            self.broken = true;
        }
    }
}

/// Plays nothing and returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ToneEmitter for Silent {
    fn emit(&mut self, _frequency: f64, _duration_ms: u32) {}
}

/// The available tone backends.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EmitterKind {
    Bell,
    Sox,
    Silent,
}

impl EmitterKind {
    pub const NAMES: &'static [&'static str] = &["bell", "sox", "silent"];
}

impl FromStr for EmitterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bell" => Ok(EmitterKind::Bell),
            "sox" => Ok(EmitterKind::Sox),
            "silent" => Ok(EmitterKind::Silent),
            other => Err(format!("unknown emitter {:?}", other)),
        }
    }
}

impl fmt::Display for EmitterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmitterKind::Bell => "bell",
            EmitterKind::Sox => "sox",
            EmitterKind::Silent => "silent",
        };
        f.write_str(name)
    }
}

/// Which backend to build for a song, and how.
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    pub kind: EmitterKind,
    /// Waveform of the sox backend.
    pub wave: WaveShape,
    pub sample_rate: i32,
    /// Render into this file instead of playing. Implies the sox backend.
    pub output: Option<PathBuf>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            kind: EmitterKind::Bell,
            wave: WaveShape::Sine,
            sample_rate: 44100,
            output: None,
        }
    }
}

impl EmitterConfig {
    /// The backend that is actually used, taking the output file into account.
    pub fn effective_kind(&self) -> EmitterKind {
        if self.output.is_some() {
            EmitterKind::Sox
        } else {
            self.kind
        }
    }

    /// Build a fresh emitter for playing one song.
    pub fn build(&self) -> io::Result<Box<dyn ToneEmitter>> {
        let kind = self.effective_kind();
        debug!("using {} emitter", kind);
        let emitter: Box<dyn ToneEmitter> = match kind {
            EmitterKind::Bell => Box::new(Bell::stdout()),
            EmitterKind::Silent => Box::new(Silent),
            EmitterKind::Sox => {
                let target = match &self.output {
                    None => sox::SoxTarget::Play,
                    Some(path) => sox::SoxTarget::File(path),
                };
                Box::new(sox::SoxEmitter::new(self.sample_rate, self.wave, target)?)
            }
        };
        Ok(emitter)
    }
}
