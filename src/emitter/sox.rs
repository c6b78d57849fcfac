// music-box -- a text based music box for the terminal
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Playing tones through a sox subprocess.

use std::io;
use std::io::Write;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::Duration;

use log::{debug, error};

use super::ToneEmitter;
use crate::oscillator::{Oscillator, WaveShape};
use crate::wave::{AudioBuffer, Stereo};

/// Length of the fade in and out of every tone, avoids clicks between notes.
const FADE_MS: usize = 5;

/// Peak amplitude of a tone.
const VOLUME: f64 = 0.5;

/// 10 ms buffer at 44100 Hz
const BUFFER_SIZE: usize = 441;

pub enum SoxTarget<'a> {
    Play,
    File(&'a Path),
}

/// Synthesizes tones into raw stereo `f64` samples.
pub struct ToneRenderer {
    wave: WaveShape,
    sample_rate: i32,
    buffer: AudioBuffer,
    bytes: Vec<u8>,
}

impl ToneRenderer {
    pub fn new(sample_rate: i32, wave: WaveShape) -> Self {
        let buffer = AudioBuffer::new(BUFFER_SIZE);
        let bytes = vec![0u8; buffer.byte_len()];
        Self {
            wave,
            sample_rate,
            buffer,
            bytes,
        }
    }

    /// Number of samples making up `duration_ms` milliseconds.
    pub fn samples(&self, duration_ms: u32) -> usize {
        self.sample_rate as usize * duration_ms as usize / 1000
    }

    /// Write a tone to `out`. Returns the number of samples written.
    pub fn render(
        &mut self,
        frequency: f64,
        duration_ms: u32,
        out: &mut dyn Write,
    ) -> io::Result<usize> {
        let total = self.samples(duration_ms);
        let fade = (self.sample_rate as usize * FADE_MS / 1000).min(total / 2);
        let mut osc = Oscillator::new(self.wave, self.sample_rate as f64, frequency);

        let mut written = 0;
        while written < total {
            let count = (total - written).min(self.buffer.len());
            for (i, sample) in self.buffer.samples_mut()[..count].iter_mut().enumerate() {
                let value = if frequency > 0.0 {
                    osc.next_sample() * fade_gain(written + i, total, fade) * VOLUME
                } else {
                    0.0
                };
                *sample = Stereo::mono(value);
            }
            let n = self.buffer.copy_bytes_to(count, &mut self.bytes);
            out.write_all(&self.bytes[..n * 16])?;
            written += n;
        }
        out.flush()?;
        Ok(written)
    }
}

/// Linear ramp over the first and last `fade` samples of a tone of `total` samples.
fn fade_gain(index: usize, total: usize, fade: usize) -> f64 {
    if fade == 0 {
        return 1.0;
    }
    let from_edge = index.min(total - 1 - index);
    (from_edge as f64 / fade as f64).min(1.0)
}

/// Streams every tone to `play` (speakers) or `sox` (file).
///
/// When playing on the speakers, the pipe to the player is what makes `emit` block.
pub struct SoxEmitter {
    player: Child,
    audio_stream: Option<ChildStdin>,
    renderer: ToneRenderer,
    realtime: bool,
    error: bool,
}

impl SoxEmitter {
    pub fn new(sample_rate: i32, wave: WaveShape, target: SoxTarget) -> io::Result<Self> {
        let sample_rate_str = format!("{}", sample_rate);
        let input_args = &[
            "-R", // make the output reproducible
            "--channels",
            "2",
            "--rate",
            &sample_rate_str,
            "--type",
            "f64",
            "/dev/stdin",
        ];

        // For properly recording the sox dependency on nix:
        let (play, sox) = if let Some(sox_bin) = option_env!("NIX_SOX_BIN") {
            debug!("using sox from nix store {}", sox_bin);
            let play = Path::new(sox_bin).join("play");
            let sox = Path::new(sox_bin).join("sox");
            (play, sox)
        } else {
            ("play".into(), "sox".into())
        };

        let realtime = matches!(target, SoxTarget::Play);
        let mut player = match target {
            SoxTarget::Play => Command::new(&play)
                .args(input_args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()?,
            SoxTarget::File(outfile) => Command::new(&sox)
                .args(input_args)
                .arg(outfile)
                .stdin(Stdio::piped())
                .spawn()?,
        };

        let audio_stream = player.stdin.take();
        if audio_stream.is_none() {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "sox was started without an input stream",
            ));
        }

        Ok(Self {
            player,
            audio_stream,
            renderer: ToneRenderer::new(sample_rate, wave),
            realtime,
            error: false,
        })
    }
}

impl ToneEmitter for SoxEmitter {
    fn emit(&mut self, frequency: f64, duration_ms: u32) {
        if !self.error {
            if let Some(stream) = self.audio_stream.as_mut() {
                match self.renderer.render(frequency, duration_ms, stream) {
                    Ok(_) => return,
                    Err(err) => {
                        error!("Failed to write audio to sox stream: {}", err);
                        self.error = true;
                    }
                }
            }
        }
        // keep the song in time even without sound
        if self.realtime {
            thread::sleep(Duration::from_millis(u64::from(duration_ms)));
        }
    }
}

impl Drop for SoxEmitter {
    fn drop(&mut self) {
        // sox exits once its input stream is closed
        drop(self.audio_stream.take());
        if let Err(err) = self.player.wait() {
            error!("sox did not exit cleanly: {}", err);
        }
    }
}
