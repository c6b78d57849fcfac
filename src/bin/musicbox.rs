// music-box -- a text based music box for the terminal
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `musicbox` - plays cylinders, text files where every character is a note.

use std::error::Error;
use std::io;
use std::path::PathBuf;

use log::info;
use structopt::StructOpt;

use music_box::display::Display;
use music_box::emitter::{EmitterConfig, EmitterKind};
use music_box::engine::PlaybackEngine;
use music_box::oscillator::WaveShape;
use music_box::shell::{Shell, ShellOptions};
use music_box::source::NotationSource;
use music_box::tempo;

#[derive(Debug, StructOpt)]
#[structopt(name = "musicbox", about = "A music box for the terminal")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// The cylinder to play. Starts the interactive music box if not given.
    #[structopt(parse(from_os_str))]
    cylinder: Option<PathBuf>,

    /// Tempo in beats per minute until the cylinder changes it.
    #[structopt(short, long, default_value = "120")]
    tempo: i64,

    /// How the tones are produced.
    #[structopt(short, long, default_value = "bell", possible_values = EmitterKind::NAMES)]
    emitter: EmitterKind,

    /// Waveform of the sox emitter.
    #[structopt(short, long, default_value = "sine", possible_values = WaveShape::NAMES)]
    wave: WaveShape,

    /// Output file (any sox-supported format). Music is played directly if not given.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Directory containing the cylinders of the interactive music box.
    #[structopt(short, long, default_value = ".", parse(from_os_str))]
    dir: PathBuf,

    /// Do not wait for the spring to be wound before playing.
    #[structopt(long)]
    no_wind: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level)?;

    let mut engine = PlaybackEngine::new();
    if !engine.set_tempo(opt.tempo) {
        log::warn!(
            "ignoring tempo {}, must be between {} and {} bpm",
            opt.tempo,
            tempo::MIN_BPM,
            tempo::MAX_BPM
        );
    }

    let emitter = EmitterConfig {
        kind: opt.emitter,
        wave: opt.wave,
        output: opt.output,
        ..EmitterConfig::default()
    };

    match opt.cylinder {
        Some(path) => {
            // open the cylinder before sox creates an output file
            let source = NotationSource::open(&path)?;
            let mut tones = emitter.build()?;
            let mut display = Display::stdout();
            println!();
            let summary = engine.play(source, &mut *tones, &mut display)?;
            info!(
                "played {} notes and {} bars of {:?}",
                summary.notes, summary.bars, summary.title
            );
        }
        None => {
            let options = ShellOptions {
                directory: opt.dir,
                wind: !opt.no_wind,
            };
            let stdin = io::stdin();
            Shell::new(engine, emitter, options).run(stdin.lock(), io::stdout())?;
        }
    }
    Ok(())
}
