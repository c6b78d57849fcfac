// music-box -- a text based music box for the terminal
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The front of the music box: prints what is being played.

use std::io::{self, Write};

use log::error;

use crate::event::{Event, Observer};

/// Room for the title inside the header box.
const TITLE_WIDTH: usize = 34;

/// Prints a running notation of the song to a terminal.
pub struct Display<W> {
    out: W,
    broken: bool,
}

impl Display<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Display<W> {
    pub fn new(out: W) -> Self {
        Self { out, broken: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, event: &Event) -> io::Result<()> {
        match event {
            Event::TitleResolved(title) => self.header(title)?,
            Event::PlaybackStarted { bpm } => write!(self.out, "  Playing at {} BPM...\n\n  ", bpm)?,
            Event::TempoChanged(bpm) => write!(self.out, "\n  [Tempo: {} BPM]\n  ", bpm)?,
            Event::NoteVisual('-') => write!(self.out, " . ")?,
            Event::NoteVisual(symbol) => write!(self.out, " {} ", symbol)?,
            Event::BarVisual => write!(self.out, " | ")?,
            Event::Tone { .. } => return Ok(()),
            Event::LineBreakHint => write!(self.out, "\n  ")?,
            Event::PlaybackFinished { .. } => write!(self.out, "\n\n  Music box finished.\n\n")?,
        }
        self.out.flush()
    }

    fn header(&mut self, title: &str) -> io::Result<()> {
        let rule = "-".repeat(TITLE_WIDTH + 4);
        writeln!(self.out, "+{}+", rule)?;
        writeln!(self.out, "|  {:<width$}  |", "MUSIC BOX", width = TITLE_WIDTH)?;
        writeln!(self.out, "|{}|", rule)?;
        writeln!(
            self.out,
            "|  {:<width$}  |",
            fit_title(title),
            width = TITLE_WIDTH
        )?;
        write!(self.out, "+{}+\n\n", rule)
    }
}

impl<W: Write> Observer for Display<W> {
    fn notify(&mut self, event: &Event) {
        if self.broken {
            return;
        }
        if let Err(err) = self.render(event) {
            error!("Failed to display notation: {}", err);
            self.broken = true;
        }
    }
}

/// Shorten titles that do not fit into the header.
///
/// # Examples
///
/// ```
/// use music_box::display::fit_title;
///
/// assert_eq!(fit_title("Greensleeves"), "Greensleeves");
/// assert_eq!(
///     fit_title("A Very Long Title For A Tiny Music Box"),
///     "A Very Long Title For A Tiny Mu..."
/// );
/// ```
pub fn fit_title(title: &str) -> String {
    if title.chars().count() > TITLE_WIDTH {
        let mut short: String = title.chars().take(TITLE_WIDTH - 3).collect();
        short.push_str("...");
        short
    } else {
        title.to_string()
    }
}
