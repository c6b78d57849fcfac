// music-box -- a text based music box for the terminal
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The comb of the music box, assigning a frequency to every note symbol.

/// The frequency of a rest. A rest still takes up a full beat.
pub const REST: f64 = 0.0;

/// Symbols of the notation together with the frequencies (in Hz) of their tines.
/// Upper case letters are the fourth octave, lower case letters continue into the fifth.
const TINES: &[(char, f64)] = &[
    ('C', 261.63),
    ('D', 293.66),
    ('E', 329.63),
    ('F', 349.23),
    ('G', 392.00),
    ('A', 440.00),
    ('B', 493.88),
    ('c', 523.25),
    ('d', 587.33),
    ('e', 659.25),
    ('-', REST),
];

/// The fixed mapping from note symbols to frequencies.
///
/// # Examples
///
/// ```
/// use music_box::comb::Comb;
///
/// let comb = Comb::new();
/// assert_eq!(comb.lookup('A'), Some(440.0));
/// assert_eq!(comb.lookup('-'), Some(0.0));
/// assert_eq!(comb.lookup('|'), None);
/// assert_eq!(comb.lookup('a'), None);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Comb {
    tines: &'static [(char, f64)],
}

impl Comb {
    pub fn new() -> Self {
        Self { tines: TINES }
    }

    /// Return the frequency of the tine struck by `symbol`, or `None` if the symbol is not a note.
    pub fn lookup(&self, symbol: char) -> Option<f64> {
        self.tines
            .iter()
            .find(|(sym, _)| *sym == symbol)
            .map(|(_, freq)| *freq)
    }

    /// All recognized symbols, in the order of the comb.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.tines.iter().map(|(sym, _)| *sym)
    }
}

impl Default for Comb {
    fn default() -> Self {
        Self::new()
    }
}
