// music-box -- a text based music box for the terminal
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The tempo of the music box, i.e. how tightly its spring is wound.

/// Lowest accepted tempo in beats per minute.
pub const MIN_BPM: i64 = 1;
/// Highest accepted tempo in beats per minute.
pub const MAX_BPM: i64 = 300;
/// Tempo of a freshly built music box.
pub const DEFAULT_BPM: u32 = 120;

/// The current tempo in beats per minute, always within `MIN_BPM..=MAX_BPM`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tempo {
    bpm: u32,
}

impl Tempo {
    pub fn new() -> Self {
        Self { bpm: DEFAULT_BPM }
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Change the tempo. Requests outside of `MIN_BPM..=MAX_BPM` are ignored.
    ///
    /// Returns whether the tempo was accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use music_box::tempo::Tempo;
    ///
    /// let mut tempo = Tempo::new();
    /// assert!(tempo.set(90));
    /// assert!(!tempo.set(301));
    /// assert_eq!(tempo.bpm(), 90);
    /// ```
    pub fn set(&mut self, bpm: i64) -> bool {
        if bpm >= MIN_BPM && bpm <= MAX_BPM {
            self.bpm = bpm as u32;
            true
        } else {
            false
        }
    }

    /// Length of one beat in whole milliseconds (truncated).
    ///
    /// # Examples
    ///
    /// ```
    /// use music_box::tempo::Tempo;
    ///
    /// let mut tempo = Tempo::new();
    /// assert_eq!(tempo.beat_duration_ms(), 500);
    /// tempo.set(90);
    /// assert_eq!(tempo.beat_duration_ms(), 666);
    /// ```
    pub fn beat_duration_ms(&self) -> u32 {
        60_000 / self.bpm
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn at(bpm: i64) -> Tempo {
        let mut tempo = Tempo::new();
        assert!(tempo.set(bpm));
        tempo
    }

    #[test]
    fn beat_duration_truncates() {
        assert_eq!(at(121).beat_duration_ms(), 495);
        assert_eq!(at(125).beat_duration_ms(), 480);
        assert_eq!(at(200).beat_duration_ms(), 300);
        assert_eq!(at(1).beat_duration_ms(), 60_000);
        assert_eq!(at(300).beat_duration_ms(), 200);
    }

    #[test]
    fn beat_duration_over_whole_range() {
        for bpm in MIN_BPM..=MAX_BPM {
            assert_eq!(at(bpm).beat_duration_ms(), 60_000 / bpm as u32);
        }
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut tempo = at(140);
        for bpm in &[0, -5, 301, i64::MAX, i64::MIN] {
            assert!(!tempo.set(*bpm));
            assert_eq!(tempo.bpm(), 140);
        }
    }

    #[test]
    fn starts_at_default() {
        assert_eq!(Tempo::new().bpm(), 120);
        assert_eq!(Tempo::default(), Tempo::new());
    }
}
