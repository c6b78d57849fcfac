// music-box -- a text based music box for the terminal
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaveShape {
    Sine,
    Saw,
    Triangle,
    Square,
}

impl WaveShape {
    pub const NAMES: &'static [&'static str] = &["sine", "saw", "triangle", "square"];
}

impl FromStr for WaveShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sine" => Ok(WaveShape::Sine),
            "saw" => Ok(WaveShape::Saw),
            "triangle" => Ok(WaveShape::Triangle),
            "square" => Ok(WaveShape::Square),
            other => Err(format!("unknown wave shape {:?}", other)),
        }
    }
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WaveShape::Sine => "sine",
            WaveShape::Saw => "saw",
            WaveShape::Triangle => "triangle",
            WaveShape::Square => "square",
        };
        f.write_str(name)
    }
}

/// An oscillator sampling a wave of some shape at a fixed sample rate.
#[derive(Debug)]
pub struct Oscillator {
    shape: WaveShape,
    sample_rate: f64,
    frequency: f64,
    phase_offset: f64,
}

impl Oscillator {
    pub fn new(shape: WaveShape, sample_rate: f64, frequency: f64) -> Self {
        Self {
            shape,
            sample_rate,
            frequency,
            phase_offset: 0.0,
        }
    }

    pub fn next_sample(&mut self) -> f64 {
        let phase = self.phase_offset;
        // Increment phase
        let phase_increment = self.frequency / self.sample_rate;
        self.phase_offset += phase_increment;
        while self.phase_offset >= 1.0 {
            self.phase_offset -= 1.0;
        }
        // Compute wave
        use std::f64::consts::PI;
        match self.shape {
            WaveShape::Sine => (phase * 2.0 * PI).sin(),
            WaveShape::Saw => 2.0 * phase - 1.0,
            WaveShape::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
            WaveShape::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn samples(shape: WaveShape, n: usize) -> Vec<f64> {
        // four samples per period
        let mut osc = Oscillator::new(shape, 4.0, 1.0);
        (0..n).map(|_| osc.next_sample()).collect()
    }

    #[test]
    fn shapes() {
        assert_eq!(samples(WaveShape::Saw, 5), vec![-1.0, -0.5, 0.0, 0.5, -1.0]);
        assert_eq!(samples(WaveShape::Triangle, 4), vec![-1.0, 0.0, 1.0, 0.0]);
        assert_eq!(samples(WaveShape::Square, 4), vec![1.0, 1.0, -1.0, -1.0]);
        let sine = samples(WaveShape::Sine, 4);
        assert!((sine[1] - 1.0).abs() < 1e-12);
        assert!((sine[3] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn silent_at_zero_frequency() {
        let mut osc = Oscillator::new(WaveShape::Sine, 44100.0, 0.0);
        assert!((0..100).all(|_| osc.next_sample() == 0.0));
    }

    #[test]
    fn names_round_trip() {
        for name in WaveShape::NAMES {
            assert_eq!(name.parse::<WaveShape>().unwrap().to_string(), *name);
        }
        assert!("noise".parse::<WaveShape>().is_err());
    }
}
