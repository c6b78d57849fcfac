//! Sampled audio handed to the sox backend.

/// Convenience type for making things stereo, e.g. individual samples or whole buffers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stereo<T> {
    pub left: T,
    pub right: T,
}

impl<T: Copy> Stereo<T> {
    /// The same signal on both channels.
    pub fn mono(value: T) -> Self {
        Self {
            left: value,
            right: value,
        }
    }
}

pub struct AudioBuffer {
    samples: Vec<Stereo<f64>>,
}

#[allow(clippy::len_without_is_empty)]
impl AudioBuffer {
    pub fn new(sample_count: usize) -> Self {
        Self {
            samples: vec![Stereo::mono(0.0); sample_count],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn byte_len(&self) -> usize {
        self.len() * 2 * std::mem::size_of::<f64>()
    }

    pub fn samples_mut(&mut self) -> &mut [Stereo<f64>] {
        &mut self.samples
    }

    /// Copy the first `count` samples to bytes, interleaving the left and right samples.
    ///
    /// Returns the number of samples that were actually copied.
    /// Might be less than `count` if the output buffer was not large enough.
    pub fn copy_bytes_to(&self, count: usize, bytes: &mut [u8]) -> usize {
        let mut processed = 0;
        for (sample, target) in self.samples[..count].iter().zip(bytes.chunks_exact_mut(16)) {
            target[0..8].copy_from_slice(&sample.left.to_le_bytes());
            target[8..16].copy_from_slice(&sample.right.to_le_bytes());
            processed += 1;
        }
        processed
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interleaves_channels() {
        let mut buffer = AudioBuffer::new(3);
        buffer.samples_mut()[0] = Stereo {
            left: 1.0,
            right: -1.0,
        };
        buffer.samples_mut()[1] = Stereo::mono(0.5);
        let mut bytes = vec![0u8; buffer.byte_len()];
        assert_eq!(buffer.copy_bytes_to(2, &mut bytes), 2);
        assert_eq!(bytes[0..8], 1.0f64.to_le_bytes());
        assert_eq!(bytes[8..16], (-1.0f64).to_le_bytes());
        assert_eq!(bytes[16..24], 0.5f64.to_le_bytes());
        assert_eq!(bytes[24..32], 0.5f64.to_le_bytes());
        assert!(bytes[32..].iter().all(|b| *b == 0));
    }

    #[test]
    fn short_output_buffer() {
        let buffer = AudioBuffer::new(4);
        let mut bytes = vec![0u8; 20];
        assert_eq!(buffer.copy_bytes_to(4, &mut bytes), 1);
    }
}
