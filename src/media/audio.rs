use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::Source;

pub const SAMPLE_RATE: u32 = 48_000;
pub const CHANNELS: u16 = 2;

/// Fixed-size FIFO of interleaved f32 samples between the ffmpeg reader and the sink.
pub struct SampleRing {
    samples: Vec<f32>,
    read_pos: usize,
    write_pos: usize,
}

impl SampleRing {
    /// `capacity` is in samples; one slot stays empty to tell full from empty.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![0.0; capacity.max(2)],
            read_pos: 0,
            write_pos: 0,
        }
    }

    /// Ring holding `seconds` of stereo audio.
    pub fn with_seconds(seconds: usize) -> Self {
        Self::new(SAMPLE_RATE as usize * CHANNELS as usize * seconds + 1)
    }

    fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Appends as many samples as fit. Returns how many were written.
    pub fn write(&mut self, data: &[f32]) -> usize {
        let mut written = 0;
        for &sample in data {
            let next_write = (self.write_pos + 1) % self.capacity();
            if next_write == self.read_pos {
                break;
            }
            self.samples[self.write_pos] = sample;
            self.write_pos = next_write;
            written += 1;
        }
        written
    }

    pub fn read(&mut self) -> Option<f32> {
        if self.read_pos == self.write_pos {
            return None;
        }
        let sample = self.samples[self.read_pos];
        self.read_pos = (self.read_pos + 1) % self.capacity();
        Some(sample)
    }

    pub fn clear(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
    }

    pub fn len(&self) -> usize {
        if self.write_pos >= self.read_pos {
            self.write_pos - self.read_pos
        } else {
            self.capacity() - self.read_pos + self.write_pos
        }
    }

    pub fn is_empty(&self) -> bool {
        self.read_pos == self.write_pos
    }
}

/// Endless rodio source pulling from a shared [`SampleRing`].
/// Plays silence on underrun and ends once `stop` is raised.
pub struct RingSource {
    ring: Arc<Mutex<SampleRing>>,
    stop: Arc<AtomicBool>,
}

impl RingSource {
    pub fn new(ring: Arc<Mutex<SampleRing>>, stop: Arc<AtomicBool>) -> Self {
        Self { ring, stop }
    }
}

impl Iterator for RingSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.stop.load(Ordering::Relaxed) {
            return None;
        }
        match self.ring.lock() {
            Ok(mut ring) => Some(ring.read().unwrap_or(0.0)),
            Err(_) => Some(0.0),
        }
    }
}

impl Source for RingSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        CHANNELS
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Decodes little-endian f32 samples. Trailing partial samples are dropped.
pub fn decode_f32le(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_is_fifo_and_bounded() {
        let mut ring = SampleRing::new(4);
        assert_eq!(ring.write(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.read(), Some(1.0));
        assert_eq!(ring.write(&[6.0]), 1);
        assert_eq!(ring.read(), Some(2.0));
        assert_eq!(ring.read(), Some(3.0));
        assert_eq!(ring.read(), Some(6.0));
        assert_eq!(ring.read(), None);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_source_plays_silence_then_stops() {
        let ring = Arc::new(Mutex::new(SampleRing::new(8)));
        let stop = Arc::new(AtomicBool::new(false));
        ring.lock().unwrap().write(&[0.5]);

        let mut source = RingSource::new(ring, stop.clone());
        assert_eq!(source.next(), Some(0.5));
        assert_eq!(source.next(), Some(0.0));
        stop.store(true, Ordering::SeqCst);
        assert_eq!(source.next(), None);
    }

    #[test]
    fn test_decode_f32le() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        bytes.extend_from_slice(&(-0.25f32).to_le_bytes());
        bytes.push(0xff);
        assert_eq!(decode_f32le(&bytes), vec![1.5, -0.25]);
    }
}
