//! Telemetry data model: samples, batches, and the producer-side accumulator
//!
//! A [`TelemetryBatch`] is built by the sampler, moved into the
//! [`TelemetryQueue`](crate::queue::TelemetryQueue), moved out again by the
//! connectivity worker, and consumed by the publish attempt. There is no way
//! to modify a batch once it has been handed off because it is only ever
//! passed by value.

use heapless::Vec;

use crate::time::Timestamp;

/// Maximum number of samples in one batch
pub const BATCH_CAPACITY: usize = 10;

/// One sensor reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// When the reading was taken
    pub timestamp: Timestamp,
    /// Reading in the sensor's native unit (°C for the die temperature sensor)
    pub reading: f32,
}

impl Sample {
    pub const fn new(timestamp: Timestamp, reading: f32) -> Self {
        Self { timestamp, reading }
    }
}

/// Fixed-capacity group of timestamped readings
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryBatch {
    samples: Vec<Sample, BATCH_CAPACITY>,
}

impl TelemetryBatch {
    /// Create an empty batch
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    /// Append a sample, handing it back if the batch is full
    pub fn push(&mut self, sample: Sample) -> Result<(), Sample> {
        self.samples.push(sample)
    }

    /// Valid samples, oldest first
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of valid samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    /// Timestamp of the oldest sample
    pub fn first_timestamp(&self) -> Option<Timestamp> {
        self.samples.first().map(|s| s.timestamp)
    }

    /// Timestamp of the newest sample
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.samples.last().map(|s| s.timestamp)
    }
}

impl FromIterator<Sample> for TelemetryBatch {
    /// Collect up to [`BATCH_CAPACITY`] samples; extra samples are ignored.
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut batch = Self::new();
        for sample in iter.into_iter().take(BATCH_CAPACITY) {
            // take() keeps this within capacity
            let _ = batch.push(sample);
        }
        batch
    }
}

/// Collects samples into batches on the producer side
///
/// Every [`BATCH_CAPACITY`] pushed samples produce one full batch, mirroring
/// a sampler that posts a packet each time its sample group fills.
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    current: TelemetryBatch,
}

impl BatchAccumulator {
    pub const fn new() -> Self {
        Self {
            current: TelemetryBatch::new(),
        }
    }

    /// Add a sample; returns the completed batch when this sample filled it
    pub fn push(&mut self, sample: Sample) -> Option<TelemetryBatch> {
        // `current` is emitted as soon as it fills, so there is always room
        let _ = self.current.push(sample);
        self.current
            .is_full()
            .then(|| core::mem::take(&mut self.current))
    }

    /// Samples collected towards the next batch
    pub fn pending(&self) -> usize {
        self.current.len()
    }

    /// Emit the partially filled batch, if any samples are pending
    pub fn flush(&mut self) -> Option<TelemetryBatch> {
        if self.current.is_empty() {
            None
        } else {
            Some(core::mem::take(&mut self.current))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(secs: u64, reading: f32) -> Sample {
        Sample::new(Timestamp::from_unix_secs(secs), reading)
    }

    #[test]
    fn test_batch_rejects_overflow() {
        let mut batch = TelemetryBatch::new();
        for i in 0..BATCH_CAPACITY {
            assert!(batch.push(sample(i as u64, 20.0)).is_ok());
        }
        assert!(batch.is_full());

        let extra = sample(99, 21.5);
        assert_eq!(batch.push(extra), Err(extra));
        assert_eq!(batch.len(), BATCH_CAPACITY);
    }

    #[test]
    fn test_batch_timestamps() {
        let batch: TelemetryBatch = [sample(10, 1.0), sample(20, 2.0), sample(30, 3.0)]
            .into_iter()
            .collect();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.first_timestamp(), Some(Timestamp::from_unix_secs(10)));
        assert_eq!(batch.last_timestamp(), Some(Timestamp::from_unix_secs(30)));
        assert_eq!(batch.samples()[1].reading, 2.0);

        let empty = TelemetryBatch::new();
        assert!(empty.is_empty());
        assert_eq!(empty.first_timestamp(), None);
    }

    #[test]
    fn test_collect_truncates_to_capacity() {
        let batch: TelemetryBatch = (0..25).map(|i| sample(i, 0.0)).collect();
        assert_eq!(batch.len(), BATCH_CAPACITY);
        assert_eq!(batch.last_timestamp(), Some(Timestamp::from_unix_secs(9)));
    }

    #[test]
    fn test_accumulator_emits_full_batches() {
        let mut acc = BatchAccumulator::new();
        let mut emitted = 0;
        for i in 0..(BATCH_CAPACITY * 2 + 3) {
            if let Some(batch) = acc.push(sample(i as u64, 22.0)) {
                assert!(batch.is_full());
                assert_eq!(
                    batch.first_timestamp(),
                    Some(Timestamp::from_unix_secs((emitted * BATCH_CAPACITY) as u64))
                );
                emitted += 1;
            }
        }
        assert_eq!(emitted, 2);
        assert_eq!(acc.pending(), 3);

        let partial = acc.flush().unwrap();
        assert_eq!(partial.len(), 3);
        assert_eq!(acc.pending(), 0);
        assert!(acc.flush().is_none());
    }
}
