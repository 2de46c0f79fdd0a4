//! Parallel encoding and decoding of independent buffers.
//!
//! Architecture:
//! - Feeder thread: sends one job per input buffer
//! - Worker pool: each worker runs the single-block codec on whole buffers
//! - Calling thread: collects results and puts them back in input order
//!
//! Every buffer is coded on its own; outputs are identical to running
//! [`Encoder`]/[`Decoder`] over each buffer in turn.

use crossbeam::channel::{bounded, Receiver, Sender};
use log::debug;

use crate::codec::{Decoder, Encoder};
use crate::error::{Error, Result};
use crate::CompressConfig;

/// A buffer waiting for a worker
struct Job<'a> {
    /// Position in the caller's input list
    id: usize,
    data: &'a [u8],
}

/// A coded buffer on its way back
struct Done {
    id: usize,
    data: Vec<u8>,
}

fn effective_threads(requested: usize) -> usize {
    match requested {
        0 => num_cpus::get().clamp(1, 32),
        n => n.clamp(1, 32),
    }
}

/// Encodes many buffers across a worker pool
#[derive(Clone, Debug, Default)]
pub struct BatchEncoder {
    config: CompressConfig,
    /// Number of worker threads (0 = auto)
    num_threads: usize,
}

impl BatchEncoder {
    pub fn new(config: CompressConfig, num_threads: usize) -> Self {
        Self { config, num_threads }
    }

    pub fn effective_threads(&self) -> usize {
        effective_threads(self.num_threads)
    }

    /// Encode every input; results are in input order
    ///
    /// The first failing buffer aborts the batch.
    pub fn encode_all<T: AsRef<[u8]> + Sync>(&self, inputs: &[T]) -> Result<Vec<Vec<u8>>> {
        self.config.validate()?;
        let encoder = Encoder::new(self.config.clone());
        run_ordered(inputs, self.effective_threads(), |data| encoder.encode(data))
    }
}

/// Decodes many streams across a worker pool
#[derive(Clone, Debug, Default)]
pub struct BatchDecoder {
    /// Number of worker threads (0 = auto)
    num_threads: usize,
}

impl BatchDecoder {
    pub fn new(num_threads: usize) -> Self {
        Self { num_threads }
    }

    pub fn effective_threads(&self) -> usize {
        effective_threads(self.num_threads)
    }

    /// Decode every input; results are in input order
    pub fn decode_all<T: AsRef<[u8]> + Sync>(&self, inputs: &[T]) -> Result<Vec<Vec<u8>>> {
        let decoder = Decoder::new();
        run_ordered(inputs, self.effective_threads(), |data| decoder.decode(data))
    }
}

fn run_ordered<T, F>(inputs: &[T], num_threads: usize, op: F) -> Result<Vec<Vec<u8>>>
where
    T: AsRef<[u8]> + Sync,
    F: Fn(&[u8]) -> Result<Vec<u8>> + Sync,
{
    let num_threads = num_threads.min(inputs.len());
    if num_threads <= 1 {
        return inputs.iter().map(|input| op(input.as_ref())).collect();
    }

    debug!("batch: {} buffers on {} threads", inputs.len(), num_threads);

    let result = crossbeam::scope(|scope| {
        let channel_capacity = num_threads * 4;
        let (job_tx, job_rx): (Sender<Job>, Receiver<Job>) = bounded(channel_capacity);
        let (result_tx, result_rx): (Sender<Result<Done>>, Receiver<Result<Done>>) =
            bounded(channel_capacity);

        for _ in 0..num_threads {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let op = &op;

            scope.spawn(move |_| {
                while let Ok(job) = job_rx.recv() {
                    let result = op(job.data).map(|data| Done { id: job.id, data });
                    if result_tx.send(result).is_err() {
                        // Collector has stopped, exit
                        break;
                    }
                }
            });
        }

        // Workers hold the only remaining copies
        drop(job_rx);
        drop(result_tx);

        scope.spawn(move |_| {
            for (id, input) in inputs.iter().enumerate() {
                if job_tx.send(Job { id, data: input.as_ref() }).is_err() {
                    break;
                }
            }
        });

        collect_in_order(result_rx, inputs.len())
    });

    result.map_err(|_| Error::Internal("Thread panicked".to_string()))?
}

/// Receive `count` results and place each at its original index
///
/// Returning early drops the receiver, which stops the workers.
fn collect_in_order(result_rx: Receiver<Result<Done>>, count: usize) -> Result<Vec<Vec<u8>>> {
    let mut slots: Vec<Option<Vec<u8>>> = vec![None; count];

    for _ in 0..count {
        let done = result_rx
            .recv()
            .map_err(|_| Error::Internal("worker pool stopped early".to_string()))??;
        slots[done.id] = Some(done.data);
    }

    slots
        .into_iter()
        .map(|slot| slot.ok_or_else(|| Error::Internal("missing batch result".to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_inputs() -> Vec<Vec<u8>> {
        (0..24u8)
            .map(|i| {
                let mut buf = Vec::new();
                for j in 0..(i as usize * 37) {
                    buf.push(b'a' + ((j * (i as usize + 1)) % 7) as u8);
                }
                buf
            })
            .collect()
    }

    #[test]
    fn test_effective_threads() {
        assert_eq!(BatchEncoder::new(CompressConfig::default(), 4).effective_threads(), 4);
        assert_eq!(BatchEncoder::new(CompressConfig::default(), 500).effective_threads(), 32);
        let auto = BatchDecoder::new(0).effective_threads();
        assert!((1..=32).contains(&auto));
    }

    #[test]
    fn test_matches_sequential_encoder() {
        let inputs = sample_inputs();
        let batch = BatchEncoder::new(CompressConfig::default(), 4).encode_all(&inputs).unwrap();

        let encoder = Encoder::default();
        assert_eq!(batch.len(), inputs.len());
        for (input, encoded) in inputs.iter().zip(&batch) {
            assert_eq!(encoded, &encoder.encode(input).unwrap());
        }
    }

    #[test]
    fn test_batch_roundtrip() {
        let inputs = sample_inputs();
        let encoded = BatchEncoder::new(CompressConfig::default(), 3).encode_all(&inputs).unwrap();
        let decoded = BatchDecoder::new(3).decode_all(&encoded).unwrap();
        assert_eq!(decoded, inputs);
    }

    #[test]
    fn test_error_aborts_batch() {
        let mut encoded =
            BatchEncoder::new(CompressConfig::default(), 2).encode_all(&sample_inputs()).unwrap();
        encoded[5] = Vec::new();
        assert!(matches!(
            BatchDecoder::new(4).decode_all(&encoded),
            Err(Error::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_empty_batch() {
        let inputs: Vec<Vec<u8>> = Vec::new();
        assert!(BatchDecoder::new(4).decode_all(&inputs).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_window() {
        let batch = BatchEncoder::new(CompressConfig::with_window_size(0), 2);
        assert!(matches!(batch.encode_all(&[b"abc"]), Err(Error::InvalidWindowSize(0))));
    }
}
