//! Parallel pipeline using a producer-consumer worker pool.
//!
//! Architecture:
//! - Main thread: split the input into `block_count` batches, send jobs
//! - Worker pool: encode or decode batches in parallel
//! - Main thread: receive batches, reorder by batch id, concatenate
//!
//! Batches are data-independent, so the output equals the sequential result.

use std::collections::BTreeMap;

use crossbeam::channel::{bounded, Receiver, Sender};

use super::single::SequentialPipeline;
use crate::error::{Error, Result};
use crate::image::Block;
use crate::{BlockDecoder, BlockEncoder, BlockPipeline, CodecConfig, CodecStats, Codeword};

/// A batch of work for one worker
#[derive(Clone, Copy)]
struct Job<J> {
    /// Sequence number for ordering output
    batch_id: u64,
    payload: J,
}

/// Result of processing one batch
struct BatchResult<T> {
    /// Sequence number for ordering output
    batch_id: u64,
    items: Result<Vec<T>>,
}

/// Parallel pipeline implementation
pub struct ParallelPipeline {
    config: CodecConfig,
    stats: CodecStats,
}

impl ParallelPipeline {
    pub fn new(config: CodecConfig) -> Self {
        Self { config, stats: CodecStats::default() }
    }

    fn effective_threads(&self) -> usize {
        match self.config.num_threads {
            0 => num_cpus::get().clamp(1, 32),
            n => n.clamp(1, 32),
        }
    }

    /// Run `work` over `batches` on `num_threads` workers, concatenating results in batch order
    fn run_ordered<J, T, F>(&mut self, batches: Vec<J>, num_threads: usize, work: F) -> Result<Vec<T>>
    where
        J: Copy + Send,
        T: Send,
        F: Fn(J) -> Result<Vec<T>> + Sync,
    {
        // Channel capacity - enough to keep workers busy without excessive memory
        let channel_capacity = num_threads * 4;

        let (job_tx, job_rx): (Sender<Job<J>>, Receiver<Job<J>>) = bounded(channel_capacity);
        let (result_tx, result_rx): (Sender<BatchResult<T>>, Receiver<BatchResult<T>>) =
            bounded(channel_capacity);

        let batch_count = batches.len() as u64;
        let work = &work;

        // Scoped threads let workers borrow the blocks and the codebook
        let result = crossbeam::scope(|scope| {
            for _ in 0..num_threads {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();

                scope.spawn(move |_| {
                    worker_thread(work, job_rx, result_tx);
                });
            }

            // Drop our copies of the channels that workers use
            drop(job_rx);
            drop(result_tx);

            dispatch_and_collect(batches, job_tx, result_rx)
        });

        let output = result.map_err(|_| Error::Internal("Thread panicked".to_string()))??;

        self.stats.batches = batch_count;
        log::debug!("Processed {} batches on {} threads", batch_count, num_threads);
        Ok(output)
    }
}

impl BlockPipeline for ParallelPipeline {
    fn encode_blocks<E: BlockEncoder>(
        &mut self,
        encoder: &E,
        blocks: &[Block],
    ) -> Result<Vec<Codeword>> {
        let num_threads = self.effective_threads();

        // For single thread, delegate to the sequential implementation
        if num_threads == 1 {
            let mut single = SequentialPipeline::new(self.config.clone());
            let codewords = single.encode_blocks(encoder, blocks)?;
            self.stats = single.stats().clone();
            return Ok(codewords);
        }

        self.stats = CodecStats { threads: num_threads, ..Default::default() };
        let batches: Vec<&[Block]> = blocks.chunks(self.config.batch_size()).collect();
        let codewords = self.run_ordered(batches, num_threads, |batch: &[Block]| {
            batch.iter().map(|block| encoder.encode_block(block)).collect::<Result<Vec<_>>>()
        })?;

        self.stats.blocks = codewords.len() as u64;
        Ok(codewords)
    }

    fn decode_blocks<D: BlockDecoder>(
        &mut self,
        decoder: &D,
        codewords: &[Codeword],
        width: usize,
        height: usize,
    ) -> Result<Vec<Block>> {
        let num_threads = self.effective_threads();

        if num_threads == 1 {
            let mut single = SequentialPipeline::new(self.config.clone());
            let blocks = single.decode_blocks(decoder, codewords, width, height)?;
            self.stats = single.stats().clone();
            return Ok(blocks);
        }

        self.stats = CodecStats { threads: num_threads, ..Default::default() };
        let batches: Vec<&[Codeword]> = codewords.chunks(self.config.batch_size()).collect();
        let blocks = self.run_ordered(batches, num_threads, |batch: &[Codeword]| {
            batch
                .iter()
                .map(|&codeword| decoder.decode_block(codeword, width, height))
                .collect::<Result<Vec<_>>>()
        })?;

        self.stats.blocks = blocks.len() as u64;
        Ok(blocks)
    }

    fn stats(&self) -> &CodecStats {
        &self.stats
    }
}

/// Send jobs while draining results to prevent deadlock, then collect the rest in order
fn dispatch_and_collect<J: Copy, T>(
    batches: Vec<J>,
    job_tx: Sender<Job<J>>,
    result_rx: Receiver<BatchResult<T>>,
) -> Result<Vec<T>> {
    let mut output = Vec::new();
    let mut pending: BTreeMap<u64, Vec<T>> = BTreeMap::new();
    let mut next_write_id: u64 = 0;
    let mut next_batch_id: u64 = 0;

    for payload in batches {
        let job = Job { batch_id: next_batch_id, payload };
        next_batch_id += 1;

        let mut sent = false;
        while !sent {
            crossbeam::channel::select! {
                send(job_tx, job) -> res => {
                    if res.is_err() {
                        return Err(Error::Internal("Workers disconnected".to_string()));
                    }
                    sent = true;
                }
                recv(result_rx) -> res => {
                    match res {
                        Ok(batch) => {
                            buffer_and_append(batch, &mut pending, &mut next_write_id, &mut output)?;
                        }
                        Err(_) => {
                            return Err(Error::Internal("Result channel disconnected".to_string()));
                        }
                    }
                }
            }
        }
    }

    // Drop job_tx to signal workers we're done
    drop(job_tx);

    while next_write_id < next_batch_id {
        match result_rx.recv() {
            Ok(batch) => buffer_and_append(batch, &mut pending, &mut next_write_id, &mut output)?,
            Err(_) => {
                return Err(Error::Internal("Result channel disconnected".to_string()));
            }
        }
    }

    Ok(output)
}

fn buffer_and_append<T>(
    batch: BatchResult<T>,
    pending: &mut BTreeMap<u64, Vec<T>>,
    next_write_id: &mut u64,
    output: &mut Vec<T>,
) -> Result<()> {
    pending.insert(batch.batch_id, batch.items?);

    // Append any consecutive buffered batches
    while let Some(items) = pending.remove(next_write_id) {
        output.extend(items);
        *next_write_id += 1;
    }
    Ok(())
}

/// Worker thread function: processes batches until the job channel closes
fn worker_thread<J, T, F>(work: &F, job_rx: Receiver<Job<J>>, result_tx: Sender<BatchResult<T>>)
where
    F: Fn(J) -> Result<Vec<T>>,
{
    while let Ok(job) = job_rx.recv() {
        let result = BatchResult { batch_id: job.batch_id, items: work(job.payload) };

        if result_tx.send(result).is_err() {
            // Main thread has stopped, exit
            break;
        }
    }
}
