//! Ring-buffer replay store with uniform sampling.
use super::{BatchBase, ReplayBufferConfig, Transition, TransitionBatch};
use crate::error::VolleyError;
use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};

/// Interface of replay buffers storing transitions and producing training
/// batches.
pub trait ReplayBufferBase {
    /// Configuration.
    type Config: Clone;

    /// The item pushed into the buffer.
    type Item;

    /// The batch produced for training.
    type Batch;

    /// Builds a replay buffer, validating the configuration.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Pushes an item, evicting the oldest entry when at capacity.
    fn push(&mut self, item: Self::Item) -> Result<()>;

    /// Current number of stored items.
    fn len(&self) -> usize;

    /// Whether the buffer is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples a batch of the given size.
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;
}

/// A bounded ring buffer of transitions with struct-of-arrays storage.
///
/// Eviction is strict FIFO over insertion order. Sampling draws distinct
/// indices uniformly at random, without replacement, and has no side
/// effect on the contents.
pub struct ReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    capacity: usize,
    i: usize,
    size: usize,
    obs: O,
    act: A,
    next_obs: O,
    reward: Vec<f32>,
    is_terminated: Vec<i8>,
    rng: StdRng,
}

impl<O, A> ReplayBufferBase for ReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Config = ReplayBufferConfig;
    type Item = Transition<O, A>;
    type Batch = TransitionBatch<O, A>;

    fn build(config: &Self::Config) -> Result<Self> {
        config.check()?;
        let capacity = config.capacity;

        Ok(Self {
            capacity,
            i: 0,
            size: 0,
            obs: O::new(capacity),
            act: A::new(capacity),
            next_obs: O::new(capacity),
            reward: vec![0.; capacity],
            is_terminated: vec![0; capacity],
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    fn push(&mut self, tr: Transition<O, A>) -> Result<()> {
        self.obs.push(self.i, &tr.obs);
        self.act.push(self.i, &tr.act);
        self.next_obs.push(self.i, &tr.next_obs);
        self.reward[self.i] = tr.reward;
        self.is_terminated[self.i] = tr.is_terminated as i8;

        self.i = (self.i + 1) % self.capacity;
        self.size += 1;
        if self.size >= self.capacity {
            self.size = self.capacity;
        }

        Ok(())
    }

    fn len(&self) -> usize {
        self.size
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        if size == 0 || size > self.size {
            return Err(VolleyError::InsufficientData {
                requested: size,
                len: self.size,
            }
            .into());
        }

        let ixs = rand::seq::index::sample(&mut self.rng, self.size, size).into_vec();

        Ok(TransitionBatch {
            obs: self.obs.sample(&ixs),
            act: self.act.sample(&ixs),
            next_obs: self.next_obs.sample(&ixs),
            reward: ixs.iter().map(|&ix| self.reward[ix]).collect(),
            is_terminated: ixs.iter().map(|&ix| self.is_terminated[ix]).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{F32Batch, I64Batch};
    use std::collections::HashSet;

    fn buffer(capacity: usize) -> ReplayBuffer<F32Batch, I64Batch> {
        ReplayBuffer::build(&ReplayBufferConfig::default().capacity(capacity)).unwrap()
    }

    fn transition(v: f32) -> Transition<F32Batch, I64Batch> {
        Transition::new(
            F32Batch(vec![v]),
            I64Batch(vec![v as i64]),
            F32Batch(vec![v + 0.5]),
            v,
            false,
        )
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = ReplayBufferConfig::default().capacity(0);
        assert!(ReplayBuffer::<F32Batch, I64Batch>::build(&config).is_err());
    }

    #[test]
    fn occupancy_never_exceeds_capacity() {
        let mut buffer = buffer(8);
        for k in 0..20 {
            buffer.push(transition(k as f32)).unwrap();
            assert!(buffer.len() <= 8);
        }
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn keeps_exactly_the_last_capacity_items() {
        let mut buffer = buffer(8);
        for k in 0..13 {
            buffer.push(transition(k as f32)).unwrap();
        }

        let stored: HashSet<i64> = buffer.reward.iter().map(|&r| r as i64).collect();
        let expected: HashSet<i64> = (5..13).collect();
        assert_eq!(stored, expected);
    }

    #[test]
    fn samples_distinct_indices_from_current_contents() {
        let mut buffer = buffer(100);
        for k in 0..50 {
            buffer.push(transition(k as f32)).unwrap();
        }

        let batch = buffer.batch(50).unwrap();
        let rewards: HashSet<i64> = batch.reward.iter().map(|&r| r as i64).collect();
        // Without replacement: 50 samples out of 50 items hit each item once.
        assert_eq!(rewards, (0..50).collect::<HashSet<i64>>());
    }

    #[test]
    fn sampling_does_not_change_contents() {
        let mut buffer = buffer(16);
        for k in 0..10 {
            buffer.push(transition(k as f32)).unwrap();
        }
        let before = buffer.reward.clone();
        let _ = buffer.batch(4).unwrap();
        assert_eq!(buffer.len(), 10);
        assert_eq!(buffer.reward, before);
    }

    #[test]
    fn oversized_batch_is_an_error() {
        let mut buffer = buffer(16);
        for k in 0..4 {
            buffer.push(transition(k as f32)).unwrap();
        }

        let err = buffer.batch(5).unwrap_err();
        match err.downcast_ref::<VolleyError>() {
            Some(VolleyError::InsufficientData { requested, len }) => {
                assert_eq!((*requested, *len), (5, 4));
            }
            _ => panic!("unexpected error: {:?}", err),
        }
        assert!(buffer.batch(0).is_err());
    }

    #[test]
    fn batch_columns_are_parallel() {
        let mut buffer = buffer(16);
        for k in 0..10 {
            buffer.push(transition(k as f32)).unwrap();
        }

        let batch = buffer.batch(6).unwrap();
        assert_eq!(batch.reward.len(), 6);
        assert_eq!(batch.is_terminated.len(), 6);
        for (i, &r) in batch.reward.iter().enumerate() {
            assert_eq!(batch.obs.0[i], r);
            assert_eq!(batch.act.0[i], r as i64);
            assert_eq!(batch.next_obs.0[i], r + 0.5);
        }
    }
}
