//! Column storage, single transitions and sampled batches.

/// Fixed-capacity column storage for one field of a transition.
///
/// The replay buffer keeps observations and actions in column types
/// implementing this trait, so that a sampled batch comes out as one
/// contiguous array per field, ready for a vectorized forward pass.
pub trait BatchBase {
    /// Creates a column with the given capacity.
    fn new(capacity: usize) -> Self;

    /// Writes the rows of `data` starting at index `ix`, wrapping at the
    /// capacity.
    fn push(&mut self, ix: usize, data: &Self);

    /// Gathers the rows at the given indices into a new column.
    fn sample(&self, ixs: &[usize]) -> Self;
}

/// A single environment transition.
///
/// Immutable once created; `obs` and `act` each hold one row of the
/// corresponding column type. `is_terminated` reflects environment
/// termination only, never a time-limit truncation, so that the Bellman
/// target of a truncated step still bootstraps from the next state.
pub struct Transition<O, A> {
    /// Observation before the step.
    pub obs: O,

    /// Action taken.
    pub act: A,

    /// Observation after the step.
    pub next_obs: O,

    /// Reward.
    pub reward: f32,

    /// The step ended the episode in a terminal state.
    pub is_terminated: bool,
}

impl<O, A> Transition<O, A> {
    /// Constructs a transition.
    pub fn new(obs: O, act: A, next_obs: O, reward: f32, is_terminated: bool) -> Self {
        Self {
            obs,
            act,
            next_obs,
            reward,
            is_terminated,
        }
    }
}

/// Interface of sampled transition batches, decomposable into parallel
/// columns.
pub trait TransitionBatchBase {
    /// A set of observations in a batch.
    type ObsBatch;

    /// A set of actions in a batch.
    type ActBatch;

    /// Decomposes the batch into `(obs, act, next_obs, reward, is_terminated)`.
    fn unpack(
        self,
    ) -> (
        Self::ObsBatch,
        Self::ActBatch,
        Self::ObsBatch,
        Vec<f32>,
        Vec<i8>,
    );

    /// The number of transitions in the batch.
    fn len(&self) -> usize;

    /// Whether the batch is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Transitions sampled from a replay buffer, one contiguous column per
/// field.
pub struct TransitionBatch<O, A> {
    /// Observations before the step.
    pub obs: O,

    /// Actions taken.
    pub act: A,

    /// Observations after the step.
    pub next_obs: O,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Termination flags, `1` at terminal transitions.
    pub is_terminated: Vec<i8>,
}

impl<O, A> TransitionBatchBase for TransitionBatch<O, A> {
    type ObsBatch = O;
    type ActBatch = A;

    fn unpack(
        self,
    ) -> (
        Self::ObsBatch,
        Self::ActBatch,
        Self::ObsBatch,
        Vec<f32>,
        Vec<i8>,
    ) {
        (
            self.obs,
            self.act,
            self.next_obs,
            self.reward,
            self.is_terminated,
        )
    }

    fn len(&self) -> usize {
        self.reward.len()
    }
}
