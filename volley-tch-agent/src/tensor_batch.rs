use tch::Tensor;
use volley_core::replay_buffer::BatchBase;

/// A column of tensors used by the replay buffer.
///
/// The internal buffer has the shape `[capacity, shape[1..]]`, where
/// `shape` is taken from the first pushed tensor; `shape[0]` of pushed
/// data is the number of rows.
pub struct TensorBatch {
    buf: Option<Tensor>,
    capacity: i64,
}

impl TensorBatch {
    /// Wraps an existing tensor; its first axis becomes the row axis.
    pub fn from_tensor(t: Tensor) -> Self {
        let capacity = t.size()[0];
        Self {
            buf: Some(t),
            capacity,
        }
    }
}

impl BatchBase for TensorBatch {
    fn new(capacity: usize) -> Self {
        Self {
            buf: None,
            capacity: capacity as _,
        }
    }

    /// Writes the rows of `data` starting at `index`, wrapping at the
    /// capacity.
    ///
    /// On the first push the internal buffer is allocated with the kind
    /// and row shape of `data`.
    fn push(&mut self, index: usize, data: &Self) {
        let data_buf = match &data.buf {
            Some(buf) => buf,
            None => return,
        };

        let n_rows = data_buf.size()[0];
        if n_rows == 0 {
            return;
        }

        if self.buf.is_none() {
            let mut shape = data_buf.size();
            shape[0] = self.capacity;
            let kind = data_buf.kind();
            self.buf = Some(Tensor::zeros(&shape, (kind, tch::Device::Cpu)));
        }

        let buf = self.buf.as_ref().unwrap();
        let index = index as i64;
        for i in 0..n_rows {
            buf.get((index + i) % self.capacity).copy_(&data_buf.get(i));
        }
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        let ixs = ixs.iter().map(|&ix| ix as i64).collect::<Vec<_>>();
        let batch_indexes = Tensor::from_slice(&ixs);
        let buf = self
            .buf
            .as_ref()
            .expect("sampled from an empty TensorBatch")
            .index_select(0, &batch_indexes);
        Self {
            buf: Some(buf),
            capacity: ixs.len() as i64,
        }
    }
}

impl From<TensorBatch> for Tensor {
    fn from(b: TensorBatch) -> Self {
        b.buf.expect("converted an empty TensorBatch to a Tensor")
    }
}
