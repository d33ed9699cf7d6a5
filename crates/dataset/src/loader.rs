use {
    crate::{DatasetError, FrameDataset, FrameSequence, Transform},
    candle_core::Tensor,
    futures_core::Stream,
    rand::{SeedableRng, rngs::StdRng, seq::SliceRandom},
    std::{
        path::Path,
        pin::Pin,
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
        task::{Context, Poll},
        thread,
    },
    tokio::sync::mpsc,
};

/// Batches decoded ahead of the consumer.
const PREFETCH_BATCHES: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLoaderConfig {
    pub batch_size: usize,
    pub shuffle: bool,
    /// Fixed shuffle seed. Epoch `n` shuffles with `seed + n`.
    pub seed: Option<u64>,
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            shuffle: true,
            seed: None,
        }
    }
}

impl DataLoaderConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Up to `batch_size` samples together with their dataset indices.
#[derive(Debug, Clone)]
pub struct Batch {
    pub indices: Vec<usize>,
    pub sequences: Vec<FrameSequence>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Stack the batch per time step: element `k` is `(B, 3, H', W')` built
    /// from frame `k` of every sequence. All sequences need the same length
    /// and frame shape, with one index per sequence.
    pub fn collate(&self) -> Result<Vec<Tensor>, DatasetError> {
        let Some(first) = self.sequences.first() else {
            return Ok(Vec::new());
        };
        if self.indices.len() != self.sequences.len() {
            return Err(DatasetError::Shape(format!(
                "{} indices for {} sequences",
                self.indices.len(),
                self.sequences.len()
            )));
        }
        let frames = first.len();
        if let Some(pos) = self.sequences.iter().position(|seq| seq.len() != frames) {
            return Err(DatasetError::Shape(format!(
                "video {} has {} frames but video {} has {}",
                self.indices[0],
                frames,
                self.indices[pos],
                self.sequences[pos].len()
            )));
        }
        (0..frames)
            .map(|k| {
                let step: Vec<&Tensor> = self.sequences.iter().map(|seq| &seq[k]).collect();
                Tensor::stack(&step, 0)
                    .map_err(|err| DatasetError::Shape(format!("frame {k}: {err}")))
            })
            .collect()
    }
}

/// Batches a `FrameDataset` on a background worker.
pub struct DataLoader<T> {
    dataset: Arc<FrameDataset<T>>,
    config: DataLoaderConfig,
    epoch: AtomicU64,
}

impl<T: Transform + 'static> DataLoader<T> {
    pub fn new(dataset: FrameDataset<T>, config: DataLoaderConfig) -> Result<Self, DatasetError> {
        if config.batch_size == 0 {
            return Err(DatasetError::Config("batch size must be at least 1".to_string()));
        }
        Ok(Self {
            dataset: Arc::new(dataset),
            config,
            epoch: AtomicU64::new(0),
        })
    }

    pub fn dataset(&self) -> &FrameDataset<T> {
        &self.dataset
    }

    pub fn config(&self) -> DataLoaderConfig {
        self.config
    }

    pub fn num_batches(&self) -> usize {
        self.dataset.len().div_ceil(self.config.batch_size)
    }

    /// Start one pass over the dataset.
    ///
    /// Every call draws a fresh order when shuffling. A failed batch is
    /// yielded as an error and ends the pass.
    pub fn iter(&self) -> Batches {
        let order = self.order();
        let batch_size = self.config.batch_size;
        let dataset = Arc::clone(&self.dataset);
        let (sender, receiver) = mpsc::channel(PREFETCH_BATCHES);

        log::debug!(
            "starting pass over {} videos in batches of {}",
            order.len(),
            batch_size
        );
        let worker = thread::spawn(move || {
            for indices in order.chunks(batch_size) {
                let batch = load_batch(&dataset, indices);
                let failed = batch.is_err();
                if sender.blocking_send(batch).is_err() {
                    // main closed the channel, so drop everything
                    log::debug!("batch consumer went away, stopping worker");
                    return;
                }
                if failed {
                    return;
                }
            }
        });

        Batches {
            receiver,
            remaining: self.num_batches(),
            finished: false,
            _worker: worker,
        }
    }

    fn order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if self.config.shuffle {
            let epoch = self.epoch.fetch_add(1, Ordering::Relaxed);
            let mut rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(epoch)),
                None => StdRng::from_entropy(),
            };
            order.shuffle(&mut rng);
        }
        order
    }
}

fn load_batch<T: Transform>(
    dataset: &FrameDataset<T>,
    indices: &[usize],
) -> Result<Batch, DatasetError> {
    let sequences = indices
        .iter()
        .map(|&index| dataset.get(index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Batch {
        indices: indices.to_vec(),
        sequences,
    })
}

/// One pass of batches as a `Stream`. Outside of an async runtime use
/// `blocking_next` or `into_blocking`.
pub struct Batches {
    receiver: mpsc::Receiver<Result<Batch, DatasetError>>,
    remaining: usize,
    finished: bool,
    _worker: thread::JoinHandle<()>,
}

impl Batches {
    // a worker that vanishes before delivering every batch is reported once
    fn settle(
        &mut self,
        item: Option<Result<Batch, DatasetError>>,
    ) -> Option<Result<Batch, DatasetError>> {
        if self.finished {
            return None;
        }
        match item {
            Some(Ok(batch)) => {
                self.remaining = self.remaining.saturating_sub(1);
                Some(Ok(batch))
            }
            Some(Err(error)) => {
                self.finished = true;
                Some(Err(error))
            }
            None => {
                self.finished = true;
                if self.remaining > 0 {
                    log::error!("loader worker stopped with {} batches left", self.remaining);
                    Some(Err(DatasetError::Channel(format!(
                        "loader worker stopped with {} batches left",
                        self.remaining
                    ))))
                } else {
                    None
                }
            }
        }
    }
}

impl Stream for Batches {
    type Item = Result<Batch, DatasetError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }
        match this.receiver.poll_recv(cx) {
            Poll::Ready(item) => Poll::Ready(this.settle(item)),
            Poll::Pending => Poll::Pending,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl Batches {
    /// Wait for the next batch on the calling thread. Do not call from
    /// inside an async runtime.
    pub fn blocking_next(&mut self) -> Option<Result<Batch, DatasetError>> {
        if self.finished {
            return None;
        }
        let item = self.receiver.blocking_recv();
        self.settle(item)
    }

    /// Consume the pass as a blocking `Iterator`.
    pub fn into_blocking(self) -> BlockingBatches {
        BlockingBatches { batches: self }
    }
}

/// Blocking view of `Batches`, for callers outside an async runtime.
pub struct BlockingBatches {
    batches: Batches,
}

impl Iterator for BlockingBatches {
    type Item = Result<Batch, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.batches.blocking_next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.batches.remaining))
    }
}

/// Loader over every video in `data_path`, one worker and no fixed seed.
pub fn get_loader<T: Transform + 'static>(
    batch_size: usize,
    data_path: impl AsRef<Path>,
    transform: T,
    shuffle: bool,
) -> Result<DataLoader<T>, DatasetError> {
    let dataset = FrameDataset::new(data_path, transform)?;
    DataLoader::new(
        dataset,
        DataLoaderConfig::default()
            .with_batch_size(batch_size)
            .with_shuffle(shuffle),
    )
}
