//! Layered multi-source task queue.
//!
//! A [`MultiQueue`] is an ordered list of layers, each a `(Source, FIFO)`
//! pair. The head layer has the highest priority. Layers above the bottom
//! are spawned while their owning operation (a proof-checker request, a
//! view prompt, a state callback) is in flight, and removed when it
//! completes; removal prepends any leftover tasks to the next layer down,
//! preserving FIFO order across the merge.
//!
//! ```text
//! head ──► (Agda,    [r1, r2])   spawned by SendRequest
//!          (Command, [t1, t2])   persistent bottom layer
//! ```
//!
//! The two peek modes implement the lane semantics:
//!
//! - [`PeekMode::Blocking`]: only the head layer is eligible. An empty
//!   live head layer means the lane is stuck waiting for that source.
//!   This is what halts `Command` work while a request is in flight.
//! - [`PeekMode::NonBlocking`]: empty layers are skipped (and left in
//!   place), so lower layers keep flowing while an operation is open.

use proofmode_task::Task;
use proofmode_types::Source;
use std::collections::VecDeque;
use tracing::{error, warn};

/// How [`MultiQueue::next_task`] treats an empty head layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeekMode {
    /// An empty head layer blocks the whole queue.
    Blocking,
    /// Empty layers are skipped, in place.
    NonBlocking,
}

/// One `(Source, FIFO)` layer.
#[derive(Debug)]
struct QueueLayer {
    source: Source,
    tasks: VecDeque<Task>,
}

impl QueueLayer {
    fn new(source: Source) -> Self {
        Self {
            source,
            tasks: VecDeque::new(),
        }
    }
}

/// An ordered list of `(Source, FIFO)` layers, head first.
///
/// Constructed with a single persistent `(Command, empty)` bottom layer.
/// Operations that target a source always act on the first (topmost)
/// layer with a matching tag.
#[derive(Debug)]
pub struct MultiQueue {
    layers: Vec<QueueLayer>,
}

impl MultiQueue {
    /// Creates a queue containing the single bottom `(Command, empty)` layer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: vec![QueueLayer::new(Source::Command)],
        }
    }

    /// Prepends a new empty layer tagged `source`.
    ///
    /// Layers with the same tag may coexist; later operations target the
    /// topmost match.
    pub fn spawn(&mut self, source: Source) {
        self.layers.insert(0, QueueLayer::new(source));
    }

    /// Removes the topmost layer tagged `source`.
    ///
    /// Leftover tasks are prepended, in their existing order, to the next
    /// layer down. Without a matching layer the queue is unchanged. The
    /// bottom layer is never removed: a match there means the invariant
    /// that `Command` stays at the bottom was already broken, so the
    /// tasks are discarded and an error is logged.
    pub fn remove(&mut self, source: Source) {
        let Some(index) = self.layers.iter().position(|layer| layer.source == source) else {
            return;
        };

        if index == self.layers.len() - 1 {
            let layer = &mut self.layers[index];
            error!(
                source = %source,
                dropped = layer.tasks.len(),
                "attempted to remove the bottom layer; discarding its tasks"
            );
            layer.tasks.clear();
            return;
        }

        let layer = self.layers.remove(index);
        for task in layer.tasks.into_iter().rev() {
            self.layers[index].tasks.push_front(task);
        }
    }

    /// Appends `tasks`, in order, to the topmost layer tagged `source`.
    ///
    /// Without a matching layer the tasks are dropped with a warning:
    /// their owning operation has already completed.
    pub fn add_tasks(&mut self, source: Source, tasks: Vec<Task>) {
        let Some(layer) = self.layers.iter_mut().find(|layer| layer.source == source) else {
            if !tasks.is_empty() {
                warn!(
                    source = %source,
                    dropped = tasks.len(),
                    "no layer for source; dropping tasks"
                );
            }
            return;
        };
        layer.tasks.extend(tasks);
    }

    /// Counts the layers tagged `source`.
    #[must_use]
    pub fn count_by_source(&self, source: Source) -> usize {
        self.layers
            .iter()
            .filter(|layer| layer.source == source)
            .count()
    }

    /// Pops the next runnable task, if any.
    ///
    /// In [`PeekMode::Blocking`] only the head layer is considered: an
    /// empty head means the queue is stuck waiting for that source. In
    /// [`PeekMode::NonBlocking`] the first non-empty layer is popped,
    /// leaving empty layers in place.
    pub fn next_task(&mut self, mode: PeekMode) -> Option<Task> {
        match mode {
            PeekMode::Blocking => self.layers.first_mut()?.tasks.pop_front(),
            PeekMode::NonBlocking => self
                .layers
                .iter_mut()
                .find_map(|layer| layer.tasks.pop_front()),
        }
    }

    /// Returns the total number of queued tasks across all layers.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.layers.iter().map(|layer| layer.tasks.len()).sum()
    }

    /// Returns `true` if every layer is empty.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.total_len() == 0
    }

    /// Returns the layer tags from head to bottom (diagnostics, tests).
    #[must_use]
    pub fn layer_sources(&self) -> Vec<Source> {
        self.layers.iter().map(|layer| layer.source).collect()
    }
}

impl Default for MultiQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MultiQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{}", layer.source, layer.tasks.len())?;
        }
        write!(f, "]")
    }
}
