use std::fmt::Debug;

use futures::stream::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A reactive property that can be watched for changes.
///
/// When the value changes, all watchers are notified automatically.
/// Each watcher gets the current value immediately when subscribing.
#[derive(Clone)]
pub struct Property<T: Clone + Send + Sync + 'static> {
    tx: watch::Sender<T>,
    rx: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(initial: T) -> Self {
        let (tx, rx) = watch::channel(initial);
        Self { tx, rx }
    }

    /// Set a new value and notify all watchers.
    ///
    /// Watchers are only woken when the value actually changes.
    /// Only accessible within the crate to prevent external modification.
    pub(crate) fn set(&self, new_value: T)
    where
        T: PartialEq,
    {
        self.tx.send_if_modified(|current| {
            if *current != new_value {
                *current = new_value;
                true
            } else {
                false
            }
        });
    }

    /// Get the current value.
    ///
    /// This is a synchronous operation that clones the current value.
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Watch for changes to this property.
    ///
    /// The stream immediately yields the current value, then yields
    /// whenever the value changes. The stream owns its receiver and
    /// outlives the borrow of `self`.
    pub fn watch(&self) -> impl Stream<Item = T> + Send + use<T> {
        WatchStream::new(self.rx.clone())
    }

    /// Watch for changes made after this call, without the current value.
    pub fn watch_changes(&self) -> impl Stream<Item = T> + Send + use<T> {
        WatchStream::from_changes(self.tx.subscribe())
    }
}

impl<T: Clone + Send + Sync + Debug + 'static> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}
