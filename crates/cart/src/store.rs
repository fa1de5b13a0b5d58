//! The cart store: an injected service object owning the cart collection.
//!
//! `CartStore` hydrates once from storage at open, applies mutations to the
//! in-memory collection, notifies subscribers through a watch channel, and
//! hands the post-mutation snapshot to a single-writer persistence task.
//! Writes are serialized per store instance, so a later mutation can never be
//! overwritten in storage by an earlier one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use pocket_market_core::{Cart, Product, ProductId};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, instrument, warn};

use crate::error::StoreError;
use crate::storage::CartStorage;

/// Fixed storage key for the serialized cart blob.
pub const CART_STORAGE_KEY: &str = "@pocket-market:cart";

/// Client-side cart state container.
///
/// Cheaply cloneable; clones share the same collection, subscriber channel,
/// and persistence queue. Construct one per cart scope and inject it into the
/// component tree that needs it.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    /// Current collection; the watch sender doubles as the notifier.
    state: watch::Sender<Cart>,
    /// Monotonic mutation counter, paired with snapshots sent to the writer.
    version: AtomicU64,
    write_tx: mpsc::UnboundedSender<WriteJob>,
    status_rx: watch::Receiver<WriteStatus>,
}

/// A snapshot queued for persistence.
struct WriteJob {
    version: u64,
    cart: Cart,
}

/// Progress of the persistence task, published after every write attempt.
#[derive(Debug, Clone, Default)]
struct WriteStatus {
    /// Highest mutation version attempted so far.
    version: u64,
    /// Outcome of the most recent attempt.
    last_error: Option<String>,
}

impl CartStore {
    /// Open a cart store backed by `storage`.
    ///
    /// Reads the blob under [`CART_STORAGE_KEY`] once: absent means an empty
    /// cart, present means the blob is deserialized into the collection.
    /// Spawns the persistence task; the current tokio runtime must outlive
    /// the store.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Storage`] if the backend fails to read.
    /// - [`StoreError::Deserialize`] if a blob exists but cannot be decoded.
    ///   The store does not silently reset a corrupt cart; the caller decides
    ///   whether to start over with fresh storage.
    pub async fn open<S: CartStorage>(storage: S) -> Result<Self, StoreError> {
        let cart = match storage.get(CART_STORAGE_KEY).await? {
            Some(blob) => {
                let cart: Cart = serde_json::from_str(&blob)?;
                debug!(items = cart.len(), "hydrated cart from storage");
                cart
            }
            None => {
                debug!("no cart blob in storage, starting empty");
                Cart::new()
            }
        };

        let (state, _) = watch::channel(cart);
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(WriteStatus::default());
        tokio::spawn(write_loop(storage, write_rx, status_tx));

        Ok(Self {
            inner: Arc::new(StoreInner {
                state,
                version: AtomicU64::new(0),
                write_tx,
                status_rx,
            }),
        })
    }

    /// Snapshot of the current collection.
    #[must_use]
    pub fn products(&self) -> Cart {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to collection changes.
    ///
    /// Every operation notifies, including ones that leave the contents
    /// unchanged (an increment or decrement of an absent id).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.state.subscribe()
    }

    /// Add a product to the cart.
    ///
    /// An existing item with the same id has its quantity incremented by 1
    /// and keeps its stored fields; otherwise the product is appended with
    /// quantity 1.
    #[instrument(skip_all, fields(product_id = %product.id))]
    pub fn add_to_cart(&self, product: Product) {
        self.mutate(|cart| cart.add(product));
    }

    /// Increment the quantity of the item with the given id by 1.
    ///
    /// An absent id leaves the contents unchanged but still notifies
    /// subscribers and persists.
    #[instrument(skip_all, fields(product_id = %id))]
    pub fn increment(&self, id: &ProductId) {
        self.mutate(|cart| {
            if !cart.increment(id) {
                warn!("increment for id not in cart");
            }
        });
    }

    /// Decrement the quantity of the item with the given id by 1, removing
    /// it once the quantity reaches 0.
    ///
    /// An absent id leaves the contents unchanged but still notifies
    /// subscribers and persists.
    #[instrument(skip_all, fields(product_id = %id))]
    pub fn decrement(&self, id: &ProductId) {
        self.mutate(|cart| {
            if !cart.decrement(id) {
                warn!("decrement for id not in cart");
            }
        });
    }

    /// Wait until the persistence task has caught up with the current
    /// in-memory state, and surface the outcome of that write.
    ///
    /// Ordinary mutations never surface persistence failures (they are
    /// logged and dropped); call this where durability matters, such as
    /// before handing off to checkout.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Persist`] if the write covering the current state
    ///   failed.
    /// - [`StoreError::WriterStopped`] if the persistence task is gone.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let target = self.inner.version.load(Ordering::SeqCst);
        let mut status_rx = self.inner.status_rx.clone();
        let status = status_rx
            .wait_for(|status| status.version >= target)
            .await
            .map_err(|_| StoreError::WriterStopped)?;

        match &status.last_error {
            Some(message) => Err(StoreError::Persist(message.clone())),
            None => Ok(()),
        }
    }

    /// Apply a mutation, notify subscribers, and queue the post-mutation
    /// snapshot for persistence.
    ///
    /// The version and snapshot are paired inside `send_modify`, under the
    /// watch channel's lock, so racing store clones on a multi-thread
    /// runtime cannot tag an older snapshot with a newer version.
    fn mutate<F: FnOnce(&mut Cart)>(&self, f: F) {
        let mut job = None;
        self.inner.state.send_modify(|cart| {
            f(cart);
            let version = self.inner.version.fetch_add(1, Ordering::SeqCst) + 1;
            job = Some(WriteJob {
                version,
                cart: cart.clone(),
            });
        });

        if let Some(job) = job
            && self.inner.write_tx.send(job).is_err()
        {
            error!("cart persistence task is gone, update not persisted");
        }
    }
}

/// Single-writer persistence loop.
///
/// Consumes queued snapshots, coalescing a backlog down to the
/// highest-version one, and writes the whole blob per attempt. Racing store
/// clones can enqueue jobs out of version order; the loop keeps the
/// published version monotonic and drops jobs already superseded by a
/// written snapshot, so `flush` waiters always complete. Failures are
/// logged and published on the status channel for `flush`; they never
/// interrupt the loop. The loop drains and exits once every store handle
/// is dropped.
async fn write_loop<S: CartStorage>(
    storage: S,
    mut write_rx: mpsc::UnboundedReceiver<WriteJob>,
    status_tx: watch::Sender<WriteStatus>,
) {
    let mut newest_written = 0_u64;
    while let Some(mut job) = write_rx.recv().await {
        // A burst of mutations only needs the newest snapshot on disk.
        let mut skipped = 0_u32;
        while let Ok(other) = write_rx.try_recv() {
            if other.version > job.version {
                job = other;
            }
            skipped += 1;
        }
        if skipped > 0 {
            debug!(skipped, "coalesced queued cart writes");
        }

        // A job that lost the queue race to a newer one it coalesced with
        // earlier would regress the blob on disk.
        if job.version <= newest_written {
            continue;
        }
        newest_written = job.version;

        let last_error = match serde_json::to_string(&job.cart) {
            Ok(blob) => storage
                .set(CART_STORAGE_KEY, &blob)
                .await
                .err()
                .map(|e| e.to_string()),
            Err(e) => Some(e.to_string()),
        };

        if let Some(message) = &last_error {
            warn!(version = job.version, error = %message, "cart persistence failed");
        }

        let _ = status_tx.send(WriteStatus {
            version: newest_written,
            last_error,
        });
    }
}
