//! Signal/slot system for Horizon L10n.
//!
//! A [`Signal`] is a multicast observer list. Slots (callbacks) are attached
//! with [`Signal::connect`] and detached with [`Signal::disconnect`] or by
//! dropping a [`ConnectionGuard`]. Emission is synchronous: every slot runs on
//! the thread that called [`Signal::emit`], in the order the slots were
//! connected, before `emit` returns.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Delivery Rules
//!
//! - No buffering: a slot connected after an emission never sees it.
//! - A slot disconnected while an emission is in progress is not invoked for
//!   the remainder of that emission, nor afterwards.
//! - The connection list is not locked while slots run, so slots may connect,
//!   disconnect or emit on the same signal.
//!
//! # Example
//!
//! ```
//! use horizon_l10n_core::Signal;
//!
//! let language_changed = Signal::<String>::new();
//!
//! let conn_id = language_changed.connect(|lang| {
//!     println!("Language changed to: {}", lang);
//! });
//!
//! language_changed.emit("fr-FR".to_string());
//! language_changed.disconnect(conn_id);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Internal storage for a single connection.
struct Connection<Args> {
    slot: Slot<Args>,
    /// Monotonic connection sequence; slot keys are reused so they can't order delivery.
    order: u64,
}

type ConnectionTable<Args> = Mutex<SlotMap<ConnectionId, Connection<Args>>>;

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync` and can be shared between threads, but all
/// slots run synchronously on the emitting thread.
pub struct Signal<Args> {
    connections: Arc<ConnectionTable<Args>>,
    blocked: AtomicBool,
    next_order: AtomicU64,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(SlotMap::with_key())),
            blocked: AtomicBool::new(false),
            next_order: AtomicU64::new(0),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let order = self.next_order.fetch_add(1, Ordering::SeqCst);
        self.connections.lock().insert(Connection {
            slot: Arc::new(slot),
            order,
        })
    }

    /// Connect a slot with automatic disconnection when the guard is dropped.
    ///
    /// The guard only holds a weak reference to the connection table, so it
    /// may safely outlive the signal.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            connections: Arc::downgrade(&self.connections),
            id,
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Returns `true` if the connection is still attached.
    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.connections.lock().contains_key(id)
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// Returns the number of slots that were invoked.
    #[tracing::instrument(skip_all, target = "horizon_l10n_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) -> usize {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return 0;
        }

        let mut snapshot: Vec<(ConnectionId, u64, Slot<Args>)> = self
            .connections
            .lock()
            .iter()
            .map(|(id, conn)| (id, conn.order, Arc::clone(&conn.slot)))
            .collect();
        snapshot.sort_by_key(|(_, order, _)| *order);
        tracing::trace!(target: targets::SIGNAL, connection_count = snapshot.len(), "emitting signal");

        let mut delivered = 0;
        for (id, _, slot) in snapshot {
            // A previous slot may have detached this one.
            if !self.is_connected(id) {
                continue;
            }
            (*slot)(&args);
            delivered += 1;
        }
        delivered
    }
}

/// Type-erased signal access.
///
/// Lets callers detach or inspect connections without knowing the argument
/// type, e.g. when a subscription only records which channel it belongs to.
pub trait SignalEmitter: Send + Sync {
    /// Disconnect a connection by ID.
    fn disconnect(&self, id: ConnectionId) -> bool;

    /// Disconnect all connections.
    fn disconnect_all(&self);

    /// Get the number of connections.
    fn connection_count(&self) -> usize;

    /// Check if blocked.
    fn is_blocked(&self) -> bool;

    /// Set blocked state.
    fn set_blocked(&self, blocked: bool);
}

impl<Args: 'static> SignalEmitter for Signal<Args> {
    fn disconnect(&self, id: ConnectionId) -> bool {
        Signal::disconnect(self, id)
    }

    fn disconnect_all(&self) {
        Signal::disconnect_all(self);
    }

    fn connection_count(&self) -> usize {
        Signal::connection_count(self)
    }

    fn is_blocked(&self) -> bool {
        Signal::is_blocked(self)
    }

    fn set_blocked(&self, blocked: bool) {
        Signal::set_blocked(self, blocked);
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// Created via [`Signal::connect_scoped`].
///
/// # Example
///
/// ```
/// use horizon_l10n_core::Signal;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let signal = Signal::<i32>::new();
/// let counter = Arc::new(AtomicI32::new(0));
/// {
///     let counter_clone = counter.clone();
///     let _guard = signal.connect_scoped(move |&n| {
///         counter_clone.fetch_add(n, Ordering::SeqCst);
///     });
///     signal.emit(42);
/// }
/// signal.emit(43);
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// ```
pub struct ConnectionGuard<Args> {
    connections: Weak<ConnectionTable<Args>>,
    id: ConnectionId,
}

impl<Args> ConnectionGuard<Args> {
    /// The ID of the guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Disconnect now instead of at drop.
    ///
    /// Returns `true` if the connection was still attached.
    pub fn disconnect(self) -> bool {
        self.remove()
    }

    fn remove(&self) -> bool {
        match self.connections.upgrade() {
            Some(table) => table.lock().remove(self.id).is_some(),
            None => false,
        }
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        self.remove();
    }
}
