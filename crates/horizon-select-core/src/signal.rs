//! Signal/slot system for Horizon Select.
//!
//! Signals are emitted when shared state changes, and connected slots
//! (callbacks) are invoked in response. Everything runs on the host's event
//! loop, so slots are always invoked directly in the emitting thread.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Re-entrancy
//!
//! [`Signal::emit`] takes a snapshot of the connected slots and releases its
//! lock before invoking them. A slot may therefore connect new slots or
//! disconnect existing ones (including itself) while the signal is being
//! emitted. Slots connected during an emission are first invoked by the next
//! emission.
//!
//! # Example
//!
//! ```
//! use horizon_select_core::Signal;
//!
//! let opened = Signal::<bool>::new();
//! let conn_id = opened.connect(|open| {
//!     println!("open = {open}");
//! });
//!
//! opened.emit(true);
//! opened.disconnect(conn_id);
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: Clone + Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Clone + Send + 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// A slot disconnected by an earlier slot during the same emission is
    /// still skipped.
    #[tracing::instrument(skip_all, target = "horizon_select_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        let snapshot: Vec<(ConnectionId, Slot<Args>)> = self
            .connections
            .lock()
            .iter()
            .map(|(id, slot)| (id, Arc::clone(slot)))
            .collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = snapshot.len(), "emitting signal");

        for (id, slot) in snapshot {
            if !self.connections.lock().contains_key(id) {
                continue;
            }
            slot(&args);
        }
    }
}

/// A connection that is disconnected when dropped.
///
/// Guards are how widgets tie a listener's lifetime to their own: installing
/// a listener yields a guard, and dropping the guard removes the listener.
/// The guard holds a weak reference, so it never keeps the signal alive.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// use horizon_select_core::{ConnectionGuard, Signal};
///
/// let signal = Arc::new(Signal::<i32>::new());
/// let counter = Arc::new(AtomicI32::new(0));
/// {
///     let counter = counter.clone();
///     let _guard = ConnectionGuard::connect(&signal, move |&n| {
///         counter.fetch_add(n, Ordering::SeqCst);
///     });
///     signal.emit(42);
/// }
/// signal.emit(43);
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// assert_eq!(signal.connection_count(), 0);
/// ```
pub struct ConnectionGuard<Args: Clone + Send + 'static> {
    signal: Weak<Signal<Args>>,
    id: ConnectionId,
}

impl<Args: Clone + Send + 'static> ConnectionGuard<Args> {
    /// Connect `slot` to `signal` and return a guard owning the connection.
    pub fn connect<F>(signal: &Arc<Signal<Args>>, slot: F) -> Self
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = signal.connect(slot);
        Self {
            signal: Arc::downgrade(signal),
            id,
        }
    }

    /// The connection ID owned by this guard.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Whether the connection is still registered with a live signal.
    pub fn is_connected(&self) -> bool {
        self.signal
            .upgrade()
            .is_some_and(|signal| signal.connections.lock().contains_key(self.id))
    }

    /// Disconnect now instead of waiting for the guard to drop.
    pub fn disconnect(self) {
        drop(self);
    }
}

impl<Args: Clone + Send + 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(signal) = self.signal.upgrade() {
            signal.disconnect(self.id);
        }
    }
}

impl<Args: Clone + Send + 'static> std::fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.lock(), vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        assert!(!signal.disconnect(conn_id));
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn test_connection_guard_disconnects_on_drop() {
        let signal = Arc::new(Signal::<i32>::new());
        let received = Arc::new(Mutex::new(Vec::new()));

        {
            let received_clone = received.clone();
            let guard = ConnectionGuard::connect(&signal, move |&value| {
                received_clone.lock().push(value);
            });
            assert!(guard.is_connected());
            signal.emit(1);
        }

        signal.emit(2);
        assert_eq!(*received.lock(), vec![1]);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_guard_outliving_signal_is_harmless() {
        let signal = Arc::new(Signal::<()>::new());
        let guard = ConnectionGuard::connect(&signal, |_| {});
        drop(signal);
        assert!(!guard.is_connected());
        drop(guard);
    }

    #[test]
    fn test_slot_can_disconnect_itself_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let slot_guard: Arc<Mutex<Option<ConnectionGuard<()>>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(AtomicUsize::new(0));

        let holder = slot_guard.clone();
        let calls_clone = calls.clone();
        let guard = ConnectionGuard::connect(&signal, move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            holder.lock().take();
        });
        *slot_guard.lock() = Some(guard);

        signal.emit(());
        signal.emit(());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_disconnected_mid_emit_is_skipped() {
        let signal = Arc::new(Signal::<()>::new());
        let second_called = Arc::new(AtomicBool::new(false));
        let second_id: Arc<Mutex<Option<ConnectionId>>> = Arc::new(Mutex::new(None));

        let signal_clone = Arc::downgrade(&signal);
        let id_holder = second_id.clone();
        signal.connect(move |_| {
            if let (Some(signal), Some(id)) = (signal_clone.upgrade(), *id_holder.lock()) {
                signal.disconnect(id);
            }
        });
        let flag = second_called.clone();
        *second_id.lock() = Some(signal.connect(move |_| flag.store(true, Ordering::SeqCst)));

        signal.emit(());
        assert!(!second_called.load(Ordering::SeqCst));
    }
}
