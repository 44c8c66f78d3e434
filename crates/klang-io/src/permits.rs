//! The counting backpressure signal between device and render loop.

use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};

/// Counting signal limiting in-flight blocks to the pool size.
///
/// Built on a bounded channel pre-charged with one permit per block: the
/// render loop blocks in [`BlockPermits::acquire`] until the device returns
/// a permit through [`PermitReleaser::release`] from its completion
/// callback. The bounded capacity makes the contract structural — the
/// signal can never hold more than `count` permits and never goes negative.
///
/// This is the render loop's sole suspension point and the only flow
/// control against the device's real playback rate. If the device loses a
/// completion notification, the loop eventually parks forever; that risk is
/// accepted and not detected here.
#[derive(Debug)]
pub struct BlockPermits {
    permits: Receiver<()>,
}

/// Cloneable release side of a [`BlockPermits`] signal, handed to the
/// device completion callback.
#[derive(Debug, Clone)]
pub struct PermitReleaser {
    releaser: SyncSender<()>,
}

impl BlockPermits {
    /// Create a signal charged with `count` permits.
    pub fn new(count: usize) -> (Self, PermitReleaser) {
        let (releaser, permits) = sync_channel(count);
        for _ in 0..count {
            // Cannot fail: capacity equals `count` and the receiver is alive.
            let _ = releaser.try_send(());
        }
        (Self { permits }, PermitReleaser { releaser })
    }

    /// Block until a permit is available and take it.
    ///
    /// Returns `false` once every release handle is gone — the device side
    /// has shut down and no permit can ever arrive, which the render loop
    /// treats as a stop signal.
    pub fn acquire(&self) -> bool {
        self.permits.recv().is_ok()
    }
}

impl PermitReleaser {
    /// Return one permit, waking the render loop if it is parked.
    ///
    /// A release beyond the signal's capacity means the device reported
    /// more completions than it was given blocks; the permit is rejected
    /// and logged rather than letting the pool overrun.
    pub fn release(&self) {
        match self.releaser.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => {
                tracing::warn!("dropping excess block completion; permits already at capacity");
            }
            // The render loop is gone; nothing left to wake.
            Err(TrySendError::Disconnected(())) => {}
        }
    }

    /// Return one permit without complaint if the signal is already full.
    ///
    /// Used by the engine at shutdown to wake a parked render loop; a full
    /// signal means the loop is not parked and needs no waking.
    pub(crate) fn wake(&self) {
        let _ = self.releaser.try_send(());
    }
}
