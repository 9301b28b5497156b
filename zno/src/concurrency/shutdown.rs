use tokio::sync::watch;

/// Sending side of the shutdown channel.
///
/// The flag only ever goes from `false` to `true`, so a request sent before a migration
/// subscribed is still observed once it checks.
#[derive(Debug, Clone)]
pub struct ShutdownTx(watch::Sender<bool>);

impl ShutdownTx {
    /// Requests shutdown. Calling it again has no further effect.
    pub fn shutdown(&self) {
        self.0.send_replace(true);
    }

    pub fn subscribe(&self) -> ShutdownRx {
        ShutdownRx(self.0.subscribe())
    }
}

/// Receiving side of the shutdown channel.
#[derive(Debug, Clone)]
pub struct ShutdownRx(watch::Receiver<bool>);

impl ShutdownRx {
    /// Returns whether shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        *self.0.borrow()
    }
}

/// Creates a shutdown channel with no shutdown requested.
pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTx(tx), ShutdownRx(rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_is_seen_by_every_receiver() {
        let (tx, rx) = create_shutdown_channel();
        let late = tx.subscribe();
        assert!(!rx.is_shutdown());

        tx.shutdown();

        assert!(rx.is_shutdown());
        assert!(late.is_shutdown());
        assert!(tx.subscribe().is_shutdown());
    }
}
