/// Session gate - reactive holder of the authenticated identity
///
/// Authentication itself happens elsewhere; this gate is the boundary the
/// sync layer observes. It publishes the nullable identity through a watch
/// channel so the store can react to sign-in transitions.
use crate::models::Identity;
use tokio::sync::watch;

pub struct SessionGate {
    tx: watch::Sender<Option<Identity>>,
}

impl SessionGate {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Publish a signed-in identity to subscribers.
    pub fn sign_in(&self, identity: Identity) {
        self.tx.send_replace(Some(identity));
    }

    /// Drop the identity. Cached feeds are not cleared on sign-out.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }

    /// Snapshot of the current identity.
    pub fn identity(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}
