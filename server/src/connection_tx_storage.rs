use crate::connection::ConnectionEvent;
use flowdeck_system::ConnectionId;
use std::collections::HashMap;

pub type ConnectionTx = tokio::sync::mpsc::Sender<ConnectionEvent>;

/// Outbound side of every live connection, keyed by connection id.
pub struct ConnectionTxStorage {
    connection_txs: HashMap<ConnectionId, ConnectionTx>,
}

impl ConnectionTxStorage {
    pub fn new() -> Self {
        Self {
            connection_txs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, connection_id: ConnectionId, tx: ConnectionTx) {
        self.connection_txs.insert(connection_id, tx);
    }

    pub async fn send(&mut self, to: ConnectionId, message: ConnectionEvent) {
        if let Some(tx) = self.connection_txs.get_mut(&to) {
            if tx.send(message).await.is_err() {
                // Receiver is gone mid-dispatch; the Disconnect command is
                // already on its way, just stop addressing this peer.
                log::warn!("connection {} egress channel closed", to);
                self.connection_txs.remove(&to);
            }
        } else {
            log::debug!("dropping event for unknown connection {}", to);
        }
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.connection_txs.keys().copied().collect()
    }

    pub fn remove(&mut self, connection_id: ConnectionId) -> Option<ConnectionTx> {
        self.connection_txs.remove(&connection_id)
    }
}
