use tokio::sync::mpsc::{channel, Sender};

use flowdeck_system::{ConnectionId, Outbound, Recipients, SessionCoordinator, SessionEvent};

use super::connection::{ConnectionCommand, ConnectionEvent};
use crate::connection_tx_storage::ConnectionTxStorage;

pub type ServerTx = Sender<ConnectionCommand>;

/// Owner of all mutable session state. Lives on a single task and drains one
/// queue, so inbound events are processed strictly one at a time; queue
/// arrival order is the global order last-writer-wins relies on.
struct Server {
    session: SessionCoordinator,
    connections: ConnectionTxStorage,
}

impl Server {
    fn new() -> Self {
        Self {
            session: SessionCoordinator::new(),
            connections: ConnectionTxStorage::new(),
        }
    }

    async fn handle_connection_command(&mut self, command: ConnectionCommand) {
        match command {
            ConnectionCommand::Connect { tx } => {
                let connection_id = self.session.connect();
                self.connections.insert(connection_id, tx);
                self.connections
                    .send(connection_id, ConnectionEvent::Connected { connection_id })
                    .await;
                log::info!("connection {} accepted", connection_id);
            }
            ConnectionCommand::Disconnect { from } => {
                self.connections.remove(from);
                let out = self.session.disconnect(from);
                self.dispatch(out).await;
                log::info!("connection {} closed", from);
            }
            ConnectionCommand::ClientEvent { from, event } => {
                let out = self.session.handle(from, event);
                self.dispatch(out).await;
            }
        }
    }

    async fn dispatch(&mut self, out: Vec<Outbound>) {
        for Outbound { to, event } in out {
            match to {
                Recipients::One(connection_id) => {
                    self.connections
                        .send(connection_id, ConnectionEvent::SessionEvent(event))
                        .await;
                }
                Recipients::AllExcept(without) => self.broadcast(event, Some(without)).await,
                Recipients::All => self.broadcast(event, None).await,
            }
        }
    }

    async fn broadcast(&mut self, event: SessionEvent, without: Option<ConnectionId>) {
        for connection_id in self.connections.connection_ids() {
            if without.map_or(false, |w| w == connection_id) {
                continue;
            }
            self.connections
                .send(connection_id, ConnectionEvent::SessionEvent(event.clone()))
                .await;
        }
    }
}

pub fn spawn_server() -> ServerTx {
    let (srv_tx, mut srv_rx) = channel::<ConnectionCommand>(16);

    tokio::spawn(async move {
        let mut server = Server::new();

        while let Some(command) = srv_rx.recv().await {
            server.handle_connection_command(command).await;
        }
    });

    srv_tx
}
