//! Outbound messaging to the reporting collaborator.
//!
//! Visit records and their rendered reports are decoupled: a publish failure
//! is logged and never rolls back the visit, so the daily generation cannot
//! be blocked by a rendering outage.

use std::sync::mpsc;

use crate::domain::visit::Visit;
use crate::models::zmq::VisitCreatedMessage;

/// Fire-and-forget PUB-socket publisher. The socket lives on a background
/// thread; `publish_*` only enqueues.
pub struct EventPublisher {
    tx: mpsc::Sender<Vec<u8>>,
}

impl EventPublisher {
    /// Binds the PUB socket and starts the sender thread.
    pub fn start(endpoint: &str) -> Result<Self, zmq::Error> {
        let context = zmq::Context::new();
        let socket = context.socket(zmq::PUB)?;
        socket.bind(endpoint)?;

        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        std::thread::spawn(move || {
            for payload in rx {
                if let Err(e) = socket.send(payload, 0) {
                    log::error!("Failed to publish event: {e}");
                }
            }
        });

        Ok(Self { tx })
    }

    /// Publishes one `visit.created` event per visit.
    pub fn publish_visits_created(&self, visits: &[Visit]) {
        for visit in visits {
            match serde_json::to_vec(&VisitCreatedMessage::from(visit)) {
                Ok(payload) => {
                    if self.tx.send(payload).is_err() {
                        log::error!("Event sender thread is gone; dropping visit.created event");
                    }
                }
                Err(e) => log::error!("Failed to serialize visit.created event: {e}"),
            }
        }
    }
}
