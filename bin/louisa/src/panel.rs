use log::{debug, info, trace, warn};
use tokio::sync::mpsc::UnboundedReceiver;
use transport::{Liveness, Topic};

use crate::capability::{Scheduler, Transport};
use crate::command::Emitter;
use crate::config::Config;
use crate::connectivity::{self, ConnectivityStatus, Network};
use crate::event::Event;
use crate::presenter::{Presenter, Snapshot};
use crate::session::{Session, SessionManager, SessionState};
use crate::storage::{Applied, Storage};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
    Stopped,
}

/// Owns every piece of mutable state: the session, the device store and the
/// inputs of the connectivity status. [`Panel::handle`] is the only
/// transition function.
pub struct Panel<T, S> {
    transport: T,
    scheduler: S,
    session: SessionManager,
    storage: Storage,
    emitter: Emitter,
    network: Network,
    liveness: Option<Liveness>,
    status: ConnectivityStatus,
}

impl<T: Transport, S: Scheduler> Panel<T, S> {
    pub fn new(config: &Config, session: Session, transport: T, scheduler: S) -> Panel<T, S> {
        let token = session.token().to_string();
        let storage = Storage::new(token.clone(), &config.devices);

        let mut subscriptions: Vec<String> =
            storage.channels().map(|topic| topic.to_string()).collect();
        subscriptions.push(Topic::online(token.clone()).to_string());

        let session = SessionManager::new(
            session,
            subscriptions,
            config.qos,
            config.reconnect_timeout,
        );

        let network = Network::default();
        let status = connectivity::status(network, session.state(), None);

        Panel {
            transport,
            scheduler,
            session,
            storage,
            emitter: Emitter::new(token, config.qos, config.retained),
            network,
            liveness: None,
            status,
        }
    }

    pub fn handle(&mut self, event: Event) -> Outcome {
        trace!("handling {:?}", event);

        let changed = match event {
            Event::Connect => self.session.connect(&self.transport),
            Event::Retry { generation } => self.session.retry(generation, &self.transport),
            Event::ConnectSucceeded { attempt } => self.session.connected(attempt, &self.transport),
            Event::ConnectFailed { attempt, reason } => {
                self.session
                    .connect_failed(attempt, &reason, &self.scheduler)
            }
            Event::ConnectionLost { code, reason } => {
                let lost = self.session.connection_lost(code, &reason, &self.scheduler);
                if lost {
                    // re-learned from the retained message after resubscribing
                    self.liveness = None;
                }
                lost
            }
            Event::Message { topic, payload } => {
                debug!("got message on {topic}: {}", String::from_utf8_lossy(&payload));

                match self.storage.apply_inbound_message(&topic, &payload) {
                    Applied::Liveness(liveness) => {
                        let changed = self.liveness != Some(liveness);
                        self.liveness = Some(liveness);
                        changed
                    }
                    Applied::Updated(_) => true,
                    Applied::Unchanged(_) | Applied::Discarded(_) | Applied::Ignored => false,
                }
            }
            Event::Network(network) => {
                let changed = self.network != network;
                if changed {
                    info!("network is {:?}", network);
                }
                self.network = network;
                changed
            }
            Event::Toggle { device, state } => {
                info!("wants to toggle {device} {state}");

                if let Err(rejection) = self.emitter.submit(
                    self.network,
                    &self.storage,
                    &device,
                    state,
                    &self.transport,
                ) {
                    warn!("toggle of {device} dropped: {rejection}");
                }

                false
            }
            Event::Shutdown => {
                self.session.shutdown(&self.transport);
                self.recompute();
                return Outcome::Stopped;
            }
        };

        if self.recompute() || changed {
            Outcome::Changed
        } else {
            Outcome::Unchanged
        }
    }

    pub fn status(&self) -> ConnectivityStatus {
        self.status
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            controls: self.status.controls(),
            session: self.session.state(),
            devices: self.storage.devices().to_vec(),
        }
    }

    fn recompute(&mut self) -> bool {
        let status = connectivity::status(self.network, self.session.state(), self.liveness);

        if status == self.status {
            return false;
        }

        info!("status {:?} -> {:?}", self.status, status);
        self.status = status;

        true
    }
}

/// Single consumer of the event queue. Returns once a [`Event::Shutdown`]
/// was handled or every sender is gone.
pub async fn run<T, S, P>(
    mut panel: Panel<T, S>,
    mut events: UnboundedReceiver<Event>,
    presenter: &mut P,
) where
    T: Transport,
    S: Scheduler,
    P: Presenter,
{
    presenter.render(&panel.snapshot());

    while let Some(event) = events.recv().await {
        match panel.handle(event) {
            Outcome::Changed => presenter.render(&panel.snapshot()),
            Outcome::Unchanged => (),
            Outcome::Stopped => {
                presenter.render(&panel.snapshot());
                return;
            }
        }
    }

    info!("event queue closed");
}
