use std::time::Duration;

use log::{error, info, trace};
use transport::QoS;

use crate::capability::{Scheduler, Transport};
use crate::event::Event;

/// Disconnect code of a requested, clean disconnect. Any other code is a loss
/// and is followed by a reconnect.
pub const CLEAN_DISCONNECT: i32 = 0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Clone, Debug)]
pub struct Session {
    token: String,
    client_id: String,
    state: SessionState,
}

impl Session {
    /// The random suffix keeps several panels of the same token from kicking
    /// each other off the broker.
    pub fn new(token: String) -> Session {
        let suffix: u16 = rand::random_range(10..10000);
        let client_id = format!("{token}/webuser_{suffix}");

        Session::with_client_id(token, client_id)
    }

    pub fn with_client_id(token: String, client_id: String) -> Session {
        Session {
            token,
            client_id,
            state: SessionState::Disconnected,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}

/// Drives a [`Session`] through its states. `attempt` numbers handshakes and
/// `generation` numbers scheduled retries, so late results and timers from
/// superseded ones are dropped.
pub struct SessionManager {
    session: Session,
    subscriptions: Vec<String>,
    qos: QoS,
    backoff: Duration,
    attempt: u64,
    generation: u64,
}

impl SessionManager {
    pub fn new(
        session: Session,
        subscriptions: Vec<String>,
        qos: QoS,
        backoff: Duration,
    ) -> SessionManager {
        SessionManager {
            session,
            subscriptions,
            qos,
            backoff,
            attempt: 0,
            generation: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn subscriptions(&self) -> &[String] {
        &self.subscriptions
    }

    /// No-op unless disconnected.
    pub fn connect(&mut self, transport: &impl Transport) -> bool {
        if self.session.state != SessionState::Disconnected {
            trace!("connect ignored while {:?}", self.session.state);
            return false;
        }

        self.attempt += 1;
        self.session.state = SessionState::Connecting;

        info!(
            "connecting as {} (attempt {})",
            self.session.client_id, self.attempt
        );
        transport.connect(self.attempt);

        true
    }

    pub fn retry(&mut self, generation: u64, transport: &impl Transport) -> bool {
        if generation != self.generation {
            trace!("stale retry {generation}, current is {}", self.generation);
            return false;
        }

        self.connect(transport)
    }

    pub fn connected(&mut self, attempt: u64, transport: &impl Transport) -> bool {
        if !self.is_pending(attempt) {
            trace!("stale handshake success of attempt {attempt}");
            return false;
        }

        self.session.state = SessionState::Connected;
        info!("connected mqtt");

        transport.subscribe(&self.subscriptions, self.qos);
        info!("Subscribed to topics: {:?}", self.subscriptions);

        true
    }

    pub fn connect_failed(
        &mut self,
        attempt: u64,
        reason: &str,
        scheduler: &impl Scheduler,
    ) -> bool {
        if !self.is_pending(attempt) {
            trace!("stale handshake failure of attempt {attempt}: {reason}");
            return false;
        }

        error!("Failed to connect: {reason}");
        self.session.state = SessionState::Disconnected;
        self.schedule_retry(scheduler);

        true
    }

    pub fn connection_lost(
        &mut self,
        code: i32,
        reason: &str,
        scheduler: &impl Scheduler,
    ) -> bool {
        if self.session.state != SessionState::Connected {
            trace!("loss ({code}) ignored while {:?}", self.session.state);
            return false;
        }

        self.session.state = SessionState::Disconnected;

        if code == CLEAN_DISCONNECT {
            info!("disconnected");
        } else {
            error!("Lost MQTT connection ({code}): {reason}. Attempting reconnect.");
            self.schedule_retry(scheduler);
        }

        true
    }

    /// Requested disconnect. Pending retries are invalidated.
    pub fn shutdown(&mut self, transport: &impl Transport) -> bool {
        self.generation += 1;

        if self.session.state == SessionState::Disconnected {
            return false;
        }

        transport.disconnect();
        self.session.state = SessionState::Disconnected;
        info!("disconnected");

        true
    }

    fn is_pending(&self, attempt: u64) -> bool {
        self.session.state == SessionState::Connecting && attempt == self.attempt
    }

    fn schedule_retry(&mut self, scheduler: &impl Scheduler) {
        self.generation += 1;

        info!("reconnecting in {:?}", self.backoff);
        scheduler.schedule(
            self.backoff,
            Event::Retry {
                generation: self.generation,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeScheduler, FakeTransport};

    const BACKOFF: Duration = Duration::from_secs(5);

    fn manager() -> SessionManager {
        SessionManager::new(
            Session::with_client_id("t0k3n".into(), "t0k3n/webuser_42".into()),
            vec!["t0k3n/D1".into(), "t0k3n/online".into()],
            QoS::AtLeastOnce,
            BACKOFF,
        )
    }

    #[test]
    fn test_client_id() {
        let session = Session::new("t0k3n".into());
        let suffix: u16 = session
            .client_id()
            .strip_prefix("t0k3n/webuser_")
            .unwrap()
            .parse()
            .unwrap();

        assert!((10..10000).contains(&suffix));
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn test_connect_is_idempotent() {
        let transport = FakeTransport::default();
        let mut manager = manager();

        assert!(manager.connect(&transport));
        assert!(!manager.connect(&transport));
        assert_eq!(manager.state(), SessionState::Connecting);

        assert!(manager.connected(1, &transport));
        assert!(!manager.connect(&transport));

        assert_eq!(transport.connects(), vec![1]);
    }

    #[test]
    fn test_connected_subscribes() {
        let transport = FakeTransport::default();
        let mut manager = manager();

        manager.connect(&transport);
        manager.connected(1, &transport);

        assert_eq!(manager.state(), SessionState::Connected);
        assert_eq!(
            transport.calls(),
            vec![
                Call::Connect(1),
                Call::Subscribe(
                    vec!["t0k3n/D1".into(), "t0k3n/online".into()],
                    QoS::AtLeastOnce
                ),
            ]
        );
    }

    #[test]
    fn test_failure_schedules_retry() {
        let transport = FakeTransport::default();
        let scheduler = FakeScheduler::default();
        let mut manager = manager();

        manager.connect(&transport);
        assert!(manager.connect_failed(1, "refused", &scheduler));
        assert_eq!(manager.state(), SessionState::Disconnected);
        assert_eq!(
            scheduler.scheduled(),
            vec![(BACKOFF, Event::Retry { generation: 1 })]
        );

        assert!(manager.retry(1, &transport));
        assert_eq!(manager.state(), SessionState::Connecting);
        assert_eq!(transport.connects(), vec![1, 2]);
    }

    #[test]
    fn test_stale_retry_is_ignored() {
        let transport = FakeTransport::default();
        let scheduler = FakeScheduler::default();
        let mut manager = manager();

        manager.connect(&transport);
        manager.connect_failed(1, "refused", &scheduler);

        // someone connected before the timer fired
        manager.connect(&transport);
        manager.connected(2, &transport);

        assert!(!manager.retry(1, &transport));
        assert_eq!(manager.state(), SessionState::Connected);
        assert_eq!(transport.connects(), vec![1, 2]);

        // an older generation never fires once a newer one is scheduled
        manager.connection_lost(-1, "timeout", &scheduler);
        assert!(!manager.retry(1, &transport));
        assert!(manager.retry(2, &transport));
    }

    #[test]
    fn test_stale_handshake_results_are_ignored() {
        let transport = FakeTransport::default();
        let scheduler = FakeScheduler::default();
        let mut manager = manager();

        assert!(!manager.connected(1, &transport));
        assert!(!manager.connect_failed(1, "refused", &scheduler));

        manager.connect(&transport);
        assert!(!manager.connected(7, &transport));
        assert!(!manager.connect_failed(7, "refused", &scheduler));
        assert_eq!(manager.state(), SessionState::Connecting);
        assert!(scheduler.scheduled().is_empty());
    }

    #[test]
    fn test_unexpected_loss_retries() {
        let transport = FakeTransport::default();
        let scheduler = FakeScheduler::default();
        let mut manager = manager();

        manager.connect(&transport);
        manager.connected(1, &transport);

        assert!(manager.connection_lost(-1, "keep alive timeout", &scheduler));
        assert_eq!(manager.state(), SessionState::Disconnected);
        assert_eq!(
            scheduler.scheduled(),
            vec![(BACKOFF, Event::Retry { generation: 1 })]
        );
    }

    #[test]
    fn test_clean_loss_does_not_retry() {
        let transport = FakeTransport::default();
        let scheduler = FakeScheduler::default();
        let mut manager = manager();

        manager.connect(&transport);
        manager.connected(1, &transport);

        assert!(manager.connection_lost(CLEAN_DISCONNECT, "bye", &scheduler));
        assert_eq!(manager.state(), SessionState::Disconnected);
        assert!(scheduler.scheduled().is_empty());
    }

    #[test]
    fn test_loss_while_not_connected_is_ignored() {
        let transport = FakeTransport::default();
        let scheduler = FakeScheduler::default();
        let mut manager = manager();

        assert!(!manager.connection_lost(-1, "lost", &scheduler));

        manager.connect(&transport);
        assert!(!manager.connection_lost(-1, "lost", &scheduler));
        assert_eq!(manager.state(), SessionState::Connecting);
        assert!(scheduler.scheduled().is_empty());
    }

    #[test]
    fn test_shutdown_invalidates_retries() {
        let transport = FakeTransport::default();
        let scheduler = FakeScheduler::default();
        let mut manager = manager();

        manager.connect(&transport);
        manager.connected(1, &transport);
        manager.connection_lost(-1, "lost", &scheduler);

        assert!(!manager.shutdown(&transport));
        assert!(!manager.retry(1, &transport));
        assert_eq!(manager.state(), SessionState::Disconnected);
    }

    #[test]
    fn test_shutdown_disconnects() {
        let transport = FakeTransport::default();
        let mut manager = manager();

        manager.connect(&transport);
        manager.connected(1, &transport);

        assert!(manager.shutdown(&transport));
        assert_eq!(manager.state(), SessionState::Disconnected);
        assert_eq!(transport.calls().last(), Some(&Call::Disconnect));
    }
}
