use std::time::Duration;

use log::{debug, info};
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{self, interval, MissedTickBehavior};

use crate::config::ProbeConfig;
use crate::connectivity::Network;
use crate::event::Event;
use crate::Result;

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Reports `Event::Network` for the first probe and then whenever
/// reachability of the probe address changes.
pub async fn watch_network(config: ProbeConfig, events: UnboundedSender<Event>) -> Result<()> {
    let mut timer = interval(config.interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let timeout = PROBE_TIMEOUT.min(config.interval);
    let mut last = None;

    loop {
        timer.tick().await;

        if events.is_closed() {
            debug!("event queue closed, stopping network probe");
            return Ok(());
        }

        let current = probe(&config.address, timeout).await;
        let Some(network) = transition(last, current) else {
            continue;
        };

        info!("network changed to {:?}", network);
        last = Some(network);

        if events.send(Event::Network(network)).is_err() {
            debug!("event queue closed, stopping network probe");
            return Ok(());
        }
    }
}

pub async fn probe(address: &str, timeout: Duration) -> Network {
    match time::timeout(timeout, TcpStream::connect(address)).await {
        Ok(Ok(_)) => Network::Available,
        Ok(Err(err)) => {
            debug!("probe of {address} failed: {err}");
            Network::Unavailable
        }
        Err(_) => {
            debug!("probe of {address} timed out");
            Network::Unavailable
        }
    }
}

fn transition(last: Option<Network>, current: Network) -> Option<Network> {
    if last == Some(current) {
        None
    } else {
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_transition() {
        assert_eq!(
            transition(None, Network::Available),
            Some(Network::Available)
        );
        assert_eq!(transition(Some(Network::Available), Network::Available), None);
        assert_eq!(
            transition(Some(Network::Available), Network::Unavailable),
            Some(Network::Unavailable)
        );
        assert_eq!(
            transition(Some(Network::Unavailable), Network::Unavailable),
            None
        );
        assert_eq!(
            transition(Some(Network::Unavailable), Network::Available),
            Some(Network::Available)
        );
    }

    #[tokio::test]
    async fn test_probe() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        assert_eq!(
            probe(&address, Duration::from_secs(1)).await,
            Network::Available
        );

        drop(listener);

        assert_eq!(
            probe(&address, Duration::from_secs(1)).await,
            Network::Unavailable
        );
    }

    #[tokio::test]
    async fn test_watch_reports_changes_only() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let (events, mut receiver) = tokio::sync::mpsc::unbounded_channel();
        let config = ProbeConfig {
            address,
            interval: Duration::from_millis(20),
        };
        let watcher = tokio::spawn(watch_network(config, events));

        assert_eq!(
            receiver.recv().await,
            Some(Event::Network(Network::Unavailable))
        );

        time::sleep(Duration::from_millis(100)).await;
        assert!(receiver.try_recv().is_err());

        drop(receiver);
        watcher.await.unwrap().unwrap();
    }
}
