use std::time::Duration;

use louisa::{
    read_commands, run, watch_network, watch_weather, Config, Error, Event, LogPresenter,
    MqttTransport, Panel, Result, Session, TimerScheduler,
};

use log::{error, info};
use tokio::io::{stdin, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc::unbounded_channel;
use tokio::{task, time};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Time for the requested disconnect to reach the broker before exiting.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init_timed();

    info!("louisa version {VERSION}");

    let config = Config::from_env()?;
    let (events, receiver) = unbounded_channel();

    let session = Session::new(config.token.clone());
    let transport = MqttTransport::new(&config.broker, &session, events.clone())?;
    let scheduler = TimerScheduler::new(events.clone());
    let panel = Panel::new(&config, session, transport, scheduler);

    let probe = config.probe.clone();
    let network_events = events.clone();
    task::spawn(async move {
        if let Err(err) = watch_network(probe, network_events).await {
            error!("network probe stopped: {err}");
        }
    });

    if let Some(weather) = config.weather.clone() {
        task::spawn(async move {
            if let Err(err) = watch_weather(weather).await {
                error!("weather lookup stopped: {err}");
            }
        });
    }

    let input_events = events.clone();
    task::spawn(async move {
        if let Err(err) = read_commands(BufReader::new(stdin()), input_events).await {
            error!("input stopped: {err}");
        }
    });

    let mut sigterm = signal(SignalKind::terminate())?;
    let shutdown = events.clone();
    task::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("got SIGTERM, exiting..."),
            _ = tokio::signal::ctrl_c() => info!("got SIGINT, exiting..."),
        };

        let _ = shutdown.send(Event::Shutdown);
    });

    events.send(Event::Connect).map_err(|_| Error::QueueClosed)?;
    drop(events);

    let mut presenter = LogPresenter::new(config.user_name.clone());
    run(panel, receiver, &mut presenter).await;

    time::sleep(SHUTDOWN_GRACE).await;

    Ok(())
}
