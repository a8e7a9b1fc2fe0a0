use futures_util::stream::{Stream, StreamExt};
use log::{debug, error, info};
use paho_mqtt as mqtt;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task;
use transport::QoS;

use crate::capability::Transport;
use crate::command::Command;
use crate::config::BrokerConfig;
use crate::event::Event;
use crate::session::Session;
use crate::Result;

/// Reported when the client stream signals a dropped connection. paho does
/// not say why, so any non-clean code will do.
const CONNECTION_LOST: i32 = -1;

/// paho backed [`Transport`]. Every call spawns its request on the current
/// runtime and reports back through `events`.
pub struct MqttTransport {
    client: mqtt::AsyncClient,
    options: mqtt::ConnectOptions,
    events: UnboundedSender<Event>,
}

impl MqttTransport {
    pub fn new(
        config: &BrokerConfig,
        session: &Session,
        events: UnboundedSender<Event>,
    ) -> Result<MqttTransport> {
        let create_opts = mqtt::CreateOptionsBuilder::new_v3()
            .server_uri(config.server_uri())
            .client_id(session.client_id())
            .finalize();

        let mut client = mqtt::AsyncClient::new(create_opts)?;
        let stream = client.get_stream(None);
        task::spawn(pump(stream, events.clone()));

        Ok(MqttTransport {
            client,
            options: connect_options(config),
            events,
        })
    }
}

fn connect_options(config: &BrokerConfig) -> mqtt::ConnectOptions {
    let mut builder = mqtt::ConnectOptionsBuilder::new_v3();
    builder
        .keep_alive_interval(config.keep_alive)
        .clean_session(config.clean_session);

    if config.use_ssl {
        builder.ssl_options(mqtt::SslOptions::new());
    }

    if let Some(credentials) = &config.credentials {
        builder
            .user_name(credentials.user.as_str())
            .password(credentials.password.as_str());
    }

    builder.finalize()
}

async fn pump<S>(mut stream: S, events: UnboundedSender<Event>)
where
    S: Stream<Item = Option<mqtt::Message>> + Unpin,
{
    while let Some(msg_opt) = stream.next().await {
        let event = match msg_opt {
            Some(msg) => Event::Message {
                topic: msg.topic().to_string(),
                payload: msg.payload().to_vec(),
            },
            None => Event::ConnectionLost {
                code: CONNECTION_LOST,
                reason: "connection lost".to_string(),
            },
        };

        if events.send(event).is_err() {
            debug!("event queue closed, stopping mqtt stream");
            return;
        }
    }
}

impl Transport for MqttTransport {
    fn connect(&self, attempt: u64) {
        let token = self.client.connect(self.options.clone());
        let events = self.events.clone();

        task::spawn(async move {
            let event = match token.await {
                Ok(_) => Event::ConnectSucceeded { attempt },
                Err(err) => Event::ConnectFailed {
                    attempt,
                    reason: err.to_string(),
                },
            };

            // nobody listens once the panel has stopped
            let _ = events.send(event);
        });
    }

    fn subscribe(&self, topics: &[String], qos: QoS) {
        let qos = vec![i32::from(qos); topics.len()];
        let token = self.client.subscribe_many(topics, &qos);

        task::spawn(async move {
            if let Err(err) = token.await {
                error!("Error subscribing: {}", err);
            }
        });
    }

    fn publish(&self, command: &Command) {
        let message = mqtt::MessageBuilder::new()
            .topic(command.topic.to_string())
            .payload(command.state.payload())
            .qos(i32::from(command.qos))
            .retained(command.retain)
            .finalize();

        let token = self.client.publish(message);

        task::spawn(async move {
            if let Err(err) = token.await {
                error!("Error publishing: {}", err);
            }
        });
    }

    fn disconnect(&self) {
        let token = self.client.disconnect(None);

        task::spawn(async move {
            match token.await {
                Ok(_) => info!("mqtt disconnected"),
                Err(err) => error!("Error disconnecting: {}", err),
            }
        });
    }
}
