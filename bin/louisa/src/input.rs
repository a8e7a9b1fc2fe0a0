use std::fmt;
use std::str::FromStr;

use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;
use transport::{DeviceId, SwitchState};

use crate::event::Event;
use crate::Result;

/// One line typed into the terminal.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Toggle { device: DeviceId, state: SwitchState },
    Quit,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputError {
    UnknownCommand(String),
    InvalidDevice(String),
    InvalidState(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(line) => {
                write!(f, "unknown command {line:?}, expected `<pin> on|off` or `quit`")
            }
            Self::InvalidDevice(device) => write!(f, "invalid device {device:?}"),
            Self::InvalidState(state) => write!(f, "invalid state {state:?}"),
        }
    }
}

impl std::error::Error for InputError {}

/// Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> std::result::Result<Option<Input>, InputError> {
    let words: Vec<&str> = line.split_whitespace().collect();

    match words.as_slice() {
        [] => Ok(None),
        [command] if matches!(command.to_ascii_lowercase().as_str(), "quit" | "exit") => {
            Ok(Some(Input::Quit))
        }
        [device, state] => {
            let device = DeviceId::from_str(device)
                .map_err(|_| InputError::InvalidDevice(device.to_string()))?;
            let state = parse_state(state)?;

            Ok(Some(Input::Toggle { device, state }))
        }
        _ => Err(InputError::UnknownCommand(line.trim().to_string())),
    }
}

fn parse_state(state: &str) -> std::result::Result<SwitchState, InputError> {
    match state {
        "1" => Ok(SwitchState::On),
        "0" => Ok(SwitchState::Off),
        other => SwitchState::from_str(other)
            .map_err(|_| InputError::InvalidState(other.to_string())),
    }
}

/// Feeds commands from `reader` into the queue until it ends or `quit` is
/// read. A closed reader leaves the panel running.
pub async fn read_commands<R>(reader: R, events: UnboundedSender<Event>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let event = match parse_line(&line) {
            Ok(Some(Input::Toggle { device, state })) => Event::Toggle { device, state },
            Ok(Some(Input::Quit)) => {
                info!("quit requested");
                let _ = events.send(Event::Shutdown);
                return Ok(());
            }
            Ok(None) => continue,
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };

        if events.send(event).is_err() {
            debug!("event queue closed, stopping input");
            return Ok(());
        }
    }

    debug!("input closed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    fn pin(name: &str) -> DeviceId {
        DeviceId::from_str(name).unwrap()
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("D1 on"),
            Ok(Some(Input::Toggle {
                device: pin("D1"),
                state: SwitchState::On
            }))
        );
        assert_eq!(
            parse_line("  D2   OFF "),
            Ok(Some(Input::Toggle {
                device: pin("D2"),
                state: SwitchState::Off
            }))
        );
        assert_eq!(
            parse_line("D3 1"),
            Ok(Some(Input::Toggle {
                device: pin("D3"),
                state: SwitchState::On
            }))
        );
        assert_eq!(parse_line("quit"), Ok(Some(Input::Quit)));
        assert_eq!(parse_line("EXIT"), Ok(Some(Input::Quit)));
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn test_parse_line_errors() {
        assert_eq!(
            parse_line("D1 maybe"),
            Err(InputError::InvalidState("maybe".to_string()))
        );
        assert_eq!(
            parse_line("D1/x on"),
            Err(InputError::InvalidDevice("D1/x".to_string()))
        );
        assert_eq!(
            parse_line("toggle D1 on"),
            Err(InputError::UnknownCommand("toggle D1 on".to_string()))
        );
        assert_eq!(
            parse_line("hello"),
            Err(InputError::UnknownCommand("hello".to_string()))
        );
    }

    #[tokio::test]
    async fn test_read_commands() {
        let (events, mut receiver) = unbounded_channel();
        let input: &[u8] = b"D1 on\nnonsense\n\nD2 off\nquit\nD3 on\n";

        read_commands(input, events).await.unwrap();

        assert_eq!(
            receiver.recv().await,
            Some(Event::Toggle {
                device: pin("D1"),
                state: SwitchState::On
            })
        );
        assert_eq!(
            receiver.recv().await,
            Some(Event::Toggle {
                device: pin("D2"),
                state: SwitchState::Off
            })
        );
        assert_eq!(receiver.recv().await, Some(Event::Shutdown));
        assert_eq!(receiver.recv().await, None);
    }
}
