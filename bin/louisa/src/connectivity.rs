use transport::Liveness;

use crate::session::SessionState;

/// Local network availability, the native counterpart of a browser's
/// online/offline events.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Network {
    #[default]
    Available,
    Unavailable,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConnectivityStatus {
    Connected,
    BoardOffline,
    NoNetwork,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Controls {
    Enabled,
    Disabled,
}

/// A session that is down is reported the same way as a board that is down:
/// there is nothing the user can do differently about either.
pub fn status(
    network: Network,
    session: SessionState,
    liveness: Option<Liveness>,
) -> ConnectivityStatus {
    match (network, session, liveness) {
        (Network::Unavailable, _, _) => ConnectivityStatus::NoNetwork,
        (Network::Available, SessionState::Connected, Some(Liveness::Live)) => {
            ConnectivityStatus::Connected
        }
        (Network::Available, _, _) => ConnectivityStatus::BoardOffline,
    }
}

impl ConnectivityStatus {
    /// Only a missing local network blocks toggling. An offline board still
    /// accepts commands, they reach it through retained messages.
    pub fn controls(self) -> Controls {
        match self {
            ConnectivityStatus::NoNetwork => Controls::Disabled,
            ConnectivityStatus::Connected | ConnectivityStatus::BoardOffline => Controls::Enabled,
        }
    }

    pub fn describe(self, user_name: &str) -> String {
        match self {
            ConnectivityStatus::Connected => format!("Connected ({user_name})"),
            ConnectivityStatus::BoardOffline => format!("Board OFFLINE ({user_name})"),
            ConnectivityStatus::NoNetwork => "No Internet".to_string(),
        }
    }
}
