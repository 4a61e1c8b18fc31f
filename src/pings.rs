//! Custom pings submitted by burnham

use std::sync::LazyLock;

use glean::private::PingType;

/// Sent once the spacecraft is assembled, before any mission
pub static SPACE_SHIP_READY: LazyLock<PingType> =
    LazyLock::new(|| custom_ping(Ping::SpaceShipReady));

/// Sent at the end of each travel mission
pub static DISCOVERY: LazyLock<PingType> =
    LazyLock::new(|| custom_ping(Ping::Discovery));

/// Sent when docking at Starbase 46, even without data
pub static STARBASE46: LazyLock<PingType> =
    LazyLock::new(|| custom_ping(Ping::Starbase46));

fn custom_ping(ping: Ping) -> PingType {
    PingType::new(
        ping.name(),
        true,
        ping.send_if_empty(),
        true,
        true,
        true,
        vec![],
        vec![],
        true,
        vec![],
    )
}

/// The custom pings missions can submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ping {
    SpaceShipReady,
    Discovery,
    Starbase46,
}

impl Ping {
    pub const ALL: [Ping; 3] = [Ping::SpaceShipReady, Ping::Discovery, Ping::Starbase46];

    /// Name used in submission paths and `send_in_pings`
    pub fn name(self) -> &'static str {
        match self {
            Ping::SpaceShipReady => "space-ship-ready",
            Ping::Discovery => "discovery",
            Ping::Starbase46 => "starbase46",
        }
    }

    pub fn ping_type(self) -> &'static PingType {
        match self {
            Ping::SpaceShipReady => &SPACE_SHIP_READY,
            Ping::Discovery => &DISCOVERY,
            Ping::Starbase46 => &STARBASE46,
        }
    }

    /// Whether the ping is submitted when no metric was recorded for it
    pub fn send_if_empty(self) -> bool {
        matches!(self, Ping::Starbase46)
    }
}

/// Register all custom pings with Glean
///
/// Must run before `glean::initialize`, so their stored data is collected.
pub fn register_pings() {
    for ping in Ping::ALL {
        tracing::trace!(ping = ping.name(), "Registering ping");
        // Constructing the ping type registers it
        ping.ping_type();
    }
}
