mod connection;
mod kind;
mod state;

pub use connection::{Transport, TransportConnector};
pub use kind::TransportKind;
pub use state::TransportState;
