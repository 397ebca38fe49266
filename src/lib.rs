//! Two-player naval combat over a half-duplex serial line.
//!
//! The protocol core (boards, targeting, codec and the session state
//! machine) is `no_std` + `alloc`. The `std` feature adds transports, the
//! polling node, logging setup and the host simulator's tournament runner.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod board;
mod common;
mod config;
pub mod host;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
mod node;
pub mod protocol;
mod session;
mod ship;
pub mod targeting;
#[cfg(feature = "std")]
mod tournament;
#[cfg(feature = "std")]
pub mod transport;

pub use board::*;
pub use common::*;
pub use config::*;
pub use host::{HostPeer, HostStats};
#[cfg(feature = "std")]
pub use logging::{init_logging, LOG_ENV};
#[cfg(feature = "std")]
pub use node::SessionNode;
pub use protocol::{
    format_shot, parse_boom, DeviceMessage, EncodeError, FieldRow, HostMessage, ParseError,
};
pub use session::*;
pub use ship::*;
pub use targeting::{Checkerboard, PerimeterFirst, RandomTargeting, StrategyKind, Targeting};
#[cfg(feature = "std")]
pub use tournament::{run_tournament, TournamentReport};
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryLink, tcp::TcpLink, LineFramer, LineTransport};
