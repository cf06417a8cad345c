//! Domain entities - core business objects

mod connection;
mod event;
mod member;
mod registration;

pub use connection::{generate_connection_token, Connection, ConnectionStatus, PairStatus};
pub use event::Event;
pub use member::MemberProfile;
pub use registration::{CheckIn, Registration, RegistrationStatus};
