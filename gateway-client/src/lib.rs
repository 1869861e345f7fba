//! MeshLink gateway client.
//!
//! Three independent components for verifying a mesh gateway: [`Registrar`]
//! registers an agent and obtains a credential, [`CompletionClient`] runs one
//! authenticated chat exchange, and [`EventListener`] watches the gateway's
//! event stream until a `mesh_status` event arrives.
//!
//! Each component takes an explicit [`GatewayConfig`]; there is no shared
//! process-wide state.

pub mod completion;
pub mod config;
pub mod error;
pub mod events;
pub mod registrar;
pub mod test_util;

pub use completion::{ChatReply, CompletionClient};
pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use events::{EventListener, ListenerState};
pub use registrar::{Registrar, Registration};
