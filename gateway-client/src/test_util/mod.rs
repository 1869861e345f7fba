//! Test support: a scripted gateway honoring the wire surface the client
//! verifies.

mod mock_gateway;

pub use mock_gateway::{MockGateway, MockGatewayOptions};
