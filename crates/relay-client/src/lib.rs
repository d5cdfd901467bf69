//! Client side of the relay: forwards a call to the bot API and unwraps the
//! response envelope into whatever shape the caller asks for.

mod error;
mod relay;

pub use error::Error;
pub use relay::RelayClient;

pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";
