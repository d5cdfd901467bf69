use bot_relay_client::RelayClient;

pub struct AppState {
    pub relay: RelayClient,
}

impl AppState {
    pub fn new(relay: RelayClient) -> Self {
        Self { relay }
    }
}
