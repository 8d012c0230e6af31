use std::sync::Arc;

use agent_gateway::Agent;
use agent_store::{ConversationService, MessageService, Store};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub conversations: ConversationService,
    pub messages: MessageService,
    pub agent: Arc<dyn Agent>,
}

impl AppState {
    pub fn new(store: Arc<Store>, agent: Arc<dyn Agent>) -> Self {
        Self {
            conversations: ConversationService::new(store.clone()),
            messages: MessageService::new(store),
            agent,
        }
    }
}
