mod account;
mod posting;

pub use account::*;
pub use posting::*;

use serde::{Deserialize, Serialize};

/// Generic acknowledgement body returned by write endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
