use std::collections::HashMap;

use log::debug;

/// Last published payload per topic.
#[derive(Default)]
pub struct Storage {
    payloads: HashMap<String, Vec<u8>>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_state(&mut self, topic: &str, payload: &[u8]) -> bool {
        if self.payloads.get(topic).map(Vec::as_slice) != Some(payload) {
            debug!(
                "state changed {}: {}",
                topic,
                String::from_utf8_lossy(payload)
            );

            self.payloads.insert(topic.to_string(), payload.to_vec());
            true
        } else {
            false
        }
    }
}
