use std::collections::HashMap;
use std::net::Ipv4Addr;

use log::warn;

/// Adapters of one platform keyed by device host.
pub struct Registry<A> {
    devices: HashMap<Ipv4Addr, A>,
}

impl<A> Default for Registry<A> {
    fn default() -> Self {
        Self {
            devices: HashMap::new(),
        }
    }
}

impl<A> Registry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, host: Ipv4Addr, adapter: A) -> Option<A> {
        let previous = self.devices.insert(host, adapter);

        if previous.is_some() {
            warn!("replacing adapter registered for {}", host);
        }

        previous
    }

    pub fn get(&self, host: &Ipv4Addr) -> Option<&A> {
        self.devices.get(host)
    }

    pub fn hosts(&self) -> impl Iterator<Item = &Ipv4Addr> {
        self.devices.keys()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: Ipv4Addr = Ipv4Addr::new(10, 0, 1, 42);

    #[test]
    fn test_insert_and_get() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        assert_eq!(registry.insert(HOST, "climate"), None);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&HOST), Some(&"climate"));
        assert_eq!(registry.get(&Ipv4Addr::new(10, 0, 1, 43)), None);
        assert_eq!(registry.hosts().collect::<Vec<_>>(), vec![&HOST]);
    }

    #[test]
    fn test_insert_replaces() {
        let mut registry = Registry::new();

        registry.insert(HOST, 1);
        assert_eq!(registry.insert(HOST, 2), Some(1));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&HOST), Some(&2));
    }
}
