//! The `(short_address, instance_number) -> instance_type` map the codec
//! consults to resolve an otherwise-ambiguous instance-addressed event frame
//! (IEC 62386-103 §9.3: the addressing scheme alone does not always say
//! which instance type produced a report).

use std::collections::HashMap;

use crate::codec::InstanceTypeMap;
use crate::sequences::discovery::DiscoveredInstance;

/// Built by running [`crate::sequences::discovery::InstanceDiscovery`]
/// against every short address, then feeding the results here.
#[derive(Debug, Default, Clone)]
pub struct InstanceMap {
    types: HashMap<(u8, u8), u8>,
}

impl InstanceMap {
    pub fn new() -> Self {
        InstanceMap::default()
    }

    pub fn record(&mut self, short_address: u8, instance: u8, instance_type: u8) {
        self.types.insert((short_address, instance), instance_type);
    }

    pub fn record_discovered(&mut self, short_address: u8, found: &[DiscoveredInstance]) {
        for instance in found {
            self.record(short_address, instance.number, instance.instance_type);
        }
    }

    pub fn forget(&mut self, short_address: u8) {
        self.types.retain(|&(addr, _), _| addr != short_address);
    }
}

impl InstanceTypeMap for InstanceMap {
    fn instance_type(&self, short_address: u8, instance: u8) -> Option<u8> {
        self.types.get(&(short_address, instance)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_looks_up_discovered_instances() {
        let mut map = InstanceMap::new();
        map.record_discovered(3, &[DiscoveredInstance { number: 0, instance_type: 1 }]);
        assert_eq!(map.instance_type(3, 0), Some(1));
        assert_eq!(map.instance_type(3, 1), None);
    }

    #[test]
    fn forget_clears_one_address() {
        let mut map = InstanceMap::new();
        map.record(3, 0, 1);
        map.record(4, 0, 2);
        map.forget(3);
        assert_eq!(map.instance_type(3, 0), None);
        assert_eq!(map.instance_type(4, 0), Some(2));
    }
}
