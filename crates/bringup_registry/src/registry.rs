//! Registry construction and frozen lookup.

use crate::connector::Connector;
use crate::error::RegistryError;
use crate::resource::{IoResource, ResolvedResource, ResourceKey};
use serde::Serialize;
use std::collections::BTreeMap;

/// Collects resource and connector definitions before validation.
///
/// A failed [`define`](Self::define) leaves the builder unchanged.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    resources: BTreeMap<ResourceKey, IoResource>,
    connectors: BTreeMap<String, Connector>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an I/O resource.
    ///
    /// Fails with [`RegistryError::DuplicateResource`] if `(name, index)` is
    /// already defined, or [`RegistryError::EmptyPinList`] if it has no pins.
    pub fn define(&mut self, resource: IoResource) -> Result<(), RegistryError> {
        if self.resources.contains_key(&resource.key) {
            return Err(RegistryError::DuplicateResource(resource.key));
        }
        resource.check_non_empty()?;
        self.resources.insert(resource.key.clone(), resource);
        Ok(())
    }

    /// Registers a header connector.
    pub fn add_connector(&mut self, connector: Connector) -> Result<(), RegistryError> {
        if self.connectors.contains_key(connector.name()) {
            return Err(RegistryError::DuplicateConnector(connector.name().to_string()));
        }
        self.connectors
            .insert(connector.name().to_string(), connector);
        Ok(())
    }

    /// Returns the number of defined resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if no resources are defined.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Returns `true` if `(name, index)` is defined.
    pub fn contains(&self, name: &str, index: u32) -> bool {
        self.resources.contains_key(&ResourceKey::new(name, index))
    }

    /// Resolves a single definition against the connectors registered so far.
    pub fn resolve(&self, name: &str, index: u32) -> Result<ResolvedResource, RegistryError> {
        self.resources
            .get(&ResourceKey::new(name, index))
            .ok_or_else(|| RegistryError::UnknownResource {
                name: name.to_string(),
                index: Some(index),
            })?
            .resolve(&self.connectors)
    }

    /// Resolves every definition and freezes the registry.
    ///
    /// Fails on the first dangling connector reference, in `(name, index)`
    /// order.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut resources = Vec::with_capacity(self.resources.len());
        let mut index = BTreeMap::new();
        for (key, resource) in &self.resources {
            index.insert(key.clone(), resources.len());
            resources.push(resource.resolve(&self.connectors)?);
        }
        tracing::debug!(
            resources = resources.len(),
            connectors = self.connectors.len(),
            "registry frozen"
        );
        Ok(Registry {
            resources,
            connectors: self.connectors,
            index,
        })
    }
}

/// A frozen, fully resolved constraint registry.
///
/// Every pin in every resource is a physical package pin. Resources are kept
/// in `(name, index)` order.
#[derive(Debug, Clone, Serialize)]
pub struct Registry {
    resources: Vec<ResolvedResource>,
    connectors: BTreeMap<String, Connector>,
    #[serde(skip)]
    index: BTreeMap<ResourceKey, usize>,
}

impl Registry {
    /// Returns the resolved resource `(name, index)`.
    pub fn resolve(&self, name: &str, index: u32) -> Result<&ResolvedResource, RegistryError> {
        self.get(name, index)
            .ok_or_else(|| RegistryError::UnknownResource {
                name: name.to_string(),
                index: Some(index),
            })
    }

    /// Returns the resolved resource `(name, index)`, if defined.
    pub fn get(&self, name: &str, index: u32) -> Option<&ResolvedResource> {
        self.index
            .get(&ResourceKey::new(name, index))
            .map(|&i| &self.resources[i])
    }

    /// Returns every resource registered under `name`, ordered by index.
    ///
    /// Fails with [`RegistryError::UnknownResource`] if there is none.
    pub fn request_all(&self, name: &str) -> Result<Vec<&ResolvedResource>, RegistryError> {
        let all: Vec<_> = self.resources.iter().filter(|r| r.name == name).collect();
        if all.is_empty() {
            return Err(RegistryError::UnknownResource {
                name: name.to_string(),
                index: None,
            });
        }
        Ok(all)
    }

    /// Returns `true` if any index is registered under `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.resources.iter().any(|r| r.name == name)
    }

    /// Returns the connector with the given name.
    pub fn connector(&self, name: &str) -> Option<&Connector> {
        self.connectors.get(name)
    }

    /// Iterates over all resources in `(name, index)` order.
    pub fn resources(&self) -> impl Iterator<Item = &ResolvedResource> {
        self.resources.iter()
    }

    /// Returns the number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if the registry holds no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReferenceFault;
    use crate::resource::Subsignal;

    const LVTTL: &str = "3.3-V LVTTL";

    fn jp1() -> Connector {
        Connector::parse(
            "JP1",
            "N16 B16 M16 C16 D17 K20 K21 K22 K20 M21 - - N21 R22",
        )
    }

    fn led(index: u32, pin: &str) -> IoResource {
        IoResource::with_pins("user_led", index, pin, LVTTL).unwrap()
    }

    #[test]
    fn duplicate_define_fails_and_leaves_state_unchanged() {
        let mut builder = RegistryBuilder::new();
        builder.define(led(0, "AA2")).unwrap();
        builder.define(led(1, "AA1")).unwrap();
        let before = builder.clone();

        let err = builder.define(led(1, "W2")).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateResource(ResourceKey::new("user_led", 1))
        );
        assert_eq!(builder.len(), before.len());
        assert_eq!(
            builder.resolve("user_led", 1).unwrap(),
            before.resolve("user_led", 1).unwrap()
        );
        assert_eq!(builder.resolve("user_led", 1).unwrap().pins(), vec!["AA1"]);
    }

    #[test]
    fn every_duplicate_in_a_sequence_is_rejected() {
        let sequence = [("key", 0), ("key", 1), ("key", 0), ("sw", 0), ("key", 1), ("sw", 0)];
        let mut builder = RegistryBuilder::new();
        let mut seen = std::collections::BTreeSet::new();
        for (name, index) in sequence {
            let fresh = seen.insert((name, index));
            let len_before = builder.len();
            let result = builder.define(IoResource::with_pins(name, index, "U7", LVTTL).unwrap());
            if fresh {
                assert!(result.is_ok());
                assert_eq!(builder.len(), len_before + 1);
            } else {
                assert!(matches!(result, Err(RegistryError::DuplicateResource(_))));
                assert_eq!(builder.len(), len_before);
            }
        }
        assert_eq!(builder.len(), 3);
    }

    #[test]
    fn empty_pin_list_is_rejected_at_define() {
        let mut builder = RegistryBuilder::new();
        let err = builder
            .define(IoResource::with_pins("gpio", 0, "   ", LVTTL).unwrap())
            .unwrap_err();
        assert!(matches!(err, RegistryError::EmptyPinList { .. }));
        assert!(builder.is_empty());
    }

    #[test]
    fn duplicate_connector_fails() {
        let mut builder = RegistryBuilder::new();
        builder.add_connector(jp1()).unwrap();
        assert_eq!(
            builder.add_connector(jp1()),
            Err(RegistryError::DuplicateConnector("JP1".to_string()))
        );
    }

    #[test]
    fn build_fails_fast_on_absent_position() {
        for position in [11, 12] {
            let mut builder = RegistryBuilder::new();
            builder.add_connector(jp1()).unwrap();
            builder
                .define(
                    IoResource::with_pins("gpio", 0, &format!("JP1:10 JP1:{position}"), LVTTL)
                        .unwrap(),
                )
                .unwrap();
            match builder.build().unwrap_err() {
                RegistryError::UnresolvedReference {
                    reference, fault, ..
                } => {
                    assert_eq!(reference, format!("JP1:{position}"));
                    assert_eq!(fault, ReferenceFault::AbsentPosition);
                }
                other => panic!("expected UnresolvedReference, got {other:?}"),
            }
        }
    }

    #[test]
    fn build_fails_on_unknown_connector() {
        let mut builder = RegistryBuilder::new();
        builder
            .define(IoResource::with_pins("gpio", 1, "JP2:1", LVTTL).unwrap())
            .unwrap();
        assert!(matches!(
            builder.build(),
            Err(RegistryError::UnresolvedReference {
                fault: ReferenceFault::UnknownConnector,
                ..
            })
        ));
    }

    #[test]
    fn every_present_position_resolves() {
        let connector = jp1();
        let refs: Vec<String> = connector
            .present()
            .map(|(pos, _)| format!("JP1:{pos}"))
            .collect();
        let mut builder = RegistryBuilder::new();
        builder.add_connector(connector.clone()).unwrap();
        builder
            .define(IoResource::with_pins("gpio", 0, &refs.join(" "), LVTTL).unwrap())
            .unwrap();
        let registry = builder.build().unwrap();
        let expected: Vec<&str> = connector.present().map(|(_, pin)| pin).collect();
        assert_eq!(registry.resolve("gpio", 0).unwrap().pins(), expected);
    }

    #[test]
    fn request_all_orders_by_index() {
        let mut builder = RegistryBuilder::new();
        for (i, pin) in ["AA2", "AA1", "W2"].iter().enumerate().rev() {
            builder.define(led(i as u32, pin)).unwrap();
        }
        builder
            .define(IoResource::with_pins("user_led_extra", 0, "Y3", LVTTL).unwrap())
            .unwrap();
        let registry = builder.build().unwrap();
        let leds = registry.request_all("user_led").unwrap();
        let indices: Vec<u32> = leds.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        let pins: Vec<&str> = leds.iter().flat_map(|r| r.pins()).collect();
        assert_eq!(pins, vec!["AA2", "AA1", "W2"]);
    }

    #[test]
    fn unknown_lookups_fail() {
        let registry = RegistryBuilder::new().build().unwrap();
        assert_eq!(
            registry.resolve("vga", 0).unwrap_err(),
            RegistryError::UnknownResource {
                name: "vga".to_string(),
                index: Some(0)
            }
        );
        assert!(registry.request_all("user_led").is_err());
        assert!(registry.get("vga", 0).is_none());
        assert!(!registry.contains_name("vga"));
    }

    #[test]
    fn builder_resolve_reports_dangling_reference_before_build() {
        let mut builder = RegistryBuilder::new();
        builder.add_connector(jp1()).unwrap();
        builder
            .define(IoResource::with_subsignals(
                "gpio_serial",
                0,
                vec![
                    Subsignal::new("tx", "JP1:10").unwrap(),
                    Subsignal::new("rx", "JP1:12").unwrap(),
                ],
                Some(LVTTL.to_string()),
            ))
            .unwrap();
        assert!(matches!(
            builder.resolve("gpio_serial", 0),
            Err(RegistryError::UnresolvedReference { .. })
        ));
        assert!(matches!(
            builder.resolve("gpio_serial", 1),
            Err(RegistryError::UnknownResource { .. })
        ));
    }

    #[test]
    fn serializes_resources_in_key_order() {
        let mut builder = RegistryBuilder::new();
        builder.define(led(1, "AA1")).unwrap();
        builder
            .define(IoResource::with_pins("clk50", 0, "M9", LVTTL).unwrap())
            .unwrap();
        let registry = builder.build().unwrap();
        let json = serde_json::to_value(&registry).unwrap();
        let names: Vec<&str> = json["resources"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["clk50", "user_led"]);
    }
}
