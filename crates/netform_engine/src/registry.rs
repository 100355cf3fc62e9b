//! String-keyed transform registry.

use std::collections::BTreeMap;
use std::fmt;

use netform_foundation::{Error, NetDef, Result};

use crate::transform::Transform;
use crate::transformer::Transformer;
use crate::transforms::FuseSequence;

/// Builds a fresh transform instance.
pub type TransformConstructor = Box<dyn Fn() -> Box<dyn Transform> + Send + Sync>;

/// Maps transform keys to constructors.
#[derive(Default)]
pub struct TransformRegistry {
    constructors: BTreeMap<String, TransformConstructor>,
}

impl TransformRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in transforms.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (key, pattern, fused) in [
            ("fuse_conv_relu", ["Conv", "Relu"], "ConvRelu"),
            ("fuse_fc_relu", ["FC", "Relu"], "FCRelu"),
        ] {
            let constructor: TransformConstructor = Box::new(move || -> Box<dyn Transform> {
                Box::new(FuseSequence::new(key, pattern, fused))
            });
            registry.constructors.insert(key.to_string(), constructor);
        }
        registry
    }

    /// Registers a constructor under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is already registered.
    pub fn register<F>(&mut self, key: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Transform> + Send + Sync + 'static,
    {
        let key = key.into();
        if self.constructors.contains_key(&key) {
            return Err(Error::duplicate_transform(key));
        }
        self.constructors.insert(key, Box::new(constructor));
        Ok(())
    }

    /// Creates the transform registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is not registered.
    pub fn create(&self, key: &str) -> Result<Box<dyn Transform>> {
        self.constructors
            .get(key)
            .map(|constructor| constructor())
            .ok_or_else(|| Error::unknown_transform(key))
    }

    /// Returns true if `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.constructors.contains_key(key)
    }

    /// Iterates over registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Returns the number of registered transforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

/// Creates a built-in transform by key.
///
/// # Errors
///
/// Returns an error if `key` is not a built-in transform.
pub fn create_transform(key: &str) -> Result<Box<dyn Transform>> {
    TransformRegistry::with_builtins().create(key)
}

/// Applies the built-in transform `key` to `net`.
///
/// # Errors
///
/// Returns an error if `key` is unknown or the pass fails.
pub fn apply_transform(key: &str, net: &NetDef) -> Result<NetDef> {
    Transformer::from_key(key)?.apply_to(net)
}
