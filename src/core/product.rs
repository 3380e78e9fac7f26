//! Products - linked artifacts composed of modules.

use std::sync::Arc;

use crate::core::module::Module;

/// A named link target over an ordered list of modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    name: String,
    is_test: bool,
    modules: Vec<Arc<Module>>,
}

impl Product {
    pub fn new(name: impl Into<String>, modules: Vec<Arc<Module>>) -> Self {
        Product {
            name: name.into(),
            is_test: false,
            modules,
        }
    }

    pub fn as_test(mut self) -> Self {
        self.is_test = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_test(&self) -> bool {
        self.is_test
    }

    pub fn modules(&self) -> &[Arc<Module>] {
        &self.modules
    }

    /// True iff every composed module is native.
    ///
    /// Computed from the module list on each call; it selects the link
    /// command flavor.
    pub fn is_native_only(&self) -> bool {
        self.modules.iter().all(|m| m.is_native())
    }
}
