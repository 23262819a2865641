use std::collections::BTreeMap;

use ibc_core::host::types::identifiers::PortId;
use ibc_core::router::module::Module;
use ibc_core::router::router::Router;
use ibc_core::router::types::module::ModuleId;

use crate::testapp::ibc::applications::token::{token_module_id, SimpleToken};

/// Routes packets to the token application.
///
/// The application is held by value so that a snapshot of the router can be
/// restored when a transaction fails.
#[derive(Clone, Debug, Default)]
pub struct MockRouter {
    pub token: SimpleToken,

    /// Maps ports to the module that owns them
    pub port_to_module: BTreeMap<PortId, ModuleId>,
}

impl MockRouter {
    /// A router with the token application bound to the transfer port.
    pub fn new_with_token(token: SimpleToken) -> Self {
        let mut router = Self {
            token,
            port_to_module: BTreeMap::new(),
        };
        router.scope_port_to_module(PortId::transfer(), token_module_id());
        router
    }

    pub fn scope_port_to_module(&mut self, port_id: PortId, module_id: ModuleId) {
        self.port_to_module.insert(port_id, module_id);
    }
}

impl Router for MockRouter {
    fn get_route(&self, module_id: &ModuleId) -> Option<&dyn Module> {
        (module_id == &token_module_id()).then_some(&self.token as &dyn Module)
    }

    fn get_route_mut(&mut self, module_id: &ModuleId) -> Option<&mut dyn Module> {
        if module_id == &token_module_id() {
            Some(&mut self.token)
        } else {
            None
        }
    }

    fn lookup_module(&self, port_id: &PortId) -> Option<ModuleId> {
        self.port_to_module.get(port_id).cloned()
    }
}
