use crate::app::Page;
use crate::transport::GlooTransport;
use common::client::CatalogClient;
use common::refresh::{Mutation, RefreshCoordinator};
use std::rc::Rc;
use yew::Callback;

/// Shared with every view through a `ContextProvider`.
///
/// `refresh` is a copy of the root's coordinator; a new value is provided
/// each time a mutation is recorded, which is what makes bound views read
/// again.
#[derive(Clone)]
pub struct CatalogContext {
    pub client: Rc<CatalogClient<GlooTransport>>,
    pub refresh: RefreshCoordinator,
    /// Report a mutation that succeeded.
    pub on_mutation: Callback<Mutation>,
    pub navigate: Callback<Page>,
}

impl PartialEq for CatalogContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
            && self.refresh == other.refresh
            && self.on_mutation == other.on_mutation
            && self.navigate == other.navigate
    }
}
