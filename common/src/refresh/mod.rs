//! Refresh Coordinator: keeps views consistent with mutations.
//!
//! The model
//! - `RefreshCoordinator` owns one monotonic `Generation` for the catalog as a
//!   whole and one per image detail. Recording a successful `Mutation` bumps
//!   the generations of every scope it affects. A bump is the only thing that
//!   makes a view read again.
//! - Each view owns a `ViewBinding` for its `ViewScope`. `observe` hands out a
//!   `LoadTicket` when the scope's generation moved since the binding last
//!   asked. The view performs the read and passes the ticket back to
//!   `resolve`.
//! - A result whose ticket is no longer the binding's latest is discarded.
//!   Superseded reads are ignored rather than cancelled, so a slow, old
//!   response can never replace a newer one.
//!
//! Everything here is synchronous and single-threaded; only the reads
//! themselves suspend.

use crate::client::Listing;
use crate::model::image::ImageRecord;
use crate::model::snapshot::CatalogSnapshot;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const INITIAL: Generation = Generation(0);

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Generation {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// What a view displays, and therefore which mutations invalidate it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewScope {
    Gallery,
    Tags,
    Tagged(String),
    Detail(String),
}

/// A mutation that completed successfully on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Uploaded { image_id: String },
    TagsAdded { image_id: String },
    Deleted { image_id: String },
}

impl Mutation {
    pub fn image_id(&self) -> &str {
        match self {
            Mutation::Uploaded { image_id }
            | Mutation::TagsAdded { image_id }
            | Mutation::Deleted { image_id } => image_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshCoordinator {
    catalog: Generation,
    details: HashMap<String, Generation>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation of `scope`.
    pub fn generation(&self, scope: &ViewScope) -> Generation {
        match scope {
            ViewScope::Gallery | ViewScope::Tags | ViewScope::Tagged(_) => self.catalog,
            ViewScope::Detail(id) => self.details.get(id).copied().unwrap_or_default(),
        }
    }

    /// Bumps every scope `mutation` invalidates. Any mutation changes the
    /// catalog; tag edits and deletes also change that image's detail.
    pub fn record(&mut self, mutation: &Mutation) {
        self.catalog = self.catalog.next();
        match mutation {
            Mutation::Uploaded { .. } => {}
            Mutation::TagsAdded { image_id } | Mutation::Deleted { image_id } => {
                let detail = self.details.entry(image_id.clone()).or_default();
                *detail = detail.next();
            }
        }
        debug!("{mutation:?} moved the catalog to {}", self.catalog);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Idle,
    Loading(Generation),
    Ready(Arc<T>),
    Failed(String),
}

/// Permission to apply one read's result to one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    scope: ViewScope,
    generation: Generation,
}

impl LoadTicket {
    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }
}

#[derive(Debug, Clone)]
pub struct ViewBinding<T> {
    scope: ViewScope,
    requested: Option<Generation>,
    state: ViewState<T>,
}

impl<T> ViewBinding<T> {
    pub fn new(scope: ViewScope) -> Self {
        Self {
            scope,
            requested: None,
            state: ViewState::Idle,
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn current(&self) -> Option<&Arc<T>> {
        match &self.state {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading(_))
    }

    /// Issues a ticket when the scope's generation differs from the one last
    /// requested. The first observation of a fresh binding always issues one.
    /// Observing again without an intervening bump issues nothing.
    pub fn observe(&mut self, coordinator: &RefreshCoordinator) -> Option<LoadTicket> {
        let generation = coordinator.generation(&self.scope);
        if self.requested == Some(generation) {
            return None;
        }
        self.requested = Some(generation);
        self.state = ViewState::Loading(generation);
        Some(LoadTicket {
            scope: self.scope.clone(),
            generation,
        })
    }

    /// Applies a read's outcome if `ticket` is still the latest one issued
    /// for this binding's scope. Returns whether the state changed.
    pub fn resolve(&mut self, ticket: &LoadTicket, outcome: Result<T, String>) -> bool {
        if !self.accepts(ticket) {
            debug!(
                "discarding {:?} result for {}, latest is {:?}",
                ticket.scope, ticket.generation, self.requested
            );
            return false;
        }
        self.state = match outcome {
            Ok(value) => ViewState::Ready(Arc::new(value)),
            Err(reason) => ViewState::Failed(reason),
        };
        true
    }

    /// Re-issues the last requested read after it failed. Only an explicit
    /// user action should call this.
    pub fn retry(&mut self) -> Option<LoadTicket> {
        let generation = self.requested?;
        if !matches!(self.state, ViewState::Failed(_)) {
            return None;
        }
        self.state = ViewState::Loading(generation);
        Some(LoadTicket {
            scope: self.scope.clone(),
            generation,
        })
    }

    /// Points the binding at another scope, such as a different tag. Tickets
    /// issued for the old scope are rejected from now on.
    pub fn rebind(&mut self, scope: ViewScope) {
        if scope != self.scope {
            self.scope = scope;
            self.requested = None;
            self.state = ViewState::Idle;
        }
    }

    fn accepts(&self, ticket: &LoadTicket) -> bool {
        ticket.scope == self.scope
            && self.requested == Some(ticket.generation)
            && matches!(self.state, ViewState::Loading(g) if g == ticket.generation)
    }
}

impl ViewBinding<CatalogSnapshot> {
    /// Turns a list read into a snapshot for this binding.
    ///
    /// A listing that degraded because the backend was unreachable becomes
    /// `Failed`, so the view can say "not available yet" rather than "empty".
    /// Any other degradation yields an empty snapshot.
    pub fn resolve_listing(&mut self, ticket: &LoadTicket, listing: Listing<ImageRecord>) -> bool {
        let outcome = match listing.failure {
            Some(failure) if failure.is_transport() => Err(failure.user_message()),
            _ => Ok(CatalogSnapshot::new(ticket.generation, listing.items)),
        };
        self.resolve(ticket, outcome)
    }
}
