//! Kernel state management.
//!
//! The kernel maintains in-memory state covering the three stores the
//! system is built from: the class registry, the per-class wrapper tables
//! (ground truth), and the unified ledger (mirror). Deployment-time
//! transitions use the builder pattern (take ownership, return the updated
//! state); token operations borrow mutably through the accessors below and
//! are orchestrated by `apply_committed`.

use std::collections::BTreeMap;

use lodestone_types::{Address, ClassId, ClassMetadata, GlobalId, TokenKind};
use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;
use crate::registry::Registry;
use crate::wrapper::Wrapper;

/// The kernel's in-memory state.
///
/// Cloning is the transaction mechanism: the shell clones the committed
/// state, applies a command to the clone, and swaps it in only on success.
/// Equality and the state hash therefore compare complete system
/// snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct State {
    registry: Registry,
    wrappers: BTreeMap<ClassId, Wrapper>,
    ledger: Ledger,
}

impl State {
    /// Creates a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The class registry (allocation and authorization records).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The unified multi-asset ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Returns the wrapper deployed for a class, if it exists.
    pub fn wrapper(&self, class_id: &ClassId) -> Option<&Wrapper> {
        self.wrappers.get(class_id)
    }

    /// Returns true if a class with the given id has been deployed.
    pub fn class_exists(&self, class_id: &ClassId) -> bool {
        self.wrappers.contains_key(class_id)
    }

    /// Number of deployed classes.
    pub fn class_count(&self) -> usize {
        self.wrappers.len()
    }

    /// Unified balance read, delegated to the ledger.
    ///
    /// Total: unknown owners and ids read as 0.
    pub fn balance_of(&self, owner: Address, global_id: GlobalId) -> u128 {
        self.ledger.balance_of(owner, global_id)
    }

    /// Allocates the next class id and registers a new class.
    ///
    /// Internal to the kernel - external code should use `apply_committed`
    /// which constructs and wires the wrapper as well.
    pub(crate) fn register_class(mut self, kind: TokenKind) -> (Self, ClassMetadata) {
        let metadata = self.registry.register(kind);
        (self, metadata)
    }

    /// Inserts a freshly constructed wrapper and returns the updated state.
    ///
    /// Internal to the kernel - external code should use `apply_committed`.
    pub(crate) fn with_wrapper(mut self, class_id: ClassId, wrapper: Wrapper) -> Self {
        // Invariant: the wrapper is inserted under its registered id and
        // matches the registered kind.
        debug_assert_eq!(self.registry.kind_of(class_id), Some(wrapper.kind()));
        debug_assert!(!self.wrappers.contains_key(&class_id));

        self.wrappers.insert(class_id, wrapper);
        self
    }

    /// Mutable access to a deployed wrapper for token operations.
    pub(crate) fn wrapper_mut(&mut self, class_id: &ClassId) -> Option<&mut Wrapper> {
        self.wrappers.get_mut(class_id)
    }

    /// The channel a wrapper's balance reports travel through: read access
    /// to the registry for authorization, write access to the ledger.
    pub(crate) fn notification_channel(&mut self) -> (&Registry, &mut Ledger) {
        (&self.registry, &mut self.ledger)
    }

    /// Iterates deployed wrappers in class id order.
    pub(crate) fn wrappers(&self) -> &BTreeMap<ClassId, Wrapper> {
        &self.wrappers
    }
}
