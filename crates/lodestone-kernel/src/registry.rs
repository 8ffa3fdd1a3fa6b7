//! Class registry: allocation and authorization lookups.
//!
//! The registry is the factory's bookkeeping store. It allocates class ids
//! sequentially from 0, derives each wrapper's contract address
//! deterministically, and answers the ledger's authorization lookups
//! (which address is registered for which class). Entries are written once
//! at deployment and never change.

use std::collections::BTreeMap;

use lodestone_types::{Address, ClassId, ClassMetadata, TokenKind};
use serde::{Deserialize, Serialize};

/// Domain separator for contract address derivation.
const ADDRESS_DOMAIN: &[u8] = b"lodestone.wrapper.v1";

/// Derives the contract address for a class from its id and kind.
///
/// The derivation is deterministic, so replaying the same deployment
/// sequence reproduces identical addresses, and distinct classes get
/// distinct addresses.
pub fn derive_contract_address(class_id: ClassId, kind: TokenKind) -> Address {
    let mut hasher = blake3::Hasher::new();
    hasher.update(ADDRESS_DOMAIN);
    hasher.update(&class_id.as_u128().to_be_bytes());
    hasher.update(&[kind.as_byte()]);
    Address::from_bytes(*hasher.finalize().as_bytes())
}

/// Immutable registration records for every deployed class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Registry {
    classes: BTreeMap<ClassId, ClassMetadata>,
    by_contract: BTreeMap<Address, ClassId>,
    next_class_id: ClassId,
}

impl Registry {
    /// Creates an empty registry; the first registration receives
    /// [`ClassId::FIRST`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new class and returns its metadata.
    ///
    /// Id allocation, address derivation, and record insertion happen
    /// together, so an id can never be allocated without a registration.
    pub(crate) fn register(&mut self, kind: TokenKind) -> ClassMetadata {
        let class_id = self.next_class_id;
        self.next_class_id = class_id.next();

        let contract = derive_contract_address(class_id, kind);
        let metadata = ClassMetadata::new(class_id, kind, contract);

        debug_assert!(!self.classes.contains_key(&class_id));
        debug_assert!(!self.by_contract.contains_key(&contract));
        debug_assert!(!contract.is_zero());

        self.classes.insert(class_id, metadata);
        self.by_contract.insert(contract, class_id);
        metadata
    }

    /// Returns the registration record for a class, if it exists.
    pub fn class(&self, class_id: &ClassId) -> Option<&ClassMetadata> {
        self.classes.get(class_id)
    }

    /// Returns true if a class with the given id is registered.
    pub fn class_exists(&self, class_id: &ClassId) -> bool {
        self.classes.contains_key(class_id)
    }

    /// The registered wrapper address for a class.
    ///
    /// This is the lookup the ledger's authorization check is built on.
    pub fn contract_of(&self, class_id: ClassId) -> Option<Address> {
        self.classes.get(&class_id).map(|meta| meta.contract)
    }

    /// The kind registered for a class.
    pub fn kind_of(&self, class_id: ClassId) -> Option<TokenKind> {
        self.classes.get(&class_id).map(|meta| meta.kind)
    }

    /// Reverse lookup: the registration owning a contract address.
    pub fn class_by_contract(&self, contract: Address) -> Option<&ClassMetadata> {
        self.by_contract
            .get(&contract)
            .and_then(|class_id| self.classes.get(class_id))
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no class has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The id the next registration will receive.
    pub fn next_class_id(&self) -> ClassId {
        self.next_class_id
    }

    /// Iterates registrations in class id order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassMetadata> {
        self.classes.values()
    }

    /// Feeds the registry into a state hasher in deterministic order.
    pub(crate) fn hash_into(&self, hasher: &mut blake3::Hasher) {
        hasher.update(&self.next_class_id.as_u128().to_be_bytes());
        hasher.update(&(self.classes.len() as u64).to_be_bytes());
        for metadata in self.classes.values() {
            hasher.update(&metadata.class_id.as_u128().to_be_bytes());
            hasher.update(&[metadata.kind.as_byte()]);
            hasher.update(metadata.contract.as_bytes());
        }
    }
}
