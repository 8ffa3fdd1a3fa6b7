//! Unique-item wrapper: discrete items, each owned by one address.
//!
//! Every minted local id has exactly one owner at all times, so the
//! wrapper's report for any `(owner, local_id)` slot is always 0 or 1 and
//! the sum across owners for a minted id is exactly 1. There is no burn:
//! it would break that sum.

use std::collections::BTreeMap;

use lodestone_types::{Address, BalanceChange, ClassId, LocalId, TransferRecord};
use serde::{Deserialize, Serialize};

use crate::kernel::KernelError;

/// State of one deployed unique-item class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueWrapper {
    class_id: ClassId,
    contract: Address,
    name: String,
    symbol: String,
    owners: BTreeMap<LocalId, Address>,
    next_local_id: LocalId,
}

impl UniqueWrapper {
    /// Creates an empty wrapper bound to its registered identity.
    pub(crate) fn new(class_id: ClassId, contract: Address, name: String, symbol: String) -> Self {
        Self {
            class_id,
            contract,
            name,
            symbol,
            owners: BTreeMap::new(),
            next_local_id: LocalId::new(0),
        }
    }

    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Current owner of `local_id`, if it has been minted.
    pub fn owner_of(&self, local_id: LocalId) -> Option<Address> {
        self.owners.get(&local_id).copied()
    }

    /// Number of items `owner` currently holds.
    pub fn balance_of(&self, owner: Address) -> u128 {
        self.owners.values().filter(|held| **held == owner).count() as u128
    }

    /// Number of items minted so far.
    pub fn minted_count(&self) -> usize {
        self.owners.len()
    }

    /// The local id the next mint will allocate.
    pub fn next_local_id(&self) -> LocalId {
        self.next_local_id
    }

    /// Mints the next sequential item to `to`.
    ///
    /// Allocation and ownership assignment happen together, so an id can
    /// never exist without an owner.
    pub(crate) fn mint(
        &mut self,
        to: Address,
    ) -> Result<(LocalId, Vec<BalanceChange>, TransferRecord), KernelError> {
        if to.is_zero() {
            return Err(KernelError::TransferToZeroAddress(self.class_id));
        }
        let local_id = self.next_local_id;
        self.next_local_id = local_id.next();

        debug_assert!(!self.owners.contains_key(&local_id));
        self.owners.insert(local_id, to);

        Ok((
            local_id,
            vec![BalanceChange::credit(to, local_id, 1)],
            self.record(Address::ZERO, to, local_id),
        ))
    }

    /// Reassigns ownership of `local_id` from `from` to `to`.
    ///
    /// `caller` must be the current owner; delegated operators are not
    /// part of this surface.
    pub(crate) fn transfer(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        local_id: LocalId,
    ) -> Result<(Vec<BalanceChange>, TransferRecord), KernelError> {
        let owner = self.owner_of(local_id).ok_or(KernelError::UnknownItem {
            class_id: self.class_id,
            local_id,
        })?;
        if owner != from {
            return Err(KernelError::NotItemOwner {
                class_id: self.class_id,
                local_id,
                claimed: from,
                owner,
            });
        }
        if caller != from {
            return Err(KernelError::OperatorNotAllowed {
                class_id: self.class_id,
                caller,
                from,
            });
        }
        if to.is_zero() {
            return Err(KernelError::TransferToZeroAddress(self.class_id));
        }

        self.owners.insert(local_id, to);

        // Postcondition: the item still has exactly one owner.
        debug_assert_eq!(self.owner_of(local_id), Some(to));

        Ok((
            vec![
                BalanceChange::debit(from, local_id, 1),
                BalanceChange::credit(to, local_id, 1),
            ],
            self.record(from, to, local_id),
        ))
    }

    fn record(&self, from: Address, to: Address, local_id: LocalId) -> TransferRecord {
        TransferRecord {
            contract: self.contract,
            class_id: self.class_id,
            from,
            to,
            local_id,
            amount: 1,
            data: bytes::Bytes::new(),
        }
    }

    /// Feeds this wrapper's tables into a state hasher in deterministic order.
    pub(crate) fn hash_into(&self, hasher: &mut blake3::Hasher) {
        hasher.update(&(self.name.len() as u64).to_be_bytes());
        hasher.update(self.name.as_bytes());
        hasher.update(&(self.symbol.len() as u64).to_be_bytes());
        hasher.update(self.symbol.as_bytes());
        hasher.update(&self.next_local_id.as_u128().to_be_bytes());
        hasher.update(&(self.owners.len() as u64).to_be_bytes());
        for (local_id, owner) in &self.owners {
            hasher.update(&local_id.as_u128().to_be_bytes());
            hasher.update(owner.as_bytes());
        }
    }
}
