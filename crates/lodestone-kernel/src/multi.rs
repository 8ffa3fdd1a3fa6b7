//! Multi-item wrapper: per-owner quantities across many local ids.
//!
//! True multi-asset semantics within one class. Batch transfers report
//! every affected `(owner, local_id, delta)` individually; a failure
//! anywhere in a batch fails the whole command, and the transaction
//! boundary discards the working state, so partial application is never
//! observable.

use std::collections::BTreeMap;

use bytes::Bytes;
use lodestone_types::{Address, BalanceChange, ClassId, LocalId, TransferRecord};
use serde::{Deserialize, Serialize};

use crate::kernel::KernelError;

/// State of one deployed multi-item class.
///
/// Zero balances are removed from the tables, so a missing entry and a
/// zero entry are the same observable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiWrapper {
    class_id: ClassId,
    contract: Address,
    uri: String,
    balances: BTreeMap<LocalId, BTreeMap<Address, u128>>,
}

impl MultiWrapper {
    /// Creates an empty wrapper bound to its registered identity.
    pub(crate) fn new(class_id: ClassId, contract: Address, uri: String) -> Self {
        Self {
            class_id,
            contract,
            uri,
            balances: BTreeMap::new(),
        }
    }

    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Metadata URI handed to the factory at deployment, stored verbatim.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Balance of `owner` at `local_id` as this wrapper's table reports it.
    pub fn balance_of(&self, owner: Address, local_id: LocalId) -> u128 {
        self.balances
            .get(&local_id)
            .and_then(|holders| holders.get(&owner))
            .copied()
            .unwrap_or(0)
    }

    /// Mints `amount` of `local_id` to `to`.
    pub(crate) fn mint(
        &mut self,
        to: Address,
        local_id: LocalId,
        amount: u128,
    ) -> Result<(Vec<BalanceChange>, TransferRecord), KernelError> {
        if to.is_zero() {
            return Err(KernelError::TransferToZeroAddress(self.class_id));
        }
        self.credit(to, local_id, amount)?;

        Ok((
            vec![BalanceChange::credit(to, local_id, amount)],
            self.record(Address::ZERO, to, local_id, amount, Bytes::new()),
        ))
    }

    /// Moves `amount` of `local_id` from `from` to `to`.
    ///
    /// `caller` must be `from`; delegated operators are not part of this
    /// surface. `data` is an opaque payload carried on the event record.
    pub(crate) fn transfer(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        local_id: LocalId,
        amount: u128,
        data: Bytes,
    ) -> Result<(Vec<BalanceChange>, TransferRecord), KernelError> {
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
        self.debit(from, local_id, amount)?;
        self.credit(to, local_id, amount)?;

        Ok((
            vec![
                BalanceChange::debit(from, local_id, amount),
                BalanceChange::credit(to, local_id, amount),
            ],
            self.record(from, to, local_id, amount, data),
        ))
    }

    /// Moves several local ids from `from` to `to` in one operation.
    ///
    /// Items are applied sequentially against this wrapper's live table, so
    /// duplicate local ids within one batch see each other's effects. Any
    /// failing item fails the whole command; the transaction boundary
    /// discards every earlier item's mutation along with it.
    pub(crate) fn batch_transfer(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        local_ids: &[LocalId],
        amounts: &[u128],
        data: Bytes,
    ) -> Result<(Vec<BalanceChange>, Vec<TransferRecord>), KernelError> {
        if local_ids.len() != amounts.len() {
            return Err(KernelError::BatchArityMismatch {
                ids: local_ids.len(),
                amounts: amounts.len(),
            });
        }

        let mut changes = Vec::with_capacity(local_ids.len() * 2);
        let mut records = Vec::with_capacity(local_ids.len());
        for (local_id, amount) in local_ids.iter().copied().zip(amounts.iter().copied()) {
            let (item_changes, record) =
                self.transfer(caller, from, to, local_id, amount, data.clone())?;
            changes.extend(item_changes);
            records.push(record);
        }

        // Postcondition: every item reported exactly one debit and one credit.
        debug_assert_eq!(changes.len(), local_ids.len() * 2);

        Ok((changes, records))
    }

    /// Destroys `amount` of `local_id` held by `from`.
    pub(crate) fn burn(
        &mut self,
        caller: Address,
        from: Address,
        local_id: LocalId,
        amount: u128,
    ) -> Result<(Vec<BalanceChange>, TransferRecord), KernelError> {
        if caller != from {
            return Err(KernelError::OperatorNotAllowed {
                class_id: self.class_id,
                caller,
                from,
            });
        }
        self.debit(from, local_id, amount)?;

        Ok((
            vec![BalanceChange::debit(from, local_id, amount)],
            self.record(from, Address::ZERO, local_id, amount, Bytes::new()),
        ))
    }

    fn credit(
        &mut self,
        owner: Address,
        local_id: LocalId,
        amount: u128,
    ) -> Result<(), KernelError> {
        if amount == 0 {
            return Ok(());
        }
        let holders = self.balances.entry(local_id).or_default();
        let balance = holders.entry(owner).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(KernelError::BalanceOverflow {
                class_id: self.class_id,
                local_id,
                owner,
            })?;
        Ok(())
    }

    fn debit(
        &mut self,
        owner: Address,
        local_id: LocalId,
        amount: u128,
    ) -> Result<(), KernelError> {
        let balance = self.balance_of(owner, local_id);
        if balance < amount {
            return Err(KernelError::InsufficientBalance {
                class_id: self.class_id,
                local_id,
                owner,
                balance,
                required: amount,
            });
        }
        let remaining = balance - amount;
        if let Some(holders) = self.balances.get_mut(&local_id) {
            if remaining == 0 {
                holders.remove(&owner);
                if holders.is_empty() {
                    self.balances.remove(&local_id);
                }
            } else {
                holders.insert(owner, remaining);
            }
        }
        Ok(())
    }

    fn record(
        &self,
        from: Address,
        to: Address,
        local_id: LocalId,
        amount: u128,
        data: Bytes,
    ) -> TransferRecord {
        TransferRecord {
            contract: self.contract,
            class_id: self.class_id,
            from,
            to,
            local_id,
            amount,
            data,
        }
    }

    /// Feeds this wrapper's tables into a state hasher in deterministic order.
    pub(crate) fn hash_into(&self, hasher: &mut blake3::Hasher) {
        hasher.update(&(self.uri.len() as u64).to_be_bytes());
        hasher.update(self.uri.as_bytes());
        hasher.update(&(self.balances.len() as u64).to_be_bytes());
        for (local_id, holders) in &self.balances {
            hasher.update(&local_id.as_u128().to_be_bytes());
            hasher.update(&(holders.len() as u64).to_be_bytes());
            for (owner, amount) in holders {
                hasher.update(owner.as_bytes());
                hasher.update(&amount.to_be_bytes());
            }
        }
    }
}
