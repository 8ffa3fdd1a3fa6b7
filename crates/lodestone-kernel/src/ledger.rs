//! The unified multi-asset ledger.
//!
//! One sparse table maps `(owner, global_id)` to a non-negative quantity
//! and mirrors the ground truth held in every wrapper's own storage. The
//! table is mutated only through [`Ledger::notify_balance_change`], which
//! authorizes the reporting address against the registry before applying
//! anything. Balances that reach zero are removed, so an unknown key and a
//! zero balance are the same observable state.

use std::collections::BTreeMap;

use lodestone_types::{Address, BalanceChange, ClassId, Delta, GlobalId};
use serde::{Deserialize, Serialize};

use crate::registry::Registry;

/// Errors raised by the mirroring entry point.
///
/// The first two variants are authorization failures (the caller has no
/// business writing for that class). The last two are internal-consistency
/// failures: a correct wrapper validates before reporting, so a delta the
/// table cannot absorb means wrapper and ledger have desynchronized.
#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("no wrapper is registered for class {0}")]
    UnregisteredClass(ClassId),

    #[error("caller {caller} is not the registered wrapper for class {class_id}")]
    UnauthorizedNotifier { class_id: ClassId, caller: Address },

    #[error(
        "debit of {debit} would drive {owner}'s balance at {global_id} negative \
         (balance {balance}); wrapper and ledger are desynchronized"
    )]
    BalanceUnderflow {
        owner: Address,
        global_id: GlobalId,
        balance: u128,
        debit: u128,
    },

    #[error("credit overflow for {owner} at {global_id}; wrapper and ledger are desynchronized")]
    BalanceOverflow { owner: Address, global_id: GlobalId },
}

impl LedgerError {
    /// Returns true for rejections of callers that are not the registered
    /// wrapper (as opposed to bad input or desynchronization).
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            LedgerError::UnregisteredClass(_) | LedgerError::UnauthorizedNotifier { .. }
        )
    }

    /// Returns true for wrapper/ledger desynchronization failures, which
    /// are never expected in correct operation.
    pub fn is_desynchronization(&self) -> bool {
        matches!(
            self,
            LedgerError::BalanceUnderflow { .. } | LedgerError::BalanceOverflow { .. }
        )
    }
}

/// The unified balance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Ledger {
    balances: BTreeMap<Address, BTreeMap<GlobalId, u128>>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unified balance of `owner` at `global_id`.
    ///
    /// Total read: unknown keys are 0, never an error.
    pub fn balance_of(&self, owner: Address, global_id: GlobalId) -> u128 {
        self.balances
            .get(&owner)
            .and_then(|slots| slots.get(&global_id))
            .copied()
            .unwrap_or(0)
    }

    /// Iterates `owner`'s non-zero balances in global id order.
    pub fn balances_of(&self, owner: Address) -> impl Iterator<Item = (GlobalId, u128)> + '_ {
        self.balances
            .get(&owner)
            .into_iter()
            .flat_map(|slots| slots.iter().map(|(id, amount)| (*id, *amount)))
    }

    /// Number of non-zero `(owner, global_id)` entries in the table.
    pub fn entry_count(&self) -> usize {
        self.balances.values().map(BTreeMap::len).sum()
    }

    /// Returns true if no balance is currently tracked.
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Applies one reported balance change after authorizing the caller.
    ///
    /// `caller` must be the wrapper address registered for `class_id`;
    /// anything else is rejected before any mutation. On success the new
    /// balance at the affected `(owner, global_id)` slot is returned.
    pub(crate) fn notify_balance_change(
        &mut self,
        registry: &Registry,
        caller: Address,
        class_id: ClassId,
        change: &BalanceChange,
    ) -> Result<u128, LedgerError> {
        let registered = registry
            .contract_of(class_id)
            .ok_or(LedgerError::UnregisteredClass(class_id))?;
        if registered != caller {
            return Err(LedgerError::UnauthorizedNotifier { class_id, caller });
        }

        let global_id = GlobalId::from_parts(class_id, change.local_id);
        let balance = self.balance_of(change.owner, global_id);
        let updated = match change.delta {
            Delta::Credit(amount) => {
                balance
                    .checked_add(amount)
                    .ok_or(LedgerError::BalanceOverflow {
                        owner: change.owner,
                        global_id,
                    })?
            }
            Delta::Debit(amount) => {
                balance
                    .checked_sub(amount)
                    .ok_or(LedgerError::BalanceUnderflow {
                        owner: change.owner,
                        global_id,
                        balance,
                        debit: amount,
                    })?
            }
        };

        if updated == 0 {
            if let Some(slots) = self.balances.get_mut(&change.owner) {
                slots.remove(&global_id);
                if slots.is_empty() {
                    self.balances.remove(&change.owner);
                }
            }
        } else {
            self.balances
                .entry(change.owner)
                .or_default()
                .insert(global_id, updated);
        }

        // Postcondition: the slot reads back exactly the returned balance.
        debug_assert_eq!(self.balance_of(change.owner, global_id), updated);

        Ok(updated)
    }

    /// Feeds the ledger into a state hasher in deterministic order.
    pub(crate) fn hash_into(&self, hasher: &mut blake3::Hasher) {
        hasher.update(&(self.balances.len() as u64).to_be_bytes());
        for (owner, slots) in &self.balances {
            hasher.update(owner.as_bytes());
            hasher.update(&(slots.len() as u64).to_be_bytes());
            for (global_id, amount) in slots {
                hasher.update(&global_id.to_be_bytes());
                hasher.update(&amount.to_be_bytes());
            }
        }
    }
}
