//! Fungible wrapper: interchangeable supply under one local id.
//!
//! The wrapper owns the class's ground-truth tables (balances, allowances,
//! total supply) and reports every balance movement as [`BalanceChange`]s
//! for the unified ledger to mirror. All supply lives under
//! [`LocalId::FUNGIBLE`].

use std::collections::BTreeMap;

use lodestone_types::{
    Address, ApprovalRecord, BalanceChange, ClassId, LocalId, TransferRecord,
};
use serde::{Deserialize, Serialize};

use crate::kernel::KernelError;

/// State of one deployed fungible class.
///
/// Zero-address policy: transfers and mints to the zero address are
/// rejected; supply reduction is only expressible through [`burn`].
/// Zero balances and zero allowances are removed from the tables, so a
/// missing entry and a zero entry are the same observable state.
///
/// [`burn`]: FungibleWrapper::burn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleWrapper {
    class_id: ClassId,
    contract: Address,
    name: String,
    symbol: String,
    total_supply: u128,
    balances: BTreeMap<Address, u128>,
    allowances: BTreeMap<Address, BTreeMap<Address, u128>>,
}

impl FungibleWrapper {
    /// Creates an empty wrapper bound to its registered identity.
    pub(crate) fn new(class_id: ClassId, contract: Address, name: String, symbol: String) -> Self {
        Self {
            class_id,
            contract,
            name,
            symbol,
            total_supply: 0,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Deterministic contract address this wrapper reports balance
    /// changes under.
    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Balance of `owner` as this wrapper's own table reports it.
    pub fn balance_of(&self, owner: Address) -> u128 {
        self.balances.get(&owner).copied().unwrap_or(0)
    }

    /// Remaining allowance from `owner` to `spender`.
    pub fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.allowances
            .get(&owner)
            .and_then(|spenders| spenders.get(&spender))
            .copied()
            .unwrap_or(0)
    }

    /// Mints `amount` to `to`, growing total supply.
    ///
    /// Invoked once at deployment to seed the initial supply.
    pub(crate) fn mint(
        &mut self,
        to: Address,
        amount: u128,
    ) -> Result<(Vec<BalanceChange>, TransferRecord), KernelError> {
        if to.is_zero() {
            return Err(KernelError::TransferToZeroAddress(self.class_id));
        }
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(KernelError::SupplyOverflow(self.class_id))?;

        self.total_supply = new_supply;
        self.credit(to, amount);

        Ok((
            vec![BalanceChange::credit(to, LocalId::FUNGIBLE, amount)],
            self.record(Address::ZERO, to, amount),
        ))
    }

    /// Moves `amount` from `from` to `to`.
    pub(crate) fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(Vec<BalanceChange>, TransferRecord), KernelError> {
        if to.is_zero() {
            return Err(KernelError::TransferToZeroAddress(self.class_id));
        }
        self.debit(from, amount)?;
        self.credit(to, amount);

        Ok((
            vec![
                BalanceChange::debit(from, LocalId::FUNGIBLE, amount),
                BalanceChange::credit(to, LocalId::FUNGIBLE, amount),
            ],
            self.record(from, to, amount),
        ))
    }

    /// Sets the allowance from `owner` to `spender` (overwrite semantics).
    pub(crate) fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        amount: u128,
    ) -> Result<ApprovalRecord, KernelError> {
        if spender.is_zero() {
            return Err(KernelError::ApprovalForZeroAddress(self.class_id));
        }
        if amount == 0 {
            if let Some(spenders) = self.allowances.get_mut(&owner) {
                spenders.remove(&spender);
                if spenders.is_empty() {
                    self.allowances.remove(&owner);
                }
            }
        } else {
            self.allowances.entry(owner).or_default().insert(spender, amount);
        }

        Ok(ApprovalRecord {
            contract: self.contract,
            class_id: self.class_id,
            owner,
            spender,
            amount,
        })
    }

    /// Moves `amount` from `from` to `to` on behalf of `spender`,
    /// consuming allowance.
    pub(crate) fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(Vec<BalanceChange>, TransferRecord), KernelError> {
        let allowance = self.allowance(from, spender);
        if allowance < amount {
            return Err(KernelError::InsufficientAllowance {
                class_id: self.class_id,
                owner: from,
                spender,
                allowance,
                required: amount,
            });
        }

        // Validate the transfer before consuming allowance so a failed
        // command leaves the allowance untouched.
        if to.is_zero() {
            return Err(KernelError::TransferToZeroAddress(self.class_id));
        }
        self.debit(from, amount)?;
        self.credit(to, amount);

        let remaining = allowance - amount;
        if remaining == 0 {
            if let Some(spenders) = self.allowances.get_mut(&from) {
                spenders.remove(&spender);
                if spenders.is_empty() {
                    self.allowances.remove(&from);
                }
            }
        } else if let Some(spenders) = self.allowances.get_mut(&from) {
            spenders.insert(spender, remaining);
        }

        Ok((
            vec![
                BalanceChange::debit(from, LocalId::FUNGIBLE, amount),
                BalanceChange::credit(to, LocalId::FUNGIBLE, amount),
            ],
            self.record(from, to, amount),
        ))
    }

    /// Destroys `amount` from `from`, shrinking total supply.
    pub(crate) fn burn(
        &mut self,
        from: Address,
        amount: u128,
    ) -> Result<(Vec<BalanceChange>, TransferRecord), KernelError> {
        self.debit(from, amount)?;

        // Invariant: no balance exceeds total supply, so this cannot wrap.
        debug_assert!(self.total_supply >= amount);
        self.total_supply -= amount;

        Ok((
            vec![BalanceChange::debit(from, LocalId::FUNGIBLE, amount)],
            self.record(from, Address::ZERO, amount),
        ))
    }

    fn credit(&mut self, owner: Address, amount: u128) {
        if amount == 0 {
            return;
        }
        // Invariant: no balance exceeds total supply, so this cannot wrap.
        let balance = self.balances.entry(owner).or_insert(0);
        *balance += amount;
    }

    fn debit(&mut self, owner: Address, amount: u128) -> Result<(), KernelError> {
        let balance = self.balance_of(owner);
        if balance < amount {
            return Err(KernelError::InsufficientBalance {
                class_id: self.class_id,
                local_id: LocalId::FUNGIBLE,
                owner,
                balance,
                required: amount,
            });
        }
        let remaining = balance - amount;
        if remaining == 0 {
            self.balances.remove(&owner);
        } else {
            self.balances.insert(owner, remaining);
        }
        Ok(())
    }

    fn record(&self, from: Address, to: Address, amount: u128) -> TransferRecord {
        TransferRecord {
            contract: self.contract,
            class_id: self.class_id,
            from,
            to,
            local_id: LocalId::FUNGIBLE,
            amount,
            data: bytes::Bytes::new(),
        }
    }

    /// Feeds this wrapper's tables into a state hasher in deterministic order.
    pub(crate) fn hash_into(&self, hasher: &mut blake3::Hasher) {
        hasher.update(&(self.name.len() as u64).to_be_bytes());
        hasher.update(self.name.as_bytes());
        hasher.update(&(self.symbol.len() as u64).to_be_bytes());
        hasher.update(self.symbol.as_bytes());
        hasher.update(&self.total_supply.to_be_bytes());
        hasher.update(&(self.balances.len() as u64).to_be_bytes());
        for (owner, amount) in &self.balances {
            hasher.update(owner.as_bytes());
            hasher.update(&amount.to_be_bytes());
        }
        hasher.update(&(self.allowances.len() as u64).to_be_bytes());
        for (owner, spenders) in &self.allowances {
            hasher.update(owner.as_bytes());
            hasher.update(&(spenders.len() as u64).to_be_bytes());
            for (spender, amount) in spenders {
                hasher.update(spender.as_bytes());
                hasher.update(&amount.to_be_bytes());
            }
        }
    }
}
