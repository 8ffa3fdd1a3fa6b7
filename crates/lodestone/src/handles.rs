//! Class-scoped handles over a shared [`Lodestone`] factory.
//!
//! A handle pairs one deployed class with an acting address (the
//! signer). Operations submit kernel commands with that signer as the
//! caller; the embedder vouches for the identity behind it. Handles are
//! cheap to clone and all clones see the same committed state.

use bytes::Bytes;
use lodestone_kernel::{Command, Effect, FungibleWrapper, MultiWrapper, UniqueWrapper, Wrapper};
use lodestone_types::{Address, ClassId, ClassMetadata, GlobalId, LocalId};

use crate::error::{LodestoneError, Result};
use crate::factory::Lodestone;

// ============================================================================
// Fungible
// ============================================================================

/// Handle for one deployed fungible class.
#[derive(Debug, Clone)]
pub struct FungibleHandle {
    db: Lodestone,
    metadata: ClassMetadata,
    signer: Address,
}

impl FungibleHandle {
    pub(crate) fn new(db: Lodestone, metadata: ClassMetadata, signer: Address) -> Self {
        Self {
            db,
            metadata,
            signer,
        }
    }

    /// The class this handle operates on.
    pub fn class_id(&self) -> ClassId {
        self.metadata.class_id
    }

    /// Deterministic contract address of the wrapper instance.
    pub fn contract(&self) -> Address {
        self.metadata.contract
    }

    /// The slot the unified ledger tracks this class's supply under.
    pub fn global_id(&self) -> GlobalId {
        self.metadata.fungible_global_id()
    }

    /// The address commands are signed as.
    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Returns a handle acting as `signer` on the same class.
    pub fn with_signer(mut self, signer: Address) -> Self {
        self.signer = signer;
        self
    }

    /// Moves `amount` from the signer to `to`.
    pub fn transfer(&self, to: Address, amount: u128) -> Result<()> {
        self.db
            .submit(Command::transfer(self.signer, self.metadata.class_id, to, amount))?;
        Ok(())
    }

    /// Authorizes `spender` to move up to `amount` of the signer's
    /// balance. Overwrites any earlier allowance; zero revokes.
    pub fn approve(&self, spender: Address, amount: u128) -> Result<()> {
        self.db.submit(Command::approve(
            self.signer,
            self.metadata.class_id,
            spender,
            amount,
        ))?;
        Ok(())
    }

    /// Moves `amount` from `from` to `to` against the signer's
    /// allowance, consuming it.
    pub fn transfer_from(&self, from: Address, to: Address, amount: u128) -> Result<()> {
        self.db.submit(Command::transfer_from(
            self.signer,
            self.metadata.class_id,
            from,
            to,
            amount,
        ))?;
        Ok(())
    }

    /// Destroys `amount` of the signer's balance, shrinking supply.
    pub fn burn(&self, amount: u128) -> Result<()> {
        self.db
            .submit(Command::burn(self.signer, self.metadata.class_id, amount))?;
        Ok(())
    }

    /// Balance of `owner` as the wrapper's own table reports it.
    pub fn balance_of(&self, owner: Address) -> Result<u128> {
        self.read(|w| w.balance_of(owner))
    }

    /// Remaining allowance from `owner` to `spender`.
    pub fn allowance(&self, owner: Address, spender: Address) -> Result<u128> {
        self.read(|w| w.allowance(owner, spender))
    }

    /// Total minted supply, shrunk by burns.
    pub fn total_supply(&self) -> Result<u128> {
        self.read(|w| w.total_supply())
    }

    /// Human-readable class name.
    pub fn name(&self) -> Result<String> {
        self.read(|w| w.name().to_string())
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> Result<String> {
        self.read(|w| w.symbol().to_string())
    }

    /// The same balance as [`Self::balance_of`], read from the unified
    /// ledger instead of the wrapper. The two agree between commands.
    pub fn mirrored_balance_of(&self, owner: Address) -> Result<u128> {
        self.db.balance_of(owner, self.global_id())
    }

    fn read<R>(&self, f: impl FnOnce(&FungibleWrapper) -> R) -> Result<R> {
        let inner = self
            .db
            .inner()
            .read()
            .map_err(|_| LodestoneError::internal("lock poisoned"))?;
        let wrapper = inner
            .kernel_state
            .wrapper(&self.metadata.class_id)
            .and_then(Wrapper::as_fungible)
            .ok_or_else(|| {
                LodestoneError::internal("fungible wrapper missing for deployed class")
            })?;
        Ok(f(wrapper))
    }
}

// ============================================================================
// Unique items
// ============================================================================

/// Handle for one deployed unique-item class.
#[derive(Debug, Clone)]
pub struct UniqueItemHandle {
    db: Lodestone,
    metadata: ClassMetadata,
    signer: Address,
}

impl UniqueItemHandle {
    pub(crate) fn new(db: Lodestone, metadata: ClassMetadata, signer: Address) -> Self {
        Self {
            db,
            metadata,
            signer,
        }
    }

    /// The class this handle operates on.
    pub fn class_id(&self) -> ClassId {
        self.metadata.class_id
    }

    /// Deterministic contract address of the wrapper instance.
    pub fn contract(&self) -> Address {
        self.metadata.contract
    }

    /// The address commands are signed as.
    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Returns a handle acting as `signer` on the same class.
    pub fn with_signer(mut self, signer: Address) -> Self {
        self.signer = signer;
        self
    }

    /// Mints a fresh item to `to` and returns its allocated id.
    ///
    /// Ids are sequential from zero within the class.
    pub fn mint(&self, to: Address) -> Result<LocalId> {
        let effects =
            self.db
                .submit(Command::mint_unique_item(self.signer, self.metadata.class_id, to))?;
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::TokenTransfer(record) => Some(record.local_id),
                _ => None,
            })
            .ok_or_else(|| LodestoneError::internal("mint produced no transfer record"))
    }

    /// Moves item `local_id` from the signer to `to`. The signer must
    /// own the item.
    pub fn transfer(&self, to: Address, local_id: LocalId) -> Result<()> {
        self.db.submit(Command::transfer_unique_item(
            self.signer,
            self.metadata.class_id,
            self.signer,
            to,
            local_id,
        ))?;
        Ok(())
    }

    /// Current owner of item `local_id`, if minted.
    pub fn owner_of(&self, local_id: LocalId) -> Result<Option<Address>> {
        self.read(|w| w.owner_of(local_id))
    }

    /// Number of items `owner` holds.
    pub fn balance_of(&self, owner: Address) -> Result<u128> {
        self.read(|w| w.balance_of(owner))
    }

    /// Number of items minted so far.
    pub fn minted_count(&self) -> Result<usize> {
        self.read(|w| w.minted_count())
    }

    /// Human-readable class name.
    pub fn name(&self) -> Result<String> {
        self.read(|w| w.name().to_string())
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> Result<String> {
        self.read(|w| w.symbol().to_string())
    }

    /// Unified-ledger view of item ownership: 1 at the owner's slot,
    /// 0 everywhere else.
    pub fn mirrored_balance_of(&self, owner: Address, local_id: LocalId) -> Result<u128> {
        self.db
            .balance_of(owner, GlobalId::from_parts(self.metadata.class_id, local_id))
    }

    fn read<R>(&self, f: impl FnOnce(&UniqueWrapper) -> R) -> Result<R> {
        let inner = self
            .db
            .inner()
            .read()
            .map_err(|_| LodestoneError::internal("lock poisoned"))?;
        let wrapper = inner
            .kernel_state
            .wrapper(&self.metadata.class_id)
            .and_then(Wrapper::as_unique)
            .ok_or_else(|| {
                LodestoneError::internal("unique-item wrapper missing for deployed class")
            })?;
        Ok(f(wrapper))
    }
}

// ============================================================================
// Multi items
// ============================================================================

/// Handle for one deployed multi-item class.
#[derive(Clone)]
pub struct MultiItemHandle {
    db: Lodestone,
    metadata: ClassMetadata,
    signer: Address,
}

impl MultiItemHandle {
    pub(crate) fn new(db: Lodestone, metadata: ClassMetadata, signer: Address) -> Self {
        Self {
            db,
            metadata,
            signer,
        }
    }

    /// The class this handle operates on.
    pub fn class_id(&self) -> ClassId {
        self.metadata.class_id
    }

    /// Deterministic contract address of the wrapper instance.
    pub fn contract(&self) -> Address {
        self.metadata.contract
    }

    /// The address commands are signed as.
    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Returns a handle acting as `signer` on the same class.
    pub fn with_signer(mut self, signer: Address) -> Self {
        self.signer = signer;
        self
    }

    /// Mints `amount` copies of item `local_id` to `to`.
    pub fn mint(&self, to: Address, local_id: LocalId, amount: u128) -> Result<()> {
        self.db.submit(Command::mint_multi_item(
            self.signer,
            self.metadata.class_id,
            to,
            local_id,
            amount,
        ))?;
        Ok(())
    }

    /// Moves `amount` copies of item `local_id` from the signer to `to`.
    pub fn transfer(&self, to: Address, local_id: LocalId, amount: u128) -> Result<()> {
        self.transfer_with_data(to, local_id, amount, Bytes::new())
    }

    /// Like [`Self::transfer`], with an opaque payload carried on the
    /// emitted transfer record.
    pub fn transfer_with_data(
        &self,
        to: Address,
        local_id: LocalId,
        amount: u128,
        data: Bytes,
    ) -> Result<()> {
        self.db.submit(Command::transfer_multi_item(
            self.signer,
            self.metadata.class_id,
            self.signer,
            to,
            local_id,
            amount,
            data,
        ))?;
        Ok(())
    }

    /// Moves several items from the signer to `to` in one command.
    ///
    /// `local_ids` and `amounts` pair up positionally. The whole batch
    /// commits or none of it does.
    pub fn batch_transfer(
        &self,
        to: Address,
        local_ids: Vec<LocalId>,
        amounts: Vec<u128>,
    ) -> Result<()> {
        self.db.submit(Command::batch_transfer_multi_item(
            self.signer,
            self.metadata.class_id,
            self.signer,
            to,
            local_ids,
            amounts,
            Bytes::new(),
        ))?;
        Ok(())
    }

    /// Destroys `amount` copies of item `local_id` from the signer.
    pub fn burn(&self, local_id: LocalId, amount: u128) -> Result<()> {
        self.db.submit(Command::burn_multi_item(
            self.signer,
            self.metadata.class_id,
            self.signer,
            local_id,
            amount,
        ))?;
        Ok(())
    }

    /// Balance of `owner` at item `local_id` in the wrapper's table.
    pub fn balance_of(&self, owner: Address, local_id: LocalId) -> Result<u128> {
        self.read(|w| w.balance_of(owner, local_id))
    }

    /// Metadata URI template shared by every item in the class.
    pub fn uri(&self) -> Result<String> {
        self.read(|w| w.uri().to_string())
    }

    /// The same balance as [`Self::balance_of`], read from the unified
    /// ledger instead of the wrapper.
    pub fn mirrored_balance_of(&self, owner: Address, local_id: LocalId) -> Result<u128> {
        self.db
            .balance_of(owner, GlobalId::from_parts(self.metadata.class_id, local_id))
    }

    fn read<R>(&self, f: impl FnOnce(&MultiWrapper) -> R) -> Result<R> {
        let inner = self
            .db
            .inner()
            .read()
            .map_err(|_| LodestoneError::internal("lock poisoned"))?;
        let wrapper = inner
            .kernel_state
            .wrapper(&self.metadata.class_id)
            .and_then(Wrapper::as_multi)
            .ok_or_else(|| {
                LodestoneError::internal("multi-item wrapper missing for deployed class")
            })?;
        Ok(f(wrapper))
    }
}
