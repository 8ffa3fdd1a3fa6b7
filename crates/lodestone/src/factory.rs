//! Main entry point for the Lodestone token factory.
//!
//! [`Lodestone`] owns the committed kernel state behind an `RwLock` and
//! feeds every write through the pure kernel. The write path is one
//! shape: clone the committed state, apply the command, swap in the
//! result, record the effects. A rejected command never reaches the
//! swap, so callers observe either the full outcome of a command or
//! none of it.

use std::sync::{Arc, RwLock};

use lodestone_kernel::{Command, Effect, KernelError, State as KernelState, apply_committed};
use lodestone_types::{Address, ClassId, ClassMetadata, Delta, GlobalId, LocalId, TokenKind};

use crate::error::{LodestoneError, Result};
use crate::handles::{FungibleHandle, MultiItemHandle, UniqueItemHandle};

/// Configuration for opening a factory.
#[derive(Debug, Clone)]
pub struct LodestoneConfig {
    /// Whether `BalanceMirrored` effects are kept in the recorded event
    /// log. Registrations, transfers, and approvals are always kept.
    /// Mirroring itself is unconditional; this only controls the log.
    pub mirror_events: bool,
}

impl LodestoneConfig {
    /// Creates the default configuration: mirror events are recorded.
    pub fn new() -> Self {
        Self {
            mirror_events: true,
        }
    }

    /// Sets whether `BalanceMirrored` effects are recorded.
    pub fn with_mirror_events(mut self, enabled: bool) -> Self {
        self.mirror_events = enabled;
        self
    }
}

impl Default for LodestoneConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared factory internals: the committed kernel state plus the
/// recorded event log.
#[derive(Debug)]
pub(crate) struct LodestoneInner {
    /// The committed state. Replaced wholesale on every accepted
    /// command, never mutated in place.
    pub(crate) kernel_state: KernelState,
    /// Effects of every accepted command, in commit order.
    pub(crate) events: Vec<Effect>,
    config: LodestoneConfig,
}

impl LodestoneInner {
    /// Appends the effects of an accepted command to the event log.
    fn record_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::ClassRegistered(metadata) => {
                    tracing::debug!(?metadata, "class registered");
                }
                Effect::TokenTransfer(record) => {
                    tracing::debug!(?record, "token transfer");
                }
                Effect::ApprovalGranted(record) => {
                    tracing::debug!(?record, "approval granted");
                }
                Effect::BalanceMirrored {
                    owner,
                    global_id,
                    new_balance,
                } => {
                    tracing::debug!(
                        ?owner,
                        %global_id,
                        new_balance = *new_balance,
                        "balance mirrored"
                    );
                    if !self.config.mirror_events {
                        continue;
                    }
                }
            }
            self.events.push(effect.clone());
        }
    }
}

/// The monolithic token factory.
///
/// One value of this type is the whole deployment: the class registry,
/// every wrapper instance, and the unified multi-asset ledger, all kept
/// consistent with each other inside every command. Clones share the
/// same underlying state.
///
/// # Example
///
/// ```
/// use lodestone::{Address, Lodestone};
///
/// let factory = Lodestone::new();
/// let deployer = Address::from_bytes([0xA1; 32]);
///
/// let gold = factory
///     .deploy_fungible(deployer, "Gold", "GLD", 1_000)
///     .unwrap();
/// assert_eq!(gold.balance_of(deployer).unwrap(), 1_000);
/// assert_eq!(gold.mirrored_balance_of(deployer).unwrap(), 1_000);
/// ```
#[derive(Debug, Clone)]
pub struct Lodestone {
    inner: Arc<RwLock<LodestoneInner>>,
}

impl Lodestone {
    /// Creates an empty factory with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LodestoneConfig::new())
    }

    /// Creates an empty factory with the given configuration.
    pub fn with_config(config: LodestoneConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(LodestoneInner {
                kernel_state: KernelState::new(),
                events: Vec::new(),
                config,
            })),
        }
    }

    /// Submits a command to the kernel and returns its effects.
    ///
    /// This is the single write path. The committed state is replaced
    /// only when the kernel accepts the whole command, so a rejection
    /// leaves no observable change, including halfway through a batch.
    pub fn submit(&self, command: Command) -> Result<Vec<Effect>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| LodestoneError::internal("lock poisoned"))?;

        // Apply the command to the kernel (pure)
        let (new_state, effects) = apply_committed(inner.kernel_state.clone(), command)?;

        // Commit the replacement state
        inner.kernel_state = new_state;

        // Record the effects (impure)
        inner.record_effects(&effects);

        Ok(effects)
    }

    // ========================================================================
    // Deployment
    // ========================================================================

    /// Deploys a fungible class and seeds `initial_supply` to `deployer`.
    ///
    /// Registration and the seed mint commit together. The returned
    /// handle signs as `deployer`.
    pub fn deploy_fungible(
        &self,
        deployer: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        initial_supply: u128,
    ) -> Result<FungibleHandle> {
        let effects = self.submit(Command::deploy_fungible(
            deployer,
            name,
            symbol,
            initial_supply,
        ))?;
        let metadata = registered_metadata(&effects)?;
        Ok(FungibleHandle::new(self.clone(), metadata, deployer))
    }

    /// Deploys a unique-item class with an empty item table.
    pub fn deploy_unique_item(
        &self,
        deployer: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Result<UniqueItemHandle> {
        let effects = self.submit(Command::deploy_unique_item(deployer, name, symbol))?;
        let metadata = registered_metadata(&effects)?;
        Ok(UniqueItemHandle::new(self.clone(), metadata, deployer))
    }

    /// Deploys a multi-item class with the given metadata URI template.
    pub fn deploy_multi_item(
        &self,
        deployer: Address,
        uri: impl Into<String>,
    ) -> Result<MultiItemHandle> {
        let effects = self.submit(Command::deploy_multi_item(deployer, uri))?;
        let metadata = registered_metadata(&effects)?;
        Ok(MultiItemHandle::new(self.clone(), metadata, deployer))
    }

    // ========================================================================
    // Handle attachment
    // ========================================================================

    /// Returns a handle for an already deployed fungible class, signing
    /// as `signer`.
    pub fn fungible(&self, class_id: ClassId, signer: Address) -> Result<FungibleHandle> {
        let metadata = self.class_metadata(class_id, TokenKind::Fungible)?;
        Ok(FungibleHandle::new(self.clone(), metadata, signer))
    }

    /// Returns a handle for an already deployed unique-item class.
    pub fn unique_item(&self, class_id: ClassId, signer: Address) -> Result<UniqueItemHandle> {
        let metadata = self.class_metadata(class_id, TokenKind::UniqueItem)?;
        Ok(UniqueItemHandle::new(self.clone(), metadata, signer))
    }

    /// Returns a handle for an already deployed multi-item class.
    pub fn multi_item(&self, class_id: ClassId, signer: Address) -> Result<MultiItemHandle> {
        let metadata = self.class_metadata(class_id, TokenKind::MultiItem)?;
        Ok(MultiItemHandle::new(self.clone(), metadata, signer))
    }

    fn class_metadata(&self, class_id: ClassId, expected: TokenKind) -> Result<ClassMetadata> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LodestoneError::internal("lock poisoned"))?;
        let metadata = inner
            .kernel_state
            .registry()
            .class(&class_id)
            .copied()
            .ok_or(KernelError::UnknownClass(class_id))?;
        if metadata.kind != expected {
            return Err(KernelError::KindMismatch {
                class_id,
                expected,
                actual: metadata.kind,
            }
            .into());
        }
        Ok(metadata)
    }

    // ========================================================================
    // Unified ledger reads
    // ========================================================================

    /// Unified balance of `owner` at `global_id`, across every class.
    ///
    /// Total over the whole id space: unknown owners and ids read as 0.
    pub fn balance_of(&self, owner: Address, global_id: GlobalId) -> Result<u128> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LodestoneError::internal("lock poisoned"))?;
        Ok(inner.kernel_state.balance_of(owner, global_id))
    }

    /// Registration record of `class_id`, if that class was deployed.
    pub fn class(&self, class_id: ClassId) -> Result<Option<ClassMetadata>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LodestoneError::internal("lock poisoned"))?;
        Ok(inner.kernel_state.registry().class(&class_id).copied())
    }

    /// Registration record of the class deployed at `contract`, if any.
    pub fn class_by_contract(&self, contract: Address) -> Result<Option<ClassMetadata>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LodestoneError::internal("lock poisoned"))?;
        Ok(inner
            .kernel_state
            .registry()
            .class_by_contract(contract)
            .copied())
    }

    /// Snapshot of every registration record, in class id order.
    pub fn classes(&self) -> Result<Vec<ClassMetadata>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LodestoneError::internal("lock poisoned"))?;
        Ok(inner.kernel_state.registry().iter().copied().collect())
    }

    /// Number of deployed classes.
    pub fn class_count(&self) -> Result<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LodestoneError::internal("lock poisoned"))?;
        Ok(inner.kernel_state.class_count())
    }

    /// Snapshot of the recorded event log, in commit order.
    pub fn events(&self) -> Result<Vec<Effect>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LodestoneError::internal("lock poisoned"))?;
        Ok(inner.events.clone())
    }

    /// Deterministic hash of the committed state.
    pub fn state_hash(&self) -> Result<[u8; 32]> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LodestoneError::internal("lock poisoned"))?;
        Ok(inner.kernel_state.compute_state_hash())
    }

    // ========================================================================
    // Raw mirroring entry point
    // ========================================================================

    /// Applies a balance delta to the unified ledger directly.
    ///
    /// `caller` must be the registered contract address of `class_id`;
    /// anything else is rejected without touching the ledger. Wrapper
    /// operations mirror through the kernel on their own, so this is
    /// only for embedders driving the notification protocol themselves.
    pub fn notify_balance_change(
        &self,
        caller: Address,
        class_id: ClassId,
        local_id: LocalId,
        owner: Address,
        delta: Delta,
    ) -> Result<()> {
        self.submit(Command::notify_balance_change(
            caller, class_id, local_id, owner, delta,
        ))?;
        Ok(())
    }

    /// Shared internals, for handles in this crate.
    pub(crate) fn inner(&self) -> &Arc<RwLock<LodestoneInner>> {
        &self.inner
    }
}

impl Default for Lodestone {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the registration record a deployment command must produce.
fn registered_metadata(effects: &[Effect]) -> Result<ClassMetadata> {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ClassRegistered(metadata) => Some(*metadata),
            _ => None,
        })
        .ok_or_else(|| LodestoneError::internal("deployment produced no registration record"))
}
