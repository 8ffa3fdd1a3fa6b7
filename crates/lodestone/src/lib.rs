//! # Lodestone
//!
//! Monolithic token factory with a unified multi-asset ledger.
//!
//! Lodestone deploys token classes of three kinds (fungible, unique
//! item, multi item) and mirrors every balance change into one ledger
//! keyed by owner and 256-bit global id. This provides:
//!
//! - **One query for everything** - `balance_of(owner, global_id)` spans all classes
//! - **Synchronous mirroring** - The unified view updates inside the same command
//! - **Atomic commands** - A failed command leaves no change, batches included
//! - **Deterministic deployment** - Class ids and contract addresses are derived, not random
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Lodestone                           │
//! │  ┌──────────┐   ┌─────────────┐   ┌────────────────────────┐ │
//! │  │ Registry │ → │  Wrappers   │ → │     Unified Ledger     │ │
//! │  │ (deploy) │   │ (per class) │   │  (owner × global id)   │ │
//! │  └──────────┘   └─────────────┘   └────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use lodestone::{Address, Lodestone};
//!
//! // Open a factory
//! let factory = Lodestone::new();
//! let alice = Address::from_bytes([0xA1; 32]);
//! let bob = Address::from_bytes([0xB2; 32]);
//!
//! // Deploy a fungible class; the initial supply lands on the deployer
//! let gold = factory.deploy_fungible(alice, "Gold", "GLD", 1_000)?;
//!
//! // Move balance; the unified ledger mirrors it in the same command
//! gold.transfer(bob, 250)?;
//! assert_eq!(factory.balance_of(bob, gold.global_id())?, 250);
//!
//! // Deploy more classes; every balance lives in the same id space
//! let deed = factory.deploy_unique_item(alice, "Deed", "DEED")?;
//! let item = deed.mint(bob)?;
//! assert_eq!(deed.mirrored_balance_of(bob, item)?, 1);
//! ```
//!
//! # Modules
//!
//! - **SDK Layer**: [`Lodestone`], class handles - Main API
//! - **Kernel**: Pure state machine behind every command
//! - **Types**: Ids, addresses, and records shared across layers

mod error;
mod factory;
mod handles;

// SDK Layer - Main API
pub use error::{LodestoneError, Result};
pub use factory::{Lodestone, LodestoneConfig};
pub use handles::{FungibleHandle, MultiItemHandle, UniqueItemHandle};

// Re-export core types from lodestone-types
pub use lodestone_types::{
    Address, ApprovalRecord, BalanceChange, ClassId, ClassMetadata, Delta, GlobalId, LocalId,
    TokenKind, TransferRecord,
};

// Re-export kernel types
pub use lodestone_kernel::{Command, Effect, KernelError, State, apply_committed};

// Re-export the ledger for embedders driving mirroring directly
pub use lodestone_kernel::{Ledger, LedgerError};

// Re-export wrapper state and address derivation for advanced usage
pub use lodestone_kernel::{
    FungibleWrapper, MultiWrapper, Registry, UniqueWrapper, Wrapper, derive_contract_address,
};
