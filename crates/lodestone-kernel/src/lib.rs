//! # lodestone-kernel: Functional core of `Lodestone`
//!
//! The kernel is the pure, deterministic heart of the token factory. It
//! receives committed commands and produces state changes plus effects to
//! record.
//!
//! ## Key Principles
//!
//! - **No IO**: The kernel never touches disk, network, or any external resource
//! - **No clocks**: Timestamps, if any, belong to the embedding shell
//! - **No randomness**: Same input always produces same output
//! - **Pure functions**: `apply_committed(state, command) -> (state, effects)`
//!
//! ## Architecture
//!
//! - [`command`]: Commands that can be submitted (`DeployFungible`, `Transfer`)
//! - [`effects`]: Effects for the shell to record (`ClassRegistered`, `BalanceMirrored`)
//! - [`state`]: In-memory kernel state (registry, wrappers, unified ledger)
//! - [`kernel`]: The `apply_committed` function that ties it all together
//!
//! The wrapper state machines live in [`fungible`], [`unique`], and
//! [`multi`]; [`ledger`] holds the unified multi-asset view every balance
//! change is mirrored into.
//!
//! ## Example
//!
//! ```ignore
//! use lodestone_kernel::{command::Command, kernel::apply_committed, state::State};
//!
//! let state = State::new();
//! let cmd = Command::deploy_fungible(deployer, "Gold", "GLD", 1_000_000);
//!
//! match apply_committed(state, cmd) {
//!     Ok((new_state, effects)) => {
//!         // Record effects via the shell...
//!     }
//!     Err(e) => {
//!         // Handle error; the previous state is still intact...
//!     }
//! }
//! ```

pub mod command;
pub mod effects;
pub mod fungible;
pub mod kernel;
pub mod ledger;
pub mod multi;
pub mod registry;
pub mod state;
pub mod state_hash;
pub mod unique;
pub mod wrapper;


// Kani verification harnesses for bounded model checking
#[cfg(kani)]
mod kani_proofs;

// Re-export commonly used items
pub use command::Command;
pub use effects::Effect;
pub use fungible::FungibleWrapper;
pub use kernel::{KernelError, apply_committed};
pub use ledger::{Ledger, LedgerError};
pub use multi::MultiWrapper;
pub use registry::{Registry, derive_contract_address};
pub use state::State;
pub use unique::UniqueWrapper;
pub use wrapper::Wrapper;
