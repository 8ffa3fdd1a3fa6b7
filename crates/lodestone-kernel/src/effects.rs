//! Effects produced by the kernel.
//!
//! Effects represent observable outcomes the shell records after a
//! command is applied. The kernel is pure - it produces effects but never
//! records or logs them directly.

use lodestone_types::{Address, ApprovalRecord, ClassMetadata, GlobalId, TransferRecord};
use serde::{Deserialize, Serialize};

/// An effect to be executed by the shell.
///
/// Effects are produced by [`super::kernel::apply_committed`] and describe
/// the event surface of a committed command: deployment records,
/// transfer-style events from the wrapper's own address, and one mirror
/// event per applied ledger delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Persist the registration record of a newly deployed class.
    ClassRegistered(ClassMetadata),

    /// Transfer-style event emitted from the wrapper's own contract
    /// address (mint, transfer, or burn; see [`TransferRecord`]).
    TokenTransfer(TransferRecord),

    /// Allowance grant from a fungible wrapper.
    ApprovalGranted(ApprovalRecord),

    /// Unified-view observability event, one per applied mirror delta.
    BalanceMirrored {
        /// Account whose unified balance changed.
        owner: Address,
        /// The affected 256-bit slot.
        global_id: GlobalId,
        /// Balance at the slot after the delta was applied.
        new_balance: u128,
    },
}
