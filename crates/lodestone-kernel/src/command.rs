//! Commands accepted by the kernel.
//!
//! A command carries everything `apply_committed` needs: the acting
//! address (`caller`/`deployer`) and the operation's arguments. Address
//! authenticity is the embedder's responsibility; the kernel enforces the
//! rules that follow from the addresses it is given.

use bytes::Bytes;
use lodestone_types::{Address, ClassId, Delta, LocalId};
use serde::{Deserialize, Serialize};

/// A committed command to apply to the kernel state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    // ========================================================================
    // Deployment Commands
    // ========================================================================
    /// Deploys a fungible class and mints `initial_supply` to the deployer.
    DeployFungible {
        deployer: Address,
        name: String,
        symbol: String,
        initial_supply: u128,
    },

    /// Deploys a unique-item class with an empty collection.
    DeployUniqueItem {
        deployer: Address,
        name: String,
        symbol: String,
    },

    /// Deploys a multi-item class with an empty table.
    DeployMultiItem { deployer: Address, uri: String },

    // ========================================================================
    // Fungible Commands
    // ========================================================================
    /// Moves `amount` from the caller to `to`.
    Transfer {
        caller: Address,
        class_id: ClassId,
        to: Address,
        amount: u128,
    },

    /// Sets the caller's allowance for `spender` (overwrite semantics).
    Approve {
        caller: Address,
        class_id: ClassId,
        spender: Address,
        amount: u128,
    },

    /// Moves `amount` from `from` to `to`, drawing on the caller's allowance.
    TransferFrom {
        caller: Address,
        class_id: ClassId,
        from: Address,
        to: Address,
        amount: u128,
    },

    /// Destroys `amount` of the caller's balance, shrinking supply.
    Burn {
        caller: Address,
        class_id: ClassId,
        amount: u128,
    },

    // ========================================================================
    // Unique-Item Commands
    // ========================================================================
    /// Mints the next sequential item to `to`.
    MintUniqueItem {
        caller: Address,
        class_id: ClassId,
        to: Address,
    },

    /// Reassigns ownership of one item. The caller must be `from`.
    TransferUniqueItem {
        caller: Address,
        class_id: ClassId,
        from: Address,
        to: Address,
        local_id: LocalId,
    },

    // ========================================================================
    // Multi-Item Commands
    // ========================================================================
    /// Mints `amount` of `local_id` to `to`.
    MintMultiItem {
        caller: Address,
        class_id: ClassId,
        to: Address,
        local_id: LocalId,
        amount: u128,
    },

    /// Moves `amount` of `local_id` from `from` to `to`. The caller must
    /// be `from`; `data` is carried opaquely to the event record.
    TransferMultiItem {
        caller: Address,
        class_id: ClassId,
        from: Address,
        to: Address,
        local_id: LocalId,
        amount: u128,
        data: Bytes,
    },

    /// Moves several local ids in one atomic operation.
    BatchTransferMultiItem {
        caller: Address,
        class_id: ClassId,
        from: Address,
        to: Address,
        local_ids: Vec<LocalId>,
        amounts: Vec<u128>,
        data: Bytes,
    },

    /// Destroys `amount` of `local_id` held by `from`. The caller must be
    /// `from`.
    BurnMultiItem {
        caller: Address,
        class_id: ClassId,
        from: Address,
        local_id: LocalId,
        amount: u128,
    },

    // ========================================================================
    // Ledger Commands
    // ========================================================================
    /// Raw mirror notification, honored only when `caller` is the wrapper
    /// address registered for `class_id`. This is the wire form of the
    /// wrapper-to-ledger callback.
    NotifyBalanceChange {
        caller: Address,
        class_id: ClassId,
        local_id: LocalId,
        owner: Address,
        delta: Delta,
    },
}

impl Command {
    /// Creates a `DeployFungible` command.
    pub fn deploy_fungible(
        deployer: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        initial_supply: u128,
    ) -> Self {
        Command::DeployFungible {
            deployer,
            name: name.into(),
            symbol: symbol.into(),
            initial_supply,
        }
    }

    /// Creates a `DeployUniqueItem` command.
    pub fn deploy_unique_item(
        deployer: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Command::DeployUniqueItem {
            deployer,
            name: name.into(),
            symbol: symbol.into(),
        }
    }

    /// Creates a `DeployMultiItem` command.
    pub fn deploy_multi_item(deployer: Address, uri: impl Into<String>) -> Self {
        Command::DeployMultiItem {
            deployer,
            uri: uri.into(),
        }
    }

    /// Creates a fungible `Transfer` command.
    pub fn transfer(caller: Address, class_id: ClassId, to: Address, amount: u128) -> Self {
        Command::Transfer {
            caller,
            class_id,
            to,
            amount,
        }
    }

    /// Creates an `Approve` command.
    pub fn approve(caller: Address, class_id: ClassId, spender: Address, amount: u128) -> Self {
        Command::Approve {
            caller,
            class_id,
            spender,
            amount,
        }
    }

    /// Creates a `TransferFrom` command.
    pub fn transfer_from(
        caller: Address,
        class_id: ClassId,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Self {
        Command::TransferFrom {
            caller,
            class_id,
            from,
            to,
            amount,
        }
    }

    /// Creates a fungible `Burn` command.
    pub fn burn(caller: Address, class_id: ClassId, amount: u128) -> Self {
        Command::Burn {
            caller,
            class_id,
            amount,
        }
    }

    /// Creates a `MintUniqueItem` command.
    pub fn mint_unique_item(caller: Address, class_id: ClassId, to: Address) -> Self {
        Command::MintUniqueItem {
            caller,
            class_id,
            to,
        }
    }

    /// Creates a `TransferUniqueItem` command.
    pub fn transfer_unique_item(
        caller: Address,
        class_id: ClassId,
        from: Address,
        to: Address,
        local_id: LocalId,
    ) -> Self {
        Command::TransferUniqueItem {
            caller,
            class_id,
            from,
            to,
            local_id,
        }
    }

    /// Creates a `MintMultiItem` command.
    pub fn mint_multi_item(
        caller: Address,
        class_id: ClassId,
        to: Address,
        local_id: LocalId,
        amount: u128,
    ) -> Self {
        Command::MintMultiItem {
            caller,
            class_id,
            to,
            local_id,
            amount,
        }
    }

    /// Creates a `TransferMultiItem` command.
    pub fn transfer_multi_item(
        caller: Address,
        class_id: ClassId,
        from: Address,
        to: Address,
        local_id: LocalId,
        amount: u128,
        data: Bytes,
    ) -> Self {
        Command::TransferMultiItem {
            caller,
            class_id,
            from,
            to,
            local_id,
            amount,
            data,
        }
    }

    /// Creates a `BatchTransferMultiItem` command.
    pub fn batch_transfer_multi_item(
        caller: Address,
        class_id: ClassId,
        from: Address,
        to: Address,
        local_ids: Vec<LocalId>,
        amounts: Vec<u128>,
        data: Bytes,
    ) -> Self {
        Command::BatchTransferMultiItem {
            caller,
            class_id,
            from,
            to,
            local_ids,
            amounts,
            data,
        }
    }

    /// Creates a `BurnMultiItem` command.
    pub fn burn_multi_item(
        caller: Address,
        class_id: ClassId,
        from: Address,
        local_id: LocalId,
        amount: u128,
    ) -> Self {
        Command::BurnMultiItem {
            caller,
            class_id,
            from,
            local_id,
            amount,
        }
    }

    /// Creates a `NotifyBalanceChange` command.
    pub fn notify_balance_change(
        caller: Address,
        class_id: ClassId,
        local_id: LocalId,
        owner: Address,
        delta: Delta,
    ) -> Self {
        Command::NotifyBalanceChange {
            caller,
            class_id,
            local_id,
            owner,
            delta,
        }
    }
}
