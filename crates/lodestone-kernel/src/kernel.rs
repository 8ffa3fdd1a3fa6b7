//! The kernel - pure functional core of `Lodestone`.
//!
//! The kernel applies committed commands to produce new state and effects.
//! It is completely pure: no IO, no clocks, no randomness. This makes it
//! deterministic and easy to test.
//!
//! Every balance-affecting arm follows the same shape: validate, let the
//! wrapper mutate its own table and report [`BalanceChange`]s, then route
//! those reports through the unified ledger. A failure at any point
//! returns `Err`, the caller discards the working state, and neither the
//! wrapper table nor the ledger shows any partial result.
//!
//! # Example
//!
//! ```ignore
//! let state = State::new();
//! let cmd = Command::deploy_fungible(deployer, "Token", "TOK", 1_000);
//!
//! let (new_state, effects) = apply_committed(state, cmd)?;
//! // Shell records effects...
//! ```

use lodestone_types::{Address, BalanceChange, ClassId, GlobalId, LocalId, TokenKind};

use crate::command::Command;
use crate::effects::Effect;
use crate::fungible::FungibleWrapper;
use crate::ledger::LedgerError;
use crate::multi::MultiWrapper;
use crate::state::State;
use crate::unique::UniqueWrapper;
use crate::wrapper::Wrapper;

/// Applies a committed command to the state, producing new state and effects.
///
/// Takes ownership of state, returns new state. On `Err` the consumed
/// state is discarded and the caller keeps its own copy, so a failed
/// command never leaves a partial mutation observable.
#[allow(clippy::too_many_lines)]
pub fn apply_committed(state: State, cmd: Command) -> Result<(State, Vec<Effect>), KernelError> {
    let mut effects = Vec::new();

    match cmd {
        // ====================================================================
        // Deployment Commands
        // ====================================================================
        Command::DeployFungible {
            deployer,
            name,
            symbol,
            initial_supply,
        } => {
            ensure_nonzero_actor(deployer)?;

            let (state, metadata) = state.register_class(TokenKind::Fungible);
            let mut wrapper =
                FungibleWrapper::new(metadata.class_id, metadata.contract, name, symbol);

            // The initial supply is minted inside the same command, so
            // registration and first mint commit or fail together.
            let (changes, record) = wrapper.mint(deployer, initial_supply)?;

            let mut state = state.with_wrapper(metadata.class_id, Wrapper::Fungible(wrapper));
            effects.push(Effect::ClassRegistered(metadata));
            effects.push(Effect::TokenTransfer(record));
            mirror_changes(
                &mut state,
                metadata.class_id,
                metadata.contract,
                &changes,
                &mut effects,
            )?;

            // Postcondition: registration + mint event + one mirror per change
            assert_eq!(
                effects.len(),
                2 + changes.len(),
                "DeployFungible must produce registration, mint, and mirror effects, got {}",
                effects.len()
            );
            // Postcondition: the unified view carries the full initial supply
            debug_assert!(state.class_exists(&metadata.class_id));
            debug_assert_eq!(
                state.balance_of(deployer, metadata.fungible_global_id()),
                initial_supply
            );

            Ok((state, effects))
        }

        Command::DeployUniqueItem {
            deployer,
            name,
            symbol,
        } => {
            ensure_nonzero_actor(deployer)?;

            let (state, metadata) = state.register_class(TokenKind::UniqueItem);
            let wrapper = UniqueWrapper::new(metadata.class_id, metadata.contract, name, symbol);
            let state = state.with_wrapper(metadata.class_id, Wrapper::UniqueItem(wrapper));

            effects.push(Effect::ClassRegistered(metadata));

            // Postcondition: exactly 1 effect (registration; nothing minted yet)
            assert_eq!(
                effects.len(),
                1,
                "DeployUniqueItem must produce exactly 1 effect, got {}",
                effects.len()
            );
            debug_assert!(state.class_exists(&metadata.class_id));

            Ok((state, effects))
        }

        Command::DeployMultiItem { deployer, uri } => {
            ensure_nonzero_actor(deployer)?;

            let (state, metadata) = state.register_class(TokenKind::MultiItem);
            let wrapper = MultiWrapper::new(metadata.class_id, metadata.contract, uri);
            let state = state.with_wrapper(metadata.class_id, Wrapper::MultiItem(wrapper));

            effects.push(Effect::ClassRegistered(metadata));

            // Postcondition: exactly 1 effect (registration; nothing minted yet)
            assert_eq!(
                effects.len(),
                1,
                "DeployMultiItem must produce exactly 1 effect, got {}",
                effects.len()
            );
            debug_assert!(state.class_exists(&metadata.class_id));

            Ok((state, effects))
        }

        // ====================================================================
        // Fungible Commands
        // ====================================================================
        Command::Transfer {
            caller,
            class_id,
            to,
            amount,
        } => {
            ensure_nonzero_actor(caller)?;
            let mut state = state;

            let wrapper = state
                .wrapper_mut(&class_id)
                .ok_or(KernelError::UnknownClass(class_id))?;
            let reporter = wrapper.contract();
            let (changes, record) = wrapper.fungible_mut(class_id)?.transfer(caller, to, amount)?;

            effects.push(Effect::TokenTransfer(record));
            mirror_changes(&mut state, class_id, reporter, &changes, &mut effects)?;

            // Postcondition: transfer event + sender and receiver mirrors
            assert_eq!(
                effects.len(),
                3,
                "Transfer must produce exactly 3 effects, got {}",
                effects.len()
            );

            Ok((state, effects))
        }

        Command::Approve {
            caller,
            class_id,
            spender,
            amount,
        } => {
            ensure_nonzero_actor(caller)?;
            let mut state = state;

            let record = state
                .wrapper_mut(&class_id)
                .ok_or(KernelError::UnknownClass(class_id))?
                .fungible_mut(class_id)?
                .approve(caller, spender, amount)?;

            effects.push(Effect::ApprovalGranted(record));

            // Postcondition: exactly 1 effect (no balance moved, no mirror)
            debug_assert_eq!(effects.len(), 1);

            Ok((state, effects))
        }

        Command::TransferFrom {
            caller,
            class_id,
            from,
            to,
            amount,
        } => {
            ensure_nonzero_actor(caller)?;
            let mut state = state;

            let wrapper = state
                .wrapper_mut(&class_id)
                .ok_or(KernelError::UnknownClass(class_id))?;
            let reporter = wrapper.contract();
            let (changes, record) = wrapper
                .fungible_mut(class_id)?
                .transfer_from(caller, from, to, amount)?;

            effects.push(Effect::TokenTransfer(record));
            mirror_changes(&mut state, class_id, reporter, &changes, &mut effects)?;

            // Postcondition: transfer event + sender and receiver mirrors
            assert_eq!(
                effects.len(),
                3,
                "TransferFrom must produce exactly 3 effects, got {}",
                effects.len()
            );

            Ok((state, effects))
        }

        Command::Burn {
            caller,
            class_id,
            amount,
        } => {
            ensure_nonzero_actor(caller)?;
            let mut state = state;

            let wrapper = state
                .wrapper_mut(&class_id)
                .ok_or(KernelError::UnknownClass(class_id))?;
            let reporter = wrapper.contract();
            let (changes, record) = wrapper.fungible_mut(class_id)?.burn(caller, amount)?;

            effects.push(Effect::TokenTransfer(record));
            mirror_changes(&mut state, class_id, reporter, &changes, &mut effects)?;

            // Postcondition: burn event + one mirror for the burned owner
            assert_eq!(
                effects.len(),
                2,
                "Burn must produce exactly 2 effects, got {}",
                effects.len()
            );

            Ok((state, effects))
        }

        // ====================================================================
        // Unique-Item Commands
        // ====================================================================
        Command::MintUniqueItem {
            caller,
            class_id,
            to,
        } => {
            ensure_nonzero_actor(caller)?;
            let mut state = state;

            let wrapper = state
                .wrapper_mut(&class_id)
                .ok_or(KernelError::UnknownClass(class_id))?;
            let reporter = wrapper.contract();
            let (local_id, changes, record) = wrapper.unique_mut(class_id)?.mint(to)?;

            effects.push(Effect::TokenTransfer(record));
            mirror_changes(&mut state, class_id, reporter, &changes, &mut effects)?;

            // Postcondition: mint event + one mirror for the new owner
            assert_eq!(
                effects.len(),
                2,
                "MintUniqueItem must produce exactly 2 effects, got {}",
                effects.len()
            );
            // Postcondition: the minted item has exactly one unified owner
            debug_assert_eq!(
                state.balance_of(to, GlobalId::from_parts(class_id, local_id)),
                1
            );

            Ok((state, effects))
        }

        Command::TransferUniqueItem {
            caller,
            class_id,
            from,
            to,
            local_id,
        } => {
            ensure_nonzero_actor(caller)?;
            let mut state = state;

            let wrapper = state
                .wrapper_mut(&class_id)
                .ok_or(KernelError::UnknownClass(class_id))?;
            let reporter = wrapper.contract();
            let (changes, record) = wrapper
                .unique_mut(class_id)?
                .transfer(caller, from, to, local_id)?;

            effects.push(Effect::TokenTransfer(record));
            mirror_changes(&mut state, class_id, reporter, &changes, &mut effects)?;

            // Postcondition: transfer event + mirrors for both owners
            assert_eq!(
                effects.len(),
                3,
                "TransferUniqueItem must produce exactly 3 effects, got {}",
                effects.len()
            );
            // Postcondition: ownership moved whole (0 for sender, 1 for receiver)
            let global_id = GlobalId::from_parts(class_id, local_id);
            debug_assert_eq!(state.balance_of(from, global_id), 0);
            debug_assert_eq!(state.balance_of(to, global_id), 1);

            Ok((state, effects))
        }

        // ====================================================================
        // Multi-Item Commands
        // ====================================================================
        Command::MintMultiItem {
            caller,
            class_id,
            to,
            local_id,
            amount,
        } => {
            ensure_nonzero_actor(caller)?;
            let mut state = state;

            let wrapper = state
                .wrapper_mut(&class_id)
                .ok_or(KernelError::UnknownClass(class_id))?;
            let reporter = wrapper.contract();
            let (changes, record) = wrapper.multi_mut(class_id)?.mint(to, local_id, amount)?;

            effects.push(Effect::TokenTransfer(record));
            mirror_changes(&mut state, class_id, reporter, &changes, &mut effects)?;

            // Postcondition: mint event + one mirror for the receiver
            assert_eq!(
                effects.len(),
                2,
                "MintMultiItem must produce exactly 2 effects, got {}",
                effects.len()
            );

            Ok((state, effects))
        }

        Command::TransferMultiItem {
            caller,
            class_id,
            from,
            to,
            local_id,
            amount,
            data,
        } => {
            ensure_nonzero_actor(caller)?;
            let mut state = state;

            let wrapper = state
                .wrapper_mut(&class_id)
                .ok_or(KernelError::UnknownClass(class_id))?;
            let reporter = wrapper.contract();
            let (changes, record) = wrapper
                .multi_mut(class_id)?
                .transfer(caller, from, to, local_id, amount, data)?;

            effects.push(Effect::TokenTransfer(record));
            mirror_changes(&mut state, class_id, reporter, &changes, &mut effects)?;

            // Postcondition: transfer event + sender and receiver mirrors
            assert_eq!(
                effects.len(),
                3,
                "TransferMultiItem must produce exactly 3 effects, got {}",
                effects.len()
            );

            Ok((state, effects))
        }

        Command::BatchTransferMultiItem {
            caller,
            class_id,
            from,
            to,
            local_ids,
            amounts,
            data,
        } => {
            ensure_nonzero_actor(caller)?;
            let mut state = state;

            let wrapper = state
                .wrapper_mut(&class_id)
                .ok_or(KernelError::UnknownClass(class_id))?;
            let reporter = wrapper.contract();
            let (changes, records) = wrapper.multi_mut(class_id)?.batch_transfer(
                caller,
                from,
                to,
                &local_ids,
                &amounts,
                data,
            )?;

            for record in records {
                effects.push(Effect::TokenTransfer(record));
            }
            mirror_changes(&mut state, class_id, reporter, &changes, &mut effects)?;

            // Postcondition: per item, one transfer event and two mirrors
            assert_eq!(
                effects.len(),
                local_ids.len() * 3,
                "BatchTransferMultiItem must produce 3 effects per item, got {}",
                effects.len()
            );

            Ok((state, effects))
        }

        Command::BurnMultiItem {
            caller,
            class_id,
            from,
            local_id,
            amount,
        } => {
            ensure_nonzero_actor(caller)?;
            let mut state = state;

            let wrapper = state
                .wrapper_mut(&class_id)
                .ok_or(KernelError::UnknownClass(class_id))?;
            let reporter = wrapper.contract();
            let (changes, record) = wrapper
                .multi_mut(class_id)?
                .burn(caller, from, local_id, amount)?;

            effects.push(Effect::TokenTransfer(record));
            mirror_changes(&mut state, class_id, reporter, &changes, &mut effects)?;

            // Postcondition: burn event + one mirror for the burned owner
            assert_eq!(
                effects.len(),
                2,
                "BurnMultiItem must produce exactly 2 effects, got {}",
                effects.len()
            );

            Ok((state, effects))
        }

        // ====================================================================
        // Ledger Commands
        // ====================================================================
        Command::NotifyBalanceChange {
            caller,
            class_id,
            local_id,
            owner,
            delta,
        } => {
            let mut state = state;
            let change = BalanceChange {
                owner,
                local_id,
                delta,
            };

            let (registry, ledger) = state.notification_channel();
            let new_balance = ledger.notify_balance_change(registry, caller, class_id, &change)?;

            effects.push(Effect::BalanceMirrored {
                owner,
                global_id: GlobalId::from_parts(class_id, local_id),
                new_balance,
            });

            // Postcondition: exactly one mirror effect
            debug_assert_eq!(effects.len(), 1);

            Ok((state, effects))
        }
    }
}

/// Routes wrapper-reported deltas through the unified ledger.
///
/// The reporter address is authorized against the registry for every
/// change, and one [`Effect::BalanceMirrored`] is pushed per applied
/// delta.
///
/// Invariant: after each applied change, the unified balance equals the
/// reporting wrapper's own table for that owner and local id.
fn mirror_changes(
    state: &mut State,
    class_id: ClassId,
    reporter: Address,
    changes: &[BalanceChange],
    effects: &mut Vec<Effect>,
) -> Result<(), KernelError> {
    for change in changes {
        let (registry, ledger) = state.notification_channel();
        let new_balance = ledger.notify_balance_change(registry, reporter, class_id, change)?;

        effects.push(Effect::BalanceMirrored {
            owner: change.owner,
            global_id: GlobalId::from_parts(class_id, change.local_id),
            new_balance,
        });
    }

    // Invariant: once every reported change is applied, the unified view
    // equals the wrapper's own table for each touched slot. Mid-loop the
    // two may differ when an owner appears in several changes of one
    // command (self-transfers, repeated batch ids).
    #[cfg(debug_assertions)]
    for change in changes {
        let reported = state
            .wrapper(&class_id)
            .map(|wrapper| wrapper.reported_balance(change.owner, change.local_id));
        let mirrored =
            state.balance_of(change.owner, GlobalId::from_parts(class_id, change.local_id));
        debug_assert_eq!(
            reported,
            Some(mirrored),
            "unified ledger diverged from wrapper table"
        );
    }

    Ok(())
}

/// Rejects the zero address as an acting identity.
///
/// Transfer records use the zero address to mark mint and burn endpoints,
/// so no real account may hold it.
fn ensure_nonzero_actor(actor: Address) -> Result<(), KernelError> {
    if actor.is_zero() {
        return Err(KernelError::ZeroAddressActor);
    }
    Ok(())
}

/// Errors that can occur when applying commands to the kernel.
///
/// Validation variants mean the caller's input was rejected before any
/// mutation. [`KernelError::Ledger`] wraps the mirroring entry point's own
/// taxonomy (authorization and desynchronization failures).
#[derive(thiserror::Error, Debug)]
pub enum KernelError {
    // Actor errors
    #[error("the zero address cannot act as caller or deployer")]
    ZeroAddressActor,

    // Class errors
    #[error("class with id {0} is not registered")]
    UnknownClass(ClassId),

    #[error("class {class_id} is a {actual} class; operation requires {expected}")]
    KindMismatch {
        class_id: ClassId,
        expected: TokenKind,
        actual: TokenKind,
    },

    // Balance and allowance errors
    #[error(
        "insufficient balance for {owner} in class {class_id} at local id {local_id}: \
         have {balance}, need {required}"
    )]
    InsufficientBalance {
        class_id: ClassId,
        local_id: LocalId,
        owner: Address,
        balance: u128,
        required: u128,
    },

    #[error(
        "insufficient allowance from {owner} to {spender} in class {class_id}: \
         have {allowance}, need {required}"
    )]
    InsufficientAllowance {
        class_id: ClassId,
        owner: Address,
        spender: Address,
        allowance: u128,
        required: u128,
    },

    #[error("class {0}: transfer or mint to the zero address is rejected")]
    TransferToZeroAddress(ClassId),

    #[error("class {0}: approval for the zero address is rejected")]
    ApprovalForZeroAddress(ClassId),

    #[error("supply overflow in class {0}")]
    SupplyOverflow(ClassId),

    #[error("balance overflow for {owner} in class {class_id} at local id {local_id}")]
    BalanceOverflow {
        class_id: ClassId,
        local_id: LocalId,
        owner: Address,
    },

    // Item errors
    #[error("class {class_id} has no item with local id {local_id}")]
    UnknownItem { class_id: ClassId, local_id: LocalId },

    #[error("item {local_id} in class {class_id} is owned by {owner}, not {claimed}")]
    NotItemOwner {
        class_id: ClassId,
        local_id: LocalId,
        claimed: Address,
        owner: Address,
    },

    #[error("caller {caller} may not move tokens owned by {from} in class {class_id}")]
    OperatorNotAllowed {
        class_id: ClassId,
        caller: Address,
        from: Address,
    },

    // Batch errors
    #[error("batch arity mismatch: {ids} local ids against {amounts} amounts")]
    BatchArityMismatch { ids: usize, amounts: usize },

    // Mirroring errors
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
