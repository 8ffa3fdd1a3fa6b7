//! Kani verification harnesses for the token-factory kernel
//!
//! This module contains bounded model checking proofs using Kani.
//! Each proof verifies a specific safety property of the kernel.
//!
//! # Verification Strategy
//!
//! - **Bounded verification**: Kani unrolls loops and checks all paths within bounds
//! - **Symbolic execution**: Uses SMT solvers (Z3) to prove properties for all inputs
//! - **Assertions**: Convert runtime assertions to compile-time proofs
//!
//! # Running Proofs
//!
//! ```bash
//! # Verify all proofs
//! cargo kani --package lodestone-kernel
//!
//! # Verify specific proof
//! cargo kani --harness verify_global_id_packing_round_trip
//! ```

#[cfg(kani)]
mod verification {
    use lodestone_types::{Address, ClassId, Delta, GlobalId, LocalId, TokenKind};

    use crate::command::Command;
    use crate::kernel::{KernelError, apply_committed};
    use crate::ledger::LedgerError;
    use crate::registry::derive_contract_address;
    use crate::state::State;
    use crate::wrapper::Wrapper;

    // -----------------------------------------------------------------------------
    // Identifier Codec Proofs
    // -----------------------------------------------------------------------------

    /// **Proof 1: Global id packing round-trips**
    ///
    /// **Property:** Any `(class, local)` pair survives packing and extraction
    ///
    /// **Proven:** `from_parts` followed by the accessors is the identity
    #[kani::proof]
    fn verify_global_id_packing_round_trip() {
        let class_raw: u128 = kani::any();
        let local_raw: u128 = kani::any();

        let global_id = GlobalId::from_parts(ClassId::new(class_raw), LocalId::new(local_raw));

        assert_eq!(global_id.class_id(), ClassId::new(class_raw));
        assert_eq!(global_id.local_id(), LocalId::new(local_raw));
    }

    /// **Proof 2: Global id packing is injective**
    ///
    /// **Property:** Distinct pairs never collide
    ///
    /// **Proven:** Equal global ids imply equal components
    #[kani::proof]
    fn verify_global_id_packing_injective() {
        let a_class: u128 = kani::any();
        let a_local: u128 = kani::any();
        let b_class: u128 = kani::any();
        let b_local: u128 = kani::any();

        let a = GlobalId::from_parts(ClassId::new(a_class), LocalId::new(a_local));
        let b = GlobalId::from_parts(ClassId::new(b_class), LocalId::new(b_local));

        if a == b {
            assert_eq!(a_class, b_class);
            assert_eq!(a_local, b_local);
        }
    }

    /// **Proof 3: Byte decoding is total**
    ///
    /// **Property:** Every 32-byte string decodes without panicking
    ///
    /// **Proven:** `from_be_bytes` round-trips through `to_be_bytes`
    #[kani::proof]
    fn verify_global_id_byte_codec_total() {
        let bytes: [u8; 32] = kani::any();

        let global_id = GlobalId::from_be_bytes(bytes);

        assert_eq!(global_id.to_be_bytes(), bytes);
    }

    // -----------------------------------------------------------------------------
    // Kernel State Machine Proofs
    // -----------------------------------------------------------------------------

    /// **Proof 4: Deployment seeds the declared supply**
    ///
    /// **Property:** After `DeployFungible`, the unified view holds the
    /// initial supply for the deployer
    ///
    /// **Proven:** Wrapper and ledger both report the supply
    #[kani::proof]
    fn verify_deploy_fungible_seeds_supply() {
        let supply: u128 = kani::any();
        kani::assume(supply < 1_000_000);

        let deployer = Address::from_bytes([1u8; 32]);
        let cmd = Command::deploy_fungible(deployer, "T", "T", supply);

        let result = apply_committed(State::new(), cmd);
        kani::assume(result.is_ok());
        let (state, effects) = result.unwrap();

        assert!(!effects.is_empty());
        let global_id = GlobalId::fungible(ClassId::FIRST);
        assert_eq!(state.balance_of(deployer, global_id), supply);

        let wrapper = state
            .wrapper(&ClassId::FIRST)
            .and_then(Wrapper::as_fungible)
            .unwrap();
        assert_eq!(wrapper.total_supply(), supply);
        assert_eq!(wrapper.balance_of(deployer), supply);
    }

    /// **Proof 5: Transfers never overdraw**
    ///
    /// **Property:** A transfer exceeding the sender's balance is rejected
    ///
    /// **Proven:** Overdraw returns `InsufficientBalance`
    #[kani::proof]
    fn verify_transfer_rejects_overdraw() {
        let supply: u128 = kani::any();
        let amount: u128 = kani::any();
        kani::assume(supply < 1_000);
        kani::assume(amount > supply);

        let deployer = Address::from_bytes([1u8; 32]);
        let receiver = Address::from_bytes([2u8; 32]);

        let result = apply_committed(
            State::new(),
            Command::deploy_fungible(deployer, "T", "T", supply),
        );
        kani::assume(result.is_ok());
        let (state, _) = result.unwrap();

        let result = apply_committed(
            state,
            Command::transfer(deployer, ClassId::FIRST, receiver, amount),
        );

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            KernelError::InsufficientBalance { .. }
        ));
    }

    /// **Proof 6: Mirroring preserves wrapper agreement**
    ///
    /// **Property:** After a successful transfer, the unified view equals
    /// the wrapper's table for both parties
    ///
    /// **Proven:** Ledger and wrapper report identical balances
    #[kani::proof]
    fn verify_mirror_matches_wrapper_after_transfer() {
        let supply: u128 = kani::any();
        let amount: u128 = kani::any();
        kani::assume(supply < 1_000);
        kani::assume(amount <= supply);

        let deployer = Address::from_bytes([1u8; 32]);
        let receiver = Address::from_bytes([2u8; 32]);

        let result = apply_committed(
            State::new(),
            Command::deploy_fungible(deployer, "T", "T", supply),
        );
        kani::assume(result.is_ok());
        let (state, _) = result.unwrap();

        let result = apply_committed(
            state,
            Command::transfer(deployer, ClassId::FIRST, receiver, amount),
        );
        kani::assume(result.is_ok());
        let (state, _) = result.unwrap();

        let wrapper = state
            .wrapper(&ClassId::FIRST)
            .and_then(Wrapper::as_fungible)
            .unwrap();
        let global_id = GlobalId::fungible(ClassId::FIRST);

        assert_eq!(
            wrapper.balance_of(deployer),
            state.balance_of(deployer, global_id)
        );
        assert_eq!(
            wrapper.balance_of(receiver),
            state.balance_of(receiver, global_id)
        );
    }

    /// **Proof 7: Unauthorized notifications never mutate**
    ///
    /// **Property:** A notification from any address other than the
    /// registered contract is rejected
    ///
    /// **Proven:** Wrong callers get `UnauthorizedNotifier` and the
    /// target slot stays untouched
    #[kani::proof]
    fn verify_unauthorized_notify_rejected() {
        let caller_bytes: [u8; 32] = kani::any();
        let caller = Address::from_bytes(caller_bytes);

        let deployer = Address::from_bytes([1u8; 32]);
        let result = apply_committed(
            State::new(),
            Command::deploy_fungible(deployer, "T", "T", 100),
        );
        kani::assume(result.is_ok());
        let (state, _) = result.unwrap();

        let contract = derive_contract_address(ClassId::FIRST, TokenKind::Fungible);
        kani::assume(caller != contract);

        let owner = Address::from_bytes([2u8; 32]);
        let result = apply_committed(
            state,
            Command::notify_balance_change(
                caller,
                ClassId::FIRST,
                LocalId::FUNGIBLE,
                owner,
                Delta::Credit(1),
            ),
        );

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            KernelError::Ledger(LedgerError::UnauthorizedNotifier { .. })
        ));
    }

    /// **Proof 8: Ledger debits never underflow**
    ///
    /// **Property:** An authorized debit larger than the tracked balance
    /// is an internal-consistency failure, not a wrapped subtraction
    ///
    /// **Proven:** Overdebit returns `BalanceUnderflow`
    #[kani::proof]
    fn verify_ledger_debit_underflow_rejected() {
        let debit: u128 = kani::any();
        kani::assume(debit > 0);

        let deployer = Address::from_bytes([1u8; 32]);
        let result = apply_committed(
            State::new(),
            Command::deploy_fungible(deployer, "T", "T", 0),
        );
        kani::assume(result.is_ok());
        let (state, _) = result.unwrap();

        let contract = derive_contract_address(ClassId::FIRST, TokenKind::Fungible);
        let owner = Address::from_bytes([2u8; 32]);

        let result = apply_committed(
            state,
            Command::notify_balance_change(
                contract,
                ClassId::FIRST,
                LocalId::FUNGIBLE,
                owner,
                Delta::Debit(debit),
            ),
        );

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            KernelError::Ledger(LedgerError::BalanceUnderflow { .. })
        ));
    }

    /// **Proof 9: Class ids are allocated sequentially**
    ///
    /// **Property:** Each deployment takes the next id
    ///
    /// **Proven:** Two deployments produce ids 0 and 1
    #[kani::proof]
    fn verify_class_ids_sequential() {
        let deployer = Address::from_bytes([1u8; 32]);

        let result = apply_committed(
            State::new(),
            Command::deploy_unique_item(deployer, "A", "A"),
        );
        kani::assume(result.is_ok());
        let (state, _) = result.unwrap();
        assert_eq!(state.registry().next_class_id(), ClassId::new(1));

        let result = apply_committed(state, Command::deploy_multi_item(deployer, "uri"));
        kani::assume(result.is_ok());
        let (state, _) = result.unwrap();

        assert!(state.class_exists(&ClassId::new(0)));
        assert!(state.class_exists(&ClassId::new(1)));
        assert_eq!(state.registry().next_class_id(), ClassId::new(2));
    }

    /// **Proof 10: Delta magnitude is direction-independent**
    ///
    /// **Property:** Credit and debit of the same amount report the same
    /// magnitude
    ///
    /// **Proven:** `magnitude` ignores the sign
    #[kani::proof]
    fn verify_delta_magnitude() {
        let amount: u128 = kani::any();

        assert_eq!(Delta::Credit(amount).magnitude(), amount);
        assert_eq!(Delta::Debit(amount).magnitude(), amount);
    }

    /// **Proof 11: Command enum size is reasonable**
    ///
    /// **Property:** Command variants fit in memory
    ///
    /// **Proven:** Size check passes
    #[kani::proof]
    fn verify_command_size_reasonable() {
        // Commands contain Vec and String fields; this guards against
        // accidentally adding huge inline payloads.
        let size = std::mem::size_of::<Command>();
        assert!(size < 1024);
    }
}
