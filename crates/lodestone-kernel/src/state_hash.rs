//! Deterministic state hashing for kernel state.
//!
//! This module provides functionality to compute a cryptographic hash of the
//! entire kernel state. The hash is deterministic: same state → same hash.
//!
//! # Purpose
//!
//! State hashing enables:
//! - **Determinism validation**: Same command sequence → identical state hash
//! - **Atomicity checks**: A failed command leaves the hash untouched
//! - **Snapshot comparison**: Cheap equality without walking every table
//!
//! # Algorithm
//!
//! We use BLAKE3 for fast, secure hashing. The hash covers:
//! - The class registry (sorted by `ClassId`)
//! - Every wrapper's own tables (sorted by `ClassId`)
//! - The unified ledger (sorted by owner, then `GlobalId`)
//!
//! Order is critical for determinism - we use `BTreeMap`'s sorted iteration.
//! Collections are length-prefixed so adjacent fields cannot alias across
//! boundaries.

use blake3::Hasher;

use crate::state::State;

impl State {
    /// Computes a deterministic hash of the entire kernel state.
    ///
    /// # Determinism
    ///
    /// The hash is computed by hashing all state fields in a fixed order:
    /// 1. Registry entries + `next_class_id`
    /// 2. All wrappers (sorted by `ClassId`), each tagged with its kind
    /// 3. The unified ledger (sorted by owner, then `GlobalId`)
    ///
    /// `BTreeMap` iteration is sorted, ensuring determinism.
    ///
    /// # Returns
    ///
    /// A 32-byte BLAKE3 hash of the state.
    ///
    /// # Examples
    ///
    /// ```
    /// use lodestone_kernel::State;
    ///
    /// let state1 = State::new();
    /// let state2 = State::new();
    ///
    /// // Same state → same hash
    /// assert_eq!(state1.compute_state_hash(), state2.compute_state_hash());
    /// ```
    pub fn compute_state_hash(&self) -> [u8; 32] {
        let mut hasher = Hasher::new();

        self.registry().hash_into(&mut hasher);

        hasher.update(&(self.class_count() as u64).to_be_bytes());
        for (class_id, wrapper) in self.wrappers() {
            hasher.update(&class_id.as_u128().to_be_bytes());
            wrapper.hash_into(&mut hasher);
        }

        self.ledger().hash_into(&mut hasher);

        *hasher.finalize().as_bytes()
    }
}
