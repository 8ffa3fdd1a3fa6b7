//! Tests for core type definitions.

use bytes::Bytes;
use test_case::test_case;

use crate::{
    Address, BalanceChange, ClassId, ClassMetadata, Delta, GlobalId, LocalId, TokenKind,
    TransferRecord,
};

// =============================================================================
// Identifier Packing
// =============================================================================

#[test]
fn global_id_round_trips_components() {
    let id = GlobalId::from_parts(ClassId::new(7), LocalId::new(42));
    assert_eq!(id.class_id(), ClassId::new(7));
    assert_eq!(id.local_id(), LocalId::new(42));
}

#[test]
fn global_id_round_trips_extreme_components() {
    let id = GlobalId::from_parts(ClassId::new(u128::MAX), LocalId::new(u128::MAX));
    assert_eq!(id.class_id().as_u128(), u128::MAX);
    assert_eq!(id.local_id().as_u128(), u128::MAX);

    let id = GlobalId::from_parts(ClassId::new(0), LocalId::new(0));
    assert_eq!(id.class_id().as_u128(), 0);
    assert_eq!(id.local_id().as_u128(), 0);
}

#[test]
fn fungible_global_id_uses_local_zero() {
    let id = GlobalId::fungible(ClassId::new(3));
    assert_eq!(id.local_id(), LocalId::FUNGIBLE);
    assert_eq!(id.local_id().as_u128(), 0);
}

#[test]
fn global_id_byte_form_is_big_endian() {
    let id = GlobalId::from_parts(ClassId::new(5), LocalId::new(1));
    let bytes = id.to_be_bytes();
    assert_eq!(bytes[15], 5, "class id occupies the upper half");
    assert_eq!(bytes[31], 1, "local id occupies the lower half");
    let zeroes = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 15 && *i != 31)
        .all(|(_, b)| *b == 0);
    assert!(zeroes, "all other bytes are zero");
}

#[test]
fn global_id_byte_form_round_trips() {
    let id = GlobalId::from_parts(ClassId::new(9), LocalId::new(u128::MAX - 1));
    assert_eq!(GlobalId::from_be_bytes(id.to_be_bytes()), id);
}

#[test]
fn global_id_ordering_matches_packed_value() {
    // The class half dominates, exactly as in the numeric 256-bit order.
    let low_class = GlobalId::from_parts(ClassId::new(0), LocalId::new(u128::MAX));
    let high_class = GlobalId::from_parts(ClassId::new(1), LocalId::new(0));
    assert!(high_class > low_class);

    let low_local = GlobalId::from_parts(ClassId::new(1), LocalId::new(1));
    let high_local = GlobalId::from_parts(ClassId::new(1), LocalId::new(2));
    assert!(high_local > low_local);
}

#[test]
fn class_id_sequence_starts_at_zero() {
    assert_eq!(ClassId::FIRST.as_u128(), 0);
    assert_eq!(ClassId::FIRST.next(), ClassId::new(1));
    assert_eq!(ClassId::new(1).next(), ClassId::new(2));
}

#[test]
fn global_id_display_renders_256_bit_hex() {
    let id = GlobalId::from_parts(ClassId::new(1), LocalId::new(2));
    let rendered = id.to_string();
    assert_eq!(rendered.len(), 2 + 64, "0x prefix plus 64 hex digits");
    assert_eq!(
        rendered,
        "0x0000000000000000000000000000000100000000000000000000000000000002"
    );
}

#[test]
fn global_id_debug_shows_components() {
    let id = GlobalId::from_parts(ClassId::new(7), LocalId::new(42));
    assert_eq!(format!("{id:?}"), "GlobalId(class=7, local=42)");
}

// =============================================================================
// Addresses
// =============================================================================

#[test]
fn zero_address_is_default_and_zero() {
    assert!(Address::ZERO.is_zero());
    assert_eq!(Address::default(), Address::ZERO);
}

#[test]
fn generated_addresses_are_nonzero_and_distinct() {
    let a = Address::generate();
    let b = Address::generate();
    assert!(!a.is_zero());
    assert_ne!(a, b);
}

#[test]
fn address_display_is_full_hex() {
    let address = Address::from_bytes([0xab; 32]);
    assert_eq!(address.to_string(), "ab".repeat(32));
}

#[test]
fn address_debug_abbreviates() {
    let address = Address::from_bytes([0xab; 32]);
    assert_eq!(format!("{address:?}"), "Address(abababababababab...)");
}

#[test]
fn address_byte_round_trip() {
    let bytes = [0x42; 32];
    assert_eq!(*Address::from_bytes(bytes).as_bytes(), bytes);
}

// =============================================================================
// Token Kinds
// =============================================================================

#[test_case(TokenKind::Fungible; "fungible")]
#[test_case(TokenKind::UniqueItem; "unique item")]
#[test_case(TokenKind::MultiItem; "multi item")]
fn token_kind_byte_round_trips(kind: TokenKind) {
    assert_eq!(TokenKind::from_byte(kind.as_byte()), Some(kind));
}

#[test]
fn token_kind_rejects_unknown_discriminant() {
    assert_eq!(TokenKind::from_byte(3), None);
    assert_eq!(TokenKind::from_byte(u8::MAX), None);
}

#[test]
fn token_kind_display_names() {
    assert_eq!(TokenKind::Fungible.to_string(), "fungible");
    assert_eq!(TokenKind::UniqueItem.to_string(), "unique-item");
    assert_eq!(TokenKind::MultiItem.to_string(), "multi-item");
}

// =============================================================================
// Deltas and Records
// =============================================================================

#[test]
fn delta_display_carries_sign() {
    assert_eq!(Delta::Credit(5).to_string(), "+5");
    assert_eq!(Delta::Debit(5).to_string(), "-5");
}

#[test]
fn delta_magnitude_and_direction() {
    assert_eq!(Delta::Credit(u128::MAX).magnitude(), u128::MAX);
    assert_eq!(Delta::Debit(3).magnitude(), 3);
    assert!(Delta::Credit(0).is_credit());
    assert!(!Delta::Debit(0).is_credit());
}

#[test]
fn balance_change_constructors() {
    let owner = Address::from_bytes([1; 32]);
    let credit = BalanceChange::credit(owner, LocalId::new(4), 10);
    assert_eq!(credit.delta, Delta::Credit(10));
    assert_eq!(credit.local_id, LocalId::new(4));

    let debit = BalanceChange::debit(owner, LocalId::new(4), 10);
    assert_eq!(debit.delta, Delta::Debit(10));
    assert_eq!(debit.owner, owner);
}

#[test]
fn transfer_record_classifies_mint_and_burn() {
    let contract = Address::from_bytes([9; 32]);
    let owner = Address::from_bytes([1; 32]);

    let mint = TransferRecord {
        contract,
        class_id: ClassId::new(0),
        from: Address::ZERO,
        to: owner,
        local_id: LocalId::FUNGIBLE,
        amount: 100,
        data: Bytes::new(),
    };
    assert!(mint.is_mint());
    assert!(!mint.is_burn());

    let burn = TransferRecord {
        from: owner,
        to: Address::ZERO,
        ..mint.clone()
    };
    assert!(burn.is_burn());
    assert!(!burn.is_mint());
}

#[test]
fn transfer_record_global_id_matches_parts() {
    let record = TransferRecord {
        contract: Address::from_bytes([9; 32]),
        class_id: ClassId::new(2),
        from: Address::from_bytes([1; 32]),
        to: Address::from_bytes([2; 32]),
        local_id: LocalId::new(7),
        amount: 1,
        data: Bytes::new(),
    };
    assert_eq!(
        record.global_id(),
        GlobalId::from_parts(ClassId::new(2), LocalId::new(7))
    );
}

#[test]
fn class_metadata_fungible_global_id() {
    let metadata = ClassMetadata::new(
        ClassId::new(5),
        TokenKind::Fungible,
        Address::from_bytes([3; 32]),
    );
    assert_eq!(metadata.fungible_global_id(), GlobalId::fungible(ClassId::new(5)));
}

#[test]
fn transfer_record_survives_json() {
    let record = TransferRecord {
        contract: Address::from_bytes([9; 32]),
        class_id: ClassId::new(1),
        from: Address::ZERO,
        to: Address::from_bytes([1; 32]),
        local_id: LocalId::new(3),
        amount: 12,
        data: Bytes::from_static(b"payload"),
    };
    let json = serde_json::to_string(&record).unwrap();
    let decoded: TransferRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, record);
}

// =============================================================================
// Property-Based Tests
// =============================================================================

mod proptests {
    use proptest::prelude::*;

    use crate::{ClassId, GlobalId, LocalId};

    proptest! {
        /// Decoding always recovers the exact pair that was packed.
        #[test]
        fn global_id_round_trip_holds(class in any::<u128>(), local in any::<u128>()) {
            let id = GlobalId::from_parts(ClassId::new(class), LocalId::new(local));
            prop_assert_eq!(id.class_id().as_u128(), class);
            prop_assert_eq!(id.local_id().as_u128(), local);
        }

        /// Every 32-byte value is a valid id and survives the byte codec.
        #[test]
        fn global_id_byte_codec_is_total(bytes in any::<[u8; 32]>()) {
            prop_assert_eq!(GlobalId::from_be_bytes(bytes).to_be_bytes(), bytes);
        }

        /// Distinct pairs pack to distinct ids (injectivity).
        #[test]
        fn global_id_packing_is_injective(
            a in any::<(u128, u128)>(),
            b in any::<(u128, u128)>(),
        ) {
            let left = GlobalId::from_parts(ClassId::new(a.0), LocalId::new(a.1));
            let right = GlobalId::from_parts(ClassId::new(b.0), LocalId::new(b.1));
            prop_assert_eq!(left == right, a == b);
        }
    }
}
