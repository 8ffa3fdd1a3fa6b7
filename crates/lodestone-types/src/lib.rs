//! # lodestone-types: Core types for `Lodestone`
//!
//! This crate contains shared types used across the `Lodestone` system:
//! - Asset identifiers ([`ClassId`], [`LocalId`], [`GlobalId`])
//! - Account addresses ([`Address`])
//! - Token class tags ([`TokenKind`])
//! - Balance deltas ([`Delta`], [`BalanceChange`])
//! - Registry and event records ([`ClassMetadata`], [`TransferRecord`],
//!   [`ApprovalRecord`])
//!
//! Everything here is plain data: no IO, no clocks, no global state.

use std::fmt::{Debug, Display};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

// ============================================================================
// Asset Identifiers - All Copy (16- and 32-byte values)
// ============================================================================

/// Identifier assigned to one deployed wrapper class at creation time.
///
/// Class ids are allocated sequentially starting from [`ClassId::FIRST`]
/// and are never reused or reassigned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ClassId(u128);

impl ClassId {
    /// The id the first deployed class receives.
    pub const FIRST: ClassId = ClassId(0);

    pub const fn new(id: u128) -> Self {
        Self(id)
    }

    /// Returns the id as a `u128`.
    pub const fn as_u128(&self) -> u128 {
        self.0
    }

    /// Id of the class deployed immediately after this one.
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for ClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for ClassId {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<ClassId> for u128 {
    fn from(id: ClassId) -> Self {
        id.0
    }
}

/// Identifier meaningful within one wrapper class's own namespace.
///
/// Unique-item and multi-item classes use it as the item/token id; fungible
/// classes track all supply under [`LocalId::FUNGIBLE`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct LocalId(u128);

impl LocalId {
    /// The single slot a fungible class occupies (local id 0 by convention).
    pub const FUNGIBLE: LocalId = LocalId(0);

    pub const fn new(id: u128) -> Self {
        Self(id)
    }

    /// Returns the id as a `u128`.
    pub const fn as_u128(&self) -> u128 {
        self.0
    }

    /// Id allocated immediately after this one (sequential mints).
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for LocalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for LocalId {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<LocalId> for u128 {
    fn from(id: LocalId) -> Self {
        id.0
    }
}

/// The single 256-bit key under which the unified ledger tracks a balance.
///
/// **Bit Layout**:
/// - Upper 128 bits: `class_id` (one slot per deployed class)
/// - Lower 128 bits: `local_id` (item id within the class; 0 for fungible)
///
/// Both halves are full `u128` newtypes, so the packing is injective by
/// construction: every `(class_id, local_id)` pair maps to exactly one
/// `GlobalId`, and decoding recovers both components exactly. Values that
/// would exceed 128 bits are unrepresentable.
///
/// The derived ordering compares the class half first and therefore matches
/// the numeric order of the packed 256-bit value.
///
/// # Examples
///
/// ```
/// # use lodestone_types::{ClassId, GlobalId, LocalId};
/// let id = GlobalId::from_parts(ClassId::new(7), LocalId::new(42));
/// assert_eq!(id.class_id(), ClassId::new(7));
/// assert_eq!(id.local_id(), LocalId::new(42));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct GlobalId {
    class: ClassId,
    local: LocalId,
}

impl GlobalId {
    /// Composes a global id from its class and local halves.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lodestone_types::{ClassId, GlobalId, LocalId};
    /// let id = GlobalId::from_parts(ClassId::new(5), LocalId::new(1));
    /// assert_eq!(id.to_be_bytes()[15], 5); // class half, big-endian
    /// assert_eq!(id.to_be_bytes()[31], 1); // local half, big-endian
    /// ```
    pub const fn from_parts(class: ClassId, local: LocalId) -> Self {
        Self { class, local }
    }

    /// The global id of a fungible class (local half fixed to 0).
    pub const fn fungible(class: ClassId) -> Self {
        Self::from_parts(class, LocalId::FUNGIBLE)
    }

    /// Extracts the class id (upper 128 bits).
    pub const fn class_id(&self) -> ClassId {
        self.class
    }

    /// Extracts the local id (lower 128 bits).
    pub const fn local_id(&self) -> LocalId {
        self.local
    }

    /// Canonical big-endian rendering of the packed 256-bit value.
    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&self.class.as_u128().to_be_bytes());
        bytes[16..].copy_from_slice(&self.local.as_u128().to_be_bytes());
        bytes
    }

    /// Splits a big-endian 256-bit value into its class and local halves.
    ///
    /// Total over the whole 32-byte domain; every input is a valid id.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut class = [0u8; 16];
        let mut local = [0u8; 16];
        class.copy_from_slice(&bytes[..16]);
        local.copy_from_slice(&bytes[16..]);
        Self {
            class: ClassId::new(u128::from_be_bytes(class)),
            local: LocalId::new(u128::from_be_bytes(local)),
        }
    }
}

impl Debug for GlobalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GlobalId(class={}, local={})",
            self.class.as_u128(),
            self.local.as_u128()
        )
    }
}

impl Display for GlobalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Full 256-bit hex form, matching how indexers render packed ids
        write!(
            f,
            "0x{:032x}{:032x}",
            self.class.as_u128(),
            self.local.as_u128()
        )
    }
}

// ============================================================================
// Account Addresses - Copy (fixed 32-byte value)
// ============================================================================

/// Length of account and contract addresses in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte account or contract address.
///
/// Addresses identify both external accounts (token owners, signers) and
/// deployed wrapper classes. The zero address is never a valid owner:
/// mints and transfers to it are rejected, which frees it to mark mint and
/// burn endpoints in [`TransferRecord`] following the standard token-event
/// convention.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The zero address (all zeros), used as the mint/burn endpoint marker.
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Creates an address from raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the address as a byte slice.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }

    /// Generates a fresh random address using the OS CSPRNG.
    ///
    /// Intended for embedders creating account fixtures. Deployed wrapper
    /// addresses are never random; the registry derives them
    /// deterministically from the class id.
    ///
    /// # Panics
    ///
    /// Panics if the OS CSPRNG fails, which indicates a catastrophic
    /// system error (e.g., no entropy source available).
    pub fn generate() -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        getrandom::fill(&mut bytes).expect("CSPRNG failure is catastrophic");
        Self(bytes)
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 bytes in hex for debugging without the full address
        write!(
            f,
            "Address({:02x}{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5], self.0[6], self.0[7]
        )
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Full hex representation for display
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<Address> for [u8; ADDRESS_LENGTH] {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================================================
// Token Kinds - Copy (small enum)
// ============================================================================

/// Tag identifying which of the three wrapper behaviors a class implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Interchangeable supply under a single local id (ERC20-style).
    Fungible,
    /// Discrete items, each owned by exactly one address (ERC721-style).
    UniqueItem,
    /// Per-owner quantities across many local ids (ERC1155-style).
    MultiItem,
}

impl TokenKind {
    /// Returns the single-byte discriminant for serialization and hashing.
    pub const fn as_byte(&self) -> u8 {
        match self {
            TokenKind::Fungible => 0,
            TokenKind::UniqueItem => 1,
            TokenKind::MultiItem => 2,
        }
    }

    /// Creates a `TokenKind` from its byte discriminant, or `None` if
    /// the byte is not one.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(TokenKind::Fungible),
            1 => Some(TokenKind::UniqueItem),
            2 => Some(TokenKind::MultiItem),
            _ => None,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Fungible => write!(f, "fungible"),
            TokenKind::UniqueItem => write!(f, "unique-item"),
            TokenKind::MultiItem => write!(f, "multi-item"),
        }
    }
}

// ============================================================================
// Balance Deltas - Copy (signed change reports)
// ============================================================================

/// Signed balance change reported by a wrapper to the unified ledger.
///
/// Magnitudes use the full `u128` range; the direction is carried by the
/// variant instead of a sign bit, so a credit of `u128::MAX` is
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Delta {
    /// Balance increases by the contained amount.
    Credit(u128),
    /// Balance decreases by the contained amount.
    Debit(u128),
}

impl Delta {
    /// Returns the unsigned magnitude of the change.
    pub const fn magnitude(&self) -> u128 {
        match self {
            Delta::Credit(amount) | Delta::Debit(amount) => *amount,
        }
    }

    /// Returns true if the delta increases the balance.
    pub const fn is_credit(&self) -> bool {
        matches!(self, Delta::Credit(_))
    }
}

impl Display for Delta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delta::Credit(amount) => write!(f, "+{amount}"),
            Delta::Debit(amount) => write!(f, "-{amount}"),
        }
    }
}

/// One owner's balance delta at one local id, as reported by a wrapper.
///
/// The change names only the slot within the wrapper's own namespace; the
/// reporting wrapper tags it with its class id and contract address when
/// handing it to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    /// Account whose balance changed.
    pub owner: Address,
    /// Slot within the reporting wrapper's namespace.
    pub local_id: LocalId,
    /// Direction and magnitude of the change.
    pub delta: Delta,
}

impl BalanceChange {
    /// A balance increase for `owner` at `local_id`.
    pub const fn credit(owner: Address, local_id: LocalId, amount: u128) -> Self {
        Self {
            owner,
            local_id,
            delta: Delta::Credit(amount),
        }
    }

    /// A balance decrease for `owner` at `local_id`.
    pub const fn debit(owner: Address, local_id: LocalId, amount: u128) -> Self {
        Self {
            owner,
            local_id,
            delta: Delta::Debit(amount),
        }
    }
}

// ============================================================================
// Registry and Event Records
// ============================================================================

/// Registration record created once per deployed class.
///
/// Written by the factory at deployment time and immutable thereafter;
/// deployed classes are permanent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMetadata {
    /// Sequentially allocated class id.
    pub class_id: ClassId,
    /// Which of the three wrapper behaviors the class implements.
    pub kind: TokenKind,
    /// Deterministically derived address of the wrapper instance.
    pub contract: Address,
}

impl ClassMetadata {
    pub fn new(class_id: ClassId, kind: TokenKind, contract: Address) -> Self {
        Self {
            class_id,
            kind,
            contract,
        }
    }

    /// The global id of this class's fungible slot.
    ///
    /// Meaningful only for [`TokenKind::Fungible`] classes; unique and
    /// multi-item classes spread across many local ids.
    pub const fn fungible_global_id(&self) -> GlobalId {
        GlobalId::fungible(self.class_id)
    }
}

/// Transfer-style event record tagged with the wrapper's own address.
///
/// `from == Address::ZERO` marks a mint and `to == Address::ZERO` marks a
/// burn, following the standard token event convention, so one record shape
/// covers mint, transfer, and burn for all three kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Address of the wrapper that executed the operation.
    pub contract: Address,
    /// Class the operation belongs to.
    pub class_id: ClassId,
    /// Account the balance moved from (zero for mints).
    pub from: Address,
    /// Account the balance moved to (zero for burns).
    pub to: Address,
    /// Slot within the wrapper's namespace (0 for fungible classes).
    pub local_id: LocalId,
    /// Quantity moved (always 1 for unique items).
    pub amount: u128,
    /// Opaque payload forwarded by multi-item transfers; empty otherwise.
    pub data: Bytes,
}

impl TransferRecord {
    /// The global id of the slot this record touched.
    pub const fn global_id(&self) -> GlobalId {
        GlobalId::from_parts(self.class_id, self.local_id)
    }

    /// Returns true if this record describes a mint.
    pub fn is_mint(&self) -> bool {
        self.from.is_zero()
    }

    /// Returns true if this record describes a burn.
    pub fn is_burn(&self) -> bool {
        self.to.is_zero()
    }
}

/// Allowance grant record for a fungible class.
///
/// Overwrite semantics: the recorded amount replaces any previous allowance
/// from `owner` to `spender`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// Address of the fungible wrapper that granted the allowance.
    pub contract: Address,
    /// Class the allowance belongs to.
    pub class_id: ClassId,
    /// Account whose balance the spender may draw from.
    pub owner: Address,
    /// Account allowed to spend.
    pub spender: Address,
    /// Replacement allowance amount.
    pub amount: u128,
}

#[cfg(test)]
mod tests;
