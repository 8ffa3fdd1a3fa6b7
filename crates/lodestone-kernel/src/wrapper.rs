//! The closed set of wrapper behaviors.
//!
//! Exactly three kinds exist. Dispatch is a tagged enum rather than trait
//! objects: the set is closed, and the kernel needs concrete access to
//! each kind's operations.

use lodestone_types::{Address, ClassId, LocalId, TokenKind};
use serde::{Deserialize, Serialize};

use crate::fungible::FungibleWrapper;
use crate::kernel::KernelError;
use crate::multi::MultiWrapper;
use crate::unique::UniqueWrapper;

/// One deployed wrapper instance, owning its class's ground-truth tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wrapper {
    Fungible(FungibleWrapper),
    UniqueItem(UniqueWrapper),
    MultiItem(MultiWrapper),
}

impl Wrapper {
    /// Which of the three behaviors this instance implements.
    pub fn kind(&self) -> TokenKind {
        match self {
            Wrapper::Fungible(_) => TokenKind::Fungible,
            Wrapper::UniqueItem(_) => TokenKind::UniqueItem,
            Wrapper::MultiItem(_) => TokenKind::MultiItem,
        }
    }

    pub fn class_id(&self) -> ClassId {
        match self {
            Wrapper::Fungible(wrapper) => wrapper.class_id(),
            Wrapper::UniqueItem(wrapper) => wrapper.class_id(),
            Wrapper::MultiItem(wrapper) => wrapper.class_id(),
        }
    }

    /// The deterministic contract address this wrapper reports under.
    pub fn contract(&self) -> Address {
        match self {
            Wrapper::Fungible(wrapper) => wrapper.contract(),
            Wrapper::UniqueItem(wrapper) => wrapper.contract(),
            Wrapper::MultiItem(wrapper) => wrapper.contract(),
        }
    }

    /// Balance of `(owner, local_id)` as the wrapper's own table reports it.
    ///
    /// This is the ground truth the unified ledger must agree with at every
    /// point between committed commands.
    pub fn reported_balance(&self, owner: Address, local_id: LocalId) -> u128 {
        match self {
            Wrapper::Fungible(wrapper) => {
                if local_id == LocalId::FUNGIBLE {
                    wrapper.balance_of(owner)
                } else {
                    0
                }
            }
            Wrapper::UniqueItem(wrapper) => u128::from(wrapper.owner_of(local_id) == Some(owner)),
            Wrapper::MultiItem(wrapper) => wrapper.balance_of(owner, local_id),
        }
    }

    pub fn as_fungible(&self) -> Option<&FungibleWrapper> {
        match self {
            Wrapper::Fungible(wrapper) => Some(wrapper),
            _ => None,
        }
    }

    pub fn as_unique(&self) -> Option<&UniqueWrapper> {
        match self {
            Wrapper::UniqueItem(wrapper) => Some(wrapper),
            _ => None,
        }
    }

    pub fn as_multi(&self) -> Option<&MultiWrapper> {
        match self {
            Wrapper::MultiItem(wrapper) => Some(wrapper),
            _ => None,
        }
    }

    /// Mutable access for fungible operations, or a kind-mismatch error.
    pub(crate) fn fungible_mut(
        &mut self,
        class_id: ClassId,
    ) -> Result<&mut FungibleWrapper, KernelError> {
        match self {
            Wrapper::Fungible(wrapper) => Ok(wrapper),
            other => Err(KernelError::KindMismatch {
                class_id,
                expected: TokenKind::Fungible,
                actual: other.kind(),
            }),
        }
    }

    /// Mutable access for unique-item operations, or a kind-mismatch error.
    pub(crate) fn unique_mut(
        &mut self,
        class_id: ClassId,
    ) -> Result<&mut UniqueWrapper, KernelError> {
        match self {
            Wrapper::UniqueItem(wrapper) => Ok(wrapper),
            other => Err(KernelError::KindMismatch {
                class_id,
                expected: TokenKind::UniqueItem,
                actual: other.kind(),
            }),
        }
    }

    /// Mutable access for multi-item operations, or a kind-mismatch error.
    pub(crate) fn multi_mut(
        &mut self,
        class_id: ClassId,
    ) -> Result<&mut MultiWrapper, KernelError> {
        match self {
            Wrapper::MultiItem(wrapper) => Ok(wrapper),
            other => Err(KernelError::KindMismatch {
                class_id,
                expected: TokenKind::MultiItem,
                actual: other.kind(),
            }),
        }
    }

    /// Feeds this wrapper into a state hasher in deterministic order.
    pub(crate) fn hash_into(&self, hasher: &mut blake3::Hasher) {
        hasher.update(&[self.kind().as_byte()]);
        match self {
            Wrapper::Fungible(wrapper) => wrapper.hash_into(hasher),
            Wrapper::UniqueItem(wrapper) => wrapper.hash_into(hasher),
            Wrapper::MultiItem(wrapper) => wrapper.hash_into(hasher),
        }
    }
}
