//! Storage representations: the unsigned integers that carry serialized bits.
//!
//! A field of `n` bits is carried by the smallest type in the table below that holds `n` bits.
//! Widths above 128 bits fall back to [`BigUint`].
//!
//! | Bits       | Kind                    |
//! |------------|-------------------------|
//! | 1 to 8     | [`u8`]                  |
//! | 9 to 16    | [`u16`]                 |
//! | 17 to 32   | [`u32`]                 |
//! | 33 to 64   | [`u64`]                 |
//! | 65 to 128  | [`u128`]                |
//! | 129 and up | [`BigUint`]             |

use alloc::vec::Vec;
use core::fmt::Debug;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use paste::paste;

use crate::endian::{Endian, Endianness};
use crate::sealed::Sealed;

/// Names a row of the storage table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// [`u8`] storage.
    U8,
    /// [`u16`] storage.
    U16,
    /// [`u32`] storage.
    U32,
    /// [`u64`] storage.
    U64,
    /// [`u128`] storage.
    U128,
    /// [`BigUint`] storage.
    Big,
}

impl StorageKind {
    /// Selects the storage for a field of the given bit width.
    pub const fn for_bits(bits: usize) -> Self {
        match bits {
            0..=8 => Self::U8,
            9..=16 => Self::U16,
            17..=32 => Self::U32,
            33..=64 => Self::U64,
            65..=128 => Self::U128,
            _ => Self::Big,
        }
    }
}

/// An unsigned integer used as a storage representation.
///
/// Bit positions count from the least significant bit. Operations on positions beyond a native
/// type's width act as if the type were infinitely zero-extended.
///
/// This trait is sealed and implemented for [`u8`] through [`u128`] and [`BigUint`].
pub trait Storage: Clone + Debug + Eq + Sealed {
    /// The table row this type occupies.
    const KIND: StorageKind;

    /// Returns zero.
    fn zeroed() -> Self;

    /// Clears every bit at position `bits` and above.
    #[must_use]
    fn masked(self, bits: usize) -> Self;

    /// Shifts left by `n` bits, discarding bits shifted past a native type's width.
    #[must_use]
    fn shifted_left(self, n: usize) -> Self;

    /// Shifts right by `n` bits.
    #[must_use]
    fn shifted_right(self, n: usize) -> Self;

    /// Bitwise OR.
    #[must_use]
    fn merged(self, other: Self) -> Self;

    /// Tests the bit at position `n`.
    fn test_bit(&self, n: usize) -> bool;

    /// Sets or clears the bit at position `n`.
    fn assign_bit(&mut self, n: usize, value: bool);

    /// Decodes an unsigned integer from all of `bytes` in `E` byte order.
    ///
    /// Native types accept between one byte and their own size.
    fn load<E: Endianness>(bytes: &[u8]) -> Self;

    /// Encodes `self` into all of `out` in `E` byte order.
    ///
    /// The value must fit in `out`; native types panic otherwise.
    fn store<E: Endianness>(&self, out: &mut [u8]);

    /// Wraps `self` in the matching [`Repr`] variant.
    fn into_repr(self) -> Repr;

    /// Converts any [`Repr`] to this type, truncating high bits that do not fit.
    fn from_repr(repr: &Repr) -> Self;
}

macro_rules! impl_native_storage {
    ($($bits:literal),* $(,)?) => {
        paste! {
            $(
                impl Sealed for [<u $bits>] {}

                impl Storage for [<u $bits>] {
                    const KIND: StorageKind = StorageKind::[<U $bits>];

                    fn zeroed() -> Self {
                        0
                    }

                    fn masked(self, bits: usize) -> Self {
                        if bits >= $bits {
                            self
                        } else {
                            self & (((1 as Self) << bits) - 1)
                        }
                    }

                    fn shifted_left(self, n: usize) -> Self {
                        u32::try_from(n)
                            .ok()
                            .and_then(|n| self.checked_shl(n))
                            .unwrap_or(0)
                    }

                    fn shifted_right(self, n: usize) -> Self {
                        u32::try_from(n)
                            .ok()
                            .and_then(|n| self.checked_shr(n))
                            .unwrap_or(0)
                    }

                    fn merged(self, other: Self) -> Self {
                        self | other
                    }

                    fn test_bit(&self, n: usize) -> bool {
                        n < $bits && (*self >> n) & 1 == 1
                    }

                    fn assign_bit(&mut self, n: usize, value: bool) {
                        if n >= $bits {
                            return;
                        }
                        if value {
                            *self |= (1 as Self) << n;
                        } else {
                            *self &= !((1 as Self) << n);
                        }
                    }

                    fn load<E: Endianness>(bytes: &[u8]) -> Self {
                        E::read_uint128(bytes, bytes.len()) as Self
                    }

                    fn store<E: Endianness>(&self, out: &mut [u8]) {
                        let len = out.len();
                        E::write_uint128(out, *self as u128, len);
                    }

                    fn into_repr(self) -> Repr {
                        Repr::[<U $bits>](self)
                    }

                    fn from_repr(repr: &Repr) -> Self {
                        repr.low_u128() as Self
                    }
                }
            )*
        }
    };
}

impl_native_storage!(8, 16, 32, 64, 128);

impl Sealed for BigUint {}

impl Storage for BigUint {
    const KIND: StorageKind = StorageKind::Big;

    fn zeroed() -> Self {
        Zero::zero()
    }

    fn masked(self, bits: usize) -> Self {
        if self.bits() <= bits as u64 {
            self
        } else {
            self & ((BigUint::one() << bits) - 1u32)
        }
    }

    fn shifted_left(self, n: usize) -> Self {
        self << n
    }

    fn shifted_right(self, n: usize) -> Self {
        self >> n
    }

    fn merged(self, other: Self) -> Self {
        self | other
    }

    fn test_bit(&self, n: usize) -> bool {
        self.bit(n as u64)
    }

    fn assign_bit(&mut self, n: usize, value: bool) {
        self.set_bit(n as u64, value);
    }

    fn load<E: Endianness>(bytes: &[u8]) -> Self {
        match E::ENDIAN {
            Endian::Big => BigUint::from_bytes_be(bytes),
            Endian::Little => BigUint::from_bytes_le(bytes),
        }
    }

    fn store<E: Endianness>(&self, out: &mut [u8]) {
        out.fill(0);
        match E::ENDIAN {
            Endian::Big => {
                let bytes = self.to_bytes_be();
                let n = bytes.len().min(out.len());
                let start = out.len() - n;
                out[start..].copy_from_slice(&bytes[bytes.len() - n..]);
            }
            Endian::Little => {
                let bytes = self.to_bytes_le();
                let n = bytes.len().min(out.len());
                out[..n].copy_from_slice(&bytes[..n]);
            }
        }
    }

    fn into_repr(self) -> Repr {
        Repr::Big(self)
    }

    fn from_repr(repr: &Repr) -> Self {
        repr.to_biguint()
    }
}

/// A serialized value in whichever storage its width selected.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Repr {
    /// [`u8`] storage.
    U8(u8),
    /// [`u16`] storage.
    U16(u16),
    /// [`u32`] storage.
    U32(u32),
    /// [`u64`] storage.
    U64(u64),
    /// [`u128`] storage.
    U128(u128),
    /// [`BigUint`] storage.
    Big(BigUint),
}

impl Repr {
    /// The storage table row of this value.
    pub fn kind(&self) -> StorageKind {
        match self {
            Self::U8(_) => StorageKind::U8,
            Self::U16(_) => StorageKind::U16,
            Self::U32(_) => StorageKind::U32,
            Self::U64(_) => StorageKind::U64,
            Self::U128(_) => StorageKind::U128,
            Self::Big(_) => StorageKind::Big,
        }
    }

    /// The low 128 bits of the value.
    pub fn low_u128(&self) -> u128 {
        match self {
            Self::U8(v) => *v as u128,
            Self::U16(v) => *v as u128,
            Self::U32(v) => *v as u128,
            Self::U64(v) => *v as u128,
            Self::U128(v) => *v,
            Self::Big(v) => {
                let digits: Vec<u64> = v.iter_u64_digits().take(2).collect();
                let low = digits.first().copied().unwrap_or(0) as u128;
                let high = digits.get(1).copied().unwrap_or(0) as u128;
                high << 64 | low
            }
        }
    }

    /// The value as a [`BigUint`].
    pub fn to_biguint(&self) -> BigUint {
        match self {
            Self::Big(v) => v.clone(),
            other => BigUint::from(other.low_u128()),
        }
    }
}

/// Evaluates `$body` with `$s` aliased to the storage type for `$bits` bits.
///
/// Every arm is compiled, but only the arm selected by [`StorageKind::for_bits`] runs; with a
/// constant width the others fold away.
macro_rules! dispatch_storage {
    ($bits:expr, $s:ident => $body:expr) => {
        match $crate::storage::StorageKind::for_bits($bits) {
            $crate::storage::StorageKind::U8 => {
                type $s = u8;
                $body
            }
            $crate::storage::StorageKind::U16 => {
                type $s = u16;
                $body
            }
            $crate::storage::StorageKind::U32 => {
                type $s = u32;
                $body
            }
            $crate::storage::StorageKind::U64 => {
                type $s = u64;
                $body
            }
            $crate::storage::StorageKind::U128 => {
                type $s = u128;
                $body
            }
            $crate::storage::StorageKind::Big => {
                type $s = $crate::num_bigint::BigUint;
                $body
            }
        }
    };
}

pub(crate) use dispatch_storage;
