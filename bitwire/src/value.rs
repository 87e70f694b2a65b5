//! Integer types that a [`FixedInt`](crate::fixed::FixedInt) can hold.

use core::fmt::Debug;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::One;

/// An integer value with a two's complement byte view.
pub trait Value: Clone + Default + Debug + PartialEq {
    /// Whether negative values exist.
    const SIGNED: bool;

    /// The widest encoding this type can hold, in bits. Unbounded types use [`usize::MAX`].
    const CAPACITY: usize;

    /// Whether the value is below zero.
    fn is_negative(&self) -> bool;

    /// Writes the low `out.len()` bytes of the value's two's complement form, least significant
    /// byte first, sign-extending if `out` is wider than the value.
    fn store_le(&self, out: &mut [u8]);

    /// Reads `bytes`, least significant byte first, as a non-negative number.
    ///
    /// The number must fit in [`CAPACITY`](Self::CAPACITY) bits. For signed native types a number
    /// using the top bit comes back negative.
    fn load_le(bytes: &[u8]) -> Self;

    /// Reinterprets a non-negative `bits`-bit pattern whose top bit is set as negative.
    #[must_use]
    fn extend_sign(self, bits: usize) -> Self;
}

/// A [`Value`] that is never negative.
pub trait UnsignedValue: Value {}

fn copy_padded(bytes: &[u8], out: &mut [u8], pad: u8) {
    let n = bytes.len().min(out.len());
    out[..n].copy_from_slice(&bytes[..n]);
    out[n..].fill(pad);
}

macro_rules! impl_native_value {
    ($signed:literal: $($t:ident),*) => {
        $(
            impl Value for $t {
                const SIGNED: bool = $signed;
                const CAPACITY: usize = $t::BITS as usize;

                #[allow(unused_comparisons)]
                fn is_negative(&self) -> bool {
                    *self < 0
                }

                fn store_le(&self, out: &mut [u8]) {
                    let pad = if Value::is_negative(self) { 0xff } else { 0 };
                    copy_padded(&(*self as u128).to_le_bytes(), out, pad);
                }

                fn load_le(bytes: &[u8]) -> Self {
                    let mut buf = [0; 16];
                    copy_padded(bytes, &mut buf, 0);
                    u128::from_le_bytes(buf) as $t
                }

                fn extend_sign(self, bits: usize) -> Self {
                    if bits == 0 || bits >= Self::CAPACITY {
                        self
                    } else {
                        self | (!(0 as $t) << bits)
                    }
                }
            }
        )*
    };
}

impl_native_value!(false: u8, u16, u32, u64, u128);
impl_native_value!(true: i8, i16, i32, i64, i128);

macro_rules! impl_unsigned_value {
    ($($t:ty),*) => {
        $( impl UnsignedValue for $t {} )*
    };
}

impl_unsigned_value!(u8, u16, u32, u64, u128, BigUint);

impl Value for BigUint {
    const SIGNED: bool = false;
    const CAPACITY: usize = usize::MAX;

    fn is_negative(&self) -> bool {
        false
    }

    fn store_le(&self, out: &mut [u8]) {
        copy_padded(&self.to_bytes_le(), out, 0);
    }

    fn load_le(bytes: &[u8]) -> Self {
        BigUint::from_bytes_le(bytes)
    }

    fn extend_sign(self, _bits: usize) -> Self {
        self
    }
}

impl Value for BigInt {
    const SIGNED: bool = true;
    const CAPACITY: usize = usize::MAX;

    fn is_negative(&self) -> bool {
        self.sign() == Sign::Minus
    }

    fn store_le(&self, out: &mut [u8]) {
        let pad = if Value::is_negative(self) { 0xff } else { 0 };
        copy_padded(&self.to_signed_bytes_le(), out, pad);
    }

    fn load_le(bytes: &[u8]) -> Self {
        BigInt::from_bytes_le(Sign::Plus, bytes)
    }

    fn extend_sign(self, bits: usize) -> Self {
        self - (BigInt::one() << bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_store_truncates_and_extends() {
        let mut out = [0; 3];
        (-2i16).store_le(&mut out);
        assert_eq!(out, [0xfe, 0xff, 0xff]);

        let mut out = [0; 1];
        0x1234u16.store_le(&mut out);
        assert_eq!(out, [0x34]);
    }

    #[test]
    fn native_load() {
        assert_eq!(u32::load_le(&[0x08, 0x68, 0x07]), 0x076808);
        assert_eq!(i8::load_le(&[0xf9]), -7);
        assert_eq!(i32::load_le(&[0x19]), 25);
    }

    #[test]
    fn native_extend_sign() {
        assert_eq!(25i32.extend_sign(5), -7);
        assert_eq!((-7i8).extend_sign(8), -7);
        assert_eq!(1i128.extend_sign(1), -1);
    }

    #[test]
    fn big_signed_bytes() {
        let mut out = [0; 4];
        BigInt::from(-5).store_le(&mut out);
        assert_eq!(out, [0xfb, 0xff, 0xff, 0xff]);
        assert_eq!(BigInt::load_le(&out), BigInt::from(0xfffffffbu32));
        assert_eq!(BigInt::from(0xfffffffbu32).extend_sign(32), BigInt::from(-5));
    }

    #[test]
    fn big_unsigned_bytes() {
        let mut out = [0xaa; 3];
        BigUint::from(0x0102u32).store_le(&mut out);
        assert_eq!(out, [2, 1, 0]);
        assert_eq!(BigUint::load_le(&out), BigUint::from(0x0102u32));
    }

    #[test]
    fn capacities() {
        assert_eq!(u8::CAPACITY, 8);
        assert_eq!(i128::CAPACITY, 128);
        assert_eq!(BigUint::CAPACITY, usize::MAX);
        assert!(i64::SIGNED);
        assert!(!BigUint::SIGNED);
    }
}
