//! The fixed-width integer codec.

use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;

use crate::cursor::{advance, advance_mut, with_scratch};
use crate::endian::{BigEndian, Endianness, LittleEndian};
use crate::error::{check_input, check_output};
use crate::storage::{dispatch_storage, Repr, Storage};
use crate::value::{UnsignedValue, Value};
use crate::{BitfieldMember, Error, Field, FixedLength};

/// An integer encoded in exactly `BITS` bits, padded to whole bytes and written in `E` byte order.
///
/// The value type `V` must hold at least `BITS` bits. Signed values use bit `BITS - 1` as a sign
/// flag, so negative numbers round-trip as long as they fit in `BITS` bits of two's complement.
/// Unsigned values are truncated to their low `BITS` bits on write.
///
/// # Examples
///
/// ```
/// use bitwire::prelude::*;
///
/// let field = FixedInt::<12, u16, LittleEndian>::new(0xabc);
/// assert_eq!(pack(&field).unwrap(), [0xbc, 0x0a]);
///
/// let field: FixedInt<5, i32> = unpack(&[0b11001]).unwrap();
/// assert_eq!(*field.value(), -7);
/// ```
///
/// Widths must be nonzero and fit the value type:
///
/// ```compile_fail
/// use bitwire::prelude::*;
///
/// let field = FixedInt::<0, u8>::new(0);
/// ```
///
/// ```compile_fail
/// use bitwire::prelude::*;
///
/// let field = FixedInt::<9, u8>::new(0);
/// ```
pub struct FixedInt<const BITS: usize, V, E = BigEndian> {
    value: V,
    _endian: PhantomData<E>,
}

impl<const BITS: usize, V: Value, E: Endianness> FixedInt<BITS, V, E> {
    const WIDTH: () = assert!(
        BITS > 0 && BITS <= V::CAPACITY,
        "field width must be nonzero and fit the value type",
    );

    /// Wraps a value.
    pub fn new(value: V) -> Self {
        let () = Self::WIDTH;
        Self {
            value,
            _endian: PhantomData,
        }
    }

    /// The wrapped value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Mutable access to the wrapped value.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Replaces the wrapped value.
    pub fn set_value(&mut self, value: V) {
        self.value = value;
    }

    /// Unwraps the value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// The serialized bit pattern of the current value.
    pub fn to_serialized(&self) -> Repr {
        dispatch_storage!(BITS, S => Self::serialize::<S>(&self.value).into_repr())
    }

    /// Decodes a serialized bit pattern. Bits at position `BITS` and above are ignored.
    pub fn from_serialized(repr: &Repr) -> V {
        dispatch_storage!(BITS, S => Self::deserialize::<S>(S::from_repr(repr)))
    }

    fn serialize<S: Storage>(value: &V) -> S {
        let mut bits = with_scratch(Self::LENGTH, |scratch| {
            value.store_le(scratch);
            S::load::<LittleEndian>(scratch)
        })
        .masked(BITS);
        if V::SIGNED {
            bits.assign_bit(BITS - 1, value.is_negative());
        }
        bits
    }

    fn deserialize<S: Storage>(bits: S) -> V {
        let bits = bits.masked(BITS);
        let negative = V::SIGNED && bits.test_bit(BITS - 1);
        let value = with_scratch(Self::LENGTH, |scratch| {
            bits.store::<LittleEndian>(scratch);
            V::load_le(scratch)
        });
        if negative {
            value.extend_sign(BITS)
        } else {
            value
        }
    }
}

impl<const BITS: usize, V: Value, E: Endianness> Field for FixedInt<BITS, V, E> {
    fn length(&self) -> usize {
        Self::LENGTH
    }

    fn read(&mut self, input: &mut &[u8]) -> Result<(), Error> {
        check_input("fixed int", input, Self::LENGTH)?;
        self.read_unchecked(input);
        Ok(())
    }

    fn read_unchecked(&mut self, input: &mut &[u8]) {
        let () = Self::WIDTH;
        let bytes = advance(input, Self::LENGTH);
        self.value = dispatch_storage!(BITS, S => Self::deserialize(S::load::<E>(bytes)));
    }

    fn write(&self, output: &mut &mut [u8]) -> Result<(), Error> {
        check_output("fixed int", output, Self::LENGTH)?;
        self.write_unchecked(output);
        Ok(())
    }

    fn write_unchecked(&self, output: &mut &mut [u8]) {
        let () = Self::WIDTH;
        let out = advance_mut(output, Self::LENGTH);
        dispatch_storage!(BITS, S => Self::serialize::<S>(&self.value).store::<E>(out));
    }
}

impl<const BITS: usize, V: Value, E: Endianness> FixedLength for FixedInt<BITS, V, E> {
    const BIT_LENGTH: usize = BITS;
}

impl<const BITS: usize, V: UnsignedValue, E: Endianness> BitfieldMember for FixedInt<BITS, V, E> {
    type Endian = E;
}

impl<const BITS: usize, V: Value, E: Endianness> Default for FixedInt<BITS, V, E> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<const BITS: usize, V: Clone, E> Clone for FixedInt<BITS, V, E> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _endian: PhantomData,
        }
    }
}

impl<const BITS: usize, V: Debug, E> Debug for FixedInt<BITS, V, E> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_tuple("FixedInt").field(&self.value).finish()
    }
}

impl<const BITS: usize, V: PartialEq, E> PartialEq for FixedInt<BITS, V, E> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<const BITS: usize, V: Eq, E> Eq for FixedInt<BITS, V, E> {}

impl<const BITS: usize, V: Value, E: Endianness> From<V> for FixedInt<BITS, V, E> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}
