#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod cursor;
pub mod array;
pub mod bitfield;
pub mod endian;
mod error;
pub mod fixed;
pub mod pack;
pub mod prelude;
pub mod storage;
pub mod value;

pub use num_bigint;

pub use crate::endian::{BigEndian, LittleEndian};
pub use crate::error::Error;

// For macro access via `$crate`.
#[doc(hidden)]
pub mod __private {
    pub use bitwire_macros::bitfield;
}

mod sealed {
    pub trait Sealed {}
}

/// A value with a wire encoding.
///
/// Reads consume bytes from the front of a `&[u8]` cursor and writes fill bytes at the front of a
/// `&mut [u8]` cursor. The bytes available to an operation are the remaining length of its cursor;
/// a successful operation advances the cursor past everything it consumed or produced.
pub trait Field {
    /// The number of bytes this field occupies on the wire.
    fn length(&self) -> usize;

    /// Decodes this field from the front of `input`.
    ///
    /// Fails with [`Error::NotEnoughData`] if `input` is too short.
    fn read(&mut self, input: &mut &[u8]) -> Result<(), Error>;

    /// Decodes this field from the front of `input` without checking its length first.
    ///
    /// # Panics
    ///
    /// Panics if `input` is shorter than [`length`](Self::length).
    fn read_unchecked(&mut self, input: &mut &[u8]);

    /// Encodes this field to the front of `output`.
    ///
    /// Fails with [`Error::BufferOverflow`] if `output` is too short.
    fn write(&self, output: &mut &mut [u8]) -> Result<(), Error>;

    /// Encodes this field to the front of `output` without checking its length first.
    ///
    /// # Panics
    ///
    /// Panics if `output` is shorter than [`length`](Self::length).
    fn write_unchecked(&self, output: &mut &mut [u8]);

    /// Whether the field's value satisfies the field's own constraints.
    fn valid(&self) -> bool {
        true
    }

    /// Brings derived state up to date, returning whether anything changed.
    fn refresh(&mut self) -> bool {
        false
    }
}

/// A [`Field`] whose encoding has the same size for every value.
pub trait FixedLength: Field {
    /// The number of significant bits in the encoding.
    const BIT_LENGTH: usize;

    /// The number of bytes in the encoding.
    const LENGTH: usize = (Self::BIT_LENGTH + 7) / 8;
}

/// A [`FixedLength`] field that can be packed into a [`Bitfield`](bitfield::Bitfield).
///
/// Members must encode an unsigned value in the low [`BIT_LENGTH`](FixedLength::BIT_LENGTH) bits
/// of their [`LENGTH`](FixedLength::LENGTH)-byte encoding, in [`Endian`](Self::Endian) byte order.
pub trait BitfieldMember: FixedLength {
    /// The byte order of the member's own encoding.
    type Endian: endian::Endianness;
}

/// Declares a struct with named members and makes it usable as the member list of a
/// [`Bitfield`](bitfield::Bitfield).
///
/// Members are packed in declaration order starting from the least significant bit. Every member
/// type must implement [`BitfieldMember`], and at least two members are required.
///
/// # Examples
///
/// ```
/// use bitwire::prelude::*;
///
/// bitfield! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Header {
///         pub version: FixedInt<3, u8>,
///         pub length: FixedInt<16, u16>,
///         pub flags: FixedInt<5, u8>,
///     }
/// }
///
/// let mut header = Bitfield::<Header>::default();
/// header.value_mut().length.set_value(0b1110110100000001);
/// assert_eq!(pack(&header).unwrap(), [0x07, 0x68, 0x08]);
/// ```
///
/// A single member is rejected:
///
/// ```compile_fail
/// use bitwire::prelude::*;
///
/// bitfield! {
///     struct Lonely {
///         only: FixedInt<8, u8>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! bitfield {
    ( $( $tokens:tt )* ) => {
        $crate::__private::bitfield! { ( $crate, $( $tokens )* ) }
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn default_length_rounds_up() {
        assert_eq!(<FixedInt<1, u8> as FixedLength>::LENGTH, 1);
        assert_eq!(<FixedInt<8, u8> as FixedLength>::LENGTH, 1);
        assert_eq!(<FixedInt<9, u16> as FixedLength>::LENGTH, 2);
        assert_eq!(<FixedInt<123, i128> as FixedLength>::LENGTH, 16);
    }

    #[test]
    fn default_lifecycle_hooks() {
        let mut field = FixedInt::<12, u16>::new(0xabc);
        assert!(field.valid());
        assert!(!field.refresh());
        assert_eq!(field.value(), &0xabc);
    }
}
