//! Byte order tags.
//!
//! The tags are [`byteorder`]'s own [`BigEndian`] and [`LittleEndian`] types, so field encodings
//! share their byte-level codec with the rest of the ecosystem.

pub use byteorder::{BigEndian, LittleEndian};

use crate::sealed::Sealed;

/// A runtime view of an [`Endianness`] tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

/// A byte order usable as a field type parameter.
///
/// This trait is sealed and implemented only for [`BigEndian`] and [`LittleEndian`].
pub trait Endianness: byteorder::ByteOrder + Sealed {
    /// The byte order this tag selects.
    const ENDIAN: Endian;
}

impl Sealed for BigEndian {}

impl Endianness for BigEndian {
    const ENDIAN: Endian = Endian::Big;
}

impl Sealed for LittleEndian {}

impl Endianness for LittleEndian {
    const ENDIAN: Endian = Endian::Little;
}
