//! Convenience re-exports.

#[doc(no_inline)]
pub use crate::array::{FieldArray, FieldVec};
#[doc(no_inline)]
pub use crate::bitfield::{Bitfield, MemberAt, Members};
#[doc(no_inline)]
pub use crate::endian::{BigEndian, Endianness, LittleEndian};
#[doc(no_inline)]
pub use crate::fixed::FixedInt;
#[doc(no_inline)]
pub use crate::pack::{pack, unpack};
#[doc(no_inline)]
pub use crate::{bitfield, BitfieldMember, Error, Field, FixedLength};
