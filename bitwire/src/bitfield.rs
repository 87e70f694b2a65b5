//! The bitfield composite codec.
//!
//! A [`Bitfield`] packs an ordered list of [`BitfieldMember`]s into one aggregate integer. Member
//! 0 occupies the least significant bits, member 1 the bits just above it, and so on. The
//! aggregate is written as a single integer in the bitfield's own byte order, so the members'
//! byte orders never change where their bits land.
//!
//! Member lists are either tuples of 2 to 12 members or structs declared with
//! [`bitfield!`](crate::bitfield!).

use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;

use log::trace;

use crate::cursor::{advance, advance_mut, with_scratch};
use crate::endian::{BigEndian, Endianness};
use crate::error::{check_input, check_output};
use crate::storage::{dispatch_storage, Storage};
use crate::{BitfieldMember, Error, Field, FixedLength};

/// Computes each member's bit offset from the member widths: the first member sits at offset 0
/// and each later member starts where the previous one ends.
pub const fn prefix_offsets<const N: usize>(widths: [usize; N]) -> [usize; N] {
    let mut offsets = [0; N];
    let mut i = 1;
    while i < N {
        offsets[i] = offsets[i - 1] + widths[i - 1];
        i += 1;
    }
    offsets
}

/// Sums member widths.
pub const fn total_bits(widths: &[usize]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < widths.len() {
        total += widths[i];
        i += 1;
    }
    total
}

/// Decodes `member` from its bits at `offset` within `aggregate`.
///
/// The member's bits are re-encoded into a scratch buffer in the member's own byte order, then the
/// member reads itself from that buffer.
pub fn read_member<M: BitfieldMember, S: Storage>(
    member: &mut M,
    aggregate: &S,
    offset: usize,
) -> Result<(), Error> {
    let bits = aggregate.clone().shifted_right(offset).masked(M::BIT_LENGTH);
    with_scratch(M::LENGTH, |scratch| {
        bits.store::<M::Endian>(scratch);
        member.read(&mut &*scratch)
    })
    .map_err(|e| {
        trace!("bitfield member at bit {offset} failed to read: {e}");
        e
    })
}

/// Like [`read_member`] without status reporting.
pub fn read_member_unchecked<M: BitfieldMember, S: Storage>(
    member: &mut M,
    aggregate: &S,
    offset: usize,
) {
    let bits = aggregate.clone().shifted_right(offset).masked(M::BIT_LENGTH);
    with_scratch(M::LENGTH, |scratch| {
        bits.store::<M::Endian>(scratch);
        member.read_unchecked(&mut &*scratch);
    });
}

/// Encodes `member` and merges its bits into `aggregate` at `offset`.
pub fn write_member<M: BitfieldMember, S: Storage>(
    member: &M,
    aggregate: S,
    offset: usize,
) -> Result<S, Error> {
    let bits = with_scratch(M::LENGTH, |scratch| -> Result<S, Error> {
        member.write(&mut &mut *scratch)?;
        Ok(S::load::<M::Endian>(scratch))
    })
    .map_err(|e| {
        trace!("bitfield member at bit {offset} failed to write: {e}");
        e
    })?;
    Ok(aggregate.merged(bits.masked(M::BIT_LENGTH).shifted_left(offset)))
}

/// Like [`write_member`] without status reporting.
pub fn write_member_unchecked<M: BitfieldMember, S: Storage>(
    member: &M,
    aggregate: S,
    offset: usize,
) -> S {
    let bits = with_scratch(M::LENGTH, |scratch| {
        member.write_unchecked(&mut &mut *scratch);
        S::load::<M::Endian>(scratch)
    });
    aggregate.merged(bits.masked(M::BIT_LENGTH).shifted_left(offset))
}

/// An ordered list of bitfield members.
///
/// Traversals visit members in declaration order and stop at the first failure. Implemented for
/// tuples of 2 to 12 [`BitfieldMember`]s and for structs declared with
/// [`bitfield!`](crate::bitfield!).
pub trait Members {
    /// The number of members.
    const COUNT: usize;

    /// The sum of the members' widths.
    const BIT_LENGTH: usize;

    /// Each member's bit offset within the aggregate.
    const OFFSETS: &'static [usize];

    /// Decodes every member from `aggregate`.
    fn read_members<S: Storage>(&mut self, aggregate: &S) -> Result<(), Error>;

    /// Decodes every member from `aggregate` without status reporting.
    fn read_members_unchecked<S: Storage>(&mut self, aggregate: &S);

    /// Encodes every member into a new aggregate.
    fn write_members<S: Storage>(&self) -> Result<S, Error>;

    /// Encodes every member into a new aggregate without status reporting.
    fn write_members_unchecked<S: Storage>(&self) -> S;

    /// Whether every member is valid. Every member is asked.
    fn members_valid(&self) -> bool;

    /// Refreshes every member, returning whether any changed.
    fn refresh_members(&mut self) -> bool;
}

/// Typed access to member `I` of a member list.
pub trait MemberAt<const I: usize>: Members {
    /// The member's type.
    type Member: BitfieldMember;

    /// The member.
    fn member(&self) -> &Self::Member;

    /// Mutable access to the member.
    fn member_mut(&mut self) -> &mut Self::Member;
}

macro_rules! impl_members {
    (@member_at $all:tt $($idx:tt $T:ident),+) => {
        $( impl_members!(@one $all $idx $T); )+
    };
    (@one ($($A:ident,)+) $idx:tt $T:ident) => {
        impl<$($A: BitfieldMember),+> MemberAt<$idx> for ($($A,)+) {
            type Member = $T;

            fn member(&self) -> &$T {
                &self.$idx
            }

            fn member_mut(&mut self) -> &mut $T {
                &mut self.$idx
            }
        }
    };
    ($count:literal; $($idx:tt $T:ident),+) => {
        impl<$($T: BitfieldMember),+> Members for ($($T,)+) {
            const COUNT: usize = $count;
            const BIT_LENGTH: usize = total_bits(&[$($T::BIT_LENGTH),+]);
            const OFFSETS: &'static [usize] = &prefix_offsets([$($T::BIT_LENGTH),+]);

            fn read_members<S: Storage>(&mut self, aggregate: &S) -> Result<(), Error> {
                $( read_member(&mut self.$idx, aggregate, Self::OFFSETS[$idx])?; )+
                Ok(())
            }

            fn read_members_unchecked<S: Storage>(&mut self, aggregate: &S) {
                $( read_member_unchecked(&mut self.$idx, aggregate, Self::OFFSETS[$idx]); )+
            }

            fn write_members<S: Storage>(&self) -> Result<S, Error> {
                let aggregate = S::zeroed();
                $( let aggregate = write_member(&self.$idx, aggregate, Self::OFFSETS[$idx])?; )+
                Ok(aggregate)
            }

            fn write_members_unchecked<S: Storage>(&self) -> S {
                let aggregate = S::zeroed();
                $(
                    let aggregate =
                        write_member_unchecked(&self.$idx, aggregate, Self::OFFSETS[$idx]);
                )+
                aggregate
            }

            fn members_valid(&self) -> bool {
                let mut valid = true;
                $( valid &= self.$idx.valid(); )+
                valid
            }

            fn refresh_members(&mut self) -> bool {
                let mut changed = false;
                $( changed |= self.$idx.refresh(); )+
                changed
            }
        }

        impl_members!(@member_at ($($T,)+) $($idx $T),+);
    };
}

impl_members!(2; 0 A, 1 B);
impl_members!(3; 0 A, 1 B, 2 C);
impl_members!(4; 0 A, 1 B, 2 C, 3 D);
impl_members!(5; 0 A, 1 B, 2 C, 3 D, 4 E);
impl_members!(6; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_members!(7; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_members!(8; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);
impl_members!(9; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I);
impl_members!(10; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J);
impl_members!(11; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J, 10 K);
impl_members!(12; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J, 10 K, 11 L);

/// A bitfield over the member list `M`, written in `E` byte order.
///
/// The members' widths must add up to a whole number of bytes.
///
/// # Examples
///
/// ```
/// use bitwire::prelude::*;
///
/// type Header = Bitfield<(FixedInt<3, u8>, FixedInt<16, u16>, FixedInt<5, u8>)>;
///
/// let header = Header::new((
///     FixedInt::new(0),
///     FixedInt::new(0b1110110100000001),
///     FixedInt::new(0),
/// ));
/// assert_eq!(header.length(), 3);
/// assert_eq!(pack(&header).unwrap(), [0x07, 0x68, 0x08]);
///
/// let decoded: Header = unpack(&[0x07, 0x68, 0x08]).unwrap();
/// assert_eq!(*decoded.member::<1>().value(), 0b1110110100000001);
/// ```
///
/// Widths that leave a partial byte are rejected:
///
/// ```compile_fail
/// use bitwire::prelude::*;
///
/// let bitfield = Bitfield::<(FixedInt<3, u8>, FixedInt<4, u8>)>::default();
/// ```
///
/// So are signed members:
///
/// ```compile_fail
/// use bitwire::prelude::*;
///
/// let bitfield = Bitfield::<(FixedInt<4, i8>, FixedInt<4, u8>)>::default();
/// ```
///
/// So are single members:
///
/// ```compile_fail
/// use bitwire::prelude::*;
///
/// let bitfield = Bitfield::<(FixedInt<8, u8>,)>::default();
/// ```
///
/// Member indices are checked:
///
/// ```compile_fail
/// use bitwire::prelude::*;
///
/// let bitfield = Bitfield::<(FixedInt<4, u8>, FixedInt<4, u8>)>::default();
/// let _ = bitfield.member::<2>();
/// ```
pub struct Bitfield<M, E = BigEndian> {
    members: M,
    _endian: PhantomData<E>,
}

impl<M: Members, E: Endianness> Bitfield<M, E> {
    const LAYOUT: () = assert!(
        M::BIT_LENGTH % 8 == 0,
        "bitfield members must add up to a whole number of bytes",
    );

    /// Wraps a member list.
    pub fn new(members: M) -> Self {
        let () = Self::LAYOUT;
        Self {
            members,
            _endian: PhantomData,
        }
    }

    /// The member list.
    pub fn value(&self) -> &M {
        &self.members
    }

    /// Mutable access to the member list.
    pub fn value_mut(&mut self) -> &mut M {
        &mut self.members
    }

    /// Replaces the member list.
    pub fn set_value(&mut self, members: M) {
        self.members = members;
    }

    /// Unwraps the member list.
    pub fn into_value(self) -> M {
        self.members
    }

    /// Member `I`.
    pub fn member<const I: usize>(&self) -> &<M as MemberAt<I>>::Member
    where
        M: MemberAt<I>,
    {
        <M as MemberAt<I>>::member(&self.members)
    }

    /// Mutable access to member `I`.
    pub fn member_mut<const I: usize>(&mut self) -> &mut <M as MemberAt<I>>::Member
    where
        M: MemberAt<I>,
    {
        <M as MemberAt<I>>::member_mut(&mut self.members)
    }

    /// The width of member `I` in bits.
    pub fn member_bit_length<const I: usize>() -> usize
    where
        M: MemberAt<I>,
    {
        <<M as MemberAt<I>>::Member as FixedLength>::BIT_LENGTH
    }

    /// The bit offset of member `I` within the aggregate.
    pub fn member_offset<const I: usize>() -> usize
    where
        M: MemberAt<I>,
    {
        M::OFFSETS[I]
    }
}

impl<M: Members, E: Endianness> Field for Bitfield<M, E> {
    fn length(&self) -> usize {
        Self::LENGTH
    }

    fn read(&mut self, input: &mut &[u8]) -> Result<(), Error> {
        let () = Self::LAYOUT;
        check_input("bitfield", input, Self::LENGTH)?;
        let mut rest = *input;
        let bytes = advance(&mut rest, Self::LENGTH);
        dispatch_storage!(M::BIT_LENGTH, S => {
            self.members.read_members(&S::load::<E>(bytes))?;
        });
        *input = rest;
        Ok(())
    }

    fn read_unchecked(&mut self, input: &mut &[u8]) {
        let () = Self::LAYOUT;
        let bytes = advance(input, Self::LENGTH);
        dispatch_storage!(M::BIT_LENGTH, S => {
            self.members.read_members_unchecked(&S::load::<E>(bytes));
        });
    }

    fn write(&self, output: &mut &mut [u8]) -> Result<(), Error> {
        let () = Self::LAYOUT;
        check_output("bitfield", output, Self::LENGTH)?;
        dispatch_storage!(M::BIT_LENGTH, S => {
            let aggregate: S = self.members.write_members()?;
            aggregate.store::<E>(advance_mut(output, Self::LENGTH));
        });
        Ok(())
    }

    fn write_unchecked(&self, output: &mut &mut [u8]) {
        let () = Self::LAYOUT;
        dispatch_storage!(M::BIT_LENGTH, S => {
            let aggregate: S = self.members.write_members_unchecked();
            aggregate.store::<E>(advance_mut(output, Self::LENGTH));
        });
    }

    fn valid(&self) -> bool {
        self.members.members_valid()
    }

    fn refresh(&mut self) -> bool {
        self.members.refresh_members()
    }
}

impl<M: Members, E: Endianness> FixedLength for Bitfield<M, E> {
    const BIT_LENGTH: usize = M::BIT_LENGTH;
}

impl<M: Members, E: Endianness> BitfieldMember for Bitfield<M, E> {
    type Endian = E;
}

impl<M: Members + Default, E: Endianness> Default for Bitfield<M, E> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M: Clone, E> Clone for Bitfield<M, E> {
    fn clone(&self) -> Self {
        Self {
            members: self.members.clone(),
            _endian: PhantomData,
        }
    }
}

impl<M: Debug, E> Debug for Bitfield<M, E> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_tuple("Bitfield").field(&self.members).finish()
    }
}

impl<M: PartialEq, E> PartialEq for Bitfield<M, E> {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl<M: Eq, E> Eq for Bitfield<M, E> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endian::LittleEndian;
    use crate::fixed::FixedInt;

    type Sample<E> = Bitfield<(FixedInt<3, u8>, FixedInt<16, u16>, FixedInt<5, u8>), E>;

    #[test]
    fn offsets_accumulate() {
        assert_eq!(prefix_offsets([3, 16, 5]), [0, 3, 19]);
        assert_eq!(prefix_offsets([8]), [0]);
        assert_eq!(total_bits(&[3, 16, 5]), 24);
    }

    #[test]
    fn member_layout() {
        assert_eq!(Sample::<BigEndian>::member_offset::<0>(), 0);
        assert_eq!(Sample::<BigEndian>::member_offset::<1>(), 3);
        assert_eq!(Sample::<BigEndian>::member_offset::<2>(), 19);
        assert_eq!(Sample::<BigEndian>::member_bit_length::<1>(), 16);
        assert_eq!(<Sample<BigEndian> as FixedLength>::LENGTH, 3);
    }

    #[test]
    fn aggregate_packs_lsb_first() {
        let members = (
            FixedInt::<3, u8>::new(0b101),
            FixedInt::<16, u16>::new(0xffff),
            FixedInt::<5, u8>::new(0b10001),
        );
        let aggregate: u32 = members.write_members().unwrap();
        assert_eq!(aggregate, 0b10001_1111111111111111_101);

        let mut decoded = <(FixedInt<3, u8>, FixedInt<16, u16>, FixedInt<5, u8>)>::default();
        decoded.read_members(&aggregate).unwrap();
        assert_eq!(decoded, members);
    }

    #[test]
    fn outer_order() {
        let mut field = Sample::<LittleEndian>::default();
        field.member_mut::<1>().set_value(0b1110110100000001);
        let mut buf = [0; 3];
        field.write(&mut &mut buf[..]).unwrap();
        assert_eq!(buf, [0x08, 0x68, 0x07]);
    }

    #[test]
    fn short_write_leaves_output() {
        let field = Sample::<BigEndian>::default();
        let mut buf = [0xaa; 2];
        let mut output = &mut buf[..];
        assert_eq!(
            field.write(&mut output),
            Err(Error::BufferOverflow {
                required: 3,
                available: 2,
            }),
        );
        assert_eq!(output.len(), 2);
        assert_eq!(buf, [0xaa; 2]);
    }
}
