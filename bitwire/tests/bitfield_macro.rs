use bitwire::num_bigint::BigUint;
use bitwire::prelude::*;

bitfield! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Header {
        pub version: FixedInt<3, u8>,
        pub length: FixedInt<16, u16>,
        pub flags: FixedInt<5, u8>,
    }

    /// Two wide halves.
    #[derive(Debug, Default)]
    struct Wide {
        low: FixedInt<512, BigUint>,
        high: FixedInt<512, BigUint>,
    }
}

#[test]
fn named_members_pack_like_tuples() {
    let mut header = Bitfield::<Header>::default();
    header.value_mut().length.set_value(0b1110110100000001);
    assert_eq!(pack(&header).unwrap(), [0x07, 0x68, 0x08]);

    let header = Bitfield::<Header, LittleEndian>::new(Header {
        length: FixedInt::new(0b1110110100000001),
        ..Default::default()
    });
    assert_eq!(pack(&header).unwrap(), [0x08, 0x68, 0x07]);
}

#[test]
fn layout_constants() {
    assert_eq!(<Header as Members>::COUNT, 3);
    assert_eq!(<Header as Members>::BIT_LENGTH, 24);
    assert_eq!(<Header as Members>::OFFSETS, [0, 3, 19]);
    assert_eq!(Bitfield::<Header>::member_offset::<2>(), 19);
    assert_eq!(Bitfield::<Header>::member_bit_length::<1>(), 16);
}

#[test]
fn index_access_reaches_named_members() {
    let mut header = Bitfield::<Header>::default();
    header.member_mut::<0>().set_value(5);
    assert_eq!(*header.value().version.value(), 5);
    assert_eq!(*header.member::<2>(), FixedInt::new(0));
}

#[test]
fn named_round_trip() {
    let decoded: Bitfield<Header> = unpack(&[0xff, 0xff, 0xff]).unwrap();
    let header = decoded.into_value();
    assert_eq!(header.version.into_value(), 0b111);
    assert_eq!(header.length.into_value(), 0xffff);
    assert_eq!(header.flags.into_value(), 0b11111);
}

#[test]
fn wide_named_members() {
    let mut wide = Bitfield::<Wide>::default();
    wide.value_mut().low.set_value(BigUint::from(1u8));
    wide.value_mut().high.set_value(BigUint::from(0xABCDEF1234567890u64));

    let bytes = pack(&wide).unwrap();
    assert_eq!(bytes.len(), 128);
    assert_eq!(bytes[127], 1);
    assert_eq!(bytes[56..64], [0xab, 0xcd, 0xef, 0x12, 0x34, 0x56, 0x78, 0x90]);

    let decoded: Bitfield<Wide> = unpack(&bytes).unwrap();
    assert_eq!(*decoded.value().high.value(), BigUint::from(0xABCDEF1234567890u64));
}
