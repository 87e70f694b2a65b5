//! Whole-buffer helpers.

use alloc::vec;
use alloc::vec::Vec;

use crate::{Error, Field};

/// Encodes `field` into a new buffer of exactly [`length`](Field::length) bytes.
pub fn pack<F: Field + ?Sized>(field: &F) -> Result<Vec<u8>, Error> {
    let mut bytes = vec![0; field.length()];
    field.write(&mut bytes.as_mut_slice())?;
    Ok(bytes)
}

/// Decodes a default-constructed `F` from the front of `bytes`. Trailing bytes are ignored.
pub fn unpack<F: Field + Default>(bytes: &[u8]) -> Result<F, Error> {
    let mut field = F::default();
    let mut input = bytes;
    field.read(&mut input)?;
    Ok(field)
}
