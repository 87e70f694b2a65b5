//! Slice cursor plumbing shared by the field implementations.

use alloc::vec;

/// Scratch buffers up to this size live on the stack.
const INLINE_SCRATCH: usize = 16;

/// Splits `len` bytes off the front of `input`.
///
/// Panics if `input` is shorter than `len`.
pub(crate) fn advance<'a>(input: &mut &'a [u8], len: usize) -> &'a [u8] {
    let (head, tail) = input.split_at(len);
    *input = tail;
    head
}

/// Splits `len` bytes off the front of `output`.
///
/// Panics if `output` is shorter than `len`.
pub(crate) fn advance_mut<'a>(output: &mut &'a mut [u8], len: usize) -> &'a mut [u8] {
    let (head, tail) = core::mem::take(output).split_at_mut(len);
    *output = tail;
    head
}

/// Runs `f` on a zeroed scratch buffer of exactly `len` bytes.
pub(crate) fn with_scratch<R>(len: usize, f: impl FnOnce(&mut [u8]) -> R) -> R {
    if len <= INLINE_SCRATCH {
        let mut inline = [0; INLINE_SCRATCH];
        f(&mut inline[..len])
    } else {
        f(vec![0; len].as_mut_slice())
    }
}
