use log::trace;
use snafu::{ensure, Snafu};

/// The error type for checked reads and writes.
///
/// Sizes are in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The input ended before the field was fully decoded.
    #[snafu(display("not enough data: {required} byte(s) required, {available} available"))]
    NotEnoughData {
        /// Bytes the field needed.
        required: usize,
        /// Bytes left in the input.
        available: usize,
    },

    /// The output ended before the field was fully encoded.
    #[snafu(display("buffer overflow: {required} byte(s) required, {available} available"))]
    BufferOverflow {
        /// Bytes the field needed.
        required: usize,
        /// Bytes left in the output.
        available: usize,
    },
}

/// Fails unless `input` holds at least `required` bytes.
pub(crate) fn check_input(kind: &str, input: &[u8], required: usize) -> Result<(), Error> {
    let available = input.len();
    ensure_input(required, available).inspect_err(|_| {
        trace!("{kind}: read needs {required} byte(s), {available} available");
    })
}

/// Fails unless `output` has room for at least `required` bytes.
pub(crate) fn check_output(kind: &str, output: &[u8], required: usize) -> Result<(), Error> {
    let available = output.len();
    ensure_output(required, available).inspect_err(|_| {
        trace!("{kind}: write needs {required} byte(s), {available} available");
    })
}

fn ensure_input(required: usize, available: usize) -> Result<(), Error> {
    ensure!(available >= required, NotEnoughDataSnafu { required, available });
    Ok(())
}

fn ensure_output(required: usize, available: usize) -> Result<(), Error> {
    ensure!(available >= required, BufferOverflowSnafu { required, available });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_sizes_pass() {
        assert_eq!(check_input("test", &[0; 4], 4), Ok(()));
        assert_eq!(check_output("test", &[0; 4], 4), Ok(()));
    }

    #[test]
    fn short_sizes_fail() {
        assert_eq!(
            check_input("test", &[0; 3], 4),
            Err(Error::NotEnoughData {
                required: 4,
                available: 3,
            }),
        );
        assert_eq!(
            check_output("test", &[], 1),
            Err(Error::BufferOverflow {
                required: 1,
                available: 0,
            }),
        );
    }

    #[test]
    fn one_byte_short() {
        assert_eq!(
            check_input("test", &[0; 15], 16),
            Err(Error::NotEnoughData {
                required: 16,
                available: 15,
            }),
        );
        assert_eq!(check_input("test", &[0; 17], 16), Ok(()));
        assert_eq!(
            check_output("test", &[0; 15], 16),
            Err(Error::BufferOverflow {
                required: 16,
                available: 15,
            }),
        );
        assert_eq!(check_output("test", &[0; 17], 16), Ok(()));
    }

    #[test]
    fn display() {
        let error = Error::NotEnoughData {
            required: 2,
            available: 1,
        };
        assert_eq!(
            error.to_string(),
            "not enough data: 2 byte(s) required, 1 available",
        );
    }
}
