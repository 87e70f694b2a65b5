//! Sequences of fields written back to back.

use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use crate::error::check_output;
use crate::{Error, Field, FixedLength};

/// Exactly `N` fields.
///
/// Reads and writes visit elements in order and stop at the first failure. A failed read leaves
/// the input cursor where it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldArray<F, const N: usize> {
    elements: [F; N],
}

impl<F, const N: usize> FieldArray<F, N> {
    /// Wraps an array of fields.
    pub fn new(elements: [F; N]) -> Self {
        Self { elements }
    }

    /// Unwraps the array.
    pub fn into_inner(self) -> [F; N] {
        self.elements
    }
}

impl<F, const N: usize> Deref for FieldArray<F, N> {
    type Target = [F; N];

    fn deref(&self) -> &[F; N] {
        &self.elements
    }
}

impl<F, const N: usize> DerefMut for FieldArray<F, N> {
    fn deref_mut(&mut self) -> &mut [F; N] {
        &mut self.elements
    }
}

impl<F: Default, const N: usize> Default for FieldArray<F, N> {
    fn default() -> Self {
        Self::new(core::array::from_fn(|_| F::default()))
    }
}

impl<F, const N: usize> From<[F; N]> for FieldArray<F, N> {
    fn from(elements: [F; N]) -> Self {
        Self::new(elements)
    }
}

impl<F: Field, const N: usize> Field for FieldArray<F, N> {
    fn length(&self) -> usize {
        self.elements.iter().map(Field::length).sum()
    }

    fn read(&mut self, input: &mut &[u8]) -> Result<(), Error> {
        let mut rest = *input;
        for element in &mut self.elements {
            element.read(&mut rest)?;
        }
        *input = rest;
        Ok(())
    }

    fn read_unchecked(&mut self, input: &mut &[u8]) {
        for element in &mut self.elements {
            element.read_unchecked(input);
        }
    }

    fn write(&self, output: &mut &mut [u8]) -> Result<(), Error> {
        check_output("field array", output, self.length())?;
        for element in &self.elements {
            element.write(output)?;
        }
        Ok(())
    }

    fn write_unchecked(&self, output: &mut &mut [u8]) {
        for element in &self.elements {
            element.write_unchecked(output);
        }
    }

    fn valid(&self) -> bool {
        self.elements
            .iter()
            .fold(true, |valid, element| element.valid() && valid)
    }

    fn refresh(&mut self) -> bool {
        self.elements
            .iter_mut()
            .fold(false, |changed, element| element.refresh() || changed)
    }
}

impl<F: FixedLength, const N: usize> FixedLength for FieldArray<F, N> {
    const BIT_LENGTH: usize = N * F::LENGTH * 8;
}

/// Any number of fields.
///
/// Reading decodes elements until the input runs out, so a `FieldVec` normally ends a message.
/// Input that ends partway through an element fails with [`Error::NotEnoughData`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldVec<F> {
    elements: Vec<F>,
}

impl<F> FieldVec<F> {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Unwraps the elements.
    pub fn into_inner(self) -> Vec<F> {
        self.elements
    }
}

impl<F> Deref for FieldVec<F> {
    type Target = Vec<F>;

    fn deref(&self) -> &Vec<F> {
        &self.elements
    }
}

impl<F> DerefMut for FieldVec<F> {
    fn deref_mut(&mut self) -> &mut Vec<F> {
        &mut self.elements
    }
}

impl<F> From<Vec<F>> for FieldVec<F> {
    fn from(elements: Vec<F>) -> Self {
        Self { elements }
    }
}

impl<F> FromIterator<F> for FieldVec<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<F: Field + Default> Field for FieldVec<F> {
    fn length(&self) -> usize {
        self.elements.iter().map(Field::length).sum()
    }

    fn read(&mut self, input: &mut &[u8]) -> Result<(), Error> {
        self.elements.clear();
        let mut rest = *input;
        while !rest.is_empty() {
            let before = rest.len();
            let mut element = F::default();
            element.read(&mut rest)?;
            if rest.len() == before {
                break;
            }
            self.elements.push(element);
        }
        *input = rest;
        Ok(())
    }

    fn read_unchecked(&mut self, input: &mut &[u8]) {
        self.elements.clear();
        while !input.is_empty() {
            let before = input.len();
            let mut element = F::default();
            element.read_unchecked(input);
            if input.len() == before {
                break;
            }
            self.elements.push(element);
        }
    }

    fn write(&self, output: &mut &mut [u8]) -> Result<(), Error> {
        check_output("field vec", output, self.length())?;
        for element in &self.elements {
            element.write(output)?;
        }
        Ok(())
    }

    fn write_unchecked(&self, output: &mut &mut [u8]) {
        for element in &self.elements {
            element.write_unchecked(output);
        }
    }

    fn valid(&self) -> bool {
        self.elements
            .iter()
            .fold(true, |valid, element| element.valid() && valid)
    }

    fn refresh(&mut self) -> bool {
        self.elements
            .iter_mut()
            .fold(false, |changed, element| element.refresh() || changed)
    }
}
