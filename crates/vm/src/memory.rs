//! Word-addressed memory.
//!
//! Code and data share one address space. Memory starts out as the program
//! image and grows when a store lands past its current extent; the new cells
//! are zero-filled. Loads past the extent fail. Because addresses are 16-bit
//! words, a store can never leave the address space.

use synvm_common::{Image, Word, WordSource};
use thiserror::Error;

/// A load from an address that has never been loaded or stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("address {address} is beyond memory extent {extent}")]
pub struct OutOfRange {
    pub address: Word,
    pub extent: usize,
}

/// Growable word memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    /// Create memory holding `words` at addresses `0..words.len()`.
    pub fn new(words: Vec<Word>) -> Self {
        Self { cells: words }
    }

    /// Read the word at `address`.
    pub fn load(&self, address: Word) -> Result<Word, OutOfRange> {
        self.cells
            .get(address as usize)
            .copied()
            .ok_or(OutOfRange {
                address,
                extent: self.cells.len(),
            })
    }

    /// Write `word` at `address`, growing memory if needed.
    pub fn store(&mut self, address: Word, word: Word) {
        let index = address as usize;
        if index >= self.cells.len() {
            self.cells.resize(index + 1, 0);
        }
        self.cells[index] = word;
    }

    /// Number of addressable cells.
    pub fn extent(&self) -> usize {
        self.cells.len()
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.cells
    }
}

impl From<Image> for Memory {
    fn from(image: Image) -> Self {
        Self::new(image.words)
    }
}

impl WordSource for Memory {
    fn word_at(&self, addr: usize) -> Option<Word> {
        self.cells.get(addr).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_within_extent() {
        let memory = Memory::new(vec![7, 8, 9]);
        assert_eq!(memory.load(0), Ok(7));
        assert_eq!(memory.load(2), Ok(9));
    }

    #[test]
    fn load_at_extent_fails() {
        let memory = Memory::new(vec![7, 8, 9]);
        assert_eq!(
            memory.load(3),
            Err(OutOfRange {
                address: 3,
                extent: 3
            })
        );
    }

    #[test]
    fn store_grows_and_zero_fills() {
        let mut memory = Memory::new(vec![1]);
        memory.store(4, 42);
        assert_eq!(memory.extent(), 5);
        assert_eq!(memory.as_slice(), &[1, 0, 0, 0, 42]);
        assert_eq!(memory.load(2), Ok(0));
    }

    #[test]
    fn store_in_place_does_not_grow() {
        let mut memory = Memory::new(vec![1, 2, 3]);
        memory.store(1, 20);
        assert_eq!(memory.as_slice(), &[1, 20, 3]);
    }

    #[test]
    fn store_at_top_of_address_space() {
        let mut memory = Memory::default();
        memory.store(u16::MAX, 5);
        assert_eq!(memory.extent(), 65536);
        assert_eq!(memory.load(u16::MAX), Ok(5));
    }

    #[test]
    fn word_source_matches_load() {
        let memory = Memory::from(Image::new(vec![3, 4]));
        assert_eq!(memory.word_at(1), Some(4));
        assert_eq!(memory.word_at(2), None);
    }
}
