//! Fixed-width packed storage for palette indices.
//!
//! Each element occupies exactly `bits` bits (0, 2, 4, 8, or 16), packed
//! tightly into `u64` words. A zero-bit array stores nothing and reads as
//! all zeroes, which is how a uniform chunk avoids index storage entirely.

use serde::{Deserialize, Serialize};

/// A compact array where every element is stored with the same bit width.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PackedIndexArray {
    words: Vec<u64>,
    bits: u8,
    len: usize,
}

impl PackedIndexArray {
    /// Creates an array of `len` zero-initialized elements.
    ///
    /// `bits` must be one of 0, 2, 4, 8, or 16.
    pub fn new(bits: u8, len: usize) -> Self {
        debug_assert!(
            matches!(bits, 0 | 2 | 4 | 8 | 16),
            "bits must be 0, 2, 4, 8, or 16"
        );
        let word_count = if bits == 0 {
            0
        } else {
            (len as u64 * u64::from(bits)).div_ceil(64) as usize
        };
        Self {
            words: vec![0u64; word_count],
            bits,
            len,
        }
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> u16 {
        debug_assert!(index < self.len, "index out of bounds");
        if self.bits == 0 {
            return 0;
        }
        let bit_index = index as u64 * u64::from(self.bits);
        let word = (bit_index / 64) as usize;
        let offset = (bit_index % 64) as u32;
        let mask = (1u64 << self.bits) - 1;
        ((self.words[word] >> offset) & mask) as u16
    }

    /// Stores `value` at `index`. The value must fit in the current bit width.
    pub fn set(&mut self, index: usize, value: u16) {
        debug_assert!(index < self.len, "index out of bounds");
        if self.bits == 0 {
            return;
        }
        debug_assert!(
            self.bits >= 16 || value < (1u16 << self.bits),
            "value {value} exceeds {}-bit capacity",
            self.bits
        );
        let bit_index = index as u64 * u64::from(self.bits);
        let word = (bit_index / 64) as usize;
        let offset = (bit_index % 64) as u32;
        let mask = (1u64 << self.bits) - 1;
        self.words[word] &= !(mask << offset);
        self.words[word] |= u64::from(value) << offset;
    }

    /// Bits per element.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Number of logical elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the backing word storage in bytes.
    pub fn storage_bytes(&self) -> usize {
        self.words.len() * 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_bit_array_reads_zero() {
        let arr = PackedIndexArray::new(0, 512);
        assert_eq!(arr.get(0), 0);
        assert_eq!(arr.get(511), 0);
        assert_eq!(arr.storage_bytes(), 0);
    }

    #[test]
    fn test_two_bit_roundtrip() {
        let mut arr = PackedIndexArray::new(2, 100);
        for i in 0..100 {
            arr.set(i, (i % 4) as u16);
        }
        for i in 0..100 {
            assert_eq!(arr.get(i), (i % 4) as u16);
        }
    }

    #[test]
    fn test_four_bit_roundtrip() {
        let mut arr = PackedIndexArray::new(4, 33);
        for i in 0..33 {
            arr.set(i, (i % 16) as u16);
        }
        for i in 0..33 {
            assert_eq!(arr.get(i), (i % 16) as u16);
        }
    }

    #[test]
    fn test_sixteen_bit_roundtrip() {
        let mut arr = PackedIndexArray::new(16, 64);
        for i in 0..64 {
            arr.set(i, i as u16 * 1000);
        }
        for i in 0..64 {
            assert_eq!(arr.get(i), i as u16 * 1000);
        }
    }

    #[test]
    fn test_set_does_not_disturb_neighbors() {
        let mut arr = PackedIndexArray::new(8, 32);
        for i in 0..32 {
            arr.set(i, i as u16);
        }
        arr.set(15, 200);
        assert_eq!(arr.get(14), 14);
        assert_eq!(arr.get(15), 200);
        assert_eq!(arr.get(16), 16);
    }

    #[test]
    fn test_storage_size_scales_with_bits() {
        // A 16x16x384 column volume at 4 bits is 49152 bytes.
        let volume = 16 * 16 * 384;
        let arr = PackedIndexArray::new(4, volume);
        assert_eq!(arr.storage_bytes(), volume / 2);
    }
}
