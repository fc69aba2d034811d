//! Binary quantization: float embeddings to bit-packed codes

use serde::{Deserialize, Serialize};

/// Bit-packed binary embedding, one bit per float dimension.
///
/// A vector of N floats always packs into ⌈N/8⌉ bytes, regardless of the
/// input magnitudes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryCode(Vec<u8>);

impl BinaryCode {
    /// Wrap raw packed bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Packed byte representation
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bits in the code
    pub fn bit_len(&self) -> usize {
        self.0.len() * 8
    }

    /// Hamming distance to another code: popcount of the XOR.
    ///
    /// Codes of different lengths are compared over the shorter prefix;
    /// the index rejects mixed lengths before they can meet here.
    pub fn hamming_distance(&self, other: &BinaryCode) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

/// Quantize a float vector by sign test: bit i is set iff `vector[i] > 0.0`.
///
/// Bits are packed most-significant-first within each byte. Deterministic:
/// identical input always yields identical output.
pub fn quantize(vector: &[f32]) -> BinaryCode {
    let mut bytes = vec![0u8; vector.len().div_ceil(8)];
    for (i, &value) in vector.iter().enumerate() {
        if value > 0.0 {
            bytes[i / 8] |= 0x80 >> (i % 8);
        }
    }
    BinaryCode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_one_bit_per_dimension() {
        // 1001_0000: positive, negative, zero, positive
        let code = quantize(&[1.0, -1.0, 0.0, 2.5]);
        assert_eq!(code.as_bytes(), &[0b1001_0000]);
        assert_eq!(code.bit_len(), 8);
    }

    #[test]
    fn length_is_ceil_of_dims_over_eight() {
        assert_eq!(quantize(&[0.0; 8]).as_bytes().len(), 1);
        assert_eq!(quantize(&[0.0; 9]).as_bytes().len(), 2);
        assert_eq!(quantize(&[0.0; 1024]).as_bytes().len(), 128);
        assert_eq!(quantize(&[]).as_bytes().len(), 0);
    }

    #[test]
    fn zero_maps_to_zero_bit() {
        let code = quantize(&[0.0, -0.0, f32::MIN_POSITIVE]);
        assert_eq!(code.as_bytes(), &[0b0010_0000]);
    }

    #[test]
    fn magnitude_does_not_matter() {
        let small = quantize(&[0.001, -0.001]);
        let large = quantize(&[1000.0, -1000.0]);
        assert_eq!(small, large);
    }

    #[test]
    fn deterministic_across_calls() {
        let v: Vec<f32> = (0..100).map(|i| (i as f32) - 50.0).collect();
        assert_eq!(quantize(&v), quantize(&v));
    }

    #[test]
    fn hamming_distance_counts_differing_bits() {
        let a = BinaryCode::from_bytes(vec![0xFF, 0x00]);
        let b = BinaryCode::from_bytes(vec![0x00, 0x00]);
        assert_eq!(a.hamming_distance(&b), 8);
        assert_eq!(a.hamming_distance(&a), 0);

        let c = BinaryCode::from_bytes(vec![0b1010_1010, 0b0101_0101]);
        let d = BinaryCode::from_bytes(vec![0b0101_0101, 0b1010_1010]);
        assert_eq!(c.hamming_distance(&d), 16);
    }
}
