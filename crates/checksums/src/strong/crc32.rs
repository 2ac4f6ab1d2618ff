use super::StrongDigest;

/// Streaming IEEE CRC-32 (reflected polynomial `0xEDB88320`).
///
/// The digest is the checksum in big-endian byte order so its hexadecimal
/// rendering matches the conventional `%08x` form.
#[derive(Clone, Debug, Default)]
pub struct Crc32 {
    inner: crc32fast::Hasher,
}

impl Crc32 {
    /// Creates a hasher with an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: crc32fast::Hasher::new(),
        }
    }

    /// Feeds additional bytes into the checksum.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Returns the checksum as an integer.
    #[must_use]
    pub fn finalize_u32(self) -> u32 {
        self.inner.finalize()
    }

    /// Returns the checksum as big-endian bytes.
    #[must_use]
    pub fn finalize(self) -> [u8; 4] {
        self.finalize_u32().to_be_bytes()
    }

    /// Computes the CRC-32 of `data` in one shot.
    #[must_use]
    pub fn digest(data: &[u8]) -> [u8; 4] {
        <Self as StrongDigest>::digest(data)
    }
}

impl StrongDigest for Crc32 {
    type Digest = [u8; 4];
    const DIGEST_LEN: usize = 4;
    const NAME: &'static str = "crc32";

    fn new() -> Self {
        Self::new()
    }

    fn update(&mut self, data: &[u8]) {
        self.update(data);
    }

    fn finalize(self) -> Self::Digest {
        self.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode_hex;

    #[test]
    fn crc32_matches_known_vectors() {
        let vectors = [
            (b"".as_slice(), "00000000"),
            (b" ".as_slice(), "e96ccf45"),
            (b"crc".as_slice(), "7c6287fd"),
            (b"123456789".as_slice(), "cbf43926"),
            (
                b"The quick brown fox jumps over the lazy dog".as_slice(),
                "414fa339",
            ),
        ];

        for (input, expected_hex) in vectors {
            assert_eq!(encode_hex(&Crc32::digest(input)), expected_hex);
        }
    }

    #[test]
    fn split_updates_match_one_shot() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let mut hasher = Crc32::new();
        for chunk in data.chunks(7) {
            hasher.update(chunk);
        }
        assert_eq!(hasher.finalize_u32(), 0x414f_a339);
    }
}
