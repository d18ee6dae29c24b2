use crate::Base62Error;

/// The 62-character alphabet: digits, then upper case, then lower case.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Longest possible encoding of a `u64` (`62^11 > 2^64`).
pub const MAX_LEN: usize = 11;

const BASE: u64 = 62;
const NO_VALUE: u8 = 255;

/// Lookup table for base62 decoding.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        lut[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    lut
};

/// Encodes `value` into the tail of `buf`, returning the written slice as a
/// `&str`.
///
/// This is the zero-allocation variant of [`encode`]. `0` encodes to `"0"`.
///
/// # Example
///
/// ```
/// use linklet::{MAX_LEN, encode_to_buf};
///
/// let mut buf = [0u8; MAX_LEN];
/// assert_eq!(encode_to_buf(3_843, &mut buf), "zz");
/// ```
pub fn encode_to_buf(mut value: u64, buf: &mut [u8; MAX_LEN]) -> &str {
    let mut pos = MAX_LEN;
    loop {
        pos -= 1;
        buf[pos] = ALPHABET[(value % BASE) as usize];
        value /= BASE;
        if value == 0 {
            break;
        }
    }

    // SAFETY: every byte in `buf[pos..]` was copied from `ALPHABET`, which is
    // ASCII.
    unsafe { core::str::from_utf8_unchecked(&buf[pos..]) }
}

/// Encodes `value` as a base62 string, most significant digit first.
///
/// # Example
///
/// ```
/// use linklet::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(61), "z");
/// assert_eq!(encode(62), "10");
/// ```
pub fn encode(value: u64) -> String {
    let mut buf = [0u8; MAX_LEN];
    encode_to_buf(value, &mut buf).to_owned()
}

/// Decodes a canonical base62 string back into its integer.
///
/// # Errors
///
/// See [`Base62Error`]: empty input, input longer than [`MAX_LEN`], bytes
/// outside the alphabet, a leading zero, or a value beyond `u64::MAX`.
///
/// # Example
///
/// ```
/// use linklet::{Base62Error, decode};
///
/// assert_eq!(decode("10"), Ok(62));
/// assert_eq!(decode("0"), Ok(0));
/// assert_eq!(decode("a-b"), Err(Base62Error::InvalidChar { byte: b'-', index: 1 }));
/// ```
pub fn decode(s: &str) -> Result<u64, Base62Error> {
    let bytes = s.as_bytes();
    match bytes.len() {
        0 => return Err(Base62Error::Empty),
        len if len > MAX_LEN => return Err(Base62Error::InvalidLen { len }),
        _ => {}
    }

    let mut value: u64 = 0;
    for (index, &byte) in bytes.iter().enumerate() {
        let digit = LOOKUP[byte as usize];
        if digit == NO_VALUE {
            return Err(Base62Error::InvalidChar { byte, index });
        }
        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(Base62Error::Overflow)?;
    }

    if bytes.len() > 1 && bytes[0] == ALPHABET[0] {
        return Err(Base62Error::NonCanonical);
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_has_a_defined_encoding() {
        assert_eq!(encode(0), "0");
        assert_eq!(decode("0"), Ok(0));
    }

    #[test]
    fn known_values() {
        assert_eq!(encode(1), "1");
        assert_eq!(encode(10), "A");
        assert_eq!(encode(36), "a");
        assert_eq!(encode(61), "z");
        assert_eq!(encode(62), "10");
        assert_eq!(encode(62 * 62), "100");
        assert_eq!(encode(u64::MAX), "LygHa16AHYF");
        assert_eq!(decode("LygHa16AHYF"), Ok(u64::MAX));
    }

    #[test]
    fn roundtrip_edges() {
        for value in [
            0,
            1,
            61,
            62,
            3_843,
            3_844,
            (1 << 32) - 1,
            1 << 32,
            i64::MAX as u64,
            u64::MAX - 1,
            u64::MAX,
        ] {
            assert_eq!(decode(&encode(value)), Ok(value), "value {value}");
        }
    }

    #[test]
    fn roundtrip_spread_over_63_bits() {
        let mut value: u64 = 0x9E37_79B9_7F4A_7C15;
        for _ in 0..10_000 {
            value = value.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let x = value >> 1;
            assert_eq!(decode(&encode(x)), Ok(x));
        }
    }

    #[test]
    fn encoding_preserves_order_within_equal_lengths() {
        let a = encode(1_000_000);
        let b = encode(1_000_001);
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        for (input, byte, index) in [("abc-", b'-', 3), ("_x", b'_', 0), ("a b", b' ', 1)] {
            assert_eq!(
                decode(input),
                Err(Base62Error::InvalidChar { byte, index }),
                "input {input:?}"
            );
        }
        // multi-byte UTF-8 is rejected on its first byte
        assert!(matches!(
            decode("aé"),
            Err(Base62Error::InvalidChar { index: 1, .. })
        ));
    }

    #[test]
    fn rejects_empty_long_and_overflowing_input() {
        assert_eq!(decode(""), Err(Base62Error::Empty));
        assert_eq!(
            decode("111111111111"),
            Err(Base62Error::InvalidLen { len: 12 })
        );
        assert_eq!(decode("LygHa16AHYG"), Err(Base62Error::Overflow));
        assert_eq!(decode("zzzzzzzzzzz"), Err(Base62Error::Overflow));
    }

    #[test]
    fn rejects_leading_zeros() {
        assert_eq!(decode("00"), Err(Base62Error::NonCanonical));
        assert_eq!(decode("0A"), Err(Base62Error::NonCanonical));
        assert_eq!(decode("A"), Ok(10));
    }

    #[test]
    fn encoded_bytes_come_from_the_alphabet() {
        let mut buf = [0xffu8; MAX_LEN];
        for value in [0, 9, 35, 61, 62, 1 << 40, u64::MAX] {
            let s = encode_to_buf(value, &mut buf);
            assert!(!s.is_empty() && s.len() <= MAX_LEN);
            assert!(s.bytes().all(|b| ALPHABET.contains(&b)), "value {value}");
        }
    }

    #[test]
    fn lookup_covers_exactly_the_alphabet() {
        let valid = LOOKUP.iter().filter(|&&v| v != NO_VALUE).count();
        assert_eq!(valid, 62);
        for (i, &c) in ALPHABET.iter().enumerate() {
            assert_eq!(LOOKUP[c as usize] as usize, i);
        }
    }
}
