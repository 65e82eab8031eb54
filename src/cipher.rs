//! Rotation cipher over a fixed 95-character alphabet.

use crate::error::{Error, Result};

/// Digits, lowercase, uppercase, ASCII punctuation, then space.
pub const ROTATION_ALPHABET: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~ ";

const ALPHABET_LEN: usize = 95;

const fn build_positions() -> [u8; 128] {
    let bytes = ROTATION_ALPHABET.as_bytes();
    let mut table = [u8::MAX; 128];
    let mut i = 0;
    while i < bytes.len() {
        table[bytes[i] as usize] = i as u8;
        i += 1;
    }
    table
}

const POSITIONS: [u8; 128] = build_positions();

#[inline]
fn position(ch: char) -> Option<usize> {
    let code = ch as usize;
    if code >= POSITIONS.len() {
        return None;
    }
    match POSITIONS[code] {
        u8::MAX => None,
        p => Some(p as usize),
    }
}

/// Rotate `ch` forward by `rotation` positions, wrapping at 95.
///
/// Returns `None` for characters outside the alphabet.
pub fn rotate(ch: char, rotation: u32) -> Option<char> {
    let p = position(ch)?;
    let q = (p + rotation as usize % ALPHABET_LEN) % ALPHABET_LEN;
    Some(ROTATION_ALPHABET.as_bytes()[q] as char)
}

/// Decrypt a single character at position `index` of the ciphertext.
pub fn decrypt_letter(index: usize, ch: char, rotation: u32) -> Result<char> {
    rotate(ch, rotation).ok_or(Error::InvalidCiphertext { index, ch })
}

/// Decrypt `ciphertext`, rotating each character by its column aggregate.
///
/// Characters beyond the end of `rotations` are dropped.
pub fn decrypt(ciphertext: &str, rotations: &[u32]) -> Result<String> {
    ciphertext
        .chars()
        .zip(rotations)
        .enumerate()
        .map(|(i, (ch, &rot))| decrypt_letter(i, ch, rot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ALPHABET_LEN, ROTATION_ALPHABET, decrypt, rotate};
    use crate::error::Error;

    #[test]
    fn alphabet_has_95_unique_characters() {
        let mut chars: Vec<char> = ROTATION_ALPHABET.chars().collect();
        assert_eq!(chars.len(), ALPHABET_LEN);
        chars.sort_unstable();
        chars.dedup();
        assert_eq!(chars.len(), ALPHABET_LEN);
    }

    #[test]
    fn documented_rotations() {
        assert_eq!(rotate('e', 2), Some('g'));
        assert_eq!(rotate('Z', 4), Some('$'));
        assert_eq!(rotate('1', 5), Some('6'));
        assert_eq!(rotate('!', 94), Some('Z'));
        assert_eq!(rotate(' ', 1), Some('0'));
    }

    #[test]
    fn rotation_wraps_past_full_cycles() {
        assert_eq!(rotate('a', 95), Some('a'));
        assert_eq!(rotate('a', 95 * 3 + 1), Some('b'));
    }

    #[test]
    fn unknown_characters_are_errors() {
        assert_eq!(rotate('\n', 0), None);
        assert_eq!(rotate('é', 0), None);
        assert!(matches!(
            decrypt("ab\tc", &[0, 0, 0, 0]),
            Err(Error::InvalidCiphertext { index: 2, ch: '\t' })
        ));
    }

    #[test]
    fn decrypt_zips_rotations() {
        assert_eq!(decrypt("aaa", &[0, 1, 2]).unwrap(), "abc");
    }
}
