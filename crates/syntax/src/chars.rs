//! Byte classification.
//!
//! A flat 256-entry table lets the scanner's hot loop advance with a
//! single indirect load per byte. Identifier bytes are a subset of
//! value bytes, so a value scan accepts any class `>= IDENT`.

pub(crate) const INVALID: i8 = -1;
/// Space, tab, carriage return.
pub(crate) const SPACE: i8 = 1;
/// `\n`. Carriage returns are plain whitespace and are not paired.
pub(crate) const LINE_FEED: i8 = 2;
/// `#`, up to end of line.
pub(crate) const COMMENT: i8 = 3;
/// `A-Z`, `a-z`, `0-9`. Identifiers may not contain `-` or `_`.
pub(crate) const IDENT: i8 = 4;
/// Any other printable or high-bit byte.
pub(crate) const VALUE: i8 = 8;

#[rustfmt::skip]
const TABLE: [i8; 256] = [
  -1, -1, -1, -1, -1, -1, -1, -1,    // 0x00 - 0x07
  // tab (0x09), line feed (0x0a), carriage return (0x0d)
  -1,  1,  2, -1, -1,  1, -1, -1,    // 0x08 - 0x0f
  -1, -1, -1, -1, -1, -1, -1, -1,    // 0x10 - 0x17
  -1, -1, -1, -1, -1, -1, -1, -1,    // 0x18 - 0x1f
  // space (0x20), comment (0x23)
   1,  8,  8,  3,  8,  8,  8,  8,    // 0x20 - 0x27
   8,  8,  8,  8,  8,  8,  8,  8,    // 0x28 - 0x2f
   4,  4,  4,  4,  4,  4,  4,  4,    // 0x30 - 0x37
   4,  4,  8,  8,  8,  8,  8,  8,    // 0x38 - 0x3f
   8,  4,  4,  4,  4,  4,  4,  4,    // 0x40 - 0x47
   4,  4,  4,  4,  4,  4,  4,  4,    // 0x48 - 0x4f
   4,  4,  4,  4,  4,  4,  4,  4,    // 0x50 - 0x57
   4,  4,  4,  8,  8,  8,  8,  8,    // 0x58 - 0x5f
   8,  4,  4,  4,  4,  4,  4,  4,    // 0x60 - 0x67
   4,  4,  4,  4,  4,  4,  4,  4,    // 0x68 - 0x6f
   4,  4,  4,  4,  4,  4,  4,  4,    // 0x70 - 0x77
   4,  4,  4,  8,  8,  8,  8, -1,    // 0x78 - 0x7f
   8,  8,  8,  8,  8,  8,  8,  8,    // 0x80 - 0x87
   8,  8,  8,  8,  8,  8,  8,  8,    // 0x88 - 0x8f
   8,  8,  8,  8,  8,  8,  8,  8,    // 0x90 - 0x97
   8,  8,  8,  8,  8,  8,  8,  8,    // 0x98 - 0x9f
   8,  8,  8,  8,  8,  8,  8,  8,    // 0xa0 - 0xa7
   8,  8,  8,  8,  8,  8,  8,  8,    // 0xa8 - 0xaf
   8,  8,  8,  8,  8,  8,  8,  8,    // 0xb0 - 0xb7
   8,  8,  8,  8,  8,  8,  8,  8,    // 0xb8 - 0xbf
   8,  8,  8,  8,  8,  8,  8,  8,    // 0xc0 - 0xc7
   8,  8,  8,  8,  8,  8,  8,  8,    // 0xc8 - 0xcf
   8,  8,  8,  8,  8,  8,  8,  8,    // 0xd0 - 0xd7
   8,  8,  8,  8,  8,  8,  8,  8,    // 0xd8 - 0xdf
   8,  8,  8,  8,  8,  8,  8,  8,    // 0xe0 - 0xe7
   8,  8,  8,  8,  8,  8,  8,  8,    // 0xe8 - 0xef
   8,  8,  8,  8,  8,  8,  8,  8,    // 0xf0 - 0xf7
   8,  8,  8,  8,  8,  8,  8,  8,    // 0xf8 - 0xff
];

#[inline]
pub(crate) fn classify(byte: u8) -> i8 {
  TABLE[byte as usize]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classes() {
    assert_eq!(classify(b'a'), IDENT);
    assert_eq!(classify(b'Z'), IDENT);
    assert_eq!(classify(b'0'), IDENT);
    assert_eq!(classify(b' '), SPACE);
    assert_eq!(classify(b'\t'), SPACE);
    assert_eq!(classify(b'\r'), SPACE);
    assert_eq!(classify(b'\n'), LINE_FEED);
    assert_eq!(classify(b'#'), COMMENT);

    // value bytes, not identifier bytes
    assert_eq!(classify(b'-'), VALUE);
    assert_eq!(classify(b'_'), VALUE);
    assert_eq!(classify(b':'), VALUE);
    assert_eq!(classify(b'='), VALUE);
    assert_eq!(classify(b'"'), VALUE);
    assert_eq!(classify(0x80), VALUE);
    assert_eq!(classify(0xff), VALUE);

    assert_eq!(classify(0x00), INVALID);
    assert_eq!(classify(0x0b), INVALID);
    assert_eq!(classify(0x7f), INVALID);
  }
}
