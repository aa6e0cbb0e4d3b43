//! `#rrggbb` conversion for palette colors.

use palette::Srgb;

use crate::error::{PaletteError, Result};

/// Lowercase, zero-padded `#rrggbb`.
pub fn encode(c: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

/// Parse exactly `#` followed by six hex digits (either case).
pub fn decode(s: &str) -> Result<Srgb<u8>> {
    let invalid = || PaletteError::InvalidHex(s.to_string());

    let digits = s.strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    Ok(Srgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Whether dark text reads better than light text on top of `c` (YIQ luma).
pub fn is_light(c: Srgb<u8>) -> bool {
    let yiq = (c.red as u32 * 299 + c.green as u32 * 587 + c.blue as u32 * 114) / 1000;
    yiq > 150
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(Srgb::new(0, 0, 0)), "#000000");
        assert_eq!(encode(Srgb::new(255, 255, 255)), "#ffffff");
        assert_eq!(encode(Srgb::new(1, 2, 3)), "#010203");
        assert_eq!(encode(Srgb::new(196, 149, 106)), "#c4956a");
    }

    #[test]
    fn test_round_trip_every_channel_value() {
        for v in 0..=255u8 {
            for c in [
                Srgb::new(v, 0, 0),
                Srgb::new(0, v, 0),
                Srgb::new(0, 0, v),
                Srgb::new(v, v.wrapping_mul(7), 255 - v),
            ] {
                assert_eq!(decode(&encode(c)).unwrap(), c);
            }
        }
    }

    #[test]
    fn test_decode_accepts_uppercase() {
        assert_eq!(decode("#C4956A").unwrap(), Srgb::new(196, 149, 106));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        for bad in ["", "#", "c4956a", "#c4956", "#c4956a0", "#c4956g", "#+f0000", "##c4956", "#c495 6a"] {
            assert!(
                matches!(decode(bad), Err(PaletteError::InvalidHex(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_is_light() {
        assert!(is_light(Srgb::new(255, 255, 255)));
        assert!(is_light(Srgb::new(230, 190, 160)));
        assert!(!is_light(Srgb::new(0, 0, 0)));
        assert!(!is_light(Srgb::new(90, 60, 40)));
    }
}
