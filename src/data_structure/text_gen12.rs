//! Generation I/II character table and text codec.
//!
//! Mirrors `character_set.rs`'s Gen-3 table in shape (a flat 256-entry
//! lookup plus a reverse lookup) but with the Gen-1/2 code points: the
//! terminator is `0x50`, not `0xFF`, and the alphabet occupies a different
//! range entirely.
const TERMINATOR: u8 = 0x50;
const SPACE: u8 = 0x7F;

fn get_char_set() -> [&'static str; 256] {
    let mut char_set: [&str; 256] = ["?"; 256];
    char_set[TERMINATOR as usize] = "";
    char_set[SPACE as usize] = " ";

    for i in 0..26u8 {
        char_set[(0x80 + i) as usize] = UPPER[i as usize];
        char_set[(0xA0 + i) as usize] = LOWER[i as usize];
    }

    char_set[0xE3] = "-";
    char_set[0xE6] = "?";
    char_set[0xE7] = "!";
    char_set[0xE8] = ".";
    char_set[0x51] = "PK";
    char_set[0x52] = "MN";

    for i in 0..10u8 {
        char_set[(0xF6 + i) as usize] = DIGITS[i as usize];
    }

    char_set
}

const UPPER: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z",
];
const LOWER: [&str; 26] = [
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s",
    "t", "u", "v", "w", "x", "y", "z",
];
const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

pub fn get_char(index: usize) -> &'static str {
    get_char_set()[index]
}

pub fn get_code(s: &str) -> u8 {
    get_char_set()
        .iter()
        .position(|&c| c == s)
        .map(|i| i as u8)
        .unwrap_or(SPACE)
}

/// Decodes a fixed-width Gen-1/2 byte field, stopping at the terminator or
/// the end of the field.
pub fn decode_gen12(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != TERMINATOR)
        .map(|&b| get_char(b as usize))
        .collect()
}

/// Encodes a string into a fixed-width Gen-1/2 byte field, padding unused
/// bytes with the terminator.
pub fn encode_gen12(text: &str, width: usize) -> Vec<u8> {
    let mut bytes: Vec<u8> = text.chars().map(|c| get_code(&c.to_string())).collect();
    bytes.truncate(width);
    bytes.resize(width, TERMINATOR);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_stops_at_terminator() {
        let bytes = [0x80, 0x81, 0x82, TERMINATOR, 0x83];
        assert_eq!(decode_gen12(&bytes), "ABC");
    }

    #[test]
    fn encode_pads_with_terminator() {
        let encoded = encode_gen12("AB", 4);
        assert_eq!(encoded, vec![0x80, 0x81, TERMINATOR, TERMINATOR]);
    }

    #[test]
    fn round_trip_through_encode_decode() {
        let encoded = encode_gen12("MEW", 6);
        assert_eq!(decode_gen12(&encoded), "MEW");
    }

    #[test]
    fn punctuation_digraphs_decode() {
        assert_eq!(get_char(0x51), "PK");
        assert_eq!(get_char(0x52), "MN");
    }
}
