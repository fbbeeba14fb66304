//! Minimal Solidity ABI support for the game contract: keccak selectors and
//! topics, 32-byte word encoding, and strict word decoding.

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

use crate::error::DecodeError;

pub const WORD: usize = 32;

/// A 20-byte account or contract address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0; 20]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 20]
    }

    /// `0x1234...abcd`, or `None` for the zero address.
    pub fn short(&self) -> String {
        if self.is_zero() {
            return "None".to_string();
        }
        let full = self.to_string();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }

    fn to_word(self) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        word[12..].copy_from_slice(&self.0);
        word
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s)?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|_| DecodeError::InvalidHex(s.to_string()))?;
        Ok(Address(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// First four bytes of the signature's hash.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// `topics[0]` of a non-anonymous event.
pub fn event_topic(signature: &str) -> [u8; 32] {
    keccak256(signature.as_bytes())
}

/// Decodes `0x`-prefixed (or bare) hex. An odd number of digits is rejected.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, DecodeError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|_| DecodeError::InvalidHex(s.to_string()))
}

pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parses a JSON-RPC quantity (`0x` followed by at most 64 hex digits, no padding required).
pub fn parse_quantity(s: &str) -> Result<U256, DecodeError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| DecodeError::InvalidHex(s.to_string()))?;
    if digits.is_empty() || digits.len() > 64 {
        return Err(DecodeError::InvalidHex(s.to_string()));
    }
    let padded = format!("{:0>64}", digits);
    let bytes = hex::decode(padded).map_err(|_| DecodeError::InvalidHex(s.to_string()))?;
    Ok(U256::from_big_endian(&bytes))
}

pub fn parse_quantity_u64(s: &str) -> Result<u64, DecodeError> {
    let value = parse_quantity(s)?;
    if value.bits() > 64 {
        return Err(DecodeError::InvalidHex(s.to_string()));
    }
    Ok(value.low_u64())
}

/// Formats a JSON-RPC quantity (no leading zeros).
pub fn quantity(value: impl Into<U256>) -> String {
    format!("{:#x}", value.into())
}

pub fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

/// Timestamps and durations are `uint256` on chain.
pub fn saturating_u64(value: U256) -> u64 {
    if value.bits() > 64 {
        u64::MAX
    } else {
        value.low_u64()
    }
}

/// Static argument of a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Uint(U256),
    Address(Address),
}

/// Calldata for `signature` with static arguments.
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + args.len() * WORD);
    data.extend_from_slice(&selector(signature));
    for arg in args {
        match arg {
            Token::Uint(value) => data.extend_from_slice(&uint_word(*value)),
            Token::Address(address) => data.extend_from_slice(&address.to_word()),
        }
    }
    data
}

/// Read-only view over ABI-encoded words.
pub struct Words<'a> {
    data: &'a [u8],
}

impl<'a> Words<'a> {
    /// Requires `data` to be exactly `count` words long.
    pub fn exact(data: &'a [u8], count: usize) -> Result<Self, DecodeError> {
        if data.len() != count * WORD {
            return Err(DecodeError::DataLength {
                expected: count * WORD,
                found: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Requires `data` to be word-aligned, with no fixed length.
    pub fn dynamic(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.len() % WORD != 0 {
            return Err(DecodeError::DataLength {
                expected: (data.len() / WORD + 1) * WORD,
                found: data.len(),
            });
        }
        Ok(Self { data })
    }

    pub fn len(&self) -> usize {
        self.data.len() / WORD
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn word(&self, index: usize) -> Result<&'a [u8], DecodeError> {
        let start = index.checked_mul(WORD).ok_or(DecodeError::InvalidDynamic(index))?;
        let end = start.checked_add(WORD).ok_or(DecodeError::InvalidDynamic(index))?;
        self.data.get(start..end).ok_or(DecodeError::DataLength {
            expected: end,
            found: self.data.len(),
        })
    }

    pub fn uint(&self, index: usize) -> Result<U256, DecodeError> {
        Ok(U256::from_big_endian(self.word(index)?))
    }

    pub fn address(&self, index: usize) -> Result<Address, DecodeError> {
        address_from_word(self.word(index)?).ok_or(DecodeError::InvalidAddress(index))
    }

    pub fn boolean(&self, index: usize) -> Result<bool, DecodeError> {
        let value = self.uint(index)?;
        if value > U256::one() {
            return Err(DecodeError::InvalidBool(index));
        }
        Ok(value == U256::one())
    }

    /// `address[]` whose head offset lives at word `index`.
    pub fn address_array(&self, index: usize) -> Result<Vec<Address>, DecodeError> {
        let offset = self.small(index)?;
        if offset % WORD != 0 {
            return Err(DecodeError::InvalidDynamic(index));
        }
        let start = offset / WORD;
        let length = self.small(start)?;
        let end = start
            .checked_add(1)
            .and_then(|first| first.checked_add(length))
            .ok_or(DecodeError::InvalidDynamic(start))?;
        if end > self.len() {
            return Err(DecodeError::InvalidDynamic(start));
        }
        (0..length).map(|i| self.address(start + 1 + i)).collect()
    }

    fn small(&self, index: usize) -> Result<usize, DecodeError> {
        let value = self.uint(index)?;
        if value.bits() > 32 {
            return Err(DecodeError::InvalidDynamic(index));
        }
        Ok(value.low_u64() as usize)
    }
}

/// Address stored right-aligned in a word; the 12 high bytes must be zero.
pub fn address_from_word(word: &[u8]) -> Option<Address> {
    if word.len() != WORD || word[..12].iter().any(|b| *b != 0) {
        return None;
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Some(Address(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_selectors() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(
            encode_hex(&event_topic("Transfer(address,address,uint256)")),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn test_address_parse_and_display() {
        let address = Address::from_str("0xDBdB83000b490b239ddA8E9efcAB2f3b9c3c2BdC").unwrap();
        assert_eq!(address.to_string(), "0xdbdb83000b490b239dda8e9efcab2f3b9c3c2bdc");
        assert_eq!(address.short(), "0xdbdb...2bdc");
        assert_eq!(Address::ZERO.short(), "None");
        assert!(Address::from_str("0x1234").is_err());
        assert!(Address::from_str("not hex").is_err());
    }

    #[test]
    fn test_quantities() {
        assert_eq!(parse_quantity_u64("0x0").unwrap(), 0);
        assert_eq!(parse_quantity_u64("0x1b4").unwrap(), 436);
        assert!(parse_quantity("1b4").is_err());
        assert!(parse_quantity("0x").is_err());
        assert_eq!(quantity(436u64), "0x1b4");
        assert_eq!(quantity(0u64), "0x0");
    }

    #[test]
    fn test_encode_call_pads_arguments() {
        let data = encode_call("updateBufferSettings(uint256,uint256)", &[
            Token::Uint(U256::from(300)),
            Token::Uint(U256::from(60)),
        ]);
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &selector("updateBufferSettings(uint256,uint256)"));
        assert_eq!(data[4 + 31], 0x2c);
        assert_eq!(data[4 + 30], 0x01);
        assert_eq!(data[4 + 63], 60);
    }

    #[test]
    fn test_words_reject_dirty_address_and_bool() {
        let mut data = vec![0u8; 64];
        data[0] = 1;
        data[63] = 2;
        let words = Words::exact(&data, 2).unwrap();
        assert_eq!(words.address(0), Err(DecodeError::InvalidAddress(0)));
        assert_eq!(words.boolean(1), Err(DecodeError::InvalidBool(1)));
        assert!(Words::exact(&data, 3).is_err());
    }

    #[test]
    fn test_address_array() {
        let a = Address([0x11; 20]);
        let b = Address([0x22; 20]);
        let mut data = Vec::new();
        data.extend_from_slice(&uint_word(U256::from(32)));
        data.extend_from_slice(&uint_word(U256::from(2)));
        data.extend_from_slice(&a.to_word());
        data.extend_from_slice(&b.to_word());
        let words = Words::dynamic(&data).unwrap();
        assert_eq!(words.address_array(0).unwrap(), vec![a, b]);

        // Length pointing past the end.
        data[63] = 5;
        let words = Words::dynamic(&data).unwrap();
        assert!(words.address_array(0).is_err());
    }

    #[test]
    fn test_address_array_rejects_huge_length_and_offset() {
        let mut data = Vec::new();
        data.extend_from_slice(&uint_word(U256::from(32)));
        data.extend_from_slice(&uint_word(U256::from(u32::MAX)));
        let words = Words::dynamic(&data).unwrap();
        assert_eq!(words.address_array(0), Err(DecodeError::InvalidDynamic(1)));

        let mut data = Vec::new();
        data.extend_from_slice(&uint_word(U256::from(u32::MAX - 31)));
        let words = Words::dynamic(&data).unwrap();
        assert!(words.address_array(0).is_err());
    }
}
