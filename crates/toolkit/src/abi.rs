//! Minimal ABI call encoding for contract execution.
//!
//! Covers the argument kinds the toolkit accepts from callers: address,
//! uint256, bool, string and bytes. Encoding follows the standard head/tail
//! layout with a 4-byte Keccak-256 selector over `name(type,...)`.

use sha3::{Digest, Keccak256};

use hederakit_core::EvmAddress;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiValue {
    Address(EvmAddress),
    Uint(u128),
    Bool(bool),
    Utf8(String),
    Bytes(Vec<u8>),
}

impl AbiValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Uint(_) => "uint256",
            Self::Bool(_) => "bool",
            Self::Utf8(_) => "string",
            Self::Bytes(_) => "bytes",
        }
    }

    fn is_dynamic(&self) -> bool {
        matches!(self, Self::Utf8(_) | Self::Bytes(_))
    }

    /// The single 32-byte head word for a static value.
    fn static_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        match self {
            Self::Address(address) => word[12..].copy_from_slice(address.as_bytes()),
            Self::Uint(value) => word[16..].copy_from_slice(&value.to_be_bytes()),
            Self::Bool(value) => word[31] = u8::from(*value),
            Self::Utf8(_) | Self::Bytes(_) => unreachable!("dynamic values have no static word"),
        }
        word
    }

    /// Length-prefixed, zero-padded tail encoding for a dynamic value.
    fn dynamic_tail(&self) -> Vec<u8> {
        let data = match self {
            Self::Utf8(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes.as_slice(),
            _ => unreachable!("static values have no tail"),
        };

        let mut out = uint_word(data.len() as u128).to_vec();
        out.extend_from_slice(data);
        let padding = (32 - data.len() % 32) % 32;
        out.extend(std::iter::repeat(0u8).take(padding));
        out
    }
}

fn uint_word(value: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Canonical signature string, e.g. `transfer(address,uint256)`.
pub fn signature(name: &str, args: &[AbiValue]) -> String {
    let types: Vec<&str> = args.iter().map(AbiValue::type_name).collect();
    format!("{name}({})", types.join(","))
}

/// First four bytes of the Keccak-256 of the canonical signature.
pub fn selector(name: &str, args: &[AbiValue]) -> [u8; 4] {
    let digest = Keccak256::digest(signature(name, args).as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Full call data: selector, then head words, then dynamic tails.
pub fn encode_call(name: &str, args: &[AbiValue]) -> Vec<u8> {
    let head_len = 32 * args.len();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for arg in args {
        if arg.is_dynamic() {
            head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
            tail.extend_from_slice(&arg.dynamic_tail());
        } else {
            head.extend_from_slice(&arg.static_word());
        }
    }

    let mut out = selector(name, args).to_vec();
    out.extend_from_slice(&head);
    out.extend_from_slice(&tail);
    out
}

#[cfg(test)]
mod tests {
    use super::{encode_call, selector, signature, AbiValue};
    use hederakit_core::EvmAddress;

    fn addr() -> EvmAddress {
        "0x00000000000000000000000000000000000003e9".parse().unwrap()
    }

    #[test]
    fn signature_lists_types_in_order() {
        let args = [AbiValue::Address(addr()), AbiValue::Uint(5)];
        assert_eq!(signature("transfer", &args), "transfer(address,uint256)");
    }

    #[test]
    fn selector_matches_known_erc20_transfer() {
        let args = [AbiValue::Address(addr()), AbiValue::Uint(5)];
        assert_eq!(selector("transfer", &args), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn selector_matches_known_balance_of() {
        let args = [AbiValue::Address(addr())];
        assert_eq!(selector("balanceOf", &args), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn static_args_encode_as_padded_words() {
        let call = encode_call("transfer", &[AbiValue::Address(addr()), AbiValue::Uint(1000)]);

        assert_eq!(call.len(), 4 + 32 + 32);
        // address right-aligned in its word
        assert_eq!(&call[4 + 12..4 + 32], addr().as_bytes());
        // uint256 big-endian in the final word
        assert_eq!(&call[4 + 32 + 30..], &[0x03, 0xe8]);
    }

    #[test]
    fn bool_encodes_in_the_last_byte() {
        let call = encode_call("setFlag", &[AbiValue::Bool(true)]);
        assert_eq!(call.len(), 4 + 32);
        assert_eq!(call[4 + 31], 1);
    }

    #[test]
    fn dynamic_string_uses_offset_length_and_padding() {
        let call = encode_call("setGreeting", &[AbiValue::Utf8("hello".to_string())]);

        // selector + offset word + length word + one padded data word
        assert_eq!(call.len(), 4 + 32 + 32 + 32);
        // offset points just past the single head word
        assert_eq!(call[4 + 31], 32);
        // length word says five bytes
        assert_eq!(call[4 + 32 + 31], 5);
        assert_eq!(&call[4 + 64..4 + 64 + 5], b"hello");
        // padding is zeroed
        assert!(call[4 + 64 + 5..].iter().all(|b| *b == 0));
    }

    #[test]
    fn mixed_static_and_dynamic_offsets_are_relative_to_head_start() {
        let call = encode_call(
            "store",
            &[AbiValue::Uint(7), AbiValue::Utf8("abc".to_string()), AbiValue::Bool(false)],
        );

        // head is three words; the dynamic offset (second word) is 96
        assert_eq!(call[4 + 32 + 31], 96);
        // tail: length 3, then "abc" padded
        assert_eq!(call[4 + 96 + 31], 3);
        assert_eq!(&call[4 + 128..4 + 128 + 3], b"abc");
    }
}
