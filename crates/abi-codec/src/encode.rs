//! Function-call encoding: selector computation plus the two-pass
//! head/tail parameter layout.

use alloy_primitives::U256;
use sha3::{Digest, Keccak256};

use evm_core::address::parse_address;

use crate::error::AbiError;
use crate::param::{Param, ParamType};

/// A function call to encode: the name plus typed parameters in
/// declaration order.
#[derive(Debug, Clone)]
pub struct CallSpec {
    pub name: String,
    pub params: Vec<Param>,
}

impl CallSpec {
    pub fn new(name: impl Into<String>) -> Self {
        CallSpec {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter, keeping declaration order.
    pub fn with_param(mut self, ty: ParamType, value: impl Into<String>) -> Self {
        self.params.push(Param::new(ty, value));
        self
    }

    /// Canonical signature string, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.params.iter().map(|p| p.ty.canonical_name()).collect();
        format!("{}({})", self.name, types.join(","))
    }
}

/// Encoded calldata ready for dispatch.
///
/// `selector` is `None` when the caller supplied raw calldata through
/// [`encode_raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall {
    pub selector: Option<[u8; 4]>,
    pub data: Vec<u8>,
}

impl EncodedCall {
    /// 0x-prefixed hex rendering of the complete calldata.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.data))
    }
}

/// One parameter after literal parsing, before layout.
enum Word {
    /// Inline 32-byte head word.
    Static([u8; 32]),
    /// Body bytes placed in the tail behind an offset word.
    Dynamic(Vec<u8>),
}

/// Encodes a function call: 4-byte selector followed by the parameter
/// block in head/tail layout.
///
/// The head holds one 32-byte word per parameter: the value itself for
/// static types, or an offset into the tail for dynamic ones, measured
/// from the start of the parameter block. Dynamic bodies follow in
/// declaration order, each as a 32-byte length word plus the raw bytes
/// right-padded to the next 32-byte boundary.
pub fn encode_call(spec: &CallSpec) -> Result<EncodedCall, AbiError> {
    if !is_identifier(&spec.name) {
        return Err(AbiError::Encoding(format!(
            "invalid function name: {:?}",
            spec.name
        )));
    }

    let selector = compute_selector(&spec.signature());

    let words = spec
        .params
        .iter()
        .enumerate()
        .map(|(index, param)| encode_param(index, param))
        .collect::<Result<Vec<_>, _>>()?;

    let head_len = words.len() * 32;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for word in &words {
        match word {
            Word::Static(value) => head.extend_from_slice(value),
            Word::Dynamic(body) => {
                let offset = U256::from(head_len + tail.len());
                head.extend_from_slice(&offset.to_be_bytes::<32>());

                tail.extend_from_slice(&U256::from(body.len()).to_be_bytes::<32>());
                tail.extend_from_slice(body);
                let rem = body.len() % 32;
                if rem != 0 {
                    tail.resize(tail.len() + 32 - rem, 0);
                }
            }
        }
    }

    let mut data = Vec::with_capacity(4 + head_len + tail.len());
    data.extend_from_slice(&selector);
    data.extend_from_slice(&head);
    data.extend_from_slice(&tail);

    Ok(EncodedCall {
        selector: Some(selector),
        data,
    })
}

/// Passes caller-supplied calldata through after checking it is
/// well-formed hex of even length; no selector is computed.
pub fn encode_raw(raw: &str) -> Result<EncodedCall, AbiError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(AbiError::Encoding("raw calldata is empty".into()));
    }
    if digits.len() % 2 != 0 {
        return Err(AbiError::Encoding("raw calldata has odd hex length".into()));
    }
    let data = hex::decode(digits)
        .map_err(|e| AbiError::Encoding(format!("raw calldata is not valid hex: {e}")))?;

    Ok(EncodedCall {
        selector: None,
        data,
    })
}

/// First 4 bytes of the Keccak-256 hash of the canonical signature.
fn compute_selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&digest[..4]);
    selector
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let leading_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    leading_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parses one parameter literal under its declared tag.
fn encode_param(index: usize, param: &Param) -> Result<Word, AbiError> {
    let literal = param.value.trim();
    match param.ty {
        ParamType::Address => {
            let address = parse_address(literal)
                .map_err(|e| bad_literal(index, param.ty, &e.to_string()))?;
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(&address);
            Ok(Word::Static(word))
        }
        ParamType::Uint256 | ParamType::Uint32 | ParamType::Uint8 => {
            let value = parse_uint(index, param.ty, literal)?;
            Ok(Word::Static(value.to_be_bytes::<32>()))
        }
        ParamType::Bool => {
            let bit = match literal {
                "true" | "1" => 1u8,
                "false" | "0" => 0u8,
                _ => return Err(bad_literal(index, param.ty, "expected true/false or 1/0")),
            };
            let mut word = [0u8; 32];
            word[31] = bit;
            Ok(Word::Static(word))
        }
        ParamType::Bytes => {
            let digits = literal
                .strip_prefix("0x")
                .or_else(|| literal.strip_prefix("0X"))
                .unwrap_or(literal);
            if digits.len() % 2 != 0 {
                return Err(bad_literal(index, param.ty, "odd hex length"));
            }
            let bytes = hex::decode(digits)
                .map_err(|e| bad_literal(index, param.ty, &e.to_string()))?;
            Ok(Word::Dynamic(bytes))
        }
        // String literals are taken verbatim, whitespace included.
        ParamType::String => Ok(Word::Dynamic(param.value.as_bytes().to_vec())),
    }
}

fn bad_literal(index: usize, ty: ParamType, reason: &str) -> AbiError {
    AbiError::Encoding(format!("parameter {index} ({ty}): {reason}"))
}

/// Parses a decimal or 0x-hex unsigned literal and enforces the tag's
/// bit width.
fn parse_uint(index: usize, ty: ParamType, literal: &str) -> Result<U256, AbiError> {
    let (digits, radix) = match literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
    {
        Some(hex_digits) => (hex_digits, 16),
        None => (literal, 10),
    };
    if digits.is_empty() {
        return Err(bad_literal(index, ty, "empty integer literal"));
    }

    let value = U256::from_str_radix(digits, radix)
        .map_err(|_| bad_literal(index, ty, "not an unsigned integer"))?;

    if let Some(width) = ty.bit_width() {
        if width < 256 && value > (U256::from(1u8) << width) - U256::from(1u8) {
            return Err(AbiError::ValueOutOfRange {
                index,
                ty: ty.canonical_name(),
                value: literal.to_string(),
            });
        }
    }

    Ok(value)
}
