use std::fmt;
use std::str::FromStr;

use crate::error::AbiError;

/// Parameter type tags supported by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Address,
    Uint256,
    Uint32,
    Uint8,
    Bool,
    Bytes,
    String,
}

impl ParamType {
    /// The canonical name used in function signatures.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            ParamType::Address => "address",
            ParamType::Uint256 => "uint256",
            ParamType::Uint32 => "uint32",
            ParamType::Uint8 => "uint8",
            ParamType::Bool => "bool",
            ParamType::Bytes => "bytes",
            ParamType::String => "string",
        }
    }

    /// Dynamic types are encoded through an offset into the tail.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ParamType::Bytes | ParamType::String)
    }

    /// Bit width of the integer tags.
    pub(crate) fn bit_width(&self) -> Option<usize> {
        match self {
            ParamType::Uint256 => Some(256),
            ParamType::Uint32 => Some(32),
            ParamType::Uint8 => Some(8),
            _ => None,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "address" => Ok(ParamType::Address),
            "uint256" => Ok(ParamType::Uint256),
            "uint32" => Ok(ParamType::Uint32),
            "uint8" => Ok(ParamType::Uint8),
            "bool" => Ok(ParamType::Bool),
            "bytes" => Ok(ParamType::Bytes),
            "string" => Ok(ParamType::String),
            other => Err(AbiError::Encoding(format!(
                "unknown parameter type: {other}"
            ))),
        }
    }
}

/// A typed parameter: the declared tag plus the literal value as the
/// caller entered it, parsed under the tag at encode time.
#[derive(Debug, Clone)]
pub struct Param {
    pub ty: ParamType,
    pub value: String,
}

impl Param {
    pub fn new(ty: ParamType, value: impl Into<String>) -> Self {
        Param {
            ty,
            value: value.into(),
        }
    }
}
