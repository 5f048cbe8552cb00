use thiserror::Error;

/// Calldata encoding errors.
#[derive(Debug, Error)]
pub enum AbiError {
    /// Malformed input: an invalid function name, a literal that does
    /// not parse under its declared type tag, or bad raw hex.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A numeric literal parsed but does not fit the declared width.
    #[error("parameter {index} ({ty}) out of range: {value}")]
    ValueOutOfRange {
        index: usize,
        ty: &'static str,
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_encoding() {
        let err = AbiError::Encoding("empty function name".into());
        assert_eq!(err.to_string(), "encoding error: empty function name");
    }

    #[test]
    fn display_value_out_of_range() {
        let err = AbiError::ValueOutOfRange {
            index: 2,
            ty: "uint8",
            value: "256".into(),
        };
        assert_eq!(err.to_string(), "parameter 2 (uint8) out of range: 256");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> =
            Box::new(AbiError::Encoding("test".into()));
        assert!(err.to_string().contains("test"));
    }
}
