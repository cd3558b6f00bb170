use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
    #[error("input looks binary (NUL byte at offset {offset})")]
    Binary { offset: usize },
}

/// Decode delimited text into UTF-8 using: BOM -> strict UTF-8.
///
/// Anything that is not valid text is rejected rather than guessed at, so
/// binary garbage never turns into a one-column "table".
pub fn decode_text(bytes: &[u8]) -> Result<DecodedText, DecodeError> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let body = &bytes[bom_len..];

    if encoding == UTF_8 {
        if let Some(offset) = body.iter().position(|b| *b == 0) {
            return Err(DecodeError::Binary { offset });
        }
    }

    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: encoding.name().to_string(),
            message: "invalid byte sequence".into(),
        });
    }
    if let Some(offset) = text.find('\0') {
        return Err(DecodeError::Binary { offset });
    }

    Ok(DecodedText {
        text: text.into_owned(),
        encoding_label: encoding.name().to_string(),
    })
}
