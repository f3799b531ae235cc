use crate::errors::Error as HttpErrors;
use crate::headers::{Header, CONTENT_LENGTH_HEADER_NAME};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentLength {
    length: u64,
}

impl TryFrom<&str> for ContentLength {
    type Error = HttpErrors;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HttpErrors::InvalidContentLengthValue);
        }

        let length = value
            .parse::<u64>()
            .map_err(|_| HttpErrors::InvalidContentLengthValue)?;

        Ok(ContentLength { length })
    }
}

impl ContentLength {
    pub fn new(length: u64) -> Self {
        ContentLength { length }
    }

    pub fn content_length(&self) -> u64 {
        self.length
    }
}

impl Header for ContentLength {
    fn name(&self) -> &str {
        CONTENT_LENGTH_HEADER_NAME
    }

    fn value(&self) -> String {
        self.length.to_string()
    }
}
