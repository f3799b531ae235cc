use crate::errors::Error as HttpErrors;
use crate::headers::{Header, TRANSFER_ENCODING_HEADER_NAME};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferEncoding {
    encodings: Vec<TransferEncodingValue>,
}

impl TransferEncoding {
    /// Check if the final encoding is chunked or not
    pub fn is_chunked(&self) -> bool {
        matches!(self.encodings.last(), Some(TransferEncodingValue::Chunked))
    }

    pub fn has_transfer_encoding(&self) -> bool {
        !self.encodings.is_empty()
    }
}

impl TryFrom<&str> for TransferEncoding {
    type Error = HttpErrors;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let encodings = value
            .split(',')
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(TransferEncodingValue::from)
            .collect();

        Ok(TransferEncoding { encodings })
    }
}

impl Header for TransferEncoding {
    fn name(&self) -> &str {
        TRANSFER_ENCODING_HEADER_NAME
    }

    fn value(&self) -> String {
        let list: Vec<&str> = self.encodings.iter().map(|e| e.as_str()).collect();

        list.join(", ")
    }
}

macro_rules! transfer_encoding_values {
    ($(
        $(#[$docs:meta])*
        ($name:ident, $phrase:expr);
    )+) => {
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum TransferEncodingValue {
            $(
                $(#[$docs])*
                $name,
            )+
            Extension(String),
        }

        impl From<&str> for TransferEncodingValue {
            fn from(value: &str) -> Self {
                $(
                    if value.eq_ignore_ascii_case($phrase) {
                        return TransferEncodingValue::$name;
                    }
                )+
                TransferEncodingValue::Extension(value.to_ascii_lowercase())
            }
        }

        impl TransferEncodingValue {
            pub fn as_str(&self) -> &str {
                match self {
                    $(
                        TransferEncodingValue::$name => $phrase,
                    )+
                    TransferEncodingValue::Extension(s) => s
                }
            }
        }
    };
}

transfer_encoding_values! {
    (Chunked, "chunked");
    (Compress, "compress");
    (Deflate, "deflate");
    (Gzip, "gzip");
}
