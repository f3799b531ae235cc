use crate::errors::Error;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    /// CHAR = <any US-ASCII character (octets 0 - 127)>
    static ref CHAR: [bool; 256] = {
        let mut bytes = [false; 256];

        for byte in bytes.iter_mut().take(128) {
            *byte = true;
        }

        bytes
    };

    /// CTL = <any US-ASCII control character
    ///         (octets 0 - 31) and DEL (127)>
    static ref CTL: [bool; 256] = {
        let mut bytes = [false; 256];

        for byte in bytes.iter_mut().take(32) {
            *byte = true;
        }

        bytes[127] = true;
        bytes
    };

    /// separators = "(" | ")" | "<" | ">" | "@"
    ///               | "," | ";" | ":" | "\" | <">
    ///               | "/" | "[" | "]" | "?" | "="
    ///               | "{" | "}" | SP | HT
    static ref SEPARATOR: [bool; 256] = {
        let mut result = [false; 256];
        let separators = "()<>@,;:\\\"/[]?={} \t";

        for s in separators.chars() {
            result[s as usize] = true;
        }

        result
    };

    /// token = 1*<any CHAR except CTLs or separators>
    static ref TOKEN_CHAR: [bool; 256] = {
        let mut result = [false; 256];

        for (i, slot) in result.iter_mut().enumerate() {
            *slot = CHAR[i] && !(CTL[i] || SEPARATOR[i]);
        }

        result
    };

    /// A-Z
    static ref UPPER_ALPHA: [bool; 256] = {
        let mut result = [false; 256];

        for slot in result.iter_mut().take(91).skip(65) {
            *slot = true;
        }

        result
    };

    /// Runs of CR and LF, including surrounding blanks, inside a field value.
    static ref LINE_BREAKS: Regex = Regex::new(r"[ \t]*[\r\n]+[ \t]*")
        .expect("line break pattern is valid");
}

#[inline]
pub fn is_token_char(byte: u8) -> bool {
    TOKEN_CHAR[byte as usize]
}

#[inline]
pub fn is_token(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(|byte| is_token_char(*byte))
}

#[inline]
pub fn is_upper_alpha(byte: u8) -> bool {
    UPPER_ALPHA[byte as usize]
}

#[inline]
pub fn to_lower_case(byte: u8) -> u8 {
    match is_upper_alpha(byte) {
        true => byte | 0x20,
        false => byte,
    }
}

/// Compare two field names the way HTTP does, ignoring ASCII case.
pub fn field_name_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .bytes()
            .zip(b.bytes())
            .all(|(x, y)| to_lower_case(x) == to_lower_case(y))
}

pub fn check_field_name(name: &str) -> Result<(), Error> {
    if is_token(name.as_bytes()) {
        Ok(())
    } else {
        Err(Error::InvalidHeaderFieldToken(name.to_string()))
    }
}

/// Replace every line break in a field value with a single space so a value
/// can never start a new header line on the wire.
pub fn sanitize_field_value(value: &str) -> Cow<'_, str> {
    LINE_BREAKS.replace_all(value, " ")
}
