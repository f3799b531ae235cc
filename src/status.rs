use std::fmt;
use std::num::NonZeroU16;

/// An HTTP status code.
///
/// Any non-zero value is representable, including values outside the
/// registered 100-599 range. Deciding whether such a code is acceptable is
/// left to whatever finally puts it on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(NonZeroU16);

impl StatusCode {
    /// Returns `None` for `0`, which stands for "no status chosen yet".
    pub const fn from_u16(code: u16) -> Option<StatusCode> {
        match NonZeroU16::new(code) {
            Some(code) => Some(StatusCode(code)),
            None => None,
        }
    }

    pub const fn as_u16(&self) -> u16 {
        self.0.get()
    }

    pub fn canonical_reason(&self) -> Option<&'static str> {
        StatusCode::reason(self.as_u16())
    }

    /// 1xx, 204 and 304 responses never carry a body.
    pub fn allows_body(&self) -> bool {
        let code = self.as_u16();
        !((100..200).contains(&code) || code == 204 || code == 304)
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::OK
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

macro_rules! status_code {
    (
        $(
            ($code:expr, $name:ident, $phrase:expr);
        )+
    ) => {
        impl StatusCode {
            $(
                pub const $name: StatusCode = match StatusCode::from_u16($code) {
                    Some(code) => code,
                    None => panic!("status code constants are non-zero"),
                };
            )+

            pub fn reason(num: u16) -> Option<&'static str> {
                match num {
                    $(
                        $code => Some($phrase),
                    )+
                    _ => None
                }
            }
        }
    };
}

status_code! {
    (100, CONTINUE, "Continue");
    (101, SWITCHING_PROTOCOLS, "Switching Protocols");
    (200, OK, "OK");
    (201, CREATED, "Created");
    (202, ACCEPTED, "Accepted");
    (203, NON_AUTHORITATIVE_INFORMATION, "Non-Authoritative Information");
    (204, NO_CONTENT, "No Content");
    (205, RESET_CONTENT, "Reset Content");
    (206, PARTIAL_CONTENT, "Partial Content");
    (300, MULTIPLE_CHOICES, "Multiple Choices");
    (301, MOVED_PERMANENTLY, "Moved Permanently");
    (302, FOUND, "Found");
    (303, SEE_OTHER, "See Other");
    (304, NOT_MODIFIED, "Not Modified");
    (307, TEMPORARY_REDIRECT, "Temporary Redirect");
    (308, PERMANENT_REDIRECT, "Permanent Redirect");
    (400, BAD_REQUEST, "Bad Request");
    (401, UNAUTHORIZED, "Unauthorized");
    (403, FORBIDDEN, "Forbidden");
    (404, NOT_FOUND, "Not Found");
    (405, METHOD_NOT_ALLOWED, "Method Not Allowed");
    (406, NOT_ACCEPTABLE, "Not Acceptable");
    (408, REQUEST_TIMEOUT, "Request Timeout");
    (409, CONFLICT, "Conflict");
    (410, GONE, "Gone");
    (411, LENGTH_REQUIRED, "Length Required");
    (413, PAYLOAD_TOO_LARGE, "Payload Too Large");
    (414, URI_TOO_LONG, "URI Too Long");
    (415, UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type");
    (422, UNPROCESSABLE_ENTITY, "Unprocessable Entity");
    (429, TOO_MANY_REQUESTS, "Too Many Requests");
    (500, INTERNAL_SERVER_ERROR, "Internal Server Error");
    (501, NOT_IMPLEMENTED, "Not Implemented");
    (502, BAD_GATEWAY, "Bad Gateway");
    (503, SERVICE_UNAVAILABLE, "Service Unavailable");
    (504, GATEWAY_TIMEOUT, "Gateway Timeout");
    (505, HTTP_VERSION_NOT_SUPPORTED, "HTTP Version Not Supported");
}
