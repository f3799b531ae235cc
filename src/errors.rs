use std::{fmt, io};

impl From<Error> for io::Error {
    fn from(f: Error) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, f)
    }
}

macro_rules! errors {
    (
        [
            $(
                $(#[$docs1:meta])*
                ($name1:ident, $phrase1:expr);
            )+
        ],
        [
            $(
                $(#[$docs2:meta])*
                ($name2:ident, $type:ty, $phrase2:expr);
            )+
        ]
    ) => {
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum Error {
            $(
                $(#[$docs1])*
                $name1,
            )+
            $(
                $(#[$docs2])*
                $name2($type),
            )+
        }

        impl Error {
            fn desc(&self) -> String {
                match self {
                    $(
                        Error::$name1 => String::from($phrase1),
                    )+
                    $(
                        Error::$name2(val) => format!("{}: {:?}", $phrase2, val),
                    )+
                }
            }
        }

        impl fmt::Display for Error {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.desc())
            }
        }

        impl std::error::Error for Error {}
    };
}

errors! {
    [
        (InvalidContentLengthValue, "Content length field contains non digit characters");
        /// The committed status (1xx, 204, 304) does not permit a body.
        (BodyNotAllowed, "Response status does not allow a body");
    ],
    [
        /// Carries the declared length that the body would overrun.
        (ContentLengthExceeded, u64, "Body exceeds declared content length");
        (ContentLengthShort, u64, "Body is shorter than declared content length");
        (InvalidHeaderFieldToken, String, "Header field contains invalid token character");
    ]
}
