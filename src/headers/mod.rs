use crate::errors::Error as HttpError;
use crate::grammar::field_name_eq;
use paste::paste;
use std::fmt;

mod content_length;
mod transfer_encoding;
pub use content_length::*;
pub use transfer_encoding::*;

pub trait Header {
    fn name(&self) -> &str;
    fn value(&self) -> String;
    fn header_string(&self) -> String {
        format!("{}: {}", self.name(), self.value())
    }
}

pub const TRANSFER_ENCODING_HEADER_NAME: &str = "transfer-encoding";
pub const CONTENT_LENGTH_HEADER_NAME: &str = "content-length";
pub const CONNECTION_HEADER_NAME: &str = "connection";

macro_rules! get_header {
    ($(
        $(#[$docs:meta])*
        ($name1:ident, $name2:ident);
    )*) => {
        $(
            paste! {
                $(#[$docs])*
                pub fn [<$name1:snake>](&self) -> Option<Result<$name1, HttpError>> {
                    self.get($name2).map($name1::try_from)
                }
            }
        )*
    };
}

#[derive(Clone, Debug)]
struct Field {
    name: String,
    values: Vec<String>,
}

/// Case-insensitive names; first-seen spelling and insertion order are kept.
#[derive(Clone, Debug, Default)]
pub struct Headers {
    fields: Vec<Field>,
}

impl Headers {
    pub fn new() -> Self {
        Headers { fields: Vec::new() }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field_name_eq(&field.name, name))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(i) => self.fields[i].values.as_slice(),
            None => &[],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(i) => self.fields[i].values = vec![value],
            None => self.fields.push(Field {
                name: name.to_string(),
                values: vec![value],
            }),
        }
    }

    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(i) => self.fields[i].values.push(value),
            None => self.fields.push(Field {
                name: name.to_string(),
                values: vec![value],
            }),
        }
    }

    pub fn set_typed<H: Header + ?Sized>(&mut self, header: &H) {
        self.set(header.name(), header.value());
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.position(name)
            .map(|i| self.fields.remove(i).values)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|field| (field.name.as_str(), field.values.as_slice()))
    }

    get_header! {
        (ContentLength, CONTENT_LENGTH_HEADER_NAME);
        (TransferEncoding, TRANSFER_ENCODING_HEADER_NAME);
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in self.iter() {
            for value in values {
                write!(f, "{}: {}\r\n", name, value)?;
            }
        }

        Ok(())
    }
}
