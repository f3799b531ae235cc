use crate::errors::Error;
use crate::grammar::{check_field_name, field_name_eq, sanitize_field_value};
use crate::headers::{Headers, CONNECTION_HEADER_NAME, CONTENT_LENGTH_HEADER_NAME};
use crate::response::ResponseSink;
use crate::status::StatusCode;
use bytes::{BufMut, BytesMut};
use std::io::{self, Write};
use tracing::{trace, warn};

const HEAD_CAPACITY: usize = 256;

/// Serializes an HTTP/1.1 response onto `W`.
///
/// The head is rendered at commit; header changes made after that are not
/// sent. Body bytes are written as given, so a caller declaring a transfer
/// coding also does the framing.
#[derive(Debug)]
pub struct Http11Sink<W: Write> {
    inner: W,
    headers: Headers,
    status: Option<StatusCode>,
    head: Option<BytesMut>,
    declared_length: Option<u64>,
    written: u64,
}

impl<W: Write> Http11Sink<W> {
    pub fn new(inner: W) -> Self {
        Http11Sink {
            inner,
            headers: Headers::new(),
            status: None,
            head: None,
            declared_length: None,
            written: 0,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Fails with [`Error::ContentLengthShort`] when fewer body bytes were
    /// written than `content-length` declared.
    pub fn finish(mut self) -> io::Result<W> {
        if self.status.is_none() {
            self.commit_status(StatusCode::OK);
        }

        self.write_head()?;
        if let Some(limit) = self.declared_length {
            if self.written < limit {
                return Err(Error::ContentLengthShort(limit).into());
            }
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn render_head(&mut self, status: StatusCode) -> BytesMut {
        let mut head = BytesMut::with_capacity(HEAD_CAPACITY);
        head.put_slice(b"HTTP/1.1 ");
        head.put_slice(format!("{:03}", status.as_u16()).as_bytes());
        head.put_slice(b" ");
        head.put_slice(status.canonical_reason().unwrap_or("").as_bytes());
        head.put_slice(b"\r\n");

        let length = match self.headers.content_length() {
            Some(Ok(length)) => Some(length.content_length()),
            Some(Err(error)) => {
                warn!(%error, "ignoring content-length");
                None
            }
            None => None,
        };

        // transfer-encoding wins over content-length, and 1xx/204 carry neither
        let coded = self.headers.transfer_encoding().is_some();
        let code = status.as_u16();
        let drop_length = coded || (100..200).contains(&code) || code == 204;
        self.declared_length = match drop_length || !status.allows_body() {
            true => None,
            false => length,
        };

        for (name, values) in self.headers.iter() {
            if let Err(error) = check_field_name(name) {
                warn!(%error, "dropping response header");
                continue;
            }

            if field_name_eq(name, CONTENT_LENGTH_HEADER_NAME)
                && (drop_length || length.is_none())
            {
                continue;
            }

            for value in values {
                head.put_slice(name.as_bytes());
                head.put_slice(b": ");
                head.put_slice(sanitize_field_value(value).as_bytes());
                head.put_slice(b"\r\n");
            }
        }

        let delimited = self.declared_length.is_some() || coded;
        if !delimited
            && status.allows_body()
            && !self.headers.contains(CONNECTION_HEADER_NAME)
        {
            head.put_slice(b"connection: close\r\n");
        }

        head.put_slice(b"\r\n");
        head
    }

    fn write_head(&mut self) -> io::Result<()> {
        if let Some(head) = self.head.take() {
            self.inner.write_all(&head)?;
        }

        Ok(())
    }
}

impl<W: Write> ResponseSink for Http11Sink<W> {
    fn headers(&mut self) -> &mut Headers {
        &mut self.headers
    }

    fn commit_status(&mut self, status: StatusCode) {
        if let Some(committed) = self.status {
            warn!(%committed, %status, "superfluous commit_status call");
            return;
        }

        trace!(%status, "rendering response head");
        let head = self.render_head(status);
        self.head = Some(head);
        self.status = Some(status);
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize> {
        let status = match self.status {
            Some(status) => status,
            None => {
                self.commit_status(StatusCode::OK);
                StatusCode::OK
            }
        };

        if !buf.is_empty() && !status.allows_body() {
            return Err(Error::BodyNotAllowed.into());
        }

        if let Some(limit) = self.declared_length {
            if self.written + buf.len() as u64 > limit {
                return Err(Error::ContentLengthExceeded(limit).into());
            }
        }

        self.write_head()?;
        self.inner.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(buf.len())
    }
}
