use bytes::Bytes;
use http::{Request, Response};
use std::fmt;
use std::io::{self, Cursor, Read};

/// Single-use HTTP body stream.
///
/// A body can be read exactly once. [`Body::rehydrate`] captures the
/// remaining bytes into an owned buffer and puts a fresh reader over the
/// same bytes back in place, so whoever reads the body next still sees all
/// of it.
#[derive(Default)]
pub struct Body {
    inner: Inner,
}

#[derive(Default)]
enum Inner {
    #[default]
    Empty,
    Buffered(Cursor<Bytes>),
    Stream(Box<dyn Read + Send>),
}

impl Body {
    /// Absent body.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an arbitrary reader. Nothing is read until the body is consumed
    /// or rehydrated.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            inner: Inner::Stream(Box::new(reader)),
        }
    }

    /// `true` when the body is known to hold no bytes. A stream that has not
    /// been read yet is never reported as empty.
    pub fn is_empty(&self) -> bool {
        match &self.inner {
            Inner::Empty => true,
            Inner::Buffered(cursor) => cursor.position() as usize >= cursor.get_ref().len(),
            Inner::Stream(_) => false,
        }
    }

    /// Read the rest of the body once and restore it.
    ///
    /// Returns an owned view of the bytes that were still unread. After the
    /// call the body yields those same bytes again, exactly once.
    ///
    /// If the underlying stream fails, the bytes received before the failure
    /// are put back in front of the unread stream and the I/O error is
    /// returned. The next reader gets the prefix followed by whatever the
    /// stream yields next, including a repeated error.
    pub fn rehydrate(&mut self) -> io::Result<Bytes> {
        match std::mem::take(&mut self.inner) {
            Inner::Empty => Ok(Bytes::new()),
            Inner::Buffered(cursor) => {
                let start = (cursor.position() as usize).min(cursor.get_ref().len());
                let remaining = cursor.into_inner().slice(start..);
                self.inner = Inner::Buffered(Cursor::new(remaining.clone()));
                Ok(remaining)
            }
            Inner::Stream(mut reader) => {
                let mut buf = Vec::new();
                match reader.read_to_end(&mut buf) {
                    Ok(_) => {
                        let bytes = Bytes::from(buf);
                        self.inner = Inner::Buffered(Cursor::new(bytes.clone()));
                        Ok(bytes)
                    }
                    Err(e) => {
                        let prefix = Cursor::new(Bytes::from(buf));
                        self.inner = Inner::Stream(Box::new(prefix.chain(reader)));
                        Err(e)
                    }
                }
            }
        }
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::Empty => Ok(0),
            Inner::Buffered(cursor) => cursor.read(buf),
            Inner::Stream(reader) => reader.read(buf),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Empty => f.write_str("Body::Empty"),
            Inner::Buffered(cursor) => f
                .debug_struct("Body::Buffered")
                .field("len", &cursor.get_ref().len())
                .field("position", &cursor.position())
                .finish(),
            Inner::Stream(_) => f.write_str("Body::Stream(..)"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self {
            inner: Inner::Buffered(Cursor::new(bytes)),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes::from(bytes).into()
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Bytes::from(text).into()
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Bytes::from_static(text.as_bytes()).into()
    }
}

/// Rehydrate the body of a request in place.
pub fn rehydrate_request(req: &mut Request<Body>) -> io::Result<Bytes> {
    req.body_mut().rehydrate()
}

/// Rehydrate the body of a response in place.
pub fn rehydrate_response(resp: &mut Response<Body>) -> io::Result<Bytes> {
    resp.body_mut().rehydrate()
}
