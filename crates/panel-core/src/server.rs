//! Per-connection request handling
//!
//! There is no request parsing: any inbound data triggers one full page
//! response, and a peer close terminates the connection. The transport is
//! abstracted by [`Connection`] so the same handler runs over `embassy-net`
//! sockets on hardware and `std` streams in the simulator.

use core::fmt::Debug;

use log::{debug, warn};
use thiserror_no_std::Error;

use crate::pages::{PageError, PageSource, Response};

/// Size of the buffer inbound data is read into. Contents are discarded.
pub const INBOUND_BUFFER_SIZE: usize = 512;

/// Byte stream of one accepted TCP connection
pub trait Connection {
    type Error: Debug;

    /// Read inbound data. `Ok(0)` means the peer closed the connection.
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<usize, Self::Error>>;

    /// Write some of `buf`, returning how many bytes were accepted.
    fn write(&mut self, buf: &[u8]) -> impl Future<Output = Result<usize, Self::Error>>;

    fn flush(&mut self) -> impl Future<Output = Result<(), Self::Error>>;

    /// Close the local side. No further writes follow.
    fn close(&mut self);
}

/// One receive event on a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound<'a> {
    Data(&'a [u8]),
    /// The peer closed its side
    Closed,
}

impl<'a> Inbound<'a> {
    /// Interpret the result of a read into `buf`.
    pub fn from_read(buf: &'a [u8], len: usize) -> Self {
        if len == 0 {
            Self::Closed
        } else {
            Self::Data(&buf[..len])
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closed,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeError {
    #[error("page error: {0}")]
    Page(#[from] PageError),
    #[error("connection read failed")]
    Read,
    #[error("connection write failed")]
    Write,
    #[error("connection accepted no bytes")]
    WriteZero,
}

/// Handle one receive event.
///
/// A close event closes the socket and writes nothing. Data triggers a fresh
/// render which is written in full and flushed. On any error the connection
/// is closed before the error is returned, and a page that failed to render
/// is never partially written.
pub async fn handle_inbound<C, P>(
    conn: &mut C,
    page: &mut P,
    response: &mut Response,
    inbound: Inbound<'_>,
) -> Result<ConnectionState, ServeError>
where
    C: Connection,
    P: PageSource,
{
    let Inbound::Data(data) = inbound else {
        debug!("peer closed connection");
        conn.close();
        return Ok(ConnectionState::Closed);
    };

    debug!("received {} bytes, responding", data.len());

    let result = respond(conn, page, response).await;
    if result.is_err() {
        conn.close();
    }
    result.map(|()| ConnectionState::Open)
}

async fn respond<C, P>(conn: &mut C, page: &mut P, response: &mut Response) -> Result<(), ServeError>
where
    C: Connection,
    P: PageSource,
{
    page.render(response).await?;
    write_all(conn, response.as_bytes()).await?;
    conn.flush().await.map_err(|e| {
        warn!("flush failed: {:?}", e);
        ServeError::Write
    })
}

async fn write_all<C: Connection>(conn: &mut C, mut bytes: &[u8]) -> Result<(), ServeError> {
    while !bytes.is_empty() {
        match conn.write(bytes).await {
            Ok(0) => return Err(ServeError::WriteZero),
            Ok(n) => bytes = &bytes[n..],
            Err(e) => {
                warn!("write failed: {:?}", e);
                return Err(ServeError::Write);
            }
        }
    }
    Ok(())
}

/// Serve an accepted connection until the peer closes it or an error occurs.
///
/// Returns the number of responses written.
pub async fn serve_connection<C, P>(conn: &mut C, page: &mut P) -> Result<u32, ServeError>
where
    C: Connection,
    P: PageSource,
{
    let mut inbound = [0u8; INBOUND_BUFFER_SIZE];
    let mut response = Response::new();
    let mut served = 0;

    loop {
        let len = match conn.read(&mut inbound).await {
            Ok(len) => len,
            Err(e) => {
                warn!("read failed: {:?}", e);
                conn.close();
                return Err(ServeError::Read);
            }
        };

        match handle_inbound(conn, page, &mut response, Inbound::from_read(&inbound, len)).await? {
            ConnectionState::Open => served += 1,
            ConnectionState::Closed => return Ok(served),
        }
    }
}
