//! TCP listener serving the panel page over `embassy-net`
//!
//! A single socket listens on the configured port. Each accepted connection
//! is handed to [`serve_connection`] until the peer closes it, then the
//! socket is torn down and the next accept begins.

use core::convert::Infallible;

use embassy_net::tcp::{AcceptError, Error as TcpError, TcpSocket};
use embassy_net::{Runner, Stack};
use embassy_time::Duration;
use esp_radio::wifi::WifiDevice;
use log::{info, warn};

use panel_core::app_state::{AppError, Startup};
use panel_core::config::ServerConfig;
use panel_core::pages::PageSource;
use panel_core::server::{Connection, serve_connection};

const RX_BUFFER_SIZE: usize = 1024;
const TX_BUFFER_SIZE: usize = 2048;

impl Connection for TcpSocket<'_> {
    type Error = TcpError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, TcpError> {
        TcpSocket::read(self, buf).await
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, TcpError> {
        TcpSocket::write(self, buf).await
    }

    async fn flush(&mut self) -> Result<(), TcpError> {
        TcpSocket::flush(self).await
    }

    fn close(&mut self) {
        TcpSocket::close(self);
    }
}

#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}

/// Accept and serve connections forever.
///
/// Only a listener that cannot be opened at all is an error; per-connection
/// failures are logged and the next connection is accepted.
pub async fn serve_forever<P: PageSource>(
    stack: Stack<'static>,
    server: &ServerConfig,
    page: &mut P,
    startup: &mut Startup,
) -> Result<Infallible, AppError> {
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];

    startup.listening(server.port)?;
    match startup.address() {
        Some(address) => info!("Serving on http://{}:{}/", address, server.port),
        None => info!("Listening on TCP port {}", server.port),
    }

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(server.socket_timeout_ms.map(|ms| Duration::from_millis(ms as u64)));

        match socket.accept(server.port).await {
            Ok(()) => {}
            Err(AcceptError::InvalidPort) => {
                return Err(startup.fail(AppError::Bind { port: server.port }));
            }
            Err(AcceptError::InvalidState) => {
                return Err(startup.fail(AppError::SocketCreate));
            }
            Err(AcceptError::ConnectionReset) => {
                warn!("Connection reset during accept");
                continue;
            }
        }

        info!("Client connected: {:?}", socket.remote_endpoint());

        match serve_connection(&mut socket, page).await {
            Ok(served) => info!("Client disconnected after {} responses", served),
            Err(e) => warn!("Connection dropped: {}", e),
        }

        // Let the FIN and any queued response bytes go out before the socket is dropped
        if let Err(e) = socket.flush().await {
            warn!("Flush on close failed: {:?}", e);
        }
    }
}
