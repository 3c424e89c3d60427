//! Blocking `std::net` socket adapted to the core [`Connection`] trait

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use panel_core::server::Connection;

pub struct StreamConnection {
    stream: TcpStream,
}

impl StreamConnection {
    pub fn new(stream: TcpStream, timeout_ms: Option<u32>) -> io::Result<Self> {
        let timeout = timeout_ms.map(|ms| Duration::from_millis(u64::from(ms)));
        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;
        Ok(Self { stream })
    }
}

impl Connection for StreamConnection {
    type Error = io::Error;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, io::Error> {
        self.stream.read(buf)
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
        self.stream.write(buf)
    }

    async fn flush(&mut self) -> Result<(), io::Error> {
        self.stream.flush()
    }

    fn close(&mut self) {
        // Peer may already be gone
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::{SimulatedButtons, SimulatedJoystick};
    use embassy_futures::block_on;
    use panel_core::pages::JoystickPage;
    use panel_core::server::serve_connection;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_serves_page_over_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).unwrap();
            stream.write_all(b"GET / HTTP/1.1\r\n\r\n").unwrap();
            stream.shutdown(Shutdown::Write).unwrap();
            let mut body = String::new();
            stream.read_to_string(&mut body).unwrap();
            body
        });

        let (stream, _) = listener.accept().unwrap();
        let mut conn = StreamConnection::new(stream, Some(5_000)).unwrap();
        let mut page = JoystickPage::new(SimulatedJoystick::new(), SimulatedButtons);
        let served = block_on(serve_connection(&mut conn, &mut page)).unwrap();

        let body = client.join().unwrap();
        assert_eq!(served, 1);
        assert!(body.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(body.contains("Local: Centro"));
    }
}
