use std::net::{Ipv4Addr, SocketAddr};

use log::{debug, trace};
use tokio::{
    net::UdpSocket,
    time::{self, Duration},
};

use crate::message::{Header, HEADER_LEN};
use crate::{Error, Result};

pub const HELLO_TIMEOUT: Duration = Duration::from_secs(5);

const fn hello_bytes() -> [u8; HEADER_LEN] {
    let mut bytes = [0xff; HEADER_LEN];

    bytes[0] = 0x21;
    bytes[1] = 0x31;
    bytes[2] = 0x00;
    bytes[3] = 0x20;

    bytes
}

const HELLO_BYTES: [u8; HEADER_LEN] = hello_bytes();

/// Asks the device for its id and current timestamp. Every session with a
/// miIO device starts with this exchange.
pub async fn hello(ip: Ipv4Addr, addr: SocketAddr) -> Result<Header> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;

    socket.send_to(&HELLO_BYTES, addr).await?;
    trace!("sent hello {}", addr);

    let mut buffer = [0; 64];

    loop {
        let (size, from) = time::timeout(HELLO_TIMEOUT, socket.recv_from(&mut buffer))
            .await
            .map_err(|_| Error::DeviceNotFound(ip))??;

        if size != HEADER_LEN {
            trace!("ignoring {} bytes from {}", size, from);
            continue;
        }

        let header = Header::read_from(&buffer[..size])?;

        debug!("device id: {:x}", header.device_id);
        debug!("timestamp: {}", header.ts);

        return Ok(header);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_bytes() {
        assert_eq!(&HELLO_BYTES[..4], &[0x21, 0x31, 0x00, 0x20]);
        assert!(HELLO_BYTES[4..].iter().all(|byte| *byte == 0xff));
    }

    #[tokio::test]
    async fn test_hello_reads_device_header() {
        let device = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = device.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let mut buffer = [0; 64];
            let (size, from) = device.recv_from(&mut buffer).await.unwrap();
            assert_eq!(&buffer[..size], &HELLO_BYTES);

            let mut reply = [0; HEADER_LEN];
            reply[..4].copy_from_slice(&[0x21, 0x31, 0x00, 0x20]);
            reply[8..12].copy_from_slice(&0x0123abcd_u32.to_be_bytes());
            reply[12..16].copy_from_slice(&1000_u32.to_be_bytes());

            device.send_to(&reply, from).await.unwrap();
        });

        let header = hello(Ipv4Addr::LOCALHOST, addr).await.unwrap();
        server.await.unwrap();

        assert_eq!(header.device_id, 0x0123abcd);
        assert_eq!(header.ts, 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hello_silent_device_is_not_found() {
        let device = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = device.local_addr().unwrap();

        let result = hello(Ipv4Addr::LOCALHOST, addr).await;

        let mut buffer = [0; 64];
        let (size, _) = device.recv_from(&mut buffer).await.unwrap();
        assert_eq!(&buffer[..size], &HELLO_BYTES);

        assert!(matches!(result, Err(Error::DeviceNotFound(ip)) if ip == Ipv4Addr::LOCALHOST));
    }
}
