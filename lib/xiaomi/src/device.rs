mod info;
pub use info::DeviceInfo;

mod response;
pub use response::DeviceError;
use response::Response;

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use log::{error, trace};
use serde_json::{json, Value};
use tokio::{
    net::UdpSocket,
    time::{timeout, Duration, Instant},
};

use crate::{
    hello::hello,
    message::{Message, HEADER_LEN},
    Error, Result, Token,
};

const PORT: u16 = 54321;
const REPLY_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_ATTEMPTS: usize = 3;

pub struct Device {
    request_id: u32,
    ip: Ipv4Addr,
    addr: SocketAddr,
    token: Token<16>,
}

impl Device {
    pub fn new(ip: Ipv4Addr, token: Token<16>) -> Device {
        Device {
            request_id: 1,
            ip,
            addr: SocketAddr::V4(SocketAddrV4::new(ip, PORT)),
            token,
        }
    }

    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    pub async fn info(&mut self) -> Result<DeviceInfo> {
        let result = self.send("miIO.info", json!([])).await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn send(&mut self, method: &str, params: Value) -> Result<Value> {
        let header = hello(self.ip, self.addr).await?;
        let hello_ts = Instant::now();

        let mut attempt = 1;

        loop {
            // device clock is untrusted and may wrap
            let send_ts = header.ts.wrapping_add(hello_ts.elapsed().as_secs() as u32);

            trace!("sending {} with id {}", method, self.request_id);

            let payload = serde_json::to_vec(&json!({
                "id": self.request_id,
                "method": method,
                "params": params
            }))?;

            let message = Message::encode(&payload, self.token, header.device_id, send_ts);

            match send_message(message, self.addr).await {
                Ok(message) => {
                    let data = message.decode(self.token)?;
                    let response: Response = serde_json::from_slice(&data)?;

                    self.request_id = response.id().wrapping_add(1);
                    trace!("next request id {}", self.request_id);

                    return match response {
                        Response::Ok { result, .. } => Ok(result),
                        Response::Err { error, .. } => {
                            error!("{} failed: {}", method, error);
                            Err(error.into())
                        }
                    };
                }
                Err(Error::Timeout(elapsed)) => {
                    if attempt == MAX_ATTEMPTS {
                        return Err(Error::Timeout(elapsed));
                    }

                    attempt += 1;
                    self.request_id = self.request_id.wrapping_add(100);
                    error!("retrying {} with request id {}", method, self.request_id)
                }
                Err(err) => return Err(err),
            }
        }
    }
}

async fn send_message(message: Message, addr: SocketAddr) -> Result<Message> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(addr).await?;

    socket.send(&message.to_bytes()).await?;
    trace!("{} sent message", addr);

    let mut buffer = vec![0; 4096];

    loop {
        let size = timeout(REPLY_TIMEOUT, socket.recv(&mut buffer)).await??;

        if size >= HEADER_LEN {
            trace!("{} received reply of size {}", addr, size);
            return Message::read_from(&buffer[..size]);
        }

        trace!("{} ignoring {} bytes", addr, size);
    }
}
