mod encryption;
use encryption::{decrypt, encrypt};

use md5::{Digest, Md5};

use crate::{Error, Result, Token};

pub const HEADER_LEN: usize = 32;
const MAGIC: [u8; 2] = [0x21, 0x31];

#[derive(Debug)]
pub struct Message {
    header: Header,
    checksum: [u8; 16],
    data: Vec<u8>,
}

impl Message {
    pub fn encode(payload: &[u8], token: Token<16>, device_id: u32, ts: u32) -> Message {
        let data = encrypt(payload, token);

        let header = Header {
            length: data.len() + HEADER_LEN,
            device_id,
            ts,
        };

        let checksum = Self::checksum(&header, &token, &data);

        Message {
            header,
            checksum,
            data,
        }
    }

    pub fn decode(self, token: Token<16>) -> Result<Vec<u8>> {
        let checksum = Self::checksum(&self.header, &token, &self.data);

        if checksum != self.checksum {
            return Err(Error::InvalidChecksum);
        }

        let mut data = decrypt(&self.data, token)?;
        while data.ends_with(&[0x0]) {
            data.pop();
        }

        Ok(data)
    }

    fn checksum(header: &Header, token: &[u8], data: &[u8]) -> [u8; 16] {
        let mut hasher = Md5::new();

        hasher.update(header.to_bytes());
        hasher.update(token);
        hasher.update(data);

        hasher.finalize().into()
    }

    pub fn read_from(bytes: &[u8]) -> Result<Message> {
        let header = Header::read_from(bytes)?;

        if header.length != bytes.len() {
            return Err(Error::InvalidPacket(bytes.len()));
        }

        let mut checksum = [0; 16];
        checksum.copy_from_slice(&bytes[16..HEADER_LEN]);

        Ok(Message {
            header,
            checksum,
            data: bytes[HEADER_LEN..].to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.header.length);

        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.extend_from_slice(&self.checksum);
        bytes.extend_from_slice(&self.data);

        bytes
    }
}

#[derive(Debug, PartialEq)]
pub struct Header {
    pub length: usize,
    pub device_id: u32,
    pub ts: u32,
}

impl Header {
    pub fn read_from(bytes: &[u8]) -> Result<Header> {
        if bytes.len() < HEADER_LEN || bytes[0..2] != MAGIC {
            return Err(Error::InvalidPacket(bytes.len()));
        }

        let length = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;
        let device_id = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let ts = u32::from_be_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

        Ok(Header {
            length,
            device_id,
            ts,
        })
    }

    fn to_bytes(&self) -> [u8; 16] {
        let mut bytes = [0; 16];

        bytes[0..2].copy_from_slice(&MAGIC);
        bytes[2..4].copy_from_slice(&(self.length as u16).to_be_bytes());
        bytes[8..12].copy_from_slice(&self.device_id.to_be_bytes());
        bytes[12..16].copy_from_slice(&self.ts.to_be_bytes());

        bytes
    }
}
