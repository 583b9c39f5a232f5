use cipher::block_padding::UnpadError;
use md5::{Digest, Md5};

use crate::Token;

/// miIO derives the AES key and iv from the device token:
/// key = md5(token), iv = md5(key + token).
fn key_iv_from_token(token: Token<16>) -> (Token<16>, Token<16>) {
    let key: Token<16> = Md5::digest(token).into();

    let mut hasher = Md5::new();
    hasher.update(key);
    hasher.update(token);
    let iv: Token<16> = hasher.finalize().into();

    (key, iv)
}

pub fn encrypt(data: &[u8], token: Token<16>) -> Vec<u8> {
    let (key, iv) = key_iv_from_token(token);
    crypto::encrypt(data, key, iv)
}

pub fn decrypt(data: &[u8], token: Token<16>) -> Result<Vec<u8>, UnpadError> {
    let (key, iv) = key_iv_from_token(token);
    crypto::decrypt(data, key, iv)
}
