use std::fmt;

pub type Token<const N: usize> = [u8; N];

#[derive(Debug, PartialEq)]
pub enum InvalidToken {
    Length { expected: usize, actual: usize },
    Character(char),
}

impl fmt::Display for InvalidToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { expected, actual } => {
                write!(f, "token must be {expected} hex chars, got {actual}")
            }
            Self::Character(c) => write!(f, "token contains non-hex char {c:?}"),
        }
    }
}

impl std::error::Error for InvalidToken {}

/// Parses a hex string of exactly `2 * N` chars into a token.
pub fn parse_token<const N: usize>(hex: &str) -> Result<Token<N>, InvalidToken> {
    if hex.len() != N * 2 {
        return Err(InvalidToken::Length {
            expected: N * 2,
            actual: hex.len(),
        });
    }

    let mut token = [0; N];

    for (byte, pair) in token.iter_mut().zip(hex.as_bytes().chunks(2)) {
        *byte = (nibble(pair[0])? << 4) | nibble(pair[1])?;
    }

    Ok(token)
}

fn nibble(byte: u8) -> Result<u8, InvalidToken> {
    let c = char::from(byte);
    c.to_digit(16)
        .map(|value| value as u8)
        .ok_or(InvalidToken::Character(c))
}
