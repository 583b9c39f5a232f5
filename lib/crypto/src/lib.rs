mod cbc;
pub use cbc::{decrypt, encrypt};

mod token;
pub use token::{parse_token, InvalidToken, Token};
