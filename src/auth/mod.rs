pub mod jwt;
pub mod unsubscribe_token;

pub use jwt::verify_jwt;
pub use unsubscribe_token::{decode_email, normalize_email, UnsubscribeTokens};
