//! Wire and domain types shared by the SaveVault client crates.
//!
//! [`types`] holds the canonical `Game`/`Save` entities and the raw shape the
//! remote service returns; [`messages`] holds request and response bodies for
//! every endpoint. [`lenient`] is the one place where malformed JSON is
//! allowed to degrade into a default value.

pub mod lenient;
pub mod messages;
pub mod types;

pub use messages::{
    Ack, Credentials, ErrorBody, GameRequest, LoginResponse, NewSave, SaveUpdate, VerifyResponse,
};
pub use types::{Game, RawGame, Save};
