//! Credential pair types and the stores that hold them.

mod encryption;
mod file;
mod memory;
mod pair;
mod store;

pub use encryption::Cipher;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use pair::{CredentialPair, TokenResponse, DEFAULT_EXPIRES_IN_SECONDS, DEFAULT_TOKEN_TYPE};
pub use store::{Store, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
