//! External account addresses.
//!
//! Every child unit lives at an external address owned by the execution
//! environment. The environment only accepts structurally valid addresses, so
//! the same rules are applied here before anything touches the registry.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Shortest address the environment accepts.
pub const MIN_ACCOUNT_ID_LEN: usize = 2;
/// Longest address the environment accepts.
pub const MAX_ACCOUNT_ID_LEN: usize = 64;

/// Amount of value attached to a call or moved between accounts.
pub type Balance = u128;

/// Reasons an address string is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("account id `{0}` must be between {MIN_ACCOUNT_ID_LEN} and {MAX_ACCOUNT_ID_LEN} characters")]
    Length(String),

    #[error("account id `{0}` contains an invalid character or separator")]
    Malformed(String),
}

/// Returns `true` if `id` is a structurally valid external address.
///
/// Allowed characters are `a-z`, `0-9` and the separators `-`, `_`, `.`.
/// A separator may not lead, trail, or follow another separator.
pub fn is_valid_account_id(id: &str) -> bool {
    validate(id).is_ok()
}

fn validate(id: &str) -> Result<(), AccountIdError> {
    if id.len() < MIN_ACCOUNT_ID_LEN || id.len() > MAX_ACCOUNT_ID_LEN {
        return Err(AccountIdError::Length(id.to_string()));
    }

    // Starting as if a separator was just seen rejects a leading separator.
    let mut after_separator = true;
    for byte in id.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' => after_separator = false,
            b'-' | b'_' | b'.' if !after_separator => after_separator = true,
            _ => return Err(AccountIdError::Malformed(id.to_string())),
        }
    }

    if after_separator {
        return Err(AccountIdError::Malformed(id.to_string()));
    }
    Ok(())
}

/// A validated external address.
///
/// The only way to obtain one is through [`AccountId::parse`] (or the
/// `FromStr`/`TryFrom` impls built on it), so holding an `AccountId` proves the
/// address is well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn parse(id: impl Into<String>) -> Result<Self, AccountIdError> {
        let id = id.into();
        validate(&id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
