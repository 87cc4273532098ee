//! Environment configuration.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `TABLE_NAME` | required for `dynamodb` | backing table |
//! | `STORE_BACKEND` | `dynamodb` | `dynamodb` or `memory` |
//! | `DYNAMODB_ENDPOINT` | unset | endpoint override (DynamoDB Local) |
//! | `BIND_ADDR` | `0.0.0.0:3000` | listen address |
//!
//! AWS region and credentials come from the SDK's own provider chain.

use std::net::SocketAddr;

use crate::error::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Which [`PartitionStore`](crate::PartitionStore) the process runs against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    DynamoDb {
        table_name: String,
        endpoint: Option<String>,
    },
    Memory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub backend: Backend,
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr: SocketAddr = raw_addr
            .parse()
            .map_err(|_| Error::InvalidEnv { name: "BIND_ADDR", value: raw_addr.clone() })?;

        let backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("dynamodb") => Backend::DynamoDb {
                table_name: lookup("TABLE_NAME")
                    .filter(|t| !t.is_empty())
                    .ok_or(Error::MissingEnv("TABLE_NAME"))?,
                endpoint: lookup("DYNAMODB_ENDPOINT").filter(|e| !e.is_empty()),
            },
            Some("memory") => Backend::Memory,
            Some(other) => {
                return Err(Error::InvalidEnv { name: "STORE_BACKEND", value: other.to_owned() });
            }
        };

        Ok(Self { bind_addr, backend })
    }
}
