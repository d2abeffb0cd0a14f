//!  Wayfare Travel MCP
//!
//!  Copyright (C) 2026  The Wayfare Travel MCP Authors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Errors
//!
//! One variant family per failure class. Nothing here is retried: every
//! error reaches the tool caller with its message intact.

use thiserror::Error;
use wayfare_request_gate::GateError;

pub type Result<T, E = TravelError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TravelError {
    /// Missing or unusable process configuration. Fatal at startup.
    #[error("{0}")]
    Config(String),

    /// Input rejected against its declared schema, before any network call.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Client-side precondition on an identifier, before any network call.
    #[error("{0}")]
    Precondition(String),

    /// Request is well-formed but cannot describe a trip.
    #[error("{0}")]
    Domain(String),

    /// Upstream answered with a non-2xx status.
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection, timeout or body read failure.
    #[error("Request failed: {0}")]
    Transport(#[from] wreq::Error),

    /// Upstream body is not the JSON we expect.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Gate(#[from] GateError),
}

impl TravelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// True when the failure happened before anything was sent upstream.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Validation(_) | Self::Precondition(_) | Self::Domain(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_not_rewrapped() {
        let e = TravelError::domain("Return date required for round-trip flights");
        assert_eq!(e.to_string(), "Return date required for round-trip flights");

        let e = TravelError::Http {
            status: 422,
            body: "{\"errors\":[]}".into(),
        };
        assert_eq!(e.to_string(), "HTTP error 422: {\"errors\":[]}");
    }

    #[test]
    fn test_client_side_classification() {
        assert!(TravelError::validation("adults must be at least 1").is_client_side());
        assert!(TravelError::precondition("bad id").is_client_side());
        assert!(
            !TravelError::Http {
                status: 500,
                body: String::new()
            }
            .is_client_side()
        );
    }
}
