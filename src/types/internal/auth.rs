use std::fmt;
use std::str::FromStr;

use poem_openapi::Enum;
use serde::{Deserialize, Serialize};

/// Account role within the internship program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
pub enum Role {
    Administrator,
    Coordinator,
    Supervisor,
    Intern,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrator",
            Role::Coordinator => "Coordinator",
            Role::Supervisor => "Supervisor",
            Role::Intern => "Intern",
        }
    }

    /// Roles allowed to manage program data (interns, categories, competencies)
    pub fn manages_program(&self) -> bool {
        matches!(self, Role::Administrator | Role::Coordinator)
    }

    /// Roles allowed to score interns and read evaluations
    pub fn evaluates(&self) -> bool {
        matches!(self, Role::Administrator | Role::Coordinator | Role::Supervisor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Administrator" => Ok(Role::Administrator),
            "Coordinator" => Ok(Role::Coordinator),
            "Supervisor" => Ok(Role::Supervisor),
            "Intern" => Ok(Role::Intern),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account_id)
    pub sub: String,

    /// Role of the account at issuance
    pub role: Role,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID
    pub jti: String,
}

/// Access and refresh tokens issued together
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}
