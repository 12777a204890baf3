//! Permission levels gating tool invocation.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Minimum capability an actor must hold to invoke a tool.
///
/// The model is deliberately flat: an actor either holds a level or it does
/// not. Any richer role hierarchy is materialized into this flat set by the
/// identity collaborator before it reaches the runtime.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// No capability required; every actor passes.
    None,
    /// Read access to clinical records.
    Read,
    /// Write access to clinical records.
    Write,
    /// Administrative operations over the catalog or store.
    Admin,
}

impl Permission {
    /// Returns the stable wire label for this level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            other => Err(Error::UnknownPermission {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for level in [
            Permission::None,
            Permission::Read,
            Permission::Write,
            Permission::Admin,
        ] {
            let parsed = level.as_str().parse::<Permission>().expect("parse");
            assert_eq!(level, parsed);
        }
    }

    #[test]
    fn unknown_label_rejected() {
        let err = "superuser".parse::<Permission>().expect_err("should fail");
        assert!(matches!(err, Error::UnknownPermission { value } if value == "superuser"));
    }
}
