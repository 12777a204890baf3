//! Actor identifier types.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

const MAX_ACTOR_ID_LEN: usize = 128;

/// Unique identifier for an actor invoking tools through the runtime.
///
/// Actor ids are caller-supplied opaque strings (service account names,
/// session subjects, clinician identifiers). They are validated for shape
/// only; meaning is assigned by the identity collaborator that issued them.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Creates a new actor identifier after validating its format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidActorId`] if the identifier is empty,
    /// whitespace-only, or longer than the supported maximum.
    pub fn new(id: impl Into<String>) -> Result<Self, Error> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::InvalidActorId {
                id,
                reason: "identifier cannot be empty".into(),
            });
        }
        if id.len() > MAX_ACTOR_ID_LEN {
            return Err(Error::InvalidActorId {
                id,
                reason: format!("identifier length must be <= {MAX_ACTOR_ID_LEN}"),
            });
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<ActorId> for String {
    fn from(value: ActorId) -> Self {
        value.0
    }
}

impl FromStr for ActorId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
