use std::{fmt, num::NonZeroU32, str::FromStr};

use thiserror::Error;

use crate::ParamError;

/// Interface version of a model kind.
///
/// Versions start at 1. A kind that supports version `n` accepts
/// requests for any version from 1 through `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionId(NonZeroU32);

impl VersionId {
    /// The first interface version.
    pub const V1: VersionId = VersionId(NonZeroU32::MIN);

    /// Creates a version id, returning `None` for zero.
    #[must_use]
    pub const fn new(version: u32) -> Option<Self> {
        match NonZeroU32::new(version) {
            Some(version) => Some(Self(version)),
            None => None,
        }
    }

    /// Returns the version number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns `true` if a kind supporting `self` can serve a request for `requested`.
    #[must_use]
    pub const fn supports(self, requested: VersionId) -> bool {
        requested.get() <= self.get()
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A kind selection as written in the parameters: `"<kind> [<version>]"`.
///
/// # Examples
///
/// ```
/// use strut_core::{KindSpec, VersionId};
///
/// let spec: KindSpec = "MyModel 2".parse().unwrap();
/// assert_eq!(spec.kind, "MyModel");
/// assert_eq!(spec.version, VersionId::new(2));
///
/// let spec: KindSpec = "MyModel".parse().unwrap();
/// assert_eq!(spec.version, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSpec {
    pub kind: String,
    /// Requested interface version, if the selection names one.
    pub version: Option<VersionId>,
}

impl FromStr for KindSpec {
    type Err = KindError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || KindError::Malformed {
            value: text.to_string(),
        };

        let mut tokens = text.split_whitespace();
        let kind = tokens.next().ok_or_else(malformed)?;
        let version = match tokens.next() {
            Some(token) => {
                let number = token.parse::<u32>().map_err(|_| malformed())?;
                Some(VersionId::new(number).ok_or_else(malformed)?)
            }
            None => None,
        };

        if tokens.next().is_some() {
            return Err(malformed());
        }

        Ok(Self {
            kind: kind.to_string(),
            version,
        })
    }
}

/// The result of a successful kind query: which kind to build, at which version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindInfo {
    pub kind: String,
    pub version: VersionId,
}

/// Errors that may occur when selecting a model kind.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum KindError {
    /// The kind selection could not be read from the parameters.
    #[error("cannot read kind selection: {0}")]
    Param(#[from] ParamError),

    #[error("malformed kind selection `{value}`")]
    Malformed { value: String },

    #[error("kind `{kind}` is not registered for model class `{class}`")]
    Unknown { class: &'static str, kind: String },

    /// The selected kind exists but was built for another kind name.
    #[error("kind `{requested}` cannot be served by kind `{provided}`")]
    Mismatch { requested: String, provided: String },

    #[error(
        "kind `{kind}` of model class `{class}` supports version {supported}, \
         version {requested} was requested"
    )]
    IncompatibleVersion {
        class: &'static str,
        kind: String,
        requested: VersionId,
        supported: VersionId,
    },
}
