//! Component types and their host output conventions.
//!
//! Every plugin component targets one host repository. Where the component
//! lands inside that host is a pure function of the component type, the
//! plugin author and the component name:
//!
//! | type | output path |
//! |---|---|
//! | docker | `compose/plugins/docker/<author>_<name>` |
//! | backend | `modules/<author>/<name>` |
//! | admin / store | `modules/@<author>/<name>` |
//!
//! # Examples
//!
//! ```
//! use bitcart_core::ComponentType;
//! use std::path::PathBuf;
//!
//! let out = ComponentType::Backend.output_directory("alice", "demo");
//! assert_eq!(out, PathBuf::from("modules/alice/demo"));
//! ```

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Category of a plugin sub-component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    /// Python module loaded by the backend host
    Backend,
    /// Compose fragment for the infrastructure host
    Docker,
    /// Module for the admin frontend
    Admin,
    /// Module for the store frontend
    Store,
}

impl ComponentType {
    /// All component types, in the order the scaffold generator processes them.
    pub const ALL: [Self; 4] = [Self::Backend, Self::Docker, Self::Admin, Self::Store];

    /// Returns the manifest spelling of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Docker => "docker",
            Self::Admin => "admin",
            Self::Store => "store",
        }
    }

    /// Returns the name of the host repository this type installs into.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Backend => "bitcart",
            Self::Docker => "bitcart-docker",
            Self::Admin => "bitcart-admin",
            Self::Store => "bitcart-store",
        }
    }

    /// Returns true for the two frontend hosts.
    #[must_use]
    pub const fn is_frontend(&self) -> bool {
        matches!(self, Self::Admin | Self::Store)
    }

    /// Computes the component location relative to the host repository root.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitcart_core::ComponentType;
    /// use std::path::PathBuf;
    ///
    /// assert_eq!(
    ///     ComponentType::Docker.output_directory("alice", "tor"),
    ///     PathBuf::from("compose/plugins/docker/alice_tor")
    /// );
    /// assert_eq!(
    ///     ComponentType::Store.output_directory("alice", "theme"),
    ///     PathBuf::from("modules/@alice/theme")
    /// );
    /// ```
    #[must_use]
    pub fn output_directory(&self, author: &str, name: &str) -> PathBuf {
        match self {
            Self::Docker => PathBuf::from("compose/plugins/docker").join(format!("{author}_{name}")),
            Self::Backend => PathBuf::from("modules").join(author).join(name),
            Self::Admin | Self::Store => PathBuf::from("modules").join(format!("@{author}")).join(name),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backend" => Ok(Self::Backend),
            "docker" => Ok(Self::Docker),
            "admin" => Ok(Self::Admin),
            "store" => Ok(Self::Store),
            _ => Err(Error::UnknownComponentType {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_directory_docker() {
        assert_eq!(
            ComponentType::Docker.output_directory("mary-jane", "tor.proxy"),
            PathBuf::from("compose/plugins/docker/mary-jane_tor.proxy")
        );
    }

    #[test]
    fn test_output_directory_backend() {
        assert_eq!(
            ComponentType::Backend.output_directory("o'neil", "rate_limit"),
            PathBuf::from("modules/o'neil/rate_limit")
        );
    }

    #[test]
    fn test_output_directory_admin() {
        assert_eq!(
            ComponentType::Admin.output_directory("acme.corp", "dash-board"),
            PathBuf::from("modules/@acme.corp/dash-board")
        );
    }

    #[test]
    fn test_output_directory_store() {
        assert_eq!(
            ComponentType::Store.output_directory("acme_corp", "the theme"),
            PathBuf::from("modules/@acme_corp/the theme")
        );
    }

    #[test]
    fn test_output_directory_is_deterministic() {
        for kind in ComponentType::ALL {
            assert_eq!(
                kind.output_directory("a-b", "c.d"),
                kind.output_directory("a-b", "c.d")
            );
        }
    }

    #[test]
    fn test_parse_roundtrip() {
        for kind in ComponentType::ALL {
            assert_eq!(kind.as_str().parse::<ComponentType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "Backend".parse::<ComponentType>().unwrap_err();
        assert!(err.to_string().contains("Backend"));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ComponentType::Admin).unwrap();
        assert_eq!(json, "\"admin\"");

        let parsed: ComponentType = serde_json::from_str("\"docker\"").unwrap();
        assert_eq!(parsed, ComponentType::Docker);

        assert!(serde_json::from_str::<ComponentType>("\"frontend\"").is_err());
    }

    #[test]
    fn test_is_frontend() {
        assert!(ComponentType::Admin.is_frontend());
        assert!(ComponentType::Store.is_frontend());
        assert!(!ComponentType::Backend.is_frontend());
        assert!(!ComponentType::Docker.is_frontend());
    }
}
