//! Backend credentials.
//!
//! Credentials live in an INI file shared with the AWS tooling
//! (`~/.aws/credentials` by default) under a `[strapi]` section:
//!
//! ```ini
//! [strapi]
//! endpoint = https://shadows.example.org/api
//! api_key = 0123abcd...
//! ```

use crate::error::{ClientError, ClientResult};
use ini::Ini;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Section read when none is given explicitly.
pub const DEFAULT_SECTION: &str = "strapi";

const ENDPOINT_KEY: &str = "endpoint";
const API_KEY_KEY: &str = "api_key";

/// Resolved endpoint and bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub endpoint: String,
    pub api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// `~/.aws/credentials` for the current user.
    pub fn default_path() -> ClientResult<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".aws").join("credentials"))
            .ok_or_else(|| ClientError::Config("cannot determine home directory".to_string()))
    }

    /// Loads the `[strapi]` section of the default credentials file.
    pub fn load_default() -> ClientResult<Self> {
        Self::from_path(Self::default_path()?)
    }

    /// Loads the `[strapi]` section of the file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!(
                "cannot read credentials file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_ini_str(&contents)
    }

    /// Loads the `[strapi]` section from any readable stream.
    pub fn from_reader(mut reader: impl Read) -> ClientResult<Self> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        Self::from_ini_str(&contents)
    }

    /// Parses the `[strapi]` section out of INI text.
    pub fn from_ini_str(contents: &str) -> ClientResult<Self> {
        Self::from_section(contents, DEFAULT_SECTION)
    }

    /// Parses `section` out of INI text; both `endpoint` and `api_key` are required.
    pub fn from_section(contents: &str, section: &str) -> ClientResult<Self> {
        let ini = Ini::load_from_str(contents)
            .map_err(|e| ClientError::Config(format!("credentials file is not valid INI: {e}")))?;

        let properties = ini.section(Some(section)).ok_or_else(|| {
            ClientError::Config(format!(
                "credentials file is missing a [{section}] section; \
                 you may have the wrong version of the credentials file"
            ))
        })?;

        let required = |key: &str| -> ClientResult<String> {
            properties
                .get(key)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    ClientError::Config(format!(
                        "credentials file is malformed: \
                         {key} was not found under the [{section}] section"
                    ))
                })
        };

        Ok(Self {
            endpoint: required(ENDPOINT_KEY)?,
            api_key: required(API_KEY_KEY)?,
        })
    }
}
