use crate::env_file;
use crate::error::{CredentialsError, CredentialsErrorExt};
use crate::mask::mask_secret;
use callkit_domain::constants::{ACCOUNT_SID_KEY, AUTH_TOKEN_KEY};
use callkit_domain::models::MaskedCredentials;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Raw account credentials. Only used to construct a telephony client.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountCredentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl AccountCredentials {
    /// Both values as given; `None` when either one is missing or blank.
    pub fn from_parts(account_sid: Option<&str>, auth_token: Option<&str>) -> Option<Self> {
        let account_sid = account_sid.filter(|s| !s.trim().is_empty())?;
        let auth_token = auth_token.filter(|s| !s.trim().is_empty())?;
        Some(Self { account_sid: account_sid.to_owned(), auth_token: auth_token.to_owned() })
    }

    #[must_use]
    pub fn masked(&self) -> MaskedCredentials {
        MaskedCredentials {
            account_sid: mask_secret(&self.account_sid),
            auth_token: mask_secret(&self.auth_token),
        }
    }
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("account_sid", &mask_secret(&self.account_sid))
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// Credentials persisted as `TWILIO_ACCOUNT_SID` / `TWILIO_AUTH_TOKEN` lines of an env file.
///
/// Every read goes to disk; values written by [`CredentialStore::save`] are visible to
/// the next read without any cache invalidation.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<String, CredentialsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Credentials file not found");
                Ok(String::new())
            },
            Err(source) => Err(CredentialsError::Io {
                source,
                context: Some("Failed to read credentials file".into()),
            }),
        }
    }

    /// Raw stored credentials; `None` unless both values are present.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read.
    pub fn load(&self) -> Result<Option<AccountCredentials>, CredentialsError> {
        let contents = self.read()?;
        let account_sid = env_file::lookup(&contents, ACCOUNT_SID_KEY);
        let auth_token = env_file::lookup(&contents, AUTH_TOKEN_KEY);
        Ok(AccountCredentials::from_parts(account_sid.as_deref(), auth_token.as_deref()))
    }

    /// # Errors
    /// Returns an error when the file exists but cannot be read.
    pub fn is_set(&self) -> Result<bool, CredentialsError> {
        self.load().map(|creds| creds.is_some())
    }

    /// Stored credentials masked for display.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read.
    pub fn masked(&self) -> Result<Option<MaskedCredentials>, CredentialsError> {
        self.load().map(|creds| creds.as_ref().map(AccountCredentials::masked))
    }

    /// Validates and persists both values, replacing any previous credential block.
    ///
    /// # Errors
    /// `Validation` when either value is empty or contains a line break or other control
    /// character (the file is left untouched), `Io` when the file cannot be read or written.
    pub fn save(&self, account_sid: &str, auth_token: &str) -> Result<(), CredentialsError> {
        let Some(creds) = AccountCredentials::from_parts(Some(account_sid), Some(auth_token))
        else {
            return Err(CredentialsError::Validation {
                message: "Account SID and Auth Token are required".into(),
                context: None,
            });
        };
        if [&creds.account_sid, &creds.auth_token].iter().any(|v| v.chars().any(char::is_control)) {
            return Err(CredentialsError::Validation {
                message: "Account SID and Auth Token must not contain line breaks or control characters"
                    .into(),
                context: None,
            });
        }

        let existing = self.read()?;
        let rendered = env_file::render(&existing, &creds.account_sid, &creds.auth_token);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create credentials directory")?;
        }
        std::fs::write(&self.path, rendered).context("Failed to write credentials file")?;

        info!(path = %self.path.display(), account_sid = %mask_secret(&creds.account_sid), "Credentials saved");
        Ok(())
    }
}
