//! Authentication primitives: login credentials and the configured admin.
//!
//! Inbound payload parsing stays outside the domain; handlers call the
//! validating constructors before talking to a [`LoginService`].
//!
//! [`LoginService`]: crate::domain::ports::LoginService

use std::fmt;

use uuid::Uuid;
use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use city_locator::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin@example.com ", "pw").unwrap();
/// assert_eq!(creds.email(), "admin@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address supplied by the caller.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Identity established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    email: String,
}

impl AdminIdentity {
    /// Wrap an authenticated email address.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// The authenticated email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

/// Random identifier minted for each admin session at login.
///
/// It partitions per-session caches and never leaves the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mint a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The single admin account accepted by the login gate.
///
/// Emails compare case-insensitively; passwords compare exactly.
#[derive(Clone)]
pub struct AdminAccount {
    email: String,
    password: Zeroizing<String>,
}

impl AdminAccount {
    /// Build the account from configured values.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_owned(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Configured email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Whether `credentials` match this account.
    pub fn matches(&self, credentials: &LoginCredentials) -> bool {
        self.email.eq_ignore_ascii_case(credentials.email())
            && self.password.as_str() == credentials.password()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAccount")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
