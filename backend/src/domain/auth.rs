//! Authentication primitives such as login and signup credentials.
//!
//! Handlers build these from raw strings before calling the identity port so
//! the domain never sees unvalidated input. Passwords are held in
//! [`Zeroizing`] buffers and wiped on drop.

use std::fmt;

use zeroize::Zeroizing;

use super::{DisplayName, Email, Role, UserValidationError};

/// Validation errors for login and signup payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    EmptyPassword,
    User(UserValidationError),
    RoleNotSelfAssignable(Role),
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::User(err) => write!(f, "{err}"),
            Self::RoleNotSelfAssignable(role) => {
                write!(f, "accounts cannot be created with role {role}")
            }
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<UserValidationError> for CredentialsValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

fn validate_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Email and password supplied at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw login input.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::LoginCredentials;
    ///
    /// let creds = LoginCredentials::try_from_parts(" Jane@Example.com ", "pw").expect("valid");
    /// assert_eq!(creds.email().as_ref(), "jane@example.com");
    /// ```
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            password: validate_password(password)?,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Details supplied when creating an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupDetails {
    display_name: DisplayName,
    email: Email,
    password: Zeroizing<String>,
    role: Role,
}

impl SignupDetails {
    /// Validate raw signup input. Only Buyer and Seller accounts can be
    /// created through signup.
    pub fn try_from_parts(
        display_name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Self, CredentialsValidationError> {
        if !role.is_self_assignable() {
            return Err(CredentialsValidationError::RoleNotSelfAssignable(role));
        }
        Ok(Self {
            display_name: DisplayName::new(display_name)?,
            email: Email::new(email)?,
            password: validate_password(password)?,
            role,
        })
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::User(UserValidationError::EmptyEmail))]
    #[case("   ", "pw", CredentialsValidationError::User(UserValidationError::EmptyEmail))]
    #[case("nobody", "pw", CredentialsValidationError::User(UserValidationError::InvalidEmail))]
    #[case("jane@example.com", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_login(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn valid_login_normalises_email() {
        let creds = LoginCredentials::try_from_parts("  JOHN@example.com ", "secret")
            .expect("valid inputs should succeed");
        assert_eq!(creds.email().as_ref(), "john@example.com");
        assert_eq!(creds.password(), "secret");
    }

    #[rstest]
    #[case(Role::Admin)]
    #[case(Role::PhdAdmin)]
    fn signup_rejects_admin_roles(#[case] role: Role) {
        let err = SignupDetails::try_from_parts("Eve", "eve@example.com", "pw", role)
            .expect_err("admin signup must fail");
        assert_eq!(err, CredentialsValidationError::RoleNotSelfAssignable(role));
    }

    #[rstest]
    fn signup_accepts_seller() {
        let details = SignupDetails::try_from_parts("Sam", "Sam@Example.com", "pw", Role::Seller)
            .expect("valid signup");
        assert_eq!(details.display_name().as_ref(), "Sam");
        assert_eq!(details.email().as_ref(), "sam@example.com");
        assert_eq!(details.role(), Role::Seller);
    }
}
