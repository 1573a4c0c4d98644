use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValueObject;
use crate::error::{DomainError, DomainResult};

/// 学籍号（RA）
///
/// 非空标识；按值相等。全局唯一性由用例在创建前检查，而非值对象本身。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcademicRegistration(String);

impl AcademicRegistration {
    pub fn create(raw: impl AsRef<str>) -> DomainResult<Self> {
        let registration = Self(raw.as_ref().trim().to_string());
        registration.validate()?;
        Ok(registration)
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl ValueObject for AcademicRegistration {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.0.trim().is_empty() {
            return Err(DomainError::InvalidRegistration {
                reason: "registration must not be blank".to_string(),
            });
        }
        Ok(())
    }
}

impl TryFrom<String> for AcademicRegistration {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl From<AcademicRegistration> for String {
    fn from(registration: AcademicRegistration) -> Self {
        registration.0
    }
}

impl fmt::Display for AcademicRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
