use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValueObject;
use crate::error::{DomainError, DomainResult};

/// 学生姓名
///
/// 去除首尾空白后至少 2 个字符；保存的是去除空白后的值。
///
/// ```
/// use academic_domain::value_object::StudentName;
///
/// let name = StudentName::create("  Ana Silva ").unwrap();
/// assert_eq!(name.value(), "Ana Silva");
/// assert!(StudentName::create("A").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentName(String);

impl StudentName {
    /// 最少字符数（按 Unicode 标量计数）
    pub const MIN_CHARS: usize = 2;

    pub fn create(raw: impl AsRef<str>) -> DomainResult<Self> {
        let name = Self(raw.as_ref().trim().to_string());
        name.validate()?;
        Ok(name)
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl ValueObject for StudentName {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        let chars = self.0.trim().chars().count();
        if chars < Self::MIN_CHARS {
            return Err(DomainError::InvalidName {
                reason: format!(
                    "name must have at least {} characters, got {chars}",
                    Self::MIN_CHARS
                ),
            });
        }
        Ok(())
    }
}

impl TryFrom<String> for StudentName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl From<StudentName> for String {
    fn from(name: StudentName) -> Self {
        name.0
    }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
