use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValueObject;
use crate::error::{DomainError, DomainResult};

/// 最终成绩
///
/// 取值为闭区间 [0, 10]（两端均包含），拒绝 NaN 与无穷；
/// 及格线为 6.0。
///
/// ```
/// use academic_domain::value_object::FinalGrade;
///
/// assert!(FinalGrade::create(6.0).unwrap().is_passing());
/// assert!(!FinalGrade::create(5.99).unwrap().is_passing());
/// assert!(FinalGrade::create(10.01).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FinalGrade(f64);

impl FinalGrade {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;
    /// 及格线
    pub const PASSING_THRESHOLD: f64 = 6.0;

    pub fn create(raw: f64) -> DomainResult<Self> {
        let grade = Self(raw);
        grade.validate()?;
        Ok(grade)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_passing(&self) -> bool {
        self.0 >= Self::PASSING_THRESHOLD
    }
}

impl ValueObject for FinalGrade {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        // NaN 与任何值比较均为 false，因此 contains 会拒绝它
        if !(Self::MIN..=Self::MAX).contains(&self.0) {
            return Err(DomainError::InvalidGrade {
                value: self.0,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(())
    }
}

impl TryFrom<f64> for FinalGrade {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl From<FinalGrade> for f64 {
    fn from(grade: FinalGrade) -> Self {
        grade.0
    }
}

impl fmt::Display for FinalGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
