use std::{fmt::Display, str::FromStr};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CommonError {
    #[error("Invalid ISO alpha-3 country code: {0:?}")]
    InvalidCountryCode(String),
    #[error("Invalid administrative level: {0:?}")]
    InvalidAdminLevel(String),
}

/// ISO 3166-1 alpha-3 country code, stored upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: &str) -> Result<Self, CommonError> {
        let trimmed = code.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CountryCode(trimmed.to_ascii_uppercase()))
        } else {
            Err(CommonError::InvalidCountryCode(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CountryCode {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CountryCode::new(s)
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Nesting depth in a country's administrative hierarchy (0 = country).
///
/// Whether a level is published for a given country is only known remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdminLevel(u8);

impl AdminLevel {
    pub const COUNTRY: AdminLevel = AdminLevel(0);

    pub const fn new(level: u8) -> Self {
        AdminLevel(level)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Name of the source column holding unit names at this level.
    pub fn name_column(self) -> String {
        format!("NAME_{}", self.0)
    }
}

impl From<u8> for AdminLevel {
    fn from(level: u8) -> Self {
        AdminLevel(level)
    }
}

impl FromStr for AdminLevel {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map(AdminLevel)
            .map_err(|_| CommonError::InvalidAdminLevel(s.to_string()))
    }
}

impl Display for AdminLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_is_normalised() {
        let code = CountryCode::new(" ken ").unwrap();
        assert_eq!(code.as_str(), "KEN");
        assert_eq!(code.to_string(), "KEN");
    }

    #[test]
    fn country_code_rejects_wrong_shapes() {
        for bad in ["", "KE", "KENY", "K3N", "KÉN"] {
            assert_eq!(
                CountryCode::new(bad),
                Err(CommonError::InvalidCountryCode(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn admin_level_parses_non_negative_integers() {
        assert_eq!("2".parse::<AdminLevel>().unwrap(), AdminLevel::new(2));
        assert!("-1".parse::<AdminLevel>().is_err());
        assert!("one".parse::<AdminLevel>().is_err());
    }

    #[test]
    fn admin_level_names_its_column() {
        assert_eq!(AdminLevel::new(1).name_column(), "NAME_1");
        assert_eq!(AdminLevel::COUNTRY.name_column(), "NAME_0");
    }
}
