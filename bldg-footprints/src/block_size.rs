use std::{fmt::Display, str::FromStr};

use crate::error::FootprintError;

/// Target partition size for lazy reads, in bytes.
///
/// Parses the human-readable notation used by dataframe libraries: decimal
/// units (`k`, `M`, `G`, `T`, `P`, with or without a trailing `B`), binary units
/// (`KiB` .. `PiB`) and fractional values. Units are case-insensitive, so
/// `256M` is 256 000 000 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockSize(u64);

impl BlockSize {
    pub const DEFAULT: BlockSize = BlockSize(256_000_000);

    pub const fn from_bytes(bytes: u64) -> Self {
        BlockSize(bytes)
    }

    pub const fn bytes(self) -> u64 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }

    /// Block size from `BLDG_BLOCK_SIZE`.
    pub fn from_config() -> Result<Self, FootprintError> {
        bldg_config::CONFIG.block_size.parse()
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        BlockSize::DEFAULT
    }
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    let multiplier = match unit {
        "" | "b" => 1,
        "k" | "kb" => 1_000,
        "m" | "mb" => 1_000_000,
        "g" | "gb" => 1_000_000_000,
        "t" | "tb" => 1_000_000_000_000,
        "p" | "pb" => 1_000_000_000_000_000,
        "kib" => 1 << 10,
        "mib" => 1 << 20,
        "gib" => 1 << 30,
        "tib" => 1 << 40,
        "pib" => 1 << 50,
        _ => return None,
    };
    Some(multiplier)
}

impl FromStr for BlockSize {
    type Err = FootprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FootprintError::InvalidBlockSize(s.to_string());

        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);

        let value: f64 = number.trim().parse().map_err(|_| invalid())?;
        let multiplier = unit_multiplier(&unit.trim().to_ascii_lowercase()).ok_or_else(invalid)?;

        let bytes = value * multiplier as f64;
        if !bytes.is_finite() || bytes < 1.0 || bytes > u64::MAX as f64 {
            return Err(invalid());
        }
        Ok(BlockSize(bytes as u64))
    }
}

impl Display for BlockSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}B", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> u64 {
        s.parse::<BlockSize>().unwrap().bytes()
    }

    #[test]
    fn default_is_256_megabytes() {
        assert_eq!(BlockSize::default(), "256M".parse().unwrap());
        assert_eq!(BlockSize::default().bytes(), 256_000_000);
    }

    #[test]
    fn decimal_and_binary_units() {
        assert_eq!(parse("1024"), 1024);
        assert_eq!(parse("10 B"), 10);
        assert_eq!(parse("5kB"), 5_000);
        assert_eq!(parse("64MB"), 64_000_000);
        assert_eq!(parse("2g"), 2_000_000_000);
        assert_eq!(parse("64MiB"), 64 * 1024 * 1024);
        assert_eq!(parse("1 GiB"), 1 << 30);
    }

    #[test]
    fn fractional_values() {
        assert_eq!(parse("1.5GB"), 1_500_000_000);
        assert_eq!(parse("0.5 KiB"), 512);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "M", "12 bananas", "-1M", "0", "1..5M"] {
            assert!(bad.parse::<BlockSize>().is_err(), "{bad:?} should be rejected");
        }
    }
}
