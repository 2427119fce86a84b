//! Exact frequency values with unit parsing and display.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const KHZ: u64 = 1_000;
const MHZ: u64 = 1_000_000;
const GHZ: u64 = 1_000_000_000;

/// A frequency stored as an exact, reduced ratio of Hertz.
///
/// Clock planning compares generated frequencies for equality, so the value is
/// never approximated by a float. Supports parsing from strings like "50MHz",
/// "48.5MHz", "50e6", "1000/3MHz" and bare numeric values (interpreted as Hz).
/// Parsing rejects zero and negative values. Displays using the most
/// appropriate unit for readability.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency {
    num: u64,
    den: u64,
}

impl Frequency {
    /// Creates a frequency from a whole number of Hertz.
    pub const fn from_hz(hz: u64) -> Self {
        Self { num: hz, den: 1 }
    }

    /// Creates a frequency from a whole number of kilohertz.
    pub const fn from_khz(khz: u64) -> Self {
        Self::from_hz(khz * KHZ)
    }

    /// Creates a frequency from a whole number of megahertz.
    pub const fn from_mhz(mhz: u64) -> Self {
        Self::from_hz(mhz * MHZ)
    }

    /// Creates a frequency of `num / den` Hertz.
    ///
    /// Returns `None` for a zero denominator.
    pub fn from_ratio(num: u64, den: u64) -> Option<Self> {
        Self::from_wide(u128::from(num), u128::from(den))
    }

    fn from_wide(num: u128, den: u128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let g = gcd(num, den);
        Some(Self {
            num: u64::try_from(num / g).ok()?,
            den: u64::try_from(den / g).ok()?,
        })
    }

    /// Returns the numerator of the reduced Hertz ratio.
    pub fn numer(&self) -> u64 {
        self.num
    }

    /// Returns the denominator of the reduced Hertz ratio.
    pub fn denom(&self) -> u64 {
        self.den
    }

    /// Returns `true` for a zero frequency.
    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Returns the frequency in Hertz (approximate).
    pub fn hz(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Returns the frequency in kilohertz (approximate).
    pub fn khz(&self) -> f64 {
        self.hz() / KHZ as f64
    }

    /// Returns the frequency in megahertz (approximate).
    pub fn mhz(&self) -> f64 {
        self.hz() / MHZ as f64
    }

    /// Returns the clock period in nanoseconds, or 0 for a zero frequency.
    pub fn period_ns(&self) -> f64 {
        if self.num == 0 {
            0.0
        } else {
            1e9 * self.den as f64 / self.num as f64
        }
    }

    /// Multiplies the frequency by `mul / div`.
    ///
    /// Returns `None` when `div` is zero or the reduced result does not fit.
    pub fn scale(self, mul: u64, div: u64) -> Option<Self> {
        Self::from_wide(
            u128::from(self.num) * u128::from(mul),
            u128::from(self.den) * u128::from(div),
        )
    }

    /// Returns `self / other` as a reduced fraction `(num, den)`.
    ///
    /// Returns `None` when `other` is zero.
    pub fn ratio_to(self, other: Frequency) -> Option<(u128, u128)> {
        if other.num == 0 {
            return None;
        }
        let n = u128::from(self.num) * u128::from(other.den);
        let d = u128::from(self.den) * u128::from(other.num);
        let g = gcd(n, d);
        Some((n / g, d / g))
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Ord for Frequency {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = u128::from(self.num) * u128::from(other.den);
        let rhs = u128::from(other.num) * u128::from(self.den);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Frequency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den != 1 {
            return write!(f, "{}/{}Hz", self.num, self.den);
        }
        let hz = self.num;
        if hz >= GHZ {
            write_scaled(f, hz, GHZ, "GHz")
        } else if hz >= MHZ {
            write_scaled(f, hz, MHZ, "MHz")
        } else if hz >= KHZ {
            write_scaled(f, hz, KHZ, "KHz")
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Writes `hz / scale` with only the significant fractional digits.
fn write_scaled(f: &mut fmt::Formatter<'_>, hz: u64, scale: u64, unit: &str) -> fmt::Result {
    let whole = hz / scale;
    let frac = hz % scale;
    if frac == 0 {
        return write!(f, "{whole}{unit}");
    }
    let width = scale.ilog10() as usize;
    let digits = format!("{frac:0width$}");
    write!(f, "{whole}.{}{unit}", digits.trim_end_matches('0'))
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Frequency {
    type Error = ParseFrequencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Error type for parsing frequency strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl fmt::Display for ParseFrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid frequency: '{}'", self.input)
    }
}

impl std::error::Error for ParseFrequencyError {}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        // Suffixes are case-insensitive; "hz" must be tried last
        let lower = s.to_ascii_lowercase();
        let (number, scale) = if let Some(num) = lower.strip_suffix("ghz") {
            (num, GHZ)
        } else if let Some(num) = lower.strip_suffix("mhz") {
            (num, MHZ)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, KHZ)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1)
        } else {
            (lower.as_str(), 1)
        };

        let (num, den) = match number.trim().split_once('/') {
            Some((top, bottom)) => {
                let (tn, td) = parse_decimal(top.trim()).ok_or_else(err)?;
                let (bn, bd) = parse_decimal(bottom.trim()).ok_or_else(err)?;
                (
                    tn.checked_mul(bd).ok_or_else(err)?,
                    td.checked_mul(bn).ok_or_else(err)?,
                )
            }
            None => parse_decimal(number.trim()).ok_or_else(err)?,
        };
        let num = num.checked_mul(u128::from(scale)).ok_or_else(err)?;
        if num == 0 || den == 0 {
            return Err(err());
        }
        Self::from_wide(num, den).ok_or_else(err)
    }
}

/// Parses an unsigned decimal with optional fraction and exponent
/// (`"48.5"`, `"50e6"`, `"1.5e-3"`) into an unreduced fraction.
fn parse_decimal(s: &str) -> Option<(u128, u128)> {
    let s = s.strip_prefix('+').unwrap_or(s);
    let (mantissa, exponent) = match s.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().ok()?),
        None => (s, 0),
    };
    let (whole, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    let mut num: u128 = 0;
    for b in whole.bytes().chain(frac.bytes()) {
        if !b.is_ascii_digit() {
            return None;
        }
        num = num.checked_mul(10)?.checked_add(u128::from(b - b'0'))?;
    }
    let mut den = 10u128.checked_pow(u32::try_from(frac.len()).ok()?)?;
    let shift = 10u128.checked_pow(exponent.unsigned_abs())?;
    if exponent >= 0 {
        num = num.checked_mul(shift)?;
    } else {
        den = den.checked_mul(shift)?;
    }
    Some((num, den))
}
