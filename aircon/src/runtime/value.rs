//! Raw values, colors, and time units.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// A value as stored by a remote source, before decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Boolean.
    Bool(bool),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// String.
    String(String),
    /// Set of strings.
    StringSet(BTreeSet<String>),
}

impl RawValue {
    /// Decodes a boolean.
    #[must_use]
    pub fn into_bool(self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Decodes an `i32`, accepting longs that fit.
    #[must_use]
    pub fn into_int(self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(v),
            Self::Long(v) => i32::try_from(v).ok(),
            _ => None,
        }
    }

    /// Decodes an `i64`, widening ints.
    #[must_use]
    pub fn into_long(self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(i64::from(v)),
            Self::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Decodes an `f32`, converting integers.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn into_float(self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(v),
            Self::Int(v) => Some(v as f32),
            Self::Long(v) => Some(v as f32),
            _ => None,
        }
    }

    /// Decodes a string.
    #[must_use]
    pub fn into_string(self) -> Option<String> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Decodes a string set.
    #[must_use]
    pub fn into_string_set(self) -> Option<BTreeSet<String>> {
        match self {
            Self::StringSet(v) => Some(v),
            _ => None,
        }
    }
}

/// An ARGB color.
///
/// # Examples
///
/// ```
/// use aircon::runtime::Color;
///
/// let color = Color::from_hex("#336699").unwrap();
/// assert_eq!(color.argb(), 0xFF33_6699);
/// assert_eq!(color.to_hex(), "#FF336699");
/// assert!(Color::from_hex("336699").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Color(u32);

impl Color {
    /// Wraps a packed ARGB value.
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    /// Parses `#RRGGBB` (opaque) or `#AARRGGBB`.
    #[must_use]
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            6 => Some(Self(0xFF00_0000 | value)),
            8 => Some(Self(value)),
            _ => None,
        }
    }

    /// Decodes a color from a hex string or a packed integer.
    #[must_use]
    pub fn from_raw(raw: RawValue) -> Option<Self> {
        match raw {
            RawValue::String(text) => Self::from_hex(&text),
            #[allow(clippy::cast_sign_loss)]
            RawValue::Int(v) => Some(Self(v as u32)),
            RawValue::Long(v) => u32::try_from(v).ok().map(Self),
            _ => None,
        }
    }

    /// The packed ARGB value.
    #[must_use]
    pub const fn argb(self) -> u32 {
        self.0
    }

    /// Alpha channel.
    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// `#AARRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:08X}", self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// The unit a `time` config's raw value is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Milliseconds.
    #[default]
    Milliseconds,
    /// Seconds.
    Seconds,
    /// Minutes.
    Minutes,
    /// Hours.
    Hours,
    /// Days.
    Days,
}

impl TimeUnit {
    /// Parses a declaration name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "milliseconds" => Some(Self::Milliseconds),
            "seconds" => Some(Self::Seconds),
            "minutes" => Some(Self::Minutes),
            "hours" => Some(Self::Hours),
            "days" => Some(Self::Days),
            _ => None,
        }
    }

    /// The variant name, used when rendering `rt::TimeUnit::<Name>`.
    #[must_use]
    pub const fn variant(self) -> &'static str {
        match self {
            Self::Milliseconds => "Milliseconds",
            Self::Seconds => "Seconds",
            Self::Minutes => "Minutes",
            Self::Hours => "Hours",
            Self::Days => "Days",
        }
    }

    const fn millis(self) -> u64 {
        match self {
            Self::Milliseconds => 1,
            Self::Seconds => 1_000,
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
            Self::Days => 86_400_000,
        }
    }

    /// Converts an amount of this unit. Negative or overflowing amounts are
    /// invalid and yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use aircon::runtime::TimeUnit;
    /// use std::time::Duration;
    ///
    /// assert_eq!(TimeUnit::Minutes.to_duration(2), Some(Duration::from_secs(120)));
    /// assert_eq!(TimeUnit::Seconds.to_duration(-1), None);
    /// ```
    #[must_use]
    pub fn to_duration(self, amount: i64) -> Option<Duration> {
        let amount = u64::try_from(amount).ok()?;
        amount.checked_mul(self.millis()).map(Duration::from_millis)
    }

    /// Converts a duration back to whole units, truncating.
    #[must_use]
    pub fn from_duration(self, duration: Duration) -> i64 {
        let units = duration.as_millis() / u128::from(self.millis());
        i64::try_from(units).unwrap_or(i64::MAX)
    }
}
