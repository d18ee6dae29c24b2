use crate::{Base62Error, SnowflakeId, decode, encode};
use core::{fmt, str::FromStr};

/// A canonical base62 token, the externally exposed form of an identifier.
///
/// A `ShortCode` can only be built by encoding an integer or by parsing a
/// string that decodes cleanly, so holding one proves it maps back to exactly
/// one value.
///
/// # Example
///
/// ```
/// use linklet::ShortCode;
///
/// let code = ShortCode::from_u64(3_843);
/// assert_eq!(code.as_str(), "zz");
/// assert_eq!(code.to_u64(), 3_843);
///
/// let parsed: ShortCode = "zz".parse().unwrap();
/// assert_eq!(parsed, code);
/// assert!("z-z".parse::<ShortCode>().is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortCode {
    code: String,
    value: u64,
}

impl ShortCode {
    pub fn from_u64(value: u64) -> Self {
        Self {
            code: encode(value),
            value,
        }
    }

    /// Validates and wraps `s`.
    ///
    /// # Errors
    ///
    /// Returns a [`Base62Error`] if `s` is not a canonical base62 code.
    pub fn parse(s: &str) -> Result<Self, Base62Error> {
        let value = decode(s)?;
        Ok(Self {
            code: s.to_owned(),
            value,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// The integer this code encodes.
    pub const fn to_u64(&self) -> u64 {
        self.value
    }

    pub fn into_string(self) -> String {
        self.code
    }
}

impl From<SnowflakeId> for ShortCode {
    fn from(id: SnowflakeId) -> Self {
        Self::from_u64(id.to_raw())
    }
}

impl FromStr for ShortCode {
    type Err = Base62Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = Base62Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let value = decode(&s)?;
        Ok(Self { code: s, value })
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ShortCode").field(&self.code).finish()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ShortCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.code)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ShortCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::try_from(s).map_err(serde::de::Error::custom)
    }
}
