use crate::{Base62Error, ShortCode, SnowflakeId};

/// Extension trait converting identifiers to and from base62 short codes.
///
/// # Example
///
/// ```
/// use linklet::{Base62Ext, SnowflakeId};
///
/// let id = SnowflakeId::from_raw(2_424_242_424_242_424_242);
/// let code = id.to_short_code();
/// assert_eq!(SnowflakeId::from_short_code(code.as_str()), Ok(id));
/// ```
pub trait Base62Ext: Sized {
    /// Encodes this ID as a [`ShortCode`].
    fn to_short_code(&self) -> ShortCode;

    /// Decodes a short code back into an ID.
    ///
    /// ⚠️ **Note:** this is a structural decode. It does not check that the
    /// value came from a generator, or that its reserved bit is clear.
    ///
    /// # Errors
    ///
    /// Returns a [`Base62Error`] if `s` is not a canonical base62 code.
    fn from_short_code(s: &str) -> Result<Self, Base62Error>;
}

impl Base62Ext for SnowflakeId {
    fn to_short_code(&self) -> ShortCode {
        ShortCode::from(*self)
    }

    fn from_short_code(s: &str) -> Result<Self, Base62Error> {
        ShortCode::parse(s).map(|code| Self::from_raw(code.to_u64()))
    }
}
