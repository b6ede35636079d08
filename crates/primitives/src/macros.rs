/// Implements conversions, CB58 `Display`/`FromStr`, and string serde for a
/// fixed-length identifier newtype `$wrapper([u8; $len])`.
///
/// `$prefix` is prepended to the CB58 body on display and required on parse.
macro_rules! impl_cb58_id {
    ($wrapper:ident, $len:expr, $prefix:expr) => {
        impl $wrapper {
            /// Length of the raw identifier in bytes.
            pub const LEN: usize = $len;

            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub const fn into_bytes(self) -> [u8; $len] {
                self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }
        }

        impl ::std::convert::From<[u8; $len]> for $wrapper {
            fn from(value: [u8; $len]) -> Self {
                Self(value)
            }
        }

        impl ::std::convert::From<$wrapper> for [u8; $len] {
            fn from(value: $wrapper) -> Self {
                value.0
            }
        }

        impl ::std::convert::AsRef<[u8]> for $wrapper {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl ::std::convert::TryFrom<&[u8]> for $wrapper {
            type Error = $crate::errors::PrimitiveParseError;

            fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
                <[u8; $len]>::try_from(value)
                    .map(Self)
                    .map_err(|_| $crate::errors::PrimitiveParseError::Length {
                        expected: $len,
                        actual: value.len(),
                    })
            }
        }

        impl ::core::fmt::Display for $wrapper {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}{}", $prefix, $crate::cb58::encode(&self.0))
            }
        }

        impl ::core::fmt::Debug for $wrapper {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}({})", stringify!($wrapper), self)
            }
        }

        impl ::std::str::FromStr for $wrapper {
            type Err = $crate::errors::PrimitiveParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let body = s
                    .strip_prefix($prefix)
                    .ok_or($crate::errors::PrimitiveParseError::MissingPrefix($prefix))?;
                $crate::cb58::decode_array::<$len>(body).map(Self)
            }
        }

        impl ::serde::Serialize for $wrapper {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $wrapper {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

/// Implements `0x`-hex `Display`/`FromStr` and string serde for a byte
/// array newtype that is too long for the std derives.
macro_rules! impl_hex_bytes {
    ($wrapper:ident, $len:expr) => {
        impl $wrapper {
            pub const LEN: usize = $len;

            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl ::std::convert::AsRef<[u8]> for $wrapper {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl ::core::fmt::Display for $wrapper {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "0x{}", ::hex::encode(self.0))
            }
        }

        impl ::core::fmt::Debug for $wrapper {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}({})", stringify!($wrapper), self)
            }
        }

        impl ::std::str::FromStr for $wrapper {
            type Err = $crate::errors::PrimitiveParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s.strip_prefix("0x").unwrap_or(s);
                let mut out = [0u8; $len];
                ::hex::decode_to_slice(digits, &mut out).map_err(|e| match e {
                    ::hex::FromHexError::InvalidStringLength
                    | ::hex::FromHexError::OddLength => {
                        $crate::errors::PrimitiveParseError::Length {
                            expected: $len,
                            actual: digits.len() / 2,
                        }
                    }
                    other => $crate::errors::PrimitiveParseError::Hex(other.to_string()),
                })?;
                Ok(Self(out))
            }
        }

        impl ::serde::Serialize for $wrapper {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $wrapper {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}
