//! Common macro for implementing bounded text wrapper types.

macro_rules! impl_bounded_text {
    ($($name:ident => { kind: $kind:expr, max: $max:expr, allow_empty: $allow_empty:expr }),* $(,)?) => {
        $(
            impl $name {
                /// Maximum length in bytes accepted by the protocol.
                pub const MAX_LEN: usize = $max;

                pub fn new(value: impl Into<String>) -> Result<Self, $crate::ids::IdError> {
                    let value = value.into();
                    if !$allow_empty && value.is_empty() {
                        return Err($crate::ids::IdError::Empty { kind: $kind });
                    }
                    if value.len() > Self::MAX_LEN {
                        return Err($crate::ids::IdError::TooLong {
                            kind: $kind,
                            max: Self::MAX_LEN,
                            len: value.len(),
                        });
                    }
                    Ok(Self(value))
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }

                pub fn into_inner(self) -> String {
                    self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl TryFrom<String> for $name {
                type Error = $crate::ids::IdError;

                fn try_from(s: String) -> Result<Self, Self::Error> {
                    Self::new(s)
                }
            }

            impl TryFrom<&str> for $name {
                type Error = $crate::ids::IdError;

                fn try_from(s: &str) -> Result<Self, Self::Error> {
                    Self::new(s)
                }
            }

            impl From<$name> for String {
                fn from(value: $name) -> Self {
                    value.0
                }
            }

            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }

            impl std::ops::Deref for $name {
                type Target = str;

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }
        )*
    };
}

pub(crate) use impl_bounded_text;
