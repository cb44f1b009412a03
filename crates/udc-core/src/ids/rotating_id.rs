use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use super::IdError;

/// Rotating device identifier supplied by the commissionee.
///
/// Binary on the wire; downstream collaborators receive it as upper-case hex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct RotatingId(Vec<u8>);

impl RotatingId {
    pub const MAX_LEN: usize = 50;

    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, IdError> {
        let bytes = bytes.into();
        if bytes.len() > Self::MAX_LEN {
            return Err(IdError::TooLong {
                kind: "rotating id",
                max: Self::MAX_LEN,
                len: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Upper-case hex rendering, at most `2 * MAX_LEN` characters.
    pub fn to_upper_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }
}

impl Display for RotatingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_upper_hex())
    }
}

impl TryFrom<Vec<u8>> for RotatingId {
    type Error = IdError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl From<RotatingId> for Vec<u8> {
    fn from(value: RotatingId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_upper_case_hex() {
        let id = RotatingId::new(vec![0x0a, 0xbc, 0xde, 0x01]).unwrap();
        assert_eq!(id.to_upper_hex(), "0ABCDE01");
        assert_eq!(id.to_string(), "0ABCDE01");
    }

    #[test]
    fn empty_id_renders_empty_string() {
        assert_eq!(RotatingId::default().to_upper_hex(), "");
    }

    #[test]
    fn rejects_ids_longer_than_protocol_maximum() {
        assert!(RotatingId::new(vec![0u8; 50]).is_ok());
        assert_eq!(
            RotatingId::new(vec![0u8; 51]),
            Err(IdError::TooLong {
                kind: "rotating id",
                max: 50,
                len: 51
            })
        );
    }
}
