//! Bounded identifier and text wrappers for type safety.
//!
//! Every wrapper enforces the maximum length the UDC wire format allows,
//! so an oversized value is rejected at construction instead of being truncated.

mod error;
mod rotating_id;
mod text_macro;

pub use error::IdError;
pub use rotating_id::RotatingId;

use serde::{Deserialize, Serialize};
use text_macro::impl_bounded_text;

/// DNS-SD instance name of a commissionee advertisement.
///
/// 对端广播的实例名，用于在会话表中定位记录。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstanceName(String);

/// User-visible device name announced by the commissionee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceName(String);

/// Free-form pairing instruction shown next to a passcode prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PairingInstruction(String);

impl_bounded_text! {
    InstanceName => { kind: "instance name", max: 63, allow_empty: false },
    DeviceName => { kind: "device name", max: 32, allow_empty: true },
    PairingInstruction => { kind: "pairing instruction", max: 128, allow_empty: true },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_name_rejects_empty() {
        assert_eq!(
            InstanceName::new(""),
            Err(IdError::Empty {
                kind: "instance name"
            })
        );
    }

    #[test]
    fn instance_name_rejects_oversized_label() {
        let long = "a".repeat(64);
        let err = InstanceName::new(long).unwrap_err();
        assert_eq!(
            err,
            IdError::TooLong {
                kind: "instance name",
                max: 63,
                len: 64
            }
        );
    }

    #[test]
    fn device_name_allows_empty_and_bounds_length() {
        assert_eq!(DeviceName::new("").unwrap().as_str(), "");
        assert!(DeviceName::new("x".repeat(32)).is_ok());
        assert!(DeviceName::new("x".repeat(33)).is_err());
    }

    #[test]
    fn deserialize_enforces_bounds() {
        let ok: InstanceName = serde_json::from_str("\"C0FFEE1234\"").unwrap();
        assert_eq!(&*ok, "C0FFEE1234");
        assert!(serde_json::from_str::<InstanceName>("\"\"").is_err());
    }
}
