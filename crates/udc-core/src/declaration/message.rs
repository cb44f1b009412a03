use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error code carried by a commissioner declaration.
///
/// Discriminants are the protocol's numeric values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CdError {
    #[default]
    NoError,
    CommissionerPasscodeDisabled,
    UnexpectedCommissionerPasscodeReady,
}

impl CdError {
    pub fn code(self) -> u8 {
        match self {
            CdError::NoError => 0,
            CdError::CommissionerPasscodeDisabled => 17,
            CdError::UnexpectedCommissionerPasscodeReady => 18,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CdError::NoError),
            17 => Some(CdError::CommissionerPasscodeDisabled),
            18 => Some(CdError::UnexpectedCommissionerPasscodeReady),
            _ => None,
        }
    }
}

impl fmt::Display for CdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CdError::NoError => "no_error",
            CdError::CommissionerPasscodeDisabled => "commissioner_passcode_disabled",
            CdError::UnexpectedCommissionerPasscodeReady => "unexpected_commissioner_passcode_ready",
        };
        write!(f, "{label}({})", self.code())
    }
}

#[derive(Debug, Error)]
#[error("invalid commissioner declaration payload: {0}")]
pub struct DeclarationCodecError(#[from] serde_json::Error);

/// Reply describing the outcome of a negotiation step.
///
/// 构造后不可变；每次发送都重新构造一条消息。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionerDeclaration {
    error_code: CdError,
    needs_passcode: bool,
    no_apps_found: bool,
    passcode_dialog_displayed: bool,
    commissioner_passcode: bool,
    qr_code_displayed: bool,
}

impl CommissionerDeclaration {
    /// Peer said a commissioner passcode is ready but none is cached.
    pub fn unexpected_commissioner_passcode_ready() -> Self {
        Self {
            error_code: CdError::UnexpectedCommissionerPasscodeReady,
            ..Self::default()
        }
    }

    /// Commissioner-generated passcodes are disabled; the peer must supply one.
    pub fn commissioner_passcode_disabled() -> Self {
        Self {
            error_code: CdError::CommissionerPasscodeDisabled,
            needs_passcode: true,
            ..Self::default()
        }
    }

    /// Target apps were listed but none is installed.
    pub fn no_apps_found() -> Self {
        Self {
            no_apps_found: true,
            ..Self::default()
        }
    }

    pub fn needs_passcode() -> Self {
        Self {
            needs_passcode: true,
            ..Self::default()
        }
    }

    pub fn passcode_dialog_displayed() -> Self {
        Self {
            needs_passcode: true,
            passcode_dialog_displayed: true,
            ..Self::default()
        }
    }

    /// A commissioner-generated passcode is now shown to the operator.
    pub fn commissioner_passcode_in_use(qr_code_displayed: bool) -> Self {
        Self {
            commissioner_passcode: true,
            qr_code_displayed,
            ..Self::default()
        }
    }

    pub fn error_code(&self) -> CdError {
        self.error_code
    }

    pub fn needs_passcode_flag(&self) -> bool {
        self.needs_passcode
    }

    pub fn no_apps_found_flag(&self) -> bool {
        self.no_apps_found
    }

    pub fn passcode_dialog_displayed_flag(&self) -> bool {
        self.passcode_dialog_displayed
    }

    pub fn commissioner_passcode_flag(&self) -> bool {
        self.commissioner_passcode
    }

    pub fn qr_code_displayed_flag(&self) -> bool {
        self.qr_code_displayed
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DeclarationCodecError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeclarationCodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl fmt::Display for CommissionerDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if self.error_code != CdError::NoError {
            parts.push(format!("error={}", self.error_code));
        }
        let flags = [
            (self.needs_passcode, "needs_passcode"),
            (self.no_apps_found, "no_apps_found"),
            (self.passcode_dialog_displayed, "passcode_dialog_displayed"),
            (self.commissioner_passcode, "commissioner_passcode"),
            (self.qr_code_displayed, "qr_code_displayed"),
        ];
        parts.extend(
            flags
                .iter()
                .filter(|(set, _)| *set)
                .map(|(_, name)| (*name).to_string()),
        );
        if parts.is_empty() {
            write!(f, "CommissionerDeclaration{{}}")
        } else {
            write!(f, "CommissionerDeclaration{{{}}}", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_use_protocol_values() {
        assert_eq!(CdError::NoError.code(), 0);
        assert_eq!(CdError::CommissionerPasscodeDisabled.code(), 17);
        assert_eq!(CdError::UnexpectedCommissionerPasscodeReady.code(), 18);
        assert_eq!(
            CdError::from_code(18),
            Some(CdError::UnexpectedCommissionerPasscodeReady)
        );
        assert_eq!(CdError::from_code(5), None);
    }

    #[test]
    fn passcode_disabled_also_requests_a_passcode() {
        let cd = CommissionerDeclaration::commissioner_passcode_disabled();
        assert_eq!(cd.error_code(), CdError::CommissionerPasscodeDisabled);
        assert!(cd.needs_passcode_flag());
        assert!(!cd.no_apps_found_flag());
    }

    #[test]
    fn passcode_in_use_carries_qr_flag_only_when_asked() {
        let without_qr = CommissionerDeclaration::commissioner_passcode_in_use(false);
        assert!(without_qr.commissioner_passcode_flag());
        assert!(!without_qr.qr_code_displayed_flag());

        let with_qr = CommissionerDeclaration::commissioner_passcode_in_use(true);
        assert!(with_qr.qr_code_displayed_flag());
        assert_eq!(with_qr.error_code(), CdError::NoError);
    }

    #[test]
    fn display_lists_only_set_fields() {
        assert_eq!(
            CommissionerDeclaration::passcode_dialog_displayed().to_string(),
            "CommissionerDeclaration{needs_passcode, passcode_dialog_displayed}"
        );
        assert_eq!(
            CommissionerDeclaration::unexpected_commissioner_passcode_ready().to_string(),
            "CommissionerDeclaration{error=unexpected_commissioner_passcode_ready(18)}"
        );
        assert_eq!(
            CommissionerDeclaration::default().to_string(),
            "CommissionerDeclaration{}"
        );
    }

    #[test]
    fn missing_fields_decode_to_defaults() {
        let cd = CommissionerDeclaration::from_bytes(br#"{"no_apps_found":true}"#).unwrap();
        assert_eq!(cd, CommissionerDeclaration::no_apps_found());
    }

    #[test]
    fn garbage_payload_is_rejected() {
        assert!(CommissionerDeclaration::from_bytes(b"not json").is_err());
    }
}
