//! Commissioner declaration messages sent back to a commissionee.

mod message;

pub use message::{CdError, CommissionerDeclaration, DeclarationCodecError};
