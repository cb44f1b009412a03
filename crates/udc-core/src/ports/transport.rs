use async_trait::async_trait;
use std::net::SocketAddr;

use crate::declaration::CommissionerDeclaration;

/// Sends a declaration to a commissionee over UDP.
#[async_trait]
pub trait DeclarationTransportPort: Send + Sync {
    async fn send_declaration(
        &self,
        declaration: CommissionerDeclaration,
        destination: SocketAddr,
    ) -> anyhow::Result<()>;
}
