//! Authenticated request gateway and refresh coordination.

mod coordinator;
mod dispatch;
mod session;


pub use coordinator::{RefreshCoordinator, RefreshOutcome, Role, Ticket};
pub use dispatch::{Gateway, GatewayBuilder, GatewayConfig};
pub use session::{LoginRedirect, SessionExpiry, SessionListener};
