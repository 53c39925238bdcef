//! RPC server core (spec §4.11): routers, dispatch, and the HTTP/SSE
//! transport layered on top of the rest of the workspace's crates.

pub mod dispatch;
pub mod dto;
pub mod error;
pub mod http;
pub mod params;
pub mod router;
pub mod routers;
pub mod security;
pub mod state;
pub mod util;

pub use dispatch::RpcDispatcher;
pub use error::RpcError;
pub use router::RpcRouter;
pub use security::SecurityContext;
pub use security::SecurityLevel;
pub use state::AppState;
