pub mod edge;
pub mod request_id;

pub use edge::{EdgeGate, EdgeRoute};
pub use request_id::{RequestId, RequestIdMiddleware};
