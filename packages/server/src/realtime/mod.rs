//! Real-time membership and broadcast engine.

pub mod dispatcher;
pub mod registry;
pub mod session;

pub use dispatcher::{BroadcastDispatcher, Delivery, Outbound, OutboundEvent};
pub use registry::{JoinOutcome, LeaveOutcome, MemberSnapshot, RoomMember, RoomRegistry};
pub use session::{SessionHandle, SessionManager};
