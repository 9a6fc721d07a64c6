//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod broadcast;
pub mod error;
pub mod join_session;
pub mod leave_session;

pub use broadcast::BroadcastUseCase;
pub use error::HandshakeError;
pub use join_session::JoinSessionUseCase;
pub use leave_session::LeaveSessionUseCase;
