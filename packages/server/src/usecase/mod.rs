//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層（Event Dispatcher / HTTP ハンドラ）から呼び出され、Domain 層を操作します。

pub mod change_language;
pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod save_snapshot;
pub mod update_code;

pub use change_language::ChangeLanguageUseCase;
pub use error::{JoinRoomError, RoomMutationError};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use save_snapshot::SaveSnapshotUseCase;
pub use update_code::UpdateCodeUseCase;
