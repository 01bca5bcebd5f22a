//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RepositoryError;

/// join-room 処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinRoomError {
    /// 存在しないルームへの join（リクエスト元にのみ通知される）
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    /// ルームのロードに失敗した
    #[error(transparent)]
    Persistence(#[from] RepositoryError),
}

/// ルームを変更する各操作（code-change / language-change / snapshot / leave）のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomMutationError {
    /// 対象のルームがストアに存在しない
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    /// 永続化に失敗した（リトライはせず、ログに残すのみ）
    #[error(transparent)]
    Persistence(#[from] RepositoryError),
}
