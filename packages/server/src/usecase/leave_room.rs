//! UseCase: ルーム退出処理
//!
//! 明示的な leave-room とトランスポート切断の両方から呼ばれ、永続 roster
//! から該当の接続を取り除く。ピアへの user-left 通知を行うかどうかは
//! 呼び出し側（Event Dispatcher）が経路ごとに決める。

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomId, RoomRepository};

use super::error::RoomMutationError;

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 永続 roster から接続を削除して保存する
    ///
    /// ルームがストアに存在しない場合は何もせず成功扱い
    /// （roster はベストエフォートなミラー）。
    ///
    /// # Arguments
    ///
    /// * `room_id` - 退出するルームの ID
    /// * `connection_id` - 退出する接続の ID
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<(), RoomMutationError> {
        let Some(mut room) = self.repository.find_by_room_id(room_id).await? else {
            return Ok(());
        };

        room.remove_participant(connection_id);
        self.repository.upsert(room).await?;

        Ok(())
    }
}
