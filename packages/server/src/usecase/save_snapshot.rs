//! UseCase: スナップショット保存処理
//!
//! クライアントが定期送信するバッファを履歴として保存する。履歴は
//! 直近 10 件に切り詰められ、ピアへのブロードキャストは行わない。

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository, Snapshot, Timestamp};

use super::error::RoomMutationError;

/// スナップショット保存のユースケース
pub struct SaveSnapshotUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl SaveSnapshotUseCase {
    /// 新しい SaveSnapshotUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// スナップショットを履歴に追加して永続化する
    ///
    /// # Arguments
    ///
    /// * `room_id` - 対象ルームの ID
    /// * `code` - 保存するバッファ内容
    /// * `taken_at` - 保存時刻
    pub async fn execute(
        &self,
        room_id: &RoomId,
        code: String,
        taken_at: Timestamp,
    ) -> Result<(), RoomMutationError> {
        let Some(mut room) = self.repository.find_by_room_id(room_id).await? else {
            return Err(RoomMutationError::RoomNotFound(
                room_id.as_str().to_string(),
            ));
        };

        room.push_snapshot(Snapshot::new(code, taken_at));
        self.repository.upsert(room).await?;

        Ok(())
    }
}
