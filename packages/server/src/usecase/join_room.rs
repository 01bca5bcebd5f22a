//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルーム参加処理（ルームのロード、roster への冪等な追加、永続化）
//!
//! ### なぜこのテストが必要か
//! - 存在しないルームへの join がエラーになることを保証
//! - 再接続（同じ接続 ID での再 join）で roster が重複しないことを保証
//! - roster の永続化失敗がベストエフォートで処理される（join 自体は成功する）ことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: 既存ルームへの参加
//! - 異常系: 存在しないルームへの参加試行
//! - エッジケース: 同じ接続 ID での再 join、永続化失敗

use std::sync::Arc;

use crate::domain::{Participant, Room, RoomId, RoomRepository};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム参加を実行
    ///
    /// ルームをロードし、roster に参加者を冪等に追加して永続化する。
    /// roster の永続化失敗は warn ログに残すのみで join 自体は成功扱い
    /// （永続 roster はライブセッションのベストエフォートなミラー）。
    ///
    /// # Arguments
    ///
    /// * `room_id` - 参加先ルームの ID
    /// * `participant` - roster に追加する参加者
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 参加後のルーム（スナップショット送信に使う）
    /// * `Err(JoinRoomError)` - ルームが存在しない、またはロード失敗
    pub async fn execute(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<Room, JoinRoomError> {
        let Some(mut room) = self.repository.find_by_room_id(room_id).await? else {
            return Err(JoinRoomError::RoomNotFound(room_id.as_str().to_string()));
        };

        // 同じ接続 ID が既に roster に居る場合（再接続）は何もしない
        let added = room.upsert_participant(participant);
        if added {
            if let Err(e) = self.repository.upsert(room.clone()).await {
                tracing::warn!(
                    "Failed to persist roster for room '{}' on join: {}",
                    room_id,
                    e
                );
            }
        }

        Ok(room)
    }
}
