//! UseCase: アクティブ言語の変更処理
//!
//! 各ピアは自分の表示言語を独立に追跡するため、この操作の結果は
//! リクエスト元だけに返す（ブロードキャストしない）。

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository};

use super::error::RoomMutationError;

/// 言語変更のユースケース
pub struct ChangeLanguageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl ChangeLanguageUseCase {
    /// 新しい ChangeLanguageUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// アクティブ言語を更新して永続化し、その言語の現在のバッファを返す
    ///
    /// バッファがまだ存在しない言語では空文字列を返す。
    ///
    /// # Arguments
    ///
    /// * `room_id` - 対象ルームの ID
    /// * `language` - 新しいアクティブ言語
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - 選択された言語の現在のバッファ
    pub async fn execute(
        &self,
        room_id: &RoomId,
        language: &str,
    ) -> Result<String, RoomMutationError> {
        let Some(mut room) = self.repository.find_by_room_id(room_id).await? else {
            return Err(RoomMutationError::RoomNotFound(
                room_id.as_str().to_string(),
            ));
        };

        room.set_active_language(language);
        let code = room.code(language).unwrap_or_default().to_string();
        self.repository.upsert(room).await?;

        Ok(code)
    }
}
