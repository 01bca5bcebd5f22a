//! UseCase: コード変更の永続化処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateCodeUseCase::execute() メソッド
//! - 言語キーごとのバッファ上書き（last-write-wins）と永続化
//!
//! ### なぜこのテストが必要か
//! - 到着順で最後に適用された書き込みが勝つことを保証（マージはしない）
//! - 列挙にない言語キーもそのまま受理・保存されることを確認
//! - 永続化失敗がエラーとして返ること（ブロードキャストを止めるかどうかは
//!   呼び出し側の判断）を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: バッファの上書き
//! - 異常系: ルームがストアに存在しない、永続化失敗
//! - エッジケース: 未知の言語キー

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository};

use super::error::RoomMutationError;

/// コード変更のユースケース
pub struct UpdateCodeUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl UpdateCodeUseCase {
    /// 新しい UpdateCodeUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 指定言語のバッファを無条件に上書きして永続化する
    ///
    /// read-modify-write をロックやトランザクションで囲まないため、同じ
    /// ルームへの並行書き込みは「ストレージが最後に観測した書き込み」が
    /// 勝つ。失われた更新は次のキーストロークで上書きされる前提。
    ///
    /// # Arguments
    ///
    /// * `room_id` - 対象ルームの ID
    /// * `language` - 言語キー（列挙にないキーもそのまま保存される）
    /// * `code` - 新しいバッファ内容
    pub async fn execute(
        &self,
        room_id: &RoomId,
        language: &str,
        code: String,
    ) -> Result<(), RoomMutationError> {
        let Some(mut room) = self.repository.find_by_room_id(room_id).await? else {
            return Err(RoomMutationError::RoomNotFound(
                room_id.as_str().to_string(),
            ));
        };

        room.set_code(language, code);
        self.repository.upsert(room).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        RoomFactory, Timestamp,
        error::RepositoryError,
        repository::MockRoomRepository,
    };
    use crate::infrastructure::repository::InMemoryRoomRepository;

    async fn create_test_repository_with_room() -> (Arc<InMemoryRoomRepository>, RoomId) {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room = RoomFactory::create(None, None, Timestamp::new(0)).unwrap();
        let room_id = room.id.clone();
        repository.upsert(room).await.unwrap();
        (repository, room_id)
    }

    #[tokio::test]
    async fn test_update_code_persists_buffer() {
        // テスト項目: バッファの上書きが永続化される
        // given (前提条件):
        let (repository, room_id) = create_test_repository_with_room().await;
        let usecase = UpdateCodeUseCase::new(repository.clone());

        // when (操作):
        let result = usecase
            .execute(&room_id, "javascript", "console.log(1);".to_string())
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        let stored = repository
            .find_by_room_id(&room_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.code("javascript"), Some("console.log(1);"));
    }

    #[tokio::test]
    async fn test_update_code_last_applied_wins() {
        // テスト項目: 到着順に適用した場合、最後の書き込みが残る
        // given (前提条件):
        let (repository, room_id) = create_test_repository_with_room().await;
        let usecase = UpdateCodeUseCase::new(repository.clone());

        // when (操作): 同じ言語へ順に書き込み、別言語へも書き込む
        usecase
            .execute(&room_id, "javascript", "a".to_string())
            .await
            .unwrap();
        usecase
            .execute(&room_id, "python", "x".to_string())
            .await
            .unwrap();
        usecase
            .execute(&room_id, "javascript", "b".to_string())
            .await
            .unwrap();

        // then (期待する結果): 言語ごとに最後の値が残る
        let stored = repository
            .find_by_room_id(&room_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.code("javascript"), Some("b"));
        assert_eq!(stored.code("python"), Some("x"));
    }

    #[tokio::test]
    async fn test_update_code_accepts_unknown_language_key() {
        // テスト項目: 列挙にない言語キーも保存される
        // given (前提条件):
        let (repository, room_id) = create_test_repository_with_room().await;
        let usecase = UpdateCodeUseCase::new(repository.clone());

        // when (操作):
        usecase
            .execute(&room_id, "cobol", "DISPLAY 'HI'.".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        let stored = repository
            .find_by_room_id(&room_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.code("cobol"), Some("DISPLAY 'HI'."));
    }

    #[tokio::test]
    async fn test_update_code_room_not_found() {
        // テスト項目: ルームがストアに無い場合は RoomNotFound が返る
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let usecase = UpdateCodeUseCase::new(repository);

        // when (操作):
        let room_id = RoomId::new("nonexistent00".to_string()).unwrap();
        let result = usecase.execute(&room_id, "javascript", "a".to_string()).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            RoomMutationError::RoomNotFound("nonexistent00".to_string())
        );
    }

    #[tokio::test]
    async fn test_update_code_persistence_failure() {
        // テスト項目: 永続化失敗はエラーとして呼び出し側に返る
        // given (前提条件): upsert が失敗する Repository
        let mut mock = MockRoomRepository::new();
        let room = RoomFactory::create(None, None, Timestamp::new(0)).unwrap();
        let room_id = room.id.clone();
        let stored = room.clone();
        mock.expect_find_by_room_id()
            .returning(move |_| Ok(Some(stored.clone())));
        mock.expect_upsert()
            .returning(|_| Err(RepositoryError::Storage("write failed".to_string())));
        let usecase = UpdateCodeUseCase::new(Arc::new(mock));

        // when (操作):
        let result = usecase.execute(&room_id, "javascript", "a".to_string()).await;

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            RoomMutationError::Persistence(_)
        ));
    }
}
