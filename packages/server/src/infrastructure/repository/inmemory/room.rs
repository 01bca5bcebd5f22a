//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! ルーム ID をキーとする HashMap をインメモリ DB として使用します。
//!
//! ## 技術的負債
//!
//! 現在、ドメインモデル（`Room`）を直接ストレージとして使用しています。
//! これは InMemory 実装では許容される妥協ですが、将来ドキュメント DB を
//! 実装する際は、以下の変換層が必要になります：
//!
//! ```text
//! DB Document/JSON → RoomData (DTO) → Room (ドメインモデル)
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, Room, RoomId, RoomRepository};

/// インメモリ Room Repository 実装
///
/// ルーム ID をキーとする HashMap をインメモリ DB として使用する実装。
/// ドメイン層の RoomRepository trait を実装します（依存性の逆転）。
///
/// 個々の find / upsert は内部の Mutex で直列化されるが、呼び出し側の
/// read-modify-write サイクル全体を囲むロックは存在しない（last-write-wins）。
pub struct InMemoryRoomRepository {
    /// ルーム ID -> Room ドメインモデル
    rooms: Mutex<HashMap<String, Room>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// 保存されているルーム数を返す
    pub async fn count_rooms(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn find_by_room_id(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(room_id.as_str()).cloned())
    }

    async fn upsert(&self, room: Room) -> Result<Room, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms.insert(room.id.as_str().to_string(), room.clone());
        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoomFactory, Timestamp};

    #[tokio::test]
    async fn test_upsert_and_find_roundtrip() {
        // テスト項目: upsert したルームを ID で取得できる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room = RoomFactory::create(None, None, Timestamp::new(0)).unwrap();
        let room_id = room.id.clone();

        // when (操作):
        repo.upsert(room).await.unwrap();
        let found = repo.find_by_room_id(&room_id).await.unwrap();

        // then (期待する結果):
        assert!(found.is_some());
        assert_eq!(found.unwrap().id, room_id);
        assert_eq!(repo.count_rooms().await, 1);
    }

    #[tokio::test]
    async fn test_find_missing_room_returns_none() {
        // テスト項目: 存在しないルームの取得は None が返る
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let room_id = RoomId::new("nonexistent00".to_string()).unwrap();
        let found = repo.find_by_room_id(&room_id).await.unwrap();

        // then (期待する結果):
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_room() {
        // テスト項目: 同じ ID での upsert は既存ドキュメントを上書きする
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let mut room = RoomFactory::create(None, None, Timestamp::new(0)).unwrap();
        let room_id = room.id.clone();
        repo.upsert(room.clone()).await.unwrap();

        // when (操作): バッファを変更して再 upsert
        room.set_code("javascript", "updated".to_string());
        repo.upsert(room).await.unwrap();

        // then (期待する結果):
        let stored = repo.find_by_room_id(&room_id).await.unwrap().unwrap();
        assert_eq!(stored.code("javascript"), Some("updated"));
        assert_eq!(repo.count_rooms().await, 1);
    }
}
