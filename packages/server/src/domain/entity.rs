//! Core domain models for the collaboration server.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::value_object::{ConnectionId, RoomId, Timestamp, Username};

/// Maximum number of snapshots retained per room (oldest evicted first)
pub const SNAPSHOT_CAPACITY: usize = 10;

/// Default room display name
pub const DEFAULT_ROOM_NAME: &str = "Untitled Project";

/// Default active language for a fresh room
pub const DEFAULT_LANGUAGE: &str = "javascript";

/// Default buffer content seeded for a fresh room
pub const DEFAULT_CODE: &str = "// Start coding here";

/// Languages offered by the editor UI.
///
/// The buffer map itself is open-ended: unknown keys sent by clients are
/// accepted and stored as-is. This list only seeds defaults at creation.
pub const SUPPORTED_LANGUAGES: [&str; 6] =
    ["javascript", "typescript", "python", "java", "c", "cpp"];

/// Represents a collaborative code room with per-language buffers,
/// a participant roster and a bounded snapshot history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Display name
    pub name: String,
    /// Language key -> current buffer content
    pub codes: HashMap<String, String>,
    /// Last-selected language (advisory only)
    pub active_language: String,
    /// Last-known roster, mirrored from live sessions on join/leave
    pub participants: Vec<Participant>,
    /// Bounded snapshot history (capacity [`SNAPSHOT_CAPACITY`])
    pub snapshots: Vec<Snapshot>,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
}

impl Room {
    /// Create a new room with default name, language and seeded buffer
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        let mut codes = HashMap::new();
        codes.insert(DEFAULT_LANGUAGE.to_string(), DEFAULT_CODE.to_string());
        Self {
            id,
            name: DEFAULT_ROOM_NAME.to_string(),
            codes,
            active_language: DEFAULT_LANGUAGE.to_string(),
            participants: Vec::new(),
            snapshots: Vec::new(),
            created_at,
        }
    }

    /// Add a participant unless one with the same connection id already
    /// exists (a reconnect re-sends join).
    ///
    /// Returns `true` if the roster changed.
    pub fn upsert_participant(&mut self, participant: Participant) -> bool {
        if self
            .participants
            .iter()
            .any(|p| p.connection_id == participant.connection_id)
        {
            return false;
        }
        self.participants.push(participant);
        true
    }

    /// Remove a participant from the roster by connection id
    pub fn remove_participant(&mut self, connection_id: &ConnectionId) {
        self.participants
            .retain(|p| &p.connection_id != connection_id);
    }

    /// Get a participant by connection id
    pub fn get_participant(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| &p.connection_id == connection_id)
    }

    /// Overwrite the buffer for a language key (last-write-wins).
    ///
    /// Unknown keys are stored as-is; the buffer map is open-ended.
    pub fn set_code(&mut self, language: impl Into<String>, code: String) {
        self.codes.insert(language.into(), code);
    }

    /// Get the current buffer for a language key
    pub fn code(&self, language: &str) -> Option<&str> {
        self.codes.get(language).map(String::as_str)
    }

    /// Set the advisory active language
    pub fn set_active_language(&mut self, language: impl Into<String>) {
        self.active_language = language.into();
    }

    /// Append a snapshot, evicting the oldest beyond [`SNAPSHOT_CAPACITY`]
    pub fn push_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
        if self.snapshots.len() > SNAPSHOT_CAPACITY {
            let excess = self.snapshots.len() - SNAPSHOT_CAPACITY;
            self.snapshots.drain(..excess);
        }
    }
}

/// Represents one roster entry of a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Transport connection id of the participant
    pub connection_id: ConnectionId,
    /// Display name
    pub username: Username,
    /// Avatar color assigned at join (hex string)
    pub avatar_color: String,
}

impl Participant {
    /// Create a new participant
    pub fn new(connection_id: ConnectionId, username: Username, avatar_color: String) -> Self {
        Self {
            connection_id,
            username,
            avatar_color,
        }
    }
}

/// A durable copy of a submitted buffer, kept as bounded history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Buffer content at snapshot time
    pub code: String,
    /// Timestamp when the snapshot was taken
    pub taken_at: Timestamp,
}

impl Snapshot {
    /// Create a new snapshot
    pub fn new(code: String, taken_at: Timestamp) -> Self {
        Self { code, taken_at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factory::RoomIdFactory;

    fn participant(connection_id: &str, username: &str) -> Participant {
        Participant::new(
            ConnectionId::new(connection_id.to_string()).unwrap(),
            Username::new(username.to_string()).unwrap(),
            "#FF6B6B".to_string(),
        )
    }

    #[test]
    fn test_room_new() {
        // テスト項目: 新しい Room がデフォルトのバッファ付きで作成される
        // given (前提条件):
        let room_id = RoomIdFactory::generate().unwrap();
        let created_at = Timestamp::new(1000);

        // when (操作):
        let room = Room::new(room_id.clone(), created_at);

        // then (期待する結果):
        assert_eq!(room.id, room_id);
        assert_eq!(room.name, DEFAULT_ROOM_NAME);
        assert_eq!(room.active_language, DEFAULT_LANGUAGE);
        assert_eq!(room.code(DEFAULT_LANGUAGE), Some(DEFAULT_CODE));
        assert_eq!(room.participants.len(), 0);
        assert_eq!(room.snapshots.len(), 0);
        assert_eq!(room.created_at, created_at);
    }

    #[test]
    fn test_room_upsert_participant() {
        // テスト項目: 参加者を追加できる
        // given (前提条件):
        let mut room = Room::new(RoomIdFactory::generate().unwrap(), Timestamp::new(0));

        // when (操作):
        let added = room.upsert_participant(participant("conn-1", "alice"));

        // then (期待する結果):
        assert!(added);
        assert_eq!(room.participants.len(), 1);
        assert_eq!(room.participants[0].username.as_str(), "alice");
    }

    #[test]
    fn test_room_upsert_participant_idempotent() {
        // テスト項目: 同じ接続 ID での再 join では roster が重複しない
        // given (前提条件):
        let mut room = Room::new(RoomIdFactory::generate().unwrap(), Timestamp::new(0));
        room.upsert_participant(participant("conn-1", "alice"));

        // when (操作): 同じ接続 ID で再度追加
        let added = room.upsert_participant(participant("conn-1", "alice"));

        // then (期待する結果): roster は 1 エントリのまま
        assert!(!added);
        assert_eq!(room.participants.len(), 1);
    }

    #[test]
    fn test_room_remove_participant() {
        // テスト項目: 参加者を削除できる
        // given (前提条件):
        let mut room = Room::new(RoomIdFactory::generate().unwrap(), Timestamp::new(0));
        room.upsert_participant(participant("conn-1", "alice"));
        room.upsert_participant(participant("conn-2", "bob"));

        // when (操作):
        let conn1 = ConnectionId::new("conn-1".to_string()).unwrap();
        room.remove_participant(&conn1);

        // then (期待する結果):
        assert_eq!(room.participants.len(), 1);
        assert_eq!(room.participants[0].username.as_str(), "bob");
        assert!(room.get_participant(&conn1).is_none());
    }

    #[test]
    fn test_room_set_code_last_write_wins() {
        // テスト項目: 同じ言語への書き込みは最後の値で上書きされる
        // given (前提条件):
        let mut room = Room::new(RoomIdFactory::generate().unwrap(), Timestamp::new(0));

        // when (操作):
        room.set_code("javascript", "a".to_string());
        room.set_code("javascript", "b".to_string());

        // then (期待する結果):
        assert_eq!(room.code("javascript"), Some("b"));
    }

    #[test]
    fn test_room_set_code_open_ended_keys() {
        // テスト項目: 列挙にない言語キーも受け付けて保存される
        // given (前提条件):
        let mut room = Room::new(RoomIdFactory::generate().unwrap(), Timestamp::new(0));

        // when (操作):
        room.set_code("brainfuck", "+++".to_string());

        // then (期待する結果):
        assert_eq!(room.code("brainfuck"), Some("+++"));
        assert!(room.code("python").is_none());
    }

    #[test]
    fn test_room_push_snapshot_trims_to_capacity() {
        // テスト項目: スナップショットは 10 件を超えると最古から破棄される
        // given (前提条件):
        let mut room = Room::new(RoomIdFactory::generate().unwrap(), Timestamp::new(0));

        // when (操作): 11 件追加
        for i in 0..11 {
            room.push_snapshot(Snapshot::new(format!("code-{i}"), Timestamp::new(i)));
        }

        // then (期待する結果): 最新の 10 件が到着順で残る
        assert_eq!(room.snapshots.len(), SNAPSHOT_CAPACITY);
        assert_eq!(room.snapshots[0].code, "code-1");
        assert_eq!(room.snapshots[9].code, "code-10");
    }

    #[test]
    fn test_room_set_active_language() {
        // テスト項目: アクティブな言語を変更できる
        // given (前提条件):
        let mut room = Room::new(RoomIdFactory::generate().unwrap(), Timestamp::new(0));

        // when (操作):
        room.set_active_language("python");

        // then (期待する結果):
        assert_eq!(room.active_language, "python");
    }
}
