//! Friend and ignore list payloads.

use crate::{Opcode, PacketReader, Result};

/// Status-result codes carried by `SMSG_FRIEND_STATUS`.
///
/// This is a closed set; the numeric values are the protocol contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FriendResult {
    /// Database failure on the server.
    DbError = 0,
    /// Friend list is full.
    ListFull = 1,
    /// Friend came online.
    Online = 2,
    /// Friend went offline.
    Offline = 3,
    /// No such player.
    NotFound = 4,
    /// Friend was removed.
    Removed = 5,
    /// Friend added while online.
    AddedOnline = 6,
    /// Friend added while offline.
    AddedOffline = 7,
    /// Already on the friend list.
    AlreadyThere = 8,
    /// Cannot befriend yourself.
    SelfFriend = 9,
    /// Cannot befriend the enemy faction.
    Enemy = 10,
    /// Ignore list is full.
    IgnoreFull = 11,
    /// Cannot ignore yourself.
    IgnoreSelf = 12,
    /// No such player to ignore.
    IgnoreNotFound = 13,
    /// Already on the ignore list.
    IgnoreAlreadyThere = 14,
    /// Ignore added.
    IgnoreAdded = 15,
    /// Ignore removed.
    IgnoreRemoved = 16,
}

impl FriendResult {
    /// Map a wire code to a result. `None` for codes outside the set.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::DbError,
            1 => Self::ListFull,
            2 => Self::Online,
            3 => Self::Offline,
            4 => Self::NotFound,
            5 => Self::Removed,
            6 => Self::AddedOnline,
            7 => Self::AddedOffline,
            8 => Self::AlreadyThere,
            9 => Self::SelfFriend,
            10 => Self::Enemy,
            11 => Self::IgnoreFull,
            12 => Self::IgnoreSelf,
            13 => Self::IgnoreNotFound,
            14 => Self::IgnoreAlreadyThere,
            15 => Self::IgnoreAdded,
            16 => Self::IgnoreRemoved,
            _ => return None,
        })
    }

    /// Whether this result carries an online-info block when enough bytes
    /// follow.
    #[must_use]
    pub const fn carries_online_info(self) -> bool {
        matches!(self, Self::AddedOnline | Self::Online)
    }
}

/// Presence details appended for online friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnlineInfo {
    /// Raw status byte (non-zero means online; bit 1 marks AFK).
    pub status: u8,
    /// Zone the friend is in.
    pub area_id: u32,
    /// Friend's level.
    pub level: u32,
    /// Friend's class id.
    pub class: u8,
}

/// One friend on the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriendEntry {
    /// Friend's character GUID.
    pub guid: u64,
    /// Raw status byte; zero when offline.
    pub status: u8,
    /// Zone the friend is in (zero when offline).
    pub area_id: u32,
    /// Friend's level (zero when offline).
    pub level: u32,
    /// Friend's class id (zero when offline).
    pub class: u8,
}

impl FriendEntry {
    /// Whether the friend is currently online.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.status != 0
    }
}

/// Full friend list snapshot from `SMSG_FRIEND_LIST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendList {
    /// All friends in server order.
    pub entries: Vec<FriendEntry>,
}

impl FriendList {
    /// Parse `count: u8` followed by the entries; online entries carry an
    /// extra `{area_id: u32, level: u32, class: u32}` block.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut r = PacketReader::new(Opcode::SmsgFriendList, body);
        let count = r.u8()? as usize;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let guid = r.u64()?;
            let status = r.u8()?;
            let entry = if status != 0 {
                FriendEntry {
                    guid,
                    status,
                    area_id: r.u32()?,
                    level: r.u32()?,
                    class: r.u32()? as u8,
                }
            } else {
                FriendEntry { guid, status, area_id: 0, level: 0, class: 0 }
            };
            entries.push(entry);
        }
        Ok(Self { entries })
    }
}

/// One status transition from `SMSG_FRIEND_STATUS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriendStatusUpdate {
    /// What happened.
    pub result: FriendResult,
    /// Whose status changed.
    pub guid: u64,
    /// Presence details; present for online transitions when the server
    /// included them.
    pub online: Option<OnlineInfo>,
}

impl FriendStatusUpdate {
    /// Minimum bytes of the online-info block: status byte plus three
    /// little-endian words.
    const ONLINE_INFO_LEN: usize = 13;

    /// Parse `result: u8, guid: u64` plus the optional online-info block.
    ///
    /// Codes outside the closed set are reported as
    /// [`crate::ProtocolError::Malformed`].
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut r = PacketReader::new(Opcode::SmsgFriendStatus, body);
        let code = r.u8()?;
        let result = FriendResult::from_u8(code).ok_or(crate::ProtocolError::Malformed {
            opcode: Opcode::SmsgFriendStatus,
            reason: "friend result code outside the closed set",
        })?;
        let guid = r.u64()?;

        let online = if result.carries_online_info() && r.remaining() >= Self::ONLINE_INFO_LEN {
            Some(OnlineInfo {
                status: r.u8()?,
                area_id: r.u32()?,
                level: r.u32()?,
                class: r.u32()? as u8,
            })
        } else {
            None
        };

        Ok(Self { result, guid, online })
    }
}

/// Ignore list snapshot from `SMSG_IGNORE_LIST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreList {
    /// Ignored character names in server order.
    pub names: Vec<String>,
}

impl IgnoreList {
    /// Parse `count: u32` followed by NUL-terminated names.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut r = PacketReader::new(Opcode::SmsgIgnoreList, body);
        let count = r.u32()? as usize;
        let mut names = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            names.push(r.cstring()?);
        }
        Ok(Self { names })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProtocolError;

    fn online_entry(guid: u64, area: u32, level: u32, class: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&guid.to_le_bytes());
        out.push(1);
        out.extend_from_slice(&area.to_le_bytes());
        out.extend_from_slice(&level.to_le_bytes());
        out.extend_from_slice(&class.to_le_bytes());
        out
    }

    #[test]
    fn friend_list_mixed_presence() {
        let mut body = vec![2u8];
        body.extend_from_slice(&0xABCDu64.to_le_bytes());
        body.push(0); // offline: no extra block
        body.extend_from_slice(&online_entry(0x1234, 12, 60, 3));

        let list = FriendList::parse(&body).unwrap();
        assert_eq!(list.entries.len(), 2);
        assert!(!list.entries[0].is_online());
        assert_eq!(list.entries[0].guid, 0xABCD);
        assert!(list.entries[1].is_online());
        assert_eq!(list.entries[1].area_id, 12);
        assert_eq!(list.entries[1].level, 60);
        assert_eq!(list.entries[1].class, 3);
    }

    #[test]
    fn friend_list_truncated_online_block() {
        let mut body = vec![1u8];
        body.extend_from_slice(&0xABCDu64.to_le_bytes());
        body.push(1); // online, but the info block is missing
        assert!(matches!(
            FriendList::parse(&body),
            Err(ProtocolError::Truncated { .. })
        ));
    }

    #[test]
    fn friend_status_added_online() {
        let mut body = vec![6u8]; // AddedOnline
        body.extend_from_slice(&0xABCDu64.to_le_bytes());
        body.push(1);
        body.extend_from_slice(&12u32.to_le_bytes());
        body.extend_from_slice(&60u32.to_le_bytes());
        body.extend_from_slice(&3u32.to_le_bytes());

        let update = FriendStatusUpdate::parse(&body).unwrap();
        assert_eq!(update.result, FriendResult::AddedOnline);
        assert_eq!(update.guid, 0xABCD);
        let online = update.online.unwrap();
        assert_eq!(online.status, 1);
        assert_eq!(online.area_id, 12);
        assert_eq!(online.level, 60);
        assert_eq!(online.class, 3);
    }

    #[test]
    fn friend_status_offline_has_no_info_block() {
        let mut body = vec![3u8]; // Offline
        body.extend_from_slice(&0xABCDu64.to_le_bytes());
        let update = FriendStatusUpdate::parse(&body).unwrap();
        assert_eq!(update.result, FriendResult::Offline);
        assert_eq!(update.online, None);
    }

    #[test]
    fn friend_status_online_without_trailing_bytes() {
        // Online result but the server sent no info block: tolerated.
        let mut body = vec![2u8];
        body.extend_from_slice(&0x42u64.to_le_bytes());
        let update = FriendStatusUpdate::parse(&body).unwrap();
        assert_eq!(update.result, FriendResult::Online);
        assert_eq!(update.online, None);
    }

    #[test]
    fn friend_status_rejects_unknown_code() {
        let mut body = vec![17u8];
        body.extend_from_slice(&0x42u64.to_le_bytes());
        assert!(matches!(
            FriendStatusUpdate::parse(&body),
            Err(ProtocolError::Malformed { .. })
        ));
    }

    #[test]
    fn closed_set_round_trip() {
        for code in 0u8..=16 {
            let result = FriendResult::from_u8(code).unwrap();
            assert_eq!(result as u8, code);
        }
        assert_eq!(FriendResult::from_u8(17), None);
        assert_eq!(FriendResult::from_u8(255), None);
    }

    #[test]
    fn ignore_list_parses_cstrings() {
        let mut body = Vec::new();
        body.extend_from_slice(&2u32.to_le_bytes());
        body.extend_from_slice(b"Gankalot\0");
        body.extend_from_slice(b"Spammer\0");
        let list = IgnoreList::parse(&body).unwrap();
        assert_eq!(list.names, vec!["Gankalot".to_owned(), "Spammer".to_owned()]);
    }

    #[test]
    fn ignore_list_missing_terminator() {
        let mut body = Vec::new();
        body.extend_from_slice(&1u32.to_le_bytes());
        body.extend_from_slice(b"Gankalot");
        assert!(matches!(
            IgnoreList::parse(&body),
            Err(ProtocolError::InvalidString { .. })
        ));
    }
}
