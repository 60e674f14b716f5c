//! Friend and ignore list messages.
//!
//! Additions are by character name (NUL-terminated), friend removal is by
//! GUID, ignore removal is by name. Name validation (non-empty) happens at
//! the component layer; the builders emit whatever they are given.

use bytes::{BufMut, BytesMut};

use crate::Opcode;

use super::CmsgBuild;

/// Request the friend list (`CMSG_FRIEND_LIST`, empty body).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FriendListRequest;

impl CmsgBuild for FriendListRequest {
    const OPCODE: Opcode = Opcode::CmsgFriendList;

    fn encode(&self, _buf: &mut BytesMut) {}
}

/// Add a friend by name (`CMSG_ADD_FRIEND`, cstring).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddFriend {
    /// Character name to add.
    pub name: String,
}

impl CmsgBuild for AddFriend {
    const OPCODE: Opcode = Opcode::CmsgAddFriend;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(self.name.as_bytes());
        buf.put_u8(0);
    }
}

/// Remove a friend by GUID (`CMSG_DEL_FRIEND`, 8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelFriend {
    /// GUID of the friend to remove.
    pub guid: u64,
}

impl CmsgBuild for DelFriend {
    const OPCODE: Opcode = Opcode::CmsgDelFriend;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.guid);
    }
}

/// Add an ignore by name (`CMSG_ADD_IGNORE`, cstring).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddIgnore {
    /// Character name to ignore.
    pub name: String,
}

impl CmsgBuild for AddIgnore {
    const OPCODE: Opcode = Opcode::CmsgAddIgnore;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(self.name.as_bytes());
        buf.put_u8(0);
    }
}

/// Remove an ignore by name (`CMSG_DEL_IGNORE`, cstring).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelIgnore {
    /// Character name to stop ignoring.
    pub name: String,
}

impl CmsgBuild for DelIgnore {
    const OPCODE: Opcode = Opcode::CmsgDelIgnore;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(self.name.as_bytes());
        buf.put_u8(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_friend_is_nul_terminated() {
        let body = AddFriend { name: "Thrall".to_owned() }.body();
        assert_eq!(&body[..], b"Thrall\0");
    }

    #[test]
    fn del_friend_is_a_guid_not_a_name() {
        let body = DelFriend { guid: 0xABCD }.body();
        assert_eq!(&body[..], &0xABCDu64.to_le_bytes());
    }

    #[test]
    fn ignore_builders_mirror_friend_shape() {
        assert_eq!(&AddIgnore { name: "Spammer".to_owned() }.body()[..], b"Spammer\0");
        assert_eq!(&DelIgnore { name: "Spammer".to_owned() }.body()[..], b"Spammer\0");
    }

    #[test]
    fn list_request_is_empty() {
        assert!(FriendListRequest.body().is_empty());
    }
}
