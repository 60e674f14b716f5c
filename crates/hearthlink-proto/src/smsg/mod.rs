//! Typed parsers for the server messages the client handles.
//!
//! Every parser is total over arbitrary input: it validates length before
//! reading (via [`crate::PacketReader`]) and returns a typed record or a
//! [`crate::ProtocolError`], never panicking and never partially
//! constructing a record. Records are immutable snapshots; the runtime
//! layer replaces whole records rather than mutating them.

pub mod character;
pub mod inventory;
pub mod social;
pub mod taxi;
pub mod trainer;
pub mod vendor;

pub use character::{
    ActionButton, ActionButtons, BindPoint, FactionStanding, InitializeFactions, Proficiency,
    TutorialFlags,
};
pub use inventory::{InventoryFailure, InventoryResult};
pub use social::{FriendEntry, FriendList, FriendResult, FriendStatusUpdate, IgnoreList, OnlineInfo};
pub use taxi::{TaxiActivateResult, TaxiNodeMap, TaxiNodeStatus};
pub use trainer::{TrainerBuyFailed, TrainerBuySucceeded, TrainerList, TrainerSpell};
pub use vendor::{VendorInventory, VendorItem};
