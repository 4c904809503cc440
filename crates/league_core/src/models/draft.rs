use serde::{Deserialize, Serialize};

/// A tradeable future pick. Consumed when the draft slot it fills is used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftPick {
    pub dpid: u32,
    pub season: u16,
    pub round: u8,
    /// Current owner of the pick.
    pub tid: u32,
    pub original_tid: u32,
}

/// One slot of the draft in progress, keyed by overall pick number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftSlot {
    pub slot: u32,
    pub round: u8,
    pub pick: u8,
    pub tid: u32,
    pub original_tid: u32,
    #[serde(default)]
    pub dpid: Option<u32>,
}
