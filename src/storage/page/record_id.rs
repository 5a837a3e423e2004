use crate::common::constants::INVALID_PAGE_ID;
use crate::common::{Error, Result};
use crate::storage::disk::PageId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem::size_of;

pub type SlotId = u16;

/// Identifies a row slot as `(page_id, slot_id)`.
#[derive(Clone, Copy, Debug, Hash, Serialize, Deserialize)]
pub struct RecordId {
    page_id: PageId,
    slot_id: SlotId,
}

/// Sentinel for "no record"; also the RID of records not yet stored.
pub const INVALID_RID: RecordId = RecordId {
    page_id: INVALID_PAGE_ID,
    slot_id: 0,
};

impl RecordId {
    pub fn new(page_id: PageId, slot_id: SlotId) -> RecordId {
        RecordId { page_id, slot_id }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn slot_id(&self) -> SlotId {
        self.slot_id
    }

    pub fn is_invalid(&self) -> bool {
        self.page_id == INVALID_PAGE_ID
    }

    /// Deserialize from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < size_of::<PageId>() + size_of::<SlotId>() {
            return Err(Error::InvalidData("Byte slice is too short".to_string()));
        }

        let page_id_bytes = &bytes[..size_of::<PageId>()];
        let page_id: PageId = bincode::deserialize(page_id_bytes)
            .map_err(|e| Error::InvalidData(format!("Failed to deserialize PageId: {}", e)))?;

        let slot_id_bytes = &bytes[size_of::<PageId>()..size_of::<PageId>() + size_of::<SlotId>()];
        let slot_id = SlotId::from_le_bytes(
            slot_id_bytes
                .try_into()
                .map_err(|_| Error::InvalidData("Failed to convert bytes to u16".to_string()))?,
        );

        Ok(RecordId { page_id, slot_id })
    }

    /// Serializes the RecordId to a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let page_id_bytes = bincode::serialize(&self.page_id)
            .map_err(|e| Error::InvalidData(format!("Failed to serialize PageId: {}", e)))?;
        let slot_id_bytes = self.slot_id.to_le_bytes().to_vec();

        let mut bytes = Vec::with_capacity(page_id_bytes.len() + slot_id_bytes.len());
        bytes.extend(page_id_bytes);
        bytes.extend(slot_id_bytes);
        Ok(bytes)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.page_id, self.slot_id)
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.page_id == other.page_id && self.slot_id == other.slot_id
    }
}

impl Eq for RecordId {}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.page_id, self.slot_id).cmp(&(other.page_id, other.slot_id))
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod record_id_tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let rid = RecordId::new(1, 2);
        assert_eq!(1, rid.page_id());
        assert_eq!(2, rid.slot_id());
        assert!(!rid.is_invalid());
        assert!(INVALID_RID.is_invalid());
    }

    #[test]
    fn test_to_string() {
        assert_eq!("1:2", RecordId::new(1, 2).to_string());
    }

    #[test]
    fn test_equals() {
        let rid1 = RecordId::new(1, 1);
        let rid1_copy = RecordId::new(1, 1);
        let rid2 = RecordId::new(2, 2);

        assert_eq!(rid1, rid1_copy);
        assert_ne!(rid1, rid2);
    }

    #[test]
    fn test_comparison() {
        assert!(RecordId::new(1, 1) < RecordId::new(1, 2));
        assert!(RecordId::new(1, 2) < RecordId::new(2, 0));
        assert!(RecordId::new(2, 0) < INVALID_RID);
    }

    #[test]
    fn test_byte_round_trip() {
        let rid = RecordId::new(7, 3);
        let bytes = rid.to_bytes().unwrap();
        assert_eq!(rid, RecordId::from_bytes(&bytes).unwrap());
    }
}
