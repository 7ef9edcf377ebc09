//! Item type allow-list

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Kind of a received item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// Electronics
    #[serde(alias = "электроника")]
    Electronics,
    /// Clothing
    #[serde(alias = "одежда")]
    Clothing,
    /// Footwear
    #[serde(alias = "обувь")]
    Footwear,
}

impl ItemType {
    /// Every supported item type
    pub const ALL: [ItemType; 3] = [ItemType::Electronics, ItemType::Clothing, ItemType::Footwear];

    /// Canonical (wire) name
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Electronics => "electronics",
            ItemType::Clothing => "clothing",
            ItemType::Footwear => "footwear",
        }
    }

    /// Russian name, accepted on input
    pub fn native_name(&self) -> &'static str {
        match self {
            ItemType::Electronics => "электроника",
            ItemType::Clothing => "одежда",
            ItemType::Footwear => "обувь",
        }
    }
}

impl FromStr for ItemType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        ItemType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name || kind.native_name() == name)
            .ok_or_else(|| DomainError::InvalidItemType(name.to_string()))
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_types() {
        assert_eq!(
            "electronics".parse::<ItemType>().unwrap(),
            ItemType::Electronics
        );
        assert_eq!("обувь".parse::<ItemType>().unwrap(), ItemType::Footwear);
        assert_eq!("clothing".parse::<ItemType>().unwrap(), ItemType::Clothing);
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert_eq!(
            "furniture".parse::<ItemType>().unwrap_err(),
            DomainError::InvalidItemType("furniture".to_string())
        );
        assert!("".parse::<ItemType>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ItemType::Footwear).unwrap(),
            "\"footwear\""
        );
        let native: ItemType = serde_json::from_str("\"одежда\"").unwrap();
        assert_eq!(native, ItemType::Clothing);
    }
}
