use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NamespacedListType {
    #[default]
    String,
    MacList,
    IpList,
}

impl fmt::Display for NamespacedListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespacedListType::String => write!(f, "STRING"),
            NamespacedListType::MacList => write!(f, "MAC_LIST"),
            NamespacedListType::IpList => write!(f, "IP_LIST"),
        }
    }
}

/// A named list of MAC addresses, IP addresses or plain strings, referenced
/// from `IN_LIST` conditions and feature whitelists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespacedList {
    pub id: String,
    #[serde(default)]
    pub type_name: NamespacedListType,
    #[serde(default)]
    pub data: Vec<String>,
}

impl NamespacedList {
    #[must_use]
    pub fn new(id: &str, type_name: NamespacedListType, data: Vec<&str>) -> Self {
        Self {
            id: id.to_owned(),
            type_name,
            data: data.into_iter().map(str::to_owned).collect(),
        }
    }
}
