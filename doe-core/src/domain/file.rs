//! Uploaded file types

use serde::{Deserialize, Serialize};

/// Role of an uploaded file, sent as the `typeId` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    Input,
    Template,
    Parameters,
    Script,
}

impl FileType {
    /// Numeric identifier the platform expects
    pub fn type_id(self) -> u8 {
        match self {
            FileType::Input => 1,
            FileType::Template => 2,
            FileType::Parameters => 3,
            FileType::Script => 4,
        }
    }
}

/// File stored on the platform, as returned by `files/contents/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudFile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub decompressed_size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ids() {
        assert_eq!(FileType::Input.type_id(), 1);
        assert_eq!(FileType::Template.type_id(), 2);
        assert_eq!(FileType::Parameters.type_id(), 3);
        assert_eq!(FileType::Script.type_id(), 4);
    }
}
