//! Records returned by the storage service.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Account storage snapshot.
///
/// Values are reported by the service as-is; the client does not check that
/// `space_left <= capacity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User identifier
    pub uid: String,
    /// Remaining storage
    pub space_left: f64,
    /// Total storage
    pub capacity: f64,
}

impl UserInfo {
    /// Storage in use (never negative).
    pub fn used(&self) -> f64 {
        (self.capacity - self.space_left).max(0.0)
    }

    /// Get usage percentage.
    pub fn usage_percent(&self) -> f64 {
        if self.capacity <= 0.0 {
            0.0
        } else {
            (self.used() / self.capacity) * 100.0
        }
    }
}

/// One stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Content identifier assigned by the service
    pub bag_id: String,
    /// Original file name
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    /// Description given at upload time
    #[serde(default)]
    pub description: Option<String>,
    /// Upload time (Unix epoch seconds)
    pub uploaded_at: f64,
}

impl FileRecord {
    /// Upload time as a `SystemTime`, if the timestamp is representable.
    pub fn uploaded_at_time(&self) -> Option<SystemTime> {
        if !self.uploaded_at.is_finite() || self.uploaded_at < 0.0 {
            return None;
        }
        let offset = Duration::try_from_secs_f64(self.uploaded_at).ok()?;
        UNIX_EPOCH.checked_add(offset)
    }
}

/// Body of a successful upload response.
#[derive(Debug, Deserialize)]
pub(crate) struct BagResponse {
    pub bag_id: String,
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Content identifier assigned by the service
    pub bag_id: String,
    /// Bytes sent (the file, or the archive for folder uploads)
    pub size: u64,
    /// Description sent with the upload
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_calculations() {
        let info = UserInfo {
            uid: "u".to_string(),
            space_left: 750.0,
            capacity: 1000.0,
        };
        assert_eq!(info.used(), 250.0);
        assert_eq!(info.usage_percent(), 25.0);

        let empty = UserInfo {
            uid: "u".to_string(),
            space_left: 0.0,
            capacity: 0.0,
        };
        assert_eq!(empty.usage_percent(), 0.0);

        // Service-reported values are not validated
        let odd = UserInfo {
            uid: "u".to_string(),
            space_left: 1200.0,
            capacity: 1000.0,
        };
        assert_eq!(odd.used(), 0.0);
    }

    #[test]
    fn test_file_record_decoding() {
        let record: FileRecord = serde_json::from_str(
            r#"{"filename": "hello.txt", "size": 5, "uploaded_at": 1700000000.5,
                "description": "greeting", "bag_id": "abc", "extra": true}"#,
        )
        .unwrap();
        assert_eq!(record.filename, "hello.txt");
        assert_eq!(record.size, 5);
        assert_eq!(record.description.as_deref(), Some("greeting"));
        assert_eq!(record.bag_id, "abc");

        let record: FileRecord = serde_json::from_str(
            r#"{"filename": "a", "size": 0, "uploaded_at": 0, "bag_id": "b", "description": null}"#,
        )
        .unwrap();
        assert!(record.description.is_none());
    }

    #[test]
    fn test_uploaded_at_time() {
        let mut record = FileRecord {
            bag_id: "b".to_string(),
            filename: "f".to_string(),
            size: 1,
            description: None,
            uploaded_at: 10.0,
        };
        assert_eq!(
            record.uploaded_at_time(),
            Some(UNIX_EPOCH + Duration::from_secs(10))
        );

        record.uploaded_at = -1.0;
        assert!(record.uploaded_at_time().is_none());
        record.uploaded_at = f64::NAN;
        assert!(record.uploaded_at_time().is_none());
    }
}
