use chrono::{DateTime, Utc};

/// Last path segment of an object key.
pub fn file_basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Staging key for a cleaned copy of `source_key`:
/// `processed/<basename-without-extension>_cleaned.csv`.
pub fn staging_key(source_key: &str) -> String {
    let basename = file_basename(source_key);
    let stem = match basename.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => basename,
    };
    format!("processed/{}_cleaned.csv", stem)
}

/// Archive key for `source_key`. The UTC timestamp keeps archive paths
/// unique across repeated uploads of the same filename.
pub fn archive_key(source_key: &str, archived_at: DateTime<Utc>) -> String {
    format!(
        "archived/{}_{}",
        archived_at.format("%Y%m%d_%H%M%S"),
        file_basename(source_key)
    )
}

/// Full object URI in `s3://bucket/key` form, used as the log-table path.
pub fn object_uri(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn basename_strips_directories() {
        assert_eq!(file_basename("incoming/students.csv"), "students.csv");
        assert_eq!(file_basename("students.csv"), "students.csv");
        assert_eq!(file_basename("a/b/c.xlsx"), "c.xlsx");
    }

    #[test]
    fn staging_key_replaces_extension() {
        assert_eq!(
            staging_key("incoming/students.csv"),
            "processed/students_cleaned.csv"
        );
        assert_eq!(
            staging_key("incoming/batch_03.xlsx"),
            "processed/batch_03_cleaned.csv"
        );
        assert_eq!(staging_key("noext"), "processed/noext_cleaned.csv");
    }

    #[test]
    fn archive_key_embeds_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 9).unwrap();
        assert_eq!(
            archive_key("incoming/students.csv", ts),
            "archived/20240305_143009_students.csv"
        );
    }

    #[test]
    fn object_uri_format() {
        assert_eq!(
            object_uri("raw-incoming", "incoming/students.csv"),
            "s3://raw-incoming/incoming/students.csv"
        );
    }
}
