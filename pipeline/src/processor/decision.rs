use crate::models::{Decision, DecisionReason, FileMetadata, LogRecord};

/// Pure change decision over two timestamps: process on first sight or when
/// the source is strictly newer than the latest logged run. Equal timestamps
/// count as not modified.
pub fn should_process(metadata: &FileMetadata, prior: Option<&LogRecord>) -> Decision {
    let Some(entry) = prior else {
        return Decision {
            process: true,
            reason: DecisionReason::FirstLoad,
        };
    };

    if metadata.last_modified > entry.last_modified_timestamp {
        Decision {
            process: true,
            reason: DecisionReason::FileModified,
        }
    } else {
        Decision {
            process: false,
            reason: DecisionReason::NotModified,
        }
    }
}
