use crate::{IngestError, ParsedTable};

/// Name under which the processed output is offered for download.
pub const ARTIFACT_FILENAME: &str = "processed_data.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub json: String,
}

impl Artifact {
    pub fn byte_len(&self) -> usize {
        self.json.len()
    }
}

/// Serialize a table to the pretty-printed JSON download.
///
/// The document is `{"headers": [...], "rows": [...]}`; positional rows
/// become arrays and keyed rows become objects in header order.
pub fn build_artifact(table: &ParsedTable) -> Result<Artifact, IngestError> {
    let json = serde_json::to_string_pretty(table).map_err(|err| {
        IngestError::SerializationFailure {
            reason: err.to_string(),
        }
    })?;
    Ok(Artifact {
        filename: ARTIFACT_FILENAME.to_string(),
        json,
    })
}
