use crate::filename::extension_of;
use crate::{FileDescriptor, IngestError, IngestSettings};

/// Decide whether a file looks like something `parse` can handle.
///
/// The declared media type is checked first; the extension is a fallback
/// because browsers report spreadsheet media types inconsistently.
pub fn validate(file: &FileDescriptor, settings: &IngestSettings) -> Result<(), IngestError> {
    if let Some(media_type) = file.media_type.as_deref() {
        let essence = media_type.split(';').next().unwrap_or(media_type).trim();
        if settings
            .allowed_media_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(essence))
        {
            return Ok(());
        }
    }

    if let Some(ext) = extension_of(&file.name) {
        if settings.allowed_extensions.iter().any(|allowed| *allowed == ext) {
            return Ok(());
        }
    }

    Err(IngestError::InvalidFormat {
        filename: file.name.clone(),
    })
}
