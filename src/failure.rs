/// Per-item failure taxonomy. Every kind gets its own report log under
/// `report/`; all are non-fatal to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Title/description extraction failed.
    InvalidUrl,
    /// No detectable language.
    InvalidLang,
    /// No coordinate from the adapter or the geocoder.
    InvalidLocation,
    /// No candidate photo URLs at all.
    InvalidPhoto,
    /// Some photo candidates failed download/validation. Non-terminal by
    /// default: the item continues with the photos that were obtained.
    InvalidFetchPhoto,
    /// Storage upload failed. Terminal for the item; no entities persisted.
    UploadError,
}

impl FailureKind {
    pub const ALL: [FailureKind; 6] = [
        FailureKind::InvalidUrl,
        FailureKind::InvalidLang,
        FailureKind::InvalidLocation,
        FailureKind::InvalidPhoto,
        FailureKind::InvalidFetchPhoto,
        FailureKind::UploadError,
    ];

    /// Report file stem, e.g. `report/INVALID_URL.jsonl`.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::InvalidUrl => "INVALID_URL",
            FailureKind::InvalidLang => "INVALID_LANG",
            FailureKind::InvalidLocation => "INVALID_LOCATION",
            FailureKind::InvalidPhoto => "INVALID_PHOTO",
            FailureKind::InvalidFetchPhoto => "INVALID_FETCH_PHOTO",
            FailureKind::UploadError => "UPLOAD_ERROR",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
