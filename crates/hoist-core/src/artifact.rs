/// Install strategy for an uploaded artifact, chosen purely from the
/// original filename's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    TarGz,
    Gzip,
    Zip,
    Raw,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Gzip => "gz",
            Self::Zip => "zip",
            Self::Raw => "raw",
        }
    }

    /// Suffix dispatch is case-insensitive and total: anything that is not
    /// a recognized archive suffix installs as a raw file copy. `.tar.gz`
    /// must be tested before the bare `.gz` case.
    pub fn infer_from_filename(filename: &str) -> Self {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") {
            return Self::TarGz;
        }
        if lower.ends_with(".gz") {
            return Self::Gzip;
        }
        if lower.ends_with(".zip") {
            return Self::Zip;
        }
        Self::Raw
    }
}

/// Output file name for a single-stream gzip artifact: the original name
/// with the trailing `.gz` stripped.
pub fn gzip_output_name(filename: &str) -> &str {
    if filename.to_ascii_lowercase().ends_with(".gz") {
        &filename[..filename.len() - ".gz".len()]
    } else {
        filename
    }
}
