use std::io::BufRead;
use std::path::Path;

/// Trait for importing types from a file path, a reader, or a byte slice
pub trait Importable: Sized {
    /// The error type returned by import operations
    type Error: std::error::Error + Send + Sync + 'static + From<std::io::Error>;
    /// Supported input formats
    type Format: Copy + std::fmt::Debug;
    /// Options controlling the import
    type Options: Default;

    /// Import from a buffered reader in the given format
    fn import_from_reader_with<R: BufRead>(
        reader: R,
        format: Self::Format,
        options: &Self::Options,
    ) -> Result<Self, Self::Error>;

    /// Infer the format from a path (usually its extension)
    fn infer_format(path: &Path) -> Option<Self::Format>;

    /// Import from a file path, inferring the format from the path
    fn import_from_path_with<P: AsRef<Path>>(
        path: P,
        options: &Self::Options,
    ) -> Result<Self, Self::Error> {
        let path = path.as_ref();
        let format = Self::infer_format(path).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Could not infer format from path {}", path.display()),
            )
        })?;
        let file = std::fs::File::open(path)?;
        Self::import_from_reader_with(std::io::BufReader::new(file), format, options)
    }

    /// Import from a file path with default options
    fn import_from_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error> {
        Self::import_from_path_with(path, &Self::Options::default())
    }

    /// Import from a byte slice in the given format
    fn import_from_bytes_with(
        bytes: &[u8],
        format: Self::Format,
        options: &Self::Options,
    ) -> Result<Self, Self::Error> {
        Self::import_from_reader_with(bytes, format, options)
    }
}
