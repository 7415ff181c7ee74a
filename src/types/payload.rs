//! Export payloads returned by the account service

/// Transaction data exported for one statement
///
/// The filename comes from the service response, never from the statement,
/// and the bytes are written to disk verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    /// File name suggested by the service
    pub filename: String,

    /// Raw exported bytes
    pub data: Vec<u8>,
}

impl ExportPayload {
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}
