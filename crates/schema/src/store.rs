//! File I/O for request and response records.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::request::{SCHEMA_VERSION, SearchRequest};
use crate::response::SearchResponse;

/// Fatal problems reading or writing records. Validation problems are not
/// here; they are reported inside the response.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
}

/// A parsed request plus the digest of the bytes it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRequest {
    pub request: SearchRequest,
    pub digest: String,
}

pub fn parse_request(bytes: &[u8]) -> Result<LoadedRequest, SchemaError> {
    let request: SearchRequest = serde_json::from_slice(bytes)?;
    if request.schema_version != SCHEMA_VERSION {
        return Err(SchemaError::SchemaMismatch {
            file_version: request.schema_version,
            expected_version: SCHEMA_VERSION,
        });
    }
    Ok(LoadedRequest {
        request,
        digest: sha256_hex(bytes),
    })
}

pub fn read_request(path: impl AsRef<Path>) -> Result<LoadedRequest, SchemaError> {
    let bytes = std::fs::read(path.as_ref())?;
    let loaded = parse_request(&bytes)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        observations = loaded.request.observations.len(),
        digest = %loaded.digest,
        "request loaded"
    );
    Ok(loaded)
}

/// Write pretty-printed JSON with a trailing newline.
pub fn write_response(path: impl AsRef<Path>, response: &SearchResponse) -> Result<(), SchemaError> {
    let mut text = serde_json::to_string_pretty(response)?;
    text.push('\n');
    std::fs::write(path.as_ref(), text)?;
    Ok(())
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ResponseStatus;

    const MINIMAL: &str = r#"{"mode":"SodiumTextures","observations":[{"x":0,"y":0,"z":0,"rotation":2}],
        "search":{"xMin":0,"xMax":3,"yMin":0,"yMax":0,"zMin":0,"zMax":3}}"#;

    #[test]
    fn digest_is_stable_and_content_addressed() {
        let a = parse_request(MINIMAL.as_bytes()).unwrap();
        let b = parse_request(MINIMAL.as_bytes()).unwrap();
        assert_eq!(a.digest, b.digest);
        assert_eq!(a.digest.len(), 64);

        let other = MINIMAL.replace("\"rotation\":2", "\"rotation\":1");
        assert_ne!(parse_request(other.as_bytes()).unwrap().digest, a.digest);
    }

    #[test]
    fn future_schema_version_is_fatal() {
        let text = MINIMAL.replacen('{', r#"{"schemaVersion":2,"#, 1);
        let err = parse_request(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::SchemaMismatch {
                file_version: 2,
                expected_version: 1
            }
        ));
    }

    #[test]
    fn malformed_json_is_fatal() {
        assert!(matches!(
            parse_request(b"{\"mode\": "),
            Err(SchemaError::Json(_))
        ));
        // Records without a rotation do not fit the schema at all.
        let text = MINIMAL.replace(",\"rotation\":2", "");
        assert!(matches!(parse_request(text.as_bytes()), Err(SchemaError::Json(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_request(tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SchemaError::Io(_)));
    }

    #[test]
    fn read_and_write_through_files() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("input.json");
        std::fs::write(&input, MINIMAL).unwrap();

        let loaded = read_request(&input).unwrap();
        let response = crate::run_request(&loaded, &texrot_search::CancelToken::new());
        let output = tmp.path().join("output.json");
        write_response(&output, &response).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.ends_with('\n'));
        let back: SearchResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(back.status, ResponseStatus::Complete);
        assert_eq!(back.tested, Some(16));
        assert_eq!(back.request_digest, Some(loaded.digest));
    }
}
