//! Certificate controller methods beyond CRUD.
//!
//! A certificate document only names its file (`fileName`). Where the
//! bytes come from is decided by the storage configuration: below
//! `storage.remote_base_url` when set, otherwise below
//! `storage.certificate_root`. A name that would leave either location is
//! treated as a missing file.

use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use url::Url;

use crate::config::StorageConfig;
use crate::context::ServiceContext;
use crate::controllers::CERTIFICATES;
use crate::error::ApiError;
use crate::http::ApiRequest;
use crate::routing::{HandlerResult, StreamSource};

const FILE_NOT_FOUND: &str = "Certificate file not found.";

/// Stream the certificate file.
pub async fn download(ctx: ServiceContext, req: ApiRequest) -> HandlerResult {
    let id = req.require_id("Certificate id is required.")?;
    let certificate = CERTIFICATES.details(&ctx.db, id)?;
    let name = file_name_of(&certificate)?;
    Ok(locate(&ctx.config.storage, name).await?.into())
}

fn file_name_of(certificate: &Value) -> Result<&str, ApiError> {
    certificate
        .get("fileName")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::not_found(FILE_NOT_FOUND))
}

/// Resolve a stored file name against the configured storage.
pub async fn locate(storage: &StorageConfig, name: &str) -> Result<StreamSource, ApiError> {
    let relative = relative_name(name)?;
    match &storage.remote_base_url {
        Some(base) => remote_location(base, relative).map(StreamSource::RemoteUrl),
        None => local_location(Path::new(&storage.certificate_root), relative)
            .await
            .map(StreamSource::LocalFile),
    }
}

/// A name made only of plain path components.
fn relative_name(name: &str) -> Result<&str, ApiError> {
    let plain = Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if name.is_empty() || name.contains('\\') || !plain {
        tracing::warn!(file_name = %name, "Rejected certificate file name");
        return Err(ApiError::not_found(FILE_NOT_FOUND));
    }
    Ok(name)
}

/// `root/name`, provided it still lies under `root` once symlinks are
/// resolved. A file that does not exist is returned as is; opening it
/// fails later as a stream error.
async fn local_location(root: &Path, name: &str) -> Result<PathBuf, ApiError> {
    let root = tokio::fs::canonicalize(root).await.map_err(|e| {
        tracing::error!(root = %root.display(), error = %e, "Certificate root is not readable");
        ApiError::internal(e)
    })?;

    let candidate = root.join(name);
    match tokio::fs::canonicalize(&candidate).await {
        Ok(resolved) if resolved.starts_with(&root) => Ok(resolved),
        Ok(resolved) => {
            tracing::warn!(path = %resolved.display(), "Certificate file escapes the certificate root");
            Err(ApiError::not_found(FILE_NOT_FOUND))
        }
        Err(_) => Ok(candidate),
    }
}

/// `base` joined with `name`, provided the result stays below `base`.
fn remote_location(base: &str, name: &str) -> Result<String, ApiError> {
    let base = Url::parse(base).map_err(ApiError::internal)?;
    let url = base
        .join(name)
        .map_err(|_| ApiError::not_found(FILE_NOT_FOUND))?;

    if url.origin() != base.origin() || !url.path().starts_with(base.path()) {
        tracing::warn!(url = %url, "Certificate URL escapes the remote base");
        return Err(ApiError::not_found(FILE_NOT_FOUND));
    }
    Ok(url.into())
}
