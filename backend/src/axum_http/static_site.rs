use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{error, warn};

const INDEX_FILE: &str = "index.html";

#[derive(Debug, PartialEq, Eq)]
pub enum StaticPathError {
    OutsideRoot,
}

/// Serves the download site from `root` for every path no other route claims.
pub fn routes(root: PathBuf) -> Router {
    Router::new()
        .fallback(serve_static)
        .with_state(Arc::new(root))
}

async fn serve_static(State(root): State<Arc<PathBuf>>, uri: Uri) -> Response {
    serve_path(&root, uri.path()).await
}

pub async fn serve_path(root: &Path, request_path: &str) -> Response {
    let file_path = match resolve_path(root, request_path) {
        Ok(path) => path,
        Err(StaticPathError::OutsideRoot) => {
            warn!(request_path, "static_site: path escapes document root");
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        }
    };

    match tokio::fs::metadata(&file_path).await {
        Ok(metadata) if metadata.is_file() => {}
        _ => return (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }

    match tokio::fs::read(&file_path).await {
        Ok(bytes) => ([(CONTENT_TYPE, content_type_for(&file_path))], bytes).into_response(),
        Err(err) => {
            error!(path = %file_path.display(), error = %err, "static_site: failed to read file");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Maps a URL path onto the document root, resolving `.` and `..` lexically.
pub fn resolve_path(root: &Path, request_path: &str) -> Result<PathBuf, StaticPathError> {
    let relative = if request_path == "/" {
        INDEX_FILE
    } else {
        request_path
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop().ok_or(StaticPathError::OutsideRoot)?;
            }
            other if other.contains('\\') || other.contains('\0') => {
                return Err(StaticPathError::OutsideRoot);
            }
            other => segments.push(other),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments);
    Ok(path)
}

pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "text/plain",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct SiteDir(PathBuf);

    impl SiteDir {
        fn new() -> Self {
            let root = std::env::temp_dir().join(format!("vhr-site-{}", Uuid::new_v4()));
            std::fs::create_dir_all(root.join("css")).unwrap();
            std::fs::write(root.join("index.html"), "<h1>VHR Dashboard</h1>").unwrap();
            std::fs::write(root.join("css").join("style.css"), "body {}").unwrap();
            std::fs::write(root.join("README"), "demo").unwrap();
            Self(root)
        }
    }

    impl Drop for SiteDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn content_type(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    #[test]
    fn resolves_root_to_index() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_path(root, "/").unwrap(),
            PathBuf::from("/srv/site/index.html")
        );
        assert_eq!(
            resolve_path(root, "/js/./app.js").unwrap(),
            PathBuf::from("/srv/site/js/app.js")
        );
        assert_eq!(
            resolve_path(root, "/js/../css/style.css").unwrap(),
            PathBuf::from("/srv/site/css/style.css")
        );
    }

    #[test]
    fn rejects_paths_above_root() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_path(root, "/../etc/passwd"),
            Err(StaticPathError::OutsideRoot)
        );
        assert_eq!(
            resolve_path(root, "/css/../../secret"),
            Err(StaticPathError::OutsideRoot)
        );
        assert_eq!(
            resolve_path(root, "/..\\windows"),
            Err(StaticPathError::OutsideRoot)
        );
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for(Path::new("a.html")), "text/html");
        assert_eq!(content_type_for(Path::new("a.js")), "application/javascript");
        assert_eq!(content_type_for(Path::new("a.json")), "application/json");
        assert_eq!(content_type_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.svg")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("a.apk")), "text/plain");
        assert_eq!(content_type_for(Path::new("README")), "text/plain");
    }

    #[tokio::test]
    async fn serves_files_with_content_type() {
        let site = SiteDir::new();

        let index = serve_path(&site.0, "/").await;
        assert_eq!(index.status(), StatusCode::OK);
        assert_eq!(content_type(&index), Some("text/html"));

        let css = serve_path(&site.0, "/css/style.css").await;
        assert_eq!(css.status(), StatusCode::OK);
        assert_eq!(content_type(&css), Some("text/css"));

        let readme = serve_path(&site.0, "/README").await;
        assert_eq!(content_type(&readme), Some("text/plain"));
    }

    #[tokio::test]
    async fn missing_files_and_directories_are_not_found() {
        let site = SiteDir::new();

        assert_eq!(
            serve_path(&site.0, "/missing.html").await.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            serve_path(&site.0, "/css").await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn traversal_is_forbidden() {
        let site = SiteDir::new();
        assert_eq!(
            serve_path(&site.0, "/../../etc/passwd").await.status(),
            StatusCode::FORBIDDEN
        );
    }
}
