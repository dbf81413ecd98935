//! Static-resource handler: dispatch, resolution, and streaming.
//!
//! # Responsibilities
//! - Claim a context-path prefix and reject everything outside it
//! - Dispatch each exchange through a method → handler registry
//! - Resolve resources against a directory root or an embedded table
//! - Stream resource bytes into the response body
//!
//! # Design Decisions
//! - The registry holds one entry per opted-in verb (GET and OPTIONS by
//!   default); every other method gets the shared 405 default. Additional
//!   verbs are opt-in at runtime via [`ResourceHandler::register_method`].
//! - The allowed-method set is advisory metadata surfaced by OPTIONS, not
//!   an enforcement gate; enforcement is registry membership.
//! - Resolution failures of any kind surface as 404; nothing propagates
//!   past the handler boundary, so every exchange is answered exactly once.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use dashmap::{DashMap, DashSet};
use percent_encoding::percent_decode_str;
use tokio::io::AsyncRead;

use crate::error::ServeError;
use crate::http::content_types::{BUILTIN_CONTENT_TYPES, DEFAULT_CONTENT_TYPE};
use crate::stream::streaming_body;

type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;
type MethodHandler = Arc<dyn Fn(Arc<ResourceHandler>, String) -> HandlerFuture + Send + Sync>;
type ResourceReader = Box<dyn AsyncRead + Send + Unpin>;

/// A compile-time resource, looked up by its literal relative path.
///
/// Embedded tables are typically built with `include_bytes!`. No traversal
/// confinement applies beyond exact-path lookup, so callers embedding
/// untrusted path segments must pre-validate them.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedResource {
    pub path: &'static str,
    pub bytes: &'static [u8],
}

/// Where resource bytes come from; fixed at construction.
enum ResourceBase {
    Directory(PathBuf),
    Embedded(&'static [EmbeddedResource]),
}

/// HTTP handler serving basic web resources from a file system directory
/// or an embedded resource table.
pub struct ResourceHandler {
    context_path: String,
    base: ResourceBase,
    allowed_methods: DashSet<Method>,
    content_types: DashMap<String, String>,
    handlers: DashMap<Method, MethodHandler>,
}

impl ResourceHandler {
    /// Configures a handler for file-system resource access. The root must
    /// be an existing directory; it is canonicalized once and all resolved
    /// paths are confined to it.
    pub fn for_directory(
        context_path: &str,
        root: impl Into<PathBuf>,
    ) -> Result<Arc<Self>, ServeError> {
        let root = root.into();
        let canonical = std::fs::canonicalize(&root)
            .map_err(|_| ServeError::NoSuchResource { path: root.clone() })?;
        if !canonical.is_dir() {
            return Err(ServeError::NoSuchResource { path: root });
        }
        Ok(Self::with_base(
            context_path,
            ResourceBase::Directory(canonical),
        ))
    }

    /// Configures a handler for embedded resource access.
    pub fn for_embedded(context_path: &str, resources: &'static [EmbeddedResource]) -> Arc<Self> {
        Self::with_base(context_path, ResourceBase::Embedded(resources))
    }

    fn with_base(context_path: &str, base: ResourceBase) -> Arc<Self> {
        let allowed_methods = DashSet::new();
        allowed_methods.insert(Method::GET);
        allowed_methods.insert(Method::OPTIONS);

        let content_types = DashMap::new();
        for (extension, content_type) in BUILTIN_CONTENT_TYPES {
            content_types.insert((*extension).to_string(), (*content_type).to_string());
        }

        let handler = Arc::new(Self {
            context_path: normalize_context_path(context_path),
            base,
            allowed_methods,
            content_types,
            handlers: DashMap::new(),
        });
        handler.register_method(Method::GET, handle_get);
        handler.register_method(Method::OPTIONS, handle_options);
        handler
    }

    /// Wires this handler into a router that claims every path and method.
    pub fn router(self: &Arc<Self>) -> Router {
        Router::new().fallback(dispatch).with_state(Arc::clone(self))
    }

    /// The context path without its terminal slash (except for the root
    /// path).
    pub fn context_path(&self) -> &str {
        if self.context_path.len() == 1 {
            &self.context_path
        } else {
            &self.context_path[..self.context_path.len() - 1]
        }
    }

    /// The resource directory, or `None` in embedded mode.
    pub fn resource_directory(&self) -> Option<&PathBuf> {
        match &self.base {
            ResourceBase::Directory(root) => Some(root),
            ResourceBase::Embedded(_) => None,
        }
    }

    /// The advertised method set. Mutations are visible to subsequent
    /// OPTIONS exchanges; registration here does not by itself route a
    /// verb, see [`ResourceHandler::register_method`].
    pub fn allowed_methods(&self) -> &DashSet<Method> {
        &self.allowed_methods
    }

    /// The mutable extension → content-type table.
    pub fn content_types(&self) -> &DashMap<String, String> {
        &self.content_types
    }

    /// Opts a verb in by installing its handler. The handler receives this
    /// handler instance and the context-stripped resource path.
    pub fn register_method<F, Fut>(&self, method: Method, handler: F)
    where
        F: Fn(Arc<ResourceHandler>, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let boxed: MethodHandler =
            Arc::new(move |instance, path| Box::pin(handler(instance, path)));
        self.handlers.insert(method, boxed);
    }

    /// Looks up the content type for a resource path by its extension,
    /// case-insensitively, falling back to the generic binary type.
    pub fn resource_type(&self, resource_path: &str) -> String {
        let extension = resource_path
            .rsplit('.')
            .next()
            .unwrap_or(resource_path)
            .to_ascii_lowercase();
        self.content_types
            .get(&extension)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
    }

    /// The resource size, when knowable. Only file-system resources report
    /// a size; embedded resources do not.
    pub async fn resource_size(&self, resource_path: &str) -> Option<u64> {
        match &self.base {
            ResourceBase::Embedded(_) => None,
            ResourceBase::Directory(root) => {
                let resolved = self.resolve_confined(root, resource_path).await.ok()?;
                tokio::fs::metadata(resolved).await.ok().map(|m| m.len())
            }
        }
    }

    /// Opens the resource for streaming, returning the reader and the size
    /// when knowable.
    async fn open_resource(
        &self,
        resource_path: &str,
    ) -> Result<(ResourceReader, Option<u64>), ServeError> {
        match &self.base {
            ResourceBase::Embedded(resources) => {
                let resource = resources
                    .iter()
                    .find(|resource| resource.path == resource_path)
                    .ok_or_else(|| ServeError::NoSuchResource {
                        path: PathBuf::from(resource_path),
                    })?;
                Ok((Box::new(resource.bytes), None))
            }
            ResourceBase::Directory(root) => {
                let resolved = self.resolve_confined(root, resource_path).await?;
                let metadata = tokio::fs::metadata(&resolved).await?;
                if !metadata.is_file() {
                    return Err(ServeError::NoSuchResource { path: resolved });
                }
                let file = tokio::fs::File::open(&resolved).await?;
                Ok((Box::new(file), Some(metadata.len())))
            }
        }
    }

    /// Resolves a relative resource path against the root and rejects any
    /// outcome escaping it. Canonicalization is the containment check, so
    /// `..` segments and symlink tricks both fail the same way.
    async fn resolve_confined(
        &self,
        root: &PathBuf,
        resource_path: &str,
    ) -> Result<PathBuf, ServeError> {
        let joined = root.join(resource_path);
        let canonical =
            tokio::fs::canonicalize(&joined)
                .await
                .map_err(|_| ServeError::NoSuchResource {
                    path: joined.clone(),
                })?;
        if !canonical.starts_with(root) {
            return Err(ServeError::AccessDenied {
                path: canonical,
                source: "resolved path escapes the resource root".into(),
            });
        }
        Ok(canonical)
    }
}

impl std::fmt::Debug for ResourceHandler {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ResourceHandler")
            .field("context_path", &self.context_path())
            .field("resource_directory", &self.resource_directory())
            .finish_non_exhaustive()
    }
}

/// Per-exchange entry point. The request path is percent-decoded before
/// the context check, so an escaped context prefix or file name still
/// resolves. Path containment is checked before method resolution, so
/// out-of-context requests are 404 regardless of verb.
async fn dispatch(State(handler): State<Arc<ResourceHandler>>, request: Request) -> Response {
    let Ok(path) = percent_decode_str(request.uri().path()).decode_utf8() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if !path.starts_with(handler.context_path.as_str()) {
        return StatusCode::NOT_FOUND.into_response();
    }
    let resource_path = path[handler.context_path.len()..].to_string();
    let method = request.method().clone();

    let registered = handler
        .handlers
        .get(&method)
        .map(|entry| Arc::clone(entry.value()));
    match registered {
        Some(method_handler) => method_handler(Arc::clone(&handler), resource_path).await,
        None => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

/// GET: stream the resource content, 204 for explicitly empty resources,
/// 404 for anything that cannot be located or read.
async fn handle_get(handler: Arc<ResourceHandler>, resource_path: String) -> Response {
    let content_type = handler.resource_type(&resource_path);
    match handler.open_resource(&resource_path).await {
        Ok((_, Some(0))) => {
            (StatusCode::NO_CONTENT, [(header::CONTENT_TYPE, content_type)]).into_response()
        }
        Ok((reader, _)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type)],
            streaming_body(reader),
        )
            .into_response(),
        Err(error) => {
            tracing::debug!(resource_path, %error, "resource not served");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// OPTIONS: the advertised methods, lexicographically sorted, one per line.
async fn handle_options(handler: Arc<ResourceHandler>, _resource_path: String) -> Response {
    let mut names: Vec<String> = handler
        .allowed_methods
        .iter()
        .map(|method| method.as_str().to_string())
        .collect();
    names.sort();
    let document = names.join("\n");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        document,
    )
        .into_response()
}

/// Normalizes a context path to carry both a leading and a trailing slash.
fn normalize_context_path(context_path: &str) -> String {
    let mut normalized = String::with_capacity(context_path.len() + 2);
    if !context_path.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(context_path);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}
