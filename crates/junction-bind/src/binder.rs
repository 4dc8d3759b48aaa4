//! The binder.
//!
//! Binding runs in a fixed order: body, path, query, header, then
//! validation. Each step overwrites what earlier steps wrote for fields
//! tagged in more than one source, so the effective precedence is
//! `body < path < query < header`.

use junction_core::Request;

use crate::body::BodyFormat;
use crate::error::{BindError, BodyDecodeError};
use crate::field::{FieldAddr, FieldSpec};
use crate::source::{Pairs, Sources, Tag, TokenSource};
use crate::validate::{fold, warn_value_only, Capability};

/// Default body size limit: 4 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// A record the binder can fill. Implemented by `#[derive(Bind)]`.
pub trait Bind: Default {
    /// Every named field, in declaration order.
    fn fields() -> &'static [FieldSpec];

    /// Binds each field tagged with `tag` from `source`.
    ///
    /// # Errors
    ///
    /// Stops at the first field whose tokens fail to coerce.
    fn bind_tokens(&mut self, tag: Tag, source: &dyn TokenSource) -> Result<(), BindError>;

    /// Decodes the body into a fresh value, or only checks its syntax when
    /// the type has no serde-decoded fields.
    ///
    /// # Errors
    ///
    /// Returns the decoder error.
    fn decode_body(format: BodyFormat, body: &[u8]) -> Result<Option<Self>, BodyDecodeError>;

    /// Moves the fields tagged for `format` from `decoded` into `self`.
    fn overlay_body(&mut self, format: BodyFormat, decoded: Self);

    /// Memory spans of every field.
    fn field_addrs(&self) -> Vec<FieldAddr>;

    /// The validation capability of this type.
    fn validation(&self) -> Capability;
}

/// Binds requests into [`Bind`] records.
///
/// # Example
///
/// ```rust
/// use junction_bind::{Bind, Binder, Sources};
/// use junction_core::Request;
///
/// #[derive(Debug, Default, Bind)]
/// struct Page {
///     #[bind(query)]
///     page: u32,
///     #[bind(query = "tag")]
///     tags: Vec<String>,
/// }
///
/// let mut request = Request::builder()
///     .uri(http::Uri::from_static("/items?page=2&tag=a&tag=b"))
///     .build();
///
/// let page: Page = Binder::new().bind(&mut request, Sources::QUERY).unwrap();
/// assert_eq!(page.page, 2);
/// assert_eq!(page.tags, ["a", "b"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binder {
    max_body_bytes: usize,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    /// Creates a binder with default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Sets the body size limit.
    #[must_use]
    pub const fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// The body size limit.
    #[must_use]
    pub const fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Binds a fresh `T` from `request`.
    ///
    /// # Errors
    ///
    /// Returns the first binding failure, or the validation violations.
    pub fn bind<T: Bind>(&self, request: &mut Request, sources: Sources) -> Result<T, BindError> {
        let mut target = T::default();
        self.bind_into(&mut target, request, sources)?;
        Ok(target)
    }

    /// Binds into an existing `target`.
    ///
    /// On a binding failure `target` is reset to `T::default()`. On a
    /// validation failure the bound values are kept.
    ///
    /// # Errors
    ///
    /// Returns the first binding failure, or the validation violations.
    pub fn bind_into<T: Bind>(
        &self,
        target: &mut T,
        request: &mut Request,
        sources: Sources,
    ) -> Result<(), BindError> {
        if let Err(err) = self.populate(target, request, sources) {
            tracing::debug!(
                target_type = std::any::type_name::<T>(),
                error = %err,
                "bind failed"
            );
            *target = T::default();
            return Err(err);
        }
        validate(target)
    }

    fn populate<T: Bind>(
        &self,
        target: &mut T,
        request: &mut Request,
        sources: Sources,
    ) -> Result<(), BindError> {
        if sources.contains(Sources::BODY) {
            self.bind_body(target, request)?;
        }
        if sources.contains(Sources::PATH) {
            target.bind_tokens(Tag::Path, request.params())?;
        }
        if sources.contains(Sources::QUERY) {
            let pairs = Pairs::parse(request.query().unwrap_or_default())
                .map_err(|e| BindError::Query(e.to_string()))?;
            target.bind_tokens(Tag::Query, &pairs)?;
        }
        if sources.contains(Sources::HEADER) {
            target.bind_tokens(Tag::Header, request.headers())?;
        }
        Ok(())
    }

    fn bind_body<T: Bind>(&self, target: &mut T, request: &mut Request) -> Result<(), BindError> {
        let size = match request.body_len() {
            None => return Err(BindError::BodyConsumed),
            Some(0) => return Ok(()),
            Some(size) => size,
        };
        if size > self.max_body_bytes {
            return Err(BindError::PayloadTooLarge {
                size,
                limit: self.max_body_bytes,
            });
        }

        let format = BodyFormat::from_content_type(request.content_type()).ok_or_else(|| {
            BindError::UnsupportedContentType(request.content_type().unwrap_or_default().to_string())
        })?;
        let body = request.take_body().unwrap_or_default();

        if format == BodyFormat::Form {
            let pairs = Pairs::parse_bytes(&body).map_err(BodyDecodeError::from)?;
            return target.bind_tokens(Tag::Form, &pairs);
        }

        if let Some(decoded) = T::decode_body(format, &body)? {
            target.overlay_body(format, decoded);
        }
        Ok(())
    }
}

/// Runs the type's validation capability against the bound value.
fn validate<T: Bind>(target: &T) -> Result<(), BindError> {
    match target.validation() {
        Capability::Addressable(checks) => {
            fold(
                std::any::type_name::<T>(),
                checks,
                T::fields(),
                &target.field_addrs(),
            )?;
            Ok(())
        }
        Capability::ValueOnly => {
            warn_value_only(std::any::type_name::<T>());
            Ok(())
        }
        Capability::Absent => Ok(()),
    }
}

/// The binder installed in the request extensions, or the default one.
fn binder_for(request: &Request) -> Binder {
    request
        .extensions()
        .get::<Binder>()
        .copied()
        .unwrap_or_default()
}

/// Binds a fresh `T` with the request's [`Binder`].
///
/// Dispatchers install their configured binder in the request extensions;
/// without one the defaults apply.
///
/// # Errors
///
/// See [`Binder::bind`].
pub fn bind<T: Bind>(request: &mut Request, sources: Sources) -> Result<T, BindError> {
    binder_for(request).bind(request, sources)
}

/// Binds into `target` with the request's [`Binder`].
///
/// # Errors
///
/// See [`Binder::bind_into`].
pub fn bind_into<T: Bind>(
    target: &mut T,
    request: &mut Request,
    sources: Sources,
) -> Result<(), BindError> {
    binder_for(request).bind_into(target, request, sources)
}
