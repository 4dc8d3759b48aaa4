//! Attribute parsing for `#[derive(Bind)]`.
//!
//! Field attributes name the sources a field binds from:
//!
//! ```rust,ignore
//! #[bind(path = "id", query = "id", json)]
//! id: String,
//! ```
//!
//! A tag without `= "name"` takes the field name, or for body tags the
//! `#[serde(rename = "...")]` value when one is present.

use proc_macro2::Span;
use syn::{
    punctuated::Punctuated, spanned::Spanned, Attribute, Expr, ExprLit, Field, Ident, Lit,
    LitStr, Meta, Path, Token,
};

/// A recognized source tag, in binding priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TagKind {
    Json,
    Xml,
    Yaml,
    Form,
    Path,
    Query,
    Header,
}

impl TagKind {
    pub const ALL: [Self; 7] = [
        Self::Json,
        Self::Xml,
        Self::Yaml,
        Self::Form,
        Self::Path,
        Self::Query,
        Self::Header,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Form => "form",
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
        }
    }

    /// Variant name of the runtime `Tag` enum.
    pub fn variant(self) -> Ident {
        let name = match self {
            Self::Json => "Json",
            Self::Xml => "Xml",
            Self::Yaml => "Yaml",
            Self::Form => "Form",
            Self::Path => "Path",
            Self::Query => "Query",
            Self::Header => "Header",
        };
        Ident::new(name, Span::call_site())
    }

    /// Tags decoded by serde rather than the coercer.
    pub fn is_serde_body(self) -> bool {
        matches!(self, Self::Json | Self::Xml | Self::Yaml)
    }

    fn from_ident(ident: &Ident) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| ident == tag.keyword())
    }
}

/// Container-level options.
#[derive(Debug)]
pub struct ContainerAttrs {
    /// Path to the runtime crate.
    pub krate: Path,
}

impl ContainerAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut krate: Option<Path> = None;

        for attr in attrs.iter().filter(|a| a.path().is_ident("bind")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("crate") {
                    let lit: LitStr = meta.value()?.parse()?;
                    krate = Some(lit.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown container attribute, expected `crate`"))
                }
            })?;
        }

        Ok(Self {
            krate: krate.unwrap_or_else(|| syn::parse_quote!(::junction_bind)),
        })
    }
}

/// Per-field binding options.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// `(tag, name)` pairs sorted by priority.
    pub tags: Vec<(TagKind, String)>,
    /// Excluded from every source.
    pub skip: bool,
}

impl FieldAttrs {
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
        let field_name = ident.to_string().trim_start_matches("r#").to_string();
        let serde_name = serde_rename(&field.attrs)?;

        let mut attrs = Self::default();
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("bind")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                    return Ok(());
                }

                let tag = meta
                    .path
                    .get_ident()
                    .and_then(TagKind::from_ident)
                    .ok_or_else(|| {
                        meta.error(
                            "unknown bind tag, expected one of json, xml, yaml, form, path, query, header, skip",
                        )
                    })?;

                if attrs.tags.iter().any(|(t, _)| *t == tag) {
                    return Err(meta.error(format!("duplicate `{}` tag", tag.keyword())));
                }

                let name = if meta.input.peek(Token![=]) {
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "tag name must not be empty"));
                    }
                    lit.value()
                } else if tag.is_serde_body() {
                    serde_name.clone().unwrap_or_else(|| field_name.clone())
                } else {
                    field_name.clone()
                };

                attrs.tags.push((tag, name));
                Ok(())
            })?;
        }

        if attrs.skip && !attrs.tags.is_empty() {
            return Err(syn::Error::new(
                ident.span(),
                "`skip` cannot be combined with source tags",
            ));
        }

        attrs.tags.sort_by_key(|(tag, _)| *tag);
        Ok(attrs)
    }

    pub fn has(&self, tag: TagKind) -> bool {
        self.tags.iter().any(|(t, _)| *t == tag)
    }

    pub fn name_for(&self, tag: TagKind) -> Option<&str> {
        self.tags
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, name)| name.as_str())
    }
}

/// Reads `#[serde(rename = "...")]` from a field.
fn serde_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let Meta::List(_) = &attr.meta else {
            continue;
        };
        let nested = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in nested {
            if let Meta::NameValue(nv) = meta {
                if nv.path.is_ident("rename") {
                    if let Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        return Ok(Some(s.value()));
                    }
                }
            }
        }
    }
    Ok(None)
}
