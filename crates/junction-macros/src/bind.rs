//! `#[derive(Bind)]` expansion.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DataStruct, DeriveInput, Fields, Ident};

use crate::parse::{ContainerAttrs, FieldAttrs, TagKind};

struct BoundField {
    ident: Ident,
    name: String,
    attrs: FieldAttrs,
}

/// Expands the derive for one input item.
pub fn expand_bind(input: &DeriveInput) -> syn::Result<TokenStream> {
    let container = ContainerAttrs::from_attrs(&input.attrs)?;
    let krate = &container.krate;

    let named = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(named),
            ..
        }) => &named.named,
        Data::Struct(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "not a record: Bind requires a struct with named fields",
            ))
        }
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "not a record: Bind cannot be derived for enums",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "not a record: Bind cannot be derived for unions",
            ))
        }
    };

    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let attrs = FieldAttrs::from_field(field)?;
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let name = ident.to_string().trim_start_matches("r#").to_string();
        fields.push(BoundField { ident, name, attrs });
    }

    let fields_fn = fields_fn(krate, &fields);
    let bind_tokens_fn = bind_tokens_fn(krate, &fields);
    let decode_body_fn = decode_body_fn(krate, &fields);
    let overlay_body_fn = overlay_body_fn(krate, &fields);
    let field_addrs_fn = field_addrs_fn(krate, &fields);

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        #[allow(clippy::needless_borrow, clippy::used_underscore_binding)]
        impl #impl_generics #krate::Bind for #ident #ty_generics #where_clause {
            #fields_fn
            #bind_tokens_fn
            #decode_body_fn
            #overlay_body_fn
            #field_addrs_fn

            fn validation(&self) -> #krate::Capability {
                #[allow(unused_imports)]
                use #krate::__private::{AbsentProbe as _, AddressableProbe as _, OwnedProbe as _};
                (&&&#krate::__private::Probe(self)).capability()
            }
        }
    })
}

fn fields_fn(krate: &syn::Path, fields: &[BoundField]) -> TokenStream {
    let specs = fields.iter().map(|field| {
        let name = &field.name;
        let tags = field.attrs.tags.iter().map(|(tag, value)| {
            let variant = tag.variant();
            quote! { (#krate::Tag::#variant, #value) }
        });
        quote! {
            #krate::FieldSpec { name: #name, tags: &[#(#tags),*] }
        }
    });

    quote! {
        fn fields() -> &'static [#krate::FieldSpec] {
            const FIELDS: &[#krate::FieldSpec] = &[#(#specs),*];
            FIELDS
        }
    }
}

fn bind_tokens_fn(krate: &syn::Path, fields: &[BoundField]) -> TokenStream {
    let arms = [TagKind::Form, TagKind::Path, TagKind::Query, TagKind::Header]
        .into_iter()
        .filter_map(|tag| {
            let stmts: Vec<TokenStream> = fields
                .iter()
                .filter_map(|field| {
                    let key = field.attrs.name_for(tag)?;
                    let ident = &field.ident;
                    Some(quote! {
                        {
                            let tokens = source.tokens(#key);
                            if !tokens.is_empty() {
                                #krate::BindField::bind_tokens(&mut self.#ident, &tokens)
                                    .map_err(|e| #krate::BindError::field(#key, e))?;
                            }
                        }
                    })
                })
                .collect();
            if stmts.is_empty() {
                return None;
            }
            let variant = tag.variant();
            Some(quote! { #krate::Tag::#variant => { #(#stmts)* } })
        });

    quote! {
        #[allow(unused_variables)]
        fn bind_tokens(
            &mut self,
            tag: #krate::Tag,
            source: &dyn #krate::TokenSource,
        ) -> ::core::result::Result<(), #krate::BindError> {
            match tag {
                #(#arms)*
                _ => {}
            }
            ::core::result::Result::Ok(())
        }
    }
}

fn decode_body_fn(krate: &syn::Path, fields: &[BoundField]) -> TokenStream {
    let has_serde_body = fields
        .iter()
        .any(|f| f.attrs.tags.iter().any(|(tag, _)| tag.is_serde_body()));

    let body = if has_serde_body {
        quote! {
            #krate::__private::decode::<Self>(format, body).map(::core::option::Option::Some)
        }
    } else {
        quote! {
            #krate::__private::check_syntax(format, body).map(|()| ::core::option::Option::None)
        }
    };

    quote! {
        fn decode_body(
            format: #krate::BodyFormat,
            body: &[u8],
        ) -> ::core::result::Result<::core::option::Option<Self>, #krate::BodyDecodeError> {
            #body
        }
    }
}

fn overlay_body_fn(krate: &syn::Path, fields: &[BoundField]) -> TokenStream {
    let moves_for = |tag: TagKind| {
        let idents: Vec<&Ident> = fields
            .iter()
            .filter(|f| f.attrs.has(tag))
            .map(|f| &f.ident)
            .collect();
        quote! { #(self.#idents = decoded.#idents;)* }
    };
    let json = moves_for(TagKind::Json);
    let xml = moves_for(TagKind::Xml);
    let yaml = moves_for(TagKind::Yaml);

    quote! {
        #[allow(unused_variables)]
        fn overlay_body(&mut self, format: #krate::BodyFormat, decoded: Self) {
            match format {
                #krate::BodyFormat::Json => { #json }
                #krate::BodyFormat::Xml => { #xml }
                #krate::BodyFormat::Yaml => { #yaml }
                #krate::BodyFormat::Form => {}
            }
        }
    }
}

fn field_addrs_fn(krate: &syn::Path, fields: &[BoundField]) -> TokenStream {
    let addrs = fields.iter().enumerate().map(|(index, field)| {
        let ident = &field.ident;
        quote! { #krate::FieldAddr::of(&self.#ident, #index) }
    });

    quote! {
        fn field_addrs(&self) -> ::std::vec::Vec<#krate::FieldAddr> {
            ::std::vec![#(#addrs),*]
        }
    }
}
