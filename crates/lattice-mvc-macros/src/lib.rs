//! Procedural macros for Lattice MVC actors.
//!
//! This crate provides `#[derive(Notifier)]`, which implements the `Notifier`
//! trait by delegating to an embedded field.
//!
//! # Field Selection
//!
//! The delegate field is, in order of preference:
//!
//! 1. the field marked `#[notifier]`
//! 2. a field named `notifier`
//! 3. a field named `base`
//!
//! The field's type must itself implement `Notifier`, so both `NotifierBase`
//! and `MediatorBase` work:
//!
//! ```ignore
//! #[derive(Notifier)]
//! struct SaveCommand {
//!     notifier: NotifierBase,
//! }
//!
//! #[derive(Notifier)]
//! struct EditorMediator {
//!     #[notifier]
//!     core: MediatorBase,
//!     buffer: String,
//! }
//! ```
//!
//! # Crate Path
//!
//! Generated code refers to `::lattice_mvc_core`. Code that only depends on
//! the umbrella crate sets the path at struct level:
//!
//! ```ignore
//! #[derive(Notifier)]
//! #[notifier(crate = "lattice_mvc")]
//! struct Heartbeat {
//!     notifier: NotifierBase,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Expr, ExprLit, Fields, Lit, Member, Path, parse_macro_input};

/// Derive the `Notifier` trait by delegating to an embedded field.
#[proc_macro_derive(Notifier, attributes(notifier))]
pub fn derive_notifier(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_derive_notifier(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn impl_derive_notifier(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let crate_path = parse_crate_path(input)?;
    let field = find_notifier_field(input)?;

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #crate_path::Notifier for #struct_name #ty_generics #where_clause {
            fn notifier(&self) -> &#crate_path::NotifierBase {
                #crate_path::Notifier::notifier(&self.#field)
            }
        }
    })
}

/// Parse `#[notifier(crate = "path")]` on the struct.
fn parse_crate_path(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let mut crate_path = quote!(::lattice_mvc_core);

    for attr in &input.attrs {
        if !attr.path().is_ident("notifier") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let value: Expr = meta.value()?.parse()?;
                let Expr::Lit(ExprLit {
                    lit: Lit::Str(lit_str),
                    ..
                }) = value
                else {
                    return Err(meta.error("expected a string literal, e.g. `crate = \"lattice_mvc\"`"));
                };
                let path: Path = lit_str.parse()?;
                crate_path = quote!(#path);
                Ok(())
            } else {
                Err(meta.error("unsupported notifier attribute"))
            }
        })?;
    }

    Ok(crate_path)
}

/// Pick the field the generated `notifier()` delegates to.
fn find_notifier_field(input: &DeriveInput) -> syn::Result<Member> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Notifier derive only supports structs",
            ));
        }
    };

    let members: Vec<(Member, &syn::Field)> = match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .filter_map(|f| f.ident.clone().map(|ident| (Member::Named(ident), f)))
            .collect(),
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(index, f)| (Member::from(index), f))
            .collect(),
        Fields::Unit => Vec::new(),
    };

    let marked: Vec<&Member> = members
        .iter()
        .filter(|(_, f)| f.attrs.iter().any(|a| a.path().is_ident("notifier")))
        .map(|(member, _)| member)
        .collect();

    match marked.as_slice() {
        [member] => return Ok((*member).clone()),
        [] => {}
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "only one field may be marked #[notifier]",
            ));
        }
    }

    for name in ["notifier", "base"] {
        if let Some((member, _)) = members
            .iter()
            .find(|(member, _)| matches!(member, Member::Named(ident) if ident == name))
        {
            return Ok(member.clone());
        }
    }

    Err(syn::Error::new_spanned(
        input,
        "Notifier derive requires a `notifier` or `base` field, or a field marked #[notifier]",
    ))
}
