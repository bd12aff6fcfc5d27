//! Marker attribute recognised by `srcgen-build`.
//!
//! `#[my_special]` has no runtime effect. It only restricts where it can be
//! written; the generator finds it by path while scanning the crate.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::ToTokens;
use syn::{ImplItemFn, TraitItemFn};

/// Mark a method for caller-type-name wrapper generation.
#[proc_macro_attribute]
pub fn my_special(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(attr.into(), item.into()).into()
}

// Pass functions through untouched; reject anything else.
fn expand(attr: TokenStream2, item: TokenStream2) -> TokenStream2 {
    if !attr.is_empty() {
        return syn::Error::new(Span::call_site(), "`#[my_special]` takes no arguments")
            .to_compile_error();
    }

    let is_fn = syn::parse2::<ImplItemFn>(item.clone()).is_ok()
        || syn::parse2::<TraitItemFn>(item.clone()).is_ok();
    if !is_fn {
        let mut tokens =
            syn::Error::new(Span::call_site(), "`#[my_special]` can only be applied to methods")
                .to_compile_error();
        item.to_tokens(&mut tokens);

        return tokens;
    }

    item
}

///
/// TESTS
///
