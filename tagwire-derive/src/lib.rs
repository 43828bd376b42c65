//! Derive macro for `Reflect`.
//!
//! Refer to the [`tagwire`](https://docs.rs/tagwire) crate for examples.
use {
    proc_macro::TokenStream,
    syn::{parse_macro_input, DeriveInput},
};

mod common;
mod reflect;

/// Implement `Reflect` and `Record` for a struct.
///
/// Field tags are read from `#[tag(name = "value")]` attributes. Container
/// options (`marshal`, `unmarshal`) and field options (`flatten`, `skip`) go
/// in `#[tagwire(...)]`.
#[proc_macro_derive(Reflect, attributes(tagwire, tag))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match reflect::generate(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.write_errors().into(),
    }
}
