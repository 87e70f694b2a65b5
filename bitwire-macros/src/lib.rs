use syn::parse_macro_input;

use crate::gen::bitfield_impl;

mod ast;
mod gen;

#[proc_macro]
pub fn bitfield(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
    bitfield_impl(parse_macro_input!(tokens)).into()
}
