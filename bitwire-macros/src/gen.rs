use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{Error, Path, Result};

use crate::ast::{self, Input};

struct Config {
    crate_path: Path,
}

pub fn bitfield_impl(input: Input) -> TokenStream {
    let cfg = Config {
        crate_path: input.crate_path,
    };
    let results: Vec<_> = input
        .structs
        .into_iter()
        .map(|struct_| generate_struct(&cfg, struct_))
        .collect();
    quote! { #(#results)* }
}

fn generate_struct(cfg: &Config, input: ast::Struct) -> TokenStream {
    let cloned_name = input.name.clone();
    match generate_struct_impl(cfg, input) {
        Ok(result) => result,
        Err(e) => {
            let compile_error = e.into_compile_error();
            quote! {
                #compile_error
                struct #cloned_name {}
            }
        }
    }
}

fn generate_struct_impl(cfg: &Config, input: ast::Struct) -> Result<TokenStream> {
    if input.members.len() < 2 {
        return Err(Error::new(
            input.name.span(),
            format!(
                "a bitfield needs at least two members; found {}",
                input.members.len(),
            ),
        ));
    }

    let crate_path = &cfg.crate_path;
    let bitfield_mod: Path = syn::parse_quote! { #crate_path::bitfield };
    let storage: Path = syn::parse_quote! { #crate_path::storage::Storage };
    let error: Path = syn::parse_quote! { #crate_path::Error };

    let attrs = input.attrs;
    let visibility = input.visibility;
    let name = input.name;
    let count = Literal::usize_unsuffixed(input.members.len());

    let mut member_attrs = Vec::new();
    let mut member_visibilities = Vec::new();
    let mut member_names = Vec::new();
    let mut member_types = Vec::new();
    let mut indices = Vec::new();
    for (index, member) in input.members.into_iter().enumerate() {
        member_attrs.push(member.attrs);
        member_visibilities.push(member.visibility);
        member_names.push(member.name);
        member_types.push(member.type_);
        indices.push(Literal::usize_unsuffixed(index));
    }

    let widths = quote! {
        [#(<#member_types as #crate_path::FixedLength>::BIT_LENGTH),*]
    };

    Ok(quote! {
        #(#attrs)*
        #visibility struct #name {
            #(
                #(#member_attrs)*
                #member_visibilities #member_names: #member_types,
            )*
        }

        impl #bitfield_mod::Members for #name {
            const COUNT: usize = #count;
            const BIT_LENGTH: usize = #bitfield_mod::total_bits(&#widths);
            const OFFSETS: &'static [usize] = &#bitfield_mod::prefix_offsets(#widths);

            fn read_members<S: #storage>(
                &mut self,
                aggregate: &S,
            ) -> ::core::result::Result<(), #error> {
                #(
                    #bitfield_mod::read_member(
                        &mut self.#member_names,
                        aggregate,
                        Self::OFFSETS[#indices],
                    )?;
                )*
                ::core::result::Result::Ok(())
            }

            fn read_members_unchecked<S: #storage>(&mut self, aggregate: &S) {
                #(
                    #bitfield_mod::read_member_unchecked(
                        &mut self.#member_names,
                        aggregate,
                        Self::OFFSETS[#indices],
                    );
                )*
            }

            fn write_members<S: #storage>(&self) -> ::core::result::Result<S, #error> {
                let aggregate = <S as #storage>::zeroed();
                #(
                    let aggregate = #bitfield_mod::write_member(
                        &self.#member_names,
                        aggregate,
                        Self::OFFSETS[#indices],
                    )?;
                )*
                ::core::result::Result::Ok(aggregate)
            }

            fn write_members_unchecked<S: #storage>(&self) -> S {
                let aggregate = <S as #storage>::zeroed();
                #(
                    let aggregate = #bitfield_mod::write_member_unchecked(
                        &self.#member_names,
                        aggregate,
                        Self::OFFSETS[#indices],
                    );
                )*
                aggregate
            }

            fn members_valid(&self) -> bool {
                let mut valid = true;
                #( valid &= #crate_path::Field::valid(&self.#member_names); )*
                valid
            }

            fn refresh_members(&mut self) -> bool {
                let mut changed = false;
                #( changed |= #crate_path::Field::refresh(&mut self.#member_names); )*
                changed
            }
        }

        #(
            impl #bitfield_mod::MemberAt<#indices> for #name {
                type Member = #member_types;

                fn member(&self) -> &#member_types {
                    &self.#member_names
                }

                fn member_mut(&mut self) -> &mut #member_types {
                    &mut self.#member_names
                }
            }
        )*
    })
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    fn generate(tokens: TokenStream) -> String {
        bitfield_impl(syn::parse2(tokens).unwrap()).to_string()
    }

    #[test]
    fn emits_struct_and_impls() {
        let output = generate(quote! {(
            ::bitwire,

            #[derive(Default)]
            pub struct Header {
                pub version: FixedInt<3, u8>,
                length: FixedInt<13, u16>,
            }
        )});
        assert!(output.contains("pub struct Header"));
        assert!(output.contains("impl :: bitwire :: bitfield :: Members for Header"));
        assert!(output.contains("impl :: bitwire :: bitfield :: MemberAt < 0 > for Header"));
        assert!(output.contains("impl :: bitwire :: bitfield :: MemberAt < 1 > for Header"));
        assert!(!output.contains("MemberAt < 2 >"));
        assert!(!output.contains("compile_error"));
    }

    #[test]
    fn rejects_single_member() {
        let output = generate(quote! {(
            ::bitwire,

            struct Lonely {
                only: FixedInt<8, u8>,
            }
        )});
        assert!(output.contains("compile_error"));
        assert!(output.contains("at least two members"));
        assert!(output.contains("struct Lonely"));
    }

    #[test]
    fn rejects_empty() {
        let output = generate(quote! {(
            ::bitwire,

            struct Empty {}
        )});
        assert!(output.contains("compile_error"));
    }
}
