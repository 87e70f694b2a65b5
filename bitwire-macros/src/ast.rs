use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{braced, parenthesized, token, Attribute, Ident, Path, Result, Token, Type, Visibility};

pub struct Input {
    _paren_token: token::Paren,
    pub crate_path: Path,
    _comma_token: Token![,],
    pub structs: Vec<Struct>,
}

impl Parse for Input {
    fn parse(input: ParseStream) -> Result<Self> {
        let content;
        Ok(Input {
            _paren_token: parenthesized!(content in input),
            crate_path: content.parse()?,
            _comma_token: content.parse()?,
            structs: {
                let mut structs = Vec::new();
                while !content.is_empty() {
                    structs.push(content.parse()?);
                }
                structs
            },
        })
    }
}

pub struct Struct {
    pub attrs: Vec<Attribute>,
    pub visibility: Visibility,
    _struct_token: Token![struct],
    pub name: Ident,
    _brace_token: token::Brace,
    pub members: Punctuated<Member, Token![,]>,
}

impl Parse for Struct {
    fn parse(input: ParseStream) -> Result<Self> {
        let body;
        Ok(Self {
            attrs: input.call(Attribute::parse_outer)?,
            visibility: input.parse()?,
            _struct_token: input.parse()?,
            name: input.parse()?,
            _brace_token: braced!(body in input),
            members: body.parse_terminated(Member::parse, Token![,])?,
        })
    }
}

pub struct Member {
    pub attrs: Vec<Attribute>,
    pub visibility: Visibility,
    pub name: Ident,
    _colon_token: Token![:],
    pub type_: Type,
}

impl Parse for Member {
    fn parse(input: ParseStream) -> Result<Self> {
        Ok(Self {
            attrs: input.call(Attribute::parse_outer)?,
            visibility: input.parse()?,
            name: input.parse()?,
            _colon_token: input.parse()?,
            type_: input.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    #[test]
    fn struct_empty() {
        let input = quote! { struct Foo {} };
        let Struct {
            attrs,
            visibility,
            name,
            members,
            ..
        } = syn::parse2(input).unwrap();
        assert!(attrs.is_empty());
        assert_eq!(quote! { #visibility }.to_string(), "");
        assert_eq!(name.to_string(), "Foo");
        assert_eq!(members.len(), 0);
    }

    #[test]
    fn struct_everything() {
        let input = quote! {
            /// this has a doc comment
            pub(crate) struct Bar {
                first: FixedInt<4, u8>,
                second: FixedInt<4, u8>,
            }
        };
        let Struct {
            attrs,
            visibility,
            name,
            members,
            ..
        } = syn::parse2(input).unwrap();
        assert_eq!(attrs.len(), 1);
        let attr = &attrs[0];
        assert_eq!(
            quote! { #attr }.to_string(),
            "# [doc = r\" this has a doc comment\"]",
        );
        assert_eq!(quote! { #visibility }.to_string(), "pub (crate)");
        assert_eq!(name.to_string(), "Bar");
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn member_default() {
        let input = quote! { my_member: FixedInt<5, u8> };
        let Member {
            attrs,
            visibility: Visibility::Inherited,
            name,
            type_,
            ..
        } = syn::parse2(input).unwrap() else { panic!() };
        assert!(attrs.is_empty());
        assert_eq!(name.to_string(), "my_member");
        assert_eq!(quote! { #type_ }.to_string(), "FixedInt < 5 , u8 >");
    }

    #[test]
    fn member_everything() {
        let input = quote! {
            #[doc = "nested"]
            pub(crate) my_member: path::to::Bar
        };
        let Member {
            attrs,
            visibility,
            name,
            type_,
            ..
        } = syn::parse2(input).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(quote! { #visibility }.to_string(), "pub (crate)");
        assert_eq!(name.to_string(), "my_member");
        assert_eq!(quote! { #type_ }.to_string(), "path :: to :: Bar");
    }

    #[test]
    fn member_missing_type() {
        let input = quote! { my_member: };
        assert!(syn::parse2::<Member>(input).is_err());
    }
}
