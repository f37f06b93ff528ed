use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, format_ident, quote, quote_spanned};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Error, Expr, Ident, Item, LitStr, Token, parse_quote};

/// Expands the `#[with_features(...)]` attribute macro.
#[must_use]
pub fn expand_with_features(args: FeatureArgs, input: Item) -> TokenStream {
    match featureflag_test_path() {
        Ok(path) => expand_with_path(args, input, &path),
        Err(err) => err.to_compile_error(),
    }
}

/// Resolves the path of `featureflag-test` as the calling crate names it.
fn featureflag_test_path() -> syn::Result<TokenStream> {
    crate_name("featureflag-test").map(found_crate_path).map_err(|err| {
        Error::new(Span::call_site(), format!("The #[with_features] attribute requires `featureflag-test`: {err}"))
    })
}

fn found_crate_path(found: FoundCrate) -> TokenStream {
    match found {
        FoundCrate::Itself => quote! { crate },
        FoundCrate::Name(name) => {
            let name = format_ident!("{name}");
            quote! { ::#name }
        }
    }
}

fn expand_with_path(args: FeatureArgs, input: Item, featureflag_test: &TokenStream) -> TokenStream {
    let Item::Fn(mut input) = input else {
        return Error::new_spanned(&input, "The #[with_features] attribute can only be used on functions and methods")
            .to_compile_error();
    };

    let features = args.features.iter().map(|FeatureArg { name, value }| {
        let span = name.span();
        let name = name.to_lit_str();
        let value = value.as_ref().map_or_else(|| quote_spanned! {span=> true }, ToTokens::to_token_stream);
        quote_spanned! {span=> __evaluator.set_feature(#name, #value); }
    });

    input.block.stmts.insert(
        0,
        parse_quote! {
            let __featureflag_guard = {
                let __evaluator = #featureflag_test::TestEvaluator::new();
                #( #features )*
                __evaluator.install()
            };
        },
    );

    input.into_token_stream()
}

pub struct FeatureArgs {
    features: Punctuated<FeatureArg, Token![,]>,
}

impl Parse for FeatureArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Ok(Self { features: Punctuated::parse_terminated(input)? })
    }
}

struct FeatureArg {
    name: FeatureName,
    value: Option<Expr>,
}

impl Parse for FeatureArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = input.parse()?;
        let value = if input.parse::<Option<Token![=]>>()?.is_some() { Some(input.parse()?) } else { None };
        Ok(Self { name, value })
    }
}

enum FeatureName {
    Ident(Ident),
    LitStr(LitStr),
}

impl FeatureName {
    fn span(&self) -> Span {
        match self {
            Self::Ident(ident) => ident.span(),
            Self::LitStr(lit) => lit.span(),
        }
    }

    fn to_lit_str(&self) -> LitStr {
        match self {
            Self::Ident(ident) => {
                let name = ident.to_string();
                LitStr::new(name.strip_prefix("r#").unwrap_or(&name), ident.span())
            }
            Self::LitStr(lit) => lit.clone(),
        }
    }
}

impl Parse for FeatureName {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let lookahead = input.lookahead1();
        if lookahead.peek(Ident) {
            Ok(Self::Ident(input.parse()?))
        } else if lookahead.peek(LitStr) {
            Ok(Self::LitStr(input.parse()?))
        } else {
            Err(lookahead.error())
        }
    }
}
