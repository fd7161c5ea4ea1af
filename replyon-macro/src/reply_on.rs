use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, Attribute, ItemFn, LitBool, LitInt,
    LitStr, Path, Token,
};

struct ReplyOnArgs {
    exception: Path,
    status: LitInt,
    message: Option<LitStr>,
    description: Option<LitStr>,
    log: Option<LitBool>,
}

impl Parse for ReplyOnArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() || input.peek(LitInt) {
            return Err(input.error("#[reply_on] must name an exception type first"));
        }
        let exception: Path = input.parse()?;
        input.parse::<Token![,]>()?;

        let status: LitInt = input.parse()?;
        let code: u16 = status.base10_parse().map_err(|_| invalid_status(&status))?;
        if !(100..=599).contains(&code) {
            return Err(invalid_status(&status));
        }

        let mut message = None;
        let mut description = None;
        let mut log = None;

        while input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }

            let key: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            if key == "message" {
                message = Some(input.parse()?);
            } else if key == "description" {
                description = Some(input.parse()?);
            } else if key == "log" {
                log = Some(input.parse()?);
            } else {
                return Err(syn::Error::new_spanned(
                    key,
                    "unknown #[reply_on] option, expected `message`, `description` or `log`",
                ));
            }
        }

        if !input.is_empty() {
            return Err(input.error("unexpected tokens in #[reply_on]"));
        }

        Ok(ReplyOnArgs {
            exception,
            status,
            message,
            description,
            log,
        })
    }
}

fn invalid_status(status: &LitInt) -> syn::Error {
    syn::Error::new_spanned(status, "status code must be a value between 100 and 599")
}

fn is_reply_on(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "reply_on")
}

impl ReplyOnArgs {
    fn declaration(&self) -> TokenStream2 {
        let exception = &self.exception;
        let status = &self.status;

        let message = self
            .message
            .as_ref()
            .map(|message| quote! { .reply_message(#message) });
        let description = self
            .description
            .as_ref()
            .map(|description| quote! { .error_description(#description) });
        let log = self
            .log
            .as_ref()
            .map(|log| quote! { .log_exception(#log) });

        quote! {
            ::replyon::mapping::Mapping::on::<#exception>(#status)
                #message
                #description
                #log
        }
    }
}

pub fn reply_on_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let first = parse_macro_input!(attr as ReplyOnArgs);
    let mut input = parse_macro_input!(item as ItemFn);

    // The outermost attribute expands first and collects the ones stacked below it.
    let mut declared = vec![first];
    let mut kept = Vec::with_capacity(input.attrs.len());
    for attr in input.attrs.drain(..) {
        if is_reply_on(&attr) {
            match attr.parse_args::<ReplyOnArgs>() {
                Ok(args) => declared.push(args),
                Err(err) => return err.to_compile_error().into(),
            }
        } else {
            kept.push(attr);
        }
    }
    input.attrs = kept;

    let vis = &input.vis;
    let handler = &input.sig.ident;
    let mappings_fn = format_ident!("{}_reply_mappings", handler);
    let declarations = declared.iter().map(ReplyOnArgs::declaration);
    let doc = format!("Reply mappings declared on `{}`", handler);

    TokenStream::from(quote! {
        #input

        #[doc = #doc]
        #vis fn #mappings_fn() -> ::replyon::Result<::replyon::mapping::Mappings> {
            ::replyon::mapping::Mappings::builder()
                #(.declare(#declarations))*
                .build()
        }
    })
}
