use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    Attribute,
    Data,
    DeriveInput,
    Expr,
    Fields,
    Ident,
    Result,
};

/// The tags of the `error` attribute.
#[derive(Debug, Default)]
struct ErrorTags {
    message: Option<Expr>,
    labels: Option<Expr>,
    help: Option<Expr>,
}

impl ErrorTags {
    /// Reads the tags from the first `#[error(...)]` attribute of the item.
    fn from_attributes(attributes: &[Attribute]) -> Result<Self> {
        let mut tags = Self::default();
        let Some(attr) = attributes.iter().find(|attr| attr.path().is_ident("error")) else {
            return Ok(tags);
        };

        attr.parse_nested_meta(|meta| {
            let slot = if meta.path.is_ident("message") {
                &mut tags.message
            } else if meta.path.is_ident("labels") {
                &mut tags.labels
            } else if meta.path.is_ident("help") {
                &mut tags.help
            } else {
                let name = meta.path.get_ident().map(Ident::to_string).unwrap_or_default();
                return Err(meta.error(format!("unknown tag `{}`", name)));
            };
            *slot = Some(meta.value()?.parse()?);
            Ok(())
        })?;

        Ok(tags)
    }
}

/// Binds every named field of `self` to a local variable of the same name, so that tag
/// expressions can refer to the fields directly.
fn bind_fields(name: &Ident, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(named) => {
            let idents = named.named.iter().filter_map(|field| field.ident.as_ref());
            quote! { let #name { #(#idents),* } = self; }
        },
        Fields::Unnamed(_) => quote_spanned! {
            name.span() => compile_error!("`ErrorKind` cannot be derived for tuple structs");
        },
        Fields::Unit => TokenStream2::new(),
    }
}

/// A struct deriving `ErrorKind`.
#[derive(Debug)]
pub struct ErrorKindTarget {
    pub name: Ident,
    fields: Fields,
    tags: ErrorTags,
}

impl Parse for ErrorKindTarget {
    fn parse(input: ParseStream) -> Result<Self> {
        let item = input.parse::<DeriveInput>()?;
        let Data::Struct(data) = item.data else {
            return Err(syn::Error::new_spanned(&item.ident, "`ErrorKind` can only be derived for structs"));
        };

        let tags = ErrorTags::from_attributes(&item.attrs)?;
        if tags.message.is_none() {
            return Err(syn::Error::new_spanned(&item.ident, "missing `message` in `#[error(...)]`"));
        }

        Ok(Self {
            name: item.ident,
            fields: data.fields,
            tags,
        })
    }
}

impl ToTokens for ErrorKindTarget {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        let bindings = bind_fields(&self.name, &self.fields);
        let message = &self.tags.message;
        let labels = match &self.tags.labels {
            Some(labels) => quote! { #labels },
            None => quote! { std::iter::empty::<&str>() },
        };
        let help = self.tags.help.as_ref().map(|help| quote! { report.set_help(#help); });

        tokens.extend(quote! {
            #[allow(unused_variables)]
            fn message(&self) -> String {
                #bindings
                (#message).to_string()
            }

            #[allow(unused_variables)]
            fn build_report<'a>(
                &self,
                src_id: &'a str,
                spans: &[std::ops::Range<usize>],
            ) -> ariadne::Report<(&'a str, std::ops::Range<usize>)> {
                #bindings

                let labels = #labels
                    .into_iter()
                    .zip(spans)
                    .map(|(text, span)| {
                        let label = ariadne::Label::new((src_id, span.clone())).with_color(isr_error::EXPR);
                        if text.is_empty() { label } else { label.with_message(text) }
                    })
                    .collect::<Vec<_>>();

                let start = spans.first().map_or(0, |span| span.start);
                let mut report = ariadne::Report::build(ariadne::ReportKind::Error, src_id, start)
                    .with_message(self.message())
                    .with_labels(labels);
                #help
                report.finish()
            }
        });
    }
}
