use {
    darling::{
        ast::{Data, Fields},
        util::Ignored,
        Error, FromDeriveInput, FromField, Result,
    },
    proc_macro2::TokenStream,
    syn::{
        parse_quote, Attribute, DeriveInput, Generics, Ident, LitStr, Member, Path, Type,
        Visibility,
    },
};

#[derive(FromField)]
#[darling(attributes(tagwire), forward_attrs(tag))]
pub(crate) struct Field {
    pub(crate) ident: Option<Ident>,
    pub(crate) ty: Type,
    pub(crate) vis: Visibility,
    /// The `#[tag(...)]` attributes, parsed by [`Field::tags`].
    pub(crate) attrs: Vec<Attribute>,

    /// Walk the fields of this record inline, as if declared in the parent.
    ///
    /// For example:
    /// ```ignore
    /// struct Line {
    ///     #[tagwire(flatten)]
    ///     header: Header,
    ///     #[tag(fixed = "8,0,r")]
    ///     amount: u64,
    /// }
    /// ```
    #[darling(default)]
    pub(crate) flatten: bool,
    /// Leave the field out of reflection entirely.
    #[darling(default)]
    pub(crate) skip: bool,
}

impl Field {
    /// Get the identifier for a struct member.
    ///
    /// If the field has a named identifier, return it.
    /// Otherwise (tuple struct), return an anonymous identifier with the given index.
    pub(crate) fn struct_member_ident(&self, index: usize) -> Member {
        if let Some(ident) = &self.ident {
            ident.clone().into()
        } else {
            index.into()
        }
    }

    /// Like [`Self::struct_member_ident`], but return a `String`.
    pub(crate) fn struct_member_ident_to_string(&self, index: usize) -> String {
        if let Some(ident) = &self.ident {
            ident.to_string()
        } else {
            index.to_string()
        }
    }

    pub(crate) fn is_exported(&self) -> bool {
        !matches!(self.vis, Visibility::Inherited)
    }

    /// Collect `key = "value"` pairs from every `#[tag(...)]` attribute.
    ///
    /// A key given twice keeps its first value.
    pub(crate) fn tags(&self) -> Result<Vec<(String, LitStr)>> {
        let mut tags: Vec<(String, LitStr)> = Vec::new();
        for attr in &self.attrs {
            attr.parse_nested_meta(|meta| {
                let Some(key) = meta.path.get_ident() else {
                    return Err(meta.error("tag names must be plain identifiers"));
                };
                let key = key.to_string();
                let value: LitStr = meta.value()?.parse()?;
                if !tags.iter().any(|(k, _)| *k == key) {
                    tags.push((key, value));
                }
                Ok(())
            })?;
        }
        Ok(tags)
    }
}

pub(crate) type ImplBody = Data<Ignored, Field>;

#[derive(FromDeriveInput)]
#[darling(attributes(tagwire), supports(struct_any))]
pub(crate) struct ReflectArgs {
    pub(crate) ident: Ident,
    pub(crate) generics: Generics,
    pub(crate) data: ImplBody,
    pub(crate) vis: Visibility,

    /// Used to determine the `tagwire` path.
    ///
    /// If `internal` is `true`, the generated code will use the `crate::` path.
    /// Otherwise, it will use the `tagwire` path.
    #[darling(default)]
    pub(crate) internal: bool,
    /// Route encoding through the type's `Marshal` implementation.
    #[darling(default)]
    pub(crate) marshal: bool,
    /// Route decoding through the type's `Unmarshal` implementation.
    #[darling(default)]
    pub(crate) unmarshal: bool,
}

impl ReflectArgs {
    pub(crate) fn fields(&self) -> Result<&Fields<Field>> {
        match &self.data {
            Data::Struct(fields) => Ok(fields),
            Data::Enum(_) => Err(Error::unsupported_shape("enum")),
        }
    }
}

/// Get the path to `tagwire` based on the `internal` flag.
pub(crate) fn get_crate_name(args: &ReflectArgs) -> Path {
    if args.internal {
        parse_quote!(crate)
    } else {
        parse_quote!(::tagwire)
    }
}

/// Reject deriving on `#[repr(packed)]` types; their fields cannot be borrowed.
pub(crate) fn ensure_not_repr_packed(input: &DeriveInput, trait_name: &str) -> Result<()> {
    for attr in &input.attrs {
        if !attr.path().is_ident("repr") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("packed") {
                return Err(meta.error(format!(
                    "`{trait_name}` cannot be derived for types annotated with `#[repr(packed)]` \
                     or `#[repr(packed(n))]`"
                )));
            }

            // Parse left over input for `align(n)`
            let _ = meta.input.parse::<TokenStream>();

            Ok(())
        })?;
    }
    Ok(())
}
