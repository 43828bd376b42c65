use {
    crate::common::{ensure_not_repr_packed, get_crate_name, Field, ReflectArgs},
    darling::{ast::Fields, Error, FromDeriveInput, Result},
    proc_macro2::TokenStream,
    quote::quote,
    syn::{parse_quote, DeriveInput, Generics, Path},
};

/// One reflected field: its position among reflected fields, and the member
/// it reads.
struct Reflected<'a> {
    index: usize,
    member: syn::Member,
    name: String,
    field: &'a Field,
}

fn reflected(fields: &Fields<Field>) -> Vec<Reflected<'_>> {
    fields
        .iter()
        .enumerate()
        .filter(|(_, field)| !field.skip)
        .enumerate()
        .map(|(index, (position, field))| Reflected {
            index,
            member: field.struct_member_ident(position),
            name: field.struct_member_ident_to_string(position),
            field,
        })
        .collect()
}

fn impl_fields(crate_name: &Path, fields: &[Reflected<'_>]) -> Result<TokenStream> {
    let mut errors = Error::accumulator();
    let infos = fields
        .iter()
        .filter_map(|r| {
            let tags = errors.handle(r.field.tags())?;
            let (keys, values): (Vec<_>, Vec<_>) = tags.into_iter().unzip();
            let Reflected { index, name, .. } = r;
            let ty = &r.field.ty;
            let exported = r.field.is_exported();
            let embedded = r.field.flatten;
            Some(quote! {
                #crate_name::reflect::FieldInfo {
                    index: #index,
                    name: #name,
                    exported: #exported,
                    embedded: #embedded,
                    tags: &[#( (#keys, #values) ),*],
                    shape: <#ty as #crate_name::reflect::Reflect>::type_shape,
                }
            })
        })
        .collect::<Vec<_>>();
    errors.finish()?;

    Ok(quote! {
        ::std::vec![#(#infos),*]
    })
}

/// Add `Reflect` bounds for generic field types.
fn bounded_generics(generics: &Generics, crate_name: &Path, fields: &[Reflected<'_>]) -> Generics {
    let mut generics = generics.clone();
    if generics.type_params().next().is_none() {
        return generics;
    }
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!('static));
    }
    let where_clause = generics.make_where_clause();
    for r in fields {
        let ty = &r.field.ty;
        where_clause
            .predicates
            .push(parse_quote!(#ty: #crate_name::reflect::Reflect));
    }
    generics
}

pub(crate) fn generate(input: DeriveInput) -> Result<TokenStream> {
    ensure_not_repr_packed(&input, "Reflect")?;
    let args = ReflectArgs::from_derive_input(&input)?;
    let fields = reflected(args.fields()?);
    let crate_name = get_crate_name(&args);
    let generics = bounded_generics(&args.generics, &crate_name, &fields);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let ident = &args.ident;
    let name = ident.to_string();
    let exported = !matches!(args.vis, syn::Visibility::Inherited);

    let marshal = args.marshal.then(|| {
        quote! { .with_marshal(#crate_name::reflect::__private::marshal_thunk::<Self>) }
    });
    let unmarshal = args.unmarshal.then(|| {
        quote! { .with_unmarshal(#crate_name::reflect::__private::unmarshal_thunk::<Self>) }
    });

    let fields_impl = impl_fields(&crate_name, &fields)?;
    let index = fields.iter().map(|r| r.index).collect::<Vec<_>>();
    let member = fields.iter().map(|r| &r.member).collect::<Vec<_>>();

    let reflect = quote!(#crate_name::reflect);

    Ok(quote! {
        impl #impl_generics #reflect::Reflect for #ident #ty_generics #where_clause {
            fn type_shape() -> #reflect::Shape {
                #reflect::Shape::of::<Self>(
                    #name,
                    #reflect::Kind::Record(<Self as #reflect::Record>::fields),
                )
                .with_exported(#exported)
                #marshal
                #unmarshal
            }

            #[inline]
            fn shape(&self) -> #reflect::Shape {
                <Self as #reflect::Reflect>::type_shape()
            }

            #[inline]
            fn reflect_ref(&self) -> #reflect::ReflectRef<'_> {
                #reflect::ReflectRef::Record(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect::ReflectMut<'_> {
                #reflect::ReflectMut::Record(self)
            }
        }

        impl #impl_generics #reflect::Record for #ident #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<#reflect::FieldInfo> {
                #fields_impl
            }

            #[allow(clippy::match_single_binding)]
            fn field(&self, index: usize) -> ::core::option::Option<&dyn #reflect::Reflect> {
                match index {
                    #( #index => ::core::option::Option::Some(&self.#member as &dyn #reflect::Reflect), )*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(clippy::match_single_binding)]
            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<&mut dyn #reflect::Reflect> {
                match index {
                    #( #index => ::core::option::Option::Some(&mut self.#member as &mut dyn #reflect::Reflect), )*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}
