//! IR → Rust source.
//!
//! Every union becomes two items: a fieldless `<Name>Kind` discriminant enum and the
//! container enum itself, whose first variant is always `EmptyValue`. The operation set
//! is emitted as inherent methods, one group per slot, so every container exposes the
//! same surface regardless of its schema.
//!
//! Tokens are built with `quote`, parsed back with `syn` and pretty-printed; the license
//! header and the generated-file banner are prepended as plain comments afterwards.
use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};
use tracing::debug;

use crate::error::GenerateError;
use crate::ir::{self, Method, Payload, Slot, Union};

/// Knobs that only affect the banner, never the emitted items.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Shown in the banner as the file the code was generated from.
    pub source_name: Option<String>,
    /// Add a generation timestamp to the banner. Off by default so output is reproducible.
    pub timestamp: bool,
}

#[derive(Debug, Default)]
pub struct Codegen {
    options: Options,
    header: Vec<String>,
    modules: Vec<String>,
    items: TokenStream,
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Self { options, ..Self::default() }
    }

    /// Emits every union of the document, inside its module wrapping.
    pub fn emit_document(&mut self, doc: &ir::Document) {
        self.header = doc.header.clone();
        self.modules = doc.modules.clone();
        for u in &doc.unions {
            self.emit(u);
        }
    }

    pub fn emit(&mut self, u: &Union) {
        debug!(union = %u.type_name, "emitting union");
        self.items.extend(emit_kind(u));
        self.items.extend(emit_container(u));
    }

    pub fn into_string(self) -> Result<String, GenerateError> {
        let mut body = self.items;
        for module in self.modules.iter().rev() {
            let module = format_ident!("{}", module);
            body = quote! { pub mod #module { #body } };
        }
        let file: syn::File = syn::parse2(body)?;
        let code = prettyplease::unparse(&file);

        let mut out = String::new();
        if !self.header.is_empty() {
            // an entry may itself span several lines; each one needs its own `//`
            for line in self.header.iter().flat_map(|entry| header_lines(entry)) {
                if line.is_empty() {
                    out.push_str("//\n");
                } else {
                    out.push_str(&format!("// {line}\n"));
                }
            }
            out.push('\n');
        }
        match &self.options.source_name {
            Some(source) => out.push_str(&format!("// Code generated by union-gen from {source}. DO NOT EDIT.\n")),
            None => out.push_str("// Code generated by union-gen. DO NOT EDIT.\n"),
        }
        if self.options.timestamp {
            let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
            out.push_str(&format!("// Generated at {now}.\n"));
        }
        out.push('\n');
        out.push_str(&code);
        Ok(out)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DISCRIMINANT
// ————————————————————————————————————————————————————————————————————————————

fn emit_kind(u: &Union) -> TokenStream {
    let kind = format_ident!("{}", u.kind_name);
    let variants: Vec<Ident> = u.slots.iter().map(variant_ident).collect();
    let names: Vec<&str> = u.slots.iter().map(|s| s.stem.as_str()).collect();
    let docs: Vec<String> = u.slots.iter().map(|s| format!(" `{}` is active.", s.stem)).collect();
    let count = Literal::usize_unsuffixed(u.kind_count());
    let kind_doc = format!(" Discriminant of [`{}`]: which slot is active, or the empty state.", u.type_name);

    quote! {
        #[doc = #kind_doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum #kind {
            /// No payload.
            EmptyValue,
            #( #[doc = #docs] #variants, )*
        }

        impl #kind {
            /// Every discriminant, empty state first, then slots in declaration order.
            pub const ALL: [#kind; #count] = [#kind::EmptyValue, #( #kind::#variants, )*];

            /// The snake_case slot name.
            pub fn name(self) -> &'static str {
                match self {
                    #kind::EmptyValue => "empty_value",
                    #( #kind::#variants => #names, )*
                }
            }
        }

        impl ::core::fmt::Display for #kind {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.name())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CONTAINER
// ————————————————————————————————————————————————————————————————————————————

fn emit_container(u: &Union) -> TokenStream {
    let ty = format_ident!("{}", u.type_name);
    let kind = format_ident!("{}", u.kind_name);
    let doc = match &u.doc {
        Some(doc) => format!(" {doc}"),
        None => format!(" Tagged union over the `{}` slots.", u.schema_name),
    };
    let derives = &u.derives;
    let derive_attr = if derives.is_empty() {
        TokenStream::new()
    } else {
        quote! { #[derive(#(#derives),*)] }
    };

    let variant_defs = u.slots.iter().map(|s| {
        let v = variant_ident(s);
        let doc = match &s.doc {
            Some(doc) => format!(" {doc}"),
            None => format!(" Slot `{}`.", s.stem),
        };
        match &s.payload {
            Payload::Unit => quote! { #[doc = #doc] #v },
            Payload::Typed { ty, .. } => quote! { #[doc = #doc] #v(#ty) },
        }
    });

    let kind_arms = u.slots.iter().map(|s| {
        let v = variant_ident(s);
        if s.is_unit() {
            quote! { #ty::#v => #kind::#v, }
        } else {
            quote! { #ty::#v(_) => #kind::#v, }
        }
    });

    let assign_cloned = if u.cloneable {
        quote! {
            /// Copy-assignment. The source is cloned before the current payload is dropped,
            /// so `self` is left untouched if the clone panics.
            pub fn assign_cloned(&mut self, source: &Self) {
                let copy = ::core::clone::Clone::clone(source);
                *self = copy;
            }
        }
    } else {
        TokenStream::new()
    };

    let slot_methods = u.slots.iter().map(|s| emit_slot_methods(u, s));
    let members = &u.members;
    let from_impls = u.slots.iter().filter(|s| s.emit_from).map(|s| {
        let v = variant_ident(s);
        let payload = payload_ty(s);
        quote! {
            impl ::core::convert::From<#payload> for #ty {
                fn from(value: #payload) -> Self {
                    #ty::#v(value)
                }
            }
        }
    });

    quote! {
        #[doc = #doc]
        #derive_attr
        pub enum #ty {
            /// No payload. The state every container starts in.
            EmptyValue,
            #( #variant_defs, )*
        }

        impl ::core::default::Default for #ty {
            fn default() -> Self {
                #ty::EmptyValue
            }
        }

        #[allow(clippy::clone_on_copy)]
        impl #ty {
            /// Returns which slot is active, or the empty state.
            pub fn kind(&self) -> #kind {
                match self {
                    #ty::EmptyValue => #kind::EmptyValue,
                    #( #kind_arms )*
                }
            }

            /// Creates an empty container.
            pub fn empty_value() -> Self {
                #ty::EmptyValue
            }

            pub fn is_empty_value(&self) -> bool {
                ::core::matches!(self, #ty::EmptyValue)
            }

            /// Drops the active payload, if any, and resets to the empty state.
            pub fn clear(&mut self) {
                *self = #ty::EmptyValue;
            }

            /// Moves the payload out into a new container, leaving `self` empty.
            pub fn take(&mut self) -> Self {
                ::core::mem::take(self)
            }

            /// Move-assignment: drops the current payload and takes over `source`'s,
            /// leaving `source` empty.
            pub fn assign(&mut self, source: &mut Self) {
                *self = source.take();
            }

            #assign_cloned

            pub fn swap(&mut self, other: &mut Self) {
                ::core::mem::swap(self, other);
            }

            #( #slot_methods )*

            #( #members )*
        }

        #( #from_impls )*
    }
}

fn emit_slot_methods(u: &Union, s: &Slot) -> TokenStream {
    let ty = format_ident!("{}", u.type_name);
    let v = variant_ident(s);
    let stem = &s.stem;
    let name = |m: Method| format_ident!("{}", s.method_name(m));

    let ctor = name(Method::Ctor);
    let is = name(Method::Is);
    let set = name(Method::Set);

    let Payload::Typed { ty: payload, .. } = &s.payload else {
        let ctor_doc = format!(" Creates a container with `{stem}` active.");
        let set_doc = format!(" Drops the active payload, if any, and makes `{stem}` active.");
        return quote! {
            #[doc = #ctor_doc]
            pub fn #ctor() -> Self {
                #ty::#v
            }

            pub fn #is(&self) -> bool {
                ::core::matches!(self, #ty::#v)
            }

            #[doc = #set_doc]
            pub fn #set(&mut self) {
                *self = #ty::#v;
            }
        };
    };

    let as_ = name(Method::As);
    let as_mut = name(Method::AsMut);
    let into = name(Method::Into);
    let visit = name(Method::Visit);
    let visit_mut = name(Method::VisitMut);
    let or = name(Method::Or);
    let or_mut = name(Method::OrMut);

    let ctor_doc = format!(" Creates a container holding `value` in `{stem}`.");
    let visit_doc = format!(" Calls `visitor` with the payload if `{stem}` is active; otherwise does nothing.");
    let or_doc = format!(" The `{stem}` payload if active, otherwise `default`.");
    let into_doc = format!(" Unwraps the `{stem}` payload, or hands the container back unchanged.");

    let cloned = if u.cloneable {
        let ctor_cloned = name(Method::CtorCloned);
        let get = name(Method::Get);
        let get_or = name(Method::GetOr);
        let set_cloned = name(Method::SetCloned);
        let get_doc = format!(
            " Copies the `{stem}` payload into `out` and returns `true` if active; \
             otherwise returns `false` and leaves `out` untouched."
        );
        quote! {
            pub fn #ctor_cloned(value: &#payload) -> Self {
                #ty::#v(::core::clone::Clone::clone(value))
            }

            #[doc = #get_doc]
            pub fn #get(&self, out: &mut #payload) -> bool {
                match self {
                    #ty::#v(value) => {
                        ::core::clone::Clone::clone_from(out, value);
                        true
                    }
                    _ => false,
                }
            }

            #[doc = #or_doc]
            pub fn #get_or(&self, default: #payload) -> #payload {
                match self {
                    #ty::#v(value) => ::core::clone::Clone::clone(value),
                    _ => default,
                }
            }

            /// Clones `value` first, then replaces the active payload with it.
            pub fn #set_cloned(&mut self, value: &#payload) {
                let copy = ::core::clone::Clone::clone(value);
                *self = #ty::#v(copy);
            }
        }
    } else {
        TokenStream::new()
    };

    quote! {
        #[doc = #ctor_doc]
        pub fn #ctor(value: #payload) -> Self {
            #ty::#v(value)
        }

        pub fn #is(&self) -> bool {
            ::core::matches!(self, #ty::#v(_))
        }

        pub fn #as_(&self) -> ::core::option::Option<&#payload> {
            match self {
                #ty::#v(value) => ::core::option::Option::Some(value),
                _ => ::core::option::Option::None,
            }
        }

        pub fn #as_mut(&mut self) -> ::core::option::Option<&mut #payload> {
            match self {
                #ty::#v(value) => ::core::option::Option::Some(value),
                _ => ::core::option::Option::None,
            }
        }

        #[doc = #into_doc]
        pub fn #into(self) -> ::core::result::Result<#payload, Self> {
            match self {
                #ty::#v(value) => ::core::result::Result::Ok(value),
                other => ::core::result::Result::Err(other),
            }
        }

        #[doc = #visit_doc]
        pub fn #visit<F: ::core::ops::FnOnce(&#payload)>(&self, visitor: F) {
            if let #ty::#v(value) = self {
                visitor(value);
            }
        }

        pub fn #visit_mut<F: ::core::ops::FnOnce(&mut #payload)>(&mut self, visitor: F) {
            if let #ty::#v(value) = self {
                visitor(value);
            }
        }

        #[doc = #or_doc]
        pub fn #or<'a>(&'a self, default: &'a #payload) -> &'a #payload {
            match self {
                #ty::#v(value) => value,
                _ => default,
            }
        }

        pub fn #or_mut<'a>(&'a mut self, default: &'a mut #payload) -> &'a mut #payload {
            match self {
                #ty::#v(value) => value,
                _ => default,
            }
        }

        /// Drops the active payload, if any, and stores `value`.
        pub fn #set(&mut self, value: #payload) {
            *self = #ty::#v(value);
        }

        #cloned
    }
}

fn header_lines(entry: &str) -> Vec<&str> {
    if entry.is_empty() {
        return vec![""];
    }
    entry.lines().map(str::trim_end).collect()
}

fn variant_ident(s: &Slot) -> Ident {
    format_ident!("{}", s.variant)
}

fn payload_ty(s: &Slot) -> &syn::Type {
    match &s.payload {
        Payload::Typed { ty, .. } => ty,
        Payload::Unit => unreachable!("From impls are only marked for typed slots"),
    }
}
