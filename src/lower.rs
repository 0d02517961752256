//! Schema → IR: validation and name resolution.
use std::collections::HashSet;

use indexmap::IndexMap;
use syn::visit::{self, Visit};
use tracing::debug;

use crate::error::SchemaError;
use crate::ident;
use crate::ir::{self, Payload, Slot, Union, EMPTY_VALUE, FIXED_METHODS};
use crate::schema::{Document, UnionSpec, VariantSpec};

pub fn lower_document(doc: &Document) -> Result<ir::Document, SchemaError> {
    for module in &doc.modules {
        check_ident("module", module)?;
    }

    // generated type name → schema name, for duplicate detection
    let mut types: IndexMap<String, &str> = IndexMap::new();
    let mut unions = Vec::with_capacity(doc.unions.len());
    for spec in &doc.unions {
        let u = lower_union(spec)?;
        for name in [&u.type_name, &u.kind_name] {
            if types.insert(name.clone(), &spec.name).is_some() {
                return Err(SchemaError::DuplicateType { name: name.clone() });
            }
        }
        unions.push(u);
    }

    Ok(ir::Document {
        header: doc.header.clone(),
        modules: doc.modules.clone(),
        unions,
    })
}

pub fn lower_union(spec: &UnionSpec) -> Result<Union, SchemaError> {
    check_ident("union", &spec.name)?;
    let type_name = ident::type_name(&spec.name);
    // `SELF` → `Self`
    if ident::is_keyword(&type_name) {
        return Err(SchemaError::Keyword { what: "union", name: spec.name.clone() });
    }
    if !ident::is_identifier(&type_name) {
        return Err(SchemaError::InvalidIdentifier { what: "union", name: spec.name.clone() });
    }
    let kind_name = format!("{type_name}Kind");

    if spec.variants.is_empty() {
        return Err(SchemaError::EmptyUnion { union: spec.name.clone() });
    }

    let derives = lower_derives(spec)?;
    let cloneable = derives
        .iter()
        .any(|p| p.segments.last().is_some_and(|s| s.ident == "Clone"));

    let mut slots = Vec::with_capacity(spec.variants.len());
    for v in &spec.variants {
        slots.push(lower_slot(spec, v)?);
    }
    check_distinct_names(&spec.name, &slots)?;
    mark_from_impls(spec.from_impls, &mut slots);
    let members = lower_members(spec)?;

    let u = Union {
        schema_name: spec.name.clone(),
        type_name,
        kind_name,
        doc: spec.doc.clone(),
        derives,
        cloneable,
        slots,
        members,
    };
    check_method_collisions(&u)?;

    debug!(union = %u.type_name, slots = u.slots.len(), cloneable, "lowered union");
    Ok(u)
}

fn lower_slot(spec: &UnionSpec, v: &VariantSpec) -> Result<Slot, SchemaError> {
    check_ident("variant", &v.name)?;
    let stem = ident::method_stem(&v.name);
    let variant = ident::type_name(&v.name);
    if stem == EMPTY_VALUE {
        return Err(SchemaError::ReservedName { union: spec.name.clone(), name: v.name.clone() });
    }
    // casing can turn a legal name into a keyword (`Type` → `type`)
    if ident::is_keyword(&stem) || ident::is_keyword(&variant) {
        return Err(SchemaError::Keyword { what: "variant", name: v.name.clone() });
    }
    if !ident::is_identifier(&stem) || !ident::is_identifier(&variant) {
        return Err(SchemaError::InvalidIdentifier { what: "variant", name: v.name.clone() });
    }

    let payload = match v.payload() {
        None => Payload::Unit,
        Some(text) => {
            let ty = syn::parse_str::<syn::Type>(text).map_err(|e| SchemaError::InvalidPayloadType {
                union: spec.name.clone(),
                variant: v.name.clone(),
                ty: text.to_string(),
                message: e.to_string(),
            })?;
            if let Some(message) = borrowed_payload(&ty) {
                return Err(SchemaError::InvalidPayloadType {
                    union: spec.name.clone(),
                    variant: v.name.clone(),
                    ty: text.to_string(),
                    message,
                });
            }
            Payload::Typed { text: text.to_string(), ty }
        }
    };

    Ok(Slot {
        name: v.name.clone(),
        variant,
        stem,
        doc: v.doc.clone(),
        payload,
        emit_from: false,
    })
}

/// The container has no lifetime parameters, so payloads may only borrow for `'static`.
fn borrowed_payload(ty: &syn::Type) -> Option<String> {
    #[derive(Default)]
    struct Borrows(Option<String>);

    impl<'ast> Visit<'ast> for Borrows {
        fn visit_lifetime(&mut self, lt: &'ast syn::Lifetime) {
            if lt.ident != "static" && self.0.is_none() {
                self.0 = Some(format!("lifetime `{lt}` is not allowed; payloads must be `'static`"));
            }
        }

        fn visit_type_reference(&mut self, r: &'ast syn::TypeReference) {
            if r.lifetime.is_none() && self.0.is_none() {
                self.0 = Some("references need an explicit `'static` lifetime".to_string());
            }
            visit::visit_type_reference(self, r);
        }

        // elision inside `fn(&T)` and `Fn(&T)` is higher-ranked, not a borrow
        fn visit_type_bare_fn(&mut self, _: &'ast syn::TypeBareFn) {}
        fn visit_parenthesized_generic_arguments(&mut self, _: &'ast syn::ParenthesizedGenericArguments) {}
    }

    let mut borrows = Borrows::default();
    borrows.visit_type(ty);
    borrows.0
}

fn lower_members(spec: &UnionSpec) -> Result<Vec<syn::ImplItem>, SchemaError> {
    spec.members
        .iter()
        .enumerate()
        .map(|(index, src)| {
            syn::parse_str::<syn::ImplItem>(src).map_err(|e| SchemaError::InvalidMember {
                union: spec.name.clone(),
                index,
                message: e.to_string(),
            })
        })
        .collect()
}

fn lower_derives(spec: &UnionSpec) -> Result<Vec<syn::Path>, SchemaError> {
    let mut out = Vec::with_capacity(spec.derives.len());
    let mut seen = HashSet::new();
    for d in &spec.derives {
        let invalid = || SchemaError::InvalidDerive { union: spec.name.clone(), derive: d.clone() };
        let path = syn::parse_str::<syn::Path>(d).map_err(|_| invalid())?;
        // the empty state is always the default; a derived `Default` would fight it
        let last = path.segments.last().map(|s| s.ident.to_string());
        if last.as_deref() == Some("Default") || !seen.insert(d.trim().to_string()) {
            return Err(invalid());
        }
        out.push(path);
    }
    Ok(out)
}

fn check_ident(what: &'static str, name: &str) -> Result<(), SchemaError> {
    if ident::is_keyword(name) {
        return Err(SchemaError::Keyword { what, name: name.to_string() });
    }
    if !ident::is_identifier(name) {
        return Err(SchemaError::InvalidIdentifier { what, name: name.to_string() });
    }
    Ok(())
}

fn check_distinct_names(union: &str, slots: &[Slot]) -> Result<(), SchemaError> {
    let mut variants = HashSet::new();
    let mut stems = HashSet::new();
    for s in slots {
        if !variants.insert(s.variant.as_str()) || !stems.insert(s.stem.as_str()) {
            return Err(SchemaError::DuplicateVariant { union: union.to_string(), name: s.name.clone() });
        }
    }
    Ok(())
}

/// `From<T>` is only unambiguous when no other slot carries the same payload type.
fn mark_from_impls(enabled: bool, slots: &mut [Slot]) {
    if !enabled {
        return;
    }
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for s in slots.iter() {
        if let Payload::Typed { text, .. } = &s.payload {
            *counts.entry(normalize_type(text)).or_default() += 1;
        }
    }
    for s in slots.iter_mut() {
        if let Payload::Typed { text, .. } = &s.payload {
            s.emit_from = counts.get(&normalize_type(text)) == Some(&1);
        }
    }
}

fn normalize_type(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn check_method_collisions(u: &Union) -> Result<(), SchemaError> {
    let mut seen: HashSet<String> = FIXED_METHODS.iter().map(|m| m.to_string()).collect();
    for slot in &u.slots {
        for method in slot.methods(u.cloneable) {
            let name = slot.method_name(method);
            if !seen.insert(name.clone()) {
                return Err(SchemaError::MethodCollision { union: u.schema_name.clone(), method: name });
            }
        }
    }
    for member in &u.members {
        if let syn::ImplItem::Fn(f) = member {
            let name = f.sig.ident.to_string();
            if !seen.insert(name.clone()) {
                return Err(SchemaError::MethodCollision { union: u.schema_name.clone(), method: name });
            }
        }
    }
    Ok(())
}
