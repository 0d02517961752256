// Strongly-typed IR for codegen. Everything here has already been validated by `lower`.

/// Methods every container has regardless of its slots.
pub const FIXED_METHODS: &[&str] = &[
    "kind",
    "empty_value",
    "is_empty_value",
    "clear",
    "take",
    "assign",
    "assign_cloned",
    "swap",
];

/// Name of the implicit empty variant, in schema spelling.
pub const EMPTY_VALUE: &str = "empty_value";

#[derive(Debug, Clone)]
pub struct Document {
    pub header: Vec<String>,
    pub modules: Vec<String>,
    pub unions: Vec<Union>,
}

#[derive(Debug, Clone)]
pub struct Union {
    pub schema_name: String,   // as written in the schema
    pub type_name: String,     // `JsonValue`
    pub kind_name: String,     // `JsonValueKind`
    pub doc: Option<String>,
    pub derives: Vec<syn::Path>,
    pub cloneable: bool,       // `Clone` is among the derives
    pub slots: Vec<Slot>,      // schema order == discriminant order (after empty)
    pub members: Vec<syn::ImplItem>,
}

#[derive(Debug, Clone)]
pub struct Slot {
    pub name: String,          // schema spelling
    pub variant: String,       // `BoolValue`
    pub stem: String,          // `bool_value`
    pub doc: Option<String>,
    pub payload: Payload,
    pub emit_from: bool,
}

#[derive(Debug, Clone)]
pub enum Payload {
    Unit,
    Typed { text: String, ty: syn::Type },
}

/// Per-slot generated methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Ctor,       // x(value)
    CtorCloned, // x_cloned(&value)
    Is,         // is_x()
    As,         // as_x()
    AsMut,      // as_x_mut()
    Into,       // into_x()
    Visit,      // visit_x(f)
    VisitMut,   // visit_x_mut(f)
    Get,        // get_x(&mut out) -> bool
    Or,         // x_or(&default)
    OrMut,      // x_or_mut(&mut default)
    GetOr,      // get_x_or(default)
    Set,        // set_x(value)
    SetCloned,  // set_x_cloned(&value)
}

impl Method {
    pub const TYPED: &'static [Method] = &[
        Method::Ctor,
        Method::CtorCloned,
        Method::Is,
        Method::As,
        Method::AsMut,
        Method::Into,
        Method::Visit,
        Method::VisitMut,
        Method::Get,
        Method::Or,
        Method::OrMut,
        Method::GetOr,
        Method::Set,
        Method::SetCloned,
    ];

    pub const UNIT: &'static [Method] = &[Method::Ctor, Method::Is, Method::Set];

    /// Only emitted when the container derives `Clone`.
    pub fn requires_clone(self) -> bool {
        matches!(
            self,
            Method::CtorCloned | Method::Get | Method::GetOr | Method::SetCloned
        )
    }

    pub fn name(self, stem: &str) -> String {
        match self {
            Method::Ctor => stem.to_string(),
            Method::CtorCloned => format!("{stem}_cloned"),
            Method::Is => format!("is_{stem}"),
            Method::As => format!("as_{stem}"),
            Method::AsMut => format!("as_{stem}_mut"),
            Method::Into => format!("into_{stem}"),
            Method::Visit => format!("visit_{stem}"),
            Method::VisitMut => format!("visit_{stem}_mut"),
            Method::Get => format!("get_{stem}"),
            Method::Or => format!("{stem}_or"),
            Method::OrMut => format!("{stem}_or_mut"),
            Method::GetOr => format!("get_{stem}_or"),
            Method::Set => format!("set_{stem}"),
            Method::SetCloned => format!("set_{stem}_cloned"),
        }
    }
}

impl Slot {
    pub fn is_unit(&self) -> bool {
        matches!(self.payload, Payload::Unit)
    }

    /// Methods this slot contributes, given whether the container is cloneable.
    pub fn methods(&self, cloneable: bool) -> impl Iterator<Item = Method> + '_ {
        let all = if self.is_unit() { Method::UNIT } else { Method::TYPED };
        all.iter().copied().filter(move |m| cloneable || !m.requires_clone())
    }

    pub fn method_name(&self, method: Method) -> String {
        method.name(&self.stem)
    }
}

impl Union {
    /// Number of discriminant values, counting the empty state.
    pub fn kind_count(&self) -> usize {
        self.slots.len() + 1
    }
}
