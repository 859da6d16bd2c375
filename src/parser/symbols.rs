//! Symbol name resolution.
//!
//! Splits a raw compiled function name into the parts a [`FunctionKey`]
//! is made of. The index only depends on the [`SymbolResolver`] trait;
//! [`GoSymbolResolver`] is the default and understands Go symbol names
//! as they appear in pprof CPU profiles.
//!
//! [`FunctionKey`]: crate::index::FunctionKey

/// Parts of a resolved function name
///
/// An empty `package` means the name could not be resolved; the
/// aggregator skips such frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSymbol {
    /// Package name (last path element only)
    pub package: String,

    /// Receiver type name, empty for free functions
    pub type_name: String,

    /// Short function name
    pub function: String,
}

impl ResolvedSymbol {
    pub fn new(
        package: impl Into<String>,
        type_name: impl Into<String>,
        function: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            type_name: type_name.into(),
            function: function.into(),
        }
    }

    /// Whether the name was resolved to a package
    pub fn is_resolved(&self) -> bool {
        !self.package.is_empty()
    }
}

/// Converts raw function names into their package/type/function parts
pub trait SymbolResolver {
    fn resolve(&self, raw_name: &str) -> ResolvedSymbol;
}

/// Resolver for Go symbol names
///
/// Handles the forms `path/to/pkg.Func`, `pkg.(*Type).Method`,
/// `pkg.(Type).Method` and closures such as `pkg.Func.func1.2`, which
/// are attributed to their enclosing function.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoSymbolResolver;

impl SymbolResolver for GoSymbolResolver {
    fn resolve(&self, raw_name: &str) -> ResolvedSymbol {
        let (package, type_name, function) = parse_func_name(raw_name);
        ResolvedSymbol::new(package, type_name, function)
    }
}

/// Split a Go symbol into `(package, type, function)`
///
/// Returns an empty package when the name has no package qualifier, and
/// all-empty parts when a method receiver is malformed.
pub fn parse_func_name(raw_name: &str) -> (&str, &str, &str) {
    let name = match raw_name.rfind('/') {
        Some(slash) => &raw_name[slash + 1..],
        None => raw_name,
    };

    let Some(dot) = name.find('.') else {
        return ("", "", name);
    };
    let package = &name[..dot];
    let rest = &name[dot + 1..];

    if !rest.starts_with('(') {
        return (package, "", trim_closure_suffix(rest));
    }

    let offset = if rest.starts_with("(*") { 2 } else { 1 };
    let Some(rparen) = rest.find(')') else {
        return ("", "", "");
    };
    if rparen < offset {
        return ("", "", "");
    }
    let type_name = &rest[offset..rparen];
    let function = rest.get(rparen + ").".len()..).unwrap_or("");
    (package, type_name, trim_closure_suffix(function))
}

/// Strip compiler-generated closure suffixes: `Run.func1` and
/// `Run.func1.2` both become `Run`, `init.0` becomes `init`.
fn trim_closure_suffix(name: &str) -> &str {
    let mut end = name.len();
    loop {
        let digits_start = name.as_bytes()[..end]
            .iter()
            .rposition(|b| !b.is_ascii_digit())
            .map_or(0, |pos| pos + 1);
        let head = &name[..digits_start];
        end = if let Some(rest) = head.strip_suffix(".func") {
            rest.len()
        } else if let Some(rest) = head.strip_suffix('.') {
            rest.len()
        } else {
            break;
        };
    }
    &name[..end]
}
