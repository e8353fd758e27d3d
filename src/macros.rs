#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a [`Rule`](crate::Rule) from a dotted result path, a class, one
/// anchored pattern and the shape its captures take.
///
/// ```text
/// rule! {
///     name: "set.weight",
///     class: RuleClass::SET,
///     pattern: r"^set\sweight\s(?P<weight>\d+)$",
///     shape: Shape::Value(Slot::Text("weight")),
/// }
/// ```
#[macro_export]
macro_rules! rule {
    (
        name: $name:expr,
        class: $class:expr,
        pattern: $pat:literal,
        $(shared: $shared:expr,)?
        shape: $shape:expr
        $(,)?
    ) => {{
        $crate::Rule {
            name: $name,
            class: $class,
            pattern: $crate::regex!($pat),
            shape: $shape,
            shared: { false $(|| $shared)? },
        }
    }};
}
