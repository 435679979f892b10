/// Construct a [`Value`][crate::Value] using a JSON like syntax.
///
/// A bare list of `key: value` pairs constructs a map. Nested maps are written
/// with braces, lists with brackets, and anything else is converted using
/// [`From`].
///
/// ```
/// let value = whisker::value! {
///     user: {
///         name: "John Smith",
///         tags: ["admin", "staff"],
///         manager: None,
///     },
///     "top-level": true,
/// };
/// # let _ = value;
/// ```
// Heavily based on `serde_json::json!`
#[macro_export]
macro_rules! value {
    //////////////////////////////////////////////////////////////////////////
    // TT muncher for parsing the inside of a list [...]. Produces a `Vec` of
    // the elements.
    //
    // Must be invoked as: value!(@list [] $($tt)*)
    //////////////////////////////////////////////////////////////////////////

    // Done.
    (@list [$($elems:expr,)*]) => {
        ::std::vec![$($elems,)*]
    };

    // Next element is `None`.
    (@list [$($elems:expr,)*] None $(, $($rest:tt)*)?) => {
        $crate::value!(@list [$($elems,)* $crate::Value::None,] $($($rest)*)?)
    };

    // Next element is a list.
    (@list [$($elems:expr,)*] [$($list:tt)*] $(, $($rest:tt)*)?) => {
        $crate::value!(@list [$($elems,)* $crate::value!([$($list)*]),] $($($rest)*)?)
    };

    // Next element is a map.
    (@list [$($elems:expr,)*] {$($map:tt)*} $(, $($rest:tt)*)?) => {
        $crate::value!(@list [$($elems,)* $crate::value!({$($map)*}),] $($($rest)*)?)
    };

    // Next element is an expression.
    (@list [$($elems:expr,)*] $next:expr $(, $($rest:tt)*)?) => {
        $crate::value!(@list [$($elems,)* $crate::Value::from($next),] $($($rest)*)?)
    };

    //////////////////////////////////////////////////////////////////////////
    // TT muncher for parsing the inside of a map {...}. Each entry is
    // inserted into the given map variable.
    //
    // Must be invoked as: value!(@map $map $($tt)*)
    //////////////////////////////////////////////////////////////////////////

    // Done.
    (@map $map:ident) => {};

    // Next value is `None`.
    (@map $map:ident $key:tt : None $(, $($rest:tt)*)?) => {
        let _ = $map.insert($crate::value!(@key $key), $crate::Value::None);
        $crate::value!(@map $map $($($rest)*)?);
    };

    // Next value is a list.
    (@map $map:ident $key:tt : [$($list:tt)*] $(, $($rest:tt)*)?) => {
        let _ = $map.insert($crate::value!(@key $key), $crate::value!([$($list)*]));
        $crate::value!(@map $map $($($rest)*)?);
    };

    // Next value is a map.
    (@map $map:ident $key:tt : {$($inner:tt)*} $(, $($rest:tt)*)?) => {
        let _ = $map.insert($crate::value!(@key $key), $crate::value!({$($inner)*}));
        $crate::value!(@map $map $($($rest)*)?);
    };

    // Next value is an expression.
    (@map $map:ident $key:tt : $value:expr $(, $($rest:tt)*)?) => {
        let _ = $map.insert($crate::value!(@key $key), $crate::Value::from($value));
        $crate::value!(@map $map $($($rest)*)?);
    };

    // Map keys are identifiers or string literals.
    (@key $key:ident) => {
        ::std::string::String::from(::std::stringify!($key))
    };

    (@key $key:literal) => {
        ::std::string::String::from($key)
    };

    //////////////////////////////////////////////////////////////////////////
    // The main implementation.
    //////////////////////////////////////////////////////////////////////////

    () => {
        $crate::Value::Map($crate::Map::new())
    };

    (None) => {
        $crate::Value::None
    };

    ([ $($tt:tt)* ]) => {
        $crate::Value::List($crate::value!(@list [] $($tt)*))
    };

    ({ $($tt:tt)* }) => {
        $crate::Value::Map({
            #[allow(unused_mut)]
            let mut map = $crate::Map::new();
            $crate::value!(@map map $($tt)*);
            map
        })
    };

    ($key:tt : $($tt:tt)*) => {
        $crate::value!({ $key : $($tt)* })
    };

    // Default to `From` implementation.
    ($other:expr) => {
        $crate::Value::from($other)
    };
}
