//! Conversions used by `value!` and when building a context by hand.
//!
//! Scalars map onto the matching variant, sequences become lists and
//! anything yielding `(key, value)` pairs becomes a map.

use std::collections::{BTreeMap, HashMap};

use crate::value::{List, Map};
use crate::Value;

fn list_of<I>(items: I) -> Value
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    Value::List(items.into_iter().map(Into::into).collect::<List<_>>())
}

fn map_of<I, K, V>(entries: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<Map<_, _>>(),
    )
}

macro_rules! scalar {
    ($($ty:ty => |$v:ident| $variant:expr;)+) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $variant
                }
            }
        )+
    };
}

scalar! {
    () => |_unit| Value::None;
    bool => |b| Value::Bool(b);
    i32 => |i| Value::Integer(i64::from(i));
    u32 => |i| Value::Integer(i64::from(i));
    i64 => |i| Value::Integer(i);
    f64 => |f| Value::Float(f);
    char => |c| Value::String(c.to_string());
    String => |s| Value::String(s);
    &str => |s| Value::String(s.to_owned());
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(opt: Option<V>) -> Self {
        opt.map_or(Value::None, Into::into)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(list: Vec<V>) -> Self {
        list_of(list)
    }
}

impl<V: Into<Value>, const N: usize> From<[V; N]> for Value {
    fn from(list: [V; N]) -> Self {
        list_of(list)
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        map_of(map)
    }
}

impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(map: HashMap<K, V>) -> Self {
        map_of(map)
    }
}

impl<V: Into<Value>> FromIterator<V> for Value {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        list_of(iter)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        map_of(iter)
    }
}
