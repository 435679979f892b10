use crate::{Error, Result, Value};

/// The context stack.
///
/// The bottom of the stack is the value the template is rendered against,
/// every section that is entered pushes its value on top.
#[cfg_attr(test, derive(Debug))]
pub struct Stack<'a> {
    scopes: Vec<&'a Value>,
}

impl<'a> Stack<'a> {
    pub fn new(globals: &'a Value) -> Self {
        Self {
            scopes: vec![globals],
        }
    }

    pub fn push(&mut self, value: &'a Value) {
        self.scopes.push(value);
    }

    pub fn pop(&mut self) {
        debug_assert!(self.scopes.len() > 1, "popped the root context");
        self.scopes.pop();
    }

    /// Resolves a name, e.g. `user.name`, on the stack.
    ///
    /// `.` refers to the value on top of the stack. Otherwise the first
    /// segment is looked up in each scope from the top of the stack down and
    /// any remaining segments index into the value found.
    ///
    /// Returns `Ok(None)` if the name is not found. Errors if the lookup
    /// reaches a root context which is not a map.
    pub fn lookup(&self, name: &str) -> Result<Option<&'a Value>> {
        if name == "." {
            return Ok(self.scopes.last().copied());
        }

        let mut path = name.split('.');
        let first = path.next().unwrap_or(name);

        let mut value = match self.resolve(name, first)? {
            Some(value) => value,
            None => return Ok(None),
        };
        for key in path {
            value = match value {
                Value::Map(map) => match map.get(key) {
                    Some(value) => value,
                    None => return Ok(None),
                },
                _ => return Ok(None),
            };
        }
        Ok(Some(value))
    }

    fn resolve(&self, name: &str, key: &str) -> Result<Option<&'a Value>> {
        for (i, &scope) in self.scopes.iter().enumerate().rev() {
            match scope {
                Value::Map(map) => {
                    if let Some(value) = map.get(key) {
                        return Ok(Some(value));
                    }
                }
                scope if i == 0 => return Err(Error::lookup_type(name, scope.human())),
                // Sections over scalars push scopes that cannot be looked up in.
                _ => {}
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value;

    #[test]
    fn lookup_root() {
        let globals = value! { a: 1 };
        let stack = Stack::new(&globals);
        assert_eq!(stack.lookup("a").unwrap(), Some(&Value::Integer(1)));
        assert_eq!(stack.lookup("b").unwrap(), None);
    }

    #[test]
    fn lookup_dotted() {
        let globals = value! { a: { b: { c: "x" } } };
        let stack = Stack::new(&globals);
        assert_eq!(stack.lookup("a.b.c").unwrap(), Some(&Value::from("x")));
        assert_eq!(stack.lookup("a.x.c").unwrap(), None);
        assert_eq!(stack.lookup("a.b.c.d").unwrap(), None);
    }

    #[test]
    fn lookup_shadowed_by_inner_scope() {
        let globals = value! { a: 1, b: 2, inner: { a: 3 } };
        let mut stack = Stack::new(&globals);
        let inner = stack.lookup("inner").unwrap().unwrap();
        stack.push(inner);
        assert_eq!(stack.lookup("a").unwrap(), Some(&Value::Integer(3)));
        assert_eq!(stack.lookup("b").unwrap(), Some(&Value::Integer(2)));
        stack.pop();
        assert_eq!(stack.lookup("a").unwrap(), Some(&Value::Integer(1)));
    }

    #[test]
    fn lookup_implicit_iterator() {
        let globals = value! { list: ["x"] };
        let item = Value::from("x");
        let mut stack = Stack::new(&globals);
        stack.push(&item);
        assert_eq!(stack.lookup(".").unwrap(), Some(&item));
        // Non map scopes are skipped.
        assert_eq!(stack.lookup("list").unwrap(), Some(&value!(["x"])));
    }

    #[test]
    fn lookup_root_not_a_map() {
        let globals = Value::None;
        let stack = Stack::new(&globals);
        let err = stack.lookup("a").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LookupType);
        assert_eq!(
            err.to_string(),
            "cannot look up `a`, only map contexts are supported, found none"
        );
    }
}
