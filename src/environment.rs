use crate::value::Value;
use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a runtime scope.  Closures and bound methods hold these,
/// which keeps a frame alive after the block that created it has exited.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One runtime scope frame: name → value bindings plus the enclosing frame.
///
/// Frames are only ever created nested under an existing one and are never
/// re‑linked, so the parent chain is acyclic.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Fresh child frame of `enclosing`, already wrapped for sharing.
    pub fn child_of(enclosing: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(enclosing))))
    }

    /// Bind `name` in this frame, replacing any previous binding here.
    pub fn define(&mut self, name: &str, value: Value) {
        trace!("define '{}' = {}", name, value);

        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up in this frame only.
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    /// Overwrite an existing binding in this frame only.  Returns `false` when
    /// the name is not bound here.
    pub fn assign_local(&mut self, name: &str, value: Value) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// Walk exactly `distance` parent links from `env`.
pub fn ancestor(env: &EnvRef, distance: usize) -> Option<EnvRef> {
    let mut current: EnvRef = Rc::clone(env);

    for _ in 0..distance {
        let parent = current.borrow().enclosing.clone()?;
        current = parent;
    }

    Some(current)
}

/// Read `name` from the frame `distance` hops above `env`.
pub fn get_at(env: &EnvRef, distance: usize, name: &str) -> Option<Value> {
    ancestor(env, distance)?.borrow().get_local(name)
}

/// Write `name` in the frame `distance` hops above `env`.
pub fn assign_at(env: &EnvRef, distance: usize, name: &str, value: Value) -> bool {
    match ancestor(env, distance) {
        Some(frame) => frame.borrow_mut().assign_local(name, value),
        None => false,
    }
}

#[cfg(test)]
mod environment_tests {
    use super::*;

    #[test]
    fn child_frame_shadows_parent() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("a", Value::Number(1.0));

        let inner = Environment::child_of(&global);
        inner.borrow_mut().define("a", Value::Number(2.0));

        assert_eq!(get_at(&inner, 0, "a"), Some(Value::Number(2.0)));
        assert_eq!(get_at(&inner, 1, "a"), Some(Value::Number(1.0)));
        assert_eq!(get_at(&inner, 2, "a"), None);
    }

    #[test]
    fn assign_at_writes_the_exact_frame() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::child_of(&global);
        inner.borrow_mut().define("a", Value::Number(2.0));

        assert!(assign_at(&inner, 1, "a", Value::Number(10.0)));

        assert_eq!(global.borrow().get_local("a"), Some(Value::Number(10.0)));
        assert_eq!(inner.borrow().get_local("a"), Some(Value::Number(2.0)));
    }

    #[test]
    fn missing_names_and_distances_are_reported() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
        let inner = Environment::child_of(&global);

        assert_eq!(get_at(&inner, 0, "nope"), None);
        assert!(ancestor(&inner, 2).is_none());
        assert!(!assign_at(&inner, 1, "nope", Value::Nil));
        assert!(!assign_at(&inner, 5, "nope", Value::Nil));
    }

    #[test]
    fn frames_outlive_their_creator_while_shared() {
        let kept: EnvRef = {
            let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
            let block = Environment::child_of(&global);
            block.borrow_mut().define("count", Value::Number(0.0));
            Rc::clone(&block)
        };

        assert_eq!(kept.borrow().get_local("count"), Some(Value::Number(0.0)));
        assert!(ancestor(&kept, 1).is_some());
    }
}
