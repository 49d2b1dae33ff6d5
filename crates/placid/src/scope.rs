//! Before-each / after-each hooks shared by the cases of one describe block.

use tracing::trace;

/// A zero-argument hook.
pub type Hook<'h> = Box<dyn Fn() + 'h>;

/// Ordered hook lists. Registration order is execution order.
///
/// Hooks run on the caller's thread; a panicking hook propagates to whoever
/// is running the case.
#[derive(Default)]
pub struct Scope<'h> {
    before_each: Vec<Hook<'h>>,
    after_each: Vec<Hook<'h>>,
}

impl<'h> Scope<'h> {
    pub fn new() -> Self {
        Scope {
            before_each: Vec::new(),
            after_each: Vec::new(),
        }
    }

    /// Append a before-each hook. `None` is ignored.
    pub fn register_before(&mut self, hook: Option<Hook<'h>>) {
        if let Some(hook) = hook {
            self.before_each.push(hook);
        }
    }

    /// Append an after-each hook. `None` is ignored.
    pub fn register_after(&mut self, hook: Option<Hook<'h>>) {
        if let Some(hook) = hook {
            self.after_each.push(hook);
        }
    }

    pub fn before_each(&mut self, hook: impl Fn() + 'h) {
        self.register_before(Some(Box::new(hook)));
    }

    pub fn after_each(&mut self, hook: impl Fn() + 'h) {
        self.register_after(Some(Box::new(hook)));
    }

    pub fn run_before_hooks(&self) {
        trace!(count = self.before_each.len(), "running before-each hooks");
        for hook in &self.before_each {
            hook();
        }
    }

    pub fn run_after_hooks(&self) {
        trace!(count = self.after_each.len(), "running after-each hooks");
        for hook in &self.after_each {
            hook();
        }
    }

    pub fn before_count(&self) -> usize {
        self.before_each.len()
    }

    pub fn after_count(&self) -> usize {
        self.after_each.len()
    }
}

impl std::fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("before_each", &self.before_each.len())
            .field("after_each", &self.after_each.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_hooks_run_in_registration_order() {
        let log = RefCell::new(Vec::new());
        let mut scope = Scope::new();
        scope.before_each(|| log.borrow_mut().push("A"));
        scope.before_each(|| log.borrow_mut().push("B"));
        scope.after_each(|| log.borrow_mut().push("X"));
        scope.after_each(|| log.borrow_mut().push("Y"));

        scope.run_before_hooks();
        scope.run_after_hooks();
        scope.run_before_hooks();

        assert_eq!(*log.borrow(), vec!["A", "B", "X", "Y", "A", "B"]);
    }

    #[test]
    fn test_none_hooks_are_ignored() {
        let mut scope = Scope::new();
        scope.register_before(None);
        scope.register_after(None);
        assert_eq!(scope.before_count(), 0);
        assert_eq!(scope.after_count(), 0);
        scope.run_before_hooks();
        scope.run_after_hooks();
    }

    #[test]
    fn test_panicking_hook_stops_the_rest() {
        let ran = RefCell::new(false);
        let mut scope = Scope::new();
        scope.before_each(|| panic!("hook failed"));
        scope.before_each(|| *ran.borrow_mut() = true);

        let result = catch_unwind(AssertUnwindSafe(|| scope.run_before_hooks()));
        assert!(result.is_err());
        assert!(!*ran.borrow());
    }
}
