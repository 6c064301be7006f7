//-
// Copyright (c) 2026, Jason Lingle
//
// This file is part of Hdrfold.
//
// Hdrfold is free software: you can  redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Hdrfold is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without  even the implied  warranty of MERCHANTABILITY  or FITNESS
// FOR  A PARTICULAR  PURPOSE.  See the  GNU General  Public  License for  more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Hdrfold. If not, see <http://www.gnu.org/licenses/>.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use log::error;

use super::error::ListenerInvocationError;

/// What a listener callback returns.
pub type ListenerResult = Result<(), Box<dyn StdError>>;

/// Receives listener failures. The default logs them.
pub type Reporter = Box<dyn Fn(&ListenerInvocationError)>;

/// A set of listener handles, compared by identity.
///
/// Handles are notified in registration order. One listener failing, either
/// by returning `Err` or by panicking, does not stop the others from being
/// called.
pub struct ListenerRegistry<T: ?Sized> {
    listeners: Vec<Rc<T>>,
    reporter: Reporter,
}

impl<T: ?Sized> fmt::Debug for ListenerRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ListenerRegistry({} listeners)", self.listeners.len())
    }
}

impl<T: ?Sized> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self::with_reporter(Box::new(|e: &ListenerInvocationError| {
            error!("{}", e)
        }))
    }

    pub fn with_reporter(reporter: Reporter) -> Self {
        ListenerRegistry {
            listeners: Vec::new(),
            reporter,
        }
    }

    /// Register `listener`.
    ///
    /// Returns false if that same handle (by identity, not value) is already
    /// registered, in which case nothing changes.
    pub fn add(&mut self, listener: Rc<T>) -> bool {
        if self.contains(&listener) {
            false
        } else {
            self.listeners.push(listener);
            true
        }
    }

    /// Unregister `listener`, if registered.
    pub fn remove(&mut self, listener: &Rc<T>) {
        self.listeners.retain(|l| !same_handle(l, listener));
    }

    pub fn contains(&self, listener: &Rc<T>) -> bool {
        self.listeners.iter().any(|l| same_handle(l, listener))
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<T>> {
        self.listeners.iter()
    }

    pub fn for_each(&self, f: impl FnMut(&Rc<T>)) {
        self.listeners.iter().for_each(f)
    }

    /// Call `f` on every listener in registration order.
    ///
    /// `method` names the callback for reporting. Every failure is passed to
    /// the reporter and returned; none is propagated.
    pub fn notify(
        &self,
        method: &'static str,
        mut f: impl FnMut(&T) -> ListenerResult,
    ) -> Vec<ListenerInvocationError> {
        let mut failures = Vec::new();

        for (index, listener) in self.listeners.iter().enumerate() {
            let result =
                panic::catch_unwind(AssertUnwindSafe(|| f(&**listener)));
            let message = match result {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.to_string(),
                Err(payload) => panic_message(payload),
            };

            let failure = ListenerInvocationError {
                method,
                index,
                message,
            };
            (self.reporter)(&failure);
            failures.push(failure);
        }

        failures
    }
}

fn same_handle<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    // Compare data pointers only; the same object can be reached through
    // different vtables.
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panicked".to_owned()
    }
}

#[cfg(test)]
mod test {
    use std::cell::{Cell, RefCell};

    use super::*;

    trait Observer {
        fn observe(&self, value: u32) -> ListenerResult;
    }

    #[derive(Default)]
    struct Counter {
        calls: Cell<u32>,
        last: Cell<u32>,
    }

    impl Observer for Counter {
        fn observe(&self, value: u32) -> ListenerResult {
            self.calls.set(self.calls.get() + 1);
            self.last.set(value);
            Ok(())
        }
    }

    struct Failing {
        calls: Cell<u32>,
        panic: bool,
    }

    impl Observer for Failing {
        fn observe(&self, _value: u32) -> ListenerResult {
            self.calls.set(self.calls.get() + 1);
            if self.panic {
                panic!("observer exploded");
            }
            Err("observer refused".into())
        }
    }

    #[test]
    fn add_and_remove_by_identity() {
        let mut registry: ListenerRegistry<dyn Observer> =
            ListenerRegistry::new();
        let a: Rc<dyn Observer> = Rc::new(Counter::default());
        let b: Rc<dyn Observer> = Rc::new(Counter::default());

        assert!(registry.add(Rc::clone(&a)));
        assert!(!registry.add(Rc::clone(&a)));
        assert!(registry.add(Rc::clone(&b)));
        assert_eq!(2, registry.len());

        registry.remove(&a);
        assert_eq!(1, registry.len());
        assert!(!registry.contains(&a));
        assert!(registry.contains(&b));

        // Removing something not registered is fine
        registry.remove(&a);
        assert_eq!(1, registry.len());
    }

    #[test]
    fn notify_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut registry: ListenerRegistry<u32> = ListenerRegistry::new();
        for i in 0..4 {
            registry.add(Rc::new(i));
        }

        let failures = registry.notify("record", |&i| {
            order.borrow_mut().push(i);
            Ok(())
        });
        assert!(failures.is_empty());
        assert_eq!(vec![0, 1, 2, 3], *order.borrow());

        let mut seen = 0;
        registry.for_each(|_| seen += 1);
        assert_eq!(4, seen);
    }

    fn run_isolation(panic: bool) {
        crate::init_test_log();

        let reported = Rc::new(RefCell::new(Vec::new()));
        let reported2 = Rc::clone(&reported);
        let mut registry: ListenerRegistry<dyn Observer> =
            ListenerRegistry::with_reporter(Box::new(
                move |e: &ListenerInvocationError| {
                    reported2.borrow_mut().push(e.clone())
                },
            ));

        let first = Rc::new(Counter::default());
        let second = Rc::new(Failing {
            calls: Cell::new(0),
            panic,
        });
        let third = Rc::new(Counter::default());
        registry.add(first.clone());
        registry.add(second.clone());
        registry.add(third.clone());

        let failures = registry.notify("observe", |o| o.observe(7));

        assert_eq!(1, first.calls.get());
        assert_eq!(1, second.calls.get());
        assert_eq!(1, third.calls.get());
        assert_eq!(7, third.last.get());

        assert_eq!(1, failures.len());
        assert_eq!("observe", failures[0].method);
        assert_eq!(1, failures[0].index);
        assert_eq!(
            if panic {
                "observer exploded"
            } else {
                "observer refused"
            },
            failures[0].message
        );
        assert_eq!(failures, *reported.borrow());
    }

    #[test]
    fn failing_listener_is_isolated() {
        run_isolation(false);
    }

    #[test]
    fn panicking_listener_is_isolated() {
        run_isolation(true);
    }
}
