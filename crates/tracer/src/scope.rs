//! Scope guards that record a complete event when they go out of scope

use crate::clock;
use crate::recorder::Tracer;
use std::borrow::Cow;
use std::time::{Duration, Instant};

/// Records one complete event covering its own lifetime.
///
/// The start time is taken on construction. When the guard is dropped, on
/// fall-through, early return, `?` propagation or panic unwind, the elapsed
/// span is submitted to the tracer exactly once. The guard never checks the
/// session state; if no session is active the tracer drops the event.
///
/// # Example
///
/// ```rust
/// use tracer::{ScopeTrace, Tracer};
///
/// fn load_assets(tracer: &Tracer) {
///     let _scope = ScopeTrace::with_category(tracer, "load_assets", "io");
///     // ... loading ...
/// } // recorded here
///
/// let tracer = Tracer::new();
/// tracer.begin_session(std::env::temp_dir().join("tracer-doc-scope").join("trace.json"));
/// load_assets(&tracer);
/// assert_eq!(tracer.event_count(), 1);
/// ```
#[must_use = "the scope is recorded when this guard is dropped; bind it to a variable"]
pub struct ScopeTrace<'a> {
    tracer: &'a Tracer,
    name: Cow<'static, str>,
    category: Cow<'static, str>,
    start: Instant,
}

impl<'a> ScopeTrace<'a> {
    /// Start timing a scope in the tracer's default category.
    #[inline]
    pub fn new(tracer: &'a Tracer, name: impl Into<Cow<'static, str>>) -> Self {
        let category = tracer.default_category_cow();
        Self::with_category(tracer, name, category)
    }

    /// Start timing a scope in the given category.
    #[inline]
    pub fn with_category(
        tracer: &'a Tracer,
        name: impl Into<Cow<'static, str>>,
        category: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            tracer,
            name: name.into(),
            category: category.into(),
            start: clock::now(),
        }
    }

    /// Get the name this scope is recorded under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the category this scope is recorded under.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Get the instant the scope started.
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Time since the guard was created.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// End the scope now instead of at the end of the enclosing block.
    #[inline]
    pub fn finish(self) {}
}

impl Drop for ScopeTrace<'_> {
    fn drop(&mut self) {
        let end = clock::now();
        self.tracer.record_complete(
            std::mem::take(&mut self.name),
            std::mem::take(&mut self.category),
            self.start,
            end,
        );
    }
}

impl std::fmt::Debug for ScopeTrace<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeTrace")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("start", &self.start)
            .finish()
    }
}

/// Full path of the enclosing function, for naming scopes.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// Time the rest of the enclosing block.
///
/// # Example
///
/// ```rust
/// use tracer::{trace_scope, Tracer};
///
/// fn step(tracer: &Tracer) {
///     trace_scope!(tracer, "step");
///     trace_scope!(tracer, "step.inner", "physics");
///     // ... work ...
/// }
/// # step(&Tracer::new());
/// ```
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! trace_scope {
    ($tracer:expr, $name:expr) => {
        let _trace_scope = $crate::ScopeTrace::new(&$tracer, $name);
    };
    ($tracer:expr, $name:expr, $category:expr) => {
        let _trace_scope = $crate::ScopeTrace::with_category(&$tracer, $name, $category);
    };
}

// Disabled macros borrow their arguments inside a closure that is never
// called: nothing is evaluated, but captured variables still count as used.
#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! trace_scope {
    ($tracer:expr, $name:expr $(, $category:expr)?) => {
        let _ = &$tracer;
        let _ = || (&$name $(, &$category)?);
    };
}

/// Time the rest of the enclosing function, named after the function.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! trace_function {
    ($tracer:expr) => {
        let _trace_function = $crate::ScopeTrace::new(&$tracer, $crate::__function_name!());
    };
    ($tracer:expr, $category:expr) => {
        let _trace_function =
            $crate::ScopeTrace::with_category(&$tracer, $crate::__function_name!(), $category);
    };
}

#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! trace_function {
    ($tracer:expr $(, $category:expr)?) => {
        let _ = &$tracer;
        $(let _ = || &$category;)?
    };
}

/// Record a begin marker, in the tracer's default category if none is given.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! trace_begin {
    ($tracer:expr, $name:expr) => {
        $tracer.record_begin_default($name)
    };
    ($tracer:expr, $name:expr, $category:expr) => {
        $tracer.record_begin($name, $category)
    };
}

#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! trace_begin {
    ($tracer:expr, $name:expr $(, $category:expr)?) => {{
        let _ = &$tracer;
        let _ = || (&$name $(, &$category)?);
    }};
}

/// Record an end marker, in the tracer's default category if none is given.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! trace_end {
    ($tracer:expr, $name:expr) => {
        $tracer.record_end_default($name)
    };
    ($tracer:expr, $name:expr, $category:expr) => {
        $tracer.record_end($name, $category)
    };
}

#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! trace_end {
    ($tracer:expr, $name:expr $(, $category:expr)?) => {{
        let _ = &$tracer;
        let _ = || (&$name $(, &$category)?);
    }};
}

/// Record an instant event, in the tracer's default category if none is given.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! trace_instant {
    ($tracer:expr, $name:expr) => {
        $tracer.record_instant_default($name)
    };
    ($tracer:expr, $name:expr, $category:expr) => {
        $tracer.record_instant($name, $category)
    };
}

#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! trace_instant {
    ($tracer:expr, $name:expr $(, $category:expr)?) => {{
        let _ = &$tracer;
        let _ = || (&$name $(, &$category)?);
    }};
}


#[cfg(all(test, not(feature = "enabled")))]
mod disabled_tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    #[test]
    fn test_disabled_macros_record_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let tracer = Tracer::new();
        tracer.begin_session(temp_dir.path().join("trace.json"));

        let evaluated = Cell::new(0);
        let name = || {
            evaluated.set(evaluated.get() + 1);
            "name"
        };

        {
            trace_scope!(tracer, name());
            trace_scope!(tracer, name(), "cat");
            trace_function!(tracer);
            trace_function!(tracer, "cat");
            trace_begin!(tracer, name());
            trace_begin!(tracer, name(), "cat");
            trace_instant!(tracer, name());
            trace_instant!(tracer, name(), "cat");
            trace_end!(tracer, name());
            trace_end!(tracer, name(), "cat");
        }

        assert_eq!(evaluated.get(), 0);
        // the tracer was only borrowed and is still usable
        assert!(tracer.is_active());
        assert_eq!(tracer.event_count(), 0);
        assert_eq!(tracer.dropped_count(), 0);

        tracer.record_instant("direct", "cat");
        assert_eq!(tracer.event_count(), 1);
    }

    #[test]
    fn test_scope_guard_still_records() {
        let temp_dir = TempDir::new().unwrap();
        let tracer = Tracer::new();
        tracer.begin_session(temp_dir.path().join("trace.json"));

        ScopeTrace::new(&tracer, "guard").finish();

        assert_eq!(tracer.event_count(), 1);
    }
}
