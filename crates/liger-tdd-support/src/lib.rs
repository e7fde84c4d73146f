//! Test-only helpers that let test code extract `Result`/`Option` values
//! without tripping the workspace's `unwrap_used`/`expect_used` lints.
//!
//! These are deliberately panic-on-failure: a test that calls [`must`] on an
//! `Err` is meant to fail loudly, with the offending value in the panic
//! message via `#[track_caller]` pointing at the call site.

#![deny(unsafe_code)]

/// Extract the value from a `Result`, or panic with the error's `Debug` form.
#[track_caller]
pub fn must<T, E: std::fmt::Debug>(r: Result<T, E>) -> T {
    match r {
        Ok(v) => v,
        Err(e) => panic!("unexpected Err: {e:?}"),
    }
}

/// Extract the value from an `Option`, or panic.
#[track_caller]
pub fn must_some<T>(o: Option<T>) -> T {
    match o {
        Some(v) => v,
        None => panic!("unexpected None"),
    }
}

/// Extract the error from a `Result`, or panic if it was `Ok`.
#[track_caller]
pub fn must_err<T: std::fmt::Debug, E>(r: Result<T, E>) -> E {
    match r {
        Err(e) => e,
        Ok(v) => panic!("expected Err, got Ok({v:?})"),
    }
}
