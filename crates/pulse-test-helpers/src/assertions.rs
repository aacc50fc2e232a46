//! Custom assertion macros for testing.

/// Assert that two floating-point values are approximately equal.
///
/// # Example
///
/// ```rust
/// use pulse_test_helpers::assert_approx_eq;
///
/// assert_approx_eq!(0.1_f64 + 0.2, 0.3_f64, 1e-12_f64);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr $(,)?) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if diff > tolerance {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`",
                left, right, diff, tolerance
            );
        }
    };
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if diff > tolerance {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`: {}",
                left, right, diff, tolerance, format_args!($($arg)+)
            );
        }
    };
}

/// Assert that a disposition applied a damped scroll of approximately
/// `expected` pixels.
///
/// The calling crate must depend on `pulse-friction`.
#[macro_export]
macro_rules! assert_applied {
    ($disposition:expr, $expected:expr $(,)?) => {
        match $disposition {
            ::pulse_friction::Disposition::Applied { delta } => {
                $crate::assert_approx_eq!(delta, $expected, 1e-9);
            }
            other => panic!(
                "assertion failed: expected Applied {{ delta: {:?} }}, got {:?}",
                $expected, other
            ),
        }
    };
}
