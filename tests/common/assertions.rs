//! Custom assertion utilities for tests.

use gas_accrual::U256;

/// Assert that a result is Ok and return the inner value.
///
/// # Panics
///
/// Panics with `context` and the error if the result is `Err`.
#[allow(dead_code)]
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{} failed: {:?}", context, e),
    }
}

/// Assert that a result is Err and return the error.
#[allow(dead_code)]
pub fn assert_err<T: std::fmt::Debug, E>(result: Result<T, E>, context: &str) -> E {
    match result {
        Ok(v) => panic!("{} should have failed but got: {:?}", context, v),
        Err(e) => e,
    }
}

/// Assert that an error message contains expected text (case-insensitive).
#[allow(dead_code)]
pub fn assert_error_contains<E: std::fmt::Display>(error: E, expected_text: &str, context: &str) {
    let error_str = error.to_string().to_lowercase();
    assert!(
        error_str.contains(&expected_text.to_lowercase()),
        "{}: error message should contain '{}', got: {}",
        context,
        expected_text,
        error
    );
}

/// Assert a wei amount, naming the account on failure.
#[allow(dead_code)]
pub fn assert_wei(actual: U256, expected: u64, what: &str) {
    assert_eq!(
        actual,
        U256::from(expected),
        "{}: expected {} wei, got {}",
        what,
        expected,
        actual
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_ok() {
        let result: Result<i32, &str> = Ok(42);
        assert_eq!(assert_ok(result, "test operation"), 42);
    }

    #[test]
    #[should_panic(expected = "test operation failed")]
    fn test_assert_ok_fails() {
        let result: Result<i32, &str> = Err("error");
        assert_ok(result, "test operation");
    }

    #[test]
    fn test_assert_error_contains() {
        assert_error_contains("Refund Exceeds usage", "refund exceeds", "refund check");
    }

    #[test]
    #[should_panic(expected = "escrow: expected 2 wei")]
    fn test_assert_wei_names_account() {
        assert_wei(U256::from(1u64), 2, "escrow");
    }
}
