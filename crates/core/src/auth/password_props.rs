//! Property-based tests for the credential codec.
//!
//! Argon2 is deliberately slow, so case counts are kept small.

use proptest::prelude::*;

use super::{hash_password, verify_password};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// A password always verifies against its own digest.
    #[test]
    fn prop_hash_then_verify_accepts(password in "\\PC{0,64}") {
        let digest = hash_password(&password).unwrap();
        prop_assert!(verify_password(&password, &digest).unwrap());
        prop_assert_ne!(digest, password);
    }

    /// Any other password is rejected.
    #[test]
    fn prop_other_password_rejected(
        password in "[a-zA-Z0-9]{1,32}",
        other in "[a-zA-Z0-9]{1,32}",
    ) {
        prop_assume!(password != other);
        let digest = hash_password(&password).unwrap();
        prop_assert!(!verify_password(&other, &digest).unwrap());
    }
}
