//! Property-based tests over randomly generated inputs.

mod pool_property_tests;
