mod aggregation_tests;
mod build_tests;
mod fixtures;
