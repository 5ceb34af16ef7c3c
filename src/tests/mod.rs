mod utils;

mod client_tests;
mod pipeline_tests;
