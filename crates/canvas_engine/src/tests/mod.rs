//! Cross-module tests: renderer, looper and engine working together

mod engine_run;
