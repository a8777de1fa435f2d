pub mod clingo_process;
#[cfg(feature = "native")]
pub mod native;
