pub(crate) mod common;
mod store;
