pub use self::project::*;
pub use self::status::*;
pub use self::store::*;

#[cfg(test)]
pub(crate) use self::store::testing;

mod project;
mod status;
mod store;
