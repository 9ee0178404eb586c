//! Plain data types shared by the registry, the factory and the execution environment.

pub mod account;
pub mod batch;
pub mod context;
pub mod entry;

pub use account::*;
pub use batch::*;
pub use context::*;
pub use entry::*;
