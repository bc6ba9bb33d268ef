//! Files the server reads: `eula.txt`, `server.properties` and the start script.

pub mod eula;
pub mod properties;
pub mod script;

pub use eula::accept_eula;
pub use properties::{Properties, ServerSettings};
