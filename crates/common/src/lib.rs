/**
 * Read/write backends for the two storage media,
 *  local disk and object storage, behind one trait.
 */
pub mod backend;
/**
 * Routes a file reference to the backend that
 *  understands it.
 */
pub mod dispatch;
/**
 * Error taxonomy shared by every file operation.
 */
pub mod error;
/**
 * Thin async seam over the OS filesystem so the
 *  sandbox can be exercised against a fake.
 */
pub mod fs;
/**
 * Confines relative paths to a trusted root directory.
 */
pub mod sandbox;
/**
 * Issue tracker request/response types and the
 *  capability trait clients implement.
 */
pub mod ticket;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::backend::{
        BackendConfig, BackendKind, FileBackend, LocalBackend, ObjectBackend, ObjectMode,
    };
    pub use crate::dispatch::{DispatchMode, Dispatcher};
    pub use crate::error::FileError;
    pub use crate::fs::{FileKind, Filesystem, OsFilesystem};
    pub use crate::sandbox::Sandbox;
    pub use crate::ticket::{IssueTracker, TicketError, TicketRequest, TicketResult};
    pub use crate::version::build_info;
}
