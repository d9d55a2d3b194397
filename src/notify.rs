//! Resolution event reporting
//!
//! The resolver reports what happens to each project through this trait and
//! hosts decide how to render it: the CLI installs an indicatif-backed
//! implementation, tests collect events into a vector, and [`NullNotifier`]
//! drops everything.

use crate::Error;

/// Observer for resolution and download events
///
/// Every method has an empty default body so implementations only write the
/// events they care about. A failed branch produces exactly one `failed`
/// call naming the project.
pub trait Notifier {
    /// A load run is starting
    fn run_started(
        &self,
        _name: &str,
        _game_version: &str,
        _loader: &str,
        _mods: usize,
        _resourcepacks: usize,
    ) {
    }

    /// Informational note about a project
    fn info(&self, _slug: &str, _message: &str) {}

    /// Something recoverable worth surfacing about a project
    fn warn(&self, _slug: &str, _message: &str) {}

    /// The artifact was served from the local store
    fn already_present(&self, _slug: &str, _filename: &str, _dependency_of: Option<&str>) {}

    /// The artifact was downloaded and installed
    fn fetched(&self, _slug: &str, _filename: &str, _dependency_of: Option<&str>) {}

    /// The branch for this project was abandoned
    fn failed(&self, _slug: &str, _error: &Error) {}

    /// A download is starting
    fn download_started(&self, _slug: &str, _filename: &str) {}

    /// Bytes received so far; total comes from Content-Length when known
    fn download_progress(&self, _received: u64, _total: Option<u64>) {}
}

/// Notifier that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {}
