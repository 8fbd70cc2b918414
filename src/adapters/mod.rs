// Adapters - External system implementations

pub mod console;
pub mod filename_metadata;
pub mod fs_local;
pub mod mkvalidator;
pub mod mkvextract;
pub mod mkvmerge;
pub mod mkvpropedit;
#[cfg(any(test, feature = "test-support"))]
pub mod mock;
pub mod plex_metadata;
pub mod process;
pub mod toml_config;

// Re-export adapters
pub use console::{ScriptedConsole, TerminalConsole};
pub use filename_metadata::FilenameMetadataAdapter;
pub use fs_local::FsLocalAdapter;
pub use mkvalidator::MkvalidatorAdapter;
pub use mkvextract::MkvextractAdapter;
pub use mkvmerge::MkvmergeAdapter;
pub use mkvpropedit::MkvpropeditAdapter;
pub use plex_metadata::{InMemoryLibraryCache, PlexMetadataAdapter};
pub use toml_config::TomlConfigAdapter;
