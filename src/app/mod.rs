// Application layer - Use case interactors

pub mod container;
pub mod discovery;
pub mod edit_interactor;
pub mod extract_interactor;
pub mod inspect_interactor;
pub mod remux_interactor;
pub mod verify_interactor;

// Re-export interactors
pub use edit_interactor::EditInteractor;
pub use extract_interactor::ExtractInteractor;
pub use inspect_interactor::InspectInteractor;
pub use remux_interactor::RemuxInteractor;
pub use verify_interactor::VerifyInteractor;
