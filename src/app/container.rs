use std::sync::Arc;

use tracing::debug;

use crate::adapters::{
    FilenameMetadataAdapter, FsLocalAdapter, InMemoryLibraryCache, MkvalidatorAdapter,
    MkvextractAdapter, MkvmergeAdapter, MkvpropeditAdapter, PlexMetadataAdapter,
};
use crate::adapters::toml_config::{MetadataProvider, Settings};
use crate::app::{
    EditInteractor, ExtractInteractor, InspectInteractor, RemuxInteractor, VerifyInteractor,
};
use crate::domain::errors::DomainError;
use crate::ports::{
    ExtractPort, FsPort, LibraryCache, MetadataPort, MuxPort, ProbePort, PropEditPort, ValidatorPort,
};

pub trait AppContainer: Send + Sync {
    fn remux_interactor(&self) -> Arc<RemuxInteractor>;
    fn edit_interactor(&self) -> Arc<EditInteractor>;
    fn extract_interactor(&self) -> Arc<ExtractInteractor>;
    fn verify_interactor(&self) -> Arc<VerifyInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
}

/// Adapters a container is assembled from
pub struct Ports {
    pub probe: Arc<dyn ProbePort>,
    pub mux: Arc<dyn MuxPort>,
    pub propedit: Arc<dyn PropEditPort>,
    pub extract: Arc<dyn ExtractPort>,
    pub validator: Arc<dyn ValidatorPort>,
    pub fs: Arc<dyn FsPort>,
    pub metadata: Arc<dyn MetadataPort>,
}

pub struct DefaultAppContainer {
    remux_interactor: Arc<RemuxInteractor>,
    edit_interactor: Arc<EditInteractor>,
    extract_interactor: Arc<ExtractInteractor>,
    verify_interactor: Arc<VerifyInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
}

impl DefaultAppContainer {
    /// Wire the MKVToolNix adapters and the configured metadata service
    pub fn new(settings: &Settings) -> Result<Self, DomainError> {
        let mkvmerge = Arc::new(MkvmergeAdapter::new(&settings.tools.mkvmerge));
        let metadata: Arc<dyn MetadataPort> = match settings.metadata.provider {
            MetadataProvider::Filename => Arc::new(FilenameMetadataAdapter::new()),
            MetadataProvider::Plex => {
                let token = settings.metadata.plex_token.as_deref().ok_or_else(|| {
                    DomainError::BadArgs("The plex metadata provider needs a token".to_string())
                })?;
                let cache: Arc<dyn LibraryCache> = Arc::new(InMemoryLibraryCache::new());
                Arc::new(PlexMetadataAdapter::new(&settings.metadata.plex_url, token, cache)?)
            }
        };
        debug!("Metadata provider: {:?}", settings.metadata.provider);

        Ok(Self::from_ports(Ports {
            probe: Arc::clone(&mkvmerge) as Arc<dyn ProbePort>,
            mux: mkvmerge as Arc<dyn MuxPort>,
            propedit: Arc::new(MkvpropeditAdapter::new(&settings.tools.mkvpropedit)),
            extract: Arc::new(MkvextractAdapter::new(&settings.tools.mkvextract)),
            validator: Arc::new(MkvalidatorAdapter::new(&settings.tools.mkvalidator)),
            fs: Arc::new(FsLocalAdapter::new()),
            metadata,
        }))
    }

    /// Assemble the interactors over arbitrary adapters
    pub fn from_ports(ports: Ports) -> Self {
        let remux_interactor = Arc::new(RemuxInteractor::new(
            Arc::clone(&ports.probe),
            Arc::clone(&ports.mux),
            Arc::clone(&ports.propedit),
            Arc::clone(&ports.fs),
            Arc::clone(&ports.metadata),
        ));

        let edit_interactor = Arc::new(EditInteractor::new(
            Arc::clone(&ports.probe),
            Arc::clone(&ports.propedit),
            Arc::clone(&ports.fs),
        ));

        let extract_interactor = Arc::new(ExtractInteractor::new(
            Arc::clone(&ports.probe),
            Arc::clone(&ports.extract),
            Arc::clone(&ports.fs),
        ));

        let verify_interactor = Arc::new(VerifyInteractor::new(
            Arc::clone(&ports.validator),
            Arc::clone(&ports.fs),
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(Arc::clone(&ports.probe)));

        Self {
            remux_interactor,
            edit_interactor,
            extract_interactor,
            verify_interactor,
            inspect_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn remux_interactor(&self) -> Arc<RemuxInteractor> {
        Arc::clone(&self.remux_interactor)
    }

    fn edit_interactor(&self) -> Arc<EditInteractor> {
        Arc::clone(&self.edit_interactor)
    }

    fn extract_interactor(&self) -> Arc<ExtractInteractor> {
        Arc::clone(&self.extract_interactor)
    }

    fn verify_interactor(&self) -> Arc<VerifyInteractor> {
        Arc::clone(&self.verify_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }
}
