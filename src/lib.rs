pub mod app;
pub mod error;

pub mod domain {
    pub mod entities {
        pub mod definition;
        pub mod saved_view;
    }
    pub mod surface {
        pub mod fixed;
        pub mod grid;
        pub mod moveable;
        pub mod reconciler;
    }
}

pub mod usecase {
    pub mod ports {
        pub mod host;
        pub mod last_used;
        pub mod repo;
    }
    pub mod services {
        pub mod pipeline;
        pub mod registry;
        pub mod selection;
        pub mod sequence;
        pub mod store;
    }
}

pub mod infra {
    pub mod local {
        pub mod last_used;
    }
    pub mod paths;
    pub mod sqlite {
        pub mod queries;
        pub mod repo;
        pub mod schema;
    }
}

pub mod platform {
    pub mod desktop {
        pub mod blocking;
    }
}

pub mod ui {
    pub mod host;
    pub mod state {
        pub mod app_state;
    }
}

pub use domain::entities::definition::{ColumnKey, ViewDefinition};
pub use domain::entities::saved_view::{SavedView, ViewId, ViewVisibility};
pub use error::{Result, ViewError};
pub use usecase::services::store::{GridConfig, SavedViewsGrid};
