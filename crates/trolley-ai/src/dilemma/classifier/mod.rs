//! Boundary to the externally fitted classifier.
//!
//! The model is loaded lazily, once per process, through a [`ClassifierHandle`]. A missing
//! or broken model is memoized as unavailable so every later call falls back the same way.

mod forest;

pub use forest::{ForestModel, TreeNode};

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use super::domain::TrackId;
use super::features::FeatureVector;

/// Opaque predictor: encoded scenario in, sacrificed track out.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<TrackId, ClassifierError>;
}

/// Reasons a prediction could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifierError {
    #[error("no classifier model is configured")]
    NotConfigured,
    #[error("classifier model failed to load: {0}")]
    LoadFailed(String),
    #[error("classifier expects {expected} features but the scenario encodes {actual}")]
    IncompatibleInput { expected: usize, actual: usize },
}

/// Error raised while reading a serialized model.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model is malformed: {0}")]
    Invalid(String),
}

/// Where the handle obtains its model on first use.
#[derive(Clone)]
pub enum ModelSource {
    Missing,
    File(PathBuf),
    Static(Arc<dyn Classifier>),
}

impl fmt::Debug for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "Missing"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Static(_) => write!(f, "Static(..)"),
        }
    }
}

type LoadedModel = Result<Arc<dyn Classifier>, ClassifierError>;

/// Owned, once-initialized classifier slot shared by every request.
pub struct ClassifierHandle {
    source: ModelSource,
    model: OnceLock<LoadedModel>,
}

impl ClassifierHandle {
    pub fn new(source: ModelSource) -> Self {
        Self {
            source,
            model: OnceLock::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(ModelSource::Missing)
    }

    pub fn preloaded(classifier: Arc<dyn Classifier>) -> Self {
        Self::new(ModelSource::Static(classifier))
    }

    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    /// Whether the load attempt has already happened (successfully or not).
    pub fn is_initialized(&self) -> bool {
        self.model.get().is_some()
    }

    /// Loads the model if needed and reports whether predictions are possible.
    pub fn is_available(&self) -> bool {
        self.model().is_ok()
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<TrackId, ClassifierError> {
        let model = self.model().map_err(Clone::clone)?;
        model.predict(features)
    }

    fn model(&self) -> Result<&Arc<dyn Classifier>, &ClassifierError> {
        self.model.get_or_init(|| load(&self.source)).as_ref()
    }
}

impl fmt::Debug for ClassifierHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierHandle")
            .field("source", &self.source)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

fn load(source: &ModelSource) -> LoadedModel {
    match source {
        ModelSource::Missing => {
            warn!("no classifier model configured; ml decisions fall back to track 1");
            Err(ClassifierError::NotConfigured)
        }
        ModelSource::File(path) => match ForestModel::from_path(path) {
            Ok(model) => {
                info!(
                    path = %path.display(),
                    trees = model.trees.len(),
                    features = model.feature_count,
                    "classifier model loaded"
                );
                Ok(Arc::new(model))
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "classifier model unavailable");
                Err(ClassifierError::LoadFailed(err.to_string()))
            }
        },
        ModelSource::Static(classifier) => Ok(Arc::clone(classifier)),
    }
}
