//! Lazily loaded views
//!
//! A route's view can be given directly ([`ViewSource::Eager`]) or as a
//! loader that runs on the first navigation that needs it
//! ([`ViewSource::Lazy`]). A successful load is cached and shared by every
//! clone of the [`LazyView`]; a failed load is not, so the next navigation
//! retries.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::ViewLoadError;

type Loader<V> = dyn Fn() -> Result<V, ViewLoadError> + Send + Sync;

/// A view produced on first use
///
/// # Examples
///
/// ```
/// use dashroute::LazyView;
///
/// let view = LazyView::new("pages/BotDetailView", || Ok("<bot-detail>"));
/// assert!(!view.is_loaded());
/// assert_eq!(view.get().unwrap(), &"<bot-detail>");
/// assert!(view.is_loaded());
/// ```
pub struct LazyView<V> {
    name: String,
    cell: Arc<OnceCell<V>>,
    loader: Arc<Loader<V>>,
}

impl<V> LazyView<V> {
    pub fn new<F>(name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Result<V, ViewLoadError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            cell: Arc::new(OnceCell::new()),
            loader: Arc::new(loader),
        }
    }

    /// Name used in logs and errors, e.g. the component path
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the view, running the loader if it has not succeeded yet
    pub fn get(&self) -> Result<&V, ViewLoadError> {
        self.cell.get_or_try_init(|| {
            debug!(view = %self.name, "loading view");
            (self.loader)().map_err(|error| {
                warn!(view = %self.name, %error, "view failed to load");
                error
            })
        })
    }
}

impl<V> Clone for LazyView<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            cell: Arc::clone(&self.cell),
            loader: Arc::clone(&self.loader),
        }
    }
}

impl<V> fmt::Debug for LazyView<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyView")
            .field("name", &self.name)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Where a route gets its view from
#[derive(Debug, Clone)]
pub enum ViewSource<V> {
    /// The view itself
    Eager(V),
    /// A loader run on first navigation
    Lazy(LazyView<V>),
}

impl<V> ViewSource<V> {
    /// Returns the view, loading it first if needed
    pub fn load(&self) -> Result<&V, ViewLoadError> {
        match self {
            ViewSource::Eager(view) => Ok(view),
            ViewSource::Lazy(lazy) => lazy.get(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        match self {
            ViewSource::Eager(_) => true,
            ViewSource::Lazy(lazy) => lazy.is_loaded(),
        }
    }
}

impl<V> From<LazyView<V>> for ViewSource<V> {
    fn from(lazy: LazyView<V>) -> Self {
        ViewSource::Lazy(lazy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_loader_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let view = LazyView::new("pages/IndexView", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("index".to_string())
        });

        assert_eq!(view.get().unwrap(), "index");
        assert_eq!(view.get().unwrap(), "index");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clones_share_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let view = LazyView::new("pages/IndexView", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(42)
        });
        let copy = view.clone();

        assert_eq!(view.get().unwrap(), &42);
        assert!(copy.is_loaded());
        assert_eq!(copy.get().unwrap(), &42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let view = LazyView::new("pages/FlakyView", move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ViewLoadError::new("pages/FlakyView", "chunk not found"))
            } else {
                Ok("flaky")
            }
        });

        let error = view.get().unwrap_err();
        assert_eq!(error.reason, "chunk not found");
        assert!(!view.is_loaded());

        assert_eq!(view.get().unwrap(), &"flaky");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_view_source_eager() {
        let source = ViewSource::Eager("login");
        assert!(source.is_loaded());
        assert_eq!(source.load().unwrap(), &"login");
    }

    #[test]
    fn test_debug_shows_load_state() {
        let view = LazyView::new("pages/LoginView", || Ok(()));
        assert_eq!(format!("{view:?}"), "LazyView { name: \"pages/LoginView\", loaded: false }");
    }
}
