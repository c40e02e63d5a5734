//! View bindings that follow the locale state.
//!
//! A binding caches a value derived from the service (a dimension, or a
//! translated key) and refreshes it when the bus announces a change. The
//! optional refresh callback is where a view schedules its redraw.
//!
//! Bindings hold the service weakly, so an attached binding never keeps the
//! service alive. Dropping a binding detaches it.

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_l10n_core::logging::targets;
use parking_lot::RwLock;

use crate::bus::{Channel, Subscription};
use crate::error::Dimension;
use crate::service::L10nService;
use crate::translation::Params;

type Refresh = Arc<dyn Fn(&str) + Send + Sync>;

/// Something that tracks an [`L10nService`] while attached.
pub trait LocaleBinding {
    /// Start following `service`. Attaching an attached binding moves it.
    fn attach(&mut self, service: &Arc<L10nService>);

    /// Stop following the service. No callback runs afterwards.
    fn detach(&mut self);

    /// Returns true while attached.
    fn is_attached(&self) -> bool;
}

struct Attachment {
    service: Weak<L10nService>,
    subscriptions: Vec<Subscription>,
}

impl Attachment {
    fn release(self) {
        if let Some(service) = self.service.upgrade() {
            for subscription in self.subscriptions {
                service.bus().detach(subscription);
            }
        }
    }
}

/// Mirrors one locale dimension.
///
/// ```
/// use horizon_l10n::binding::{DimensionBinding, LocaleBinding};
/// use horizon_l10n::{Dimension, L10nConfig, L10nService};
///
/// let service = L10nService::new(L10nConfig::new()).unwrap();
/// let mut currency = DimensionBinding::new(Dimension::Currency);
/// currency.attach(&service);
///
/// service.set_currency("EUR").unwrap();
/// assert_eq!(currency.value().as_deref(), Some("EUR"));
/// ```
pub struct DimensionBinding {
    dimension: Dimension,
    value: Arc<RwLock<Option<String>>>,
    refresh: Option<Refresh>,
    attachment: Option<Attachment>,
}

impl DimensionBinding {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            value: Arc::new(RwLock::new(None)),
            refresh: None,
            attachment: None,
        }
    }

    /// Call `refresh` with the new value after every change.
    pub fn with_refresh<F>(mut self, refresh: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.refresh = Some(Arc::new(refresh));
        self
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Last seen value; `None` before the first attach.
    pub fn value(&self) -> Option<String> {
        self.value.read().clone()
    }
}

impl LocaleBinding for DimensionBinding {
    fn attach(&mut self, service: &Arc<L10nService>) {
        self.detach();
        *self.value.write() = Some(service.value(self.dimension));

        let value = Arc::clone(&self.value);
        let refresh = self.refresh.clone();
        let subscription = service.bus().attach(Channel::from(self.dimension), move |change| {
            *value.write() = Some(change.value().to_string());
            if let Some(refresh) = &refresh {
                refresh(change.value());
            }
        });

        tracing::trace!(target: targets::SERVICE, dimension = %self.dimension, "binding attached");
        self.attachment = Some(Attachment {
            service: Arc::downgrade(service),
            subscriptions: vec![subscription],
        });
    }

    fn detach(&mut self) {
        if let Some(attachment) = self.attachment.take() {
            attachment.release();
        }
    }

    fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }
}

impl Drop for DimensionBinding {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for DimensionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DimensionBinding")
            .field("dimension", &self.dimension)
            .field("value", &self.value())
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// A translated key, re-resolved when the language changes or translations
/// are reloaded.
pub struct TranslateBinding {
    key: String,
    params: Option<Params>,
    text: Arc<RwLock<Option<String>>>,
    refresh: Option<Refresh>,
    attachment: Option<Attachment>,
}

impl TranslateBinding {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            params: None,
            text: Arc::new(RwLock::new(None)),
            refresh: None,
            attachment: None,
        }
    }

    /// Interpolate `params` into the translation.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Call `refresh` with the new text after every re-resolution.
    pub fn with_refresh<F>(mut self, refresh: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.refresh = Some(Arc::new(refresh));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Latest translation; `None` before the first attach.
    pub fn text(&self) -> Option<String> {
        self.text.read().clone()
    }

    /// Replace the parameters, re-resolving right away when attached.
    pub fn set_params(&mut self, params: Option<Params>) {
        self.params = params;
        if let Some(service) = self.attachment.as_ref().and_then(|a| a.service.upgrade()) {
            self.attach(&service);
        }
    }

    fn resolve(service: &L10nService, key: &str, params: Option<&Params>) -> String {
        service.translate_in(key, params, &service.language())
    }
}

impl LocaleBinding for TranslateBinding {
    fn attach(&mut self, service: &Arc<L10nService>) {
        self.detach();
        *self.text.write() = Some(Self::resolve(service, &self.key, self.params.as_ref()));

        let subscriptions = [Channel::Language, Channel::TranslationLoaded]
            .into_iter()
            .map(|channel| {
                let weak = Arc::downgrade(service);
                let key = self.key.clone();
                let params = self.params.clone();
                let text = Arc::clone(&self.text);
                let refresh = self.refresh.clone();
                service.bus().attach(channel, move |_| {
                    let Some(service) = weak.upgrade() else {
                        return;
                    };
                    let resolved = Self::resolve(&service, &key, params.as_ref());
                    *text.write() = Some(resolved.clone());
                    if let Some(refresh) = &refresh {
                        refresh(&resolved);
                    }
                })
            })
            .collect();

        tracing::trace!(target: targets::SERVICE, key = %self.key, "binding attached");
        self.attachment = Some(Attachment {
            service: Arc::downgrade(service),
            subscriptions,
        });
    }

    fn detach(&mut self) {
        if let Some(attachment) = self.attachment.take() {
            attachment.release();
        }
    }

    fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }
}

impl Drop for TranslateBinding {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for TranslateBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslateBinding")
            .field("key", &self.key)
            .field("params", &self.params)
            .field("text", &self.text())
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::L10nConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> Arc<L10nService> {
        L10nService::new(L10nConfig::new()).unwrap()
    }

    #[test]
    fn test_dimension_binding_follows_changes() {
        let service = service();
        let refreshed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&refreshed);
        let mut binding = DimensionBinding::new(Dimension::Timezone)
            .with_refresh(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        assert_eq!(binding.value(), None);
        binding.attach(&service);
        assert_eq!(binding.value().as_deref(), Some("UTC"));

        service.set_timezone("Europe/Berlin").unwrap();
        assert_eq!(binding.value().as_deref(), Some("Europe/Berlin"));
        assert_eq!(refreshed.load(Ordering::SeqCst), 1);

        binding.detach();
        assert!(!binding.is_attached());
        service.set_timezone("Asia/Tokyo").unwrap();
        assert_eq!(binding.value().as_deref(), Some("Europe/Berlin"));
        assert_eq!(refreshed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_detaches() {
        let service = service();
        {
            let mut binding = DimensionBinding::new(Dimension::Currency);
            binding.attach(&service);
            let mut text = TranslateBinding::new("title");
            text.attach(&service);
            assert_eq!(service.bus().subscriber_total(), 3);
        }
        assert_eq!(service.bus().subscriber_total(), 0);
    }

    #[test]
    fn test_reattach_does_not_duplicate() {
        let service = service();
        let mut binding = TranslateBinding::new("title");
        binding.attach(&service);
        binding.attach(&service);
        assert_eq!(service.bus().subscriber_total(), 2);
        assert_eq!(binding.text().as_deref(), Some("title"));

        binding.set_params(Some(Params::from([("n", "1")])));
        assert_eq!(service.bus().subscriber_total(), 2);
    }

    #[test]
    fn test_binding_does_not_keep_service_alive() {
        let service = service();
        let weak = Arc::downgrade(&service);
        let mut binding = DimensionBinding::new(Dimension::Language);
        binding.attach(&service);
        drop(service);
        assert!(weak.upgrade().is_none());
        binding.detach();
    }
}
