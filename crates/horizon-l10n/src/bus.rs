//! Change notification bus.
//!
//! One [`Signal`] per locale dimension plus a translation-loaded channel and
//! an `any` channel that sees every notification. Delivery is synchronous, in
//! attachment order, on the task that changed the state. The dimension
//! channel is notified before `any`.
//!
//! ```
//! use horizon_l10n::bus::{ChangeBus, ChangeNotification, Channel};
//!
//! let bus = ChangeBus::new();
//! let subscription = bus.attach(Channel::Currency, |change| {
//!     println!("currency is now {}", change.value());
//! });
//!
//! bus.publish(ChangeNotification::Currency("EUR".into()));
//! assert!(bus.detach(subscription));
//! ```

use std::fmt;

use horizon_l10n_core::logging::{span_names, targets};
use horizon_l10n_core::{ConnectionGuard, ConnectionId, Signal, SignalEmitter};

use crate::error::Dimension;

/// A change of locale state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeNotification {
    /// The current language changed; carries the new tag.
    Language(String),
    /// The default (formatting) locale changed.
    DefaultLocale(String),
    /// The current currency changed; carries the ISO 4217 code.
    Currency(String),
    /// The current timezone changed; carries the IANA name.
    Timezone(String),
    /// Translations for a language were (re)loaded.
    TranslationLoaded(String),
}

impl ChangeNotification {
    /// Notification for a state dimension.
    pub fn for_dimension(dimension: Dimension, value: impl Into<String>) -> Self {
        let value = value.into();
        match dimension {
            Dimension::Language => Self::Language(value),
            Dimension::DefaultLocale => Self::DefaultLocale(value),
            Dimension::Currency => Self::Currency(value),
            Dimension::Timezone => Self::Timezone(value),
        }
    }

    /// The carried value.
    pub fn value(&self) -> &str {
        match self {
            Self::Language(v)
            | Self::DefaultLocale(v)
            | Self::Currency(v)
            | Self::Timezone(v)
            | Self::TranslationLoaded(v) => v,
        }
    }

    /// The channel this notification is delivered on (besides `any`).
    pub fn channel(&self) -> Channel {
        match self {
            Self::Language(_) => Channel::Language,
            Self::DefaultLocale(_) => Channel::DefaultLocale,
            Self::Currency(_) => Channel::Currency,
            Self::Timezone(_) => Channel::Timezone,
            Self::TranslationLoaded(_) => Channel::TranslationLoaded,
        }
    }

    /// The state dimension, if this is a state change.
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            Self::Language(_) => Some(Dimension::Language),
            Self::DefaultLocale(_) => Some(Dimension::DefaultLocale),
            Self::Currency(_) => Some(Dimension::Currency),
            Self::Timezone(_) => Some(Dimension::Timezone),
            Self::TranslationLoaded(_) => None,
        }
    }
}

impl fmt::Display for ChangeNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} = {}", self.channel(), self.value())
    }
}

/// A notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Language,
    DefaultLocale,
    Currency,
    Timezone,
    TranslationLoaded,
    /// Every notification.
    Any,
}

impl From<Dimension> for Channel {
    fn from(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Language => Self::Language,
            Dimension::DefaultLocale => Self::DefaultLocale,
            Dimension::Currency => Self::Currency,
            Dimension::Timezone => Self::Timezone,
        }
    }
}

/// Handle of an attached subscriber, used to detach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    channel: Channel,
    id: ConnectionId,
}

impl Subscription {
    /// Channel the subscriber listens on.
    pub fn channel(&self) -> Channel {
        self.channel
    }
}

/// Multicast change notification channels.
#[derive(Default)]
pub struct ChangeBus {
    language: Signal<ChangeNotification>,
    default_locale: Signal<ChangeNotification>,
    currency: Signal<ChangeNotification>,
    timezone: Signal<ChangeNotification>,
    translation_loaded: Signal<ChangeNotification>,
    any: Signal<ChangeNotification>,
}

impl fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBus")
            .field("subscribers", &self.subscriber_total())
            .finish()
    }
}

impl ChangeBus {
    /// Create a bus without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// The signal behind a channel.
    pub fn signal(&self, channel: Channel) -> &Signal<ChangeNotification> {
        match channel {
            Channel::Language => &self.language,
            Channel::DefaultLocale => &self.default_locale,
            Channel::Currency => &self.currency,
            Channel::Timezone => &self.timezone,
            Channel::TranslationLoaded => &self.translation_loaded,
            Channel::Any => &self.any,
        }
    }

    fn emitters(&self) -> [&dyn SignalEmitter; 6] {
        [
            &self.language,
            &self.default_locale,
            &self.currency,
            &self.timezone,
            &self.translation_loaded,
            &self.any,
        ]
    }

    /// Attach a subscriber to a channel.
    pub fn attach<F>(&self, channel: Channel, subscriber: F) -> Subscription
    where
        F: Fn(&ChangeNotification) + Send + Sync + 'static,
    {
        let id = self.signal(channel).connect(subscriber);
        tracing::trace!(target: targets::SIGNAL, ?channel, "subscriber attached");
        Subscription { channel, id }
    }

    /// Attach a subscriber that is detached when the guard drops.
    pub fn attach_scoped<F>(&self, channel: Channel, subscriber: F) -> ConnectionGuard<ChangeNotification>
    where
        F: Fn(&ChangeNotification) + Send + Sync + 'static,
    {
        self.signal(channel).connect_scoped(subscriber)
    }

    /// Detach a subscriber. Returns `false` if it was already detached.
    pub fn detach(&self, subscription: Subscription) -> bool {
        let removed = self.signal(subscription.channel).disconnect(subscription.id);
        if removed {
            tracing::trace!(target: targets::SIGNAL, channel = ?subscription.channel, "subscriber detached");
        }
        removed
    }

    /// Returns true if the subscriber is still attached.
    pub fn is_attached(&self, subscription: Subscription) -> bool {
        self.signal(subscription.channel).is_connected(subscription.id)
    }

    /// Deliver a notification to its channel, then to `any`.
    ///
    /// Returns the number of subscribers invoked.
    pub fn publish(&self, notification: ChangeNotification) -> usize {
        let _span = tracing::trace_span!(target: targets::SIGNAL, span_names::SIGNAL, %notification).entered();
        let delivered = self.signal(notification.channel()).emit(notification.clone());
        delivered + self.any.emit(notification)
    }

    /// Number of subscribers on a channel.
    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.signal(channel).connection_count()
    }

    /// Number of subscribers on all channels.
    pub fn subscriber_total(&self) -> usize {
        self.emitters().iter().map(|e| e.connection_count()).sum()
    }

    /// Suppress (or resume) delivery on every channel.
    pub fn set_blocked(&self, blocked: bool) {
        for emitter in self.emitters() {
            emitter.set_blocked(blocked);
        }
    }

    /// Detach every subscriber.
    pub fn detach_all(&self) {
        for emitter in self.emitters() {
            emitter.disconnect_all();
        }
    }
}
