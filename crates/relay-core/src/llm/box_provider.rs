//! BoxReplyProvider -- object-safe dynamic dispatch wrapper for ReplyProvider.
//!
//! 1. Define an object-safe `ReplyProviderDyn` trait with boxed futures
//! 2. Blanket-impl `ReplyProviderDyn` for all `T: ReplyProvider`
//! 3. `BoxReplyProvider` wraps `Box<dyn ReplyProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use relay_types::llm::ProviderError;

use super::provider::ReplyProvider;

/// Object-safe version of [`ReplyProvider`] with boxed futures.
pub trait ReplyProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    fn get_reply_boxed<'a>(
        &'a self,
        user_message: &'a str,
        system_prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>>;
}

/// Blanket implementation: any `ReplyProvider` automatically implements `ReplyProviderDyn`.
impl<T: ReplyProvider> ReplyProviderDyn for T {
    fn name(&self) -> &str {
        ReplyProvider::name(self)
    }

    fn model(&self) -> &str {
        ReplyProvider::model(self)
    }

    fn get_reply_boxed<'a>(
        &'a self,
        user_message: &'a str,
        system_prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>> {
        Box::pin(self.get_reply(user_message, system_prompt))
    }
}

/// Type-erased reply provider.
///
/// Lets the service be wired with the real HTTP provider in production
/// and with a scripted double in tests, without a generic parameter.
pub struct BoxReplyProvider {
    inner: Box<dyn ReplyProviderDyn + Send + Sync>,
}

impl BoxReplyProvider {
    /// Wrap a concrete `ReplyProvider` in a type-erased box.
    pub fn new<T: ReplyProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn model(&self) -> &str {
        self.inner.model()
    }

    /// Request one reply from the wrapped provider.
    pub async fn get_reply(
        &self,
        user_message: &str,
        system_prompt: &str,
    ) -> Result<String, ProviderError> {
        self.inner.get_reply_boxed(user_message, system_prompt).await
    }
}
