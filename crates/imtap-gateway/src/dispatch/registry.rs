use std::collections::HashMap;
use std::fmt;

use imtap_core::error::{ImTapError, Result};
use imtap_core::protocol::DecodedMessage;
use imtap_core::DecoderRegistry;

use crate::report::LiveEvent;

/// Interprets one decoded variant.
pub type HandleFn = fn(&DecodedMessage) -> Result<LiveEvent>;

/// A handler: the method it owns plus the function that interprets it.
#[derive(Clone, Copy)]
pub struct Handler {
    method: &'static str,
    handle: HandleFn,
}

impl Handler {
    pub const fn new(method: &'static str, handle: HandleFn) -> Self {
        Self { method, handle }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn handle(&self, msg: &DecodedMessage) -> Result<LiveEvent> {
        (self.handle)(msg)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("method", &self.method).finish()
    }
}

/// Method -> handler. Built once, read-only afterwards.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    by_method: HashMap<&'static str, Handler>,
}

impl HandlerRegistry {
    /// Build from an ordered handler list.
    ///
    /// Fails when two handlers claim the same method, or when a handler's
    /// method has no decoder in `decoders`.
    pub fn build(handlers: impl IntoIterator<Item = Handler>, decoders: &DecoderRegistry) -> Result<Self> {
        let mut by_method = HashMap::new();
        for h in handlers {
            if by_method.contains_key(h.method()) {
                return Err(ImTapError::DuplicateRegistration(h.method().to_string()));
            }
            if !decoders.contains(h.method()) {
                return Err(ImTapError::Config(format!(
                    "handler registered for {} but no decoder exists",
                    h.method()
                )));
            }
            by_method.insert(h.method(), h);
        }
        Ok(Self { by_method })
    }

    pub fn resolve(&self, method: &str) -> Option<Handler> {
        self.by_method.get(method).copied()
    }

    /// Registered methods, sorted.
    pub fn methods(&self) -> Vec<&'static str> {
        let mut v: Vec<&'static str> = self.by_method.keys().copied().collect();
        v.sort_unstable();
        v
    }

    pub fn len(&self) -> usize {
        self.by_method.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_method.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers;
    use imtap_core::protocol::method;

    #[test]
    fn builtin_handlers_resolve_one_each() {
        let decoders = DecoderRegistry::webcast();
        let reg = HandlerRegistry::build(handlers::builtin(), &decoders).unwrap();
        assert_eq!(reg.len(), method::ALL.len());
        for m in method::ALL {
            let h = reg.resolve(m).expect("handler");
            assert_eq!(h.method(), m);
        }
        assert!(reg.resolve("WebcastSocialMessage").is_none());
    }

    #[test]
    fn duplicate_method_is_fatal() {
        let decoders = DecoderRegistry::webcast();
        let mut list = handlers::builtin();
        list.push(handlers::like::HANDLER);
        let err = HandlerRegistry::build(list, &decoders).unwrap_err();
        assert!(matches!(err, ImTapError::DuplicateRegistration(ref m) if m == method::LIKE));
    }

    #[test]
    fn handler_without_decoder_is_fatal() {
        let decoders = DecoderRegistry::new();
        let err = HandlerRegistry::build([handlers::chat::HANDLER], &decoders).unwrap_err();
        assert_eq!(err.kind().as_str(), "CONFIG");
    }

    #[test]
    fn subset_registration_is_allowed() {
        let decoders = DecoderRegistry::webcast();
        let reg = HandlerRegistry::build([handlers::gift::HANDLER, handlers::chat::HANDLER], &decoders).unwrap();
        assert_eq!(reg.methods(), vec![method::CHAT, method::GIFT]);
    }
}
