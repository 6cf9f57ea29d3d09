//! Chat command registry.
//!
//! Maps a chat command keyword (the first token after the `!` prefix)
//! to a handler. Registering a new command never touches the routing
//! logic.

use std::collections::HashMap;

/// A chat command handler: gets the argument text after the keyword,
/// returns zero or one reply.
pub type Handler = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Registry of chat commands.
pub struct CommandRegistry {
    handlers: HashMap<String, Handler>,
}

impl CommandRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler under a keyword, replacing any previous one.
    pub fn register<F>(&mut self, keyword: impl Into<String>, handler: F)
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.handlers.insert(keyword.into(), Box::new(handler));
    }

    /// Route chat text (already stripped of the `!` prefix) to its
    /// handler. Unknown keywords produce no reply and no error.
    pub fn route(&self, text: &str) -> Option<String> {
        let mut tokens = text.split_whitespace();
        let keyword = tokens.next()?;
        let handler = self.handlers.get(keyword)?;
        let args = text[text.find(keyword).unwrap_or(0) + keyword.len()..].trim_start();
        handler(args)
    }
}

impl Default for CommandRegistry {
    /// The stock registry: `ping` replies `pong!`.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("ping", |_| Some("pong!".to_string()));
        registry
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("keywords", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
