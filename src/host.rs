//! The chat server as seen by a plugin: callbacks in, channel messages out.

use std::cell::RefCell;
use tracing::debug;
use tracing::warn;

/// A connected user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub session: u32,
    pub name: String,
    /// Channel the user is currently in
    pub channel: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextMessage {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    pub id: u32,
    pub name: String,
    pub parent: Option<u32>,
}

/// A virtual server hosted by the chat daemon.
pub trait Server {
    fn id(&self) -> u32;

    /// Post `message` to a channel, and to its subchannels when `tree` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the message.
    fn send_message_channel(&self, channel_id: u32, tree: bool, message: &str) -> eyre::Result<()>;
}

/// Servers a plugin wants callbacks from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerSelection {
    All,
    Only(Vec<u32>),
}

impl ServerSelection {
    /// An empty configured list means every server.
    #[must_use]
    pub fn from_configured(servers: &[u32]) -> Self {
        if servers.is_empty() {
            ServerSelection::All
        } else {
            ServerSelection::Only(servers.to_vec())
        }
    }

    #[must_use]
    pub fn includes(&self, server_id: u32) -> bool {
        match self {
            ServerSelection::All => true,
            ServerSelection::Only(ids) => ids.contains(&server_id),
        }
    }
}

/// Server callbacks a plugin can handle. Everything but [`ServerCallbacks::connected`]
/// is a no-op unless overridden.
pub trait ServerCallbacks {
    fn name(&self) -> &str;

    /// Called once the host is reachable; returns the servers to subscribe to.
    fn connected(&mut self) -> ServerSelection;

    fn user_text_message(&self, _server: &dyn Server, _user: &User, _message: &TextMessage) {}

    fn user_connected(&self, _server: &dyn Server, _user: &User) {}

    fn user_disconnected(&self, _server: &dyn Server, _user: &User) {}

    fn user_state_changed(&self, _server: &dyn Server, _user: &User) {}

    fn channel_created(&self, _server: &dyn Server, _channel: &Channel) {}

    fn channel_removed(&self, _server: &dyn Server, _channel: &Channel) {}

    fn channel_state_changed(&self, _server: &dyn Server, _channel: &Channel) {}
}

struct Subscription {
    plugin: Box<dyn ServerCallbacks>,
    servers: ServerSelection,
}

/// Routes host callbacks to the plugins subscribed to the originating server.
#[derive(Default)]
pub struct CallbackDispatcher {
    subscriptions: Vec<Subscription>,
}

impl std::fmt::Debug for CallbackDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.subscriptions
                    .iter()
                    .map(|s| (s.plugin.name(), &s.servers)),
            )
            .finish()
    }
}

impl CallbackDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect `plugin` and subscribe it to the servers it asks for.
    pub fn register(&mut self, mut plugin: Box<dyn ServerCallbacks>) {
        let servers = plugin.connected();
        debug!(plugin = plugin.name(), ?servers, "Register callbacks");
        self.subscriptions.push(Subscription { plugin, servers });
    }

    fn subscribed(&self, server_id: u32) -> impl Iterator<Item = &Subscription> {
        self.subscriptions
            .iter()
            .filter(move |s| s.servers.includes(server_id))
    }

    pub fn user_text_message(&self, server: &dyn Server, user: &User, message: &TextMessage) {
        for subscription in self.subscribed(server.id()) {
            subscription.plugin.user_text_message(server, user, message);
        }
    }

    pub fn user_connected(&self, server: &dyn Server, user: &User) {
        for subscription in self.subscribed(server.id()) {
            subscription.plugin.user_connected(server, user);
        }
    }

    pub fn user_disconnected(&self, server: &dyn Server, user: &User) {
        for subscription in self.subscribed(server.id()) {
            subscription.plugin.user_disconnected(server, user);
        }
    }

    pub fn user_state_changed(&self, server: &dyn Server, user: &User) {
        for subscription in self.subscribed(server.id()) {
            subscription.plugin.user_state_changed(server, user);
        }
    }

    pub fn channel_created(&self, server: &dyn Server, channel: &Channel) {
        for subscription in self.subscribed(server.id()) {
            subscription.plugin.channel_created(server, channel);
        }
    }

    pub fn channel_removed(&self, server: &dyn Server, channel: &Channel) {
        for subscription in self.subscribed(server.id()) {
            subscription.plugin.channel_removed(server, channel);
        }
    }

    pub fn channel_state_changed(&self, server: &dyn Server, channel: &Channel) {
        for subscription in self.subscribed(server.id()) {
            subscription.plugin.channel_state_changed(server, channel);
        }
    }
}

/// One message handed to [`Server::send_message_channel`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: u32,
    pub tree: bool,
    pub message: String,
}

/// A server that keeps what is sent to it and optionally echoes it to stdout.
#[derive(Debug, Default)]
pub struct ConsoleServer {
    pub id: u32,
    pub echo: bool,
    sent: RefCell<Vec<SentMessage>>,
}

impl ConsoleServer {
    #[must_use]
    pub fn new(id: u32) -> Self {
        ConsoleServer {
            id,
            echo: false,
            sent: RefCell::default(),
        }
    }

    #[must_use]
    pub fn echoing(mut self) -> Self {
        self.echo = true;
        self
    }

    /// Everything sent so far
    #[must_use]
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.borrow().clone()
    }
}

impl Server for ConsoleServer {
    fn id(&self) -> u32 {
        self.id
    }

    fn send_message_channel(&self, channel_id: u32, tree: bool, message: &str) -> eyre::Result<()> {
        if self.echo {
            println!("[server {} channel {}] {}", self.id, channel_id, message);
        }
        self.sent.borrow_mut().push(SentMessage {
            channel_id,
            tree,
            message: message.to_string(),
        });
        Ok(())
    }
}

/// Send and log instead of failing the callback.
pub fn send_or_warn(server: &dyn Server, channel_id: u32, message: &str) {
    if let Err(e) = server.send_message_channel(channel_id, false, message) {
        warn!(
            server = server.id(),
            channel = channel_id,
            "Failed to send message: {}",
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct Echo {
        servers: Vec<u32>,
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl ServerCallbacks for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn connected(&mut self) -> ServerSelection {
            ServerSelection::from_configured(&self.servers)
        }

        fn user_text_message(&self, server: &dyn Server, user: &User, message: &TextMessage) {
            self.seen.borrow_mut().push(message.text.clone());
            send_or_warn(server, user.channel, &message.text);
        }
    }

    fn user() -> User {
        User {
            session: 1,
            name: "alice".into(),
            channel: 3,
        }
    }

    #[test]
    fn routes_only_to_subscribed_servers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = CallbackDispatcher::new();
        dispatcher.register(Box::new(Echo {
            servers: vec![2],
            seen: Rc::clone(&seen),
        }));

        let one = ConsoleServer::new(1);
        let two = ConsoleServer::new(2);
        let message = TextMessage { text: "hi".into() };
        dispatcher.user_text_message(&one, &user(), &message);
        dispatcher.user_text_message(&two, &user(), &message);

        assert_eq!(seen.borrow().len(), 1);
        assert!(one.sent().is_empty());
        assert_eq!(
            two.sent(),
            vec![SentMessage {
                channel_id: 3,
                tree: false,
                message: "hi".into()
            }]
        );
    }

    #[test]
    fn unhandled_callbacks_are_no_ops() {
        let mut dispatcher = CallbackDispatcher::new();
        dispatcher.register(Box::new(Echo {
            servers: Vec::new(),
            seen: Rc::default(),
        }));
        let server = ConsoleServer::new(9);
        let channel = Channel {
            id: 4,
            name: "lobby".into(),
            parent: None,
        };
        dispatcher.user_connected(&server, &user());
        dispatcher.user_state_changed(&server, &user());
        dispatcher.user_disconnected(&server, &user());
        dispatcher.channel_created(&server, &channel);
        dispatcher.channel_state_changed(&server, &channel);
        dispatcher.channel_removed(&server, &channel);
        assert!(server.sent().is_empty());
    }

    #[test]
    fn empty_server_list_means_all() {
        assert!(ServerSelection::from_configured(&[]).includes(42));
        assert!(!ServerSelection::from_configured(&[1, 2]).includes(42));
    }
}
