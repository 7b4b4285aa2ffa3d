use crate::cli::InvokeContext;
use crate::cli::arbitrary_word;
use crate::cli::to_args::ToArgs;
use crate::host::ConsoleServer;
use crate::host::TextMessage;
use crate::host::User;
use crate::plugins;
use arbitrary::Arbitrary;
use clap::Args;
use std::ffi::OsString;
use tracing::info;

/// Send a chat message through the plugins and print what they post
#[derive(Args, Arbitrary, Clone, PartialEq, Debug)]
pub struct MessageArgs {
    /// Message text, as the chat server would deliver it
    #[arbitrary(with = arbitrary_word)]
    pub text: String,

    /// Virtual server the message arrives on
    #[clap(long, default_value_t = 1)]
    pub server: u32,

    /// Channel the sender is in
    #[clap(long, default_value_t = 0)]
    pub channel: u32,

    /// Name of the sender
    #[clap(long, default_value = "console")]
    #[arbitrary(with = arbitrary_word)]
    pub user: String,
}

impl MessageArgs {
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or a plugin fails to start.
    pub fn invoke(self, context: &InvokeContext) -> eyre::Result<()> {
        let config = context.load_config()?;
        let dispatcher = plugins::connect_all(&config)?;

        let server = ConsoleServer::new(self.server).echoing();
        let user = User {
            session: 0,
            name: self.user,
            channel: self.channel,
        };
        dispatcher.user_text_message(&server, &user, &TextMessage { text: self.text });

        let sent = server.sent();
        info!("Plugins posted {} message(s)", sent.len());
        Ok(())
    }
}

impl ToArgs for MessageArgs {
    fn to_args(&self) -> Vec<OsString> {
        vec![
            OsString::from(&self.text),
            OsString::from("--server"),
            OsString::from(self.server.to_string()),
            OsString::from("--channel"),
            OsString::from(self.channel.to_string()),
            OsString::from("--user"),
            OsString::from(&self.user),
        ]
    }
}
