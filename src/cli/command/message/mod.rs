pub mod message_command;
