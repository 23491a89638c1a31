//! Command handlers for the qtcli binary.

pub(crate) mod new;

pub(crate) use new::handle_new_command;
