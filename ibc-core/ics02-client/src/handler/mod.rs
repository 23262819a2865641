//! Processing logic for the ICS-02 client messages.

pub mod create_client;
pub mod update_client;
