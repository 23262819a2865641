//! Handlers for the four steps of the connection handshake.
//!
//! | step    | local end before | local end after | proven counterparty end |
//! |---------|------------------|-----------------|-------------------------|
//! | init    | absent           | INIT            | none                    |
//! | try     | absent           | TRYOPEN         | INIT                    |
//! | ack     | INIT             | OPEN            | TRYOPEN                 |
//! | confirm | TRYOPEN          | OPEN            | OPEN                    |

pub mod conn_open_ack;
pub mod conn_open_confirm;
pub mod conn_open_init;
pub mod conn_open_try;
