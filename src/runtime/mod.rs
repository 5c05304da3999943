//! Request/response surface for embedding the manager behind a transport.

pub mod api;

pub use api::{
    arrive, health, leave, lookup, status_code, ArriveRequest, ArriveResponse, Health,
    LookupResponse,
};
